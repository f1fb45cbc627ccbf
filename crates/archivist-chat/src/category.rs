//! Keyword-based query classification (spec §4.7). Sixteen categories,
//! each backed by a fixed keyword set; the first matching category wins,
//! checked in priority order. A static table rather than branching logic,
//! so adding a category is a data change.

/// Query category driving prompt-template selection (spec §4.7). Sixteen
/// named categories as enumerated by the spec's priority list; `General`
/// is the default when nothing else matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryCategory {
    ConciseResponse,
    TechnicalDocument,
    LegalDocument,
    EducationalContent,
    MarketCrashAnalysis,
    StockPrediction,
    StockAnalysis,
    MarketEducation,
    InvestmentGuidance,
    MarketResearch,
    TechnicalAnalysis,
    NewsAnalysis,
    MultiYearCalculation,
    Calculation,
    Summary,
    General,
}

impl QueryCategory {
    /// True for categories whose retrieval threshold starts stricter
    /// (spec §4.8 "calculation-like queries use 0.5").
    pub fn is_calculation_like(self) -> bool {
        matches!(self, QueryCategory::Calculation | QueryCategory::MultiYearCalculation)
    }
}

const CONCISE_KEYWORDS: &[&str] = &[
    "one line", "one sentence", "brief", "short", "concise", "quick", "in brief",
    "summarize in one line", "one word", "simple answer", "just tell me", "direct answer",
    "straight answer", "simple",
];

const TECHNICAL_DOCUMENT_KEYWORDS: &[&str] = &[
    "code", "programming", "software", "technical specification", "api", "implementation",
    "system architecture", "database", "algorithm", "function", "method", "class",
    "interface", "protocol", "framework", "library", "module", "component",
    "configuration", "deployment", "javascript", "python", "java", "html", "css", "sql",
    "json", "xml",
];

const LEGAL_DOCUMENT_KEYWORDS: &[&str] = &[
    "legal document", "contract", "agreement", "terms and conditions", "clause",
    "liability", "obligation", "legal right", "regulation", "compliance", "law",
    "statute", "act", "legal policy", "legal procedure", "requirement", "warranty",
    "indemnification", "termination", "amendment", "legal",
];

const EDUCATIONAL_CONTENT_KEYWORDS: &[&str] = &[
    "educational content", "tutorial", "learning guide", "instruction manual",
    "lesson plan", "course material", "training manual", "workshop guide",
    "seminar material", "lecture notes", "study guide", "academic paper",
    "scholarly article", "research paper", "thesis", "dissertation", "textbook",
    "manual", "handbook", "reference book",
];

const MARKET_CRASH_KEYWORDS: &[&str] = &[
    "crash", "crashed", "crisis", "crises", "panic", "bubble", "burst", "collapse",
    "plunge", "tumble", "downturn", "bear market", "recession", "depression",
    "financial crisis", "market crash", "stock market crash", "economic crisis",
    "financial panic", "market correction", "sell-off", "market turmoil",
];

const STOCK_PREDICTION_KEYWORDS: &[&str] = &[
    "predict", "prediction", "forecast", "target", "price target", "future price",
    "will go up", "will go down", "trend", "momentum", "breakout", "breakdown",
    "support", "resistance", "technical", "chart", "pattern", "indicator",
    "moving average", "rsi", "macd", "bollinger", "fibonacci",
];

const STOCK_ANALYSIS_KEYWORDS: &[&str] = &[
    "analyze", "analysis", "stock", "share", "company", "fundamental", "financial",
    "performance", "earnings", "revenue", "profit", "loss", "balance sheet",
    "income statement", "cash flow", "ratios", "valuation", "fair value", "market cap",
    "pe ratio", "book value", "dividend", "growth", "sector",
];

const MARKET_EDUCATION_KEYWORDS: &[&str] = &[
    "learn about", "teach me", "explain how", "how does investing work", "concept of",
    "basics of", "beginner", "tutorial on", "investing guide", "stock market basics",
    "sebi", "nse", "bse",
];

const INVESTMENT_GUIDANCE_KEYWORDS: &[&str] = &[
    "advice", "guidance", "recommend", "suggest", "portfolio", "investment", "strategy",
    "planning", "asset allocation", "diversification", "risk", "return", "mutual fund",
    "sip", "tax", "retirement", "financial planning",
];

const MARKET_RESEARCH_KEYWORDS: &[&str] = &[
    "research", "study", "report", "sector", "industry", "market trend", "economic",
    "policy", "government", "rbi", "regulation", "reform", "global", "international",
    "commodity", "currency", "inflation", "gdp",
];

const TECHNICAL_ANALYSIS_KEYWORDS: &[&str] = &[
    "chart", "technical", "pattern", "indicator", "trend", "momentum", "volume",
    "price action", "candlestick", "support", "resistance", "breakout", "breakdown",
    "fibonacci", "elliot wave", "oscillator",
];

const NEWS_ANALYSIS_KEYWORDS: &[&str] = &[
    "news", "announcement", "result", "quarterly", "annual", "update", "policy",
    "decision", "impact", "effect", "reaction", "sentiment", "rumor", "speculation",
    "expert", "analyst", "report",
];

const CALCULATION_KEYWORDS: &[&str] = &[
    "calculate", "salary", "take home", "take-home", "gross", "net", "deduction",
    "monthly", "annual", "yearly", "per month", "per year", "amount", "total",
    "compensation", "pay", "income", "earnings", "bonus", "increment", "how much",
    "what is the", "compute", "figure out", "in month", "month", "need in",
    "calculation", "correct", "wrong", "fix", "accurate",
];

const MULTI_YEAR_KEYWORDS: &[&str] = &[
    "years", "year", "annual", "yearly", "total for", "over", "period", "multiple years",
    "2 years", "3 years", "4 years", "5 years", "decade", "long term", "extended period",
];

const SUMMARY_KEYWORDS: &[&str] = &[
    "summarize", "summary", "overview", "main points", "key points", "highlight the",
    "outline the", "describe the", "tell me about", "give me a summary", "create a summary",
];

fn any_keyword(query_lower: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| query_lower.contains(kw))
}

/// Classify a user query (spec §4.7 priority order 1-16).
pub fn classify(query: &str) -> QueryCategory {
    let query_lower = query.to_lowercase();

    if any_keyword(&query_lower, CONCISE_KEYWORDS) {
        return QueryCategory::ConciseResponse;
    }
    if any_keyword(&query_lower, TECHNICAL_DOCUMENT_KEYWORDS) {
        return QueryCategory::TechnicalDocument;
    }
    if any_keyword(&query_lower, LEGAL_DOCUMENT_KEYWORDS) {
        return QueryCategory::LegalDocument;
    }
    if any_keyword(&query_lower, EDUCATIONAL_CONTENT_KEYWORDS) {
        return QueryCategory::EducationalContent;
    }
    if any_keyword(&query_lower, MARKET_CRASH_KEYWORDS) {
        return QueryCategory::MarketCrashAnalysis;
    }
    if any_keyword(&query_lower, STOCK_PREDICTION_KEYWORDS) {
        return QueryCategory::StockPrediction;
    }
    if any_keyword(&query_lower, STOCK_ANALYSIS_KEYWORDS) {
        return QueryCategory::StockAnalysis;
    }
    if any_keyword(&query_lower, MARKET_EDUCATION_KEYWORDS) {
        return QueryCategory::MarketEducation;
    }
    if any_keyword(&query_lower, INVESTMENT_GUIDANCE_KEYWORDS) {
        return QueryCategory::InvestmentGuidance;
    }
    if any_keyword(&query_lower, MARKET_RESEARCH_KEYWORDS) {
        return QueryCategory::MarketResearch;
    }
    if any_keyword(&query_lower, TECHNICAL_ANALYSIS_KEYWORDS) {
        return QueryCategory::TechnicalAnalysis;
    }
    if any_keyword(&query_lower, NEWS_ANALYSIS_KEYWORDS) {
        return QueryCategory::NewsAnalysis;
    }
    if any_keyword(&query_lower, CALCULATION_KEYWORDS) {
        if any_keyword(&query_lower, MULTI_YEAR_KEYWORDS) {
            return QueryCategory::MultiYearCalculation;
        }
        return QueryCategory::Calculation;
    }
    if any_keyword(&query_lower, SUMMARY_KEYWORDS) {
        return QueryCategory::Summary;
    }
    QueryCategory::General
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concise_keywords_take_priority_over_everything_else() {
        assert_eq!(classify("give me a one line summary of the crash"), QueryCategory::ConciseResponse);
    }

    #[test]
    fn calculation_with_year_span_is_multi_year() {
        assert_eq!(classify("what is my take home salary for 5 years"), QueryCategory::MultiYearCalculation);
    }

    #[test]
    fn plain_calculation_without_year_span() {
        assert_eq!(classify("calculate my monthly take home pay"), QueryCategory::Calculation);
    }

    #[test]
    fn stock_analysis_keywords_match() {
        assert_eq!(classify("analyze the company's balance sheet and earnings"), QueryCategory::StockAnalysis);
    }

    #[test]
    fn unmatched_query_falls_back_to_general() {
        assert_eq!(classify("hello there"), QueryCategory::General);
    }

    #[test]
    fn is_calculation_like_covers_both_calculation_categories() {
        assert!(QueryCategory::Calculation.is_calculation_like());
        assert!(QueryCategory::MultiYearCalculation.is_calculation_like());
        assert!(!QueryCategory::General.is_calculation_like());
    }
}
