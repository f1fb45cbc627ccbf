//! Category → system-prompt template table (spec §4.7 "Each category
//! maps to a fixed system prompt template"). A static table rather than
//! branching logic, per SPEC_FULL.md's table-driven classification note,
//! so adding a category is a data change rather than a new match arm.

use crate::category::QueryCategory;

/// Returns the system prompt for a query category. Every variant has an
/// entry; there is no silent fallback to `General`'s wording for an
/// unmatched category because `classify` always returns one of these.
pub fn system_prompt(category: QueryCategory) -> &'static str {
    match category {
        QueryCategory::ConciseResponse => {
            "Answer in one short sentence. No preamble, no bullet points, no \
             hedging. If the documents don't contain the answer, say so in \
             one sentence."
        }
        QueryCategory::TechnicalDocument => {
            "You are reading a technical document (code, specifications, or \
             system documentation). Explain precisely, preserve technical \
             terminology, and quote relevant identifiers or parameters \
             verbatim where useful."
        }
        QueryCategory::LegalDocument => {
            "You are reading a legal document. Quote the relevant clause or \
             section when citing an obligation, right, or term. Do not give \
             legal advice; describe what the document says."
        }
        QueryCategory::EducationalContent => {
            "You are reading educational or reference material. Explain \
             concepts clearly, building from the document's own definitions \
             and examples rather than outside knowledge."
        }
        QueryCategory::MarketCrashAnalysis => {
            "You are analyzing a historical market downturn or financial \
             crisis. Ground your answer in dates, causes, and outcomes found \
             in the documents; distinguish what happened from speculation \
             about why."
        }
        QueryCategory::StockPrediction => {
            "You are asked about future price movement. State clearly that \
             this is not financial advice, then summarize what the \
             documents' indicators or forecasts actually say, without \
             inventing a prediction the documents don't support."
        }
        QueryCategory::StockAnalysis => {
            "You are analyzing a company's fundamentals. Cite concrete \
             figures (revenue, earnings, ratios) from the documents rather \
             than general impressions."
        }
        QueryCategory::MarketEducation => {
            "You are explaining a market or investing concept to someone \
             learning it. Use the documents' own explanations and examples, \
             plain language, and define any jargon you use."
        }
        QueryCategory::InvestmentGuidance => {
            "You are discussing investment strategy or planning. Summarize \
             what the documents say; note this is informational, not \
             personalized financial advice."
        }
        QueryCategory::MarketResearch => {
            "You are summarizing market or economic research. Distinguish \
             data points from the authors' interpretation, and attribute \
             claims to the source document where the documents name one."
        }
        QueryCategory::TechnicalAnalysis => {
            "You are discussing chart patterns, indicators, or price action. \
             Refer to the specific levels, patterns, or indicator readings \
             the documents describe."
        }
        QueryCategory::NewsAnalysis => {
            "You are summarizing news or an announcement and its likely \
             impact. Separate the reported facts from analyst reaction or \
             speculation found in the documents."
        }
        QueryCategory::MultiYearCalculation | QueryCategory::Calculation => {
            "You are performing a numeric calculation. Show the figures you \
             used and the arithmetic, state the result clearly, and flag \
             any assumption you had to make because a figure wasn't in the \
             documents."
        }
        QueryCategory::Summary => {
            "Summarize the relevant documents. Lead with the main points, \
             then supporting detail; keep it proportional to what was asked."
        }
        QueryCategory::General => {
            "Answer the question using only the provided documents and \
             conversation context. If the documents don't contain the \
             answer, say so plainly rather than guessing."
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_category_has_a_non_empty_prompt() {
        let categories = [
            QueryCategory::ConciseResponse,
            QueryCategory::TechnicalDocument,
            QueryCategory::LegalDocument,
            QueryCategory::EducationalContent,
            QueryCategory::MarketCrashAnalysis,
            QueryCategory::StockPrediction,
            QueryCategory::StockAnalysis,
            QueryCategory::MarketEducation,
            QueryCategory::InvestmentGuidance,
            QueryCategory::MarketResearch,
            QueryCategory::TechnicalAnalysis,
            QueryCategory::NewsAnalysis,
            QueryCategory::MultiYearCalculation,
            QueryCategory::Calculation,
            QueryCategory::Summary,
            QueryCategory::General,
        ];
        for category in categories {
            assert!(!system_prompt(category).is_empty());
        }
    }
}
