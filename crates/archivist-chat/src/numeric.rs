//! Calculation shortcut and numeric-context extraction (spec §4.7, §9
//! worked example "Numeric follow-up"). A multi-year or monthly query
//! against a cached base salary figure is answered with plain arithmetic
//! instead of a round trip to the LLM; after every LLM reply, monetary
//! figures are pulled back out and cached for the next such shortcut.

use archivist_types::numeric_cache::{GROSS_SALARY, TAKE_HOME_SALARY};
use archivist_types::NumericContextCache;
use once_cell::sync::Lazy;
use regex::Regex;

struct SalaryPattern {
    regex: Lazy<Regex>,
    key: &'static str,
}

macro_rules! salary_pattern {
    ($pat:literal, $key:expr) => {
        SalaryPattern {
            regex: Lazy::new(|| Regex::new($pat).expect("static regex")),
            key: $key,
        }
    };
}

// Currency is never hardcoded: the amount pattern captures whatever
// symbol or short code (if any) precedes the digits — "₹", "$", "Rs.",
// "USD", or nothing — and the captured text is cached verbatim so it can
// be echoed back unchanged in a synthesized answer (spec §9 "Implementers
// should not hardcode currency").
static TAKE_HOME_PATTERN: SalaryPattern = salary_pattern!(
    r"(?i)take[- ]home\s+salary\s+(?:(?:is|of|would be|will be)\s+)?([^\s0-9]{0,3})\s?([0-9][0-9,]*(?:\.[0-9]+)?)",
    TAKE_HOME_SALARY
);
static GROSS_PATTERN: SalaryPattern = salary_pattern!(
    r"(?i)gross\s+salary\s+(?:(?:is|of|would be|will be)\s+)?([^\s0-9]{0,3})\s?([0-9][0-9,]*(?:\.[0-9]+)?)",
    GROSS_SALARY
);

const SALARY_PATTERNS: &[&SalaryPattern] = &[&TAKE_HOME_PATTERN, &GROSS_PATTERN];

fn parse_amount(raw: &str) -> Option<f64> {
    raw.replace(',', "").parse::<f64>().ok()
}

/// The non-digit currency marker (if any) a cached raw figure was
/// written with, e.g. `"₹1,144,180"` -> `"₹"`, `"USD 1,200"` -> `"USD "`.
fn currency_prefix(raw: &str) -> String {
    raw.chars().take_while(|c| !c.is_ascii_digit()).collect()
}

/// Run salary-phrase regexes over an LLM reply and cache every match
/// (spec §4.7 "the planner runs regexes over the response to extract and
/// cache monetary figures keyed by salary-phrase patterns").
pub fn extract_and_cache(response: &str, cache: &mut NumericContextCache) {
    for pattern in SALARY_PATTERNS {
        if let Some(captures) = pattern.regex.captures(response) {
            let currency = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
            let number = captures.get(2).map(|m| m.as_str()).unwrap_or_default();
            if let Some(value) = parse_amount(number) {
                cache.set(pattern.key, value, format!("{currency}{number}"));
            }
        }
    }
}

/// Extracts a bare year or month multiplier from a follow-up query, e.g.
/// "for 5 years" -> `Some(Span::Years(5))`, "in 3 months" -> `Some(Span::Months(3))`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Span {
    Years(u32),
    Months(u32),
}

static YEAR_SPAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)([0-9]+)\s*years?").expect("static regex"));
static MONTH_SPAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)([0-9]+)\s*months?").expect("static regex"));

pub fn detect_span(query: &str) -> Option<Span> {
    if let Some(captures) = YEAR_SPAN.captures(query) {
        let n: u32 = captures.get(1)?.as_str().parse().ok()?;
        return Some(Span::Years(n));
    }
    if let Some(captures) = MONTH_SPAN.captures(query) {
        let n: u32 = captures.get(1)?.as_str().parse().ok()?;
        return Some(Span::Months(n));
    }
    None
}

/// True when the query both looks like a multi-year/monthly calculation
/// ask and a span can be extracted (spec §4.7 "(e.g., how much in 5
/// years)").
pub fn is_span_calculation(query: &str) -> bool {
    detect_span(query).is_some()
}

/// Format a figure with comma-grouped thousands under whatever currency
/// marker the cached base was originally written with (groups of three
/// digits, matching the worked example's "₹5,720,900" rendering).
fn format_amount(value: f64, currency: &str) -> String {
    let rounded = value.round() as i64;
    let digits = rounded.abs().to_string();
    let mut groups = Vec::new();
    let mut remaining = digits.as_str();
    while remaining.len() > 3 {
        let split_at = remaining.len() - 3;
        groups.push(remaining[split_at..].to_string());
        remaining = &remaining[..split_at];
    }
    groups.push(remaining.to_string());
    groups.reverse();
    let sign = if rounded < 0 { "-" } else { "" };
    format!("{sign}{currency}{}", groups.join(","))
}

/// Synthesize a calculation answer directly from the cache, bypassing
/// the LLM (spec §9 worked example). Returns `None` if no base salary
/// is cached or the query doesn't carry a span.
pub fn synthesize_calculation(query: &str, cache: &NumericContextCache) -> Option<String> {
    let span = detect_span(query)?;
    let base = cache.get(TAKE_HOME_SALARY)?;
    let raw_base = cache.get_raw(TAKE_HOME_SALARY).unwrap_or_default();
    let currency = currency_prefix(raw_base);

    let (multiplier, unit) = match span {
        Span::Years(n) => (n as f64, "years"),
        Span::Months(n) => (n as f64 / 12.0, "months"),
    };
    let total = base * multiplier;
    let multiplier_label = match span {
        Span::Years(n) => n.to_string(),
        Span::Months(n) => n.to_string(),
    };
    Some(format!(
        "The take-home salary for {multiplier_label} {unit} would be {} ({} × {multiplier_label}).",
        format_amount(total, &currency),
        raw_base
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn extracts_take_home_salary_from_llm_reply() {
        let mut cache = NumericContextCache::new(Duration::from_secs(60));
        extract_and_cache("Your take-home salary is ₹1,144,180 per year.", &mut cache);
        assert_eq!(cache.get(TAKE_HOME_SALARY), Some(1_144_180.0));
    }

    #[test]
    fn detects_year_span() {
        assert_eq!(detect_span("and for 5 years?"), Some(Span::Years(5)));
    }

    #[test]
    fn detects_month_span() {
        assert_eq!(detect_span("what about 18 months"), Some(Span::Months(18)));
    }

    #[test]
    fn synthesizes_multi_year_answer_from_cache() {
        let mut cache = NumericContextCache::new(Duration::from_secs(60));
        cache.set(TAKE_HOME_SALARY, 1_144_180.0, "₹1,144,180");
        let answer = synthesize_calculation("and for 5 years?", &cache).unwrap();
        assert!(answer.contains("₹5,720,900"));
    }

    #[test]
    fn no_shortcut_without_a_cached_base() {
        let cache = NumericContextCache::new(Duration::from_secs(60));
        assert!(synthesize_calculation("and for 5 years?", &cache).is_none());
    }

    #[test]
    fn amount_grouping_matches_worked_example() {
        assert_eq!(format_amount(5_720_900.0, "₹"), "₹5,720,900");
        assert_eq!(format_amount(1_144_180.0, "₹"), "₹1,144,180");
        assert_eq!(format_amount(180.0, "$"), "$180");
    }

    #[test]
    fn extraction_is_not_tied_to_a_specific_currency() {
        let mut cache = NumericContextCache::new(Duration::from_secs(60));
        extract_and_cache("Your take-home salary is $1,144,180 per year.", &mut cache);
        assert_eq!(cache.get(TAKE_HOME_SALARY), Some(1_144_180.0));
        assert_eq!(cache.get_raw(TAKE_HOME_SALARY), Some("$1,144,180"));
    }
}
