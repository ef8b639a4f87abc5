//! Keyword tables and matching helpers

use lazy_static::lazy_static;
use regex::Regex;

/// Terms that mark a violation description as critical-severity language.
/// Heuristic only; used when the recheck payload carries no compliance
/// verdict of its own.
pub const CRITICAL_LANGUAGE_KEYWORDS: &[&str] = &[
    "hazard",
    "hazardous",
    "danger",
    "dangerous",
    "fire",
    "shock",
    "electrocution",
    "exposed live",
    "life safety",
    "unsafe",
    "immediate",
    "carbon monoxide",
    "gas leak",
    "structural failure",
];

lazy_static! {
    static ref CRITICAL_LANGUAGE: Regex = Regex::new(&format!(
        r"(?i)\b(?:{})\b",
        CRITICAL_LANGUAGE_KEYWORDS
            .iter()
            .map(|k| regex::escape(k))
            .collect::<Vec<_>>()
            .join("|")
    ))
    .expect("critical language pattern is valid");
}

/// Check whether free text reads like a critical-severity finding
pub fn contains_critical_language(text: &str) -> bool {
    CRITICAL_LANGUAGE.is_match(text)
}
