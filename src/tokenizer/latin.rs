use once_cell::sync::Lazy;
use regex::Regex;

// Alternatives are tried left to right at each position; the first that matches wins.
const LATIN_PATTERN: &str = concat!(
    r"\d+",
    r"|\p{Alphabetic}+(?:'s|'t|'d|'re|'ll|'ve|'mon|'m)?",
    r"|[\p{P}\p{S}]",
    r"|\s+",
    r"|\S{1,4}",
);

static LATIN_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(LATIN_PATTERN).expect("latin token pattern is valid"));

static FILLER_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\p{P}\p{S}\s]+$").expect("filler pattern is valid"));

/// Split whitespace-delimited text into digit runs, words (with English contraction
/// suffixes), single punctuation/symbol chars and short leftover runs.
///
/// Every returned slice borrows from `text`; whitespace runs are consumed but never returned.
pub fn tokenize_latin(text: &str) -> Vec<&str> {
    LATIN_TOKEN
        .find_iter(text)
        .map(|m| m.as_str())
        .filter(|token| !token.chars().all(char::is_whitespace))
        .collect()
}

/// True when every char is punctuation, a symbol or whitespace. Marks, format chars and
/// anything else with content keep the token.
pub fn is_filler(token: &str) -> bool {
    FILLER_TOKEN.is_match(token)
}
