// src/matching/tokenizer.rs
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

static WORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-z]{3,}").expect("invalid WORD_RE"));

/// Lowercase words of three or more ASCII letters. Digits, punctuation and
/// non-ASCII letters act as separators, so "C++" and "Go" yield nothing.
pub fn tokenize(text: &str) -> BTreeSet<String> {
    WORD_RE
        .find_iter(&text.to_ascii_lowercase())
        .map(|m| m.as_str().to_string())
        .collect()
}
