//! Spoken/typed query cleanup.
//!
//! Turns a raw phrase such as "search for iphone 15 pro please" into a
//! product query ("iPhone 15 Pro"). Voice capture happens elsewhere; this
//! module only sees transcript strings.

use regex::Regex;
use std::sync::LazyLock;

/// Brand and model canonicalization, matched case-insensitively as whole words.
const DICTIONARY: &[(&str, &str)] = &[
    ("iphone 15 pro", "iPhone 15 Pro"),
    ("iphone 15", "iPhone 15"),
    ("iphone", "iPhone"),
    ("macbook air", "MacBook Air"),
    ("macbook", "MacBook"),
    ("nike air", "Nike Air"),
    ("nike", "Nike"),
    ("samsung galaxy", "Samsung Galaxy"),
    ("samsung", "Samsung"),
    ("airpods", "AirPods"),
    ("apple watch", "Apple Watch"),
    ("sony", "Sony"),
    ("headphones", "Headphones"),
];

/// Filler phrases removed as whole words.
const FILLERS: &[&str] = &["search for", "find", "look for", "show me", "please"];

static RE_DICTIONARY: LazyLock<Regex> =
    LazyLock::new(|| whole_word_alternation(DICTIONARY.iter().map(|(k, _)| *k)));

static RE_FILLER: LazyLock<Regex> =
    LazyLock::new(|| whole_word_alternation(FILLERS.iter().copied()));

/// Case-insensitive `\b(a|b|...)\b`, longest phrase first so that
/// "iphone 15 pro" wins over "iphone" at the same position.
fn whole_word_alternation<'a>(phrases: impl Iterator<Item = &'a str>) -> Regex {
    let mut phrases: Vec<&str> = phrases.collect();
    phrases.sort_by(|a, b| b.len().cmp(&a.len()));
    let alternation = phrases
        .iter()
        .map(|p| regex::escape(p))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{alternation})\b")).unwrap()
}

/// Normalize a raw spoken or typed phrase into a product query.
///
/// 1. Canonicalize brand/model names in one left-to-right pass.
/// 2. Strip filler phrases.
/// 3. Collapse whitespace and trim.
/// 4. Upper-case the first character, unless the query starts with a
///    canonical dictionary term (so "iPhone" keeps its casing).
///
/// Steps 1-3 repeat until the text is stable, since stripping a filler can
/// bring two words together that form another filler or dictionary phrase.
/// This makes the function idempotent.
pub fn normalize(raw: &str) -> String {
    let mut text = collapse_whitespace(raw);
    loop {
        let next = collapse_whitespace(&strip_fillers(&canonicalize(&text)));
        if next == text {
            break;
        }
        text = next;
    }
    capitalize_first(text)
}

fn canonicalize(text: &str) -> String {
    RE_DICTIONARY
        .replace_all(text, |caps: &regex::Captures<'_>| {
            let matched = caps[0].to_lowercase();
            DICTIONARY
                .iter()
                .find(|(key, _)| *key == matched)
                .map(|(_, canonical)| canonical.to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

fn strip_fillers(text: &str) -> String {
    RE_FILLER.replace_all(text, "").into_owned()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn starts_with_canonical(text: &str) -> bool {
    DICTIONARY.iter().any(|(_, canonical)| {
        text.strip_prefix(canonical)
            .is_some_and(|rest| !rest.starts_with(|c: char| c.is_alphanumeric()))
    })
}

fn capitalize_first(text: String) -> String {
    if starts_with_canonical(&text) {
        return text;
    }
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if first.is_lowercase() => first.to_uppercase().chain(chars).collect(),
        _ => text,
    }
}
