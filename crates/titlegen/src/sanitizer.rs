//! Listing-title sanitization.
//!
//! Raw completion text is untrusted: it may carry commentary, numbered-list
//! noise, promotional vocabulary, and titles outside the marketplace
//! length window. The pipeline below is a pure, ordered transformation
//! from that raw text to the titles a seller is allowed to publish.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

/// Marketplace listing rules: titles must land inside this window,
/// measured in characters, bounds inclusive.
pub const TITLE_MIN_CHARS: usize = 90;
pub const TITLE_MAX_CHARS: usize = 120;

/// Promotional terms, condition words, and subjective adjectives that are
/// disallowed as standalone title tokens. Fixed configuration, compared
/// against the alphanumeric lower-cased form of each token.
const FORBIDDEN_WORDS: &[&str] = &[
    "new",
    "used",
    "refurbished",
    "preowned",
    "pre-owned",
    "buy",
    "offer",
    "deal",
    "discount",
    "sale",
    "shipping",
    "price",
    "limited",
    "stock",
    "best",
    "free",
    "quality",
    "premium",
    "stylish",
    "perfect",
    "beautiful",
];

const STRIPPED_SYMBOLS: &str = "!@#$%^&*(),.?\":{}|<>";

static FORBIDDEN_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| FORBIDDEN_WORDS.iter().copied().collect());

static BOILERPLATE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)here are.*?:",
        r"(?i)based on.*?:",
        r"(?i)for the .* market.*?:",
        r"\(\d+/\d+\)",
        r"(?i)titles?[:\-]?",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("boilerplate pattern compiles"))
    .collect()
});

static LIST_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+\.").expect("list marker pattern compiles"));

/// Run the full pipeline: boilerplate strip, numbered-list split,
/// per-candidate clean and length normalization, near-duplicate
/// suppression by first-five-word signature, length window filter, and
/// exact-duplicate collapse. Order of surviving candidates is preserved.
/// An empty result is a valid terminal state, not an error.
pub fn sanitize_titles(raw: &str) -> Vec<String> {
    let stripped = strip_boilerplate(raw);
    let candidates = split_candidates(&stripped);

    let mut seen_signatures = HashSet::new();
    let mut sanitized: Vec<String> = Vec::new();

    for candidate in candidates {
        let cleaned = pad_to_floor(&clean_candidate(&candidate));

        // A candidate claims its signature even when the length filter
        // later drops it, so a same-signature successor never resurrects
        // the slot.
        if !seen_signatures.insert(signature(&cleaned)) {
            continue;
        }

        let length = cleaned.chars().count();
        if !(TITLE_MIN_CHARS..=TITLE_MAX_CHARS).contains(&length) {
            continue;
        }

        if sanitized.contains(&cleaned) {
            continue;
        }
        sanitized.push(cleaned);
    }

    sanitized
}

/// Remove introductory commentary the model tends to prepend: phrases such
/// as "Here are ...:", "based on ...:", "for the ... market ...:",
/// parenthetical counters like "(1/3)", and the literal word "title(s)".
fn strip_boilerplate(raw: &str) -> String {
    let mut text = raw.to_string();
    for pattern in BOILERPLATE_PATTERNS.iter() {
        text = pattern.replace_all(&text, "").into_owned();
    }
    text.trim().to_string()
}

/// Split on numbered-list markers (`1.`, `2.`, ...), trim each segment,
/// and discard fragments too short to be a title candidate.
fn split_candidates(text: &str) -> Vec<String> {
    LIST_MARKER
        .split(text)
        .map(str::trim)
        .filter(|segment| segment.chars().count() > 3)
        .map(str::to_string)
        .collect()
}

/// Steps a-e of the per-candidate clean: tokenize, drop forbidden and
/// already-seen tokens (first occurrence wins, case- and
/// punctuation-insensitive), rejoin, strip symbols, collapse spaces, and
/// truncate to the ceiling at a word boundary. Idempotent: cleaning an
/// already-cleaned title changes nothing.
pub fn clean_candidate(candidate: &str) -> String {
    let mut seen = HashSet::new();
    let mut clean_words: Vec<&str> = Vec::new();

    for word in candidate.split_whitespace() {
        let normal = normalize_token(word);
        if FORBIDDEN_SET.contains(normal.as_str()) {
            continue;
        }
        if normal.is_empty() || seen.contains(&normal) {
            continue;
        }
        seen.insert(normal);
        clean_words.push(word);
    }

    let joined = clean_words.join(" ");
    let symbol_free: String =
        joined.chars().filter(|ch| !STRIPPED_SYMBOLS.contains(*ch)).collect();
    let collapsed = symbol_free.split_whitespace().collect::<Vec<_>>().join(" ");

    truncate_to_ceiling(&collapsed)
}

/// Step f: pad a too-short title by repeating its last (up to) 3 words
/// until the floor is reached. A zero-word title is returned unchanged;
/// a title already at or above the floor is never re-padded. Padding may
/// overshoot the ceiling, in which case the length filter drops the
/// candidate.
pub fn pad_to_floor(title: &str) -> String {
    if title.chars().count() >= TITLE_MIN_CHARS {
        return title.to_string();
    }

    let words: Vec<&str> = title.split_whitespace().collect();
    if words.is_empty() {
        return title.to_string();
    }
    let filler = words[words.len().saturating_sub(3)..].join(" ");

    let mut padded = title.to_string();
    while padded.chars().count() < TITLE_MIN_CHARS && padded.chars().count() < TITLE_MAX_CHARS {
        padded.push(' ');
        padded.push_str(&filler);
    }
    padded
}

/// Near-duplicate detection key: the lower-cased first five
/// space-separated tokens.
fn signature(title: &str) -> String {
    title.to_lowercase().split_whitespace().take(5).collect::<Vec<_>>().join(" ")
}

/// Lower-cased, alphanumeric-only form used for forbidden-word matching
/// and within-candidate de-duplication.
fn normalize_token(word: &str) -> String {
    word.to_lowercase()
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric() || *ch == '_')
        .collect()
}

fn truncate_to_ceiling(title: &str) -> String {
    if title.chars().count() <= TITLE_MAX_CHARS {
        return title.to_string();
    }

    let mut truncated = String::new();
    for word in title.split(' ') {
        let extended = if truncated.is_empty() {
            word.chars().count()
        } else {
            truncated.chars().count() + 1 + word.chars().count()
        };
        if extended > TITLE_MAX_CHARS {
            break;
        }
        if !truncated.is_empty() {
            truncated.push(' ');
        }
        truncated.push_str(word);
    }
    truncated
}
