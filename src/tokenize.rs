//! Word tokenization for the classifier.
//!
//! Text is lowercased and split into maximal runs of `[a-z0-9']`. The result is
//! a set: a token occurring several times in one text is reported once, which is
//! what the presence-count model in [`crate::classifier`] expects.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

static RE_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[a-z0-9']+").unwrap());

/// Lowercase `text` and return the distinct word tokens it contains.
///
/// Apostrophes stay inside tokens (`"it's"` is one token) and digit runs are
/// tokens of their own. Any other character, including non-ASCII letters,
/// separates tokens. Never fails; `""` yields an empty set.
pub fn tokenize(text: &str) -> HashSet<String> {
    let lowered = text.to_lowercase();
    RE_WORD
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}
