//! Whitespace minification for the generated feed.
//!
//! A textual heuristic, not an XML canonicalizer:
//!
//! 1. drop a whitespace run right after `>` unless it starts with a space
//! 2. drop a whitespace run right before `<` when it ends in two spaces
//! 3. trim the result
//!
//! Text content with a leading single space and attribute values containing
//! `>` are affected exactly as these rules say.

use regex::Regex;
use std::sync::LazyLock;

/// `>` followed by whitespace whose first character is not a space.
static RE_AFTER_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r">[^\S ]\s*").unwrap());

/// Whitespace run ending in two spaces, directly before `<`.
static RE_BEFORE_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s* {2}<").unwrap());

/// Collapse inter-tag whitespace. Idempotent.
pub fn minify_xml(input: &str) -> String {
    let pass = RE_AFTER_TAG.replace_all(input, ">");
    let pass = RE_BEFORE_TAG.replace_all(&pass, "<");
    pass.trim().to_string()
}
