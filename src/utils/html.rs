//! HTML entity encoding for feed text.
//!
//! Settings values and episode titles are encoded once before they are
//! placed into the feed document. Besides the five markup characters, the
//! Latin-1 range U+00A0..=U+00FF is written as decimal references
//! (`é` → `&#233;`), matching the classic ASP.NET `HtmlEncode` output that
//! existing feeds were generated with.

use std::{borrow::Cow, fmt::Write};

/// Get the HTML entity for a special character.
#[inline]
fn escape_char(c: char) -> Option<&'static str> {
    match c {
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '&' => Some("&amp;"),
        '"' => Some("&quot;"),
        '\'' => Some("&#39;"),
        _ => None,
    }
}

#[inline]
const fn is_latin1_upper(c: char) -> bool {
    matches!(c, '\u{A0}'..='\u{FF}')
}

#[inline]
fn needs_escape(c: char) -> bool {
    escape_char(c).is_some() || is_latin1_upper(c)
}

/// Escape HTML special characters.
///
/// Uses `Cow` to avoid allocation when no escaping is needed.
///
/// # Example
/// ```ignore
/// assert_eq!(escape("Q&A"), "Q&amp;A");
/// assert_eq!(escape("Café"), "Caf&#233;");
/// assert_eq!(escape("hello"), "hello"); // No allocation
/// ```
#[inline]
pub fn escape(s: &str) -> Cow<'_, str> {
    if !s.chars().any(needs_escape) {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match escape_char(c) {
            Some(entity) => result.push_str(entity),
            None if is_latin1_upper(c) => {
                let _ = write!(result, "&#{};", u32::from(c));
            }
            None => result.push(c),
        }
    }
    Cow::Owned(result)
}
