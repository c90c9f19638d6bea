//! Interpolation Sentinels
//!
//! A call sitting directly in a template literal's `${ ... }` slot cannot be replaced by
//! plain template text through a structural edit. The splice instead emits a nested
//! template wrapped in sentinel comments:
//!
//! ```text
//! ${toggle(...)}  =>  ${/*TOGGLE_REMOVE*/tag`content`/*TOGGLE_REMOVE*/}
//! ```
//!
//! The intermediate text is valid source. After the last round, [`strip_sentinels`]
//! removes the `${`, sentinel, tag and backtick on the left and the backtick, sentinel and
//! `}` on the right, fusing `content` into the surrounding template. Whitespace next to a
//! sentinel is consumed only when it spans a line break.

use once_cell::sync::Lazy;
use regex::Regex;

pub const SENTINEL: &str = "/*TOGGLE_REMOVE*/";

static LEADING_SENTINEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:[ \t]*\r?\n\s*)?\$\{\s*/\*TOGGLE_REMOVE\*/\s*(?:[A-Za-z_$][\w$]*(?:\.[A-Za-z_$][\w$]*)*)?\s*`",
    )
    .unwrap()
});

static TRAILING_SENTINEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"`/\*TOGGLE_REMOVE\*/\s*\}(?:[ \t]*\r?\n[ \t]*)?").unwrap());

/// Wrap template `content` (already escaped) in sentinels, with an optional tag.
pub fn wrap_template(tag: Option<&str>, content: &str) -> String {
    format!("{SENTINEL}{}`{content}`{SENTINEL}", tag.unwrap_or(""))
}

/// Escape a string value for use as raw template text.
pub fn escape_template(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '`' => escaped.push_str("\\`"),
            '$' if chars.peek() == Some(&'{') => escaped.push_str("\\$"),
            _ => escaped.push(c),
        }
    }
    escaped
}

pub fn has_sentinels(source: &str) -> bool {
    source.contains(SENTINEL)
}

/// Remove sentinel-marked interpolation wrappers from serialized source.
pub fn strip_sentinels(source: &str) -> String {
    if !has_sentinels(source) {
        return source.to_string();
    }
    let without_leading = LEADING_SENTINEL.replace_all(source, "");
    TRAILING_SENTINEL
        .replace_all(&without_leading, "")
        .into_owned()
}
