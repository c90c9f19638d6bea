//! Codemod Errors
//!
//! Only structurally invalid input surfaces as an error. Incomplete configuration, files
//! without a toggle import and formatter failures are absorbed by the engine.

use std::fmt;

use thiserror::Error;

/// 1-based position of a node in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    /// Compute the location of a byte offset in `source`.
    pub fn from_offset(source: &str, offset: u32) -> Self {
        let offset = (offset as usize).min(source.len());
        let before = &source[..offset];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let column = before[line_start..].chars().count() + 1;
        Self { line, column }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, Error)]
pub enum CodemodError {
    /// The input could not be parsed.
    #[error("failed to parse source: {}", .messages.join("; "))]
    Parse { messages: Vec<String> },

    #[error("invalid winner `{0}`: expected a single letter between `a` and `z`")]
    InvalidWinner(String),

    #[error("malformed toggle call at {location}: {reason}")]
    MalformedCall {
        location: SourceLocation,
        reason: String,
    },

    #[error(
        "toggle call at {location} has {variants} variant(s) but winner `{winner}` selects variant {index}"
    )]
    WinnerOutOfRange {
        location: SourceLocation,
        variants: usize,
        winner: char,
        index: usize,
    },

    /// An applied rewrite left the source unparseable.
    #[error("rewrite produced invalid source: {}", .messages.join("; "))]
    InvalidRewrite { messages: Vec<String> },

    #[error("conflicting edits at {first:?} and {second:?}")]
    EditConflict { first: (u32, u32), second: (u32, u32) },

    #[error("rewrite did not settle after {0} rounds")]
    Unsettled(usize),
}

pub type Result<T> = std::result::Result<T, CodemodError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_compute_one_based_locations() {
        let source = "const a = 1\nconst b = toggle()\n";
        let offset = source.find("toggle").unwrap() as u32;
        assert_eq!(
            SourceLocation::from_offset(source, offset),
            SourceLocation { line: 2, column: 11 }
        );
        assert_eq!(
            SourceLocation::from_offset(source, 0),
            SourceLocation { line: 1, column: 1 }
        );
    }

    #[test]
    fn should_describe_out_of_range_winner() {
        let error = CodemodError::WinnerOutOfRange {
            location: SourceLocation { line: 3, column: 5 },
            variants: 2,
            winner: 'c',
            index: 2,
        };
        assert_eq!(
            error.to_string(),
            "toggle call at 3:5 has 2 variant(s) but winner `c` selects variant 2"
        );
    }
}
