//! Codemod Options
//!
//! Options supplied by the host driver. Field names follow the camelCase keys a
//! jscodeshift-style host passes (`toggle`, `winner`, `packageName`, `functionName`).

use serde::{Deserialize, Serialize};

use crate::error::{CodemodError, Result};
use crate::transform::dead_code::LivenessStrategy;

/// Module specifier the toggle function is imported from.
pub const DEFAULT_PACKAGE_NAME: &str = "opticks";

/// Exported name of the toggle function.
pub const DEFAULT_FUNCTION_NAME: &str = "toggle";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ToggleOptions {
    /// Toggle to resolve, compared case-insensitively with each call's first argument.
    pub toggle: Option<String>,
    /// Winning variant as a single letter (`a` is the first variant).
    pub winner: Option<String>,
    pub package_name: Option<String>,
    pub function_name: Option<String>,
    pub liveness: LivenessStrategy,
    pub format: FormatOptions,
}

impl ToggleOptions {
    pub fn new(toggle: impl Into<String>, winner: impl Into<String>) -> Self {
        Self {
            toggle: Some(toggle.into()),
            winner: Some(winner.into()),
            ..Self::default()
        }
    }

    pub fn with_package_name(mut self, package_name: impl Into<String>) -> Self {
        self.package_name = Some(package_name.into());
        self
    }

    pub fn with_function_name(mut self, function_name: impl Into<String>) -> Self {
        self.function_name = Some(function_name.into());
        self
    }

    pub fn with_liveness(mut self, liveness: LivenessStrategy) -> Self {
        self.liveness = liveness;
        self
    }

    pub fn with_format(mut self, format: FormatOptions) -> Self {
        self.format = format;
        self
    }

    /// Disable the pretty-printing step; output keeps the input's layout.
    pub fn unformatted(self) -> Self {
        let format = FormatOptions {
            enabled: false,
            ..self.format.clone()
        };
        self.with_format(format)
    }

    pub fn package_name(&self) -> &str {
        non_empty(&self.package_name).unwrap_or(DEFAULT_PACKAGE_NAME)
    }

    pub fn function_name(&self) -> &str {
        non_empty(&self.function_name).unwrap_or(DEFAULT_FUNCTION_NAME)
    }

    /// The winner selection, or `None` when `toggle` or `winner` is missing.
    pub fn selection(&self) -> Result<Option<WinnerSelection>> {
        match (non_empty(&self.toggle), non_empty(&self.winner)) {
            (Some(toggle), Some(winner)) => WinnerSelection::new(toggle, winner).map(Some),
            _ => Ok(None),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormatOptions {
    /// Pretty-print the rewritten source.
    pub enabled: bool,
    /// Prefer single-quoted strings.
    pub single_quote: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            single_quote: true,
        }
    }
}

/// The toggle being resolved and the variant that wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WinnerSelection {
    toggle_name: String,
    winner: char,
}

impl WinnerSelection {
    pub fn new(toggle: &str, winner: &str) -> Result<Self> {
        let mut chars = winner.chars();
        match (chars.next(), chars.next()) {
            (Some(code @ 'a'..='z'), None) => Ok(Self {
                toggle_name: toggle.to_lowercase(),
                winner: code,
            }),
            _ => Err(CodemodError::InvalidWinner(winner.to_string())),
        }
    }

    /// Lower-cased toggle name.
    pub fn toggle_name(&self) -> &str {
        &self.toggle_name
    }

    pub fn winner(&self) -> char {
        self.winner
    }

    /// 0-based variant index: `a` is 0, `b` is 1, ...
    pub fn variant_index(&self) -> usize {
        (self.winner as u8 - b'a') as usize
    }

    /// Index of the winning argument in the call, skipping the toggle name.
    pub fn argument_index(&self) -> usize {
        self.variant_index() + 1
    }

    pub fn matches(&self, toggle_name: &str) -> bool {
        toggle_name.to_lowercase() == self.toggle_name
    }
}
