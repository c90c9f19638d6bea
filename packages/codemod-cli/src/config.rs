//! Option Loading
//!
//! Options come from an optional JSON file using the same camelCase keys as the Node.js
//! binding, then command-line flags override individual fields.

use std::fs;
use std::path::Path;

use anyhow::Context;
use opticks_codemod::{LivenessStrategy, ToggleOptions};

/// Values given explicitly on the command line.
#[derive(Debug, Clone, Default)]
pub struct OptionOverrides {
    pub toggle: Option<String>,
    pub winner: Option<String>,
    pub package_name: Option<String>,
    pub function_name: Option<String>,
    pub liveness: Option<LivenessStrategy>,
    pub no_format: bool,
    pub double_quote: bool,
}

impl OptionOverrides {
    pub fn apply(self, mut options: ToggleOptions) -> ToggleOptions {
        if self.toggle.is_some() {
            options.toggle = self.toggle;
        }
        if self.winner.is_some() {
            options.winner = self.winner;
        }
        if self.package_name.is_some() {
            options.package_name = self.package_name;
        }
        if self.function_name.is_some() {
            options.function_name = self.function_name;
        }
        if let Some(liveness) = self.liveness {
            options.liveness = liveness;
        }
        if self.no_format {
            options.format.enabled = false;
        }
        if self.double_quote {
            options.format.single_quote = false;
        }
        options
    }
}

pub fn load_options_file(path: &Path) -> anyhow::Result<ToggleOptions> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read options file {}", path.display()))?;
    let options: ToggleOptions = serde_json::from_str(&content)
        .with_context(|| format!("invalid options file {}", path.display()))?;
    Ok(options)
}

/// Options from `config` (if any) with `overrides` applied on top.
pub fn load_options(
    config: Option<&Path>,
    overrides: OptionOverrides,
) -> anyhow::Result<ToggleOptions> {
    let options = match config {
        Some(path) => load_options_file(path)?,
        None => ToggleOptions::default(),
    };
    Ok(overrides.apply(options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn should_override_file_values_with_flags() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"toggle":"from-file","winner":"a","packageName":"@acme/flags"}}"#
        )
        .unwrap();

        let overrides = OptionOverrides {
            winner: Some("b".to_string()),
            no_format: true,
            ..OptionOverrides::default()
        };
        let options = load_options(Some(file.path()), overrides).unwrap();

        assert_eq!(options.toggle.as_deref(), Some("from-file"));
        assert_eq!(options.winner.as_deref(), Some("b"));
        assert_eq!(options.package_name(), "@acme/flags");
        assert!(!options.format.enabled);
        assert!(options.format.single_quote);
    }

    #[test]
    fn should_use_defaults_without_file() {
        let overrides = OptionOverrides {
            toggle: Some("flag".to_string()),
            liveness: Some(LivenessStrategy::LexicalScope),
            double_quote: true,
            ..OptionOverrides::default()
        };
        let options = load_options(None, overrides).unwrap();
        assert_eq!(options.toggle.as_deref(), Some("flag"));
        assert_eq!(options.winner, None);
        assert_eq!(options.liveness, LivenessStrategy::LexicalScope);
        assert!(!options.format.single_quote);
    }

    #[test]
    fn should_report_invalid_files() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let error = load_options(Some(file.path()), OptionOverrides::default()).unwrap_err();
        assert!(error.to_string().contains("invalid options file"));
    }
}
