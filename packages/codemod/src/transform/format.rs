//! Output Formatting
//!
//! The final pretty-printing step sits behind the [`Formatter`] trait so hosts can plug
//! in their own printer. The default prints through `dprint-plugin-typescript` in the
//! canonical style: no statement terminators, single-quoted strings.

use std::path::Path;

use dprint_plugin_typescript::configuration::{
    Configuration, ConfigurationBuilder, QuoteStyle, SemiColons,
};
use dprint_plugin_typescript::{format_text, FormatTextOptions};
use oxc_allocator::Allocator;
use oxc_parser::Parser;
use oxc_span::SourceType;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("formatter could not parse its input: {0}")]
    Parse(String),
    #[error("formatter failed: {0}")]
    Failed(String),
}

pub trait Formatter {
    fn format(&self, source: &str, source_type: SourceType) -> Result<String, FormatError>;
}

/// Prints with dprint's TypeScript plugin, relying on ASI instead of semicolons.
#[derive(Clone)]
pub struct DprintFormatter {
    config: Configuration,
}

impl DprintFormatter {
    pub fn new(single_quote: bool) -> Self {
        let quote_style = if single_quote {
            QuoteStyle::PreferSingle
        } else {
            QuoteStyle::PreferDouble
        };
        let config = ConfigurationBuilder::new()
            .line_width(80)
            .indent_width(2)
            .semi_colons(SemiColons::Asi)
            .quote_style(quote_style)
            .build();
        Self { config }
    }
}

impl Default for DprintFormatter {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Formatter for DprintFormatter {
    fn format(&self, source: &str, source_type: SourceType) -> Result<String, FormatError> {
        // Sentinel cleanup can leave broken text behind; report it with the parser the
        // rewrite itself uses.
        let allocator = Allocator::default();
        let ret = Parser::new(&allocator, source, source_type).parse();
        if ret.panicked || !ret.errors.is_empty() {
            let messages: Vec<String> = ret.errors.iter().map(|e| e.to_string()).collect();
            return Err(FormatError::Parse(messages.join("; ")));
        }

        let file_name = format!("file.{}", extension_for(source_type));
        let formatted = format_text(FormatTextOptions {
            path: Path::new(&file_name),
            extension: None,
            text: source.to_string(),
            config: &self.config,
            external_formatter: None,
        })
        .map_err(|e| FormatError::Failed(e.to_string()))?;

        // `None` means the text is already in canonical form.
        Ok(formatted.unwrap_or_else(|| source.to_string()))
    }
}

/// File extension that makes dprint parse the same dialect oxc did.
fn extension_for(source_type: SourceType) -> &'static str {
    match (source_type.is_typescript(), source_type.is_jsx()) {
        (true, true) => "tsx",
        (true, false) => "ts",
        (false, true) => "jsx",
        (false, false) => "js",
    }
}
