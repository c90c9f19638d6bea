//! Source Analysis
//!
//! Parse, run semantic analysis and index one version of the source text.

use std::path::Path;

use oxc_allocator::Allocator;
use oxc_parser::Parser;
use oxc_semantic::SemanticBuilder;
use oxc_span::SourceType;

use super::index::{index_program, ProgramIndex};

/// Dialect used for in-memory sources: module JavaScript with JSX.
pub fn default_source_type() -> SourceType {
    SourceType::mjs().with_jsx(true)
}

/// Dialect for a file, chosen by extension.
pub fn source_type_for_path(path: impl AsRef<Path>) -> SourceType {
    SourceType::from_path(path).unwrap_or_else(|_| default_source_type())
}

/// Parse `text` and build its index. Returns the parser's messages when the text is not
/// valid for `source_type`.
pub fn analyze(text: &str, source_type: SourceType) -> Result<ProgramIndex, Vec<String>> {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, text, source_type).parse();

    if ret.panicked || !ret.errors.is_empty() {
        let mut messages: Vec<String> = ret.errors.iter().map(|e| e.to_string()).collect();
        if messages.is_empty() {
            messages.push("parser aborted".to_string());
        }
        return Err(messages);
    }

    let program = ret.program;
    let semantic = SemanticBuilder::new().build(&program);
    let scoping = semantic.semantic.into_scoping();

    Ok(index_program(&program, &scoping))
}
