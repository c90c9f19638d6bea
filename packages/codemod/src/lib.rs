#![deny(clippy::all)]

/**
 * Opticks Codemod - Rust Implementation
 *
 * Resolves `toggle(...)` feature-toggle calls from the `opticks` package into their
 * winning variant and removes the toggle machinery left behind.
 */
pub mod error;
pub mod options;
pub mod transform;
pub mod version;

#[cfg(feature = "napi-bindings")]
pub mod napi;

pub use error::{CodemodError, Result, SourceLocation};
pub use options::{
    FormatOptions, ToggleOptions, WinnerSelection, DEFAULT_FUNCTION_NAME, DEFAULT_PACKAGE_NAME,
};
pub use oxc_span::SourceType;
pub use transform::dead_code::LivenessStrategy;
pub use transform::format::{DprintFormatter, FormatError, Formatter};
pub use transform::{
    default_source_type, source_type_for_path, transform, transform_with_source_type, Codemod,
};
