#![cfg(feature = "napi-bindings")]
//! Node.js Binding
//!
//! Exposes the codemod to a jscodeshift-style host: source text and options in,
//! rewritten source out.

use napi::{Error, Result, Status};
use napi_derive::napi;

use crate::options::ToggleOptions;
use crate::transform::{default_source_type, source_type_for_path, Codemod};

/// Resolve a toggle in `source`. `options_json` uses the camelCase option keys; the
/// dialect follows `filename` when given.
#[napi(js_name = "transform")]
pub fn transform_source(
    source: String,
    options_json: String,
    filename: Option<String>,
) -> Result<String> {
    let options: ToggleOptions = serde_json::from_str(&options_json).map_err(|e| {
        Error::new(
            Status::InvalidArg,
            format!("Invalid codemod options: {}", e),
        )
    })?;
    let source_type = filename
        .as_deref()
        .map(source_type_for_path)
        .unwrap_or_else(default_source_type);

    Codemod::new(options)
        .transform(&source, source_type)
        .map_err(|e| Error::new(Status::GenericFailure, e.to_string()))
}

/// Version of the native module.
#[napi]
pub fn version() -> String {
    crate::version::version_string()
}
