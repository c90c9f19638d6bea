//! Version
//!
//! Version information for the codemod.

/// Codemod version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Codemod version string.
pub fn version_string() -> String {
    format!("opticks-codemod v{}", VERSION)
}
