#![deny(clippy::all)]

/**
 * Opticks Codemod CLI
 *
 * Option loading and the file driver behind the `opticks-codemod` binary.
 */
pub use opticks_codemod as codemod;

pub mod config;
pub mod driver;

/// CLI version
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
