//! File Driver
//!
//! Expands the command-line inputs into source files and runs the codemod over them in
//! parallel. Each file is rewritten independently; a failure is recorded against its file
//! and never stops the others.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use indexmap::IndexSet;
use opticks_codemod::{source_type_for_path, Codemod};
use rayon::prelude::*;
use tracing::{info, warn};

/// Extensions picked up when walking a directory.
pub const SOURCE_EXTENSIONS: &[&str] = &["js", "jsx", "mjs", "cjs", "ts", "tsx"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Rewrite changed files in place.
    #[default]
    Write,
    /// Only report which files would change.
    Check,
    /// Print every result instead of writing.
    Stdout,
}

/// Expand files, directories and glob patterns into a de-duplicated list of files.
pub fn collect_files(inputs: &[String]) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = IndexSet::new();

    for input in inputs {
        let path = Path::new(input);
        if path.is_file() {
            files.insert(path.to_path_buf());
        } else if path.is_dir() {
            let pattern = path.join("**").join("*");
            let pattern_str = pattern.to_string_lossy();
            for entry in glob::glob(&pattern_str)
                .with_context(|| format!("failed to walk directory {}", path.display()))?
            {
                let entry = entry?;
                if entry.is_file() && is_source_file(&entry) && !in_node_modules(&entry) {
                    files.insert(entry);
                }
            }
        } else {
            let mut matched = false;
            for entry in glob::glob(input)
                .with_context(|| format!("invalid glob pattern '{}'", input))?
            {
                let entry = entry?;
                if entry.is_file() && !in_node_modules(&entry) {
                    matched = true;
                    files.insert(entry);
                }
            }
            if !matched {
                warn!(pattern = %input, "no files matched");
            }
        }
    }

    Ok(files.into_iter().collect())
}

pub fn is_source_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
}

fn in_node_modules(path: &Path) -> bool {
    path.components()
        .any(|component| component.as_os_str() == "node_modules")
}

/// Result of processing one file.
#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    pub outcome: anyhow::Result<FileOutcome>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    pub changed: bool,
    /// Transformed text, kept only in [`OutputMode::Stdout`].
    pub output: Option<String>,
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub reports: Vec<FileReport>,
}

impl RunSummary {
    pub fn changed(&self) -> impl Iterator<Item = &FileReport> {
        self.reports
            .iter()
            .filter(|r| matches!(&r.outcome, Ok(outcome) if outcome.changed))
    }

    pub fn failed(&self) -> impl Iterator<Item = &FileReport> {
        self.reports.iter().filter(|r| r.outcome.is_err())
    }

    pub fn has_failures(&self) -> bool {
        self.failed().next().is_some()
    }

    /// Process exit code: 1 when a file failed, or when a check found files to change.
    pub fn exit_code(&self, mode: OutputMode) -> i32 {
        if self.has_failures() || (mode == OutputMode::Check && self.changed().next().is_some()) {
            1
        } else {
            0
        }
    }
}

/// Run the codemod over `files`.
pub fn run(codemod: &Codemod, files: &[PathBuf], mode: OutputMode) -> RunSummary {
    let reports = files
        .par_iter()
        .map(|path| FileReport {
            path: path.clone(),
            outcome: process_file(codemod, path, mode),
        })
        .collect();
    RunSummary { reports }
}

pub fn process_file(codemod: &Codemod, path: &Path, mode: OutputMode) -> anyhow::Result<FileOutcome> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let output = codemod
        .transform(&source, source_type_for_path(path))
        .with_context(|| format!("failed to transform {}", path.display()))?;
    let changed = output != source;

    match mode {
        OutputMode::Write => {
            if changed {
                fs::write(path, &output)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                info!(path = %path.display(), "rewrote file");
            }
            Ok(FileOutcome {
                changed,
                output: None,
            })
        }
        OutputMode::Check => {
            if changed {
                info!(path = %path.display(), "file would change");
            }
            Ok(FileOutcome {
                changed,
                output: None,
            })
        }
        OutputMode::Stdout => Ok(FileOutcome {
            changed,
            output: Some(output),
        }),
    }
}
