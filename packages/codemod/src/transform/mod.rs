//! Toggle Resolution Engine
//!
//! A file is rewritten in rounds. Each round parses the current text, indexes it, and
//! records one batch of span edits:
//!
//! 1. every outermost matching toggle call is resolved, together with the declarations
//!    only their losing variants used, or
//! 2. when no matching call is left, one toggle import the locator no longer finds calls
//!    for is pruned.
//!
//! Calls nested in a resolved call are picked up by the next round.
//!
//! The run settles when a round has nothing left to do. Sentinel cleanup and formatting
//! happen once, on the settled text.

pub mod calls;
pub mod dead_code;
pub mod edit;
pub mod format;
pub mod imports;
pub mod index;
pub mod interpolation;
pub mod source;
pub mod splice;

use oxc_span::SourceType;
use tracing::{debug, warn};

use crate::error::{CodemodError, Result, SourceLocation};
use crate::options::{ToggleOptions, WinnerSelection};

use self::dead_code::{
    dangling_declarations, remove_declarations, DiscardedRegion, LivenessStrategy,
};
use self::edit::EditSet;
use self::format::{DprintFormatter, Formatter};
use self::imports::ImportBinding;
use self::index::{span_contains, CallInfo, ProgramIndex};
pub use self::source::{default_source_type, source_type_for_path};

/// Upper bound on rewrite rounds for one file. A round resolves every outermost call, so
/// this bounds toggle nesting depth, not the number of calls.
pub const MAX_ROUNDS: usize = 4096;

pub struct Codemod {
    options: ToggleOptions,
    formatter: Box<dyn Formatter + Send + Sync>,
}

impl Codemod {
    pub fn new(options: ToggleOptions) -> Self {
        let formatter = DprintFormatter::new(options.format.single_quote);
        Self {
            options,
            formatter: Box::new(formatter),
        }
    }

    /// Replace the pretty-printer used for the final output.
    pub fn with_formatter(mut self, formatter: impl Formatter + Send + Sync + 'static) -> Self {
        self.formatter = Box::new(formatter);
        self
    }

    pub fn options(&self) -> &ToggleOptions {
        &self.options
    }

    /// Resolve the configured toggle in `source`.
    ///
    /// Without both a toggle and a winner the source is returned unchanged.
    pub fn transform(&self, source: &str, source_type: SourceType) -> Result<String> {
        let Some(selection) = self.options.selection()? else {
            debug!("toggle or winner not configured, leaving source untouched");
            return Ok(source.to_string());
        };

        let rewritten = self.rewrite(source, source_type, &selection)?;
        let cleaned = interpolation::strip_sentinels(&rewritten);
        if !self.options.format.enabled {
            return Ok(cleaned);
        }

        match self.formatter.format(&cleaned, source_type) {
            Ok(formatted) => Ok(formatted),
            Err(error) => {
                warn!(%error, "formatting failed, returning unformatted source");
                Ok(cleaned)
            }
        }
    }

    fn rewrite(
        &self,
        source: &str,
        source_type: SourceType,
        selection: &WinnerSelection,
    ) -> Result<String> {
        let mut text = source.to_string();
        for round in 0..MAX_ROUNDS {
            let index = match source::analyze(&text, source_type) {
                Ok(index) => index,
                Err(messages) if round == 0 => return Err(CodemodError::Parse { messages }),
                Err(messages) => return Err(CodemodError::InvalidRewrite { messages }),
            };
            match self.step(&text, &index, selection)? {
                Some(next) => text = next,
                None => {
                    debug!(rounds = round, "rewrite settled");
                    return Ok(text);
                }
            }
        }
        Err(CodemodError::Unsettled(MAX_ROUNDS))
    }

    /// One round of edits, or `None` when nothing is left to rewrite.
    fn step(
        &self,
        text: &str,
        index: &ProgramIndex,
        selection: &WinnerSelection,
    ) -> Result<Option<String>> {
        let liveness = self.options.liveness;
        let bindings = imports::resolve_bindings(
            index,
            self.options.package_name(),
            self.options.function_name(),
        );
        if bindings.is_empty() {
            return Ok(None);
        }

        let matching = matching_calls(index, &bindings, liveness, text, selection)?;
        if !matching.is_empty() {
            return match self.resolve(text, index, selection, &matching) {
                Err(CodemodError::EditConflict { first, second }) if matching.len() > 1 => {
                    debug!(?first, ?second, "edits of one round collide, resolving a single call");
                    self.resolve(text, index, selection, &matching[..1]).map(Some)
                }
                result => result.map(Some),
            };
        }

        for binding in &bindings {
            if imports::is_in_use(index, binding, liveness) {
                continue;
            }
            let mut edits = EditSet::new(text);
            imports::prune(index, binding, text, &mut edits);
            if edits.is_empty() {
                continue;
            }
            debug!(local = %binding.local, "pruned toggle import");
            return edits.apply().map(Some);
        }

        Ok(None)
    }

    /// Splice every call in `calls` and drop the declarations only their losing variants
    /// used.
    fn resolve(
        &self,
        text: &str,
        index: &ProgramIndex,
        selection: &WinnerSelection,
        calls: &[&CallInfo],
    ) -> Result<String> {
        let mut edits = EditSet::new(text);
        let mut losing = Vec::new();
        for call in calls {
            losing.extend(splice::resolve_call(call, selection, index, text, &mut edits)?);
            debug!(
                toggle = %selection.toggle_name(),
                winner = %selection.winner(),
                location = %SourceLocation::from_offset(text, call.span.start),
                "resolved toggle call"
            );
        }

        let region = DiscardedRegion::new(losing);
        let dead = dangling_declarations(index, &region, self.options.liveness);
        for declaration in &dead {
            debug!(name = %declaration.name, "removing declaration only used by losing variants");
        }
        remove_declarations(&dead, &mut edits);
        edits.apply()
    }
}

/// Calls of the selected toggle that can be resolved in the same round: the outermost
/// ones, in pre-order. Calls inside another selected call wait for a later round.
fn matching_calls<'i>(
    index: &'i ProgramIndex,
    bindings: &'i [ImportBinding],
    liveness: LivenessStrategy,
    text: &str,
    selection: &WinnerSelection,
) -> Result<Vec<&'i CallInfo>> {
    let mut matching: Vec<&CallInfo> = Vec::new();
    for call in calls::locate(index, bindings, liveness) {
        // Selected calls are disjoint and come in pre-order, so only the last one can
        // contain this call.
        if matching
            .last()
            .is_some_and(|outer| span_contains(outer.span, call.span))
        {
            continue;
        }
        if selection.matches(calls::toggle_name(call, text)?) {
            matching.push(call);
        }
    }
    Ok(matching)
}

/// Resolve a toggle in module JavaScript (with JSX) source.
pub fn transform(source: &str, options: &ToggleOptions) -> Result<String> {
    transform_with_source_type(source, default_source_type(), options)
}

pub fn transform_with_source_type(
    source: &str,
    source_type: SourceType,
    options: &ToggleOptions,
) -> Result<String> {
    Codemod::new(options.clone()).transform(source, source_type)
}
