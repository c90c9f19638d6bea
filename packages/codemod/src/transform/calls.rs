//! Call-Site Locator

use super::dead_code::LivenessStrategy;
use super::imports::ImportBinding;
use super::index::{ArgumentInfo, CallInfo, ExprShape, ProgramIndex};
use crate::error::{CodemodError, Result, SourceLocation};

/// Calls of any of `bindings`, in source pre-order.
pub fn locate<'i>(
    index: &'i ProgramIndex,
    bindings: &'i [ImportBinding],
    strategy: LivenessStrategy,
) -> impl Iterator<Item = &'i CallInfo> + 'i {
    index.calls.iter().filter(move |call| {
        bindings.iter().any(|binding| match strategy {
            LivenessStrategy::GlobalName => call.callee == binding.local,
            LivenessStrategy::LexicalScope => {
                binding.symbol.is_some() && call.callee_symbol == binding.symbol
            }
        })
    })
}

/// The toggle name a call passes as its first argument.
pub fn toggle_name<'i>(call: &'i CallInfo, source: &str) -> Result<&'i str> {
    match call.arguments.first() {
        Some(ArgumentInfo::Expression(expr)) => match &expr.shape {
            ExprShape::String(name) => Ok(name),
            _ => Err(malformed(
                call,
                source,
                "the first argument must be a string literal naming the toggle",
            )),
        },
        Some(ArgumentInfo::Spread(_)) => Err(malformed(
            call,
            source,
            "the toggle name cannot be a spread argument",
        )),
        None => Err(malformed(call, source, "missing toggle name")),
    }
}

pub(crate) fn malformed(call: &CallInfo, source: &str, reason: &str) -> CodemodError {
    CodemodError::MalformedCall {
        location: SourceLocation::from_offset(source, call.span.start),
        reason: reason.to_string(),
    }
}
