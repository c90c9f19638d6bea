//! Winner Splicer
//!
//! Rewrites one matching toggle call into its winning variant. The edit depends on the
//! winning argument's kind and on the call's syntactic slot:
//!
//! | winner                          | edit                                              |
//! |---------------------------------|---------------------------------------------------|
//! | `() => expr`, `() => { return expr }` | the call becomes `expr`                     |
//! | `() => { ... }` as a statement  | the statement becomes the block's statements      |
//! | `function` expressions, arrows with parameters | the call becomes `(literal)()`     |
//! | `null`                          | the call is deleted                               |
//! | anything else                   | the call becomes the argument's text              |
//!
//! A deleted call takes its statement, JSX container or list item (with the separating
//! comma) along. Where nothing can be deleted it becomes `undefined`.
//!
//! Calls in a template interpolation go through the sentinel protocol in
//! [`super::interpolation`].

use oxc_span::Span;

use super::calls::malformed;
use super::edit::EditSet;
use super::index::{
    ArgumentInfo, BodyShape, CallInfo, ExprInfo, ExprShape, FunctionShape, ProgramIndex, Slot,
};
use super::interpolation::{escape_template, wrap_template};
use crate::error::{CodemodError, Result, SourceLocation};
use crate::options::WinnerSelection;

/// The winning argument, by syntactic kind.
#[derive(Debug, Clone, Copy)]
pub enum VariantArgument<'i> {
    FunctionLiteral(&'i FunctionShape),
    NullLiteral,
    RawValue(&'i ExprInfo),
}

impl<'i> VariantArgument<'i> {
    pub fn from_argument(call: &CallInfo, argument: &'i ArgumentInfo, source: &str) -> Result<Self> {
        match argument {
            ArgumentInfo::Expression(expr) => Ok(match &expr.shape {
                ExprShape::Function(function) => Self::FunctionLiteral(function),
                ExprShape::Null => Self::NullLiteral,
                ExprShape::String(_)
                | ExprShape::Template { .. }
                | ExprShape::Primary
                | ExprShape::StatementAmbiguous
                | ExprShape::Compound => Self::RawValue(expr),
            }),
            ArgumentInfo::Spread(_) => Err(malformed(
                call,
                source,
                "variant arguments cannot be spread",
            )),
        }
    }
}

/// Record the edit that replaces `call` with its winning variant.
///
/// Returns the spans of the losing function-literal variants, which are discarded with
/// the call.
pub fn resolve_call(
    call: &CallInfo,
    selection: &WinnerSelection,
    index: &ProgramIndex,
    source: &str,
    edits: &mut EditSet,
) -> Result<Vec<Span>> {
    let variants = call.arguments.len().saturating_sub(1);
    if variants == 0 {
        return Err(malformed(call, source, "the call has no variant arguments"));
    }
    if call.arguments.iter().any(|a| matches!(a, ArgumentInfo::Spread(_))) {
        return Err(malformed(call, source, "variant arguments cannot be spread"));
    }

    let winner_index = selection.argument_index();
    let Some(winning) = call.arguments.get(winner_index) else {
        return Err(CodemodError::WinnerOutOfRange {
            location: SourceLocation::from_offset(source, call.span.start),
            variants,
            winner: selection.winner(),
            index: selection.variant_index(),
        });
    };

    let losing: Vec<Span> = call
        .arguments
        .iter()
        .enumerate()
        .skip(1)
        .filter(|(position, _)| *position != winner_index)
        .filter_map(|(_, argument)| match argument {
            ArgumentInfo::Expression(ExprInfo {
                shape: ExprShape::Function(function),
                ..
            }) => Some(function.span),
            _ => None,
        })
        .collect();

    let splicer = Splicer {
        call,
        index,
        source,
    };
    match VariantArgument::from_argument(call, winning, source)? {
        VariantArgument::FunctionLiteral(function) => splicer.function_literal(function, edits),
        VariantArgument::NullLiteral => splicer.remove(edits),
        VariantArgument::RawValue(expr) => splicer.replace(expr, edits),
    }
    Ok(losing)
}

struct Splicer<'c> {
    call: &'c CallInfo,
    index: &'c ProgramIndex,
    source: &'c str,
}

impl Splicer<'_> {
    fn text(&self, span: Span) -> &str {
        &self.source[span.start as usize..span.end as usize]
    }

    fn function_literal(&self, function: &FunctionShape, edits: &mut EditSet) {
        // Inlining a `function` body would rebind `this` and `arguments`.
        if !function.simple || !function.is_arrow {
            return self.invoke(function, edits);
        }
        match &function.body {
            BodyShape::Expression(expr) => self.replace(expr, edits),
            BodyShape::Block {
                sole_return: Some(expr),
                ..
            } => self.replace(expr, edits),
            BodyShape::Block {
                span,
                empty,
                declares_bindings,
                ..
            } => match self.call.slot {
                Slot::Statement { statement, listed } if !self.index.has_own_return(function.span) => {
                    if listed && !declares_bindings {
                        if *empty {
                            edits.remove_statement(statement.start, statement.end);
                        } else {
                            let inner = Span::new(span.start + 1, span.end - 1);
                            let indent = line_indent(self.source, statement.start);
                            let body = reindent(self.text(inner).trim(), indent);
                            edits.replace(statement.start, statement.end, body);
                        }
                    } else {
                        edits.replace(statement.start, statement.end, self.text(*span));
                    }
                }
                _ => self.invoke(function, edits),
            },
        }
    }

    /// Replace the call with an immediately invoked copy of the function literal.
    fn invoke(&self, function: &FunctionShape, edits: &mut EditSet) {
        let text = format!("({})()", self.text(function.span));
        self.emit(text, &ExprShape::Primary, edits);
    }

    fn remove(&self, edits: &mut EditSet) {
        match self.call.slot {
            Slot::Statement {
                statement,
                listed: true,
            } => edits.remove_statement(statement.start, statement.end),
            Slot::Statement {
                statement,
                listed: false,
            } => edits.replace(statement.start, statement.end, ";"),
            Slot::Interpolation { target } => {
                edits.replace(target.start, target.end, wrap_template(None, ""))
            }
            Slot::JsxChild { container } => edits.remove(container.start, container.end),
            Slot::ListElement {
                element,
                previous,
                next,
            } => {
                let items: Vec<(u32, u32)> = previous
                    .into_iter()
                    .chain([element])
                    .chain(next)
                    .map(|span| (span.start, span.end))
                    .collect();
                let removed: Vec<bool> = items.iter().map(|item| item.0 == element.start).collect();
                if edits.remove_list_items(&items, &removed) {
                    edits.remove(element.start, element.end);
                }
            }
            Slot::Free | Slot::Nested => {
                edits.replace(self.call.span.start, self.call.span.end, "undefined")
            }
        }
    }

    fn replace(&self, expr: &ExprInfo, edits: &mut EditSet) {
        if let Slot::Interpolation { target } = self.call.slot {
            match &expr.shape {
                ExprShape::String(value) => {
                    let text = wrap_template(None, &escape_template(value));
                    return edits.replace(target.start, target.end, text);
                }
                ExprShape::Template { tag, quasi } => {
                    let content = self.text(Span::new(quasi.start + 1, quasi.end - 1));
                    let tag = tag.map(|tag| self.text(tag));
                    return edits.replace(target.start, target.end, wrap_template(tag, content));
                }
                _ => {}
            }
        }
        self.emit(self.text(expr.span).to_string(), &expr.shape, edits);
    }

    fn emit(&self, text: String, shape: &ExprShape, edits: &mut EditSet) {
        let parenthesize = match self.call.slot {
            Slot::Statement { .. } => shape.is_statement_ambiguous(),
            Slot::Nested => !shape.is_primary(),
            Slot::Interpolation { .. }
            | Slot::JsxChild { .. }
            | Slot::ListElement { .. }
            | Slot::Free => false,
        };
        let text = if parenthesize { format!("({text})") } else { text };
        let text = match self.call.slot {
            Slot::Statement { statement, .. }
                if statement.start == self.call.span.start
                    && text.starts_with(['(', '[', '`'])
                    && continues_expression(self.source, statement.start) =>
            {
                format!(";{text}")
            }
            _ => text,
        };
        edits.replace(self.call.span.start, self.call.span.end, text);
    }
}

/// Whether a statement starting at `offset` could be read as a continuation of the
/// previous line when it starts with `(`, `[` or a backtick.
fn continues_expression(source: &str, offset: u32) -> bool {
    source[..offset as usize]
        .trim_end()
        .chars()
        .last()
        .is_some_and(|c| !matches!(c, ';' | '{' | '}'))
}

/// Leading whitespace of the line `offset` sits on.
fn line_indent(source: &str, offset: u32) -> &str {
    let before = &source[..offset as usize];
    let line = &before[before.rfind('\n').map_or(0, |i| i + 1)..];
    &line[..line.len() - line.trim_start().len()]
}

/// Shift every line after the first so the block's common indentation becomes `indent`.
/// Text with template literals is left alone since their lines are string content.
fn reindent(text: &str, indent: &str) -> String {
    if !text.contains('\n') || text.contains('`') {
        return text.to_string();
    }

    let leading = |line: &str| line.len() - line.trim_start().len();
    let common = text
        .split('\n')
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .map(leading)
        .min()
        .unwrap_or(0);

    let mut lines = text.split('\n');
    let mut output = lines.next().unwrap_or_default().to_string();
    for line in lines {
        output.push('\n');
        if !line.trim().is_empty() {
            output.push_str(indent);
            output.push_str(&line[common..]);
        }
    }
    output
}
