//! Dead Declarations
//!
//! Losing function-literal variants are discarded along with their call. Declarations
//! that only those variants used are removed too. Two liveness strategies decide what
//! counts as "only used there":
//!
//! - [`LivenessStrategy::GlobalName`] compares identifier names across the whole program.
//!   Any reference with the same name outside the discarded region keeps every declaration
//!   of that name, even when it belongs to an unrelated scope.
//! - [`LivenessStrategy::LexicalScope`] follows resolved symbols, so shadowing is respected.

use std::fmt;
use std::str::FromStr;

use indexmap::{IndexMap, IndexSet};
use oxc_span::Span;
use serde::{Deserialize, Serialize};

use super::edit::EditSet;
use super::index::{span_contains, DeclarationInfo, DeclarationKind, ProgramIndex};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LivenessStrategy {
    #[default]
    GlobalName,
    LexicalScope,
}

impl LivenessStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GlobalName => "global-name",
            Self::LexicalScope => "lexical-scope",
        }
    }
}

impl fmt::Display for LivenessStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LivenessStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "global-name" => Ok(Self::GlobalName),
            "lexical-scope" => Ok(Self::LexicalScope),
            other => Err(format!(
                "unknown liveness strategy `{other}` (expected `global-name` or `lexical-scope`)"
            )),
        }
    }
}

/// Union of the losing function-literal spans of one call.
#[derive(Debug, Clone, Default)]
pub struct DiscardedRegion {
    spans: Vec<Span>,
}

impl DiscardedRegion {
    pub fn new(spans: Vec<Span>) -> Self {
        Self { spans }
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn contains(&self, span: Span) -> bool {
        self.spans.iter().any(|outer| span_contains(*outer, span))
    }
}

/// Declarations outside `region` that become unreferenced once `region` is gone.
pub fn dangling_declarations<'i>(
    index: &'i ProgramIndex,
    region: &DiscardedRegion,
    strategy: LivenessStrategy,
) -> Vec<&'i DeclarationInfo> {
    if region.is_empty() {
        return Vec::new();
    }

    match strategy {
        LivenessStrategy::GlobalName => {
            let candidates: IndexSet<&str> = index
                .references
                .iter()
                .filter(|r| region.contains(r.span))
                .map(|r| r.name.as_str())
                .collect();
            let dead: IndexSet<&str> = candidates
                .into_iter()
                .filter(|name| {
                    !index
                        .references
                        .iter()
                        .any(|r| r.name == *name && !region.contains(r.span))
                })
                .collect();

            index
                .declarations
                .iter()
                .filter(|d| dead.contains(d.name.as_str()) && !region.contains(d.span))
                .collect()
        }
        LivenessStrategy::LexicalScope => index
            .declarations
            .iter()
            .filter(|d| !region.contains(d.span))
            .filter(|d| {
                let Some(symbol) = d.symbol else {
                    return false;
                };
                let references = index.references.iter().filter(|r| r.symbol == Some(symbol));
                let mut used_in_region = false;
                let mut used_elsewhere = false;
                for reference in references {
                    if region.contains(reference.span) {
                        used_in_region = true;
                    } else if !span_contains(d.span, reference.span) {
                        used_elsewhere = true;
                    }
                }
                used_in_region && !used_elsewhere
            })
            .collect(),
    }
}

/// Record removals for `declarations`, grouping declarators of the same statement.
pub fn remove_declarations(declarations: &[&DeclarationInfo], edits: &mut EditSet) {
    let mut by_statement: IndexMap<Span, Vec<&DeclarationInfo>> = IndexMap::new();
    for declaration in declarations.iter().copied() {
        by_statement
            .entry(declaration.statement)
            .or_default()
            .push(declaration);
    }

    for (statement, group) in by_statement {
        let siblings = group.iter().find_map(|d| match &d.kind {
            DeclarationKind::Declarator { siblings, .. } => Some(siblings),
            _ => None,
        });
        let Some(siblings) = siblings else {
            edits.remove_statement(statement.start, statement.end);
            continue;
        };

        let mut removed = vec![false; siblings.len()];
        for declaration in &group {
            if let DeclarationKind::Declarator { position, .. } = &declaration.kind {
                removed[*position] = true;
            }
        }
        let items: Vec<(u32, u32)> = siblings.iter().map(|s| (s.start, s.end)).collect();
        if edits.remove_list_items(&items, &removed) {
            edits.remove_statement(statement.start, statement.end);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::source::{analyze, default_source_type};

    fn region_of(source: &str, needle: &str) -> DiscardedRegion {
        let start = source.find(needle).unwrap() as u32;
        DiscardedRegion::new(vec![Span::new(start, start + needle.len() as u32)])
    }

    fn dead_names(source: &str, losing: &str, strategy: LivenessStrategy) -> Vec<String> {
        let index = analyze(source, default_source_type()).unwrap();
        dangling_declarations(&index, &region_of(source, losing), strategy)
            .into_iter()
            .map(|d| d.name.clone())
            .collect()
    }

    #[test]
    fn should_find_names_used_only_in_region() {
        let source = "const a = 1;\nconst b = 2;\nfunction c() {}\nuse(b);\nt(() => a + b + c());\n";
        assert_eq!(
            dead_names(source, "() => a + b + c()", LivenessStrategy::GlobalName),
            vec!["a", "c"]
        );
    }

    #[test]
    fn should_keep_names_reused_anywhere_under_global_name() {
        let source = "const a = 1;\nfunction f(a) { return a }\nt(() => a);\n";
        assert!(dead_names(source, "() => a", LivenessStrategy::GlobalName).is_empty());
        assert_eq!(
            dead_names(source, "() => a", LivenessStrategy::LexicalScope),
            vec!["a"]
        );
    }

    #[test]
    fn should_ignore_self_references_under_lexical_scope() {
        let source = "function loop() { loop() }\nt(() => loop());\n";
        assert_eq!(
            dead_names(source, "() => loop()", LivenessStrategy::LexicalScope),
            vec!["loop"]
        );
        assert!(dead_names(source, "() => loop()", LivenessStrategy::GlobalName).is_empty());
    }

    #[test]
    fn should_remove_declarators_and_emptied_statements() {
        let source = "const a = 1, b = 2;\nconst c = 3;\nt(() => a + c);\n";
        let index = analyze(source, default_source_type()).unwrap();
        let region = region_of(source, "() => a + c");
        let dead = dangling_declarations(&index, &region, LivenessStrategy::GlobalName);

        let mut edits = EditSet::new(source);
        remove_declarations(&dead, &mut edits);
        assert_eq!(edits.apply().unwrap(), "const b = 2;\nt(() => a + c);\n");
    }

    #[test]
    fn should_parse_strategy_names() {
        assert_eq!(
            "lexical-scope".parse::<LivenessStrategy>().unwrap(),
            LivenessStrategy::LexicalScope
        );
        assert_eq!(LivenessStrategy::default().to_string(), "global-name");
        assert!("scope".parse::<LivenessStrategy>().is_err());
    }
}
