//! Import Bindings
//!
//! Locates the local aliases of the toggle function and prunes them once unused.

use oxc_span::Span;
use oxc_syntax::symbol::SymbolId;

use super::calls;
use super::dead_code::LivenessStrategy;
use super::edit::EditSet;
use super::index::{ProgramIndex, SpecifierKind};

/// A named import of the toggle function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportBinding {
    pub statement: Span,
    pub specifier: Span,
    pub imported: String,
    pub local: String,
    pub symbol: Option<SymbolId>,
}

/// Value imports of `function_name` from `package_name`.
pub fn resolve_bindings(
    index: &ProgramIndex,
    package_name: &str,
    function_name: &str,
) -> Vec<ImportBinding> {
    index
        .imports
        .iter()
        .filter(|import| !import.is_type && import.source == package_name)
        .flat_map(|import| {
            import.specifiers.iter().filter_map(move |specifier| match &specifier.kind {
                SpecifierKind::Named { imported, is_type }
                    if !is_type && imported == function_name =>
                {
                    Some(ImportBinding {
                        statement: import.span,
                        specifier: specifier.span,
                        imported: imported.clone(),
                        local: specifier.local.clone(),
                        symbol: specifier.symbol,
                    })
                }
                _ => None,
            })
        })
        .collect()
}

/// Whether the binding must stay imported.
///
/// It stays while the call-site locator still finds a toggle call through it, whatever
/// the toggle name. Any other use that resolves to the imported symbol, such as
/// `export { toggle }`, keeps it as well.
pub fn is_in_use(index: &ProgramIndex, binding: &ImportBinding, strategy: LivenessStrategy) -> bool {
    if calls::locate(index, std::slice::from_ref(binding), strategy)
        .next()
        .is_some()
    {
        return true;
    }
    binding.symbol.is_some()
        && index
            .references
            .iter()
            .any(|reference| reference.symbol == binding.symbol)
}

/// Remove the binding's specifier, or the whole statement when nothing else is imported.
pub fn prune(index: &ProgramIndex, binding: &ImportBinding, source: &str, edits: &mut EditSet) {
    let Some(import) = index.import(binding.statement) else {
        return;
    };

    if import.specifiers.len() <= 1 {
        edits.remove_statement(import.span.start, import.span.end);
        return;
    }

    let named: Vec<_> = import
        .specifiers
        .iter()
        .filter(|s| matches!(s.kind, SpecifierKind::Named { .. }))
        .collect();
    let items: Vec<(u32, u32)> = named.iter().map(|s| (s.span.start, s.span.end)).collect();
    let removed: Vec<bool> = named.iter().map(|s| s.span == binding.specifier).collect();

    if !edits.remove_list_items(&items, &removed) {
        return;
    }

    // The only named specifier next to a default import: drop `, { ... }`.
    let Some(default) = import
        .specifiers
        .iter()
        .find(|s| s.kind == SpecifierKind::Default)
    else {
        edits.remove_statement(import.span.start, import.span.end);
        return;
    };
    let after = binding.specifier.end as usize;
    match source[after..import.span.end as usize].find('}') {
        Some(offset) => edits.remove(default.span.end, (after + offset + 1) as u32),
        None => edits.remove_statement(import.span.start, import.span.end),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::source::{analyze, default_source_type};

    fn prune_first(source: &str) -> String {
        let index = analyze(source, default_source_type()).unwrap();
        let bindings = resolve_bindings(&index, "opticks", "toggle");
        let mut edits = EditSet::new(source);
        prune(&index, &bindings[0], source, &mut edits);
        edits.apply().unwrap()
    }

    #[test]
    fn should_resolve_aliased_bindings() {
        let index = analyze(
            "import { toggle as t, other } from 'opticks';\nimport { toggle } from 'elsewhere';\n",
            default_source_type(),
        )
        .unwrap();
        let bindings = resolve_bindings(&index, "opticks", "toggle");
        assert_eq!(bindings.len(), 1);
        assert_eq!(bindings[0].local, "t");
        assert_eq!(bindings[0].imported, "toggle");
    }

    #[test]
    fn should_ignore_type_only_imports() {
        let index = analyze(
            "import type { toggle } from 'opticks';\nimport { type toggle as t } from 'opticks';\n",
            oxc_span::SourceType::ts(),
        )
        .unwrap();
        assert!(resolve_bindings(&index, "opticks", "toggle").is_empty());
    }

    #[test]
    fn should_remove_sole_specifier_statement() {
        assert_eq!(
            prune_first("import { toggle } from 'opticks';\nrun();\n"),
            "run();\n"
        );
    }

    #[test]
    fn should_remove_one_of_many_specifiers() {
        assert_eq!(
            prune_first("import { toggle, Experiment } from 'opticks';\n"),
            "import { Experiment } from 'opticks';\n"
        );
        assert_eq!(
            prune_first("import { Experiment, toggle } from 'opticks';\n"),
            "import { Experiment } from 'opticks';\n"
        );
    }

    #[test]
    fn should_drop_braces_next_to_default_import() {
        assert_eq!(
            prune_first("import opticks, { toggle } from 'opticks';\n"),
            "import opticks from 'opticks';\n"
        );
    }

    fn in_use(source: &str, strategy: LivenessStrategy) -> bool {
        let index = analyze(source, default_source_type()).unwrap();
        let binding = &resolve_bindings(&index, "opticks", "toggle")[0];
        is_in_use(&index, binding, strategy)
    }

    #[test]
    fn should_keep_bindings_with_remaining_calls() {
        let source = "import { toggle } from 'opticks';\ntoggle('other', 1, 2);\n";
        assert!(in_use(source, LivenessStrategy::GlobalName));
        assert!(in_use(source, LivenessStrategy::LexicalScope));
    }

    #[test]
    fn should_ignore_unrelated_uses_of_the_same_name() {
        let source = "import { toggle } from 'opticks';\nfunction g() { const toggle = 5; return toggle }\n";
        assert!(!in_use(source, LivenessStrategy::GlobalName));
        assert!(!in_use(source, LivenessStrategy::LexicalScope));
    }

    #[test]
    fn should_follow_the_locator_for_shadowed_calls() {
        let source = "import { toggle } from 'opticks';\nfunction f(toggle) { return toggle('x', 1) }\n";
        assert!(in_use(source, LivenessStrategy::GlobalName));
        assert!(!in_use(source, LivenessStrategy::LexicalScope));
    }

    #[test]
    fn should_keep_bindings_used_as_values() {
        let source = "import { toggle } from 'opticks';\nexport { toggle };\n";
        assert!(in_use(source, LivenessStrategy::GlobalName));
    }
}
