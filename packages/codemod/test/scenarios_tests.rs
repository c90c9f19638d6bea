//! Toggle Resolution Tests
//!
//! End-to-end rewrites through the public `transform` entry points, formatting disabled
//! so the expected text is exact.

use opticks_codemod::{
    transform, transform_with_source_type, LivenessStrategy, SourceType, ToggleOptions,
};

fn resolve(source: &str, toggle: &str, winner: &str) -> String {
    let options = ToggleOptions::new(toggle, winner).unformatted();
    transform(source, &options).unwrap()
}

#[test]
fn should_replace_call_with_winning_body_and_remove_import() {
    let source = "import { toggle } from 'opticks'\n\nconst value = toggle('flag-x', () => 1, () => 2)\n";
    assert_eq!(resolve(source, "flag-x", "b"), "\nconst value = 2\n");
}

#[test]
fn should_delete_call_with_null_winner() {
    let source = "import { toggle } from 'opticks'\n\nfunction doWork() {}\n\ntoggle('flag-x', null, () => doWork())\n";
    assert_eq!(resolve(source, "flag-x", "a").trim(), "");
}

#[test]
fn should_resolve_toggle_inside_template_string() {
    let source = "import { toggle } from 'opticks'\n\nconst label = `prefix ${toggle('flag-x', () => 'A', () => 'B')} suffix`\n";
    assert_eq!(
        resolve(source, "flag-x", "a"),
        "\nconst label = `prefix A suffix`\n"
    );
}

#[test]
fn should_keep_import_while_other_toggles_remain() {
    let source = "import { toggle } from 'opticks'\n\nconst a = toggle('flag-x', () => 'x-a', () => 'x-b')\nconst b = toggle('flag-y', () => 'y-a', () => 'y-b')\n";
    assert_eq!(
        resolve(source, "flag-x", "b"),
        "import { toggle } from 'opticks'\n\nconst a = 'x-b'\nconst b = toggle('flag-y', () => 'y-a', () => 'y-b')\n"
    );
}

#[test]
fn should_return_input_unchanged_without_winner() {
    let source = "import { toggle } from 'opticks'\nconst a = toggle('flag-x',   () => 1, () => 2)\n";
    let options = ToggleOptions {
        toggle: Some("flag-x".to_string()),
        ..ToggleOptions::default()
    };
    assert_eq!(transform(source, &options).unwrap(), source);
    assert_eq!(transform(source, &ToggleOptions::default()).unwrap(), source);
}

#[test]
fn should_leave_files_without_toggle_import_alone() {
    let source = "const toggle = (name, a) => a\nconst v = toggle('flag-x', 1, 2)\n";
    assert_eq!(resolve(source, "flag-x", "b"), source);
}

#[test]
fn should_match_toggle_names_case_insensitively() {
    let source = "import { toggle } from 'opticks'\nconst v = toggle('Flag-X', 'a', 'b')\n";
    assert_eq!(resolve(source, "FLAG-x", "a"), "const v = 'a'\n");
}

#[test]
fn should_follow_aliased_imports() {
    let source = "import { toggle as t, Experiment } from 'opticks'\nconst v = t('flag-x', 1, 2)\n";
    assert_eq!(
        resolve(source, "flag-x", "a"),
        "import { Experiment } from 'opticks'\nconst v = 1\n"
    );
}

#[test]
fn should_honour_custom_package_and_function_names() {
    let source = "import { variant } from '@acme/flags'\nimport { toggle } from 'opticks'\nconst v = variant('flag-x', 1, 2)\nconst w = toggle('flag-x', 3, 4)\n";
    let options = ToggleOptions::new("flag-x", "b")
        .with_package_name("@acme/flags")
        .with_function_name("variant")
        .unformatted();
    assert_eq!(
        transform(source, &options).unwrap(),
        "import { toggle } from 'opticks'\nconst v = 2\nconst w = toggle('flag-x', 3, 4)\n"
    );
}

#[test]
fn should_resolve_nested_toggles() {
    let source = "import { toggle } from 'opticks'\nconst v = toggle('flag-x', () => toggle('flag-x', () => 'inner-a', () => 'inner-b'), () => 'outer-b')\n";
    assert_eq!(resolve(source, "flag-x", "a"), "const v = 'inner-a'\n");
}

#[test]
fn should_resolve_every_call_of_the_toggle() {
    let source = "import { toggle } from 'opticks'\nrender(toggle('flag-x', 1, 2))\nrender(toggle('flag-x', 3, 4))\n";
    assert_eq!(resolve(source, "flag-x", "b"), "render(2)\nrender(4)\n");
}

#[test]
fn should_splice_block_bodies_into_statement_lists() {
    let source = "import { toggle } from 'opticks'\nfunction run() {\n  toggle('flag-x', () => {\n    start()\n    finish()\n  }, null)\n}\n";
    assert_eq!(
        resolve(source, "flag-x", "a"),
        "function run() {\n  start()\n  finish()\n}\n"
    );
}

#[test]
fn should_remove_jsx_children_for_null_winner() {
    let source = "import { toggle } from 'opticks'\nconst view = <div>{toggle('flag-x', null, () => <Banner />)}</div>\n";
    assert_eq!(resolve(source, "flag-x", "a"), "const view = <div></div>\n");
}

#[test]
fn should_skip_shadowed_calls_with_lexical_scope() {
    let source = "import { toggle } from 'opticks'\nconst v = toggle('flag-x', 1, 2)\nfunction local(toggle) { return toggle('flag-x', 3, 4) }\n";
    let options = ToggleOptions::new("flag-x", "b")
        .with_liveness(LivenessStrategy::LexicalScope)
        .unformatted();
    assert_eq!(
        transform(source, &options).unwrap(),
        "const v = 2\nfunction local(toggle) { return toggle('flag-x', 3, 4) }\n"
    );
}

#[test]
fn should_handle_typescript_sources() {
    let source = "import { toggle } from 'opticks'\nconst v: number = toggle('flag-x', (): number => 1, () => 2 as number)\n";
    let options = ToggleOptions::new("flag-x", "b").unformatted();
    assert_eq!(
        transform_with_source_type(source, SourceType::ts(), &options).unwrap(),
        "const v: number = 2 as number\n"
    );
}

#[test]
fn should_remove_null_winners_from_arrays_and_arguments() {
    let source = "import { toggle } from 'opticks'\nconst items = [itemA, toggle('flag-x', null, () => itemB)]\nconst names = cx('a', toggle('flag-x', null, () => 'b'))\n";
    assert_eq!(
        resolve(source, "flag-x", "a"),
        "const items = [itemA]\nconst names = cx('a')\n"
    );
}

#[test]
fn should_prune_import_despite_unrelated_same_name_bindings() {
    let source = "import { toggle } from 'opticks'\nconst v = toggle('flag-x', () => 1, () => 2)\nfunction g() { const toggle = 5; return toggle }\n";
    assert_eq!(
        resolve(source, "flag-x", "b"),
        "const v = 2\nfunction g() { const toggle = 5; return toggle }\n"
    );
}

#[test]
fn should_keep_import_that_is_re_exported() {
    let source = "import { toggle } from 'opticks'\nexport { toggle }\nconst v = toggle('flag-x', 1, 2)\n";
    assert_eq!(
        resolve(source, "flag-x", "a"),
        "import { toggle } from 'opticks'\nexport { toggle }\nconst v = 1\n"
    );
}

#[test]
fn should_invoke_function_expression_winners() {
    let source = "import { toggle } from 'opticks'\nconst read = toggle('flag-x', function () { return this.x }, null)\n";
    assert_eq!(
        resolve(source, "flag-x", "a"),
        "const read = (function () { return this.x })()\n"
    );
}

#[test]
fn should_resolve_files_with_thousands_of_calls() {
    let calls = 5000;
    let mut source = String::from("import { toggle } from 'opticks'\n");
    let mut expected = String::new();
    for i in 0..calls {
        source.push_str(&format!("render(toggle('flag-x', {i}, 0))\n"));
        expected.push_str(&format!("render({i})\n"));
    }
    assert_eq!(resolve(&source, "flag-x", "a"), expected);
}

#[test]
fn should_format_output_by_default() {
    let source = "import { toggle } from 'opticks'\nconst value = toggle(\"flag-x\", () => \"a\", () => \"b\")\n";
    let output = transform(source, &ToggleOptions::new("flag-x", "a")).unwrap();
    assert_eq!(output, "const value = 'a'\n");
}

#[test]
fn should_format_without_semicolons_and_keep_blank_lines() {
    let source = "import { toggle } from 'opticks';\n\nconst a = toggle('flag-x', 1, 2);\n\nrun(a);\n";
    let output = transform(source, &ToggleOptions::new("flag-x", "b")).unwrap();
    assert!(!output.contains(';'), "unexpected output: {output}");
    assert!(output.contains("const a = 2\n\nrun(a)\n"), "unexpected output: {output}");
}
