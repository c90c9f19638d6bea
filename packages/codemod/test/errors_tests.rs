//! Error Reporting Tests

use opticks_codemod::{
    default_source_type, transform, Codemod, CodemodError, FormatError, Formatter, SourceLocation,
    SourceType, ToggleOptions,
};

fn run(source: &str, winner: &str) -> Result<String, CodemodError> {
    transform(source, &ToggleOptions::new("flag-x", winner).unformatted())
}

#[test]
fn should_fail_when_winner_is_out_of_range() {
    let source = "import { toggle } from 'opticks'\nconst v = toggle('flag-x', 1, 2)\n";
    match run(source, "c") {
        Err(CodemodError::WinnerOutOfRange {
            location,
            variants,
            winner,
            index,
        }) => {
            assert_eq!(location, SourceLocation { line: 2, column: 11 });
            assert_eq!(variants, 2);
            assert_eq!(winner, 'c');
            assert_eq!(index, 2);
        }
        other => panic!("expected WinnerOutOfRange, got {:?}", other),
    }
}

#[test]
fn should_fail_on_malformed_calls() {
    let cases = [
        "toggle(name, 1, 2)",
        "toggle()",
        "toggle(`flag-x`, 1, 2)",
        "toggle('flag-x')",
        "toggle('flag-x', ...variants)",
    ];
    for call in cases {
        let source = format!("import {{ toggle }} from 'opticks'\n{call}\n");
        assert!(
            matches!(run(&source, "a"), Err(CodemodError::MalformedCall { .. })),
            "expected MalformedCall for {call}"
        );
    }
}

#[test]
fn should_reject_invalid_winner_codes() {
    let source = "const a = 1\n";
    assert!(matches!(
        run(source, "B"),
        Err(CodemodError::InvalidWinner(code)) if code == "B"
    ));
    assert!(matches!(
        run(source, "ab"),
        Err(CodemodError::InvalidWinner(_))
    ));
}

#[test]
fn should_report_unparseable_input() {
    assert!(matches!(
        run("const = ;", "a"),
        Err(CodemodError::Parse { .. })
    ));
}

struct FailingFormatter;

impl Formatter for FailingFormatter {
    fn format(&self, _source: &str, _source_type: SourceType) -> Result<String, FormatError> {
        Err(FormatError::Failed("boom".to_string()))
    }
}

struct MarkingFormatter;

impl Formatter for MarkingFormatter {
    fn format(&self, source: &str, _source_type: SourceType) -> Result<String, FormatError> {
        Ok(format!("// formatted\n{source}"))
    }
}

#[test]
fn should_fall_back_to_cleaned_text_when_formatting_fails() {
    let source = "import { toggle } from 'opticks'\nconst s = `a${toggle('flag-x', 'b', 'c')}`\n";
    let output = Codemod::new(ToggleOptions::new("flag-x", "a"))
        .with_formatter(FailingFormatter)
        .transform(source, default_source_type())
        .unwrap();
    assert_eq!(output, "const s = `ab`\n");
}

#[test]
fn should_run_custom_formatters_on_cleaned_text() {
    let source = "import { toggle } from 'opticks'\nconst v = toggle('flag-x', 1, 2)\n";
    let output = Codemod::new(ToggleOptions::new("flag-x", "b"))
        .with_formatter(MarkingFormatter)
        .transform(source, default_source_type())
        .unwrap();
    assert_eq!(output, "// formatted\nconst v = 2\n");
}
