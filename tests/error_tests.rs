use pretty_assertions::assert_eq;
use rstest::rstest;
use tally::error::{DiagnosticKind, Position, Span};
use tally::lexer::lex;
use tally::parser::parse;

fn span(start: usize, end: usize) -> Span {
    Span::new(
        Position {
            index: start,
            ..Position::default()
        },
        Position {
            index: end,
            ..Position::default()
        },
    )
}

#[rstest]
#[case(span(2, 4), 10, 2..4)]
#[case(span(3, 3), 10, 3..4)]
#[case(span(5, 6), 5, 4..5)]
#[case(span(9, 12), 5, 4..5)]
#[case(span(0, 1), 0, 0..0)]
fn label_ranges_stay_inside_the_source(
    #[case] span: Span,
    #[case] source_len: usize,
    #[case] expected: std::ops::Range<usize>,
) {
    assert_eq!(span.range(source_len), expected);
}

#[test]
fn missing_final_semicolon_points_at_the_last_character() {
    let source = "declare a = 1;\n1 + 2";
    let (tokens, diagnostics) = lex("<stdin>", source);
    let (_, diagnostics) = parse(tokens, diagnostics);

    let error = diagnostics.first().expect("a diagnostic");
    assert_eq!(error.kind, DiagnosticKind::ExpectedToken);
    assert_eq!(error.message, "Expected ';' after expression, found end of input");

    let length = source.chars().count();
    assert_eq!(error.span.start.index, length);
    assert_eq!(error.span.range(length), length - 1..length);
}

#[test]
fn reporting_an_end_of_input_diagnostic_succeeds() {
    let source = "1 + 2";
    let (tokens, diagnostics) = lex("<stdin>", source);
    let (_, diagnostics) = parse(tokens, diagnostics);

    let error = diagnostics.first().expect("a diagnostic");
    assert!(error.report(source, false).is_ok());
}
