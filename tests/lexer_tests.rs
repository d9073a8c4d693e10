use pretty_assertions::assert_eq;
use rstest::rstest;
use tally::error::DiagnosticKind;
use tally::lexer::{lex, Keyword, Literal, TokenKind};

fn kinds(source: &str) -> Vec<TokenKind> {
    let (tokens, _) = lex("<test>", source);
    tokens.iter().map(|t| t.kind).collect()
}

#[test]
fn declaration_tokens() {
    let (tokens, diagnostics) = lex("<test>", "declare x = 3.5;");

    assert!(diagnostics.is_empty());
    assert_eq!(
        tokens.iter().map(|t| t.kind).collect::<Vec<_>>(),
        vec![
            TokenKind::Keyword,
            TokenKind::Identifier,
            TokenKind::Equal,
            TokenKind::Number,
            TokenKind::Semicolon,
            TokenKind::EndOfInput,
        ]
    );
    assert_eq!(tokens[0].literal, Some(Literal::Keyword(Keyword::Declare)));
    assert_eq!(tokens[1].literal, None);
    assert_eq!(tokens[1].text, "x");
    assert_eq!(tokens[3].literal, Some(Literal::Float(3.5)));
}

#[rstest]
#[case("++", TokenKind::PlusPlus)]
#[case("--", TokenKind::MinusMinus)]
#[case("==", TokenKind::EqualEqual)]
#[case("<=", TokenKind::LessEqual)]
#[case(">=", TokenKind::GreaterEqual)]
#[case("=>", TokenKind::Arrow)]
#[case("!=", TokenKind::BangEqual)]
#[case("+", TokenKind::Plus)]
#[case("-", TokenKind::Minus)]
#[case("=", TokenKind::Equal)]
#[case("<", TokenKind::Less)]
#[case(">", TokenKind::Greater)]
#[case("^", TokenKind::Caret)]
#[case(",", TokenKind::Comma)]
#[case("{", TokenKind::LeftBrace)]
#[case("}", TokenKind::RightBrace)]
fn operators_use_maximal_munch(#[case] source: &str, #[case] expected: TokenKind) {
    assert_eq!(kinds(source), vec![expected, TokenKind::EndOfInput]);
}

#[test]
fn adjacent_operators_split_greedily() {
    assert_eq!(
        kinds("+++=="),
        vec![
            TokenKind::PlusPlus,
            TokenKind::Plus,
            TokenKind::EqualEqual,
            TokenKind::EndOfInput,
        ]
    );
}

#[rstest]
#[case("if", Keyword::If)]
#[case("while", Keyword::While)]
#[case("break", Keyword::Break)]
#[case("continue", Keyword::Continue)]
#[case("and", Keyword::And)]
#[case("or", Keyword::Or)]
#[case("not", Keyword::Not)]
fn keywords_carry_their_tag(#[case] source: &str, #[case] keyword: Keyword) {
    let (tokens, _) = lex("<test>", source);

    assert_eq!(tokens[0].kind, TokenKind::Keyword);
    assert_eq!(tokens[0].keyword(), Some(keyword));
}

#[test]
fn keyword_prefix_is_an_identifier() {
    let (tokens, _) = lex("<test>", "iffy declared");

    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    assert_eq!(tokens[1].kind, TokenKind::Identifier);
    assert_eq!(tokens[1].text, "declared");
}

#[test]
fn integer_and_float_literals() {
    let (tokens, _) = lex("<test>", "42 0.25 7.");

    assert_eq!(tokens[0].literal, Some(Literal::Int(42)));
    assert_eq!(tokens[1].literal, Some(Literal::Float(0.25)));
    assert_eq!(tokens[2].literal, Some(Literal::Float(7.0)));
    assert_eq!(tokens[2].text, "7.");
}

#[test]
fn oversized_integer_becomes_float() {
    let (tokens, diagnostics) = lex("<test>", "12345678901234567890");

    assert!(diagnostics.is_empty());
    assert_eq!(tokens[0].literal, Some(Literal::Float(12345678901234567890.0)));
}

#[test]
fn second_decimal_point_ends_the_number() {
    let (tokens, diagnostics) = lex("<test>", "1.2.3");

    assert_eq!(
        tokens.iter().map(|t| t.text.as_str()).collect::<Vec<_>>(),
        vec!["1.2", "3", ""]
    );
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics.iter().next().map(|d| d.kind), Some(DiagnosticKind::IllegalCharacter));
}

#[test]
fn illegal_characters_are_reported_and_skipped() {
    let (tokens, diagnostics) = lex("<test>", "1 $ 2 #");

    assert_eq!(
        tokens.iter().map(|t| t.kind).collect::<Vec<_>>(),
        vec![TokenKind::Number, TokenKind::Number, TokenKind::EndOfInput]
    );
    let messages: Vec<&str> = diagnostics.iter().map(|d| d.message.as_str()).collect();
    assert_eq!(messages, vec!["'$'", "'#'"]);
    assert_eq!(diagnostics.iter().map(|d| d.span.start.index).collect::<Vec<_>>(), vec![2, 6]);
}

#[test]
fn bang_without_equals_expects_a_character() {
    let (tokens, diagnostics) = lex("<test>", "!x");

    assert_eq!(
        tokens.iter().map(|t| t.kind).collect::<Vec<_>>(),
        vec![TokenKind::Identifier, TokenKind::EndOfInput]
    );
    let first = diagnostics.first().expect("a diagnostic");
    assert_eq!(first.kind, DiagnosticKind::ExpectedCharacter);
    assert_eq!(first.to_string(), "Expected Character: '=' (after '!')");
}

#[test]
fn positions_track_lines_and_columns() {
    let (tokens, _) = lex("script.tl", "a\n  bc");

    let bc = &tokens[1];
    assert_eq!(bc.span.start.index, 4);
    assert_eq!(bc.span.start.line, 1);
    assert_eq!(bc.span.start.column, 2);
    assert_eq!(bc.span.end.index, 6);
    assert_eq!(&*bc.span.start.source_name, "script.tl");
    assert_eq!(bc.span.start.to_string(), "script.tl:2:3");
}

#[test]
fn whitespace_and_control_characters_are_skipped() {
    assert_eq!(kinds(" \t\r\n1\u{0}"), vec![TokenKind::Number, TokenKind::EndOfInput]);
}

#[test]
fn empty_source_is_just_end_of_input() {
    assert_eq!(kinds(""), vec![TokenKind::EndOfInput]);
}

#[rstest]
#[case("42", "Number: 42 => (42)")]
#[case("2.5", "Number: 2.5 => (2.5)")]
#[case("if", "Keyword: if => (If)")]
#[case("+", "Plus: +")]
#[case("name", "Identifier: name")]
fn token_rendering(#[case] source: &str, #[case] expected: &str) {
    let (tokens, _) = lex("<test>", source);
    assert_eq!(tokens[0].to_string(), expected);
}
