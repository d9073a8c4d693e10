use crate::error::{Diagnostic, Diagnostics, Position, Span};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // Single-character tokens
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    Comma,
    Semicolon,
    Slash,
    Star,
    Caret,

    // One or two character tokens
    Plus,
    PlusPlus,
    Minus,
    MinusMinus,
    Equal,
    EqualEqual,
    Arrow,
    BangEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,

    // Literals
    Identifier,
    Number,
    Keyword,

    // Special
    EndOfInput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Declare,
    If,
    While,
    Break,
    Continue,
    And,
    Or,
    Not,
}

impl Keyword {
    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::Declare => "declare",
            Keyword::If => "if",
            Keyword::While => "while",
            Keyword::Break => "break",
            Keyword::Continue => "continue",
            Keyword::And => "and",
            Keyword::Or => "or",
            Keyword::Not => "not",
        }
    }
}

/// Payload carried by numeric literals and keywords.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Keyword(Keyword),
}

impl Literal {
    /// Numeric payload as the evaluator's number representation.
    pub fn as_number(self) -> Option<f64> {
        match self {
            Literal::Int(n) => Some(n as f64),
            Literal::Float(n) => Some(n),
            Literal::Keyword(_) => None,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Literal::Int(n) => write!(f, "{}", n),
            Literal::Float(n) => write!(f, "{}", n),
            Literal::Keyword(k) => write!(f, "{:?}", k),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub literal: Option<Literal>,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, text: String, span: Span) -> Self {
        Self {
            kind,
            text,
            literal: None,
            span,
        }
    }

    pub fn with_literal(kind: TokenKind, text: String, literal: Literal, span: Span) -> Self {
        Self {
            kind,
            text,
            literal: Some(literal),
            span,
        }
    }

    pub fn keyword(&self) -> Option<Keyword> {
        match self.literal {
            Some(Literal::Keyword(k)) if self.kind == TokenKind::Keyword => Some(k),
            _ => None,
        }
    }

    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        self.keyword() == Some(keyword)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.literal {
            Some(literal) => write!(f, "{:?}: {} => ({})", self.kind, self.text, literal),
            None => write!(f, "{:?}: {}", self.kind, self.text),
        }
    }
}

pub struct Lexer {
    chars: Vec<char>,
    position: Position,
    tokens: Vec<Token>,
    diagnostics: Diagnostics,
    keywords: HashMap<&'static str, Keyword>,
}

impl Lexer {
    pub fn new(source_name: &str, source: &str) -> Self {
        let keywords = [
            Keyword::Declare,
            Keyword::If,
            Keyword::While,
            Keyword::Break,
            Keyword::Continue,
            Keyword::And,
            Keyword::Or,
            Keyword::Not,
        ]
        .into_iter()
        .map(|k| (k.as_str(), k))
        .collect();

        Self {
            chars: source.chars().collect(),
            position: Position::start(Rc::from(source_name)),
            tokens: Vec::new(),
            diagnostics: Diagnostics::new(),
            keywords,
        }
    }

    /// Scan the whole input. Always yields a token sequence terminated by
    /// `EndOfInput`; defects are recorded and scanning carries on.
    pub fn scan_tokens(mut self) -> (Vec<Token>, Diagnostics) {
        while let Some(c) = self.peek() {
            self.scan_token(c);
        }

        self.tokens.push(Token::new(
            TokenKind::EndOfInput,
            String::new(),
            Span::single(&self.position),
        ));

        debug!(
            tokens = self.tokens.len(),
            diagnostics = self.diagnostics.len(),
            "lexed source"
        );
        (self.tokens, self.diagnostics)
    }

    fn scan_token(&mut self, c: char) {
        let start = self.position.clone();

        match c {
            c if c.is_whitespace() || c.is_control() => {
                self.advance();
            }
            c if c.is_ascii_digit() => self.number(start),
            c if c.is_alphabetic() => self.identifier(start),
            '(' => self.single(TokenKind::LeftParen, start),
            ')' => self.single(TokenKind::RightParen, start),
            '{' => self.single(TokenKind::LeftBrace, start),
            '}' => self.single(TokenKind::RightBrace, start),
            ',' => self.single(TokenKind::Comma, start),
            ';' => self.single(TokenKind::Semicolon, start),
            '*' => self.single(TokenKind::Star, start),
            '/' => self.single(TokenKind::Slash, start),
            '^' => self.single(TokenKind::Caret, start),
            '+' => self.one_or_two(start, TokenKind::Plus, &[('+', TokenKind::PlusPlus)]),
            '-' => self.one_or_two(start, TokenKind::Minus, &[('-', TokenKind::MinusMinus)]),
            '=' => self.one_or_two(
                start,
                TokenKind::Equal,
                &[('=', TokenKind::EqualEqual), ('>', TokenKind::Arrow)],
            ),
            '<' => self.one_or_two(start, TokenKind::Less, &[('=', TokenKind::LessEqual)]),
            '>' => self.one_or_two(start, TokenKind::Greater, &[('=', TokenKind::GreaterEqual)]),
            '!' => {
                self.advance();
                if self.match_char('=') {
                    self.add_token(TokenKind::BangEqual, start);
                } else {
                    self.diagnostics.push(
                        Diagnostic::expected_character(
                            Span::new(start, self.position.clone()),
                            "'=' (after '!')".to_string(),
                        )
                        .with_help("Use '!=' for inequality or 'not' for negation."),
                    );
                }
            }
            _ => {
                self.advance();
                self.diagnostics.push(Diagnostic::illegal_character(
                    Span::new(start, self.position.clone()),
                    format!("'{}'", c),
                ));
            }
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.position.index).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.position.advance(c);
        Some(c)
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn single(&mut self, kind: TokenKind, start: Position) {
        self.advance();
        self.add_token(kind, start);
    }

    /// Maximal munch over a one-character prefix and its two-character
    /// extensions.
    fn one_or_two(&mut self, start: Position, single: TokenKind, doubles: &[(char, TokenKind)]) {
        self.advance();
        let kind = doubles
            .iter()
            .find(|(second, _)| self.peek() == Some(*second))
            .map(|&(_, kind)| kind);

        match kind {
            Some(kind) => {
                self.advance();
                self.add_token(kind, start);
            }
            None => self.add_token(single, start),
        }
    }

    fn number(&mut self, start: Position) {
        let mut dots = 0;

        while let Some(c) = self.peek() {
            if c == '.' {
                if dots == 1 {
                    break;
                }
                dots += 1;
            } else if !c.is_ascii_digit() {
                break;
            }
            self.advance();
        }

        let text = self.text_from(&start);
        let literal = if dots == 1 {
            Literal::Float(text.parse::<f64>().unwrap_or(0.0))
        } else {
            match text.parse::<i64>() {
                Ok(n) => Literal::Int(n),
                // Too wide for an integer; numbers are floats at runtime anyway.
                Err(_) => Literal::Float(text.parse::<f64>().unwrap_or(f64::INFINITY)),
            }
        };

        let span = Span::new(start, self.position.clone());
        self.push(Token::with_literal(TokenKind::Number, text, literal, span));
    }

    fn identifier(&mut self, start: Position) {
        while self.peek().is_some_and(|c| c.is_alphanumeric()) {
            self.advance();
        }

        let text = self.text_from(&start);
        let span = Span::new(start, self.position.clone());
        let token = match self.keywords.get(text.as_str()) {
            Some(&keyword) => Token::with_literal(
                TokenKind::Keyword,
                text,
                Literal::Keyword(keyword),
                span,
            ),
            None => Token::new(TokenKind::Identifier, text, span),
        };
        self.push(token);
    }

    fn text_from(&self, start: &Position) -> String {
        self.chars[start.index..self.position.index].iter().collect()
    }

    fn add_token(&mut self, kind: TokenKind, start: Position) {
        let text = self.text_from(&start);
        let span = Span::new(start, self.position.clone());
        self.push(Token::new(kind, text, span));
    }

    fn push(&mut self, token: Token) {
        trace!(token = %token, "scanned token");
        self.tokens.push(token);
    }
}

/// Convenience wrapper: scan `source` named `source_name`.
pub fn lex(source_name: &str, source: &str) -> (Vec<Token>, Diagnostics) {
    Lexer::new(source_name, source).scan_tokens()
}
