use crate::ast::{BinaryOp, Node, Program, UnaryOp};
use crate::error::{Diagnostic, Diagnostics, Span};
use crate::lexer::{Keyword, Token, TokenKind};
use tracing::{debug, trace};

/// Recursive-descent parser. Syntax errors are recorded and replaced by
/// placeholder tokens or `Node::Errored`, so one pass reports every
/// independent defect.
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
    diagnostics: Diagnostics,
    /// The caller handed over no tokens at all, not even `EndOfInput`.
    no_input: bool,
}

impl Parser {
    /// `diagnostics` carries whatever the lexer already reported; parser
    /// diagnostics are appended after them. A token sequence that does not
    /// end in `EndOfInput` gets one appended.
    pub fn new(mut tokens: Vec<Token>, diagnostics: Diagnostics) -> Self {
        let no_input = tokens.is_empty();

        match tokens.last() {
            Some(last) if last.kind == TokenKind::EndOfInput => {}
            last => {
                let span = last.map_or_else(Span::default, |token| Span::single(&token.span.end));
                trace!("appending missing end of input");
                tokens.push(Token::new(TokenKind::EndOfInput, String::new(), span));
            }
        }

        Self {
            tokens,
            current: 0,
            diagnostics,
            no_input,
        }
    }

    pub fn parse(mut self) -> (Program, Diagnostics) {
        if self.no_input {
            let statements = vec![Node::Errored {
                span: Span::default(),
            }];
            return (Program { statements }, self.diagnostics);
        }

        let mut statements = Vec::new();
        while !self.is_at_end() {
            statements.push(self.statement_with_progress());
        }

        debug!(
            statements = statements.len(),
            diagnostics = self.diagnostics.len(),
            "parsed program"
        );
        (Program { statements }, self.diagnostics)
    }

    /// Parse a statement and make sure at least one token was consumed, so a
    /// token no rule accepts cannot stall the enclosing loop.
    fn statement_with_progress(&mut self) -> Node {
        let before = self.current;
        let statement = self.statement();
        if self.current == before {
            self.advance();
        }
        statement
    }

    fn statement(&mut self) -> Node {
        if self.check_keyword(Keyword::Break) {
            let token = self.advance().clone();
            self.match_token(TokenKind::Semicolon, "';' after 'break'");
            trace!("parsed break");
            return Node::Break { span: token.span };
        }

        if self.check_keyword(Keyword::Continue) {
            let token = self.advance().clone();
            self.match_token(TokenKind::Semicolon, "';' after 'continue'");
            trace!("parsed continue");
            return Node::Continue { span: token.span };
        }

        let expr = self.expression();
        if expr.is_block() {
            self.match_types(&[TokenKind::Semicolon]);
        } else {
            self.match_token_with_help(
                TokenKind::Semicolon,
                "';' after expression",
                "Every statement must end with ';'. Example: declare x = 1;",
            );
        }
        trace!(span = %expr.span().start, "parsed statement");
        expr
    }

    fn expression(&mut self) -> Node {
        if self.check_keyword(Keyword::Declare) {
            let declare = self.advance().clone();
            let name = self.match_token_with_help(
                TokenKind::Identifier,
                "variable name after 'declare'",
                "Declarations take the form: declare name = expression;",
            );
            self.match_token_with_help(
                TokenKind::Equal,
                "'=' after variable name",
                "Declarations take the form: declare name = expression;",
            );
            let value = self.expression();
            let span = declare.span.to(value.span());

            return Node::VarDeclare {
                name,
                value: Box::new(value),
                span,
            };
        }

        self.logical()
    }

    fn logical(&mut self) -> Node {
        self.binary_level(Self::comparison, |token| match token.keyword() {
            Some(Keyword::And) => Some(BinaryOp::And),
            Some(Keyword::Or) => Some(BinaryOp::Or),
            _ => None,
        })
    }

    fn comparison(&mut self) -> Node {
        if self.check_keyword(Keyword::Not) {
            let not = self.advance().clone();
            let operand = self.comparison();
            let span = not.span.to(operand.span());

            return Node::Unary {
                operator: UnaryOp::Not,
                operand: Box::new(operand),
                span,
            };
        }

        self.binary_level(Self::term, |token| match token.kind {
            TokenKind::EqualEqual => Some(BinaryOp::Equal),
            TokenKind::BangEqual => Some(BinaryOp::NotEqual),
            TokenKind::Less => Some(BinaryOp::Less),
            TokenKind::Greater => Some(BinaryOp::Greater),
            TokenKind::LessEqual => Some(BinaryOp::LessEqual),
            TokenKind::GreaterEqual => Some(BinaryOp::GreaterEqual),
            _ => None,
        })
    }

    fn term(&mut self) -> Node {
        self.binary_level(Self::factor, |token| match token.kind {
            TokenKind::Plus => Some(BinaryOp::Add),
            TokenKind::Minus => Some(BinaryOp::Subtract),
            _ => None,
        })
    }

    fn factor(&mut self) -> Node {
        self.binary_level(Self::power, |token| match token.kind {
            TokenKind::Star => Some(BinaryOp::Multiply),
            TokenKind::Slash => Some(BinaryOp::Divide),
            _ => None,
        })
    }

    /// `^` binds tightest and folds to the left: `2 ^ 3 ^ 2` is `(2 ^ 3) ^ 2`.
    fn power(&mut self) -> Node {
        self.binary_level(Self::primary, |token| match token.kind {
            TokenKind::Caret => Some(BinaryOp::Power),
            _ => None,
        })
    }

    /// Left-associative fold: `left = Binary(left, op, right)` while the
    /// lookahead is an operator of this precedence level.
    fn binary_level(
        &mut self,
        operand: fn(&mut Self) -> Node,
        operator_of: fn(&Token) -> Option<BinaryOp>,
    ) -> Node {
        let mut left = operand(self);

        while let Some(operator) = operator_of(self.peek()) {
            self.advance();
            let right = operand(self);
            let span = left.span().to(right.span());

            left = Node::Binary {
                left: Box::new(left),
                operator,
                right: Box::new(right),
                span,
            };
        }

        left
    }

    fn primary(&mut self) -> Node {
        let token = self.peek().clone();

        match token.kind {
            TokenKind::LeftParen => {
                self.advance();
                let expr = self.expression();
                let close = self.match_token_with_help(
                    TokenKind::RightParen,
                    "')' after expression",
                    "Every opening parenthesis '(' must have a matching closing parenthesis ')'.",
                );
                Node::Parenthesized {
                    expr: Box::new(expr),
                    span: token.span.to(&close.span),
                }
            }
            TokenKind::Identifier => {
                self.advance();
                Node::VarAccess { name: token }
            }
            TokenKind::Number => {
                self.advance();
                Node::Literal { token }
            }
            TokenKind::Plus | TokenKind::Minus => {
                self.advance();
                let operator = if token.kind == TokenKind::Plus {
                    UnaryOp::Plus
                } else {
                    UnaryOp::Negate
                };
                let operand = self.factor();
                let span = token.span.to(operand.span());

                Node::Unary {
                    operator,
                    operand: Box::new(operand),
                    span,
                }
            }
            TokenKind::Keyword if token.is_keyword(Keyword::If) => {
                self.advance();
                let (condition, body, span) = self.conditional_block(&token);
                Node::If {
                    condition: Box::new(condition),
                    body,
                    span,
                }
            }
            TokenKind::Keyword if token.is_keyword(Keyword::While) => {
                self.advance();
                let (condition, body, span) = self.conditional_block(&token);
                Node::While {
                    condition: Box::new(condition),
                    body,
                    span,
                }
            }
            _ => {
                let help = match token.kind {
                    TokenKind::RightParen => "Found ')' without matching '('. Check for unbalanced parentheses.",
                    TokenKind::RightBrace => "Found '}' without matching '{'. Check for unbalanced braces.",
                    TokenKind::EndOfInput => "Reached end of input while expecting an expression.",
                    _ => "Expected a number, variable, parenthesized expression, 'if' or 'while' here.",
                };
                self.diagnostics.push(
                    Diagnostic::expected_token(
                        token.span.clone(),
                        format!("Expected expression, found {}", describe(&token)),
                    )
                    .with_help(help),
                );

                // Statement and block terminators are left for the enclosing
                // rule to consume.
                if !matches!(
                    token.kind,
                    TokenKind::Semicolon | TokenKind::RightBrace | TokenKind::EndOfInput
                ) {
                    self.advance();
                }
                Node::Errored { span: token.span }
            }
        }
    }

    /// Shared tail of `if` and `while`: `'(' expression ')' '{' statement* '}'`.
    fn conditional_block(&mut self, keyword: &Token) -> (Node, Vec<Node>, Span) {
        let construct = keyword.text.as_str();

        self.match_token_with_help(
            TokenKind::LeftParen,
            &format!("'(' after '{}'", construct),
            &format!("The condition must be parenthesized: {} (condition) {{ ... }}", construct),
        );
        let condition = self.expression();
        self.match_token_with_help(
            TokenKind::RightParen,
            &format!("')' after {} condition", construct),
            &format!("The condition must be parenthesized: {} (condition) {{ ... }}", construct),
        );
        self.match_token(TokenKind::LeftBrace, &format!("'{{' before {} body", construct));

        let mut body = Vec::new();
        while !self.check(TokenKind::RightBrace) && !self.is_at_end() {
            body.push(self.statement_with_progress());
        }

        let close = self.match_token_with_help(
            TokenKind::RightBrace,
            "'}' after block",
            "Block statements must be closed with '}' after the opening '{'.",
        );

        (condition, body, keyword.span.to(&close.span))
    }

    fn match_types(&mut self, kinds: &[TokenKind]) -> bool {
        for &kind in kinds {
            if self.check(kind) {
                self.advance();
                return true;
            }
        }
        false
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    fn check_keyword(&self, keyword: Keyword) -> bool {
        self.peek().is_keyword(keyword)
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.tokens.len() || self.peek().kind == TokenKind::EndOfInput
    }

    /// Token `offset` places ahead. Peeking past the end yields the trailing
    /// `EndOfInput`.
    pub fn peek_at(&self, offset: usize) -> &Token {
        let index = (self.current + offset).min(self.tokens.len() - 1);
        &self.tokens[index]
    }

    fn peek(&self) -> &Token {
        self.peek_at(0)
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current.saturating_sub(1)]
    }

    /// Consume a token of `kind`, or record an "expected token" diagnostic and
    /// return a placeholder without consuming anything.
    fn match_token(&mut self, kind: TokenKind, expected: &str) -> Token {
        if self.check(kind) {
            return self.advance().clone();
        }

        let found = self.peek().clone();
        self.diagnostics.push(Diagnostic::expected_token(
            found.span.clone(),
            format!("Expected {}, found {}", expected, describe(&found)),
        ));
        Token::new(kind, String::new(), found.span)
    }

    fn match_token_with_help(&mut self, kind: TokenKind, expected: &str, help: &str) -> Token {
        if self.check(kind) {
            return self.advance().clone();
        }

        let found = self.peek().clone();
        self.diagnostics.push(
            Diagnostic::expected_token(
                found.span.clone(),
                format!("Expected {}, found {}", expected, describe(&found)),
            )
            .with_help(help),
        );
        Token::new(kind, String::new(), found.span)
    }
}

fn describe(token: &Token) -> String {
    match token.kind {
        TokenKind::EndOfInput => "end of input".to_string(),
        _ => format!("'{}'", token.text),
    }
}

/// Parse `tokens`, appending to the diagnostics the lexer produced.
pub fn parse(tokens: Vec<Token>, diagnostics: Diagnostics) -> (Program, Diagnostics) {
    Parser::new(tokens, diagnostics).parse()
}
