use ariadne::{Color, Config, Fmt, Label, Report, ReportKind, Source};
use std::fmt;
use std::io;
use std::ops::Range;
use std::rc::Rc;

/// A cursor into the source text. `index` counts characters, `line` and
/// `column` are zero-based.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub index: usize,
    pub line: usize,
    pub column: usize,
    pub source_name: Rc<str>,
}

impl Position {
    pub fn start(source_name: Rc<str>) -> Self {
        Self {
            index: 0,
            line: 0,
            column: 0,
            source_name,
        }
    }

    /// Move past `current`. A newline resets the column and bumps the line.
    pub fn advance(&mut self, current: char) {
        self.index += 1;
        self.column += 1;

        if current == '\n' {
            self.line += 1;
            self.column = 0;
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::start(Rc::from(""))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}:{}", self.source_name, self.line + 1, self.column + 1)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Span covering a single character starting at `pos`.
    pub fn single(pos: &Position) -> Self {
        let mut end = pos.clone();
        end.index += 1;
        end.column += 1;
        Self {
            start: pos.clone(),
            end,
        }
    }

    /// Span from the start of `self` to the end of `other`.
    pub fn to(&self, other: &Span) -> Span {
        Span::new(self.start.clone(), other.end.clone())
    }

    /// Character range for a report label, kept inside a source of
    /// `source_len` characters. A span at end of input points at the last
    /// character.
    pub fn range(&self, source_len: usize) -> Range<usize> {
        if source_len == 0 {
            return 0..0;
        }
        let start = self.start.index.min(source_len - 1);
        let end = self.end.index.min(source_len).max(start + 1);
        start..end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    IllegalCharacter,
    ExpectedCharacter,
    ExpectedToken,
    RuntimeError,
}

impl DiagnosticKind {
    fn color(self) -> Color {
        match self {
            DiagnosticKind::IllegalCharacter | DiagnosticKind::ExpectedCharacter => Color::Red,
            DiagnosticKind::ExpectedToken => Color::Yellow,
            DiagnosticKind::RuntimeError => Color::Magenta,
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            DiagnosticKind::IllegalCharacter => "Illegal Character",
            DiagnosticKind::ExpectedCharacter => "Expected Character",
            DiagnosticKind::ExpectedToken => "Expected Token",
            DiagnosticKind::RuntimeError => "Runtime Error",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub span: Span,
    pub message: String,
    /// Trace of the enclosing evaluation scopes, e.g. `IfStatement`. Empty at
    /// top level and for lexer/parser diagnostics.
    pub context: String,
    pub help: Option<String>,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, span: Span, message: String) -> Self {
        Self {
            kind,
            span,
            message,
            context: String::new(),
            help: None,
        }
    }

    pub fn illegal_character(span: Span, message: String) -> Self {
        Self::new(DiagnosticKind::IllegalCharacter, span, message)
    }

    pub fn expected_character(span: Span, message: String) -> Self {
        Self::new(DiagnosticKind::ExpectedCharacter, span, message)
    }

    pub fn expected_token(span: Span, message: String) -> Self {
        Self::new(DiagnosticKind::ExpectedToken, span, message)
    }

    pub fn runtime_error(span: Span, message: String, context: String) -> Self {
        Self {
            context,
            ..Self::new(DiagnosticKind::RuntimeError, span, message)
        }
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Render the diagnostic against `source` on stderr.
    pub fn report(&self, source: &str, color: bool) -> io::Result<()> {
        let filename: &str = &self.span.start.source_name;
        let paint = self.kind.color();
        let range = self.span.range(source.chars().count());

        let title = if color {
            format!("{}: {}", self.kind.fg(paint), self.message)
        } else {
            format!("{}: {}", self.kind, self.message)
        };

        let mut builder = Report::build(ReportKind::Error, filename, range.start)
            .with_config(Config::default().with_color(color))
            .with_message(title)
            .with_label(
                Label::new((filename, range))
                    .with_message(&self.message)
                    .with_color(paint),
            );

        if !self.context.is_empty() {
            builder = builder.with_note(format!("Context -> {}", self.context));
        }

        if let Some(ref help_text) = self.help {
            builder = builder.with_help(help_text);
        }

        builder.finish().eprint((filename, Source::from(source)))
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)?;
        if !self.context.is_empty() {
            write!(f, "\nContext -> {}", self.context)?;
        }
        Ok(())
    }
}

impl std::error::Error for Diagnostic {}

/// Append-only, time-ordered collection of diagnostics shared by every stage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.items.push(diagnostic);
    }

    /// First recorded diagnostic, if any.
    pub fn first(&self) -> Option<&Diagnostic> {
        self.items.first()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.items.iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
