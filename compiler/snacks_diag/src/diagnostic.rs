use snacks_common::source::{SourceFile, SourceMap, Span};
use snacks_print::ansi::{BLUE, MAGENTA, RED, RESET, YELLOW};

use std::io;

/// A diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub level: Level,
    pub message: String,
    pub span: Span,
    pub span_note: Option<String>,
    pub notes: Vec<(String, Span)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Error,
    Warning,
}

impl Diagnostic {
    pub fn new(level: Level, message: String, span: Span) -> Self {
        Self {
            level,
            message,
            span,
            span_note: None,
            notes: Vec::new(),
        }
    }

    pub fn error<S: ToString>(message: S, span: Span) -> Self {
        Self::new(Level::Error, message.to_string(), span)
    }

    pub fn warning<S: ToString>(message: S, span: Span) -> Self {
        Self::new(Level::Warning, message.to_string(), span)
    }

    pub fn is_error(&self) -> bool {
        self.level == Level::Error
    }

    pub fn with_inline_note<S: ToString>(mut self, message: S) -> Self {
        self.span_note = Some(message.to_string());
        self
    }

    pub fn with_note<S: ToString>(mut self, message: S, span: Span) -> Self {
        self.notes.push((message.to_string(), span));
        self
    }

    /// Attaches a span unless the diagnostic already points somewhere.
    pub fn with_span(mut self, span: Span) -> Self {
        if self.span.is_invalid() {
            self.span = span;
        }
        self
    }

    /// Renders the diagnostic to the output stream.
    pub fn render<Output: io::Write>(
        &self,
        out: &mut Output,
        source_map: &SourceMap,
    ) -> io::Result<()> {
        let (label, color) = match self.level {
            Level::Error => ("error", RED),
            Level::Warning => ("warning", YELLOW),
        };
        writeln!(out, "{color}{label}: {}{RESET}", self.message)?;

        let Some(source) = source_map.get(self.span.source_id) else {
            return Ok(());
        };
        let (line, col) = source.line_and_column(self.span.start);
        writeln!(out, "  {}:{}:{}", source.name(), line, col)?;
        format_code_snippet(out, &self.span, source, Some((self.marker_style(), col, color)))?;

        for (message, span) in &self.notes {
            let Some(source) = source_map.get(span.source_id) else {
                writeln!(out, "{MAGENTA}note: {message}{RESET}")?;
                continue;
            };
            let (_, col) = source.line_and_column(span.start);
            let marker = Some((MarkerStyle::SpanWithNote('^', message), col, MAGENTA));
            format_code_snippet(out, span, source, marker)?;
        }
        Ok(())
    }

    fn marker_style(&self) -> MarkerStyle<'_> {
        match self.span_note {
            Some(ref note) if self.span.len() <= 1 => MarkerStyle::SingleWithNote('^', note),
            Some(ref note) => MarkerStyle::SpanWithNote('^', note),
            None => MarkerStyle::Span('^'),
        }
    }
}

enum MarkerStyle<'a> {
    /// A single character with an inline note.
    ///
    /// Example:
    ///    one two three
    ///    ^ note
    SingleWithNote(char, &'a str),

    /// A character repeated for the length of the span.
    ///
    /// Example:
    ///    one two three
    ///    ^^^^^^^^^^^^^
    Span(char),

    /// A character repeated for the length of the span with an inline note.
    SpanWithNote(char, &'a str),
}

fn format_code_snippet<Output: io::Write>(
    out: &mut Output,
    span: &Span,
    source: &SourceFile,
    marker: Option<(MarkerStyle, usize /* col */, &str /* color */)>,
) -> io::Result<()> {
    let margin = 4;
    let sep = format!("{BLUE}|{RESET}");

    let lines = source.lines_for_span(span);
    writeln!(out, " {:>margin$} {sep}", "")?;
    for (i, line) in lines.iter() {
        writeln!(out, " {:>margin$} {sep} {}", i, line)?;
    }

    let Some((style, col, color)) = marker else {
        return Ok(());
    };
    if lines.len() > 1 {
        return Ok(());
    }

    let width = span.len().max(1);
    let marker = match style {
        MarkerStyle::SingleWithNote(c, note) => format!("{color}{c} {note}"),
        MarkerStyle::Span(c) => format!("{color}{}", c.to_string().repeat(width)),
        MarkerStyle::SpanWithNote(c, note) => {
            format!("{color}{} {note}", c.to_string().repeat(width))
        }
    };
    writeln!(
        out,
        " {:>margin$} {sep} {:>col$}{}{RESET}",
        "",
        "",
        marker,
        col = col.saturating_sub(1)
    )
}
