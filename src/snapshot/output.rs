//! Output sinks for manager text
//!
//! Everything the process manager says goes through an [`OutputSink`] as a
//! tagged [`OutputLine`]. [`ConsoleSink`] prints it; [`Transcript`] keeps it
//! in memory for tests and the TUI output pane.

use crossterm::style::Stylize;
use std::io::{self, Write};

/// Category of a line of manager output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Per-instruction and scheduling trace
    Trace,
    /// A local error; the run continues
    Diagnostic,
    /// Print snapshot and turnaround summary
    Report,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLine {
    pub kind: LineKind,
    pub text: String,
}

impl OutputLine {
    pub fn new(kind: LineKind, text: impl Into<String>) -> Self {
        OutputLine {
            kind,
            text: text.into(),
        }
    }
}

/// Consumer of manager output
pub trait OutputSink {
    fn emit(&mut self, line: OutputLine);

    /// Emit several lines as one unit, such as a whole Print report
    fn emit_all(&mut self, lines: Vec<OutputLine>) {
        for line in lines {
            self.emit(line);
        }
    }

    fn trace(&mut self, text: String) {
        self.emit(OutputLine::new(LineKind::Trace, text));
    }

    fn diagnostic(&mut self, text: String) {
        self.emit(OutputLine::new(LineKind::Diagnostic, text));
    }

    fn report(&mut self, text: String) {
        self.emit(OutputLine::new(LineKind::Report, text));
    }
}

/// Writes output lines to a stream, optionally coloured
pub struct ConsoleSink<W: Write> {
    out: W,
    color: bool,
    show_trace: bool,
}

impl ConsoleSink<io::Stdout> {
    pub fn stdout(color: bool, show_trace: bool) -> Self {
        ConsoleSink::new(io::stdout(), color, show_trace)
    }
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(out: W, color: bool, show_trace: bool) -> Self {
        ConsoleSink {
            out,
            color,
            show_trace,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ConsoleSink<W> {
    /// Rendered text of a line including its newline, or `None` if hidden
    fn render(&self, line: &OutputLine) -> Option<String> {
        let text = match (line.kind, self.color) {
            (LineKind::Trace, _) if !self.show_trace => return None,
            (LineKind::Diagnostic, true) => format!("error: {}", line.text).red().to_string(),
            (LineKind::Diagnostic, false) => format!("error: {}", line.text),
            (LineKind::Trace, true) => line.text.as_str().dim().to_string(),
            _ => line.text.clone(),
        };
        Some(text + "\n")
    }

    fn write_text(&mut self, text: &str) {
        // A closed stdout is not worth aborting the simulation over
        let _ = self.out.write_all(text.as_bytes());
        let _ = self.out.flush();
    }
}

impl<W: Write> OutputSink for ConsoleSink<W> {
    fn emit(&mut self, line: OutputLine) {
        if let Some(text) = self.render(&line) {
            self.write_text(&text);
        }
    }

    /// Writes the lines with a single `write_all`; on stdout that holds the
    /// stream lock for the whole block
    fn emit_all(&mut self, lines: Vec<OutputLine>) {
        let text: String = lines.iter().filter_map(|line| self.render(line)).collect();
        if !text.is_empty() {
            self.write_text(&text);
        }
    }
}

/// In-memory record of manager output
///
/// With a limit set, the oldest lines are dropped once it is exceeded.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    pub lines: Vec<OutputLine>,
    limit: Option<usize>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transcript keeping at most `limit` of the most recent lines
    pub fn with_limit(limit: usize) -> Self {
        Transcript {
            lines: Vec::new(),
            limit: Some(limit),
        }
    }

    /// Text of every line, in order
    pub fn texts(&self) -> Vec<&str> {
        self.lines.iter().map(|l| l.text.as_str()).collect()
    }

    /// Text of lines of one kind
    pub fn of_kind(&self, kind: LineKind) -> Vec<&str> {
        self.lines
            .iter()
            .filter(|l| l.kind == kind)
            .map(|l| l.text.as_str())
            .collect()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|l| l.text.contains(needle))
    }
}

impl OutputSink for Transcript {
    fn emit(&mut self, line: OutputLine) {
        self.lines.push(line);
        if let Some(limit) = self.limit {
            if self.lines.len() > limit {
                let excess = self.lines.len() - limit;
                self.lines.drain(..excess);
            }
        }
    }
}
