//! Diagnostics and reporter sinks.

use std::io::{self, Write};

use serde::Serialize;

use crate::messages::Message;

/// Severity class of a diagnostic, derived from the message id category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Convention,
    Refactor,
    Info,
}

impl Severity {
    /// Category character of a message id to its severity.
    pub fn from_message_id(id: &str) -> Self {
        match id.chars().next() {
            Some('E') => Severity::Error,
            Some('W') => Severity::Warning,
            Some('C') => Severity::Convention,
            Some('R') => Severity::Refactor,
            _ => Severity::Info,
        }
    }
}

/// One positioned, fully rendered diagnostic.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    /// Source file the diagnostic belongs to.
    pub path: String,
    /// Line in the original file (1-indexed; 0 for file-level messages).
    pub line: u32,
    /// Column in the original file.
    pub column: u32,
    pub severity: Severity,
    pub message_id: String,
    pub message_name: String,
    /// Interpolated message text.
    pub text: String,
}

impl Diagnostic {
    pub fn new(message: &Message, path: String, line: u32, column: u32, text: String) -> Self {
        Self {
            path,
            line,
            column,
            severity: Severity::from_message_id(&message.id),
            message_id: message.id.clone(),
            message_name: message.name.clone(),
            text,
        }
    }
}

/// Sink for diagnostics. Side effect only; the engine never consumes a
/// return value from it.
pub trait Reporter {
    fn emit(&mut self, diagnostic: &Diagnostic);
}

/// Text reporter printing `file:line:column: text (name)` lines, with a
/// section header once per contiguous run of diagnostics for one file.
/// Emission order is traversal order; no sorting happens here.
pub struct TextReporter<W: Write> {
    out: W,
    current_file: Option<String>,
}

impl TextReporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TextReporter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            current_file: None,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write(&mut self, diagnostic: &Diagnostic) -> io::Result<()> {
        if self.current_file.as_deref() != Some(diagnostic.path.as_str()) {
            self.current_file = Some(diagnostic.path.clone());
            writeln!(self.out, "************* {}", diagnostic.path)?;
        }
        writeln!(
            self.out,
            "{}:{}:{}: {} ({})",
            diagnostic.path, diagnostic.line, diagnostic.column, diagnostic.text, diagnostic.message_name
        )
    }
}

impl<W: Write> Reporter for TextReporter<W> {
    fn emit(&mut self, diagnostic: &Diagnostic) {
        if let Err(error) = self.write(diagnostic) {
            tracing::warn!("failed to write diagnostic: {error}");
        }
    }
}

/// Reporter that keeps every diagnostic in memory. Backs the JSON output
/// and the test suites.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    pub diagnostics: Vec<Diagnostic>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of the collected diagnostics, in emission order.
    pub fn names(&self) -> Vec<&str> {
        self.diagnostics
            .iter()
            .map(|diagnostic| diagnostic.message_name.as_str())
            .collect()
    }
}

impl Reporter for CollectingReporter {
    fn emit(&mut self, diagnostic: &Diagnostic) {
        self.diagnostics.push(diagnostic.clone());
    }
}
