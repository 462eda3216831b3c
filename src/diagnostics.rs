//! Non-fatal problems found while parsing or normalizing.
//!
//! Malformed input never aborts the pipeline. Each problem is recorded as a
//! [`Diagnostic`] and returned next to the result it affected. Every diagnostic is
//! also emitted as a `tracing` warning when it is pushed.

use serde::Serialize;
use std::fmt;
use tracing::warn;

/// Category of a recoverable problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DiagnosticKind {
    /// A record had no recognized fields, or a row mapped to nothing.
    MalformedRecord,
    /// A field needed by a computation is absent from every record.
    MissingField,
    /// A numeric field (year, citation count, reference count) was not a number.
    NumericCoercionFailure,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DiagnosticKind::MalformedRecord => "malformed record",
            DiagnosticKind::MissingField => "missing field",
            DiagnosticKind::NumericCoercionFailure => "numeric coercion failure",
        };
        f.write_str(label)
    }
}

/// A single recoverable problem with its location, when known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// Zero-based index of the affected record.
    pub record: Option<usize>,
    /// One-based line number in the source text.
    pub line: Option<usize>,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            record: None,
            line: None,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn at_record(mut self, record: usize) -> Self {
        self.record = Some(record);
        self
    }

    #[must_use]
    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(record) = self.record {
            write!(f, " (record {})", record)?;
        }
        if let Some(line) = self.line {
            write!(f, " (line {})", line)?;
        }
        write!(f, ": {}", self.message)
    }
}

/// Ordered collection of diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic and log it.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        warn!(
            kind = %diagnostic.kind,
            record = ?diagnostic.record,
            line = ?diagnostic.line,
            "{}",
            diagnostic.message
        );
        self.entries.push(diagnostic);
    }

    /// Append already-logged diagnostics from another collection.
    pub fn extend(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    /// Number of diagnostics of the given kind.
    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.entries.iter().filter(|d| d.kind == kind).count()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
