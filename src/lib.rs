//! Bibliometric analysis of tagged bibliographic exports.
//!
//! `bibmetrics` turns raw citation-database exports into typed records and derives
//! quantitative indicators from them: productivity and impact indices per author,
//! venue and country, co-occurrence networks, and emerging-topic bursts.
//!
//! # Pipeline
//!
//! - **Parsing**: the tagged-line export grammar (two-letter field tags, continuation
//!   lines, `ER`/`EF` markers) via [`WosParser`], or delimited tables via
//!   [`CsvParser`]. Both produce the same [`Record`] shape.
//! - **Normalization**: canonical author names, countries, institutions, keywords,
//!   venues and cited references ([`normalize::Normalizer`]).
//! - **Metrics**: H-index, G-index, Price's Law, per-entity aggregation
//!   ([`metrics`]).
//! - **Networks**: co-authorship, co-citation and keyword co-occurrence graphs
//!   ([`network`]).
//! - **Bursts**: windowed-ratio burst detection and trend classification
//!   ([`burst`]).
//!
//! # Basic Usage
//!
//! ```rust
//! use bibmetrics::{RecordParser, WosParser};
//!
//! let input = "FN Clarivate Analytics Web of Science
//! VR 1.0
//! PT J
//! AU Smith, J
//!    Johnson, A
//! TI Example Article
//! PY 2021
//! TC 12
//! ER
//! EF";
//!
//! let export = WosParser::new().parse(input).unwrap();
//! assert_eq!(export.records.len(), 1);
//! assert_eq!(export.records[0].authors, vec!["Smith, J", "Johnson, A"]);
//! assert_eq!(export.version.as_deref(), Some("1.0"));
//! ```
//!
//! # Full Analysis
//!
//! ```rust
//! use bibmetrics::{AnalysisConfig, Analyzer};
//!
//! let input = b"PT J
//! AU Smith, J
//!    Johnson, A
//! TI First
//! PY 2020
//! TC 10
//! ER
//! PT J
//! AU Smith, J
//! TI Second
//! PY 2021
//! TC 3
//! ER
//! EF";
//!
//! let analyzer = Analyzer::new(AnalysisConfig::default()).unwrap();
//! let report = analyzer.analyze_bytes(input).unwrap();
//! assert_eq!(report.impact.h_index, 2);
//! assert_eq!(report.networks.coauthorship.edge_count(), 1);
//! ```
//!
//! # Error Handling
//!
//! Only unreadable input is fatal ([`BiblioError::Decode`]). Everything else degrades
//! to a default value plus a [`Diagnostic`] returned next to the result, so callers
//! decide how to surface problems to their users.
//!
//! # Thread Safety
//!
//! Parsers, the normalizer and the analyzer hold no interior state and can be shared
//! between threads. With the `parallel` feature, per-record reductions are sharded
//! across rayon workers that each own a private partial map.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

pub mod burst;
pub mod config;
#[cfg(feature = "csv")]
pub mod csv;
pub mod diagnostics;
pub mod encoding;
pub mod metrics;
pub mod network;
pub mod normalize;
pub mod pipeline;
mod regex;
mod utils;
pub mod wos;

// Reexports
pub use config::AnalysisConfig;
#[cfg(feature = "csv")]
pub use csv::CsvParser;
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use encoding::TextEncoding;
pub use pipeline::{AnalysisReport, Analyzer};
pub use wos::WosParser;

/// A specialized Result type for bibliometric operations.
pub type Result<T> = std::result::Result<T, BiblioError>;

/// Fatal errors. Recoverable problems are reported as [`Diagnostic`]s instead.
#[derive(Error, Debug)]
pub enum BiblioError {
    #[error("Unable to decode input with any of: {}", format_encodings(.attempted))]
    Decode { attempted: Vec<TextEncoding> },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    InvalidFormat(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

fn format_encodings(encodings: &[TextEncoding]) -> String {
    if encodings.is_empty() {
        return "no encodings".to_string();
    }
    encodings
        .iter()
        .map(|e| e.label())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(feature = "csv")]
impl From<::csv::Error> for BiblioError {
    fn from(err: ::csv::Error) -> Self {
        BiblioError::InvalidFormat(err.to_string())
    }
}

/// How the raw strings in [`Record::authors`] are delimited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthorFormat {
    /// Each entry holds exactly one name, e.g. one `AU` line per author.
    #[default]
    OnePerEntry,
    /// Entries are multi-valued fields that still need splitting, e.g. a
    /// spreadsheet cell holding `Smith, J; Johnson, A`.
    Delimited,
}

/// A single bibliographic entry.
///
/// Created once by a parser and never mutated afterwards; every downstream
/// component works from this typed shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Accession number when the export carries one, otherwise a generated id.
    pub id: String,
    /// Raw author strings in export order.
    pub authors: Vec<String>,
    pub author_format: AuthorFormat,
    pub title: String,
    /// Publication venue (journal, proceedings or book series).
    pub venue: Option<String>,
    pub year: Option<i32>,
    /// Times cited; 0 when absent or unparseable.
    pub citations: u32,
    /// Raw author keyword fields.
    pub keywords: Vec<String>,
    /// Raw database-assigned keyword fields.
    pub keywords_plus: Vec<String>,
    /// Raw `[authors] address.` affiliation text.
    pub affiliation: Option<String>,
    /// Raw cited reference strings.
    pub references: Vec<String>,
    pub document_type: Option<String>,
    pub doi: Option<String>,
    /// Number of cited references as stated by the export.
    pub reference_count: Option<u32>,
    /// Recognized fields not covered above, keyed by tag.
    pub extra_fields: HashMap<String, Vec<String>>,
}

/// Result of parsing one export document.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ParsedExport {
    /// File name from the export header, if present.
    pub file_name: Option<String>,
    /// Format version from the export header, if present.
    pub version: Option<String>,
    /// Encoding the document was decoded with; `None` when parsed from text.
    pub encoding: Option<TextEncoding>,
    pub records: Vec<Record>,
    pub diagnostics: Diagnostics,
}

/// Trait for implementing record parsers.
pub trait RecordParser {
    /// Parse a string containing one or more records.
    ///
    /// # Errors
    ///
    /// Returns `BiblioError` only if the input cannot be read at all. Malformed
    /// records are dropped and reported in [`ParsedExport::diagnostics`].
    fn parse(&self, input: &str) -> Result<ParsedExport>;
}
