//! Delimited tabular export parser.
//!
//! Maps a header row onto [`Record`] fields through configurable alias lists, so
//! spreadsheet exports and tab-delimited database exports feed the same pipeline
//! as tagged text.
//!
//! # Example
//!
//! ```
//! use bibmetrics::{AuthorFormat, CsvParser, RecordParser};
//!
//! let input = "Article Title,Authors,Publication Year,Times Cited
//! Example Paper,\"Smith, J; Doe, A\",2023,5";
//!
//! let export = CsvParser::new().parse(input).unwrap();
//! let record = &export.records[0];
//! assert_eq!(record.title, "Example Paper");
//! assert_eq!(record.authors, vec!["Smith, J; Doe, A"]);
//! assert_eq!(record.author_format, AuthorFormat::Delimited);
//! assert_eq!(record.citations, 5);
//! ```

use ::csv::{ReaderBuilder, StringRecord};
use nanoid::nanoid;
use std::collections::HashMap;
use tracing::debug;

use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
use crate::utils::{format_doi, parse_count, parse_year};
use crate::{AuthorFormat, ParsedExport, Record, RecordParser, Result};

/// Default header mappings for common column names.
const DEFAULT_HEADERS: &[(&str, &[&str])] = &[
    ("id", &["id", "ut", "ut (unique wos id)", "accession number"]),
    ("authors", &["authors", "author", "au", "author full names", "af"]),
    ("title", &["title", "article title", "document title", "ti"]),
    ("venue", &["source title", "journal", "source", "publication", "so"]),
    ("year", &["publication year", "year", "pub year", "py"]),
    (
        "citations",
        &["times cited", "times cited, wos core", "cited by", "tc", "times cited, all databases", "z9"],
    ),
    ("keywords", &["author keywords", "keywords", "de"]),
    ("keywords_plus", &["keywords plus", "index keywords"]),
    ("affiliation", &["addresses", "affiliations", "c1"]),
    ("references", &["cited references", "references", "cr"]),
    ("document_type", &["document type", "dt"]),
    ("doi", &["doi", "di"]),
    ("reference_count", &["cited reference count", "nr"]),
];

/// Header mappings for tab-delimited exports whose header row holds the field tags.
const TAG_HEADERS: &[(&str, &[&str])] = &[
    ("id", &["ut"]),
    ("authors", &["au", "af"]),
    ("title", &["ti"]),
    ("venue", &["so"]),
    ("year", &["py"]),
    ("citations", &["tc", "z9"]),
    ("keywords", &["de"]),
    ("keywords_plus", &["id"]),
    ("affiliation", &["c1"]),
    ("references", &["cr"]),
    ("document_type", &["dt"]),
    ("doi", &["di"]),
    ("reference_count", &["nr"]),
];

/// Configuration for delimited parsing with custom header mappings.
///
/// # Examples
///
/// ```
/// use bibmetrics::csv::CsvConfig;
///
/// let mut config = CsvConfig::new();
/// config.set_header_mapping("title", vec!["Paper".to_string()]);
/// config.set_delimiter(b';');
/// ```
#[derive(Debug, Clone)]
pub struct CsvConfig {
    /// Field name to lower-cased header aliases.
    header_map: HashMap<String, Vec<String>>,
    delimiter: u8,
    quoting: bool,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvConfig {
    /// Creates a comma-delimited configuration with the default header aliases.
    #[must_use]
    pub fn new() -> Self {
        Self::with_headers(DEFAULT_HEADERS, b',', true)
    }

    /// Preset for tab-delimited exports with two-letter tag headers.
    #[must_use]
    pub fn wos_tab_delimited() -> Self {
        Self::with_headers(TAG_HEADERS, b'\t', false)
    }

    fn with_headers(headers: &[(&str, &[&str])], delimiter: u8, quoting: bool) -> Self {
        let header_map = headers
            .iter()
            .map(|(field, aliases)| {
                (
                    field.to_string(),
                    aliases.iter().map(|s| s.to_string()).collect(),
                )
            })
            .collect();
        Self {
            header_map,
            delimiter,
            quoting,
        }
    }

    /// Sets a custom header mapping, replacing the aliases for `field`.
    pub fn set_header_mapping(&mut self, field: &str, aliases: Vec<String>) -> &mut Self {
        let aliases = aliases.into_iter().map(|a| a.to_lowercase()).collect();
        self.header_map.insert(field.to_string(), aliases);
        self
    }

    /// Sets the delimiter character.
    pub fn set_delimiter(&mut self, delimiter: u8) -> &mut Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets whether double quotes delimit cell values.
    pub fn set_quoting(&mut self, quoting: bool) -> &mut Self {
        self.quoting = quoting;
        self
    }

    /// Finds the field name for a given header.
    fn get_field_for_header(&self, header: &str) -> Option<&str> {
        let header = header.trim().trim_start_matches('\u{feff}').to_lowercase();
        self.header_map
            .iter()
            .find(|(_, aliases)| aliases.iter().any(|a| *a == header))
            .map(|(field, _)| field.as_str())
    }
}

/// Parser for delimited exports.
#[derive(Debug, Clone, Default)]
pub struct CsvParser {
    config: CsvConfig,
}

impl CsvParser {
    /// Creates a new parser with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: CsvConfig::new(),
        }
    }

    /// Creates a new parser with a custom configuration.
    #[must_use]
    pub fn with_config(mut self, config: CsvConfig) -> Self {
        self.config = config;
        self
    }

    /// Builds a record from one row. Returns `None` when no mapped cell has a value.
    fn parse_row(
        &self,
        fields: &[Option<&str>],
        headers: &[String],
        row: &StringRecord,
        record_index: usize,
        diagnostics: &mut Diagnostics,
    ) -> Option<Record> {
        let line = row.position().map(|p| p.line() as usize);
        let mut record = Record {
            author_format: AuthorFormat::Delimited,
            ..Default::default()
        };
        let mut mapped_values = 0;
        let mut seen: Vec<&str> = Vec::new();

        for (i, value) in row.iter().enumerate() {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            let Some(field) = fields.get(i).copied().flatten() else {
                if let Some(header) = headers.get(i) {
                    record
                        .extra_fields
                        .entry(header.clone())
                        .or_default()
                        .push(value.to_string());
                }
                continue;
            };
            // First non-empty column wins for each field
            if seen.contains(&field) {
                continue;
            }
            seen.push(field);
            mapped_values += 1;

            let mut coercion_failure = || {
                let mut diagnostic = Diagnostic::new(
                    DiagnosticKind::NumericCoercionFailure,
                    format!("{} value '{}' is not a number", field, value),
                )
                .at_record(record_index);
                if let Some(line) = line {
                    diagnostic = diagnostic.at_line(line);
                }
                diagnostics.push(diagnostic);
            };

            match field {
                "id" => record.id = value.to_string(),
                "authors" => record.authors.push(value.to_string()),
                "title" => record.title = value.to_string(),
                "venue" => record.venue = Some(value.to_string()),
                "year" => {
                    record.year = parse_year(value);
                    if record.year.is_none() {
                        coercion_failure();
                    }
                }
                "citations" => {
                    record.citations = parse_count(value).unwrap_or_else(|| {
                        coercion_failure();
                        0
                    });
                }
                "keywords" => record.keywords.push(value.to_string()),
                "keywords_plus" => record.keywords_plus.push(value.to_string()),
                "affiliation" => record.affiliation = Some(value.to_string()),
                "references" => record.references.extend(
                    value
                        .split(';')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(String::from),
                ),
                "document_type" => record.document_type = Some(value.to_string()),
                "doi" => record.doi = format_doi(value),
                "reference_count" => {
                    record.reference_count = parse_count(value);
                    if record.reference_count.is_none() {
                        coercion_failure();
                    }
                }
                other => {
                    record
                        .extra_fields
                        .entry(other.to_string())
                        .or_default()
                        .push(value.to_string());
                }
            }
        }

        if mapped_values == 0 {
            let mut diagnostic = Diagnostic::new(
                DiagnosticKind::MalformedRecord,
                "row has no value in any mapped column",
            );
            if let Some(line) = line {
                diagnostic = diagnostic.at_line(line);
            }
            diagnostics.push(diagnostic);
            return None;
        }

        if record.id.is_empty() {
            record.id = nanoid!();
        }
        Some(record)
    }
}

impl RecordParser for CsvParser {
    fn parse(&self, input: &str) -> Result<ParsedExport> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.config.delimiter)
            .quoting(self.config.quoting)
            .flexible(true)
            .has_headers(true)
            .from_reader(input.as_bytes());

        let headers: Vec<String> = reader.headers()?.iter().map(String::from).collect();
        let fields: Vec<Option<&str>> = headers
            .iter()
            .map(|header| self.config.get_field_for_header(header))
            .collect();

        let mut diagnostics = Diagnostics::new();
        let mut records = Vec::new();
        for row in reader.records() {
            let row = row?;
            if let Some(record) =
                self.parse_row(&fields, &headers, &row, records.len(), &mut diagnostics)
            {
                records.push(record);
            }
        }

        debug!(records = records.len(), columns = headers.len(), "parsed delimited export");

        Ok(ParsedExport {
            records,
            diagnostics,
            ..Default::default()
        })
    }
}
