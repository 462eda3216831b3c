//! Tagged-line export parser.
//!
//! Parses the two-letter tagged format used by Web of Science plain-text exports:
//! an optional `FN`/`VR` header, records of `TT value` lines with indented
//! continuation lines, each record closed by `ER`, the file closed by `EF`.
//!
//! # Example
//!
//! ```
//! use bibmetrics::{RecordParser, WosParser};
//!
//! let input = "PT J
//! AU Smith, J
//! TI A Study
//!    of Continuations
//! SO JOURNAL OF TESTS
//! PY 2019
//! TC 4
//! ER";
//!
//! let export = WosParser::new().parse(input).unwrap();
//! let record = &export.records[0];
//! assert_eq!(record.title, "A Study of Continuations");
//! assert_eq!(record.year, Some(2019));
//! assert_eq!(record.citations, 4);
//! ```

mod parse;
mod structure;
pub mod tags;

use crate::encoding::{DEFAULT_ENCODINGS, TextEncoding, decode};
use crate::{ParsedExport, RecordParser, Result};
use parse::wos_parse;
use tracing::debug;

/// Parser for tagged-line exports.
///
/// Malformed records never fail the parse; they are dropped and reported in
/// [`ParsedExport::diagnostics`].
#[derive(Debug, Clone)]
pub struct WosParser {
    encodings: Vec<TextEncoding>,
}

impl Default for WosParser {
    fn default() -> Self {
        Self::new()
    }
}

impl WosParser {
    /// Creates a parser that decodes bytes with the default encoding chain.
    ///
    /// # Examples
    ///
    /// ```
    /// use bibmetrics::WosParser;
    /// let parser = WosParser::new();
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self {
            encodings: DEFAULT_ENCODINGS.to_vec(),
        }
    }

    /// Sets the encodings tried, in order, by [`WosParser::parse_bytes`].
    #[must_use]
    pub fn with_encodings(mut self, encodings: Vec<TextEncoding>) -> Self {
        self.encodings = encodings;
        self
    }

    /// Decodes `bytes` with the configured encoding chain and parses the text.
    ///
    /// # Errors
    ///
    /// Returns [`crate::BiblioError::Decode`] if no encoding accepts the input.
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<ParsedExport> {
        let (text, encoding) = decode(bytes, &self.encodings)?;
        let mut export = self.parse(&text)?;
        export.encoding = Some(encoding);
        Ok(export)
    }
}

impl RecordParser for WosParser {
    fn parse(&self, input: &str) -> Result<ParsedExport> {
        let document = wos_parse(input);
        let mut diagnostics = document.diagnostics;

        let records: Vec<_> = document
            .records
            .into_iter()
            .enumerate()
            .map(|(index, raw)| raw.into_record(index, &mut diagnostics))
            .collect();

        debug!(records = records.len(), diagnostics = diagnostics.len(), "built records");

        Ok(ParsedExport {
            file_name: document.file_name,
            version: document.version,
            encoding: None,
            records,
            diagnostics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AuthorFormat, DiagnosticKind};
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = "FN Clarivate Analytics Web of Science
VR 1.0
PT J
AU Smith, J
   Johnson, A
AF Smith, John
   Johnson, Alice
TI Citation networks
   in practice
SO SCIENTOMETRICS
DE citation analysis; co-citation
ID NETWORKS
PY 2020
TC 15
NR 2
C1 [Smith, J; Johnson, A] MIT, Cambridge, MA 02139 USA.
CR Garfield E, 1955, SCIENCE, V122, P108
   Price DJD, 1965, SCIENCE, V149, P510
UT WOS:000000000000001
ER

PT J
AU Doe, A
TI Unknown year
PY n/a
ER
EF
";

    #[test]
    fn test_parse_sample() {
        let export = WosParser::new().parse(SAMPLE).unwrap();
        assert_eq!(export.file_name.as_deref(), Some("Clarivate Analytics Web of Science"));
        assert_eq!(export.records.len(), 2);

        let first = &export.records[0];
        assert_eq!(first.id, "WOS:000000000000001");
        assert_eq!(first.authors, vec!["Smith, J", "Johnson, A"]);
        assert_eq!(first.author_format, AuthorFormat::OnePerEntry);
        assert_eq!(first.title, "Citation networks in practice");
        assert_eq!(first.venue.as_deref(), Some("SCIENTOMETRICS"));
        assert_eq!(first.year, Some(2020));
        assert_eq!(first.citations, 15);
        assert_eq!(first.reference_count, Some(2));
        assert_eq!(first.keywords, vec!["citation analysis; co-citation"]);
        assert_eq!(first.keywords_plus, vec!["NETWORKS"]);
        assert_eq!(
            first.affiliation.as_deref(),
            Some("[Smith, J; Johnson, A] MIT, Cambridge, MA 02139 USA.")
        );
        assert_eq!(first.references.len(), 2);
        assert!(first.extra_fields.contains_key("AF"));

        let second = &export.records[1];
        assert_eq!(second.year, None);
        assert_eq!(second.citations, 0);
        assert_eq!(
            export.diagnostics.count(DiagnosticKind::NumericCoercionFailure),
            1
        );
    }

    #[test]
    fn test_parse_bytes_records_encoding() {
        let bytes = b"PT J\nAU M\xfcller, K\nTI Umlaut\nER\nEF";
        let export = WosParser::new().parse_bytes(bytes).unwrap();

        assert_eq!(export.encoding, Some(TextEncoding::Windows1252));
        assert_eq!(export.records[0].authors, vec!["Müller, K"]);
    }

    #[test]
    fn test_parse_bytes_with_strict_chain_fails() {
        let bytes = b"PT J\nAU M\xfcller, K\nER";
        let parser = WosParser::new().with_encodings(vec![TextEncoding::Utf8]);
        assert!(parser.parse_bytes(bytes).is_err());
    }
}
