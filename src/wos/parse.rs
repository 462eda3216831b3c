//! Line-level parsing of the tagged export format.
//!
//! A content line is a recognized two-character tag at column 0 followed by a
//! space (or nothing). Any other non-blank line continues the active field.

use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
use crate::wos::structure::RawWosData;
use crate::wos::tags::WosTag;
use tracing::debug;

/// Classified input line.
#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    Tagged(WosTag, &'a str),
    Continuation(&'a str),
}

/// Parser state between lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    NoActiveField,
    Accumulating(WosTag),
}

/// Raw output of the line parser.
#[derive(Debug, Default)]
pub(crate) struct RawDocument {
    pub(crate) file_name: Option<String>,
    pub(crate) version: Option<String>,
    pub(crate) records: Vec<RawWosData>,
    pub(crate) diagnostics: Diagnostics,
}

/// Parse tagged text into raw per-record data.
pub(crate) fn wos_parse(text: &str) -> RawDocument {
    let mut document = RawDocument::default();
    let mut current = RawWosData::new();
    let mut state = State::NoActiveField;

    for (index, line) in text.lines().enumerate() {
        let line_number = index + 1;
        let line = line.trim_end();

        if line.trim().is_empty() {
            continue;
        }

        match classify_line(line) {
            Line::Tagged(WosTag::EndOfRecord, _) => {
                if current.has_content() {
                    document.records.push(std::mem::take(&mut current));
                } else {
                    document.diagnostics.push(
                        Diagnostic::new(
                            DiagnosticKind::MalformedRecord,
                            "record terminator with no fields",
                        )
                        .at_line(line_number),
                    );
                }
                state = State::NoActiveField;
            }
            Line::Tagged(WosTag::EndOfFile, _) => break,
            Line::Tagged(tag, value) if tag.is_header_tag() => {
                let value = (!value.is_empty()).then(|| value.to_string());
                match tag {
                    WosTag::FileName => document.file_name = value,
                    _ => document.version = value,
                }
                state = State::NoActiveField;
            }
            Line::Tagged(tag, value) => {
                current.start_field(tag, line_number);
                if !value.is_empty() {
                    current.push_line(tag, value);
                }
                state = State::Accumulating(tag);
            }
            Line::Continuation(text) => match state {
                State::Accumulating(tag) => current.push_line(tag, text),
                State::NoActiveField => {
                    debug!(line = line_number, "ignoring text outside of any field");
                }
            },
        }
    }

    // Input may end without a terminator
    if current.has_content() {
        document.records.push(current);
    }

    debug!(
        records = document.records.len(),
        malformed = document.diagnostics.count(DiagnosticKind::MalformedRecord),
        "parsed tagged export"
    );
    document
}

/// Split a line into tag and value, or mark it as continuation text.
fn classify_line(line: &str) -> Line<'_> {
    if line.starts_with(char::is_whitespace) || line.len() < 2 || !line.is_char_boundary(2) {
        return Line::Continuation(line.trim());
    }

    let (code, rest) = line.split_at(2);
    if !rest.is_empty() && !rest.starts_with(' ') {
        return Line::Continuation(line.trim());
    }

    match WosTag::from_tag(code) {
        // markers carry no value
        Some(WosTag::EndOfRecord | WosTag::EndOfFile) if !rest.trim().is_empty() => {
            Line::Continuation(line.trim())
        }
        Some(tag) => Line::Tagged(tag, rest.trim()),
        None => Line::Continuation(line.trim()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    #[case("AU Smith, J", Line::Tagged(WosTag::Author, "Smith, J"))]
    #[case("ER", Line::Tagged(WosTag::EndOfRecord, ""))]
    #[case("EF  ", Line::Tagged(WosTag::EndOfFile, ""))]
    #[case("ER extra", Line::Continuation("ER extra"))]
    #[case("EF fluids", Line::Continuation("EF fluids"))]
    #[case("PY 2021", Line::Tagged(WosTag::PublicationYear, "2021"))]
    #[case("   Johnson, A", Line::Continuation("Johnson, A"))]
    #[case("XX unknown", Line::Continuation("XX unknown"))]
    #[case("AUTHOR", Line::Continuation("AUTHOR"))]
    #[case("A", Line::Continuation("A"))]
    #[case("Über", Line::Continuation("Über"))]
    fn test_classify_line(#[case] line: &str, #[case] expected: Line<'static>) {
        assert_eq!(classify_line(line), expected);
    }

    #[test]
    fn test_parse_header_and_records() {
        let input = "FN Clarivate Analytics Web of Science
VR 1.0
PT J
AU Smith, J
   Johnson, A
TI First
ER

PT J
AU Doe, A
TI Second
ER
EF";
        let document = wos_parse(input);

        assert_eq!(document.file_name.as_deref(), Some("Clarivate Analytics Web of Science"));
        assert_eq!(document.version.as_deref(), Some("1.0"));
        assert_eq!(document.records.len(), 2);
        assert_eq!(
            document.records[0].values(&WosTag::Author),
            vec!["Smith, J", "Johnson, A"]
        );
        assert_eq!(
            document.records[1].get_first(&WosTag::Title),
            Some("Second".to_string())
        );
        assert!(document.diagnostics.is_empty());
    }

    #[test]
    fn test_empty_record_is_reported() {
        let input = "PT J
TI Only
ER
ER
EF";
        let document = wos_parse(input);

        assert_eq!(document.records.len(), 1);
        assert_eq!(document.diagnostics.count(DiagnosticKind::MalformedRecord), 1);
        assert_eq!(document.diagnostics.iter().next().unwrap().line, Some(4));
    }

    #[test]
    fn test_marker_codes_with_text_continue_the_field() {
        let input = "PT J
TI Electrostatic
EF fluids in microchannels
ER
PT J
TI Next
ER
EF";
        let document = wos_parse(input);

        assert_eq!(document.records.len(), 2);
        assert_eq!(
            document.records[0].get_first(&WosTag::Title),
            Some("Electrostatic EF fluids in microchannels".to_string())
        );
        assert!(document.diagnostics.is_empty());
    }

    #[test]
    fn test_record_of_empty_tags_is_malformed() {
        let document = wos_parse("PT \nAU\nER\nEF");

        assert!(document.records.is_empty());
        assert_eq!(document.diagnostics.count(DiagnosticKind::MalformedRecord), 1);
    }

    #[test]
    fn test_missing_terminators_flush_open_record() {
        let input = "PT J\nTI Unterminated\nPY 2020";
        let document = wos_parse(input);

        assert_eq!(document.records.len(), 1);
        assert_eq!(
            document.records[0].get_first(&WosTag::PublicationYear),
            Some("2020".to_string())
        );
    }

    #[test]
    fn test_continuation_without_field_is_ignored() {
        let input = "FN Export\n   stray text\nPT J\nTI Title\nER";
        let document = wos_parse(input);

        assert_eq!(document.records.len(), 1);
        assert_eq!(document.records[0].get_first(&WosTag::Title), Some("Title".to_string()));
        assert_eq!(document.file_name.as_deref(), Some("Export"));
    }

    #[test]
    fn test_crlf_line_endings() {
        let input = "PT J\r\nTI Windows\r\n   Title\r\nER\r\nEF\r\n";
        let document = wos_parse(input);

        assert_eq!(
            document.records[0].get_first(&WosTag::Title),
            Some("Windows Title".to_string())
        );
    }

    #[test]
    fn test_text_after_end_of_file_is_ignored() {
        let input = "PT J\nTI Kept\nER\nEF\nPT J\nTI Dropped\nER";
        let document = wos_parse(input);
        assert_eq!(document.records.len(), 1);
    }

    #[test]
    fn test_empty_input() {
        let document = wos_parse("");
        assert!(document.records.is_empty());
        assert!(document.diagnostics.is_empty());
    }
}
