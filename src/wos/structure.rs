//! Intermediate data collected for one tagged record.
//!
//! # Field Processing Strategy
//! - **Lines kept**: every occurrence of a tag keeps its physical lines until the
//!   record is complete
//! - **List tags**: author and cited-reference tags yield one value per line
//! - **Scalar tags**: each occurrence yields its lines joined by a single space
//! - **Fallbacks**: `AF` stands in for missing `AU`, `Z9` for missing `TC`

use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
use crate::utils::{format_doi, parse_count, parse_year};
use crate::wos::tags::WosTag;
use crate::{AuthorFormat, Record};
use nanoid::nanoid;
use std::collections::HashMap;

/// Raw tagged data for one record.
#[derive(Debug, Clone, Default)]
pub(crate) struct RawWosData {
    /// Occurrences of each tag, each occurrence holding its lines.
    pub(crate) data: HashMap<WosTag, Vec<Vec<String>>>,
    /// Line on which each tag first appeared.
    pub(crate) first_lines: HashMap<WosTag, usize>,
}

impl RawWosData {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Open a new occurrence of `tag`.
    pub(crate) fn start_field(&mut self, tag: WosTag, line_number: usize) {
        self.data.entry(tag).or_default().push(Vec::new());
        self.first_lines.entry(tag).or_insert(line_number);
    }

    /// Append a line to the most recent occurrence of `tag`.
    pub(crate) fn push_line(&mut self, tag: WosTag, line: &str) {
        let occurrences = self.data.entry(tag).or_default();
        match occurrences.last_mut() {
            Some(lines) => lines.push(line.to_string()),
            None => occurrences.push(vec![line.to_string()]),
        }
    }

    /// Values of a tag, following the list/scalar rules. Empty values are dropped.
    pub(crate) fn values(&self, tag: &WosTag) -> Vec<String> {
        let Some(occurrences) = self.data.get(tag) else {
            return Vec::new();
        };
        if tag.is_list_tag() {
            occurrences
                .iter()
                .flatten()
                .filter(|line| !line.is_empty())
                .cloned()
                .collect()
        } else {
            occurrences
                .iter()
                .map(|lines| lines.join(" "))
                .filter(|value| !value.is_empty())
                .collect()
        }
    }

    /// First value of a tag, if it exists.
    pub(crate) fn get_first(&self, tag: &WosTag) -> Option<String> {
        self.values(tag).into_iter().next()
    }

    /// Remove and return all values for a tag.
    pub(crate) fn remove(&mut self, tag: &WosTag) -> Option<Vec<String>> {
        let values = self.values(tag);
        self.data.remove(tag)?;
        Some(values)
    }

    /// Remove a tag and return its first value.
    pub(crate) fn take_first(&mut self, tag: &WosTag) -> Option<String> {
        self.remove(tag).and_then(|values| values.into_iter().next())
    }

    /// Check if any field holds a non-empty line.
    pub(crate) fn has_content(&self) -> bool {
        self.data.values().flatten().flatten().any(|line| !line.is_empty())
    }

    fn line_of(&self, tag: &WosTag) -> Option<usize> {
        self.first_lines.get(tag).copied()
    }

    fn coercion_failure(
        &self,
        tag: &WosTag,
        value: &str,
        record_index: usize,
        diagnostics: &mut Diagnostics,
    ) {
        let mut diagnostic = Diagnostic::new(
            DiagnosticKind::NumericCoercionFailure,
            format!("{} value '{}' is not a number", tag, value),
        )
        .at_record(record_index);
        if let Some(line) = self.line_of(tag) {
            diagnostic = diagnostic.at_line(line);
        }
        diagnostics.push(diagnostic);
    }

    /// Convert the raw data into a [`Record`], reporting unparseable numbers.
    pub(crate) fn into_record(mut self, record_index: usize, diagnostics: &mut Diagnostics) -> Record {
        let id = self
            .take_first(&WosTag::AccessionNumber)
            .unwrap_or_else(|| nanoid!());

        let mut authors = self.remove(&WosTag::Author).unwrap_or_default();
        if authors.is_empty() {
            authors = self.remove(&WosTag::AuthorFullName).unwrap_or_default();
        }

        let title = self.take_first(&WosTag::Title).unwrap_or_default();
        let venue = self.take_first(&WosTag::Source);

        let year = self.get_first(&WosTag::PublicationYear).and_then(|value| {
            let year = parse_year(&value);
            if year.is_none() {
                self.coercion_failure(&WosTag::PublicationYear, &value, record_index, diagnostics);
            }
            year
        });
        self.remove(&WosTag::PublicationYear);

        let citation_tag = if self.get_first(&WosTag::TimesCited).is_some() {
            WosTag::TimesCited
        } else {
            WosTag::TotalTimesCited
        };
        let citations = match self.get_first(&citation_tag) {
            Some(value) => parse_count(&value).unwrap_or_else(|| {
                self.coercion_failure(&citation_tag, &value, record_index, diagnostics);
                0
            }),
            None => 0,
        };
        // Z9 stays in the extra fields unless it stood in for TC
        self.remove(&citation_tag);

        let reference_count = self.get_first(&WosTag::CitedReferenceCount).and_then(|value| {
            let count = parse_count(&value);
            if count.is_none() {
                self.coercion_failure(&WosTag::CitedReferenceCount, &value, record_index, diagnostics);
            }
            count
        });
        self.remove(&WosTag::CitedReferenceCount);

        let keywords = self.remove(&WosTag::AuthorKeywords).unwrap_or_default();
        let keywords_plus = self.remove(&WosTag::KeywordsPlus).unwrap_or_default();
        let affiliation = self
            .remove(&WosTag::Address)
            .map(|values| values.join(" "))
            .filter(|value| !value.is_empty());
        let references = self.remove(&WosTag::CitedReferences).unwrap_or_default();
        let document_type = self.take_first(&WosTag::DocumentType);
        let doi = self
            .take_first(&WosTag::Doi)
            .and_then(|value| format_doi(&value));

        let tags: Vec<WosTag> = self.data.keys().copied().collect();
        let extra_fields = tags
            .into_iter()
            .filter_map(|tag| {
                let values = self.values(&tag);
                (!values.is_empty()).then(|| (tag.as_tag().to_string(), values))
            })
            .collect();

        Record {
            id,
            authors,
            author_format: AuthorFormat::OnePerEntry,
            title,
            venue,
            year,
            citations,
            keywords,
            keywords_plus,
            affiliation,
            references,
            document_type,
            doi,
            reference_count,
            extra_fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn raw_with(fields: &[(WosTag, &[&str])]) -> RawWosData {
        let mut raw = RawWosData::new();
        for (line, (tag, lines)) in fields.iter().enumerate() {
            raw.start_field(*tag, line + 1);
            for value in *lines {
                raw.push_line(*tag, value);
            }
        }
        raw
    }

    #[test]
    fn test_scalar_lines_are_joined() {
        let raw = raw_with(&[(WosTag::Title, &["A long title", "split over lines"])]);
        assert_eq!(
            raw.get_first(&WosTag::Title),
            Some("A long title split over lines".to_string())
        );
    }

    #[test]
    fn test_list_lines_stay_separate() {
        let raw = raw_with(&[(WosTag::Author, &["Smith, J", "Doe, A"])]);
        assert_eq!(raw.values(&WosTag::Author), vec!["Smith, J", "Doe, A"]);
    }

    #[test]
    fn test_repeated_scalar_tag_yields_one_value_per_occurrence() {
        let raw = raw_with(&[
            (WosTag::AuthorKeywords, &["graphs; networks"]),
            (WosTag::AuthorKeywords, &["citation analysis"]),
        ]);
        assert_eq!(
            raw.values(&WosTag::AuthorKeywords),
            vec!["graphs; networks", "citation analysis"]
        );
    }

    #[test]
    fn test_into_record_maps_fields() {
        let raw = raw_with(&[
            (WosTag::AccessionNumber, &["WOS:000123"]),
            (WosTag::Author, &["Smith, J", "Doe, A"]),
            (WosTag::Title, &["Example"]),
            (WosTag::Source, &["JOURNAL OF TESTS"]),
            (WosTag::PublicationYear, &["2021"]),
            (WosTag::TimesCited, &["7"]),
            (WosTag::Doi, &["10.1000/ABC"]),
            (WosTag::Language, &["English"]),
        ]);
        let mut diagnostics = Diagnostics::new();
        let record = raw.into_record(0, &mut diagnostics);

        assert_eq!(record.id, "WOS:000123");
        assert_eq!(record.authors, vec!["Smith, J", "Doe, A"]);
        assert_eq!(record.title, "Example");
        assert_eq!(record.venue.as_deref(), Some("JOURNAL OF TESTS"));
        assert_eq!(record.year, Some(2021));
        assert_eq!(record.citations, 7);
        assert_eq!(record.doi.as_deref(), Some("10.1000/abc"));
        assert_eq!(
            record.extra_fields.get("LA"),
            Some(&vec!["English".to_string()])
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_fallback_tags() {
        let raw = raw_with(&[
            (WosTag::AuthorFullName, &["Smith, John"]),
            (WosTag::TotalTimesCited, &["11"]),
        ]);
        let mut diagnostics = Diagnostics::new();
        let record = raw.into_record(0, &mut diagnostics);

        assert_eq!(record.authors, vec!["Smith, John"]);
        assert_eq!(record.citations, 11);
        assert!(!record.extra_fields.contains_key("Z9"));
        assert!(!record.id.is_empty());
    }

    #[test]
    fn test_numeric_coercion_failures() {
        let raw = raw_with(&[
            (WosTag::Title, &["Example"]),
            (WosTag::PublicationYear, &["n/a"]),
            (WosTag::TimesCited, &["many"]),
            (WosTag::CitedReferenceCount, &["?"]),
        ]);
        let mut diagnostics = Diagnostics::new();
        let record = raw.into_record(4, &mut diagnostics);

        assert_eq!(record.year, None);
        assert_eq!(record.citations, 0);
        assert_eq!(record.reference_count, None);
        assert_eq!(diagnostics.count(DiagnosticKind::NumericCoercionFailure), 3);
        let first = diagnostics.iter().next().unwrap();
        assert_eq!(first.record, Some(4));
        assert_eq!(first.line, Some(2));
    }
}
