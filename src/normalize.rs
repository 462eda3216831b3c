//! Entity normalization.
//!
//! Turns raw [`Record`] fields into canonical entity labels so that the metric,
//! network and burst stages count the same author, country, institution,
//! keyword, venue or cited work under one key.
//!
//! # Example
//!
//! ```
//! use bibmetrics::normalize::Normalizer;
//! use bibmetrics::Record;
//!
//! let record = Record {
//!     id: "r1".to_string(),
//!     authors: vec!["SMITH, J.".to_string(), "Lee, K".to_string()],
//!     affiliation: Some("[Smith, J] MIT, Cambridge, MA 02139 USA. [Lee, K] Natl Taiwan Univ, Taipei, Taiwan.".to_string()),
//!     keywords: vec!["Citation Analysis; H-index".to_string()],
//!     ..Default::default()
//! };
//!
//! let (corpus, _diagnostics) = Normalizer::new().normalize(&[record]);
//! let normalized = &corpus.records[0];
//! assert_eq!(normalized.authors, vec!["Smith J", "Lee K"]);
//! assert_eq!(normalized.countries, vec!["USA", "Chinese Taiwan"]);
//! assert_eq!(normalized.institutions, vec!["MIT", "Natl Taiwan Univ"]);
//! assert_eq!(normalized.keywords, vec!["citation analysis", "h-index"]);
//! ```

mod affiliation;
mod author;
mod keyword;
mod split;
mod venue;

pub use affiliation::{
    AffiliationSegment, CountryAliases, extract_country, extract_institution, parse_affiliations,
};
pub use author::{canonical_author_name, canonicalize_author_field};
pub use keyword::{KeywordSource, tokenize_keywords};
pub use split::{DelimiterPriority, split_multi_valued};
pub use venue::{canonical_reference, canonical_venue};

use crate::Record;
use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
use compact_str::CompactString;
use itertools::Itertools;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Entity label to the identifiers of the records it appears on.
pub type EntityIndex = BTreeMap<CompactString, BTreeSet<String>>;

/// A record with every entity reduced to its canonical label.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NormalizedRecord {
    pub id: String,
    pub title: String,
    pub year: Option<i32>,
    pub citations: u32,
    pub document_type: Option<String>,
    /// Canonical author names, in order, without duplicates.
    pub authors: Vec<CompactString>,
    /// Canonical country labels, each at most once.
    pub countries: Vec<CompactString>,
    /// Institution labels, each at most once.
    pub institutions: Vec<CompactString>,
    /// Keyword tokens from the configured source.
    pub keywords: Vec<CompactString>,
    pub venue: Option<CompactString>,
    /// Cited-reference keys, each at most once.
    pub references: Vec<CompactString>,
    /// Number of cited references the record declares (`NR`).
    pub reference_count: Option<u32>,
}

/// Normalized view of a whole record batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NormalizedCorpus {
    pub records: Vec<NormalizedRecord>,
}

impl NormalizedCorpus {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Earliest and latest known publication year.
    pub fn year_range(&self) -> Option<(i32, i32)> {
        self.records
            .iter()
            .filter_map(|r| r.year)
            .minmax()
            .into_option()
    }

    /// Records published between `start` and `stop`, both inclusive.
    ///
    /// Undated records are left out.
    pub fn within_years(&self, start: i32, stop: i32) -> NormalizedCorpus {
        NormalizedCorpus {
            records: self
                .records
                .iter()
                .filter(|r| r.year.is_some_and(|y| (start..=stop).contains(&y)))
                .cloned()
                .collect(),
        }
    }

    pub fn author_index(&self) -> EntityIndex {
        self.index_by(|r| &r.authors)
    }

    pub fn country_index(&self) -> EntityIndex {
        self.index_by(|r| &r.countries)
    }

    pub fn institution_index(&self) -> EntityIndex {
        self.index_by(|r| &r.institutions)
    }

    pub fn keyword_index(&self) -> EntityIndex {
        self.index_by(|r| &r.keywords)
    }

    fn index_by<F>(&self, labels: F) -> EntityIndex
    where
        F: Fn(&NormalizedRecord) -> &Vec<CompactString>,
    {
        let mut index = EntityIndex::new();
        for record in &self.records {
            for label in labels(record) {
                index
                    .entry(label.clone())
                    .or_default()
                    .insert(record.id.clone());
            }
        }
        index
    }
}

/// Canonicalizes records into [`NormalizedRecord`]s.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    delimiters: DelimiterPriority,
    country_aliases: CountryAliases,
    keyword_source: KeywordSource,
}

impl Normalizer {
    /// Creates a normalizer with the default delimiters, aliases and keyword source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_delimiters(mut self, delimiters: DelimiterPriority) -> Self {
        self.delimiters = delimiters;
        self
    }

    #[must_use]
    pub fn with_country_aliases(mut self, country_aliases: CountryAliases) -> Self {
        self.country_aliases = country_aliases;
        self
    }

    #[must_use]
    pub fn with_keyword_source(mut self, keyword_source: KeywordSource) -> Self {
        self.keyword_source = keyword_source;
        self
    }

    /// Normalize a batch of records.
    ///
    /// A field that no record carries yields empty entity lists plus one
    /// [`DiagnosticKind::MissingField`] diagnostic for the batch.
    pub fn normalize(&self, records: &[Record]) -> (NormalizedCorpus, Diagnostics) {
        let normalized: Vec<_> = records.iter().map(|r| self.normalize_record(r)).collect();
        let diagnostics = self.missing_fields(records);

        debug!(
            records = normalized.len(),
            authors = normalized.iter().map(|r| r.authors.len()).sum::<usize>(),
            "normalized records"
        );

        (NormalizedCorpus { records: normalized }, diagnostics)
    }

    /// Normalize a single record.
    pub fn normalize_record(&self, record: &Record) -> NormalizedRecord {
        let segments = record
            .affiliation
            .as_deref()
            .map(parse_affiliations)
            .unwrap_or_default();

        let mut authors = author::record_authors(record, &self.delimiters);
        if authors.is_empty() {
            authors = segments
                .iter()
                .flat_map(|s| s.authors.iter())
                .map(|name| canonical_author_name(name))
                .filter(|name| !name.is_empty())
                .unique()
                .map(CompactString::from)
                .collect();
        }

        let mut countries = Vec::new();
        let mut institutions = Vec::new();
        for segment in &segments {
            let country = extract_country(&segment.address);
            let institution = extract_institution(&segment.address);
            if country.is_none() && institution.is_none() {
                debug!(record = %record.id, "affiliation segment has no country or institution");
                continue;
            }
            if let Some(country) = country {
                countries.push(CompactString::from(self.country_aliases.resolve(&country)));
            }
            if let Some(institution) = institution {
                institutions.push(CompactString::from(institution));
            }
        }

        NormalizedRecord {
            id: record.id.clone(),
            title: record.title.clone(),
            year: record.year,
            citations: record.citations,
            document_type: record.document_type.clone(),
            authors,
            countries: countries.into_iter().unique().collect(),
            institutions: institutions.into_iter().unique().collect(),
            keywords: keyword::record_keywords(record, self.keyword_source, &self.delimiters),
            venue: record
                .venue
                .as_deref()
                .map(canonical_venue)
                .filter(|v| !v.is_empty())
                .map(CompactString::from),
            references: record
                .references
                .iter()
                .map(|r| canonical_reference(r))
                .filter(|r| !r.is_empty())
                .unique()
                .collect(),
            reference_count: record.reference_count,
        }
    }

    fn missing_fields(&self, records: &[Record]) -> Diagnostics {
        let mut diagnostics = Diagnostics::new();
        if records.is_empty() {
            return diagnostics;
        }

        let keyword_field = match self.keyword_source {
            KeywordSource::AuthorKeywords => "author keywords (DE)",
            KeywordSource::KeywordsPlus => "keywords plus (ID)",
            KeywordSource::Both => "keywords (DE/ID)",
        };
        let checks: [(&str, fn(&Record, KeywordSource) -> bool); 6] = [
            ("authors (AU)", |r, _| !r.authors.is_empty() || r.affiliation.is_some()),
            ("affiliations (C1)", |r, _| r.affiliation.is_some()),
            ("publication year (PY)", |r, _| r.year.is_some()),
            ("source (SO)", |r, _| r.venue.is_some()),
            ("cited references (CR)", |r, _| !r.references.is_empty()),
            ("keywords", |r, source| match source {
                KeywordSource::AuthorKeywords => !r.keywords.is_empty(),
                KeywordSource::KeywordsPlus => !r.keywords_plus.is_empty(),
                KeywordSource::Both => !r.keywords.is_empty() || !r.keywords_plus.is_empty(),
            }),
        ];

        for (field, present) in checks {
            if !records.iter().any(|r| present(r, self.keyword_source)) {
                let field = if field == "keywords" { keyword_field } else { field };
                diagnostics.push(Diagnostic::new(
                    DiagnosticKind::MissingField,
                    format!("no record has {}", field),
                ));
            }
        }
        diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AuthorFormat;
    use pretty_assertions::assert_eq;

    fn record(id: &str) -> Record {
        Record {
            id: id.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_normalize_record_entities() {
        let record = Record {
            authors: vec!["Smith, J".into(), "smith, j.".into(), "Doe, A".into()],
            affiliation: Some(
                "[Smith, J] MIT, Cambridge, MA 02139 USA. [Doe, A] Harvard Univ, Boston, MA 02115 USA. [Wu, L] Tsinghua Univ, Beijing, Peoples R China."
                    .into(),
            ),
            venue: Some("JOURNAL OF INFORMETRICS".into()),
            references: vec![
                "Hirsch JE, 2005, PNAS, DOI 10.1073/PNAS.0507655102".into(),
                "Hirsch J.E., 2005, P NATL ACAD SCI, DOI 10.1073/pnas.0507655102".into(),
            ],
            ..record("r1")
        };
        let normalized = Normalizer::new().normalize_record(&record);

        assert_eq!(normalized.authors, vec!["Smith J", "Doe A"]);
        assert_eq!(normalized.countries, vec!["USA", "China"]);
        assert_eq!(
            normalized.institutions,
            vec!["MIT", "Harvard Univ", "Tsinghua Univ"]
        );
        assert_eq!(normalized.venue.as_deref(), Some("Journal of Informetrics"));
        assert_eq!(normalized.references, vec!["10.1073/pnas.0507655102"]);
    }

    #[test]
    fn test_authors_recovered_from_affiliation() {
        let record = Record {
            affiliation: Some("[Lee, K; Park, S] KAIST, Daejeon, South Korea.".into()),
            ..record("r1")
        };
        let normalized = Normalizer::new().normalize_record(&record);
        assert_eq!(normalized.authors, vec!["Lee K", "Park S"]);
    }

    #[test]
    fn test_semicolon_separated_segments() {
        let record = Record {
            affiliation: Some("[A] MIT, Cambridge, USA; [B] Univ Tokyo, Tokyo, Japan.".into()),
            ..record("r1")
        };
        let normalized = Normalizer::new().normalize_record(&record);
        assert_eq!(normalized.countries, vec!["USA", "Japan"]);
        assert_eq!(normalized.institutions, vec!["MIT", "Univ Tokyo"]);
    }

    #[test]
    fn test_delimited_authors() {
        let record = Record {
            authors: vec!["Smith, J; Doe, A".into()],
            author_format: AuthorFormat::Delimited,
            ..record("r1")
        };
        let normalized = Normalizer::new().normalize_record(&record);
        assert_eq!(normalized.authors, vec!["Smith J", "Doe A"]);
    }

    #[test]
    fn test_custom_country_aliases() {
        let mut aliases = CountryAliases::default();
        aliases.insert("England", "United Kingdom");
        let normalizer = Normalizer::new().with_country_aliases(aliases);

        let record = Record {
            affiliation: Some("[A, B] Univ Oxford, Oxford, England.".into()),
            ..record("r1")
        };
        assert_eq!(
            normalizer.normalize_record(&record).countries,
            vec!["United Kingdom"]
        );
    }

    #[test]
    fn test_missing_field_diagnostics() {
        let records = vec![
            Record {
                authors: vec!["Smith, J".into()],
                year: Some(2020),
                ..record("r1")
            },
            Record {
                authors: vec!["Doe, A".into()],
                ..record("r2")
            },
        ];
        let (corpus, diagnostics) = Normalizer::new().normalize(&records);

        assert_eq!(corpus.len(), 2);
        assert!(corpus.records.iter().all(|r| r.countries.is_empty()));
        // affiliations, source, cited references and keywords are absent everywhere
        assert_eq!(diagnostics.count(DiagnosticKind::MissingField), 4);
    }

    #[test]
    fn test_empty_batch_has_no_diagnostics() {
        let (corpus, diagnostics) = Normalizer::new().normalize(&[]);
        assert!(corpus.is_empty());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_entity_indexes() {
        let records = vec![
            Record {
                authors: vec!["Smith, J".into(), "Doe, A".into()],
                affiliation: Some("[Smith, J] MIT, Cambridge, USA.".into()),
                year: Some(2019),
                ..record("r1")
            },
            Record {
                authors: vec!["Smith, J".into()],
                affiliation: Some("[Smith, J] Univ Tokyo, Tokyo, Japan.".into()),
                year: Some(2021),
                ..record("r2")
            },
        ];
        let (corpus, _) = Normalizer::new().normalize(&records);

        let authors = corpus.author_index();
        assert_eq!(authors["Smith J"].len(), 2);
        assert_eq!(authors["Doe A"].len(), 1);
        assert_eq!(corpus.country_index().len(), 2);
        assert_eq!(corpus.institution_index()["MIT"], BTreeSet::from(["r1".to_string()]));
        assert_eq!(corpus.year_range(), Some((2019, 2021)));

        let recent = corpus.within_years(2020, 2025);
        assert_eq!(recent.len(), 1);
        assert_eq!(recent.records[0].id, "r2");
    }
}
