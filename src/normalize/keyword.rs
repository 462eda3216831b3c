//! Keyword tokenization.

use crate::Record;
use crate::normalize::split::{DelimiterPriority, split_multi_valued};
use compact_str::CompactString;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// Which keyword fields feed keyword statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordSource {
    /// Keywords chosen by the authors (`DE`).
    #[default]
    AuthorKeywords,
    /// Keywords assigned by the database (`ID`).
    KeywordsPlus,
    /// Both, author keywords first.
    Both,
}

/// Split raw keyword fields into lower-cased, de-duplicated tokens.
///
/// ```
/// use bibmetrics::normalize::{tokenize_keywords, DelimiterPriority};
///
/// let fields = vec!["Machine Learning; DEEP learning; machine learning".to_string()];
/// let tokens = tokenize_keywords(&fields, &DelimiterPriority::default());
/// assert_eq!(tokens, vec!["machine learning", "deep learning"]);
/// ```
pub fn tokenize_keywords(fields: &[String], priority: &DelimiterPriority) -> Vec<CompactString> {
    fields
        .iter()
        .flat_map(|field| split_multi_valued(field, priority))
        .map(|token| CompactString::from(token.trim().to_lowercase()))
        .filter(|token| !token.is_empty())
        .unique()
        .collect()
}

/// Keyword tokens of a record from the selected source.
pub(crate) fn record_keywords(
    record: &Record,
    source: KeywordSource,
    priority: &DelimiterPriority,
) -> Vec<CompactString> {
    match source {
        KeywordSource::AuthorKeywords => tokenize_keywords(&record.keywords, priority),
        KeywordSource::KeywordsPlus => tokenize_keywords(&record.keywords_plus, priority),
        KeywordSource::Both => {
            let fields: Vec<String> = record
                .keywords
                .iter()
                .chain(record.keywords_plus.iter())
                .cloned()
                .collect();
            tokenize_keywords(&fields, priority)
        }
    }
}
