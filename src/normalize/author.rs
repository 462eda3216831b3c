//! Author name canonicalization.
//!
//! Name variants that differ only in case, punctuation or spacing collapse to
//! the same canonical form. No disambiguation beyond that is attempted.

use crate::normalize::split::{DelimiterPriority, split_multi_valued};
use crate::utils::{collapse_whitespace, title_case};
use crate::{AuthorFormat, Record};
use compact_str::CompactString;
use itertools::Itertools;

/// Canonical form of one author name.
///
/// Trims, title-cases, replaces commas with spaces, collapses whitespace and
/// strips trailing periods. Applying it twice gives the same result as once.
///
/// ```
/// use bibmetrics::normalize::canonical_author_name;
///
/// assert_eq!(canonical_author_name("SMITH, J."), "Smith J");
/// assert_eq!(canonical_author_name("smith,  j"), "Smith J");
/// ```
pub fn canonical_author_name(name: &str) -> String {
    let titled = title_case(name.trim()).replace(',', " ");
    collapse_whitespace(&titled)
        .trim_end_matches(['.', ' '])
        .to_string()
}

/// Split a multi-valued author field and canonicalize every name in it.
pub fn canonicalize_author_field(field: &str, priority: &DelimiterPriority) -> Vec<String> {
    split_multi_valued(field, priority)
        .into_iter()
        .map(canonical_author_name)
        .filter(|name| !name.is_empty())
        .collect()
}

/// Canonical authors of a record, in order, without duplicates.
pub(crate) fn record_authors(record: &Record, priority: &DelimiterPriority) -> Vec<CompactString> {
    let names: Vec<String> = match record.author_format {
        AuthorFormat::OnePerEntry => record
            .authors
            .iter()
            .map(|name| canonical_author_name(name))
            .filter(|name| !name.is_empty())
            .collect(),
        AuthorFormat::Delimited => record
            .authors
            .iter()
            .flat_map(|field| canonicalize_author_field(field, priority))
            .collect(),
    };
    names.into_iter().unique().map(CompactString::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    #[case("Smith, J", "Smith J")]
    #[case("  SMITH, J.  ", "Smith J")]
    #[case("smith,j", "Smith J")]
    #[case("van der Berg, A.B.", "Van Der Berg A.B")]
    #[case("O'NEIL, P", "O'Neil P")]
    #[case("Smith J", "Smith J")]
    #[case("...", "")]
    #[case("", "")]
    fn test_canonical_author_name(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(canonical_author_name(input), expected);
    }

    #[rstest]
    #[case("SMITH, J.")]
    #[case("de la Cruz,   M.A.")]
    #[case("  li , x ")]
    #[case("ßa")]
    #[case("STRAßER, İ")]
    fn test_canonical_author_name_is_idempotent(#[case] input: &str) {
        let once = canonical_author_name(input);
        assert_eq!(canonical_author_name(&once), once);
    }

    #[test]
    fn test_canonicalize_author_field() {
        let priority = DelimiterPriority::default();
        assert_eq!(
            canonicalize_author_field("Smith, J; DOE, A.; ", &priority),
            vec!["Smith J", "Doe A"]
        );
    }

    #[test]
    fn test_record_authors_one_per_entry_keeps_commas_inside_names() {
        let record = Record {
            authors: vec!["Smith, J".into(), "Johnson, A".into(), "SMITH, J.".into()],
            author_format: AuthorFormat::OnePerEntry,
            ..Default::default()
        };
        assert_eq!(
            record_authors(&record, &DelimiterPriority::default()),
            vec!["Smith J", "Johnson A"]
        );
    }

    #[test]
    fn test_record_authors_delimited() {
        let record = Record {
            authors: vec!["Smith, J; Johnson, A; smith, j".into()],
            author_format: AuthorFormat::Delimited,
            ..Default::default()
        };
        assert_eq!(
            record_authors(&record, &DelimiterPriority::default()),
            vec!["Smith J", "Johnson A"]
        );
    }
}
