//! Venue and cited-reference canonicalization.

use crate::regex::Regex;
use crate::utils::{collapse_whitespace, title_case};
use compact_str::CompactString;
use std::sync::LazyLock;

/// Words kept lower-case inside a venue name.
const STOP_WORDS: &[&str] = &["of", "in", "and", "the", "for", "on", "with", "at", "by", "to"];

static REFERENCE_DOI_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bDOI\s+\[?(10\.[^\s,\]]+)").unwrap());

/// Title-case a venue name, keeping stop-words lower-case except in first position.
///
/// ```
/// use bibmetrics::normalize::canonical_venue;
///
/// assert_eq!(
///     canonical_venue("JOURNAL OF THE AMERICAN SOCIETY FOR INFORMATION SCIENCE"),
///     "Journal of the American Society for Information Science"
/// );
/// ```
pub fn canonical_venue(venue: &str) -> String {
    venue
        .split_whitespace()
        .enumerate()
        .map(|(i, word)| {
            let lower = word.to_lowercase();
            if i > 0 && STOP_WORDS.contains(&lower.as_str()) {
                lower
            } else {
                title_case(word)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Key under which a cited reference is counted.
///
/// References carrying a DOI are keyed by the lower-cased DOI; all others by
/// their whitespace-collapsed text without trailing periods.
pub fn canonical_reference(reference: &str) -> CompactString {
    if let Some(captures) = REFERENCE_DOI_REGEX.captures(reference) {
        let doi = captures[1].trim_end_matches(['.', ';']).to_lowercase();
        return CompactString::from(doi);
    }
    let collapsed = collapse_whitespace(reference);
    CompactString::from(collapsed.trim_end_matches('.'))
}
