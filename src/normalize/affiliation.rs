//! Affiliation scanning and country/institution extraction.
//!
//! Affiliation text is a sequence of `[author; author] address.` segments. The
//! scanner walks it character by character instead of relying on a
//! backtracking pattern, so malformed input degrades segment by segment.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// One `[authors] address` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AffiliationSegment {
    /// Names listed inside the brackets, empty for an unbracketed address.
    pub authors: Vec<String>,
    pub address: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Outside,
    InAuthors,
    InAddress,
}

/// Extract every `[author-list] address` segment from affiliation text.
///
/// An address ends at the first `.`, at the next `[`, or at end of input. A
/// segment whose `]` is missing is dropped. Text outside any bracket that still
/// reads like an address becomes a segment without authors.
///
/// ```
/// use bibmetrics::normalize::parse_affiliations;
///
/// let segments = parse_affiliations("[Smith, J; Doe, A] MIT, Cambridge, USA.");
/// assert_eq!(segments[0].authors, vec!["Smith, J", "Doe, A"]);
/// assert_eq!(segments[0].address, "MIT, Cambridge, USA");
/// ```
pub fn parse_affiliations(text: &str) -> Vec<AffiliationSegment> {
    let mut segments = Vec::new();
    let mut state = ScanState::Outside;
    let mut authors = String::new();
    let mut buffer = String::new();

    for c in text.chars() {
        match (state, c) {
            (ScanState::Outside, '[') => {
                flush_unbracketed(&mut buffer, &mut segments);
                authors.clear();
                state = ScanState::InAuthors;
            }
            (ScanState::Outside, '.') => flush_unbracketed(&mut buffer, &mut segments),
            (ScanState::Outside, c) => buffer.push(c),
            (ScanState::InAuthors, ']') => {
                buffer.clear();
                state = ScanState::InAddress;
            }
            (ScanState::InAuthors, c) => authors.push(c),
            (ScanState::InAddress, '.') => {
                segments.push(segment(&authors, &buffer));
                buffer.clear();
                state = ScanState::Outside;
            }
            (ScanState::InAddress, '[') => {
                segments.push(segment(&authors, &buffer));
                buffer.clear();
                authors.clear();
                state = ScanState::InAuthors;
            }
            (ScanState::InAddress, c) => buffer.push(c),
        }
    }

    match state {
        ScanState::Outside => flush_unbracketed(&mut buffer, &mut segments),
        ScanState::InAddress => segments.push(segment(&authors, &buffer)),
        ScanState::InAuthors => {
            debug!(authors = %authors.trim(), "dropping affiliation segment without closing bracket");
        }
    }
    segments
}

fn segment(authors: &str, address: &str) -> AffiliationSegment {
    AffiliationSegment {
        authors: authors
            .split(';')
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(String::from)
            .collect(),
        address: trim_separators(address).to_string(),
    }
}

/// Segments may be separated by `;` as well as `.`.
fn trim_separators(address: &str) -> &str {
    address.trim_matches(|c: char| c == ';' || c == ',' || c.is_whitespace())
}

fn flush_unbracketed(buffer: &mut String, segments: &mut Vec<AffiliationSegment>) {
    let address = trim_separators(buffer);
    if address.chars().any(char::is_alphabetic) {
        segments.push(AffiliationSegment {
            authors: Vec::new(),
            address: address.to_string(),
        });
    }
    buffer.clear();
}

/// Country token of an address: the text after its last comma.
///
/// US addresses end in a postal form such as `MA 02139 USA`, which reduces to
/// `USA`. An address without a comma has no country token.
pub fn extract_country(address: &str) -> Option<String> {
    let (_, last) = address.rsplit_once(',')?;
    let country = last.trim().trim_end_matches('.').trim();
    if country.is_empty() {
        return None;
    }
    if country.split_whitespace().last() == Some("USA") {
        return Some("USA".to_string());
    }
    Some(country.to_string())
}

/// Institution token of an address: the text before its first comma.
pub fn extract_institution(address: &str) -> Option<String> {
    let institution = address.split(',').next()?.trim();
    (!institution.is_empty()).then(|| institution.to_string())
}

/// Maps spelling variants of country names to canonical labels.
///
/// Lookups ignore case. Unknown names map to themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "HashMap<String, String>", into = "HashMap<String, String>")]
pub struct CountryAliases {
    aliases: HashMap<String, String>,
}

impl Default for CountryAliases {
    fn default() -> Self {
        let mut aliases = Self::empty();
        aliases.insert("Taiwan", "Chinese Taiwan");
        aliases.insert("Peoples R China", "China");
        aliases
    }
}

impl CountryAliases {
    /// An alias table with no entries.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            aliases: HashMap::new(),
        }
    }

    /// Add or replace the canonical label for `variant`.
    pub fn insert(&mut self, variant: &str, canonical: &str) -> &mut Self {
        self.aliases
            .insert(variant.trim().to_lowercase(), canonical.to_string());
        self
    }

    /// Merge entries from another table, overriding existing variants.
    pub fn extend(&mut self, other: &CountryAliases) -> &mut Self {
        self.aliases
            .extend(other.aliases.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    /// Canonical label for a raw country token.
    pub fn resolve(&self, country: &str) -> String {
        self.aliases
            .get(&country.trim().to_lowercase())
            .cloned()
            .unwrap_or_else(|| country.trim().to_string())
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

impl From<HashMap<String, String>> for CountryAliases {
    fn from(entries: HashMap<String, String>) -> Self {
        let mut aliases = Self::empty();
        for (variant, canonical) in &entries {
            aliases.insert(variant, canonical);
        }
        aliases
    }
}

impl From<CountryAliases> for HashMap<String, String> {
    fn from(aliases: CountryAliases) -> Self {
        aliases.aliases
    }
}
