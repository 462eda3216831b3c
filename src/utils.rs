use crate::regex::Regex;
use std::sync::LazyLock;

static YEAR_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d{4}").unwrap());

/// Extracts the first four-digit year from a date-like string.
///
/// Returns `None` when no run of four digits is present, e.g. `"n/a"`.
pub(crate) fn parse_year(value: &str) -> Option<i32> {
    YEAR_REGEX
        .find(value)
        .and_then(|m| m.as_str().parse::<i32>().ok())
}

/// Parses a non-negative count such as a citation or reference count.
pub(crate) fn parse_count(value: &str) -> Option<u32> {
    value.trim().parse::<u32>().ok()
}

/// Collapses runs of whitespace into single spaces and trims both ends.
pub(crate) fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Title-cases a string: a letter following a non-letter is upper-cased,
/// every other letter is lower-cased.
///
/// `"SMITH, JOHN-PAUL"` becomes `"Smith, John-Paul"`. Letters whose case
/// mapping expands to several characters (`ß` to `SS`) are kept as they are,
/// so applying the function twice gives the same result as once.
pub(crate) fn title_case(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    let mut previous_is_letter = false;
    for c in value.chars() {
        if c.is_alphabetic() {
            let mapped = if previous_is_letter {
                single_char(c.to_lowercase())
            } else {
                single_char(c.to_uppercase())
            };
            result.push(mapped.unwrap_or(c));
            previous_is_letter = true;
        } else {
            result.push(c);
            previous_is_letter = false;
        }
    }
    result
}

fn single_char(mut mapping: impl Iterator<Item = char>) -> Option<char> {
    let first = mapping.next()?;
    mapping.next().is_none().then_some(first)
}

/// Formats a DOI string by removing URL prefixes and `[doi]` suffixes.
///
/// # Arguments
///
/// * `doi_str` - The DOI string to format
pub(crate) fn format_doi(doi_str: &str) -> Option<String> {
    if doi_str.is_empty() {
        return None;
    }
    let doi = doi_str
        .trim()
        .trim_end_matches("[doi]")
        .trim()
        .replace(|c: char| c.is_whitespace(), "")
        .to_lowercase();

    // Anything before the "10." directory indicator is a URL or label prefix
    let pos = doi.find("10.")?;
    Some(doi[pos..].to_string())
}
