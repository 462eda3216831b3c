//! Rank-based citation indices.

/// Keeps the non-negative values, sorted in descending order.
fn sorted_descending(citations: &[i64]) -> Vec<i64> {
    let mut sorted: Vec<i64> = citations.iter().copied().filter(|&c| c >= 0).collect();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    sorted
}

/// H-index: the largest `i` such that the `i`-th highest citation count is at least `i`.
///
/// Negative values are ignored. Returns 0 for empty input.
///
/// ```
/// use bibmetrics::metrics::h_index;
///
/// assert_eq!(h_index(&[10, 8, 5, 4, 3]), 4);
/// assert_eq!(h_index(&[]), 0);
/// ```
pub fn h_index(citations: &[i64]) -> usize {
    sorted_descending(citations)
        .iter()
        .enumerate()
        .take_while(|&(i, &c)| c >= (i + 1) as i64)
        .count()
}

/// G-index: the largest `i` such that the top `i` papers hold at least `i²` citations.
///
/// Negative values are ignored. Returns 0 for empty input.
///
/// ```
/// use bibmetrics::metrics::g_index;
///
/// // cumulative 10, 18, 23, 27, 30 against 1, 4, 9, 16, 25
/// assert_eq!(g_index(&[10, 8, 5, 4, 3]), 5);
/// ```
pub fn g_index(citations: &[i64]) -> usize {
    let mut cumulative: u64 = 0;
    sorted_descending(citations)
        .iter()
        .enumerate()
        .take_while(|&(i, &c)| {
            cumulative += c as u64;
            let rank = (i + 1) as u64;
            cumulative >= rank * rank
        })
        .count()
}

/// Parse raw citation cells, dropping the ones that are not numbers.
///
/// Whole-valued decimals such as `"12.0"` are accepted.
pub fn parse_citation_values(values: &[&str]) -> Vec<i64> {
    values
        .iter()
        .filter_map(|value| {
            let value = value.trim();
            value.parse::<i64>().ok().or_else(|| {
                value
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite() && v.fract() == 0.0)
                    .map(|v| v as i64)
            })
        })
        .collect()
}
