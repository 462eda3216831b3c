//! Price's Law core-author analysis.
//!
//! Two formulas for the size of the core are in common use and they disagree,
//! so both are exposed under their own names:
//!
//! - [`price_core_by_max_productivity`]: `k = ⌈0.749·√n_max⌉`, where `n_max` is
//!   the publication count of the most productive author
//! - [`price_core_by_total_authors`]: `k = ⌊√N⌋`, where `N` is the number of
//!   distinct authors
//!
//! The law holds when the `k` most productive authors account for at least a
//! threshold share of all publications. The standard threshold is 50%; a relaxed
//! 35% threshold is available but is never substituted silently.

use crate::normalize::NormalizedCorpus;
use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Publications per canonical author.
pub type AuthorCounts = BTreeMap<CompactString, u32>;

/// Formula used to size the core.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceVariant {
    /// `⌈0.749·√n_max⌉`
    #[default]
    MaxProductivity,
    /// `⌊√N⌋`
    TotalAuthors,
}

/// Share of all publications the core must reach.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceThreshold {
    /// 50%
    #[default]
    Standard,
    /// 35%
    Relaxed,
    /// Any percentage between 0 and 100.
    Custom(f64),
}

impl PriceThreshold {
    pub fn percentage(&self) -> f64 {
        match self {
            PriceThreshold::Standard => 50.0,
            PriceThreshold::Relaxed => 35.0,
            PriceThreshold::Custom(p) => *p,
        }
    }
}

/// Which formula and threshold an analysis run uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceLawConfig {
    pub variant: PriceVariant,
    pub threshold: PriceThreshold,
}

/// Summary statistics of per-author publication counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ProductivityStats {
    pub mean: f64,
    pub median: f64,
    pub max: u32,
    pub min: u32,
}

impl ProductivityStats {
    /// Statistics of the given counts; all zero when empty.
    pub fn from_counts(counts: &AuthorCounts) -> Self {
        let mut values: Vec<u32> = counts.values().copied().collect();
        if values.is_empty() {
            return Self::default();
        }
        values.sort_unstable();

        let n = values.len();
        let total: u64 = values.iter().map(|&v| u64::from(v)).sum();
        let median = if n % 2 == 1 {
            f64::from(values[n / 2])
        } else {
            (f64::from(values[n / 2 - 1]) + f64::from(values[n / 2])) / 2.0
        };

        Self {
            mean: total as f64 / n as f64,
            median,
            max: values[n - 1],
            min: values[0],
        }
    }
}

/// Outcome of a Price's Law check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceLawResult {
    pub variant: PriceVariant,
    pub threshold: PriceThreshold,
    /// Distinct authors, `N`.
    pub total_authors: usize,
    /// Publications in the corpus, `P`.
    pub total_publications: usize,
    /// Unrounded core size given by the formula.
    pub expected_core_size: f64,
    /// Most productive authors, by count then name.
    pub core_authors: Vec<(CompactString, u32)>,
    /// Sum of the core authors' publication counts.
    pub core_publications: u64,
    /// `core_publications / P × 100`, 0 when `P` is 0.
    pub core_percentage: f64,
    pub satisfied: bool,
    /// Distance between the core percentage and the threshold.
    pub deviation: f64,
    /// Publication count to number of authors with that count.
    pub lotka_distribution: BTreeMap<u32, usize>,
    pub productivity: ProductivityStats,
}

/// Count the publications of every canonical author.
pub fn author_publication_counts(corpus: &NormalizedCorpus) -> AuthorCounts {
    let mut counts = AuthorCounts::new();
    for record in &corpus.records {
        for author in &record.authors {
            *counts.entry(author.clone()).or_insert(0) += 1;
        }
    }
    counts
}

/// Number of authors per publication count (Lotka's distribution).
pub fn lotka_distribution(counts: &AuthorCounts) -> BTreeMap<u32, usize> {
    let mut distribution = BTreeMap::new();
    for &count in counts.values() {
        *distribution.entry(count).or_insert(0) += 1;
    }
    distribution
}

/// Core size `⌈0.749·√n_max⌉` where `n_max` is the highest author count.
pub fn price_core_by_max_productivity(
    counts: &AuthorCounts,
    total_publications: usize,
    threshold: PriceThreshold,
) -> PriceLawResult {
    let max = counts.values().copied().max().unwrap_or(0);
    let expected = 0.749 * f64::from(max).sqrt();
    evaluate(
        counts,
        total_publications,
        threshold,
        PriceVariant::MaxProductivity,
        expected,
        expected.ceil() as usize,
    )
}

/// Core size `⌊√N⌋` where `N` is the number of distinct authors.
pub fn price_core_by_total_authors(
    counts: &AuthorCounts,
    total_publications: usize,
    threshold: PriceThreshold,
) -> PriceLawResult {
    let expected = (counts.len() as f64).sqrt();
    evaluate(
        counts,
        total_publications,
        threshold,
        PriceVariant::TotalAuthors,
        expected,
        expected.floor() as usize,
    )
}

/// Dispatch on a configured variant.
pub fn price_law(
    counts: &AuthorCounts,
    total_publications: usize,
    config: &PriceLawConfig,
) -> PriceLawResult {
    match config.variant {
        PriceVariant::MaxProductivity => {
            price_core_by_max_productivity(counts, total_publications, config.threshold)
        }
        PriceVariant::TotalAuthors => {
            price_core_by_total_authors(counts, total_publications, config.threshold)
        }
    }
}

fn evaluate(
    counts: &AuthorCounts,
    total_publications: usize,
    threshold: PriceThreshold,
    variant: PriceVariant,
    expected_core_size: f64,
    core_size: usize,
) -> PriceLawResult {
    let mut ranked: Vec<(CompactString, u32)> =
        counts.iter().map(|(name, &count)| (name.clone(), count)).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(core_size);

    let core_publications: u64 = ranked.iter().map(|(_, count)| u64::from(*count)).sum();
    let core_percentage = if total_publications == 0 {
        0.0
    } else {
        core_publications as f64 / total_publications as f64 * 100.0
    };
    let required = threshold.percentage();

    PriceLawResult {
        variant,
        threshold,
        total_authors: counts.len(),
        total_publications,
        expected_core_size,
        core_authors: ranked,
        core_publications,
        core_percentage,
        satisfied: total_publications > 0 && core_percentage >= required,
        deviation: (core_percentage - required).abs(),
        lotka_distribution: lotka_distribution(counts),
        productivity: ProductivityStats::from_counts(counts),
    }
}
