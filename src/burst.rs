//! Keyword burst detection.
//!
//! A term bursts in a window of years when its occurrence rate inside the
//! window exceeds its long-run rate by more than a configured ratio.
//!
//! For a series of `n` yearly counts with total `T`, the baseline rate is
//! `T / n`. Every contiguous window of `w = min(window, n)` years has the rate
//! `sum(window) / w`, and its burst ratio is that rate over the baseline. A window
//! whose ratio is strictly above the threshold marks all of its years as
//! bursting, and the term's strength is the highest such ratio.
//!
//! # Example
//!
//! ```
//! use bibmetrics::burst::{BurstConfig, YearlySeries, detect_burst};
//!
//! let series = YearlySeries::new(2015, vec![1, 0, 1, 0, 1, 8, 9, 7]);
//! let signal = detect_burst(&series, &BurstConfig::default());
//!
//! assert!(signal.is_burst());
//! assert_eq!(signal.bursting_years, vec![2019, 2020, 2021, 2022]);
//! ```

mod trend;

pub use trend::{DiversityTrend, LinearFit, Trend, classify_diversity, classify_trend, linear_fit};

use crate::normalize::NormalizedCorpus;
use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Counts for a contiguous run of years, zeros included.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct YearlySeries {
    pub start_year: i32,
    pub counts: Vec<u32>,
}

impl YearlySeries {
    #[must_use]
    pub fn new(start_year: i32, counts: Vec<u32>) -> Self {
        Self { start_year, counts }
    }

    /// Spread sparse per-year counts over `start..=end`, filling the gaps with zeros.
    ///
    /// Years outside the range are ignored.
    pub fn from_year_counts(counts: &BTreeMap<i32, u32>, start: i32, end: i32) -> Self {
        let counts = (start..=end)
            .map(|year| counts.get(&year).copied().unwrap_or(0))
            .collect();
        Self::new(start, counts)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| u64::from(c)).sum()
    }

    pub fn max(&self) -> u32 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// Calendar year of the `index`-th count.
    pub fn year_at(&self, index: usize) -> i32 {
        self.start_year + index as i32
    }
}

/// Burst detection parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BurstConfig {
    /// Window length in years.
    pub window: usize,
    /// Ratio a window must exceed to count as a burst.
    pub threshold: f64,
    /// Minimum total occurrences before a term is evaluated.
    pub min_support: u32,
    /// Cap on the number of reported terms; `None` keeps all.
    pub max_results: Option<usize>,
}

impl Default for BurstConfig {
    fn default() -> Self {
        Self {
            window: 3,
            threshold: 1.5,
            min_support: 3,
            max_results: Some(50),
        }
    }
}

/// Burst outcome for one series.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BurstSignal {
    /// Highest window ratio above the threshold, 0 when nothing bursts.
    pub strength: f64,
    pub bursting_years: Vec<i32>,
}

impl BurstSignal {
    pub fn is_burst(&self) -> bool {
        !self.bursting_years.is_empty()
    }
}

/// Detect the bursting years of one series.
///
/// Series with no occurrences never burst.
pub fn detect_burst(series: &YearlySeries, config: &BurstConfig) -> BurstSignal {
    let n = series.len();
    let total = series.total();
    if total == 0 {
        return BurstSignal::default();
    }

    let baseline = total as f64 / n as f64;
    let window = config.window.clamp(1, n);

    let mut strength: f64 = 0.0;
    let mut bursting = BTreeSet::new();
    for (start, counts) in series.counts.windows(window).enumerate() {
        let rate = counts.iter().map(|&c| f64::from(c)).sum::<f64>() / window as f64;
        let ratio = rate / baseline;
        if ratio > config.threshold {
            strength = strength.max(ratio);
            bursting.extend(start..start + window);
        }
    }

    BurstSignal {
        strength,
        bursting_years: bursting.into_iter().map(|i| series.year_at(i)).collect(),
    }
}

/// A keyword whose usage burst at some point of the corpus timeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordBurst {
    pub term: CompactString,
    pub strength: f64,
    pub bursting_years: Vec<i32>,
    pub total_frequency: u64,
    pub max_frequency: u32,
    /// Years with at least one occurrence.
    pub years_active: usize,
}

/// Per-keyword yearly series over the span of dated, keyworded records.
///
/// Returns `None` when no record has both a year and a keyword.
pub fn keyword_series(corpus: &NormalizedCorpus) -> Option<BTreeMap<CompactString, YearlySeries>> {
    let dated = corpus
        .records
        .iter()
        .filter_map(|r| r.year.filter(|_| !r.keywords.is_empty()).map(|year| (year, r)));

    let mut per_keyword: BTreeMap<&CompactString, BTreeMap<i32, u32>> = BTreeMap::new();
    let mut span: Option<(i32, i32)> = None;
    for (year, record) in dated {
        span = Some(match span {
            None => (year, year),
            Some((start, end)) => (start.min(year), end.max(year)),
        });
        for keyword in &record.keywords {
            *per_keyword.entry(keyword).or_default().entry(year).or_insert(0) += 1;
        }
    }

    let (start, end) = span?;
    Some(
        per_keyword
            .into_iter()
            .map(|(keyword, counts)| {
                (keyword.clone(), YearlySeries::from_year_counts(&counts, start, end))
            })
            .collect(),
    )
}

/// Rank the bursting keywords of a corpus, strongest first.
pub fn detect_keyword_bursts(corpus: &NormalizedCorpus, config: &BurstConfig) -> Vec<KeywordBurst> {
    let Some(series) = keyword_series(corpus) else {
        return Vec::new();
    };

    let mut bursts: Vec<KeywordBurst> = series
        .into_iter()
        .filter(|(_, s)| s.total() >= u64::from(config.min_support))
        .filter_map(|(term, s)| {
            let signal = detect_burst(&s, config);
            (signal.strength > config.threshold).then(|| KeywordBurst {
                term,
                strength: signal.strength,
                bursting_years: signal.bursting_years,
                total_frequency: s.total(),
                max_frequency: s.max(),
                years_active: s.counts.iter().filter(|&&c| c > 0).count(),
            })
        })
        .collect();

    bursts.sort_by(|a, b| {
        b.strength
            .total_cmp(&a.strength)
            .then_with(|| a.term.cmp(&b.term))
    });
    if let Some(max) = config.max_results {
        bursts.truncate(max);
    }

    debug!(bursts = bursts.len(), "detected keyword bursts");
    bursts
}

/// Keyword activity over the corpus timeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemporalSummary {
    pub start_year: i32,
    pub end_year: i32,
    /// Years with at least one keyword occurrence.
    pub active_years: usize,
    pub peak_year: i32,
    pub peak_keyword_count: u32,
    pub distinct_keywords: usize,
    pub average_keywords_per_year: f64,
    pub diversity_trend: DiversityTrend,
    pub growth_pattern: Trend,
}

/// Summarize keyword occurrences per year; `None` without dated keywords.
pub fn temporal_summary(corpus: &NormalizedCorpus) -> Option<TemporalSummary> {
    let mut occurrences: BTreeMap<i32, u32> = BTreeMap::new();
    let mut distinct: BTreeMap<i32, BTreeSet<&CompactString>> = BTreeMap::new();
    for record in &corpus.records {
        let Some(year) = record.year else { continue };
        if record.keywords.is_empty() {
            continue;
        }
        *occurrences.entry(year).or_insert(0) += record.keywords.len() as u32;
        distinct.entry(year).or_default().extend(record.keywords.iter());
    }

    let (&start_year, _) = occurrences.first_key_value()?;
    let (&end_year, _) = occurrences.last_key_value()?;
    // earliest year wins a tie
    let (peak_year, peak_keyword_count) = occurrences
        .iter()
        .fold((start_year, 0), |best, (&year, &count)| {
            if count > best.1 { (year, count) } else { best }
        });

    let counts: Vec<u32> = occurrences.values().copied().collect();
    let distinct_counts: Vec<u32> = distinct.values().map(|s| s.len() as u32).collect();
    let distinct_keywords = distinct.values().flatten().collect::<BTreeSet<_>>().len();

    Some(TemporalSummary {
        start_year,
        end_year,
        active_years: counts.len(),
        peak_year,
        peak_keyword_count,
        distinct_keywords,
        average_keywords_per_year: counts.iter().map(|&c| f64::from(c)).sum::<f64>()
            / counts.len() as f64,
        diversity_trend: classify_diversity(&distinct_counts),
        growth_pattern: classify_trend(&counts),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::NormalizedRecord;
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn keyworded(year: i32, keywords: &[&str]) -> NormalizedRecord {
        NormalizedRecord {
            year: Some(year),
            keywords: keywords.iter().map(|&k| k.into()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_detect_burst_marks_window_years() {
        // baseline 12 / 6 = 2; window [0, 6, 6] has rate 4, ratio 2
        let series = YearlySeries::new(2000, vec![0, 0, 0, 6, 6, 0]);
        let signal = detect_burst(&series, &BurstConfig::default());

        assert_eq!(signal.bursting_years, vec![2002, 2003, 2004, 2005]);
        assert!((signal.strength - 2.0).abs() < 1e-9);
    }

    #[rstest]
    #[case(vec![], "empty")]
    #[case(vec![0, 0, 0, 0], "no occurrences")]
    #[case(vec![9], "single year")]
    #[case(vec![2, 2, 2, 2], "flat")]
    fn test_detect_burst_none(#[case] counts: Vec<u32>, #[case] _label: &str) {
        let signal = detect_burst(&YearlySeries::new(2000, counts), &BurstConfig::default());
        assert!(!signal.is_burst());
        assert_eq!(signal.strength, 0.0);
    }

    #[test]
    fn test_window_shrinks_to_series_length() {
        // window 3 over 2 years covers the whole series, so the ratio is 1
        let config = BurstConfig {
            threshold: 0.5,
            ..Default::default()
        };
        let signal = detect_burst(&YearlySeries::new(2000, vec![1, 5]), &config);
        assert_eq!(signal.bursting_years, vec![2000, 2001]);
        assert!((signal.strength - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_year_follows_threshold() {
        let series = YearlySeries::new(2020, vec![9]);
        let loose = BurstConfig {
            threshold: 0.5,
            ..Default::default()
        };

        let signal = detect_burst(&series, &loose);
        assert_eq!(signal.bursting_years, vec![2020]);
        assert!((signal.strength - 1.0).abs() < 1e-9);
        assert!(!detect_burst(&series, &BurstConfig::default()).is_burst());
    }

    #[test]
    fn test_ratio_must_be_strictly_above_threshold() {
        // baseline 1, window of one year holding 3 gives ratio exactly 3
        let series = YearlySeries::new(2000, vec![0, 0, 3]);
        let at = BurstConfig {
            window: 1,
            threshold: 3.0,
            ..Default::default()
        };
        assert!(!detect_burst(&series, &at).is_burst());

        let below = BurstConfig {
            threshold: 2.9,
            ..at
        };
        assert_eq!(detect_burst(&series, &below).bursting_years, vec![2002]);
    }

    #[test]
    fn test_from_year_counts_fills_gaps() {
        let counts = BTreeMap::from([(2001, 2), (2004, 1), (1990, 7)]);
        let series = YearlySeries::from_year_counts(&counts, 2000, 2004);
        assert_eq!(series.counts, vec![0, 2, 0, 0, 1]);
        assert_eq!(series.year_at(4), 2004);
    }

    #[test]
    fn test_keyword_bursts() {
        let mut records = vec![
            keyworded(2010, &["citation"]),
            keyworded(2011, &["citation"]),
            keyworded(2012, &["citation"]),
            keyworded(2013, &["citation"]),
        ];
        for _ in 0..4 {
            records.push(keyworded(2017, &["altmetrics", "citation"]));
            records.push(keyworded(2018, &["altmetrics"]));
        }
        // rare terms never reach minimum support
        records.push(keyworded(2018, &["rare"]));
        let corpus = NormalizedCorpus { records };

        let bursts = detect_keyword_bursts(&corpus, &BurstConfig::default());
        let terms: Vec<&str> = bursts.iter().map(|b| b.term.as_str()).collect();

        assert_eq!(terms, vec!["altmetrics"]);
        assert_eq!(bursts[0].bursting_years, vec![2016, 2017, 2018]);
        assert_eq!(bursts[0].total_frequency, 8);
        assert_eq!(bursts[0].max_frequency, 4);
        assert_eq!(bursts[0].years_active, 2);
    }

    #[test]
    fn test_keyword_bursts_truncated_and_sorted() {
        let mut records = vec![keyworded(2000, &["filler"])];
        for _ in 0..6 {
            records.push(keyworded(2009, &["b", "a", "c"]));
        }
        for _ in 0..3 {
            records.push(keyworded(2000, &["c"]));
        }
        let corpus = NormalizedCorpus { records };

        // a and b tie on strength, c is weaker
        let all: Vec<_> = detect_keyword_bursts(&corpus, &BurstConfig::default())
            .into_iter()
            .map(|b| b.term.to_string())
            .collect();
        assert_eq!(all, vec!["a", "b", "c"]);

        let config = BurstConfig {
            max_results: Some(2),
            ..Default::default()
        };
        assert_eq!(detect_keyword_bursts(&corpus, &config).len(), 2);
    }

    #[test]
    fn test_no_dated_keywords() {
        let corpus = NormalizedCorpus {
            records: vec![NormalizedRecord {
                keywords: vec!["x".into()],
                ..Default::default()
            }],
        };
        assert!(keyword_series(&corpus).is_none());
        assert!(detect_keyword_bursts(&corpus, &BurstConfig::default()).is_empty());
        assert!(temporal_summary(&corpus).is_none());
    }

    #[test]
    fn test_temporal_summary() {
        let corpus = NormalizedCorpus {
            records: vec![
                keyworded(2018, &["a"]),
                keyworded(2019, &["a", "b"]),
                keyworded(2019, &["b", "c"]),
                keyworded(2020, &["a", "b", "c", "d", "e", "f"]),
                keyworded(2021, &[]),
            ],
        };
        let summary = temporal_summary(&corpus).unwrap();

        assert_eq!((summary.start_year, summary.end_year), (2018, 2020));
        assert_eq!(summary.active_years, 3);
        assert_eq!(summary.peak_year, 2020);
        assert_eq!(summary.peak_keyword_count, 6);
        assert_eq!(summary.distinct_keywords, 6);
        assert!((summary.average_keywords_per_year - 11.0 / 3.0).abs() < 1e-9);
        assert_eq!(summary.diversity_trend, DiversityTrend::Increasing);
        assert_eq!(summary.growth_pattern, Trend::Linear);
    }

    #[test]
    fn test_config_defaults_deserialize() {
        let config: BurstConfig = serde_json::from_str(r#"{"threshold": 2.0}"#).unwrap();
        assert_eq!(config.window, 3);
        assert_eq!(config.threshold, 2.0);
        assert_eq!(config.max_results, Some(50));
    }
}
