//! Corpus-wide impact, collaboration and output summaries.

use crate::metrics::indices::{g_index, h_index};
use crate::normalize::NormalizedCorpus;
use compact_str::CompactString;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Corpus size above which the highly-cited cut-off is the 90th percentile
/// rather than the maximum.
const PERCENTILE_MIN_PAPERS: usize = 10;

/// Citation impact of the whole corpus.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImpactSummary {
    pub papers: usize,
    pub total_citations: u64,
    pub average_citations: f64,
    pub h_index: usize,
    pub g_index: usize,
    /// Citation count a paper needs to be highly cited.
    pub highly_cited_threshold: f64,
    pub highly_cited_papers: usize,
    pub uncited_papers: usize,
    /// Citation count to number of papers with that count.
    pub citation_distribution: BTreeMap<u32, usize>,
}

/// Co-authorship statistics over papers with at least one author.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CollaborationSummary {
    pub papers: usize,
    pub single_author_papers: usize,
    pub multi_author_papers: usize,
    pub average_authors_per_paper: f64,
    pub max_authors_per_paper: usize,
    /// Share of multi-author papers, in percent.
    pub collaboration_rate: f64,
    /// Team size to number of papers with that size.
    pub team_size_distribution: BTreeMap<usize, usize>,
}

/// Papers spanning one or several countries.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InternationalCollaboration {
    pub single_country_papers: usize,
    pub multi_country_papers: usize,
    /// Multi-country papers as a percentage of every paper in the corpus.
    pub international_percentage: f64,
}

/// Age of each dated paper relative to the most recent one.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ArticleAges {
    pub latest_year: Option<i32>,
    pub ages: Vec<u32>,
    pub average_age: f64,
}

/// Cited-reference totals declared by the records (`NR`).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReferenceStats {
    pub total_cited_references: u64,
    /// Mean over every paper; papers without a count contribute 0.
    pub average_per_document: f64,
}

/// Author breadth of one venue.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VenueAuthorship {
    pub documents: usize,
    pub unique_authors: usize,
    /// Unique authors per document.
    pub author_diversity: f64,
}

/// Output and topics of one publication year.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct YearlyTrend {
    pub papers: usize,
    pub distinct_keywords: usize,
    pub distinct_authors: usize,
    /// Most frequent keywords with their paper counts, ties broken by label.
    pub top_keywords: Vec<(CompactString, usize)>,
    pub top_authors: Vec<(CompactString, usize)>,
}

/// Linearly interpolated percentile of an ascending slice.
fn percentile(sorted: &[u32], p: f64) -> f64 {
    match sorted.len() {
        0 => 0.0,
        1 => f64::from(sorted[0]),
        n => {
            let rank = p / 100.0 * (n - 1) as f64;
            let lower = rank.floor() as usize;
            let upper = rank.ceil() as usize;
            let weight = rank - lower as f64;
            f64::from(sorted[lower]) + (f64::from(sorted[upper]) - f64::from(sorted[lower])) * weight
        }
    }
}

pub fn impact_summary(corpus: &NormalizedCorpus) -> ImpactSummary {
    if corpus.is_empty() {
        return ImpactSummary::default();
    }

    let mut citations: Vec<u32> = corpus.records.iter().map(|r| r.citations).collect();
    citations.sort_unstable();
    let values: Vec<i64> = citations.iter().map(|&c| i64::from(c)).collect();

    let total: u64 = citations.iter().map(|&c| u64::from(c)).sum();
    let threshold = if citations.len() > PERCENTILE_MIN_PAPERS {
        percentile(&citations, 90.0)
    } else {
        citations.last().map_or(0.0, |&max| f64::from(max))
    };

    let mut distribution = BTreeMap::new();
    for &count in &citations {
        *distribution.entry(count).or_insert(0) += 1;
    }

    ImpactSummary {
        papers: citations.len(),
        total_citations: total,
        average_citations: total as f64 / citations.len() as f64,
        h_index: h_index(&values),
        g_index: g_index(&values),
        highly_cited_threshold: threshold,
        highly_cited_papers: citations.iter().filter(|&&c| f64::from(c) >= threshold).count(),
        uncited_papers: citations.iter().filter(|&&c| c == 0).count(),
        citation_distribution: distribution,
    }
}

pub fn collaboration_summary(corpus: &NormalizedCorpus) -> CollaborationSummary {
    let team_sizes: Vec<usize> = corpus
        .records
        .iter()
        .map(|r| r.authors.len())
        .filter(|&n| n > 0)
        .collect();
    if team_sizes.is_empty() {
        return CollaborationSummary::default();
    }

    let papers = team_sizes.len();
    let single = team_sizes.iter().filter(|&&n| n == 1).count();
    let mut distribution = BTreeMap::new();
    for &size in &team_sizes {
        *distribution.entry(size).or_insert(0) += 1;
    }

    CollaborationSummary {
        papers,
        single_author_papers: single,
        multi_author_papers: papers - single,
        average_authors_per_paper: team_sizes.iter().sum::<usize>() as f64 / papers as f64,
        max_authors_per_paper: team_sizes.iter().copied().max().unwrap_or(0),
        collaboration_rate: (papers - single) as f64 / papers as f64 * 100.0,
        team_size_distribution: distribution,
    }
}

pub fn international_collaboration(corpus: &NormalizedCorpus) -> InternationalCollaboration {
    let single = corpus.records.iter().filter(|r| r.countries.len() == 1).count();
    let multi = corpus.records.iter().filter(|r| r.countries.len() > 1).count();
    let percentage = if corpus.is_empty() {
        0.0
    } else {
        multi as f64 / corpus.len() as f64 * 100.0
    };

    InternationalCollaboration {
        single_country_papers: single,
        multi_country_papers: multi,
        international_percentage: percentage,
    }
}

/// Papers per publication year; undated papers are not counted.
pub fn publications_per_year(corpus: &NormalizedCorpus) -> BTreeMap<i32, usize> {
    let mut per_year = BTreeMap::new();
    for year in corpus.records.iter().filter_map(|r| r.year) {
        *per_year.entry(year).or_insert(0) += 1;
    }
    per_year
}

/// Papers per document type (`DT`); untyped papers are not counted.
pub fn publications_by_type(corpus: &NormalizedCorpus) -> BTreeMap<String, usize> {
    let mut per_type = BTreeMap::new();
    for document_type in corpus.records.iter().filter_map(|r| r.document_type.as_deref()) {
        *per_type.entry(document_type.to_string()).or_insert(0) += 1;
    }
    per_type
}

pub fn article_ages(corpus: &NormalizedCorpus) -> ArticleAges {
    let Some((_, latest)) = corpus.year_range() else {
        return ArticleAges::default();
    };

    let ages: Vec<u32> = corpus
        .records
        .iter()
        .filter_map(|r| r.year)
        .map(|year| latest.abs_diff(year))
        .collect();
    let average_age = if ages.is_empty() {
        0.0
    } else {
        ages.iter().map(|&a| f64::from(a)).sum::<f64>() / ages.len() as f64
    };

    ArticleAges {
        latest_year: Some(latest),
        ages,
        average_age,
    }
}

pub fn reference_stats(corpus: &NormalizedCorpus) -> ReferenceStats {
    if corpus.is_empty() {
        return ReferenceStats::default();
    }

    let total: u64 = corpus
        .records
        .iter()
        .filter_map(|r| r.reference_count)
        .map(u64::from)
        .sum();
    ReferenceStats {
        total_cited_references: total,
        average_per_document: total as f64 / corpus.len() as f64,
    }
}

/// Documents and distinct authors per venue; records without a venue are skipped.
pub fn venue_authorship(corpus: &NormalizedCorpus) -> BTreeMap<CompactString, VenueAuthorship> {
    let mut per_venue: BTreeMap<&CompactString, (usize, BTreeSet<&CompactString>)> = BTreeMap::new();
    for record in &corpus.records {
        let Some(venue) = &record.venue else { continue };
        let (documents, authors) = per_venue.entry(venue).or_default();
        *documents += 1;
        authors.extend(&record.authors);
    }

    per_venue
        .into_iter()
        .map(|(venue, (documents, authors))| {
            let profile = VenueAuthorship {
                documents,
                unique_authors: authors.len(),
                author_diversity: authors.len() as f64 / documents as f64,
            };
            (venue.clone(), profile)
        })
        .collect()
}

/// Per-year paper counts with the `top_n` keywords and authors of each year.
/// Undated papers are not counted.
pub fn research_trends(corpus: &NormalizedCorpus, top_n: usize) -> BTreeMap<i32, YearlyTrend> {
    #[derive(Default)]
    struct YearCounts<'a> {
        papers: usize,
        keywords: BTreeMap<&'a CompactString, usize>,
        authors: BTreeMap<&'a CompactString, usize>,
    }

    let mut per_year: BTreeMap<i32, YearCounts> = BTreeMap::new();
    for record in &corpus.records {
        let Some(year) = record.year else { continue };
        let counts = per_year.entry(year).or_default();
        counts.papers += 1;
        for keyword in record.keywords.iter().collect::<BTreeSet<_>>() {
            *counts.keywords.entry(keyword).or_insert(0) += 1;
        }
        for author in &record.authors {
            *counts.authors.entry(author).or_insert(0) += 1;
        }
    }

    per_year
        .into_iter()
        .map(|(year, counts)| {
            let trend = YearlyTrend {
                papers: counts.papers,
                distinct_keywords: counts.keywords.len(),
                distinct_authors: counts.authors.len(),
                top_keywords: most_common(counts.keywords, top_n),
                top_authors: most_common(counts.authors, top_n),
            };
            (year, trend)
        })
        .collect()
}

fn most_common(counts: BTreeMap<&CompactString, usize>, n: usize) -> Vec<(CompactString, usize)> {
    let mut ranked: Vec<_> = counts.into_iter().collect();
    // stable sort keeps label order among equal counts
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
        .into_iter()
        .take(n)
        .map(|(label, count)| (label.clone(), count))
        .collect()
}
