//! Per-author, per-venue and per-country accumulation.

use crate::metrics::indices::{g_index, h_index};
use crate::normalize::{NormalizedCorpus, NormalizedRecord};
use compact_str::CompactString;
use serde::Serialize;
use std::collections::BTreeMap;

/// Accumulated output and impact of one entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EntityStats {
    /// Records the entity appears on.
    pub documents: u32,
    /// Sum of those records' citation counts.
    pub citations: u64,
    /// Citation count of each record, in insertion order.
    pub citation_counts: Vec<i64>,
    /// Documents per publication year.
    pub years: BTreeMap<i32, u32>,
}

impl EntityStats {
    fn add(&mut self, record: &NormalizedRecord) {
        self.documents += 1;
        self.citations += u64::from(record.citations);
        self.citation_counts.push(i64::from(record.citations));
        if let Some(year) = record.year {
            *self.years.entry(year).or_insert(0) += 1;
        }
    }

    /// Mean citations per document, 0 when there are no documents.
    pub fn average_citations(&self) -> f64 {
        if self.documents == 0 {
            0.0
        } else {
            self.citations as f64 / f64::from(self.documents)
        }
    }

    pub fn h_index(&self) -> usize {
        h_index(&self.citation_counts)
    }

    pub fn g_index(&self) -> usize {
        g_index(&self.citation_counts)
    }

    /// First and last year with a document.
    pub fn active_years(&self) -> Option<(i32, i32)> {
        let first = self.years.keys().next()?;
        let last = self.years.keys().next_back()?;
        Some((*first, *last))
    }

    pub fn merge(&mut self, other: EntityStats) {
        self.documents += other.documents;
        self.citations += other.citations;
        self.citation_counts.extend(other.citation_counts);
        for (year, count) in other.years {
            *self.years.entry(year).or_insert(0) += count;
        }
    }
}

pub type EntityStatsMap = BTreeMap<CompactString, EntityStats>;

/// Ordering used by [`EntityAggregates::top`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankBy {
    Documents,
    Citations,
}

/// The three entity maps built in one pass over a corpus.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EntityAggregates {
    pub authors: EntityStatsMap,
    pub venues: EntityStatsMap,
    pub countries: EntityStatsMap,
}

impl EntityAggregates {
    pub fn add_record(&mut self, record: &NormalizedRecord) {
        for author in &record.authors {
            self.authors.entry(author.clone()).or_default().add(record);
        }
        if let Some(venue) = &record.venue {
            self.venues.entry(venue.clone()).or_default().add(record);
        }
        // countries are already unique per record
        for country in &record.countries {
            self.countries.entry(country.clone()).or_default().add(record);
        }
    }

    /// Combine two partial aggregates by summation.
    #[must_use]
    pub fn merge(mut self, other: EntityAggregates) -> Self {
        merge_maps(&mut self.authors, other.authors);
        merge_maps(&mut self.venues, other.venues);
        merge_maps(&mut self.countries, other.countries);
        self
    }

    /// The `n` highest-ranked entities of a map, ties broken by label.
    pub fn top(map: &EntityStatsMap, rank_by: RankBy, n: usize) -> Vec<(&CompactString, &EntityStats)> {
        let key = |stats: &EntityStats| match rank_by {
            RankBy::Documents => u64::from(stats.documents),
            RankBy::Citations => stats.citations,
        };
        let mut ranked: Vec<_> = map.iter().collect();
        ranked.sort_by(|a, b| key(b.1).cmp(&key(a.1)).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(n);
        ranked
    }
}

fn merge_maps(into: &mut EntityStatsMap, from: EntityStatsMap) {
    for (label, stats) in from {
        into.entry(label).or_default().merge(stats);
    }
}

/// Build author, venue and country aggregates for a corpus.
///
/// With the `parallel` feature and `run_in_parallel` set, records are folded
/// into per-worker partial maps that are merged at the end.
pub fn aggregate(corpus: &NormalizedCorpus, run_in_parallel: bool) -> EntityAggregates {
    if run_in_parallel {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            return corpus
                .records
                .par_iter()
                .fold(EntityAggregates::default, |mut partial, record| {
                    partial.add_record(record);
                    partial
                })
                .reduce(EntityAggregates::default, EntityAggregates::merge);
        }
    }

    let mut aggregates = EntityAggregates::default();
    for record in &corpus.records {
        aggregates.add_record(record);
    }
    aggregates
}
