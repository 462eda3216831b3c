//! Weighted co-occurrence graphs.
//!
//! Every graph is built the same way: each record contributes one entity set,
//! the set is de-duplicated, and every unordered pair in it adds one to the
//! weight of the edge `(a, b)` with `a < b`. Sets with fewer than two distinct
//! entities add nothing.
//!
//! # Example
//!
//! ```
//! use bibmetrics::network::build_cooccurrence;
//! use compact_str::CompactString;
//!
//! let sets: Vec<Vec<CompactString>> = vec![
//!     vec!["A".into(), "B".into(), "C".into()],
//!     vec!["B".into(), "C".into(), "D".into()],
//! ];
//! let graph = build_cooccurrence(&sets, false);
//!
//! assert_eq!(graph.weight("C", "B"), Some(2));
//! assert_eq!(graph.weight("A", "D"), None);
//! assert_eq!(graph.edge_count(), 5);
//! ```

use crate::normalize::NormalizedCorpus;
use compact_str::CompactString;
use itertools::Itertools;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Canonically ordered endpoint pair, `0 < 1`.
pub type EdgeKey = (CompactString, CompactString);

/// One edge of an exported edge list.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct WeightedEdge {
    pub source: CompactString,
    pub target: CompactString,
    pub weight: u32,
}

/// Undirected graph whose edge weights count co-occurrences.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CooccurrenceGraph {
    edges: BTreeMap<EdgeKey, u32>,
}

impl CooccurrenceGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one record's entities.
    pub fn add_entities(&mut self, entities: &[CompactString]) {
        let distinct: BTreeSet<&CompactString> = entities.iter().collect();
        // BTreeSet order makes every pair come out as (smaller, larger)
        for (a, b) in distinct.iter().copied().tuple_combinations() {
            *self.edges.entry((a.clone(), b.clone())).or_insert(0) += 1;
        }
    }

    /// Combine two partial graphs by summing the weights of shared edges.
    #[must_use]
    pub fn merge(mut self, other: CooccurrenceGraph) -> Self {
        for (key, weight) in other.edges {
            *self.edges.entry(key).or_insert(0) += weight;
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn node_count(&self) -> usize {
        self.nodes().len()
    }

    /// Every entity with at least one edge, sorted.
    pub fn nodes(&self) -> Vec<&CompactString> {
        self.edges
            .keys()
            .flat_map(|(a, b)| [a, b])
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Weight of the edge between `a` and `b`, in either order.
    pub fn weight(&self, a: &str, b: &str) -> Option<u32> {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        self.edges
            .get(&(CompactString::from(low), CompactString::from(high)))
            .copied()
    }

    pub fn edges(&self) -> impl Iterator<Item = (&EdgeKey, u32)> {
        self.edges.iter().map(|(key, &weight)| (key, weight))
    }

    pub fn edge_list(&self) -> Vec<WeightedEdge> {
        self.edges
            .iter()
            .map(|((source, target), &weight)| WeightedEdge {
                source: source.clone(),
                target: target.clone(),
                weight,
            })
            .collect()
    }

    /// Number of distinct neighbours of each node.
    pub fn degree(&self) -> BTreeMap<&CompactString, usize> {
        let mut degree = BTreeMap::new();
        for (a, b) in self.edges.keys() {
            *degree.entry(a).or_insert(0) += 1;
            *degree.entry(b).or_insert(0) += 1;
        }
        degree
    }

    /// Sum of the weights of each node's edges.
    pub fn strength(&self) -> BTreeMap<&CompactString, u64> {
        let mut strength = BTreeMap::new();
        for ((a, b), &weight) in &self.edges {
            *strength.entry(a).or_insert(0) += u64::from(weight);
            *strength.entry(b).or_insert(0) += u64::from(weight);
        }
        strength
    }

    /// The `n` heaviest edges, ties in endpoint order.
    pub fn top_edges(&self, n: usize) -> Vec<WeightedEdge> {
        let mut edges = self.edge_list();
        edges.sort_by(|x, y| {
            y.weight
                .cmp(&x.weight)
                .then_with(|| (&x.source, &x.target).cmp(&(&y.source, &y.target)))
        });
        edges.truncate(n);
        edges
    }
}

impl Serialize for CooccurrenceGraph {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("CooccurrenceGraph", 2)?;
        state.serialize_field("nodes", &self.nodes())?;
        state.serialize_field("edges", &self.edge_list())?;
        state.end()
    }
}

/// Build a graph from one entity set per record.
///
/// With the `parallel` feature and `run_in_parallel` set, each rayon worker
/// folds into its own graph and the partial graphs are merged at the end.
pub fn build_cooccurrence<S>(sets: &[S], run_in_parallel: bool) -> CooccurrenceGraph
where
    S: AsRef<[CompactString]> + Sync,
{
    if run_in_parallel {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            return sets
                .par_iter()
                .fold(CooccurrenceGraph::new, |mut graph, set| {
                    graph.add_entities(set.as_ref());
                    graph
                })
                .reduce(CooccurrenceGraph::new, CooccurrenceGraph::merge);
        }
    }

    let mut graph = CooccurrenceGraph::new();
    for set in sets {
        graph.add_entities(set.as_ref());
    }
    graph
}

/// Authors who wrote a record together.
pub fn coauthorship(corpus: &NormalizedCorpus, run_in_parallel: bool) -> CooccurrenceGraph {
    let sets: Vec<&[CompactString]> = corpus.records.iter().map(|r| r.authors.as_slice()).collect();
    build_cooccurrence(&sets, run_in_parallel)
}

/// Countries that appear together on a record.
pub fn country_collaboration(corpus: &NormalizedCorpus, run_in_parallel: bool) -> CooccurrenceGraph {
    let sets: Vec<&[CompactString]> = corpus.records.iter().map(|r| r.countries.as_slice()).collect();
    build_cooccurrence(&sets, run_in_parallel)
}

/// Keywords that appear together on a record.
pub fn keyword_cooccurrence(corpus: &NormalizedCorpus, run_in_parallel: bool) -> CooccurrenceGraph {
    let sets: Vec<&[CompactString]> = corpus.records.iter().map(|r| r.keywords.as_slice()).collect();
    build_cooccurrence(&sets, run_in_parallel)
}

/// References cited together by a record.
///
/// With `top_n`, only the `n` most cited references (ties by key) take part.
pub fn cocitation(
    corpus: &NormalizedCorpus,
    top_n: Option<usize>,
    run_in_parallel: bool,
) -> CooccurrenceGraph {
    let Some(n) = top_n else {
        let sets: Vec<&[CompactString]> =
            corpus.records.iter().map(|r| r.references.as_slice()).collect();
        return build_cooccurrence(&sets, run_in_parallel);
    };

    let retained = most_cited_references(corpus, n);
    debug!(references = retained.len(), "restricted co-citation universe");

    let sets: Vec<Vec<CompactString>> = corpus
        .records
        .iter()
        .map(|r| {
            r.references
                .iter()
                .filter(|reference| retained.contains(*reference))
                .cloned()
                .collect()
        })
        .collect();
    build_cooccurrence(&sets, run_in_parallel)
}

/// Keys of the `n` references cited by the most records.
pub fn most_cited_references(corpus: &NormalizedCorpus, n: usize) -> BTreeSet<CompactString> {
    let mut counts: BTreeMap<&CompactString, usize> = BTreeMap::new();
    for reference in corpus.records.iter().flat_map(|r| r.references.iter().unique()) {
        *counts.entry(reference).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .sorted_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)))
        .take(n)
        .map(|(reference, _)| reference.clone())
        .collect()
}

/// The graphs derived from one corpus.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct Networks {
    pub coauthorship: CooccurrenceGraph,
    pub countries: CooccurrenceGraph,
    pub cocitation: CooccurrenceGraph,
    pub keywords: CooccurrenceGraph,
}

impl Networks {
    pub fn build(corpus: &NormalizedCorpus, cocitation_top_n: Option<usize>, run_in_parallel: bool) -> Self {
        let networks = Self {
            coauthorship: coauthorship(corpus, run_in_parallel),
            countries: country_collaboration(corpus, run_in_parallel),
            cocitation: cocitation(corpus, cocitation_top_n, run_in_parallel),
            keywords: keyword_cooccurrence(corpus, run_in_parallel),
        };
        debug!(
            coauthorship = networks.coauthorship.edge_count(),
            countries = networks.countries.edge_count(),
            cocitation = networks.cocitation.edge_count(),
            keywords = networks.keywords.edge_count(),
            "built networks"
        );
        networks
    }
}
