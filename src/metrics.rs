//! Bibliometric indicators.
//!
//! Everything here works on a [`NormalizedCorpus`](crate::normalize::NormalizedCorpus)
//! or on plain citation lists and returns plain, serializable values.
//!
//! ```
//! use bibmetrics::metrics::{
//!     PriceThreshold, author_publication_counts, impact_summary, price_core_by_total_authors,
//! };
//! use bibmetrics::normalize::Normalizer;
//! use bibmetrics::Record;
//!
//! let records: Vec<Record> = [(vec!["Smith, J", "Lee, K"], 12), (vec!["Smith, J"], 3)]
//!     .into_iter()
//!     .map(|(authors, citations)| Record {
//!         authors: authors.into_iter().map(String::from).collect(),
//!         citations,
//!         ..Default::default()
//!     })
//!     .collect();
//! let (corpus, _) = Normalizer::new().normalize(&records);
//!
//! assert_eq!(impact_summary(&corpus).h_index, 2);
//!
//! let counts = author_publication_counts(&corpus);
//! let price = price_core_by_total_authors(&counts, corpus.len(), PriceThreshold::Standard);
//! assert_eq!(price.core_authors.len(), 1);
//! assert!(price.satisfied);
//! ```

mod aggregate;
mod indices;
mod price;
mod summary;

pub use aggregate::{EntityAggregates, EntityStats, EntityStatsMap, RankBy, aggregate};
pub use indices::{g_index, h_index, parse_citation_values};
pub use price::{
    AuthorCounts, PriceLawConfig, PriceLawResult, PriceThreshold, PriceVariant, ProductivityStats,
    author_publication_counts, lotka_distribution, price_core_by_max_productivity,
    price_core_by_total_authors, price_law,
};
pub use summary::{
    ArticleAges, CollaborationSummary, ImpactSummary, InternationalCollaboration, ReferenceStats,
    VenueAuthorship, YearlyTrend, article_ages, collaboration_summary, impact_summary,
    international_collaboration, publications_by_type, publications_per_year, reference_stats,
    research_trends, venue_authorship,
};
