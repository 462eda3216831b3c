//! End-to-end analysis.
//!
//! [`Analyzer`] owns the configuration and the stage objects of one analysis
//! and runs decoding, parsing, normalization and the three consumer stages
//! (metrics, networks, bursts) in order. The consumers only read the
//! normalized corpus; with `run_in_parallel` they run concurrently.

use crate::burst::{KeywordBurst, TemporalSummary, detect_keyword_bursts, temporal_summary};
use crate::config::AnalysisConfig;
use crate::diagnostics::Diagnostics;
use crate::encoding::TextEncoding;
use crate::metrics::{
    ArticleAges, CollaborationSummary, EntityAggregates, ImpactSummary, InternationalCollaboration,
    PriceLawResult, PriceVariant, ReferenceStats, VenueAuthorship, YearlyTrend, aggregate,
    article_ages, author_publication_counts, collaboration_summary, impact_summary,
    international_collaboration, price_core_by_max_productivity, price_core_by_total_authors,
    publications_by_type, publications_per_year, reference_stats, research_trends,
    venue_authorship,
};
use compact_str::CompactString;
use crate::network::Networks;
use crate::normalize::{NormalizedCorpus, Normalizer};
use crate::wos::WosParser;
use crate::{ParsedExport, Record, RecordParser, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::info;

/// Keywords and authors listed per year in [`AnalysisReport::research_trends`].
const TREND_TOP_N: usize = 10;

/// Both Price's Law computations, checked against the configured threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceLawReport {
    /// Variant chosen in the configuration.
    pub selected: PriceVariant,
    pub max_productivity: PriceLawResult,
    pub total_authors: PriceLawResult,
}

impl PriceLawReport {
    /// The result of the configured variant.
    pub fn selected(&self) -> &PriceLawResult {
        match self.selected {
            PriceVariant::MaxProductivity => &self.max_productivity,
            PriceVariant::TotalAuthors => &self.total_authors,
        }
    }
}

/// Corpus-level metrics.
#[derive(Debug)]
struct MetricsOutput {
    impact: ImpactSummary,
    collaboration: CollaborationSummary,
    international: InternationalCollaboration,
    publications_per_year: BTreeMap<i32, usize>,
    publications_by_type: BTreeMap<String, usize>,
    article_ages: ArticleAges,
    references: ReferenceStats,
    venue_authorship: BTreeMap<CompactString, VenueAuthorship>,
    research_trends: BTreeMap<i32, YearlyTrend>,
    aggregates: EntityAggregates,
    price_law: PriceLawReport,
}

/// Everything one analysis run produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub file_name: Option<String>,
    pub version: Option<String>,
    pub encoding: Option<TextEncoding>,
    /// Records parsed from the input, before any year filter.
    pub parsed_records: usize,
    /// The normalized records the indicators were computed from.
    pub corpus: NormalizedCorpus,
    pub impact: ImpactSummary,
    pub collaboration: CollaborationSummary,
    pub international: InternationalCollaboration,
    pub publications_per_year: BTreeMap<i32, usize>,
    pub publications_by_type: BTreeMap<String, usize>,
    pub article_ages: ArticleAges,
    pub references: ReferenceStats,
    pub venue_authorship: BTreeMap<CompactString, VenueAuthorship>,
    pub research_trends: BTreeMap<i32, YearlyTrend>,
    pub aggregates: EntityAggregates,
    pub price_law: PriceLawReport,
    pub networks: Networks,
    pub keyword_bursts: Vec<KeywordBurst>,
    /// `None` when no record carries both a year and a keyword.
    pub temporal: Option<TemporalSummary>,
    pub diagnostics: Diagnostics,
}

/// Runs the full analysis pipeline with one configuration.
///
/// # Examples
///
/// ```
/// use bibmetrics::{AnalysisConfig, Analyzer};
///
/// let analyzer = Analyzer::new(AnalysisConfig::default()).unwrap();
/// let report = analyzer.analyze_str("PT J\nAU Lee, K\nPY 2020\nTC 1\nER\nEF").unwrap();
/// assert_eq!(report.corpus.records[0].authors, vec!["Lee K"]);
/// ```
#[derive(Debug, Clone)]
pub struct Analyzer {
    config: AnalysisConfig,
    parser: WosParser,
    normalizer: Normalizer,
}

impl Analyzer {
    /// Validates `config` and prepares the pipeline stages.
    ///
    /// # Errors
    ///
    /// Returns [`crate::BiblioError::InvalidConfig`] when the configuration is unusable.
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            parser: WosParser::new().with_encodings(config.encodings.clone()),
            normalizer: config.normalizer(),
            config,
        })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Decode and analyze a tagged export.
    ///
    /// # Errors
    ///
    /// Returns [`crate::BiblioError::Decode`] when no configured encoding accepts the bytes.
    pub fn analyze_bytes(&self, bytes: &[u8]) -> Result<AnalysisReport> {
        let export = self.parser.parse_bytes(bytes)?;
        info!(
            records = export.records.len(),
            encoding = ?export.encoding,
            "parsed export"
        );
        Ok(self.analyze_export(export))
    }

    /// Analyze an already decoded tagged export.
    pub fn analyze_str(&self, text: &str) -> Result<AnalysisReport> {
        let export = self.parser.parse(text)?;
        info!(records = export.records.len(), "parsed export");
        Ok(self.analyze_export(export))
    }

    /// Analyze records obtained from any parser.
    pub fn analyze_export(&self, export: ParsedExport) -> AnalysisReport {
        let ParsedExport {
            file_name,
            version,
            encoding,
            records,
            mut diagnostics,
        } = export;

        let mut report = self.analyze_records(&records);
        diagnostics.extend(report.diagnostics);
        report.diagnostics = diagnostics;
        report.file_name = file_name;
        report.version = version;
        report.encoding = encoding;
        report
    }

    /// Normalize `records` and compute every indicator.
    pub fn analyze_records(&self, records: &[Record]) -> AnalysisReport {
        let (mut corpus, diagnostics) = self.normalizer.normalize(records);
        if let Some((start, stop)) = self.config.year_span {
            corpus = corpus.within_years(start, stop);
            info!(start, stop, records = corpus.len(), "applied year span");
        }
        info!(records = corpus.len(), "normalized corpus");

        let parallel = self.config.run_in_parallel;
        let (metrics, (networks, (keyword_bursts, temporal))) = join(
            parallel,
            || self.metrics(&corpus),
            || {
                join(
                    parallel,
                    || Networks::build(&corpus, self.config.cocitation_top_n, parallel),
                    || {
                        (
                            detect_keyword_bursts(&corpus, &self.config.burst),
                            temporal_summary(&corpus),
                        )
                    },
                )
            },
        );
        info!(
            edges = networks.coauthorship.edge_count(),
            bursts = keyword_bursts.len(),
            "analysis complete"
        );

        AnalysisReport {
            file_name: None,
            version: None,
            encoding: None,
            parsed_records: records.len(),
            impact: metrics.impact,
            collaboration: metrics.collaboration,
            international: metrics.international,
            publications_per_year: metrics.publications_per_year,
            publications_by_type: metrics.publications_by_type,
            article_ages: metrics.article_ages,
            references: metrics.references,
            venue_authorship: metrics.venue_authorship,
            research_trends: metrics.research_trends,
            aggregates: metrics.aggregates,
            price_law: metrics.price_law,
            networks,
            keyword_bursts,
            temporal,
            diagnostics,
            corpus,
        }
    }

    fn metrics(&self, corpus: &NormalizedCorpus) -> MetricsOutput {
        let counts = author_publication_counts(corpus);
        let threshold = self.config.price_law.threshold;
        let price_law = PriceLawReport {
            selected: self.config.price_law.variant,
            max_productivity: price_core_by_max_productivity(&counts, corpus.len(), threshold),
            total_authors: price_core_by_total_authors(&counts, corpus.len(), threshold),
        };

        MetricsOutput {
            impact: impact_summary(corpus),
            collaboration: collaboration_summary(corpus),
            international: international_collaboration(corpus),
            publications_per_year: publications_per_year(corpus),
            publications_by_type: publications_by_type(corpus),
            article_ages: article_ages(corpus),
            references: reference_stats(corpus),
            venue_authorship: venue_authorship(corpus),
            research_trends: research_trends(corpus, TREND_TOP_N),
            aggregates: aggregate(corpus, self.config.run_in_parallel),
            price_law,
        }
    }
}

/// Run two stages, concurrently when asked to and able to.
fn join<A, B, RA, RB>(parallel: bool, a: A, b: B) -> (RA, RB)
where
    A: FnOnce() -> RA + Send,
    B: FnOnce() -> RB + Send,
    RA: Send,
    RB: Send,
{
    if parallel {
        #[cfg(feature = "parallel")]
        {
            return rayon::join(a, b);
        }
    }
    (a(), b())
}
