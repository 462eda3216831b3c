//! Analysis configuration.
//!
//! [`AnalysisConfig`] gathers every tunable of a pipeline run. It deserializes
//! from any serde format; omitted keys fall back to their defaults.
//!
//! ```
//! use bibmetrics::AnalysisConfig;
//! use bibmetrics::metrics::{PriceThreshold, PriceVariant};
//!
//! let config = AnalysisConfig::default()
//!     .with_cocitation_top_n(Some(100))
//!     .with_price_law(PriceVariant::TotalAuthors, PriceThreshold::Relaxed);
//!
//! assert!(config.validate().is_ok());
//! assert_eq!(config.burst.window, 3);
//! ```

use crate::burst::BurstConfig;
use crate::encoding::{DEFAULT_ENCODINGS, TextEncoding};
use crate::metrics::{PriceLawConfig, PriceThreshold, PriceVariant};
use crate::normalize::{CountryAliases, DelimiterPriority, KeywordSource, Normalizer};
use crate::{BiblioError, Result};
use serde::{Deserialize, Serialize};

/// Configuration for an [`Analyzer`](crate::Analyzer) run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Delimiters tried, in order, on multi-valued fields.
    pub delimiters: DelimiterPriority,
    /// Decoding fallback chain for byte input.
    pub encodings: Vec<TextEncoding>,
    /// Country aliases applied on top of the built-in ones.
    pub country_aliases: CountryAliases,
    pub keyword_source: KeywordSource,
    /// Restrict the analysis to records published in this inclusive range.
    pub year_span: Option<(i32, i32)>,
    pub burst: BurstConfig,
    pub price_law: PriceLawConfig,
    /// Restrict co-citation to the most cited references.
    pub cocitation_top_n: Option<usize>,
    /// Run the metric, network and burst stages concurrently.
    ///
    /// Only effective with the `parallel` feature.
    pub run_in_parallel: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            delimiters: DelimiterPriority::default(),
            encodings: DEFAULT_ENCODINGS.to_vec(),
            country_aliases: CountryAliases::empty(),
            keyword_source: KeywordSource::default(),
            year_span: None,
            burst: BurstConfig::default(),
            price_law: PriceLawConfig::default(),
            cocitation_top_n: None,
            run_in_parallel: false,
        }
    }
}

impl AnalysisConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_delimiters(mut self, delimiters: impl Into<DelimiterPriority>) -> Self {
        self.delimiters = delimiters.into();
        self
    }

    #[must_use]
    pub fn with_encodings(mut self, encodings: Vec<TextEncoding>) -> Self {
        self.encodings = encodings;
        self
    }

    #[must_use]
    pub fn with_country_aliases(mut self, country_aliases: CountryAliases) -> Self {
        self.country_aliases = country_aliases;
        self
    }

    #[must_use]
    pub fn with_keyword_source(mut self, keyword_source: KeywordSource) -> Self {
        self.keyword_source = keyword_source;
        self
    }

    #[must_use]
    pub fn with_year_span(mut self, start: i32, stop: i32) -> Self {
        self.year_span = Some((start, stop));
        self
    }

    #[must_use]
    pub fn with_burst(mut self, burst: BurstConfig) -> Self {
        self.burst = burst;
        self
    }

    #[must_use]
    pub fn with_price_law(mut self, variant: PriceVariant, threshold: PriceThreshold) -> Self {
        self.price_law = PriceLawConfig { variant, threshold };
        self
    }

    #[must_use]
    pub fn with_cocitation_top_n(mut self, top_n: Option<usize>) -> Self {
        self.cocitation_top_n = top_n;
        self
    }

    #[must_use]
    pub fn with_parallel(mut self, run_in_parallel: bool) -> Self {
        self.run_in_parallel = run_in_parallel;
        self
    }

    /// Check the values the pipeline cannot work with.
    ///
    /// # Errors
    ///
    /// Returns [`BiblioError::InvalidConfig`] naming the first offending option.
    pub fn validate(&self) -> Result<()> {
        if self.delimiters.is_empty() {
            return Err(invalid("delimiter list must not be empty"));
        }
        if self.encodings.is_empty() {
            return Err(invalid("encoding chain must not be empty"));
        }
        if self.burst.window == 0 {
            return Err(invalid("burst window must be at least one year"));
        }
        if !self.burst.threshold.is_finite() || self.burst.threshold <= 0.0 {
            return Err(invalid(format!(
                "burst threshold must be positive, got {}",
                self.burst.threshold
            )));
        }
        let percentage = self.price_law.threshold.percentage();
        if !(0.0..=100.0).contains(&percentage) {
            return Err(invalid(format!(
                "Price's Law threshold must be between 0 and 100, got {}",
                percentage
            )));
        }
        if let Some((start, stop)) = self.year_span {
            if start > stop {
                return Err(invalid(format!("year span {}-{} is reversed", start, stop)));
            }
        }
        Ok(())
    }

    /// A normalizer honoring these settings; extra country aliases override
    /// the built-in ones.
    pub fn normalizer(&self) -> Normalizer {
        let mut aliases = CountryAliases::default();
        aliases.extend(&self.country_aliases);
        Normalizer::new()
            .with_delimiters(self.delimiters.clone())
            .with_country_aliases(aliases)
            .with_keyword_source(self.keyword_source)
    }
}

fn invalid(message: impl Into<String>) -> BiblioError {
    BiblioError::InvalidConfig(message.into())
}
