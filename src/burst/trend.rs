//! Least-squares trend classification of yearly counts.

use serde::Serialize;

/// R² a fit needs before a growth pattern is called linear or exponential.
const GROWTH_FIT_R2: f64 = 0.7;
/// R² a fit needs before keyword diversity is called increasing or decreasing.
const DIVERSITY_FIT_R2: f64 = 0.5;

/// Ordinary least squares of `y` against the index `0, 1, 2, …`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    /// Coefficient of determination; 0 for a constant series.
    pub r_squared: f64,
}

/// Fit a line through `values`; `None` with fewer than two points.
pub fn linear_fit(values: &[f64]) -> Option<LinearFit> {
    let n = values.len();
    if n < 2 {
        return None;
    }

    let n_f = n as f64;
    let mean_x = (n_f - 1.0) / 2.0;
    let mean_y = values.iter().sum::<f64>() / n_f;

    let (mut sxx, mut sxy, mut syy) = (0.0, 0.0, 0.0);
    for (i, &y) in values.iter().enumerate() {
        let dx = i as f64 - mean_x;
        let dy = y - mean_y;
        sxx += dx * dx;
        sxy += dx * dy;
        syy += dy * dy;
    }

    let slope = sxy / sxx;
    let r_squared = if syy == 0.0 { 0.0 } else { (sxy * sxy) / (sxx * syy) };
    Some(LinearFit {
        slope,
        intercept: mean_y - slope * mean_x,
        r_squared,
    })
}

/// Shape of a yearly count series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    /// Fewer than three points.
    InsufficientData,
    /// Strong linear fit with a positive slope.
    Linear,
    /// Strong linear fit with a non-positive slope.
    Declining,
    /// Strong fit of `ln(count + 1)`.
    Exponential,
    Irregular,
}

/// Classify a series by a linear fit, then by a log-linear fit.
///
/// ```
/// use bibmetrics::burst::{classify_trend, Trend};
///
/// assert_eq!(classify_trend(&[1, 2, 3, 4, 5]), Trend::Linear);
/// assert_eq!(classify_trend(&[9, 7, 5, 3]), Trend::Declining);
/// assert_eq!(classify_trend(&[4, 1]), Trend::InsufficientData);
/// ```
pub fn classify_trend(counts: &[u32]) -> Trend {
    if counts.len() < 3 {
        return Trend::InsufficientData;
    }

    let values: Vec<f64> = counts.iter().map(|&c| f64::from(c)).collect();
    if let Some(fit) = linear_fit(&values) {
        if fit.r_squared > GROWTH_FIT_R2 {
            return if fit.slope > 0.0 { Trend::Linear } else { Trend::Declining };
        }
    }

    let logs: Vec<f64> = values.iter().map(|v| (v + 1.0).ln()).collect();
    match linear_fit(&logs) {
        Some(fit) if fit.r_squared > GROWTH_FIT_R2 => Trend::Exponential,
        _ => Trend::Irregular,
    }
}

/// Direction of the number of distinct keywords per year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiversityTrend {
    InsufficientData,
    Increasing,
    Decreasing,
    Stable,
}

pub fn classify_diversity(distinct_per_year: &[u32]) -> DiversityTrend {
    let values: Vec<f64> = distinct_per_year.iter().map(|&c| f64::from(c)).collect();
    match linear_fit(&values) {
        None => DiversityTrend::InsufficientData,
        Some(fit) if fit.r_squared > DIVERSITY_FIT_R2 => {
            if fit.slope > 0.0 {
                DiversityTrend::Increasing
            } else {
                DiversityTrend::Decreasing
            }
        }
        Some(_) => DiversityTrend::Stable,
    }
}
