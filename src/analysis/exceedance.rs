//! Empirical exceedance statistics for per-event intensity samples.
//!
//! The curve is purely rank-based: sort the per-event maxima descending,
//! give rank `i` (1-based) the cumulative annual rate `i / N`, and read
//! its return period as `N / i`. No distribution is fitted.
//!
//! The categorical table bins the same maxima into left-closed intervals
//! `[lo, hi)` with an open-ended top bin, counts events per category and
//! divides by `N`. Values below the lowest bound are left unlabelled.

use serde::Serialize;

use crate::model::{EventSample, TrackError};

// ---------------------------------------------------------------------------
// Category bins
// ---------------------------------------------------------------------------

/// Ordered lower bounds of categories `1..=k`.
///
/// Category `c` covers `[bounds[c-1], bounds[c])`; the last category has
/// no upper bound.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBins {
    bounds: Vec<f64>,
}

impl CategoryBins {
    /// # Errors
    /// `TrackError::Configuration` if `bounds` is empty, contains a
    /// non-finite value, or is not strictly increasing.
    pub fn new(bounds: Vec<f64>) -> Result<Self, TrackError> {
        if bounds.is_empty() {
            return Err(TrackError::Configuration(
                "category_bounds must contain at least one bound".to_string(),
            ));
        }
        if bounds.iter().any(|b| !b.is_finite()) {
            return Err(TrackError::Configuration(
                "category_bounds must be finite numbers".to_string(),
            ));
        }
        if bounds.windows(2).any(|w| w[0] >= w[1]) {
            return Err(TrackError::Configuration(format!(
                "category_bounds must be strictly increasing, got {:?}",
                bounds
            )));
        }
        Ok(Self { bounds })
    }

    /// Saffir-Simpson style bins in m/s: 33, 43, 50, 58, 70.
    pub fn saffir_simpson() -> Self {
        Self { bounds: vec![33.0, 43.0, 50.0, 58.0, 70.0] }
    }

    /// Number of categories.
    pub fn len(&self) -> usize {
        self.bounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }

    /// 1-based category for `wind`, or `None` below the lowest bound.
    pub fn categorize(&self, wind: f64) -> Option<usize> {
        // number of bounds <= wind is the category index
        let count = self.bounds.partition_point(|&b| b <= wind);
        if count == 0 { None } else { Some(count) }
    }

    /// `(lower, upper)` bounds of a 1-based category.
    pub fn range(&self, category: usize) -> Option<(f64, Option<f64>)> {
        if category == 0 || category > self.bounds.len() {
            return None;
        }
        Some((self.bounds[category - 1], self.bounds.get(category).copied()))
    }
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// One point of the exceedance curve.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExceedancePoint {
    /// 1-based rank in descending intensity order.
    pub rank: usize,
    pub wind: f64,
    /// Cumulative annual exceedance rate, `rank / N`.
    pub annual_rate: f64,
    /// `N / rank` years.
    pub return_period_years: f64,
}

/// Event count and annual frequency for one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryFrequency {
    pub category: usize,
    pub lower: f64,
    pub upper: Option<f64>,
    pub count: usize,
    pub annual_rate: f64,
}

/// Everything the statistics engine produces for one sample.
///
/// An empty sample yields an empty curve and an all-zero category table
/// rather than an error; check `is_empty()` before plotting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExceedanceSummary {
    pub event_count: usize,
    pub observation_years: f64,
    pub curve: Vec<ExceedancePoint>,
    pub categories: Vec<CategoryFrequency>,
    /// Events below the lowest category bound.
    pub uncategorized: usize,
}

impl ExceedanceSummary {
    pub fn is_empty(&self) -> bool {
        self.event_count == 0
    }

    /// Intensity exceeded on average at least once every `return_period`
    /// years: the wind at the deepest rank whose return period is still
    /// `>= return_period`. `None` if the catalog is too short or empty.
    pub fn wind_at_return_period(&self, return_period: f64) -> Option<f64> {
        self.curve
            .iter()
            .take_while(|p| p.return_period_years >= return_period)
            .last()
            .map(|p| p.wind)
    }

    /// Total annual rate across all categories.
    pub fn categorized_annual_rate(&self) -> f64 {
        self.categories.iter().map(|c| c.annual_rate).sum()
    }
}

// ---------------------------------------------------------------------------
// Computation
// ---------------------------------------------------------------------------

/// Per-event maxima sorted descending.
pub fn sorted_descending(sample: &EventSample) -> Vec<f64> {
    let mut winds: Vec<f64> = sample.values().copied().collect();
    winds.sort_by(|a, b| b.total_cmp(a));
    winds
}

/// Empirical exceedance curve, highest intensity first. Empty for an
/// empty sample.
pub fn exceedance_curve(sample: &EventSample, observation_years: f64) -> Vec<ExceedancePoint> {
    sorted_descending(sample)
        .into_iter()
        .enumerate()
        .map(|(idx, wind)| {
            let rank = idx + 1;
            ExceedancePoint {
                rank,
                wind,
                annual_rate: rank as f64 / observation_years,
                return_period_years: observation_years / rank as f64,
            }
        })
        .collect()
}

/// Annual frequency per category, every category present (zero counts
/// included). Returns the table and the number of unlabelled events.
pub fn category_frequency(
    sample: &EventSample,
    bins: &CategoryBins,
    observation_years: f64,
) -> (Vec<CategoryFrequency>, usize) {
    let mut counts = vec![0usize; bins.len()];
    let mut uncategorized = 0;

    for &wind in sample.values() {
        match bins.categorize(wind) {
            Some(category) => counts[category - 1] += 1,
            None => uncategorized += 1,
        }
    }

    let table = counts
        .into_iter()
        .enumerate()
        .filter_map(|(idx, count)| {
            let category = idx + 1;
            let (lower, upper) = bins.range(category)?;
            Some(CategoryFrequency {
                category,
                lower,
                upper,
                count,
                annual_rate: count as f64 / observation_years,
            })
        })
        .collect();

    (table, uncategorized)
}

/// Curve and category table for one sample, sharing one `N`.
pub fn summarize(sample: &EventSample, bins: &CategoryBins, observation_years: f64) -> ExceedanceSummary {
    let (categories, uncategorized) = category_frequency(sample, bins, observation_years);
    ExceedanceSummary {
        event_count: sample.len(),
        observation_years,
        curve: exceedance_curve(sample, observation_years),
        categories,
        uncategorized,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(winds: &[f64]) -> EventSample {
        winds
            .iter()
            .enumerate()
            .map(|(i, w)| (format!("EV{:03}", i), *w))
            .collect()
    }

    #[test]
    fn test_three_events_over_120_years() {
        let curve = exceedance_curve(&sample(&[40.0, 62.5, 51.0]), 120.0);

        assert_eq!(curve.len(), 3);
        let winds: Vec<f64> = curve.iter().map(|p| p.wind).collect();
        assert_eq!(winds, vec![62.5, 51.0, 40.0], "curve should be descending");

        let rates: Vec<f64> = curve.iter().map(|p| p.annual_rate).collect();
        let expected_rates = [1.0 / 120.0, 2.0 / 120.0, 3.0 / 120.0];
        for (got, want) in rates.iter().zip(expected_rates) {
            assert!((got - want).abs() < 1e-12, "rate {} != {}", got, want);
        }

        let periods: Vec<f64> = curve.iter().map(|p| p.return_period_years).collect();
        assert_eq!(periods, vec![120.0, 60.0, 40.0]);
        assert_eq!(curve[0].rank, 1, "ranks start at 1");
    }

    #[test]
    fn test_empty_sample_yields_empty_curve() {
        let empty = EventSample::new();
        assert!(exceedance_curve(&empty, 120.0).is_empty());

        let summary = summarize(&empty, &CategoryBins::saffir_simpson(), 120.0);
        assert!(summary.is_empty());
        assert!(summary.curve.is_empty());
        assert_eq!(summary.categories.len(), 5);
        assert!(summary.categories.iter().all(|c| c.count == 0 && c.annual_rate == 0.0));
        assert_eq!(summary.wind_at_return_period(10.0), None);
    }

    #[test]
    fn test_category_frequency_over_ten_years() {
        let s = sample(&[30.0, 35.0, 45.0, 60.0, 80.0, 33.0, 50.0, 58.0, 70.0, 90.0]);
        let (table, uncategorized) = category_frequency(&s, &CategoryBins::saffir_simpson(), 10.0);

        assert_eq!(uncategorized, 1, "30 m/s is below category 1");
        let counts: Vec<usize> = table.iter().map(|c| c.count).collect();
        // [33,43): 35, 33 | [43,50): 45 | [50,58): 50 | [58,70): 60, 58 | [70,inf): 80, 70, 90
        assert_eq!(counts, vec![2, 1, 1, 2, 3]);
        assert_eq!(counts.iter().sum::<usize>(), 9);

        let rates: Vec<f64> = table.iter().map(|c| c.annual_rate).collect();
        assert_eq!(rates, vec![0.2, 0.1, 0.1, 0.2, 0.3]);
    }

    #[test]
    fn test_categorize_bounds_are_left_closed() {
        let bins = CategoryBins::saffir_simpson();
        assert_eq!(bins.categorize(32.999), None);
        assert_eq!(bins.categorize(33.0), Some(1));
        assert_eq!(bins.categorize(42.999), Some(1));
        assert_eq!(bins.categorize(43.0), Some(2));
        assert_eq!(bins.categorize(70.0), Some(5));
        assert_eq!(bins.categorize(500.0), Some(5));
    }

    #[test]
    fn test_category_range_top_bin_is_open() {
        let bins = CategoryBins::saffir_simpson();
        assert_eq!(bins.range(1), Some((33.0, Some(43.0))));
        assert_eq!(bins.range(5), Some((70.0, None)));
        assert_eq!(bins.range(0), None);
        assert_eq!(bins.range(6), None);
    }

    #[test]
    fn test_category_bins_reject_malformed_bounds() {
        assert!(CategoryBins::new(vec![]).is_err());
        assert!(CategoryBins::new(vec![33.0, 33.0]).is_err());
        assert!(CategoryBins::new(vec![43.0, 33.0]).is_err());
        assert!(CategoryBins::new(vec![33.0, f64::INFINITY]).is_err());
        assert!(CategoryBins::new(vec![10.0]).is_ok());
    }

    #[test]
    fn test_wind_at_return_period_reads_step_curve() {
        // N = 10: return periods 10, 5, 3.33, 2.5
        let summary = summarize(&sample(&[20.0, 60.0, 40.0, 50.0]), &CategoryBins::saffir_simpson(), 10.0);
        assert_eq!(summary.wind_at_return_period(10.0), Some(60.0));
        assert_eq!(summary.wind_at_return_period(5.0), Some(50.0));
        assert_eq!(summary.wind_at_return_period(3.0), Some(40.0));
        assert_eq!(summary.wind_at_return_period(1.0), Some(20.0));
        assert_eq!(summary.wind_at_return_period(25.0), None, "catalog too short for 25 years");
    }

    #[test]
    fn test_ties_keep_distinct_ranks() {
        let curve = exceedance_curve(&sample(&[45.0, 45.0]), 2.0);
        assert_eq!(curve[0].return_period_years, 2.0);
        assert_eq!(curve[1].return_period_years, 1.0);
        assert_eq!(curve[0].wind, curve[1].wind);
    }

    #[test]
    fn test_summary_categorized_rate_excludes_unlabelled() {
        let summary = summarize(&sample(&[20.0, 35.0, 75.0]), &CategoryBins::saffir_simpson(), 4.0);
        assert_eq!(summary.uncategorized, 1);
        assert!((summary.categorized_annual_rate() - 0.5).abs() < 1e-12);
    }
}
