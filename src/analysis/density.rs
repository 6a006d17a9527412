//! Probability density of per-event intensity.
//!
//! Gaussian kernel density estimate over a sample's per-event maxima,
//! with Scott's rule bandwidth (`std * n^(-1/5)`, sample std with one
//! degree of freedom removed). The grid spans the sample range padded by
//! half the range on each side.

use serde::Serialize;

use crate::model::EventSample;

/// One evaluated grid point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DensityPoint {
    pub wind: f64,
    pub density: f64,
}

/// A fitted kernel density estimate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KernelDensity {
    pub bandwidth: f64,
    values: Vec<f64>,
}

impl KernelDensity {
    /// Fits a density to `values`. `None` for fewer than two values or
    /// zero spread, where a Gaussian bandwidth is undefined.
    pub fn fit(values: &[f64]) -> Option<Self> {
        let n = values.len();
        if n < 2 {
            return None;
        }
        let mean = values.iter().sum::<f64>() / n as f64;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
        let std = variance.sqrt();
        if std <= 0.0 || !std.is_finite() {
            return None;
        }
        Some(Self {
            bandwidth: std * (n as f64).powf(-0.2),
            values: values.to_vec(),
        })
    }

    /// Density at `x`.
    pub fn evaluate(&self, x: f64) -> f64 {
        let norm = 1.0 / (self.values.len() as f64 * self.bandwidth * (2.0 * std::f64::consts::PI).sqrt());
        self.values
            .iter()
            .map(|v| {
                let z = (x - v) / self.bandwidth;
                (-0.5 * z * z).exp()
            })
            .sum::<f64>()
            * norm
    }

    /// Evaluates on `points` evenly spaced values across the padded range.
    pub fn curve(&self, points: usize) -> Vec<DensityPoint> {
        let points = points.max(2);
        let min = self.values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = self.values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let pad = 0.5 * (max - min);
        let (start, end) = (min - pad, max + pad);
        let step = (end - start) / (points - 1) as f64;

        (0..points)
            .map(|i| {
                let wind = start + step * i as f64;
                DensityPoint {
                    wind,
                    density: self.evaluate(wind),
                }
            })
            .collect()
    }
}

/// Density curve of a sample's maxima; empty when no density can be fitted.
pub fn intensity_density(sample: &EventSample, points: usize) -> Vec<DensityPoint> {
    let values: Vec<f64> = sample.values().copied().collect();
    KernelDensity::fit(&values)
        .map(|kde| kde.curve(points))
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
