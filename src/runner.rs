//! Batch pipeline for one analysis run.
//!
//! 1. Load the track catalog once (immutable, shared via `Arc`)
//! 2. Filter and aggregate each location on a worker pool
//! 3. Derive the conditional sample from the primary location's passage
//! 4. Compute exceedance statistics and densities for every sample
//!
//! Locations share nothing but the read-only catalog, so a failure or an
//! empty sample at one location never affects another.

use std::sync::Arc;
use std::sync::mpsc;

use serde::Serialize;
use threadpool::ThreadPool;

use crate::analysis::density::{DensityPoint, intensity_density};
use crate::analysis::exceedance::{CategoryBins, ExceedanceSummary, summarize};
use crate::analysis::passages::{Passage, conditional_from, filter_location};
use crate::config::RunConfig;
use crate::ingest::trackset::{Trackset, load_trackset};
use crate::model::{EventSample, PassageCriteria, TrackError};
use crate::proximity::SearchArea;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Execution options that do not change results.
#[derive(Debug, Clone)]
pub struct RunnerOptions {
    /// Worker threads for per-location filtering (default: available
    /// parallelism). 1 runs everything on one worker.
    pub threads: usize,
}

impl Default for RunnerOptions {
    fn default() -> Self {
        Self {
            threads: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
        }
    }
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Everything computed for one sample (a location or the conditional pair).
#[derive(Debug, Clone, Serialize)]
pub struct SampleResult {
    /// Display label, e.g. `"Miami"` or `"New Orleans | Miami"`.
    pub label: String,
    pub passage: Passage,
    pub sample: EventSample,
    pub summary: ExceedanceSummary,
    pub density: Vec<DensityPoint>,
}

impl SampleResult {
    fn compute(label: String, passage: Passage, bins: &CategoryBins, years: f64, density_points: usize) -> Self {
        let sample = passage.event_sample();
        let summary = summarize(&sample, bins, years);
        let density = intensity_density(&sample, density_points);
        if summary.is_empty() {
            log::warn!("{}: no qualifying events, statistics are empty", label);
        }
        Self {
            label,
            passage,
            sample,
            summary,
            density,
        }
    }
}

/// Result for one configured location.
#[derive(Debug, Clone, Serialize)]
pub struct LocationResult {
    pub criteria: PassageCriteria,
    pub result: SampleResult,
    /// Qualifying points outside the geodesic search ring.
    pub outside_geodesic_ring: usize,
}

/// Result for the conditional location pair.
#[derive(Debug, Clone, Serialize)]
pub struct ConditionalResult {
    pub primary: String,
    pub secondary: String,
    pub result: SampleResult,
}

/// All results of one run, locations in configuration order.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResults {
    pub observation_years: f64,
    pub catalog_points: usize,
    pub catalog_events: usize,
    pub locations: Vec<LocationResult>,
    pub conditional: Option<ConditionalResult>,
}

impl AnalysisResults {
    /// Every sample result, locations first then the conditional one.
    pub fn samples(&self) -> Vec<&SampleResult> {
        self.locations
            .iter()
            .map(|l| &l.result)
            .chain(self.conditional.as_ref().map(|c| &c.result))
            .collect()
    }
}

/// Label for the conditional sample: intensity at `secondary` given a
/// passage at `primary`.
pub fn conditional_label(primary: &str, secondary: &str) -> String {
    format!("{} | {}", secondary, primary)
}

// ---------------------------------------------------------------------------
// Analysis
// ---------------------------------------------------------------------------

/// One analysis run over a loaded catalog.
pub struct Analysis {
    config: RunConfig,
    options: RunnerOptions,
    trackset: Arc<Trackset>,
}

impl Analysis {
    /// Loads the configured track file.
    ///
    /// # Errors
    /// Any `TrackError` from reading or parsing the track file.
    pub fn load(config: RunConfig) -> Result<Self, TrackError> {
        let trackset = load_trackset(&config.trackfile, config.delimiter)?;
        Ok(Self::with_trackset(config, trackset))
    }

    /// Uses an already loaded catalog.
    pub fn with_trackset(config: RunConfig, trackset: Trackset) -> Self {
        Self {
            config,
            options: RunnerOptions::default(),
            trackset: Arc::new(trackset),
        }
    }

    pub fn with_options(mut self, options: RunnerOptions) -> Self {
        self.options = options;
        self
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn trackset(&self) -> &Trackset {
        &self.trackset
    }

    /// Runs the whole pipeline.
    ///
    /// # Errors
    /// `TrackError::Worker` if a location worker dies before reporting.
    pub fn run(&self) -> Result<AnalysisResults, TrackError> {
        let passages = self.filter_locations()?;

        let years = self.config.observation_years;
        let bins = &self.config.category_bins;
        let density_points = self.config.density_points;

        let conditional = self.config.conditional.map(|(a, b)| {
            let primary = &self.config.criteria[a];
            let secondary = &self.config.criteria[b];
            let passage = conditional_from(&passages[a], secondary);
            let label = conditional_label(&primary.location.name, &secondary.location.name);
            log::info!("{}: {} conditional events", label, passage.event_count());
            ConditionalResult {
                primary: primary.location.name.clone(),
                secondary: secondary.location.name.clone(),
                result: SampleResult::compute(label, passage, bins, years, density_points),
            }
        });

        let locations = self
            .config
            .criteria
            .iter()
            .zip(passages)
            .map(|(criteria, passage)| {
                let outside_geodesic_ring = count_outside_ring(criteria, &passage);
                LocationResult {
                    criteria: criteria.clone(),
                    result: SampleResult::compute(
                        criteria.location.name.clone(),
                        passage,
                        bins,
                        years,
                        density_points,
                    ),
                    outside_geodesic_ring,
                }
            })
            .collect();

        Ok(AnalysisResults {
            observation_years: years,
            catalog_points: self.trackset.len(),
            catalog_events: self.trackset.event_count(),
            locations,
            conditional,
        })
    }

    /// Location filter for every configured location, in config order.
    fn filter_locations(&self) -> Result<Vec<Passage>, TrackError> {
        let criteria = &self.config.criteria;
        let workers = self.options.threads.clamp(1, criteria.len().max(1));
        let pool = ThreadPool::new(workers);
        let (tx, rx) = mpsc::channel();

        for (idx, c) in criteria.iter().enumerate() {
            let tx = tx.clone();
            let trackset = Arc::clone(&self.trackset);
            let c = c.clone();
            pool.execute(move || {
                let passage = filter_location(trackset.points(), &c);
                log::info!("{}: {} events passing", c.location.name, passage.event_count());
                // receiver outlives the pool; a send error means the run was abandoned
                let _ = tx.send((idx, passage));
            });
        }
        drop(tx);

        let mut passages: Vec<Option<Passage>> = vec![None; criteria.len()];
        for (idx, passage) in rx.iter() {
            passages[idx] = Some(passage);
        }

        passages
            .into_iter()
            .zip(criteria)
            .map(|(p, c)| {
                p.ok_or_else(|| TrackError::Worker(format!("worker for {} did not report", c.location.name)))
            })
            .collect()
    }
}

/// Qualifying points the geodesic search ring does not contain. The two
/// measures are not expected to agree; this only feeds a diagnostic.
fn count_outside_ring(criteria: &PassageCriteria, passage: &Passage) -> usize {
    let area = SearchArea::new(criteria.location.coordinate, criteria.radius_km);
    let outside = passage
        .qualifying_points
        .iter()
        .filter(|p| !area.contains(p.coordinate))
        .count();
    if outside > 0 {
        log::warn!(
            "{}: {} of {} qualifying points fall outside the geodesic ring",
            criteria.location.name,
            outside,
            passage.qualifying_points.len()
        );
    }
    outside
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
