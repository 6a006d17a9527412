//! Run configuration loader - parses analysis.toml
//!
//! Separates the locations, search radius, thresholds and category bins
//! from code, so a new study area is a config edit rather than a rebuild.
//! The loaded `RunConfig` is validated once and then passed by reference
//! into every stage of the pipeline.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::analysis::exceedance::CategoryBins;
use crate::model::{Coordinate, KM_PER_MILE, Location, PassageCriteria, TrackError};
use crate::proximity::normalize_longitude;

/// Default config file name, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "analysis.toml";

fn default_category_bounds() -> Vec<f64> {
    vec![33.0, 43.0, 50.0, 58.0, 70.0]
}

fn default_delimiter() -> char {
    ','
}

fn default_density_points() -> usize {
    1000
}

// ---------------------------------------------------------------------------
// TOML structures
// ---------------------------------------------------------------------------

/// One `[[location]]` table.
#[derive(Debug, Clone, Deserialize)]
pub struct LocationConfig {
    pub name: String,
    pub latitude: f64,
    /// Any convention; normalized to [-180, 180) on load.
    pub longitude: f64,
    /// Wind speed (m/s) a point must strictly exceed to count.
    pub wind_threshold: f64,
    /// Per-location override of `search_radius_miles`.
    pub radius_miles: Option<f64>,
}

/// The `[conditional]` table naming the location pair.
#[derive(Debug, Clone, Deserialize)]
pub struct ConditionalConfig {
    /// The location every conditional event must pass first.
    pub primary: String,
    /// The location checked within the primary's events.
    pub secondary: String,
}

/// The `[density]` table.
#[derive(Debug, Clone, Deserialize)]
pub struct DensityConfig {
    #[serde(default = "default_density_points")]
    pub points: usize,
}

impl Default for DensityConfig {
    fn default() -> Self {
        Self { points: default_density_points() }
    }
}

/// Raw file contents before validation.
#[derive(Debug, Deserialize)]
struct RawConfig {
    trackfile: PathBuf,
    #[serde(default = "default_delimiter")]
    delimiter: char,
    observation_years: f64,
    search_radius_miles: f64,
    #[serde(default = "default_category_bounds")]
    category_bounds: Vec<f64>,
    #[serde(rename = "location", default)]
    locations: Vec<LocationConfig>,
    conditional: Option<ConditionalConfig>,
    #[serde(default)]
    density: DensityConfig,
}

// ---------------------------------------------------------------------------
// Validated configuration
// ---------------------------------------------------------------------------

/// Validated, immutable configuration for one run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub trackfile: PathBuf,
    pub delimiter: u8,
    /// Years spanned by the whole catalog (N); shared by every sample.
    pub observation_years: f64,
    /// Default search radius, already converted to km.
    pub radius_km: f64,
    pub category_bins: CategoryBins,
    /// One entry per `[[location]]`, in file order.
    pub criteria: Vec<PassageCriteria>,
    /// Indices into `criteria` for (primary, secondary), if any.
    pub conditional: Option<(usize, usize)>,
    pub density_points: usize,
}

impl RunConfig {
    /// Criteria for the named location, if configured.
    pub fn criteria_for(&self, name: &str) -> Option<&PassageCriteria> {
        self.criteria.iter().find(|c| c.location.name == name)
    }
}

/// Loads and validates the configuration at `path`.
///
/// A relative `trackfile` is resolved against the config file's directory.
///
/// # Errors
/// - `TrackError::Io` if the file cannot be read.
/// - `TrackError::ConfigParse` if it is not valid TOML for this schema.
/// - `TrackError::Configuration` if any value fails validation.
pub fn load_config(path: &Path) -> Result<RunConfig, TrackError> {
    let contents = fs::read_to_string(path)?;
    let mut config = parse_config(&contents)?;

    if config.trackfile.is_relative() {
        if let Some(dir) = path.parent() {
            config.trackfile = dir.join(&config.trackfile);
        }
    }

    log::info!(
        "Loaded {} with {} locations, radius {:.1} km, N = {} years",
        path.display(),
        config.criteria.len(),
        config.radius_km,
        config.observation_years
    );

    Ok(config)
}

/// Parses and validates configuration text. The track file path is kept
/// exactly as written.
pub fn parse_config(contents: &str) -> Result<RunConfig, TrackError> {
    let raw: RawConfig = toml::from_str(contents)?;
    validate(raw)
}

fn validate(raw: RawConfig) -> Result<RunConfig, TrackError> {
    let bad = |msg: String| Err(TrackError::Configuration(msg));

    if !(raw.observation_years.is_finite() && raw.observation_years > 0.0) {
        return bad(format!(
            "observation_years must be positive, got {}",
            raw.observation_years
        ));
    }
    let radius_km = radius_to_km(raw.search_radius_miles, "search_radius_miles")?;

    if !raw.delimiter.is_ascii() {
        return bad(format!("delimiter must be a single ASCII character, got {:?}", raw.delimiter));
    }

    let category_bins = CategoryBins::new(raw.category_bounds)?;

    if raw.locations.is_empty() {
        return bad("at least one [[location]] is required".to_string());
    }

    let mut criteria: Vec<PassageCriteria> = Vec::with_capacity(raw.locations.len());
    for loc in raw.locations {
        if loc.name.trim().is_empty() {
            return bad("location name must not be empty".to_string());
        }
        if loc.name.contains('|') {
            return bad(format!(
                "location name '{}' must not contain '|', which separates conditional labels",
                loc.name
            ));
        }
        if criteria.iter().any(|c| c.location.name == loc.name) {
            return bad(format!("duplicate location name '{}'", loc.name));
        }
        if !(-90.0..=90.0).contains(&loc.latitude) {
            return bad(format!("{}: latitude {} out of range", loc.name, loc.latitude));
        }
        if !loc.longitude.is_finite() {
            return bad(format!("{}: longitude must be finite", loc.name));
        }
        if !(loc.wind_threshold.is_finite() && loc.wind_threshold >= 0.0) {
            return bad(format!(
                "{}: wind_threshold must be non-negative, got {}",
                loc.name, loc.wind_threshold
            ));
        }
        let radius_km = match loc.radius_miles {
            Some(miles) => radius_to_km(miles, &format!("{}: radius_miles", loc.name))?,
            None => radius_km,
        };

        criteria.push(PassageCriteria {
            location: Location {
                name: loc.name,
                coordinate: Coordinate::new(loc.latitude, normalize_longitude(loc.longitude)),
            },
            radius_km,
            wind_threshold: loc.wind_threshold,
        });
    }

    let conditional = match raw.conditional {
        Some(pair) => {
            let index_of = |name: &str| {
                criteria
                    .iter()
                    .position(|c| c.location.name == name)
                    .ok_or_else(|| {
                        TrackError::Configuration(format!(
                            "conditional location '{}' is not a configured location",
                            name
                        ))
                    })
            };
            let primary = index_of(&pair.primary)?;
            let secondary = index_of(&pair.secondary)?;
            if primary == secondary {
                return bad("conditional primary and secondary must differ".to_string());
            }
            Some((primary, secondary))
        }
        None if criteria.len() == 2 => Some((0, 1)),
        None => None,
    };

    if raw.density.points < 2 {
        return bad(format!("density.points must be at least 2, got {}", raw.density.points));
    }

    Ok(RunConfig {
        trackfile: raw.trackfile,
        delimiter: raw.delimiter as u8,
        observation_years: raw.observation_years,
        radius_km,
        category_bins,
        criteria,
        conditional,
        density_points: raw.density.points,
    })
}

fn radius_to_km(miles: f64, field: &str) -> Result<f64, TrackError> {
    if miles.is_finite() && miles > 0.0 {
        Ok(miles * KM_PER_MILE)
    } else {
        Err(TrackError::Configuration(format!(
            "{} must be positive, got {}",
            field, miles
        )))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
