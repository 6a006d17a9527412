//! Shared data types for cyclone track analysis.
//!
//! Everything downstream of ingest speaks in these types: a `TrackPoint`
//! is one row of the simulated catalog, a `Location` is a user-supplied
//! point of interest, and an `EventSample` is the per-storm reduction that
//! the statistics layer consumes.

use serde::Serialize;
use std::collections::BTreeMap;

/// Kilometres per mile, used once when the search radius is loaded.
pub const KM_PER_MILE: f64 = 1.60934;

// ---------------------------------------------------------------------------
// Geography
// ---------------------------------------------------------------------------

/// A latitude/longitude pair in degrees.
///
/// Fields are named rather than positional so that no call site can swap
/// latitude and longitude. Longitude is expected in [-180, 180); see
/// `proximity::normalize_longitude`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// A named point of interest, immutable once configured.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    pub name: String,
    pub coordinate: Coordinate,
}

/// Filter criteria applied at one location: strict `distance < radius_km`
/// and strict `wind > wind_threshold`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PassageCriteria {
    pub location: Location,
    pub radius_km: f64,
    pub wind_threshold: f64,
}

// ---------------------------------------------------------------------------
// Track data
// ---------------------------------------------------------------------------

/// One observation of a simulated storm.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackPoint {
    /// Storm identifier (`SID` column); groups points into one event.
    pub event_id: String,
    pub coordinate: Coordinate,
    /// Maximum sustained wind speed (`Vm` column), m/s.
    pub max_wind: f64,
}

/// Per-event maximum wind among the points that passed a filter,
/// keyed by event identifier.
///
/// A `BTreeMap` keeps iteration order stable across runs.
pub type EventSample = BTreeMap<String, f64>;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that abort a run. Empty samples are not represented here; they
/// flow through the statistics layer as empty summaries.
#[derive(Debug, thiserror::Error)]
pub enum TrackError {
    /// Reading a file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The delimited reader could not tokenize the input.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The track table lacks a required column.
    #[error("track file is missing required column '{0}'")]
    MissingColumn(String),

    /// A track row could not be turned into a `TrackPoint`.
    #[error("track file line {line}: {message}")]
    InputFormat { line: u64, message: String },

    /// The run configuration failed validation.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The configuration file is not valid TOML for `RunConfig`.
    #[error("configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Serializing the report failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A per-location worker exited without a result.
    #[error("worker error: {0}")]
    Worker(String),
}

impl TrackError {
    /// True for errors caused by the track file contents rather than
    /// the configuration or the filesystem.
    pub fn is_input_format(&self) -> bool {
        matches!(
            self,
            TrackError::MissingColumn(_) | TrackError::InputFormat { .. } | TrackError::Csv(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_format_classification() {
        assert!(TrackError::MissingColumn("SID".to_string()).is_input_format());
        assert!(TrackError::InputFormat { line: 3, message: "bad".to_string() }.is_input_format());
        assert!(!TrackError::Configuration("radius".to_string()).is_input_format());
    }

    #[test]
    fn test_error_messages_name_the_problem() {
        let err = TrackError::MissingColumn("Vm".to_string());
        assert!(err.to_string().contains("Vm"), "message should name the column, got: {}", err);

        let err = TrackError::InputFormat { line: 12, message: "LAT is not a number".to_string() };
        assert!(err.to_string().contains("line 12"));
    }
}
