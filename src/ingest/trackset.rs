//! Simulated track catalog reader.
//!
//! Parses the delimited trackset export into an immutable `Trackset`.
//! Format: one header row, then one row per track point.
//!
//! Required columns (located by header name, any order):
//! - `SID`: storm identifier; rows sharing it form one event
//! - `LAT`: latitude, degrees
//! - `LON`: longitude, degrees, usually 0..360; normalized to [-180, 180)
//! - `Vm` : maximum sustained wind speed, m/s
//!
//! Any other columns are ignored. A missing column or an unparsable row
//! aborts the load before any filtering runs.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::analysis::groupings::distinct_event_ids;
use crate::model::{Coordinate, TrackError, TrackPoint};
use crate::proximity::normalize_longitude;

pub const COL_EVENT_ID: &str = "SID";
pub const COL_LATITUDE: &str = "LAT";
pub const COL_LONGITUDE: &str = "LON";
pub const COL_WIND: &str = "Vm";

/// The loaded catalog. Never mutated after construction.
#[derive(Debug, Clone, Default)]
pub struct Trackset {
    points: Vec<TrackPoint>,
}

impl Trackset {
    pub fn new(points: Vec<TrackPoint>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[TrackPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Distinct events in first-appearance order.
    pub fn event_ids(&self) -> Vec<String> {
        distinct_event_ids(&self.points)
    }

    pub fn event_count(&self) -> usize {
        self.event_ids().len()
    }
}

/// Column positions of the required fields.
struct Columns {
    event_id: usize,
    latitude: usize,
    longitude: usize,
    wind: usize,
}

impl Columns {
    fn locate(headers: &csv::StringRecord) -> Result<Self, TrackError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| TrackError::MissingColumn(name.to_string()))
        };
        Ok(Self {
            event_id: find(COL_EVENT_ID)?,
            latitude: find(COL_LATITUDE)?,
            longitude: find(COL_LONGITUDE)?,
            wind: find(COL_WIND)?,
        })
    }
}

/// Loads a track file from disk.
///
/// # Errors
/// - `TrackError::Io`: the file cannot be opened.
/// - `TrackError::MissingColumn`: a required column is absent.
/// - `TrackError::InputFormat`: a row has an empty id, a non-numeric or
///   non-finite coordinate/wind, a latitude outside [-90, 90], or a
///   negative wind.
/// - `TrackError::Csv`: the file is not valid delimited text.
pub fn load_trackset(path: &Path, delimiter: u8) -> Result<Trackset, TrackError> {
    let file = File::open(path)?;
    let trackset = read_trackset(file, delimiter)?;
    log::info!(
        "Loaded {} track points ({} events) from {}",
        trackset.len(),
        trackset.event_count(),
        path.display()
    );
    Ok(trackset)
}

/// Parses track rows from an in-memory string.
pub fn parse_trackset(text: &str, delimiter: u8) -> Result<Trackset, TrackError> {
    read_trackset(text.as_bytes(), delimiter)
}

fn read_trackset<R: Read>(reader: R, delimiter: u8) -> Result<Trackset, TrackError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns = Columns::locate(reader.headers()?)?;

    let mut points = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        points.push(parse_row(&record, &columns, line)?);
    }

    if points.is_empty() {
        log::warn!("Track file contains a header but no rows");
    }

    Ok(Trackset::new(points))
}

fn parse_row(record: &csv::StringRecord, columns: &Columns, line: u64) -> Result<TrackPoint, TrackError> {
    let field = |idx: usize, name: &str| {
        record.get(idx).ok_or_else(|| TrackError::InputFormat {
            line,
            message: format!("row has no {} field", name),
        })
    };
    let number = |idx: usize, name: &str| -> Result<f64, TrackError> {
        let raw = field(idx, name)?;
        match raw.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(TrackError::InputFormat {
                line,
                message: format!("{} '{}' is not a finite number", name, raw),
            }),
        }
    };

    let event_id = field(columns.event_id, COL_EVENT_ID)?;
    if event_id.is_empty() {
        return Err(TrackError::InputFormat {
            line,
            message: format!("{} is empty", COL_EVENT_ID),
        });
    }

    let latitude = number(columns.latitude, COL_LATITUDE)?;
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(TrackError::InputFormat {
            line,
            message: format!("{} {} is outside [-90, 90]", COL_LATITUDE, latitude),
        });
    }

    let longitude = normalize_longitude(number(columns.longitude, COL_LONGITUDE)?);

    let max_wind = number(columns.wind, COL_WIND)?;
    if max_wind < 0.0 {
        return Err(TrackError::InputFormat {
            line,
            message: format!("{} {} is negative", COL_WIND, max_wind),
        });
    }

    Ok(TrackPoint {
        event_id: event_id.to_string(),
        coordinate: Coordinate::new(latitude, longitude),
        max_wind,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
