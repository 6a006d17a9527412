//! Event grouping and per-event aggregation.
//!
//! An event is never stored on its own: it is the set of track points
//! sharing an identifier, rebuilt whenever it is needed. `group_by_event`
//! does that regrouping, and `max_wind_by_event` reduces each group to the
//! single value the statistics layer consumes.

use std::collections::{BTreeMap, HashSet};

use crate::model::{EventSample, TrackPoint};

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

/// Groups points by event identifier, preserving each event's point order.
pub fn group_by_event<'a, I>(points: I) -> BTreeMap<&'a str, Vec<&'a TrackPoint>>
where
    I: IntoIterator<Item = &'a TrackPoint>,
{
    let mut grouped: BTreeMap<&'a str, Vec<&'a TrackPoint>> = BTreeMap::new();
    for point in points {
        grouped.entry(point.event_id.as_str()).or_default().push(point);
    }
    grouped
}

/// Distinct event identifiers in first-appearance order.
pub fn distinct_event_ids<'a, I>(points: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a TrackPoint>,
{
    let mut seen = HashSet::new();
    let mut ids = Vec::new();
    for point in points {
        if seen.insert(point.event_id.as_str()) {
            ids.push(point.event_id.clone());
        }
    }
    ids
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Reduces filtered points to one maximum wind per event.
///
/// Only the maximum is retained, so ties and point order have no effect.
/// Callers pass the points that already passed a filter; this function
/// does no filtering of its own.
pub fn max_wind_by_event<'a, I>(points: I) -> EventSample
where
    I: IntoIterator<Item = &'a TrackPoint>,
{
    let mut sample = EventSample::new();
    for point in points {
        sample
            .entry(point.event_id.clone())
            .and_modify(|max| *max = max.max(point.max_wind))
            .or_insert(point.max_wind);
    }
    sample
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
