//! Storm passage selection at locations.
//!
//! # Selection rules
//!
//! 1. **Location filter**
//!    - A point qualifies when `approx_filter_distance < radius_km` AND
//!      `max_wind > wind_threshold`, both strict.
//!    - An event passes when at least one of its points qualifies.
//!
//! 2. **Conditional selection** (primary A, secondary B)
//!    - Restrict the catalog to the full tracks of events passing A.
//!    - Within those tracks, apply B's filter.
//!    - The two conditions may be met at different points of the track;
//!      no single point has to satisfy both.
//!
//! # Output
//!
//! Each selection carries the passing event identifiers, the qualifying
//! points (what aggregation consumes) and the full tracks of the passing
//! events (what map collaborators draw).

use std::collections::HashSet;

use serde::Serialize;

use crate::analysis::groupings::{distinct_event_ids, max_wind_by_event};
use crate::model::{EventSample, PassageCriteria, TrackPoint};
use crate::proximity::approx_filter_distance;

/// Result of a location filter or conditional selection.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Passage {
    /// Distinct passing events, first-appearance order.
    pub event_ids: Vec<String>,
    /// Points satisfying the (last applied) filter.
    pub qualifying_points: Vec<TrackPoint>,
    /// Every point of every passing event.
    pub event_tracks: Vec<TrackPoint>,
}

impl Passage {
    pub fn event_count(&self) -> usize {
        self.event_ids.len()
    }

    pub fn contains_event(&self, event_id: &str) -> bool {
        self.event_ids.iter().any(|id| id == event_id)
    }

    /// Maximum qualifying wind per passing event.
    pub fn event_sample(&self) -> EventSample {
        max_wind_by_event(&self.qualifying_points)
    }
}

/// Whether a single point satisfies `criteria`.
pub fn point_qualifies(point: &TrackPoint, criteria: &PassageCriteria) -> bool {
    approx_filter_distance(point.coordinate, criteria.location.coordinate) < criteria.radius_km
        && point.max_wind > criteria.wind_threshold
}

/// Every point belonging to one of `event_ids`, in catalog order.
pub fn event_tracks(trackset: &[TrackPoint], event_ids: &[String]) -> Vec<TrackPoint> {
    let wanted: HashSet<&str> = event_ids.iter().map(String::as_str).collect();
    trackset
        .iter()
        .filter(|p| wanted.contains(p.event_id.as_str()))
        .cloned()
        .collect()
}

/// Location filter: events passing within `criteria.radius_km` of the
/// location above `criteria.wind_threshold`.
pub fn filter_location(trackset: &[TrackPoint], criteria: &PassageCriteria) -> Passage {
    let qualifying_points: Vec<TrackPoint> = trackset
        .iter()
        .filter(|p| point_qualifies(p, criteria))
        .cloned()
        .collect();
    let event_ids = distinct_event_ids(&qualifying_points);
    let event_tracks = event_tracks(trackset, &event_ids);

    log::debug!(
        "{}: {} qualifying points across {} events",
        criteria.location.name,
        qualifying_points.len(),
        event_ids.len()
    );

    Passage {
        event_ids,
        qualifying_points,
        event_tracks,
    }
}

/// Conditional selection: events passing `primary` that also pass
/// `secondary` somewhere along their track.
///
/// `qualifying_points` holds the secondary-qualifying points, so the
/// conditional sample is the intensity near the secondary location for
/// storms that also passed the primary one.
pub fn select_conditional(
    trackset: &[TrackPoint],
    primary: &PassageCriteria,
    secondary: &PassageCriteria,
) -> Passage {
    let primary_passage = filter_location(trackset, primary);
    conditional_from(&primary_passage, secondary)
}

/// Conditional selection starting from an already computed primary
/// passage, avoiding a second scan of the whole catalog.
pub fn conditional_from(primary: &Passage, secondary: &PassageCriteria) -> Passage {
    let qualifying_points: Vec<TrackPoint> = primary
        .event_tracks
        .iter()
        .filter(|p| point_qualifies(p, secondary))
        .cloned()
        .collect();
    let event_ids = distinct_event_ids(&qualifying_points);
    let event_tracks = event_tracks(&primary.event_tracks, &event_ids);

    Passage {
        event_ids,
        qualifying_points,
        event_tracks,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
