//! Cyclone passage analysis.
//!
//! Submodules, in pipeline order:
//! - `passages`   - location filter and conditional (two-location) selection.
//! - `groupings`  - event regrouping and per-event maximum wind.
//! - `exceedance` - empirical exceedance curve and category frequencies.
//! - `density`    - kernel density of per-event intensity.

pub mod density;
pub mod exceedance;
pub mod groupings;
pub mod passages;
