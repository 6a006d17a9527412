/// tcrisk: tropical cyclone passage and return-period analysis over a
/// simulated track catalog.
///
/// # Module structure
///
/// ```text
/// tcrisk
/// ├── model       - shared data types (TrackPoint, Location, PassageCriteria, TrackError, …)
/// ├── config      - run configuration loader (analysis.toml)
/// ├── logging     - pretty_env_logger setup for the binaries
/// ├── proximity   - planar filter distance and geodesic search areas
/// ├── runner      - batch pipeline (load, per-location filtering, statistics)
/// ├── report      - JSON and CSV output for plotting
/// ├── ingest
/// │   ├── trackset - catalog CSV reader
/// │   └── fixtures (test only) - representative track tables
/// └── analysis
///     ├── passages   - location filter and conditional selection
///     ├── groupings  - per-event regrouping and maximum wind
///     ├── exceedance - exceedance curve and category frequencies
///     └── density    - kernel density of per-event intensity
/// ```

/// Public modules
pub mod analysis;
pub mod config;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod proximity;
pub mod report;
pub mod runner;
