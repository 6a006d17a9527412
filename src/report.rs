//! Report output for plotting and reporting tools.
//!
//! Writes one run's results into an output directory:
//! - `report.json`          run metadata plus every sample's tables
//! - `categories.csv`       merged annual frequency per category, one
//!                           column per sample
//! - `exceedance_<slug>.csv`  return period / wind pairs (skipped for
//!                           empty samples)
//! - `tracks_<slug>.csv`    full tracks of the selected events, for maps
//!
//! Downstream plotting is expected to skip samples whose `empty` flag is set.

use std::collections::{BTreeMap, HashSet};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analysis::density::DensityPoint;
use crate::analysis::exceedance::{CategoryFrequency, ExceedancePoint};
use crate::config::RunConfig;
use crate::model::{Coordinate, TrackError, TrackPoint};
use crate::proximity::SearchArea;
use crate::runner::{AnalysisResults, SampleResult};

// ---------------------------------------------------------------------------
// Report types
// ---------------------------------------------------------------------------

/// Top-level JSON document.
#[derive(Debug, Serialize)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    pub trackfile: String,
    pub observation_years: f64,
    pub catalog_points: usize,
    pub catalog_events: usize,
    pub samples: Vec<SampleReport>,
    pub category_table: Vec<CategoryRow>,
}

/// One sample's tables.
#[derive(Debug, Serialize)]
pub struct SampleReport {
    pub label: String,
    pub kind: SampleKind,
    /// Locations involved: one, or (primary, secondary) for conditional.
    pub locations: Vec<LocationReport>,
    pub empty: bool,
    pub event_count: usize,
    pub event_ids: Vec<String>,
    /// Event id to maximum qualifying wind.
    pub event_max_wind: BTreeMap<String, f64>,
    pub exceedance: Vec<ExceedancePoint>,
    pub categories: Vec<CategoryFrequency>,
    pub uncategorized: usize,
    pub density: Vec<DensityPoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleKind {
    Location,
    Conditional,
}

/// A location with its filter settings and geodesic search ring.
#[derive(Debug, Serialize)]
pub struct LocationReport {
    pub name: String,
    pub coordinate: Coordinate,
    pub radius_km: f64,
    pub wind_threshold: f64,
    pub search_area: Vec<Coordinate>,
}

/// One category with every sample's annual rate, keyed by sample label.
#[derive(Debug, Serialize)]
pub struct CategoryRow {
    pub category: usize,
    pub lower: f64,
    pub upper: Option<f64>,
    pub annual_rates: BTreeMap<String, f64>,
}

// ---------------------------------------------------------------------------
// Building
// ---------------------------------------------------------------------------

/// Assembles the report document from a finished run.
pub fn build_report(results: &AnalysisResults, config: &RunConfig) -> Report {
    let location_report = |idx: usize| {
        let c = &config.criteria[idx];
        LocationReport {
            name: c.location.name.clone(),
            coordinate: c.location.coordinate,
            radius_km: c.radius_km,
            wind_threshold: c.wind_threshold,
            search_area: SearchArea::new(c.location.coordinate, c.radius_km).ring_coordinates(),
        }
    };

    let mut samples: Vec<SampleReport> = results
        .locations
        .iter()
        .enumerate()
        .map(|(idx, l)| sample_report(&l.result, SampleKind::Location, vec![location_report(idx)]))
        .collect();

    if let (Some(conditional), Some((a, b))) = (&results.conditional, config.conditional) {
        samples.push(sample_report(
            &conditional.result,
            SampleKind::Conditional,
            vec![location_report(a), location_report(b)],
        ));
    }

    Report {
        generated_at: Utc::now(),
        trackfile: config.trackfile.display().to_string(),
        observation_years: results.observation_years,
        catalog_points: results.catalog_points,
        catalog_events: results.catalog_events,
        category_table: merge_category_tables(&results.samples()),
        samples,
    }
}

fn sample_report(result: &SampleResult, kind: SampleKind, locations: Vec<LocationReport>) -> SampleReport {
    SampleReport {
        label: result.label.clone(),
        kind,
        locations,
        empty: result.summary.is_empty(),
        event_count: result.summary.event_count,
        event_ids: result.passage.event_ids.clone(),
        event_max_wind: result.sample.clone(),
        exceedance: result.summary.curve.clone(),
        categories: result.summary.categories.clone(),
        uncategorized: result.summary.uncategorized,
        density: result.density.clone(),
    }
}

/// Joins every sample's category table on category. All samples share the
/// same bins, so every row carries every label.
pub fn merge_category_tables(samples: &[&SampleResult]) -> Vec<CategoryRow> {
    let Some(first) = samples.first() else {
        return Vec::new();
    };

    first
        .summary
        .categories
        .iter()
        .map(|template| CategoryRow {
            category: template.category,
            lower: template.lower,
            upper: template.upper,
            annual_rates: samples
                .iter()
                .filter_map(|s| {
                    s.summary
                        .categories
                        .iter()
                        .find(|c| c.category == template.category)
                        .map(|c| (s.label.clone(), c.annual_rate))
                })
                .collect(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Writing
// ---------------------------------------------------------------------------

/// File-name friendly form of a label: lowercase alphanumerics joined by `_`.
pub fn slugify(label: &str) -> String {
    let mut slug = String::with_capacity(label.len());
    for ch in label.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.ends_with('_') && !slug.is_empty() {
            slug.push('_');
        }
    }
    while slug.ends_with('_') {
        slug.pop();
    }
    if slug.is_empty() { "sample".to_string() } else { slug }
}

/// One file-name slug per label. Labels that slugify alike (differing only
/// in case or punctuation) get `_2`, `_3`, ... in order of appearance.
pub fn unique_slugs<'a, I>(labels: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut taken = HashSet::new();
    let mut slugs = Vec::new();
    for label in labels {
        let base = slugify(label);
        let mut slug = base.clone();
        let mut n = 2;
        while !taken.insert(slug.clone()) {
            slug = format!("{}_{}", base, n);
            n += 1;
        }
        slugs.push(slug);
    }
    slugs
}

/// Writes all report files into `dir`, creating it if needed.
/// Returns the paths written.
///
/// # Errors
/// `TrackError::Io`, `TrackError::Csv` or `TrackError::Json` on write failure.
pub fn write_report(results: &AnalysisResults, config: &RunConfig, dir: &Path) -> Result<Vec<PathBuf>, TrackError> {
    fs::create_dir_all(dir)?;
    let report = build_report(results, config);
    let mut written = Vec::new();

    let json_path = dir.join("report.json");
    let mut json = BufWriter::new(File::create(&json_path)?);
    serde_json::to_writer_pretty(&mut json, &report)?;
    json.flush()?;
    written.push(json_path);

    let categories_path = dir.join("categories.csv");
    write_category_csv(&report, &categories_path)?;
    written.push(categories_path);

    let samples = results.samples();
    let slugs = unique_slugs(samples.iter().map(|s| s.label.as_str()));
    for (sample, slug) in samples.iter().zip(&slugs) {

        if sample.summary.is_empty() {
            log::warn!("{}: empty sample, skipping exceedance table", sample.label);
        } else {
            let path = dir.join(format!("exceedance_{}.csv", slug));
            write_exceedance_csv(&sample.summary.curve, &path)?;
            written.push(path);
        }

        let path = dir.join(format!("tracks_{}.csv", slug));
        write_tracks_csv(&sample.passage.event_tracks, &path)?;
        written.push(path);
    }

    log::info!("Wrote {} report files to {}", written.len(), dir.display());
    Ok(written)
}

fn write_exceedance_csv(curve: &[ExceedancePoint], path: &Path) -> Result<(), TrackError> {
    let mut writer = csv::Writer::from_path(path)?;
    for point in curve {
        writer.serialize(point)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_tracks_csv(points: &[TrackPoint], path: &Path) -> Result<(), TrackError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["SID", "LAT", "LON", "Vm"])?;
    for p in points {
        writer.write_record([
            p.event_id.clone(),
            p.coordinate.latitude.to_string(),
            p.coordinate.longitude.to_string(),
            p.max_wind.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_category_csv(report: &Report, path: &Path) -> Result<(), TrackError> {
    let labels: Vec<&str> = report.samples.iter().map(|s| s.label.as_str()).collect();
    let mut writer = csv::Writer::from_path(path)?;

    let mut header = vec!["category".to_string(), "lower".to_string(), "upper".to_string()];
    header.extend(labels.iter().map(|l| l.to_string()));
    writer.write_record(&header)?;

    for row in &report.category_table {
        let mut record = vec![
            row.category.to_string(),
            row.lower.to_string(),
            row.upper.map(|u| u.to_string()).unwrap_or_default(),
        ];
        for label in &labels {
            let rate = row.annual_rates.get(*label).copied().unwrap_or(0.0);
            record.push(rate.to_string());
        }
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use crate::ingest::fixtures::*;
    use crate::ingest::trackset::parse_trackset;
    use crate::runner::Analysis;

    fn run_config(text: &str) -> (AnalysisResults, RunConfig) {
        let config = parse_config(text).unwrap();
        let trackset = parse_trackset(fixture_gulf_tracks_csv(), b',').unwrap();
        let results = Analysis::with_trackset(config.clone(), trackset).run().unwrap();
        (results, config)
    }

    fn gulf_run() -> (AnalysisResults, RunConfig) {
        let config = parse_config(
            r#"
trackfile = "gulf.csv"
observation_years = 120
search_radius_miles = 300

[[location]]
name = "Miami"
latitude = 25.75
longitude = -80.0
wind_threshold = 33.0

[[location]]
name = "New Orleans"
latitude = 30.0
longitude = -90.0
wind_threshold = 33.0
"#,
        )
        .unwrap();
        let trackset = parse_trackset(fixture_gulf_tracks_csv(), b',').unwrap();
        let results = Analysis::with_trackset(config.clone(), trackset).run().unwrap();
        (results, config)
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Miami"), "miami");
        assert_eq!(slugify("New Orleans | Miami"), "new_orleans_miami");
        assert_eq!(slugify("  St. John's  "), "st_john_s");
        assert_eq!(slugify("|||"), "sample");
    }

    #[test]
    fn test_report_has_location_and_conditional_samples() {
        let (results, config) = gulf_run();
        let report = build_report(&results, &config);

        assert_eq!(report.samples.len(), 3);
        assert_eq!(report.samples[0].kind, SampleKind::Location);
        assert_eq!(report.samples[2].kind, SampleKind::Conditional);
        assert_eq!(report.samples[2].label, "New Orleans | Miami");
        assert_eq!(report.samples[2].locations.len(), 2);
        assert_eq!(report.samples[2].locations[0].name, "Miami");
        assert!(!report.samples[0].locations[0].search_area.is_empty());
    }

    #[test]
    fn test_merged_category_table_has_every_sample() {
        let (results, config) = gulf_run();
        let report = build_report(&results, &config);

        assert_eq!(report.category_table.len(), 5);
        for row in &report.category_table {
            assert_eq!(row.annual_rates.len(), 3, "category {} missing a column", row.category);
        }
        // Miami: 55 falls in [50, 58), 60 in [58, 70)
        let miami_cat3 = report.category_table[2].annual_rates["Miami"];
        let miami_cat4 = report.category_table[3].annual_rates["Miami"];
        assert!((miami_cat3 - 1.0 / 120.0).abs() < 1e-12);
        assert!((miami_cat4 - 1.0 / 120.0).abs() < 1e-12);
    }

    #[test]
    fn test_write_report_creates_files() {
        let (results, config) = gulf_run();
        let dir = tempfile::tempdir().unwrap();
        let written = write_report(&results, &config, dir.path()).unwrap();

        assert!(dir.path().join("report.json").exists());
        assert!(dir.path().join("categories.csv").exists());
        assert!(dir.path().join("exceedance_miami.csv").exists());
        assert!(dir.path().join("exceedance_new_orleans_miami.csv").exists());
        assert!(dir.path().join("tracks_new_orleans.csv").exists());
        assert_eq!(written.len(), 2 + 3 * 2);

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join("report.json")).unwrap()).unwrap();
        assert_eq!(json["observation_years"], 120.0);
        assert_eq!(json["samples"][0]["event_count"], 2);
        assert_eq!(json["samples"][0]["kind"], "location");

        let curve = fs::read_to_string(dir.path().join("exceedance_miami.csv")).unwrap();
        let mut lines = curve.lines();
        assert_eq!(lines.next(), Some("rank,wind,annual_rate,return_period_years"));
        assert!(lines.next().unwrap().starts_with("1,60.0,"));
    }

    #[test]
    fn test_tracks_csv_round_trips_through_reader() {
        let (results, config) = gulf_run();
        let dir = tempfile::tempdir().unwrap();
        write_report(&results, &config, dir.path()).unwrap();

        let text = fs::read_to_string(dir.path().join("tracks_miami.csv")).unwrap();
        let tracks = parse_trackset(&text, b',').unwrap();
        assert_eq!(tracks.event_ids(), vec!["SIM0001", "SIM0002"]);
        assert_eq!(tracks.len(), 9, "full tracks of both Miami events");
    }

    #[test]
    fn test_unique_slugs_suffix_collisions_in_order() {
        let slugs = unique_slugs(["Miami", "MIAMI", "St. John's", "St John s", "miami_2"]);
        assert_eq!(slugs, vec!["miami", "miami_2", "st_john_s", "st_john_s_2", "miami_2_2"]);
    }

    #[test]
    fn test_labels_differing_in_case_write_separate_files() {
        // "MIAMI" sits on New Orleans, so its curve differs from Miami's
        let (results, config) = run_config(
            r#"
trackfile = "gulf.csv"
observation_years = 120
search_radius_miles = 300

[[location]]
name = "Miami"
latitude = 25.75
longitude = -80.0
wind_threshold = 33.0

[[location]]
name = "MIAMI"
latitude = 30.0
longitude = -90.0
wind_threshold = 33.0
"#,
        );
        let dir = tempfile::tempdir().unwrap();
        let written = write_report(&results, &config, dir.path()).unwrap();

        let distinct: HashSet<&PathBuf> = written.iter().collect();
        assert_eq!(distinct.len(), written.len(), "report paths must not repeat: {:?}", written);
        assert_eq!(written.len(), 2 + 3 * 2);

        let first_row = |name: &str| {
            let text = fs::read_to_string(dir.path().join(name)).unwrap();
            text.lines().nth(1).unwrap().to_string()
        };
        assert!(first_row("exceedance_miami.csv").starts_with("1,60.0,"));
        assert!(first_row("exceedance_miami_2.csv").starts_with("1,70.0,"));
        assert!(dir.path().join("tracks_miami_2.csv").exists());
    }

    #[test]
    fn test_empty_sample_keeps_marker_and_skips_curve() {
        let (results, config) = run_config(
            r#"
trackfile = "gulf.csv"
observation_years = 120
search_radius_miles = 300

[[location]]
name = "Miami"
latitude = 25.75
longitude = -80.0
wind_threshold = 33.0

[[location]]
name = "Honolulu"
latitude = 21.3
longitude = -157.8
wind_threshold = 33.0
"#,
        );
        let dir = tempfile::tempdir().unwrap();
        let written = write_report(&results, &config, dir.path()).unwrap();

        assert!(!dir.path().join("exceedance_honolulu.csv").exists());
        assert!(!dir.path().join("exceedance_honolulu_miami.csv").exists());
        assert!(dir.path().join("tracks_honolulu.csv").exists(), "track table is written even when empty");
        assert!(dir.path().join("exceedance_miami.csv").exists());
        assert_eq!(written.len(), 2 + 1 + 3);

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join("report.json")).unwrap()).unwrap();
        assert_eq!(json["samples"][0]["empty"], false);
        assert_eq!(json["samples"][1]["label"], "Honolulu");
        assert_eq!(json["samples"][1]["empty"], true);
        assert_eq!(json["samples"][1]["event_count"], 0);
        assert_eq!(json["samples"][2]["empty"], true, "conditional on an empty secondary");

        let mut reader = csv::Reader::from_path(dir.path().join("categories.csv")).unwrap();
        let headers = reader.headers().unwrap().clone();
        let honolulu = headers.iter().position(|h| h == "Honolulu").unwrap();
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 5);
        for row in &rows {
            let rate: f64 = row[honolulu].parse().unwrap();
            assert_eq!(rate, 0.0, "Honolulu category {} should have no rate", &row[0]);
        }
    }
}
