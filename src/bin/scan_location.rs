//! Single-Location Scan
//!
//! Quick look at one point of interest without writing a config file:
//! loads a track catalog, applies the location filter, and prints the
//! passage count, category frequencies and a return-period table.
//!
//! Usage:
//!   cargo run --bin scan_location -- --trackfile tracks.csv \
//!       --lat 25.75 --lon -80 --radius-miles 300 --threshold 33 --years 120
//!
//! Options:
//!   --delimiter C   Column delimiter of the track file (default ',')

use std::path::PathBuf;

use clap::Parser;
use tcrisk::analysis::exceedance::{CategoryBins, summarize};
use tcrisk::analysis::passages::filter_location;
use tcrisk::ingest::trackset::load_trackset;
use tcrisk::model::{Coordinate, KM_PER_MILE, Location, PassageCriteria};
use tcrisk::proximity::normalize_longitude;

/// Return periods reported in the table, years.
const RETURN_PERIODS: [f64; 7] = [2.0, 5.0, 10.0, 25.0, 50.0, 75.0, 120.0];

#[derive(Parser, Debug)]
#[command(name = "scan_location", about = "Cyclone passages at a single location")]
struct Args {
    /// Track catalog CSV (SID, LAT, LON, Vm columns)
    #[arg(long)]
    trackfile: PathBuf,

    /// Location latitude, degrees
    #[arg(long, allow_hyphen_values = true)]
    lat: f64,

    /// Location longitude, degrees (either -180..180 or 0..360)
    #[arg(long, allow_hyphen_values = true)]
    lon: f64,

    /// Search radius, miles
    #[arg(long, default_value_t = 300.0)]
    radius_miles: f64,

    /// Wind threshold, m/s (strictly exceeded)
    #[arg(long, default_value_t = 33.0)]
    threshold: f64,

    /// Years represented by the catalog
    #[arg(long, default_value_t = 120.0)]
    years: f64,

    #[arg(long, default_value_t = ',')]
    delimiter: char,
}

/// Same bounds the config loader enforces for a `[[location]]`.
fn validate_args(args: &Args) -> Result<(), String> {
    if !args.delimiter.is_ascii() {
        return Err(format!("delimiter must be ASCII, got {:?}", args.delimiter));
    }
    if !(-90.0..=90.0).contains(&args.lat) {
        return Err(format!("--lat {} out of range [-90, 90]", args.lat));
    }
    if !args.lon.is_finite() {
        return Err("--lon must be finite".to_string());
    }
    if !(args.radius_miles.is_finite() && args.radius_miles > 0.0) {
        return Err(format!("--radius-miles must be positive, got {}", args.radius_miles));
    }
    if !(args.years.is_finite() && args.years > 0.0) {
        return Err(format!("--years must be positive, got {}", args.years));
    }
    if !(args.threshold.is_finite() && args.threshold >= 0.0) {
        return Err(format!("--threshold must be non-negative, got {}", args.threshold));
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tcrisk::logging::init_logger();
    let args = Args::parse();

    println!("🌀 Single-Location Scan");
    println!("=======================\n");

    validate_args(&args)?;

    let criteria = PassageCriteria {
        location: Location {
            name: format!("({:.2}, {:.2})", args.lat, args.lon),
            coordinate: Coordinate::new(args.lat, normalize_longitude(args.lon)),
        },
        radius_km: args.radius_miles * KM_PER_MILE,
        wind_threshold: args.threshold,
    };

    println!("📥 Loading {}...", args.trackfile.display());
    let trackset = load_trackset(&args.trackfile, args.delimiter as u8)?;
    println!("✓ {} points, {} events\n", trackset.len(), trackset.event_count());

    let passage = filter_location(trackset.points(), &criteria);
    let summary = summarize(&passage.event_sample(), &CategoryBins::saffir_simpson(), args.years);

    println!("📍 {}", criteria.location.name);
    println!("   Radius: {:.1} mi ({:.1} km)", args.radius_miles, criteria.radius_km);
    println!("   Threshold: > {:.1} m/s", args.threshold);
    println!("   Events passing: {}\n", passage.event_count());

    if summary.is_empty() {
        println!("⚠️  No storms pass this location");
        return Ok(());
    }

    println!("   Category  Events  Rate/yr");
    for c in &summary.categories {
        println!("   {:>8}  {:>6}  {:.4}", c.category, c.count, c.annual_rate);
    }
    if summary.uncategorized > 0 {
        println!("   (below category 1: {})", summary.uncategorized);
    }

    println!("\n   Return period  Wind (m/s)");
    for rp in RETURN_PERIODS {
        match summary.wind_at_return_period(rp) {
            Some(wind) => println!("   {:>10} yr  {:>9.1}", rp, wind),
            None => println!("   {:>10} yr  {:>9}", rp, "-"),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(extra: &[&str]) -> Args {
        let mut argv = vec!["scan_location", "--trackfile", "t.csv", "--lat", "25.75", "--lon", "-80"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults_are_valid() {
        let args = parse(&[]);
        assert_eq!(args.lon, -80.0);
        assert!(validate_args(&args).is_ok());
    }

    #[test]
    fn test_latitude_out_of_range_is_rejected() {
        let mut args = parse(&[]);
        args.lat = 95.0;
        let err = validate_args(&args).unwrap_err();
        assert!(err.contains("--lat"), "got: {}", err);
    }

    #[test]
    fn test_non_finite_years_are_rejected() {
        let args = parse(&["--years", "inf"]);
        assert!(validate_args(&args).unwrap_err().contains("--years"));

        let args = parse(&["--years", "0"]);
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_non_positive_radius_is_rejected() {
        let args = parse(&["--radius-miles", "0"]);
        assert!(validate_args(&args).unwrap_err().contains("--radius-miles"));
    }
}
