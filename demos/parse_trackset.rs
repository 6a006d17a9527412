/// Example: Parse a simulated track catalog and summarize its contents
///
/// Usage:
///   cargo run --example parse_trackset -- <track_csv> [delimiter]
///
/// Shows:
///   - Total track points and distinct storms
///   - Latitude / longitude extent after longitude normalization
///   - Points per storm (min / mean / max)
///   - The most intense storms in the catalog

use std::env;
use std::path::Path;

use tcrisk::analysis::groupings::{group_by_event, max_wind_by_event};
use tcrisk::ingest::trackset::load_trackset;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <track_csv> [delimiter]", args[0]);
        eprintln!();
        eprintln!("The file needs SID, LAT, LON and Vm columns.");
        std::process::exit(1);
    }

    let delimiter = args.get(2).and_then(|d| d.bytes().next()).unwrap_or(b',');
    let path = Path::new(&args[1]);

    println!("Parsing track catalog from: {}\n", path.display());

    let trackset = load_trackset(path, delimiter).expect("Failed to parse track file");
    println!("✓ Parsed {} track points", trackset.len());

    if trackset.is_empty() {
        println!("No data found in file");
        return;
    }

    let points = trackset.points();
    let (mut lat_min, mut lat_max) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut lon_min, mut lon_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for p in points {
        lat_min = lat_min.min(p.coordinate.latitude);
        lat_max = lat_max.max(p.coordinate.latitude);
        lon_min = lon_min.min(p.coordinate.longitude);
        lon_max = lon_max.max(p.coordinate.longitude);
    }

    let grouped = group_by_event(points);
    let lengths: Vec<usize> = grouped.values().map(|track| track.len()).collect();
    let min_len = lengths.iter().min().unwrap();
    let max_len = lengths.iter().max().unwrap();
    let mean_len = lengths.iter().sum::<usize>() as f64 / lengths.len() as f64;

    println!("Storms: {}", trackset.event_count());
    println!("Latitude:  {:.2} to {:.2}", lat_min, lat_max);
    println!("Longitude: {:.2} to {:.2}", lon_min, lon_max);
    println!("Points per storm: min {}, mean {:.1}, max {}\n", min_len, mean_len, max_len);

    let mut peaks: Vec<(String, f64)> = max_wind_by_event(points).into_iter().collect();
    peaks.sort_by(|a, b| b.1.total_cmp(&a.1));

    println!("Most intense storms:");
    println!("{}", "-".repeat(30));
    for (sid, wind) in peaks.iter().take(10) {
        println!("  {:<16} {:>6.1} m/s", sid, wind);
    }
}
