/// Example: Exceedance table for one location from a config file
///
/// Usage:
///   cargo run --example exceedance_table -- <config_toml> <location_name>
///
/// Runs the location filter for one configured location and prints every
/// rank of the empirical exceedance curve, then the category table.

use std::env;
use std::path::Path;

use tcrisk::analysis::exceedance::summarize;
use tcrisk::analysis::passages::filter_location;
use tcrisk::config::load_config;
use tcrisk::ingest::trackset::load_trackset;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 3 {
        eprintln!("Usage: {} <config_toml> <location_name>", args[0]);
        std::process::exit(1);
    }

    let config = load_config(Path::new(&args[1])).expect("Failed to load configuration");
    let Some(criteria) = config.criteria_for(&args[2]) else {
        eprintln!("No location named '{}' in {}", args[2], args[1]);
        std::process::exit(1);
    };

    let trackset = load_trackset(&config.trackfile, config.delimiter).expect("Failed to load track file");
    let passage = filter_location(trackset.points(), criteria);
    let summary = summarize(&passage.event_sample(), &config.category_bins, config.observation_years);

    println!(
        "{}: {} of {} storms pass within {:.0} km above {} m/s\n",
        criteria.location.name,
        summary.event_count,
        trackset.event_count(),
        criteria.radius_km,
        criteria.wind_threshold
    );

    println!("{:>5}  {:>8}  {:>10}  {:>12}", "Rank", "Wind", "Rate/yr", "Return (yr)");
    println!("{}", "-".repeat(42));
    for p in &summary.curve {
        println!(
            "{:>5}  {:>8.1}  {:>10.4}  {:>12.1}",
            p.rank, p.wind, p.annual_rate, p.return_period_years
        );
    }

    println!("\n{:>8}  {:>14}  {:>6}  {:>8}", "Category", "Range", "Events", "Rate/yr");
    println!("{}", "-".repeat(42));
    for c in &summary.categories {
        let range = match c.upper {
            Some(upper) => format!("[{}, {})", c.lower, upper),
            None => format!("[{}, ...)", c.lower),
        };
        println!("{:>8}  {:>14}  {:>6}  {:>8.4}", c.category, range, c.count, c.annual_rate);
    }
}
