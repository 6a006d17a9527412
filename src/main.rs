//! Tropical Cyclone Passage Analysis - Batch Runner
//!
//! A one-shot batch job that:
//! 1. Loads the run configuration and the simulated track catalog
//! 2. Selects storms passing each configured location (and the
//!    conditional location pair, if configured)
//! 3. Builds exceedance curves, category frequencies and intensity
//!    densities for every sample
//! 4. Writes a JSON report and CSV tables for external plotting
//!
//! Usage:
//!   cargo run --release                              # analysis.toml, output/
//!   cargo run --release -- --config gulf.toml --output out/gulf
//!   cargo run --release -- --threads 1 --no-write    # print summaries only
//!
//! Environment:
//!   RUST_LOG - log filter (default: info)

use std::path::PathBuf;

use clap::Parser;
use tcrisk::config::{DEFAULT_CONFIG_PATH, load_config};
use tcrisk::report::write_report;
use tcrisk::runner::{Analysis, RunnerOptions, SampleResult};

/// Return periods shown in the console summary, years.
const SUMMARY_RETURN_PERIODS: [f64; 4] = [5.0, 10.0, 50.0, 100.0];

#[derive(Parser, Debug)]
#[command(name = "tcrisk", about = "Cyclone passage and return-period analysis")]
struct Args {
    /// Run configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Directory for the JSON report and CSV tables
    #[arg(long, default_value = "output")]
    output: PathBuf,

    /// Worker threads for per-location filtering (default: all cores)
    #[arg(long)]
    threads: Option<usize>,

    /// Print summaries without writing report files
    #[arg(long)]
    no_write: bool,
}

fn main() {
    tcrisk::logging::init_logger();

    let args = Args::parse();

    println!("🌀 Tropical Cyclone Passage Analysis");
    println!("=====================================\n");

    println!("⚙️  Loading configuration from {}...", args.config.display());
    let config = match load_config(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("\n❌ Configuration failed: {}\n", e);
            std::process::exit(1);
        }
    };
    println!("✓ Configuration loaded:");
    println!("  - Track file: {}", config.trackfile.display());
    println!("  - Observation period: {} years", config.observation_years);
    println!("  - Search radius: {:.1} km", config.radius_km);
    println!("  - Locations: {}\n", config.criteria.len());

    println!("📥 Loading track catalog...");
    let mut analysis = match Analysis::load(config) {
        Ok(analysis) => analysis,
        Err(e) => {
            eprintln!("\n❌ Failed to load track catalog: {}\n", e);
            std::process::exit(1);
        }
    };
    println!(
        "✓ Loaded {} track points from {} events\n",
        analysis.trackset().len(),
        analysis.trackset().event_count()
    );

    if let Some(threads) = args.threads {
        analysis = analysis.with_options(RunnerOptions { threads });
    }

    println!("🔄 Filtering locations...");
    let results = match analysis.run() {
        Ok(results) => results,
        Err(e) => {
            eprintln!("\n❌ Analysis failed: {}\n", e);
            std::process::exit(1);
        }
    };
    println!("✓ Analysis complete\n");

    println!("📊 Results");
    println!("==========");
    for sample in results.samples() {
        print_sample(sample);
    }
    println!();

    if args.no_write {
        println!("⏭️  Skipping report output (--no-write)");
        return;
    }

    println!("💾 Writing report to {}...", args.output.display());
    match write_report(&results, analysis.config(), &args.output) {
        Ok(paths) => {
            for path in &paths {
                println!("   ✓ {}", path.display());
            }
            println!("\n✓ Wrote {} files", paths.len());
        }
        Err(e) => {
            eprintln!("\n❌ Report output failed: {}\n", e);
            std::process::exit(1);
        }
    }
}

fn print_sample(sample: &SampleResult) {
    let summary = &sample.summary;
    println!("\n{}", sample.label);
    println!("  Events passing: {}", summary.event_count);

    if summary.is_empty() {
        println!("  (no qualifying events)");
        return;
    }

    println!(
        "  Annual rate (categorized): {:.4} per year",
        summary.categorized_annual_rate()
    );
    for rp in SUMMARY_RETURN_PERIODS {
        match summary.wind_at_return_period(rp) {
            Some(wind) => println!("  {:>4}-year wind: {:.1} m/s", rp, wind),
            None => println!("  {:>4}-year wind: n/a (catalog too short)", rp),
        }
    }
    for c in &summary.categories {
        if c.count > 0 {
            println!("  Category {}: {} events ({:.4}/yr)", c.category, c.count, c.annual_rate);
        }
    }
}
