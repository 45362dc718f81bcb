//! SnapPosition CLI
//!
//! Records pointer sessions and reports where the pointer went and lingered.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use snapposition::{
    collector::{check_permission, Capture, PlatformSource},
    config::Config,
    core::{
        aggregate, classify, top_zones, AggregateResult, HesitationZone, PersonalityProfile,
        SessionExport,
    },
    VERSION,
};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

/// How often the live event count is refreshed while recording.
const PROGRESS_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Parser)]
#[command(name = "snapposition")]
#[command(version = VERSION)]
#[command(about = "Pointer movement capture and spatial behavior analytics", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a pointer session, then report and export it
    Record {
        /// Stop automatically after this many seconds
        #[arg(long)]
        duration: Option<u64>,

        /// Export file path (defaults to a timestamped file in the export directory)
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Grid cell size in pixels
        #[arg(long)]
        cell_size: Option<u32>,

        /// Skip writing the export file
        #[arg(long)]
        no_export: bool,
    },

    /// Analyze a previously exported session
    Analyze {
        /// Export file to load
        file: PathBuf,

        /// Grid cell size in pixels
        #[arg(long)]
        cell_size: Option<u32>,

        /// Number of hesitation zones to show
        #[arg(long)]
        top: Option<usize>,

        /// Print the full analysis as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show configuration
    Config,

    /// Show whether pointer capture can run here
    Status,
}

/// Machine-readable output of `analyze --json`.
#[derive(Serialize)]
struct AnalysisReport<'a> {
    aggregate: &'a AggregateResult,
    hesitation_zones: Vec<HesitationZone>,
    profile: PersonalityProfile,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Record {
            duration,
            output,
            cell_size,
            no_export,
        } => cmd_record(duration.map(Duration::from_secs), output, cell_size, no_export),
        Commands::Analyze {
            file,
            cell_size,
            top,
            json,
        } => cmd_analyze(&file, cell_size, top, json),
        Commands::Config => cmd_config(),
        Commands::Status => cmd_status(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

/// Log to stderr so reports on stdout stay clean.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("snapposition=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config() -> Config {
    Config::load().unwrap_or_else(|e| {
        tracing::warn!("could not load configuration, using defaults: {e}");
        Config::default()
    })
}

fn cmd_record(
    duration: Option<Duration>,
    output: Option<PathBuf>,
    cell_size: Option<u32>,
    no_export: bool,
) -> Result<()> {
    let config = load_config();
    let cell_size = cell_size.unwrap_or(config.cell_size);

    println!("SnapPosition v{VERSION}");
    println!();

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .context("failed to install Ctrl+C handler")?;

    let mut capture = Capture::new(PlatformSource::default(), config.capture.clone());
    if let Err(e) = capture.start() {
        print_permission_help();
        return Err(e).context("could not start pointer capture");
    }

    match duration {
        Some(d) => println!("Recording for {}s. Press Ctrl+C to stop early.", d.as_secs()),
        None => println!("Recording. Press Ctrl+C to stop."),
    }
    println!();

    let started = Instant::now();
    while running.load(Ordering::SeqCst) {
        if duration.is_some_and(|d| started.elapsed() >= d) {
            break;
        }
        thread::sleep(PROGRESS_INTERVAL);
        print!("\rEvents captured: {}", capture.count());
        let _ = std::io::stdout().flush();
    }

    capture.stop();
    println!();
    println!();
    println!("{}", capture.counters().summary());

    let events = capture.snapshot();
    if events.is_empty() {
        println!("No events captured.");
        return Ok(());
    }

    let result = aggregate(&events, cell_size);
    print_report(&result, config.top_zones);

    if !no_export {
        let path = output.unwrap_or_else(|| config.export_path.join(SessionExport::default_file_name()));
        let export = SessionExport::new(events, result.stats.clone());
        export
            .write_to(&path)
            .with_context(|| format!("failed to write export to {}", path.display()))?;
        println!();
        println!("Exported to {}", path.display());
    }

    Ok(())
}

fn cmd_analyze(file: &Path, cell_size: Option<u32>, top: Option<usize>, json: bool) -> Result<()> {
    let config = load_config();
    let cell_size = cell_size.unwrap_or(config.cell_size);
    let top = top.unwrap_or(config.top_zones);

    let export = SessionExport::read_from(file)
        .with_context(|| format!("failed to load session from {}", file.display()))?;
    tracing::debug!(
        events = export.events.len(),
        exported_at = %export.metadata.export_time,
        "session loaded"
    );

    let result = aggregate(&export.events, cell_size);

    if json {
        let report = AnalysisReport {
            aggregate: &result,
            hesitation_zones: top_zones(&result, top),
            profile: classify(&result.stats),
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("failed to serialize analysis")?
        );
        return Ok(());
    }

    println!("Session: {}", file.display());
    println!(
        "Exported: {} ({})",
        export.metadata.export_time.format("%Y-%m-%d %H:%M:%S"),
        export.metadata.app
    );
    println!();
    print_report(&result, top);
    Ok(())
}

fn print_report(result: &AggregateResult, top: usize) {
    let stats = &result.stats;

    println!("Session Statistics");
    println!("==================");
    println!("  Events:              {}", stats.total_events);
    println!("  Clicks:              {}", stats.total_clicks);
    println!("  Duration:            {:.2}s", stats.duration);
    println!("  Distance traveled:   {:.0}px", stats.distance_traveled);
    println!(
        "  Speed (avg/min/max): {:.1} / {:.1} / {:.1} px/s",
        stats.avg_speed, stats.min_speed, stats.max_speed
    );
    println!("  Speed std dev:       {:.1}", stats.speed_std);
    println!("  Acceleration bursts: {}", stats.acceleration_bursts);
    println!(
        "  Grid:                {}x{} cells of {}px",
        result.density_grid.columns(),
        result.density_grid.rows(),
        result.cell_size
    );
    println!();

    println!("Movement Profile");
    println!("================");
    println!("{}", classify(stats));
    println!();

    println!("Hesitation Zones");
    println!("================");
    let zones = top_zones(result, top);
    if zones.is_empty() {
        println!("  none");
    }
    for (rank, zone) in zones.iter().enumerate() {
        let (x, y) = zone.screen_origin(result);
        println!(
            "  {}. cell ({}, {}) near ({x}, {y}): {:.2}s",
            rank + 1,
            zone.grid_x,
            zone.grid_y,
            zone.dwell_secs
        );
    }
}

fn print_permission_help() {
    if cfg!(target_os = "macos") {
        eprintln!("Input Monitoring permission may not be granted.");
        eprintln!();
        eprintln!("To grant permission:");
        eprintln!("1. Open System Settings > Privacy & Security");
        eprintln!("2. Select 'Input Monitoring'");
        eprintln!("3. Add your terminal or this binary to the allowed list");
        eprintln!("4. Restart the application");
        eprintln!();
    }
}

fn cmd_config() -> Result<()> {
    let config = load_config();

    println!("Configuration");
    println!("=============");
    println!();
    println!("Config file: {}", Config::config_path().display());
    println!();
    println!(
        "{}",
        serde_json::to_string_pretty(&config).context("failed to serialize configuration")?
    );
    Ok(())
}

fn cmd_status() -> Result<()> {
    let config = load_config();

    println!("SnapPosition Status");
    println!("===================");
    println!();
    println!("Version:  {VERSION}");
    println!("Platform: {}", std::env::consts::OS);

    let has_permission = check_permission();
    println!(
        "Pointer capture: {}",
        if has_permission {
            "available ✓"
        } else {
            "unavailable ✗"
        }
    );
    if !has_permission {
        print_permission_help();
    }
    println!();

    println!("Config file:      {}", Config::config_path().display());
    println!("Export directory: {}", config.export_path.display());

    let exports = std::fs::read_dir(&config.export_path)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .filter(|e| e.path().extension().is_some_and(|ext| ext == "json"))
                .count()
        })
        .unwrap_or(0);
    println!("Saved sessions:   {exports}");
    Ok(())
}
