//! Push-up tracker: replays a recorded landmark stream and counts reps.

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};
use pushup_tracker::config::{Config, EXAMPLE_CONFIG};
use pushup_tracker::replay::{replay, FrameReader};
use pushup_tracker::{RepCounter, RepEvent, RepQuality, RepState, TrackerListener};
use std::io::{self, BufReader};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Landmark recording in JSON Lines format ("-" for stdin)
    #[arg(required_unless_present = "print_config")]
    input: Option<PathBuf>,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<PathBuf>,

    /// Elbow angle below which the arms count as bent
    #[arg(long)]
    down: Option<f64>,

    /// Elbow angle above which the arms count as extended
    #[arg(long)]
    up: Option<f64>,

    /// Deepest angle below which a rep is still partial
    #[arg(long)]
    partial: Option<f64>,

    /// Exponential smoothing factor for the elbow angle
    #[arg(long)]
    smoothing: Option<f64>,

    /// Smoothing filter (exponential, exponential:<alpha>, none)
    #[arg(short, long)]
    filter: Option<String>,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,

    /// Print an example configuration file and exit
    #[arg(long)]
    print_config: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

/// Logs tracker events as they happen
struct LogListener;

impl TrackerListener for LogListener {
    fn on_rep_complete(&mut self, rep: &RepEvent) {
        info!(
            "Rep {}: {} ({}, deepest {:.0}°)",
            rep.count,
            rep.quality.feedback(),
            rep.quality,
            rep.angle
        );
    }

    fn on_angle_update(&mut self, angle: i32) {
        debug!("Elbow angle {}°", angle);
    }

    fn on_state_change(&mut self, state: RepState) {
        debug!("State: {}", state);
    }
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            Config::from_file(path).with_context(|| format!("failed to load {}", path.display()))?
        }
        None => Config::default(),
    };

    if let Some(down) = args.down {
        config.tracker.angle_threshold_down = down;
    }
    if let Some(up) = args.up {
        config.tracker.angle_threshold_up = up;
    }
    if let Some(partial) = args.partial {
        config.tracker.partial_rep_threshold = partial;
    }
    if let Some(filter) = &args.filter {
        config.filter.kind.clone_from(filter);
        config.resolve_smoothing();
    }
    // Applied after the filter so an explicit --smoothing always wins
    if let Some(smoothing) = args.smoothing {
        config.tracker.smoothing_factor = smoothing;
    }

    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    if args.print_config {
        print!("{EXAMPLE_CONFIG}");
        return Ok(());
    }

    let config = load_config(&args)?;
    let mut counter = RepCounter::with_filter(config.tracker, config.create_filter()?)?;

    let summary = match args.input.as_deref() {
        Some(path) if path.as_os_str() != "-" => {
            let frames = FrameReader::open(path).with_context(|| format!("failed to open {}", path.display()))?;
            replay(&mut counter, frames, &mut LogListener)?
        }
        _ => {
            info!("Reading landmark frames from stdin");
            let frames = FrameReader::new(BufReader::new(io::stdin().lock()));
            replay(&mut counter, frames, &mut LogListener)?
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "{} reps ({} good, {} partial, {} shallow) over {} frames ({} without pose); final state {}",
            summary.final_stats.rep_count,
            summary.count_quality(RepQuality::Good),
            summary.count_quality(RepQuality::Partial),
            summary.count_quality(RepQuality::Shallow),
            summary.frames_processed,
            summary.frames_without_pose,
            summary.final_stats.current_state
        );
    }

    Ok(())
}
