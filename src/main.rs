//! Lightlock CLI
//!
//! Lock the screen with a hand gesture over the ambient light sensor.

use clap::{Parser, Subcommand};
use lightlock::{
    agent::Agent,
    config::Config,
    core::TickOutcome,
    sensor::{self, DryRunLocker, LightSensor, ReplaySensor, ScreenLocker, SensorError},
    GESTURE_GUIDE, VERSION,
};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lightlock")]
#[command(version = VERSION)]
#[command(about = "Lock the screen with a hand gesture over the ambient light sensor", long_about = None)]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Watch the sensor and lock the screen when the gesture repeats
    Run {
        /// Detect gestures but only log instead of locking
        #[arg(long)]
        dry_run: bool,

        /// Sensor device to use instead of auto-detection
        #[arg(long)]
        device: Option<PathBuf>,
    },

    /// Print every reading with its trend symbols (never locks)
    Watch {
        /// Sensor device to use instead of auto-detection
        #[arg(long)]
        device: Option<PathBuf>,
    },

    /// Run a recorded reading file through the detector
    Replay {
        /// Recording with one reading per line
        file: PathBuf,

        /// Print every tick, not just gestures and locks
        #[arg(long)]
        all: bool,
    },

    /// Check that the sensor can be opened and read
    Status,

    /// Show configuration
    Config,

    /// Explain how to perform the gesture
    Gesture,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Run { dry_run, device } => {
            cmd_run(dry_run, device);
        }
        Commands::Watch { device } => {
            cmd_watch(device);
        }
        Commands::Replay { file, all } => {
            cmd_replay(&file, all);
        }
        Commands::Status => {
            cmd_status();
        }
        Commands::Config => {
            cmd_config();
        }
        Commands::Gesture => {
            cmd_gesture();
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn cmd_run(dry_run: bool, device: Option<PathBuf>) {
    println!("Lightlock v{VERSION}");
    println!();

    let config = load_config();
    let sensor = open_sensor_or_exit(device.as_deref().or(config.sensor_path.as_deref()));

    let locker: Box<dyn ScreenLocker> = if dry_run {
        Box::new(DryRunLocker)
    } else {
        Box::new(sensor::Locker::default())
    };

    println!("Sensor: {}", sensor.describe());
    println!("Gesture: {} (x{})", config.gesture, config.repeat_target + 1);
    println!("Polling every {}ms", config.update_interval.as_millis());
    if dry_run {
        println!("Dry run: the screen will not be locked");
    }
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    let mut agent = Agent::new(&config, sensor, locker);
    let running = shutdown_flag();

    let result = agent.run(&running, |outcome| {
        if let TickOutcome::Lock { .. } = outcome {
            println!(
                "[{}] Gesture repeated, screen locked",
                chrono::Local::now().format("%H:%M:%S")
            );
        }
    });

    finish(agent.stats().summary(), result);
}

fn cmd_watch(device: Option<PathBuf>) {
    let config = load_config();
    let sensor = open_sensor_or_exit(device.as_deref().or(config.sensor_path.as_deref()));

    println!("Watching {} (Ctrl+C to stop)", sensor.describe());
    println!();
    println!("{:>10} {:>8} {:>8}  symbols  cursor", "reading", "diff", "prev");

    let mut agent = Agent::new(&config, sensor, DryRunLocker);
    let running = shutdown_flag();

    let result = agent.run(&running, print_tick);

    finish(agent.stats().summary(), result);
}

fn cmd_replay(file: &Path, all: bool) {
    let config = load_config();
    let sensor = match ReplaySensor::load(file) {
        Ok(sensor) => sensor,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    println!(
        "Replaying {} readings from {:?} at {}ms per tick",
        sensor.remaining(),
        file,
        config.update_interval.as_millis()
    );
    println!();

    let interval_ms = config.update_interval.as_millis();
    let mut agent = Agent::new(&config, sensor, DryRunLocker);
    let mut tick: u128 = 0;

    let result = agent.replay(Instant::now(), |outcome| {
        let at = tick * interval_ms;
        tick += 1;
        match outcome {
            TickOutcome::Lock { reading, .. } => {
                println!("{at:>8}ms  LOCK      reading {reading}");
            }
            TickOutcome::Gesture {
                reading, repeats, ..
            } => {
                println!("{at:>8}ms  gesture   reading {reading} (repeats: {repeats})");
            }
            _ if all => {
                print!("{at:>8}ms  ");
                print_tick(outcome);
            }
            _ => {}
        }
    });

    finish(agent.stats().summary(), result);
}

fn cmd_status() {
    let config = load_config();

    println!("Lightlock Status");
    println!("================");
    println!();

    println!("Config file: {:?}", Config::config_path());
    println!("Gesture: {}", config.gesture);
    println!();

    match sensor::open_sensor(config.sensor_path.as_deref()) {
        Ok(mut sensor) => {
            println!("Ambient light sensor: {} ✓", sensor.describe());
            match sensor.read() {
                Ok(reading) => println!("Current reading: {reading:?}"),
                Err(e) => println!("Reading failed: {e}"),
            }
        }
        Err(e) => {
            println!("Ambient light sensor: unavailable ✗");
            println!("  {e}");
        }
    }
}

fn cmd_config() {
    let config = load_config();

    println!("Configuration");
    println!("=============");
    println!();
    println!("Config file: {:?}", Config::config_path());
    println!();
    println!(
        "{}",
        serde_json::to_string_pretty(&config).unwrap_or_else(|_| "Error".to_string())
    );
}

fn cmd_gesture() {
    let config = load_config();

    println!("{GESTURE_GUIDE}");
    println!("Configured gesture: {}", config.gesture);
}

/// Load and validate configuration, exiting with status 1 on error.
fn load_config() -> Config {
    match Config::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("Error: {e}");
            eprintln!("Config file: {:?}", Config::config_path());
            std::process::exit(1);
        }
    }
}

fn open_sensor_or_exit(device: Option<&Path>) -> sensor::Sensor {
    match sensor::open_sensor(device) {
        Ok(sensor) => sensor,
        Err(e) => {
            tracing::error!(code = e.exit_code(), "{e}");
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}

fn print_tick(outcome: &TickOutcome) {
    match outcome {
        TickOutcome::Cooldown => println!("{:>10}", "cooldown"),
        TickOutcome::Busy => println!("{:>10}", "busy"),
        TickOutcome::Sample {
            reading,
            sample,
            cursor,
        } => println!(
            "{reading:>10} {:>8} {:>8}  {:<7}  {cursor}",
            sample.diff,
            sample.prev_diff,
            sample.symbol_string()
        ),
        TickOutcome::Gesture {
            reading,
            sample,
            repeats,
        } => println!(
            "{reading:>10} {:>8} {:>8}  {:<7}  complete (repeats: {repeats})",
            sample.diff,
            sample.prev_diff,
            sample.symbol_string()
        ),
        TickOutcome::Lock { reading, sample } => println!(
            "{reading:>10} {:>8} {:>8}  {:<7}  LOCK",
            sample.diff,
            sample.prev_diff,
            sample.symbol_string()
        ),
    }
}

/// Print the session summary and exit with the sensor error's code, if any.
fn finish(summary: String, result: Result<(), SensorError>) {
    println!();
    println!("{summary}");

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(e.exit_code());
    }
}

/// Set up Ctrl+C handler.
fn shutdown_flag() -> Arc<AtomicBool> {
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .expect("Error setting Ctrl+C handler");
    running
}
