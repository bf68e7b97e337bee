use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use linebot_zenoh_runtime::config::{BRIDGE_PORT, RobotConfig};
use linebot_zenoh_runtime::drive::serial::DEFAULT_BAUDRATE;
use linebot_zenoh_runtime::runtime::{self, Backend};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum BackendKind {
    Sim,
    Serial,
}

/// Fuzzy line follower runtime
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// JSON robot configuration (defaults are used for missing fields)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Sensor/motor backend
    #[arg(short, long, value_enum, default_value_t = BackendKind::Sim)]
    backend: BackendKind,

    /// Serial port of the motor/sensor bridge
    #[arg(long, default_value = BRIDGE_PORT)]
    port: String,

    /// Serial baudrate
    #[arg(long, default_value_t = DEFAULT_BAUDRATE)]
    baud: u32,

    /// Stop after this many seconds (overrides the config file)
    #[arg(short, long)]
    duration: Option<f64>,
}

#[tokio::main]
async fn main() {
    // Setup logging (set RUST_LOG=debug for per-cycle output)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .init(); // installs the subscriber globally

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => match RobotConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Config error ({}): {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => RobotConfig::default(),
    };
    if args.duration.is_some() {
        config.run_duration_s = args.duration;
    }
    if let Err(e) = config.validate() {
        eprintln!("Config error: {}", e);
        std::process::exit(1);
    }

    let backend = match args.backend {
        BackendKind::Sim => Backend::Sim,
        BackendKind::Serial => Backend::Serial {
            port: args.port,
            baudrate: args.baud,
        },
    };

    if let Err(e) = runtime::run(config, backend).await {
        eprintln!("Runtime error: {}", e);
        std::process::exit(1);
    }
}
