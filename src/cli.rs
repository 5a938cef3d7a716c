// cli.rs - Command-line interface configuration
use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "mountain-intro")]
#[command(about = "Falling mountains intro animation", long_about = None)]
pub struct Cli {
    /// JSON file with animation settings
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Seed for mountain shapes and start heights (random if omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of mountain layers
    #[arg(long)]
    pub mountains: Option<usize>,

    /// Intro length in milliseconds
    #[arg(long = "duration-ms")]
    pub duration_ms: Option<f64>,

    /// Hide the hero text overlay
    #[arg(long = "no-ui", default_value = "false")]
    pub no_ui: bool,
}
