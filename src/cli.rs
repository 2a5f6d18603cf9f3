use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "yieldsim",
    version,
    about = "Orchard yield simulator driven by growth-stage weather"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to a threshold override file (YAML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a yield simulation from a JSON request ("-" reads stdin)
    Simulate {
        input: PathBuf,

        /// Pretty-print the JSON report
        #[arg(long)]
        pretty: bool,
    },
    /// Generate a synthetic growing season request
    Generate {
        #[arg(long, default_value_t = 150.0)]
        trees: f64,

        #[arg(long, default_value_t = 500.0)]
        yield_per_tree: f64,

        #[arg(long, default_value_t = 30)]
        days_per_stage: u32,

        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the resolved reduction thresholds
    Thresholds,
    /// List reduction rules in pipeline order
    Rules,
}
