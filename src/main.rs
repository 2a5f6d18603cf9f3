mod cli;
mod config;
mod error;
mod logic;
mod models;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use error::Result;
use logic::{SeasonGenerator, UniformPercent, YieldEngine};
use models::{SimulationReport, SimulationRequest};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the JSON/YAML output
    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Simulate { input, pretty } => run_simulation(&input, pretty, cli.config),
        Commands::Generate {
            trees,
            yield_per_tree,
            days_per_stage,
            seed,
            output,
        } => {
            let request = SeasonGenerator::new(days_per_stage, seed)
                .generate_request(trees, yield_per_tree);
            let json = serde_json::to_string_pretty(&request)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, json)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    eprintln!(
                        "Generated {} days of weather in {}",
                        request.growing_season_data.len(),
                        path.display()
                    );
                }
                None => println!("{}", json),
            }
            Ok(())
        }
        Commands::Thresholds => {
            let config = Config::load(cli.config)?;
            if let Some(source) = &config.source {
                tracing::info!("Threshold overrides from {}", source.display());
            }
            print!("{}", serde_yaml::to_string(&config.thresholds)?);
            Ok(())
        }
        Commands::Rules => {
            for (position, (id, name)) in YieldEngine::new().list_rules().iter().enumerate() {
                println!("{:>2}. {:<22} {}", position + 1, id, name);
            }
            Ok(())
        }
    }
}

fn run_simulation(
    input: &Path,
    pretty: bool,
    config_override: Option<PathBuf>,
) -> anyhow::Result<()> {
    let config = Config::load(config_override)?;

    let request = load_request(input)
        .with_context(|| format!("failed to read simulation input {}", input.display()))?;

    let engine = YieldEngine::new();
    let mut rng = UniformPercent::from_entropy();
    let outcome = engine.simulate(&request, &config.thresholds, &mut rng);

    let report = SimulationReport::new(request, outcome);
    let json = if pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{}", json);

    Ok(())
}

/// Read a request from a file, or from stdin when the path is "-".
fn load_request(input: &Path) -> Result<SimulationRequest> {
    let raw = if input == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(input)?
    };

    Ok(serde_json::from_str(&raw)?)
}
