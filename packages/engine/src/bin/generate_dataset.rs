use std::{fs, path::PathBuf, process::ExitCode};

use clap::{ArgAction, Parser};
use log::{error, info, LevelFilter};
use magic_cube_engine::{run_suite, SearchAlgorithm, SuiteConfig};

/// Runs the local-search suite and writes the dataset the visualizer replays
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Suite configuration (JSON); defaults are used when omitted
    config: Option<PathBuf>,
    /// Where to write the dataset
    #[arg(short, long, default_value = "dataset.json")]
    output: PathBuf,
    /// Override the suite seed
    #[arg(long)]
    seed: Option<u64>,
    /// Override the number of runs per algorithm
    #[arg(long)]
    runs: Option<usize>,
    /// Only run these algorithms (e.g. steepest_ascent); repeatable
    #[arg(short, long = "algorithm")]
    algorithms: Vec<String>,
    /// Log verbosity. Can be given up to three times.
    #[arg(short, action = ArgAction::Count)]
    verbose: u8,
}

fn load_config(cli: &Cli) -> Result<SuiteConfig, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => SuiteConfig::from_json(&fs::read_to_string(path)?)?,
        None => SuiteConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if let Some(runs) = cli.runs {
        config.runs = runs;
    }
    if !cli.algorithms.is_empty() {
        config.algorithms = cli
            .algorithms
            .iter()
            .map(|name| name.parse::<SearchAlgorithm>())
            .collect::<Result<_, _>>()?;
    }
    Ok(config)
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(cli)?;
    info!(
        "running {} algorithms x {} runs (seed {})",
        config.algorithms.len(),
        config.runs,
        config.seed
    );
    let dataset = run_suite(&config)?;
    fs::write(&cli.output, dataset.to_json()?)?;
    info!("wrote {}", cli.output.display());
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(match cli.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        })
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
