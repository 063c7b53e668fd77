//! Command line front end: run one configuration or a directory of them.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

use mushy_rs::config::{Config, DimensionalParams};
use mushy_rs::io::write_solution;
use mushy_rs::simulation::{SimulationConfig, count_failures, run_batch};

/// Mushy layer sea-ice simulations
#[derive(Parser)]
#[command(name = "mushy")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Phase-resolving mushy layer model of sea ice", long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run simulations and write their solutions
    Run(RunArgs),
    /// Load and validate configurations without running them
    Validate(InputArgs),
}

#[derive(Args)]
struct InputArgs {
    /// Configuration file, or a directory of `.yml` configurations
    input: PathBuf,

    /// Inputs hold dimensional parameters
    #[arg(short, long)]
    dimensional: bool,
}

#[derive(Args)]
struct RunArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Directory receiving the solution files
    #[arg(short, long, default_value = "output")]
    output: PathBuf,

    /// Report save points at info level
    #[arg(short, long)]
    verbose: bool,

    /// Abort a run after this many steps
    #[arg(long)]
    max_steps: Option<usize>,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Run(args) => run(args),
        Commands::Validate(args) => validate(args),
    }
}

fn run(args: RunArgs) -> anyhow::Result<ExitCode> {
    let configs = load_configs(&args.input)?;
    let options = SimulationConfig {
        max_steps: args.max_steps,
        verbose: args.verbose,
        ..Default::default()
    };

    info!(runs = configs.len(), output = %args.output.display(), "Starting batch");
    let outcomes = run_batch(&configs, &options);

    for outcome in &outcomes {
        if let Ok(result) = &outcome.result {
            let path = write_solution(&result.solution, &outcome.name, &args.output)
                .with_context(|| format!("writing solution of {}", outcome.name))?;
            info!(
                name = %outcome.name,
                path = %path.display(),
                steps = result.n_steps,
                wall_time = result.wall_time,
                "Solution written"
            );
        }
    }

    let failures = count_failures(&outcomes);
    if failures > 0 {
        error!(failed = failures, total = outcomes.len(), "Batch finished with failures");
        return Ok(ExitCode::FAILURE);
    }
    info!(total = outcomes.len(), "Batch finished");
    Ok(ExitCode::SUCCESS)
}

fn validate(args: InputArgs) -> anyhow::Result<ExitCode> {
    let configs = load_configs(&args)?;
    let mut invalid = 0;
    for cfg in &configs {
        match cfg.validate() {
            Ok(()) => info!(name = %cfg.name, "Configuration valid"),
            Err(err) => {
                error!(name = %cfg.name, error = %err, "Configuration invalid");
                invalid += 1;
            }
        }
    }
    Ok(if invalid > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// Non-dimensional configurations named by `args.input`.
fn load_configs(args: &InputArgs) -> anyhow::Result<Vec<Config>> {
    let paths = config_paths(&args.input)?;
    paths
        .iter()
        .map(|path| {
            let cfg = if args.dimensional {
                DimensionalParams::load(path).map(|params| params.to_config())
            } else {
                Config::load(path)
            };
            cfg.with_context(|| format!("loading {}", path.display()))
        })
        .collect()
}

fn config_paths(input: &Path) -> anyhow::Result<Vec<PathBuf>> {
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }
    if !input.is_dir() {
        bail!("{} is neither a file nor a directory", input.display());
    }
    let mut paths = Vec::new();
    for entry in fs::read_dir(input).with_context(|| format!("reading {}", input.display()))? {
        let path = entry?.path();
        let is_yaml = path
            .extension()
            .is_some_and(|ext| ext == "yml" || ext == "yaml");
        if path.is_file() && is_yaml {
            paths.push(path);
        }
    }
    paths.sort();
    if paths.is_empty() {
        bail!("no configurations found in {}", input.display());
    }
    Ok(paths)
}
