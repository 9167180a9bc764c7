mod files;
mod pipeline;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use printcost_core::BillingConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::pipeline::Settings;

const DEFAULT_PRICE_FILE: &str = "material_prices.txt";

#[derive(Parser, Debug)]
#[command(author, version, about = "Print log normalizer and job cost calculator", long_about = None)]
struct Cli {
    /// Directory holding job exports (defaults to PRINTCOST_INPUT_DIR or the current directory)
    #[arg(long, global = true)]
    input_dir: Option<PathBuf>,
    /// Directory receiving datasets and the cost table (defaults to the input directory)
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,
    /// TOML file overriding billing settings (defaults to PRINTCOST_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Normalize job exports into the per-printer datasets
    Normalize(NormalizeArgs),
    /// Compute per-job costs from the datasets and a price table
    Cost(CostArgs),
    /// Normalize, then compute costs
    Run(RunArgs),
}

#[derive(Args, Debug, Default)]
struct NormalizeArgs {
    /// Rebuild datasets from scratch instead of appending to them
    #[arg(long)]
    fresh: bool,
}

#[derive(Args, Debug, Default)]
struct CostArgs {
    /// Material price table (defaults to PRINTCOST_PRICE_FILE or material_prices.txt in the input directory)
    #[arg(long)]
    price_file: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
struct RunArgs {
    #[command(flatten)]
    normalize: NormalizeArgs,
    #[command(flatten)]
    cost: CostArgs,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    let cli = Cli::parse();
    let settings = resolve_settings(&cli)?;

    match cli.command {
        Command::Normalize(args) => run_normalize(&settings, &args),
        Command::Cost(args) => run_cost(&settings, &args),
        Command::Run(args) => {
            run_normalize(&settings, &args.normalize)?;
            run_cost(&settings, &args.cost)
        }
    }
}

fn resolve_settings(cli: &Cli) -> Result<Settings> {
    let input_dir = cli
        .input_dir
        .clone()
        .or_else(|| env_path("PRINTCOST_INPUT_DIR"))
        .unwrap_or_else(|| PathBuf::from("."));
    let output_dir = cli.output_dir.clone().unwrap_or_else(|| input_dir.clone());

    let config = match cli.config.clone().or_else(|| env_path("PRINTCOST_CONFIG")) {
        Some(path) => BillingConfig::load(&path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => BillingConfig::default(),
    };

    Ok(Settings {
        input_dir,
        output_dir,
        config,
    })
}

fn env_path(key: &str) -> Option<PathBuf> {
    std::env::var_os(key)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

fn run_normalize(settings: &Settings, args: &NormalizeArgs) -> Result<()> {
    let summary = pipeline::normalize(settings, args.fresh)?;
    info!(
        normalized = summary.normalized,
        duplicates = summary.duplicates,
        skipped = summary.skipped,
        f370_rows = summary.f370_rows,
        j826_rows = summary.j826_rows,
        "Normalization complete"
    );
    Ok(())
}

fn run_cost(settings: &Settings, args: &CostArgs) -> Result<()> {
    let price_file = price_file(&settings.input_dir, args);
    let results = pipeline::cost(settings, &price_file)?;
    println!("{}", pipeline::cost_table(&results));
    Ok(())
}

fn price_file(input_dir: &Path, args: &CostArgs) -> PathBuf {
    args.price_file
        .clone()
        .or_else(|| env_path("PRINTCOST_PRICE_FILE"))
        .unwrap_or_else(|| input_dir.join(DEFAULT_PRICE_FILE))
}
