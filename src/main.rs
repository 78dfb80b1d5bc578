use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use econvote::{
    analysis::{correlation_summary, economic_trends, presidency_summary, TermSelection},
    config::PipelineConfig,
    output::read_csv,
    pipeline, ReconciledDataset,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Monthly US economic indicators joined with presidential terms"
)]
struct Cli {
    #[arg(short, long, default_value = "econvote.yaml")]
    config: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the dataset and write the configured outputs.
    Build,
    /// Indicator values month by month for one president.
    Trends {
        president: String,
        /// Comma-separated; defaults to GDP,CPI,UNRATE.
        #[arg(long, value_delimiter = ',')]
        indicators: Vec<String>,
        #[arg(long, default_value = "both")]
        term: TermSelection,
        /// Read this CSV instead of the configured output.
        #[arg(long)]
        data: Option<PathBuf>,
    },
    /// Pairwise correlation of every value column.
    Correlate {
        #[arg(long)]
        data: Option<PathBuf>,
    },
    /// Start/end changes and party hand-over for one president.
    Presidency {
        president: String,
        #[arg(long)]
        data: Option<PathBuf>,
    },
}

/// Prefer an explicit CSV, then the configured CSV output if it exists, and
/// only then rebuild from sources.
fn load_dataset(config: &Path, data: Option<PathBuf>) -> Result<ReconciledDataset> {
    if let Some(path) = data {
        return read_csv(&path).with_context(|| format!("reading {}", path.display()));
    }
    let cfg = PipelineConfig::load(config)
        .with_context(|| format!("loading config {}", config.display()))?;
    if let Some(path) = cfg.output.csv.as_ref().filter(|p| p.exists()) {
        return read_csv(path).with_context(|| format!("reading {}", path.display()));
    }
    info!("no dataset on disk; building from sources");
    Ok(pipeline::build_dataset(&cfg)?)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()))
    });
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Build => {
            let cfg = PipelineConfig::load(&cli.config)
                .with_context(|| format!("loading config {}", cli.config.display()))?;
            let dataset = pipeline::run(&cfg)?;
            info!(
                rows = dataset.len(),
                columns = dataset.columns.len(),
                "dataset built"
            );
        }
        Command::Trends {
            president,
            indicators,
            term,
            data,
        } => {
            let dataset = load_dataset(&cli.config, data)?;
            print_json(&economic_trends(&dataset, &president, &indicators, term)?)?;
        }
        Command::Correlate { data } => {
            let dataset = load_dataset(&cli.config, data)?;
            print_json(&correlation_summary(&dataset))?;
        }
        Command::Presidency { president, data } => {
            let dataset = load_dataset(&cli.config, data)?;
            let summary = presidency_summary(&dataset, &president)
                .with_context(|| format!("{president:?} does not appear in the dataset"))?;
            print_json(&summary)?;
        }
    }
    Ok(())
}
