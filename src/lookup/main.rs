//! Command-line coverage lookups against a local site dataset.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use netcover::config::Config;
use netcover::geocoder::BanGeocoder;
use netcover::operators;
use netcover::{coverage_for_address, CoverageResolver, DatasetStore, GlobalPoint, PlanarPoint};

#[derive(Parser, Debug)]
#[command(name = "lookup")]
#[command(about = "Resolve mobile network coverage from the command line")]
struct Args {
    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Site dataset CSV (overrides config)
    #[arg(short, long)]
    dataset: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Coverage at WGS84 coordinates
    Point {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
    },
    /// Coverage at Lambert-93 coordinates
    Planar {
        #[arg(long)]
        x: f64,
        #[arg(long)]
        y: f64,
    },
    /// Geocode an address, then resolve its coverage
    Address { text: String },
    /// Print the dataset validation report
    Stats,
}

#[derive(Serialize)]
struct StatsOutput<'a> {
    source: String,
    sites: usize,
    loaded_at: chrono::DateTime<chrono::Utc>,
    validation: &'a netcover::dataset::ValidationReport,
    operators: Vec<OperatorSites>,
}

#[derive(Serialize)]
struct OperatorSites {
    code: Option<i64>,
    name: &'static str,
    sites: usize,
}

/// Site counts per catalog operator, plus one bucket for unknown codes
fn operator_sites(records: &[netcover::SiteRecord]) -> Vec<OperatorSites> {
    let mut counts: Vec<OperatorSites> = operators::all()
        .iter()
        .map(|(code, name)| OperatorSites {
            code: Some(*code),
            name: *name,
            sites: records.iter().filter(|r| r.operator_code == *code).count(),
        })
        .collect();

    let known: usize = counts.iter().map(|o| o.sites).sum();
    counts.push(OperatorSites {
        code: None,
        name: operators::UNKNOWN_OPERATOR,
        sites: records.len() - known,
    });
    counts
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays pure JSON
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_from_file(path)?,
        None => Config::default(),
    };
    if let Some(dataset) = args.dataset {
        config.dataset.path = dataset;
    }

    let store = DatasetStore::open(&config.dataset.path).with_context(|| {
        format!(
            "Failed to load site dataset {}",
            config.dataset.path.display()
        )
    })?;
    let resolver = CoverageResolver::new(Arc::new(store), config.dataset.aggregation);

    let output = match args.command {
        Command::Point { lat, lon } => {
            let point = GlobalPoint::new(lon, lat)?;
            serde_json::to_string_pretty(&resolver.resolve(point)?)?
        }
        Command::Planar { x, y } => {
            serde_json::to_string_pretty(&resolver.resolve_planar(PlanarPoint::new(x, y))?)?
        }
        Command::Address { text } => {
            let geocoder = BanGeocoder::new(&config.geocoder)?;
            let coverage = coverage_for_address(&geocoder, &resolver, &text).await?;
            serde_json::to_string_pretty(&coverage)?
        }
        Command::Stats => {
            let dataset = resolver.store().snapshot();
            info!("Dataset has {} sites", dataset.len());
            serde_json::to_string_pretty(&StatsOutput {
                source: resolver.store().path().display().to_string(),
                sites: dataset.len(),
                loaded_at: dataset.loaded_at(),
                validation: dataset.report(),
                operators: operator_sites(dataset.records()),
            })?
        }
    };

    println!("{}", output);
    Ok(())
}
