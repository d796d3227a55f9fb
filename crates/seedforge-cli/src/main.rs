//! seedforge - command line seed planner
//!
//! Usage: seedforge [--config seedforge.toml] <command>

mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use seedforge::PlannerConfig;

/// Default configuration file, read when present.
const DEFAULT_CONFIG: &str = "seedforge.toml";

#[derive(Parser)]
#[command(name = "seedforge")]
#[command(about = "Cluster stores, plan seed assortments, validate and export them")]
#[command(version)]
struct Cli {
    /// Planner configuration (TOML or YAML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Suppress the console banner and event log (written to stderr)
    #[arg(long, short, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct StoreArgs {
    /// Store CSV with a store_id column and numeric features
    #[arg(long)]
    stores: PathBuf,

    /// Features to cluster on (defaults to the configured list)
    #[arg(long, value_delimiter = ',')]
    features: Vec<String>,

    /// Cluster count; chosen automatically when omitted
    #[arg(long)]
    k: Option<usize>,
}

#[derive(Args)]
struct PlanArgs {
    /// Total budget shared by all stores
    #[arg(long)]
    budget: f64,

    /// Maximum distinct SKUs per store
    #[arg(long, default_value = "5")]
    max_skus_per_store: usize,
}

#[derive(Subcommand)]
enum Command {
    /// Cluster stores and print the assignment as JSON
    Cluster {
        #[command(flatten)]
        stores: StoreArgs,
    },

    /// Allocate SKUs over a cluster assignment
    Generate {
        /// SKU catalog CSV
        #[arg(long)]
        skus: PathBuf,
        /// Cluster result JSON, as printed by `cluster`
        #[arg(long)]
        clusters: PathBuf,
        #[command(flatten)]
        plan: PlanArgs,
        /// Forecast CSV (sku_id, predicted_demand, confidence)
        #[arg(long)]
        forecast: Option<PathBuf>,
    },

    /// Validate allocation lines
    Validate {
        /// Lines JSON, as printed by `generate`
        #[arg(long)]
        lines: PathBuf,
        #[command(flatten)]
        plan: PlanArgs,
        /// Per-store capacity CSV (store_id, capacity)
        #[arg(long)]
        capacity: Option<PathBuf>,
    },

    /// Run cluster, generate, validate and export in one go
    Auto {
        #[command(flatten)]
        stores: StoreArgs,
        /// SKU catalog CSV
        #[arg(long)]
        skus: PathBuf,
        #[command(flatten)]
        plan: PlanArgs,
        #[arg(long)]
        forecast: Option<PathBuf>,
        #[arg(long)]
        capacity: Option<PathBuf>,
        /// Export file prefix (defaults to the configured identifier)
        #[arg(long)]
        identifier: Option<String>,
    },

    /// Publish allocation lines as a named plan
    Publish {
        #[arg(long)]
        name: String,
        #[arg(long)]
        lines: PathBuf,
    },

    /// Export a published plan to CSV
    Export {
        #[arg(long)]
        plan_id: String,
    },
}

fn load_config(path: Option<&PathBuf>) -> Result<PlannerConfig> {
    match path {
        Some(path) => PlannerConfig::from_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display())),
        None => Ok(PlannerConfig::load(DEFAULT_CONFIG).unwrap_or_default()),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;

    if !cli.quiet {
        seedforge::console::init();
    }

    match cli.command {
        Command::Cluster { stores } => commands::cluster(&config, stores),
        Command::Generate {
            skus,
            clusters,
            plan,
            forecast,
        } => commands::generate(&config, &skus, &clusters, plan, forecast.as_deref()),
        Command::Validate {
            lines,
            plan,
            capacity,
        } => commands::validate(&config, &lines, plan, capacity.as_deref()),
        Command::Auto {
            stores,
            skus,
            plan,
            forecast,
            capacity,
            identifier,
        } => commands::auto(
            &config,
            stores,
            &skus,
            plan,
            forecast.as_deref(),
            capacity.as_deref(),
            identifier,
        ),
        Command::Publish { name, lines } => commands::publish(&config, &name, &lines),
        Command::Export { plan_id } => commands::export(&config, &plan_id),
    }
}
