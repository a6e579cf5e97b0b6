use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "ecolens", version, about = "Sustainability scoring for product text")]
pub struct Cli {
    /// Log debug output to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Score a single product file (YAML or JSON)
    Score {
        product: PathBuf,

        #[command(flatten)]
        weights: WeightArgs,

        /// Runtime config file with enrichment settings
        #[arg(long)]
        config: Option<PathBuf>,

        /// Enable enrichment even if the config leaves it off
        #[arg(long)]
        enrich: bool,

        /// Certification already checked against its registry (repeatable)
        #[arg(long = "verified", value_name = "CERT")]
        verified: Vec<String>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Summary)]
        format: OutputFormat,
    },

    /// Score an order history (heuristics only)
    Batch {
        orders: PathBuf,

        #[command(flatten)]
        weights: WeightArgs,

        #[arg(long, value_enum, default_value_t = BatchFormat::Summary)]
        format: BatchFormat,
    },

    /// Print the normalized weights that would be used
    Weights {
        #[command(flatten)]
        weights: WeightArgs,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct WeightArgs {
    /// Weight file (YAML or JSON map of metric key to weight)
    #[arg(long, conflicts_with = "preset")]
    pub weights: Option<PathBuf>,

    /// Named preset: balanced, climate-first, low-toxicity, ethical-labor
    #[arg(long)]
    pub preset: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
    Summary,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum BatchFormat {
    Json,
    Summary,
}
