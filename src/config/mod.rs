pub mod toml_config;

pub use toml_config::SlottingConfig;

#[cfg(feature = "cli")]
use clap::{Args, Parser, Subcommand};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "smart-slotting")]
#[command(about = "Assign warehouse zones to SKUs and lay them out on the floor plan")]
pub struct CliConfig {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "slotting.toml")]
    pub config: String,

    /// Override the SKU data file from the configuration
    #[arg(long)]
    pub data: Option<String>,

    /// Read the warehouse layout from a JSON file instead of the configuration
    #[arg(long)]
    pub layout: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Compute priority and zone without storing anything
    Score(MetricArgs),
    #[command(flatten)]
    Store(StoreCommand),
}

/// 需要讀寫 SKU 資料檔的子命令
#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum StoreCommand {
    /// Add a new SKU
    Add {
        #[arg(long)]
        sku: String,
        #[arg(long)]
        name: Option<String>,
        #[command(flatten)]
        metrics: MetricArgs,
    },
    /// Replace the name and metrics of an existing SKU
    Update {
        #[arg(long)]
        sku: String,
        #[arg(long)]
        name: Option<String>,
        #[command(flatten)]
        metrics: MetricArgs,
    },
    /// Delete a SKU
    Delete {
        #[arg(long)]
        sku: String,
    },
    /// List SKUs ranked by priority
    List,
    /// Print the floor layout for the stored SKUs
    Layout,
    /// Ask the advisor for zone reassignments and print the resulting layout
    Optimize {
        #[arg(long)]
        instructions: Option<String>,
    },
    /// Delete every stored SKU
    Clear,
    /// Recompute priority and zone of every SKU with the current configuration
    Rescore,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Copy, Args)]
pub struct MetricArgs {
    #[arg(short, long, allow_negative_numbers = true)]
    pub f: f64,
    #[arg(short, long, allow_negative_numbers = true)]
    pub w: f64,
    #[arg(short, long, allow_negative_numbers = true)]
    pub s: f64,
    #[arg(short, long, allow_negative_numbers = true)]
    pub i: f64,
    /// Values are raw measurements; normalize them with the configured scales
    #[arg(long)]
    pub raw: bool,
}
