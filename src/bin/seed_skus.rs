use anyhow::Context;
use clap::Parser;
use smart_slotting::adapters::seed_from_csv;
use smart_slotting::utils::{logger, validation::Validate};
use smart_slotting::{DisabledAdvisor, JsonFileRepository, SlottingConfig, SlottingService};

#[derive(Parser)]
#[command(name = "seed-skus")]
#[command(about = "Bulk-load SKUs from a CSV file of raw measurements")]
struct Args {
    /// CSV file with columns sku_code,product_name,f,w,s,i
    #[arg(long)]
    csv: String,

    /// Path to TOML configuration file
    #[arg(short, long, default_value = "slotting.toml")]
    config: String,

    /// Override the SKU data file from the configuration
    #[arg(long)]
    data: Option<String>,

    /// Delete every stored SKU before seeding
    #[arg(long)]
    reset: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    tracing::info!("🚀 Seeding SKUs from {}", args.csv);

    let config = SlottingConfig::load_or_default(&args.config)
        .with_context(|| format!("failed to load config file '{}'", args.config))?;
    config.validate().context("configuration validation failed")?;

    let data_path = args
        .data
        .clone()
        .unwrap_or_else(|| config.storage_path().to_string());
    let repository = JsonFileRepository::open(&data_path)
        .await
        .with_context(|| format!("failed to open data file '{}'", data_path))?;

    let service = SlottingService::with_engine(
        repository,
        config.clone(),
        DisabledAdvisor,
        config.priority_engine()?,
    );

    if args.reset {
        let removed = service.clear_items().await?;
        tracing::info!("🧹 Reset removed {} existing SKUs", removed);
    }

    let file = std::fs::File::open(&args.csv)
        .with_context(|| format!("failed to open CSV file '{}'", args.csv))?;
    let summary = seed_from_csv(&service, &config.normalization, file).await?;

    println!();
    println!("📋 Seed Summary:");
    println!("  Added: {}", summary.added);
    println!("  Duplicates skipped: {}", summary.duplicates);
    println!("  Invalid rows skipped: {}", summary.invalid);
    println!("  Data file: {}", data_path);

    Ok(())
}
