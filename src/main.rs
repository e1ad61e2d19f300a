use clap::Parser;
use serde::Serialize;
use smart_slotting::core::priority::MetricScales;
use smart_slotting::domain::ports::{LayoutSource, ZoneAdvisor};
use smart_slotting::utils::error::{ErrorSeverity, Result};
use smart_slotting::utils::{logger, validation::Validate};
use smart_slotting::{
    ChatCompletionsAdvisor, CliConfig, Command, DisabledAdvisor, JsonFileRepository, LayoutFile,
    MetricArgs, Metrics, PriorityEngine, SkuDraft, SkuUpdate, SlottingConfig, SlottingService,
    StoreCommand,
};

type CliService = SlottingService<JsonFileRepository, Box<dyn LayoutSource>, Box<dyn ZoneAdvisor>>;

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting smart-slotting CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    // 載入並驗證配置
    let config = match SlottingConfig::load_or_default(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", cli.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    if let Err(e) = run(&cli, config).await {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        // 根據錯誤嚴重程度決定退出碼
        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };

        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }
}

async fn run(cli: &CliConfig, config: SlottingConfig) -> Result<()> {
    let engine = config.priority_engine()?;
    let scales = config.normalization;

    let command = match &cli.command {
        Command::Score(args) => {
            let metrics = resolve_metrics(&scales, args);
            let score = engine.score(&metrics)?;
            return print_json(&serde_json::json!({
                "metrics": metrics,
                "priority": score.priority,
                "zone": score.zone,
            }));
        }
        Command::Store(command) => command,
    };

    let service = build_service(cli, config, engine).await?;

    match command {
        StoreCommand::Add { sku, name, metrics } => {
            let metrics = resolve_metrics(&scales, metrics);
            let item = service
                .add_item(SkuDraft {
                    sku_code: sku.clone(),
                    product_name: name.clone(),
                    metrics,
                })
                .await?;
            print_json(&item)
        }
        StoreCommand::Update { sku, name, metrics } => {
            let metrics = resolve_metrics(&scales, metrics);
            let item = service
                .update_item(
                    sku,
                    SkuUpdate {
                        product_name: name.clone(),
                        metrics,
                    },
                )
                .await?;
            print_json(&item)
        }
        StoreCommand::Delete { sku } => {
            service.delete_item(sku).await?;
            print_json(&serde_json::json!({"status": "ok", "detail": "deleted"}))
        }
        StoreCommand::List => print_json(&service.list_items().await?),
        StoreCommand::Layout => print_json(&service.visualize().await?),
        StoreCommand::Optimize { instructions } => {
            let report = service.optimize(instructions.as_deref()).await?;
            print_json(&report)
        }
        StoreCommand::Clear => {
            let removed = service.clear_items().await?;
            print_json(&serde_json::json!({"status": "ok", "removed": removed}))
        }
        StoreCommand::Rescore => {
            let changed = service.rescore_all().await?;
            print_json(&serde_json::json!({"status": "ok", "changed": changed}))
        }
    }
}

async fn build_service(
    cli: &CliConfig,
    config: SlottingConfig,
    engine: PriorityEngine,
) -> Result<CliService> {
    let data_path = cli
        .data
        .clone()
        .unwrap_or_else(|| config.storage_path().to_string());
    let repository = JsonFileRepository::open(&data_path).await?;
    tracing::debug!("Using SKU data file {}", data_path);

    let advisor: Box<dyn ZoneAdvisor> = if config.advisor_enabled() {
        Box::new(ChatCompletionsAdvisor::new(config.advisor_settings())?)
    } else {
        tracing::info!("Advisor disabled by configuration");
        Box::new(DisabledAdvisor)
    };

    let layout: Box<dyn LayoutSource> = match &cli.layout {
        Some(path) => {
            tracing::info!("📁 Loading warehouse layout from {}", path);
            let layout_file = LayoutFile::new(path);
            // 分區門檻同樣要對應到檔案中的分區
            engine.check_layout(&layout_file.load_layout()?)?;
            Box::new(layout_file)
        }
        None => Box::new(config),
    };

    let service = SlottingService::with_engine(repository, layout, advisor, engine);
    Ok(service)
}

/// --raw 時以設定的尺度正規化，否則視為已正規化的值
fn resolve_metrics(scales: &MetricScales, args: &MetricArgs) -> Metrics {
    let metrics = Metrics::new(args.f, args.w, args.s, args.i);
    if args.raw {
        scales.normalize(metrics)
    } else {
        metrics
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
