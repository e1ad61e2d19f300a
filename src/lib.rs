pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command, MetricArgs, StoreCommand};

pub use adapters::{
    ChatCompletionsAdvisor, DisabledAdvisor, InMemoryRepository, JsonFileRepository, LayoutFile,
    StaticAdvisor,
};
pub use config::SlottingConfig;
pub use crate::core::{build_layout, compute_priority_and_zone, normalize, PriorityEngine, SlottingService};
pub use domain::model::{
    AdvisoryOutcome, LayoutReport, Metrics, OptimizeReport, Placement, SkuDraft, SkuItem,
    SkuUpdate, WarehouseLayout, ZoneBand,
};
pub use utils::error::{Result, SlottingError};
