pub mod layout;
pub mod priority;
pub mod service;

pub use crate::domain::model::{LayoutReport, Placement, Score, SkuItem, WarehouseLayout};
pub use crate::domain::ports::{ItemRepository, LayoutSource, ZoneAdvisor};
pub use crate::utils::error::Result;
pub use layout::build_layout;
pub use priority::{compute_priority_and_zone, normalize, PriorityEngine};
pub use service::SlottingService;
