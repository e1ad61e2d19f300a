use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

/// F/W/S/I 四個指標，儲存時皆已正規化到 [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Metrics {
    pub f: f64,
    pub w: f64,
    pub s: f64,
    pub i: f64,
}

impl Metrics {
    pub fn new(f: f64, w: f64, s: f64, i: f64) -> Self {
        Self { f, w, s, i }
    }

    pub fn named(&self) -> [(&'static str, f64); 4] {
        [("f", self.f), ("w", self.w), ("s", self.s), ("i", self.i)]
    }
}

/// 優先度與分區永遠一起計算、一起替換
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub priority: f64,
    pub zone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkuItem {
    pub sku_code: String,
    pub product_name: Option<String>,
    #[serde(flatten)]
    pub metrics: Metrics,
    #[serde(flatten)]
    pub score: Score,
    pub seq: u64,
    pub created_at: DateTime<Utc>,
}

impl SkuItem {
    pub fn priority(&self) -> f64 {
        self.score.priority
    }

    pub fn zone(&self) -> &str {
        &self.score.zone
    }

    /// 排序規則：優先度由高到低，同分時依建立順序
    pub fn rank_cmp(a: &SkuItem, b: &SkuItem) -> Ordering {
        b.score
            .priority
            .total_cmp(&a.score.priority)
            .then_with(|| a.seq.cmp(&b.seq))
    }
}

/// 新增 SKU 的輸入
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkuDraft {
    pub sku_code: String,
    pub product_name: Option<String>,
    #[serde(flatten)]
    pub metrics: Metrics,
}

/// 可修改的欄位；sku_code 建立後不可變
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkuUpdate {
    pub product_name: Option<String>,
    #[serde(flatten)]
    pub metrics: Metrics,
}

/// Repository 收到的完整紀錄（已計分）
#[derive(Debug, Clone, PartialEq)]
pub struct NewSkuItem {
    pub sku_code: String,
    pub product_name: Option<String>,
    pub metrics: Metrics,
    pub score: Score,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkuRevision {
    pub product_name: Option<String>,
    pub metrics: Metrics,
    pub score: Score,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneBand {
    pub id: String,
    pub from_m: f64,
    pub to_m: f64,
}

impl ZoneBand {
    pub fn new(id: &str, from_m: f64, to_m: f64) -> Self {
        Self {
            id: id.to_string(),
            from_m,
            to_m,
        }
    }

    pub fn width(&self) -> f64 {
        self.to_m - self.from_m
    }
}

/// 貨架規格，只透傳給繪圖端使用
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RackSpec {
    pub length_m: f64,
    pub width_m: f64,
    pub levels: u32,
    pub cluster_size: u32,
    pub aisle_m: f64,
}

impl Default for RackSpec {
    fn default() -> Self {
        Self {
            length_m: 3.6,
            width_m: 3.0,
            levels: 7,
            cluster_size: 3,
            aisle_m: 4.0,
        }
    }
}

pub const DEFAULT_CELL_SIZE_M: f64 = 4.0;

fn default_cell_size() -> f64 {
    DEFAULT_CELL_SIZE_M
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarehouseLayout {
    pub width_m: f64,
    pub height_m: f64,
    #[serde(default = "default_cell_size")]
    pub cell_size_m: f64,
    pub zones: Vec<ZoneBand>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rack: Option<RackSpec>,
}

impl WarehouseLayout {
    /// 依名稱找分區（忽略大小寫與前後空白）
    pub fn find_zone(&self, label: &str) -> Option<&ZoneBand> {
        let label = label.trim();
        if label.is_empty() {
            return None;
        }
        self.zones
            .iter()
            .find(|zone| zone.id.eq_ignore_ascii_case(label))
    }

    pub fn zone_ids(&self) -> Vec<&str> {
        self.zones.iter().map(|zone| zone.id.as_str()).collect()
    }
}

impl Default for WarehouseLayout {
    fn default() -> Self {
        Self {
            width_m: 100.0,
            height_m: 50.0,
            cell_size_m: DEFAULT_CELL_SIZE_M,
            zones: vec![
                ZoneBand::new("A", 0.0, 25.0),
                ZoneBand::new("B", 25.0, 50.0),
                ZoneBand::new("C", 50.0, 75.0),
                ZoneBand::new("D", 75.0, 100.0),
            ],
            rack: Some(RackSpec::default()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub sku_code: String,
    pub product_name: Option<String>,
    pub priority: f64,
    pub zone: String,
    pub position_id: String,
    pub x_m: f64,
    pub y_m: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutReport {
    pub warehouse: WarehouseLayout,
    pub placements: Vec<Placement>,
    pub counts: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reassignment {
    pub sku_code: String,
    pub recommended_zone: String,
    pub confidence: f64,
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisoryPlan {
    pub summary: String,
    pub reassignments: Vec<Reassignment>,
}

/// 顧問服務的結果：成功給出計畫，或降級（不覆寫任何分區）
#[derive(Debug, Clone, PartialEq)]
pub enum AdvisoryOutcome {
    Plan(AdvisoryPlan),
    Degraded { reason: String },
}

impl AdvisoryOutcome {
    pub fn degraded(reason: impl Into<String>) -> Self {
        AdvisoryOutcome::Degraded {
            reason: reason.into(),
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, AdvisoryOutcome::Degraded { .. })
    }

    pub fn summary(&self) -> &str {
        match self {
            AdvisoryOutcome::Plan(plan) => &plan.summary,
            AdvisoryOutcome::Degraded { reason } => reason,
        }
    }

    pub fn reassignments(&self) -> &[Reassignment] {
        match self {
            AdvisoryOutcome::Plan(plan) => &plan.reassignments,
            AdvisoryOutcome::Degraded { .. } => &[],
        }
    }

    /// 轉成 sku_code -> zone 的覆寫表；同一 SKU 出現多次時以最後一筆為準
    pub fn overrides(&self) -> HashMap<String, String> {
        self.reassignments()
            .iter()
            .filter(|entry| !entry.recommended_zone.trim().is_empty())
            .map(|entry| (entry.sku_code.clone(), entry.recommended_zone.clone()))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizeReport {
    #[serde(flatten)]
    pub layout: LayoutReport,
    pub assistant_summary: String,
    pub assistant_reassignments: Vec<Reassignment>,
    pub degraded: bool,
}
