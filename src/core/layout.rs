use crate::core::priority::round_to;
use crate::domain::model::{LayoutReport, Placement, SkuItem, WarehouseLayout, ZoneBand};
use std::collections::{BTreeMap, HashMap};

/// 每個 2x2 區塊放 4 個 SKU
pub const BLOCK_SIZE: usize = 4;

/// 區塊內的格位編號：左上、右上、左下、右下 => 1, 3, 2, 4（現場慣例）
pub const BLOCK_CELL_LABELS: [usize; BLOCK_SIZE] = [1, 3, 2, 4];

pub fn position_id(zone: &str, idx: usize) -> String {
    let block = idx / BLOCK_SIZE + 1;
    let cell = BLOCK_CELL_LABELS[idx % BLOCK_SIZE];
    format!("{}-{}-{}", zone, block, cell)
}

/// 分區內的連續網格
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneGrid {
    pub from_m: f64,
    pub band_width: f64,
    pub columns: usize,
    pub rows: usize,
    pub height_m: f64,
}

impl ZoneGrid {
    pub fn new(band: &ZoneBand, height_m: f64, cell_size_m: f64) -> Self {
        let band_width = band.width();
        Self {
            from_m: band.from_m,
            band_width,
            columns: cells_along(band_width, cell_size_m),
            rows: cells_along(height_m, cell_size_m),
            height_m,
        }
    }

    /// 第 idx 個 SKU 的格位中心座標（四捨五入到小數點後兩位）
    pub fn cell_center(&self, idx: usize) -> (f64, f64) {
        let column = idx % self.columns;
        let row = idx / self.columns;
        let x = self.from_m + (column as f64 + 0.5) * (self.band_width / self.columns as f64);
        let y = (row as f64 + 0.5) * (self.height_m / self.rows as f64);
        (round_to(x, 2), round_to(y, 2))
    }
}

fn cells_along(length_m: f64, cell_size_m: f64) -> usize {
    let cells = (length_m / cell_size_m).floor();
    if cells.is_finite() && cells >= 1.0 {
        cells as usize
    } else {
        1
    }
}

/// 決定 SKU 實際落在哪個分區：覆寫 -> 原分區 -> 略過
fn resolve_zone<'a>(
    layout: &'a WarehouseLayout,
    item: &SkuItem,
    overrides: Option<&HashMap<String, String>>,
) -> Option<&'a ZoneBand> {
    overrides
        .and_then(|map| map.get(&item.sku_code))
        .and_then(|label| layout.find_zone(label))
        .or_else(|| layout.find_zone(item.zone()))
}

/// 將已排序的 SKU 配置到倉庫平面上
///
/// `items` 必須已依優先度排序；每個分區內保持輸入順序。
/// 無法解析分區的 SKU 不會出現在結果與計數中。
pub fn build_layout(
    layout: &WarehouseLayout,
    items: &[SkuItem],
    overrides: Option<&HashMap<String, String>>,
) -> LayoutReport {
    let mut buckets: Vec<Vec<&SkuItem>> = vec![Vec::new(); layout.zones.len()];

    for item in items {
        match resolve_zone(layout, item, overrides) {
            Some(zone) => {
                if let Some(slot) = layout.zones.iter().position(|z| z.id == zone.id) {
                    buckets[slot].push(item);
                }
            }
            None => {
                tracing::debug!(
                    "Skipping {}: zone '{}' is not part of the layout",
                    item.sku_code,
                    item.zone()
                );
            }
        }
    }

    let mut placements = Vec::new();
    let mut counts = BTreeMap::new();

    for (zone, bucket) in layout.zones.iter().zip(&buckets) {
        let grid = ZoneGrid::new(zone, layout.height_m, layout.cell_size_m);

        for (idx, item) in bucket.iter().enumerate() {
            let (x_m, y_m) = grid.cell_center(idx);
            placements.push(Placement {
                sku_code: item.sku_code.clone(),
                product_name: item.product_name.clone(),
                priority: item.priority(),
                zone: zone.id.clone(),
                position_id: position_id(&zone.id, idx),
                x_m,
                y_m,
            });
        }

        counts.insert(zone.id.clone(), bucket.len());
    }

    tracing::debug!(
        "Built layout with {} placements across {} zones",
        placements.len(),
        layout.zones.len()
    );

    LayoutReport {
        warehouse: layout.clone(),
        placements,
        counts,
    }
}
