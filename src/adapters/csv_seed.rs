use crate::core::priority::MetricScales;
use crate::core::service::SlottingService;
use crate::domain::model::{Metrics, SkuDraft};
use crate::domain::ports::{ItemRepository, LayoutSource, ZoneAdvisor};
use crate::utils::error::{Result, SlottingError};
use serde::Deserialize;
use std::io::Read;

/// CSV 欄位：sku_code,product_name,f,w,s,i（原始量測值）
#[derive(Debug, Deserialize)]
pub struct SeedRow {
    pub sku_code: String,
    pub product_name: Option<String>,
    pub f: f64,
    pub w: f64,
    pub s: f64,
    pub i: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub added: usize,
    pub duplicates: usize,
    pub invalid: usize,
}

/// 逐列正規化後新增 SKU
///
/// 重複的代碼與格式錯誤或超出範圍的列只計數並略過；
/// 讀取失敗與儲存失敗則直接回傳錯誤。
pub async fn seed_from_csv<S, R, L, A>(
    service: &SlottingService<R, L, A>,
    scales: &MetricScales,
    source: S,
) -> Result<SeedSummary>
where
    S: Read,
    R: ItemRepository,
    L: LayoutSource,
    A: ZoneAdvisor,
{
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(source);

    let mut summary = SeedSummary::default();
    for (line, row) in reader.deserialize::<SeedRow>().enumerate() {
        let row = match row {
            Ok(row) => row,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                tracing::warn!("⚠️ Skipping CSV record {}: {}", line + 1, e);
                summary.invalid += 1;
                continue;
            }
        };

        let draft = SkuDraft {
            sku_code: row.sku_code.clone(),
            product_name: row.product_name,
            metrics: scales.normalize(Metrics::new(row.f, row.w, row.s, row.i)),
        };

        match service.add_item(draft).await {
            Ok(item) => {
                tracing::info!(
                    "✅ {} -> priority {:.4}, zone {}",
                    item.sku_code,
                    item.priority(),
                    item.zone()
                );
                summary.added += 1;
            }
            Err(SlottingError::DuplicateKey { sku_code }) => {
                tracing::warn!("⏭️ {} already exists, skipping", sku_code);
                summary.duplicates += 1;
            }
            Err(e @ SlottingError::ValidationError { .. }) => {
                tracing::warn!("⚠️ {} rejected: {}", row.sku_code, e);
                summary.invalid += 1;
            }
            Err(e) => return Err(e),
        }
    }

    tracing::info!(
        "📋 Seeded {} SKUs ({} duplicates, {} invalid)",
        summary.added,
        summary.duplicates,
        summary.invalid
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{DisabledAdvisor, InMemoryRepository};
    use crate::domain::model::WarehouseLayout;

    fn service() -> SlottingService<InMemoryRepository, WarehouseLayout, DisabledAdvisor> {
        SlottingService::new(
            InMemoryRepository::new(),
            WarehouseLayout::default(),
            DisabledAdvisor,
        )
    }

    #[tokio::test]
    async fn test_seed_sorts_rows_into_added_duplicate_invalid() {
        let csv = "\
sku_code,product_name,f,w,s,i
SKU01, Power Bank ,180,1,300,18
SKU02,,40,5,1000,4
SKU01,Power Bank again,10,1,10,1
SKU03,Broken,fast,1,1,1
,Nameless,10,1,10,1
SKU04,Negative,-5,1,10,1
";
        let service = service();
        let summary = seed_from_csv(&service, &MetricScales::default(), csv.as_bytes())
            .await
            .unwrap();

        assert_eq!(
            summary,
            SeedSummary {
                added: 2,
                duplicates: 1,
                invalid: 3,
            }
        );

        let items = service.list_items().await.unwrap();
        let codes: Vec<&str> = items.iter().map(|i| i.sku_code.as_str()).collect();
        assert_eq!(codes, vec!["SKU01", "SKU02"]);

        // raw values normalized with the default scales, first row wins
        assert_eq!(items[0].metrics, Metrics::new(0.9, 1.0, 0.006, 0.9));
        assert_eq!(items[0].product_name.as_deref(), Some("Power Bank"));
        assert_eq!(items[1].product_name, None);
    }

    #[tokio::test]
    async fn test_seed_twice_counts_everything_as_duplicate() {
        let csv = "sku_code,product_name,f,w,s,i\nA1,Item,100,10,100,10\nB2,Item,1,1,1,1\n";
        let service = service();
        let scales = MetricScales::default();

        let first = seed_from_csv(&service, &scales, csv.as_bytes()).await.unwrap();
        assert_eq!(first.added, 2);

        let second = seed_from_csv(&service, &scales, csv.as_bytes()).await.unwrap();
        assert_eq!(
            second,
            SeedSummary {
                added: 0,
                duplicates: 2,
                invalid: 0,
            }
        );
    }
}
