use crate::core::layout::build_layout;
use crate::core::priority::PriorityEngine;
use crate::domain::model::{
    LayoutReport, Metrics, NewSkuItem, OptimizeReport, Reassignment, SkuDraft, SkuItem,
    SkuRevision, SkuUpdate, WarehouseLayout,
};
use crate::domain::ports::{ItemRepository, LayoutSource, ZoneAdvisor};
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_max_length, validate_non_empty_string, validate_unit_interval,
};
use std::collections::HashMap;

pub const MAX_SKU_CODE_CHARS: usize = 64;
pub const MAX_PRODUCT_NAME_CHARS: usize = 200;
pub const MAX_INSTRUCTIONS_CHARS: usize = 600;

/// SKU 維護、視覺化與最佳化的進入點
pub struct SlottingService<R: ItemRepository, L: LayoutSource, A: ZoneAdvisor> {
    repository: R,
    layout: L,
    advisor: A,
    engine: PriorityEngine,
}

impl<R: ItemRepository, L: LayoutSource, A: ZoneAdvisor> SlottingService<R, L, A> {
    pub fn new(repository: R, layout: L, advisor: A) -> Self {
        Self::with_engine(repository, layout, advisor, PriorityEngine::default())
    }

    pub fn with_engine(repository: R, layout: L, advisor: A, engine: PriorityEngine) -> Self {
        Self {
            repository,
            layout,
            advisor,
            engine,
        }
    }

    pub fn engine(&self) -> &PriorityEngine {
        &self.engine
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub async fn add_item(&self, draft: SkuDraft) -> Result<SkuItem> {
        let sku_code = validate_sku_code(&draft.sku_code)?;
        let product_name = clean_product_name(draft.product_name)?;
        validate_metrics(&draft.metrics)?;

        let score = self.engine.score(&draft.metrics)?;
        let created = self
            .repository
            .create(NewSkuItem {
                sku_code,
                product_name,
                metrics: draft.metrics,
                score,
            })
            .await?;

        tracing::info!(
            "➕ Added {} (priority {:.4}, zone {})",
            created.sku_code,
            created.priority(),
            created.zone()
        );
        Ok(created)
    }

    pub async fn update_item(&self, sku_code: &str, update: SkuUpdate) -> Result<SkuItem> {
        let product_name = clean_product_name(update.product_name)?;
        validate_metrics(&update.metrics)?;

        let score = self.engine.score(&update.metrics)?;
        let updated = self
            .repository
            .update(
                sku_code.trim(),
                SkuRevision {
                    product_name,
                    metrics: update.metrics,
                    score,
                },
            )
            .await?;

        tracing::info!(
            "✏️ Updated {} (priority {:.4}, zone {})",
            updated.sku_code,
            updated.priority(),
            updated.zone()
        );
        Ok(updated)
    }

    pub async fn delete_item(&self, sku_code: &str) -> Result<()> {
        self.repository.delete(sku_code.trim()).await?;
        tracing::info!("🗑️ Deleted {}", sku_code.trim());
        Ok(())
    }

    pub async fn list_items(&self) -> Result<Vec<SkuItem>> {
        self.repository.list_ranked().await
    }

    pub async fn clear_items(&self) -> Result<usize> {
        let removed = self.repository.clear().await?;
        tracing::info!("🧹 Removed {} SKUs", removed);
        Ok(removed)
    }

    /// 以目前的權重與門檻重新計算所有 SKU 的優先度與分區
    pub async fn rescore_all(&self) -> Result<usize> {
        let mut changed = 0;
        for item in self.repository.list_ranked().await? {
            let score = self.engine.score(&item.metrics)?;
            if score == item.score {
                continue;
            }

            tracing::debug!(
                "{}: {} ({:.4}) -> {} ({:.4})",
                item.sku_code,
                item.zone(),
                item.priority(),
                score.zone,
                score.priority
            );
            self.repository
                .update(
                    &item.sku_code,
                    SkuRevision {
                        product_name: item.product_name,
                        metrics: item.metrics,
                        score,
                    },
                )
                .await?;
            changed += 1;
        }

        tracing::info!("🔁 Rescored inventory, {} SKUs changed", changed);
        Ok(changed)
    }

    pub async fn visualize(&self) -> Result<LayoutReport> {
        let layout = self.layout.load_layout()?;
        let items = self.repository.list_ranked().await?;
        Ok(build_layout(&layout, &items, None))
    }

    /// 詢問顧問服務後重新配置；顧問失敗時退回原本的分區
    pub async fn optimize(&self, instructions: Option<&str>) -> Result<OptimizeReport> {
        if let Some(text) = instructions {
            validate_max_length("instructions", text, MAX_INSTRUCTIONS_CHARS)?;
        }

        let layout = self.layout.load_layout()?;
        let items = self.repository.list_ranked().await?;

        let outcome = self.advisor.advise(&items, instructions).await;
        if outcome.is_degraded() {
            tracing::warn!("⚠️ Optimization degraded: {}", outcome.summary());
        }

        let accepted = accepted_reassignments(&layout, outcome.reassignments());
        let overrides: HashMap<String, String> = accepted
            .iter()
            .map(|entry| (entry.sku_code.clone(), entry.recommended_zone.clone()))
            .collect();

        let report = build_layout(&layout, &items, Some(&overrides));

        Ok(OptimizeReport {
            layout: report,
            assistant_summary: outcome.summary().to_string(),
            assistant_reassignments: accepted,
            degraded: outcome.is_degraded(),
        })
    }
}

/// 只接受指向已知分區的建議，並換成配置中的分區名稱
fn accepted_reassignments(
    layout: &WarehouseLayout,
    reassignments: &[Reassignment],
) -> Vec<Reassignment> {
    reassignments
        .iter()
        .filter_map(|entry| match layout.find_zone(&entry.recommended_zone) {
            Some(zone) => Some(Reassignment {
                recommended_zone: zone.id.clone(),
                ..entry.clone()
            }),
            None => {
                tracing::warn!(
                    "Ignoring reassignment of {} to unknown zone '{}'",
                    entry.sku_code,
                    entry.recommended_zone
                );
                None
            }
        })
        .collect()
}

fn validate_sku_code(sku_code: &str) -> Result<String> {
    let sku_code = sku_code.trim();
    validate_non_empty_string("sku_code", sku_code)?;
    validate_max_length("sku_code", sku_code, MAX_SKU_CODE_CHARS)?;
    Ok(sku_code.to_string())
}

fn clean_product_name(product_name: Option<String>) -> Result<Option<String>> {
    let name = product_name
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty());
    if let Some(name) = &name {
        validate_max_length("product_name", name, MAX_PRODUCT_NAME_CHARS)?;
    }
    Ok(name)
}

fn validate_metrics(metrics: &Metrics) -> Result<()> {
    for (name, value) in metrics.named() {
        validate_unit_interval(name, value)?;
    }
    Ok(())
}
