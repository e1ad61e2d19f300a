use crate::domain::model::{NewSkuItem, SkuItem, SkuRevision};
use crate::domain::ports::ItemRepository;
use crate::utils::error::{Result, SlottingError};
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// SKU 清單與下一個建立序號；記憶體與檔案兩種 repository 共用
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Inventory {
    pub next_seq: u64,
    pub items: Vec<SkuItem>,
}

impl Inventory {
    pub fn ranked(&self) -> Vec<SkuItem> {
        let mut items = self.items.clone();
        items.sort_by(SkuItem::rank_cmp);
        items
    }

    pub fn get(&self, sku_code: &str) -> Option<&SkuItem> {
        self.items.iter().find(|item| item.sku_code == sku_code)
    }

    pub fn insert(&mut self, new_item: NewSkuItem) -> Result<SkuItem> {
        if self.get(&new_item.sku_code).is_some() {
            return Err(SlottingError::DuplicateKey {
                sku_code: new_item.sku_code,
            });
        }

        self.next_seq += 1;
        let item = SkuItem {
            sku_code: new_item.sku_code,
            product_name: new_item.product_name,
            metrics: new_item.metrics,
            score: new_item.score,
            seq: self.next_seq,
            created_at: Utc::now(),
        };
        self.items.push(item.clone());
        Ok(item)
    }

    pub fn revise(&mut self, sku_code: &str, revision: SkuRevision) -> Result<SkuItem> {
        let item = self
            .items
            .iter_mut()
            .find(|item| item.sku_code == sku_code)
            .ok_or_else(|| SlottingError::NotFound {
                sku_code: sku_code.to_string(),
            })?;

        item.product_name = revision.product_name;
        item.metrics = revision.metrics;
        item.score = revision.score;
        Ok(item.clone())
    }

    pub fn remove(&mut self, sku_code: &str) -> Result<SkuItem> {
        let idx = self
            .items
            .iter()
            .position(|item| item.sku_code == sku_code)
            .ok_or_else(|| SlottingError::NotFound {
                sku_code: sku_code.to_string(),
            })?;
        Ok(self.items.remove(idx))
    }

    pub fn clear(&mut self) -> usize {
        let removed = self.items.len();
        self.items.clear();
        removed
    }
}

#[derive(Debug, Default)]
pub struct InMemoryRepository {
    inventory: RwLock<Inventory>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ItemRepository for InMemoryRepository {
    async fn list_ranked(&self) -> Result<Vec<SkuItem>> {
        Ok(self.inventory.read().await.ranked())
    }

    async fn get(&self, sku_code: &str) -> Result<Option<SkuItem>> {
        Ok(self.inventory.read().await.get(sku_code).cloned())
    }

    async fn create(&self, item: NewSkuItem) -> Result<SkuItem> {
        self.inventory.write().await.insert(item)
    }

    async fn update(&self, sku_code: &str, revision: SkuRevision) -> Result<SkuItem> {
        self.inventory.write().await.revise(sku_code, revision)
    }

    async fn delete(&self, sku_code: &str) -> Result<()> {
        self.inventory.write().await.remove(sku_code).map(|_| ())
    }

    async fn clear(&self) -> Result<usize> {
        Ok(self.inventory.write().await.clear())
    }
}
