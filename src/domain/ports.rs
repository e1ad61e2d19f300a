use crate::domain::model::{
    AdvisoryOutcome, NewSkuItem, SkuItem, SkuRevision, WarehouseLayout,
};
use crate::utils::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// 依優先度遞減列出全部 SKU，同分依建立順序
    async fn list_ranked(&self) -> Result<Vec<SkuItem>>;
    async fn get(&self, sku_code: &str) -> Result<Option<SkuItem>>;
    /// 已存在相同 sku_code 時回傳 DuplicateKey
    async fn create(&self, item: NewSkuItem) -> Result<SkuItem>;
    async fn update(&self, sku_code: &str, revision: SkuRevision) -> Result<SkuItem>;
    async fn delete(&self, sku_code: &str) -> Result<()>;
    async fn clear(&self) -> Result<usize>;
}

pub trait LayoutSource: Send + Sync {
    fn load_layout(&self) -> Result<WarehouseLayout>;
}

impl LayoutSource for WarehouseLayout {
    fn load_layout(&self) -> Result<WarehouseLayout> {
        Ok(self.clone())
    }
}

/// 外部顧問服務；任何失敗都以 Degraded 回報，不會回傳錯誤
#[async_trait]
pub trait ZoneAdvisor: Send + Sync {
    async fn advise(&self, items: &[SkuItem], instructions: Option<&str>) -> AdvisoryOutcome;
}

#[async_trait]
impl<T: ZoneAdvisor + ?Sized> ZoneAdvisor for Box<T> {
    async fn advise(&self, items: &[SkuItem], instructions: Option<&str>) -> AdvisoryOutcome {
        (**self).advise(items, instructions).await
    }
}

#[async_trait]
impl<T: ItemRepository + ?Sized> ItemRepository for &T {
    async fn list_ranked(&self) -> Result<Vec<SkuItem>> {
        (**self).list_ranked().await
    }

    async fn get(&self, sku_code: &str) -> Result<Option<SkuItem>> {
        (**self).get(sku_code).await
    }

    async fn create(&self, item: NewSkuItem) -> Result<SkuItem> {
        (**self).create(item).await
    }

    async fn update(&self, sku_code: &str, revision: SkuRevision) -> Result<SkuItem> {
        (**self).update(sku_code, revision).await
    }

    async fn delete(&self, sku_code: &str) -> Result<()> {
        (**self).delete(sku_code).await
    }

    async fn clear(&self) -> Result<usize> {
        (**self).clear().await
    }
}

impl<T: LayoutSource + ?Sized> LayoutSource for Box<T> {
    fn load_layout(&self) -> Result<WarehouseLayout> {
        (**self).load_layout()
    }
}
