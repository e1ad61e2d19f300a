use crate::adapters::memory_store::Inventory;
use crate::domain::model::{NewSkuItem, SkuItem, SkuRevision};
use crate::domain::ports::ItemRepository;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// 以單一 JSON 檔保存全部 SKU，每次異動後整檔覆寫
///
/// 異動先套用在副本上，寫檔成功後才取代記憶體中的資料，
/// 寫檔失敗時記憶體內容與磁碟保持一致。
#[derive(Debug)]
pub struct JsonFileRepository {
    path: PathBuf,
    inventory: Mutex<Inventory>,
}

impl JsonFileRepository {
    /// 檔案不存在時視為空庫存
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let inventory = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Inventory::default(),
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No data file at {}, starting empty", path.display());
                Inventory::default()
            }
            Err(e) => return Err(e.into()),
        };

        tracing::debug!(
            "Loaded {} SKUs from {}",
            inventory.items.len(),
            path.display()
        );

        Ok(Self {
            path,
            inventory: Mutex::new(inventory),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, inventory: &Inventory) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let json = serde_json::to_vec_pretty(inventory)?;
        tokio::fs::write(&self.path, json).await?;
        tracing::debug!("Saved {} SKUs to {}", inventory.items.len(), self.path.display());
        Ok(())
    }
}

#[async_trait]
impl ItemRepository for JsonFileRepository {
    async fn list_ranked(&self) -> Result<Vec<SkuItem>> {
        Ok(self.inventory.lock().await.ranked())
    }

    async fn get(&self, sku_code: &str) -> Result<Option<SkuItem>> {
        Ok(self.inventory.lock().await.get(sku_code).cloned())
    }

    async fn create(&self, item: NewSkuItem) -> Result<SkuItem> {
        let mut inventory = self.inventory.lock().await;
        let mut next = inventory.clone();
        let created = next.insert(item)?;
        self.persist(&next).await?;
        *inventory = next;
        Ok(created)
    }

    async fn update(&self, sku_code: &str, revision: SkuRevision) -> Result<SkuItem> {
        let mut inventory = self.inventory.lock().await;
        let mut next = inventory.clone();
        let updated = next.revise(sku_code, revision)?;
        self.persist(&next).await?;
        *inventory = next;
        Ok(updated)
    }

    async fn delete(&self, sku_code: &str) -> Result<()> {
        let mut inventory = self.inventory.lock().await;
        let mut next = inventory.clone();
        next.remove(sku_code)?;
        self.persist(&next).await?;
        *inventory = next;
        Ok(())
    }

    async fn clear(&self) -> Result<usize> {
        let mut inventory = self.inventory.lock().await;
        let mut next = inventory.clone();
        let removed = next.clear();
        self.persist(&next).await?;
        *inventory = next;
        Ok(removed)
    }
}
