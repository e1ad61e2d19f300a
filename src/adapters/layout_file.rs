use crate::domain::model::WarehouseLayout;
use crate::domain::ports::LayoutSource;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Deserialize)]
#[serde(untagged)]
enum LayoutDocument {
    Wrapped { warehouse: WarehouseLayout },
    Bare(WarehouseLayout),
}

/// JSON 倉庫配置檔，每次請求重新讀取
///
/// 接受 `{"warehouse": {...}}` 或直接的配置物件。
#[derive(Debug, Clone)]
pub struct LayoutFile {
    path: PathBuf,
}

impl LayoutFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn parse(content: &str) -> Result<WarehouseLayout> {
        let layout = match serde_json::from_str::<LayoutDocument>(content)? {
            LayoutDocument::Wrapped { warehouse } => warehouse,
            LayoutDocument::Bare(layout) => layout,
        };
        layout.validate()?;
        Ok(layout)
    }
}

impl LayoutSource for LayoutFile {
    fn load_layout(&self) -> Result<WarehouseLayout> {
        let content = std::fs::read_to_string(&self.path)?;
        Self::parse(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_wrapped_document() {
        let content = r#"{
            "warehouse": {
                "width_m": 40,
                "height_m": 20,
                "zones": [
                    {"id": "A", "from_m": 0, "to_m": 10},
                    {"id": "B", "from_m": 10, "to_m": 40}
                ],
                "rack": {"length_m": 3.6, "width_m": 3, "levels": 7, "cluster_size": 3, "aisle_m": 4}
            }
        }"#;

        let layout = LayoutFile::parse(content).unwrap();
        assert_eq!(layout.zones.len(), 2);
        assert_eq!(layout.cell_size_m, 4.0);
        assert_eq!(layout.rack.as_ref().map(|r| r.levels), Some(7));
    }

    #[test]
    fn test_parse_rejects_gapped_bands() {
        let content = r#"{
            "width_m": 40, "height_m": 20,
            "zones": [
                {"id": "A", "from_m": 0, "to_m": 10},
                {"id": "B", "from_m": 12, "to_m": 40}
            ]
        }"#;
        assert!(LayoutFile::parse(content).is_err());
    }

    #[test]
    fn test_load_from_disk() {
        let mut temp_file = NamedTempFile::new().unwrap();
        let content = r#"{"width_m": 8, "height_m": 8, "cell_size_m": 2, "zones": [{"id": "A", "from_m": 0, "to_m": 8}]}"#;
        temp_file.write_all(content.as_bytes()).unwrap();

        let source = LayoutFile::new(temp_file.path());
        let layout = source.load_layout().unwrap();
        assert_eq!(layout.cell_size_m, 2.0);
        assert_eq!(layout.zone_ids(), vec!["A"]);
    }

    #[test]
    fn test_default_engine_zones_must_exist_in_file() {
        use crate::core::priority::PriorityEngine;

        let engine = PriorityEngine::default();
        let partial = LayoutFile::parse(
            r#"{"width_m": 30, "height_m": 10, "zones": [
                {"id": "a", "from_m": 0, "to_m": 10},
                {"id": "b", "from_m": 10, "to_m": 20},
                {"id": "c", "from_m": 20, "to_m": 30}
            ]}"#,
        )
        .unwrap();
        let err = engine.check_layout(&partial).unwrap_err();
        assert!(err.to_string().contains("'D'"));

        let full = LayoutFile::parse(
            r#"{"width_m": 40, "height_m": 10, "zones": [
                {"id": "a", "from_m": 0, "to_m": 10},
                {"id": "b", "from_m": 10, "to_m": 20},
                {"id": "c", "from_m": 20, "to_m": 30},
                {"id": "d", "from_m": 30, "to_m": 40}
            ]}"#,
        )
        .unwrap();
        assert!(engine.check_layout(&full).is_ok());
    }
}
