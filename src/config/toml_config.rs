use crate::adapters::advisor::{
    AdvisorSettings, DEFAULT_ENDPOINT, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECONDS,
};
use crate::core::priority::{MetricScales, PriorityEngine, PriorityWeights, ZoneThreshold};
use crate::domain::model::WarehouseLayout;
use crate::domain::ports::LayoutSource;
use crate::utils::error::{Result, SlottingError};
use crate::utils::validation::{
    validate_path, validate_positive, validate_range, validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

const BAND_TOLERANCE_M: f64 = 1e-6;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlottingConfig {
    #[serde(default)]
    pub warehouse: WarehouseLayout,
    #[serde(default)]
    pub priority: PriorityConfig,
    #[serde(default)]
    pub normalization: MetricScales,
    #[serde(default)]
    pub advisor: AdvisorConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriorityConfig {
    #[serde(default)]
    pub weights: PriorityWeights,
    #[serde(default = "default_thresholds")]
    pub thresholds: Vec<ZoneThreshold>,
    #[serde(default = "default_fallback_zone")]
    pub fallback_zone: String,
}

fn default_thresholds() -> Vec<ZoneThreshold> {
    PriorityEngine::default().thresholds
}

fn default_fallback_zone() -> String {
    PriorityEngine::default().fallback_zone
}

impl Default for PriorityConfig {
    fn default() -> Self {
        Self {
            weights: PriorityWeights::default(),
            thresholds: default_thresholds(),
            fallback_zone: default_fallback_zone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisorConfig {
    pub enabled: Option<bool>,
    pub endpoint: Option<String>,
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            enabled: Some(true),
            endpoint: None,
            model: None,
            api_key: Some("${OPENAI_API_KEY}".to_string()),
            timeout_seconds: None,
            temperature: None,
            max_tokens: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: "./data/skus.json".to_string(),
        }
    }
}

impl SlottingConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SlottingError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 檔案不存在時使用內建預設值
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            tracing::warn!(
                "⚠️ Config file {} not found, using built-in defaults",
                path.as_ref().display()
            );
            Self::from_toml_str("")
        }
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        let mut config: Self =
            toml::from_str(&processed_content).map_err(|e| SlottingError::ConfigValidationError {
                field: "toml_parsing".to_string(),
                message: format!("TOML parsing error: {}", e),
            })?;

        // 預設的 api_key 也要經過環境變數替換
        if let Some(key) = config.advisor.api_key.take() {
            config.advisor.api_key = Some(Self::substitute_env_vars(&key)?);
        }
        Ok(config)
    }

    /// 替換環境變數 (例如 ${OPENAI_API_KEY})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| SlottingError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        self.warehouse.validate()?;
        let engine = self.priority_engine()?;

        engine.check_layout(&self.warehouse)?;

        let scales = [
            ("normalization.f", self.normalization.f),
            ("normalization.w", self.normalization.w),
            ("normalization.s", self.normalization.s),
            ("normalization.i", self.normalization.i),
        ];
        for (field, scale) in scales {
            validate_positive(field, scale)?;
        }

        if let Some(endpoint) = &self.advisor.endpoint {
            validate_url("advisor.endpoint", endpoint)?;
        }
        if let Some(timeout) = self.advisor.timeout_seconds {
            validate_range("advisor.timeout_seconds", timeout, 1, 300)?;
        }
        if let Some(temperature) = self.advisor.temperature {
            validate_range("advisor.temperature", temperature, 0.0, 2.0)?;
        }

        validate_path("storage.path", &self.storage.path)?;
        Ok(())
    }

    pub fn priority_engine(&self) -> Result<PriorityEngine> {
        PriorityEngine::new(
            self.priority.weights,
            self.priority.thresholds.clone(),
            &self.priority.fallback_zone,
        )
    }

    pub fn advisor_enabled(&self) -> bool {
        self.advisor.enabled.unwrap_or(true)
    }

    /// 尚未替換的 ${VAR} 視為沒有設定
    pub fn advisor_api_key(&self) -> Option<String> {
        self.advisor
            .api_key
            .as_ref()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty() && !key.starts_with("${"))
    }

    pub fn advisor_settings(&self) -> AdvisorSettings {
        let advisor = &self.advisor;
        AdvisorSettings {
            endpoint: advisor
                .endpoint
                .clone()
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            model: advisor
                .model
                .clone()
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_key: self.advisor_api_key(),
            timeout: Duration::from_secs(advisor.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS)),
            temperature: advisor.temperature.unwrap_or(0.3),
            max_tokens: advisor.max_tokens.unwrap_or(600),
        }
    }

    pub fn storage_path(&self) -> &str {
        &self.storage.path
    }
}

impl Validate for SlottingConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

impl LayoutSource for SlottingConfig {
    fn load_layout(&self) -> Result<WarehouseLayout> {
        Ok(self.warehouse.clone())
    }
}

/// 分區帶必須從 0 開始、首尾相接、剛好覆蓋整個寬度
impl Validate for WarehouseLayout {
    fn validate(&self) -> Result<()> {
        validate_positive("warehouse.width_m", self.width_m)?;
        validate_positive("warehouse.height_m", self.height_m)?;
        validate_positive("warehouse.cell_size_m", self.cell_size_m)?;

        if self.zones.is_empty() {
            return Err(SlottingError::MissingConfigError {
                field: "warehouse.zones".to_string(),
            });
        }

        let mut seen = HashSet::new();
        let mut cursor = 0.0;
        for (idx, zone) in self.zones.iter().enumerate() {
            let field = format!("warehouse.zones[{}]", idx);
            let id = zone.id.trim().to_ascii_uppercase();
            if id.is_empty() {
                return Err(SlottingError::ConfigValidationError {
                    field,
                    message: "Zone id cannot be empty".to_string(),
                });
            }
            if !seen.insert(id) {
                return Err(SlottingError::ConfigValidationError {
                    field,
                    message: format!("Duplicate zone id '{}'", zone.id),
                });
            }
            if zone.to_m <= zone.from_m {
                return Err(SlottingError::ConfigValidationError {
                    field,
                    message: format!("Band [{}, {}) is empty", zone.from_m, zone.to_m),
                });
            }
            if (zone.from_m - cursor).abs() > BAND_TOLERANCE_M {
                return Err(SlottingError::ConfigValidationError {
                    field,
                    message: format!(
                        "Band starts at {} but the previous band ends at {}",
                        zone.from_m, cursor
                    ),
                });
            }
            cursor = zone.to_m;
        }

        if (cursor - self.width_m).abs() > BAND_TOLERANCE_M {
            return Err(SlottingError::ConfigValidationError {
                field: "warehouse.zones".to_string(),
                message: format!(
                    "Bands end at {} but the warehouse is {} wide",
                    cursor, self.width_m
                ),
            });
        }
        Ok(())
    }
}
