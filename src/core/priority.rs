use crate::domain::model::{Metrics, Score, WarehouseLayout};
use crate::utils::error::{Result, SlottingError};
use crate::utils::validation::{validate_non_empty_string, validate_unit_interval, Validate};
use serde::{Deserialize, Serialize};

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// 原始量測值轉成 [0, 1]；<= 1 的值視為已正規化，直接通過
pub fn normalize(raw_value: f64, max_scale: f64) -> f64 {
    if raw_value <= 1.0 {
        return round_to(raw_value, 4);
    }
    round_to((raw_value / max_scale).min(1.0), 4)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricScales {
    pub f: f64,
    pub w: f64,
    pub s: f64,
    pub i: f64,
}

impl Default for MetricScales {
    fn default() -> Self {
        Self {
            f: 200.0,
            w: 20.0,
            s: 50_000.0,
            i: 20.0,
        }
    }
}

impl MetricScales {
    pub fn normalize(&self, raw: Metrics) -> Metrics {
        Metrics {
            f: normalize(raw.f, self.f),
            w: normalize(raw.w, self.w),
            s: normalize(raw.s, self.s),
            i: normalize(raw.i, self.i),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriorityWeights {
    pub f: f64,
    pub w: f64,
    pub s: f64,
    pub i: f64,
}

impl Default for PriorityWeights {
    fn default() -> Self {
        Self {
            f: 0.38,
            w: 0.24,
            s: 0.20,
            i: 0.18,
        }
    }
}

impl Validate for PriorityWeights {
    fn validate(&self) -> Result<()> {
        let weights = [("f", self.f), ("w", self.w), ("s", self.s), ("i", self.i)];
        for (name, weight) in weights {
            if !weight.is_finite() || weight < 0.0 {
                return Err(SlottingError::InvalidConfigValueError {
                    field: format!("priority.weights.{}", name),
                    value: weight.to_string(),
                    reason: "Weight must be a non-negative number".to_string(),
                });
            }
        }

        let sum = self.f + self.w + self.s + self.i;
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(SlottingError::ConfigValidationError {
                field: "priority.weights".to_string(),
                message: format!("Weights must sum to 1.0, got {}", sum),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneThreshold {
    pub zone: String,
    pub min_priority: f64,
}

impl ZoneThreshold {
    pub fn new(zone: &str, min_priority: f64) -> Self {
        Self {
            zone: zone.to_string(),
            min_priority,
        }
    }
}

/// 計分與分區規則
///
/// 門檻由上而下比對，第一個 `priority >= min_priority` 的分區勝出；
/// 都不符合時落到 `fallback_zone`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityEngine {
    pub weights: PriorityWeights,
    pub thresholds: Vec<ZoneThreshold>,
    pub fallback_zone: String,
}

impl Default for PriorityEngine {
    fn default() -> Self {
        Self {
            weights: PriorityWeights::default(),
            thresholds: vec![
                ZoneThreshold::new("A", 0.70),
                ZoneThreshold::new("B", 0.50),
                ZoneThreshold::new("C", 0.30),
            ],
            fallback_zone: "D".to_string(),
        }
    }
}

impl Validate for PriorityEngine {
    fn validate(&self) -> Result<()> {
        self.weights.validate()?;
        validate_non_empty_string("priority.fallback_zone", &self.fallback_zone)?;

        let mut previous: Option<f64> = None;
        for (idx, threshold) in self.thresholds.iter().enumerate() {
            let field = format!("priority.thresholds[{}]", idx);
            validate_non_empty_string(&field, &threshold.zone)?;
            if !(0.0..=1.0).contains(&threshold.min_priority) {
                return Err(SlottingError::InvalidConfigValueError {
                    field,
                    value: threshold.min_priority.to_string(),
                    reason: "Threshold must be between 0 and 1".to_string(),
                });
            }
            if let Some(prev) = previous {
                if threshold.min_priority >= prev {
                    return Err(SlottingError::ConfigValidationError {
                        field,
                        message: "Thresholds must be listed in strictly descending order"
                            .to_string(),
                    });
                }
            }
            previous = Some(threshold.min_priority);
        }
        Ok(())
    }
}

impl PriorityEngine {
    pub fn new(
        weights: PriorityWeights,
        thresholds: Vec<ZoneThreshold>,
        fallback_zone: &str,
    ) -> Result<Self> {
        let engine = Self {
            weights,
            thresholds,
            fallback_zone: fallback_zone.to_string(),
        };
        engine.validate()?;
        Ok(engine)
    }

    /// 所有分區標籤，依快到慢排列
    pub fn zone_labels(&self) -> Vec<&str> {
        self.thresholds
            .iter()
            .map(|t| t.zone.as_str())
            .chain(std::iter::once(self.fallback_zone.as_str()))
            .collect()
    }

    /// 每個分區標籤都要能在倉庫配置中找到，否則該分區的 SKU 永遠不會被擺放
    pub fn check_layout(&self, layout: &WarehouseLayout) -> Result<()> {
        for label in self.zone_labels() {
            if layout.find_zone(label).is_none() {
                return Err(SlottingError::ConfigValidationError {
                    field: "priority.thresholds".to_string(),
                    message: format!("Zone '{}' is not defined in the warehouse layout", label),
                });
            }
        }
        Ok(())
    }

    pub fn compute_priority(&self, f: f64, w: f64, s: f64, i: f64) -> Result<f64> {
        for (name, value) in [("f", f), ("w", w), ("s", s), ("i", i)] {
            validate_unit_interval(name, value)?;
        }

        let weights = &self.weights;
        let priority = weights.f * f + weights.w * w + weights.s * s + weights.i * i;
        Ok(round_to(priority.clamp(0.0, 1.0), 4))
    }

    pub fn priority_to_zone(&self, priority: f64) -> &str {
        self.thresholds
            .iter()
            .find(|t| priority >= t.min_priority)
            .map(|t| t.zone.as_str())
            .unwrap_or(&self.fallback_zone)
    }

    pub fn score(&self, metrics: &Metrics) -> Result<Score> {
        let priority = self.compute_priority(metrics.f, metrics.w, metrics.s, metrics.i)?;
        Ok(Score {
            priority,
            zone: self.priority_to_zone(priority).to_string(),
        })
    }
}

pub fn compute_priority(f: f64, w: f64, s: f64, i: f64) -> Result<f64> {
    PriorityEngine::default().compute_priority(f, w, s, i)
}

pub fn priority_to_zone(priority: f64) -> String {
    PriorityEngine::default()
        .priority_to_zone(priority)
        .to_string()
}

pub fn compute_priority_and_zone(f: f64, w: f64, s: f64, i: f64) -> Result<Score> {
    PriorityEngine::default().score(&Metrics::new(f, w, s, i))
}
