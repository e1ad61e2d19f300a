use crate::domain::model::{AdvisoryOutcome, AdvisoryPlan, Reassignment, SkuItem};
use crate::domain::ports::ZoneAdvisor;
use crate::utils::error::{Result, SlottingError};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 20;

const EMPTY_INVENTORY_SUMMARY: &str = "No SKUs available for optimization.";
const MISSING_SUMMARY: &str = "AI optimization completed, but no summary provided.";
const DEFAULT_CONFIDENCE: f64 = 0.5;

#[derive(Debug, Clone)]
pub struct AdvisorSettings {
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
    pub temperature: f64,
    pub max_tokens: u32,
}

impl Default for AdvisorSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
            temperature: 0.3,
            max_tokens: 600,
        }
    }
}

/// OpenAI 相容的 chat completions 顧問
pub struct ChatCompletionsAdvisor {
    settings: AdvisorSettings,
    client: Client,
}

impl ChatCompletionsAdvisor {
    pub fn new(settings: AdvisorSettings) -> Result<Self> {
        let client = Client::builder().timeout(settings.timeout).build()?;
        Ok(Self { settings, client })
    }

    pub fn settings(&self) -> &AdvisorSettings {
        &self.settings
    }

    async fn request_plan(
        &self,
        api_key: &str,
        items: &[SkuItem],
        instructions: Option<&str>,
    ) -> Result<AdvisoryPlan> {
        let body = json!({
            "model": self.settings.model,
            "messages": [
                {
                    "role": "system",
                    "content": "You generate concise, structured warehouse slotting recommendations.",
                },
                {"role": "user", "content": build_prompt(items, instructions)},
            ],
            "response_format": {"type": "json_object"},
            "temperature": self.settings.temperature,
            "max_tokens": self.settings.max_tokens,
        });

        tracing::debug!("Requesting zone plan from {}", self.settings.endpoint);
        let response = self
            .client
            .post(&self.settings.endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Advisor response status: {}", status);
        if !status.is_success() {
            return Err(SlottingError::AdvisorError {
                message: format!("advisor returned HTTP {}", status),
            });
        }

        let payload: Value = response.json().await?;
        let content = payload
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .unwrap_or("");

        let data: Value = if content.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(content)?
        };

        Ok(parse_plan(&data))
    }
}

#[async_trait]
impl ZoneAdvisor for ChatCompletionsAdvisor {
    async fn advise(&self, items: &[SkuItem], instructions: Option<&str>) -> AdvisoryOutcome {
        if items.is_empty() {
            return AdvisoryOutcome::Plan(AdvisoryPlan {
                summary: EMPTY_INVENTORY_SUMMARY.to_string(),
                reassignments: Vec::new(),
            });
        }

        let Some(api_key) = self.settings.api_key.as_deref().filter(|k| !k.trim().is_empty())
        else {
            tracing::warn!("⚠️ Advisor API key is not configured, skipping optimization");
            return AdvisoryOutcome::degraded(
                "Advisor API key is not set. Cannot call the optimization service.",
            );
        };

        match self.request_plan(api_key, items, instructions).await {
            Ok(plan) => {
                tracing::info!(
                    "🤖 Advisor suggested {} reassignments",
                    plan.reassignments.len()
                );
                AdvisoryOutcome::Plan(plan)
            }
            Err(e) => {
                tracing::warn!("⚠️ Advisor unavailable, using stored zones: {}", e);
                AdvisoryOutcome::degraded(format!("AI optimization unavailable: {}", e))
            }
        }
    }
}

/// 固定結果的顧問，離線或測試時使用
#[derive(Debug, Clone)]
pub struct StaticAdvisor {
    outcome: AdvisoryOutcome,
}

impl StaticAdvisor {
    pub fn new(outcome: AdvisoryOutcome) -> Self {
        Self { outcome }
    }

    pub fn with_plan(summary: &str, reassignments: Vec<Reassignment>) -> Self {
        Self::new(AdvisoryOutcome::Plan(AdvisoryPlan {
            summary: summary.to_string(),
            reassignments,
        }))
    }
}

#[async_trait]
impl ZoneAdvisor for StaticAdvisor {
    async fn advise(&self, _items: &[SkuItem], _instructions: Option<&str>) -> AdvisoryOutcome {
        self.outcome.clone()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledAdvisor;

#[async_trait]
impl ZoneAdvisor for DisabledAdvisor {
    async fn advise(&self, _items: &[SkuItem], _instructions: Option<&str>) -> AdvisoryOutcome {
        AdvisoryOutcome::degraded("Advisor is disabled in the configuration.")
    }
}

pub fn build_prompt(items: &[SkuItem], instructions: Option<&str>) -> String {
    let instructions = instructions
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .unwrap_or("None provided - use default rules only");

    let mut lines = vec![
        "Recommend the optimal zone (A, B, C or D) for each SKU below.".to_string(),
        "Zones are ordered from fastest dispatch (A) to slowest (D).".to_string(),
        format!("Operator instructions (override default rules): {}", instructions),
        "Respond with JSON: {\"summary\": string, \"reassignments\": [{\"sku_code\", \"recommended_zone\", \"confidence\" (0-1), \"reason\"}]}.".to_string(),
        "SKU data:".to_string(),
    ];

    for item in items {
        lines.push(format!(
            "- {}: priority={:.4}, zone={}, f={:.2}, w={:.2}, s={:.2}, i={:.2}",
            item.sku_code,
            item.priority(),
            item.zone(),
            item.metrics.f,
            item.metrics.w,
            item.metrics.s,
            item.metrics.i
        ));
    }

    lines.join("\n")
}

/// 寬鬆解析顧問回傳的 JSON；格式不符的項目直接略過
pub fn parse_plan(data: &Value) -> AdvisoryPlan {
    let summary = data
        .get("summary")
        .and_then(Value::as_str)
        .unwrap_or(MISSING_SUMMARY)
        .to_string();

    let reassignments: Vec<Reassignment> = data
        .get("reassignments")
        .and_then(Value::as_array)
        .map(|entries| entries.iter().filter_map(parse_reassignment).collect())
        .unwrap_or_default();

    AdvisoryPlan {
        summary,
        reassignments,
    }
}

fn parse_reassignment(entry: &Value) -> Option<Reassignment> {
    let sku_code = entry
        .get("sku_code")
        .and_then(Value::as_str)
        .filter(|code| !code.is_empty())?;

    let zone = entry
        .get("recommended_zone")
        .and_then(Value::as_str)
        .filter(|zone| !zone.is_empty())
        .or_else(|| entry.get("zone").and_then(Value::as_str))
        .filter(|zone| !zone.is_empty())?;

    let confidence = entry
        .get("confidence")
        .and_then(Value::as_f64)
        .unwrap_or(DEFAULT_CONFIDENCE)
        .clamp(0.0, 1.0);

    let reason = entry
        .get("reason")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    Some(Reassignment {
        sku_code: sku_code.to_string(),
        recommended_zone: zone.trim().to_uppercase(),
        confidence,
        reason,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Metrics, Score};
    use chrono::Utc;
    use httpmock::prelude::*;

    fn sku(code: &str, zone: &str) -> SkuItem {
        SkuItem {
            sku_code: code.to_string(),
            product_name: None,
            metrics: Metrics::new(0.9, 0.05, 0.01, 0.9),
            score: Score {
                priority: 0.52,
                zone: zone.to_string(),
            },
            seq: 1,
            created_at: Utc::now(),
        }
    }

    fn settings_for(server: &MockServer) -> AdvisorSettings {
        AdvisorSettings {
            endpoint: server.url("/v1/chat/completions"),
            api_key: Some("test-key".to_string()),
            timeout: Duration::from_secs(5),
            ..AdvisorSettings::default()
        }
    }

    fn completion(content: &str) -> Value {
        json!({
            "choices": [{"message": {"role": "assistant", "content": content}}]
        })
    }

    #[test]
    fn test_parse_plan_loose_entries() {
        let data = json!({
            "summary": "Moved fast movers",
            "reassignments": [
                {"sku_code": "SKU01", "recommended_zone": " a ", "confidence": 0.9, "reason": "f=180"},
                {"sku_code": "SKU02", "zone": "b"},
                {"sku_code": "SKU03", "recommended_zone": "C", "confidence": 7},
                {"recommended_zone": "A"},
                {"sku_code": "SKU04"},
                "garbage"
            ]
        });

        let plan = parse_plan(&data);
        assert_eq!(plan.summary, "Moved fast movers");
        assert_eq!(plan.reassignments.len(), 3);
        assert_eq!(plan.reassignments[0].recommended_zone, "A");
        assert_eq!(plan.reassignments[1].recommended_zone, "B");
        assert_eq!(plan.reassignments[1].confidence, 0.5);
        assert_eq!(plan.reassignments[1].reason, "");
        assert_eq!(plan.reassignments[2].confidence, 1.0);
    }

    #[test]
    fn test_parse_plan_defaults_for_missing_fields() {
        let plan = parse_plan(&json!({"reassignments": "not a list"}));
        assert_eq!(plan.summary, MISSING_SUMMARY);
        assert!(plan.reassignments.is_empty());

        let plan = parse_plan(&Value::Null);
        assert!(plan.reassignments.is_empty());
    }

    #[test]
    fn test_prompt_lists_items_and_instructions() {
        let prompt = build_prompt(&[sku("SKU01", "B")], Some("  keep heavy items in D "));
        assert!(prompt.contains("keep heavy items in D"));
        assert!(prompt.contains("- SKU01: priority=0.5200, zone=B"));

        let prompt = build_prompt(&[], None);
        assert!(prompt.contains("None provided"));
    }

    #[tokio::test]
    async fn test_empty_inventory_short_circuits() {
        let advisor = ChatCompletionsAdvisor::new(AdvisorSettings::default()).unwrap();
        let outcome = advisor.advise(&[], None).await;
        assert!(!outcome.is_degraded());
        assert_eq!(outcome.summary(), EMPTY_INVENTORY_SUMMARY);
    }

    #[tokio::test]
    async fn test_missing_api_key_degrades() {
        let advisor = ChatCompletionsAdvisor::new(AdvisorSettings::default()).unwrap();
        let outcome = advisor.advise(&[sku("SKU01", "B")], None).await;
        assert!(outcome.is_degraded());
        assert!(outcome.overrides().is_empty());
    }

    #[tokio::test]
    async fn test_successful_plan_from_http() {
        let server = MockServer::start();
        let content = r#"{"summary": "1 change", "reassignments": [{"sku_code": "SKU01", "recommended_zone": "A", "confidence": 0.8, "reason": "fast mover"}]}"#;

        let api_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/v1/chat/completions")
                .header("authorization", "Bearer test-key")
                .body_contains("gpt-4o-mini");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(completion(content));
        });

        let advisor = ChatCompletionsAdvisor::new(settings_for(&server)).unwrap();
        let outcome = advisor.advise(&[sku("SKU01", "B")], Some("fast first")).await;

        api_mock.assert();
        assert!(!outcome.is_degraded());
        assert_eq!(outcome.summary(), "1 change");
        assert_eq!(outcome.overrides().get("SKU01").map(String::as_str), Some("A"));
    }

    #[tokio::test]
    async fn test_server_error_degrades() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(500);
        });

        let advisor = ChatCompletionsAdvisor::new(settings_for(&server)).unwrap();
        let outcome = advisor.advise(&[sku("SKU01", "B")], None).await;

        api_mock.assert();
        assert!(outcome.is_degraded());
        assert!(outcome.summary().contains("500"));
    }

    #[tokio::test]
    async fn test_malformed_content_degrades() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(completion("this is not json"));
        });

        let advisor = ChatCompletionsAdvisor::new(settings_for(&server)).unwrap();
        let outcome = advisor.advise(&[sku("SKU01", "B")], None).await;

        api_mock.assert();
        assert!(outcome.is_degraded());
        assert!(outcome.reassignments().is_empty());
    }

    #[tokio::test]
    async fn test_static_and_disabled_advisors() {
        let advisor = StaticAdvisor::with_plan("fixed", vec![]);
        assert_eq!(advisor.advise(&[], None).await.summary(), "fixed");

        assert!(DisabledAdvisor.advise(&[], None).await.is_degraded());
    }
}
