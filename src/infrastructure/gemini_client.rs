// Gemini insight generator - generateContent with a fixed response schema
use crate::application::insight_generator::{AnalysisError, InsightGenerator};
use crate::domain::dashboard::HealthStatus;
use crate::domain::insights::GeneratedInsights;
use crate::infrastructure::config::render_template;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct GeminiInsightGenerator {
    client: reqwest::Client,
    api_base: String,
    model: String,
    api_key: String,
    prompt_template: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

impl GeminiInsightGenerator {
    pub fn new(api_base: String, model: String, api_key: String, prompt_template: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: api_base.trim_end_matches('/').to_string(),
            model,
            api_key,
            prompt_template,
        }
    }

    fn build_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.api_base,
            urlencoding::encode(&self.model),
            urlencoding::encode(&self.api_key)
        )
    }

    fn build_prompt(&self, raw_data: &str) -> String {
        let mut vars = HashMap::new();
        vars.insert("data".to_string(), raw_data.to_string());
        render_template(&self.prompt_template, &vars)
    }

    fn build_request(&self, raw_data: &str) -> Value {
        json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": self.build_prompt(raw_data) }]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": response_schema()
            }
        })
    }
}

/// Concatenated text of the first candidate
fn extract_text(response: GenerateContentResponse) -> Result<String, AnalysisError> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(AnalysisError::EmptyResponse);
    }
    Ok(text)
}

fn string_enum(values: &[&str]) -> Value {
    json!({ "type": "STRING", "enum": values })
}

fn object(properties: Value) -> Value {
    json!({ "type": "OBJECT", "properties": properties })
}

fn array_of(items: Value) -> Value {
    json!({ "type": "ARRAY", "items": items })
}

/// Response shape the model is held to; mirrors `GeneratedInsights`
fn response_schema() -> Value {
    let string = json!({ "type": "STRING" });
    let number = json!({ "type": "NUMBER" });
    let health = string_enum(&HealthStatus::ALL.map(HealthStatus::label));

    let mut schema = object(json!({
        "projectName": string,
        "reportingPeriod": string,
        "overallStatus": health,
        "executiveSummary": string,
        "scheduleHealth": health,
        "scopeHealth": health,
        "qualityHealth": health,
        "resourceHealth": health,
        "achievements": array_of(string.clone()),
        "plannedWork": array_of(string.clone()),
        "blockers": array_of(string.clone()),
        "risks": array_of(object(json!({
            "id": string,
            "description": string,
            "impact": string_enum(&["High", "Medium", "Low"]),
            "mitigation": string
        }))),
        "actionItems": array_of(object(json!({
            "id": string,
            "task": string,
            "owner": string,
            "dueDate": string,
            "status": string_enum(&["Open", "Completed", "In Progress"])
        }))),
        "progress": object(json!({
            "completed": number,
            "inProgress": number,
            "todo": number,
            "blocked": number
        })),
        "priorityDistribution": object(json!({
            "high": number,
            "medium": number,
            "low": number
        })),
        "workloadDistribution": array_of(object(json!({ "name": string, "count": number }))),
        "burnTrend": array_of(object(json!({ "label": string, "value": number }))),
        "phaseProgress": array_of(object(json!({ "phase": string, "percent": number }))),
        "milestones": array_of(object(json!({
            "id": string,
            "label": string,
            "date": string,
            "status": string_enum(&["Completed", "Upcoming", "Delayed"])
        }))),
        "budget": object(json!({
            "total": number,
            "spent": number,
            "currency": string
        })),
        "teamSentiment": string_enum(&["Positive", "Neutral", "Stressed"])
    }));
    schema["required"] = json!(["projectName", "overallStatus", "executiveSummary"]);
    schema
}

#[async_trait]
impl InsightGenerator for GeminiInsightGenerator {
    async fn generate(&self, raw_data: &str) -> Result<GeneratedInsights, AnalysisError> {
        let response = self
            .client
            .post(self.build_url())
            .header("Accept", "application/json")
            .json(&self.build_request(raw_data))
            .send()
            .await
            .map_err(|e| AnalysisError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AnalysisError::Status { status, body });
        }

        let data = response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| AnalysisError::Request(format!("unreadable response: {}", e)))?;

        let text = extract_text(data)?;
        tracing::debug!("Model returned {} bytes of dashboard JSON", text.len());
        Ok(GeneratedInsights::from_json(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator() -> GeminiInsightGenerator {
        GeminiInsightGenerator::new(
            "https://example.test/".to_string(),
            "gemini-3-flash-preview".to_string(),
            "k&y".to_string(),
            "Data:\n${data}".to_string(),
        )
    }

    #[test]
    fn test_build_url_encodes_key() {
        assert_eq!(
            generator().build_url(),
            "https://example.test/v1beta/models/gemini-3-flash-preview:generateContent?key=k%26y"
        );
    }

    #[test]
    fn test_request_carries_prompt_and_schema() {
        let body = generator().build_request("a,b\n1,2");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "Data:\na,b\n1,2");

        let config = &body["generationConfig"];
        assert_eq!(config["responseMimeType"], "application/json");
        let schema = &config["responseSchema"];
        assert_eq!(
            schema["required"],
            json!(["projectName", "overallStatus", "executiveSummary"])
        );
        assert_eq!(
            schema["properties"]["overallStatus"]["enum"],
            json!(["🟢 On Track", "🟡 At Risk", "🔴 Off Track"])
        );
        assert_eq!(
            schema["properties"]["actionItems"]["items"]["properties"]["status"]["enum"][2],
            "In Progress"
        );
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": { "parts": [{ "text": "{\"a\":" }, { "text": "1}" }] }
            }]
        }))
        .unwrap();
        assert_eq!(extract_text(response).unwrap(), "{\"a\":1}");
    }

    #[test]
    fn test_extract_text_without_candidates_fails() {
        let response: GenerateContentResponse =
            serde_json::from_value(json!({ "promptFeedback": { "blockReason": "SAFETY" } }))
                .unwrap();
        assert!(matches!(
            extract_text(response),
            Err(AnalysisError::EmptyResponse)
        ));
    }

    #[test]
    fn test_model_text_parses_into_insights() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": { "parts": [{ "text": r#"{
                    "projectName": "Apollo",
                    "overallStatus": "🟡 At Risk",
                    "executiveSummary": "Two blockers",
                    "progress": { "completed": 12, "inProgress": 4, "todo": 9, "blocked": 2 },
                    "teamSentiment": "Stressed"
                }"# }] }
            }]
        }))
        .unwrap();

        let insights = GeneratedInsights::from_json(&extract_text(response).unwrap()).unwrap();
        assert_eq!(insights.project_name, "Apollo");
        assert_eq!(insights.progress.blocked, 2);
    }
}
