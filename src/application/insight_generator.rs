// Insight generator port - raw tabular text in, dashboard draft out
use crate::domain::insights::GeneratedInsights;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("no project data to analyze")]
    EmptyInput,

    #[error("project data is {size} bytes, the limit is {limit}")]
    InputTooLarge { size: usize, limit: usize },

    #[error("an analysis is already in progress")]
    Busy,

    #[error("insight request failed: {0}")]
    Request(String),

    #[error("insight service returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("insight service returned no content")]
    EmptyResponse,

    #[error("insight response does not match the dashboard schema: {0}")]
    Schema(#[from] serde_json::Error),
}

#[async_trait]
pub trait InsightGenerator: Send + Sync {
    /// Summarize raw project tracking data (CSV text) into a dashboard draft
    async fn generate(&self, raw_data: &str) -> Result<GeneratedInsights, AnalysisError>;
}
