// Insight service - turns uploaded project data into a new dashboard record
use crate::application::insight_generator::{AnalysisError, InsightGenerator};
use crate::domain::dashboard::{DashboardRecord, new_id};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::Semaphore;

#[derive(Clone)]
pub struct InsightService {
    generator: Arc<dyn InsightGenerator>,
    default_widgets: Vec<String>,
    max_input_bytes: usize,
    in_flight: Arc<Semaphore>,
}

impl InsightService {
    pub fn new(
        generator: Arc<dyn InsightGenerator>,
        default_widgets: Vec<String>,
        max_input_bytes: usize,
    ) -> Self {
        Self {
            generator,
            default_widgets,
            max_input_bytes,
            in_flight: Arc::new(Semaphore::new(1)),
        }
    }

    /// Analyze raw data into a complete, not yet saved, record.
    ///
    /// One analysis runs at a time; a second caller gets `Busy` instead of
    /// queueing. Failures are terminal, nothing is retried.
    pub async fn generate(&self, raw_data: &str) -> Result<DashboardRecord, AnalysisError> {
        if raw_data.trim().is_empty() {
            return Err(AnalysisError::EmptyInput);
        }
        if raw_data.len() > self.max_input_bytes {
            return Err(AnalysisError::InputTooLarge {
                size: raw_data.len(),
                limit: self.max_input_bytes,
            });
        }

        let _permit = self
            .in_flight
            .try_acquire()
            .map_err(|_| AnalysisError::Busy)?;

        tracing::info!("Analyzing {} bytes of project data", raw_data.len());
        let draft = match self.generator.generate(raw_data).await {
            Ok(draft) => draft,
            Err(e) => {
                tracing::error!("Insight generation failed: {}", e);
                return Err(e);
            }
        };

        let record = draft.into_record(Utc::now(), &self.default_widgets, new_id);
        tracing::info!("Generated dashboard {} for {}", record.id, record.project_name);
        Ok(record)
    }
}
