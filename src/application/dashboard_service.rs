// Dashboard service - list, open, save, delete, and export use cases
use crate::application::dashboard_store::{SharedStore, StoreError};
use crate::domain::dashboard::DashboardRecord;
use chrono::{DateTime, Utc};

/// A downloadable snapshot of one dashboard
#[derive(Debug, Clone)]
pub struct ExportFile {
    pub filename: String,
    pub body: String,
}

#[derive(Clone)]
pub struct DashboardService {
    store: SharedStore,
}

impl DashboardService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// All dashboards, most recently updated first. The store itself keeps
    /// insertion order; sorting is a list-view concern.
    pub async fn list_recent(&self) -> Vec<DashboardRecord> {
        let mut records = self.store.lock().await.list().to_vec();
        records.sort_by(|a, b| b.last_updated.cmp(&a.last_updated));
        records
    }

    pub async fn open(&self, id: &str) -> Option<DashboardRecord> {
        self.store.lock().await.get(id).cloned()
    }

    /// Stamp `lastUpdated` and upsert. Returns the record as stored.
    pub async fn save(&self, record: DashboardRecord) -> Result<DashboardRecord, StoreError> {
        self.save_at(record, Utc::now()).await
    }

    pub async fn save_at(
        &self,
        mut record: DashboardRecord,
        now: DateTime<Utc>,
    ) -> Result<DashboardRecord, StoreError> {
        record.last_updated = now;
        self.store.lock().await.upsert(record.clone()).await?;
        tracing::info!("Saved dashboard {} ({})", record.id, record.project_name);
        Ok(record)
    }

    pub async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let removed = self.store.lock().await.delete(id).await?;
        if removed {
            tracing::info!("Deleted dashboard {}", id);
        } else {
            tracing::debug!("Delete of unknown dashboard {} ignored", id);
        }
        Ok(removed)
    }

    /// Pretty JSON of the stored record, same shape as durable state
    pub async fn export(&self, id: &str) -> Result<Option<ExportFile>, serde_json::Error> {
        let Some(record) = self.open(id).await else {
            return Ok(None);
        };
        Ok(Some(export_record(&record, Utc::now())?))
    }
}

pub fn export_record(
    record: &DashboardRecord,
    now: DateTime<Utc>,
) -> Result<ExportFile, serde_json::Error> {
    Ok(ExportFile {
        filename: format!("brain-dump-{}.json", now.timestamp_millis()),
        body: serde_json::to_string_pretty(record)?,
    })
}
