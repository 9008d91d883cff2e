// Editor session - the editor's private working copy of one dashboard
use crate::application::dashboard_service::DashboardService;
use crate::application::dashboard_store::StoreError;
use crate::application::insight_generator::AnalysisError;
use crate::domain::dashboard::{DashboardRecord, new_id};
use crate::domain::widget::{UnknownWidget, WidgetId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("no dashboard is loaded")]
    NothingLoaded,
    #[error(transparent)]
    UnknownWidget(#[from] UnknownWidget),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Edits happen on a copy; the store only changes on `save`.
#[derive(Debug, Default)]
pub struct EditorSession {
    working: Option<DashboardRecord>,
    dirty: bool,
}

impl EditorSession {
    /// The upload-prompt state: nothing loaded
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load a copy of a stored dashboard. A missing id yields the empty
    /// session rather than an error.
    pub async fn open(service: &DashboardService, id: Option<&str>) -> Self {
        let working = match id {
            Some(id) => service.open(id).await,
            None => None,
        };
        if let (None, Some(id)) = (&working, id) {
            tracing::debug!("Dashboard {} not found, opening empty editor", id);
        }
        Self {
            working,
            dirty: false,
        }
    }

    /// Take the outcome of an analysis. Failure drops back to the empty
    /// state and no partial record is kept.
    pub fn apply_analysis(
        &mut self,
        outcome: Result<DashboardRecord, AnalysisError>,
    ) -> Result<(), AnalysisError> {
        match outcome {
            Ok(record) => {
                self.working = Some(record);
                self.dirty = true;
                Ok(())
            }
            Err(e) => {
                self.working = None;
                self.dirty = false;
                Err(e)
            }
        }
    }

    pub fn record(&self) -> Option<&DashboardRecord> {
        self.working.as_ref()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn edit<F>(&mut self, f: F) -> Result<(), EditorError>
    where
        F: FnOnce(&mut DashboardRecord),
    {
        let record = self.working.as_mut().ok_or(EditorError::NothingLoaded)?;
        f(record);
        self.dirty = true;
        Ok(())
    }

    /// Returns whether the widget is enabled afterwards
    pub fn toggle_widget(&mut self, widget: &str) -> Result<bool, EditorError> {
        let widget: WidgetId = widget.parse()?;
        let mut active = false;
        self.edit(|r| active = r.toggle_widget(widget))?;
        Ok(active)
    }

    pub fn add_risk(&mut self) -> Result<(), EditorError> {
        self.edit(|r| {
            r.add_risk(new_id());
        })
    }

    pub fn add_action_item(&mut self) -> Result<(), EditorError> {
        self.edit(|r| {
            r.add_action_item(new_id());
        })
    }

    /// Upsert the working copy through the service and keep the stamped
    /// version as the new working copy.
    pub async fn save(&mut self, service: &DashboardService) -> Result<DashboardRecord, EditorError> {
        let record = self.working.clone().ok_or(EditorError::NothingLoaded)?;
        let saved = service.save(record).await?;
        self.working = Some(saved.clone());
        self.dirty = false;
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dashboard_store::DashboardStore;
    use crate::domain::dashboard::HealthStatus;
    use crate::infrastructure::memory_state::MemoryDurableState;
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;
    use tokio::sync::Mutex;

    async fn service() -> DashboardService {
        let store = DashboardStore::load(Arc::new(MemoryDurableState::new())).await;
        DashboardService::new(Arc::new(Mutex::new(store)))
    }

    fn generated(id: &str) -> DashboardRecord {
        let mut record = DashboardRecord::blank(
            id.to_string(),
            vec!["progress".to_string()],
            Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        );
        record.project_name = "Apollo".to_string();
        record
    }

    #[tokio::test]
    async fn test_edits_do_not_reach_store_until_save() {
        let service = service().await;
        service.save(generated("a")).await.unwrap();

        let mut editor = EditorSession::open(&service, Some("a")).await;
        assert!(!editor.is_dirty());
        editor
            .edit(|r| r.overall_status = HealthStatus::OffTrack)
            .unwrap();
        editor.add_risk().unwrap();
        assert!(editor.is_dirty());

        let stored = service.open("a").await.unwrap();
        assert_eq!(stored.overall_status, HealthStatus::OnTrack);
        assert!(stored.risks.is_empty());

        let saved = editor.save(&service).await.unwrap();
        assert!(!editor.is_dirty());
        assert_eq!(service.open("a").await.unwrap(), saved);
        assert_eq!(saved.risks.len(), 1);
        assert!(saved.last_updated > Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());
    }

    #[tokio::test]
    async fn test_open_unknown_id_is_empty_state() {
        let service = service().await;
        let mut editor = EditorSession::open(&service, Some("ghost")).await;
        assert!(editor.record().is_none());
        assert!(matches!(editor.add_risk(), Err(EditorError::NothingLoaded)));
        assert!(matches!(
            editor.save(&service).await,
            Err(EditorError::NothingLoaded)
        ));
    }

    #[tokio::test]
    async fn test_generated_record_saves_as_new_entry() {
        let service = service().await;
        service
            .save_at(
                generated("existing"),
                Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap(),
            )
            .await
            .unwrap();

        let mut editor = EditorSession::empty();
        editor.apply_analysis(Ok(generated("fresh"))).unwrap();
        editor.add_action_item().unwrap();
        editor.save(&service).await.unwrap();

        let ids: Vec<String> = service
            .list_recent()
            .await
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids.len(), 2);
        assert_eq!(ids[0], "fresh");
    }

    #[test]
    fn test_failed_analysis_returns_to_empty_state() {
        let mut editor = EditorSession::empty();
        editor.apply_analysis(Ok(generated("a"))).unwrap();

        let err = editor.apply_analysis(Err(AnalysisError::EmptyResponse));
        assert!(err.is_err());
        assert!(editor.record().is_none());
        assert!(!editor.is_dirty());
    }

    #[test]
    fn test_toggle_widget_validates_id() {
        let mut editor = EditorSession::empty();
        editor.apply_analysis(Ok(generated("a"))).unwrap();

        assert!(!editor.toggle_widget("progress").unwrap());
        assert!(editor.toggle_widget("sentiment").unwrap());
        assert!(matches!(
            editor.toggle_widget("gantt"),
            Err(EditorError::UnknownWidget(_))
        ));
        assert_eq!(
            editor.record().unwrap().active_widgets,
            vec!["sentiment".to_string()]
        );
    }
}
