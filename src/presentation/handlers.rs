// HTTP request handlers
use crate::application::dashboard_service::export_record;
use crate::application::editor_session::EditorSession;
use crate::domain::dashboard::DashboardRecord;
use crate::domain::navigation::{Resolution, View, resolve};
use crate::domain::session::User;
use crate::domain::widget::{WidgetInfo, catalog};
use crate::infrastructure::http_response::{accepts_brotli, attachment_response, json_response};
use crate::presentation::app_state::AppState;
use crate::presentation::error::AppError;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub name: String,
    pub email: String,
}

#[derive(Deserialize)]
pub struct NavigateQuery {
    pub path: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct NavigateResponse {
    pub resolution: Resolution,
    pub path: String,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

async fn require_user(state: &AppState) -> Result<User, AppError> {
    state
        .session_service
        .current()
        .await
        .ok_or(AppError::Unauthenticated)
}

pub async fn get_session(State(state): State<Arc<AppState>>) -> Json<Option<User>> {
    Json(state.session_service.current().await)
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<User>, AppError> {
    let user = state
        .session_service
        .login(&request.name, &request.email)
        .await?;
    Ok(Json(user))
}

pub async fn logout(State(state): State<Arc<AppState>>) -> Result<StatusCode, AppError> {
    state.session_service.logout().await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Resolve a view path against the current session's redirect rules
pub async fn navigate(
    Query(query): Query<NavigateQuery>,
    State(state): State<Arc<AppState>>,
) -> Json<NavigateResponse> {
    let view = View::from_path(query.path.as_deref().unwrap_or("/"));
    let authenticated = state.session_service.current().await.is_some();
    let resolution = resolve(view, authenticated);
    let path = resolution.target().path();
    Json(NavigateResponse { resolution, path })
}

pub async fn list_widgets() -> Json<Vec<WidgetInfo>> {
    Json(catalog())
}

/// List dashboards, most recently updated first
pub async fn list_dashboards(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response, AppError> {
    require_user(&state).await?;
    let dashboards = state.dashboard_service.list_recent().await;

    match json_response(&dashboards, accepts_brotli(&headers)).await {
        Ok(response) => Ok(response),
        Err(status) => Ok(status.into_response()),
    }
}

pub async fn get_dashboard(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<DashboardRecord>, AppError> {
    require_user(&state).await?;
    state
        .dashboard_service
        .open(&id)
        .await
        .map(Json)
        .ok_or(AppError::NotFound(id))
}

/// Upsert the editor's copy. The path id is authoritative.
pub async fn save_dashboard(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(record): Json<DashboardRecord>,
) -> Result<Json<DashboardRecord>, AppError> {
    require_user(&state).await?;
    if record.id != id {
        return Err(AppError::BadRequest(format!(
            "body id {} does not match path id {}",
            record.id, id
        )));
    }
    let saved = state.dashboard_service.save(record).await?;
    Ok(Json(saved))
}

pub async fn delete_dashboard(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<StatusCode, AppError> {
    require_user(&state).await?;
    state.dashboard_service.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Analyze an uploaded CSV body into a new, unsaved dashboard
pub async fn generate_dashboard(
    State(state): State<Arc<AppState>>,
    body: String,
) -> Result<Json<DashboardRecord>, AppError> {
    require_user(&state).await?;
    let mut editor = EditorSession::empty();
    editor.apply_analysis(state.insight_service.generate(&body).await)?;
    editor
        .record()
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::Internal("analysis produced no record".to_string()))
}

pub async fn export_dashboard(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, AppError> {
    require_user(&state).await?;
    let file = state
        .dashboard_service
        .export(&id)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
        .ok_or(AppError::NotFound(id))?;

    match attachment_response(&file.filename, file.body) {
        Ok(response) => Ok(response),
        Err(status) => Ok(status.into_response()),
    }
}

/// Export the editor's working copy as posted, saved or not
pub async fn export_working_copy(
    State(state): State<Arc<AppState>>,
    Json(record): Json<DashboardRecord>,
) -> Result<Response, AppError> {
    require_user(&state).await?;
    let file = export_record(&record, Utc::now()).map_err(|e| AppError::Internal(e.to_string()))?;

    match attachment_response(&file.filename, file.body) {
        Ok(response) => Ok(response),
        Err(status) => Ok(status.into_response()),
    }
}

/// Load the stored copy into an editor, apply one edit, save it back
async fn edit_and_save<F>(state: &AppState, id: String, edit: F) -> Result<DashboardRecord, AppError>
where
    F: FnOnce(&mut EditorSession) -> Result<(), AppError>,
{
    require_user(state).await?;
    let mut editor = EditorSession::open(&state.dashboard_service, Some(&id)).await;
    if editor.record().is_none() {
        return Err(AppError::NotFound(id));
    }
    edit(&mut editor)?;
    if !editor.is_dirty() {
        return editor
            .record()
            .cloned()
            .ok_or_else(|| AppError::Internal("editor lost its record".to_string()));
    }
    Ok(editor.save(&state.dashboard_service).await?)
}

pub async fn toggle_widget(
    Path((id, widget)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<DashboardRecord>, AppError> {
    let saved = edit_and_save(&state, id, |editor| {
        editor.toggle_widget(&widget)?;
        Ok(())
    })
    .await?;
    Ok(Json(saved))
}

pub async fn add_risk(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<DashboardRecord>, AppError> {
    let saved = edit_and_save(&state, id, |editor| Ok(editor.add_risk()?)).await?;
    Ok(Json(saved))
}

pub async fn add_action_item(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<DashboardRecord>, AppError> {
    let saved = edit_and_save(&state, id, |editor| Ok(editor.add_action_item()?)).await?;
    Ok(Json(saved))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dashboard_store::DashboardStore;
    use crate::application::insight_generator::{AnalysisError, InsightGenerator};
    use crate::application::insight_service::InsightService;
    use crate::domain::insights::GeneratedInsights;
    use crate::infrastructure::memory_state::MemoryDurableState;
    use async_trait::async_trait;
    use axum::body::to_bytes;
    use tokio::sync::Mutex;

    struct FixedGenerator(&'static str);

    #[async_trait]
    impl InsightGenerator for FixedGenerator {
        async fn generate(&self, _raw: &str) -> Result<GeneratedInsights, AnalysisError> {
            Ok(GeneratedInsights::from_json(self.0)?)
        }
    }

    async fn state_with(response: &'static str) -> Arc<AppState> {
        let store = DashboardStore::load(Arc::new(MemoryDurableState::new())).await;
        let insights = InsightService::new(
            Arc::new(FixedGenerator(response)),
            vec!["progress".to_string()],
            4096,
        );
        Arc::new(AppState::new(Arc::new(Mutex::new(store)), insights))
    }

    async fn logged_in() -> Arc<AppState> {
        let state = state_with(
            r#"{"projectName": "Apollo", "overallStatus": "At Risk", "executiveSummary": "ok"}"#,
        )
        .await;
        login(
            State(state.clone()),
            Json(LoginRequest {
                name: "Dana".to_string(),
                email: "dana@example.com".to_string(),
            }),
        )
        .await
        .unwrap();
        state
    }

    fn record(id: &str) -> DashboardRecord {
        DashboardRecord::blank(id.to_string(), Vec::new(), Utc::now())
    }

    #[tokio::test]
    async fn test_dashboards_require_login() {
        let state = state_with("{}").await;
        let err = get_dashboard(Path("a".to_string()), State(state.clone()))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthenticated));

        let err = generate_dashboard(State(state), "a,b".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthenticated));
    }

    #[tokio::test]
    async fn test_navigate_follows_session() {
        let state = state_with("{}").await;
        let Json(response) = navigate(
            Query(NavigateQuery {
                path: Some("/editor/a".to_string()),
            }),
            State(state),
        )
        .await;
        assert_eq!(response.resolution, Resolution::Redirect(View::Login));
        assert_eq!(response.path, "/login");

        let state = logged_in().await;
        let Json(response) = navigate(
            Query(NavigateQuery {
                path: Some("/login".to_string()),
            }),
            State(state),
        )
        .await;
        assert_eq!(response.resolution, Resolution::Redirect(View::List));
        assert_eq!(response.path, "/");
    }

    #[tokio::test]
    async fn test_save_get_delete_flow() {
        let state = logged_in().await;

        save_dashboard(Path("a".to_string()), State(state.clone()), Json(record("a")))
            .await
            .unwrap();
        let Json(loaded) = get_dashboard(Path("a".to_string()), State(state.clone()))
            .await
            .unwrap();
        assert_eq!(loaded.id, "a");

        let status = delete_dashboard(Path("a".to_string()), State(state.clone()))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);
        // Deleting again is still fine
        delete_dashboard(Path("a".to_string()), State(state.clone()))
            .await
            .unwrap();

        let err = get_dashboard(Path("a".to_string()), State(state))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_save_rejects_mismatched_id() {
        let state = logged_in().await;
        let err = save_dashboard(Path("a".to_string()), State(state), Json(record("b")))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_generate_returns_unsaved_record() {
        let state = logged_in().await;
        let Json(generated) = generate_dashboard(State(state.clone()), "key\nAP-1".to_string())
            .await
            .unwrap();
        assert_eq!(generated.project_name, "Apollo");
        assert_eq!(generated.active_widgets, vec!["progress".to_string()]);
        assert!(state.dashboard_service.open(&generated.id).await.is_none());
    }

    #[tokio::test]
    async fn test_generate_failure_maps_to_bad_gateway() {
        let state = state_with(r#"{"projectName": "NoStatus"}"#).await;
        state
            .session_service
            .login("Dana", "dana@example.com")
            .await
            .unwrap();

        let err = generate_dashboard(State(state), "a,b".to_string())
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_toggle_widget_and_add_items_persist() {
        let state = logged_in().await;
        save_dashboard(Path("a".to_string()), State(state.clone()), Json(record("a")))
            .await
            .unwrap();

        let Json(updated) = toggle_widget(
            Path(("a".to_string(), "budget".to_string())),
            State(state.clone()),
        )
        .await
        .unwrap();
        assert_eq!(updated.active_widgets, vec!["budget".to_string()]);

        add_risk(Path("a".to_string()), State(state.clone()))
            .await
            .unwrap();
        add_action_item(Path("a".to_string()), State(state.clone()))
            .await
            .unwrap();

        let stored = state.dashboard_service.open("a").await.unwrap();
        assert_eq!(stored.risks.len(), 1);
        assert_eq!(stored.action_items.len(), 1);
        assert_eq!(stored.active_widgets, vec!["budget".to_string()]);

        let err = toggle_widget(
            Path(("a".to_string(), "gantt".to_string())),
            State(state.clone()),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        let err = add_risk(Path("ghost".to_string()), State(state))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_export_sets_attachment() {
        let state = logged_in().await;
        save_dashboard(Path("a".to_string()), State(state.clone()), Json(record("a")))
            .await
            .unwrap();

        let response = export_dashboard(Path("a".to_string()), State(state))
            .await
            .unwrap();
        let disposition = response.headers()["content-disposition"].to_str().unwrap();
        assert!(disposition.starts_with("attachment; filename=\"brain-dump-"));
    }

    #[tokio::test]
    async fn test_export_unsaved_generated_record() {
        let state = logged_in().await;
        let Json(generated) = generate_dashboard(State(state.clone()), "task,owner".to_string())
            .await
            .unwrap();
        let mut working = generated.clone();
        working.executive_summary = "edited before saving".to_string();

        let response = export_working_copy(State(state.clone()), Json(working.clone()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let exported: DashboardRecord = serde_json::from_slice(&body).unwrap();
        assert_eq!(exported, working);

        assert!(state.dashboard_service.open(&generated.id).await.is_none());
    }
}
