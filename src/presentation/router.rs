// Route table
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    add_action_item, add_risk, delete_dashboard, export_dashboard, generate_dashboard,
    export_working_copy, get_dashboard, get_session, health_check, list_dashboards, list_widgets, login, logout,
    navigate, save_dashboard, toggle_widget,
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// `body_limit` must exceed the analysis input limit so oversized uploads
/// reach the analysis check.
pub fn build_router(state: Arc<AppState>, body_limit: usize) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/session", get(get_session).post(login).delete(logout))
        .route("/navigate", get(navigate))
        .route("/widgets", get(list_widgets))
        .route("/dashboards", get(list_dashboards))
        .route("/dashboards/generate", post(generate_dashboard))
        .route("/dashboards/export", post(export_working_copy))
        .route(
            "/dashboards/:id",
            get(get_dashboard)
                .put(save_dashboard)
                .delete(delete_dashboard),
        )
        .route("/dashboards/:id/export", get(export_dashboard))
        .route("/dashboards/:id/widgets/:widget", post(toggle_widget))
        .route("/dashboards/:id/risks", post(add_risk))
        .route("/dashboards/:id/actions", post(add_action_item))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
