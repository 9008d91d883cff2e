// Application state for HTTP handlers
use crate::application::dashboard_service::DashboardService;
use crate::application::dashboard_store::SharedStore;
use crate::application::insight_service::InsightService;
use crate::application::session_service::SessionService;

#[derive(Clone)]
pub struct AppState {
    pub session_service: SessionService,
    pub dashboard_service: DashboardService,
    pub insight_service: InsightService,
}

impl AppState {
    pub fn new(store: SharedStore, insight_service: InsightService) -> Self {
        Self {
            session_service: SessionService::new(store.clone()),
            dashboard_service: DashboardService::new(store),
            insight_service,
        }
    }
}
