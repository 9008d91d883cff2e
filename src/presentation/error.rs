// HTTP error mapping
use crate::application::dashboard_store::StoreError;
use crate::application::editor_session::EditorError;
use crate::application::insight_generator::AnalysisError;
use crate::application::session_service::LoginError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("login required")]
    Unauthenticated,

    #[error("dashboard {0} not found")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<LoginError> for AppError {
    fn from(err: LoginError) -> Self {
        match err {
            LoginError::Invalid(e) => AppError::BadRequest(e.to_string()),
            LoginError::Store(e) => AppError::Store(e),
        }
    }
}

impl From<EditorError> for AppError {
    fn from(err: EditorError) -> Self {
        match err {
            EditorError::NothingLoaded => {
                AppError::BadRequest(EditorError::NothingLoaded.to_string())
            }
            EditorError::UnknownWidget(e) => AppError::BadRequest(e.to_string()),
            EditorError::Store(e) => AppError::Store(e),
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Analysis(e) => match e {
                AnalysisError::EmptyInput => StatusCode::BAD_REQUEST,
                AnalysisError::InputTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
                AnalysisError::Busy => StatusCode::CONFLICT,
                AnalysisError::Request(_)
                | AnalysisError::Status { .. }
                | AnalysisError::EmptyResponse
                | AnalysisError::Schema(_) => StatusCode::BAD_GATEWAY,
            },
            AppError::Store(StoreError::EmptyId) => StatusCode::BAD_REQUEST,
            AppError::Store(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// What the user sees. Upstream failures collapse to one message.
    fn user_message(&self) -> String {
        match self {
            AppError::Analysis(
                AnalysisError::Request(_)
                | AnalysisError::Status { .. }
                | AnalysisError::EmptyResponse
                | AnalysisError::Schema(_),
            ) => "AI analysis failed. Please check your data source.".to_string(),
            AppError::Store(StoreError::Serialize { .. } | StoreError::Persist(_))
            | AppError::Internal(_) => "internal error".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{}", self);
        } else {
            tracing::debug!("Request rejected: {}", self);
        }

        let body = match &self {
            AppError::Unauthenticated => json!({ "error": self.user_message(), "redirect": "/login" }),
            _ => json!({ "error": self.user_message() }),
        };
        (status, Json(body)).into_response()
    }
}
