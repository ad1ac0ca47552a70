//! HTTP-facing error type.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use grimoire::GrimoireError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Grimoire(#[from] GrimoireError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Grimoire(GrimoireError::MissingEndpoint)
            | ApiError::Grimoire(GrimoireError::InvalidEndpoint(_)) => StatusCode::BAD_REQUEST,
            ApiError::Grimoire(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("request failed: {self}");
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}
