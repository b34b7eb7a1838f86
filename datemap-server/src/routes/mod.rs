pub mod events;
pub mod export;
pub mod months;
pub mod search;

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use datemap_core::{DateKey, DateMapError, ValidationError};
use serde::Serialize;

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(events::router())
        .merge(search::router())
        .merge(months::router())
        .merge(export::router())
        .with_state(state)
}

/// Standard API error response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Convert anyhow errors to HTTP responses
pub struct AppError(anyhow::Error);

impl AppError {
    fn status(&self) -> StatusCode {
        if self.0.downcast_ref::<ValidationError>().is_some() {
            return StatusCode::UNPROCESSABLE_ENTITY;
        }
        match self.0.downcast_ref::<DateMapError>() {
            Some(DateMapError::Validation(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            Some(DateMapError::Overlap { .. }) => StatusCode::CONFLICT,
            Some(DateMapError::NotFound { .. }) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }
        let body = Json(ErrorResponse {
            error: self.0.to_string(),
        });
        (status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

/// Parse a `{date}` path segment.
pub fn date_param(raw: &str) -> Result<DateKey, AppError> {
    Ok(raw.parse::<DateKey>()?)
}
