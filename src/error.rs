use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

#[derive(Template)]
#[template(path = "not_found.html")]
struct NotFoundTemplate {}

#[derive(Debug, Error)]
pub enum AppError {
    /// Missing article or category, or a category with nothing published.
    #[error("Not found")]
    NotFound,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound => {
                let body = NotFoundTemplate {}
                    .render()
                    .unwrap_or_else(|_| "Not found".to_string());
                (StatusCode::NOT_FOUND, Html(body)).into_response()
            }
            AppError::Internal(err) => {
                error!("Request failed: {:#}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Error: {}", err),
                )
                    .into_response()
            }
        }
    }
}
