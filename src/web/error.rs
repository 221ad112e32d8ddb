//! Web-level errors with HTTP response mapping.
//!
//! Validation failures never surface here; handlers re-render the
//! offending form locally. What remains is the not-found, redirect and
//! internal taxonomy.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};

use crate::db::DatabaseError;
use crate::web::render;

#[derive(Debug, thiserror::Error)]
pub enum WebError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Login required for {next}")]
    LoginRequired { next: String },
    #[error(transparent)]
    Database(#[from] DatabaseError),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        match self {
            WebError::NotFound(detail) => {
                (StatusCode::NOT_FOUND, Html(render::error_page("Page not found", &detail)))
                    .into_response()
            }
            // The authorization gate bounces the browser to the login
            // page, remembering the originally requested path.
            WebError::LoginRequired { next } => {
                Redirect::to(&format!("/login?next={next}")).into_response()
            }
            // Primary-key misses in the storage layer are the same
            // not-found condition as a bad route parameter.
            WebError::Database(DatabaseError::NotFound { entity_type, id }) => (
                StatusCode::NOT_FOUND,
                Html(render::error_page(
                    "Page not found",
                    &format!("No {entity_type} with id {id}"),
                )),
            )
                .into_response(),
            WebError::Database(e) => {
                tracing::error!("storage error: {e}");
                internal_response()
            }
            WebError::Internal(detail) => {
                tracing::error!(%detail, "internal web error");
                internal_response()
            }
        }
    }
}

fn internal_response() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html(render::error_page(
            "Something went wrong",
            "An internal error occurred. Please try again later.",
        )),
    )
        .into_response()
}
