//! Route table assembly.

use axum::extract::DefaultBodyLimit;
use axum::middleware::from_fn;
use axum::routing::{get, post};
use axum::{Extension, Router};
use tower_http::services::ServeDir;

use crate::web::types::AppContext;
use crate::web::{middleware, pages, ussd};

/// Uploads top out at 5 MiB; leave headroom for the multipart framing.
const MAX_REQUEST_BYTES: usize = 6 * 1024 * 1024;

/// Build the full application router.
pub fn app_router(context: AppContext) -> Router {
    // Only the profile sits behind the login gate; the directories are
    // open to hospital staff machines on the local network.
    let gated = Router::new()
        .route(
            "/profile",
            get(pages::profile::show).post(pages::profile::update),
        )
        .layer(from_fn(middleware::require_login))
        .layer(Extension(context.clone()))
        .with_state(context.clone());

    let public = Router::new()
        .route("/", get(pages::home))
        .route(
            "/register",
            get(pages::auth::register_form).post(pages::auth::register),
        )
        .route("/login", get(pages::auth::login_form).post(pages::auth::login))
        .route("/logout", post(pages::auth::logout))
        .route("/patients", get(pages::patients::list))
        .route(
            "/patients/new",
            get(pages::patients::create_form).post(pages::patients::create),
        )
        .route(
            "/patients/:id/edit",
            get(pages::patients::update_form).post(pages::patients::update),
        )
        .route(
            "/patients/:id/delete",
            get(pages::patients::confirm_delete).post(pages::patients::destroy),
        )
        .route("/doctors", get(pages::doctors::list))
        .route(
            "/doctors/new",
            get(pages::doctors::create_form).post(pages::doctors::create),
        )
        .route(
            "/doctors/:id/edit",
            get(pages::doctors::update_form).post(pages::doctors::update),
        )
        .route(
            "/doctors/:id/delete",
            get(pages::doctors::confirm_delete).post(pages::doctors::destroy),
        )
        .route("/api/ussd", post(ussd::callback))
        .with_state(context.clone());

    Router::new()
        .merge(public)
        .merge(gated)
        .nest_service("/media", ServeDir::new(context.media_dir.clone()))
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BYTES))
}
