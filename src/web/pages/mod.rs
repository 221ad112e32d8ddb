//! Page handlers, grouped by area.

pub mod auth;
pub mod doctors;
pub mod entity;
pub mod patients;
pub mod profile;

use axum::extract::State;
use axum::http::header::HeaderMap;
use axum::response::Html;

use crate::config;
use crate::web::middleware::current_username;
use crate::web::render;
use crate::web::types::AppContext;

/// Landing page with entry points into the directories.
pub async fn home(State(context): State<AppContext>, headers: HeaderMap) -> Html<String> {
    let user = current_username(&context, &headers);
    let body = format!(
        r#"<h1>Welcome to {app}</h1>
<p>Manage hospital patients and doctors, and keep your own account profile up to date.</p>
<ul>
  <li><a href="/patients">Patients</a></li>
  <li><a href="/doctors">Doctors</a></li>
  <li><a href="/profile">Your profile</a></li>
</ul>"#,
        app = config::APP_NAME,
    );
    Html(render::layout("Home", user.as_deref(), None, &body))
}
