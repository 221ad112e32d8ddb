//! Login gate for routes that require an authenticated account.

use axum::body::Body;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::config;
use crate::web::cookies;
use crate::web::error::WebError;
use crate::web::types::{AppContext, CurrentUser};

/// Require a valid session cookie; on success the handler sees a
/// [`CurrentUser`] in its request extensions, otherwise the browser is
/// redirected to the login page with the original path as `next`.
pub async fn require_login(request: Request<Body>, next: Next) -> Response {
    match require_login_inner(request, next).await {
        Ok(response) => response,
        Err(e) => e.into_response(),
    }
}

/// Best-effort lookup of the logged-in username for pages outside the
/// gate, used only to decorate the navigation bar.
pub fn current_username(
    context: &AppContext,
    headers: &axum::http::HeaderMap,
) -> Option<String> {
    let token = cookies::get_cookie(headers, config::SESSION_COOKIE)?;
    let sessions = context.sessions().ok()?;
    sessions.get(&token).map(|s| s.username)
}

async fn require_login_inner(
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, WebError> {
    let context = request
        .extensions()
        .get::<AppContext>()
        .cloned()
        .ok_or_else(|| WebError::Internal("application context missing from request".into()))?;

    let token = cookies::get_cookie(request.headers(), config::SESSION_COOKIE);
    let session = match token {
        Some(ref token) => context.sessions()?.get(token),
        None => None,
    };

    let Some(session) = session else {
        return Err(WebError::LoginRequired {
            next: request.uri().path().to_string(),
        });
    };

    request.extensions_mut().insert(CurrentUser {
        account_id: session.account_id,
        username: session.username,
    });
    Ok(next.run(request).await)
}
