//! Cookie plumbing: the session cookie and the one-shot flash cookie.
//!
//! Flash messages (set on one response, shown on the next page view)
//! travel base64-encoded in a short-lived cookie so they survive the
//! redirect after registration without requiring a session.

use axum::http::header::{HeaderMap, HeaderValue, SET_COOKIE};
use axum::response::Response;
use base64::Engine;

use crate::config;

const FLASH_MAX_AGE_SECS: u32 = 60;
const SESSION_MAX_AGE_SECS: u32 = 24 * 60 * 60;

fn b64() -> base64::engine::GeneralPurpose {
    base64::engine::general_purpose::URL_SAFE_NO_PAD
}

/// Extract a cookie value from the request headers.
pub fn get_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    let raw = headers.get("cookie")?.to_str().ok()?;
    for pair in raw.split(';') {
        if let Some((key, value)) = pair.trim().split_once('=') {
            if key == name {
                return Some(value.to_string());
            }
        }
    }
    None
}

/// Append a Set-Cookie header to a response. Values that do not form a
/// valid header are dropped silently.
fn append_set_cookie(response: &mut Response, value: String) {
    if let Ok(header) = HeaderValue::from_str(&value) {
        response.headers_mut().append(SET_COOKIE, header);
    }
}

pub fn set_session_cookie(response: &mut Response, token: &str) {
    append_set_cookie(
        response,
        format!(
            "{}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={SESSION_MAX_AGE_SECS}",
            config::SESSION_COOKIE
        ),
    );
}

pub fn clear_session_cookie(response: &mut Response) {
    append_set_cookie(
        response,
        format!("{}=; Path=/; HttpOnly; Max-Age=0", config::SESSION_COOKIE),
    );
}

/// Queue a flash message for the next page view.
pub fn set_flash(response: &mut Response, message: &str) {
    append_set_cookie(
        response,
        format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={FLASH_MAX_AGE_SECS}",
            config::FLASH_COOKIE,
            b64().encode(message),
        ),
    );
}

/// Read the pending flash message, if any.
pub fn peek_flash(headers: &HeaderMap) -> Option<String> {
    let encoded = get_cookie(headers, config::FLASH_COOKIE)?;
    let bytes = b64().decode(encoded).ok()?;
    String::from_utf8(bytes).ok()
}

/// Expire the flash cookie so the message shows only once.
pub fn clear_flash(response: &mut Response) {
    append_set_cookie(
        response,
        format!("{}=; Path=/; HttpOnly; Max-Age=0", config::FLASH_COOKIE),
    );
}
