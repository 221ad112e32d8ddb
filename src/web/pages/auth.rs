//! Registration, login and logout.

use axum::extract::{Form, Query, State};
use axum::http::header::HeaderMap;
use axum::response::{Html, IntoResponse, Redirect, Response};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::password;
use crate::config;
use crate::db::{repository, DatabaseError};
use crate::models::Account;
use crate::web::cookies;
use crate::web::error::WebError;
use crate::web::render::{self, escape};
use crate::web::types::AppContext;

#[derive(Debug, Default, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password1: String,
    #[serde(default)]
    pub password2: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    pub next: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    pub next: Option<String>,
}

pub async fn register_form() -> Html<String> {
    Html(register_page("", &[]))
}

pub async fn register(
    State(context): State<AppContext>,
    Form(form): Form<RegisterForm>,
) -> Result<Response, WebError> {
    let username = form.username.trim().to_string();

    let mut errors = Vec::new();
    if username.is_empty() {
        errors.push("Username is required.".to_string());
    }
    errors.extend(password::validate_new_password(
        &username,
        &form.password1,
        &form.password2,
    ));

    if !errors.is_empty() {
        return Ok(Html(register_page(&username, &errors)).into_response());
    }

    let now = Utc::now().naive_utc();
    let account = Account {
        id: Uuid::new_v4(),
        username: username.clone(),
        password_hash: password::hash_password(&form.password1),
        email: None,
        image_path: None,
        created_at: now,
        updated_at: now,
    };
    let inserted = {
        let conn = context.db()?;
        repository::insert_account(&conn, &account)
    };
    match inserted {
        Ok(()) => {}
        // The UNIQUE column decides taken usernames, which also covers
        // two submissions of the same name racing each other
        Err(DatabaseError::ConstraintViolation(_)) => {
            return Ok(Html(register_page(
                &username,
                &["A user with that username already exists.".to_string()],
            ))
            .into_response());
        }
        Err(e) => return Err(e.into()),
    }
    tracing::info!(%username, "account registered");

    let mut response = Redirect::to("/login").into_response();
    cookies::set_flash(
        &mut response,
        &format!("Your Account has been created Successfully. Login to view the site {username}!"),
    );
    Ok(response)
}

pub async fn login_form(Query(query): Query<LoginQuery>, headers: HeaderMap) -> Response {
    let flash = cookies::peek_flash(&headers);
    let mut response =
        Html(login_page(flash.as_deref(), None, "", query.next.as_deref())).into_response();
    if flash.is_some() {
        cookies::clear_flash(&mut response);
    }
    response
}

pub async fn login(
    State(context): State<AppContext>,
    Form(form): Form<LoginForm>,
) -> Result<Response, WebError> {
    let account = {
        let conn = context.db()?;
        repository::get_account_by_username(&conn, form.username.trim())?
    };

    let verified = match &account {
        Some(account) => password::verify_password(&form.password, &account.password_hash),
        None => false,
    };
    let Some(account) = account.filter(|_| verified) else {
        tracing::debug!(username = %form.username, "failed login attempt");
        let error = "Please enter a correct username and password.";
        return Ok(Html(login_page(
            None,
            Some(error),
            form.username.trim(),
            form.next.as_deref(),
        ))
        .into_response());
    };

    let token = context
        .sessions()?
        .create(account.id, account.username.clone());
    tracing::info!(username = %account.username, "login");

    let mut response = Redirect::to(safe_next(form.next.as_deref())).into_response();
    cookies::set_session_cookie(&mut response, &token);
    Ok(response)
}

pub async fn logout(
    State(context): State<AppContext>,
    headers: HeaderMap,
) -> Result<Response, WebError> {
    if let Some(token) = cookies::get_cookie(&headers, config::SESSION_COOKIE) {
        context.sessions()?.destroy(&token);
    }
    let mut response = Redirect::to("/login").into_response();
    cookies::clear_session_cookie(&mut response);
    Ok(response)
}

/// Only same-site absolute paths are honoured as a post-login target.
fn safe_next(next: Option<&str>) -> &str {
    match next {
        Some(path) if path.starts_with('/') && !path.starts_with("//") => path,
        _ => "/",
    }
}

fn register_page(username: &str, errors: &[String]) -> String {
    let body = format!(
        r#"<h1>Register</h1>
{errors}
<form method="post" action="/register">
{username}
<label>Password
  <input type="password" name="password1" value="">
</label>
<label>Password confirmation
  <input type="password" name="password2" value="">
</label>
<button type="submit">Sign up</button>
</form>
<p>Already have an account? <a href="/login">Login</a></p>"#,
        errors = render::error_list(errors),
        username = render::text_input("Username", "username", "text", username),
    );
    render::layout("Register", None, None, &body)
}

fn login_page(
    flash: Option<&str>,
    error: Option<&str>,
    username: &str,
    next: Option<&str>,
) -> String {
    let errors = match error {
        Some(e) => render::error_list(&[e.to_string()]),
        None => String::new(),
    };
    let next_field = match next {
        Some(path) => format!(
            r#"<input type="hidden" name="next" value="{}">"#,
            escape(path)
        ),
        None => String::new(),
    };
    let body = format!(
        r#"<h1>Login</h1>
{errors}
<form method="post" action="/login">
{username}
<label>Password
  <input type="password" name="password" value="">
</label>
{next_field}
<button type="submit">Login</button>
</form>
<p>Need an account? <a href="/register">Register</a></p>"#,
        username = render::text_input("Username", "username", "text", username),
    );
    render::layout("Login", None, flash, &body)
}
