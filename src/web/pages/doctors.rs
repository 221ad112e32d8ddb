//! Doctor directory: list, create, update and delete.

use axum::extract::{Form, Path, State};
use axum::http::header::HeaderMap;
use axum::response::{Html, IntoResponse, Redirect, Response};
use uuid::Uuid;

use crate::db::repository;
use crate::models::Doctor;
use crate::web::error::WebError;
use crate::web::middleware::current_username;
use crate::web::pages::entity::{parse_id, PersonForm, PersonView, DOCTOR_PAGES};
use crate::web::types::AppContext;

pub async fn list(
    State(context): State<AppContext>,
    headers: HeaderMap,
) -> Result<Html<String>, WebError> {
    let doctors = {
        let conn = context.db()?;
        repository::list_doctors(&conn)?
    };
    let rows: Vec<PersonView> = doctors.iter().map(PersonView::from).collect();
    let user = current_username(&context, &headers);
    Ok(Html(DOCTOR_PAGES.list_page(user.as_deref(), &rows)))
}

pub async fn create_form(State(context): State<AppContext>, headers: HeaderMap) -> Html<String> {
    let user = current_username(&context, &headers);
    Html(DOCTOR_PAGES.form_page(
        DOCTOR_PAGES.add_title,
        "/doctors/new",
        user.as_deref(),
        &PersonForm::default(),
        &[],
    ))
}

pub async fn create(
    State(context): State<AppContext>,
    Form(form): Form<PersonForm>,
) -> Result<Response, WebError> {
    let errors = form.validate();
    if !errors.is_empty() {
        return Ok(Html(DOCTOR_PAGES.form_page(
            DOCTOR_PAGES.add_title,
            "/doctors/new",
            None,
            &form,
            &errors,
        ))
        .into_response());
    }

    let doctor = {
        let conn = context.db()?;
        let doctor = doctor_from_form(Uuid::new_v4(), &form, &conn)?;
        repository::insert_doctor(&conn, &doctor)?;
        doctor
    };
    tracing::info!(doctor_id = %doctor.id, "doctor created");
    Ok(Redirect::to("/doctors").into_response())
}

pub async fn update_form(
    State(context): State<AppContext>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Html<String>, WebError> {
    let id = parse_id("doctor", &id)?;
    let doctor = {
        let conn = context.db()?;
        repository::get_doctor(&conn, &id)?
    }
    .ok_or_else(|| WebError::NotFound(format!("no doctor with id {id}")))?;

    let user = current_username(&context, &headers);
    Ok(Html(DOCTOR_PAGES.form_page(
        DOCTOR_PAGES.update_title,
        &format!("/doctors/{id}/edit"),
        user.as_deref(),
        &PersonForm::from_doctor(&doctor),
        &[],
    )))
}

pub async fn update(
    State(context): State<AppContext>,
    Path(id): Path<String>,
    Form(form): Form<PersonForm>,
) -> Result<Response, WebError> {
    let id = parse_id("doctor", &id)?;
    {
        let conn = context.db()?;
        repository::get_doctor(&conn, &id)?
    }
    .ok_or_else(|| WebError::NotFound(format!("no doctor with id {id}")))?;

    let errors = form.validate();
    if !errors.is_empty() {
        return Ok(Html(DOCTOR_PAGES.form_page(
            DOCTOR_PAGES.update_title,
            &format!("/doctors/{id}/edit"),
            None,
            &form,
            &errors,
        ))
        .into_response());
    }

    {
        let conn = context.db()?;
        let doctor = doctor_from_form(id, &form, &conn)?;
        repository::update_doctor(&conn, &doctor)?;
    }
    tracing::info!(doctor_id = %id, "doctor updated");
    Ok(Redirect::to("/doctors").into_response())
}

pub async fn confirm_delete(
    State(context): State<AppContext>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Html<String>, WebError> {
    let id = parse_id("doctor", &id)?;
    let doctor = {
        let conn = context.db()?;
        repository::get_doctor(&conn, &id)?
    }
    .ok_or_else(|| WebError::NotFound(format!("no doctor with id {id}")))?;

    let user = current_username(&context, &headers);
    Ok(Html(DOCTOR_PAGES.confirm_delete_page(
        user.as_deref(),
        &id.to_string(),
        &doctor.full_name(),
    )))
}

pub async fn destroy(
    State(context): State<AppContext>,
    Path(id): Path<String>,
) -> Result<Response, WebError> {
    let id = parse_id("doctor", &id)?;
    {
        let conn = context.db()?;
        repository::delete_doctor(&conn, &id)?;
    }
    tracing::info!(doctor_id = %id, "doctor deleted");
    Ok(Redirect::to("/doctors").into_response())
}

fn doctor_from_form(
    id: Uuid,
    form: &PersonForm,
    conn: &rusqlite::Connection,
) -> Result<Doctor, WebError> {
    let username = form.username.trim().to_string();
    let account_id = repository::account_id_for_username(conn, &username)?;
    Ok(Doctor {
        id,
        first_name: form.first_name.trim().to_string(),
        last_name: form.last_name.trim().to_string(),
        phone_number: form.phone_number.trim().to_string(),
        email: form.email.trim().to_string(),
        username,
        account_id,
    })
}
