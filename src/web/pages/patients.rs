//! Patient directory: list, create, update and delete.

use axum::extract::{Form, Path, State};
use axum::http::header::HeaderMap;
use axum::response::{Html, IntoResponse, Redirect, Response};
use uuid::Uuid;

use crate::db::repository;
use crate::models::Patient;
use crate::web::error::WebError;
use crate::web::middleware::current_username;
use crate::web::pages::entity::{parse_id, PersonForm, PersonView, PATIENT_PAGES};
use crate::web::types::AppContext;

pub async fn list(
    State(context): State<AppContext>,
    headers: HeaderMap,
) -> Result<Html<String>, WebError> {
    let patients = {
        let conn = context.db()?;
        repository::list_patients(&conn)?
    };
    let rows: Vec<PersonView> = patients.iter().map(PersonView::from).collect();
    let user = current_username(&context, &headers);
    Ok(Html(PATIENT_PAGES.list_page(user.as_deref(), &rows)))
}

pub async fn create_form(State(context): State<AppContext>, headers: HeaderMap) -> Html<String> {
    let user = current_username(&context, &headers);
    Html(PATIENT_PAGES.form_page(
        PATIENT_PAGES.add_title,
        "/patients/new",
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
        return Ok(Html(PATIENT_PAGES.form_page(
            PATIENT_PAGES.add_title,
            "/patients/new",
            None,
            &form,
            &errors,
        ))
        .into_response());
    }

    let patient = {
        let conn = context.db()?;
        let patient = patient_from_form(Uuid::new_v4(), &form, &conn)?;
        repository::insert_patient(&conn, &patient)?;
        patient
    };
    tracing::info!(patient_id = %patient.id, "patient created");
    Ok(Redirect::to("/patients").into_response())
}

pub async fn update_form(
    State(context): State<AppContext>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Html<String>, WebError> {
    let id = parse_id("patient", &id)?;
    let patient = {
        let conn = context.db()?;
        repository::get_patient(&conn, &id)?
    }
    .ok_or_else(|| WebError::NotFound(format!("no patient with id {id}")))?;

    let user = current_username(&context, &headers);
    Ok(Html(PATIENT_PAGES.form_page(
        PATIENT_PAGES.update_title,
        &format!("/patients/{id}/edit"),
        user.as_deref(),
        &PersonForm::from_patient(&patient),
        &[],
    )))
}

pub async fn update(
    State(context): State<AppContext>,
    Path(id): Path<String>,
    Form(form): Form<PersonForm>,
) -> Result<Response, WebError> {
    let id = parse_id("patient", &id)?;
    {
        let conn = context.db()?;
        repository::get_patient(&conn, &id)?
    }
    .ok_or_else(|| WebError::NotFound(format!("no patient with id {id}")))?;

    let errors = form.validate();
    if !errors.is_empty() {
        return Ok(Html(PATIENT_PAGES.form_page(
            PATIENT_PAGES.update_title,
            &format!("/patients/{id}/edit"),
            None,
            &form,
            &errors,
        ))
        .into_response());
    }

    {
        let conn = context.db()?;
        let patient = patient_from_form(id, &form, &conn)?;
        repository::update_patient(&conn, &patient)?;
    }
    tracing::info!(patient_id = %id, "patient updated");
    Ok(Redirect::to("/patients").into_response())
}

pub async fn confirm_delete(
    State(context): State<AppContext>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Html<String>, WebError> {
    let id = parse_id("patient", &id)?;
    let patient = {
        let conn = context.db()?;
        repository::get_patient(&conn, &id)?
    }
    .ok_or_else(|| WebError::NotFound(format!("no patient with id {id}")))?;

    let user = current_username(&context, &headers);
    Ok(Html(PATIENT_PAGES.confirm_delete_page(
        user.as_deref(),
        &id.to_string(),
        &patient.full_name(),
    )))
}

pub async fn destroy(
    State(context): State<AppContext>,
    Path(id): Path<String>,
) -> Result<Response, WebError> {
    let id = parse_id("patient", &id)?;
    {
        let conn = context.db()?;
        repository::delete_patient(&conn, &id)?;
    }
    tracing::info!(patient_id = %id, "patient deleted");
    Ok(Redirect::to("/patients").into_response())
}

/// Build the stored record from validated form fields, resolving the
/// owning account from the submitted username.
fn patient_from_form(
    id: Uuid,
    form: &PersonForm,
    conn: &rusqlite::Connection,
) -> Result<Patient, WebError> {
    let username = form.username.trim().to_string();
    let account_id = repository::account_id_for_username(conn, &username)?;
    Ok(Patient {
        id,
        first_name: form.first_name.trim().to_string(),
        last_name: form.last_name.trim().to_string(),
        phone_number: form.phone_number.trim().to_string(),
        email: form.email.trim().to_string(),
        username,
        account_id,
    })
}
