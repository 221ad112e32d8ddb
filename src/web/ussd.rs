//! USSD gateway callback.
//!
//! The gateway POSTs `application/x-www-form-urlencoded` requests and
//! renders whatever plain text comes back on the subscriber's handset.
//! Replies starting with `CON` keep the session open for further input;
//! `END` closes it.

use axum::extract::{Form, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use rusqlite::Connection;
use serde::Deserialize;

use crate::config;
use crate::db::{repository, DatabaseError};
use crate::web::error::WebError;
use crate::web::types::AppContext;

/// Gateway request fields. `text` accumulates the subscriber's inputs
/// joined with `*`; it is absent on the opening request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UssdRequest {
    pub session_id: String,
    pub service_code: String,
    pub phone_number: String,
    #[serde(default)]
    pub text: String,
}

pub async fn callback(
    State(context): State<AppContext>,
    Form(request): Form<UssdRequest>,
) -> Result<Response, WebError> {
    tracing::debug!(
        session_id = %request.session_id,
        service_code = %request.service_code,
        "ussd request"
    );
    let reply = {
        let conn = context.db()?;
        respond(&conn, &request)?
    };
    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        reply,
    )
        .into_response())
}

fn respond(conn: &Connection, request: &UssdRequest) -> Result<String, DatabaseError> {
    // Only the latest input matters for this single-level menu
    let choice = request.text.rsplit('*').next().unwrap_or("").trim();
    match choice {
        "" => Ok(format!(
            "CON Welcome to {}.\n1. Check my patient registration\n2. List our doctors",
            config::APP_NAME
        )),
        "1" => registration_status(conn, &request.phone_number),
        "2" => doctor_directory(conn),
        _ => Ok("END Invalid choice. Please try again.".to_string()),
    }
}

fn registration_status(conn: &Connection, phone_number: &str) -> Result<String, DatabaseError> {
    match repository::get_patient_by_phone(conn, phone_number.trim())? {
        Some(patient) => Ok(format!(
            "END Dear {}, you are registered as a patient. We will reach you on this number about upcoming appointments.",
            patient.full_name()
        )),
        None => Ok(format!(
            "END This phone number is not registered with {}. Please visit the front desk to register.",
            config::APP_NAME
        )),
    }
}

/// Handset screens are small; longer directories get a count tail.
const DIRECTORY_LIMIT: usize = 5;

fn doctor_directory(conn: &Connection) -> Result<String, DatabaseError> {
    let doctors = repository::list_doctors(conn)?;
    if doctors.is_empty() {
        return Ok("END No doctors are currently listed.".to_string());
    }
    let mut reply = String::from("END Our doctors:");
    for doctor in doctors.iter().take(DIRECTORY_LIMIT) {
        reply.push_str(&format!("\n{} - {}", doctor.full_name(), doctor.phone_number));
    }
    if doctors.len() > DIRECTORY_LIMIT {
        reply.push_str(&format!("\n...and {} more", doctors.len() - DIRECTORY_LIMIT));
    }
    Ok(reply)
}
