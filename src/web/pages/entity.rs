//! Shared form handling and page building for the two managed
//! directories (patients and doctors). The route handlers stay explicit
//! per entity; only the presentation scaffolding is common.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::models::{Doctor, Patient};
use crate::web::render::{self, escape};

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern compiles"));

/// Address shape check shared by the entity forms and the profile page.
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value)
}

/// Parse a route id, mapping malformed and unknown values alike to a
/// not-found response.
pub fn parse_id(kind: &str, raw: &str) -> Result<uuid::Uuid, crate::web::error::WebError> {
    uuid::Uuid::parse_str(raw)
        .map_err(|_| crate::web::error::WebError::NotFound(format!("no {kind} with id {raw}")))
}

/// The five editable fields, shared by create and update forms.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct PersonForm {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub username: String,
}

impl PersonForm {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let required = [
            ("First name", &self.first_name),
            ("Last name", &self.last_name),
            ("Phone number", &self.phone_number),
            ("Email", &self.email),
            ("Username", &self.username),
        ];
        for (label, value) in required {
            if value.trim().is_empty() {
                errors.push(format!("{label} is required."));
            }
        }
        if !self.email.trim().is_empty() && !is_valid_email(self.email.trim()) {
            errors.push("Enter a valid email address.".to_string());
        }
        errors
    }

    pub fn from_patient(patient: &Patient) -> Self {
        Self {
            first_name: patient.first_name.clone(),
            last_name: patient.last_name.clone(),
            phone_number: patient.phone_number.clone(),
            email: patient.email.clone(),
            username: patient.username.clone(),
        }
    }

    pub fn from_doctor(doctor: &Doctor) -> Self {
        Self {
            first_name: doctor.first_name.clone(),
            last_name: doctor.last_name.clone(),
            phone_number: doctor.phone_number.clone(),
            email: doctor.email.clone(),
            username: doctor.username.clone(),
        }
    }
}

/// One row of a directory listing.
pub struct PersonView {
    pub id: String,
    pub full_name: String,
    pub phone_number: String,
    pub email: String,
    pub username: String,
}

impl From<&Patient> for PersonView {
    fn from(p: &Patient) -> Self {
        Self {
            id: p.id.to_string(),
            full_name: p.full_name(),
            phone_number: p.phone_number.clone(),
            email: p.email.clone(),
            username: p.username.clone(),
        }
    }
}

impl From<&Doctor> for PersonView {
    fn from(d: &Doctor) -> Self {
        Self {
            id: d.id.to_string(),
            full_name: d.full_name(),
            phone_number: d.phone_number.clone(),
            email: d.email.clone(),
            username: d.username.clone(),
        }
    }
}

/// Static page wording and routes for one directory.
pub struct EntityPages {
    pub singular: &'static str,
    pub base: &'static str,
    pub add_title: &'static str,
    pub list_title: &'static str,
    pub update_title: &'static str,
    pub delete_title: &'static str,
}

pub const PATIENT_PAGES: EntityPages = EntityPages {
    singular: "patient",
    base: "/patients",
    add_title: "Add New Patient",
    list_title: "Patients",
    update_title: "Update Patient",
    delete_title: "Delete Patient",
};

pub const DOCTOR_PAGES: EntityPages = EntityPages {
    singular: "doctor",
    base: "/doctors",
    add_title: "Add New Doctor",
    list_title: "Doctors",
    update_title: "Update Doctor",
    delete_title: "Delete Doctor",
};

impl EntityPages {
    /// Create or update form, re-rendered with errors and the submitted
    /// values when validation fails.
    pub fn form_page(
        &self,
        title: &str,
        action: &str,
        user: Option<&str>,
        form: &PersonForm,
        errors: &[String],
    ) -> String {
        let body = format!(
            r#"<h1>{title}</h1>
{errors}
<form method="post" action="{action}">
{first}
{last}
{phone}
{email}
{username}
<button type="submit">Save</button>
<a href="{cancel}">Cancel</a>
</form>"#,
            title = escape(title),
            errors = render::error_list(errors),
            first = render::text_input("First name", "first_name", "text", &form.first_name),
            last = render::text_input("Last name", "last_name", "text", &form.last_name),
            phone = render::text_input("Phone number", "phone_number", "text", &form.phone_number),
            email = render::text_input("Email", "email", "email", &form.email),
            username = render::text_input("Username", "username", "text", &form.username),
            cancel = self.base,
        );
        render::layout(title, user, None, &body)
    }

    /// Directory listing with per-row update and delete links.
    pub fn list_page(&self, user: Option<&str>, rows: &[PersonView]) -> String {
        let body_rows: String = rows
            .iter()
            .map(|row| {
                format!(
                    r#"<tr>
  <td>{name}</td>
  <td>{phone}</td>
  <td>{email}</td>
  <td>{username}</td>
  <td><a href="{base}/{id}/edit">Update</a> <a href="{base}/{id}/delete">Delete</a></td>
</tr>"#,
                    name = escape(&row.full_name),
                    phone = escape(&row.phone_number),
                    email = escape(&row.email),
                    username = escape(&row.username),
                    base = self.base,
                    id = row.id,
                )
            })
            .collect();
        let body = format!(
            r#"<h1>{title}</h1>
<p><a href="{base}/new">{add_title}</a></p>
<table>
<thead><tr><th>Name</th><th>Phone</th><th>Email</th><th>Username</th><th></th></tr></thead>
<tbody>
{body_rows}
</tbody>
</table>"#,
            title = self.list_title,
            base = self.base,
            add_title = self.add_title,
        );
        render::layout(self.list_title, user, None, &body)
    }

    /// The exact confirmation wording shown before a delete.
    pub fn delete_message(&self, full_name: &str) -> String {
        format!(
            "Are you sure you want to delete the {} \"{}\"",
            self.singular, full_name
        )
    }

    /// Delete confirmation page for one record.
    pub fn confirm_delete_page(&self, user: Option<&str>, id: &str, full_name: &str) -> String {
        let body = format!(
            r#"<h1>{title}</h1>
<p>{message}</p>
<form method="post" action="{base}/{id}/delete">
<button type="submit">Confirm</button>
<a href="{base}">Cancel</a>
</form>"#,
            title = self.delete_title,
            message = escape(&self.delete_message(full_name)),
            base = self.base,
        );
        render::layout(self.delete_title, user, None, &body)
    }
}
