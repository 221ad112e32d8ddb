//! Account profile page: username, email and the profile picture.
//!
//! The update is all-or-nothing. Both the account fields and the
//! uploaded image must pass validation before anything is persisted.

use std::path::Path;

use axum::extract::{Extension, Multipart, State};
use axum::response::{Html, IntoResponse, Response};
use chrono::Utc;
use rusqlite::Connection;

use crate::db::repository;
use crate::models::Account;
use crate::web::error::WebError;
use crate::web::pages::entity::is_valid_email;
use crate::web::render::{self, escape};
use crate::web::types::{AppContext, CurrentUser};

const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

struct Upload {
    file_name: String,
    declared_type: Option<String>,
    data: Vec<u8>,
}

pub async fn show(
    Extension(user): Extension<CurrentUser>,
    State(context): State<AppContext>,
) -> Result<Html<String>, WebError> {
    let account = {
        let conn = context.db()?;
        repository::get_account(&conn, &user.account_id)?
    }
    .ok_or_else(|| WebError::NotFound(format!("no account for session of {}", user.username)))?;

    Ok(Html(profile_page(&account, None, &[])))
}

pub async fn update(
    Extension(user): Extension<CurrentUser>,
    State(context): State<AppContext>,
    mut multipart: Multipart,
) -> Result<Response, WebError> {
    let mut username = String::new();
    let mut email = String::new();
    let mut upload: Option<Upload> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| WebError::Internal(format!("multipart read failed: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("username") => {
                username = field
                    .text()
                    .await
                    .map_err(|e| WebError::Internal(format!("multipart read failed: {e}")))?;
            }
            Some("email") => {
                email = field
                    .text()
                    .await
                    .map_err(|e| WebError::Internal(format!("multipart read failed: {e}")))?;
            }
            Some("image") => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let declared_type = field.content_type().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| WebError::Internal(format!("multipart read failed: {e}")))?;
                // Browsers submit an empty file part when nothing was picked
                if !data.is_empty() {
                    upload = Some(Upload {
                        file_name,
                        declared_type,
                        data: data.to_vec(),
                    });
                }
            }
            _ => {}
        }
    }

    let username = username.trim().to_string();
    let email = email.trim().to_string();

    let mut account = {
        let conn = context.db()?;
        repository::get_account(&conn, &user.account_id)?
    }
    .ok_or_else(|| WebError::NotFound(format!("no account for session of {}", user.username)))?;

    let mut errors = Vec::new();
    if username.is_empty() {
        errors.push("Username is required.".to_string());
    } else if username != account.username {
        let taken = {
            let conn = context.db()?;
            repository::get_account_by_username(&conn, &username)?.is_some()
        };
        if taken {
            errors.push("A user with that username already exists.".to_string());
        }
    }
    if !email.is_empty() && !is_valid_email(&email) {
        errors.push("Enter a valid email address.".to_string());
    }
    let extension = match &upload {
        Some(upload) => match image_extension(upload) {
            Some(ext) if upload.data.len() <= MAX_IMAGE_BYTES => Some(ext),
            Some(_) => {
                errors.push("The image is too large (5 MB maximum).".to_string());
                None
            }
            None => {
                errors.push("Upload a JPEG or PNG image.".to_string());
                None
            }
        },
        None => None,
    };

    if !errors.is_empty() {
        // Show the submitted values back, but persist nothing
        account.username = username;
        account.email = (!email.is_empty()).then_some(email);
        return Ok(Html(profile_page(&account, None, &errors)).into_response());
    }

    account.username = username;
    // A blank email clears the stored address
    account.email = (!email.is_empty()).then_some(email);
    {
        let conn = context.db()?;
        persist(&conn, &context.media_dir, &mut account, upload.as_ref().zip(extension))?;
    }
    tracing::info!(username = %account.username, "profile updated");

    // Success re-renders the page in place, no redirect
    Ok(Html(profile_page(
        &account,
        Some("Your Profile has been updated!"),
        &[],
    ))
    .into_response())
}

/// Write the image (if any) and update the account row together. The
/// image file is removed again when the row update fails.
fn persist(
    conn: &Connection,
    media_dir: &Path,
    account: &mut Account,
    upload: Option<(&Upload, &'static str)>,
) -> Result<(), WebError> {
    let mut written = None;
    if let Some((upload, extension)) = upload {
        let file_name = format!("{}.{extension}", account.id);
        let path = media_dir.join(&file_name);
        std::fs::create_dir_all(media_dir)
            .and_then(|_| std::fs::write(&path, &upload.data))
            .map_err(|e| WebError::Internal(format!("saving profile image failed: {e}")))?;
        account.image_path = Some(file_name);
        written = Some(path);
    }
    account.updated_at = Utc::now().naive_utc();
    if let Err(e) = repository::update_account(conn, account) {
        if let Some(path) = written {
            let _ = std::fs::remove_file(path);
        }
        return Err(e.into());
    }
    Ok(())
}

/// Accept JPEG and PNG, keyed off the declared content type with the
/// file name as a fallback.
fn image_extension(upload: &Upload) -> Option<&'static str> {
    let mime = match upload.declared_type.clone() {
        Some(declared) => declared,
        None => mime_guess::from_path(&upload.file_name)
            .first()?
            .to_string(),
    };
    match mime.as_str() {
        "image/jpeg" => Some("jpg"),
        "image/png" => Some("png"),
        _ => None,
    }
}

fn profile_page(account: &Account, flash: Option<&str>, errors: &[String]) -> String {
    let picture = match &account.image_path {
        Some(path) => format!(
            r#"<p><img src="/media/{}" alt="Profile picture" width="120"></p>"#,
            escape(path)
        ),
        None => String::new(),
    };
    let body = format!(
        r#"<h1>Profile</h1>
{errors}
{picture}
<form method="post" action="/profile" enctype="multipart/form-data">
{username}
{email}
<label>Profile picture
  <input type="file" name="image" accept="image/jpeg,image/png">
</label>
<button type="submit">Update</button>
</form>"#,
        errors = render::error_list(errors),
        username = render::text_input("Username", "username", "text", &account.username),
        email = render::text_input(
            "Email",
            "email",
            "email",
            account.email.as_deref().unwrap_or("")
        ),
    );
    render::layout("Profile", Some(&account.username), flash, &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(file_name: &str, declared: Option<&str>) -> Upload {
        Upload {
            file_name: file_name.into(),
            declared_type: declared.map(str::to_string),
            data: vec![0u8; 16],
        }
    }

    #[test]
    fn declared_content_type_wins() {
        assert_eq!(
            image_extension(&upload("whatever.bin", Some("image/png"))),
            Some("png")
        );
        assert_eq!(
            image_extension(&upload("photo.jpg", Some("image/jpeg"))),
            Some("jpg")
        );
    }

    #[test]
    fn file_name_guess_is_the_fallback() {
        assert_eq!(image_extension(&upload("photo.png", None)), Some("png"));
        assert_eq!(image_extension(&upload("photo.jpeg", None)), Some("jpg"));
    }

    #[test]
    fn non_image_uploads_are_rejected() {
        assert_eq!(image_extension(&upload("notes.pdf", None)), None);
        assert_eq!(
            image_extension(&upload("x", Some("application/octet-stream"))),
            None
        );
        assert_eq!(image_extension(&upload("", None)), None);
    }

    fn test_account() -> Account {
        let now = Utc::now().naive_utc();
        Account {
            id: uuid::Uuid::new_v4(),
            username: "amina".into(),
            password_hash: "x".into(),
            email: None,
            image_path: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn persist_writes_image_and_updates_the_row() {
        let conn = crate::db::open_memory_database().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let mut account = test_account();
        repository::insert_account(&conn, &account).unwrap();
        let image = upload("p.png", Some("image/png"));

        persist(&conn, dir.path(), &mut account, Some((&image, "png"))).unwrap();

        let file_name = format!("{}.png", account.id);
        assert!(dir.path().join(&file_name).exists());
        let stored = repository::get_account(&conn, &account.id).unwrap().unwrap();
        assert_eq!(stored.image_path.as_deref(), Some(file_name.as_str()));
    }

    #[test]
    fn failed_row_update_removes_the_written_image() {
        let conn = crate::db::open_memory_database().unwrap();
        let dir = tempfile::tempdir().unwrap();
        // Account was never inserted, so the row update cannot succeed
        let mut account = test_account();
        let image = upload("p.png", Some("image/png"));

        let result = persist(&conn, dir.path(), &mut account, Some((&image, "png")));

        assert!(result.is_err());
        assert!(!dir.path().join(format!("{}.png", account.id)).exists());
    }
}
