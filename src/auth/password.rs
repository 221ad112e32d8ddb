//! Password hashing and the account-creation validator set.
//!
//! Hashes are PBKDF2-HMAC-SHA256 with a per-account random salt, stored
//! as `pbkdf2_sha256$<iterations>$<salt b64>$<digest b64>`.

use base64::Engine;
use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use subtle::ConstantTimeEq;

pub const PBKDF2_ITERATIONS: u32 = 600_000;
pub const DIGEST_LENGTH: usize = 32;
pub const SALT_LENGTH: usize = 16;

const SCHEME: &str = "pbkdf2_sha256";
const MIN_PASSWORD_LENGTH: usize = 8;

/// Passwords rejected outright regardless of the other rules.
const COMMON_PASSWORDS: &[&str] = &[
    "password", "password1", "password123", "passw0rd", "12345678", "123456789", "1234567890",
    "qwerty123", "qwertyuiop", "iloveyou", "sunshine", "princess", "football", "baseball",
    "superman", "welcome1", "admin123", "letmein1", "trustno1", "dragon123", "monkey123",
    "shadow123", "master123", "hospital", "doctor123", "patient123", "changeme", "abc12345",
];

fn b64() -> base64::engine::GeneralPurpose {
    base64::engine::general_purpose::STANDARD_NO_PAD
}

/// Hash a password with a fresh random salt.
pub fn hash_password(password: &str) -> String {
    use rand::RngCore;
    let mut salt = [0u8; SALT_LENGTH];
    rand::thread_rng().fill_bytes(&mut salt);

    let mut digest = [0u8; DIGEST_LENGTH];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), &salt, PBKDF2_ITERATIONS, &mut digest);

    format!(
        "{SCHEME}${PBKDF2_ITERATIONS}${}${}",
        b64().encode(salt),
        b64().encode(digest),
    )
}

/// Verify a password against a stored hash. Malformed stored values
/// verify as false rather than erroring.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let mut parts = stored.split('$');
    let (Some(scheme), Some(iterations), Some(salt), Some(digest)) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return false;
    };
    if scheme != SCHEME || parts.next().is_some() {
        return false;
    }
    let Ok(iterations) = iterations.parse::<u32>() else {
        return false;
    };
    let (Ok(salt), Ok(expected)) = (b64().decode(salt), b64().decode(digest)) else {
        return false;
    };

    let mut candidate = vec![0u8; expected.len()];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), &salt, iterations, &mut candidate);

    candidate.ct_eq(&expected).into()
}

/// Run the account-creation validator set. Returns an empty vec when the
/// password is acceptable.
pub fn validate_new_password(username: &str, password: &str, confirm: &str) -> Vec<String> {
    let mut errors = Vec::new();

    if password != confirm {
        errors.push("The two password fields didn't match.".to_string());
    }
    if too_similar_to_username(username, password) {
        errors.push("The password is too similar to the username.".to_string());
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        errors.push(format!(
            "This password is too short. It must contain at least {MIN_PASSWORD_LENGTH} characters."
        ));
    }
    if COMMON_PASSWORDS.contains(&password.to_lowercase().as_str()) {
        errors.push("This password is too common.".to_string());
    }
    if !password.is_empty() && password.chars().all(|c| c.is_ascii_digit()) {
        errors.push("This password is entirely numeric.".to_string());
    }

    errors
}

/// Case-insensitive containment in either direction stands in for the
/// original similarity ratio; it always catches password == username.
fn too_similar_to_username(username: &str, password: &str) -> bool {
    if username.len() < 3 || password.is_empty() {
        return false;
    }
    let username = username.to_lowercase();
    let password = password.to_lowercase();
    password.contains(&username) || username.contains(&password)
}
