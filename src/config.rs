use std::net::SocketAddr;
use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Wardbook";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Session cookie carried by logged-in browsers.
pub const SESSION_COOKIE: &str = "wardbook_session";
/// One-shot flash notification cookie.
pub const FLASH_COOKIE: &str = "wardbook_flash";

/// Default log filter when RUST_LOG is unset.
pub fn default_log_filter() -> String {
    format!("info,{}=debug", env!("CARGO_PKG_NAME"))
}

/// Get the application data directory
/// ~/Wardbook/ on all platforms (user-visible)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("Wardbook")
}

/// SQLite database file path
pub fn db_path() -> PathBuf {
    app_data_dir().join("wardbook.sqlite3")
}

/// Directory for uploaded profile pictures, served under /media
pub fn media_dir() -> PathBuf {
    app_data_dir().join("media")
}

/// Bind address, overridable via WARDBOOK_ADDR
pub fn bind_addr() -> SocketAddr {
    std::env::var("WARDBOOK_ADDR")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 8000)))
}
