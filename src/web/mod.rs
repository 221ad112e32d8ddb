//! Web layer: routing, the authorization gate, HTML page rendering,
//! and the plain-text USSD callback.
//!
//! The router is composable: `app_router()` returns a `Router` that can
//! be mounted on any axum server instance.

pub mod cookies;
pub mod error;
pub mod middleware;
pub mod pages;
pub mod render;
pub mod router;
pub mod types;
pub mod ussd;

pub use error::WebError;
pub use router::app_router;
pub use types::{AppContext, CurrentUser};
