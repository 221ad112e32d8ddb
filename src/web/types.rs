//! Shared request-handling state.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::Connection;
use uuid::Uuid;

use crate::auth::session::SessionStore;
use crate::web::error::WebError;

/// Application state handed to every handler. Cloning is cheap; the
/// database connection and session store are shared behind mutexes.
#[derive(Clone)]
pub struct AppContext {
    db: Arc<Mutex<Connection>>,
    sessions: Arc<Mutex<SessionStore>>,
    pub media_dir: PathBuf,
}

impl AppContext {
    pub fn new(conn: Connection, media_dir: PathBuf) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
            sessions: Arc::new(Mutex::new(SessionStore::new())),
            media_dir,
        }
    }

    /// Lock the database connection for the duration of a query.
    pub fn db(&self) -> Result<MutexGuard<'_, Connection>, WebError> {
        self.db
            .lock()
            .map_err(|_| WebError::Internal("database lock poisoned".into()))
    }

    /// Lock the session store.
    pub fn sessions(&self) -> Result<MutexGuard<'_, SessionStore>, WebError> {
        self.sessions
            .lock()
            .map_err(|_| WebError::Internal("session lock poisoned".into()))
    }
}

/// The authenticated account, inserted into request extensions by the
/// login gate. Handlers behind the gate can rely on its presence.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub account_id: Uuid,
    pub username: String,
}
