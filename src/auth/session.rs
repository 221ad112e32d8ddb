//! In-memory login sessions.
//!
//! Tokens are 32 random bytes, URL-safe base64 on the wire, stored by
//! SHA-256 hash. A session expires after a fixed TTL; expired entries
//! are swept when the store grows.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use uuid::Uuid;

/// Fixed session lifetime (24 hours).
const SESSION_TTL_SECS: u64 = 24 * 60 * 60;

/// A logged-in browser session.
#[derive(Debug, Clone)]
pub struct Session {
    pub account_id: Uuid,
    pub username: String,
    expires_at: Instant,
}

/// Store for active sessions, keyed by token hash.
pub struct SessionStore {
    sessions: HashMap<[u8; 32], Session>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: HashMap::new(),
        }
    }

    /// Start a session for an account. Returns the bearer token to be
    /// set as the session cookie.
    pub fn create(&mut self, account_id: Uuid, username: String) -> String {
        if self.sessions.len() > 1000 {
            self.cleanup();
        }
        let token = generate_token();
        self.sessions.insert(
            hash_token(&token),
            Session {
                account_id,
                username,
                expires_at: Instant::now() + Duration::from_secs(SESSION_TTL_SECS),
            },
        );
        token
    }

    /// Resolve a cookie token to its session, if valid and unexpired.
    pub fn get(&self, token: &str) -> Option<Session> {
        let session = self.sessions.get(&hash_token(token))?;
        if Instant::now() > session.expires_at {
            return None;
        }
        Some(session.clone())
    }

    /// End a session (logout). Unknown tokens are a no-op.
    pub fn destroy(&mut self, token: &str) {
        self.sessions.remove(&hash_token(token));
    }

    fn cleanup(&mut self) {
        let now = Instant::now();
        self.sessions.retain(|_, s| now < s.expires_at);
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Hash a session token string using SHA-256.
pub fn hash_token(token: &str) -> [u8; 32] {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hasher.finalize().into()
}

/// Generate a random session token (URL-safe base64, 32 bytes of entropy).
pub fn generate_token() -> String {
    use base64::Engine;
    let bytes: [u8; 32] = rand::random();
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_then_get_roundtrip() {
        let mut store = SessionStore::new();
        let id = Uuid::new_v4();
        let token = store.create(id, "amina".into());

        let session = store.get(&token).unwrap();
        assert_eq!(session.account_id, id);
        assert_eq!(session.username, "amina");
    }

    #[test]
    fn unknown_token_is_none() {
        let store = SessionStore::new();
        assert!(store.get("no-such-token").is_none());
    }

    #[test]
    fn destroy_ends_session() {
        let mut store = SessionStore::new();
        let token = store.create(Uuid::new_v4(), "amina".into());
        store.destroy(&token);
        assert!(store.get(&token).is_none());
    }

    #[test]
    fn expired_session_is_none() {
        let mut store = SessionStore::new();
        let token = store.create(Uuid::new_v4(), "amina".into());
        // Force expiry
        let hash = hash_token(&token);
        store.sessions.get_mut(&hash).unwrap().expires_at = Instant::now() - Duration::from_secs(1);
        assert!(store.get(&token).is_none());
    }

    #[test]
    fn tokens_are_unique() {
        let t1 = generate_token();
        let t2 = generate_token();
        assert_ne!(t1, t2);
        assert!(!t1.is_empty());
    }

    #[test]
    fn hash_token_is_deterministic() {
        assert_eq!(hash_token("abc"), hash_token("abc"));
        assert_ne!(hash_token("abc"), hash_token("abd"));
    }
}
