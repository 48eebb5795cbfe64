//! Server-side sessions and caller privilege extraction.
//!
//! A session is opened by `POST /login` and carried in the `blitz_session`
//! cookie. Sessions live in memory and do not survive a restart.

use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;
use blitz_core::Privilege;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::{PoisonError, RwLock};
use uuid::Uuid;

use crate::state::AppState;

/// Session cookie name
pub const SESSION_COOKIE_NAME: &str = "blitz_session";

/// Session lifetime in seconds, also sent as the cookie `Max-Age`.
pub const SESSION_TTL_SECS: i64 = 86_400;

/// An authenticated session.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub username: String,
    pub privilege: Privilege,
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Whether the session is older than `ttl` at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now >= self.created_at + ttl
    }
}

/// In-memory session table.
///
/// Sessions expire `ttl` after login. Expired entries are dropped when looked
/// up and swept whenever a new session is opened.
#[derive(Debug)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
    ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_ttl(Duration::seconds(SESSION_TTL_SECS))
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with a custom session lifetime.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Open a session for a user.
    pub fn create(&self, username: &str, privilege: Privilege) -> Session {
        let now = Utc::now();
        let session = Session {
            id: Uuid::new_v4().simple().to_string(),
            username: username.to_string(),
            privilege,
            created_at: now,
        };

        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired(now, self.ttl));
        let swept = before - sessions.len();
        if swept > 0 {
            tracing::debug!(swept, "Dropped expired sessions");
        }
        sessions.insert(session.id.clone(), session.clone());
        session
    }

    /// Look up a live session by id. An expired session is removed.
    pub fn get(&self, id: &str) -> Option<Session> {
        let now = Utc::now();
        let session = self
            .sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()?;

        if session.is_expired(now, self.ttl) {
            self.remove(id);
            tracing::debug!(username = %session.username, "Session expired");
            return None;
        }
        Some(session)
    }

    /// Close a session.
    pub fn remove(&self, id: &str) -> Option<Session> {
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id)
    }

    /// Number of open sessions.
    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether no sessions are open.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Extract session cookie value from cookie header
pub fn extract_session_cookie(cookies: &str) -> Option<String> {
    for cookie in cookies.split(';') {
        let cookie = cookie.trim();
        if let Some(value) = cookie.strip_prefix(&format!("{}=", SESSION_COOKIE_NAME))
            && !value.is_empty()
        {
            return Some(value.to_string());
        }
    }
    None
}

/// `Set-Cookie` value opening a session.
pub fn session_cookie(session_id: &str) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE_NAME, session_id, SESSION_TTL_SECS
    )
}

/// `Set-Cookie` value clearing the session.
pub fn cleared_session_cookie() -> String {
    format!(
        "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
        SESSION_COOKIE_NAME
    )
}

/// Whoever sent the request, resolved from the session cookie.
///
/// Never rejects: an unknown or missing cookie is an anonymous caller.
#[derive(Debug, Clone, Default)]
pub struct Caller {
    pub session: Option<Session>,
}

impl Caller {
    /// Privilege of this caller.
    pub fn privilege(&self) -> Privilege {
        self.session
            .as_ref()
            .map(|s| s.privilege)
            .unwrap_or(Privilege::Anonymous)
    }

    /// Session id, if any.
    pub fn session_id(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.id.as_str())
    }
}

impl FromRequestParts<AppState> for Caller {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let session = parts
            .headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find_map(extract_session_cookie)
            .and_then(|id| state.sessions().get(&id));

        Ok(Caller { session })
    }
}
