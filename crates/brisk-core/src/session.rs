//! Session and flash handles plus the collaborator traits that resolve and
//! dissolve them.

use std::collections::HashMap;
use std::sync::Arc;

use brisk_http::Cookie;
use parking_lot::Mutex;
use serde_json::Value;

use crate::{RequestContext, SessionError};

/// Server-associated user state for the duration of a request.
///
/// Resolved from request cookies at the start of the request and serialized
/// back at the end. Handles are cheap to clone and share one underlying map.
#[derive(Debug, Clone, Default)]
pub struct Session {
    inner: Arc<Mutex<StateMap>>,
}

impl Session {
    /// Create a session with an identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(StateMap::new(id.into()))),
        }
    }

    /// Session identifier.
    pub fn id(&self) -> String {
        self.inner.lock().id.clone()
    }

    /// Read a value by key.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.inner.lock().data.get(key).cloned()
    }

    /// Store a value under a key.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) {
        self.inner.lock().data.insert(key.into(), value.into());
    }

    /// Remove a key, returning its value.
    pub fn remove(&self, key: &str) -> Option<Value> {
        self.inner.lock().data.remove(key)
    }

    /// Whether a key is present.
    pub fn contains(&self, key: &str) -> bool {
        self.inner.lock().data.contains_key(key)
    }

    /// Whether the session carries no data.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().data.is_empty()
    }

    /// Drop all session data.
    pub fn clear(&self) {
        self.inner.lock().data.clear();
    }

    /// Snapshot of the session data.
    pub fn entries(&self) -> HashMap<String, Value> {
        self.inner.lock().data.clone()
    }
}

/// Single-use, redirect-surviving message store.
///
/// Resolved and dissolved alongside the session. The `error` and `success`
/// channels follow the post-redirect-get convention: repeated messages on a
/// channel are newline-joined.
#[derive(Debug, Clone, Default)]
pub struct Flash {
    inner: Arc<Mutex<StateMap>>,
}

impl Flash {
    const ERROR_KEY: &'static str = "error";
    const SUCCESS_KEY: &'static str = "success";

    /// Create an empty flash store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a value by key.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.inner.lock().data.get(key).cloned()
    }

    /// Store a value under a key.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) {
        self.inner.lock().data.insert(key.into(), value.into());
    }

    /// Push a message onto the error channel.
    pub fn error(&self, message: &str) {
        self.append(Self::ERROR_KEY, message);
    }

    /// Push a message onto the success channel.
    pub fn success(&self, message: &str) {
        self.append(Self::SUCCESS_KEY, message);
    }

    /// Read the joined messages of a channel.
    pub fn message(&self, key: &str) -> Option<String> {
        match self.inner.lock().data.get(key) {
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
            None => None,
        }
    }

    /// Whether the flash carries no data.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().data.is_empty()
    }

    /// Drop all flash data.
    pub fn clear(&self) {
        self.inner.lock().data.clear();
    }

    fn append(&self, key: &str, message: &str) {
        let mut inner = self.inner.lock();
        let joined = match inner.data.get(key) {
            Some(Value::String(existing)) => format!("{existing}\n{message}"),
            _ => message.to_string(),
        };
        inner.data.insert(key.to_string(), Value::String(joined));
    }
}

#[derive(Debug, Default)]
struct StateMap {
    id: String,
    data: HashMap<String, Value>,
}

impl StateMap {
    fn new(id: String) -> Self {
        Self {
            id,
            data: HashMap::new(),
        }
    }
}

/// Collaborator that materializes session and flash state from the request
/// and turns it back into cookie tokens at the end of the request.
pub trait SessionManager: Send + Sync {
    /// Derive the session from request cookies or headers.
    fn resolve_session(&self, ctx: &RequestContext) -> Session;

    /// Derive the flash from request cookies or headers.
    fn resolve_flash(&self, ctx: &RequestContext) -> Flash;

    /// Serialize the session into a cookie token, if one is needed.
    fn dissolve_session(&self, ctx: &RequestContext) -> Result<Option<Cookie>, SessionError>;

    /// Serialize the flash into a cookie token, if one is needed.
    fn dissolve_flash(&self, ctx: &RequestContext) -> Result<Option<Cookie>, SessionError>;

    /// Lifecycle callback fired right after the session is resolved.
    fn fire_session_resolved(&self, _ctx: &RequestContext) {}
}

/// Collaborator that writes cookie tokens into the response.
pub trait SessionMapper: Send + Sync {
    /// Write the session token into the response.
    fn serialize_session(&self, cookie: Cookie, ctx: &RequestContext) -> Result<(), SessionError>;

    /// Write the flash token into the response.
    fn serialize_flash(&self, cookie: Cookie, ctx: &RequestContext) -> Result<(), SessionError>;
}

/// Default mapper: tokens travel as plain response cookies.
#[derive(Debug, Default)]
pub struct CookieMapper;

impl SessionMapper for CookieMapper {
    fn serialize_session(&self, cookie: Cookie, ctx: &RequestContext) -> Result<(), SessionError> {
        ctx.response().add_cookie(cookie);
        Ok(())
    }

    fn serialize_flash(&self, cookie: Cookie, ctx: &RequestContext) -> Result<(), SessionError> {
        ctx.response().add_cookie(cookie);
        Ok(())
    }
}
