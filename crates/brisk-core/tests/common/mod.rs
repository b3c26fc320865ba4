//! Mock collaborators shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use brisk_core::{
    App, BodyParser, EventBus, Flash, FormUrlEncodedParser, LifecycleEvent, ParamMap,
    RequestContext, Session, SessionError, SessionManager,
};
use brisk_http::{Cookie, Method, Request, Response};
use parking_lot::Mutex;

/// Request double with programmable query, headers, cookies and body.
pub struct MockRequest {
    method: Method,
    path: String,
    query: Vec<(String, Vec<String>)>,
    headers: HashMap<String, String>,
    cookies: HashMap<String, Cookie>,
    body: Mutex<Option<Vec<u8>>>,
}

impl MockRequest {
    pub fn get(path: &str) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: &str) -> Self {
        Self::new(Method::POST, path)
            .with_header("content-type", "application/x-www-form-urlencoded")
    }

    pub fn new(method: Method, path: &str) -> Self {
        Self {
            method,
            path: path.to_string(),
            query: Vec::new(),
            headers: HashMap::new(),
            cookies: HashMap::new(),
            body: Mutex::new(None),
        }
    }

    pub fn with_query(mut self, name: &str, value: &str) -> Self {
        if let Some((_, values)) = self.query.iter_mut().find(|(key, _)| key == name) {
            values.push(value.to_string());
        } else {
            self.query.push((name.to_string(), vec![value.to_string()]));
        }
        self
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers
            .insert(name.to_ascii_lowercase(), value.to_string());
        self
    }

    pub fn with_cookie(mut self, cookie: Cookie) -> Self {
        self.cookies.insert(cookie.name().to_string(), cookie);
        self
    }

    pub fn with_body(self, body: &[u8]) -> Self {
        *self.body.lock() = Some(body.to_vec());
        self
    }
}

impl Request for MockRequest {
    fn method(&self) -> Method {
        self.method.clone()
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn query_names(&self) -> Vec<String> {
        self.query.iter().map(|(name, _)| name.clone()).collect()
    }

    fn query_values(&self, name: &str) -> Option<Vec<String>> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, values)| values.clone())
    }

    fn header(&self, name: &str) -> Option<String> {
        self.headers.get(&name.to_ascii_lowercase()).cloned()
    }

    fn cookie(&self, name: &str) -> Option<Cookie> {
        self.cookies.get(name).cloned()
    }

    fn take_body(&self) -> Option<Vec<u8>> {
        self.body.lock().take()
    }
}

/// Response double recording everything written into it.
#[derive(Default)]
pub struct MockResponse {
    pub cookies: Mutex<Vec<Cookie>>,
    pub headers: Mutex<Vec<(String, String)>>,
}

impl Response for MockResponse {
    fn add_cookie(&self, cookie: Cookie) {
        self.cookies.lock().push(cookie);
    }

    fn set_header(&self, name: &str, value: &str) {
        self.headers
            .lock()
            .push((name.to_string(), value.to_string()));
    }
}

/// Event bus recording event names in emission order.
#[derive(Default)]
pub struct RecordingBus {
    pub events: Mutex<Vec<String>>,
}

impl EventBus for RecordingBus {
    fn emit(&self, event: LifecycleEvent<'_>) {
        self.events.lock().push(event.name().to_string());
    }
}

/// Session manager double with failure toggles for the dissolve paths.
pub struct MockSessionManager {
    pub fail_session: AtomicBool,
    pub fail_flash: AtomicBool,
    pub resolved_fired: AtomicUsize,
}

impl Default for MockSessionManager {
    fn default() -> Self {
        Self {
            fail_session: AtomicBool::new(false),
            fail_flash: AtomicBool::new(false),
            resolved_fired: AtomicUsize::new(0),
        }
    }
}

impl SessionManager for MockSessionManager {
    fn resolve_session(&self, _ctx: &RequestContext) -> Session {
        Session::new("sess_test")
    }

    fn resolve_flash(&self, _ctx: &RequestContext) -> Flash {
        Flash::new()
    }

    fn dissolve_session(&self, ctx: &RequestContext) -> Result<Option<Cookie>, SessionError> {
        if self.fail_session.load(Ordering::SeqCst) {
            return Err(SessionError::Dissolve("session store offline".to_string()));
        }
        let name = ctx.app().config().session_cookie_name().to_string();
        Ok(Some(Cookie::new(name, "sess_test")))
    }

    fn dissolve_flash(&self, ctx: &RequestContext) -> Result<Option<Cookie>, SessionError> {
        if self.fail_flash.load(Ordering::SeqCst) {
            return Err(SessionError::Dissolve("flash encode failed".to_string()));
        }
        let name = ctx.app().config().flash_cookie_name().to_string();
        Ok(Some(Cookie::new(name, "flash_test")))
    }

    fn fire_session_resolved(&self, _ctx: &RequestContext) {
        self.resolved_fired.fetch_add(1, Ordering::SeqCst);
    }
}

/// Body parser counting how many times it actually ran.
pub struct CountingParser {
    pub invocations: Arc<AtomicUsize>,
}

impl BodyParser for CountingParser {
    fn parse(&self, body: &[u8]) -> ParamMap {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        FormUrlEncodedParser.parse(body)
    }
}

/// Fixture bundling an app with its recording collaborators.
pub struct Fixture {
    pub app: Arc<App>,
    pub manager: Arc<MockSessionManager>,
    pub bus: Arc<RecordingBus>,
    pub response: Arc<MockResponse>,
}

impl Fixture {
    pub fn new() -> Self {
        let manager = Arc::new(MockSessionManager::default());
        let bus = Arc::new(RecordingBus::default());
        let app = Arc::new(
            App::new(manager.clone() as Arc<dyn SessionManager>)
                .with_event_bus(bus.clone() as Arc<dyn EventBus>),
        );
        Self {
            app,
            manager,
            bus,
            response: Arc::new(MockResponse::default()),
        }
    }

    pub fn context(&self, request: MockRequest) -> Arc<RequestContext> {
        RequestContext::create(
            self.app.clone(),
            Arc::new(request),
            self.response.clone() as Arc<dyn Response>,
        )
    }

    pub fn event_names(&self) -> Vec<String> {
        self.bus.events.lock().clone()
    }
}
