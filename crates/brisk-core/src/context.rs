//! The per-request action context.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use brisk_http::{Cookie, Format, Method, Request, Response, Upload};
use once_cell::sync::OnceCell;
use parking_lot::{Mutex, RwLock};
use serde_json::Value;

use crate::attributes::Attributes;
use crate::params::merge_entry;
use crate::{
    local, App, ContextError, Destroyable, Flash, LifecycleEvent, LifecycleState, Locale,
    MergedParams, ParamMap, RequestHandler, Router, Session, SessionError, Violation,
};

/// The execution context of one inbound HTTP request.
///
/// Created by the hosting runtime from a request/response pair, mutated by
/// framework and handler code while the request is in flight, and destroyed
/// once the response cycle completes. Exactly one context is current per
/// thread at any time; see [`ContextScope`](crate::ContextScope).
///
/// Interior state sits behind locks so a secondary worker may read the
/// context, but apart from the compute-once parameter gates the context
/// assumes a single writer, as one request is handled by one logical unit
/// of execution.
pub struct RequestContext {
    app: Arc<App>,
    request: Arc<dyn Request>,
    response: Arc<dyn Response>,
    state: RwLock<LifecycleState>,
    session: Mutex<Option<Session>>,
    flash: Mutex<Option<Flash>>,
    overrides: Mutex<HashMap<String, String>>,
    body_params: RwLock<OnceCell<Arc<ParamMap>>>,
    request_params: RwLock<OnceCell<Arc<Vec<(String, Vec<String>)>>>>,
    attributes: Mutex<Attributes>,
    violations: Mutex<Vec<Violation>>,
    render_args: Mutex<HashMap<String, Value>>,
    uploads: Mutex<Vec<Arc<Upload>>>,
    action_path: Mutex<Option<String>>,
    template_path: Mutex<Option<String>>,
    accept_override: Mutex<Option<Format>>,
    router: Mutex<Option<Arc<dyn Router>>>,
    handler: Mutex<Option<Arc<dyn RequestHandler>>>,
}

impl RequestContext {
    /// Create a context and bind it as current for the calling thread.
    ///
    /// The request and response are required collaborators; taking them as
    /// owned handles makes the absent-argument failure of the historical
    /// constructor unrepresentable.
    pub fn create(
        app: Arc<App>,
        request: Arc<dyn Request>,
        response: Arc<dyn Response>,
    ) -> Arc<Self> {
        let ctx = Arc::new(Self {
            app,
            request,
            response,
            state: RwLock::new(LifecycleState::Created),
            session: Mutex::new(None),
            flash: Mutex::new(None),
            overrides: Mutex::new(HashMap::new()),
            body_params: RwLock::new(OnceCell::new()),
            request_params: RwLock::new(OnceCell::new()),
            attributes: Mutex::new(Attributes::default()),
            violations: Mutex::new(Vec::new()),
            render_args: Mutex::new(HashMap::new()),
            uploads: Mutex::new(Vec::new()),
            action_path: Mutex::new(None),
            template_path: Mutex::new(None),
            accept_override: Mutex::new(None),
            router: Mutex::new(None),
            handler: Mutex::new(None),
        });
        ctx.bind_local();
        ctx
    }

    /// The context bound to the calling thread, if any.
    pub fn current() -> Option<Arc<RequestContext>> {
        local::current()
    }

    /// Bind this context as current for the calling thread, replacing any
    /// prior binding.
    pub fn bind_local(self: &Arc<Self>) {
        local::bind(self.clone());
    }

    /// The owning application.
    pub fn app(&self) -> &Arc<App> {
        &self.app
    }

    /// The bound request.
    pub fn request(&self) -> &Arc<dyn Request> {
        &self.request
    }

    /// The bound response.
    pub fn response(&self) -> &Arc<dyn Response> {
        &self.response
    }

    /// Current lifecycle state.
    pub fn state(&self) -> LifecycleState {
        *self.state.read()
    }

    /// Whether the session has been resolved.
    pub fn is_session_resolved(&self) -> bool {
        self.state() == LifecycleState::SessionResolved
    }

    /// Whether the session has been dissolved.
    pub fn is_session_dissolved(&self) -> bool {
        self.state() == LifecycleState::SessionDissolved
    }

    /// Whether the context has been destroyed.
    pub fn is_destroyed(&self) -> bool {
        self.state() == LifecycleState::Destroyed
    }

    // ---- session lifecycle -------------------------------------------------

    /// Resolve session and flash from the request.
    ///
    /// Must be called exactly once, at the start of dispatch, while the
    /// context is still in the `Created` state. Resolves the session before
    /// the flash, transitions to `SessionResolved`, then notifies the
    /// session manager and the event bus, in that order.
    pub fn resolve(&self) -> Result<(), ContextError> {
        let actual = self.state();
        if actual != LifecycleState::Created {
            return Err(ContextError::IllegalState {
                expected: LifecycleState::Created,
                actual,
            });
        }
        let manager = self.app.session_manager().clone();
        let session = manager.resolve_session(self);
        *self.session.lock() = Some(session);
        let flash = manager.resolve_flash(self);
        *self.flash.lock() = Some(flash);
        *self.state.write() = LifecycleState::SessionResolved;
        tracing::debug!(path = %self.request.path(), "session resolved");
        manager.fire_session_resolved(self);
        self.app
            .event_bus()
            .emit(LifecycleEvent::SessionResolved(self));
        Ok(())
    }

    /// Serialize flash and session back into the response.
    ///
    /// Must run before any response bytes are flushed; that ordering is the
    /// caller's contract. A repeated call after successful dissolution is a
    /// no-op. The state transition is gated on the session serialization:
    /// a flash-only failure is reported but does not block the transition,
    /// while a session failure leaves the context retryable. The dissolved
    /// notification fires even when serialization failed.
    pub fn dissolve(&self) -> Result<(), ContextError> {
        if self.state() == LifecycleState::SessionDissolved {
            return Ok(());
        }
        self.app
            .event_bus()
            .emit(LifecycleEvent::SessionWillDissolve(self));
        let flash_result = self.dissolve_flash();
        let session_result = self.dissolve_session();
        if session_result.is_ok() {
            *self.state.write() = LifecycleState::SessionDissolved;
            tracing::debug!(path = %self.request.path(), "session dissolved");
        }
        self.app
            .event_bus()
            .emit(LifecycleEvent::SessionDissolved(self));
        session_result.and(flash_result)?;
        Ok(())
    }

    /// Release every resource the context accumulated.
    ///
    /// Idempotent: a second call on a destroyed context does nothing. The
    /// request and response handles are retained so lower-level transport
    /// code can still flush buffered output afterwards.
    pub fn destroy(&self) {
        if self.state() == LifecycleState::Destroyed {
            return;
        }
        tracing::debug!(path = %self.request.path(), "destroying request context");
        self.request_params.write().take();
        self.body_params.write().take();
        self.overrides.lock().clear();
        self.render_args.lock().clear();
        self.violations.lock().clear();
        self.uploads.lock().clear();
        *self.session.lock() = None;
        *self.flash.lock() = None;
        *self.router.lock() = None;
        *self.handler.lock() = None;
        local::clear_current();
        // Drain before invoking destroy hooks: a hook may set attributes on
        // the context, and the lock is not reentrant.
        let destroyables = self.attributes.lock().drain_destroyables();
        for destroyable in destroyables {
            destroyable.destroy();
        }
        // Catches attributes added while nested values were being destroyed.
        self.attributes.lock().clear();
        *self.state.write() = LifecycleState::Destroyed;
    }

    fn dissolve_session(&self) -> Result<(), SessionError> {
        if let Some(cookie) = self.app.session_manager().dissolve_session(self)? {
            self.app
                .config()
                .session_mapper()
                .serialize_session(cookie, self)?;
        }
        Ok(())
    }

    fn dissolve_flash(&self) -> Result<(), SessionError> {
        if let Some(cookie) = self.app.session_manager().dissolve_flash(self)? {
            self.app
                .config()
                .session_mapper()
                .serialize_flash(cookie, self)?;
        }
        Ok(())
    }

    /// The resolved session, absent until [`resolve`](Self::resolve) ran.
    pub fn session(&self) -> Option<Session> {
        self.session.lock().clone()
    }

    /// The resolved flash, absent until [`resolve`](Self::resolve) ran.
    pub fn flash(&self) -> Option<Flash> {
        self.flash.lock().clone()
    }

    // ---- parameters --------------------------------------------------------

    /// Inject an override parameter, shadowing any query or body value for
    /// the same name.
    pub fn set_param(&self, name: impl Into<String>, value: impl Into<String>) {
        self.overrides.lock().insert(name.into(), value.into());
    }

    /// First value of a parameter: overrides, then query, then body.
    pub fn param(&self, name: &str) -> Option<String> {
        if let Some(value) = self.override_value(name) {
            return Some(value);
        }
        if let Some(value) = self.request.query_value(name) {
            return Some(value);
        }
        self.body_params()
            .get(name)
            .and_then(|values| values.first().cloned())
    }

    /// All values of a parameter, honoring the same precedence as
    /// [`param`](Self::param). An override yields a single-element list.
    pub fn params(&self, name: &str) -> Option<Vec<String>> {
        if let Some(value) = self.override_value(name) {
            return Some(vec![value]);
        }
        if let Some(values) = self.request.query_values(name) {
            return Some(values);
        }
        self.body_params().get(name).cloned()
    }

    /// Read-only merged view over overrides, query and body parameters.
    pub fn all_params(&self) -> MergedParams<'_> {
        MergedParams::new(self)
    }

    /// Body parameters, parsed at most once per context.
    ///
    /// Only the body-bearing methods (POST, PUT) are parsed; everything
    /// else yields an empty map regardless of raw body content. Concurrent
    /// first callers are serialized by the compute-once cell; the body is a
    /// single-read stream and must not be parsed twice.
    pub(crate) fn body_params(&self) -> Arc<ParamMap> {
        let cell = self.body_params.read();
        cell.get_or_init(|| {
            let method = self.request.method();
            if method != Method::POST && method != Method::PUT {
                return Arc::new(ParamMap::new());
            }
            let parser = self
                .app
                .body_parsers()
                .parser_for(self.request.content_type().as_deref());
            let body = self.request.take_body().unwrap_or_default();
            Arc::new(parser.parse(&body))
        })
        .clone()
    }

    /// Query and body parameters merged by key, computed once and cached.
    /// Per key, query values come before body values, in encounter order.
    pub(crate) fn merged_request_params(&self) -> Arc<Vec<(String, Vec<String>)>> {
        let cell = self.request_params.read();
        cell.get_or_init(|| {
            let mut entries: Vec<(String, Vec<String>)> = Vec::new();
            for name in self.request.query_names() {
                if entries.iter().any(|(key, _)| *key == name) {
                    continue;
                }
                if let Some(values) = self.request.query_values(&name) {
                    merge_entry(&mut entries, name, values);
                }
            }
            let body = self.body_params();
            for (name, values) in body.iter() {
                merge_entry(&mut entries, name.clone(), values.clone());
            }
            Arc::new(entries)
        })
        .clone()
    }

    pub(crate) fn override_value(&self, name: &str) -> Option<String> {
        self.overrides.lock().get(name).cloned()
    }

    pub(crate) fn override_count(&self) -> usize {
        self.overrides.lock().len()
    }

    pub(crate) fn override_snapshot(&self) -> Vec<(String, String)> {
        self.overrides
            .lock()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    // ---- attributes --------------------------------------------------------

    /// Store an attribute under a name.
    pub fn set_attribute<T: Any + Send + Sync>(&self, name: impl Into<String>, value: T) {
        self.attributes.lock().set(name, value);
    }

    /// Store an attribute whose `destroy` runs at context teardown.
    pub fn set_destroyable_attribute<T>(&self, name: impl Into<String>, value: T)
    where
        T: Any + Send + Sync + Destroyable,
    {
        self.attributes.lock().set_destroyable(name, value);
    }

    /// Read an attribute back under a caller-chosen type.
    ///
    /// The store does no type checking; a mismatched `T` reads as absent.
    pub fn attribute<T: Any + Send + Sync>(&self, name: &str) -> Option<Arc<T>> {
        self.attributes.lock().get(name)
    }

    /// Remove an attribute. Returns whether it was present.
    pub fn remove_attribute(&self, name: &str) -> bool {
        self.attributes.lock().remove(name)
    }

    // ---- violations --------------------------------------------------------

    /// Record a violation. Violations equal by value are counted once.
    pub fn add_violation(&self, violation: Violation) {
        let mut violations = self.violations.lock();
        if !violations.contains(&violation) {
            violations.push(violation);
        }
    }

    /// Record a batch of violations, with the same dedupe rule.
    pub fn add_violations(&self, batch: impl IntoIterator<Item = Violation>) {
        let mut violations = self.violations.lock();
        for violation in batch {
            if !violations.contains(&violation) {
                violations.push(violation);
            }
        }
    }

    /// Whether any violation has been recorded.
    pub fn has_violations(&self) -> bool {
        !self.violations.lock().is_empty()
    }

    /// Defensive copy of the recorded violations, in insertion order.
    pub fn violations(&self) -> Vec<Violation> {
        self.violations.lock().clone()
    }

    /// All violation messages joined with a separator, with no trailing
    /// separator.
    pub fn violation_message(&self, separator: &str) -> String {
        crate::violations::join_messages(&self.violations.lock(), separator)
    }

    /// Push the joined violation message into the flash error channel, so
    /// validation failures survive a redirect-after-post. No-op when no
    /// violations were recorded.
    pub fn flash_violation_message(&self, separator: &str) {
        let message = self.violation_message(separator);
        if message.is_empty() {
            return;
        }
        match self.flash() {
            Some(flash) => flash.error(&message),
            None => {
                tracing::warn!("flash violation message requested before session resolution")
            }
        }
    }

    // ---- render arguments --------------------------------------------------

    /// Set a render argument for the template layer.
    pub fn set_render_arg(&self, name: impl Into<String>, value: impl Into<Value>) {
        self.render_args.lock().insert(name.into(), value.into());
    }

    /// Read a render argument.
    pub fn render_arg(&self, name: &str) -> Option<Value> {
        self.render_args.lock().get(name).cloned()
    }

    /// Snapshot of all render arguments.
    pub fn render_args(&self) -> HashMap<String, Value> {
        self.render_args.lock().clone()
    }

    // ---- request conveniences ----------------------------------------------

    /// A request cookie by name.
    pub fn cookie(&self, name: &str) -> Option<Cookie> {
        self.request.cookie(name)
    }

    /// Negotiated response format, honoring an explicit override.
    pub fn accept(&self) -> Format {
        let overridden = *self.accept_override.lock();
        overridden.unwrap_or_else(|| self.request.accept())
    }

    /// Override the negotiated response format.
    pub fn set_accept(&self, format: Format) {
        *self.accept_override.lock() = Some(format);
    }

    /// Whether the negotiated format is JSON.
    pub fn is_json(&self) -> bool {
        self.accept() == Format::Json
    }

    /// Whether the request was made via XMLHttpRequest.
    pub fn is_ajax(&self) -> bool {
        self.request.is_ajax()
    }

    /// The request locale, via the configured resolver or the default.
    pub fn locale(&self) -> Locale {
        match self.app.config().locale_resolver() {
            Some(resolver) => resolver.resolve(self),
            None => self.app.config().default_locale().clone(),
        }
    }

    // ---- action and template paths -----------------------------------------

    /// Logical identifier of the invoked operation,
    /// e.g. `shop.cart.CartController.checkout`.
    pub fn action_path(&self) -> Option<String> {
        self.action_path.lock().clone()
    }

    /// Set the action path.
    pub fn set_action_path(&self, path: impl Into<String>) {
        *self.action_path.lock() = Some(path.into());
    }

    /// The template path: the explicit override when set, otherwise the
    /// action path with `.` separators turned into `/`.
    pub fn template_path(&self) -> Option<String> {
        if let Some(path) = self.template_path.lock().clone() {
            return Some(path);
        }
        self.action_path().map(|path| path.replace('.', "/"))
    }

    /// Explicitly override the template path.
    pub fn set_template_path(&self, path: impl Into<String>) {
        *self.template_path.lock() = Some(path.into());
    }

    // ---- uploads -----------------------------------------------------------

    /// Attach an uploaded file to the context.
    pub fn add_upload(&self, upload: Upload) {
        self.uploads.lock().push(Arc::new(upload));
    }

    /// Defensive copy of the attached upload handles.
    pub fn uploads(&self) -> Vec<Arc<Upload>> {
        self.uploads.lock().clone()
    }

    // ---- router and handler ------------------------------------------------

    /// The associated router, if set.
    pub fn router(&self) -> Option<Arc<dyn Router>> {
        self.router.lock().clone()
    }

    /// Associate the router the request was dispatched through.
    pub fn set_router(&self, router: Arc<dyn Router>) {
        *self.router.lock() = Some(router);
    }

    /// The associated handler, if set.
    pub fn handler(&self) -> Option<Arc<dyn RequestHandler>> {
        self.handler.lock().clone()
    }

    /// Associate the handler selected for the request.
    pub fn set_handler(&self, handler: Arc<dyn RequestHandler>) {
        *self.handler.lock() = Some(handler);
    }
}

impl fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestContext")
            .field("path", &self.request.path())
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
