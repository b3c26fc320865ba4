//! Application host object and configuration.

use std::fmt;
use std::sync::Arc;

use crate::{
    BodyParser, BodyParserRegistry, CookieMapper, EventBus, NullEventBus, RequestContext,
    SessionManager, SessionMapper,
};

/// A locale tag, e.g. `en` or `de-AT`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locale(String);

impl Locale {
    /// Create a locale from a language tag.
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// The language tag.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self("en".to_string())
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hook deriving the request locale from the context, e.g. from an
/// Accept-Language header or a session preference.
pub trait LocaleResolver: Send + Sync {
    /// Resolve the locale for a request.
    fn resolve(&self, ctx: &RequestContext) -> Locale;
}

/// Application configuration consumed by the context.
pub struct AppConfig {
    default_locale: Locale,
    session_cookie_name: String,
    flash_cookie_name: String,
    session_mapper: Arc<dyn SessionMapper>,
    locale_resolver: Option<Arc<dyn LocaleResolver>>,
}

impl AppConfig {
    /// Set the fallback locale used when no resolver is configured.
    pub fn with_default_locale(mut self, locale: Locale) -> Self {
        self.default_locale = locale;
        self
    }

    /// Set the session cookie name.
    pub fn with_session_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.session_cookie_name = name.into();
        self
    }

    /// Set the flash cookie name.
    pub fn with_flash_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.flash_cookie_name = name.into();
        self
    }

    /// Replace the session mapper.
    pub fn with_session_mapper(mut self, mapper: Arc<dyn SessionMapper>) -> Self {
        self.session_mapper = mapper;
        self
    }

    /// Install a locale resolver.
    pub fn with_locale_resolver(mut self, resolver: Arc<dyn LocaleResolver>) -> Self {
        self.locale_resolver = Some(resolver);
        self
    }

    /// Fallback locale.
    pub fn default_locale(&self) -> &Locale {
        &self.default_locale
    }

    /// Name of the session cookie.
    pub fn session_cookie_name(&self) -> &str {
        &self.session_cookie_name
    }

    /// Name of the flash cookie.
    pub fn flash_cookie_name(&self) -> &str {
        &self.flash_cookie_name
    }

    /// The configured session mapper.
    pub fn session_mapper(&self) -> &Arc<dyn SessionMapper> {
        &self.session_mapper
    }

    /// The configured locale resolver, if any.
    pub fn locale_resolver(&self) -> Option<&Arc<dyn LocaleResolver>> {
        self.locale_resolver.as_ref()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_locale: Locale::default(),
            session_cookie_name: "brisk_session".to_string(),
            flash_cookie_name: "brisk_flash".to_string(),
            session_mapper: Arc::new(CookieMapper),
            locale_resolver: None,
        }
    }
}

/// Host object wiring the collaborators a context needs.
///
/// One `App` serves the whole process; every context holds a handle to it.
pub struct App {
    config: AppConfig,
    session_manager: Arc<dyn SessionManager>,
    event_bus: Arc<dyn EventBus>,
    body_parsers: BodyParserRegistry,
}

impl App {
    /// Create an app around a session manager, with default config, a no-op
    /// event bus and the standard body parser registry.
    pub fn new(session_manager: Arc<dyn SessionManager>) -> Self {
        Self {
            config: AppConfig::default(),
            session_manager,
            event_bus: Arc::new(NullEventBus),
            body_parsers: BodyParserRegistry::new(),
        }
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the event bus.
    pub fn with_event_bus(mut self, bus: Arc<dyn EventBus>) -> Self {
        self.event_bus = bus;
        self
    }

    /// Register a body parser for a content type.
    pub fn with_body_parser(
        mut self,
        content_type: impl Into<String>,
        parser: Arc<dyn BodyParser>,
    ) -> Self {
        self.body_parsers.register(content_type, parser);
        self
    }

    /// Application configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The session manager collaborator.
    pub fn session_manager(&self) -> &Arc<dyn SessionManager> {
        &self.session_manager
    }

    /// The lifecycle event bus.
    pub fn event_bus(&self) -> &Arc<dyn EventBus> {
        &self.event_bus
    }

    /// The body parser registry.
    pub fn body_parsers(&self) -> &BodyParserRegistry {
        &self.body_parsers
    }
}
