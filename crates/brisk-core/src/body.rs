//! Request body parsers and their registry.

use std::collections::HashMap;
use std::sync::Arc;

use crate::ParamMap;

/// Parser turning a raw request body into a parameter map.
///
/// Selected from the [`BodyParserRegistry`] by request content type. A
/// parser is invoked at most once per context; the body it receives is the
/// single-read payload taken off the request.
pub trait BodyParser: Send + Sync {
    /// Parse the body into parameter name/values pairs.
    fn parse(&self, body: &[u8]) -> ParamMap;
}

/// Parser for `application/x-www-form-urlencoded` bodies.
#[derive(Debug, Default)]
pub struct FormUrlEncodedParser;

impl BodyParser for FormUrlEncodedParser {
    fn parse(&self, body: &[u8]) -> ParamMap {
        let pairs: Vec<(String, String)> = match serde_urlencoded::from_bytes(body) {
            Ok(pairs) => pairs,
            Err(err) => {
                tracing::debug!(error = %err, "failed to decode urlencoded body");
                return ParamMap::new();
            }
        };
        let mut map = ParamMap::new();
        for (name, value) in pairs {
            map.entry(name).or_default().push(value);
        }
        map
    }
}

/// Parser that yields no parameters, used for unrecognized content types.
#[derive(Debug, Default)]
pub struct NoopBodyParser;

impl BodyParser for NoopBodyParser {
    fn parse(&self, _body: &[u8]) -> ParamMap {
        ParamMap::new()
    }
}

/// Registry of body parsers keyed by content type.
pub struct BodyParserRegistry {
    parsers: HashMap<String, Arc<dyn BodyParser>>,
    fallback: Arc<dyn BodyParser>,
}

impl BodyParserRegistry {
    /// Registry with the urlencoded form parser pre-registered.
    pub fn new() -> Self {
        let mut registry = Self {
            parsers: HashMap::new(),
            fallback: Arc::new(NoopBodyParser),
        };
        registry.register(
            "application/x-www-form-urlencoded",
            Arc::new(FormUrlEncodedParser),
        );
        registry
    }

    /// Register a parser for a content type, replacing any existing one.
    pub fn register(&mut self, content_type: impl Into<String>, parser: Arc<dyn BodyParser>) {
        self.parsers
            .insert(content_type.into().to_ascii_lowercase(), parser);
    }

    /// Select the parser for a request content type.
    ///
    /// Content type parameters (`; charset=...`) are ignored; an unknown or
    /// missing content type selects the no-op fallback.
    pub fn parser_for(&self, content_type: Option<&str>) -> Arc<dyn BodyParser> {
        let Some(content_type) = content_type else {
            return self.fallback.clone();
        };
        let mime = content_type
            .split(';')
            .next()
            .unwrap_or("")
            .trim()
            .to_ascii_lowercase();
        self.parsers
            .get(&mime)
            .cloned()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

impl Default for BodyParserRegistry {
    fn default() -> Self {
        Self::new()
    }
}
