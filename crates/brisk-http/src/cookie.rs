//! Cookie representation.

/// An HTTP cookie.
///
/// Session and flash state leave the context serialized into one of these;
/// the session mapper writes it into the response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    name: String,
    value: String,
    path: Option<String>,
    domain: Option<String>,
    max_age: Option<i64>,
    http_only: bool,
    secure: bool,
}

impl Cookie {
    /// Create a cookie with a name and value.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            path: None,
            domain: None,
            max_age: None,
            http_only: false,
            secure: false,
        }
    }

    /// Set the cookie path.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Set the cookie domain.
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Set the max-age in seconds.
    pub fn with_max_age(mut self, seconds: i64) -> Self {
        self.max_age = Some(seconds);
        self
    }

    /// Mark the cookie as HttpOnly.
    pub fn http_only(mut self) -> Self {
        self.http_only = true;
        self
    }

    /// Mark the cookie as Secure.
    pub fn secure(mut self) -> Self {
        self.secure = true;
        self
    }

    /// Cookie name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Cookie value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Cookie path, if set.
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Cookie domain, if set.
    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    /// Max-age in seconds, if set.
    pub fn max_age(&self) -> Option<i64> {
        self.max_age
    }

    /// Whether the cookie is HttpOnly.
    pub fn is_http_only(&self) -> bool {
        self.http_only
    }

    /// Whether the cookie is Secure.
    pub fn is_secure(&self) -> bool {
        self.secure
    }
}
