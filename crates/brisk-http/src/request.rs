//! Request-side boundary trait.

use http::Method;

use crate::{Cookie, Format};

/// Read-only view of an inbound HTTP request.
///
/// The transport layer owns the concrete request object; the context only
/// consumes this surface. Query parameters are the decoded URL query string;
/// the request body is exposed as a single-read byte payload via
/// [`Request::take_body`].
pub trait Request: Send + Sync {
    /// HTTP method of the request.
    fn method(&self) -> Method;

    /// Request path without the query string.
    fn path(&self) -> &str;

    /// Names of all URL query parameters, in encounter order.
    fn query_names(&self) -> Vec<String>;

    /// All values of a query parameter, in encounter order.
    fn query_values(&self, name: &str) -> Option<Vec<String>>;

    /// First value of a query parameter.
    fn query_value(&self, name: &str) -> Option<String> {
        self.query_values(name)
            .and_then(|vals| vals.into_iter().next())
    }

    /// A request header value, looked up case-insensitively.
    fn header(&self, name: &str) -> Option<String>;

    /// A request cookie by name.
    fn cookie(&self, name: &str) -> Option<Cookie>;

    /// Consume the request body.
    ///
    /// Bodies are single-read: the first call yields the payload, later
    /// calls yield `None`.
    fn take_body(&self) -> Option<Vec<u8>>;

    /// The Content-Type header, if any.
    fn content_type(&self) -> Option<String> {
        self.header("content-type")
    }

    /// Negotiated response format from the Accept header.
    fn accept(&self) -> Format {
        Format::from_accept_header(self.header("accept").as_deref())
    }

    /// Whether the request was made via XMLHttpRequest.
    fn is_ajax(&self) -> bool {
        self.header("x-requested-with")
            .map(|v| v.eq_ignore_ascii_case("xmlhttprequest"))
            .unwrap_or(false)
    }
}
