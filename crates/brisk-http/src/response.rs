//! Response-side boundary trait.

use crate::Cookie;

/// Write-only view of the outbound HTTP response.
///
/// The context never reads from the response; it only forwards cookies and
/// headers produced by session and flash serialization. Implementations must
/// tolerate writes up to the point the transport flushes the response.
pub trait Response: Send + Sync {
    /// Queue a cookie on the response.
    fn add_cookie(&self, cookie: Cookie);

    /// Set a response header, replacing any existing value.
    fn set_header(&self, name: &str, value: &str);
}
