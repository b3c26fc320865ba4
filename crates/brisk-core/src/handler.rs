//! Router and handler association traits.

/// Handler selected by the runtime for the current request.
///
/// Dispatch itself happens outside this crate; the context only carries the
/// reference so interceptors and template resolution can inspect it.
pub trait RequestHandler: Send + Sync {
    /// Stable handler name, used for logging and diagnostics.
    fn name(&self) -> &str;
}

/// Router the request was dispatched through.
///
/// Route table construction lives outside this crate; the context carries
/// the reference for reverse routing from handler code.
pub trait Router: Send + Sync {
    /// Build a URL for an action path, if the router knows it.
    fn url_for(&self, action_path: &str) -> Option<String>;
}
