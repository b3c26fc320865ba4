//! HTTP boundary abstractions for the brisk request context.
//!
//! This crate defines the surface the context programs against:
//! - `Request` / `Response` traits - transport-owned endpoints
//! - `Cookie` - the token session and flash state travel in
//! - `Format` - negotiated response format
//! - `Upload` - handle for a multipart upload

mod cookie;
mod format;
mod request;
mod response;
mod upload;

pub use cookie::*;
pub use format::*;
pub use request::*;
pub use response::*;
pub use upload::*;

pub use http::Method;
