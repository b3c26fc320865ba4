//! Per-request action context for the brisk framework.
//!
//! This crate provides the object a hosting runtime creates once per inbound
//! HTTP request and destroys once the response cycle completes:
//! - `RequestContext` - the context itself, with its lifecycle state machine
//! - `MergedParams` - unified view over override, query and body parameters
//! - `Session` / `Flash` - per-request session and flash handles
//! - `App` - host object wiring the collaborator traits together
//! - `ContextScope` - scoped binding of the "current" context

mod app;
mod attributes;
mod body;
mod context;
mod error;
mod handler;
mod lifecycle;
mod local;
mod params;
mod session;
mod violations;

pub use app::*;
pub use attributes::*;
pub use body::*;
pub use context::*;
pub use error::*;
pub use handler::*;
pub use lifecycle::*;
pub use local::*;
pub use params::*;
pub use session::*;
pub use violations::*;
