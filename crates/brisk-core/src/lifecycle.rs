//! Context lifecycle states and events.

use crate::RequestContext;

/// Lifecycle states of a request context.
///
/// The state only moves forward: `Created` -> `SessionResolved` ->
/// `SessionDissolved` -> `Destroyed`. `Destroyed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Context constructed, session not yet resolved.
    Created,
    /// Session and flash resolved from the request.
    SessionResolved,
    /// Session and flash serialized back into the response.
    SessionDissolved,
    /// All resources released; the context must not be reused.
    Destroyed,
}

/// A lifecycle notification carrying the context as payload.
///
/// Emitted synchronously at the transition points; observers read whatever
/// they need off the context before returning.
#[derive(Clone, Copy)]
pub enum LifecycleEvent<'a> {
    /// Session and flash have been resolved.
    SessionResolved(&'a RequestContext),
    /// Session serialization is about to start.
    SessionWillDissolve(&'a RequestContext),
    /// Session serialization finished, successfully or not.
    SessionDissolved(&'a RequestContext),
}

impl<'a> LifecycleEvent<'a> {
    /// The context this event concerns.
    pub fn context(&self) -> &'a RequestContext {
        match self {
            LifecycleEvent::SessionResolved(ctx)
            | LifecycleEvent::SessionWillDissolve(ctx)
            | LifecycleEvent::SessionDissolved(ctx) => ctx,
        }
    }

    /// Stable event name, for logging and test assertions.
    pub fn name(&self) -> &'static str {
        match self {
            LifecycleEvent::SessionResolved(_) => "session_resolved",
            LifecycleEvent::SessionWillDissolve(_) => "session_will_dissolve",
            LifecycleEvent::SessionDissolved(_) => "session_dissolved",
        }
    }
}

/// Fire-and-forget sink for lifecycle events.
pub trait EventBus: Send + Sync {
    /// Deliver an event. Return values and errors are not consumed.
    fn emit(&self, event: LifecycleEvent<'_>);
}

/// Event bus that drops everything.
#[derive(Debug, Default)]
pub struct NullEventBus;

impl EventBus for NullEventBus {
    fn emit(&self, _event: LifecycleEvent<'_>) {}
}
