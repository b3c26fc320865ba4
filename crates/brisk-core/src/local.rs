//! Thread-local registry of the "current" context.

use std::cell::RefCell;
use std::sync::Arc;

use crate::RequestContext;

thread_local! {
    static CURRENT: RefCell<Option<Arc<RequestContext>>> = const { RefCell::new(None) };
}

/// Bind a context as current for the calling thread, replacing any prior
/// binding. Bindings do not stack.
pub(crate) fn bind(ctx: Arc<RequestContext>) {
    CURRENT.with(|slot| {
        *slot.borrow_mut() = Some(ctx);
    });
}

/// The context bound to the calling thread, if any.
pub fn current() -> Option<Arc<RequestContext>> {
    CURRENT.with(|slot| slot.borrow().clone())
}

/// Remove the calling thread's binding.
///
/// Pooled threads are reused across requests; a binding that outlives its
/// request leaks the whole context into the next request handled by the
/// same thread. Prefer [`ContextScope`] over calling this directly.
pub fn clear_current() {
    CURRENT.with(|slot| {
        *slot.borrow_mut() = None;
    });
}

/// Scoped binding of the current context for a request-handling span.
///
/// Binds on construction and unbinds on drop, including during unwinding,
/// so the no-leak guarantee does not depend on best-effort cleanup at every
/// exit path.
pub struct ContextScope {
    _private: (),
}

impl ContextScope {
    /// Bind `ctx` as current until the returned guard is dropped.
    pub fn enter(ctx: Arc<RequestContext>) -> Self {
        bind(ctx);
        Self { _private: () }
    }
}

impl Drop for ContextScope {
    fn drop(&mut self) {
        clear_current();
    }
}
