//! Typed attribute store with optional destroy capability.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

/// Capability an attribute value may implement to participate in context
/// teardown.
///
/// `destroy` is invoked exactly once when the owning context is destroyed.
/// Implementations use interior mutability for any state they release.
pub trait Destroyable: Send + Sync {
    /// Release whatever the value holds.
    fn destroy(&self);
}

/// One stored attribute value, with its destroy capability when registered.
pub(crate) struct AttributeSlot {
    value: Arc<dyn Any + Send + Sync>,
    destroyable: Option<Arc<dyn Destroyable>>,
}

/// Untyped key-value store scoped to one context.
///
/// The store does no type checking on read: `get::<T>` with the wrong `T`
/// yields `None`, which is the caller's contract to manage.
#[derive(Default)]
pub(crate) struct Attributes {
    slots: HashMap<String, AttributeSlot>,
}

impl Attributes {
    pub(crate) fn set<T: Any + Send + Sync>(&mut self, name: impl Into<String>, value: T) {
        self.slots.insert(
            name.into(),
            AttributeSlot {
                value: Arc::new(value),
                destroyable: None,
            },
        );
    }

    pub(crate) fn set_destroyable<T>(&mut self, name: impl Into<String>, value: T)
    where
        T: Any + Send + Sync + Destroyable,
    {
        let value = Arc::new(value);
        self.slots.insert(
            name.into(),
            AttributeSlot {
                value: value.clone(),
                destroyable: Some(value),
            },
        );
    }

    pub(crate) fn get<T: Any + Send + Sync>(&self, name: &str) -> Option<Arc<T>> {
        let slot = self.slots.get(name)?;
        slot.value.clone().downcast::<T>().ok()
    }

    pub(crate) fn remove(&mut self, name: &str) -> bool {
        self.slots.remove(name).is_some()
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
    }

    /// Take every slot out of the store, leaving it empty.
    pub(crate) fn drain_destroyables(&mut self) -> Vec<Arc<dyn Destroyable>> {
        self.slots
            .drain()
            .filter_map(|(_, slot)| slot.destroyable)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Tracked(Arc<AtomicUsize>);

    impl Destroyable for Tracked {
        fn destroy(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_typed_read_back() {
        let mut attrs = Attributes::default();
        attrs.set("count", 7usize);
        assert_eq!(attrs.get::<usize>("count").as_deref(), Some(&7));
        // Wrong type is the caller's problem, surfaced as absence.
        assert!(attrs.get::<String>("count").is_none());
    }

    #[test]
    fn test_drain_keeps_only_destroyables() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut attrs = Attributes::default();
        attrs.set("plain", "value".to_string());
        attrs.set_destroyable("tracked", Tracked(counter.clone()));

        let destroyables = attrs.drain_destroyables();
        assert_eq!(destroyables.len(), 1);
        assert!(attrs.get::<String>("plain").is_none());

        for d in destroyables {
            d.destroy();
        }
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}
