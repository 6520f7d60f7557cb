//! Publish/subscribe hub with scoped registrations
//!
//! Handlers are registered with [`EventHub::subscribe`], which hands back a
//! [`Subscription`] guard. Dropping the guard removes the handler, so a
//! component that stores its guards releases every registration when it
//! clears them.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;

/// Events that can stop further dispatch once handled
pub trait Propagation {
    /// Whether a handler has consumed this event
    fn is_consumed(&self) -> bool {
        false
    }
}

type Handler<E> = Arc<dyn Fn(&mut E) + Send + Sync>;

struct Registry<E> {
    next_id: u64,
    handlers: Vec<(u64, Handler<E>)>,
}

impl<E> Default for Registry<E> {
    fn default() -> Self {
        Self {
            next_id: 0,
            handlers: Vec::new(),
        }
    }
}

/// Cloneable handle to a set of event handlers
pub struct EventHub<E> {
    registry: Arc<Mutex<Registry<E>>>,
}

impl<E> Clone for EventHub<E> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<E> Default for EventHub<E> {
    fn default() -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry::default())),
        }
    }
}

impl<E> std::fmt::Debug for EventHub<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventHub")
            .field("handlers", &self.handler_count())
            .finish()
    }
}

impl<E: Propagation + 'static> EventHub<E> {
    /// Create an empty hub
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler; it stays registered while the returned guard lives
    #[must_use = "dropping the subscription unregisters the handler"]
    pub fn subscribe(&self, handler: impl Fn(&mut E) + Send + Sync + 'static) -> Subscription {
        let id = {
            let mut registry = self.registry.lock();
            let id = registry.next_id;
            registry.next_id += 1;
            registry.handlers.push((id, Arc::new(handler)));
            id
        };

        let weak: Weak<Mutex<Registry<E>>> = Arc::downgrade(&self.registry);
        Subscription {
            release: Some(Box::new(move || {
                if let Some(registry) = weak.upgrade() {
                    registry.lock().handlers.retain(|(hid, _)| *hid != id);
                }
            })),
        }
    }

    /// Dispatch an event to handlers in subscription order
    ///
    /// Dispatch stops at the first handler that leaves the event consumed.
    /// The handler list is snapshotted first, so handlers may subscribe or
    /// unsubscribe while running.
    pub fn publish(&self, event: &mut E) {
        let handlers: Vec<Handler<E>> = self
            .registry
            .lock()
            .handlers
            .iter()
            .map(|(_, h)| Arc::clone(h))
            .collect();

        for handler in handlers {
            handler(event);
            if event.is_consumed() {
                break;
            }
        }
    }

    /// Convenience for events passed by value
    pub fn emit(&self, mut event: E) {
        self.publish(&mut event);
    }
}

impl<E> EventHub<E> {
    /// Number of live registrations
    pub fn handler_count(&self) -> usize {
        self.registry.lock().handlers.len()
    }
}

/// Guard for a registered handler
pub struct Subscription {
    release: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    /// Remove the handler now
    pub fn unsubscribe(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}
