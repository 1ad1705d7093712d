//! One window-resize source shared by every mounted chart.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, OnceLock, Weak};

use crate::chart::Size;
use crate::internal::lock::lock;

pub type ResizeListener = Arc<dyn Fn(Size) + Send + Sync>;

#[derive(Default)]
struct Registry {
    next: u64,
    listeners: BTreeMap<u64, ResizeListener>,
}

/// Fans a single resize notification out to every registered listener.
///
/// Clones share the same registry.
#[derive(Clone, Default)]
pub struct ResizeDispatcher {
    registry: Arc<Mutex<Registry>>,
}

impl ResizeDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide dispatcher.
    pub fn global() -> &'static ResizeDispatcher {
        static GLOBAL: OnceLock<ResizeDispatcher> = OnceLock::new();
        GLOBAL.get_or_init(ResizeDispatcher::new)
    }

    pub fn register<F>(&self, listener: F) -> ResizeRegistration
    where
        F: Fn(Size) + Send + Sync + 'static,
    {
        let mut reg = lock(&self.registry);
        let id = reg.next;
        reg.next += 1;
        reg.listeners.insert(id, Arc::new(listener));
        ResizeRegistration {
            id,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Notifies every listener; returns how many were called.
    ///
    /// Listeners run outside the registry lock, so they may register or unregister.
    pub fn dispatch(&self, size: Size) -> usize {
        let listeners: Vec<ResizeListener> = lock(&self.registry).listeners.values().cloned().collect();
        for l in &listeners {
            l(size);
        }
        listeners.len()
    }

    pub fn listener_count(&self) -> usize {
        lock(&self.registry).listeners.len()
    }
}

/// Proof of registration. Consumed by [`ResizeRegistration::unregister`].
#[must_use = "dropping the registration leaves the listener installed"]
pub struct ResizeRegistration {
    id: u64,
    registry: Weak<Mutex<Registry>>,
}

impl ResizeRegistration {
    /// Removes the listener. Returns `false` if the dispatcher is gone or it was already removed.
    pub fn unregister(self) -> bool {
        match self.registry.upgrade() {
            Some(reg) => lock(&reg).listeners.remove(&self.id).is_some(),
            None => false,
        }
    }
}
