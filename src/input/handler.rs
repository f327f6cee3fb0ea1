//! Listener registration with explicit, releasable keys.

use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic source of listener keys, unique across every observable.
static NEXT_LISTENER_KEY: AtomicU64 = AtomicU64::new(1);

/// Handle returned by [`Observable::on`]; pass it to [`Observable::un_by_key`]
/// to release the listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerKey(u64);

impl ListenerKey {
    fn next() -> Self {
        Self(NEXT_LISTENER_KEY.fetch_add(1, Ordering::Relaxed))
    }
}

type Listener<E> = Box<dyn Fn(&E) + Send + Sync>;

/// A synchronous event source. Listeners run in registration order on the
/// thread that calls [`Observable::emit`].
pub struct Observable<E> {
    listeners: Vec<(ListenerKey, Listener<E>)>,
}

impl<E> Observable<E> {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    /// Register a listener
    pub fn on<F>(&mut self, callback: F) -> ListenerKey
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let key = ListenerKey::next();
        self.listeners.push((key, Box::new(callback)));
        key
    }

    /// Release a listener. Returns `false` when the key is unknown or was
    /// already released.
    pub fn un_by_key(&mut self, key: ListenerKey) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(k, _)| *k != key);
        self.listeners.len() != before
    }

    /// Deliver an event to every listener
    pub fn emit(&self, event: &E) {
        for (_, callback) in &self.listeners {
            callback(event);
        }
    }

    pub fn has_listener(&self, key: ListenerKey) -> bool {
        self.listeners.iter().any(|(k, _)| *k == key)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn clear(&mut self) {
        self.listeners.clear();
    }
}

impl<E> Default for Observable<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> std::fmt::Debug for Observable<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observable")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
