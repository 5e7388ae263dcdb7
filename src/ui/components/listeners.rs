use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use crate::core::errors::{Error, Result};
use crate::ui::surface::{Listener, ListenerId};

/// Listener bookkeeping shared by the headless widgets.
pub struct ListenerTable<E> {
    owner: &'static str,
    capacity: Option<usize>,
    next_id: AtomicU64,
    listeners: Mutex<Vec<(ListenerId, Listener<E>)>>,
}

impl<E: Clone> ListenerTable<E> {
    pub fn unbounded(owner: &'static str) -> Self {
        Self::with_capacity(owner, None)
    }

    /// Table that refuses a new listener while one is attached.
    pub fn single(owner: &'static str) -> Self {
        Self::with_capacity(owner, Some(1))
    }

    fn with_capacity(owner: &'static str, capacity: Option<usize>) -> Self {
        Self {
            owner,
            capacity,
            next_id: AtomicU64::new(1),
            listeners: Mutex::new(Vec::new()),
        }
    }

    pub fn owner(&self) -> &'static str {
        self.owner
    }

    pub fn register(&self, listener: Listener<E>) -> Result<ListenerId> {
        let mut listeners = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
        if self.capacity.is_some_and(|cap| listeners.len() >= cap) {
            return Err(Error::registration(
                self.owner,
                "a listener is already attached",
            ));
        }
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        listeners.push((id, listener));
        Ok(id)
    }

    /// Returns whether `id` was attached.
    pub fn deregister(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    pub fn len(&self) -> usize {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Calls every listener with `event`. Listeners run outside the table lock, so they
    /// may deregister themselves.
    pub fn fire(&self, event: E) {
        let snapshot: Vec<Listener<E>> = self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in snapshot {
            listener(event.clone());
        }
    }
}
