//! Per-model event listeners
//!
//! Models own an `Observers<E>` list and notify every listener synchronously
//! at the point of the state change. UI, audio, camera shake etc. subscribe
//! independently; the ECS bridge subscribes an `EventBuffer` and drains it
//! once per tick.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

/// Callback registered on a model
pub trait Listener<E>: Send + Sync {
    fn notify(&mut self, event: &E);
}

impl<E, F> Listener<E> for F
where
    F: FnMut(&E) + Send + Sync,
{
    fn notify(&mut self, event: &E) {
        self(event)
    }
}

/// Handle returned by `Observers::subscribe`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Listener list owned by one model instance
pub struct Observers<E> {
    listeners: Vec<(ListenerId, Box<dyn Listener<E>>)>,
    next_id: u64,
}

impl<E> Default for Observers<E> {
    fn default() -> Self {
        Self {
            listeners: Vec::new(),
            next_id: 0,
        }
    }
}

impl<E> fmt::Debug for Observers<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl<E> Observers<E> {
    pub fn subscribe(&mut self, listener: impl Listener<E> + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false if the id was never registered (or already removed)
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Notify listeners in subscription order
    pub fn emit(&mut self, event: &E) {
        for (_, listener) in self.listeners.iter_mut() {
            listener.notify(event);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

/// Shared queue of events (channel-style listener)
///
/// Clones share the same storage.
#[derive(Debug)]
pub struct EventBuffer<E> {
    events: Arc<Mutex<Vec<E>>>,
}

impl<E> Clone for EventBuffer<E> {
    fn clone(&self) -> Self {
        Self {
            events: Arc::clone(&self.events),
        }
    }
}

impl<E> Default for EventBuffer<E> {
    fn default() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl<E: Clone + Send + 'static> EventBuffer<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Listener that appends every event to this buffer
    pub fn listener(&self) -> impl Listener<E> + 'static {
        let events = Arc::clone(&self.events);
        move |event: &E| {
            events
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(event.clone());
        }
    }

    /// Take all queued events (oldest first)
    pub fn drain(&self) -> Vec<E> {
        std::mem::take(&mut *self.events.lock().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn len(&self) -> usize {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
