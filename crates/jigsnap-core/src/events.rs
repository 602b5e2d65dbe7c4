//! Per-puzzle solved listeners.

use std::fmt;

/// Payload delivered when a puzzle becomes solved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolvedEvent {
    /// Number of pieces in the final group.
    pub pieces: usize,
    /// Drag-end events processed up to and including the solving one.
    pub drags: u32,
}

/// Handle returned by [`SolvedListeners::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Callback = Box<dyn FnMut(&SolvedEvent)>;

/// Listener registry owned by a single puzzle instance.
#[derive(Default)]
pub struct SolvedListeners {
    listeners: Vec<(ListenerId, Callback)>,
    next_id: u64,
}

impl SolvedListeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback; listeners run in subscription order.
    pub fn subscribe<F>(&mut self, callback: F) -> ListenerId
    where
        F: FnMut(&SolvedEvent) + 'static,
    {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(callback)));
        id
    }

    /// Remove a callback. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener, _)| *listener != id);
        self.listeners.len() != before
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Invoke every listener with `event`.
    pub fn fire(&mut self, event: &SolvedEvent) {
        for (_, callback) in &mut self.listeners {
            callback(event);
        }
    }
}

impl fmt::Debug for SolvedListeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SolvedListeners")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
