use std::collections::VecDeque;

/// FIFO queue of notifications that arrived between two ticks.
///
/// Notifications are delivered in arrival order so that handlers observe
/// join/part/pause sequences exactly as the host produced them.
#[derive(Debug)]
pub struct EventQueue<E> {
    queue: VecDeque<E>,
}

impl<E> Default for EventQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> EventQueue<E> {
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }

    pub fn push(&mut self, event: E) {
        self.queue.push_back(event);
    }

    /// Remove and return everything queued so far, oldest first.
    pub fn drain(&mut self) -> Vec<E> {
        self.queue.drain(..).collect()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
