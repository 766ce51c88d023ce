use crate::types::PingId;
use std::collections::VecDeque;

/// In-memory FIFO backlog of pings waiting for submission. Holds each ping at most once.
#[derive(Debug, Default)]
pub struct WorkQueue {
    items: VecDeque<PingId>,
}

impl WorkQueue {
    /// Appends `ping_id` unless it is already queued. Returns whether it was added.
    pub fn push(&mut self, ping_id: PingId) -> bool {
        if self.items.contains(&ping_id) {
            return false;
        }
        self.items.push_back(ping_id);
        true
    }

    pub fn pop(&mut self) -> Option<PingId> {
        self.items.pop_front()
    }

    pub fn contains(&self, ping_id: &PingId) -> bool {
        self.items.contains(ping_id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
