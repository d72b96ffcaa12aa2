//! Bounded, append-only message history.
//!
//! The history is the context window sent to the model on each turn. It is
//! capped: once full, appending evicts the oldest turns first. Eviction is
//! silent data loss by design; callers must not assume the full transcript
//! is retained.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use super::message::Message;

/// Default number of turns retained per session.
pub const DEFAULT_HISTORY_CAPACITY: usize = 20;

/// Ordered, capacity-bounded log of conversation turns.
///
/// # Invariants
///
/// - `len() <= capacity` after every append
/// - Turns are never reordered or mutated once appended
/// - Eviction removes oldest turns first, preserving the order of the rest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageHistory {
    capacity: usize,
    messages: VecDeque<Message>,
}

impl MessageHistory {
    /// Creates an empty history with the given capacity.
    ///
    /// A capacity of zero is coerced to 1 so the newest turn is always kept.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            messages: VecDeque::new(),
        }
    }

    /// Appends a turn at the tail, evicting from the head when full.
    pub fn append(&mut self, message: Message) {
        self.messages.push_back(message);
        while self.messages.len() > self.capacity {
            self.messages.pop_front();
        }
    }

    /// Returns the ordered turns for inclusion in the next model request.
    pub fn snapshot(&self) -> Vec<Message> {
        self.messages.iter().cloned().collect()
    }

    /// Iterates over the retained turns, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    /// Returns the first retained turn, if any.
    pub fn first(&self) -> Option<&Message> {
        self.messages.front()
    }

    /// Returns the most recent turn, if any.
    pub fn last(&self) -> Option<&Message> {
        self.messages.back()
    }

    /// Returns the number of retained turns.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns true if no turns are retained.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Returns the capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for MessageHistory {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }
}
