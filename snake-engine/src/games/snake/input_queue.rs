use std::collections::VecDeque;

use super::types::Direction;

pub const DEFAULT_INPUT_QUEUE_CAPACITY: usize = 3;

/// Buffered turns between ticks. Reversals are accepted here and filtered
/// against the live heading when a tick resolves them.
#[derive(Clone, Debug)]
pub struct InputQueue {
    entries: VecDeque<Direction>,
    capacity: usize,
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new(DEFAULT_INPUT_QUEUE_CAPACITY)
    }
}

impl InputQueue {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Returns whether the direction was queued. Full queues and repeats of
    /// the current tail are dropped.
    pub fn enqueue(&mut self, direction: Direction) -> bool {
        if self.entries.len() >= self.capacity {
            return false;
        }
        if self.entries.back() == Some(&direction) {
            return false;
        }
        self.entries.push_back(direction);
        true
    }

    /// First queued direction that does not reverse `current`. Everything up
    /// to and including it is consumed; when nothing qualifies the queue ends
    /// up empty.
    pub fn dequeue_next_valid(&mut self, current: Direction) -> Option<Direction> {
        while let Some(direction) = self.entries.pop_front() {
            if !direction.is_opposite(&current) {
                return Some(direction);
            }
        }
        None
    }

    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        self.entries.truncate(self.capacity);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Direction> {
        self.entries.iter()
    }
}
