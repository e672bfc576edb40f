use alloc::collections::VecDeque;
use alloc::collections::vec_deque;
use core::fmt;

use log::debug;

/// A first-in, first-out sequence.
///
/// Backed by a ring buffer, so removing from the front does not shift the
/// remaining elements.
pub struct Queue<T> {
    items: VecDeque<T>,
}

impl<T> Queue<T> {
    pub const fn new() -> Self {
        Self {
            items: VecDeque::new(),
        }
    }

    pub fn enqueue(&mut self, value: T) {
        self.items.push_back(value);
    }

    /// removes the earliest enqueued element
    pub fn dequeue(&mut self) -> Option<T> {
        self.items.pop_front()
    }

    pub fn front(&self) -> Option<&T> {
        self.items.front()
    }

    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.items.front_mut()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        debug!("queue: clearing {} elements", self.items.len());
        self.items.clear();
    }

    /// walks from the front to the back
    pub fn iter(&self) -> vec_deque::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T> Default for Queue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for Queue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Queue").field("items", &self.items).finish()
    }
}

impl<T> Extend<T> for Queue<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}

impl<T> FromIterator<T> for Queue<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;

    #[test]
    fn dequeues_in_enqueue_order() {
        let mut queue = Queue::new();
        queue.enqueue(1);
        queue.enqueue(2);
        queue.enqueue(3);

        assert_eq!(queue.dequeue(), Some(1));
        assert_eq!(queue.dequeue(), Some(2));
        assert_eq!(queue.front(), Some(&3));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn empty_queue_yields_nothing() {
        let mut queue: Queue<i32> = Queue::new();
        assert!(queue.is_empty());
        assert_eq!(queue.dequeue(), None);
        assert_eq!(queue.front(), None);
    }

    #[test]
    fn interleaved_operations_keep_order() {
        let mut queue: Queue<i32> = (1..=3).collect();
        assert_eq!(queue.dequeue(), Some(1));
        queue.enqueue(4);
        if let Some(front) = queue.front_mut() {
            *front = 20;
        }
        assert_eq!(queue.iter().copied().collect::<Vec<_>>(), vec![20, 3, 4]);
    }

    #[test]
    fn clear_resets() {
        let mut queue: Queue<i32> = (0..5).collect();
        queue.clear();
        assert!(queue.is_empty());
        assert_eq!(queue.len(), 0);
    }
}
