use alloc::vec::Vec;
use core::fmt;
use core::iter::Rev;
use core::slice;

use log::debug;

/// A last-in, first-out sequence.
///
/// The top of the stack is the end of the backing vector, so `push`, `pop`
/// and `peek` are O(1).
pub struct Stack<T> {
    items: Vec<T>,
}

impl<T> Stack<T> {
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, value: T) {
        self.items.push(value);
    }

    /// removes the most recently pushed element
    pub fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    pub fn peek(&self) -> Option<&T> {
        self.items.last()
    }

    pub fn peek_mut(&mut self) -> Option<&mut T> {
        self.items.last_mut()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        debug!("stack: clearing {} elements", self.items.len());
        self.items.clear();
    }

    /// walks from the top down
    pub fn iter(&self) -> Rev<slice::Iter<'_, T>> {
        self.items.iter().rev()
    }
}

impl<T> Default for Stack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for Stack<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stack").field("items", &self.items).finish()
    }
}

impl<T> Extend<T> for Stack<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}

/// pushes in iteration order, so the last element ends up on top
impl<T> FromIterator<T> for Stack<T> {
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

    #[test]
    fn pops_in_reverse_push_order() {
        let mut stack = Stack::new();
        stack.push(1);
        stack.push(2);
        stack.push(3);

        assert_eq!(stack.pop(), Some(3));
        assert_eq!(stack.pop(), Some(2));
        assert_eq!(stack.peek(), Some(&1));
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn empty_stack_yields_nothing() {
        let mut stack: Stack<i32> = Stack::new();
        assert!(stack.is_empty());
        assert_eq!(stack.pop(), None);
        assert_eq!(stack.peek(), None);
    }

    #[test]
    fn peek_mut_changes_top() {
        let mut stack: Stack<i32> = [1, 2].into_iter().collect();
        if let Some(top) = stack.peek_mut() {
            *top = 20;
        }
        assert_eq!(stack.iter().copied().collect::<Vec<_>>(), vec![20, 1]);
    }

    #[test]
    fn clear_resets() {
        let mut stack: Stack<i32> = (0..5).collect();
        stack.clear();
        assert!(stack.is_empty());
        assert_eq!(stack.len(), 0);
    }
}
