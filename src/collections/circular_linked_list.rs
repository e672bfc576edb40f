use alloc::boxed::Box;
use core::fmt;
use core::iter::{Enumerate, FusedIterator};
use core::marker::PhantomData;
use core::ptr::NonNull;

use log::{debug, trace};

use super::LinkedList;
use crate::error::ListError;

type Link<T> = Option<NonNull<Node<T>>>;

/// A node of a `CircularLinkedList`.
///
/// A linked node always has a successor: the last node points back at the
/// head, and a lone node points at itself.
pub struct Node<T> {
    value: T,
    next: NonNull<Node<T>>,
}

impl<T> Node<T> {
    /// allocates a node that is its own successor
    ///
    /// ```text
    /// ┌───┐
    /// │ ┌─▼──┐
    /// └─┤val │
    ///   └────┘
    /// ```
    fn new(value: T) -> NonNull<Self> {
        let mut node = NonNull::from(Box::leak(Box::new(Self {
            value,
            next: NonNull::dangling(),
        })));
        unsafe { node.as_mut().next = node };
        node
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn next(&self) -> &Self {
        unsafe { self.next.as_ref() }
    }
}

/// A singly linked ring.
///
/// Following `next` from the head `len` times lands on the head again. There
/// is no null terminator, so every walk is bounded by coming back to the head
/// rather than by running out of nodes.
pub struct CircularLinkedList<T> {
    head: Link<T>,
    len: usize,
    phantom: PhantomData<Box<Node<T>>>,
}

impl<T> CircularLinkedList<T> {
    pub const fn new() -> Self {
        Self {
            head: None,
            len: 0,
            phantom: PhantomData,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    pub fn head(&self) -> Option<&Node<T>> {
        self.head.map(|node| unsafe { node.as_ref() })
    }

    pub fn append(&mut self, value: T) {
        let mut node = Node::new(value);

        match self.head {
            Some(head) => unsafe {
                let mut last = Self::last_node(head);
                last.as_mut().next = node;
                node.as_mut().next = head;
            },
            None => self.head = Some(node),
        }
        self.len += 1;
    }

    /// Inserts `value` at position `index`.
    ///
    /// Does nothing when `index` is past the end of the list; the ring is
    /// never wrapped around to find a position.
    pub fn insert_at(&mut self, index: usize, value: T) {
        if let Err(err) = self.try_insert_at(index, value) {
            trace!(
                "circular linked list: insert_at({index}) ignored at length {}: {err}",
                self.len
            );
        }
    }

    /// Removes the element at position `index`.
    ///
    /// Does nothing when the list is empty or `index` is past the last element.
    pub fn delete_at(&mut self, index: usize) {
        if let Err(err) = self.try_delete_at(index) {
            trace!(
                "circular linked list: delete_at({index}) ignored at length {}: {err}",
                self.len
            );
        }
    }

    /// Like `insert_at`, but hands the value back when `index > len`.
    pub fn try_insert_at(&mut self, index: usize, value: T) -> Result<(), ListError<T>> {
        if index > self.len {
            return Err(ListError::IndexOutOfRange {
                index,
                len: self.len,
                value: Some(value),
            });
        }

        let mut node = Node::new(value);

        match (self.head, index.checked_sub(1)) {
            (None, _) => self.head = Some(node),
            (Some(head), None) => unsafe {
                let mut last = Self::last_node(head);
                node.as_mut().next = head;
                last.as_mut().next = node;
                self.head = Some(node);
            },
            (Some(head), Some(prev)) => unsafe {
                let mut target = Self::node_at(head, prev);
                node.as_mut().next = target.as_ref().next;
                target.as_mut().next = node;
            },
        }
        self.len += 1;
        Ok(())
    }

    /// Like `delete_at`, but returns the removed element.
    pub fn try_delete_at(&mut self, index: usize) -> Result<T, ListError<T>> {
        let Some(head) = self.head else {
            return Err(ListError::Empty);
        };
        if index >= self.len {
            return Err(ListError::IndexOutOfRange {
                index,
                len: self.len,
                value: None,
            });
        }

        let removed = match index.checked_sub(1) {
            None if self.len == 1 => {
                self.head = None;
                head
            }
            None => unsafe {
                let mut last = Self::last_node(head);
                let new_head = head.as_ref().next;
                last.as_mut().next = new_head;
                self.head = Some(new_head);
                head
            },
            Some(prev) => unsafe {
                let mut target = Self::node_at(head, prev);
                let removed = target.as_ref().next;
                target.as_mut().next = removed.as_ref().next;
                removed
            },
        };
        self.len -= 1;

        let removed = unsafe { Box::from_raw(removed.as_ptr()) };
        Ok(removed.value)
    }

    pub fn clear(&mut self) {
        debug!("circular linked list: clearing {} nodes", self.len);
        *self = Self::new();
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter(self.nodes())
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut {
            head: self.head,
            next: self.head,
            remaining: self.len,
            phantom: PhantomData,
        }
    }

    /// Walks the ring once from the head, yielding each node with its
    /// position. A ring of `n` nodes yields exactly `n` entries.
    pub fn entries(&self) -> Enumerate<Nodes<'_, T>> {
        self.nodes().enumerate()
    }

    /// the ordered view a caller renders; same as `entries`
    pub fn print(&self) -> Enumerate<Nodes<'_, T>> {
        self.entries()
    }

    fn nodes(&self) -> Nodes<'_, T> {
        Nodes {
            head: self.head,
            next: self.head,
            remaining: self.len,
            phantom: PhantomData,
        }
    }

    /// the node whose successor is `head`
    ///
    /// # Safety
    /// `head` must be the head of a well-formed ring.
    unsafe fn last_node(head: NonNull<Node<T>>) -> NonNull<Node<T>> {
        let mut current = head;
        unsafe {
            while current.as_ref().next != head {
                current = current.as_ref().next;
            }
        }
        current
    }

    /// # Safety
    /// `head` must be the head of a well-formed ring.
    unsafe fn node_at(head: NonNull<Node<T>>, steps: usize) -> NonNull<Node<T>> {
        let mut current = head;
        for _ in 0..steps {
            current = unsafe { current.as_ref().next };
        }
        current
    }
}

impl<T> LinkedList<T> for CircularLinkedList<T> {
    type Node = Node<T>;

    fn head(&self) -> Option<&Node<T>> {
        Self::head(self)
    }

    fn len(&self) -> usize {
        Self::len(self)
    }

    fn append(&mut self, value: T) {
        Self::append(self, value)
    }

    fn insert_at(&mut self, index: usize, value: T) {
        Self::insert_at(self, index, value)
    }

    fn delete_at(&mut self, index: usize) {
        Self::delete_at(self, index)
    }

    fn entries<'a>(&'a self) -> impl Iterator<Item = (usize, &'a Node<T>)>
    where
        Node<T>: 'a,
        T: 'a,
    {
        Self::entries(self)
    }
}

impl<T> Drop for CircularLinkedList<T> {
    fn drop(&mut self) {
        let Some(head) = self.head.take() else {
            return;
        };

        // free nodes until the walk comes back around; `head` is only
        // compared after being freed, never read
        let mut current = head;
        loop {
            let node = unsafe { Box::from_raw(current.as_ptr()) };
            current = node.next;
            if current == head {
                break;
            }
        }
    }
}

// SAFETY: the list owns its nodes exclusively, like a `Box<Node<T>>` chain,
// and nothing outside it holds the raw links.
unsafe impl<T: Send> Send for CircularLinkedList<T> {}

// SAFETY: `&CircularLinkedList` only hands out shared references to the values.
unsafe impl<T: Sync> Sync for CircularLinkedList<T> {}

impl<T> Default for CircularLinkedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for CircularLinkedList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for CircularLinkedList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for CircularLinkedList<T> {}

impl<T> Extend<T> for CircularLinkedList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.append(value);
        }
    }
}

impl<T> FromIterator<T> for CircularLinkedList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}

impl<T> IntoIterator for CircularLinkedList<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        IntoIter(self)
    }
}

impl<'a, T> IntoIterator for &'a CircularLinkedList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut CircularLinkedList<T> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> IterMut<'a, T> {
        self.iter_mut()
    }
}

/// One lap around the ring, starting at the head.
pub struct Nodes<'a, T> {
    head: Link<T>,
    next: Link<T>,
    remaining: usize,
    phantom: PhantomData<&'a Node<T>>,
}

impl<'a, T> Iterator for Nodes<'a, T> {
    type Item = &'a Node<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        let node = unsafe { &*current.as_ptr() };

        // check after advancing, so a lone node is still visited once
        self.next = Some(node.next).filter(|next| Some(*next) != self.head);
        self.remaining -= 1;
        Some(node)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Nodes<'_, T> {}

impl<T> FusedIterator for Nodes<'_, T> {}

pub struct Iter<'a, T>(Nodes<'a, T>);

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(Node::value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

pub struct IterMut<'a, T> {
    head: Link<T>,
    next: Link<T>,
    remaining: usize,
    phantom: PhantomData<&'a mut Node<T>>,
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        let node = unsafe { &mut *current.as_ptr() };

        self.next = Some(node.next).filter(|next| Some(*next) != self.head);
        self.remaining -= 1;
        Some(&mut node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {}

impl<T> FusedIterator for IterMut<'_, T> {}

pub struct IntoIter<T>(CircularLinkedList<T>);

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.0.try_delete_at(0).ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.0.len, Some(self.0.len))
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}
