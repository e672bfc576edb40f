use alloc::boxed::Box;
use core::fmt;
use core::iter::{Enumerate, FusedIterator};

use log::{debug, trace};

use super::LinkedList;
use crate::error::ListError;

type Link<T> = Option<Box<Node<T>>>;

/// A node of a `SinglyLinkedList`. It owns its successor.
pub struct Node<T> {
    value: T,
    next: Link<T>,
}

impl<T> Node<T> {
    fn new(value: T) -> Box<Self> {
        Box::new(Self { value, next: None })
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn next(&self) -> Option<&Self> {
        self.next.as_deref()
    }
}

/// A forward-only chain of heap nodes.
///
/// There is no tail pointer, so `append` walks the whole chain. Insertions
/// and deletions by position walk to the node right before that position
/// and relink it.
pub struct SinglyLinkedList<T> {
    head: Link<T>,
    len: usize,
}

impl<T> SinglyLinkedList<T> {
    pub const fn new() -> Self {
        Self { head: None, len: 0 }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    pub fn head(&self) -> Option<&Node<T>> {
        self.head.as_deref()
    }

    pub fn append(&mut self, value: T) {
        let node = Node::new(value);
        let mut current = self.head.as_deref_mut();

        while let Some(last) = current {
            if last.next.is_none() {
                last.next = Some(node);
                self.len += 1;
                return;
            }
            current = last.next.as_deref_mut();
        }

        self.head = Some(node);
        self.len += 1;
    }

    /// Inserts `value` at position `index`.
    ///
    /// Does nothing when `index` is past the end of the list.
    pub fn insert_at(&mut self, index: usize, value: T) {
        if let Err(err) = self.try_insert_at(index, value) {
            trace!(
                "singly linked list: insert_at({index}) ignored at length {}: {err}",
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
                "singly linked list: delete_at({index}) ignored at length {}: {err}",
                self.len
            );
        }
    }

    /// Like `insert_at`, but hands the value back when `index > len`.
    pub fn try_insert_at(&mut self, index: usize, value: T) -> Result<(), ListError<T>> {
        let len = self.len;
        let Some(link) = self.link_mut(index) else {
            return Err(ListError::IndexOutOfRange {
                index,
                len,
                value: Some(value),
            });
        };

        let mut node = Node::new(value);
        node.next = link.take();
        *link = Some(node);
        self.len += 1;
        Ok(())
    }

    /// Like `delete_at`, but returns the removed element.
    pub fn try_delete_at(&mut self, index: usize) -> Result<T, ListError<T>> {
        if self.head.is_none() {
            return Err(ListError::Empty);
        }

        let len = self.len;
        let out_of_range = ListError::IndexOutOfRange {
            index,
            len,
            value: None,
        };
        let Some(link) = self.link_mut(index) else {
            return Err(out_of_range);
        };
        let Some(mut removed) = link.take() else {
            return Err(out_of_range);
        };

        *link = removed.next.take();
        self.len -= 1;
        Ok(removed.value)
    }

    pub fn clear(&mut self) {
        debug!("singly linked list: clearing {} nodes", self.len);
        *self = Self::new();
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter(self.nodes())
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut {
            next: self.head.as_deref_mut(),
            len: self.len,
        }
    }

    /// walks the list from the head, yielding each node with its position
    pub fn entries(&self) -> Enumerate<Nodes<'_, T>> {
        self.nodes().enumerate()
    }

    /// the ordered view a caller renders; same as `entries`
    pub fn print(&self) -> Enumerate<Nodes<'_, T>> {
        self.entries()
    }

    fn nodes(&self) -> Nodes<'_, T> {
        Nodes {
            next: self.head.as_deref(),
            len: self.len,
        }
    }

    fn node_mut(&mut self, index: usize) -> Option<&mut Node<T>> {
        let mut current = self.head.as_deref_mut();
        for _ in 0..index {
            current = current?.next.as_deref_mut();
        }
        current
    }

    /// the link that points at position `index`: the head for 0, otherwise
    /// the successor of the node at `index - 1`
    fn link_mut(&mut self, index: usize) -> Option<&mut Link<T>> {
        match index.checked_sub(1) {
            None => Some(&mut self.head),
            Some(prev) => self.node_mut(prev).map(|node| &mut node.next),
        }
    }
}

impl<T> LinkedList<T> for SinglyLinkedList<T> {
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

impl<T> Drop for SinglyLinkedList<T> {
    fn drop(&mut self) {
        // unlink one node at a time so long chains don't recurse
        let mut link = self.head.take();
        while let Some(mut node) = link {
            link = node.next.take();
        }
    }
}

impl<T> Default for SinglyLinkedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for SinglyLinkedList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for SinglyLinkedList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for SinglyLinkedList<T> {}

impl<T> Extend<T> for SinglyLinkedList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.append(value);
        }
    }
}

impl<T> FromIterator<T> for SinglyLinkedList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}

impl<T> IntoIterator for SinglyLinkedList<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        IntoIter(self)
    }
}

impl<'a, T> IntoIterator for &'a SinglyLinkedList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut SinglyLinkedList<T> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> IterMut<'a, T> {
        self.iter_mut()
    }
}

pub struct Nodes<'a, T> {
    next: Option<&'a Node<T>>,
    len: usize,
}

impl<'a, T> Iterator for Nodes<'a, T> {
    type Item = &'a Node<T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next.map(|node| {
            self.next = node.next();
            self.len -= 1;
            node
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
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
    next: Option<&'a mut Node<T>>,
    len: usize,
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<Self::Item> {
        self.next.take().map(|node| {
            self.next = node.next.as_deref_mut();
            self.len -= 1;
            &mut node.value
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {}

impl<T> FusedIterator for IterMut<'_, T> {}

pub struct IntoIter<T>(SinglyLinkedList<T>);

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
