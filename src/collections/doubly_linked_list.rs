use alloc::boxed::Box;
use core::fmt;
use core::iter::{Enumerate, FusedIterator};
use core::marker::PhantomData;
use core::ptr::NonNull;

use log::{debug, trace};

use super::LinkedList;
use crate::error::ListError;

type Link<T> = Option<NonNull<Node<T>>>;

/// A node of a `DoublyLinkedList`.
///
/// The list owns every node; `next` and `prev` are plain links between them.
pub struct Node<T> {
    value: T,
    next: Link<T>,
    prev: Link<T>,
}

impl<T> Node<T> {
    fn new(value: T) -> NonNull<Self> {
        let node = Box::new(Self {
            value,
            next: None,
            prev: None,
        });
        NonNull::from(Box::leak(node))
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn next(&self) -> Option<&Self> {
        // nodes linked from a live node are owned by the same list, which
        // outlives `&self`
        self.next.map(|node| unsafe { node.as_ref() })
    }

    pub fn prev(&self) -> Option<&Self> {
        self.prev.map(|node| unsafe { node.as_ref() })
    }
}

/// A chain of heap nodes linked in both directions.
///
/// For every node `x` with a successor `y`, `y.prev == x`, and the head has
/// no predecessor. The list keeps a tail link as well so it can be walked
/// backwards and appended to without a full traversal.
pub struct DoublyLinkedList<T> {
    head: Link<T>,
    tail: Link<T>,
    len: usize,
    phantom: PhantomData<Box<Node<T>>>,
}

impl<T> DoublyLinkedList<T> {
    pub const fn new() -> Self {
        Self {
            head: None,
            tail: None,
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

    pub fn tail(&self) -> Option<&Node<T>> {
        self.tail.map(|node| unsafe { node.as_ref() })
    }

    pub fn append(&mut self, value: T) {
        let mut node = Node::new(value);

        match self.tail {
            Some(mut last) => unsafe {
                debug_assert!(last.as_ref().next.is_none());
                node.as_mut().prev = Some(last);
                last.as_mut().next = Some(node);
            },
            None => self.head = Some(node),
        }
        self.tail = Some(node);
        self.len += 1;
    }

    /// Inserts `value` at position `index`.
    ///
    /// Does nothing when `index` is past the end of the list.
    pub fn insert_at(&mut self, index: usize, value: T) {
        if let Err(err) = self.try_insert_at(index, value) {
            trace!(
                "doubly linked list: insert_at({index}) ignored at length {}: {err}",
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
                "doubly linked list: delete_at({index}) ignored at length {}: {err}",
                self.len
            );
        }
    }

    /// Like `insert_at`, but hands the value back when `index > len`.
    pub fn try_insert_at(&mut self, index: usize, value: T) -> Result<(), ListError<T>> {
        let Some(prev) = index.checked_sub(1) else {
            self.push_front(value);
            return Ok(());
        };

        let Some(mut target) = self.node_at(prev) else {
            return Err(ListError::IndexOutOfRange {
                index,
                len: self.len,
                value: Some(value),
            });
        };

        let mut node = Node::new(value);
        unsafe {
            let next = target.as_ref().next;

            node.as_mut().next = next;
            node.as_mut().prev = Some(target);

            match next {
                Some(mut next) => next.as_mut().prev = Some(node),
                None => self.tail = Some(node),
            }
            target.as_mut().next = Some(node);
        }
        self.len += 1;
        Ok(())
    }

    /// Like `delete_at`, but returns the removed element.
    pub fn try_delete_at(&mut self, index: usize) -> Result<T, ListError<T>> {
        if self.head.is_none() {
            return Err(ListError::Empty);
        }

        let Some(target) = self.node_at(index) else {
            return Err(ListError::IndexOutOfRange {
                index,
                len: self.len,
                value: None,
            });
        };

        Ok(unsafe { self.unlink(target) })
    }

    pub fn clear(&mut self) {
        debug!("doubly linked list: clearing {} nodes", self.len);
        *self = Self::new();
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter(self.nodes())
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut {
            head: self.head,
            tail: self.tail,
            len: self.len,
            phantom: PhantomData,
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
            head: self.head,
            tail: self.tail,
            len: self.len,
            phantom: PhantomData,
        }
    }

    fn push_front(&mut self, value: T) {
        let mut node = Node::new(value);

        match self.head {
            Some(mut old_head) => unsafe {
                node.as_mut().next = Some(old_head);
                old_head.as_mut().prev = Some(node);
            },
            None => self.tail = Some(node),
        }
        self.head = Some(node);
        self.len += 1;
    }

    fn pop_back(&mut self) -> Option<T> {
        self.tail.map(|last| unsafe { self.unlink(last) })
    }

    fn node_at(&self, index: usize) -> Link<T> {
        let mut current = self.head;
        for _ in 0..index {
            current = unsafe { current?.as_ref().next };
        }
        current
    }

    /// Detaches `target` from its neighbours and frees it.
    ///
    /// # Safety
    /// `target` must be a node of this list.
    unsafe fn unlink(&mut self, target: NonNull<Node<T>>) -> T {
        let node = unsafe { Box::from_raw(target.as_ptr()) };

        match node.prev {
            Some(mut prev) => unsafe { prev.as_mut().next = node.next },
            None => self.head = node.next,
        }

        match node.next {
            Some(mut next) => unsafe { next.as_mut().prev = node.prev },
            None => self.tail = node.prev,
        }

        self.len -= 1;
        node.value
    }
}

impl<T> LinkedList<T> for DoublyLinkedList<T> {
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

impl<T> Drop for DoublyLinkedList<T> {
    fn drop(&mut self) {
        let mut current = self.head.take();
        while let Some(node) = current {
            let node = unsafe { Box::from_raw(node.as_ptr()) };
            current = node.next;
        }
        self.tail = None;
    }
}

// SAFETY: the list owns its nodes exclusively, like a `Box<Node<T>>` chain,
// and nothing outside it holds the raw links.
unsafe impl<T: Send> Send for DoublyLinkedList<T> {}

// SAFETY: `&DoublyLinkedList` only hands out shared references to the values.
unsafe impl<T: Sync> Sync for DoublyLinkedList<T> {}

impl<T> Default for DoublyLinkedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for DoublyLinkedList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for DoublyLinkedList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for DoublyLinkedList<T> {}

impl<T> Extend<T> for DoublyLinkedList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.append(value);
        }
    }
}

impl<T> FromIterator<T> for DoublyLinkedList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}

impl<T> IntoIterator for DoublyLinkedList<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        IntoIter(self)
    }
}

impl<'a, T> IntoIterator for &'a DoublyLinkedList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut DoublyLinkedList<T> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> IterMut<'a, T> {
        self.iter_mut()
    }
}

/// Borrowing walk over the nodes, from either end.
pub struct Nodes<'a, T> {
    head: Link<T>,
    tail: Link<T>,
    len: usize,
    phantom: PhantomData<&'a Node<T>>,
}

impl<'a, T> Iterator for Nodes<'a, T> {
    type Item = &'a Node<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        self.head.map(|node| {
            let node = unsafe { &*node.as_ptr() };
            self.head = node.next;
            self.len -= 1;
            node
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<T> DoubleEndedIterator for Nodes<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        self.tail.map(|node| {
            let node = unsafe { &*node.as_ptr() };
            self.tail = node.prev;
            self.len -= 1;
            node
        })
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

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back().map(Node::value)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

pub struct IterMut<'a, T> {
    head: Link<T>,
    tail: Link<T>,
    len: usize,
    phantom: PhantomData<&'a mut Node<T>>,
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        self.head.map(|node| {
            let node = unsafe { &mut *node.as_ptr() };
            self.head = node.next;
            self.len -= 1;
            &mut node.value
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<T> DoubleEndedIterator for IterMut<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        self.tail.map(|node| {
            let node = unsafe { &mut *node.as_ptr() };
            self.tail = node.prev;
            self.len -= 1;
            &mut node.value
        })
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {}

impl<T> FusedIterator for IterMut<'_, T> {}

pub struct IntoIter<T>(DoublyLinkedList<T>);

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.0.try_delete_at(0).ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.0.len, Some(self.0.len))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        self.0.pop_back()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::ptr;

    fn values(list: &DoublyLinkedList<i32>) -> Vec<i32> {
        list.iter().copied().collect()
    }

    fn assert_links(list: &DoublyLinkedList<i32>) {
        if let Some(head) = list.head() {
            assert!(head.prev().is_none());
        }

        let nodes: Vec<&Node<i32>> = list.entries().map(|(_, node)| node).collect();
        for pair in nodes.windows(2) {
            assert!(ptr::eq(pair[1].prev().unwrap(), pair[0]));
            assert!(ptr::eq(pair[0].next().unwrap(), pair[1]));
        }

        match nodes.last() {
            Some(last) => {
                assert!(last.next().is_none());
                assert!(ptr::eq(list.tail().unwrap(), *last));
            }
            None => assert!(list.tail().is_none()),
        }
        assert_eq!(nodes.len(), list.len());
    }

    #[test]
    fn append_links_both_ways() {
        let mut list = DoublyLinkedList::new();
        list.append(1);
        list.append(2);
        list.append(3);

        assert_eq!(values(&list), vec![1, 2, 3]);
        assert_links(&list);
    }

    #[test]
    fn insert_at_keeps_links() {
        let mut list: DoublyLinkedList<i32> = [1, 2, 3].into_iter().collect();

        list.insert_at(0, 0);
        assert_links(&list);

        list.insert_at(2, 9);
        assert_links(&list);

        list.insert_at(5, 4);
        assert_links(&list);

        assert_eq!(values(&list), vec![0, 1, 9, 2, 3, 4]);
    }

    #[test]
    fn insert_into_empty_list() {
        let mut list = DoublyLinkedList::new();
        list.insert_at(0, 1);
        assert_eq!(values(&list), vec![1]);
        assert_links(&list);
    }

    #[test]
    fn insert_past_end_is_ignored() {
        let mut list: DoublyLinkedList<i32> = [1, 2].into_iter().collect();
        list.insert_at(3, 7);
        assert_eq!(values(&list), vec![1, 2]);

        let err = list.try_insert_at(4, 7).unwrap_err();
        assert_eq!(err.into_value(), Some(7));
    }

    #[test]
    fn delete_at_keeps_links() {
        let mut list: DoublyLinkedList<i32> = (1..=5).collect();

        list.delete_at(0);
        assert_links(&list);
        assert_eq!(values(&list), vec![2, 3, 4, 5]);

        list.delete_at(1);
        assert_links(&list);
        assert_eq!(values(&list), vec![2, 4, 5]);

        list.delete_at(2);
        assert_links(&list);
        assert_eq!(values(&list), vec![2, 4]);

        list.delete_at(0);
        list.delete_at(0);
        assert_links(&list);
        assert!(list.is_empty());
    }

    #[test]
    fn delete_out_of_range_is_ignored() {
        let mut list: DoublyLinkedList<i32> = [1, 2, 3].into_iter().collect();
        list.delete_at(3);
        assert_eq!(values(&list), vec![1, 2, 3]);
        assert_links(&list);

        let mut empty: DoublyLinkedList<i32> = DoublyLinkedList::new();
        empty.delete_at(0);
        assert_eq!(empty.try_delete_at(0), Err(ListError::Empty));
    }

    #[test]
    fn walks_backwards() {
        let mut list: DoublyLinkedList<i32> = (1..=4).collect();
        assert_eq!(list.iter().rev().copied().collect::<Vec<_>>(), vec![4, 3, 2, 1]);

        let mut iter = list.iter();
        assert_eq!(iter.next(), Some(&1));
        assert_eq!(iter.next_back(), Some(&4));
        assert_eq!(iter.next(), Some(&2));
        assert_eq!(iter.next_back(), Some(&3));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next_back(), None);

        for value in list.iter_mut().rev() {
            *value += 1;
        }
        assert_eq!(list.into_iter().rev().collect::<Vec<_>>(), vec![5, 4, 3, 2]);
    }

    #[test]
    fn clear_empties_list() {
        let mut list: DoublyLinkedList<i32> = (0..10).collect();
        list.clear();
        assert!(list.is_empty());
        assert_eq!(list.len(), 0);
        assert_links(&list);
    }
}
