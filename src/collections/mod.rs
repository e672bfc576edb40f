pub mod circular_linked_list;
pub mod doubly_linked_list;
pub mod queue;
pub mod singly_linked_list;
pub mod stack;

pub use circular_linked_list::CircularLinkedList;
pub use doubly_linked_list::DoublyLinkedList;
pub use queue::Queue;
pub use singly_linked_list::SinglyLinkedList;
pub use stack::Stack;

/// Operations shared by the linked list variants.
///
/// Positions are zero-based. `insert_at` accepts `0..=len` and `delete_at`
/// accepts `0..len`; anything else leaves the list untouched.
pub trait LinkedList<T> {
    type Node;

    /// the first node, if any
    fn head(&self) -> Option<&Self::Node>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// adds `value` after the last node
    fn append(&mut self, value: T);

    /// splices `value` in so that it ends up at position `index`
    fn insert_at(&mut self, index: usize, value: T);

    /// unlinks and drops the node at position `index`
    fn delete_at(&mut self, index: usize);

    /// walks the list from the head, yielding each node with its position
    fn entries<'a>(&'a self) -> impl Iterator<Item = (usize, &'a Self::Node)>
    where
        Self::Node: 'a,
        T: 'a;
}
