//! Elementary linear containers: singly, doubly and circular linked lists,
//! plus a stack and a queue.
//!
//! Positional list operations never fail loudly. An index past the end is
//! ignored (and traced through `log`); the `try_*` variants report it as a
//! `ListError` instead.
#![no_std]

extern crate alloc;

#[cfg(test)]
extern crate std;

pub mod collections;
pub mod error;

pub use collections::{
    CircularLinkedList, DoublyLinkedList, LinkedList, Queue, SinglyLinkedList, Stack,
};
pub use error::ListError;
