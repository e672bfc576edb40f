use std::sync::Mutex;

use linear_collections::{CircularLinkedList, DoublyLinkedList, SinglyLinkedList};
use log::{Level, LevelFilter, Log, Metadata, Record};

struct Capture(Mutex<Vec<String>>);

impl Log for Capture {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Trace
    }

    fn log(&self, record: &Record) {
        self.0.lock().unwrap().push(record.args().to_string());
    }

    fn flush(&self) {}
}

static LOGGER: Capture = Capture(Mutex::new(Vec::new()));

#[test]
fn ignored_calls_record_operation_index_and_length() {
    log::set_logger(&LOGGER).unwrap();
    log::set_max_level(LevelFilter::Trace);

    let mut singly: SinglyLinkedList<i32> = SinglyLinkedList::new();
    singly.delete_at(4);

    let mut doubly: DoublyLinkedList<i32> = (1..=2).collect();
    doubly.insert_at(7, 0);

    let mut circular: CircularLinkedList<i32> = (1..=3).collect();
    circular.delete_at(3);

    let records = LOGGER.0.lock().unwrap().clone();
    let find = |needle: &str| records.iter().find(|r| r.contains(needle)).cloned();

    let empty = find("singly linked list: delete_at(4)").unwrap();
    assert!(empty.contains("length 0"), "{empty}");

    let insert = find("doubly linked list: insert_at(7)").unwrap();
    assert!(insert.contains("length 2"), "{insert}");

    let delete = find("circular linked list: delete_at(3)").unwrap();
    assert!(delete.contains("length 3"), "{delete}");
}
