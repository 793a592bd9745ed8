//! Change notifications for graph mutations.
//!
//! Observers are notified synchronously, in registration order, after each
//! successful mutation. The list is snapshotted before notifying, so an
//! observer may be added or removed while a notification is in flight; the
//! change applies from the next notification on.

use std::cell::RefCell;
use std::rc::Rc;

use super::{Connection, GraphNode, NodeId};

/// Receives graph mutation events. All methods default to no-ops.
pub trait GraphObserver {
    /// A node was created.
    fn on_node_added(&mut self, _node: &GraphNode) {}

    /// A node was deleted. Its connections were removed (and reported) first.
    fn on_node_removed(&mut self, _id: NodeId) {}

    /// A connection was installed.
    fn on_connection_added(&mut self, _connection: &Connection) {}

    /// A connection was removed.
    fn on_connection_removed(&mut self, _connection: &Connection) {}
}

/// Token returned by [`Evaluator::add_observer`](super::Evaluator::add_observer).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObserverHandle(u64);

type SharedObserver = Rc<RefCell<dyn GraphObserver>>;

#[derive(Default)]
pub(crate) struct ObserverList {
    next: u64,
    entries: Vec<(ObserverHandle, SharedObserver)>,
}

impl ObserverList {
    pub(crate) fn add(&mut self, observer: SharedObserver) -> ObserverHandle {
        let handle = ObserverHandle(self.next);
        self.next += 1;
        self.entries.push((handle, observer));
        handle
    }

    pub(crate) fn remove(&mut self, handle: ObserverHandle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(h, _)| *h != handle);
        self.entries.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn notify(&self, mut event: impl FnMut(&mut dyn GraphObserver)) {
        if self.entries.is_empty() {
            return;
        }
        let snapshot: Vec<SharedObserver> = self.entries.iter().map(|(_, o)| Rc::clone(o)).collect();
        for observer in snapshot {
            match observer.try_borrow_mut() {
                Ok(mut guard) => event(&mut *guard),
                Err(_) => {
                    // Re-entrant mutation from inside this observer's own callback.
                    #[cfg(feature = "tracing")]
                    tracing::warn!("graph_notify: observer already borrowed, event skipped");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counter {
        removed: Vec<NodeId>,
    }

    impl GraphObserver for Counter {
        fn on_node_removed(&mut self, id: NodeId) {
            self.removed.push(id);
        }
    }

    #[test]
    fn test_notify_in_registration_order() {
        let order = Rc::new(RefCell::new(Vec::new()));

        struct Tagged(u8, Rc<RefCell<Vec<u8>>>);
        impl GraphObserver for Tagged {
            fn on_node_removed(&mut self, _id: NodeId) {
                self.1.borrow_mut().push(self.0);
            }
        }

        let mut list = ObserverList::default();
        for tag in [3, 1, 2] {
            list.add(Rc::new(RefCell::new(Tagged(tag, Rc::clone(&order)))));
        }
        list.notify(|o| o.on_node_removed(NodeId(1)));
        assert_eq!(*order.borrow(), vec![3, 1, 2]);
    }

    #[test]
    fn test_remove_handle() {
        let counter = Rc::new(RefCell::new(Counter::default()));
        let mut list = ObserverList::default();
        let handle = list.add(counter.clone());
        assert_eq!(list.len(), 1);

        list.notify(|o| o.on_node_removed(NodeId(4)));
        assert!(list.remove(handle));
        assert!(!list.remove(handle));
        list.notify(|o| o.on_node_removed(NodeId(5)));

        assert_eq!(counter.borrow().removed, vec![NodeId(4)]);
    }

    #[test]
    fn test_borrowed_observer_is_skipped() {
        let counter = Rc::new(RefCell::new(Counter::default()));
        let mut list = ObserverList::default();
        list.add(counter.clone());

        let held = counter.borrow_mut();
        list.notify(|o| o.on_node_removed(NodeId(1)));
        drop(held);

        assert!(counter.borrow().removed.is_empty());
    }
}
