// SPDX-License-Identifier: MIT OR Apache-2.0
//! Synchronous publish/subscribe channels.
//!
//! Listeners run inside the call that emits, in subscription order. Graph
//! listeners receive the read facade alongside the payload, so a
//! "before removed" listener can still inspect adjacency.

use crate::facade::Graph;
use crate::ids::{EdgeId, NodeId, PortId};

/// Handle returned by `subscribe`, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener<T> = Box<dyn FnMut(&T)>;
type GraphListener<T> = Box<dyn FnMut(&Graph<'_>, &T)>;

/// A channel whose listeners receive only the payload
pub struct EventHandler<T> {
    listeners: Vec<(ListenerId, Listener<T>)>,
    next_id: u64,
}

impl<T> EventHandler<T> {
    /// Create a channel with no listeners
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    /// Register a listener
    pub fn subscribe(&mut self, listener: impl FnMut(&T) + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener; returns whether it was registered
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Call every listener with `payload`
    pub fn emit(&mut self, payload: &T) {
        for (_, listener) in &mut self.listeners {
            listener(payload);
        }
    }

    /// Number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl<T> Default for EventHandler<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A channel whose listeners also receive the graph facade
pub struct GraphEventHandler<T> {
    listeners: Vec<(ListenerId, GraphListener<T>)>,
    next_id: u64,
}

impl<T> GraphEventHandler<T> {
    /// Create a channel with no listeners
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    /// Register a listener
    pub fn subscribe(&mut self, listener: impl FnMut(&Graph<'_>, &T) + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener; returns whether it was registered
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Call every listener with the facade and `payload`
    pub fn emit(&mut self, graph: &Graph<'_>, payload: &T) {
        for (_, listener) in &mut self.listeners {
            listener(graph, payload);
        }
    }

    /// Number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl<T> Default for GraphEventHandler<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Every lifecycle channel published by the registry
#[derive(Default)]
pub struct GraphEvents {
    /// Node fully indexed
    pub after_node_added: GraphEventHandler<NodeId>,
    /// Any node field changed
    pub after_node_updated: GraphEventHandler<NodeId>,
    /// Node priority changed value
    pub after_node_priority_updated: GraphEventHandler<NodeId>,
    /// Node about to be removed, still readable
    pub before_node_removed: GraphEventHandler<NodeId>,
    /// Port fully indexed
    pub after_port_added: GraphEventHandler<PortId>,
    /// Port direction changed
    pub after_port_updated: GraphEventHandler<PortId>,
    /// Port about to be removed, still readable
    pub before_port_removed: GraphEventHandler<PortId>,
    /// Edge fully indexed
    pub after_edge_added: GraphEventHandler<EdgeId>,
    /// Edge shape replaced
    pub after_edge_shape_updated: GraphEventHandler<EdgeId>,
    /// Any edge field changed
    pub after_edge_updated: GraphEventHandler<EdgeId>,
    /// Edge priority changed value
    pub after_edge_priority_updated: GraphEventHandler<EdgeId>,
    /// Edge about to be removed, still readable
    pub before_edge_removed: GraphEventHandler<EdgeId>,
    /// Registry about to be cleared
    pub before_clear: GraphEventHandler<()>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_emit_in_subscription_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut handler = EventHandler::<u32>::new();

        let first = Rc::clone(&log);
        handler.subscribe(move |v| first.borrow_mut().push(("first", *v)));
        let second = Rc::clone(&log);
        handler.subscribe(move |v| second.borrow_mut().push(("second", *v)));

        handler.emit(&7);
        assert_eq!(*log.borrow(), vec![("first", 7), ("second", 7)]);
    }

    #[test]
    fn test_unsubscribe() {
        let count = Rc::new(RefCell::new(0));
        let mut handler = EventHandler::<()>::new();

        let counter = Rc::clone(&count);
        let id = handler.subscribe(move |_| *counter.borrow_mut() += 1);
        handler.emit(&());
        assert!(handler.unsubscribe(id));
        assert!(!handler.unsubscribe(id));
        handler.emit(&());

        assert_eq!(*count.borrow(), 1);
        assert_eq!(handler.listener_count(), 0);
    }
}
