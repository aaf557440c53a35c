// SPDX-License-Identifier: MIT OR Apache-2.0
//! Identifier primitives and the id generator.
//!
//! Node, port and edge ids live in independent namespaces: `NodeId(1)` and
//! `PortId(1)` never collide. Callers may pick ids themselves; whatever they
//! leave out is filled in by an [`IdGenerator`] that skips values already in
//! use.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;

/// Identifier types backed by a raw integer
pub trait RawId: Copy + Eq + Hash + fmt::Debug {
    /// Build the id from its raw value
    fn from_raw(raw: u64) -> Self;

    /// The raw value
    fn raw(self) -> u64;
}

/// Unique identifier for a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl RawId for NodeId {
    fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// Unique identifier for a port
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PortId(pub u64);

impl RawId for PortId {
    fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PortId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "port#{}", self.0)
    }
}

/// Unique identifier for an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeId(pub u64);

impl RawId for EdgeId {
    fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "edge#{}", self.0)
    }
}

/// Opaque handle to a render target (a DOM element, a widget, a sprite).
///
/// The registry only compares handles; it never looks behind them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ElementHandle(pub u64);

/// Monotonic id generator that skips ids already in use
#[derive(Debug, Clone)]
pub struct IdGenerator<I> {
    next: u64,
    _marker: PhantomData<I>,
}

impl<I: RawId> IdGenerator<I> {
    /// Create a generator starting at zero
    pub fn new() -> Self {
        Self {
            next: 0,
            _marker: PhantomData,
        }
    }

    /// Produce the next id for which `in_use` returns false
    pub fn create(&mut self, mut in_use: impl FnMut(I) -> bool) -> I {
        loop {
            let candidate = I::from_raw(self.next);
            self.next += 1;
            if !in_use(candidate) {
                return candidate;
            }
        }
    }

    /// Return to the initial state
    pub fn reset(&mut self) {
        self.next = 0;
    }
}

impl<I: RawId> Default for IdGenerator<I> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generator_is_monotonic() {
        let mut gen = IdGenerator::<NodeId>::new();
        assert_eq!(gen.create(|_| false), NodeId(0));
        assert_eq!(gen.create(|_| false), NodeId(1));
        assert_eq!(gen.create(|_| false), NodeId(2));
    }

    #[test]
    fn test_generator_skips_used_ids() {
        let used: HashSet<_> = [PortId(0), PortId(1), PortId(3)].into_iter().collect();
        let mut gen = IdGenerator::<PortId>::new();

        assert_eq!(gen.create(|id| used.contains(&id)), PortId(2));
        assert_eq!(gen.create(|id| used.contains(&id)), PortId(4));
    }

    #[test]
    fn test_generator_reset() {
        let mut gen = IdGenerator::<EdgeId>::new();
        gen.create(|_| false);
        gen.create(|_| false);
        gen.reset();
        assert_eq!(gen.create(|_| false), EdgeId(0));
    }

    #[test]
    fn test_id_display() {
        assert_eq!(NodeId(4).to_string(), "node#4");
        assert_eq!(PortId(4).to_string(), "port#4");
        assert_eq!(EdgeId(4).to_string(), "edge#4");
    }
}
