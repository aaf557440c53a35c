// SPDX-License-Identifier: MIT OR Apache-2.0
//! Default stacking priorities for new nodes and edges.

use serde::{Deserialize, Serialize};

/// How a priority is chosen when a request omits one
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PriorityPolicy {
    /// Every entity gets the same value
    Constant(f64),
    /// Each new entity stacks above the previous one
    Incremental,
}

impl Default for PriorityPolicy {
    fn default() -> Self {
        PriorityPolicy::Constant(0.0)
    }
}

/// Hands out priorities according to a policy
#[derive(Debug, Clone)]
pub struct PriorityGenerator {
    policy: PriorityPolicy,
    counter: u64,
}

impl PriorityGenerator {
    /// Create a generator
    pub fn new(policy: PriorityPolicy) -> Self {
        Self { policy, counter: 0 }
    }

    /// The policy in use
    pub fn policy(&self) -> PriorityPolicy {
        self.policy
    }

    /// Next priority
    pub fn next_priority(&mut self) -> f64 {
        match self.policy {
            PriorityPolicy::Constant(value) => value,
            PriorityPolicy::Incremental => {
                let value = self.counter as f64;
                self.counter += 1;
                value
            }
        }
    }

    /// Restart the sequence (after a clear)
    pub fn reset(&mut self) {
        self.counter = 0;
    }
}
