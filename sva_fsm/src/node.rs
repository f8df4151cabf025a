//! Node identifiers and NFSM node records.

use contracts::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;

use sva_netlist::SigBit;

/// Index of a node in the automaton. Stable for the automaton's lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId {
    /// The underlying raw integer index.
    inner: u32,
}

impl NodeId {
    /// Creates a node id from a raw integer.
    #[ensures(ret.inner == id)]
    pub fn new(id: u32) -> Self {
        Self { inner: id }
    }

    /// Returns the index as a usize for array access.
    #[ensures(ret == self.inner as usize)]
    pub fn as_usize(self) -> usize {
        self.inner as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.inner)
    }
}

impl From<usize> for NodeId {
    #[inline]
    #[requires(u32::try_from(id).is_ok(), "id must fit in 32 bits")]
    fn from(id: usize) -> Self {
        Self { inner: id as u32 }
    }
}

impl From<NodeId> for usize {
    #[inline]
    fn from(id: NodeId) -> Self {
        id.inner as Self
    }
}

/// The distinguished nodes every automaton has.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeRole {
    /// Entered implicitly through the trigger.
    Start,
    /// Sink of the sequence automaton.
    Accept,
    /// Sink of the condition automaton.
    Cond,
}

impl fmt::Display for NodeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => write!(f, "start"),
            Self::Accept => write!(f, "accept"),
            Self::Cond => write!(f, "cond"),
        }
    }
}

/// Edges consume a clock cycle, links do not.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransitionKind {
    /// One-cycle transition.
    Edge,
    /// Same-cycle transition.
    Link,
}

impl fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Edge => write!(f, "edge"),
            Self::Link => write!(f, "link"),
        }
    }
}

/// A vertex of the nondeterministic automaton.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NFsmNode {
    /// One-cycle transitions, in creation order.
    pub edges: Vec<(NodeId, SigBit)>,
    /// Same-cycle transitions, in creation order.
    pub links: Vec<(NodeId, SigBit)>,
    /// Whether the node belongs to the condition automaton.
    pub is_cond_node: bool,
}

impl NFsmNode {
    pub(crate) const fn new(is_cond_node: bool) -> Self {
        Self {
            edges: Vec::new(),
            links: Vec::new(),
            is_cond_node,
        }
    }
}
