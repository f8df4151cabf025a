//! Error type for automaton construction and synthesis.

use crate::node::{NodeId, NodeRole, TransitionKind};
use crate::context::ContextKind;

/// Contract violations raised while building or synthesizing an automaton.
///
/// None of these are recoverable: they mean the translator produced a
/// malformed automaton, and the automaton must be abandoned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FsmError {
    /// A transition names a node that does not exist.
    #[error("Node {node} is out of range ({count} nodes)")]
    NodeOutOfRange {
        /// The offending id.
        node: NodeId,
        /// Number of nodes at the time.
        count: usize,
    },

    /// A sink node was used as a transition source.
    #[error("The {role} node {node} cannot be the source of a {kind}")]
    ForbiddenSource {
        /// The node.
        node: NodeId,
        /// Its role.
        role: NodeRole,
        /// Edge or link.
        kind: TransitionKind,
    },

    /// A transition targets a node that may not be entered this way.
    #[error("The {role} node {node} cannot be the target of a {kind}")]
    ForbiddenTarget {
        /// The node.
        node: NodeId,
        /// Its role.
        role: NodeRole,
        /// Edge or link.
        kind: TransitionKind,
    },

    /// A transition connects the sequence automaton to the condition automaton.
    #[error("The {kind} {from} -> {to} crosses between sequence and condition nodes")]
    CrossSpace {
        /// Source node.
        from: NodeId,
        /// Target node.
        to: NodeId,
        /// Edge or link.
        kind: TransitionKind,
    },

    /// `pop_*` without a matching `push_*`.
    #[error("Pop of empty {0} stack")]
    UnbalancedPop(ContextKind),

    /// Same-cycle links form a loop.
    #[error("Links form a cycle through node {0}")]
    LinkCycle(NodeId),

    /// A DFSM state depends on too many control bits to enumerate.
    #[error("DFSM state {state} has {width} control bits (limit {limit})")]
    CtrlTooWide {
        /// The state, as its list of NFSM nodes.
        state: String,
        /// Control bits it distinguishes.
        width: usize,
        /// Configured limit.
        limit: usize,
    },

    /// Determinization discovered more states than allowed.
    #[error("Determinization exceeded {limit} DFSM states")]
    StateLimit {
        /// Configured limit.
        limit: usize,
    },
}
