//! Sequence automata for SystemVerilog assertions, synthesized to circuits.
//!
//! A translator describes a sequence as a nondeterministic automaton through
//! [`SvaFsm`]: nodes, one-cycle edges and same-cycle links, bracketed by
//! `disable iff` and `throughout` scopes. The automaton is then consumed by
//! one synthesis entry point:
//!
//! - [`SvaFsm::get_accept`] registers the NFSM directly and returns its
//!   accept signal.
//! - [`SvaFsm::get_first_accept`], [`SvaFsm::get_reject`] and
//!   [`SvaFsm::get_first_accept_reject`] determinize it first and return
//!   first-match accept and / or reject signals.

mod accept;
mod config;
mod context;
mod dfsm;
mod dfsm_circuit;
mod dump;
mod error;
mod fsm;
mod link;
mod node;
mod pattern;
mod ufsm;

pub use crate::accept::AcceptCircuit;
pub use crate::config::FsmConfig;
pub use crate::context::{ContextKind, ControlContext};
pub use crate::dfsm::{DFsmNode, Dfsm, DfsmOptions, RejectMode};
pub use crate::dfsm_circuit::DfsmCircuit;
pub use crate::error::FsmError;
pub use crate::fsm::SvaFsm;
pub use crate::node::{NFsmNode, NodeId, NodeRole, TransitionKind};
pub use crate::pattern::optimize_patterns;
pub use crate::ufsm::UFsmNode;
