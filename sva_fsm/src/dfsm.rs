//! Powerset construction over the link-folded automaton.
//!
//! A DFSM state is a set of simultaneously active NFSM nodes, keyed by the
//! sorted list of their ids. Each state enumerates every assignment of the
//! control bits its members look at and records, per assignment, the
//! successor state, whether the sequence matches, and whether the match
//! attempt has failed.

use std::collections::{BTreeMap, VecDeque};
use std::fmt;

use itertools::Itertools;
use sva_netlist::{Const, Netlist, SigSpec};
use tracing::{debug, info, trace};

use crate::node::{NFsmNode, NodeId};
use crate::ufsm::UFsmNode;
use crate::{FsmConfig, FsmError, SvaFsm};

/// When a DFSM state reports a failed match attempt.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RejectMode {
    /// Only once every active thread has died.
    #[default]
    All,
    /// As soon as any active thread dies, unless the sequence matches in the
    /// same cycle.
    Any,
}

/// Determinization options.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct DfsmOptions {
    /// A thread that matches stops; it reports the match once.
    pub first_match: bool,
    /// A match also needs the condition automaton to hold, and successors
    /// are kept only while both automata are still active.
    pub cond_accept: bool,
    /// Reject quantifier.
    pub reject_mode: RejectMode,
}

impl DfsmOptions {
    /// Default options: every match reported, all-threads reject.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets first-match semantics.
    #[must_use]
    pub fn with_first_match(mut self, first_match: bool) -> Self {
        self.first_match = first_match;
        self
    }

    /// Sets condition-gated acceptance.
    #[must_use]
    pub fn with_cond_accept(mut self, cond_accept: bool) -> Self {
        self.cond_accept = cond_accept;
        self
    }

    /// Sets the reject quantifier.
    #[must_use]
    pub fn with_reject_mode(mut self, reject_mode: RejectMode) -> Self {
        self.reject_mode = reject_mode;
        self
    }
}

/// One state of the deterministic automaton.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DFsmNode {
    /// Control bits the state distinguishes. Position `i` of every pattern
    /// below refers to bit `i` of this vector.
    pub ctrl: SigSpec,
    /// Successor state under each pattern, in enumeration order.
    pub edges: Vec<(Vec<NodeId>, Const)>,
    /// Patterns under which the sequence matches.
    pub accept: Vec<Const>,
    /// Patterns under which the match attempt fails.
    pub reject: Vec<Const>,
}

/// The deterministic automaton, states in key order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dfsm {
    /// Every discovered state.
    pub nodes: BTreeMap<Vec<NodeId>, DFsmNode>,
    /// Key of the initial state.
    pub start: Vec<NodeId>,
}

/// Bit mask of the positions of `spec`'s bits within `ctrl`.
fn ctrl_mask(ctrl: &SigSpec, spec: &SigSpec) -> u64 {
    spec.iter()
        .filter_map(|bit| ctrl.position(*bit))
        .fold(0, |mask, pos| mask | (1u64 << pos))
}

/// Whether every bit selected by `mask` is set in `value`.
const fn satisfied(value: u64, mask: u64) -> bool {
    value & mask == mask
}

fn state_name(state: &[NodeId]) -> String {
    format!("{{{}}}", state.iter().join(", "))
}

/// A member's controls as bit masks over the state's control vector.
struct MemberMasks {
    edges: Vec<(NodeId, u64)>,
    accept: Vec<u64>,
    cond: Vec<u64>,
}

struct Determinizer<'a> {
    nfsm: &'a [NFsmNode],
    unodes: &'a [UFsmNode],
    options: DfsmOptions,
    config: &'a FsmConfig,
}

impl Determinizer<'_> {
    fn run(&self, start: NodeId) -> Result<Dfsm, FsmError> {
        let start = vec![start];
        let mut nodes = BTreeMap::new();
        let mut queue = VecDeque::from([start.clone()]);

        while let Some(state) = queue.pop_front() {
            if nodes.contains_key(&state) {
                continue;
            }
            if nodes.len() >= self.config.max_dfsm_states {
                return Err(FsmError::StateLimit {
                    limit: self.config.max_dfsm_states,
                });
            }

            let dnode = self.create_dnode(&state)?;
            for (next, _) in &dnode.edges {
                if !nodes.contains_key(next) {
                    queue.push_back(next.clone());
                }
            }
            nodes.insert(state, dnode);
        }

        Ok(Dfsm { nodes, start })
    }

    /// Edges of `unode` into nodes that can still match. A thread taking any
    /// other edge is dead on arrival, so such edges are dropped here.
    fn live_edges<'u>(&'u self, unode: &'u UFsmNode) -> impl Iterator<Item = &'u (NodeId, SigSpec)> + 'u {
        let unodes: &'u [UFsmNode] = self.unodes;
        unode.edges.iter().filter(move |(target, _)| unodes[target.as_usize()].live)
    }

    fn create_dnode(&self, state: &[NodeId]) -> Result<DFsmNode, FsmError> {
        let members: Vec<&UFsmNode> = state.iter().map(|n| &self.unodes[n.as_usize()]).collect();

        let mut ctrl = SigSpec::new();
        for unode in &members {
            for (_, spec) in self.live_edges(unode) {
                ctrl.extend(spec);
            }
            for spec in unode.accept.iter().chain(&unode.cond) {
                ctrl.extend(spec);
            }
        }
        ctrl.sort_and_unify();

        let limit = self.config.max_ctrl_bits.min(63);
        if ctrl.len() > limit {
            return Err(FsmError::CtrlTooWide {
                state: state_name(state),
                width: ctrl.len(),
                limit,
            });
        }

        let masks: Vec<MemberMasks> = members
            .iter()
            .map(|unode| MemberMasks {
                edges: self
                    .live_edges(unode)
                    .map(|(t, s)| (*t, ctrl_mask(&ctrl, s)))
                    .collect(),
                accept: unode.accept.iter().map(|s| ctrl_mask(&ctrl, s)).collect(),
                cond: unode.cond.iter().map(|s| ctrl_mask(&ctrl, s)).collect(),
            })
            .collect();

        let mut dnode = DFsmNode {
            ctrl,
            ..DFsmNode::default()
        };
        let width = dnode.ctrl.len();

        for value in 0..(1u64 << width) {
            let pattern = Const::from_uint(value, width);

            let mut accept = false;
            let mut cond = false;
            let mut any_dead = false;
            for member in &masks {
                let member_accepts = member.accept.iter().any(|m| satisfied(value, *m));
                let member_conds = member.cond.iter().any(|m| satisfied(value, *m));
                let member_moves = member.edges.iter().any(|(_, m)| satisfied(value, *m));
                accept |= member_accepts;
                cond |= member_conds;
                any_dead |= !(member_accepts || member_conds || member_moves);
            }
            if accept && self.options.cond_accept {
                accept = cond;
            }

            let mut next = Vec::new();
            let mut next_cond = false;
            let mut next_seq = false;
            if !(accept && self.options.first_match) {
                for member in &masks {
                    for (target, mask) in &member.edges {
                        if satisfied(value, *mask) {
                            if self.nfsm[target.as_usize()].is_cond_node {
                                next_cond = true;
                            } else {
                                next_seq = true;
                            }
                            next.push(*target);
                        }
                    }
                }
            }
            if self.options.cond_accept && !(next_cond && next_seq) {
                next.clear();
            }

            if accept {
                dnode.accept.push(pattern.clone());
            }

            let reject = !accept
                && match self.options.reject_mode {
                    RejectMode::All => next.is_empty(),
                    RejectMode::Any => next.is_empty() || any_dead,
                };
            if reject {
                dnode.reject.push(pattern.clone());
            }

            if !next.is_empty() {
                next.sort_unstable();
                next.dedup();
                trace!("{} --{}--> {}", state_name(state), pattern, state_name(&next));
                dnode.edges.push((next, pattern));
            }
        }

        Ok(dnode)
    }
}

impl<N: Netlist> SvaFsm<'_, N> {
    /// Determinizes the automaton. Does not touch the netlist.
    pub fn dfsm(&self, options: DfsmOptions) -> Result<Dfsm, FsmError> {
        let unodes = self.ufsm()?;
        let dfsm = Determinizer {
            nfsm: &self.nodes,
            unodes: &unodes,
            options,
            config: &self.config,
        }
        .run(self.start)?;

        info!(
            "determinized {} NFSM nodes into {} DFSM states",
            self.nodes.len(),
            dfsm.nodes.len()
        );
        if tracing::enabled!(tracing::Level::DEBUG) {
            debug!("\n{}", dfsm);
        }
        Ok(dfsm)
    }
}

impl fmt::Display for Dfsm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- DFSM ({} states) ---", self.nodes.len())?;
        for (state, dnode) in &self.nodes {
            let marker = if *state == self.start { " (start)" } else { "" };
            writeln!(f, "  {}{} ctrl {}", state_name(state), marker, dnode.ctrl)?;
            for (next, pattern) in &dnode.edges {
                writeln!(f, "    {} -> {}", pattern, state_name(next))?;
            }
            for pattern in &dnode.accept {
                writeln!(f, "    {pattern} accept")?;
            }
            for pattern in &dnode.reject {
                writeln!(f, "    {pattern} reject")?;
            }
        }
        Ok(())
    }
}
