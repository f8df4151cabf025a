//! Projection of the NFSM onto link-free transitions.
//!
//! Every link chain leaving a node is folded into that node: edges reached
//! through links become the node's own edges, and reaching the accept or
//! cond node through links records an accept or cond condition. Controls
//! collected along the way become conjunctions, kept as sorted, deduplicated
//! [`SigSpec`]s so equal conjunctions compare equal.

use std::collections::VecDeque;

use sva_netlist::{Netlist, SigBit, SigSpec};
use tracing::debug;

use crate::link::link_ranks;
use crate::node::{NFsmNode, NodeId};
use crate::{FsmError, SvaFsm};

/// An NFSM node after link folding.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UFsmNode {
    /// Activate the target next cycle if every bit of the control is high.
    pub edges: Vec<(NodeId, SigSpec)>,
    /// The sequence matches this cycle if every bit of a control is high.
    pub accept: Vec<SigSpec>,
    /// The condition holds this cycle if every bit of a control is high.
    pub cond: Vec<SigSpec>,
    /// Reachable from the start node through edges.
    pub reachable: bool,
    /// Some path of edges leads from here to an accept or cond condition.
    /// A thread in a node without it can never match.
    pub live: bool,
}

/// `ctrl && bit` as a conjunction, or `None` if it can never hold.
fn conjoin(ctrl: &SigSpec, bit: SigBit) -> Option<SigSpec> {
    match bit {
        SigBit::Const(false) => None,
        SigBit::Const(true) => Some(ctrl.clone()),
        SigBit::Wire(_) => {
            let mut spec = ctrl.clone();
            spec.append(bit);
            spec.sort_and_unify();
            Some(spec)
        }
    }
}

/// Folds links into every node. `ranks` must be the link ranks of `nodes`.
pub(crate) fn project(
    nodes: &[NFsmNode],
    ranks: &[usize],
    accept: NodeId,
    cond: NodeId,
) -> Vec<UFsmNode> {
    let mut unodes = vec![UFsmNode::default(); nodes.len()];

    // Link targets outrank their sources, so walking by falling rank folds
    // every target before any node linking to it.
    let mut order: Vec<usize> = (0..nodes.len()).collect();
    order.sort_by_key(|&n| std::cmp::Reverse(ranks[n]));

    for node in order {
        let mut folded = UFsmNode::default();
        let empty = SigSpec::new();

        if node == accept.as_usize() {
            folded.accept.push(empty.clone());
        }
        if node == cond.as_usize() {
            folded.cond.push(empty.clone());
        }

        for &(target, ctrl) in &nodes[node].edges {
            if let Some(spec) = conjoin(&empty, ctrl) {
                folded.edges.push((target, spec));
            }
        }

        for &(target, ctrl) in &nodes[node].links {
            let sub = &unodes[target.as_usize()];
            for spec in &sub.accept {
                folded.accept.extend(conjoin(spec, ctrl));
            }
            for spec in &sub.cond {
                folded.cond.extend(conjoin(spec, ctrl));
            }
            for (to, spec) in &sub.edges {
                if let Some(spec) = conjoin(spec, ctrl) {
                    folded.edges.push((*to, spec));
                }
            }
        }

        unodes[node] = folded;
    }

    unodes
}

/// Marks every node reachable from `start` through edges.
pub(crate) fn mark_reachable(unodes: &mut [UFsmNode], start: NodeId) {
    let mut queue = VecDeque::from([start]);
    while let Some(node) = queue.pop_front() {
        let unode = &mut unodes[node.as_usize()];
        if unode.reachable {
            continue;
        }
        unode.reachable = true;
        queue.extend(unode.edges.iter().map(|(target, _)| *target));
    }
}

/// Marks every node that reaches an accept or cond condition, walking
/// edges backwards from the nodes that carry one.
pub(crate) fn mark_live(unodes: &mut [UFsmNode]) {
    let mut preds: Vec<Vec<usize>> = vec![Vec::new(); unodes.len()];
    for (node, unode) in unodes.iter().enumerate() {
        for (target, _) in &unode.edges {
            preds[target.as_usize()].push(node);
        }
    }

    let mut queue: VecDeque<usize> = unodes
        .iter()
        .enumerate()
        .filter(|(_, u)| !u.accept.is_empty() || !u.cond.is_empty())
        .map(|(node, _)| node)
        .collect();
    while let Some(node) = queue.pop_front() {
        if unodes[node].live {
            continue;
        }
        unodes[node].live = true;
        queue.extend(preds[node].iter().filter(|p| !unodes[**p].live));
    }
}

impl<N: Netlist> SvaFsm<'_, N> {
    /// The link-folded automaton, with reachability from the start node and
    /// liveness towards the accept and cond nodes. Does not touch the
    /// netlist.
    pub fn ufsm(&self) -> Result<Vec<UFsmNode>, FsmError> {
        let ranks = link_ranks(&self.nodes)?;
        let mut unodes = project(&self.nodes, &ranks, self.accept, self.cond);
        mark_reachable(&mut unodes, self.start);
        mark_live(&mut unodes);

        debug!(
            "UFSM: {} of {} nodes reachable, {} live",
            unodes.iter().filter(|u| u.reachable).count(),
            unodes.len(),
            unodes.iter().filter(|u| u.live).count()
        );
        Ok(unodes)
    }
}
