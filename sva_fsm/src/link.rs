//! Same-cycle link resolution.
//!
//! Links must form a DAG. Every node gets a link rank, the length of the
//! longest link chain ending at it, so that every link points from a lower
//! to a strictly higher rank. Walking the nodes rank by rank then settles a
//! same-cycle activation wave in a single pass.

use sva_netlist::{Netlist, SigBit};
use tracing::debug;

use crate::node::{NFsmNode, NodeId};
use crate::{FsmError, SvaFsm};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnPath,
    Done,
}

/// Topological order of the link graph. Fails on the first link that
/// closes a cycle.
fn link_topo_order(nodes: &[NFsmNode]) -> Result<Vec<NodeId>, FsmError> {
    let mut marks = vec![Mark::Unvisited; nodes.len()];
    let mut post_order = Vec::with_capacity(nodes.len());

    for root in 0..nodes.len() {
        if marks[root] != Mark::Unvisited {
            continue;
        }

        // (node, index of the next link to follow)
        let mut stack = vec![(root, 0usize)];
        marks[root] = Mark::OnPath;

        while let Some((node, next)) = stack.last_mut() {
            let node = *node;
            if let Some(&(target, _)) = nodes[node].links.get(*next) {
                *next += 1;
                match marks[target.as_usize()] {
                    Mark::Done => {}
                    Mark::OnPath => return Err(FsmError::LinkCycle(target)),
                    Mark::Unvisited => {
                        marks[target.as_usize()] = Mark::OnPath;
                        stack.push((target.as_usize(), 0));
                    }
                }
            } else {
                marks[node] = Mark::Done;
                post_order.push(NodeId::from(node));
                stack.pop();
            }
        }
    }

    post_order.reverse();
    Ok(post_order)
}

/// Link rank of every node, indexed by node id.
pub(crate) fn link_ranks(nodes: &[NFsmNode]) -> Result<Vec<usize>, FsmError> {
    let order = link_topo_order(nodes)?;
    let mut ranks = vec![0usize; nodes.len()];

    for node in order {
        let rank = ranks[node.as_usize()];
        for (target, _) in &nodes[node.as_usize()].links {
            let slot = &mut ranks[target.as_usize()];
            *slot = (*slot).max(rank + 1);
        }
    }

    Ok(ranks)
}

/// Groups nodes by rank; within a rank, nodes keep id order.
pub(crate) fn rank_buckets(ranks: &[usize]) -> Vec<Vec<NodeId>> {
    let mut buckets: Vec<Vec<NodeId>> = Vec::new();
    for (node, &rank) in ranks.iter().enumerate() {
        if rank >= buckets.len() {
            buckets.resize_with(rank + 1, Vec::new);
        }
        buckets[rank].push(NodeId::from(node));
    }
    buckets
}

impl<N: Netlist> SvaFsm<'_, N> {
    /// Link rank of every node, indexed by node id.
    pub fn link_ranks(&self) -> Result<Vec<usize>, FsmError> {
        link_ranks(&self.nodes)
    }

    /// Pushes activation along links: each target's state becomes the OR of
    /// its own state and every linked source's state under the link control.
    pub(crate) fn propagate_links(&mut self, state: &mut [SigBit], ranks: &[usize]) {
        let buckets = rank_buckets(ranks);
        debug!("resolving links over {} ranks", buckets.len());

        for bucket in &buckets {
            for node in bucket {
                let links = self.nodes[node.as_usize()].links.clone();
                for (target, ctrl) in links {
                    let source = state[node.as_usize()];
                    let active = if ctrl == SigBit::ONE {
                        source
                    } else {
                        self.and(source, ctrl)
                    };
                    let slot = target.as_usize();
                    state[slot] = self.or(state[slot], active);
                }
            }
        }
    }
}
