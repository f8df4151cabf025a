//! Text rendering of the automaton for debug logs.

use std::fmt;

use sva_netlist::Netlist;
use tracing::{Level, debug};

use crate::SvaFsm;
use crate::ufsm::UFsmNode;

impl<N: Netlist> SvaFsm<'_, N> {
    /// Logs the NFSM and, if its links are acyclic, the UFSM at debug level.
    pub fn dump(&self) {
        if tracing::enabled!(Level::DEBUG) {
            debug!("\n{}", self);
        }
    }
}

impl<N: Netlist> fmt::Display for SvaFsm<'_, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- NFSM ({} nodes) ---", self.nodes.len())?;
        writeln!(
            f,
            "  start {}, accept {}, cond {}, trigger {}",
            self.start, self.accept, self.cond, self.trigger
        )?;
        writeln!(
            f,
            "  disable {}, throughout {}",
            self.context.disable(),
            self.context.throughout()
        )?;

        for (id, node) in self.nodes.iter().enumerate() {
            let space = if node.is_cond_node { "cond" } else { "seq" };
            writeln!(f, "  n{id} ({space})")?;
            for (target, ctrl) in &node.edges {
                writeln!(f, "    edge -> {target} if {ctrl}")?;
            }
            for (target, ctrl) in &node.links {
                writeln!(f, "    link => {target} if {ctrl}")?;
            }
        }

        match self.ufsm() {
            Ok(unodes) => {
                writeln!(f, "--- UFSM ---")?;
                for (id, unode) in unodes.iter().enumerate() {
                    let marks: Vec<&str> = [(unode.reachable, "reachable"), (unode.live, "live")]
                        .into_iter()
                        .filter_map(|(set, mark)| set.then_some(mark))
                        .collect();
                    if marks.is_empty() {
                        writeln!(f, "  n{id}")?;
                    } else {
                        writeln!(f, "  n{id} ({})", marks.join(", "))?;
                    }
                    write_unode(f, unode)?;
                }
            }
            Err(err) => writeln!(f, "--- no UFSM: {err} ---")?,
        }
        Ok(())
    }
}

fn write_unode(f: &mut fmt::Formatter<'_>, unode: &UFsmNode) -> fmt::Result {
    for (target, ctrl) in &unode.edges {
        writeln!(f, "    edge -> {target} if {ctrl}")?;
    }
    for ctrl in &unode.accept {
        writeln!(f, "    accept if {ctrl}")?;
    }
    for ctrl in &unode.cond {
        writeln!(f, "    cond if {ctrl}")?;
    }
    Ok(())
}
