//! NFSM circuit synthesis for the accept output.
//!
//! One register per node holds "this node is active". The start node is
//! additionally active whenever the trigger is high, and every node is
//! forced inactive while the disable condition holds. Links spread the
//! activation within the cycle, edges carry it into the next cycle.

use sva_netlist::{Netlist, SigBit, SigSpec, WireId};
use tracing::{debug, info};

use crate::{FsmError, SvaFsm};

/// What [`SvaFsm::get_accept`] produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptCircuit {
    /// High in every cycle the sequence completes.
    pub accept: SigBit,
    /// Same-cycle activation of every node after link resolution, indexed
    /// by node id.
    pub node_states: Vec<SigBit>,
    /// Next-state value of every node, indexed by node id.
    pub next_states: Vec<SigBit>,
    /// Storage wire of every node, indexed by node id.
    pub state_wires: Vec<WireId>,
    /// Number of registers instantiated.
    pub registers: usize,
}

impl<N: Netlist> SvaFsm<'_, N> {
    /// Materializes the NFSM and returns its accept signal.
    ///
    /// A link cycle is reported before anything is added to the netlist.
    pub fn get_accept(mut self) -> Result<AcceptCircuit, FsmError> {
        let count = self.nodes.len();
        info!("synthesizing accept circuit for {} NFSM nodes", count);
        self.dump();

        let ranks = self.link_ranks()?;

        // State signals
        let not_disable = self.not_disable();
        let mut state_wires = Vec::with_capacity(count);
        let mut state = Vec::with_capacity(count);
        for node in 0..count {
            let id = self.new_id();
            let wire = self.module.add_wire(id);
            state_wires.push(wire);

            let mut sig = SigBit::Wire(wire);
            if node == self.start.as_usize() {
                sig = self.or(sig, self.trigger);
            }
            sig = self.gate_disable(sig, not_disable);
            state.push(sig);
        }

        self.propagate_links(&mut state, &ranks);

        // Activations
        let mut activations = vec![SigSpec::new(); count];
        for node in 0..count {
            let edges = self.nodes[node].edges.clone();
            for (target, ctrl) in edges {
                let active = if ctrl == SigBit::ONE {
                    state[node]
                } else {
                    self.and(state[node], ctrl)
                };
                activations[target.as_usize()].append(active);
            }
        }
        let next_states: Vec<SigBit> = activations.iter().map(|a| self.any_of(a)).collect();

        // State registers
        let mut registers = 0;
        for (wire, next) in state_wires.iter().zip(&next_states) {
            if self.drive_state(*wire, *next) {
                registers += 1;
            }
        }

        debug!("accept circuit uses {} of {} possible registers", registers, count);
        info!("accept circuit complete");

        Ok(AcceptCircuit {
            accept: state[self.accept.as_usize()],
            node_states: state,
            next_states,
            state_wires,
            registers,
        })
    }
}
