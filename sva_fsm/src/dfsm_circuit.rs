//! DFSM circuit synthesis for the reject and first-match accept outputs.

use std::collections::{BTreeMap, HashMap};

use indexmap::IndexMap;
use sva_netlist::{Const, Netlist, SigBit, SigSpec, Trit, WireId};
use tracing::{debug, info};

use crate::dfsm::{DfsmOptions, RejectMode};
use crate::node::NodeId;
use crate::pattern::optimize_patterns;
use crate::{FsmError, SvaFsm};

/// What [`SvaFsm::get_dfsm_circuit`] produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DfsmCircuit {
    /// High in every cycle some thread matches.
    pub accept: SigBit,
    /// High in every cycle a match attempt fails.
    pub reject: SigBit,
    /// Storage wire of every DFSM state.
    pub state_wires: BTreeMap<Vec<NodeId>, WireId>,
    /// Number of registers instantiated.
    pub registers: usize,
}

#[derive(Clone, Copy)]
struct Outputs {
    accept: bool,
    reject: bool,
}

impl<N: Netlist> SvaFsm<'_, N> {
    /// Materializes the DFSM and returns its first-match accept signal.
    pub fn get_first_accept(self) -> Result<SigBit, FsmError> {
        let options = DfsmOptions::new().with_first_match(true);
        let outputs = Outputs {
            accept: true,
            reject: false,
        };
        Ok(self.synthesize_dfsm(options, outputs)?.accept)
    }

    /// Materializes the DFSM and returns its reject signal.
    pub fn get_reject(self, mode: RejectMode) -> Result<SigBit, FsmError> {
        let options = DfsmOptions::new().with_reject_mode(mode);
        let outputs = Outputs {
            accept: false,
            reject: true,
        };
        Ok(self.synthesize_dfsm(options, outputs)?.reject)
    }

    /// Materializes the DFSM and returns its first-match accept and reject
    /// signals, in that order.
    pub fn get_first_accept_reject(self, mode: RejectMode) -> Result<(SigBit, SigBit), FsmError> {
        let options = DfsmOptions::new()
            .with_first_match(true)
            .with_reject_mode(mode);
        let outputs = Outputs {
            accept: true,
            reject: true,
        };
        let circuit = self.synthesize_dfsm(options, outputs)?;
        Ok((circuit.accept, circuit.reject))
    }

    /// Materializes the DFSM under arbitrary options, building both outputs.
    pub fn get_dfsm_circuit(self, options: DfsmOptions) -> Result<DfsmCircuit, FsmError> {
        let outputs = Outputs {
            accept: true,
            reject: true,
        };
        self.synthesize_dfsm(options, outputs)
    }

    fn synthesize_dfsm(mut self, options: DfsmOptions, outputs: Outputs) -> Result<DfsmCircuit, FsmError> {
        info!("synthesizing DFSM circuit for {} NFSM nodes", self.nodes.len());
        self.dump();

        let dfsm = self.dfsm(options)?;
        let not_disable = self.not_disable();

        // State signals
        let mut state_wires = BTreeMap::new();
        let mut state_sigs = HashMap::new();
        for key in dfsm.nodes.keys() {
            let id = self.new_id();
            let wire = self.module.add_wire(id);
            state_wires.insert(key.clone(), wire);

            let mut sig = SigBit::Wire(wire);
            if *key == dfsm.start {
                sig = self.or(sig, self.trigger);
            }
            sig = self.gate_disable(sig, not_disable);
            state_sigs.insert(key.clone(), sig);
        }

        // Transition and output logic
        let mut next_states: HashMap<&Vec<NodeId>, SigSpec> = HashMap::new();
        let mut accept = SigSpec::new();
        let mut reject = SigSpec::new();
        for (key, dnode) in &dfsm.nodes {
            let enable = state_sigs[key];

            let mut edge_cond: IndexMap<&Vec<NodeId>, Vec<Const>> = IndexMap::new();
            for (target, pattern) in &dnode.edges {
                edge_cond.entry(target).or_default().push(pattern.clone());
            }
            for (target, patterns) in edge_cond {
                for pattern in self.prepare_patterns(patterns) {
                    let hit = self.make_cond_eq(&dnode.ctrl, &pattern, enable);
                    next_states.entry(target).or_default().append(hit);
                }
            }

            if outputs.accept {
                for pattern in self.prepare_patterns(dnode.accept.clone()) {
                    accept.append(self.make_cond_eq(&dnode.ctrl, &pattern, enable));
                }
            }
            if outputs.reject {
                for pattern in self.prepare_patterns(dnode.reject.clone()) {
                    reject.append(self.make_cond_eq(&dnode.ctrl, &pattern, enable));
                }
            }
        }

        // State registers
        let mut registers = 0;
        for (key, wire) in &state_wires {
            let next = match next_states.get(key) {
                Some(bits) => self.any_of(bits),
                None => SigBit::ZERO,
            };
            if self.drive_state(*wire, next) {
                registers += 1;
            }
        }

        let accept = self.any_of(&accept);
        let reject = self.any_of(&reject);

        debug!(
            "DFSM circuit: {} states, {} registers, {} cached comparators",
            state_wires.len(),
            registers,
            self.cond_eq_cache.len()
        );
        info!("DFSM circuit complete");

        Ok(DfsmCircuit {
            accept,
            reject,
            state_wires,
            registers,
        })
    }

    fn prepare_patterns(&self, patterns: Vec<Const>) -> Vec<Const> {
        if self.config.optimize_patterns {
            optimize_patterns(patterns)
        } else {
            patterns
        }
    }

    /// `enable && ctrl == pattern`, comparing only the defined positions of
    /// `pattern`. Comparators are shared across the whole automaton.
    pub(crate) fn make_cond_eq(&mut self, ctrl: &SigSpec, pattern: &Const, enable: SigBit) -> SigBit {
        let mut sig_a = SigSpec::new();
        let mut sig_b = Const::default();
        for (bit, trit) in ctrl.iter().zip(pattern.trits()) {
            if trit.is_defined() {
                sig_a.append(*bit);
                sig_b.push(*trit);
            }
        }

        if sig_a.is_empty() {
            return enable;
        }
        if enable != SigBit::ONE {
            sig_a.append(enable);
            sig_b.push(Trit::One);
        }

        let key = (sig_a, sig_b);
        if let Some(sig) = self.cond_eq_cache.get(&key) {
            return *sig;
        }

        let (sig_a, sig_b) = &key;
        let sig = match (sig_a.len(), sig_b[0]) {
            (1, Trit::One) => sig_a[0],
            (1, _) => self.not(sig_a[0]),
            _ => {
                let id = self.new_id();
                self.module.eq_const(id, sig_a, sig_b)
            }
        };
        self.cond_eq_cache.insert(key, sig);
        sig
    }
}
