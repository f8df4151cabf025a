//! Configuration for automaton synthesis.

use contracts::*;
use serde::{Deserialize, Serialize};

/// Knobs for one automaton.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FsmConfig {
    /// Scope for the unique ids of every wire and cell the automaton creates.
    pub id_scope: String,
    /// Widest distinguishing control vector a DFSM state may have. Each
    /// state enumerates `2^width` input patterns.
    pub max_ctrl_bits: usize,
    /// Most DFSM states determinization may discover.
    pub max_dfsm_states: usize,
    /// Merge adjacent input patterns before building comparators.
    pub optimize_patterns: bool,
}

impl Default for FsmConfig {
    fn default() -> Self {
        Self {
            id_scope: "sva".to_owned(),
            max_ctrl_bits: 16,
            max_dfsm_states: 4096,
            optimize_patterns: true,
        }
    }
}

impl FsmConfig {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the id scope.
    #[must_use]
    #[ensures(ret.id_scope == scope)]
    pub fn with_id_scope(mut self, scope: &str) -> Self {
        scope.clone_into(&mut self.id_scope);
        self
    }

    /// Sets the control-vector width limit.
    #[must_use]
    #[ensures(ret.max_ctrl_bits == bits)]
    pub fn with_max_ctrl_bits(mut self, bits: usize) -> Self {
        self.max_ctrl_bits = bits;
        self
    }

    /// Sets the DFSM state limit.
    #[must_use]
    #[ensures(ret.max_dfsm_states == states)]
    pub fn with_max_dfsm_states(mut self, states: usize) -> Self {
        self.max_dfsm_states = states;
        self
    }

    /// Sets whether input patterns are merged before comparator synthesis.
    #[must_use]
    #[ensures(ret.optimize_patterns == optimize)]
    pub fn with_optimize_patterns(mut self, optimize: bool) -> Self {
        self.optimize_patterns = optimize;
        self
    }
}
