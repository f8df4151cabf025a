//! The NFSM builder.
//!
//! A translator populates an [`SvaFsm`] with nodes, edges and links while
//! bracketing `disable iff` / `throughout` scopes, then hands the automaton
//! by value to exactly one synthesis entry point. Because every entry point
//! consumes the automaton, no structural mutation can follow synthesis.

use std::collections::HashMap;

use sva_netlist::{Clocking, Const, IdString, Netlist, SigBit, SigSpec, WireId};
use tracing::trace;

use crate::context::ControlContext;
use crate::node::{NFsmNode, NodeId, NodeRole, TransitionKind};
use crate::{FsmConfig, FsmError};

/// A sequence automaton under construction, bound to the netlist it will be
/// synthesized into.
pub struct SvaFsm<'m, N: Netlist> {
    pub(crate) module: &'m mut N,
    pub(crate) clocking: Clocking,
    pub(crate) config: FsmConfig,
    pub(crate) trigger: SigBit,
    pub(crate) context: ControlContext,
    pub(crate) nodes: Vec<NFsmNode>,
    pub(crate) start: NodeId,
    pub(crate) accept: NodeId,
    pub(crate) cond: NodeId,
    pub(crate) cond_eq_cache: HashMap<(SigSpec, Const), SigBit>,
}

impl<'m, N: Netlist> SvaFsm<'m, N> {
    /// A new automaton with the default configuration.
    ///
    /// `trigger` re-seeds the start node every cycle it is high; pass
    /// [`SigBit::ONE`] to start a match attempt on every cycle.
    pub fn new(module: &'m mut N, clocking: Clocking, trigger: SigBit) -> Self {
        Self::with_config(module, clocking, trigger, FsmConfig::default())
    }

    /// A new automaton. Creates the start, accept and cond nodes (ids 0, 1
    /// and 2); the cond node lives in the condition automaton.
    pub fn with_config(
        module: &'m mut N,
        clocking: Clocking,
        trigger: SigBit,
        config: FsmConfig,
    ) -> Self {
        let mut nodes = vec![NFsmNode::new(false), NFsmNode::new(false)];
        nodes.push(NFsmNode::new(true));

        Self {
            module,
            clocking,
            config,
            trigger,
            context: ControlContext::default(),
            nodes,
            start: NodeId::new(0),
            accept: NodeId::new(1),
            cond: NodeId::new(2),
            cond_eq_cache: HashMap::new(),
        }
    }

    /// The start node.
    #[must_use]
    pub const fn start_node(&self) -> NodeId {
        self.start
    }

    /// The accept node.
    #[must_use]
    pub const fn accept_node(&self) -> NodeId {
        self.accept
    }

    /// The cond node.
    #[must_use]
    pub const fn cond_node(&self) -> NodeId {
        self.cond
    }

    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// A node by id.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&NFsmNode> {
        self.nodes.get(id.as_usize())
    }

    /// Every node, indexed by id.
    #[must_use]
    pub fn nodes(&self) -> &[NFsmNode] {
        &self.nodes
    }

    /// Trigger signal.
    #[must_use]
    pub const fn trigger(&self) -> SigBit {
        self.trigger
    }

    /// Active control scopes.
    #[must_use]
    pub const fn context(&self) -> &ControlContext {
        &self.context
    }

    /// Configuration.
    #[must_use]
    pub const fn config(&self) -> &FsmConfig {
        &self.config
    }

    /// The netlist, for creating signals between builder calls.
    pub fn module(&mut self) -> &mut N {
        self.module
    }

    /// Whether new nodes are created in the condition automaton.
    #[must_use]
    pub const fn in_cond_mode(&self) -> bool {
        self.context.in_cond_mode
    }

    /// Switches between creating sequence nodes and condition nodes.
    pub fn set_cond_mode(&mut self, cond_mode: bool) {
        self.context.in_cond_mode = cond_mode;
    }

    /// Enters a `disable iff` scope.
    pub fn push_disable(&mut self, sig: SigBit) {
        self.context
            .push_disable(self.module, &self.config.id_scope, sig);
    }

    /// Leaves the innermost `disable iff` scope.
    pub fn pop_disable(&mut self) -> Result<(), FsmError> {
        self.context.pop_disable()
    }

    /// Enters a `throughout` scope.
    pub fn push_throughout(&mut self, sig: SigBit) {
        self.context
            .push_throughout(self.module, &self.config.id_scope, sig);
    }

    /// Leaves the innermost `throughout` scope.
    pub fn pop_throughout(&mut self) -> Result<(), FsmError> {
        self.context.pop_throughout()
    }

    /// Appends a node, optionally reached from `link_from` by an
    /// unconditional link. On error the node is not added.
    pub fn create_node(&mut self, link_from: Option<NodeId>) -> Result<NodeId, FsmError> {
        let id = NodeId::from(self.nodes.len());
        self.nodes.push(NFsmNode::new(self.context.in_cond_mode));

        if let Some(from) = link_from {
            if let Err(err) = self.create_link(from, id, SigBit::ONE) {
                self.nodes.pop();
                return Err(err);
            }
        }

        trace!("created node {} (cond: {})", id, self.context.in_cond_mode);
        Ok(id)
    }

    /// Appends a node linked from the start node.
    pub fn create_start_node(&mut self) -> Result<NodeId, FsmError> {
        self.create_node(Some(self.start))
    }

    /// Adds a one-cycle transition. Use [`SigBit::ONE`] for an
    /// unconditional edge.
    pub fn create_edge(&mut self, from: NodeId, to: NodeId, ctrl: SigBit) -> Result<(), FsmError> {
        self.check_transition(from, to, TransitionKind::Edge)?;

        let ctrl = self.constrain(ctrl);
        self.nodes[from.as_usize()].edges.push((to, ctrl));
        trace!("edge {} -> {} if {}", from, to, ctrl);
        Ok(())
    }

    /// Adds a same-cycle transition. Use [`SigBit::ONE`] for an
    /// unconditional link.
    pub fn create_link(&mut self, from: NodeId, to: NodeId, ctrl: SigBit) -> Result<(), FsmError> {
        self.check_transition(from, to, TransitionKind::Link)?;

        let ctrl = self.constrain(ctrl);
        self.nodes[from.as_usize()].links.push((to, ctrl));
        trace!("link {} -> {} if {}", from, to, ctrl);
        Ok(())
    }

    fn constrain(&mut self, ctrl: SigBit) -> SigBit {
        self.context
            .constrain(self.module, &self.config.id_scope, ctrl)
    }

    fn check_transition(&self, from: NodeId, to: NodeId, kind: TransitionKind) -> Result<(), FsmError> {
        let count = self.nodes.len();
        for node in [from, to] {
            if node.as_usize() >= count {
                return Err(FsmError::NodeOutOfRange { node, count });
            }
        }

        for (node, role) in [(self.accept, NodeRole::Accept), (self.cond, NodeRole::Cond)] {
            if from == node {
                return Err(FsmError::ForbiddenSource { node, role, kind });
            }
            // Sinks are only entered through links.
            if kind == TransitionKind::Edge && to == node {
                return Err(FsmError::ForbiddenTarget { node, role, kind });
            }
        }

        if to == self.start {
            return Err(FsmError::ForbiddenTarget {
                node: to,
                role: NodeRole::Start,
                kind,
            });
        }

        if from != self.start
            && self.nodes[from.as_usize()].is_cond_node != self.nodes[to.as_usize()].is_cond_node
        {
            return Err(FsmError::CrossSpace { from, to, kind });
        }

        Ok(())
    }

    pub(crate) fn new_id(&mut self) -> IdString {
        self.module.new_id(&self.config.id_scope)
    }

    pub(crate) fn and(&mut self, a: SigBit, b: SigBit) -> SigBit {
        let id = self.new_id();
        self.module.and(id, a, b)
    }

    pub(crate) fn or(&mut self, a: SigBit, b: SigBit) -> SigBit {
        let id = self.new_id();
        self.module.or(id, a, b)
    }

    pub(crate) fn not(&mut self, a: SigBit) -> SigBit {
        let id = self.new_id();
        self.module.not(id, a)
    }

    /// OR of `bits`, without a gate when there are fewer than two.
    pub(crate) fn any_of(&mut self, bits: &SigSpec) -> SigBit {
        match bits.len() {
            0 => SigBit::ZERO,
            1 => bits[0],
            _ => {
                let id = self.new_id();
                self.module.reduce_or(id, bits)
            }
        }
    }

    /// Effective activation of a state bit under the active disable.
    pub(crate) fn gate_disable(&mut self, state: SigBit, not_disable: Option<SigBit>) -> SigBit {
        match not_disable {
            Some(enable) => self.and(state, enable),
            None => state,
        }
    }

    /// `!disable`, or `None` outside any disable scope.
    pub(crate) fn not_disable(&mut self) -> Option<SigBit> {
        let disable = self.context.disable();
        (disable != SigBit::ZERO).then(|| self.not(disable))
    }

    /// Registers `next` into `state`, or ties `state` low if `next` is
    /// constant false. Returns whether a register was created.
    pub(crate) fn drive_state(&mut self, state: WireId, next: SigBit) -> bool {
        if next == SigBit::ZERO {
            self.module.connect(state, SigBit::ZERO);
            false
        } else {
            let id = self.new_id();
            self.module.add_dff(id, &self.clocking, next, state, false);
            true
        }
    }
}
