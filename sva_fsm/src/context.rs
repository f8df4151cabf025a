//! Nested `disable iff` / `throughout` scopes.
//!
//! The active disable is the OR of every enclosing disable condition, the
//! active throughout the AND of every enclosing throughout condition. Each
//! push saves the previous combined value so the matching pop restores it.

use std::fmt;

use sva_netlist::{Netlist, SigBit};
use tracing::trace;

use crate::FsmError;

/// Which of the two scope stacks an operation refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContextKind {
    /// `disable iff`
    Disable,
    /// `throughout`
    Throughout,
}

impl fmt::Display for ContextKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disable => write!(f, "disable"),
            Self::Throughout => write!(f, "throughout"),
        }
    }
}

/// The control conditions active while transitions are being added.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ControlContext {
    disable: SigBit,
    throughout: SigBit,
    disable_stack: Vec<SigBit>,
    throughout_stack: Vec<SigBit>,
    /// Stamped onto every node created while set.
    pub(crate) in_cond_mode: bool,
}

impl Default for ControlContext {
    fn default() -> Self {
        Self {
            disable: SigBit::ZERO,
            throughout: SigBit::ONE,
            disable_stack: Vec::new(),
            throughout_stack: Vec::new(),
            in_cond_mode: false,
        }
    }
}

impl ControlContext {
    /// Combined disable condition; constant false outside any scope.
    #[must_use]
    pub const fn disable(&self) -> SigBit {
        self.disable
    }

    /// Combined throughout condition; constant true outside any scope.
    #[must_use]
    pub const fn throughout(&self) -> SigBit {
        self.throughout
    }

    /// Nesting depth of the given stack.
    #[must_use]
    pub fn depth(&self, kind: ContextKind) -> usize {
        match kind {
            ContextKind::Disable => self.disable_stack.len(),
            ContextKind::Throughout => self.throughout_stack.len(),
        }
    }

    pub(crate) fn push_disable<N: Netlist>(&mut self, module: &mut N, scope: &str, sig: SigBit) {
        self.disable_stack.push(self.disable);

        if self.disable == SigBit::ZERO {
            self.disable = sig;
        } else if sig != SigBit::ZERO {
            let id = module.new_id(scope);
            self.disable = module.or(id, self.disable, sig);
        }
        trace!("push disable {} -> {}", sig, self.disable);
    }

    pub(crate) fn pop_disable(&mut self) -> Result<(), FsmError> {
        self.disable = self
            .disable_stack
            .pop()
            .ok_or(FsmError::UnbalancedPop(ContextKind::Disable))?;
        Ok(())
    }

    pub(crate) fn push_throughout<N: Netlist>(&mut self, module: &mut N, scope: &str, sig: SigBit) {
        self.throughout_stack.push(self.throughout);

        if self.throughout == SigBit::ONE {
            self.throughout = sig;
        } else if sig != SigBit::ONE {
            let id = module.new_id(scope);
            self.throughout = module.and(id, self.throughout, sig);
        }
        trace!("push throughout {} -> {}", sig, self.throughout);
    }

    pub(crate) fn pop_throughout(&mut self) -> Result<(), FsmError> {
        self.throughout = self
            .throughout_stack
            .pop()
            .ok_or(FsmError::UnbalancedPop(ContextKind::Throughout))?;
        Ok(())
    }

    /// Conjoins a transition control with the active throughout condition.
    pub(crate) fn constrain<N: Netlist>(&self, module: &mut N, scope: &str, ctrl: SigBit) -> SigBit {
        if self.throughout == SigBit::ONE {
            ctrl
        } else if ctrl == SigBit::ONE {
            self.throughout
        } else {
            let id = module.new_id(scope);
            module.and(id, self.throughout, ctrl)
        }
    }
}
