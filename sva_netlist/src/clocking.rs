//! Clock context for state registers.

use contracts::*;

use crate::SigBit;

/// The clock a register samples on, extracted by the caller from the
/// surrounding property.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Clocking {
    /// Clock bit.
    pub clock: SigBit,
    /// Whether the active edge is rising.
    pub posedge: bool,
    /// Optional clock enable; the register holds while it is low.
    pub enable: Option<SigBit>,
}

impl Clocking {
    /// Rising-edge clocking without an enable.
    #[must_use]
    #[ensures(ret.clock == clock && ret.posedge && ret.enable.is_none())]
    pub fn new(clock: SigBit) -> Self {
        Self {
            clock,
            posedge: true,
            enable: None,
        }
    }

    /// Sets the active edge to falling.
    #[must_use]
    #[ensures(!ret.posedge)]
    pub fn with_negedge(mut self) -> Self {
        self.posedge = false;
        self
    }

    /// Sets a clock enable.
    #[must_use]
    #[ensures(ret.enable == Some(enable))]
    pub fn with_enable(mut self, enable: SigBit) -> Self {
        self.enable = Some(enable);
        self
    }
}
