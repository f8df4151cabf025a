//! The capability surface the automaton synthesizer builds circuits through.

use crate::{Clocking, Const, IdString, SigBit, SigSpec, WireId};

/// Everything the sequence synthesizer needs from a netlist.
///
/// Gate constructors take a caller-supplied unique name, usually obtained
/// from [`Netlist::new_id`], and return the single-bit result. Implementations
/// are not expected to simplify constant operands.
pub trait Netlist {
    /// Allocates a fresh unique id in `scope`.
    fn new_id(&mut self, scope: &str) -> IdString;

    /// Adds an undriven wire, to be driven later by [`Netlist::connect`] or
    /// [`Netlist::add_dff`].
    fn add_wire(&mut self, name: IdString) -> WireId;

    /// `a & b`
    fn and(&mut self, name: IdString, a: SigBit, b: SigBit) -> SigBit;

    /// `a | b`
    fn or(&mut self, name: IdString, a: SigBit, b: SigBit) -> SigBit;

    /// `!a`
    fn not(&mut self, name: IdString, a: SigBit) -> SigBit;

    /// `|a`
    fn reduce_or(&mut self, name: IdString, a: &SigSpec) -> SigBit;

    /// `a == b`, ignoring don't-care positions of `b`.
    fn eq_const(&mut self, name: IdString, a: &SigSpec, b: &Const) -> SigBit;

    /// Drives `wire` from `driver`.
    fn connect(&mut self, wire: WireId, driver: SigBit);

    /// Registers `data` into `q` on `clocking`, starting from `init`.
    fn add_dff(&mut self, name: IdString, clocking: &Clocking, data: SigBit, q: WireId, init: bool);
}
