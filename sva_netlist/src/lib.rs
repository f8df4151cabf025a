//! Bit-level netlist capability used by the SVA sequence synthesizer.
//!
//! The synthesizer only talks to the [`Netlist`] trait. [`Module`] is a
//! small in-memory implementation of it: enough to build, inspect and
//! validate the circuits the synthesizer emits.

mod clocking;
mod error;
mod id_string;
mod logic;
mod module;
mod netlist;
mod sig;

pub use crate::clocking::Clocking;
pub use crate::error::NetlistError;
pub use crate::id_string::{IdString, IdStringError, parse_idstring};
pub use crate::logic::{Const, Trit};
pub use crate::module::{Cell, CellInstance, Driver, FlipFlop, Module};
pub use crate::netlist::Netlist;
pub use crate::sig::{SigBit, SigSpec, WireId};
