//! In-memory bit-level netlist.
//!
//! A [`Module`] is a flat list of wires, each driven by exactly one of: a
//! module input, a combinational [`CellInstance`], a [`FlipFlop`] or a plain
//! connection. Cells and flip-flops refer to their operands by [`SigBit`].

use indexmap::IndexMap;
use std::fmt;
use tracing::{debug, trace};

use crate::{Clocking, Const, IdString, Netlist, NetlistError, SigBit, SigSpec, WireId};

/// A combinational primitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Cell {
    /// `a & b`
    And(SigBit, SigBit),
    /// `a | b`
    Or(SigBit, SigBit),
    /// `!a`
    Not(SigBit),
    /// `|a`
    ReduceOr(SigSpec),
    /// `a == b`, don't-care positions of `b` ignored.
    EqConst(SigSpec, Const),
}

impl Cell {
    /// Short type name, as yosys would print it.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::And(..) => "$and",
            Self::Or(..) => "$or",
            Self::Not(..) => "$not",
            Self::ReduceOr(..) => "$reduce_or",
            Self::EqConst(..) => "$eq",
        }
    }
}

/// A placed combinational cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellInstance {
    /// Cell name.
    pub name: IdString,
    /// Function.
    pub cell: Cell,
    /// Wire carrying the result.
    pub output: WireId,
}

/// A single-bit register.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlipFlop {
    /// Cell name.
    pub name: IdString,
    /// Sampling clock.
    pub clocking: Clocking,
    /// Next-state input.
    pub data: SigBit,
    /// Registered output.
    pub q: WireId,
    /// Reset / initial value.
    pub init: bool,
}

/// What drives a wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Driver {
    /// A module input port.
    Input,
    /// The cell at this index of [`Module::cells`].
    Cell(usize),
    /// The flip-flop at this index of [`Module::flip_flops`].
    FlipFlop(usize),
    /// A direct connection.
    Connection(SigBit),
}

/// A flat netlist implementing [`Netlist`].
#[derive(Debug, Clone, Default)]
pub struct Module {
    name: String,
    wires: Vec<IdString>,
    inputs: Vec<WireId>,
    outputs: IndexMap<IdString, SigBit>,
    cells: Vec<CellInstance>,
    flip_flops: Vec<FlipFlop>,
    connections: Vec<(WireId, SigBit)>,
    id_counters: IndexMap<String, u64>,
}

impl Module {
    /// An empty module.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Module name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adds an input port. `name` may be plain text or an escaped id.
    pub fn add_input(&mut self, name: &str) -> SigBit {
        let wire = self.push_wire(IdString::from(name));
        self.inputs.push(wire);
        SigBit::Wire(wire)
    }

    /// Exposes `sig` as an output port.
    pub fn add_output(&mut self, name: &str, sig: SigBit) {
        self.outputs.insert(IdString::from(name), sig);
    }

    /// Input port wires, in declaration order.
    #[must_use]
    pub fn inputs(&self) -> &[WireId] {
        &self.inputs
    }

    /// Output ports, in declaration order.
    #[must_use]
    pub const fn outputs(&self) -> &IndexMap<IdString, SigBit> {
        &self.outputs
    }

    /// Looks up an output port.
    #[must_use]
    pub fn output(&self, name: &str) -> Option<SigBit> {
        self.outputs.get(&IdString::from(name)).copied()
    }

    /// Number of wires.
    #[must_use]
    pub fn wire_count(&self) -> usize {
        self.wires.len()
    }

    /// Name of a wire.
    #[must_use]
    pub fn wire_name(&self, wire: WireId) -> Option<&IdString> {
        self.wires.get(wire.as_usize())
    }

    /// Combinational cells, in creation order.
    #[must_use]
    pub fn cells(&self) -> &[CellInstance] {
        &self.cells
    }

    /// Registers, in creation order.
    #[must_use]
    pub fn flip_flops(&self) -> &[FlipFlop] {
        &self.flip_flops
    }

    /// Direct connections, in creation order.
    #[must_use]
    pub fn connections(&self) -> &[(WireId, SigBit)] {
        &self.connections
    }

    /// Number of cells whose function satisfies `filter`.
    pub fn count_cells(&self, filter: impl Fn(&Cell) -> bool) -> usize {
        self.cells.iter().filter(|c| filter(&c.cell)).count()
    }

    /// The cell driving `sig`, if it is a cell output.
    #[must_use]
    pub fn cell_driving(&self, sig: SigBit) -> Option<&CellInstance> {
        let wire = sig.as_wire()?;
        self.cells.iter().find(|c| c.output == wire)
    }

    /// The register whose output is `wire`, if any.
    #[must_use]
    pub fn flip_flop_driving(&self, wire: WireId) -> Option<&FlipFlop> {
        self.flip_flops.iter().find(|ff| ff.q == wire)
    }

    /// Every driver of every wire, indexed by wire.
    #[must_use]
    pub fn drivers(&self) -> Vec<Vec<Driver>> {
        let mut drivers = vec![Vec::new(); self.wires.len()];
        for wire in &self.inputs {
            drivers[wire.as_usize()].push(Driver::Input);
        }
        for (idx, cell) in self.cells.iter().enumerate() {
            drivers[cell.output.as_usize()].push(Driver::Cell(idx));
        }
        for (idx, ff) in self.flip_flops.iter().enumerate() {
            drivers[ff.q.as_usize()].push(Driver::FlipFlop(idx));
        }
        for (wire, sig) in &self.connections {
            drivers[wire.as_usize()].push(Driver::Connection(*sig));
        }
        drivers
    }

    /// Checks that every wire has exactly one driver.
    pub fn validate(&self) -> Result<(), NetlistError> {
        for (idx, drivers) in self.drivers().into_iter().enumerate() {
            let wire = WireId::from(idx);
            let name = self.wires[idx].clone();
            match drivers.len() {
                1 => {}
                0 => return Err(NetlistError::Undriven { wire, name }),
                count => return Err(NetlistError::MultipleDrivers { wire, name, count }),
            }
        }
        debug!(
            "module {} valid: {} wires, {} cells, {} flip-flops",
            self.name,
            self.wires.len(),
            self.cells.len(),
            self.flip_flops.len()
        );
        Ok(())
    }

    fn push_wire(&mut self, name: IdString) -> WireId {
        let wire = WireId::from(self.wires.len());
        self.wires.push(name);
        wire
    }

    fn push_cell(&mut self, name: IdString, cell: Cell) -> SigBit {
        let output = self.push_wire(name.clone());
        trace!("{} {} -> {}", cell.type_name(), name, output);
        self.cells.push(CellInstance { name, cell, output });
        SigBit::Wire(output)
    }
}

impl Netlist for Module {
    fn new_id(&mut self, scope: &str) -> IdString {
        let counter = self.id_counters.entry(scope.to_owned()).or_insert(0);
        let id = *counter;
        *counter += 1;
        IdString::unnamed(scope, id)
    }

    fn add_wire(&mut self, name: IdString) -> WireId {
        self.push_wire(name)
    }

    fn and(&mut self, name: IdString, a: SigBit, b: SigBit) -> SigBit {
        self.push_cell(name, Cell::And(a, b))
    }

    fn or(&mut self, name: IdString, a: SigBit, b: SigBit) -> SigBit {
        self.push_cell(name, Cell::Or(a, b))
    }

    fn not(&mut self, name: IdString, a: SigBit) -> SigBit {
        self.push_cell(name, Cell::Not(a))
    }

    fn reduce_or(&mut self, name: IdString, a: &SigSpec) -> SigBit {
        self.push_cell(name, Cell::ReduceOr(a.clone()))
    }

    fn eq_const(&mut self, name: IdString, a: &SigSpec, b: &Const) -> SigBit {
        self.push_cell(name, Cell::EqConst(a.clone(), b.clone()))
    }

    fn connect(&mut self, wire: WireId, driver: SigBit) {
        self.connections.push((wire, driver));
    }

    fn add_dff(&mut self, name: IdString, clocking: &Clocking, data: SigBit, q: WireId, init: bool) {
        trace!("$dff {} : {} -> {}", name, data, q);
        self.flip_flops.push(FlipFlop {
            name,
            clocking: clocking.clone(),
            data,
            q,
            init,
        });
    }
}

impl fmt::Display for Module {
    /// RTLIL-flavoured listing, for logs and test failure messages.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "module \\{}", self.name)?;
        for wire in &self.inputs {
            writeln!(f, "  input {} ({})", self.wires[wire.as_usize()], wire)?;
        }
        for (name, sig) in &self.outputs {
            writeln!(f, "  output {name} = {sig}")?;
        }
        for cell in &self.cells {
            let operands = match &cell.cell {
                Cell::And(a, b) | Cell::Or(a, b) => format!("{a}, {b}"),
                Cell::Not(a) => a.to_string(),
                Cell::ReduceOr(a) => a.to_string(),
                Cell::EqConst(a, b) => format!("{a}, {b}"),
            };
            writeln!(
                f,
                "  cell {} {} ({}) -> {}",
                cell.cell.type_name(),
                cell.name,
                operands,
                cell.output
            )?;
        }
        for ff in &self.flip_flops {
            writeln!(
                f,
                "  cell $dff {} ({} @ {}{}) -> {} init {}",
                ff.name,
                ff.data,
                if ff.clocking.posedge { "posedge " } else { "negedge " },
                ff.clocking.clock,
                ff.q,
                u8::from(ff.init)
            )?;
        }
        for (wire, sig) in &self.connections {
            writeln!(f, "  connect {wire} {sig}")?;
        }
        write!(f, "end")
    }
}
