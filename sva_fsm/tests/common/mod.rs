#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Once;

use quickcheck::{Arbitrary, Gen};
use sva_fsm::{NodeId, SvaFsm};
use sva_netlist::{Cell, Clocking, Driver, Module, SigBit};

// Ensure logging only initializes once across all tests
static INIT: Once = Once::new();

pub fn setup_test_logging() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Cycle-based evaluator for the circuits the synthesizer emits. Every
/// register shares one clock; inputs not given a value read low.
pub struct Simulator<'a> {
    module: &'a Module,
    drivers: Vec<Vec<Driver>>,
    regs: Vec<bool>,
}

impl<'a> Simulator<'a> {
    pub fn new(module: &'a Module) -> Self {
        module.validate().expect("simulated module must be well formed");
        Self {
            module,
            drivers: module.drivers(),
            regs: module.flip_flops().iter().map(|ff| ff.init).collect(),
        }
    }

    /// Values of `probes` in the current cycle.
    pub fn sample(&self, inputs: &[(SigBit, bool)], probes: &[SigBit]) -> Vec<bool> {
        let inputs: HashMap<SigBit, bool> = inputs.iter().copied().collect();
        let mut memo: Vec<Option<bool>> = vec![None; self.drivers.len()];
        probes
            .iter()
            .map(|sig| self.eval(&inputs, &mut memo, *sig))
            .collect()
    }

    /// Samples `probes`, then advances every register by one clock edge.
    pub fn step(&mut self, inputs: &[(SigBit, bool)], probes: &[SigBit]) -> Vec<bool> {
        let map: HashMap<SigBit, bool> = inputs.iter().copied().collect();
        let mut memo: Vec<Option<bool>> = vec![None; self.drivers.len()];
        let sampled = probes
            .iter()
            .map(|sig| self.eval(&map, &mut memo, *sig))
            .collect();

        let next: Vec<bool> = self
            .module
            .flip_flops()
            .iter()
            .enumerate()
            .map(|(idx, ff)| {
                let enabled = ff
                    .clocking
                    .enable
                    .is_none_or(|en| self.eval(&map, &mut memo, en));
                if enabled {
                    self.eval(&map, &mut memo, ff.data)
                } else {
                    self.regs[idx]
                }
            })
            .collect();
        self.regs = next;
        sampled
    }

    /// Runs one trace from reset, sampling `probe` every cycle.
    pub fn run(module: &Module, trace: &[Vec<(SigBit, bool)>], probe: SigBit) -> Vec<bool> {
        let mut sim = Simulator::new(module);
        trace.iter().map(|inputs| sim.step(inputs, &[probe])[0]).collect()
    }

    fn eval(&self, inputs: &HashMap<SigBit, bool>, memo: &mut [Option<bool>], sig: SigBit) -> bool {
        let wire = match sig {
            SigBit::Const(value) => return value,
            SigBit::Wire(wire) => wire,
        };
        if let Some(value) = memo[wire.as_usize()] {
            return value;
        }

        let value = match self.drivers[wire.as_usize()][0] {
            Driver::Input => inputs.get(&sig).copied().unwrap_or(false),
            Driver::FlipFlop(idx) => self.regs[idx],
            Driver::Connection(source) => self.eval(inputs, memo, source),
            Driver::Cell(idx) => match &self.module.cells()[idx].cell {
                Cell::And(a, b) => self.eval(inputs, memo, *a) & self.eval(inputs, memo, *b),
                Cell::Or(a, b) => self.eval(inputs, memo, *a) | self.eval(inputs, memo, *b),
                Cell::Not(a) => !self.eval(inputs, memo, *a),
                Cell::ReduceOr(bits) => bits.iter().any(|b| self.eval(inputs, memo, *b)),
                Cell::EqConst(bits, pattern) => {
                    let values: Vec<bool> = bits.iter().map(|b| self.eval(inputs, memo, *b)).collect();
                    pattern.matches(&values)
                }
            },
        };
        memo[wire.as_usize()] = Some(value);
        value
    }
}

/// Ports every test module starts with.
pub struct Ports {
    pub clocking: Clocking,
    pub trigger: SigBit,
    pub disable: SigBit,
    pub inputs: Vec<SigBit>,
}

pub fn ports(module: &mut Module) -> Ports {
    let clk = module.add_input("clk");
    Ports {
        clocking: Clocking::new(clk),
        trigger: module.add_input("trigger"),
        disable: module.add_input("disable"),
        inputs: ["a", "b", "c"].iter().map(|n| module.add_input(n)).collect(),
    }
}

/// A random well-formed sequence automaton over inputs `a`, `b` and `c`.
///
/// Sources are numbered 0 (start) and 1..=users, edge targets 1..=users.
/// Link targets are 0 (accept) or a user node numbered above the source, so
/// links never form a cycle. Controls are 0 (constant true) or 1..=3 (an
/// input).
#[derive(Clone, Debug)]
pub struct RandomFsm {
    pub users: usize,
    pub edges: Vec<(usize, usize, usize)>,
    pub links: Vec<(usize, usize, usize)>,
}

impl Arbitrary for RandomFsm {
    fn arbitrary(g: &mut Gen) -> Self {
        let users = usize::arbitrary(g) % 5 + 1;
        let edges = (0..usize::arbitrary(g) % 8)
            .map(|_| {
                let from = usize::arbitrary(g) % (users + 1);
                let to = usize::arbitrary(g) % users + 1;
                (from, to, usize::arbitrary(g) % 4)
            })
            .collect();
        let links = (0..usize::arbitrary(g) % 6)
            .map(|_| {
                let from = usize::arbitrary(g) % (users + 1);
                let to = if from == users || bool::arbitrary(g) {
                    0
                } else {
                    from + 1 + usize::arbitrary(g) % (users - from)
                };
                (from, to, usize::arbitrary(g) % 4)
            })
            .collect();
        Self { users, edges, links }
    }
}

impl RandomFsm {
    pub fn build<'m>(&self, module: &'m mut Module, ports: &Ports, trigger: SigBit) -> SvaFsm<'m, Module> {
        let mut fsm = SvaFsm::new(module, ports.clocking.clone(), trigger);
        let user = |n: usize| NodeId::from(n + 2);
        let source = |n: usize| if n == 0 { NodeId::new(0) } else { user(n) };
        let ctrl = |c: usize| if c == 0 { SigBit::ONE } else { ports.inputs[c - 1] };

        for _ in 0..self.users {
            fsm.create_node(None).unwrap();
        }
        for &(from, to, c) in &self.edges {
            fsm.create_edge(source(from), user(to), ctrl(c)).unwrap();
        }
        for &(from, to, c) in &self.links {
            let target = if to == 0 { fsm.accept_node() } else { user(to) };
            fsm.create_link(source(from), target, ctrl(c)).unwrap();
        }
        fsm
    }
}

/// Input trace over `trigger`, `a`, `b` and `c`.
pub fn input_trace(ports: &Ports, cycles: &[(bool, bool, bool, bool)]) -> Vec<Vec<(SigBit, bool)>> {
    cycles
        .iter()
        .map(|&(t, a, b, c)| {
            vec![
                (ports.trigger, t),
                (ports.inputs[0], a),
                (ports.inputs[1], b),
                (ports.inputs[2], c),
            ]
        })
        .collect()
}
