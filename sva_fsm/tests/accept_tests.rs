#![allow(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

mod common;

use common::{Ports, RandomFsm, Simulator, input_trace, ports, setup_test_logging};
use quickcheck::quickcheck;
use rstest::rstest;
use sva_fsm::{FsmError, NodeId, NodeRole, SvaFsm, TransitionKind};
use sva_netlist::{Cell, Module, SigBit};

/// `start -1-> n3`, `n3 => accept`: matches one cycle after the trigger.
///
/// Edges may not enter the accept node, so a one-cycle delay into accept is
/// an edge into a plain node followed by an unconditional link.
fn one_cycle_delay<'m>(module: &'m mut Module, ports: &Ports) -> (SvaFsm<'m, Module>, NodeId) {
    let mut fsm = SvaFsm::new(module, ports.clocking.clone(), ports.trigger);
    let n3 = fsm.create_node(None).unwrap();
    fsm.create_edge(fsm.start_node(), n3, SigBit::ONE).unwrap();
    fsm.create_link(n3, fsm.accept_node(), SigBit::ONE).unwrap();
    (fsm, n3)
}

#[test]
fn test_single_edge_accepts_one_cycle_after_trigger() {
    setup_test_logging();
    let mut module = Module::new("top");
    let ports = ports(&mut module);
    let (fsm, n3) = one_cycle_delay(&mut module, &ports);

    let circuit = fsm.get_accept().unwrap();
    assert_eq!(circuit.next_states[n3.as_usize()], circuit.node_states[0]);
    assert_eq!(circuit.registers, 1);

    let trace = input_trace(
        &ports,
        &[
            (true, false, false, false),
            (false, false, false, false),
            (false, false, false, false),
            (false, false, false, false),
        ],
    );
    assert_eq!(
        Simulator::run(&module, &trace, circuit.accept),
        vec![false, true, false, false]
    );
}

#[test]
fn test_throughout_replaces_constant_true_control() {
    setup_test_logging();
    let mut module = Module::new("top");
    let ports = ports(&mut module);
    let sig = ports.inputs[0];
    let mut fsm = SvaFsm::new(&mut module, ports.clocking.clone(), SigBit::ONE);
    let a = fsm.create_start_node().unwrap();
    let b = fsm.create_node(None).unwrap();

    fsm.push_throughout(sig);
    fsm.create_edge(a, b, SigBit::ONE).unwrap();
    fsm.pop_throughout().unwrap();

    assert_eq!(fsm.node(a).unwrap().edges, vec![(b, sig)]);
    drop(fsm);
    assert!(module.cells().is_empty());
}

#[test]
fn test_throughout_conjoins_explicit_control() {
    let mut module = Module::new("top");
    let ports = ports(&mut module);
    let (x, y) = (ports.inputs[0], ports.inputs[1]);
    let mut fsm = SvaFsm::new(&mut module, ports.clocking.clone(), SigBit::ONE);
    let a = fsm.create_start_node().unwrap();

    fsm.push_throughout(x);
    fsm.create_link(a, fsm.accept_node(), y).unwrap();
    fsm.pop_throughout().unwrap();

    let ctrl = fsm.node(a).unwrap().links[0].1;
    drop(fsm);
    assert_eq!(module.cell_driving(ctrl).map(|c| &c.cell), Some(&Cell::And(x, y)));
}

#[test]
fn test_link_cycle_fails_before_touching_netlist() {
    setup_test_logging();
    let mut module = Module::new("top");
    let ports = ports(&mut module);
    let mut fsm = SvaFsm::new(&mut module, ports.clocking.clone(), SigBit::ONE);
    let n3 = fsm.create_node(None).unwrap();
    let n4 = fsm.create_node(Some(n3)).unwrap();
    fsm.create_link(n4, n3, SigBit::ONE).unwrap();
    let wires_before = fsm.module().wire_count();

    assert!(matches!(fsm.get_accept(), Err(FsmError::LinkCycle(_))));
    assert_eq!(module.wire_count(), wires_before);
}

#[test]
fn test_link_cycle_also_blocks_determinization() {
    let mut module = Module::new("top");
    let ports = ports(&mut module);
    let mut fsm = SvaFsm::new(&mut module, ports.clocking.clone(), SigBit::ONE);
    let n3 = fsm.create_start_node().unwrap();
    let n4 = fsm.create_node(Some(n3)).unwrap();
    fsm.create_link(n4, n3, SigBit::ONE).unwrap();

    assert!(matches!(
        fsm.get_reject(sva_fsm::RejectMode::All),
        Err(FsmError::LinkCycle(_))
    ));
}

#[test]
fn test_disable_clears_activation_for_the_cycle() {
    setup_test_logging();
    let mut module = Module::new("top");
    let ports = ports(&mut module);
    let mut fsm = SvaFsm::new(&mut module, ports.clocking.clone(), SigBit::ONE);
    fsm.push_disable(ports.disable);
    let n3 = fsm.create_node(None).unwrap();
    fsm.create_edge(fsm.start_node(), n3, SigBit::ONE).unwrap();
    fsm.create_link(n3, fsm.accept_node(), SigBit::ONE).unwrap();

    let circuit = fsm.get_accept().unwrap();
    let probes = [circuit.node_states[0], circuit.node_states[n3.as_usize()], circuit.accept];

    let mut sim = Simulator::new(&module);
    let d = ports.disable;
    assert_eq!(sim.step(&[(d, false)], &probes), vec![true, false, false]);
    assert_eq!(sim.step(&[(d, true)], &probes), vec![false, false, false]);
    // Nothing was carried over the disabled cycle.
    assert_eq!(sim.step(&[(d, false)], &probes), vec![true, false, false]);
    assert_eq!(sim.step(&[(d, false)], &probes), vec![true, true, true]);
}

#[test]
fn test_nested_disable_uses_either_condition() {
    let mut module = Module::new("top");
    let ports = ports(&mut module);
    let other = ports.inputs[2];
    let mut fsm = SvaFsm::new(&mut module, ports.clocking.clone(), SigBit::ONE);
    fsm.push_disable(ports.disable);
    fsm.push_disable(other);
    fsm.create_link(fsm.start_node(), fsm.accept_node(), SigBit::ONE).unwrap();

    let circuit = fsm.get_accept().unwrap();
    let sim = Simulator::new(&module);
    for (d, c) in [(false, false), (true, false), (false, true), (true, true)] {
        let inputs = [(ports.disable, d), (other, c)];
        assert_eq!(sim.sample(&inputs, &[circuit.accept]), vec![!(d || c)]);
    }
}

#[rstest]
#[case::edge_from_accept(1, 3, TransitionKind::Edge, FsmError::ForbiddenSource { node: NodeId::new(1), role: NodeRole::Accept, kind: TransitionKind::Edge })]
#[case::link_from_cond(2, 4, TransitionKind::Link, FsmError::ForbiddenSource { node: NodeId::new(2), role: NodeRole::Cond, kind: TransitionKind::Link })]
#[case::edge_into_accept(3, 1, TransitionKind::Edge, FsmError::ForbiddenTarget { node: NodeId::new(1), role: NodeRole::Accept, kind: TransitionKind::Edge })]
#[case::edge_into_cond(4, 2, TransitionKind::Edge, FsmError::ForbiddenTarget { node: NodeId::new(2), role: NodeRole::Cond, kind: TransitionKind::Edge })]
#[case::link_into_start(3, 0, TransitionKind::Link, FsmError::ForbiddenTarget { node: NodeId::new(0), role: NodeRole::Start, kind: TransitionKind::Link })]
#[case::edge_across_spaces(3, 4, TransitionKind::Edge, FsmError::CrossSpace { from: NodeId::new(3), to: NodeId::new(4), kind: TransitionKind::Edge })]
#[case::link_out_of_range(3, 9, TransitionKind::Link, FsmError::NodeOutOfRange { node: NodeId::new(9), count: 5 })]
fn test_structural_violations_are_rejected(
    #[case] from: u32,
    #[case] to: u32,
    #[case] kind: TransitionKind,
    #[case] expected: FsmError,
) {
    let mut module = Module::new("top");
    let ports = ports(&mut module);
    let mut fsm = SvaFsm::new(&mut module, ports.clocking.clone(), SigBit::ONE);
    fsm.create_node(None).unwrap();
    fsm.set_cond_mode(true);
    fsm.create_node(None).unwrap();
    fsm.set_cond_mode(false);

    let (from, to) = (NodeId::new(from), NodeId::new(to));
    let result = match kind {
        TransitionKind::Edge => fsm.create_edge(from, to, SigBit::ONE),
        TransitionKind::Link => fsm.create_link(from, to, SigBit::ONE),
    };
    assert_eq!(result, Err(expected));
}

#[rstest]
#[case::start_into_cond_space(0, 4)]
#[case::into_accept(3, 1)]
#[case::into_cond(4, 2)]
fn test_legal_links(#[case] from: u32, #[case] to: u32) {
    let mut module = Module::new("top");
    let ports = ports(&mut module);
    let mut fsm = SvaFsm::new(&mut module, ports.clocking.clone(), SigBit::ONE);
    fsm.create_node(None).unwrap();
    fsm.set_cond_mode(true);
    fsm.create_node(None).unwrap();

    assert!(fsm.create_link(NodeId::new(from), NodeId::new(to), SigBit::ONE).is_ok());
}

fn accept_trace(fsm: &RandomFsm, cycles: &[(bool, bool, bool, bool)]) -> (usize, Vec<bool>, String) {
    let mut module = Module::new("top");
    let ports = ports(&mut module);
    let circuit = fsm.build(&mut module, &ports, ports.trigger).get_accept().unwrap();
    let trace = input_trace(&ports, cycles);
    (
        module.flip_flops().len(),
        Simulator::run(&module, &trace, circuit.accept),
        module.to_string(),
    )
}

quickcheck! {
    fn prop_accept_synthesis_is_reproducible(fsm: RandomFsm, cycles: Vec<(bool, bool, bool, bool)>) -> bool {
        accept_trace(&fsm, &cycles) == accept_trace(&fsm, &cycles)
    }

    fn prop_trigger_activates_start(fsm: RandomFsm, cycles: Vec<(bool, bool, bool, bool)>) -> bool {
        let mut module = Module::new("top");
        let ports = ports(&mut module);
        let circuit = fsm.build(&mut module, &ports, ports.trigger).get_accept().unwrap();
        let start = circuit.node_states[0];
        let mut sim = Simulator::new(&module);
        input_trace(&ports, &cycles).iter().zip(&cycles).all(|(inputs, (t, ..))| {
            let active = sim.step(inputs, &[start])[0];
            !*t || active
        })
    }

    fn prop_disable_silences_every_node(fsm: RandomFsm, cycles: Vec<(bool, bool, bool, bool, bool)>) -> bool {
        let mut module = Module::new("top");
        let ports = ports(&mut module);
        let mut sva = fsm.build(&mut module, &ports, ports.trigger);
        sva.push_disable(ports.disable);
        let circuit = sva.get_accept().unwrap();

        let mut sim = Simulator::new(&module);
        cycles.iter().all(|&(t, a, b, c, d)| {
            let inputs = [
                (ports.trigger, t),
                (ports.inputs[0], a),
                (ports.inputs[1], b),
                (ports.inputs[2], c),
                (ports.disable, d),
            ];
            let states = sim.step(&inputs, &circuit.node_states);
            !d || states.iter().all(|s| !s)
        })
    }

    fn prop_accept_circuit_is_well_formed(fsm: RandomFsm) -> bool {
        let mut module = Module::new("top");
        let ports = ports(&mut module);
        let circuit = fsm.build(&mut module, &ports, ports.trigger).get_accept().unwrap();
        module.validate().is_ok() && circuit.registers == module.flip_flops().len()
    }
}
