#![allow(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

use rstest::rstest;
use sva_netlist::{Cell, Clocking, Const, Driver, IdString, Module, Netlist, SigBit, SigSpec};

fn module_with_inputs(names: &[&str]) -> (Module, Vec<SigBit>) {
    let mut module = Module::new("top");
    let sigs = names.iter().map(|n| module.add_input(n)).collect();
    (module, sigs)
}

#[test]
fn test_registered_and_gate_is_valid() {
    let (mut module, sigs) = module_with_inputs(&["clk", "a", "b"]);
    let clocking = Clocking::new(sigs[0]);

    let id = module.new_id("t");
    let y = module.and(id, sigs[1], sigs[2]);
    let q = module.add_wire(IdString::named("q"));
    let id = module.new_id("t");
    module.add_dff(id, &clocking, y, q, false);
    module.add_output("q", SigBit::Wire(q));

    assert!(module.validate().is_ok());
    assert_eq!(module.flip_flops().len(), 1);
    assert_eq!(module.flip_flop_driving(q).map(|ff| ff.data), Some(y));
    assert_eq!(module.output("q"), Some(SigBit::Wire(q)));
}

#[test]
fn test_drivers_classify_every_wire() {
    let (mut module, sigs) = module_with_inputs(&["a"]);
    let id = module.new_id("t");
    let not_a = module.not(id, sigs[0]);
    let tied = module.add_wire(IdString::named("tied"));
    module.connect(tied, SigBit::ZERO);

    let drivers = module.drivers();
    assert_eq!(drivers[0], vec![Driver::Input]);
    assert_eq!(drivers[not_a.as_wire().unwrap().as_usize()], vec![Driver::Cell(0)]);
    assert_eq!(drivers[tied.as_usize()], vec![Driver::Connection(SigBit::ZERO)]);
}

#[rstest]
#[case::reduce_or(3, |c: &Cell| matches!(c, Cell::ReduceOr(_)))]
#[case::eq(1, |c: &Cell| matches!(c, Cell::EqConst(..)))]
#[case::or(0, |c: &Cell| matches!(c, Cell::Or(..)))]
fn test_count_cells(#[case] expected: usize, #[case] filter: fn(&Cell) -> bool) {
    let (mut module, sigs) = module_with_inputs(&["a", "b"]);
    let spec = SigSpec::from(sigs.clone());
    for _ in 0..3 {
        let id = module.new_id("t");
        module.reduce_or(id, &spec);
    }
    let id = module.new_id("t");
    module.eq_const(id, &spec, &Const::from_uint(0b01, 2));

    assert_eq!(module.count_cells(filter), expected);
}

#[test]
fn test_display_lists_cells() {
    let (mut module, sigs) = module_with_inputs(&["a", "b"]);
    let id = module.new_id("sva");
    module.or(id, sigs[0], sigs[1]);
    let text = module.to_string();
    assert!(text.starts_with("module \\top"));
    assert!(text.contains("cell $or $sva$0 (w0, w1) -> w2"));
}

#[test]
fn test_negedge_register_keeps_its_wire_name() {
    let (mut module, sigs) = module_with_inputs(&["clk", "d"]);
    let clocking = Clocking::new(sigs[0]).with_negedge();
    let q = module.add_wire(IdString::named("q"));
    let id = module.new_id("ff");
    module.add_dff(id, &clocking, sigs[1], q, true);

    assert_eq!(module.wire_name(q), Some(&IdString::named("q")));
    assert!(module.to_string().contains("cell $dff $ff$0 (w1 @ negedge w0) -> w2 init 1"));
}
