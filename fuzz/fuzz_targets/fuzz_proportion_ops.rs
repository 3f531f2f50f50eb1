#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use thirds_layout::{
    AllocationLevel, PanelSet, ProportionConfig, ProportionEngine, TransitionPolicy, instances,
};

#[derive(Debug, Arbitrary)]
enum Op {
    Toggle(u8),
    Maximize(u8),
    Balance,
    SwapFocus(u8),
    Escalate(u8),
    Activate(u8),
    Reset,
    SetConfig([u8; 3]),
    Split(u32),
}

#[derive(Debug, Arbitrary)]
struct Input {
    vertical: bool,
    ops: Vec<Op>,
}

fuzz_target!(|input: Input| {
    if input.vertical {
        let Ok(mut engine) = instances::vertical_split().build() else {
            return;
        };
        run(&mut engine, &input.ops);
    } else {
        let Ok(mut engine) = instances::drawers().build() else {
            return;
        };
        run(&mut engine, &input.ops);
    }
});

fn run<P: PanelSet, T: TransitionPolicy<P>>(engine: &mut ProportionEngine<P, T>, ops: &[Op]) {
    let pick = |i: u8| P::ALL[usize::from(i) % P::count()];

    for op in ops.iter().take(256) {
        let before = engine.config().clone();
        let version = engine.version();

        let result = match *op {
            Op::Toggle(i) => engine.toggle(pick(i)).map(drop),
            Op::Maximize(i) => engine.maximize(pick(i)).map(drop),
            Op::Balance => engine.balance().map(drop),
            Op::SwapFocus(i) => engine.swap_focus(pick(i)).map(drop),
            Op::Escalate(i) => engine.escalate(pick(i)).map(drop),
            Op::Activate(i) => engine.activate(pick(i)).map(drop),
            Op::Reset => engine.reset().map(drop),
            Op::SetConfig(units) => {
                let config = ProportionConfig::from_fn(|panel: P| {
                    AllocationLevel::from_units(units[panel.index() % units.len()])
                });
                engine.set_config(config).map(drop)
            }
            Op::Split(available) => {
                let lengths = engine.split(available);
                let total: u32 = lengths.iter().map(|&(_, len)| len).sum();
                assert_eq!(total, available, "split must partition exactly");
                if let Some(largest) = engine.config().largest() {
                    let visible = available == 0 || lengths[largest.index()].1 > 0;
                    assert!(visible, "open panel collapsed");
                }
                Ok(())
            }
        };

        if result.is_err() {
            assert_eq!(engine.config(), &before, "refusal changed state");
            assert_eq!(engine.version(), version, "refusal bumped version");
        }
        assert_eq!(engine.config().total_units(), 3, "budget violated");
        assert!(engine.open_count() >= 1, "liveness violated");
    }
}
