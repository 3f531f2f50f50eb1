//! Property/fuzz-style invariants for proportion engine operations.
//!
//! This suite drives random operation streams through the public engine API
//! and asserts the budget and liveness invariants, refusal semantics, and
//! deterministic replay after each step.

use proptest::prelude::*;
use thirds_layout::instances;
use thirds_layout::{
    AllocationLevel, DrawerPanel, PanelSet, ProportionConfig, ProportionEngine, TransitionError,
    TransitionPolicy, VerticalPanel,
};

#[derive(Debug, Clone)]
struct Lcg {
    state: u64,
}

impl Lcg {
    fn new(seed: u64) -> Self {
        Self {
            state: seed ^ 0x9E37_79B9_7F4A_7C15,
        }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        self.state >> 11
    }

    fn choose_index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0);
        (self.next_u64() % len as u64) as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Toggle(usize),
    Maximize(usize),
    Balance,
    SwapFocus(usize),
    Activate(usize),
    Reset,
    Preset(usize),
}

fn random_op(rng: &mut Lcg, panels: usize) -> Op {
    match rng.choose_index(7) {
        0 => Op::Toggle(rng.choose_index(panels)),
        1 => Op::Maximize(rng.choose_index(panels)),
        2 => Op::Balance,
        3 => Op::SwapFocus(rng.choose_index(panels)),
        4 => Op::Activate(rng.choose_index(panels)),
        5 => Op::Reset,
        _ => Op::Preset(rng.choose_index(8)),
    }
}

fn apply<P: PanelSet, T: TransitionPolicy<P>>(
    engine: &mut ProportionEngine<P, T>,
    op: Op,
) -> Result<(), TransitionError> {
    let names: Vec<String> = engine.preset_names().map(str::to_owned).collect();
    match op {
        Op::Toggle(i) => engine.toggle(P::ALL[i]).map(drop),
        Op::Maximize(i) => engine.maximize(P::ALL[i]).map(drop),
        Op::Balance => engine.balance().map(drop),
        Op::SwapFocus(i) => engine.swap_focus(P::ALL[i]).map(drop),
        Op::Activate(i) => engine.activate(P::ALL[i]).map(drop),
        Op::Reset => engine.reset().map(drop),
        Op::Preset(i) if names.is_empty() => engine.apply_preset(&format!("p{i}")).map(drop),
        Op::Preset(i) => engine.apply_preset(&names[i % names.len()]).map(drop),
    }
}

fn assert_invariants<P: PanelSet>(config: &ProportionConfig<P>) {
    assert_eq!(config.total_units(), 3, "budget violated: {config}");
    assert!(config.open_count() >= 1, "liveness violated: {config}");
}

fn run_sequence<P: PanelSet, T: TransitionPolicy<P>>(
    engine: &mut ProportionEngine<P, T>,
    seed: u64,
    steps: usize,
) -> Vec<Op> {
    let mut rng = Lcg::new(seed);
    let mut applied = Vec::with_capacity(steps);

    for step in 0..steps {
        let op = random_op(&mut rng, P::count());
        let before = engine.config().clone();
        let version = engine.version();

        match apply(engine, op) {
            Ok(()) => {
                let changed = engine.config() != &before;
                let expected = if changed { version + 1 } else { version };
                assert_eq!(
                    engine.version(),
                    expected,
                    "version must track changes (step {step}, seed={seed}, op={op:?})"
                );
            }
            Err(err) => {
                assert_eq!(
                    engine.config(),
                    &before,
                    "refused op must not change state (step {step}, seed={seed}, op={op:?}, err={err})"
                );
                assert_eq!(engine.version(), version);
            }
        }
        assert_invariants(engine.config());
        applied.push(op);
    }
    applied
}

fn assert_split_is_exact<P: PanelSet, T: TransitionPolicy<P>>(
    engine: &ProportionEngine<P, T>,
    available: u32,
) {
    let lengths = engine.split(available);
    assert_eq!(lengths.len(), P::count());
    assert_eq!(
        lengths.iter().map(|&(_, len)| len).sum::<u32>(),
        available,
        "split must partition exactly: {}",
        engine.config()
    );

    let open: u32 = lengths
        .iter()
        .filter(|&&(panel, _)| engine.level(panel).is_open())
        .map(|&(_, len)| len)
        .sum();
    assert!(
        open >= available - available / 2,
        "closed handles took more than half of {available}px: {}",
        engine.config()
    );
    if let Some(largest) = engine.config().largest() {
        assert!(
            available == 0 || lengths[largest.index()].1 > 0,
            "largest open panel collapsed at {available}px: {}",
            engine.config()
        );
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn drawer_random_operation_sequences_preserve_invariants(
        seed in any::<u64>(),
        steps in 10usize..120,
        width in 0u32..4000,
    ) {
        let mut engine = instances::drawers().build().unwrap();
        run_sequence(&mut engine, seed, steps);
        assert_split_is_exact(&engine, width);
    }

    #[test]
    fn vertical_random_operation_sequences_preserve_invariants(
        seed in any::<u64>(),
        steps in 10usize..120,
        height in 0u32..2000,
    ) {
        let mut engine = instances::vertical_split().build().unwrap();
        run_sequence(&mut engine, seed, steps);
        assert_split_is_exact(&engine, height);
    }

    #[test]
    fn drawer_sequences_replay_deterministically(
        seed in any::<u64>(),
        steps in 10usize..80,
    ) {
        let mut first = instances::drawers().build().unwrap();
        let ops = run_sequence(&mut first, seed, steps);

        let mut replay = instances::drawers().build().unwrap();
        for op in ops {
            let _ = apply(&mut replay, op);
        }
        prop_assert_eq!(replay.config(), first.config());
        prop_assert_eq!(replay.version(), first.version());
    }

    #[test]
    fn last_open_panel_never_closes(index in 0usize..3) {
        let panel = DrawerPanel::ALL[index];
        let mut engine = instances::drawers().build().unwrap();
        engine.maximize(panel).unwrap();
        let before = engine.config().clone();
        prop_assert_eq!(
            engine.toggle(panel).unwrap_err(),
            TransitionError::LastOpenPanel { key: panel.key() }
        );
        prop_assert_eq!(engine.config(), &before);
    }

    #[test]
    fn balance_is_idempotent_from_any_reachable_state(seed in any::<u64>()) {
        let mut engine = instances::drawers().build().unwrap();
        run_sequence(&mut engine, seed, 40);
        let once = engine.balance().unwrap().clone();
        let twice = engine.balance().unwrap().clone();
        prop_assert_eq!(once, twice);
    }
}

#[test]
fn escalate_cycle_returns_to_resting() {
    let mut engine = instances::vertical_split().build().unwrap();
    let resting = engine.config().clone();

    engine.activate(VerticalPanel::Presentation).unwrap();
    assert_eq!(engine.level(VerticalPanel::Presentation), AllocationLevel::TwoThirds);
    assert_eq!(engine.level(VerticalPanel::Communication), AllocationLevel::Third);

    engine.activate(VerticalPanel::Presentation).unwrap();
    assert_eq!(engine.level(VerticalPanel::Presentation), AllocationLevel::Full);
    assert_eq!(engine.level(VerticalPanel::Communication), AllocationLevel::Closed);

    engine.activate(VerticalPanel::Presentation).unwrap();
    assert_eq!(engine.config(), &resting);
}

#[test]
fn fuzz_seed_corpus_preserves_invariants() {
    let seeds = [
        0_u64,
        1,
        2,
        3,
        5,
        8,
        13,
        21,
        34,
        55,
        89,
        144,
        u32::MAX as u64,
        (u32::MAX as u64) + 1,
        u64::MAX - 1,
        u64::MAX,
    ];

    for seed in seeds {
        let mut drawers = instances::drawers().build().unwrap();
        run_sequence(&mut drawers, seed, 200);
        let mut group = instances::group_content().build().unwrap();
        run_sequence(&mut group, seed, 200);
        let mut vertical = instances::vertical_split().build().unwrap();
        run_sequence(&mut vertical, seed, 200);
    }
}
