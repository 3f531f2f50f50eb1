//! Benchmarks for proportion transitions and metric resolution.
//!
//! Run with: cargo bench -p thirds-layout

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use thirds_layout::instances;
use thirds_layout::transitions;
use thirds_layout::{DrawerPanel, PanelSet, ProportionConfig, VerticalPanel};

fn bench_pure_transitions(c: &mut Criterion) {
    let mut group = c.benchmark_group("transitions/pure");
    let balanced: ProportionConfig<DrawerPanel> = transitions::even_split();

    group.bench_function("toggle_close", |b| {
        b.iter(|| black_box(transitions::toggle(&balanced, DrawerPanel::Events, &balanced)))
    });
    group.bench_function("swap_focus_three_open", |b| {
        b.iter(|| black_box(transitions::swap_focus(&balanced, DrawerPanel::Messages)))
    });

    let resting = instances::vertical_resting();
    group.bench_function("escalate", |b| {
        b.iter(|| {
            black_box(transitions::escalate(
                &resting,
                VerticalPanel::Presentation,
                &resting,
            ))
        })
    });

    group.finish();
}

fn bench_engine_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("transitions/engine");

    group.bench_function("toggle_cycle", |b| {
        let mut engine = instances::drawers().build().unwrap();
        let mut i = 0usize;
        b.iter(|| {
            let panel = DrawerPanel::ALL[i % DrawerPanel::count()];
            i += 1;
            let _ = black_box(engine.toggle(panel));
        })
    });

    group.finish();
}

fn bench_split(c: &mut Criterion) {
    let mut group = c.benchmark_group("transitions/split");
    let mut engine = instances::drawers().build().unwrap();
    engine.toggle(DrawerPanel::Events).unwrap();

    for width in [320u32, 1280, 3840] {
        group.bench_with_input(BenchmarkId::new("drawers", width), &width, |b, &width| {
            b.iter(|| black_box(engine.split(width)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_pure_transitions, bench_engine_cycle, bench_split);
criterion_main!(benches);
