//! Viewport benchmark: focus movement and scroll recompute over long lists.
//!
//! Target: < 1µs per key press on a 10k entry list.

use casement::select::{recompute, ScrollState};
use casement::SelectableItem;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

/// Every seventh entry disabled, so moves have something to skip.
fn create_items(len: usize) -> Vec<SelectableItem<usize>> {
    (0..len)
        .map(|i| SelectableItem::new(format!("entry {i}"), i).disabled(i % 7 == 3))
        .collect()
}

fn recompute_jump(c: &mut Criterion) {
    c.bench_function("recompute_10k_jump", |b| {
        b.iter(|| recompute(black_box(10_000), black_box(7_500), black_box(0), black_box(20)));
    });
}

fn move_next_full_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("move_next_full_pass");
    for len in [100, 1_000, 10_000] {
        let items = create_items(len);
        group.bench_with_input(BenchmarkId::from_parameter(len), &items, |b, items| {
            b.iter(|| {
                let mut state = ScrollState::new(items, 0, 20);
                for _ in 0..items.len() {
                    state.move_next(items);
                }
                black_box(state.offset())
            });
        });
    }
    group.finish();
}

fn page_down_to_end(c: &mut Criterion) {
    let items = create_items(10_000);
    c.bench_function("page_down_10k", |b| {
        b.iter(|| {
            let mut state = ScrollState::new(&items, 0, 20);
            while state.focused_index() < Some(9_990) {
                state.page_down(&items);
            }
            black_box(state.viewport())
        });
    });
}

criterion_group!(benches, recompute_jump, move_next_full_pass, page_down_to_end);
criterion_main!(benches);
