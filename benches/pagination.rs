use std::num::NonZeroUsize;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use photocard_binder::core::{Card, ImageRef};
use photocard_binder::pagination::{paginate, Pager};
use photocard_binder::reorder::BinderOrder;

const SIZES: [usize; 3] = [25, 500, 10_000];

fn cards(n: usize) -> Vec<Card> {
    (0..n)
        .map(|i| Card::new(format!("c{i}"), format!("Card {i}"), ImageRef::from_url("mem://x")))
        .collect()
}

fn bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("pagination");
    let per_page = NonZeroUsize::new(9).unwrap_or(NonZeroUsize::MIN);

    for size in SIZES {
        let cards = cards(size);

        group.throughput(Throughput::Elements(size as u64));

        group.bench_function(BenchmarkId::new("paginate", size), |b| {
            b.iter(|| paginate(black_box(&cards), per_page).map(<[Card]>::len).sum::<usize>())
        });

        group.bench_function(BenchmarkId::new("page_walk", size), |b| {
            b.iter(|| {
                let mut pager = Pager::new(per_page);
                for _ in 0..pager.total_pages(cards.len()) {
                    black_box(pager.page(&cards));
                    pager.next_page(cards.len());
                }
            })
        });

        let order = BinderOrder::new(cards.clone());
        group.bench_function(BenchmarkId::new("move_and_snapshot", size), |b| {
            b.iter(|| {
                let mut order = order.clone();
                let before = order.snapshot();
                order.move_card(0, size - 1).ok();
                black_box(before.len())
            })
        });
    }

    group.finish();
}

criterion_group!(
    name = benches;
    config = Criterion::default();
    targets = bench
);

criterion_main!(benches);
