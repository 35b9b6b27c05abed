use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use slotset::{Config, OrderedSet, Pool};

const ELEMENTS: usize = 10_000;

fn filled<A: slotset::Strategy<u64>>(strategy: A) -> OrderedSet<u64, A> {
    let mut set = OrderedSet::with_config_in(Config::default(), strategy).unwrap();
    for value in 0..ELEMENTS as u64 {
        set.insert(value).unwrap();
    }
    set
}

fn insert(c: &mut Criterion) {
    c.bench_function("insert_fresh", |b| {
        b.iter(|| filled(slotset::Heap))
    });
}

fn churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("churn");
    group.bench_function("heap", |b| {
        b.iter_batched(
            || filled(slotset::Heap),
            |mut set| {
                for index in (0..ELEMENTS).step_by(2) {
                    set.remove(index);
                }
                for value in 0..(ELEMENTS / 2) as u64 {
                    black_box(set.insert(value).unwrap());
                }
                set
            },
            BatchSize::LargeInput,
        )
    });
    group.bench_function("pool", |b| {
        b.iter_batched(
            || filled(Pool::new()),
            |mut set| {
                for index in (0..ELEMENTS).step_by(2) {
                    set.remove(index);
                }
                for value in 0..(ELEMENTS / 2) as u64 {
                    black_box(set.insert(value).unwrap());
                }
                set
            },
            BatchSize::LargeInput,
        )
    });
    group.finish();
}

fn iterate(c: &mut Criterion) {
    let mut set = filled(slotset::Heap);
    for index in (0..ELEMENTS).step_by(3) {
        set.remove(index);
    }
    c.bench_function("iterate_with_holes", |b| {
        b.iter(|| set.iter().copied().sum::<u64>())
    });
}

criterion_group!(benches, insert, churn, iterate);
criterion_main!(benches);
