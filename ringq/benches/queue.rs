//! Throughput benchmarks for the string queue.
//!
//! Run with: cargo bench
//!
//! Queues are pre-allocated once; each iteration works on a fresh fill.

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use ringq::{Queue, QueueSet};

const COUNT: usize = 10_000;

fn words(count: usize, seed: u64) -> Vec<String> {
    let mut rng = SmallRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let len = rng.random_range(4..12);
            (0..len)
                .map(|_| char::from(rng.random_range(b'a'..=b'z')))
                .collect()
        })
        .collect()
}

fn filled(words: &[String]) -> Queue {
    let mut queue = Queue::with_capacity(words.len()).unwrap();
    for word in words {
        queue.insert_tail(word).unwrap();
    }
    queue
}

// ============================================================================
// Insert / Remove
// ============================================================================

fn bench_insert_remove(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_remove");
    group.throughput(Throughput::Elements(COUNT as u64));

    let words = words(COUNT, 1);
    let mut queue = Queue::with_capacity(COUNT).unwrap();
    let mut buf = [0u8; 16];

    group.bench_function("insert_tail/remove_head", |b| {
        b.iter(|| {
            for word in &words {
                black_box(queue.insert_tail(word).unwrap());
            }
            while let Some(element) = queue.remove_head(Some(&mut buf)) {
                black_box(element);
            }
        });
    });

    group.bench_function("insert_head/remove_tail", |b| {
        b.iter(|| {
            for word in &words {
                black_box(queue.insert_head(word).unwrap());
            }
            while let Some(element) = queue.remove_tail(None) {
                black_box(element);
            }
        });
    });

    group.finish();
}

// ============================================================================
// Ordering
// ============================================================================

fn bench_sort(c: &mut Criterion) {
    let mut group = c.benchmark_group("sort");
    group.throughput(Throughput::Elements(COUNT as u64));

    let words = words(COUNT, 2);

    group.bench_function("ringq/ascending", |b| {
        b.iter_batched(
            || filled(&words),
            |mut queue| {
                queue.sort(false);
                queue
            },
            BatchSize::LargeInput,
        );
    });

    group.bench_function("vec/stable", |b| {
        b.iter_batched(
            || words.clone(),
            |mut words| {
                words.sort();
                words
            },
            BatchSize::LargeInput,
        );
    });

    group.bench_function("ringq/ascend", |b| {
        b.iter_batched(
            || filled(&words),
            |mut queue| {
                black_box(queue.ascend());
                queue
            },
            BatchSize::LargeInput,
        );
    });

    group.finish();
}

// ============================================================================
// Merge / Shuffle
// ============================================================================

fn bench_merge(c: &mut Criterion) {
    const QUEUES: usize = 8;

    let mut group = c.benchmark_group("merge");
    group.throughput(Throughput::Elements(COUNT as u64));

    let words = words(COUNT, 3);

    group.bench_function("8_queues", |b| {
        b.iter_batched(
            || {
                let mut set = QueueSet::with_capacity(COUNT, QUEUES).unwrap();
                let ids: Vec<_> = (0..QUEUES).map(|_| set.new_queue().unwrap()).collect();
                for (i, word) in words.iter().enumerate() {
                    set.insert_tail(ids[i % QUEUES], word).unwrap();
                }
                set.sort_all(false);
                set
            },
            |mut set| {
                black_box(set.merge(false));
                set
            },
            BatchSize::LargeInput,
        );
    });

    group.finish();
}

fn bench_shuffle(c: &mut Criterion) {
    const SMALL: usize = 1_000;

    let mut group = c.benchmark_group("shuffle");
    group.throughput(Throughput::Elements(SMALL as u64));

    let words = words(SMALL, 4);
    let mut queue = filled(&words);
    let mut rng = SmallRng::seed_from_u64(5);

    group.bench_function("fisher_yates", |b| {
        b.iter(|| queue.shuffle(&mut rng));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_insert_remove,
    bench_sort,
    bench_merge,
    bench_shuffle
);
criterion_main!(benches);
