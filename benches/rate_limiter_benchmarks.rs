use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use tollgate::limiters::{
    FixedWindowLimiter, RateLimiter, SlidingWindowLimiter, TokenBucketLimiter,
};

const T: i64 = 1_700_000_000_000;

fn benchmark_allow_n(c: &mut Criterion) {
    let limiters: Vec<(&str, Box<dyn RateLimiter>)> = vec![
        (
            "fixed_window_allow_n",
            Box::new(FixedWindowLimiter::new_at(1, 1_000_000, T).unwrap()),
        ),
        (
            "sliding_window_allow_n",
            Box::new(SlidingWindowLimiter::new_at(1, 1_000_000, T).unwrap()),
        ),
        (
            "token_bucket_allow_n",
            Box::new(TokenBucketLimiter::new_at(1_000_000, 1_000_000, T).unwrap()),
        ),
    ];

    for (name, limiter) in &limiters {
        c.bench_function(name, |b| {
            let mut timestamp = T;
            b.iter(|| {
                // advance time so windows roll over and the bucket refills
                timestamp += 1;
                black_box(limiter.allow_n(black_box(timestamp), 1))
            })
        });
    }
}

fn benchmark_remaining(c: &mut Criterion) {
    let limiter = SlidingWindowLimiter::new_at(1, 1_000_000, T).unwrap();
    limiter.allow_n(T, 500_000);

    c.bench_function("sliding_window_remaining", |b| {
        let mut timestamp = T;
        b.iter(|| {
            timestamp += 1;
            black_box(limiter.remaining(black_box(timestamp)))
        })
    });
}

criterion_group!(benches, benchmark_allow_n, benchmark_remaining);
criterion_main!(benches);
