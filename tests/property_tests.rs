use proptest::prelude::*;
use tollgate::limiters::{
    FixedWindowLimiter, RateLimiter, SlidingWindowLimiter, TokenBucketLimiter,
};

const T: i64 = 1_700_000_000_000;

/// Sorted offsets inside one second, each with a batch size
fn requests_within_one_second() -> impl Strategy<Value = Vec<(i64, u64)>> {
    prop::collection::vec((0i64..1000, 0u64..8), 1..60).prop_map(|mut requests| {
        requests.sort_by_key(|(offset, _)| *offset);
        requests
    })
}

/// Monotonic timestamps built from small positive gaps
fn requests_over_time() -> impl Strategy<Value = Vec<(i64, u64)>> {
    prop::collection::vec((0i64..1500, 0u64..12), 1..120).prop_map(|gaps| {
        let mut timestamp = T;
        gaps.into_iter()
            .map(|(gap, n)| {
                timestamp += gap;
                (timestamp, n)
            })
            .collect()
    })
}

fn admitted_units(limiter: &dyn RateLimiter, requests: &[(i64, u64)]) -> u64 {
    requests
        .iter()
        .filter(|(offset, n)| limiter.allow_n(T + offset, *n))
        .map(|(_, n)| n)
        .sum()
}

proptest! {
    #[test]
    fn test_fixed_window_capacity_bound(
        capacity in 1u64..40,
        requests in requests_within_one_second()
    ) {
        let limiter = FixedWindowLimiter::new_at(1, capacity, T).unwrap();
        prop_assert!(admitted_units(&limiter, &requests) <= capacity);
    }

    #[test]
    fn test_sliding_window_capacity_bound(
        capacity in 1u64..40,
        requests in requests_within_one_second()
    ) {
        let limiter = SlidingWindowLimiter::new_at(1, capacity, T).unwrap();
        prop_assert!(admitted_units(&limiter, &requests) <= capacity);
    }

    #[test]
    fn test_token_bucket_capacity_bound(
        capacity in 1u64..40,
        requests in requests_within_one_second()
    ) {
        // one token per second: nothing refills inside the first second
        let limiter = TokenBucketLimiter::new_at(capacity, 1, T).unwrap();
        prop_assert!(admitted_units(&limiter, &requests) <= capacity);
    }

    #[test]
    fn test_token_bucket_never_exceeds_capacity(
        capacity in 1u64..30,
        refill_rate in 1u64..50,
        requests in requests_over_time()
    ) {
        let limiter = TokenBucketLimiter::new_at(capacity, refill_rate, T).unwrap();
        for (timestamp, n) in requests {
            let before = limiter.snapshot();
            let admitted = limiter.allow_n(timestamp, n);
            let after = limiter.snapshot();
            prop_assert!(after.tokens <= capacity);
            prop_assert!(after.last_refill >= before.last_refill);
            if !admitted {
                // only the refill can have happened
                prop_assert!(after.tokens >= before.tokens);
                prop_assert!(after.tokens < n);
            }
        }
    }

    #[test]
    fn test_rejection_never_mutates(
        capacity in 1u64..20,
        requests in requests_over_time()
    ) {
        let limiters: Vec<Box<dyn RateLimiter>> = vec![
            Box::new(FixedWindowLimiter::new_at(1, capacity, T).unwrap()),
            Box::new(SlidingWindowLimiter::new_at(1, capacity, T).unwrap()),
            Box::new(TokenBucketLimiter::new_at(capacity, 5, T).unwrap()),
        ];
        for limiter in &limiters {
            for (timestamp, n) in &requests {
                if !limiter.allow_n(*timestamp, *n) {
                    let remaining = limiter.remaining(*timestamp);
                    prop_assert!(remaining < *n);
                    prop_assert!(!limiter.allow_n(*timestamp, *n));
                    prop_assert_eq!(limiter.remaining(*timestamp), remaining);
                }
            }
        }
    }

    #[test]
    fn test_sliding_window_estimate_never_exceeds_capacity(
        capacity in 1u64..30,
        window_size_seconds in 1u64..5,
        requests in requests_over_time()
    ) {
        let limiter = SlidingWindowLimiter::new_at(window_size_seconds, capacity, T).unwrap();
        for (timestamp, n) in requests {
            limiter.allow_n(timestamp, n);
            prop_assert!(limiter.remaining(timestamp) <= capacity);
        }
    }
}
