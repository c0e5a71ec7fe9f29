//! Token bucket rate limiting algorithm
use std::sync::Mutex;

use chrono::Utc;

use super::rate_limit::{lock, require_positive, RateLimiter};
use crate::error::Result;

/// Token bucket state: whole tokens plus the time of the last refill
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenBucket {
    pub tokens: u64,
    pub last_refill: i64,
}

impl TokenBucket {
    /// Whole tokens earned between `last_refill` and `timestamp_ms`.
    /// Zero when time did not move forward.
    fn tokens_earned(&self, refill_rate_per_second: u64, timestamp_ms: i64) -> u128 {
        let elapsed_ms = timestamp_ms.saturating_sub(self.last_refill);
        if elapsed_ms <= 0 {
            return 0;
        }
        elapsed_ms as u128 * u128::from(refill_rate_per_second) / 1000
    }

    /// Function for adding tokens to the bucket.
    /// The refill clock only advances when at least one whole token was
    /// added, so sub-token remainders carry over to the next call.
    fn add_tokens_to_bucket(&mut self, capacity: u64, refill_rate: u64, timestamp_ms: i64) {
        let earned = self.tokens_earned(refill_rate, timestamp_ms);
        if earned == 0 {
            return;
        }
        self.tokens = (u128::from(self.tokens) + earned).min(u128::from(capacity)) as u64;
        self.last_refill = timestamp_ms;
    }
}

#[derive(Debug)]
pub struct TokenBucketLimiter {
    capacity: u64,
    refill_rate_per_second: u64,
    bucket: Mutex<TokenBucket>,
}

impl TokenBucketLimiter {
    /// A full bucket of `capacity` tokens, refilled at `refill_rate_per_second`
    pub fn new(capacity: u64, refill_rate_per_second: u64) -> Result<Self> {
        Self::new_at(capacity, refill_rate_per_second, Utc::now().timestamp_millis())
    }

    /// Construct as if created at `now_ms`
    pub fn new_at(capacity: u64, refill_rate_per_second: u64, now_ms: i64) -> Result<Self> {
        require_positive("capacity", capacity)?;
        require_positive("refill rate", refill_rate_per_second)?;
        Ok(Self {
            capacity,
            refill_rate_per_second,
            bucket: Mutex::new(TokenBucket {
                tokens: capacity,
                last_refill: now_ms,
            }),
        })
    }

    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    pub fn refill_rate_per_second(&self) -> u64 {
        self.refill_rate_per_second
    }

    /// Copy of the current bucket, without refilling
    pub fn snapshot(&self) -> TokenBucket {
        lock(&self.bucket).clone()
    }
}

impl RateLimiter for TokenBucketLimiter {
    fn allow_n(&self, timestamp_ms: i64, n: u64) -> bool {
        let mut bucket = lock(&self.bucket);
        bucket.add_tokens_to_bucket(self.capacity, self.refill_rate_per_second, timestamp_ms);

        if bucket.tokens < n {
            return false;
        }
        bucket.tokens -= n;
        true
    }

    fn remaining(&self, timestamp_ms: i64) -> u64 {
        let mut bucket = self.snapshot();
        bucket.add_tokens_to_bucket(self.capacity, self.refill_rate_per_second, timestamp_ms);
        bucket.tokens
    }
}
