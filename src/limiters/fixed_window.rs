//! Fixed window rate limiting algorithm
use std::sync::Mutex;

use chrono::Utc;

use super::rate_limit::{lock, require_positive, window_id, window_size_millis, RateLimiter};
use crate::error::Result;

#[derive(Clone, Debug)]
struct FixedWindowState {
    window_id: i64,
    allowance: u64,
}

/// Grants `capacity` units per window; the allowance is refilled in full
/// the first time a call lands in a new window.
#[derive(Debug)]
pub struct FixedWindowLimiter {
    window_size_ms: i64,
    capacity: u64,
    state: Mutex<FixedWindowState>,
}

impl FixedWindowLimiter {
    /// `window_size_seconds` and `capacity` must both be positive
    pub fn new(window_size_seconds: u64, capacity: u64) -> Result<Self> {
        Self::new_at(window_size_seconds, capacity, Utc::now().timestamp_millis())
    }

    /// Construct as if created at `now_ms`
    pub fn new_at(window_size_seconds: u64, capacity: u64, now_ms: i64) -> Result<Self> {
        let window_size_ms = window_size_millis(window_size_seconds)?;
        require_positive("capacity", capacity)?;
        Ok(Self {
            window_size_ms,
            capacity,
            state: Mutex::new(FixedWindowState {
                window_id: window_id(now_ms, window_size_ms),
                allowance: capacity,
            }),
        })
    }

    pub fn window_size_ms(&self) -> i64 {
        self.window_size_ms
    }

    pub fn capacity(&self) -> u64 {
        self.capacity
    }
}

impl RateLimiter for FixedWindowLimiter {
    fn allow_n(&self, timestamp_ms: i64, n: u64) -> bool {
        let id = window_id(timestamp_ms, self.window_size_ms);
        let mut state = lock(&self.state);

        // New window: full reset, skipped windows leave nothing behind
        if state.window_id != id {
            state.window_id = id;
            state.allowance = self.capacity;
        }

        if state.allowance >= n {
            state.allowance -= n;
            true
        } else {
            false
        }
    }

    fn remaining(&self, timestamp_ms: i64) -> u64 {
        let id = window_id(timestamp_ms, self.window_size_ms);
        let state = lock(&self.state);
        if state.window_id != id {
            self.capacity
        } else {
            state.allowance
        }
    }
}
