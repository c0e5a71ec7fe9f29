//! Sliding window rate limiting algorithm
//!
//! Only two counters are kept: the current window and the one before it.
//! The load at a timestamp is estimated as the current count plus the share
//! of the previous window that the sliding window still covers, on the
//! assumption that the previous window's requests were evenly spread.
//!
//! The covered share is `(window_size - offset) / window_size`, `offset`
//! being how far the timestamp is into its own window. For one-second
//! windows this is the classic `(1000 - ts % 1000) / 1000` weighting.
//!
//! When the current window advances by more than one step, the last observed
//! window still becomes the previous one. After long idle gaps this
//! overstates recent traffic.
use std::sync::Mutex;

use chrono::Utc;

use super::rate_limit::{lock, require_positive, window_id, window_size_millis, RateLimiter};
use crate::error::Result;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Window {
    id: i64,
    count: u64,
}

#[derive(Clone, Debug)]
struct SlidingWindowState {
    previous: Window,
    current: Window,
}

impl SlidingWindowState {
    /// Move forward only; a timestamp behind the current window folds into it
    fn shift_to(&mut self, id: i64) {
        if id > self.current.id {
            self.previous = self.current;
            self.current = Window { id, count: 0 };
        }
    }
}

#[derive(Debug)]
pub struct SlidingWindowLimiter {
    window_size_ms: i64,
    capacity: u64,
    state: Mutex<SlidingWindowState>,
}

impl SlidingWindowLimiter {
    /// `window_size_seconds` and `capacity` must both be positive
    pub fn new(window_size_seconds: u64, capacity: u64) -> Result<Self> {
        Self::new_at(window_size_seconds, capacity, Utc::now().timestamp_millis())
    }

    /// Construct as if created at `now_ms`
    pub fn new_at(window_size_seconds: u64, capacity: u64, now_ms: i64) -> Result<Self> {
        let window_size_ms = window_size_millis(window_size_seconds)?;
        require_positive("capacity", capacity)?;
        let id = window_id(now_ms, window_size_ms);
        Ok(Self {
            window_size_ms,
            capacity,
            state: Mutex::new(SlidingWindowState {
                previous: Window {
                    id: id - 1,
                    count: 0,
                },
                current: Window { id, count: 0 },
            }),
        })
    }

    pub fn window_size_ms(&self) -> i64 {
        self.window_size_ms
    }

    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Previous window's contribution at `timestamp_ms`
    fn carried_over(&self, previous_count: u64, timestamp_ms: i64) -> u64 {
        let offset = timestamp_ms.rem_euclid(self.window_size_ms);
        let overlap = (self.window_size_ms - offset) as u128;
        // overlap <= window_size, so the quotient never exceeds previous_count
        (u128::from(previous_count) * overlap / self.window_size_ms as u128) as u64
    }

    fn estimated_load(&self, state: &SlidingWindowState, timestamp_ms: i64) -> u64 {
        state
            .current
            .count
            .saturating_add(self.carried_over(state.previous.count, timestamp_ms))
    }
}

impl RateLimiter for SlidingWindowLimiter {
    fn allow_n(&self, timestamp_ms: i64, n: u64) -> bool {
        let id = window_id(timestamp_ms, self.window_size_ms);
        let mut state = lock(&self.state);
        state.shift_to(id);

        let load = self.estimated_load(&state, timestamp_ms);
        match load.checked_add(n) {
            Some(total) if total <= self.capacity => {
                state.current.count += n;
                true
            }
            _ => false,
        }
    }

    fn remaining(&self, timestamp_ms: i64) -> u64 {
        let id = window_id(timestamp_ms, self.window_size_ms);
        let mut state = lock(&self.state).clone();
        state.shift_to(id);
        self.capacity
            .saturating_sub(self.estimated_load(&state, timestamp_ms))
    }
}
