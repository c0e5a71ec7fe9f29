//! Shared contract for every admission strategy
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::config_error;
use crate::error::Result;

/// Admission gate deciding whether a batch of `n` units may proceed.
///
/// The caller always supplies the decision timestamp (unix milliseconds, or
/// any other consistent millisecond epoch). Implementations never consult
/// the wall clock while deciding.
pub trait RateLimiter: Send + Sync {
    /// Admit `n` units at `timestamp_ms`.
    ///
    /// `true` means the batch was admitted and has already been deducted
    /// from the budget. `false` means rejected and nothing changed.
    fn allow_n(&self, timestamp_ms: i64, n: u64) -> bool;

    /// Admit a single unit
    fn allow(&self, timestamp_ms: i64) -> bool {
        self.allow_n(timestamp_ms, 1)
    }

    /// Largest `n` that `allow_n` would admit at `timestamp_ms`.
    /// Never mutates state.
    fn remaining(&self, timestamp_ms: i64) -> u64;
}

/// Bucket a timestamp into its window index: `floor(timestamp / window_size)`
pub fn window_id(timestamp_ms: i64, window_size_ms: i64) -> i64 {
    timestamp_ms.div_euclid(window_size_ms)
}

/// Validate a window size given in seconds and convert it to milliseconds
pub(crate) fn window_size_millis(window_size_seconds: u64) -> Result<i64> {
    if window_size_seconds == 0 {
        return Err(config_error!("window size must be positive"));
    }
    window_size_seconds
        .checked_mul(1000)
        .and_then(|ms| i64::try_from(ms).ok())
        .ok_or_else(|| config_error!("window size {}s is too large", window_size_seconds))
}

pub(crate) fn require_positive(name: &str, value: u64) -> Result<()> {
    if value == 0 {
        return Err(config_error!("{} must be positive", name));
    }
    Ok(())
}

// Critical sections never panic, so a poisoned state is still consistent.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
