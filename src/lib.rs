//! In-memory admission control.
//!
//! Three strategies share the [`limiters::RateLimiter`] contract: a fixed
//! window, an approximated sliding window, and a token bucket. Each decides
//! whether `n` units may proceed at a caller-supplied millisecond timestamp.
//!
//! ```
//! use tollgate::limiters::{RateLimiter, FixedWindowLimiter};
//!
//! let limiter = FixedWindowLimiter::new_at(1, 10, 0).unwrap();
//! assert!(limiter.allow_n(0, 10));
//! assert!(!limiter.allow_n(999, 1));
//! assert!(limiter.allow_n(1000, 1));
//! ```
pub mod cli;
pub mod error;
pub mod limiters;
pub mod logging;
pub mod replay;
pub mod settings;
