pub mod fixed_window;
pub mod rate_limit;
pub mod sliding_window;
pub mod token_bucket;
pub use fixed_window::FixedWindowLimiter;
pub use rate_limit::{window_id, RateLimiter};
pub use sliding_window::SlidingWindowLimiter;
pub use token_bucket::{TokenBucket, TokenBucketLimiter};
