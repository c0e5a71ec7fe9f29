//! Tollgate settings
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config_error;
use crate::error::Result;
use crate::limiters::{FixedWindowLimiter, RateLimiter, SlidingWindowLimiter, TokenBucketLimiter};

pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_WINDOW_SIZE_SECONDS: &str = "1";
pub const DEFAULT_CAPACITY: &str = "10";
pub const DEFAULT_REFILL_RATE: &str = "10";

/// Which admission algorithm to run
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    FixedWindow,
    SlidingWindow,
    TokenBucket,
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::FixedWindow => write!(f, "fixed-window"),
            Strategy::SlidingWindow => write!(f, "sliding-window"),
            Strategy::TokenBucket => write!(f, "token-bucket"),
        }
    }
}

impl std::str::FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "fixed-window" => Ok(Strategy::FixedWindow),
            "sliding-window" => Ok(Strategy::SlidingWindow),
            "token-bucket" => Ok(Strategy::TokenBucket),
            _ => Err(format!("Invalid strategy: {}", s)),
        }
    }
}

/// Configuration for a single limiter.
///
/// `window_size_seconds` is read by the window strategies and
/// `refill_rate_per_second` by the token bucket; the unused field is ignored.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct LimiterSettings {
    pub strategy: Strategy,
    #[serde(default = "default_window_size_seconds")]
    pub window_size_seconds: u64,
    pub capacity: u64,
    #[serde(default = "default_refill_rate")]
    pub refill_rate_per_second: u64,
}

fn default_window_size_seconds() -> u64 {
    1
}

fn default_refill_rate() -> u64 {
    10
}

impl Default for LimiterSettings {
    fn default() -> Self {
        Self {
            strategy: Strategy::TokenBucket,
            window_size_seconds: default_window_size_seconds(),
            capacity: 10,
            refill_rate_per_second: default_refill_rate(),
        }
    }
}

impl LimiterSettings {
    /// Read settings from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Check the fields the chosen strategy depends on
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(config_error!("capacity must be positive"));
        }
        match self.strategy {
            Strategy::FixedWindow | Strategy::SlidingWindow if self.window_size_seconds == 0 => {
                Err(config_error!("window size must be positive"))
            }
            Strategy::TokenBucket if self.refill_rate_per_second == 0 => {
                Err(config_error!("refill rate must be positive"))
            }
            _ => Ok(()),
        }
    }

    /// Build the configured limiter
    pub fn build(&self) -> Result<Box<dyn RateLimiter>> {
        self.validate()?;
        let limiter: Box<dyn RateLimiter> = match self.strategy {
            Strategy::FixedWindow => Box::new(FixedWindowLimiter::new(
                self.window_size_seconds,
                self.capacity,
            )?),
            Strategy::SlidingWindow => Box::new(SlidingWindowLimiter::new(
                self.window_size_seconds,
                self.capacity,
            )?),
            Strategy::TokenBucket => Box::new(TokenBucketLimiter::new(
                self.capacity,
                self.refill_rate_per_second,
            )?),
        };
        Ok(limiter)
    }
}

/// Log verbosity
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

/// Accepts level names as well as numeric levels
/// (-1 debug, 0 info, 1 warn, 2 and up error).
impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(level) = s.parse::<i8>() {
            return match level {
                i8::MIN..=-2 => Err(format!("Invalid log level: {}", s)),
                -1 => Ok(LogLevel::Debug),
                0 => Ok(LogLevel::Info),
                1 => Ok(LogLevel::Warn),
                _ => Ok(LogLevel::Error),
            };
        }
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(format!("Invalid log level: {}", s)),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Text => write!(f, "text"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Invalid log format: {}", s)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogSettings {
    pub level: LogLevel,
    pub format: LogFormat,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Text,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Settings {
    pub limiter: LimiterSettings,
    pub log: LogSettings,
}
