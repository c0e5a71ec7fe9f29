//! CLI for this application
//!
use std::path::PathBuf;

use crate::error::Result;
use crate::settings::{self, LimiterSettings, LogFormat, LogLevel, LogSettings, Strategy};

#[derive(Clone, Debug, clap::Parser)]
#[clap(
    name = settings::APP_NAME,
    version = settings::APP_VERSION,
    about = "Replay `<n>` or `<timestamp_ms> <n>` lines from stdin through a rate limiter"
)]
pub struct Cli {
    // Admission algorithm
    #[clap(
        long,
        default_value = "token-bucket",
        env("TOLLGATE_STRATEGY"),
        help = "strategy: 'fixed-window', 'sliding-window', or 'token-bucket'"
    )]
    pub strategy: Strategy,

    // Window limiters: size of one window
    #[clap(
        long,
        default_value = settings::DEFAULT_WINDOW_SIZE_SECONDS,
        env("TOLLGATE_WINDOW_SIZE_SECONDS"),
        help = "Window size in seconds (window strategies)"
    )]
    pub window_size_seconds: u64,

    // Units per window, or bucket size
    #[clap(
        long,
        default_value = settings::DEFAULT_CAPACITY,
        env("TOLLGATE_CAPACITY"),
        help = "Units allowed per window, or token bucket size"
    )]
    pub capacity: u64,

    // Token bucket: tokens added per second
    #[clap(
        long,
        default_value = settings::DEFAULT_REFILL_RATE,
        env("TOLLGATE_REFILL_RATE"),
        help = "Tokens added per second (token bucket)"
    )]
    pub refill_rate: u64,

    // JSON limiter settings; replaces the limiter flags above
    #[clap(
        long,
        env("TOLLGATE_CONFIG"),
        help = "Path to a JSON limiter settings file"
    )]
    pub config: Option<PathBuf>,

    #[clap(
        long,
        default_value = "info",
        env("TOLLGATE_LOG_LEVEL"),
        allow_hyphen_values = true,
        help = "Log level name, or -1 (debug) / 0 (info) / 1 (warn) / 2 (error)"
    )]
    pub log_level: LogLevel,

    #[clap(
        long,
        default_value = "text",
        env("TOLLGATE_LOG_FORMAT"),
        help = "Log format: 'text' or 'json'"
    )]
    pub log_format: LogFormat,
}

impl Cli {
    pub fn limiter_settings(&self) -> Result<LimiterSettings> {
        let limiter = match &self.config {
            Some(path) => LimiterSettings::from_json_file(path)?,
            None => LimiterSettings {
                strategy: self.strategy,
                window_size_seconds: self.window_size_seconds,
                capacity: self.capacity,
                refill_rate_per_second: self.refill_rate,
            },
        };
        limiter.validate()?;
        Ok(limiter)
    }

    pub fn into_settings(self) -> Result<settings::Settings> {
        Ok(settings::Settings {
            limiter: self.limiter_settings()?,
            log: LogSettings {
                level: self.log_level,
                format: self.log_format,
            },
        })
    }
}
