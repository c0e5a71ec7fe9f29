use std::fmt;

/// Main error type for tollgate.
///
/// A rejected request is *not* an error: `RateLimiter::allow_n` answers
/// `false`. These variants cover bad configuration and host-side failures.
#[derive(Debug)]
pub enum TollgateError {
    /// Invalid limiter or logging settings
    Config(String),

    /// Malformed replay input, with the 1-based line number
    Parse { line: usize, message: String },

    /// System I/O errors
    Io(std::io::Error),

    /// JSON serialization/deserialization errors
    Serialization(serde_json::Error),
}

impl fmt::Display for TollgateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TollgateError::Config(msg) => write!(f, "Configuration error: {}", msg),
            TollgateError::Parse { line, message } => {
                write!(f, "Parse error on line {}: {}", line, message)
            }
            TollgateError::Io(err) => write!(f, "I/O error: {}", err),
            TollgateError::Serialization(err) => write!(f, "Serialization error: {}", err),
        }
    }
}

impl std::error::Error for TollgateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TollgateError::Io(err) => Some(err),
            TollgateError::Serialization(err) => Some(err),
            _ => None,
        }
    }
}

// Convenient type alias for Results using our error type
pub type Result<T> = std::result::Result<T, TollgateError>;

impl TollgateError {
    /// Get the error type identifier
    pub fn error_type(&self) -> &'static str {
        match self {
            TollgateError::Config(_) => "configuration_error",
            TollgateError::Parse { .. } => "parse_error",
            TollgateError::Io(_) => "io_error",
            TollgateError::Serialization(_) => "serialization_error",
        }
    }
}

impl From<std::io::Error> for TollgateError {
    fn from(err: std::io::Error) -> Self {
        TollgateError::Io(err)
    }
}

impl From<serde_json::Error> for TollgateError {
    fn from(err: serde_json::Error) -> Self {
        TollgateError::Serialization(err)
    }
}

#[macro_export]
macro_rules! config_error {
    ($msg:expr) => {
        $crate::error::TollgateError::Config($msg.to_string())
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::TollgateError::Config(format!($fmt, $($arg)*))
    };
}
