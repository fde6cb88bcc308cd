use std::collections::TryReserveError;

use thiserror::Error;

/// Failure raised by the ring accumulator.
///
/// Growth is the only fallible step, so allocation is the only kind. The
/// accumulator is left exactly as it was before the failing call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RingError {
    #[error("allocation of {requested} bytes failed: {reason}")]
    Alloc { requested: usize, reason: String },
}

impl RingError {
    pub(crate) fn alloc(requested: usize, source: TryReserveError) -> Self {
        Self::Alloc {
            requested,
            reason: source.to_string(),
        }
    }
}

impl From<RingError> for std::io::Error {
    fn from(e: RingError) -> Self {
        std::io::Error::new(std::io::ErrorKind::OutOfMemory, e)
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid ring config: {0}")]
    Invalid(String),
    #[error("cannot read config {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("cannot parse config {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
    #[error("invalid value for {var}: {value}")]
    Env { var: &'static str, value: String },
}
