use tailbuf_core::RingError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("config error: {0}")]
    Config(String),
    #[error("ring error: {0}")]
    Ring(#[from] RingError),
    #[error("cannot open {path}: {source}")]
    Input {
        path: String,
        source: std::io::Error,
    },
    #[error("spawn failed: {0}")]
    Spawn(String),
    #[error("stream io error: {stream} {source}")]
    StreamIo {
        stream: &'static str,
        source: std::io::Error,
    },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("pump task failed: {0}")]
    Join(String),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    // 0: success
    // 11: config error
    // 20: input / spawn / IO error
    // 30: ring allocation failure
    // 50: internal/uncategorized
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config(_) => 11,
            CliError::Input { .. } => 20,
            CliError::Spawn(_) => 20,
            CliError::StreamIo { .. } => 20,
            CliError::Io(_) => 20,
            CliError::Ring(_) => 30,
            CliError::Join(_) => 50,
            CliError::Json(_) => 50,
        }
    }
}
