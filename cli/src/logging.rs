use std::path::{Path, PathBuf};

use tailbuf_core::config::LoggingConfig;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

static LOG_GUARD: std::sync::OnceLock<WorkerGuard> = std::sync::OnceLock::new();

/// Installs the global subscriber. Logs go to stderr so they never mix with
/// captured content on stdout.
pub fn init_tracing(logging: &LoggingConfig) -> Result<(), String> {
    if !logging.enabled {
        return Ok(());
    }
    if !logging.console && !logging.file {
        return Err("logging disabled for both console and file".to_string());
    }

    let filter = build_filter(logging, std::env::var("RUST_LOG").ok())?;
    let file_writer = if logging.file {
        Some(open_log_file(&log_dir(logging))?)
    } else {
        None
    };

    let console_layer = logging.console.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(atty::is(atty::Stream::Stderr))
    });
    let file_layer = file_writer.map(|w| {
        tracing_subscriber::fmt::layer()
            .with_writer(w)
            .with_ansi(false)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| e.to_string())
}

/// `RUST_LOG` wins over the configured level when set.
fn build_filter(logging: &LoggingConfig, rust_log: Option<String>) -> Result<EnvFilter, String> {
    let directives = rust_log
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| logging.level.clone());
    EnvFilter::try_new(directives).map_err(|e| e.to_string())
}

fn log_dir(logging: &LoggingConfig) -> PathBuf {
    logging
        .directory
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join("tailbuf"))
}

fn open_log_file(dir: &Path) -> Result<NonBlocking, String> {
    std::fs::create_dir_all(dir).map_err(|e| format!("create log dir failed: {e}"))?;
    let file_name = format!("tailbuf.{}.log", std::process::id());
    let appender = tracing_appender::rolling::never(dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(appender);
    let _ = LOG_GUARD.set(guard);
    Ok(non_blocking)
}
