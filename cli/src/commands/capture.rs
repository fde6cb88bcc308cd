use std::io::Write;
use std::path::{Path, PathBuf};

use tailbuf_core::config::RingConfig;
use tailbuf_core::RingBuffer;

use crate::commands::cli::CaptureArgs;
use crate::error::CliError;
use crate::pump::pump;
use crate::report::Summary;

pub async fn run_capture(args: &CaptureArgs, cfg: &RingConfig) -> Result<i32, CliError> {
    let mut ring = capture_inputs(&args.files, cfg).await?;

    let mut stdout = std::io::stdout().lock();
    if args.json {
        let summary = Summary::from_ring("capture", &ring).with_tail(&ring);
        serde_json::to_writer_pretty(&mut stdout, &summary)?;
        writeln!(stdout)?;
    } else {
        ring.copy_to(&mut stdout)?;
        stdout.flush()?;
        if args.stats {
            eprintln!("{}", Summary::from_ring("capture", &ring).render_line());
        }
    }

    ring.close();
    Ok(0)
}

/// Drains every input, in order, into a single ring.
pub async fn capture_inputs(files: &[PathBuf], cfg: &RingConfig) -> Result<RingBuffer, CliError> {
    let mut ring = cfg.try_build()?;
    let stdin_only = [PathBuf::from("-")];
    let inputs = if files.is_empty() { &stdin_only[..] } else { files };

    for path in inputs {
        ring = if is_stdin(path) {
            pump(tokio::io::stdin(), None::<tokio::io::Sink>, ring, "stdin")
                .await?
                .ring
        } else {
            let file = tokio::fs::File::open(path)
                .await
                .map_err(|source| CliError::Input {
                    path: path.display().to_string(),
                    source,
                })?;
            tracing::debug!(path = %path.display(), "capturing file");
            pump(file, None::<tokio::io::Sink>, ring, "file").await?.ring
        };
    }

    Ok(ring)
}

fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == "-"
}
