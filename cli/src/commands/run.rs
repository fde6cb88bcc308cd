use std::io::Write;
use std::process::{ExitStatus, Stdio};

use tailbuf_core::config::RingConfig;
use tailbuf_core::RingBuffer;
use tokio::process::Command;

use crate::commands::cli::RunArgs;
use crate::error::CliError;
use crate::pump::{join, spawn_pump};
use crate::report::{RunReport, Summary};

/// Exit status of a child plus the tails of its output streams.
#[derive(Debug)]
pub struct RunOutcome {
    pub exit_code: i32,
    pub stdout: RingBuffer,
    pub stderr: RingBuffer,
}

pub async fn run_command(args: &RunArgs, cfg: &RingConfig) -> Result<i32, CliError> {
    let mut outcome = capture_child(&args.command, !args.silent, cfg).await?;

    if args.json {
        let report = RunReport {
            exit_code: outcome.exit_code,
            stdout: Summary::from_ring("stdout", &outcome.stdout).with_tail(&outcome.stdout),
            stderr: Summary::from_ring("stderr", &outcome.stderr).with_tail(&outcome.stderr),
        };
        let mut stdout = std::io::stdout().lock();
        serde_json::to_writer_pretty(&mut stdout, &report)?;
        writeln!(stdout)?;
    } else if args.silent {
        outcome.stdout.copy_to(&mut std::io::stdout().lock())?;
        outcome.stderr.copy_to(&mut std::io::stderr().lock())?;
    }

    if args.stats {
        eprintln!("{}", Summary::from_ring("stdout", &outcome.stdout).render_line());
        eprintln!("{}", Summary::from_ring("stderr", &outcome.stderr).render_line());
    }

    outcome.stdout.close();
    outcome.stderr.close();
    Ok(outcome.exit_code)
}

/// Spawns `command` and pumps its stdout/stderr into one ring each.
///
/// With `forward`, the output is also copied to this process' stdout/stderr
/// as it arrives.
pub async fn capture_child(
    command: &[String],
    forward: bool,
    cfg: &RingConfig,
) -> Result<RunOutcome, CliError> {
    let (program, rest) = command
        .split_first()
        .ok_or_else(|| CliError::Spawn("no command given".to_string()))?;

    let out_ring = cfg.try_build()?;
    let err_ring = cfg.try_build()?;

    let mut child = Command::new(program)
        .args(rest)
        .stdin(Stdio::inherit())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| CliError::Spawn(format!("{program}: {e}")))?;
    tracing::debug!(program = %program, pid = ?child.id(), "child spawned");

    let child_out = child
        .stdout
        .take()
        .ok_or_else(|| CliError::Spawn("stdout not captured".to_string()))?;
    let child_err = child
        .stderr
        .take()
        .ok_or_else(|| CliError::Spawn("stderr not captured".to_string()))?;

    let out_task = spawn_pump(child_out, forward.then(tokio::io::stdout), out_ring, "stdout");
    let err_task = spawn_pump(child_err, forward.then(tokio::io::stderr), err_ring, "stderr");

    let status = child.wait().await?;
    let stdout = join(out_task).await?.ring;
    let stderr = join(err_task).await?.ring;

    let exit_code = exit_code_of(status);
    tracing::debug!(exit_code, "child exited");

    Ok(RunOutcome {
        exit_code,
        stdout,
        stderr,
    })
}

/// Exit code as a shell reports it: `128 + signal` when the child was killed.
fn exit_code_of(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}
