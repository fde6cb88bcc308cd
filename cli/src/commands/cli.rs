use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};
use tailbuf_core::config::RingConfig;

#[derive(Parser, Debug)]
#[command(
    name = "tailbuf",
    version,
    about = "Keep the last bytes of a stream in bounded memory"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file; defaults to ./tailbuf.toml, then ~/.tailbuf/config.toml.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Maximum bytes retained per stream.
    #[arg(long, global = true)]
    pub max_bytes: Option<usize>,

    /// Bytes allocated up front per stream.
    #[arg(long, global = true)]
    pub initial_bytes: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Read files (or stdin) and print what is retained.
    Capture(CaptureArgs),
    /// Run a command and keep the tail of its stdout and stderr.
    Run(RunArgs),
}

#[derive(ClapArgs, Debug, Clone)]
pub struct CaptureArgs {
    /// Inputs read in order; `-` or no input means stdin.
    pub files: Vec<PathBuf>,

    /// Print a summary line to stderr.
    #[arg(long)]
    pub stats: bool,

    /// Print a JSON summary instead of the content.
    #[arg(long)]
    pub json: bool,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct RunArgs {
    /// Do not forward the child's output; print the retained tails at exit.
    #[arg(long)]
    pub silent: bool,

    #[arg(long)]
    pub stats: bool,

    #[arg(long)]
    pub json: bool,

    #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
    pub command: Vec<String>,
}

impl Args {
    /// Command-line sizes take precedence over file and env config.
    pub fn apply_to(&self, ring: &mut RingConfig) {
        if let Some(v) = self.max_bytes {
            ring.max_size = v;
        }
        if let Some(v) = self.initial_bytes {
            ring.initial_size = v;
        }
    }
}
