use clap::Parser;
use tailbuf_cli::commands::cli::{Args, Commands};
use tailbuf_cli::commands::{capture, run};
use tailbuf_cli::error::CliError;
use tailbuf_cli::logging;

#[tokio::main]
async fn main() {
    let exit = match real_main().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{e}");
            e.exit_code()
        }
    };

    std::process::exit(exit);
}

async fn real_main() -> Result<i32, CliError> {
    let args = Args::parse();
    let mut cfg = tailbuf_core::config::load_default(args.config.as_deref())
        .map_err(|e| CliError::Config(e.to_string()))?;
    args.apply_to(&mut cfg.ring);
    cfg.ring
        .validate()
        .map_err(|e| CliError::Config(e.to_string()))?;
    logging::init_tracing(&cfg.logging).map_err(CliError::Config)?;

    match &args.command {
        Commands::Capture(capture_args) => capture::run_capture(capture_args, &cfg.ring).await,
        Commands::Run(run_args) => run::run_command(run_args, &cfg.ring).await,
    }
}
