//! pulse, an interactive endpoint health checker.
//!
//! # Usage
//!
//! ```text
//! pulse init                      # write endpoints.json with a default endpoint
//! pulse                           # pick one action from the menu
//! pulse --repeat --mode collect-all --timeout 5s
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use pulse_core::store::DEFAULT_CONFIG_PATH;
use pulse_probe::SweepMode;

mod commands;
mod menu;
mod prompt;
mod shell;

#[derive(Parser)]
#[command(
    name = "pulse",
    about = "Pulse: check that your HTTP endpoints are alive",
    version,
    propagate_version = true,
)]
struct Cli {
    /// Configuration file holding the endpoint list
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// What "Test All" does after an endpoint fails
    #[arg(short, long, value_enum, default_value_t = Mode::FailFast)]
    mode: Mode,

    /// Per-request timeout, e.g. "10s", "500ms", "1m"
    #[arg(short, long, default_value = "10s", value_parser = parse_timeout)]
    timeout: Duration,

    /// Keep showing the menu until end of input
    #[arg(short, long)]
    repeat: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Write a configuration file containing the default endpoint
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    /// Stop at the first endpoint that is not working
    FailFast,
    /// Test every endpoint and summarize
    CollectAll,
}

impl From<Mode> for SweepMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::FailFast => SweepMode::FailFast,
            Mode::CollectAll => SweepMode::CollectAll,
        }
    }
}

fn parse_timeout(s: &str) -> Result<Duration, String> {
    match pulse_probe::parse_duration(s) {
        Some(d) if !d.is_zero() => Ok(d),
        Some(_) => Err("timeout must be greater than zero".to_string()),
        None => Err(format!("invalid duration \"{s}\"")),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Command::Init { force }) => commands::init::init(&cli.config, force),
        None => {
            commands::session::run(&cli.config, cli.mode.into(), cli.timeout, cli.repeat).await
        }
    };

    exit_code(result)
}

/// Map the command outcome to the process exit code, printing one line on failure.
fn exit_code(result: anyhow::Result<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
