//! pqm CLI entry point.

use clap::Parser;
use pqm_rpc::{ConfirmationError, ContractClient};
use tokio_util::sync::CancellationToken;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::{Outcome, Session};
use config::Settings;

#[derive(Parser, Debug)]
#[command(name = "pqm")]
#[command(about = "Operate the TokenPQM contract through a Qtum node", long_about = None)]
struct Cli {
    #[command(flatten)]
    settings: Settings,

    #[command(subcommand)]
    command: commands::Commands,
}

fn debug_requested() -> bool {
    std::env::var("DEBUG").map(|v| !v.is_empty()).unwrap_or(false)
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let debug = debug_requested();
    init_tracing(debug);
    if debug {
        debug!(argv = ?std::env::args().collect::<Vec<_>>(), "arguments");
    }

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let code = run(std::env::args(), Settings::connect, cancel).await;
    std::process::exit(code);
}

/// Parse, connect and dispatch one invocation; returns the exit status.
///
/// `connect` is only called once the command line is known to be valid.
async fn run<I, F, C>(argv: I, connect: F, cancel: CancellationToken) -> i32
where
    I: IntoIterator<Item = String>,
    F: FnOnce(&Settings) -> anyhow::Result<C>,
    C: ContractClient,
{
    let cli = match Cli::try_parse_from(argv) {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return e.exit_code();
        }
    };
    debug!(command = ?cli.command, "parsed command");

    if let Some(name) = cli.command.unrecognized() {
        eprintln!("unrecognized command: {}", name);
        return 2;
    }

    let contract = match connect(&cli.settings) {
        Ok(contract) => contract,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return 1;
        }
    };

    let session = Session {
        contract: &contract,
        confirmations: cli.settings.confirmations,
        tracker: cli.settings.tracker(),
        wait: !cli.settings.no_wait,
        cancel: cancel.clone(),
    };

    let result = tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            eprintln!("Interrupted");
            return 130;
        }
        result = commands::run(cli.command, &session) => result,
    };

    match result {
        Ok(Outcome::Done) => 0,
        Ok(Outcome::Unrecognized(name)) => {
            eprintln!("unrecognized command: {}", name);
            2
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            match e.downcast_ref::<ConfirmationError>() {
                Some(ConfirmationError::Cancelled { .. }) => 130,
                _ => 1,
            }
        }
    }
}
