mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command, GlobalOpts};
use crate::error::CliError;
use crate::output::Printer;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(&cli.global);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

/// Logs go to stderr so JSON on stdout stays parseable. `RUST_LOG` wins
/// over `-v`/`-q`.
fn init_tracing(global: &GlobalOpts) {
    let level = match (global.quiet, global.verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let out = Printer::new(&cli.global);

    match cli.command {
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global, &out),
        Command::Completions(args) => {
            clap_complete::generate(args.shell, &mut Cli::command(), "imou", &mut std::io::stdout());
            Ok(())
        }
        cmd => {
            let client = config::build_client(&cli.global)?;
            tracing::debug!(command = ?cmd, data_center = %client.credentials().data_center, "running command");

            let result = commands::dispatch(cmd, &client, &out).await;
            if let imou_api::AccountStatus::Error { code, message } = client.current_status() {
                tracing::info!(code = code.as_deref().unwrap_or("-"), %message, "account reported an error");
            }
            result
        }
    }
}
