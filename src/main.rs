mod cli;
mod codemaker;
mod config;
mod error;
mod language;
mod lifecycle;
mod logging;
mod orchestrator;
mod ui;
mod walker;

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};

use cli::{Cli, Command, JobInvocation};
use codemaker::CodemakerClient;
use config::CodemakerConfig;
use lifecycle::CancelSignal;
use orchestrator::Orchestrator;
use ui::Reporter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("{e:#}");
    }

    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command) -> Result<()> {
    match command {
        Command::Generate { target } => run_jobs(target.into_invocation()).await,
        Command::Migrate { target } => run_jobs(target.into_invocation()).await,
        Command::Refactor { target } => run_jobs(target.into_invocation()).await,
        Command::Configure => configure(),
        Command::Version => {
            println!(
                "CodeMaker CLI version {} (Build {})",
                env!("CARGO_PKG_VERSION"),
                option_env!("CODEMAKER_BUILD").unwrap_or("dev")
            );
            Ok(())
        }
    }
}

async fn run_jobs(invocation: JobInvocation) -> Result<()> {
    // Credentials are resolved before anything touches the network.
    let api_key = config::resolve_api_key().context("no valid API key found")?;
    let settings = CodemakerConfig::load()?;
    let client = CodemakerClient::with_base_url(api_key, settings.endpoint.clone())?;
    let policy = settings.poll_policy();
    let reporter = Reporter::new();

    let (trigger, cancel) = CancelSignal::channel();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            return;
        }
        warn!("interrupt received, stopping (press Ctrl-C again to quit now)");
        let _ = trigger.send(true);

        // The default SIGINT handler stays replaced, so a second press exits here.
        if tokio::signal::ctrl_c().await.is_ok() {
            error!("second interrupt, exiting");
            std::process::exit(130);
        }
    });

    let JobInvocation {
        operation,
        options,
        files,
    } = invocation;
    let summary = Orchestrator::new(&client, &policy, &reporter)
        .with_cancel(cancel)
        .run(operation, &options, &files)
        .await
        .with_context(|| format!("{operation:?} aborted"))?;

    info!(
        processed = summary.processed,
        failed = summary.failed,
        "batch finished"
    );
    Ok(())
}

fn configure() -> Result<()> {
    info!("Configure CLI");

    print!("Enter API Key: ");
    io::stdout().flush()?;
    let mut api_key = String::new();
    io::stdin()
        .read_line(&mut api_key)
        .context("failed to read the API key from stdin")?;

    let path = config::credentials_path()?;
    config::write_credentials(&path, &api_key)?;
    info!(path = %path.display(), "configuration saved");
    Ok(())
}
