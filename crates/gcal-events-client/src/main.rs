//! gcal-events CLI entry point.

use std::process::ExitCode;

use clap::Parser;

use gcal_events_client::cli::{Cli, Command, ConfigAction};
use gcal_events_client::commands;
use gcal_events_client::commands::create::CreateOptions;
use gcal_events_client::config::ClientConfig;
use gcal_events_client::error::ClientResult;
use gcal_events_core::{TracingConfig, init_tracing};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let tracing_config = if cli.debug {
        TracingConfig::cli_debug()
    } else {
        TracingConfig::cli()
    };
    if let Err(e) = init_tracing(tracing_config) {
        eprintln!("warning: {}", e);
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> ClientResult<()> {
    let (config, config_path) = match cli.config {
        Some(path) => (ClientConfig::load_from(&path)?, path),
        None => (ClientConfig::load()?, ClientConfig::default_path()),
    };

    match cli.command {
        Some(Command::Auth { force }) => commands::auth::authorize(&config, force).await,
        Some(Command::List {
            max_results,
            calendar,
        }) => commands::list::run(&config, max_results, calendar).await,
        Some(Command::Create {
            start,
            count,
            interval_days,
            dry_run,
        }) => {
            let options = CreateOptions {
                start,
                count,
                interval_days,
                dry_run,
            };
            commands::create::run(&config, options).await
        }
        Some(Command::Config { action }) => match action {
            ConfigAction::Dump => commands::config::dump(&config, &config_path),
            ConfigAction::Path => commands::config::path(&config, &config_path),
        },
        None => commands::list_then_create(&config, &mut std::io::stdout()).await,
    }
}
