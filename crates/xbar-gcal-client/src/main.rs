//! xbar-google-calendar entry point.

use std::io;
use std::process::ExitCode;

use chrono::{Local, Utc};
use clap::Parser;
use tracing::error;

use xbar_gcal_client::cli::{Cli, Command, ConfigAction};
use xbar_gcal_client::commands;
use xbar_gcal_client::config::ClientConfig;
use xbar_gcal_client::error::ClientResult;
use xbar_gcal_core::{HostApplet, TracingConfig, init_tracing};
use xbar_gcal_providers::google::GoogleProvider;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let host = HostApplet::detect();
    if let Err(e) = init_tracing(TracingConfig::for_host(host, cli.debug)) {
        eprintln!("warning: {}", e);
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> ClientResult<()> {
    let config_path = cli.config.clone().unwrap_or_else(ClientConfig::default_path);
    let mut config = ClientConfig::load(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);

    match cli.command {
        Some(Command::Auth { force }) => commands::auth::google(&config, force).await,
        Some(Command::Config { action }) => match action {
            ConfigAction::Dump => commands::config::dump(&config, &config_path, io::stdout()),
            ConfigAction::Validate => commands::config::validate(&config, io::stdout()),
            ConfigAction::Path => commands::config::path(&config_path, io::stdout()),
        },
        None => {
            config.validate()?;
            let provider = GoogleProvider::new(config.google.to_provider_config())?;
            let options = config.fetch_options(Utc::now());
            commands::run::run_at(&provider, options, &Local::now(), io::stdout()).await
        }
    }
}
