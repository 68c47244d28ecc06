use std::{process::ExitCode, time::Duration};

use clap::Parser;
use engine::{Engine, Store};

use crate::{
    cli::Cli,
    error::{AppError, Result},
    settings::Settings,
};

mod cli;
mod commands;
mod error;
mod format;
mod settings;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let settings = match Settings::load(&cli.global) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("nolkan: {err}");
            return ExitCode::FAILURE;
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(settings.log_filter())
        .with_writer(std::io::stderr)
        .init();

    match run(&settings, cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(settings: &Settings, cli: Cli) -> Result<()> {
    tracing::debug!("Opening {}", settings.database);
    let engine = Engine::connect(&settings.database).await?;
    let store = Store::new(engine);

    let timeout = Duration::from_secs(settings.load_timeout_secs);
    match tokio::time::timeout(timeout, store.load_data()).await {
        Ok(loaded) => loaded?,
        Err(_) => {
            store.abandon_loading().await;
            return Err(AppError::LoadTimeout(settings.load_timeout_secs));
        }
    }

    commands::run(&store, cli.command).await
}
