use std::process::ExitCode;

use alinea::config::{CliArgs, Config, LoggingConfig};
use alinea::{cli, Alinea};
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> ExitCode {
    let cli = CliArgs::parse();
    let config = Config::load(&cli);
    init_tracing(&config.logging);

    let mut app = match Alinea::open(&config) {
        Ok(app) => app,
        Err(e) => {
            tracing::error!(error = %e, "Failed to open data store");
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match cli::run(&mut app, cli.command, &config.export, &mut std::io::stdout()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
