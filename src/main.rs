// src/main.rs

use anyhow::Context;
use clap::Parser;
use log::LevelFilter;
use log4rs::{
    append::console::{ConsoleAppender, Target},
    append::file::FileAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    Config,
};
use std::path::Path;
use std::sync::Arc;
use stringsvc::{
    server, AppError, CommandLineInput, LogfmtLogger, ServerConfig, StringServer,
};
use tokio_util::sync::CancellationToken;

const LOG_PATTERN: &str = "{d(%Y-%m-%dT%H:%M:%S%.3f)} level={l} {m}{n}";

/// Sets up logging: stderr always, plus an optional log file.
fn setup_logging(verbose: bool, log_file: Option<&Path>) -> Result<(), AppError> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let stderr_appender = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
        .build();

    let mut builder =
        Config::builder().appender(Appender::builder().build("stderr", Box::new(stderr_appender)));
    let mut root = Root::builder().appender("stderr");

    if let Some(path) = log_file {
        let file_appender = FileAppender::builder()
            .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
            .build(path)
            .map_err(|e| AppError::Logging(format!("{}: {}", path.display(), e)))?;
        builder = builder.appender(Appender::builder().build("file", Box::new(file_appender)));
        root = root.appender("file");
    }

    let config = builder
        .build(root.build(log_level))
        .map_err(|e| AppError::Logging(e.to_string()))?;

    log4rs::init_config(config).map_err(|e| AppError::Logging(e.to_string()))?;
    if let Some(path) = log_file {
        log::debug!("Logging initialized. Log file: {}", path.display());
    }
    Ok(())
}

/// Cancels `shutdown` on Ctrl-C.
fn spawn_signal_handler(shutdown: CancellationToken) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => log::info!("msg=\"shutdown requested\""),
            Err(e) => log::error!("msg=\"cannot listen for shutdown signal\" err=\"{}\"", e),
        }
        shutdown.cancel();
    });
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CommandLineInput::parse();
    let config = ServerConfig::resolve(cli).context("invalid command-line arguments")?;

    setup_logging(config.verbose, config.log_file.as_deref())?;

    let shutdown = CancellationToken::new();
    spawn_signal_handler(shutdown.clone());

    let app = StringServer::new(&config, Arc::new(LogfmtLogger), shutdown.clone());
    let listener = server::bind(config.listen)
        .await
        .context("cannot start HTTP listener")?;

    server::serve(listener, app.router, shutdown).await?;
    Ok(())
}
