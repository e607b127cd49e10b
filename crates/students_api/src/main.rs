//! Students API server entry point.
//!
//! Loads config, starts logging, opens the store and serves until a
//! termination signal arrives.

use clap::Parser;
use log::{error, info};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use students_api::{create_router, AppConfig, AppState, HttpServer, LogConfig};
use students_core::{core_version, init_logging, init_stderr_logging, StudentStore};

#[derive(Debug, Parser)]
#[command(name = "students-api", version, about = "Student records REST service")]
struct Cli {
    /// Path to a TOML config file.
    #[arg(long, env = "CONFIG_PATH")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match AppConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("students-api: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = start_logging(&config.log) {
        eprintln!("students-api: {err}");
        return ExitCode::FAILURE;
    }

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=app_exit module=main status=error error={err}");
            ExitCode::FAILURE
        }
    }
}

fn start_logging(log: &LogConfig) -> Result<(), String> {
    match &log.dir {
        Some(dir) => {
            let dir = dir
                .to_str()
                .ok_or_else(|| format!("log dir `{}` is not valid UTF-8", dir.display()))?;
            init_logging(&log.level, dir)
        }
        None => init_stderr_logging(&log.level),
    }
}

async fn run(config: AppConfig) -> Result<(), Box<dyn Error>> {
    let store = StudentStore::open(&config.storage_path)?;
    info!(
        "event=storage_init module=main status=ok env={} version={} path={}",
        config.env,
        core_version(),
        config.storage_path.display()
    );

    let router = create_router(AppState::new(Arc::new(store)));
    HttpServer::new(config.http_server, router).run().await?;

    info!("event=app_exit module=main status=ok");
    Ok(())
}
