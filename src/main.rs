//! review-monitor - Google review monitoring service

#![allow(missing_docs)]

use clap::Parser;
use review_monitor::utils::logging::{LogFormat, init_tracing};
use review_monitor::{Config, Monitor};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "review-monitor", version, about)]
struct Args {
    /// YAML configuration file; defaults apply when it does not exist
    #[arg(
        short,
        long,
        env = "REVIEW_MONITOR_CONFIG",
        default_value = "config/monitor.yaml"
    )]
    config: PathBuf,

    /// Log line format
    #[arg(long, env = "REVIEW_MONITOR_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,
}

async fn run(args: &Args) -> review_monitor::Result<()> {
    let config = Config::load(&args.config).await?;
    Monitor::new(config)?.run().await
}

#[tokio::main]
async fn main() -> ExitCode {
    // a missing .env file is fine
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    init_tracing(args.log_format, "info,actix_web=info");

    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Print error using Display (not Debug) to preserve newlines
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
