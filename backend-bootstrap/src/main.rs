use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use backend_bootstrap::logging::{self, LogOptions};
use backend_infrastructure::CONFIG_PATH_ENV;

#[derive(Parser, Debug)]
#[command(name = "tracelet-backend")]
#[command(about = "Tracelet entity tracking API", long_about = None)]
struct Args {
    /// Path to config file
    #[arg(short, long)]
    config: Option<String>,

    /// Also write logs to daily rolling files in this directory
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let _guard = logging::init(&LogOptions {
        log_dir: args.log_dir,
        json: args.json_logs,
    })?;

    if let Some(config) = args.config {
        std::env::set_var(CONFIG_PATH_ENV, config);
    }

    backend_bootstrap::run_standalone().await
}
