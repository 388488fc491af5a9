use anyhow::Result;
use clap::{Parser, Subcommand};
use pland::{config::DaemonConfig, llm::ChatClient, rest, storage::Storage, AppContext};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pland", about = "pland — project-planning backend daemon", version)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// HTTP server port
    #[arg(long, env = "PLAND_PORT")]
    port: Option<u16>,

    /// Data directory for the SQLite database and config.toml
    #[arg(long, env = "PLAND_DATA_DIR")]
    data_dir: Option<std::path::PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "PLAND_LOG")]
    log: Option<String>,

    /// Bind address for the HTTP server (default: 127.0.0.1; use 0.0.0.0 for LAN access)
    #[arg(long, env = "PLAND_BIND")]
    bind_address: Option<String>,

    /// API key for the completion endpoint
    #[arg(long, env = "PLAND_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Write logs to this file path (rotated daily). Optional.
    #[arg(long, env = "PLAND_LOG_FILE")]
    log_file: Option<std::path::PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP server (default when no subcommand given).
    Serve,
}

fn init_tracing(
    config: &DaemonConfig,
    log_file: Option<&std::path::Path>,
) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = EnvFilter::try_new(&config.log)
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let mut guard = None;
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);

    if let Some(path) = log_file {
        let dir = path.parent().unwrap_or_else(|| std::path::Path::new("."));
        let name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        let appender = tracing_appender::rolling::daily(dir, name);
        let (writer, g) = tracing_appender::non_blocking(appender);
        guard = Some(g);
        if config.log_format == "json" {
            subscriber.json().with_writer(writer).init();
        } else {
            subscriber.with_ansi(false).with_writer(writer).init();
        }
    } else if config.log_format == "json" {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = Arc::new(DaemonConfig::new(
        args.port,
        args.data_dir,
        args.log,
        args.bind_address,
        args.api_key,
    ));
    let _log_guard = init_tracing(&config, args.log_file.as_deref());

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
    }
}

async fn serve(config: Arc<DaemonConfig>) -> Result<()> {
    info!(
        version = env!("CARGO_PKG_VERSION"),
        data_dir = %config.data_dir.display(),
        "starting pland"
    );
    if config.api_key.is_empty() {
        warn!("no API key configured (PLAND_API_KEY) — plan generation will fail upstream");
    }

    let storage = Arc::new(Storage::new(&config.data_dir).await?);
    let llm = Arc::new(ChatClient::new(&config)?);

    let ctx = Arc::new(AppContext {
        config: config.clone(),
        storage,
        llm,
        started_at: std::time::Instant::now(),
    });

    rest::serve(ctx).await
}
