use anyhow::Context;
use clap::Parser;
use spawngrid::{BucketCache, Config};
use spawngrid_server::{Handler, StatusPolicy, run_server};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Snapshot file holding generated buckets; in-memory when omitted
    #[arg(short, long)]
    data_file: Option<PathBuf>,

    /// Cache configuration, JSON or TOML by file extension
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Answer every error with 500, including malformed coordinates
    #[arg(long)]
    legacy_status: bool,
}

fn load_config(path: &Path) -> anyhow::Result<Config> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;

    let config = match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => Config::from_toml(&text)?,
        _ => Config::from_json(&text)?,
    };
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "spawngrid_server=info,spawngrid=info,info".into()),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };

    let mut builder = BucketCache::builder().config(config);
    if let Some(path) = &args.data_file {
        info!("Opening bucket snapshot at {}", path.display());
        builder = builder.snapshot_path(path);
    } else {
        info!("Opening in-memory bucket store");
    }
    let cache = Arc::new(builder.build()?);

    let policy = if args.legacy_status {
        StatusPolicy::Legacy
    } else {
        StatusPolicy::Strict
    };

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for ctrl_c signal: {}", e);
            std::future::pending::<()>().await;
        }
    };

    run_server(listener, Handler::new(cache.clone(), policy), shutdown).await?;

    cache.sync().await?;
    info!("Bucket store flushed");

    Ok(())
}
