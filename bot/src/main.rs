use anyhow::Result;
use axum::Router;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

use advisor_bot::{build_app, BotContext};
use advisor_core::{QaConfig, QaIndex};
use advisor_ingest::{default_sources, http_client, load_or_ingest};

#[derive(Parser)]
struct Args {
    /// Path to the ingested-program snapshot; ingested on first run
    #[arg(long, default_value = "./data/programs.json")]
    snapshot: PathBuf,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let client = http_client()?;
    let programs = load_or_ingest(&client, &default_sources(), &args.snapshot).await?;
    let index = QaIndex::build(&programs);
    tracing::info!(
        programs = programs.len(),
        chunks = index.len(),
        "program data loaded"
    );

    let app: Router = build_app(BotContext {
        programs,
        index,
        qa: QaConfig::default(),
    });

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "bot listening");
    axum::serve(listener, app).await?;
    Ok(())
}
