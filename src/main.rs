use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use news_api::auth::JwtVerifier;
use news_api::database::{open_store, seed::sample_news};
use news_api::services::NewsService;
use news_api::{app, config, AppState};

#[derive(Debug, Parser)]
#[command(name = "news-api", version, about = "News REST API")]
struct Args {
    /// Port to listen on (overrides NEWS_API_PORT / PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Address to bind (overrides NEWS_API_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Insert sample news when the store is empty
    #[arg(long, conflicts_with = "no_seed")]
    seed: bool,

    /// Never insert sample news
    #[arg(long)]
    no_seed: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWKS_URL, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("news_api=info,tower_http=info")),
        )
        .init();

    let args = Args::parse();
    let config = config::config();
    tracing::info!("Starting News API in {:?} mode", config.environment);

    let store = open_store(&config.database)
        .await
        .context("failed to open news store")?;
    let news = NewsService::new(store);
    news.check_store().await.context("news store is unreachable")?;

    let seed = (config.database.seed_sample_data || args.seed) && !args.no_seed;
    if seed {
        news.seed_if_empty(sample_news())
            .await
            .context("failed to seed sample news")?;
    }

    let verifier = JwtVerifier::from_config(&config.security)
        .context("failed to configure token verification")?;

    let router = app(AppState::new(news, verifier), &config.security.cors_origins);

    let host = args.host.as_deref().unwrap_or(&config.server.host);
    let port = args.port.unwrap_or(config.server.port);
    let bind_addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("News API listening on http://{}", bind_addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
