use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use pollrelay::{HttpUpstreamClient, Relay, SessionStore};
use pollrelay_api::{app::build_router, config::Config, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let config = Config::load()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    init_logging(&config);

    tracing::info!("Starting streaming proxy");
    tracing::info!("Upstream: {}", config.upstream.url);

    let upstream = HttpUpstreamClient::builder()
        .connect_timeout(config.upstream.connect_timeout())
        .build()?;

    let relay = Relay::builder()
        .upstream_client(Arc::new(upstream))
        .upstream_url(config.upstream.url.clone())
        .store(SessionStore::new())
        .session_ttl(config.sessions.ttl())
        .evict_failed(config.sessions.evict_failed)
        .build()?;

    let state = Arc::new(AppState::new(config.clone(), relay));
    let app = build_router(state);

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.logging.format.as_str() {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }
}
