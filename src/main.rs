use fxscope::config::Config;
use fxscope::AppState;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fxscope=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env();
    info!("Starting fxscope server on {}:{}", config.host, config.port);

    if config.twelve_data_api_key.is_none() {
        warn!("TWELVE_DATA_API_KEY not set, using the demo key");
    }
    info!(
        "Tracking {} pairs across {} timeframes (reference {}, history {})",
        config.pairs.len(),
        config.signal.timeframes.len(),
        config.signal.reference_timeframe,
        config.signal.history_capacity
    );

    let addr = format!("{}:{}", config.host, config.port);
    let state = AppState::from_config(config);

    // Periodically drop expired snapshot cache entries
    {
        let signal_store = state.signal_store.clone();
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(tokio::time::Duration::from_secs(60)).await;
                signal_store.cleanup_cache();
            }
        });
    }

    let app = fxscope::app(state);

    // Start the server
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("fxscope server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
