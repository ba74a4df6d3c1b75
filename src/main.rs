use stat_highlights::{
    api,
    provider::{ProviderConfig, StatsApiProvider},
    shared::AppState,
    stats::{AnalysisConfig, StatsService},
};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

fn stats_service(
    config: ProviderConfig,
    analysis: AnalysisConfig,
) -> Result<Arc<StatsService>, Box<dyn std::error::Error>> {
    let provider = Arc::new(StatsApiProvider::new(config)?);
    let service = StatsService::builder(provider.clone(), provider)
        .with_config(analysis)
        .build()?;
    Ok(Arc::new(service))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stat_highlights=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting stat highlights server");

    let analysis = AnalysisConfig::from_env();
    let primary_config = ProviderConfig::from_env();
    info!(
        base_url = %primary_config.base_url,
        league = ?primary_config.league,
        fetch_concurrency = analysis.fetch_concurrency,
        gap_policy = ?analysis.gap_policy,
        "Loaded configuration"
    );

    // Registry is validated here, before anything binds
    let primary = stats_service(primary_config, analysis.clone())?;
    let secondary = match ProviderConfig::secondary_from_env() {
        Some(config) => {
            info!(base_url = %config.base_url, "Secondary provider configured");
            Some(stats_service(config, analysis)?)
        }
        None => {
            warn!("STATS_API_SECONDARY_URL not set, reconciliation disabled");
            None
        }
    };

    let app = api::router(AppState::new(primary, secondary));

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("Server running on http://{}", bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
