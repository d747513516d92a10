//! Repasse API Server
//!
//! Main entry point for the settlement service.

use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use repasse_api::{AppState, create_router};
use repasse_client::{
    CachedContractRegistry, HttpContractRegistry, HttpPeriodicCalculation, HttpSettlementStore,
    build_client,
};
use repasse_core::settlement::{SettlementEngine, SettlementRates};
use repasse_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "repasse=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load()?;

    let client = build_client(Duration::from_secs(config.services.timeout_secs))?;
    let registry = CachedContractRegistry::from_config(
        HttpContractRegistry::new(client.clone(), &config.services.contract_registry_url),
        &config.cache,
    );
    let calculator =
        HttpPeriodicCalculation::new(client.clone(), &config.services.periodic_calculation_url);
    let store = HttpSettlementStore::new(client, &config.services.settlement_store_url);
    info!(
        registry = %config.services.contract_registry_url,
        calculation = %config.services.periodic_calculation_url,
        store = %config.services.settlement_store_url,
        "Collaborators configured"
    );

    let rates = SettlementRates::from(&config.settlement);
    info!(
        penalty_rate = %rates.penalty_rate,
        service_fee_rate = %rates.service_fee_rate,
        anticipation_rate = %rates.anticipation_rate,
        debounce_ms = config.settlement.debounce_ms,
        "Settlement engine configured"
    );

    let state = AppState {
        registry: Arc::new(registry),
        calculator: Arc::new(calculator),
        store: Arc::new(store),
        engine: SettlementEngine::new(rates),
        debounce: Duration::from_millis(config.settlement.debounce_ms),
    };

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
