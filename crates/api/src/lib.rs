//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - Settlement preview and save routes
//! - Eligible-contract listing
//! - Error-to-response mapping

pub mod error;
pub mod routes;


use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use repasse_core::ports::{ContractRegistry, PeriodicCalculation, SettlementStore};
use repasse_core::settlement::SettlementEngine;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Contract registry.
    pub registry: Arc<dyn ContractRegistry>,
    /// Periodic calculation service.
    pub calculator: Arc<dyn PeriodicCalculation>,
    /// Settlement persistence.
    pub store: Arc<dyn SettlementStore>,
    /// Configured settlement engine.
    pub engine: SettlementEngine,
    /// Quiet window before a period quote is requested.
    pub debounce: Duration,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
