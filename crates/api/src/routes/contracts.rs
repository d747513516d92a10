//! Contract selection routes.

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use repasse_core::contract::{ContractSummary, YearMonth};
use serde::Deserialize;
use tracing::debug;

use crate::AppState;
use crate::error::ApiError;

/// Creates the contract routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/contracts/eligible", get(list_eligible))
}

/// Query for the eligible-contract listing.
#[derive(Debug, Deserialize)]
pub struct EligibleQuery {
    /// Reference period, `YYYY-MM`.
    pub period: YearMonth,
}

/// GET /contracts/eligible?period=YYYY-MM
async fn list_eligible(
    State(state): State<AppState>,
    Query(query): Query<EligibleQuery>,
) -> Result<Json<Vec<ContractSummary>>, ApiError> {
    let contracts = state.registry.eligible_contracts(query.period).await?;
    debug!(period = %query.period, count = contracts.len(), "Listed eligible contracts");
    Ok(Json(contracts))
}
