//! Settlement routes.
//!
//! Previews are stateless: each request rebuilds a session from the
//! submitted draft, asks the periodic calculation service for figures
//! once, and answers with the resulting snapshot. A failed quote never
//! fails the preview; the snapshot carries a recoverable notice instead.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::post,
};
use repasse_core::contract::LeaseContract;
use repasse_core::settlement::{
    ChargeOverlay, ChargeState, ExtraLine, QuoteOutcome, SessionNotice, SessionSnapshot,
    SettlementInputs, SettlementRequest, SettlementResult, SettlementSession,
};
use repasse_shared::AppError;
use repasse_shared::types::{ContractId, SettlementId};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::AppState;
use crate::error::ApiError;

/// Creates the settlement routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/settlements/preview", post(preview_inputs))
        .route(
            "/contracts/{contract_id}/settlements/preview",
            post(preview_draft),
        )
        .route("/contracts/{contract_id}/settlements", post(save_draft))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Operator edits for a settlement against a registered contract.
#[derive(Debug, Deserialize)]
pub struct SettlementDraft {
    /// Settlement parameters.
    pub request: SettlementRequest,
    /// Charge overrides.
    #[serde(default)]
    pub overlay: ChargeOverlay,
    /// Launch lines (tenant-facing).
    #[serde(default)]
    pub launches: Vec<ExtraLine>,
    /// Extra withheld lines.
    #[serde(default)]
    pub withholding_extras: Vec<ExtraLine>,
}

/// Preview of a draft.
#[derive(Debug, Serialize)]
pub struct DraftPreview {
    /// How the period quote went.
    pub quote: &'static str,
    /// Session state after the quote.
    #[serde(flatten)]
    pub snapshot: SessionSnapshot,
}

/// Response for a saved settlement.
#[derive(Debug, Serialize)]
pub struct SavedSettlement {
    /// Identifier assigned by the settlement store.
    pub settlement_id: SettlementId,
    /// How the period quote went.
    pub quote: &'static str,
    /// The saved computation.
    #[serde(flatten)]
    pub snapshot: SessionSnapshot,
}

// ============================================================================
// Helper Functions
// ============================================================================

fn quote_label(outcome: QuoteOutcome) -> &'static str {
    match outcome {
        QuoteOutcome::Applied => "applied",
        QuoteOutcome::Stale => "stale",
        QuoteOutcome::Unavailable => "unavailable",
        QuoteOutcome::Idle => "idle",
    }
}

/// Rebuilds a session from a draft by replaying its edits.
fn open_session(
    state: &AppState,
    contract: LeaseContract,
    draft: SettlementDraft,
) -> Result<SettlementSession, ApiError> {
    let mut session =
        SettlementSession::open(state.engine, state.debounce, contract, draft.request);

    let overrides: Vec<_> = draft.overlay.overridden().collect();
    for (key, charge_state) in overrides {
        match charge_state {
            ChargeState::Disabled => {
                session.toggle_charge(key);
            }
            ChargeState::Deleted => {
                session.delete_charge(key);
            }
            ChargeState::Active => {}
        }
    }

    for line in draft.launches.into_iter().chain(draft.withholding_extras) {
        session.add_line(line)?;
    }

    if let Some(SessionNotice::Blocking(message)) = session.notice() {
        return Err(AppError::Validation(message.clone()).into());
    }
    Ok(session)
}

/// Opens the draft and settles its period quote.
async fn quoted_session(
    state: &AppState,
    contract_id: ContractId,
    draft: SettlementDraft,
) -> Result<(SettlementSession, QuoteOutcome), ApiError> {
    let contract = state.registry.fetch_contract(contract_id).await?;
    let mut session = open_session(state, contract, draft)?;
    let outcome = session.quote_now(state.calculator.as_ref()).await;
    debug!(contract_id = %contract_id, quote = quote_label(outcome), "Draft quoted");
    Ok((session, outcome))
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST /settlements/preview
///
/// Computes fully supplied inputs without contacting any collaborator.
async fn preview_inputs(
    State(state): State<AppState>,
    Json(inputs): Json<SettlementInputs>,
) -> Result<Json<SettlementResult>, ApiError> {
    let result = state.engine.compute(&inputs)?;
    Ok(Json(result))
}

/// POST /contracts/{contract_id}/settlements/preview
async fn preview_draft(
    State(state): State<AppState>,
    Path(contract_id): Path<ContractId>,
    Json(draft): Json<SettlementDraft>,
) -> Result<Json<DraftPreview>, ApiError> {
    let (session, outcome) = quoted_session(&state, contract_id, draft).await?;
    Ok(Json(DraftPreview {
        quote: quote_label(outcome),
        snapshot: session.snapshot(),
    }))
}

/// POST /contracts/{contract_id}/settlements
async fn save_draft(
    State(state): State<AppState>,
    Path(contract_id): Path<ContractId>,
    Json(draft): Json<SettlementDraft>,
) -> Result<(StatusCode, Json<SavedSettlement>), ApiError> {
    let (session, outcome) = quoted_session(&state, contract_id, draft).await?;
    let settlement_id = session.save(state.store.as_ref()).await?;
    info!(settlement_id = %settlement_id, contract_id = %contract_id, "Settlement created");
    Ok((
        StatusCode::CREATED,
        Json(SavedSettlement {
            settlement_id,
            quote: quote_label(outcome),
            snapshot: session.snapshot(),
        }),
    ))
}
