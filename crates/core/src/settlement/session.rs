//! Settlement session controller.
//!
//! A session owns the mutable state of one settlement. Every mutation bumps
//! the revision, recomputes synchronously and schedules a debounced quote
//! from the periodic calculation service. A quote reply is applied only if
//! it answers the current revision; anything older is dropped. Dropping
//! the session abandons any request in flight.

use std::time::Duration;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::{debug, info, warn};
use repasse_shared::types::SettlementId;

use crate::contract::{LeaseContract, YearMonth};
use crate::ports::{CollaboratorError, PeriodQuote, PeriodicCalculation, QuoteRequest, SettlementStore};

use super::engine::SettlementEngine;
use super::error::{LedgerError, SettlementError};
use super::figures::PeriodFigures;
use super::ledger::{ExtraLine, ExtraLineLedger, LedgerScope};
use super::overlay::{ChargeKey, ChargeOverlay, ChargeState};
use super::record::SettlementRecord;
use super::types::{
    ProrationMethod, SettlementInputs, SettlementRequest, SettlementResult, SettlementType,
};

/// Identity of a quote request: the revision it was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuoteRequestId(pub u64);

/// What happened to a quote reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteOutcome {
    /// Reply applied; figures now come from the service.
    Applied,
    /// Reply answered an older revision and was dropped.
    Stale,
    /// Service failed; local figures stay in use.
    Unavailable,
    /// Nothing was pending.
    Idle,
}

/// Message shown alongside the current result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum SessionNotice {
    /// Inputs cannot be computed or saved until fixed.
    Blocking(String),
    /// A collaborator failed; results use local figures.
    Recoverable(String),
}

/// Read-only view of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Current revision.
    pub revision: u64,
    /// Last valid result.
    pub result: Option<SettlementResult>,
    /// True if the inputs changed since the result was computed.
    pub stale: bool,
    /// Pending notice.
    pub notice: Option<SessionNotice>,
}

/// Mutable state of one settlement being prepared.
#[derive(Debug)]
pub struct SettlementSession {
    engine: SettlementEngine,
    debounce: Duration,
    inputs: SettlementInputs,
    revision: u64,
    quote_due_at: Option<Instant>,
    in_flight: Option<QuoteRequestId>,
    last_result: Option<SettlementResult>,
    stale: bool,
    notice: Option<SessionNotice>,
}

impl SettlementSession {
    /// Opens a new settlement for `contract` and schedules its first quote.
    #[must_use]
    pub fn open(
        engine: SettlementEngine,
        debounce: Duration,
        contract: LeaseContract,
        request: SettlementRequest,
    ) -> Self {
        let mut session = Self::with_inputs(
            engine,
            debounce,
            SettlementInputs::new(contract, request),
        );
        session.schedule_quote();
        session
    }

    /// Reopens a stored settlement with its stored figures.
    ///
    /// No quote is scheduled until a figure-affecting field changes.
    #[must_use]
    pub fn resume(
        engine: SettlementEngine,
        debounce: Duration,
        contract: LeaseContract,
        record: &SettlementRecord,
    ) -> Self {
        Self::with_inputs(engine, debounce, record.to_inputs(contract))
    }

    fn with_inputs(engine: SettlementEngine, debounce: Duration, inputs: SettlementInputs) -> Self {
        let mut session = Self {
            engine,
            debounce,
            inputs,
            revision: 0,
            quote_due_at: None,
            in_flight: None,
            last_result: None,
            stale: false,
            notice: None,
        };
        session.recompute();
        session
    }

    /// Current inputs.
    #[must_use]
    pub fn inputs(&self) -> &SettlementInputs {
        &self.inputs
    }

    /// Current revision.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Last valid result.
    #[must_use]
    pub fn result(&self) -> Option<&SettlementResult> {
        self.last_result.as_ref()
    }

    /// True if the last result no longer reflects the inputs.
    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Pending notice.
    #[must_use]
    pub fn notice(&self) -> Option<&SessionNotice> {
        self.notice.as_ref()
    }

    /// When the next quote request is due.
    #[must_use]
    pub fn quote_due_at(&self) -> Option<Instant> {
        self.quote_due_at
    }

    /// Owned view of the session.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            revision: self.revision,
            result: self.last_result.clone(),
            stale: self.stale,
            notice: self.notice.clone(),
        }
    }

    /// Switches to another contract. Overrides and ledgers start over.
    pub fn select_contract(&mut self, contract: LeaseContract) {
        let request = self.inputs.request.clone();
        self.inputs = SettlementInputs::new(contract, request);
        self.mutated(true);
    }

    /// Sets the settlement type.
    pub fn set_settlement_type(&mut self, settlement_type: SettlementType) {
        self.inputs.request.settlement_type = settlement_type;
        self.mutated(true);
    }

    /// Sets the proration method.
    pub fn set_proration_method(&mut self, method: ProrationMethod) {
        self.inputs.request.proration_method = method;
        self.mutated(true);
    }

    /// Sets the reference period.
    pub fn set_reference_period(&mut self, period: YearMonth) {
        self.inputs.request.reference_period = period;
        self.mutated(true);
    }

    /// Sets the move-in date; for a move-in it also sets the reference period.
    pub fn set_move_in_date(&mut self, date: Option<NaiveDate>) {
        self.inputs.request.move_in_date = date;
        if let Some(date) = date
            && self.inputs.request.settlement_type == SettlementType::MoveIn
        {
            self.inputs.request.reference_period = YearMonth::from_date(date);
        }
        self.mutated(true);
    }

    /// Sets the termination date; for a termination it also sets the reference period.
    pub fn set_termination_date(&mut self, date: Option<NaiveDate>) {
        self.inputs.request.termination_date = date;
        if let Some(date) = date
            && self.inputs.request.settlement_type == SettlementType::Termination
        {
            self.inputs.request.reference_period = YearMonth::from_date(date);
        }
        self.mutated(true);
    }

    /// Sets the manual discount.
    pub fn set_manual_discount(&mut self, amount: Decimal) {
        self.inputs.request.manual_discount = amount;
        self.mutated(false);
    }

    /// Sets the manual surcharge.
    pub fn set_manual_surcharge(&mut self, amount: Decimal) {
        self.inputs.request.manual_surcharge = amount;
        self.mutated(false);
    }

    /// Sets the carried-over balance.
    pub fn set_carried_over_balance(&mut self, amount: Decimal) {
        self.inputs.request.carried_over_balance = amount;
        self.mutated(false);
    }

    /// Sets the notes.
    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.inputs.request.notes = notes.into();
        self.mutated(false);
    }

    /// Appends a line to the launch or withholding ledger, by kind.
    ///
    /// # Errors
    ///
    /// Returns an error if the line fails entry validation.
    pub fn add_line(&mut self, line: ExtraLine) -> Result<(), LedgerError> {
        self.ledger_mut(line.kind.scope()).append(line)?;
        self.mutated(false);
        Ok(())
    }

    /// Removes a line from the given ledger.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is out of range.
    pub fn remove_line(&mut self, scope: LedgerScope, index: usize) -> Result<ExtraLine, LedgerError> {
        let removed = self.ledger_mut(scope).remove(index)?;
        self.mutated(false);
        Ok(removed)
    }

    /// Toggles a charge line between active and disabled.
    pub fn toggle_charge(&mut self, key: ChargeKey) -> ChargeState {
        let state = self.inputs.overlay.toggle(key);
        self.mutated(false);
        state
    }

    /// Deletes a charge line for the rest of the session.
    pub fn delete_charge(&mut self, key: ChargeKey) -> bool {
        let deleted = self.inputs.overlay.delete(key);
        self.mutated(false);
        deleted
    }

    /// Current charge overrides.
    #[must_use]
    pub fn overlay(&self) -> &ChargeOverlay {
        &self.inputs.overlay
    }

    fn ledger_mut(&mut self, scope: LedgerScope) -> &mut ExtraLineLedger {
        match scope {
            LedgerScope::Launches => &mut self.inputs.launches,
            LedgerScope::Withholding => &mut self.inputs.withholding_extras,
        }
    }

    fn mutated(&mut self, figures_changed: bool) {
        self.revision += 1;
        if figures_changed {
            self.inputs.figures = PeriodFigures::local(&self.inputs.contract, &self.inputs.request);
        }
        self.in_flight = None;
        self.schedule_quote();
        self.recompute();
    }

    fn schedule_quote(&mut self) {
        if self.inputs.figures.accepts_quotes() {
            self.quote_due_at = Some(Instant::now() + self.debounce);
        }
    }

    fn recompute(&mut self) {
        match self.engine.compute(&self.inputs) {
            Ok(result) => {
                self.last_result = Some(result);
                self.stale = false;
                if matches!(self.notice, Some(SessionNotice::Blocking(_))) {
                    self.notice = None;
                }
            }
            Err(e) => {
                warn!(error = %e, revision = self.revision, "Settlement recompute failed, keeping last result");
                self.stale = true;
                self.notice = Some(SessionNotice::Blocking(e.to_string()));
            }
        }
    }

    /// Issues the pending quote request if its debounce window has elapsed.
    pub fn poll_quote(&mut self, now: Instant) -> Option<(QuoteRequestId, QuoteRequest)> {
        let due = self.quote_due_at?;
        if now < due {
            return None;
        }
        self.quote_due_at = None;
        let id = QuoteRequestId(self.revision);
        self.in_flight = Some(id);
        debug!(revision = self.revision, "Issuing period quote request");
        Some((id, QuoteRequest::from_inputs(&self.inputs)))
    }

    /// Applies a quote reply.
    pub fn apply_quote(
        &mut self,
        id: QuoteRequestId,
        reply: Result<PeriodQuote, CollaboratorError>,
    ) -> QuoteOutcome {
        if self.in_flight != Some(id) || id.0 != self.revision {
            debug!(request = id.0, revision = self.revision, "Dropping stale quote reply");
            return QuoteOutcome::Stale;
        }
        self.in_flight = None;

        match reply {
            Ok(quote) => {
                self.inputs.figures = PeriodFigures::quoted(&quote);
                if matches!(self.notice, Some(SessionNotice::Recoverable(_))) {
                    self.notice = None;
                }
                self.recompute();
                QuoteOutcome::Applied
            }
            Err(e) => {
                warn!(error = %e, service = e.service(), "Period quote unavailable, using local figures");
                self.notice = Some(SessionNotice::Recoverable(e.to_string()));
                QuoteOutcome::Unavailable
            }
        }
    }

    /// Requests a quote immediately, skipping the debounce window.
    pub async fn quote_now(&mut self, calculator: &dyn PeriodicCalculation) -> QuoteOutcome {
        if self.quote_due_at.is_none() {
            return QuoteOutcome::Idle;
        }
        self.quote_due_at = Some(Instant::now());
        self.issue(calculator).await
    }

    /// Waits for the debounce window, then requests and applies a quote.
    pub async fn refresh_quote(&mut self, calculator: &dyn PeriodicCalculation) -> QuoteOutcome {
        let Some(due) = self.quote_due_at else {
            return QuoteOutcome::Idle;
        };
        tokio::time::sleep_until(due).await;
        self.issue(calculator).await
    }

    async fn issue(&mut self, calculator: &dyn PeriodicCalculation) -> QuoteOutcome {
        let Some((id, request)) = self.poll_quote(Instant::now()) else {
            return QuoteOutcome::Idle;
        };
        let reply = calculator.calculate(&request).await;
        self.apply_quote(id, reply)
    }

    /// Computes the current inputs and persists them.
    ///
    /// The session is left untouched, so a failed save can be retried.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the inputs are blocking, a recoverable
    /// collaborator error if a termination still lacks quoted figures, or
    /// the store's error if persistence fails.
    pub async fn save(&self, store: &dyn SettlementStore) -> Result<SettlementId, SettlementError> {
        let result = self.engine.compute(&self.inputs)?;
        if !self.inputs.figures.can_persist(self.inputs.request.settlement_type) {
            warn!(
                contract = %self.inputs.contract.code,
                "Refusing to save termination without quoted remaining months"
            );
            return Err(CollaboratorError::Unavailable {
                service: "periodic-calculation",
                message: "remaining contract months have not been quoted".to_string(),
            }
            .into());
        }
        let record = SettlementRecord::new(&self.inputs, &result, Utc::now());
        let id = store.save(&record).await.inspect_err(|e| {
            warn!(error = %e, contract = %self.inputs.contract.code, "Settlement save failed");
        })?;
        info!(settlement_id = %id, contract = %self.inputs.contract.code, "Settlement saved");
        Ok(id)
    }
}
