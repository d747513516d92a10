//! Settlement error types.
//!
//! Validation and ledger errors block a save; collaborator errors only
//! degrade the session to locally computed figures.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::contract::YearMonth;
use crate::ports::CollaboratorError;

use super::ledger::{ExtraLineKind, LedgerScope};

/// Input errors detected before computing a settlement.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A move-in settlement needs the move-in date.
    #[error("Move-in settlement requires a move-in date")]
    MissingMoveInDate,

    /// A termination settlement needs the termination date.
    #[error("Termination settlement requires a termination date")]
    MissingTerminationDate,

    /// Monthly settlement for a month before the contract starts.
    #[error("Reference period {period} is before the contract start ({contract_start})")]
    ReferenceBeforeContractStart {
        /// Requested reference period.
        period: YearMonth,
        /// First period of the contract.
        contract_start: YearMonth,
    },

    /// Termination dated before the contract starts.
    #[error("Termination date {termination} is before the contract start ({contract_start})")]
    TerminationBeforeContractStart {
        /// Requested termination date.
        termination: NaiveDate,
        /// Contract start date.
        contract_start: NaiveDate,
    },

    /// Move-in dated before the contract starts.
    #[error("Move-in date {move_in} is before the contract start ({contract_start})")]
    MoveInBeforeContractStart {
        /// Requested move-in date.
        move_in: NaiveDate,
        /// Contract start date.
        contract_start: NaiveDate,
    },

    /// A manual amount that must not be negative.
    #[error("{field} cannot be negative: {amount}")]
    NegativeAmount {
        /// Offending field name.
        field: &'static str,
        /// Offending amount.
        amount: Decimal,
    },
}

/// Errors raised when editing an extra-line ledger.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// New lines must carry a strictly positive amount.
    #[error("Line amount must be greater than zero, got {0}")]
    NonPositiveAmount(Decimal),

    /// New lines must be described.
    #[error("Line description cannot be empty")]
    EmptyDescription,

    /// The kind does not belong to this ledger.
    #[error("Line kind {kind} is not allowed in the {scope} ledger")]
    KindOutOfScope {
        /// Rejected kind.
        kind: ExtraLineKind,
        /// Ledger scope.
        scope: LedgerScope,
    },

    /// Removal index past the end of the ledger.
    #[error("No line at index {index} (ledger has {len} lines)")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Current number of lines.
        len: usize,
    },
}

/// Umbrella error returned by the engine and the session controller.
#[derive(Debug, Error)]
pub enum SettlementError {
    /// Blocking input error.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Ledger edit rejected.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// A collaborator call failed.
    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),
}

impl SettlementError {
    /// Returns true if the operator can retry without changing inputs.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Collaborator(e) if e.is_transient())
    }
}
