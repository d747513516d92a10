//! Rent settlement calculation.
//!
//! This module implements the settlement pipeline:
//! - Fixed charge resolution with installment windows
//! - Day-based proration over a 30-day month
//! - Operator charge overrides (disable / delete)
//! - Extra-line ledgers for launches and withholding extras
//! - Withholding, termination penalty and the aggregate totals
//! - Net-transfer split across landlords
//! - The session controller that drives recomputation and quotes

pub mod charges;
pub mod distribution;
pub mod engine;
pub mod error;
pub mod figures;
pub mod ledger;
pub mod overlay;
pub mod penalty;
pub mod proration;
pub mod record;
pub mod session;
pub mod types;
pub mod validation;
pub mod withholding;

#[cfg(test)]
mod distribution_props;
#[cfg(test)]
mod engine_props;

pub use charges::{FIXED_CHARGES, InstallmentInfo, ResolvedCharge, ResolvedCharges};
pub use distribution::LandlordDistributor;
pub use engine::SettlementEngine;
pub use error::{LedgerError, SettlementError, ValidationError};
pub use figures::{FigureSource, PeriodFigures};
pub use ledger::{ExtraLine, ExtraLineKind, ExtraLineLedger, LedgerScope};
pub use overlay::{ChargeKey, ChargeOverlay, ChargeState};
pub use penalty::TerminationPenalty;
pub use proration::{ProrationPlan, REFERENCE_MONTH_DAYS};
pub use record::{PenaltyMismatch, SettlementRecord};
pub use session::{QuoteOutcome, QuoteRequestId, SessionNotice, SessionSnapshot, SettlementSession};
pub use types::{
    BreakdownLine, BreakdownSection, LandlordTransfer, ProrationMethod, SettlementInputs,
    SettlementRates, SettlementRequest, SettlementResult, SettlementType,
};
pub use validation::validate_request;
pub use withholding::{Withholding, WithholdingInput};
