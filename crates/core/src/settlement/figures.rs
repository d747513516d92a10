//! Period figures and where they come from.
//!
//! A new settlement starts with locally computed figures and switches to
//! the periodic calculation service's figures once a quote arrives. An edit
//! of a stored settlement keeps the stored figures verbatim.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::contract::LeaseContract;
use crate::ports::PeriodQuote;

use super::proration::{self, REFERENCE_MONTH_DAYS};
use super::types::{SettlementRequest, SettlementType};

/// Origin of the period figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FigureSource {
    /// Supplied by the periodic calculation service.
    Quoted,
    /// Derived from the request dates; no remaining months.
    Local,
    /// Taken from a previously stored settlement.
    Stored,
}

/// Day count and remaining months used by one computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodFigures {
    /// Origin of the figures.
    pub source: FigureSource,
    /// Days of the partial period.
    pub period_days: u32,
    /// Contracted months left after termination.
    pub remaining_months: u32,
    /// Penalty reported by the service, kept for audit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quoted_penalty: Option<Decimal>,
}

impl PeriodFigures {
    /// Figures derived from the request dates alone.
    #[must_use]
    pub fn local(contract: &LeaseContract, request: &SettlementRequest) -> Self {
        let period_days = match request.settlement_type {
            SettlementType::Monthly => REFERENCE_MONTH_DAYS,
            SettlementType::MoveIn => request
                .move_in_date
                .map_or(REFERENCE_MONTH_DAYS, proration::move_in_days),
            SettlementType::Termination => request
                .termination_date
                .map_or(REFERENCE_MONTH_DAYS, |date| {
                    proration::termination_days(contract.start_date, date)
                }),
        };
        Self {
            source: FigureSource::Local,
            period_days,
            remaining_months: 0,
            quoted_penalty: None,
        }
    }

    /// Figures reported by the periodic calculation service.
    #[must_use]
    pub fn quoted(quote: &PeriodQuote) -> Self {
        Self {
            source: FigureSource::Quoted,
            period_days: quote.period_days,
            remaining_months: quote.remaining_months,
            quoted_penalty: Some(quote.penalty),
        }
    }

    /// Figures of a stored settlement, used verbatim.
    #[must_use]
    pub fn stored(period_days: u32, remaining_months: u32) -> Self {
        Self {
            source: FigureSource::Stored,
            period_days,
            remaining_months,
            quoted_penalty: None,
        }
    }

    /// Returns true if a quote may replace these figures.
    #[must_use]
    pub fn accepts_quotes(&self) -> bool {
        self.source != FigureSource::Stored
    }

    /// Returns true if these figures are final enough to persist a
    /// settlement of `settlement_type`. A termination needs the quoted
    /// remaining months; local figures carry none.
    #[must_use]
    pub fn can_persist(&self, settlement_type: SettlementType) -> bool {
        !(settlement_type == SettlementType::Termination && self.source == FigureSource::Local)
    }
}
