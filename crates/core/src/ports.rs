//! Collaborator ports.
//!
//! The engine never performs I/O itself. Contracts come from the contract
//! registry, period figures from the periodic calculation service, and
//! finished settlements go to the settlement store. Adapters live outside
//! this crate.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use repasse_shared::types::{ContractId, SettlementId};

use crate::contract::{ContractSummary, LeaseContract, YearMonth};
use crate::settlement::charges::ResolvedCharges;
use crate::settlement::ledger::ExtraLine;
use crate::settlement::overlay::ChargeKey;
use crate::settlement::record::SettlementRecord;
use crate::settlement::types::{ProrationMethod, SettlementInputs, SettlementType};

/// Failure talking to a collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollaboratorError {
    /// Connection refused, timed out or otherwise unreachable.
    #[error("{service} unavailable: {message}")]
    Unavailable {
        /// Collaborator name.
        service: &'static str,
        /// Transport error message.
        message: String,
    },

    /// Collaborator answered with a non-success status.
    #[error("{service} returned status {status}")]
    Status {
        /// Collaborator name.
        service: &'static str,
        /// HTTP status code.
        status: u16,
    },

    /// Collaborator answered with a body that could not be decoded.
    #[error("{service} returned an invalid response: {message}")]
    Decode {
        /// Collaborator name.
        service: &'static str,
        /// Decoder error message.
        message: String,
    },

    /// The requested entity does not exist.
    #[error("{service}: {entity} not found")]
    NotFound {
        /// Collaborator name.
        service: &'static str,
        /// Missing entity description.
        entity: String,
    },
}

impl CollaboratorError {
    /// Returns true if retrying the same call may succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Unavailable { .. } => true,
            Self::Status { status, .. } => *status >= 500,
            Self::Decode { .. } | Self::NotFound { .. } => false,
        }
    }

    /// Name of the collaborator that failed.
    #[must_use]
    pub fn service(&self) -> &'static str {
        match self {
            Self::Unavailable { service, .. }
            | Self::Status { service, .. }
            | Self::Decode { service, .. }
            | Self::NotFound { service, .. } => service,
        }
    }
}

/// Base monthly amounts sent to the periodic calculation service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseAmounts {
    /// Monthly rent.
    pub rent: Decimal,
    /// Condominium fee.
    pub condo_fee: Decimal,
    /// Building-insurance fund.
    pub fci: Decimal,
    /// Surety insurance installment.
    pub surety_insurance: Decimal,
    /// Fire insurance installment.
    pub fire_insurance: Decimal,
    /// Property tax installment.
    pub property_tax: Decimal,
}

/// Request sent to the periodic calculation service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteRequest {
    /// Contract being settled.
    pub contract_id: ContractId,
    /// Reference period.
    pub reference_period: YearMonth,
    /// Entry date of the partial period.
    pub entry_date: Option<NaiveDate>,
    /// Exit date of the partial period.
    pub exit_date: Option<NaiveDate>,
    /// Settlement type.
    pub settlement_type: SettlementType,
    /// Proration method.
    pub proration_method: ProrationMethod,
    /// Resolved monthly amounts after operator overrides.
    pub base_amounts: BaseAmounts,
    /// Tenant-facing extra lines.
    pub launches: Vec<ExtraLine>,
    /// Manual discount.
    pub manual_discount: Decimal,
    /// Manual surcharge.
    pub manual_surcharge: Decimal,
}

impl QuoteRequest {
    /// Builds the request for the current session inputs.
    #[must_use]
    pub fn from_inputs(inputs: &SettlementInputs) -> Self {
        let request = &inputs.request;
        let charges = ResolvedCharges::resolve(&inputs.contract, request.reference_period);
        let base = |key: ChargeKey| inputs.overlay.effective(key, charges.monthly_amount(key));

        let (entry_date, exit_date) = match request.settlement_type {
            SettlementType::MoveIn => (request.move_in_date, None),
            SettlementType::Monthly => (None, None),
            SettlementType::Termination => (None, request.termination_date),
        };

        Self {
            contract_id: inputs.contract.id,
            reference_period: request.reference_period,
            entry_date,
            exit_date,
            settlement_type: request.settlement_type,
            proration_method: request.proration_method,
            base_amounts: BaseAmounts {
                rent: base(ChargeKey::Rent),
                condo_fee: base(ChargeKey::CondoFee),
                fci: base(ChargeKey::Fci),
                surety_insurance: base(ChargeKey::SuretyInsurance),
                fire_insurance: base(ChargeKey::FireInsurance),
                property_tax: base(ChargeKey::PropertyTax),
            },
            launches: inputs.launches.lines().to_vec(),
            manual_discount: request.manual_discount,
            manual_surcharge: request.manual_surcharge,
        }
    }
}

/// Retention split reported by the periodic calculation service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuoteRetention {
    /// Administrative fee.
    pub admin_fee: Decimal,
    /// Everything else retained.
    pub other: Decimal,
}

/// Reply of the periodic calculation service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeriodQuote {
    /// Total billed for the period.
    pub total: Decimal,
    /// Discount applied.
    pub discount: Decimal,
    /// Termination penalty.
    #[serde(alias = "multa")]
    pub penalty: Decimal,
    /// Contracted months left after the exit date.
    pub remaining_months: u32,
    /// Days of the partial period.
    pub period_days: u32,
    /// Retention split.
    pub retention: QuoteRetention,
}

/// Source of lease contracts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContractRegistry: Send + Sync {
    /// Fetches a contract with its landlords.
    async fn fetch_contract(&self, id: ContractId) -> Result<LeaseContract, CollaboratorError>;

    /// Lists contracts that can be settled for `period`.
    async fn eligible_contracts(
        &self,
        period: YearMonth,
    ) -> Result<Vec<ContractSummary>, CollaboratorError>;
}

/// Server-side proration and penalty figures.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PeriodicCalculation: Send + Sync {
    /// Computes the period figures for a settlement in progress.
    async fn calculate(&self, request: &QuoteRequest) -> Result<PeriodQuote, CollaboratorError>;
}

/// Persistence of finished settlements.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SettlementStore: Send + Sync {
    /// Persists a settlement and returns its identifier.
    async fn save(&self, record: &SettlementRecord) -> Result<SettlementId, CollaboratorError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_quote_accepts_legacy_penalty_field() {
        let json = r#"{"total":"1500.00","multa":"2400.00","remaining_months":4,"period_days":12}"#;
        let quote: PeriodQuote = serde_json::from_str(json).unwrap();
        assert_eq!(quote.penalty, dec!(2400.00));
        assert_eq!(quote.remaining_months, 4);
        assert_eq!(quote.period_days, 12);
        assert_eq!(quote.retention, QuoteRetention::default());
    }

    #[test]
    fn test_transient_errors() {
        let unavailable = CollaboratorError::Unavailable {
            service: "periodic-calculation",
            message: "timed out".to_string(),
        };
        assert!(unavailable.is_transient());
        assert_eq!(unavailable.service(), "periodic-calculation");

        let bad_gateway = CollaboratorError::Status {
            service: "settlement-store",
            status: 502,
        };
        assert!(bad_gateway.is_transient());

        let bad_request = CollaboratorError::Status {
            service: "settlement-store",
            status: 400,
        };
        assert!(!bad_request.is_transient());
    }
}
