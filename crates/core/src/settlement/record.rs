//! Persisted settlement records.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use repasse_shared::types::{ContractId, Currency};

use crate::contract::{LeaseContract, YearMonth};

use super::figures::PeriodFigures;
use super::ledger::{ExtraLine, ExtraLineLedger, LedgerScope};
use super::overlay::{ChargeKey, ChargeOverlay};
use super::types::{
    BreakdownLine, LandlordTransfer, ProrationMethod, SettlementInputs, SettlementRequest,
    SettlementResult, SettlementType,
};

/// A finished settlement as handed to the settlement store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementRecord {
    /// Contract settled.
    pub contract_id: ContractId,
    /// Human-facing contract code.
    pub contract_code: String,
    /// Settlement currency.
    pub currency: Currency,
    /// Settlement type.
    pub settlement_type: SettlementType,
    /// Proration method.
    pub proration_method: ProrationMethod,
    /// Reference period.
    pub reference_period: YearMonth,
    /// Move-in date.
    pub move_in_date: Option<NaiveDate>,
    /// Termination date.
    pub termination_date: Option<NaiveDate>,
    /// Figures the totals were computed from.
    pub figures: PeriodFigures,
    /// Operator overrides.
    pub overlay: ChargeOverlay,
    /// Tenant-facing extra lines.
    pub launches: Vec<ExtraLine>,
    /// Extra withheld lines.
    pub withholding_extras: Vec<ExtraLine>,
    /// Manual discount.
    pub manual_discount: Decimal,
    /// Manual surcharge.
    pub manual_surcharge: Decimal,
    /// Carried-over balance.
    pub carried_over_balance: Decimal,
    /// Amount the tenant pays.
    pub invoice_total: Decimal,
    /// Amount withheld.
    pub withheld_total: Decimal,
    /// Amount transferred to landlords.
    pub net_transfer: Decimal,
    /// Termination penalty.
    pub penalty: Decimal,
    /// Termination service fee.
    pub service_fee: Decimal,
    /// Set when the service quoted a different penalty than the one billed.
    pub penalty_mismatch: Option<PenaltyMismatch>,
    /// Audit breakdown.
    pub breakdown: Vec<BreakdownLine>,
    /// Per-landlord transfers.
    pub transfers: Vec<LandlordTransfer>,
    /// Operator notes.
    pub notes: String,
    /// When the record was produced.
    pub created_at: DateTime<Utc>,
}

/// Penalty quoted by the periodic calculation service versus the one billed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PenaltyMismatch {
    /// Penalty quoted by the service.
    pub quoted: Decimal,
    /// Penalty computed before operator overrides.
    pub computed: Decimal,
}

impl SettlementRecord {
    /// Builds a record from the inputs and the result computed from them.
    #[must_use]
    pub fn new(inputs: &SettlementInputs, result: &SettlementResult, created_at: DateTime<Utc>) -> Self {
        let request = &inputs.request;
        let computed_penalty = result
            .line(ChargeKey::TerminationPenalty)
            .map_or(Decimal::ZERO, |line| line.resolved);
        let penalty_mismatch = inputs
            .figures
            .quoted_penalty
            .filter(|quoted| *quoted != computed_penalty)
            .map(|quoted| PenaltyMismatch {
                quoted,
                computed: computed_penalty,
            });

        Self {
            contract_id: inputs.contract.id,
            contract_code: inputs.contract.code.clone(),
            currency: result.currency,
            settlement_type: request.settlement_type,
            proration_method: request.proration_method,
            reference_period: request.reference_period,
            move_in_date: request.move_in_date,
            termination_date: request.termination_date,
            figures: result.figures,
            overlay: inputs.overlay.clone(),
            launches: inputs.launches.lines().to_vec(),
            withholding_extras: inputs.withholding_extras.lines().to_vec(),
            manual_discount: request.manual_discount,
            manual_surcharge: request.manual_surcharge,
            carried_over_balance: request.carried_over_balance,
            invoice_total: result.invoice_total,
            withheld_total: result.withheld_total,
            net_transfer: result.net_transfer,
            penalty: result.penalty,
            service_fee: result.service_fee,
            penalty_mismatch,
            breakdown: result.breakdown.clone(),
            transfers: result.transfers.clone(),
            notes: request.notes.clone(),
            created_at,
        }
    }

    /// The settlement request this record was computed from.
    #[must_use]
    pub fn request(&self) -> SettlementRequest {
        SettlementRequest {
            settlement_type: self.settlement_type,
            proration_method: self.proration_method,
            reference_period: self.reference_period,
            move_in_date: self.move_in_date,
            termination_date: self.termination_date,
            manual_discount: self.manual_discount,
            manual_surcharge: self.manual_surcharge,
            carried_over_balance: self.carried_over_balance,
            notes: self.notes.clone(),
        }
    }

    /// Rebuilds the inputs for editing this record against `contract`.
    ///
    /// Stored figures and stored ledger lines are taken verbatim.
    #[must_use]
    pub fn to_inputs(&self, contract: LeaseContract) -> SettlementInputs {
        SettlementInputs {
            contract,
            request: self.request(),
            overlay: self.overlay.clone(),
            launches: ExtraLineLedger::from_lines(LedgerScope::Launches, self.launches.clone()),
            withholding_extras: ExtraLineLedger::from_lines(
                LedgerScope::Withholding,
                self.withholding_extras.clone(),
            ),
            figures: PeriodFigures::stored(self.figures.period_days, self.figures.remaining_months),
        }
    }
}
