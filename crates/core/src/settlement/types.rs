//! Settlement request, inputs and result types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use repasse_shared::config::SettlementConfig;
use repasse_shared::types::{Currency, LandlordId};

use crate::contract::{LeaseContract, ReceiptMethod, YearMonth};

use super::charges::InstallmentInfo;
use super::figures::PeriodFigures;
use super::ledger::{ExtraLineLedger, LedgerScope};
use super::overlay::{ChargeKey, ChargeOverlay, ChargeState};

/// Kind of settlement being computed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementType {
    /// First, partial month of a lease.
    MoveIn,
    /// Regular full month.
    #[default]
    Monthly,
    /// Last, partial month of a lease ending early.
    Termination,
}

impl SettlementType {
    /// Returns true for settlements of a partial period.
    #[must_use]
    pub fn is_partial(self) -> bool {
        !matches!(self, Self::Monthly)
    }
}

/// How a move-in period is billed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProrationMethod {
    /// Prorate day-based charges by the days of the period.
    #[default]
    ProratedByDays,
    /// Bill the partial period plus the full following month.
    ProratedDaysPlusFullMonth,
}

/// Operator-entered settlement parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementRequest {
    /// Settlement type.
    #[serde(default)]
    pub settlement_type: SettlementType,
    /// Proration method; only consulted for move-in.
    #[serde(default)]
    pub proration_method: ProrationMethod,
    /// Reference month.
    pub reference_period: YearMonth,
    /// Tenant move-in date.
    #[serde(default)]
    pub move_in_date: Option<NaiveDate>,
    /// Lease termination date.
    #[serde(default)]
    pub termination_date: Option<NaiveDate>,
    /// Discount deducted from the landlord transfer.
    #[serde(default)]
    pub manual_discount: Decimal,
    /// Surcharge added to the invoice.
    #[serde(default)]
    pub manual_surcharge: Decimal,
    /// Overdue amount carried from earlier periods.
    #[serde(default)]
    pub carried_over_balance: Decimal,
    /// Free-text notes.
    #[serde(default)]
    pub notes: String,
}

impl SettlementRequest {
    /// A regular monthly settlement for `period`.
    #[must_use]
    pub fn monthly(period: YearMonth) -> Self {
        Self {
            settlement_type: SettlementType::Monthly,
            proration_method: ProrationMethod::default(),
            reference_period: period,
            move_in_date: None,
            termination_date: None,
            manual_discount: Decimal::ZERO,
            manual_surcharge: Decimal::ZERO,
            carried_over_balance: Decimal::ZERO,
            notes: String::new(),
        }
    }

    /// A move-in settlement starting on `date`.
    #[must_use]
    pub fn move_in(date: NaiveDate, method: ProrationMethod) -> Self {
        Self {
            settlement_type: SettlementType::MoveIn,
            proration_method: method,
            move_in_date: Some(date),
            ..Self::monthly(YearMonth::from_date(date))
        }
    }

    /// A termination settlement ending on `date`.
    #[must_use]
    pub fn termination(date: NaiveDate) -> Self {
        Self {
            settlement_type: SettlementType::Termination,
            termination_date: Some(date),
            ..Self::monthly(YearMonth::from_date(date))
        }
    }
}

/// Rates applied by the engine, as fractions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementRates {
    /// Early-termination penalty over remaining rents.
    pub penalty_rate: Decimal,
    /// Service fee over the penalty.
    pub service_fee_rate: Decimal,
    /// Anticipation surcharge over the monthly installment.
    pub anticipation_rate: Decimal,
}

impl Default for SettlementRates {
    fn default() -> Self {
        Self::from(&SettlementConfig::default())
    }
}

impl From<&SettlementConfig> for SettlementRates {
    fn from(config: &SettlementConfig) -> Self {
        Self {
            penalty_rate: config.penalty_rate,
            service_fee_rate: config.service_fee_rate,
            anticipation_rate: config.anticipation_rate,
        }
    }
}

/// Everything a computation reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementInputs {
    /// Contract being settled.
    pub contract: LeaseContract,
    /// Operator parameters.
    pub request: SettlementRequest,
    /// Charge overrides.
    #[serde(default)]
    pub overlay: ChargeOverlay,
    /// Tenant-facing extra lines.
    #[serde(default = "launches_ledger")]
    pub launches: ExtraLineLedger,
    /// Extra withheld lines.
    #[serde(default = "withholding_ledger")]
    pub withholding_extras: ExtraLineLedger,
    /// Period figures and their source.
    pub figures: PeriodFigures,
}

fn launches_ledger() -> ExtraLineLedger {
    ExtraLineLedger::new(LedgerScope::Launches)
}

fn withholding_ledger() -> ExtraLineLedger {
    ExtraLineLedger::new(LedgerScope::Withholding)
}

impl SettlementInputs {
    /// Fresh inputs with locally computed figures and empty ledgers.
    #[must_use]
    pub fn new(contract: LeaseContract, request: SettlementRequest) -> Self {
        let figures = PeriodFigures::local(&contract, &request);
        Self {
            contract,
            request,
            overlay: ChargeOverlay::new(),
            launches: launches_ledger(),
            withholding_extras: withholding_ledger(),
            figures,
        }
    }
}

/// Section of the audit breakdown a line belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakdownSection {
    /// Tenant invoice.
    Invoice,
    /// Termination penalty.
    Termination,
    /// Withheld by the management company.
    Withholding,
}

/// One contributing line of a settlement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakdownLine {
    /// Section.
    pub section: BreakdownSection,
    /// Charge key.
    pub key: ChargeKey,
    /// Display label.
    pub label: String,
    /// Amount before operator overrides.
    pub resolved: Decimal,
    /// Amount after operator overrides.
    pub effective: Decimal,
    /// Override state.
    pub state: ChargeState,
    /// Installment position for windowed charges.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installment: Option<InstallmentInfo>,
}

impl BreakdownLine {
    pub(crate) fn new(
        section: BreakdownSection,
        key: ChargeKey,
        resolved: Decimal,
        overlay: &ChargeOverlay,
    ) -> Self {
        Self {
            section,
            key,
            label: key.label().to_string(),
            resolved,
            effective: overlay.effective(key, resolved),
            state: overlay.state(key),
            installment: None,
        }
    }
}

/// Amount paid to one landlord.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LandlordTransfer {
    /// Landlord ID.
    pub landlord_id: LandlordId,
    /// Display name.
    pub name: String,
    /// Ownership percentage.
    pub percentage: Decimal,
    /// Primary flag.
    pub is_primary: bool,
    /// How the landlord is paid.
    pub receipt_method: ReceiptMethod,
    /// Amount transferred.
    pub amount: Decimal,
}

/// Outcome of one computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementResult {
    /// Settlement currency.
    pub currency: Currency,
    /// Settlement type.
    pub settlement_type: SettlementType,
    /// Reference period.
    pub reference_period: YearMonth,
    /// Figures used.
    pub figures: PeriodFigures,
    /// Fraction of the month billed for prorated charges.
    pub proportion: Decimal,
    /// Every contributing line.
    pub breakdown: Vec<BreakdownLine>,
    /// Sum of effective fixed charges.
    pub fixed_total: Decimal,
    /// Signed sum of launches.
    pub launches_total: Decimal,
    /// Effective early-payment bonus.
    pub early_payment_bonus: Decimal,
    /// Effective termination penalty.
    pub penalty: Decimal,
    /// Effective termination service fee.
    pub service_fee: Decimal,
    /// Overdue balance carried into this invoice.
    pub carried_over_balance: Decimal,
    /// Manual surcharge.
    pub manual_surcharge: Decimal,
    /// Amount the tenant pays.
    pub invoice_total: Decimal,
    /// Signed sum of withholding extras.
    pub withholding_extras_total: Decimal,
    /// Amount retained by the management company.
    pub withheld_total: Decimal,
    /// Manual discount.
    pub manual_discount: Decimal,
    /// Amount transferred to landlords.
    pub net_transfer: Decimal,
    /// Per-landlord transfers, in contract order.
    pub transfers: Vec<LandlordTransfer>,
}

impl SettlementResult {
    /// Breakdown lines of `section`.
    pub fn section(&self, section: BreakdownSection) -> impl Iterator<Item = &BreakdownLine> {
        self.breakdown.iter().filter(move |line| line.section == section)
    }

    /// Breakdown line for `key`, if it contributed.
    #[must_use]
    pub fn line(&self, key: ChargeKey) -> Option<&BreakdownLine> {
        self.breakdown.iter().find(|line| line.key == key)
    }
}
