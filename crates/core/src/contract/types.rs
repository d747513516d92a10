//! Lease contract data types.
//!
//! The contract is owned by the contract registry and read-only here.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use repasse_shared::types::{ContractId, Currency, LandlordId};

use super::period::YearMonth;

/// How a landlord receives the transfer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReceiptMethod {
    /// Bank wire transfer.
    #[default]
    BankTransfer,
    /// Instant payment (PIX).
    Pix,
    /// Bank check.
    Check,
    /// Cash at the office.
    Cash,
}

/// A landlord of record and their ownership share.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LandlordShare {
    /// Landlord ID.
    pub landlord_id: LandlordId,
    /// Display name.
    pub name: String,
    /// Ownership percentage (expected, not enforced, to sum to 100).
    pub percentage: Decimal,
    /// Whether this landlord is the primary responsible party.
    #[serde(default)]
    pub is_primary: bool,
    /// How the landlord is paid.
    #[serde(default)]
    pub receipt_method: ReceiptMethod,
}

/// Billing window of an installment-based charge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallmentWindow {
    /// First billed date.
    pub start: NaiveDate,
    /// Last billed date.
    pub end: NaiveDate,
    /// Configured installment count; 0 means derive from the window.
    #[serde(default)]
    pub installments: u32,
}

impl InstallmentWindow {
    /// Returns true if `period` falls within the window at month granularity.
    #[must_use]
    pub fn contains(&self, period: YearMonth) -> bool {
        YearMonth::from_date(self.start) <= period && period <= YearMonth::from_date(self.end)
    }

    /// Total installments: the configured count, or the inclusive month count of the window.
    #[must_use]
    pub fn total_installments(&self) -> u32 {
        if self.installments > 0 {
            return self.installments;
        }
        let months =
            YearMonth::from_date(self.start).months_until(YearMonth::from_date(self.end)) + 1;
        u32::try_from(months.max(0)).unwrap_or(u32::MAX)
    }

    /// Installment number billed in `period`, clamped to `[1, total]`.
    #[must_use]
    pub fn current_installment(&self, period: YearMonth) -> u32 {
        let total = self.total_installments().max(1);
        let elapsed = YearMonth::from_date(self.start).months_until(period) + 1;
        u32::try_from(elapsed.clamp(1, i64::from(total))).unwrap_or(1)
    }
}

/// Monetary amounts configured per charge, with their billing windows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractCharges {
    /// Monthly condominium fee.
    pub condo_fee: Decimal,
    /// Building-insurance fund (FCI) monthly amount.
    pub fci: Decimal,
    /// Optional FCI billing window.
    pub fci_window: Option<InstallmentWindow>,
    /// Surety insurance installment.
    pub surety_insurance: Decimal,
    /// Surety insurance billing window.
    pub surety_insurance_window: Option<InstallmentWindow>,
    /// Fire insurance installment.
    pub fire_insurance: Decimal,
    /// Fire insurance billing window.
    pub fire_insurance_window: Option<InstallmentWindow>,
    /// Property tax installment.
    pub property_tax: Decimal,
    /// Property tax billing window.
    pub property_tax_window: Option<InstallmentWindow>,
}

/// Which charges the management company retains instead of passing on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetentionFlags {
    /// Retain the condo fee.
    pub condo_fee: bool,
    /// Retain the FCI.
    pub fci: bool,
    /// Retain the surety insurance.
    pub surety_insurance: bool,
    /// Retain the fire insurance.
    pub fire_insurance: bool,
    /// Retain the property tax.
    pub property_tax: bool,
}

/// Which charges the management company pays in advance (surcharged).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnticipationFlags {
    /// Anticipate the condo fee.
    pub condo_fee: bool,
    /// Anticipate the surety insurance.
    pub surety_insurance: bool,
    /// Anticipate the fire insurance.
    pub fire_insurance: bool,
}

/// A lease contract as supplied by the contract registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaseContract {
    /// Contract ID.
    pub id: ContractId,
    /// Human-facing contract code.
    pub code: String,
    /// Settlement currency.
    #[serde(default)]
    pub currency: Currency,
    /// Contract start date.
    pub start_date: NaiveDate,
    /// Contracted duration in months.
    pub duration_months: u32,
    /// Monthly rent.
    pub rent: Decimal,
    /// Administrative fee in percentage points (10 = 10%).
    #[serde(default)]
    pub admin_fee_percent: Decimal,
    /// Discount granted for payment before the due date.
    #[serde(default)]
    pub early_payment_bonus: Decimal,
    /// Wire-transfer fee charged per landlord beyond the first.
    #[serde(default)]
    pub transfer_fee: Decimal,
    /// Per-charge amounts and windows.
    #[serde(default)]
    pub charges: ContractCharges,
    /// Retention flags.
    #[serde(default)]
    pub retention: RetentionFlags,
    /// Anticipation flags.
    #[serde(default)]
    pub anticipation: AnticipationFlags,
    /// Landlords of record, in payout order.
    #[serde(default)]
    pub landlords: Vec<LandlordShare>,
}

impl LeaseContract {
    /// Number of landlords of record.
    #[must_use]
    pub fn landlord_count(&self) -> usize {
        self.landlords.len()
    }

    /// The primary responsible landlord, if flagged.
    #[must_use]
    pub fn primary_landlord(&self) -> Option<&LandlordShare> {
        self.landlords.iter().find(|l| l.is_primary)
    }

    /// First reference period the contract can be settled for.
    #[must_use]
    pub fn first_period(&self) -> YearMonth {
        YearMonth::from_date(self.start_date)
    }
}

/// Contract listing entry for settlement selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractSummary {
    /// Contract ID.
    pub id: ContractId,
    /// Human-facing contract code.
    pub code: String,
    /// Property address or label.
    #[serde(default)]
    pub property: String,
    /// Monthly rent.
    pub rent: Decimal,
    /// Contract start date.
    pub start_date: NaiveDate,
}
