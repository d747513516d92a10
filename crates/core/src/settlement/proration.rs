//! Day-based proration over a 30-day reference month.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use repasse_shared::types::round_cents;

use crate::contract::YearMonth;

use super::overlay::ChargeKey;
use super::types::{ProrationMethod, SettlementType};

/// Length of the reference month used for every proration.
pub const REFERENCE_MONTH_DAYS: u32 = 30;

/// Days billed for a move-in on `date`: through the end of its month, inclusive.
#[must_use]
pub fn move_in_days(date: NaiveDate) -> u32 {
    let last = YearMonth::from_date(date).last_day();
    inclusive_days(date, last)
}

/// Days billed for a termination on `date`: from the later of the month start
/// and the contract start, inclusive.
#[must_use]
pub fn termination_days(contract_start: NaiveDate, date: NaiveDate) -> u32 {
    let from = YearMonth::from_date(date).first_day().max(contract_start);
    inclusive_days(from, date)
}

fn inclusive_days(from: NaiveDate, to: NaiveDate) -> u32 {
    let days = (to - from).num_days() + 1;
    u32::try_from(days.clamp(0, i64::from(REFERENCE_MONTH_DAYS))).unwrap_or(0)
}

/// Proration rules for one settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProrationPlan {
    settlement_type: SettlementType,
    method: ProrationMethod,
    period_days: u32,
}

impl ProrationPlan {
    /// Creates a plan. Quoted days are taken as given, even past the reference month.
    #[must_use]
    pub fn new(settlement_type: SettlementType, method: ProrationMethod, period_days: u32) -> Self {
        Self {
            settlement_type,
            method,
            period_days,
        }
    }

    /// Days used for proration.
    #[must_use]
    pub fn period_days(&self) -> u32 {
        self.period_days
    }

    /// `period_days / 30` for partial periods, one for monthly settlements.
    #[must_use]
    pub fn proportion(&self) -> Decimal {
        if self.settlement_type.is_partial() {
            Decimal::from(self.period_days) / Decimal::from(REFERENCE_MONTH_DAYS)
        } else {
            Decimal::ONE
        }
    }

    /// Returns true if `key` is billed by days under this plan.
    #[must_use]
    pub fn prorates(&self, key: ChargeKey) -> bool {
        let by_days = match self.settlement_type {
            SettlementType::Monthly => false,
            SettlementType::MoveIn => self.method == ProrationMethod::ProratedByDays,
            SettlementType::Termination => true,
        };
        by_days
            && matches!(
                key,
                ChargeKey::Rent | ChargeKey::CondoFee | ChargeKey::Fci | ChargeKey::PropertyTax
            )
    }

    /// Amount billed for `key` given its monthly amount, rounded to cents.
    #[must_use]
    pub fn apply(&self, key: ChargeKey, monthly_amount: Decimal) -> Decimal {
        if self.prorates(key) {
            round_cents(
                monthly_amount * Decimal::from(self.period_days)
                    / Decimal::from(REFERENCE_MONTH_DAYS),
            )
        } else {
            round_cents(monthly_amount)
        }
    }
}
