//! Amounts the management company retains from the tenant's payment.

use rust_decimal::Decimal;
use repasse_shared::types::round_cents;

use crate::contract::LeaseContract;

use super::charges::ResolvedCharges;
use super::ledger::ExtraLineLedger;
use super::overlay::{ChargeKey, ChargeOverlay};
use super::penalty::TerminationPenalty;
use super::types::{BreakdownLine, BreakdownSection, SettlementRates};

/// Everything the withholding calculation reads.
#[derive(Debug, Clone, Copy)]
pub struct WithholdingInput<'a> {
    /// Contract being settled.
    pub contract: &'a LeaseContract,
    /// Fixed charges resolved for the period.
    pub charges: &'a ResolvedCharges,
    /// Invoice lines after proration and overrides.
    pub invoice: &'a [BreakdownLine],
    /// Effective early-payment bonus.
    pub early_payment_bonus: Decimal,
    /// Termination penalty figures.
    pub penalty: &'a TerminationPenalty,
    /// Operator-entered withholding extras.
    pub extras: &'a ExtraLineLedger,
    /// Engine rates.
    pub rates: &'a SettlementRates,
    /// Charge overrides.
    pub overlay: &'a ChargeOverlay,
}

impl WithholdingInput<'_> {
    fn billed(&self, key: ChargeKey) -> Decimal {
        self.invoice
            .iter()
            .find(|line| line.key == key)
            .map_or(Decimal::ZERO, |line| line.effective)
    }
}

/// Withheld lines and their total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Withholding {
    /// Contributing lines, including overridden ones.
    pub lines: Vec<BreakdownLine>,
    /// Signed sum of the withholding extras.
    pub extras_total: Decimal,
    /// Amount withheld.
    pub total: Decimal,
}

impl Withholding {
    /// Computes every withheld line.
    #[must_use]
    pub fn compute(input: &WithholdingInput<'_>) -> Self {
        let contract = input.contract;
        let overlay = input.overlay;
        let line = |key: ChargeKey, resolved: Decimal| {
            BreakdownLine::new(BreakdownSection::Withholding, key, resolved, overlay)
        };
        let mut lines = Vec::new();

        let retention = &contract.retention;
        for (retained, charge, key) in [
            (retention.condo_fee, ChargeKey::CondoFee, ChargeKey::RetainedCondoFee),
            (retention.fci, ChargeKey::Fci, ChargeKey::RetainedFci),
            (
                retention.surety_insurance,
                ChargeKey::SuretyInsurance,
                ChargeKey::RetainedSuretyInsurance,
            ),
            (
                retention.fire_insurance,
                ChargeKey::FireInsurance,
                ChargeKey::RetainedFireInsurance,
            ),
            (
                retention.property_tax,
                ChargeKey::PropertyTax,
                ChargeKey::RetainedPropertyTax,
            ),
        ] {
            let billed = input.billed(charge);
            if retained && billed > Decimal::ZERO {
                lines.push(line(key, billed));
            }
        }

        if contract.admin_fee_percent > Decimal::ZERO {
            let base = (input.billed(ChargeKey::Rent) - input.early_payment_bonus).max(Decimal::ZERO);
            let fee = round_cents(base * contract.admin_fee_percent / Decimal::ONE_HUNDRED);
            lines.push(line(ChargeKey::AdminFee, fee));
        }

        let extra_landlords = contract.landlord_count().saturating_sub(1);
        if contract.transfer_fee > Decimal::ZERO && extra_landlords > 0 {
            let fee = round_cents(contract.transfer_fee * Decimal::from(extra_landlords));
            lines.push(line(ChargeKey::TransferFee, fee));
        }

        let anticipation = &contract.anticipation;
        for (anticipated, charge, key) in [
            (
                anticipation.condo_fee,
                ChargeKey::CondoFee,
                ChargeKey::CondoFeeAnticipation,
            ),
            (
                anticipation.surety_insurance,
                ChargeKey::SuretyInsurance,
                ChargeKey::SuretyInsuranceAnticipation,
            ),
            (
                anticipation.fire_insurance,
                ChargeKey::FireInsurance,
                ChargeKey::FireInsuranceAnticipation,
            ),
        ] {
            if anticipated {
                let surcharge =
                    round_cents(input.rates.anticipation_rate * input.charges.monthly_amount(charge));
                lines.push(line(key, surcharge));
            }
        }

        if input.penalty.resolved_service_fee > Decimal::ZERO {
            lines.push(line(
                ChargeKey::TerminationServiceFee,
                input.penalty.resolved_service_fee,
            ));
        }

        let extras_total = input.extras.total();
        let total = round_cents(lines.iter().map(|l| l.effective).sum::<Decimal>() + extras_total);

        Self {
            lines,
            extras_total,
            total,
        }
    }
}
