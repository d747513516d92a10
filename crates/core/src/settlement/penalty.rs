//! Early-termination penalty and its service fee.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use repasse_shared::types::round_cents;

use super::overlay::{ChargeKey, ChargeOverlay};
use super::types::{SettlementRates, SettlementType};

/// Penalty figures of a termination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminationPenalty {
    /// Penalty before operator overrides.
    pub resolved_penalty: Decimal,
    /// Penalty billed to the tenant.
    pub penalty: Decimal,
    /// Service fee before its own override.
    pub resolved_service_fee: Decimal,
    /// Service fee withheld by the management company.
    pub service_fee: Decimal,
}

impl TerminationPenalty {
    /// Computes the penalty over the full contract rent.
    ///
    /// Zero for anything other than a termination. The service fee is taken
    /// over the effective penalty, so a disabled or deleted penalty also
    /// zeroes the fee.
    #[must_use]
    pub fn compute(
        settlement_type: SettlementType,
        rent: Decimal,
        remaining_months: u32,
        rates: &SettlementRates,
        overlay: &ChargeOverlay,
    ) -> Self {
        if settlement_type != SettlementType::Termination || remaining_months == 0 {
            return Self::default();
        }

        let resolved_penalty =
            round_cents(rates.penalty_rate * rent * Decimal::from(remaining_months));
        let penalty = overlay.effective(ChargeKey::TerminationPenalty, resolved_penalty);
        let resolved_service_fee = round_cents(rates.service_fee_rate * penalty);
        let service_fee = overlay.effective(ChargeKey::TerminationServiceFee, resolved_service_fee);

        Self {
            resolved_penalty,
            penalty,
            resolved_service_fee,
            service_fee,
        }
    }
}
