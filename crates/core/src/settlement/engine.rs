//! The settlement computation.
//!
//! [`SettlementEngine::compute`] is the only path that produces totals. It
//! performs no I/O and reads nothing but its inputs, so computing the same
//! inputs twice always yields the same result.

use rust_decimal::Decimal;
use repasse_shared::types::round_cents;

use super::charges::ResolvedCharges;
use super::distribution::LandlordDistributor;
use super::error::SettlementError;
use super::overlay::ChargeKey;
use super::penalty::TerminationPenalty;
use super::proration::ProrationPlan;
use super::types::{
    BreakdownLine, BreakdownSection, SettlementInputs, SettlementRates, SettlementResult,
};
use super::validation::validate_request;
use super::withholding::{Withholding, WithholdingInput};

/// Settlement calculator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettlementEngine {
    rates: SettlementRates,
}

impl SettlementEngine {
    /// Creates an engine with the given rates.
    #[must_use]
    pub fn new(rates: SettlementRates) -> Self {
        Self { rates }
    }

    /// Rates applied by this engine.
    #[must_use]
    pub fn rates(&self) -> &SettlementRates {
        &self.rates
    }

    /// Computes invoice, withholding and landlord transfers.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the request is incomplete or
    /// inconsistent with the contract.
    pub fn compute(&self, inputs: &SettlementInputs) -> Result<SettlementResult, SettlementError> {
        let SettlementInputs {
            contract,
            request,
            overlay,
            launches,
            withholding_extras,
            figures,
        } = inputs;

        validate_request(contract, request)?;

        let charges = ResolvedCharges::resolve(contract, request.reference_period);
        let plan = ProrationPlan::new(
            request.settlement_type,
            request.proration_method,
            figures.period_days,
        );

        let mut invoice: Vec<BreakdownLine> = charges
            .iter()
            .filter(|charge| charge.configured || !charge.monthly_amount.is_zero())
            .map(|charge| {
                let billed = plan.apply(charge.key, charge.monthly_amount);
                let mut line =
                    BreakdownLine::new(BreakdownSection::Invoice, charge.key, billed, overlay);
                line.installment = charge.installment;
                line
            })
            .collect();
        let fixed_total: Decimal = invoice.iter().map(|line| line.effective).sum();

        let bonus = round_cents(contract.early_payment_bonus);
        let early_payment_bonus = overlay.effective(ChargeKey::EarlyPaymentBonus, bonus);
        if bonus > Decimal::ZERO {
            invoice.push(BreakdownLine::new(
                BreakdownSection::Invoice,
                ChargeKey::EarlyPaymentBonus,
                bonus,
                overlay,
            ));
        }

        let penalty = TerminationPenalty::compute(
            request.settlement_type,
            contract.rent,
            figures.remaining_months,
            &self.rates,
            overlay,
        );

        let withholding = Withholding::compute(&WithholdingInput {
            contract,
            charges: &charges,
            invoice: &invoice,
            early_payment_bonus,
            penalty: &penalty,
            extras: withholding_extras,
            rates: &self.rates,
            overlay,
        });

        let launches_total = launches.total();
        let invoice_total = round_cents(
            fixed_total + launches_total - early_payment_bonus
                + penalty.penalty
                + request.carried_over_balance
                + request.manual_surcharge,
        );
        let withheld_total = withholding.total;
        let net_transfer = round_cents(invoice_total - withheld_total - request.manual_discount);
        let transfers = LandlordDistributor::distribute(net_transfer, &contract.landlords);

        let mut breakdown = invoice;
        if penalty.resolved_penalty > Decimal::ZERO {
            breakdown.push(BreakdownLine::new(
                BreakdownSection::Termination,
                ChargeKey::TerminationPenalty,
                penalty.resolved_penalty,
                overlay,
            ));
        }
        breakdown.extend(withholding.lines);

        Ok(SettlementResult {
            currency: contract.currency,
            settlement_type: request.settlement_type,
            reference_period: request.reference_period,
            figures: *figures,
            proportion: plan.proportion(),
            breakdown,
            fixed_total,
            launches_total,
            early_payment_bonus,
            penalty: penalty.penalty,
            service_fee: penalty.service_fee,
            carried_over_balance: request.carried_over_balance,
            manual_surcharge: request.manual_surcharge,
            invoice_total,
            withholding_extras_total: withholding.extras_total,
            withheld_total,
            manual_discount: request.manual_discount,
            net_transfer,
            transfers,
        })
    }
}
