//! Fixed charge resolution for a reference period.
//!
//! Rent and condo fee always apply. FCI applies unless it has a billing
//! window that excludes the period. Surety insurance, fire insurance and
//! property tax only bill inside their window; configured without one they
//! are reported as configured but resolve to zero.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::contract::{InstallmentWindow, LeaseContract, YearMonth};

use super::overlay::ChargeKey;

/// The fixed charges of a contract, in invoice order.
pub const FIXED_CHARGES: [ChargeKey; 6] = [
    ChargeKey::Rent,
    ChargeKey::CondoFee,
    ChargeKey::Fci,
    ChargeKey::SuretyInsurance,
    ChargeKey::FireInsurance,
    ChargeKey::PropertyTax,
];

/// Position of the billed installment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallmentInfo {
    /// Installment billed in the period (1-based).
    pub current: u32,
    /// Total installments.
    pub total: u32,
}

/// A fixed charge resolved for one period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedCharge {
    /// Charge key.
    pub key: ChargeKey,
    /// Amount configured on the contract.
    pub configured_amount: Decimal,
    /// Whether the contract configures this charge at all.
    pub configured: bool,
    /// Whether the charge bills in the period.
    pub billable: bool,
    /// Monthly amount billed in the period, before proration.
    pub monthly_amount: Decimal,
    /// Installment position, for windowed charges inside their window.
    pub installment: Option<InstallmentInfo>,
}

/// How a charge behaves when no window is configured.
#[derive(Clone, Copy)]
enum Gating {
    /// Bills every month unless a window excludes the period.
    Always,
    /// Bills only inside a configured window.
    WindowRequired,
}

impl ResolvedCharge {
    fn resolve(
        key: ChargeKey,
        amount: Decimal,
        window: Option<&InstallmentWindow>,
        gating: Gating,
        period: YearMonth,
    ) -> Self {
        let configured = amount > Decimal::ZERO;
        let (billable, installment) = match (window, gating) {
            (Some(window), _) if window.contains(period) => (
                true,
                Some(InstallmentInfo {
                    current: window.current_installment(period),
                    total: window.total_installments(),
                }),
            ),
            (Some(_), _) | (None, Gating::WindowRequired) => (false, None),
            (None, Gating::Always) => (true, None),
        };

        Self {
            key,
            configured_amount: amount,
            configured,
            billable,
            monthly_amount: if billable { amount } else { Decimal::ZERO },
            installment,
        }
    }
}

/// The six fixed charges of a contract resolved for one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedCharges {
    charges: Vec<ResolvedCharge>,
}

impl ResolvedCharges {
    /// Resolves every fixed charge of `contract` for `period`.
    #[must_use]
    pub fn resolve(contract: &LeaseContract, period: YearMonth) -> Self {
        let c = &contract.charges;
        let charges = vec![
            ResolvedCharge::resolve(ChargeKey::Rent, contract.rent, None, Gating::Always, period),
            ResolvedCharge::resolve(ChargeKey::CondoFee, c.condo_fee, None, Gating::Always, period),
            ResolvedCharge::resolve(
                ChargeKey::Fci,
                c.fci,
                c.fci_window.as_ref(),
                Gating::Always,
                period,
            ),
            ResolvedCharge::resolve(
                ChargeKey::SuretyInsurance,
                c.surety_insurance,
                c.surety_insurance_window.as_ref(),
                Gating::WindowRequired,
                period,
            ),
            ResolvedCharge::resolve(
                ChargeKey::FireInsurance,
                c.fire_insurance,
                c.fire_insurance_window.as_ref(),
                Gating::WindowRequired,
                period,
            ),
            ResolvedCharge::resolve(
                ChargeKey::PropertyTax,
                c.property_tax,
                c.property_tax_window.as_ref(),
                Gating::WindowRequired,
                period,
            ),
        ];
        Self { charges }
    }

    /// Resolved charge for `key`, if it is a fixed charge.
    #[must_use]
    pub fn get(&self, key: ChargeKey) -> Option<&ResolvedCharge> {
        self.charges.iter().find(|charge| charge.key == key)
    }

    /// Monthly amount billed for `key`; zero for non-fixed keys.
    #[must_use]
    pub fn monthly_amount(&self, key: ChargeKey) -> Decimal {
        self.get(key).map_or(Decimal::ZERO, |charge| charge.monthly_amount)
    }

    /// Resolved charges in invoice order.
    pub fn iter(&self) -> impl Iterator<Item = &ResolvedCharge> {
        self.charges.iter()
    }
}
