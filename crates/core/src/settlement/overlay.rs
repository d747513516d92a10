//! Per-session charge overrides.
//!
//! Every charge line the operator can act on is named by a [`ChargeKey`].
//! Its [`ChargeState`] is `Active`, `Disabled` (reversible) or `Deleted`
//! (permanent for the session). All downstream sums go through
//! [`ChargeOverlay::effective`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Stable identifier of a charge line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChargeKey {
    /// Monthly rent.
    Rent,
    /// Condominium fee.
    CondoFee,
    /// Building-insurance fund.
    Fci,
    /// Surety insurance.
    SuretyInsurance,
    /// Fire insurance.
    FireInsurance,
    /// Property tax.
    PropertyTax,
    /// Administrative fee.
    AdminFee,
    /// Wire-transfer fee.
    TransferFee,
    /// Early-payment bonus.
    EarlyPaymentBonus,
    /// Early-termination penalty.
    TerminationPenalty,
    /// Service fee over the termination penalty.
    TerminationServiceFee,
    /// Retained condominium fee.
    RetainedCondoFee,
    /// Retained building-insurance fund.
    RetainedFci,
    /// Retained surety insurance.
    RetainedSuretyInsurance,
    /// Retained fire insurance.
    RetainedFireInsurance,
    /// Retained property tax.
    RetainedPropertyTax,
    /// Condo fee anticipation surcharge.
    CondoFeeAnticipation,
    /// Surety insurance anticipation surcharge.
    SuretyInsuranceAnticipation,
    /// Fire insurance anticipation surcharge.
    FireInsuranceAnticipation,
}

impl ChargeKey {
    /// Every charge key, in display order.
    pub const ALL: [Self; 19] = [
        Self::Rent,
        Self::CondoFee,
        Self::Fci,
        Self::SuretyInsurance,
        Self::FireInsurance,
        Self::PropertyTax,
        Self::AdminFee,
        Self::TransferFee,
        Self::EarlyPaymentBonus,
        Self::TerminationPenalty,
        Self::TerminationServiceFee,
        Self::RetainedCondoFee,
        Self::RetainedFci,
        Self::RetainedSuretyInsurance,
        Self::RetainedFireInsurance,
        Self::RetainedPropertyTax,
        Self::CondoFeeAnticipation,
        Self::SuretyInsuranceAnticipation,
        Self::FireInsuranceAnticipation,
    ];

    /// Returns the string representation of the key.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rent => "rent",
            Self::CondoFee => "condo_fee",
            Self::Fci => "fci",
            Self::SuretyInsurance => "surety_insurance",
            Self::FireInsurance => "fire_insurance",
            Self::PropertyTax => "property_tax",
            Self::AdminFee => "admin_fee",
            Self::TransferFee => "transfer_fee",
            Self::EarlyPaymentBonus => "early_payment_bonus",
            Self::TerminationPenalty => "termination_penalty",
            Self::TerminationServiceFee => "termination_service_fee",
            Self::RetainedCondoFee => "retained_condo_fee",
            Self::RetainedFci => "retained_fci",
            Self::RetainedSuretyInsurance => "retained_surety_insurance",
            Self::RetainedFireInsurance => "retained_fire_insurance",
            Self::RetainedPropertyTax => "retained_property_tax",
            Self::CondoFeeAnticipation => "condo_fee_anticipation",
            Self::SuretyInsuranceAnticipation => "surety_insurance_anticipation",
            Self::FireInsuranceAnticipation => "fire_insurance_anticipation",
        }
    }

    /// Parses a key from its string representation.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.as_str() == s)
    }

    /// Human-readable label for audit display.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Rent => "Rent",
            Self::CondoFee => "Condo fee",
            Self::Fci => "Building insurance fund (FCI)",
            Self::SuretyInsurance => "Surety insurance",
            Self::FireInsurance => "Fire insurance",
            Self::PropertyTax => "Property tax",
            Self::AdminFee => "Administrative fee",
            Self::TransferFee => "Wire-transfer fee",
            Self::EarlyPaymentBonus => "Early-payment bonus",
            Self::TerminationPenalty => "Termination penalty",
            Self::TerminationServiceFee => "Termination service fee",
            Self::RetainedCondoFee => "Retained condo fee",
            Self::RetainedFci => "Retained FCI",
            Self::RetainedSuretyInsurance => "Retained surety insurance",
            Self::RetainedFireInsurance => "Retained fire insurance",
            Self::RetainedPropertyTax => "Retained property tax",
            Self::CondoFeeAnticipation => "Condo fee anticipation",
            Self::SuretyInsuranceAnticipation => "Surety insurance anticipation",
            Self::FireInsuranceAnticipation => "Fire insurance anticipation",
        }
    }
}

impl fmt::Display for ChargeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Operator override state of a charge line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChargeState {
    /// Line contributes its resolved amount.
    #[default]
    Active,
    /// Line temporarily switched off.
    Disabled,
    /// Line removed for the rest of the session.
    Deleted,
}

impl ChargeState {
    /// Returns true if the line contributes its amount.
    #[must_use]
    pub fn is_active(self) -> bool {
        self == Self::Active
    }

    /// Returns true if the line can no longer change state.
    #[must_use]
    pub fn is_final(self) -> bool {
        self == Self::Deleted
    }
}

/// Charge states of one settlement session.
///
/// Keys never touched are `Active`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChargeOverlay {
    states: BTreeMap<ChargeKey, ChargeState>,
}

impl ChargeOverlay {
    /// Creates an overlay with every line active.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state of `key`.
    #[must_use]
    pub fn state(&self, key: ChargeKey) -> ChargeState {
        self.states.get(&key).copied().unwrap_or_default()
    }

    /// Returns true if `key` contributes its amount.
    #[must_use]
    pub fn is_active(&self, key: ChargeKey) -> bool {
        self.state(key).is_active()
    }

    /// Applies the override to a resolved amount.
    ///
    /// Deleted and disabled lines contribute zero.
    #[must_use]
    pub fn effective(&self, key: ChargeKey, amount: Decimal) -> Decimal {
        match self.state(key) {
            ChargeState::Deleted | ChargeState::Disabled => Decimal::ZERO,
            ChargeState::Active => amount,
        }
    }

    /// Flips a line between active and disabled. Deleted lines stay deleted.
    pub fn toggle(&mut self, key: ChargeKey) -> ChargeState {
        match self.state(key) {
            ChargeState::Active => self.set(key, ChargeState::Disabled),
            ChargeState::Disabled => self.set(key, ChargeState::Active),
            ChargeState::Deleted => ChargeState::Deleted,
        }
    }

    /// Disables a line. Deleted lines stay deleted.
    pub fn disable(&mut self, key: ChargeKey) -> ChargeState {
        if self.state(key).is_final() {
            return ChargeState::Deleted;
        }
        self.set(key, ChargeState::Disabled)
    }

    /// Re-enables a disabled line. Deleted lines stay deleted.
    pub fn enable(&mut self, key: ChargeKey) -> ChargeState {
        if self.state(key).is_final() {
            return ChargeState::Deleted;
        }
        self.set(key, ChargeState::Active)
    }

    /// Deletes a line for the rest of the session.
    ///
    /// Returns true if the line was not already deleted.
    pub fn delete(&mut self, key: ChargeKey) -> bool {
        let was_deleted = self.state(key).is_final();
        self.states.insert(key, ChargeState::Deleted);
        !was_deleted
    }

    /// Keys currently deleted, in key order.
    pub fn deleted_keys(&self) -> impl Iterator<Item = ChargeKey> + '_ {
        self.states
            .iter()
            .filter(|(_, state)| state.is_final())
            .map(|(key, _)| *key)
    }

    /// Keys with a non-default state.
    pub fn overridden(&self) -> impl Iterator<Item = (ChargeKey, ChargeState)> + '_ {
        self.states
            .iter()
            .filter(|(_, state)| !state.is_active())
            .map(|(key, state)| (*key, *state))
    }

    fn set(&mut self, key: ChargeKey, state: ChargeState) -> ChargeState {
        if state.is_active() {
            self.states.remove(&key);
        } else {
            self.states.insert(key, state);
        }
        state
    }
}
