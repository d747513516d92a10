//! Scenario files for offline settlement runs.

use repasse_core::contract::LeaseContract;
use repasse_core::settlement::{
    ChargeOverlay, ExtraLine, LedgerError, LedgerScope, PeriodFigures, SettlementInputs,
    SettlementRequest,
};
use serde::Deserialize;

/// A settlement scenario as read from disk.
///
/// Without `period_days` and `remaining_months` the figures are computed
/// locally from the request dates, as the engine does when the periodic
/// calculation service is unreachable.
#[derive(Debug, Deserialize)]
pub struct Scenario {
    /// Contract being settled.
    pub contract: LeaseContract,
    /// Operator parameters.
    pub request: SettlementRequest,
    /// Charge overrides.
    #[serde(default)]
    pub overlay: ChargeOverlay,
    /// Launch and withholding lines; each goes to the ledger of its kind.
    #[serde(default)]
    pub lines: Vec<ExtraLine>,
    /// Quoted period days.
    #[serde(default)]
    pub period_days: Option<u32>,
    /// Quoted remaining contract months.
    #[serde(default)]
    pub remaining_months: Option<u32>,
}

impl Scenario {
    /// Builds engine inputs, validating every ledger line.
    pub fn into_inputs(self) -> Result<SettlementInputs, LedgerError> {
        let mut inputs = SettlementInputs::new(self.contract, self.request);
        inputs.overlay = self.overlay;

        if self.period_days.is_some() || self.remaining_months.is_some() {
            let local = inputs.figures;
            inputs.figures = PeriodFigures::stored(
                self.period_days.unwrap_or(local.period_days),
                self.remaining_months.unwrap_or(local.remaining_months),
            );
        }

        for line in self.lines {
            let ledger = match line.kind.scope() {
                LedgerScope::Launches => &mut inputs.launches,
                LedgerScope::Withholding => &mut inputs.withholding_extras,
            };
            ledger.append(line)?;
        }
        Ok(inputs)
    }
}
