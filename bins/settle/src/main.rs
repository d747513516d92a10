//! Repasse offline settlement calculator.
//!
//! Reads a JSON scenario (contract, request, overrides and ledger lines)
//! and prints the computed settlement.

mod scenario;

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, ValueEnum};
use repasse_core::settlement::{
    SettlementEngine, SettlementRates, SettlementRecord, SettlementResult,
};
use repasse_shared::types::Money;
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::scenario::Scenario;

#[derive(Parser)]
#[command(name = "repasse-settle")]
#[command(about = "Compute a rent settlement from a scenario file", long_about = None)]
struct Cli {
    /// Scenario file (JSON)
    scenario: PathBuf,

    /// What to print
    #[arg(long, value_enum, default_value_t = Output::Result)]
    output: Output,

    /// Print compact JSON
    #[arg(long)]
    compact: bool,

    /// Termination penalty rate per remaining month (fraction of rent)
    #[arg(long)]
    penalty_rate: Option<Decimal>,

    /// Service fee rate over the penalty
    #[arg(long)]
    service_fee_rate: Option<Decimal>,

    /// Anticipation surcharge rate
    #[arg(long)]
    anticipation_rate: Option<Decimal>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Output {
    /// The computed settlement
    Result,
    /// The record that would be persisted
    Record,
    /// Invoice, withholding and transfer totals only
    Summary,
}

impl Cli {
    fn rates(&self) -> SettlementRates {
        let defaults = SettlementRates::default();
        SettlementRates {
            penalty_rate: self.penalty_rate.unwrap_or(defaults.penalty_rate),
            service_fee_rate: self.service_fee_rate.unwrap_or(defaults.service_fee_rate),
            anticipation_rate: self.anticipation_rate.unwrap_or(defaults.anticipation_rate),
        }
    }
}

/// Totals formatted for reading, e.g. `"BRL 1350.00"`.
fn summary(result: &SettlementResult) -> serde_json::Value {
    let money = |amount| Money::new(amount, result.currency).to_string();
    serde_json::json!({
        "invoice_total": money(result.invoice_total),
        "withheld_total": money(result.withheld_total),
        "net_transfer": money(result.net_transfer),
        "transfers": result
            .transfers
            .iter()
            .map(|t| serde_json::json!({ "name": t.name, "amount": money(t.amount) }))
            .collect::<Vec<_>>(),
    })
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "repasse=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let raw = fs::read_to_string(&cli.scenario)
        .with_context(|| format!("reading {}", cli.scenario.display()))?;
    let scenario: Scenario = serde_json::from_str(&raw)
        .with_context(|| format!("parsing {}", cli.scenario.display()))?;
    let inputs = scenario.into_inputs()?;
    debug!(contract = %inputs.contract.code, figures = ?inputs.figures.source, "Scenario loaded");

    let engine = SettlementEngine::new(cli.rates());
    let result = engine.compute(&inputs)?;
    info!(
        contract = %inputs.contract.code,
        invoice_total = %result.invoice_total,
        net_transfer = %result.net_transfer,
        "Settlement computed"
    );

    let value = match cli.output {
        Output::Result => serde_json::to_value(&result)?,
        Output::Record => serde_json::to_value(SettlementRecord::new(&inputs, &result, Utc::now()))?,
        Output::Summary => summary(&result),
    };
    let rendered = if cli.compact {
        serde_json::to_string(&value)?
    } else {
        serde_json::to_string_pretty(&value)?
    };
    println!("{rendered}");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use rust_decimal_macros::dec;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_rate_overrides() {
        let cli = Cli::parse_from(["repasse-settle", "s.json", "--penalty-rate", "0.25"]);
        let rates = cli.rates();
        assert_eq!(rates.penalty_rate, dec!(0.25));
        assert_eq!(rates.service_fee_rate, SettlementRates::default().service_fee_rate);
    }
}
