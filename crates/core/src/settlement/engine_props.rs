//! Property-based tests for the settlement engine.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use repasse_shared::types::{ContractId, Currency, LandlordId};

use crate::contract::{
    AnticipationFlags, ContractCharges, LandlordShare, LeaseContract, ReceiptMethod,
    RetentionFlags, YearMonth,
};
use crate::ports::PeriodQuote;

use super::engine::SettlementEngine;
use super::figures::PeriodFigures;
use super::overlay::{ChargeKey, ChargeState};
use super::types::{ProrationMethod, SettlementInputs, SettlementRequest, SettlementType};

fn cents(range: std::ops::Range<i64>) -> impl Strategy<Value = Decimal> {
    range.prop_map(|c| Decimal::new(c, 2))
}

fn contract_strategy() -> impl Strategy<Value = LeaseContract> {
    (
        cents(50_000..1_000_000),
        cents(0..200_000),
        cents(0..20_000),
        0i64..20,
        any::<bool>(),
        1usize..4,
    )
        .prop_map(|(rent, condo_fee, fci, admin, retain_condo, landlords)| LeaseContract {
            id: ContractId::new(),
            code: "LOC-PROP".to_string(),
            currency: Currency::Brl,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            duration_months: 36,
            rent,
            admin_fee_percent: Decimal::from(admin),
            early_payment_bonus: Decimal::ZERO,
            transfer_fee: Decimal::new(850, 2),
            charges: ContractCharges {
                condo_fee,
                fci,
                ..Default::default()
            },
            retention: RetentionFlags {
                condo_fee: retain_condo,
                ..Default::default()
            },
            anticipation: AnticipationFlags {
                condo_fee: true,
                ..Default::default()
            },
            landlords: (0..landlords)
                .map(|i| LandlordShare {
                    landlord_id: LandlordId::new(),
                    name: format!("Landlord {i}"),
                    percentage: Decimal::from(100) / Decimal::from(landlords),
                    is_primary: i == 0,
                    receipt_method: ReceiptMethod::Pix,
                })
                .collect(),
        })
}

fn settlement_type_strategy() -> impl Strategy<Value = SettlementType> {
    prop_oneof![
        Just(SettlementType::MoveIn),
        Just(SettlementType::Monthly),
        Just(SettlementType::Termination),
    ]
}

fn method_strategy() -> impl Strategy<Value = ProrationMethod> {
    prop_oneof![
        Just(ProrationMethod::ProratedByDays),
        Just(ProrationMethod::ProratedDaysPlusFullMonth),
    ]
}

fn charge_key_strategy() -> impl Strategy<Value = ChargeKey> {
    prop::sample::select(ChargeKey::ALL.to_vec())
}

fn inputs(
    contract: LeaseContract,
    settlement_type: SettlementType,
    method: ProrationMethod,
    day: u32,
    period_days: u32,
    remaining_months: u32,
) -> SettlementInputs {
    let date = NaiveDate::from_ymd_opt(2026, 6, day).unwrap();
    let request = match settlement_type {
        SettlementType::MoveIn => SettlementRequest::move_in(date, method),
        SettlementType::Monthly => SettlementRequest::monthly(YearMonth::from_date(date)),
        SettlementType::Termination => SettlementRequest::termination(date),
    };
    let mut inputs = SettlementInputs::new(contract, request);
    inputs.request.proration_method = method;
    inputs.figures = PeriodFigures::quoted(&PeriodQuote {
        period_days,
        remaining_months,
        ..Default::default()
    });
    inputs
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Computing the same inputs twice yields identical results.
    #[test]
    fn prop_compute_is_idempotent(
        contract in contract_strategy(),
        settlement_type in settlement_type_strategy(),
        method in method_strategy(),
        day in 1u32..29,
        period_days in 1u32..31,
        remaining in 0u32..24,
    ) {
        let inputs = inputs(contract, settlement_type, method, day, period_days, remaining);
        let engine = SettlementEngine::default();
        let first = engine.compute(&inputs).unwrap();
        let second = engine.compute(&inputs).unwrap();
        prop_assert_eq!(first, second);
    }

    /// Monthly settlements bill full amounts whatever the period days.
    #[test]
    fn prop_monthly_is_never_prorated(
        contract in contract_strategy(),
        method in method_strategy(),
        period_days in 1u32..31,
    ) {
        let rent = contract.rent;
        let inputs = inputs(contract, SettlementType::Monthly, method, 15, period_days, 0);
        let result = SettlementEngine::default().compute(&inputs).unwrap();
        prop_assert_eq!(result.proportion, Decimal::ONE);
        prop_assert_eq!(result.line(ChargeKey::Rent).unwrap().effective, rent);
    }

    /// A deleted key contributes zero no matter how often it is toggled afterwards.
    #[test]
    fn prop_deleted_lines_contribute_nothing(
        contract in contract_strategy(),
        settlement_type in settlement_type_strategy(),
        key in charge_key_strategy(),
        toggles in 0usize..5,
        remaining in 0u32..24,
    ) {
        let mut inputs = inputs(
            contract,
            settlement_type,
            ProrationMethod::ProratedByDays,
            10,
            20,
            remaining,
        );
        inputs.overlay.delete(key);
        for _ in 0..toggles {
            inputs.overlay.toggle(key);
        }
        let result = SettlementEngine::default().compute(&inputs).unwrap();
        if let Some(line) = result.line(key) {
            prop_assert_eq!(line.state, ChargeState::Deleted);
            prop_assert_eq!(line.effective, Decimal::ZERO);
        }
    }

    /// The service fee is 20% of the penalty, and both are zero outside termination.
    #[test]
    fn prop_service_fee_follows_penalty(
        contract in contract_strategy(),
        settlement_type in settlement_type_strategy(),
        remaining in 0u32..24,
    ) {
        let inputs = inputs(
            contract,
            settlement_type,
            ProrationMethod::ProratedByDays,
            10,
            20,
            remaining,
        );
        let result = SettlementEngine::default().compute(&inputs).unwrap();
        if settlement_type == SettlementType::Termination {
            prop_assert_eq!(
                result.service_fee,
                (result.penalty * Decimal::new(20, 2)).round_dp(2)
            );
        } else {
            prop_assert_eq!(result.penalty, Decimal::ZERO);
            prop_assert_eq!(result.service_fee, Decimal::ZERO);
        }
    }

    /// Landlord transfers always add up to the net transfer.
    #[test]
    fn prop_transfers_sum_to_net(
        contract in contract_strategy(),
        settlement_type in settlement_type_strategy(),
        remaining in 0u32..24,
    ) {
        let inputs = inputs(
            contract,
            settlement_type,
            ProrationMethod::ProratedByDays,
            10,
            20,
            remaining,
        );
        let result = SettlementEngine::default().compute(&inputs).unwrap();
        let sum: Decimal = result.transfers.iter().map(|t| t.amount).sum();
        prop_assert_eq!(sum, result.net_transfer);
    }
}
