//! Property-based tests for the landlord distributor.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::distribution::LandlordDistributor;

/// Net transfers from -100,000.00 to 1,000,000.00.
fn net_transfer() -> impl Strategy<Value = Decimal> {
    (-10_000_000i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Landlord list: primary flags and whole percentages.
fn landlords() -> impl Strategy<Value = (Vec<bool>, Vec<Decimal>)> {
    (1usize..8).prop_flat_map(|n| {
        (
            prop::collection::vec(any::<bool>(), n),
            prop::collection::vec((1i64..100).prop_map(Decimal::from), n),
        )
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Shares always add back to the net transfer, to the cent.
    #[test]
    fn prop_split_is_exact(net in net_transfer(), (primary, percentages) in landlords()) {
        let shares = LandlordDistributor::split(net, &primary, &percentages);
        prop_assert_eq!(shares.len(), primary.len());
        prop_assert_eq!(shares.iter().copied().sum::<Decimal>(), net);
    }

    /// No two shares differ by more than one cent.
    #[test]
    fn prop_split_is_fair(net in net_transfer(), (primary, percentages) in landlords()) {
        let shares = LandlordDistributor::split(net, &primary, &percentages);
        let max = shares.iter().copied().max().unwrap_or_default();
        let min = shares.iter().copied().min().unwrap_or_default();
        prop_assert!(max - min <= Decimal::new(1, 2));
    }

    /// Without a primary landlord, extra cents go to the earliest entries.
    #[test]
    fn prop_remainder_favors_earliest(net in net_transfer(), n in 1usize..8) {
        let primary = vec![false; n];
        let percentages = vec![Decimal::ONE; n];
        let shares = LandlordDistributor::split(net, &primary, &percentages);
        prop_assert!(shares.windows(2).all(|pair| pair[0] >= pair[1]));
    }
}
