//! Net-transfer split across the landlords of record.
//!
//! The split is equal per landlord; ownership percentages only decide which
//! landlord receives a single tie-break cent:
//! 1. Floor each share to the cent
//! 2. Hand the leftover cents to the earliest landlords in list order
//! 3. If the primary landlord owns more than some other landlord but ended
//!    on the floor, move one cent to it from the first landlord above floor
//!
//! Shares always sum exactly to the net transfer and never differ by more
//! than one cent.

use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use repasse_shared::types::round_cents;

use crate::contract::LandlordShare;

use super::types::LandlordTransfer;

/// One cent.
const CENT: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Splits settlement transfers across landlords.
pub struct LandlordDistributor;

impl LandlordDistributor {
    /// Splits `net_transfer` equally across `landlords`.
    ///
    /// Negative transfers are split the same way. No landlords yields an
    /// empty split.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use repasse_core::settlement::LandlordDistributor;
    ///
    /// let shares = LandlordDistributor::split(dec!(1000.01), &[false, false, false], &[
    ///     dec!(33.33),
    ///     dec!(33.33),
    ///     dec!(33.33),
    /// ]);
    /// assert_eq!(shares, vec![dec!(333.34), dec!(333.34), dec!(333.33)]);
    /// ```
    #[must_use]
    pub fn split(net_transfer: Decimal, primary: &[bool], percentages: &[Decimal]) -> Vec<Decimal> {
        let count = primary.len().min(percentages.len());
        if count == 0 {
            return vec![];
        }

        let total = round_cents(net_transfer);
        let count_dec = Decimal::from(count);
        let floor_share = (total / count_dec * Decimal::ONE_HUNDRED).floor() / Decimal::ONE_HUNDRED;
        let remainder_cents = ((total - floor_share * count_dec) * Decimal::ONE_HUNDRED)
            .round()
            .to_usize()
            .unwrap_or(0);

        let mut shares: Vec<Decimal> = (0..count)
            .map(|i| {
                if i < remainder_cents {
                    floor_share + CENT
                } else {
                    floor_share
                }
            })
            .collect();

        Self::apply_primary_bias(&mut shares, floor_share, &primary[..count], &percentages[..count]);
        shares
    }

    fn apply_primary_bias(
        shares: &mut [Decimal],
        floor_share: Decimal,
        primary: &[bool],
        percentages: &[Decimal],
    ) {
        let Some(primary_idx) = primary.iter().position(|is_primary| *is_primary) else {
            return;
        };
        if shares[primary_idx] != floor_share {
            return;
        }
        let outranks_someone = primary
            .iter()
            .zip(percentages)
            .any(|(is_primary, pct)| !is_primary && percentages[primary_idx] > *pct);
        if !outranks_someone {
            return;
        }
        let donor = primary
            .iter()
            .zip(shares.iter())
            .position(|(is_primary, share)| !is_primary && *share > floor_share);
        if let Some(donor_idx) = donor {
            shares[donor_idx] -= CENT;
            shares[primary_idx] += CENT;
        }
    }

    /// Splits `net_transfer` and pairs each share with its landlord.
    #[must_use]
    pub fn distribute(net_transfer: Decimal, landlords: &[LandlordShare]) -> Vec<LandlordTransfer> {
        let primary: Vec<bool> = landlords.iter().map(|l| l.is_primary).collect();
        let percentages: Vec<Decimal> = landlords.iter().map(|l| l.percentage).collect();
        Self::split(net_transfer, &primary, &percentages)
            .into_iter()
            .zip(landlords)
            .map(|(amount, landlord)| LandlordTransfer {
                landlord_id: landlord.landlord_id,
                name: landlord.name.clone(),
                percentage: landlord.percentage,
                is_primary: landlord.is_primary,
                receipt_method: landlord.receipt_method,
                amount,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn equal(count: usize) -> (Vec<bool>, Vec<Decimal>) {
        (vec![false; count], vec![dec!(100) / Decimal::from(count); count])
    }

    #[test]
    fn test_no_landlords() {
        assert!(LandlordDistributor::split(dec!(100), &[], &[]).is_empty());
        assert!(LandlordDistributor::distribute(dec!(100), &[]).is_empty());
    }

    #[test]
    fn test_single_landlord_takes_all() {
        let (primary, pct) = equal(1);
        assert_eq!(LandlordDistributor::split(dec!(1350), &primary, &pct), vec![dec!(1350)]);
    }

    #[test]
    fn test_remainder_goes_to_earliest() {
        let (primary, pct) = equal(3);
        assert_eq!(
            LandlordDistributor::split(dec!(1000.01), &primary, &pct),
            vec![dec!(333.34), dec!(333.34), dec!(333.33)]
        );
    }

    #[test]
    fn test_even_split_has_no_remainder() {
        let (primary, pct) = equal(4);
        assert_eq!(
            LandlordDistributor::split(dec!(1000), &primary, &pct),
            vec![dec!(250), dec!(250), dec!(250), dec!(250)]
        );
    }

    #[test]
    fn test_negative_transfer_is_split() {
        let (primary, pct) = equal(3);
        let shares = LandlordDistributor::split(dec!(-1000.01), &primary, &pct);
        assert_eq!(shares, vec![dec!(-333.33), dec!(-333.34), dec!(-333.34)]);
        assert_eq!(shares.iter().copied().sum::<Decimal>(), dec!(-1000.01));
    }

    #[test]
    fn test_primary_with_larger_share_takes_the_cent() {
        let shares = LandlordDistributor::split(
            dec!(1000.01),
            &[false, false, true],
            &[dec!(25), dec!(25), dec!(50)],
        );
        assert_eq!(shares, vec![dec!(333.33), dec!(333.34), dec!(333.34)]);
    }

    #[test]
    fn test_primary_without_larger_share_keeps_floor() {
        let shares = LandlordDistributor::split(
            dec!(1000.01),
            &[false, false, true],
            &[dec!(40), dec!(30), dec!(30)],
        );
        assert_eq!(shares, vec![dec!(333.34), dec!(333.34), dec!(333.33)]);
    }

    #[test]
    fn test_primary_bias_needs_a_donor() {
        let shares = LandlordDistributor::split(
            dec!(1000),
            &[false, true],
            &[dec!(30), dec!(70)],
        );
        assert_eq!(shares, vec![dec!(500), dec!(500)]);
    }

    #[test]
    fn test_primary_already_above_floor_is_untouched() {
        let shares = LandlordDistributor::split(
            dec!(1000.01),
            &[true, false, false],
            &[dec!(60), dec!(20), dec!(20)],
        );
        assert_eq!(shares, vec![dec!(333.34), dec!(333.34), dec!(333.33)]);
    }
}
