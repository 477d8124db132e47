//! Trade fee arithmetic.
//!
//! Fees are carved off the gross value side of every trade: floor division
//! for each share, remainder to the net, so `platform + beneficiary + net`
//! always reconstructs the gross exactly.

use slipway_types::constants::BPS_DENOMINATOR;
use slipway_types::{FeeConfig, SlipwayError, SlipwayResult};

/// Exact decomposition of a gross value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FeeSplit {
    pub platform: u128,
    pub beneficiary: u128,
    pub net: u128,
}

impl FeeSplit {
    pub fn gross(&self) -> u128 {
        self.platform + self.beneficiary + self.net
    }
}

fn share(gross: u128, bps: u16) -> SlipwayResult<u128> {
    gross
        .checked_mul(u128::from(bps))
        .ok_or(SlipwayError::MathOverflow)
        .map(|scaled| scaled / BPS_DENOMINATOR)
}

/// Split `gross` into platform share, beneficiary share, and net.
pub fn split(gross: u128, fees: &FeeConfig) -> SlipwayResult<FeeSplit> {
    let platform = share(gross, fees.platform_bps)?;
    let beneficiary = share(gross, fees.beneficiary_bps)?;
    Ok(FeeSplit {
        platform,
        beneficiary,
        net: gross - platform - beneficiary,
    })
}

/// Smallest practical gross whose net share covers `net`. Used by terminal
/// buys to charge exactly what the remaining curve inventory costs.
pub fn gross_up(net: u128, fees: &FeeConfig) -> SlipwayResult<u128> {
    let keep = BPS_DENOMINATOR - fees.total_bps();
    if keep == 0 {
        return Err(SlipwayError::FeeRatioTooLarge);
    }
    let scaled = net
        .checked_mul(BPS_DENOMINATOR)
        .ok_or(SlipwayError::MathOverflow)?;
    // Ceiling division; floor-rounded fee shares can only leave more net.
    Ok(scaled.div_ceil(keep))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn fees(platform_bps: u16, beneficiary_bps: u16) -> FeeConfig {
        FeeConfig {
            platform_bps,
            beneficiary_bps,
        }
    }

    #[test]
    fn known_split_vector() {
        let s = split(10_000_000_000_000_000, &fees(250, 450)).unwrap();
        assert_eq!(s.platform, 250_000_000_000_000);
        assert_eq!(s.beneficiary, 450_000_000_000_000);
        assert_eq!(s.net, 9_300_000_000_000_000);
    }

    #[test]
    fn gross_up_covers_a_terminal_fill() {
        let need = 944_495_621_007_769_028u128;
        let gross = gross_up(need, &fees(100, 100)).unwrap();
        assert_eq!(gross, 963_771_041_844_662_274);
        let s = split(gross, &fees(100, 100)).unwrap();
        assert_eq!(s.platform, 9_637_710_418_446_622);
        assert_eq!(s.beneficiary, 9_637_710_418_446_622);
        assert!(s.net >= need);
        assert_eq!(s.net - need, 2);
    }

    #[test]
    fn zero_fee_is_identity() {
        let s = split(123_456, &fees(0, 0)).unwrap();
        assert_eq!(s.net, 123_456);
        assert_eq!(gross_up(123_456, &fees(0, 0)).unwrap(), 123_456);
    }

    proptest! {
        #[test]
        fn split_conserves_value(
            gross in 0u128..10_000_000_000_000_000_000_000,
            p in 0u16..=1000,
            b in 0u16..=1000,
        ) {
            let s = split(gross, &fees(p, b)).unwrap();
            prop_assert_eq!(s.gross(), gross);
        }

        #[test]
        fn gross_up_is_sufficient(
            net in 0u128..10_000_000_000_000_000_000_000,
            p in 0u16..=1000,
            b in 0u16..=1000,
        ) {
            let f = fees(p, b);
            let gross = gross_up(net, &f).unwrap();
            prop_assert!(split(gross, &f).unwrap().net >= net);
        }
    }
}
