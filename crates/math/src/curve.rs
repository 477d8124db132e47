//! Quadratic bonding-curve pricing.
//!
//! The marginal price at cumulative sales `s` (base units) is
//! `3 * (s + B)^2 / K` wei per base unit, so the cost of a purchase is the
//! exact cubic difference
//!
//! ```text
//! cost(s, a) = ceil( ((s + a + B)^3 - (s + B)^3) / K )
//! ```
//!
//! with the mirror-image floor for sell proceeds. `B` is a virtual offset
//! that sets the opening price; the constants below open the curve at
//! exactly 1.4 gwei per whole token and price the full 650M-token capacity
//! at ~5.783 native units.
//!
//! All arithmetic is exact: cubes are carried in 512 bits and divisions
//! round in the house's favor, so the engine can never pay out more than it
//! took in.

use ethnum::U256;
use slipway_types::{SlipwayError, SlipwayResult};

use crate::wide::{Rounding, U512};

/// Virtual sold offset, base units: 233_842_833_569_031 * 10^12.
const B: u128 = 233_842_833_569_031_000_000_000_000;

/// Price denominator `A` = 390_589_077_225_667 * 10^29.
const A: U256 = U256::from_words(114_783, 276_800_280_620_348_283_472_435_159_349_384_445_952);

/// Cubic denominator `K` = 3 * A * 10^18.
const K: U256 = U256::from_words(
    344_351_440_328_746_314_324_864,
    26_539_624_085_449_945_368_872_753_478_569_558_016,
);

fn to_u128(x: U256) -> SlipwayResult<u128> {
    let (hi, lo) = x.into_words();
    if hi != 0 {
        return Err(SlipwayError::MathOverflow);
    }
    Ok(lo)
}

fn cube(x: u128) -> U512 {
    // x < 2^128, so x^2 < 2^256 and the final widen never truncates.
    let sq = U256::from(x) * U256::from(x);
    U512::full_mul(sq, U256::from(x))
}

/// Largest `x` with `x^3 <= target`, `None` if it exceeds `u128`.
fn cbrt_floor(target: &U512) -> Option<u128> {
    let cap = cube(u128::MAX);
    if cap < *target {
        return None;
    }
    if cap == *target {
        return Some(u128::MAX);
    }
    // cube(lo) <= target < cube(hi) throughout; `hi - lo` stays in range.
    let mut lo = 0u128;
    let mut hi = u128::MAX;
    while hi - lo > 1 {
        let mid = lo + (hi - lo) / 2;
        if cube(mid) <= *target {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    Some(lo)
}

/// Wei required to buy `amount` base units when `sold` are already out.
/// Rounds up.
pub fn cost(sold: u128, amount: u128) -> SlipwayResult<u128> {
    if amount == 0 {
        return Ok(0);
    }
    let start = sold.checked_add(B).ok_or(SlipwayError::MathOverflow)?;
    let end = start.checked_add(amount).ok_or(SlipwayError::MathOverflow)?;
    let diff = cube(end)
        .checked_sub(cube(start))
        .ok_or(SlipwayError::MathOverflow)?;
    let q = diff
        .div_u256(K, Rounding::Up)
        .ok_or(SlipwayError::MathOverflow)?;
    to_u128(q.to_u256().ok_or(SlipwayError::MathOverflow)?)
}

/// Wei paid out for selling `amount` base units back into a curve that has
/// `sold` out. Rounds down.
pub fn proceeds(sold: u128, amount: u128) -> SlipwayResult<u128> {
    if amount == 0 {
        return Ok(0);
    }
    let remaining = sold.checked_sub(amount).ok_or(SlipwayError::MathUnderflow)?;
    let end = sold.checked_add(B).ok_or(SlipwayError::MathOverflow)?;
    let start = remaining + B;
    let diff = cube(end)
        .checked_sub(cube(start))
        .ok_or(SlipwayError::MathOverflow)?;
    let q = diff
        .div_u256(K, Rounding::Down)
        .ok_or(SlipwayError::MathOverflow)?;
    to_u128(q.to_u256().ok_or(SlipwayError::MathOverflow)?)
}

/// Largest purchasable amount of base units for `value` wei at cumulative
/// sales `sold`. Inverse of [`cost`]: re-costing the result reproduces the
/// smallest charge not exceeding `value`.
pub fn amount_for_value(sold: u128, value: u128) -> SlipwayResult<u128> {
    if value == 0 {
        return Ok(0);
    }
    let start = sold.checked_add(B).ok_or(SlipwayError::MathOverflow)?;
    let paid = U512::full_mul(U256::from(value), K);
    let target = cube(start)
        .checked_add(paid)
        .ok_or(SlipwayError::MathOverflow)?;
    let root = cbrt_floor(&target).ok_or(SlipwayError::MathOverflow)?;
    // root^3 <= start^3 + value*K guarantees root >= start.
    Ok(root - start)
}

/// Marginal price in wei per whole token at cumulative sales `sold`:
/// `(sold + B)^2 / A`, rounded down.
pub fn price_per_token(sold: u128) -> SlipwayResult<u128> {
    let s = sold.checked_add(B).ok_or(SlipwayError::MathOverflow)?;
    let sq = U256::from(s) * U256::from(s);
    to_u128(sq / A)
}
