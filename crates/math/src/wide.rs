//! 512-bit unsigned arithmetic.
//!
//! The curve's cubic terms reach ~2^270 and overflow [`U256`], so the hot
//! path widens through this fixed-size limb type. Only the operations the
//! curve needs are implemented: full 256x256 multiplication, add/sub with
//! carry, and long division by a 256-bit divisor with explicit rounding.

use ethnum::U256;

/// Rounding direction for integer division.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rounding {
    /// Truncate toward zero.
    Down,
    /// Round away from zero when a remainder exists.
    Up,
}

/// 512-bit unsigned integer, eight 64-bit limbs, little-endian.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct U512([u64; 8]);

fn limbs(x: U256) -> [u64; 4] {
    let (hi, lo) = x.into_words();
    [
        lo as u64,
        (lo >> 64) as u64,
        hi as u64,
        (hi >> 64) as u64,
    ]
}

impl U512 {
    pub const ZERO: U512 = U512([0; 8]);
    pub const ONE: U512 = U512([1, 0, 0, 0, 0, 0, 0, 0]);

    pub fn from_u256(x: U256) -> U512 {
        let w = limbs(x);
        U512([w[0], w[1], w[2], w[3], 0, 0, 0, 0])
    }

    /// Narrow back to 256 bits, `None` if the high half is populated.
    pub fn to_u256(self) -> Option<U256> {
        if self.0[4..].iter().any(|&w| w != 0) {
            return None;
        }
        let lo = u128::from(self.0[0]) | (u128::from(self.0[1]) << 64);
        let hi = u128::from(self.0[2]) | (u128::from(self.0[3]) << 64);
        Some(U256::from_words(hi, lo))
    }

    /// Full-width product of two 256-bit values. Never overflows.
    pub fn full_mul(a: U256, b: U256) -> U512 {
        let a = limbs(a);
        let b = limbs(b);
        let mut out = [0u64; 8];
        for i in 0..4 {
            let mut carry: u64 = 0;
            for j in 0..4 {
                let acc = u128::from(out[i + j])
                    + u128::from(a[i]) * u128::from(b[j])
                    + u128::from(carry);
                out[i + j] = acc as u64;
                carry = (acc >> 64) as u64;
            }
            out[i + 4] = carry;
        }
        U512(out)
    }

    pub fn checked_add(self, rhs: U512) -> Option<U512> {
        let mut out = [0u64; 8];
        let mut carry = false;
        for i in 0..8 {
            let (sum, c1) = self.0[i].overflowing_add(rhs.0[i]);
            let (sum, c2) = sum.overflowing_add(u64::from(carry));
            out[i] = sum;
            carry = c1 || c2;
        }
        if carry {
            None
        } else {
            Some(U512(out))
        }
    }

    pub fn checked_sub(self, rhs: U512) -> Option<U512> {
        let mut out = [0u64; 8];
        let mut borrow = false;
        for i in 0..8 {
            let (diff, b1) = self.0[i].overflowing_sub(rhs.0[i]);
            let (diff, b2) = diff.overflowing_sub(u64::from(borrow));
            out[i] = diff;
            borrow = b1 || b2;
        }
        if borrow {
            None
        } else {
            Some(U512(out))
        }
    }

    fn bit(&self, i: usize) -> bool {
        (self.0[i / 64] >> (i % 64)) & 1 == 1
    }

    fn with_bit(mut self, i: usize) -> U512 {
        self.0[i / 64] |= 1 << (i % 64);
        self
    }

    /// Index of the highest set bit plus one; zero for zero.
    fn bits(&self) -> usize {
        for i in (0..8).rev() {
            if self.0[i] != 0 {
                return (i + 1) * 64 - self.0[i].leading_zeros() as usize;
            }
        }
        0
    }

    fn shl1(self) -> U512 {
        let mut out = [0u64; 8];
        let mut carry = 0u64;
        for i in 0..8 {
            out[i] = (self.0[i] << 1) | carry;
            carry = self.0[i] >> 63;
        }
        U512(out)
    }

    /// Restoring long division by a 256-bit divisor. `None` on a zero
    /// divisor. The remainder always fits 256 bits.
    pub fn div_rem(self, divisor: U256) -> Option<(U512, U256)> {
        if divisor == U256::ZERO {
            return None;
        }
        let d = U512::from_u256(divisor);
        let mut quotient = U512::ZERO;
        let mut rem = U512::ZERO;
        for i in (0..self.bits()).rev() {
            rem = rem.shl1();
            if self.bit(i) {
                rem.0[0] |= 1;
            }
            if rem >= d {
                if let Some(next) = rem.checked_sub(d) {
                    rem = next;
                    quotient = quotient.with_bit(i);
                }
            }
        }
        let rem = rem.to_u256()?;
        Some((quotient, rem))
    }

    /// Divide by a 256-bit value with explicit rounding. `None` on a zero
    /// divisor or on quotient overflow when rounding up.
    pub fn div_u256(self, divisor: U256, rounding: Rounding) -> Option<U512> {
        let (q, r) = self.div_rem(divisor)?;
        match rounding {
            Rounding::Down => Some(q),
            Rounding::Up if r == U256::ZERO => Some(q),
            Rounding::Up => q.checked_add(U512::ONE),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&w| w == 0)
    }
}

impl PartialOrd for U512 {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for U512 {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        for i in (0..8).rev() {
            match self.0[i].cmp(&other.0[i]) {
                std::cmp::Ordering::Equal => continue,
                ord => return ord,
            }
        }
        std::cmp::Ordering::Equal
    }
}

impl From<u128> for U512 {
    fn from(x: u128) -> Self {
        U512::from_u256(U256::from(x))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_mul_matches_narrow_products() {
        let a = U256::from(u128::MAX);
        let b = U256::from(u128::MAX);
        // (2^128 - 1)^2 = 2^256 - 2^129 + 1, still fits in 256 bits.
        let wide = U512::full_mul(a, b);
        assert_eq!(wide.to_u256(), Some(a * b));

        let big = U256::from_words(1, 0); // 2^128
        let wide = U512::full_mul(big, big); // 2^256
        assert_eq!(wide.to_u256(), None);
        assert_eq!(wide, U512([0, 0, 0, 0, 1, 0, 0, 0]));
    }

    #[test]
    fn div_rem_round_trips() {
        let n = U512::full_mul(U256::from_words(7, 13), U256::from(99_999_999_999u128));
        let d = U256::from(1_000_003u128);
        let (q, r) = n.div_rem(d).unwrap();
        let back = U512::full_mul(q.to_u256().unwrap(), d)
            .checked_add(U512::from_u256(r))
            .unwrap();
        assert_eq!(back, n);
        assert!(r < d);
    }

    #[test]
    fn rounding_up_adds_one_iff_remainder() {
        let n = U512::from(10u128);
        let exact = n.div_u256(U256::from(5u8), Rounding::Up).unwrap();
        assert_eq!(exact.to_u256(), Some(U256::from(2u8)));
        let up = n.div_u256(U256::from(3u8), Rounding::Up).unwrap();
        assert_eq!(up.to_u256(), Some(U256::from(4u8)));
        let down = n.div_u256(U256::from(3u8), Rounding::Down).unwrap();
        assert_eq!(down.to_u256(), Some(U256::from(3u8)));
    }

    #[test]
    fn zero_divisor_is_rejected() {
        assert!(U512::from(1u128).div_rem(U256::ZERO).is_none());
    }

    #[test]
    fn ordering_compares_high_limbs_first() {
        let small = U512::from(u128::MAX);
        let large = U512::full_mul(U256::from_words(1, 0), U256::from_words(1, 0));
        assert!(small < large);
        assert!(large > small);
        assert_eq!(small.cmp(&small), std::cmp::Ordering::Equal);
    }

    #[test]
    fn checked_sub_detects_underflow() {
        assert!(U512::ZERO.checked_sub(U512::ONE).is_none());
        assert_eq!(
            U512::ONE.checked_sub(U512::ONE),
            Some(U512::ZERO)
        );
    }
}
