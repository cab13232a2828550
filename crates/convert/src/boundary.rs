//! Boundary interval calculator: scales a decoded binary64 magnitude and the
//! midpoints to its neighbors into a common decimal frame.
//!
//! The rounding interval of a value `m * 2^e` runs from halfway to the next
//! smaller representable value to halfway to the next larger one. Working at
//! four times the significand keeps both halfway points integral, including
//! at a binade boundary where the lower gap is a quarter step instead of a
//! half step. One wide multiply by a precomputed (inverse) power of five,
//! followed by a shift, lands all three quantities in the decimal frame; the
//! scaling is an overestimate, so trailing-zero knowledge about the exact
//! values is tracked separately where the digit selector needs it.

use crate::table;
use crate::wide::{self, WideArith};

const MANTISSA_BITS: u32 = 52;
const EXPONENT_BIAS: i32 = 1023;

/// The three decimal-scaled quantities bounding the rounding interval, plus
/// the exactness flags the digit selector consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ScaledInterval {
    /// Scaled midpoint to the next smaller representable value.
    pub lower: u64,
    /// The input itself, scaled.
    pub target: u64,
    /// Scaled midpoint to the next larger representable value.
    pub upper: u64,
    /// Power-of-ten frame the three values live in.
    pub exponent10: i32,
    /// `lower` has only zeros beyond the scaled digits.
    pub lower_exact: bool,
    /// `target` has only zeros beyond the scaled digits.
    pub target_exact: bool,
    /// Endpoints round back to the input: the binary significand is even, so
    /// nearest-even resolves a halfway tie toward it.
    pub closed: bool,
}

pub(crate) fn scaled_interval<W: WideArith>(
    ieee_mantissa: u64,
    ieee_exponent: u32,
) -> ScaledInterval {
    let (m2, e2) = if ieee_exponent == 0 {
        (ieee_mantissa, 1 - EXPONENT_BIAS - MANTISSA_BITS as i32 - 2)
    } else {
        (
            (1 << MANTISSA_BITS) | ieee_mantissa,
            ieee_exponent as i32 - EXPONENT_BIAS - MANTISSA_BITS as i32 - 2,
        )
    };
    let closed = m2 & 1 == 0;

    // input and midpoints at 4x scale. The gap below shrinks to a quarter
    // step when the mantissa field is empty (binade boundary), except at the
    // very bottom of the range where there is no closer neighbor below.
    let mv = 4 * m2;
    let lower_gap_is_half = ieee_mantissa != 0 || ieee_exponent <= 1;
    let mm_shift = u64::from(lower_gap_is_half);

    let mut lower_exact = false;
    let mut target_exact = false;
    let (lower, target, mut upper, exponent10);
    if e2 >= 0 {
        // 2^e2 == 10^q * 5^-q * 2^(e2-q): multiply by the inverse power of
        // five, keeping q low enough that the scaled values stay exact
        // overestimates with an error below one unit.
        let q = wide::log10_pow2(e2) - u32::from(e2 > 3);
        exponent10 = q as i32;
        let k = table::POW5_INV_BITCOUNT + wide::pow5_bits(q as i32) - 1;
        let shift = (-e2 + q as i32 + k as i32) as u32;
        let mul = table::POW5_INV_SPLIT[q as usize];
        target = wide::multiply_and_shift::<W>(mv, mul, shift);
        upper = wide::multiply_and_shift::<W>(mv + 2, mul, shift);
        lower = wide::multiply_and_shift::<W>(mv - 1 - mm_shift, mul, shift);

        // 10^q divides a value iff 5^q does (the 2^q part is guaranteed
        // here); only small q can possibly divide a 54-bit significand.
        if q <= 21 {
            if mv % 5 == 0 {
                target_exact = wide::multiple_of_power_of_5(mv, q);
            } else if closed {
                lower_exact = wide::multiple_of_power_of_5(mv - 1 - mm_shift, q);
            } else if wide::multiple_of_power_of_5(mv + 2, q) {
                // an inexact open upper bound may be safely tightened instead
                // of tracking its exactness through the strip loop
                upper -= 1;
            }
        }
    } else {
        // 2^e2 == 10^(e2+q) * 5^(-e2-q) * 2^-q: multiply by the remaining
        // positive power of five.
        let q = wide::log10_pow5(-e2) - u32::from(-e2 > 1);
        exponent10 = q as i32 + e2;
        let i = -e2 - q as i32;
        let k = wide::pow5_bits(i) as i32 - table::POW5_BITCOUNT as i32;
        let shift = (q as i32 - k) as u32;
        let mul = table::POW5_SPLIT[i as usize];
        target = wide::multiply_and_shift::<W>(mv, mul, shift);
        upper = wide::multiply_and_shift::<W>(mv + 2, mul, shift);
        lower = wide::multiply_and_shift::<W>(mv - 1 - mm_shift, mul, shift);

        if q <= 1 {
            // every value divides 2^0 and 2^1 divides mv == 4 * m2
            target_exact = true;
            if closed {
                lower_exact = lower_gap_is_half;
            } else {
                upper -= 1;
            }
        } else if q < 63 {
            target_exact = wide::multiple_of_power_of_2(mv, q);
        }
    }

    ScaledInterval {
        lower,
        target,
        upper,
        exponent10,
        lower_exact,
        target_exact,
        closed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wide::{NativeWide, PortableWide};

    fn unpack(bits: u64) -> (u64, u32) {
        (bits & ((1 << 52) - 1), (bits >> 52) as u32 & 0x7FF)
    }

    fn interval(bits: u64) -> ScaledInterval {
        let (mantissa, exponent) = unpack(bits);
        scaled_interval::<NativeWide>(mantissa, exponent)
    }

    #[test]
    fn scaling_of_exact_one() {
        // 1.0 scales to 10^18 with an asymmetric lower gap (binade boundary)
        let iv = interval(1.0f64.to_bits());
        assert_eq!(iv.target, 1_000_000_000_000_000_000);
        assert_eq!(iv.lower, 999_999_999_999_999_944);
        assert_eq!(iv.upper, 1_000_000_000_000_000_111);
        assert_eq!(iv.exponent10, -18);
        assert!(!iv.lower_exact);
        assert!(iv.target_exact);
        assert!(iv.closed);
    }

    #[test]
    fn scaling_of_inexact_tenth() {
        // 0.1 is not representable; no exactness survives the scaling
        let iv = interval(0.1f64.to_bits());
        assert_eq!(iv.target, 1_000_000_000_000_000_055);
        assert_eq!(iv.lower, 999_999_999_999_999_986);
        assert_eq!(iv.upper, 1_000_000_000_000_000_124);
        assert_eq!(iv.exponent10, -19);
        assert!(!iv.lower_exact);
        assert!(!iv.target_exact);
        assert!(iv.closed);
    }

    #[test]
    fn scaling_inside_a_binade() {
        // 3.0 has a populated mantissa field: symmetric half-step gaps
        let iv = interval(3.0f64.to_bits());
        assert_eq!(iv.target, 300_000_000_000_000_000);
        assert_eq!(iv.lower, 299_999_999_999_999_977);
        assert_eq!(iv.upper, 300_000_000_000_000_022);
        assert_eq!(iv.exponent10, -17);
        assert!(iv.target_exact);
        assert!(iv.closed);
    }

    #[test]
    fn odd_significand_opens_the_interval() {
        let iv = interval(9007199254740991.0f64.to_bits());
        assert_eq!(iv.target, 900_719_925_474_099_100);
        assert_eq!(iv.lower, 900_719_925_474_099_050);
        assert_eq!(iv.upper, 900_719_925_474_099_149);
        assert_eq!(iv.exponent10, -2);
        assert!(iv.target_exact);
        assert!(!iv.closed);
    }

    #[test]
    fn scaling_of_range_extremes() {
        // smallest positive subnormal
        let iv = interval(1);
        assert_eq!(iv.target, 49);
        assert_eq!(iv.lower, 24);
        assert_eq!(iv.upper, 74);
        assert_eq!(iv.exponent10, -325);
        assert!(!iv.lower_exact);
        assert!(!iv.target_exact);
        assert!(!iv.closed);

        // largest finite
        let iv = interval(f64::MAX.to_bits());
        assert_eq!(iv.target, 1_797_693_134_862_315_708);
        assert_eq!(iv.lower, 1_797_693_134_862_315_608);
        assert_eq!(iv.upper, 1_797_693_134_862_315_807);
        assert_eq!(iv.exponent10, 290);
        assert!(!iv.closed);
    }

    #[test]
    fn kernels_agree_on_intervals() {
        let cases = [
            1.0f64.to_bits(),
            0.1f64.to_bits(),
            123.456f64.to_bits(),
            f64::MAX.to_bits(),
            f64::MIN_POSITIVE.to_bits(),
            1,
            0x000F_FFFF_FFFF_FFFF,
            9007199254740991.0f64.to_bits(),
        ];
        for bits in cases {
            let (mantissa, exponent) = unpack(bits);
            assert_eq!(
                scaled_interval::<NativeWide>(mantissa, exponent),
                scaled_interval::<PortableWide>(mantissa, exponent),
                "bits={bits:#x}"
            );
        }
    }
}
