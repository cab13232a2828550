//! Shortest round-trippable decimal representation of a binary64 magnitude.
//!
//! [`to_decimal`] maps a decoded, finite, non-zero significand/exponent pair
//! to the decimal `(mantissa, exponent)` pair with the fewest digits that
//! parses back (round-to-nearest-even) to the exact same bits. Sign handling,
//! zero/infinity/NaN dispatch and rendering live with the callers
//! (`fdec_bits`, `fdec_fmt`).

mod boundary;
mod shortest;
mod table;
pub mod wide;

/// A decimal floating-point value: exactly `mantissa * 10^exponent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Decimal64 {
    pub mantissa: u64,
    pub exponent: i32,
}

impl Decimal64 {
    /// Decimal digit count of the mantissa. The mantissa of a conversion
    /// result never exceeds 17 digits.
    pub fn digit_count(&self) -> u32 {
        debug_assert!(self.mantissa < 100_000_000_000_000_000);
        let mut count = 1;
        let mut bound = 10;
        while self.mantissa >= bound {
            count += 1;
            if count == 17 {
                break;
            }
            bound *= 10;
        }
        count
    }
}

impl std::fmt::Display for Decimal64 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}e{}", self.mantissa, self.exponent)
    }
}

/// Convert a decoded binary64 magnitude to its shortest decimal form.
///
/// `ieee_mantissa` and `ieee_exponent` are the raw mantissa and biased
/// exponent fields. The pair must denote a finite, non-zero magnitude;
/// zero, infinity and NaN patterns must be filtered by the caller.
pub fn to_decimal(ieee_mantissa: u64, ieee_exponent: u32) -> Decimal64 {
    to_decimal_with::<wide::DefaultWide>(ieee_mantissa, ieee_exponent)
}

/// [`to_decimal`] pinned to a specific arithmetic kernel. Every kernel
/// produces bit-identical results; this entry point exists so tests and
/// tooling can cross-check them.
pub fn to_decimal_with<W: wide::WideArith>(ieee_mantissa: u64, ieee_exponent: u32) -> Decimal64 {
    debug_assert!(ieee_mantissa < 1 << 52);
    debug_assert!(ieee_exponent < 0x7FF);
    debug_assert!(ieee_mantissa != 0 || ieee_exponent != 0);
    let interval = boundary::scaled_interval::<W>(ieee_mantissa, ieee_exponent);
    shortest::shortest::<W>(interval)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digit_count_boundaries() {
        let dec = |mantissa| Decimal64 {
            mantissa,
            exponent: 0,
        };
        assert_eq!(dec(0).digit_count(), 1);
        assert_eq!(dec(9).digit_count(), 1);
        assert_eq!(dec(10).digit_count(), 2);
        let mut bound = 10;
        for digits in 2..17 {
            assert_eq!(dec(bound - 1).digit_count(), digits - 1);
            assert_eq!(dec(bound).digit_count(), digits);
            bound *= 10;
        }
        assert_eq!(dec(99_999_999_999_999_999).digit_count(), 17);
    }
}
