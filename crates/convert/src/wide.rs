//! Extended-precision arithmetic kernel: exact 64x64 -> 128-bit multiply,
//! 128-bit right shift, and fast truncating division by the small constants
//! the digit-stripping loops need.
//!
//! Call sites go through [`WideArith`] so the portable and native paths stay
//! interchangeable; the two must agree bit-for-bit on every input.

pub trait WideArith {
    /// Exact 64x64 -> 128-bit unsigned product as `(low, high)` halves.
    fn multiply_wide(a: u64, b: u64) -> (u64, u64);
    fn div5(x: u64) -> u64;
    fn div10(x: u64) -> u64;
    fn div100(x: u64) -> u64;
    fn div1e8(x: u64) -> u64;
}

/// Kernel backed by `u128` arithmetic and machine division.
pub struct NativeWide;

/// Kernel restricted to 64-bit operations: the multiply decomposes both
/// operands into 32-bit halves and sums four partial products, the divisions
/// are multiply-high by a fixed reciprocal. For targets where 64-bit division
/// lowers to a libcall.
pub struct PortableWide;

#[cfg(not(feature = "portable-wide"))]
pub type DefaultWide = NativeWide;
#[cfg(feature = "portable-wide")]
pub type DefaultWide = PortableWide;

impl WideArith for NativeWide {
    fn multiply_wide(a: u64, b: u64) -> (u64, u64) {
        let p = u128::from(a) * u128::from(b);
        (p as u64, (p >> 64) as u64)
    }

    fn div5(x: u64) -> u64 {
        x / 5
    }

    fn div10(x: u64) -> u64 {
        x / 10
    }

    fn div100(x: u64) -> u64 {
        x / 100
    }

    fn div1e8(x: u64) -> u64 {
        x / 100_000_000
    }
}

fn multiply_high_portable(a: u64, b: u64) -> u64 {
    PortableWide::multiply_wide(a, b).1
}

impl WideArith for PortableWide {
    fn multiply_wide(a: u64, b: u64) -> (u64, u64) {
        let a_lo = a as u32;
        let a_hi = (a >> 32) as u32;
        let b_lo = b as u32;
        let b_hi = (b >> 32) as u32;

        let b00 = u64::from(a_lo) * u64::from(b_lo);
        let b01 = u64::from(a_lo) * u64::from(b_hi);
        let b10 = u64::from(a_hi) * u64::from(b_lo);
        let b11 = u64::from(a_hi) * u64::from(b_hi);

        let b00_lo = b00 as u32;
        let b00_hi = (b00 >> 32) as u32;

        let mid1 = b10 + u64::from(b00_hi);
        let mid1_lo = mid1 as u32;
        let mid1_hi = (mid1 >> 32) as u32;

        let mid2 = b01 + u64::from(mid1_lo);
        let mid2_lo = mid2 as u32;
        let mid2_hi = (mid2 >> 32) as u32;

        let p_hi = b11 + u64::from(mid1_hi) + u64::from(mid2_hi);
        let p_lo = (u64::from(mid2_lo) << 32) | u64::from(b00_lo);
        (p_lo, p_hi)
    }

    fn div5(x: u64) -> u64 {
        multiply_high_portable(x, 0xCCCC_CCCC_CCCC_CCCD) >> 2
    }

    fn div10(x: u64) -> u64 {
        multiply_high_portable(x, 0xCCCC_CCCC_CCCC_CCCD) >> 3
    }

    fn div100(x: u64) -> u64 {
        multiply_high_portable(x >> 2, 0x28F5_C28F_5C28_F5C3) >> 2
    }

    fn div1e8(x: u64) -> u64 {
        multiply_high_portable(x, 0xABCC_7711_8461_CEFD) >> 26
    }
}

/// Bits `[dist, dist + 64)` of the 128-bit value `(high << 64) | low`.
///
/// `dist` outside `(0, 64)` is a caller bug, not a recoverable condition.
pub fn shift_right_128(low: u64, high: u64, dist: u32) -> u64 {
    debug_assert!(dist > 0);
    debug_assert!(dist < 64);
    (high << (64 - dist)) | (low >> dist)
}

/// `(m * mul) >> shift` where `mul` is a 128-bit `(low, high)` pair and the
/// result is known to fit in 64 bits. `shift` must be in `(64, 128)`.
pub fn multiply_and_shift<W: WideArith>(m: u64, mul: (u64, u64), shift: u32) -> u64 {
    debug_assert!(shift > 64);
    debug_assert!(shift < 128);
    let (low1, high1) = W::multiply_wide(m, mul.1);
    let (_, high0) = W::multiply_wide(m, mul.0);
    let sum = high0.wrapping_add(low1);
    let carry = u64::from(sum < high0);
    shift_right_128(sum, high1 + carry, shift - 64)
}

/// Multiplicity of 5 in `value`. The multiply-by-inverse trick: an exact
/// multiple of 5 times the modular inverse of 5 lands in `[0, u64::MAX / 5]`,
/// anything else lands above it.
pub fn pow5_factor(mut value: u64) -> u32 {
    debug_assert!(value != 0);
    const INV_5: u64 = 0xCCCC_CCCC_CCCC_CCCD; // inverse of 5 mod 2^64
    const CAP: u64 = u64::MAX / 5;
    let mut count = 0;
    loop {
        value = value.wrapping_mul(INV_5);
        if value > CAP {
            break;
        }
        count += 1;
    }
    count
}

pub fn multiple_of_power_of_5(value: u64, p: u32) -> bool {
    pow5_factor(value) >= p
}

pub fn multiple_of_power_of_2(value: u64, p: u32) -> bool {
    debug_assert!(p < 64);
    value & ((1 << p) - 1) == 0
}

/// `floor(log10(2^e))` for `0 <= e <= 1650`.
pub fn log10_pow2(e: i32) -> u32 {
    debug_assert!(e >= 0);
    debug_assert!(e <= 1650);
    ((e as u32) * 78913) >> 18
}

/// `floor(log10(5^e))` for `0 <= e <= 2620`.
pub fn log10_pow5(e: i32) -> u32 {
    debug_assert!(e >= 0);
    debug_assert!(e <= 2620);
    ((e as u32) * 732_923) >> 20
}

/// Number of bits in `5^e`, i.e. `floor(log2(5^e)) + 1`, for `0 <= e <= 3528`.
pub fn pow5_bits(e: i32) -> u32 {
    debug_assert!(e >= 0);
    debug_assert!(e <= 3528);
    (((e as u32) * 1_217_359) >> 19) + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    const EDGES: &[u64] = &[
        0,
        1,
        2,
        3,
        4,
        5,
        9,
        10,
        11,
        99,
        100,
        101,
        99_999_999,
        100_000_000,
        100_000_001,
        (1 << 32) - 1,
        1 << 32,
        (1 << 32) + 1,
        1 << 52,
        (1 << 55) - 1,
        u64::MAX / 2,
        u64::MAX - 1,
        u64::MAX,
    ];

    // A split-mix style generator; good enough to sweep operand space.
    fn mix(state: &mut u64) -> u64 {
        *state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = *state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    #[test]
    fn portable_multiply_matches_native() {
        let mut state = 0;
        for _ in 0..100_000 {
            let a = mix(&mut state);
            let b = mix(&mut state);
            assert_eq!(
                PortableWide::multiply_wide(a, b),
                NativeWide::multiply_wide(a, b),
                "a={a:#x} b={b:#x}"
            );
        }
        for &a in EDGES {
            for &b in EDGES {
                assert_eq!(
                    PortableWide::multiply_wide(a, b),
                    NativeWide::multiply_wide(a, b),
                    "a={a:#x} b={b:#x}"
                );
            }
        }
    }

    #[test]
    fn reciprocal_division_matches_native() {
        let mut state = 1;
        for _ in 0..100_000 {
            let x = mix(&mut state);
            assert_eq!(PortableWide::div5(x), NativeWide::div5(x), "x={x}");
            assert_eq!(PortableWide::div10(x), NativeWide::div10(x), "x={x}");
            assert_eq!(PortableWide::div100(x), NativeWide::div100(x), "x={x}");
            assert_eq!(PortableWide::div1e8(x), NativeWide::div1e8(x), "x={x}");
        }
        for &x in EDGES {
            assert_eq!(PortableWide::div5(x), x / 5);
            assert_eq!(PortableWide::div10(x), x / 10);
            assert_eq!(PortableWide::div100(x), x / 100);
            assert_eq!(PortableWide::div1e8(x), x / 100_000_000);
        }
    }

    #[test]
    fn shift_right_composes_halves() {
        let mut state = 2;
        for _ in 0..10_000 {
            let low = mix(&mut state);
            let high = mix(&mut state);
            let wide = (u128::from(high) << 64) | u128::from(low);
            for dist in 1..64 {
                assert_eq!(
                    shift_right_128(low, high, dist),
                    (wide >> dist) as u64,
                    "low={low:#x} high={high:#x} dist={dist}"
                );
            }
        }
    }

    #[test]
    fn pow5_factor_counts_exactly() {
        assert_eq!(pow5_factor(1), 0);
        assert_eq!(pow5_factor(5), 1);
        assert_eq!(pow5_factor(25), 2);
        assert_eq!(pow5_factor(125), 3);
        assert_eq!(pow5_factor(2), 0);
        assert_eq!(pow5_factor(3 * 5 * 5), 2);
        assert_eq!(pow5_factor(5u64.pow(27)), 27);
        assert_eq!(pow5_factor(2 * 5u64.pow(20)), 20);
        // 2^64 - 1 is 3 * 5 * 17 * 257 * 641 * 65537 * 6700417
        assert_eq!(pow5_factor(u64::MAX), 1);
        let mut state = 3;
        for _ in 0..10_000 {
            let v = mix(&mut state);
            if v == 0 {
                continue;
            }
            let mut expected = 0;
            let mut rest = v;
            while rest % 5 == 0 {
                rest /= 5;
                expected += 1;
            }
            assert_eq!(pow5_factor(v), expected, "v={v}");
        }
    }

    // little-endian decimal digit vector, multiplied in place
    fn mul_digits(digits: &mut Vec<u8>, by: u8) {
        let mut carry = 0;
        for d in digits.iter_mut() {
            let v = *d * by + carry;
            *d = v % 10;
            carry = v / 10;
        }
        while carry > 0 {
            digits.push(carry % 10);
            carry /= 10;
        }
    }

    #[test]
    fn log_estimators_match_reference() {
        // floor(log10(2^e)) == digit count of 2^e, minus one
        let mut digits = vec![1u8];
        for e in 0..=1650 {
            assert_eq!(log10_pow2(e) as usize, digits.len() - 1, "e={e}");
            mul_digits(&mut digits, 2);
        }
        let mut digits = vec![1u8];
        for e in 0..=2620 {
            assert_eq!(log10_pow5(e) as usize, digits.len() - 1, "e={e}");
            mul_digits(&mut digits, 5);
        }
    }

    #[test]
    fn pow5_bits_matches_reference() {
        // bit length of 5^e, tracked exactly in 64-bit limbs
        let mut limbs = vec![1u64];
        for e in 0..=3528 {
            let top = limbs.last().unwrap();
            let bits = (limbs.len() as u32 - 1) * 64 + (64 - top.leading_zeros());
            assert_eq!(pow5_bits(e), bits, "e={e}");
            let mut carry = 0u64;
            for limb in limbs.iter_mut() {
                let v = u128::from(*limb) * 5 + u128::from(carry);
                *limb = v as u64;
                carry = (v >> 64) as u64;
            }
            if carry > 0 {
                limbs.push(carry);
            }
        }
    }

    #[test]
    fn multiply_and_shift_agrees_across_kernels() {
        let mut state = 4;
        for _ in 0..50_000 {
            let m = mix(&mut state) >> 9; // 55-bit operand, as the core produces
            let mul = (mix(&mut state), mix(&mut state) >> 3);
            let shift = 65 + (mix(&mut state) % 63) as u32;
            let exact =
                ((u128::from(m) * u128::from(mul.0) >> 64) + u128::from(m) * u128::from(mul.1))
                    >> (shift - 64);
            if exact > u128::from(u64::MAX) {
                continue;
            }
            let native = multiply_and_shift::<NativeWide>(m, mul, shift);
            let portable = multiply_and_shift::<PortableWide>(m, mul, shift);
            assert_eq!(native, exact as u64);
            assert_eq!(portable, exact as u64);
        }
    }
}
