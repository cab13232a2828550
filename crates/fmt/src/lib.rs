//! Rendering of binary64 values as shortest round-trippable text.
//!
//! Layout is normalized scientific notation, `d[.ddd]e<exp>`, with the
//! special values spelled `NaN`, `Infinity` and `-Infinity`. The digit
//! string is the shortest one that reparses to the exact input bits.

use std::fmt::{self, Write};

use fdec_bits::{F64Bits, F64Class};
use fdec_convert::{Decimal64, to_decimal};
use fdec_convert::wide::{DefaultWide, WideArith};

static DIGIT_TABLE: &[u8; 200] = b"\
0001020304050607080910111213141516171819\
2021222324252627282930313233343536373839\
4041424344454647484950515253545556575859\
6061626364656667686970717273747576777879\
8081828384858687888990919293949596979899";

/// Display adapter: `format!("{}", Shortest(x))`.
pub struct Shortest(pub f64);

impl fmt::Display for Shortest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_f64(self.0, f)
    }
}

pub fn f64_to_string(value: f64) -> String {
    let mut out = String::with_capacity(24);
    write_f64(value, &mut out).unwrap();
    out
}

pub fn write_f64<W: Write>(value: f64, out: &mut W) -> fmt::Result {
    let bits = F64Bits::new(value);
    match bits.classify() {
        F64Class::Nan => out.write_str("NaN"),
        F64Class::Infinite => {
            if bits.sign() {
                out.write_str("-Infinity")
            } else {
                out.write_str("Infinity")
            }
        }
        F64Class::Zero => {
            if bits.sign() {
                out.write_str("-0")
            } else {
                out.write_str("0")
            }
        }
        F64Class::Finite => {
            if bits.sign() {
                out.write_char('-')?;
            }
            let dec = to_decimal(bits.mantissa(), bits.biased_exponent());
            write_decimal(dec, out)
        }
    }
}

/// Render an already-converted decimal pair. The mantissa carries at most
/// 17 digits and no removable trailing zero.
pub fn write_decimal<W: Write>(dec: Decimal64, out: &mut W) -> fmt::Result {
    let digits = dec.digit_count() as usize;
    let mut buf = [0u8; 17];
    write_mantissa(dec.mantissa, &mut buf[..digits]);
    let exponent = dec.exponent + digits as i32 - 1;

    out.write_char(buf[0] as char)?;
    if digits > 1 {
        out.write_char('.')?;
        out.write_str(std::str::from_utf8(&buf[1..digits]).unwrap())?;
    }
    write!(out, "e{exponent}")
}

// Fills `buf` (sized to the digit count) back to front, splitting off eight
// digits at a time with the kernel's fast 10^8 division and emitting digit
// pairs from the lookup table.
fn write_mantissa(value: u64, buf: &mut [u8]) {
    let mut i = buf.len();
    let mut value = value;
    while value >= 100_000_000 {
        let high = DefaultWide::div1e8(value);
        let mut low = (value - 100_000_000 * high) as u32;
        for _ in 0..4 {
            let q = low / 100;
            let pair = (low - 100 * q) as usize;
            i -= 2;
            buf[i..i + 2].copy_from_slice(&DIGIT_TABLE[2 * pair..2 * pair + 2]);
            low = q;
        }
        value = high;
    }
    let mut value = value as u32;
    while value >= 100 {
        let q = value / 100;
        let pair = (value - 100 * q) as usize;
        i -= 2;
        buf[i..i + 2].copy_from_slice(&DIGIT_TABLE[2 * pair..2 * pair + 2]);
        value = q;
    }
    if value >= 10 {
        let pair = value as usize;
        i -= 2;
        buf[i..i + 2].copy_from_slice(&DIGIT_TABLE[2 * pair..2 * pair + 2]);
    } else {
        i -= 1;
        buf[i] = b'0' + value as u8;
    }
    debug_assert_eq!(i, 0);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mantissa_digit_emission() {
        let mut buf = [0u8; 17];
        let cases: &[(u64, &str)] = &[
            (0, "0"),
            (7, "7"),
            (10, "10"),
            (42, "42"),
            (100, "100"),
            (12345678, "12345678"),
            (100000000, "100000000"),
            (999999999, "999999999"),
            (1234567890123456, "1234567890123456"),
            (17976931348623157, "17976931348623157"),
            (99999999999999999, "99999999999999999"),
        ];
        for &(value, expected) in cases {
            let n = expected.len();
            write_mantissa(value, &mut buf[..n]);
            assert_eq!(std::str::from_utf8(&buf[..n]).unwrap(), expected);
        }
    }

    #[test]
    fn rendered_text_reparses_to_input() {
        let values = [
            1.0,
            -1.0,
            0.1,
            0.3,
            123.456,
            f64::MAX,
            f64::MIN_POSITIVE,
            f64::from_bits(1),
            9007199254740991.0,
            std::f64::consts::PI,
            1e-7,
            6.02214076e23,
        ];
        for value in values {
            let text = f64_to_string(value);
            let reparsed: f64 = text.parse().unwrap();
            assert_eq!(reparsed.to_bits(), value.to_bits(), "{text}");
        }
    }
}
