//! Bulk checker for the conversion pipeline: sweeps binade edges plus a
//! pseudo-random slice of the bit-pattern space and verifies, for every
//! finite non-zero value, that the decimal result reparses to the same bits,
//! carries no removable trailing zero, stays within 17 digits, cannot be
//! shortened further, and is identical across arithmetic kernels.
//!
//! Failures are printed as JSON lines on stdout, one per unique bit pattern;
//! progress goes to stderr via `FDEC_LOG`.

use std::env;

use nohash_hasher::IntSet;
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use serde::Serialize;

use fdec_bits::{F64Bits, F64Class};
use fdec_convert::wide::{NativeWide, PortableWide};
use fdec_convert::to_decimal_with;

#[derive(Debug, Serialize)]
struct Failure {
    bits: u64,
    rendered: String,
    mantissa: u64,
    exponent: i32,
    kind: &'static str,
}

fn check(bits: u64) -> Option<Failure> {
    let value = F64Bits::from_bits(bits);
    if value.classify() != F64Class::Finite {
        return None;
    }
    let dec = to_decimal_with::<NativeWide>(value.mantissa(), value.biased_exponent());
    let rendered = fdec_fmt::f64_to_string(value.val());
    let fail = |kind| {
        Some(Failure {
            bits,
            rendered: rendered.clone(),
            mantissa: dec.mantissa,
            exponent: dec.exponent,
            kind,
        })
    };

    if to_decimal_with::<PortableWide>(value.mantissa(), value.biased_exponent()) != dec {
        return fail("kernel-divergence");
    }
    if dec.digit_count() > 17 {
        return fail("digit-count");
    }
    if dec.mantissa >= 10 && dec.mantissa % 10 == 0 {
        return fail("trailing-zero");
    }
    let reparsed: f64 = match rendered.parse() {
        Ok(v) => v,
        Err(_) => return fail("unparsable"),
    };
    if F64Bits::new(reparsed) != value {
        return fail("round-trip");
    }
    if dec.mantissa >= 10 {
        for shorter in [dec.mantissa / 10, dec.mantissa / 10 + 1] {
            let candidate: f64 = format!("{}e{}", shorter, dec.exponent + 1).parse().unwrap();
            if F64Bits::new(candidate.abs()) == F64Bits::new(value.val().abs()) {
                return fail("not-shortest");
            }
        }
    }
    None
}

fn splitmix(seed: u64) -> u64 {
    let mut z = seed.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

fn binade_edges() -> Vec<u64> {
    let mut edges = Vec::with_capacity(2047 * 8);
    for exponent in 0..2047u64 {
        for mantissa in [
            0,
            1,
            2,
            3,
            1 << 51,
            (1 << 52) - 2,
            (1 << 52) - 1,
            0x8000F3A0B2C1,
        ] {
            if exponent == 0 && mantissa == 0 {
                continue;
            }
            edges.push((exponent << 52) | mantissa);
        }
    }
    edges
}

fn main() {
    fdec_tracing::init_tracing();

    let args: Vec<String> = env::args().collect();
    let samples: u64 = match args.get(1) {
        None => 4_000_000,
        Some(raw) => match raw.parse() {
            Ok(n) => n,
            Err(_) => {
                eprintln!("Usage: {} [samples]", args[0]);
                std::process::exit(2);
            }
        },
    };
    let seed: u64 = match args.get(2) {
        None => 0x5EED_F10A_7DEC,
        Some(raw) => match raw.parse() {
            Ok(n) => n,
            Err(_) => {
                eprintln!("Usage: {} [samples] [seed]", args[0]);
                std::process::exit(2);
            }
        },
    };

    let start = std::time::Instant::now();

    let edges = binade_edges();
    tracing::info!(cases = edges.len(), "sweeping binade edges");
    let mut failures: Vec<Failure> = edges.par_iter().filter_map(|&bits| check(bits)).collect();

    tracing::info!(samples, seed, "sweeping pseudo-random bit patterns");
    failures.par_extend(
        (0..samples)
            .into_par_iter()
            .filter_map(|i| check(splitmix(seed.wrapping_add(i)))),
    );

    let mut seen: IntSet<u64> = IntSet::default();
    let mut by_exponent: FxHashMap<u32, u32> = FxHashMap::default();
    let mut unique = 0u64;
    for failure in &failures {
        if !seen.insert(failure.bits) {
            continue;
        }
        unique += 1;
        *by_exponent
            .entry(((failure.bits >> 52) & 0x7FF) as u32)
            .or_default() += 1;
        println!("{}", serde_json::to_string(failure).unwrap());
    }

    let checked = edges.len() as u64 + samples;
    tracing::info!(checked, unique, elapsed = ?start.elapsed(), "sweep finished");
    if unique != 0 {
        for (exponent, count) in by_exponent {
            tracing::error!(exponent, count, "failures in binade");
        }
        std::process::exit(1);
    }
}
