use expect_test::expect;
use fdec_fmt::f64_to_string;

#[test]
fn rendered_corpus() {
    let bit_patterns: &[u64] = &[
        0x0000000000000000,
        0x8000000000000000,
        0x3ff0000000000000,
        0xbff0000000000000,
        0x4059000000000000,
        0x3fb999999999999a,
        0x3fd3333333333333,
        0xbfd3333333333333,
        0x4004000000000000,
        0x4050000000000000,
        0x405edd2f1a9fbe77,
        0x416312d000000000,
        0x400921fb54442d18,
        0x433fffffffffffff,
        0x3e7ad7f29abcaf48,
        0x3f50624dd2f1a9fc,
        0x01b01297d23ab683,
        0x0000000000000001,
        0x8000000000000001,
        0x0010000000000000,
        0x7fefffffffffffff,
        0x7ff8000000000000,
        0x7ff0000000000000,
        0xfff0000000000000,
    ];
    let rendered: Vec<String> = bit_patterns
        .iter()
        .map(|&bits| format!("{bits:#018x} {}", f64_to_string(f64::from_bits(bits))))
        .collect();
    expect![[r#"
        0x0000000000000000 0
        0x8000000000000000 -0
        0x3ff0000000000000 1e0
        0xbff0000000000000 -1e0
        0x4059000000000000 1e2
        0x3fb999999999999a 1e-1
        0x3fd3333333333333 3e-1
        0xbfd3333333333333 -3e-1
        0x4004000000000000 2.5e0
        0x4050000000000000 6.4e1
        0x405edd2f1a9fbe77 1.23456e2
        0x416312d000000000 1e7
        0x400921fb54442d18 3.141592653589793e0
        0x433fffffffffffff 9.007199254740991e15
        0x3e7ad7f29abcaf48 1e-7
        0x3f50624dd2f1a9fc 1e-3
        0x01b01297d23ab683 1.5e-300
        0x0000000000000001 5e-324
        0x8000000000000001 -5e-324
        0x0010000000000000 2.2250738585072014e-308
        0x7fefffffffffffff 1.7976931348623157e308
        0x7ff8000000000000 NaN
        0x7ff0000000000000 Infinity
        0xfff0000000000000 -Infinity"#]]
    .assert_eq(&rendered.join("\n"));
}

// A split-mix style generator keeps the sweep deterministic.
fn mix(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

#[test]
fn rendered_sweep_reparses() {
    let mut state = 0xF0F0;
    let mut checked = 0;
    while checked < 50_000 {
        let bits = mix(&mut state);
        let value = f64::from_bits(bits);
        if value.is_nan() {
            continue;
        }
        let text = f64_to_string(value);
        let reparsed: f64 = match text.as_str() {
            "Infinity" => f64::INFINITY,
            "-Infinity" => f64::NEG_INFINITY,
            other => other.parse().unwrap(),
        };
        assert_eq!(reparsed.to_bits(), bits, "{text}");
        checked += 1;
    }
}
