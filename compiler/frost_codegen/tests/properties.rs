//! Property-based tests for the frost encoder.
//!
//! Checks that scalar literals are width-exact (the literal text reads back
//! to the same bits at the same width) and that map encoding does not depend
//! on the order in which entries were enumerated.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]
#![allow(
    clippy::doc_markdown,
    clippy::uninlined_format_args,
    reason = "Proptest macros generate code with these patterns"
)]

use frost_codegen::{encode_value, format_scalar, quote, Code};
use frost_ir::{Scalar, ScalarKind, TypeDesc, Value};
use proptest::prelude::*;

/// Strip `name(` ... `)` from a conversion's text.
fn unwrap_conversion<'a>(text: &'a str, name: &str) -> &'a str {
    text.strip_prefix(name)
        .and_then(|rest| rest.strip_prefix('('))
        .and_then(|rest| rest.strip_suffix(')'))
        .unwrap_or_else(|| panic!("`{text}` is not a {name} conversion"))
}

fn literal(scalar: Scalar) -> String {
    format_scalar(&scalar).to_string()
}

fn plain_f64() -> impl Strategy<Value = f64> {
    any::<f64>().prop_filter("constant-expressible", |x| {
        x.is_finite() && !(*x == 0.0 && x.is_sign_negative())
    })
}

fn plain_f32() -> impl Strategy<Value = f32> {
    any::<f32>().prop_filter("constant-expressible", |x| {
        x.is_finite() && !(*x == 0.0 && x.is_sign_negative())
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 512,
        ..ProptestConfig::default()
    })]

    #[test]
    fn int_is_bare(n in any::<i64>()) {
        prop_assert_eq!(literal(Scalar::Int(n)), n.to_string());
    }

    #[test]
    fn int8_keeps_width(n in any::<i8>()) {
        let text = literal(Scalar::Int8(n));
        let parsed: i8 = unwrap_conversion(&text, "int8").parse().unwrap();
        prop_assert_eq!(parsed, n);
    }

    #[test]
    fn int32_keeps_width(n in any::<i32>()) {
        let text = literal(Scalar::Int32(n));
        let parsed: i32 = unwrap_conversion(&text, "int32").parse().unwrap();
        prop_assert_eq!(parsed, n);
    }

    #[test]
    fn uint16_is_hex_at_width(n in any::<u16>()) {
        let text = literal(Scalar::Uint16(n));
        let digits = unwrap_conversion(&text, "uint16").strip_prefix("0x").unwrap();
        prop_assert_eq!(u16::from_str_radix(digits, 16).unwrap(), n);
    }

    #[test]
    fn uint64_is_hex_at_width(n in any::<u64>()) {
        let text = literal(Scalar::Uint64(n));
        let digits = unwrap_conversion(&text, "uint64").strip_prefix("0x").unwrap();
        prop_assert_eq!(u64::from_str_radix(digits, 16).unwrap(), n);
    }

    #[test]
    fn float64_round_trips(x in plain_f64()) {
        let text = literal(Scalar::Float64(x));
        prop_assert!(text.contains(['.', 'e']), "`{}` reads as an integer", text);
        let parsed: f64 = text.parse().unwrap();
        prop_assert_eq!(parsed.to_bits(), x.to_bits());
    }

    #[test]
    fn float32_round_trips_at_its_width(x in plain_f32()) {
        let text = literal(Scalar::Float32(x));
        let parsed: f32 = unwrap_conversion(&text, "float32").parse().unwrap();
        prop_assert_eq!(parsed.to_bits(), x.to_bits());
    }

    #[test]
    fn plain_strings_quote_verbatim(s in "[a-zA-Z0-9 _.,:/-]{0,32}") {
        prop_assert_eq!(quote(&s), format!("\"{}\"", s));
    }

    #[test]
    fn quoted_strings_have_no_raw_controls(s in any::<String>()) {
        let quoted = quote(&s);
        prop_assert!(quoted.starts_with('"') && quoted.ends_with('"'));
        prop_assert!(!quoted.chars().any(char::is_control));
    }

    #[test]
    fn map_encoding_ignores_enumeration_order(
        entries in prop::collection::btree_map("[a-z]{1,6}", any::<i64>(), 0..12)
    ) {
        let ty = TypeDesc::map(
            TypeDesc::scalar(ScalarKind::String),
            TypeDesc::scalar(ScalarKind::Int),
        );
        let forward: Vec<_> = entries
            .iter()
            .map(|(k, v)| (Value::string(k.clone()), Value::int(*v)))
            .collect();
        let mut backward = forward.clone();
        backward.reverse();

        let a = encode_value(&Value::map(ty.clone(), forward)).unwrap();
        let b = encode_value(&Value::map(ty, backward)).unwrap();
        prop_assert_eq!(a.to_string(), b.to_string());
    }

    #[test]
    fn encoding_twice_is_identical(items in prop::collection::vec(any::<i64>(), 0..16)) {
        let ty = TypeDesc::slice(TypeDesc::scalar(ScalarKind::Int));
        let value = Value::slice(ty, items.into_iter().map(Value::int).collect());
        let first: Code = encode_value(&value).unwrap();
        prop_assert_eq!(Ok(first), encode_value(&value));
    }
}
