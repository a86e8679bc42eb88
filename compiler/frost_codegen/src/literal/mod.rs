//! Scalar literal formatting.
//!
//! Each scalar is written at its own width. The default constant types
//! (`bool`, `int`, `float64`, `complex128`, `string`) are bare literals; every
//! other width is a conversion of a bare literal to that width's type, so the
//! constant can never be typed at a different width than the value it came
//! from. Unsigned integers are written in hexadecimal.
//!
//! Floats are written with the shortest decimal that round-trips at their
//! width. Values a constant cannot express (infinities, NaN, negative zero)
//! become calls into package `math`.

use std::fmt::Write;

use frost_ir::{QualName, Scalar, ScalarKind};

use crate::{Code, TypeExpr};

/// Format a scalar as a Go expression of exactly its own type.
pub fn format_scalar(scalar: &Scalar) -> Code {
    match scalar {
        Scalar::Bool(b) => Code::lit(if *b { "true" } else { "false" }),
        Scalar::Int(n) => Code::lit(n.to_string()),
        Scalar::Int8(n) => sized(ScalarKind::Int8, Code::lit(n.to_string())),
        Scalar::Int16(n) => sized(ScalarKind::Int16, Code::lit(n.to_string())),
        Scalar::Int32(n) => sized(ScalarKind::Int32, Code::lit(n.to_string())),
        Scalar::Int64(n) => sized(ScalarKind::Int64, Code::lit(n.to_string())),
        Scalar::Uint(n) => sized(ScalarKind::Uint, hex(*n)),
        Scalar::Uint8(n) => sized(ScalarKind::Uint8, hex(u64::from(*n))),
        Scalar::Uint16(n) => sized(ScalarKind::Uint16, hex(u64::from(*n))),
        Scalar::Uint32(n) => sized(ScalarKind::Uint32, hex(u64::from(*n))),
        Scalar::Uint64(n) => sized(ScalarKind::Uint64, hex(*n)),
        Scalar::Uintptr(n) => sized(ScalarKind::Uintptr, hex(*n)),
        Scalar::Float32(x) => sized(ScalarKind::Float32, float32(*x)),
        Scalar::Float64(x) => float64(*x),
        Scalar::Complex64(re, im) => sized(
            ScalarKind::Complex64,
            complex(
                float32(*re),
                float32(*im),
                is_plain(f64::from(*re)) && is_plain(f64::from(*im)),
            ),
        ),
        Scalar::Complex128(re, im) => {
            complex(float64(*re), float64(*im), is_plain(*re) && is_plain(*im))
        }
        Scalar::String(s) => Code::lit(quote(s)),
    }
}

/// Format a scalar of the named type `ty` as a conversion to that type:
/// `ast.Small(3)` rather than `int8(3)`, which would not be assignable.
pub fn format_named_scalar(scalar: &Scalar, ty: TypeExpr) -> Code {
    match format_scalar(scalar) {
        Code::Convert { value, .. } => Code::Convert { ty, value },
        bare => Code::convert(ty, bare),
    }
}

fn sized(kind: ScalarKind, value: Code) -> Code {
    Code::convert(TypeExpr::builtin(kind.name()), value)
}

fn hex(n: u64) -> Code {
    Code::lit(format!("{n:#x}"))
}

/// Finite and not negative zero: expressible as a constant.
fn is_plain(x: f64) -> bool {
    x.is_finite() && !(x == 0.0 && x.is_sign_negative())
}

fn math(name: &str, args: Vec<Code>) -> Code {
    Code::call(QualName::new("math", name), args)
}

/// Non-constant float expressions, or `None` for plain values.
fn special_float(x: f64) -> Option<Code> {
    if x.is_nan() {
        Some(math("NaN", vec![]))
    } else if x.is_infinite() {
        let sign = if x > 0.0 { "1" } else { "-1" };
        Some(math("Inf", vec![Code::lit(sign)]))
    } else if x == 0.0 && x.is_sign_negative() {
        Some(math("Copysign", vec![Code::lit("0"), Code::lit("-1")]))
    } else {
        None
    }
}

fn float64(x: f64) -> Code {
    special_float(x).unwrap_or_else(|| Code::lit(float_token(format!("{x:?}"))))
}

/// The bare literal for an `f32`; the caller wraps it in `float32(...)`.
fn float32(x: f32) -> Code {
    special_float(f64::from(x)).unwrap_or_else(|| Code::lit(float_token(format!("{x:?}"))))
}

/// Make sure a float token cannot be read as an integer constant.
fn float_token(mut token: String) -> String {
    if !token.contains(['.', 'e', 'E']) {
        token.push_str(".0");
    }
    token
}

/// `(re+imi)` when both parts are plain, else `complex(re, im)`.
fn complex(re: Code, im: Code, plain: bool) -> Code {
    match (plain, re, im) {
        (true, Code::Lit(re), Code::Lit(im)) => {
            let mut token = String::with_capacity(re.len() + im.len() + 4);
            token.push('(');
            token.push_str(&re);
            if let Some(magnitude) = im.strip_prefix('-') {
                token.push('-');
                token.push_str(magnitude);
            } else {
                token.push('+');
                token.push_str(&im);
            }
            token.push_str("i)");
            Code::Lit(token)
        }
        (_, re, im) => Code::call(QualName::local("complex"), vec![re, im]),
    }
}

/// Quote `s` as a Go interpreted string literal.
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{07}' => out.push_str("\\a"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0C}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{0B}' => out.push_str("\\v"),
            // Writing to a String is infallible
            c if c.is_ascii_control() => {
                let _ = write!(out, "\\x{:02x}", u32::from(c));
            }
            c if c.is_control() || c == '\u{FEFF}' => {
                let code = u32::from(c);
                let _ = if code <= 0xFFFF {
                    write!(out, "\\u{code:04x}")
                } else {
                    write!(out, "\\U{code:08x}")
                };
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
