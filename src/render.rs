//! Render a single value according to a [`FormatSpec`].
//!
//! Rendering happens in a fixed order: the value is converted to its unpadded text
//! (digits without a sign for numbers), then the `#` prefix and the sign are worked out,
//! and finally the three parts are padded out to the minimum width:
//!
//! ```
//! # use bracefmt::format_specs::FormatSpec;
//! # use bracefmt::render::render;
//! # use bracefmt::value::Value;
//! let mut out = String::new();
//! let spec = FormatSpec::parse("=#010x").unwrap();
//! render(&Value::from(123123), &spec, &mut out).unwrap();
//! assert_eq!(out, "0x0001e0f3");
//! ```
use std::fmt::{Display, LowerExp};

use itertools::repeat_n;

use crate::fmt_error::FmtResult;
use crate::format_specs::{Align, FmtType, FormatSpec};
use crate::value::Value;

/// Parse `spec`, check it against `value`, and append the rendered value to `out`.
///
/// Nothing is written to `out` if the specifier is invalid.
pub fn render_with_spec(value: &Value, spec: &str, out: &mut String) -> FmtResult<()> {
    let spec = FormatSpec::parse(spec)?;
    render(value, &spec, out)
}

/// Check `spec` against `value` and append the rendered value to `out`.
pub fn render(value: &Value, spec: &FormatSpec, out: &mut String) -> FmtResult<()> {
    spec.validate(value)?;
    let parts = stringify(value, spec);

    let sign = if parts.signed { spec.sign_policy().sign_str(parts.negative) } else { "" };
    let prefix = if spec.alternate { parts.prefix } else { "" };
    let body = parts.body;

    // Width counts bytes, not characters
    let used = sign.len() + prefix.len() + body.len();
    let gap = spec.width.saturating_sub(used);
    if gap == 0 {
        out.push_str(sign);
        out.push_str(prefix);
        out.push_str(&body);
        return Ok(());
    }

    let fill = spec.fill_char();
    out.reserve(used.saturating_add(gap.saturating_mul(fill.len_utf8())));
    match spec.alignment() {
        Align::Right => {
            out.extend(repeat_n(fill, gap));
            out.push_str(sign);
            out.push_str(prefix);
            out.push_str(&body);
        },
        Align::Left => {
            out.push_str(sign);
            out.push_str(prefix);
            out.push_str(&body);
            out.extend(repeat_n(fill, gap));
        },
        Align::Center => {
            out.extend(repeat_n(fill, gap / 2));
            out.push_str(sign);
            out.push_str(prefix);
            out.push_str(&body);
            out.extend(repeat_n(fill, gap - gap / 2));
        },
        Align::SignAware => {
            out.push_str(sign);
            out.push_str(prefix);
            out.extend(repeat_n(fill, gap));
            out.push_str(&body);
        },
    }

    Ok(())
}

/// A value converted to text, before sign and padding are applied.
struct Parts {
    body: String,
    negative: bool,
    /// Whether the sign policy applies (integers and real floats)
    signed: bool,
    /// The prefix to use if the `#` flag is set
    prefix: &'static str,
}

impl Parts {
    fn text(body: String) -> Self {
        Self { body, negative: false, signed: false, prefix: "" }
    }
}

fn stringify(value: &Value, spec: &FormatSpec) -> Parts {
    let float_type = spec.fmt_type.filter(|t| t.is_float());
    match value {
        Value::Bool(b) => Parts::text(b.to_string()),
        Value::Int(i) => match float_type {
            Some(t) => float_parts(*i as f64, t, spec.precision),
            None => int_parts(i.unsigned_abs(), *i < 0, spec.fmt_type),
        },
        Value::UInt(u) => match float_type {
            Some(t) => float_parts(*u as f64, t, spec.precision),
            None => int_parts(*u, false, spec.fmt_type),
        },
        Value::Float(v) => float_parts(*v, float_type.unwrap_or(FmtType::GeneralLower), spec.precision),
        Value::Float32(v) => float_parts(*v, float_type.unwrap_or(FmtType::GeneralLower), spec.precision),
        Value::Complex { re, im } => complex_parts(*re, *im, float_type.unwrap_or(FmtType::GeneralLower), spec.precision),
        Value::Complex32 { re, im } => complex_parts(*re, *im, float_type.unwrap_or(FmtType::GeneralLower), spec.precision),
        Value::Str(s) => Parts::text(s.to_string()),
        Value::Display(d) => Parts::text(d.to_string()),
        // No better representation is available, use the debug form rather than failing
        Value::Debug(d) => Parts::text(format!("{d:?}")),
    }
}

fn int_parts(magnitude: u64, negative: bool, fmt_type: Option<FmtType>) -> Parts {
    let t = fmt_type.unwrap_or(FmtType::Decimal);
    let body = match t {
        FmtType::Binary => format!("{magnitude:b}"),
        FmtType::Octal => format!("{magnitude:o}"),
        FmtType::HexLower => format!("{magnitude:x}"),
        FmtType::HexUpper => format!("{magnitude:X}"),
        _ => {
            let mut b = itoa::Buffer::new();
            b.format(magnitude).to_owned()
        },
    };
    Parts { body, negative, signed: true, prefix: t.alternate_prefix() }
}

fn float_parts<F: FloatRepr>(v: F, fmt_type: FmtType, precision: Option<usize>) -> Parts {
    Parts {
        body: float_text(v.magnitude(), fmt_type, precision),
        negative: v.is_neg(),
        signed: true,
        prefix: "",
    }
}

/// `(re+imi)`; the sign policy does not apply, the imaginary part always carries a sign.
fn complex_parts<F: FloatRepr>(re: F, im: F, fmt_type: FmtType, precision: Option<usize>) -> Parts {
    let re_sign = if re.is_neg() { "-" } else { "" };
    let im_sign = if im.is_neg() { "-" } else { "+" };
    let re_text = float_text(re.magnitude(), fmt_type, precision);
    let im_text = float_text(im.magnitude(), fmt_type, precision);
    Parts::text(format!("({re_sign}{re_text}{im_sign}{im_text}i)"))
}

/// Floating point types the renderer can write; implemented for `f32` and `f64` so each
/// keeps its own shortest representation.
trait FloatRepr: Copy + Display + LowerExp {
    fn magnitude(self) -> Self;
    fn is_neg(self) -> bool;
    fn is_nan(self) -> bool;
    fn is_infinite(self) -> bool;
}

impl FloatRepr for f64 {
    fn magnitude(self) -> Self {
        self.abs()
    }

    fn is_neg(self) -> bool {
        self.is_sign_negative() && !f64::is_nan(self)
    }

    fn is_nan(self) -> bool {
        f64::is_nan(self)
    }

    fn is_infinite(self) -> bool {
        f64::is_infinite(self)
    }
}

impl FloatRepr for f32 {
    fn magnitude(self) -> Self {
        self.abs()
    }

    fn is_neg(self) -> bool {
        self.is_sign_negative() && !f32::is_nan(self)
    }

    fn is_nan(self) -> bool {
        f32::is_nan(self)
    }

    fn is_infinite(self) -> bool {
        f32::is_infinite(self)
    }
}

/// Write a non-negative float in the given notation.
///
/// With no precision, `e`, `f` and `g` use the shortest digits that round-trip. `g` switches
/// to scientific notation when the decimal exponent is below -4 or at least the precision
/// (6 when no precision is given); with a precision it also drops trailing zeros.
///
/// Non-finite values are spelled `inf` and `nan` (`INF`, `NAN` for upper case types), the
/// same as the `e`/`f`/`g` text of finite values; the sign is added by the caller.
fn float_text<F: FloatRepr>(v: F, fmt_type: FmtType, precision: Option<usize>) -> String {
    let upper = fmt_type.is_upper();
    if v.is_nan() {
        return if upper { "NAN" } else { "nan" }.to_owned();
    }
    if v.is_infinite() {
        return if upper { "INF" } else { "inf" }.to_owned();
    }

    let s = match (fmt_type, precision) {
        (FmtType::SciLower | FmtType::SciUpper, None) => sci_text(format!("{v:e}")),
        (FmtType::SciLower | FmtType::SciUpper, Some(p)) => sci_text(format!("{v:.p$e}")),
        (FmtType::GeneralLower | FmtType::GeneralUpper, None) => {
            let shortest = format!("{v:e}");
            let exp = sci_exponent(&shortest);
            if exp < -4 || exp >= 6 {
                sci_text(shortest)
            } else {
                v.to_string()
            }
        },
        (FmtType::GeneralLower | FmtType::GeneralUpper, Some(p)) => general_text(v, p.max(1)),
        (_, None) => v.to_string(),
        (_, Some(p)) => format!("{v:.p$}"),
    };

    if upper {
        s.to_uppercase()
    } else {
        s
    }
}

/// General notation with `p` significant digits, trailing zeros removed.
fn general_text<F: FloatRepr>(v: F, p: usize) -> String {
    let rounded = format!("{:.*e}", p - 1, v);
    let (mantissa, exp) = rounded.split_once('e').unwrap_or((rounded.as_str(), "0"));
    let exp: i64 = exp.parse().unwrap_or(0);
    let digits = mantissa.replace('.', "");
    let n_digits = digits.trim_end_matches('0').len().max(1);
    // Digits before the decimal point in fixed notation
    let point = exp + 1;

    let mut sci_limit = p as i64;
    if sci_limit > n_digits as i64 && n_digits as i64 >= point {
        sci_limit = n_digits as i64;
    }

    if exp < -4 || exp >= sci_limit {
        let q = p.min(n_digits) - 1;
        sci_text(format!("{v:.q$e}"))
    } else {
        let sig = if p as i64 > point { n_digits as i64 } else { p as i64 };
        let decimals = (sig - point).max(0) as usize;
        format!("{v:.decimals$}")
    }
}

fn sci_exponent(s: &str) -> i64 {
    s.split_once('e').and_then(|(_, e)| e.parse().ok()).unwrap_or(0)
}

/// Rewrite the exponent of Rust's `LowerExp` output (`1.5e3`, `1e-7`) with an explicit sign
/// and at least two digits (`1.5e+03`, `1e-07`).
fn sci_text(s: String) -> String {
    match s.split_once('e') {
        Some((mantissa, exp)) => {
            let exp: i64 = exp.parse().unwrap_or(0);
            let sign = if exp < 0 { '-' } else { '+' };
            format!("{mantissa}e{sign}{:02}", exp.abs())
        },
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fmt_error::FmtError;

    fn render_to_string(spec: &str, value: Value) -> FmtResult<String> {
        let mut out = String::new();
        render_with_spec(&value, spec, &mut out)?;
        Ok(out)
    }

    #[test]
    fn test_render_table() -> FmtResult<()> {
        let cases: Vec<(&str, Value, &str)> = vec![
            (">1", 1.into(), "1"),
            (">1", (-1).into(), "-1"),
            (">10", 1.into(), "         1"),
            ("0>10", 1.into(), "0000000001"),
            ("0>10", (-1).into(), "00000000-1"),
            ("0<10", (-1).into(), "-100000000"),
            ("0^10", (-1).into(), "0000-10000"),
            ("0>+10", (-1).into(), "00000000-1"),
            ("0>+10", 1.into(), "00000000+1"),
            ("0> 10", 1.into(), "00000000 1"),
            ("0>+10", 0.into(), "00000000+0"),
            (">+010", 0.into(), "00000000+0"),
            ("a>+010", 0.into(), "aaaaaaaa+0"),
            (">#010", 123123.into(), "0000123123"),
            ("=#010b", 1.into(), "0b00000001"),
            ("=#010o", 123123.into(), "0o00360363"),
            (">#010x", 123123.into(), "0000x1e0f3"),
            ("=#010x", 123123.into(), "0x0001e0f3"),
            ("=#010x", (-123123).into(), "-0x001e0f3"),
            ("=#010X", (-123123).into(), "-0X001E0F3"),
            ("=#010x", 0xFFFFFFFFu32.into(), "0xffffffff"),
            ("", 3.1415926.into(), "3.1415926"),
            (">.2f", 3.1415926.into(), "3.14"),
            ("=010.2f", 3.1415926.into(), "0000003.14"),
            (".2f", 3.into(), "3.00"),
        ];

        for (spec, value, expected) in cases {
            let desc = format!("format '{spec}', value '{value:?}'");
            let s = render_to_string(spec, value)?;
            assert_eq!(s, expected, "{desc} failed");
        }
        Ok(())
    }

    #[test]
    fn test_zero_pad_default_align() -> FmtResult<()> {
        assert_eq!(render_to_string("010", (-42).into())?, "-000000042");
        assert_eq!(render_to_string("+06", 42.into())?, "+00042");
        assert_eq!(render_to_string("#06x", 255.into())?, "0x00ff");
        assert_eq!(render_to_string("0", 7.into())?, "7");
        Ok(())
    }

    #[test]
    fn test_alignment() -> FmtResult<()> {
        assert_eq!(render_to_string("<6", "ab".into())?, "ab    ");
        assert_eq!(render_to_string(">6", "ab".into())?, "    ab");
        assert_eq!(render_to_string("^6", "ab".into())?, "  ab  ");
        assert_eq!(render_to_string("*^7", "ab".into())?, "**ab***");
        assert_eq!(render_to_string("6", "ab".into())?, "    ab", "Strings should default to right alignment");
        assert_eq!(render_to_string("2", "abcd".into())?, "abcd", "A value wider than the width should not be truncated");
        Ok(())
    }

    #[test]
    fn test_sign() -> FmtResult<()> {
        assert_eq!(render_to_string("+", 5.into())?, "+5");
        assert_eq!(render_to_string("-", 5.into())?, "5");
        assert_eq!(render_to_string(" ", 5.into())?, " 5");
        assert_eq!(render_to_string(" ", (-5).into())?, "-5");
        assert_eq!(render_to_string("+", 0u8.into())?, "+0");
        assert_eq!(render_to_string("+.1f", 2.26.into())?, "+2.3");
        assert_eq!(render_to_string("+", (-2.5).into())?, "-2.5");
        assert_eq!(render_to_string("", i64::MIN.into())?, "-9223372036854775808");
        Ok(())
    }

    #[test]
    fn test_int_bases() -> FmtResult<()> {
        assert_eq!(render_to_string("b", 5.into())?, "101");
        assert_eq!(render_to_string("o", 8.into())?, "10");
        assert_eq!(render_to_string("x", 255.into())?, "ff");
        assert_eq!(render_to_string("X", 255.into())?, "FF");
        assert_eq!(render_to_string("#X", 255.into())?, "0XFF");
        assert_eq!(render_to_string("#d", 255.into())?, "255");
        assert_eq!(render_to_string("#b", (-5).into())?, "-0b101");
        assert_eq!(render_to_string("d", u64::MAX.into())?, "18446744073709551615");
        Ok(())
    }

    #[test]
    fn test_float_fixed() -> FmtResult<()> {
        assert_eq!(render_to_string("f", 0.1.into())?, "0.1");
        assert_eq!(render_to_string("f", 1e21.into())?, "1000000000000000000000");
        assert_eq!(render_to_string(".3f", 2.0.into())?, "2.000");
        assert_eq!(render_to_string(".0f", 2.7.into())?, "3");
        assert_eq!(render_to_string("8.2f", (-1.5).into())?, "   -1.50");
        Ok(())
    }

    #[test]
    fn test_float_sci() -> FmtResult<()> {
        assert_eq!(render_to_string("e", 1234.5.into())?, "1.2345e+03");
        assert_eq!(render_to_string(".2e", 1234.5.into())?, "1.23e+03");
        assert_eq!(render_to_string(".2E", 0.000123.into())?, "1.23E-04");
        assert_eq!(render_to_string("e", 1e100.into())?, "1e+100");
        assert_eq!(render_to_string("e", 0.0.into())?, "0e+00");
        Ok(())
    }

    #[test]
    fn test_float_general() -> FmtResult<()> {
        assert_eq!(render_to_string("", 100000.0.into())?, "100000");
        assert_eq!(render_to_string("", 1000000.0.into())?, "1e+06");
        assert_eq!(render_to_string("g", 1234567.0.into())?, "1.234567e+06");
        assert_eq!(render_to_string("g", 0.0001.into())?, "0.0001");
        assert_eq!(render_to_string("g", 0.00001.into())?, "1e-05");
        assert_eq!(render_to_string("G", 0.00001.into())?, "1E-05");
        assert_eq!(render_to_string(".3g", 3.14159.into())?, "3.14");
        assert_eq!(render_to_string(".3g", 1234.5.into())?, "1.23e+03");
        assert_eq!(render_to_string(".5g", 1.5.into())?, "1.5");
        assert_eq!(render_to_string(".3g", 0.99999.into())?, "1");
        assert_eq!(render_to_string(".4g", 9.9996.into())?, "10");
        assert_eq!(render_to_string(".0g", 2.7.into())?, "3");
        assert_eq!(render_to_string("", 0.0.into())?, "0");
        Ok(())
    }

    #[test]
    fn test_float32_shortest() -> FmtResult<()> {
        assert_eq!(render_to_string("", 3.14f32.into())?, "3.14");
        assert_eq!(render_to_string(".1f", 3.14f32.into())?, "3.1");
        Ok(())
    }

    #[test]
    fn test_non_finite() -> FmtResult<()> {
        assert_eq!(render_to_string("", f64::INFINITY.into())?, "inf");
        assert_eq!(render_to_string("+", f64::NEG_INFINITY.into())?, "-inf");
        assert_eq!(render_to_string("E", f64::INFINITY.into())?, "INF");
        assert_eq!(render_to_string("+", f64::NAN.into())?, "+nan");
        Ok(())
    }

    #[test]
    fn test_complex() -> FmtResult<()> {
        assert_eq!(render_to_string("", Value::complex(1.0, 2.0))?, "(1+2i)");
        assert_eq!(render_to_string(".1f", Value::complex(-1.0, -0.3))?, "(-1.0-0.3i)");
        assert_eq!(render_to_string(">10", Value::complex(1.5, 2.0))?, "  (1.5+2i)");
        assert_eq!(render_to_string("+", Value::complex(1.0, 2.0))?, "(1+2i)", "The sign policy should not apply to complex values");
        Ok(())
    }

    #[test]
    fn test_complex32_shortest() -> FmtResult<()> {
        assert_eq!(render_to_string("", Value::complex32(3.14, -0.1))?, "(3.14-0.1i)");
        assert_eq!(render_to_string("", Value::complex(3.14f32 as f64, 0.0))?, "(3.140000104904175+0i)");
        assert_eq!(render_to_string(".2f", Value::complex32(1.0, 2.5))?, "(1.00+2.50i)");
        Ok(())
    }

    #[test]
    fn test_text_kinds() -> FmtResult<()> {
        assert_eq!(render_to_string("", true.into())?, "true");
        assert_eq!(render_to_string("<6", false.into())?, "false ");
        assert_eq!(render_to_string("", 'x'.into())?, "x");

        let addr = std::net::Ipv4Addr::new(10, 0, 0, 1);
        assert_eq!(render_to_string(">10", Value::display(&addr))?, "  10.0.0.1");

        let v = vec![123];
        assert_eq!(render_to_string("", Value::debug(&v))?, "[123]");
        Ok(())
    }

    #[test]
    fn test_multibyte_fill() -> FmtResult<()> {
        assert_eq!(render_to_string("→>5", 1.into())?, "→→→→1");
        // width counts bytes, so a two-byte value takes two columns of the width
        assert_eq!(render_to_string("*>4", "é".into())?, "**é");
        Ok(())
    }

    #[test]
    fn test_errors_write_nothing() {
        let mut out = String::from("keep");
        let e = render_with_spec(&Value::Float(1.5), "x", &mut out);
        assert!(matches!(e, Err(FmtError::TypeMismatch { .. })));
        let e = render_with_spec(&Value::from("s"), "=#>", &mut out);
        assert!(matches!(e, Err(FmtError::InvalidSpecifier { .. })));
        assert_eq!(out, "keep");
    }

    #[test]
    fn test_large_fields() -> FmtResult<()> {
        for spec in [".70000f", ".70000e", ".70000g", "18446744073709551615", "é<70000"] {
            let mut out = String::new();
            let e = render_with_spec(&Value::Float(1.5), spec, &mut out);
            assert!(matches!(e, Err(FmtError::InvalidSpecifier { .. })), "Rendering with '{spec}' did not return an error");
            assert!(out.is_empty());
        }

        let s = render_to_string(".65535f", 1.5.into())?;
        assert_eq!(s.len(), 65537);
        assert!(s.starts_with("1.5000"));
        let s = render_to_string(".65535g", 1.5.into())?;
        assert_eq!(s, "1.5");

        let s = render_to_string("é<65535", 1.into())?;
        assert_eq!(s.len(), 1 + 65534 * 'é'.len_utf8());
        Ok(())
    }
}
