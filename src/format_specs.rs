//! Represent format specifiers as Rust types.
//!
//! The part of an argument reference after the `:` (e.g. `>+#010.3f` in `{0:>+#010.3f}`)
//! is parsed into a [`FormatSpec`] with its `parse` method:
//!
//! ```
//! # use bracefmt::format_specs::{FormatSpec, Align, FmtType};
//! let spec = FormatSpec::parse("*^12.3e").unwrap();
//! assert_eq!(spec.fill, Some('*'));
//! assert_eq!(spec.align, Some(Align::Center));
//! assert_eq!(spec.width, 12);
//! assert_eq!(spec.precision, Some(3));
//! assert_eq!(spec.fmt_type, Some(FmtType::SciLower));
//! ```
//!
//! The grammar is
//!
//! ```text
//! [[fill]align][sign][#][0][width][.precision][type]
//! ```
//!
//! where every field is optional, but must appear in this order and at most once.
//! A fill character is only recognized when the following character is an align
//! character (`<`, `>`, `=`, or `^`).
use std::fmt::Display;
use std::str::FromStr;

use pest::{Parser, iterators::Pair};

use crate::fmt_error::{FmtError, FmtResult};
use crate::value::Value;

#[derive(Parser)]
#[grammar = "spec.pest"]
pub(crate) struct SpecParser;

/// Where the padding goes when a value is narrower than the minimum width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Align {
    /// `<`: padding after the value
    Left,
    /// `>`: padding before the value (the default)
    Right,
    /// `^`: half the padding before, the rest after. Odd padding puts the extra character after.
    Center,
    /// `=`: padding between the sign/prefix and the digits, e.g. `+000042`
    SignAware,
}

impl Align {
    fn from_char(c: char) -> Option<Self> {
        match c {
            '<' => Some(Self::Left),
            '>' => Some(Self::Right),
            '^' => Some(Self::Center),
            '=' => Some(Self::SignAware),
            _ => None
        }
    }
}

impl Display for Align {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Align::Left => "<",
            Align::Right => ">",
            Align::Center => "^",
            Align::SignAware => "=",
        };

        write!(f, "{s}")
    }
}

/// When a sign is written in front of a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Sign {
    /// `+`: sign for both positive and negative numbers
    Always,
    /// `-`: sign only for negative numbers (the default)
    NegativeOnly,
    /// ` `: a space for positive numbers, a minus for negative ones
    SpaceForPositive,
}

impl Sign {
    fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Self::Always),
            '-' => Some(Self::NegativeOnly),
            ' ' => Some(Self::SpaceForPositive),
            _ => None
        }
    }

    /// The string to write in front of a number given whether it is negative.
    pub fn sign_str(&self, negative: bool) -> &'static str {
        match (self, negative) {
            (_, true) => "-",
            (Sign::Always, false) => "+",
            (Sign::SpaceForPositive, false) => " ",
            (Sign::NegativeOnly, false) => "",
        }
    }
}

impl Display for Sign {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Sign::Always => "+",
            Sign::NegativeOnly => "-",
            Sign::SpaceForPositive => " ",
        };

        write!(f, "{s}")
    }
}

/// The presentation type selected by the trailing letter of a specifier.
///
/// The first five apply to integers; the rest to floats and complex numbers. Integer
/// values may also use a float type, in which case they are converted to a float first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FmtType {
    /// `b`: base 2
    Binary,
    /// `o`: base 8
    Octal,
    /// `d`: base 10
    Decimal,
    /// `x`: base 16, lower case digits
    HexLower,
    /// `X`: base 16, upper case digits and an upper case `0X` prefix
    HexUpper,
    /// `e`: scientific notation, e.g. `1.5e+03`
    SciLower,
    /// `E`: like `e`, but with an upper case `E`
    SciUpper,
    /// `f`: fixed point
    Fixed,
    /// `g`: fixed point unless the exponent is very large or small, then scientific
    GeneralLower,
    /// `G`: like `g`, but with an upper case `E`
    GeneralUpper,
}

impl FmtType {
    fn from_char(c: char) -> Option<Self> {
        match c {
            'b' => Some(Self::Binary),
            'o' => Some(Self::Octal),
            'd' => Some(Self::Decimal),
            'x' => Some(Self::HexLower),
            'X' => Some(Self::HexUpper),
            'e' => Some(Self::SciLower),
            'E' => Some(Self::SciUpper),
            'f' => Some(Self::Fixed),
            'g' => Some(Self::GeneralLower),
            'G' => Some(Self::GeneralUpper),
            _ => None
        }
    }

    /// `true` for the integer-only types (`b`, `o`, `d`, `x`, `X`), `false` otherwise
    pub fn is_integer(&self) -> bool {
        self.radix().is_some()
    }

    /// `true` for the float types (`e`, `E`, `f`, `g`, `G`), `false` otherwise
    pub fn is_float(&self) -> bool {
        !self.is_integer()
    }

    /// `true` if this type writes letters (hex digits, exponent markers) in upper case
    pub fn is_upper(&self) -> bool {
        matches!(self, FmtType::HexUpper | FmtType::SciUpper | FmtType::GeneralUpper)
    }

    /// The base an integer type writes in, or `None` for float types.
    pub fn radix(&self) -> Option<u32> {
        match self {
            FmtType::Binary => Some(2),
            FmtType::Octal => Some(8),
            FmtType::Decimal => Some(10),
            FmtType::HexLower | FmtType::HexUpper => Some(16),
            _ => None
        }
    }

    /// The prefix the `#` flag adds for this type, if any.
    pub fn alternate_prefix(&self) -> &'static str {
        match self {
            FmtType::Binary => "0b",
            FmtType::Octal => "0o",
            FmtType::HexLower => "0x",
            FmtType::HexUpper => "0X",
            _ => ""
        }
    }
}

impl Display for FmtType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            FmtType::Binary => "b",
            FmtType::Octal => "o",
            FmtType::Decimal => "d",
            FmtType::HexLower => "x",
            FmtType::HexUpper => "X",
            FmtType::SciLower => "e",
            FmtType::SciUpper => "E",
            FmtType::Fixed => "f",
            FmtType::GeneralLower => "g",
            FmtType::GeneralUpper => "G",
        };

        write!(f, "{s}")
    }
}


/// A parsed format specifier.
///
/// Fields that were not given in the specifier are `None` (or `false`/0), so that
/// validation can tell an explicit `-` sign from the default. Use [`FormatSpec::fill_char`],
/// [`FormatSpec::alignment`] and [`FormatSpec::sign_policy`] for the values rendering uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FormatSpec {
    /// Padding character. Only written back out if `align` is also set.
    pub fill: Option<char>,
    pub align: Option<Align>,
    pub sign: Option<Sign>,
    /// The `#` flag: add `0b`/`0o`/`0x`/`0X` to non-decimal integers
    pub alternate: bool,
    /// A `0` before the width: pad with zeros after the sign
    pub zero_pad: bool,
    /// Minimum width, measured in bytes of UTF-8 output
    pub width: usize,
    pub precision: Option<usize>,
    pub fmt_type: Option<FmtType>,
}

impl FormatSpec {
    /// Parse a format specifier (the text after the `:` in an argument reference).
    ///
    /// An empty string gives the default specifier. Returns an
    /// [`FmtError::InvalidSpecifier`] if a field is out of order, repeated, or unknown.
    pub fn parse(spec: &str) -> FmtResult<Self> {
        let mut parsed = Self::default();
        if spec.is_empty() {
            return Ok(parsed);
        }

        let tree = SpecParser::parse(Rule::spec, spec)
            .map_err(|e| FmtError::from_pest(e, spec))?
            .next()
            .ok_or_else(|| invalid(spec, "empty parse tree"))?;

        for pair in tree.into_inner() {
            match pair.as_rule() {
                Rule::fill_align => {
                    for inner in pair.into_inner() {
                        match inner.as_rule() {
                            Rule::fill => parsed.fill = Some(single_char(&inner, spec)?),
                            Rule::align => {
                                let c = single_char(&inner, spec)?;
                                parsed.align = Some(Align::from_char(c).ok_or_else(|| invalid(spec, "unknown alignment"))?);
                            },
                            _ => return Err(invalid(spec, "unexpected token in fill/align")),
                        }
                    }
                },
                Rule::sign => {
                    let c = single_char(&pair, spec)?;
                    parsed.sign = Some(Sign::from_char(c).ok_or_else(|| invalid(spec, "unknown sign"))?);
                },
                Rule::alternate => parsed.alternate = true,
                Rule::zero_pad => parsed.zero_pad = true,
                Rule::width => parsed.width = parse_number(&pair, spec, "width")?,
                Rule::precision => {
                    // "." alone leaves the precision unset
                    if let Some(digits) = pair.into_inner().next() {
                        parsed.precision = Some(parse_number(&digits, spec, "precision")?);
                    }
                },
                Rule::fmt_type => {
                    let c = single_char(&pair, spec)?;
                    parsed.fmt_type = Some(FmtType::from_char(c).ok_or_else(|| invalid(spec, "unknown type"))?);
                },
                Rule::EOI => break,
                _ => return Err(invalid(spec, "unexpected token")),
            }
        }

        Ok(parsed)
    }

    /// The padding character: the explicit fill, else `'0'` for zero-padding, else a space.
    pub fn fill_char(&self) -> char {
        match (self.fill, self.zero_pad) {
            (Some(c), _) => c,
            (None, true) => '0',
            (None, false) => ' ',
        }
    }

    /// The effective alignment: the explicit one, else sign-aware for zero-padding, else right.
    pub fn alignment(&self) -> Align {
        match (self.align, self.zero_pad) {
            (Some(a), _) => a,
            (None, true) => Align::SignAware,
            (None, false) => Align::Right,
        }
    }

    /// The effective sign policy (negative-only unless given).
    pub fn sign_policy(&self) -> Sign {
        self.sign.unwrap_or(Sign::NegativeOnly)
    }

    /// `true` if any field that only makes sense for numbers was given.
    pub fn has_numeric_fields(&self) -> bool {
        self.sign.is_some() || self.alternate || self.zero_pad || self.precision.is_some() || self.fmt_type.is_some()
    }

    /// Check that this specifier can be applied to `value`.
    ///
    /// - integer types (`b`, `o`, `d`, `x`, `X`) are not allowed for float or complex values,
    /// - a precision is only allowed with a float type, or for float/complex values with no type,
    /// - non-numeric values cannot have a sign, `#`, `0`, precision, or type.
    pub fn validate(&self, value: &Value) -> FmtResult<()> {
        let is_int_type = self.fmt_type.map(|t| t.is_integer()).unwrap_or(false);
        let is_float_type = self.fmt_type.map(|t| t.is_float()).unwrap_or(false);

        if value.is_integer() {
            if self.precision.is_some() && !is_float_type {
                return Err(self.mismatch(value, "precision is only valid for float types"));
            }
        } else if value.is_float() {
            if is_int_type {
                return Err(self.mismatch(value, "integer types cannot format a float"));
            }
        } else if self.has_numeric_fields() {
            return Err(self.mismatch(value, "sign, '#', '0', precision, and type are only valid for numbers"));
        }

        Ok(())
    }

    fn mismatch(&self, value: &Value, reason: &'static str) -> FmtError {
        FmtError::TypeMismatch { spec: self.to_string(), kind: value.kind_name(), reason }
    }
}

impl Display for FormatSpec {
    /// Write the specifier back out in canonical form.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(align) = self.align {
            if let Some(fill) = self.fill {
                write!(f, "{fill}")?;
            }
            write!(f, "{align}")?;
        }
        if let Some(sign) = self.sign {
            write!(f, "{sign}")?;
        }
        if self.alternate {
            write!(f, "#")?;
        }
        if self.zero_pad {
            write!(f, "0")?;
        }
        if self.width > 0 {
            write!(f, "{}", self.width)?;
        }
        if let Some(p) = self.precision {
            write!(f, ".{p}")?;
        }
        if let Some(t) = self.fmt_type {
            write!(f, "{t}")?;
        }
        Ok(())
    }
}

impl FromStr for FormatSpec {
    type Err = FmtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn invalid(spec: &str, reason: &str) -> FmtError {
    FmtError::InvalidSpecifier { spec: spec.to_owned(), reason: reason.to_owned() }
}

fn single_char(pair: &Pair<Rule>, spec: &str) -> FmtResult<char> {
    pair.as_str().chars().next().ok_or_else(|| invalid(spec, "empty field"))
}

/// Largest accepted width or precision. `std::fmt` takes runtime precisions as `u16`.
pub const MAX_FIELD_VALUE: usize = u16::MAX as usize;

fn parse_number(pair: &Pair<Rule>, spec: &str, field: &str) -> FmtResult<usize> {
    match pair.as_str().parse::<usize>() {
        Ok(n) if n <= MAX_FIELD_VALUE => Ok(n),
        _ => Err(invalid(spec, &format!("{field} is larger than {MAX_FIELD_VALUE}"))),
    }
}
