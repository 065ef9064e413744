//! Values that can be rendered into a pattern.
//!
//! [`Value`] is a closed set of kinds: the renderer matches on it exhaustively, so
//! every kind has a defined rendering. Most primitives convert with `into()`:
//!
//! ```
//! # use bracefmt::value::Value;
//! let values: Vec<Value> = vec![123.into(), "test".into(), 2.5f32.into(), true.into()];
//! assert_eq!(values[0].kind_name(), "integer");
//! ```
//!
//! Anything else can be passed through [`Value::display`] (its `Display` output is used
//! as text) or, as a last resort, [`Value::debug`].
use std::borrow::Cow;
use std::fmt;

/// A single argument value.
#[derive(Clone)]
pub enum Value<'a> {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    /// Kept separate from `Float` so that the shortest representation is the
    /// single-precision one (`3.14` rather than `3.140000104904175`).
    Float32(f32),
    Complex{ re: f64, im: f64 },
    /// Single-precision complex number; like `Float32`, each part keeps its own shortest digits.
    Complex32{ re: f32, im: f32 },
    Str(Cow<'a, str>),
    /// A value rendered through its `Display` implementation
    Display(&'a dyn fmt::Display),
    /// Fallback for values with no better representation; rendered with `{:?}`
    Debug(&'a dyn fmt::Debug),
}

impl<'a> Value<'a> {
    /// Wrap any `Display` value; it renders as text.
    pub fn display<T: fmt::Display>(value: &'a T) -> Self {
        Self::Display(value)
    }

    /// Wrap any `Debug` value; it renders as text using its debug representation.
    pub fn debug<T: fmt::Debug>(value: &'a T) -> Self {
        Self::Debug(value)
    }

    pub fn complex(re: f64, im: f64) -> Self {
        Self::Complex { re, im }
    }

    pub fn complex32(re: f32, im: f32) -> Self {
        Self::Complex32 { re, im }
    }

    /// `true` for signed and unsigned integers
    pub fn is_integer(&self) -> bool {
        matches!(self, Value::Int(_) | Value::UInt(_))
    }

    /// `true` for floats and complex numbers
    pub fn is_float(&self) -> bool {
        matches!(self, Value::Float(_) | Value::Float32(_) | Value::Complex { .. } | Value::Complex32 { .. })
    }

    pub fn is_numeric(&self) -> bool {
        self.is_integer() || self.is_float()
    }

    /// A short name for the kind of value, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Int(_) => "integer",
            Value::UInt(_) => "unsigned integer",
            Value::Float(_) => "float",
            Value::Float32(_) => "float",
            Value::Complex { .. } => "complex",
            Value::Complex32 { .. } => "complex",
            Value::Str(_) => "string",
            Value::Display(_) => "displayable",
            Value::Debug(_) => "debug",
        }
    }

    /// Convert a borrowed value into one that owns its text, so it can outlive the borrow.
    ///
    /// `Display` and `Debug` values are rendered to strings at this point.
    pub fn into_owned(self) -> Value<'static> {
        match self {
            Value::Bool(b) => Value::Bool(b),
            Value::Int(i) => Value::Int(i),
            Value::UInt(u) => Value::UInt(u),
            Value::Float(f) => Value::Float(f),
            Value::Float32(f) => Value::Float32(f),
            Value::Complex { re, im } => Value::Complex { re, im },
            Value::Complex32 { re, im } => Value::Complex32 { re, im },
            Value::Str(s) => Value::Str(Cow::Owned(s.into_owned())),
            Value::Display(d) => Value::Str(Cow::Owned(d.to_string())),
            Value::Debug(d) => Value::Str(Cow::Owned(format!("{d:?}"))),
        }
    }
}

impl<'a> fmt::Debug for Value<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Int(i) => write!(f, "Int({i})"),
            Value::UInt(u) => write!(f, "UInt({u})"),
            Value::Float(v) => write!(f, "Float({v:?})"),
            Value::Float32(v) => write!(f, "Float32({v:?})"),
            Value::Complex { re, im } => write!(f, "Complex {{ re: {re:?}, im: {im:?} }}"),
            Value::Complex32 { re, im } => write!(f, "Complex32 {{ re: {re:?}, im: {im:?} }}"),
            Value::Str(s) => write!(f, "Str({s:?})"),
            Value::Display(d) => write!(f, "Display({d})"),
            Value::Debug(d) => write!(f, "Debug({d:?})"),
        }
    }
}

macro_rules! impl_from_signed {
    ($($t:ty),*) => {
        $(impl<'a> From<$t> for Value<'a> {
            fn from(v: $t) -> Self {
                Value::Int(v as i64)
            }
        })*
    };
}

macro_rules! impl_from_unsigned {
    ($($t:ty),*) => {
        $(impl<'a> From<$t> for Value<'a> {
            fn from(v: $t) -> Self {
                Value::UInt(v as u64)
            }
        })*
    };
}

impl_from_signed!(i8, i16, i32, i64, isize);
impl_from_unsigned!(u8, u16, u32, u64, usize);

impl<'a> From<bool> for Value<'a> {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl<'a> From<f64> for Value<'a> {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl<'a> From<f32> for Value<'a> {
    fn from(v: f32) -> Self {
        Value::Float32(v)
    }
}

impl<'a> From<char> for Value<'a> {
    fn from(v: char) -> Self {
        Value::Str(Cow::Owned(v.to_string()))
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(v: &'a str) -> Self {
        Value::Str(Cow::Borrowed(v))
    }
}

impl<'a> From<&'a String> for Value<'a> {
    fn from(v: &'a String) -> Self {
        Value::Str(Cow::Borrowed(v.as_str()))
    }
}

impl<'a> From<String> for Value<'a> {
    fn from(v: String) -> Self {
        Value::Str(Cow::Owned(v))
    }
}

impl<'a> From<Cow<'a, str>> for Value<'a> {
    fn from(v: Cow<'a, str>) -> Self {
        Value::Str(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_primitives() {
        assert!(matches!(Value::from(-5i8), Value::Int(-5)));
        assert!(matches!(Value::from(7usize), Value::UInt(7)));
        assert!(matches!(Value::from(u64::MAX), Value::UInt(u64::MAX)));
        assert!(matches!(Value::from(true), Value::Bool(true)));
        assert!(matches!(Value::from(1.5f32), Value::Float32(_)));
        assert!(matches!(Value::from(1.5f64), Value::Float(_)));
        assert!(matches!(Value::from('a'), Value::Str(Cow::Owned(ref s)) if s == "a"));
        assert!(matches!(Value::from("abc"), Value::Str(Cow::Borrowed("abc"))));
    }

    #[test]
    fn test_kinds() {
        assert!(Value::from(3).is_integer());
        assert!(Value::from(3u8).is_numeric());
        assert!(Value::complex(1.0, -1.0).is_float());
        assert!(Value::complex32(1.0, -1.0).is_float());
        assert_eq!(Value::complex32(1.0, -1.0).kind_name(), "complex");
        assert!(!Value::from("3").is_numeric());
        assert!(!Value::from(false).is_numeric());
        assert_eq!(Value::complex(1.0, -1.0).kind_name(), "complex");
        assert_eq!(Value::from("x").kind_name(), "string");
    }

    #[test]
    fn test_into_owned() {
        let v = vec![1, 2, 3];
        let owned = Value::debug(&v).into_owned();
        assert!(matches!(owned, Value::Str(ref s) if s == "[1, 2, 3]"));

        let addr = std::net::Ipv4Addr::LOCALHOST;
        let owned = Value::display(&addr).into_owned();
        assert!(matches!(owned, Value::Str(ref s) if s == "127.0.0.1"));
    }
}
