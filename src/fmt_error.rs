//! Errors in format patterns, specifiers, or the values rendered through them
use std::fmt::Display;
use pest::RuleType;

/// Type alias for a `Result` with [`FmtError`] as the error type.
pub type FmtResult<T> = Result<T, FmtError>;


/// An error raised while tokenizing a pattern or rendering one of its arguments.
///
/// None of these are recovered internally: the first error encountered aborts the
/// whole render and no partial output is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FmtError {
    /// The pattern ended inside an argument reference (e.g. `"{0"` or `"{"`).
    UnterminatedPattern,

    /// A brace appeared where it is not allowed: a `{` inside an argument reference,
    /// or a lone `}` in literal text that is not doubled. `position` is the byte offset
    /// of the brace in the pattern.
    UnexpectedBrace{ brace: char, position: usize },

    /// The format specifier after the `:` does not follow the
    /// `[[fill]align][sign][#][0][width][.precision][type]` grammar.
    InvalidSpecifier{ spec: String, reason: String },

    /// The specifier is syntactically valid but cannot be applied to the kind of value given,
    /// e.g. an integer type on a float or a sign on a string.
    TypeMismatch{ spec: String, kind: &'static str, reason: &'static str },

    /// A positional reference pointed past the end of the value list.
    UnknownArgumentIndex{ index: usize, count: usize },

    /// A positional reference was neither empty nor a number.
    InvalidArgumentIndex(String),

    /// The name lookup did not know the referenced name.
    UnknownArgumentName(String),

    /// An auto-indexed `{}` placeholder was used with named arguments.
    EmptyArgumentName,
}

impl Display for FmtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FmtError::UnterminatedPattern => {
                write!(f, "Unterminated pattern: an argument reference was opened but never closed")
            },
            FmtError::UnexpectedBrace { brace, position } => {
                write!(f, "Unexpected '{brace}' at byte {position}")
            },
            FmtError::InvalidSpecifier { spec, reason } => {
                write!(f, "Invalid format specifier '{spec}': {reason}")
            },
            FmtError::TypeMismatch { spec, kind, reason } => {
                write!(f, "Format specifier '{spec}' cannot be used with a {kind} value: {reason}")
            },
            FmtError::UnknownArgumentIndex { index, count } => {
                write!(f, "Argument index {index} out of range ({count} values given)")
            },
            FmtError::InvalidArgumentIndex(reference) => {
                write!(f, "Argument index '{reference}' is not a number")
            },
            FmtError::UnknownArgumentName(name) => {
                write!(f, "Argument with name '{name}' does not exist")
            },
            FmtError::EmptyArgumentName => {
                write!(f, "Argument name cannot be empty when formatting with named arguments")
            }
        }
    }
}

impl std::error::Error for FmtError {}

impl FmtError {
    pub fn from_pest<R: RuleType>(e: pest::error::Error<R>, spec: &str) -> Self {
        Self::InvalidSpecifier { spec: spec.to_owned(), reason: e.to_string() }
    }

    /// `true` for errors raised while tokenizing the pattern itself, `false` for
    /// errors tied to a single argument.
    pub fn is_pattern_error(&self) -> bool {
        matches!(self, FmtError::UnterminatedPattern | FmtError::UnexpectedBrace { .. })
    }
}
