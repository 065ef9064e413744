//! Split a pattern into literal text and argument references.
//!
//! The tokenizer makes a single left-to-right pass over the pattern and never looks
//! at the format specifiers themselves; those are handed to
//! [`FormatSpec::parse`](crate::format_specs::FormatSpec::parse) at render time.
//!
//! ```
//! # use bracefmt::parsing::{tokenize, Segment};
//! let segments = tokenize("te{0:+.23}st").unwrap();
//! assert_eq!(segments, vec![
//!     Segment::Text("te".to_owned()),
//!     Segment::Argument { reference: "0".to_owned(), spec: "+.23".to_owned() },
//!     Segment::Text("st".to_owned()),
//! ]);
//! ```
use std::fmt::Display;

use crate::fmt_error::{FmtError, FmtResult};

/// One unit of a tokenized pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Segment {
    /// Literal text, with any `{{`/`}}` escapes already collapsed.
    Text(String),

    /// A `{reference:spec}` placeholder. `reference` is empty for an auto-indexed `{}`,
    /// and `spec` is empty when no `:` was present.
    Argument{ reference: String, spec: String },
}

impl Segment {
    /// `true` if the segment is an argument reference, `false` for literal text.
    pub fn is_argument(&self) -> bool {
        if let Self::Argument { .. } = self {
            true
        } else {
            false
        }
    }
}

impl Display for Segment {
    /// Write the segment back out in pattern syntax, re-escaping literal braces.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Segment::Text(text) => {
                for c in text.chars() {
                    match c {
                        '{' => write!(f, "{{{{")?,
                        '}' => write!(f, "}}}}")?,
                        _ => write!(f, "{c}")?,
                    }
                }
                Ok(())
            },
            Segment::Argument { reference, spec } if spec.is_empty() => write!(f, "{{{reference}}}"),
            Segment::Argument { reference, spec } => write!(f, "{{{reference}:{spec}}}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    InText,
    SawOpenBrace,
    SawCloseBrace,
    InArgument,
}

/// Tokenize a pattern into its [`Segment`]s.
///
/// Returns an error for a `{` inside an argument, an undoubled `}` in text, or a
/// pattern that ends before an argument is closed. Tokenizing is a pure function of
/// the pattern, so the same input always gives the same segments.
pub fn tokenize(pattern: &str) -> FmtResult<Vec<Segment>> {
    let mut segments = vec![];
    let mut text = String::new();
    let mut argument = String::new();
    let mut state = State::InText;
    // Byte offset of the brace that moved us out of InText, for error reporting
    let mut brace_pos = 0;

    for (pos, c) in pattern.char_indices() {
        state = match (state, c) {
            (State::InText, '{') => {
                brace_pos = pos;
                State::SawOpenBrace
            },
            (State::InText, '}') => {
                brace_pos = pos;
                State::SawCloseBrace
            },
            (State::InText, _) => {
                text.push(c);
                State::InText
            },

            (State::SawOpenBrace, '{') => {
                text.push('{');
                State::InText
            },
            (State::SawOpenBrace, '}') => {
                flush_text(&mut segments, &mut text);
                segments.push(Segment::Argument { reference: String::new(), spec: String::new() });
                State::InText
            },
            (State::SawOpenBrace, _) => {
                flush_text(&mut segments, &mut text);
                argument.push(c);
                State::InArgument
            },

            (State::SawCloseBrace, '}') => {
                text.push('}');
                State::InText
            },
            (State::SawCloseBrace, _) => {
                return Err(FmtError::UnexpectedBrace { brace: '}', position: brace_pos });
            },

            (State::InArgument, '}') => {
                segments.push(split_argument(&argument));
                argument.clear();
                State::InText
            },
            (State::InArgument, '{') => {
                return Err(FmtError::UnexpectedBrace { brace: '{', position: pos });
            },
            (State::InArgument, _) => {
                argument.push(c);
                State::InArgument
            },
        };
    }

    match state {
        State::InText => {
            flush_text(&mut segments, &mut text);
            Ok(segments)
        },
        State::SawCloseBrace => Err(FmtError::UnexpectedBrace { brace: '}', position: brace_pos }),
        State::SawOpenBrace | State::InArgument => Err(FmtError::UnterminatedPattern),
    }
}

fn flush_text(segments: &mut Vec<Segment>, text: &mut String) {
    if !text.is_empty() {
        segments.push(Segment::Text(std::mem::take(text)));
    }
}

fn split_argument(argument: &str) -> Segment {
    let (reference, spec) = argument.split_once(':').unwrap_or((argument, ""));
    Segment::Argument { reference: reference.to_owned(), spec: spec.to_owned() }
}
