//! Brace-style string formatting with a runtime pattern.
//!
//! A pattern mixes literal text with `{reference:spec}` placeholders. References are
//! positional (`{0}`, `{}`) or named (`{name}`), and the optional specifier follows
//! the `[[fill]align][sign][#][0][width][.precision][type]` mini-language:
//!
//! ```
//! use bracefmt::format_positional;
//!
//! let s = format_positional("{0:*^9}|{1:+.2f}|{2:#06x}", &["mid".into(), 3.14159.into(), 255.into()]).unwrap();
//! assert_eq!(s, "***mid***|+3.14|0x00ff");
//! ```
//!
//! See [`template`] for the formatting entry points, [`format_specs`] for the specifier
//! grammar, and [`value`] for the kinds of values that can be formatted.
extern crate pest;
#[macro_use]
extern crate pest_derive;
pub mod fmt_error;
pub mod format_specs;
pub mod parsing;
pub mod render;
pub mod template;
pub mod value;

pub use fmt_error::{FmtError, FmtResult};
pub use template::{format_cached, format_map, format_named, format_positional, PatternCache, Template};
pub use value::Value;
