//! Format whole patterns with positional or named arguments.
//!
//! # Basic usage
//!
//! ```
//! use bracefmt::{format_positional, format_map};
//! use std::collections::HashMap;
//!
//! let s = format_positional("{0:>6}|{1:<6}|", &[42.into(), "ab".into()]).unwrap();
//! assert_eq!(s, "    42|ab    |");
//!
//! let mut values = HashMap::new();
//! values.insert("name", "jack");
//! let s = format_map("hello, {name}", &values).unwrap();
//! assert_eq!(s, "hello, jack");
//! ```
//!
//! # Auto-indexed arguments
//!
//! An empty reference (`{}`) takes the value whose index equals the placeholder's
//! position among *all* segments of the pattern, literal text included. So
//! `"{}{}"` uses values 0 and 1, but `"x{}"` uses value 1, because the literal `x`
//! is segment 0:
//!
//! ```
//! # use bracefmt::format_positional;
//! assert_eq!(format_positional("{}{}", &["a".into(), "b".into()]).unwrap(), "ab");
//! assert_eq!(format_positional("x{}", &["a".into(), "b".into()]).unwrap(), "xb");
//! ```
//!
//! # Reusing a pattern
//!
//! Each of the `format_*` functions tokenizes the pattern on every call. When the
//! same pattern is used repeatedly, parse it once into a [`Template`], or let a
//! [`PatternCache`] keep the parsed templates.
use std::borrow::Borrow;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, PoisonError, RwLock};

use once_cell::sync::Lazy;
use tracing::trace;

use crate::fmt_error::{FmtError, FmtResult};
use crate::parsing::{tokenize, Segment};
use crate::render::render_with_spec;
use crate::value::Value;

/// A pattern that has been tokenized once and can be rendered many times.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    /// Tokenize `pattern`. Format specifiers are not checked until the template is rendered.
    pub fn parse(pattern: &str) -> FmtResult<Self> {
        Ok(Self { segments: tokenize(pattern)? })
    }

    /// The segments of this template, in pattern order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Consume the `Template` and return the inner `Vec<Segment>`.
    pub fn into_segments(self) -> Vec<Segment> {
        self.segments
    }

    /// The number of argument references in this template.
    pub fn n_arguments(&self) -> usize {
        self.segments.iter().filter(|s| s.is_argument()).count()
    }

    /// Render with positional values.
    ///
    /// `{n}` takes `values[n]`; `{}` takes the value at the placeholder's segment
    /// position (see the [module docs](self)).
    pub fn format(&self, values: &[Value]) -> FmtResult<String> {
        let mut out = String::new();
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Argument { reference, spec } => {
                    let index = if reference.is_empty() {
                        i
                    } else {
                        reference.parse()
                            .map_err(|_| FmtError::InvalidArgumentIndex(reference.clone()))?
                    };
                    let value = values.get(index)
                        .ok_or(FmtError::UnknownArgumentIndex { index, count: values.len() })?;
                    render_with_spec(value, spec, &mut out)?;
                }
            }
        }
        Ok(out)
    }

    /// Render with named values.
    ///
    /// `lookup` is called once for each argument reference in the pattern, in order,
    /// and should return `None` for names it does not know.
    pub fn format_named<'v, F>(&self, mut lookup: F) -> FmtResult<String>
    where F: FnMut(&str) -> Option<Value<'v>>
    {
        let mut out = String::new();
        for segment in self.segments.iter() {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Argument { reference, spec } => {
                    if reference.is_empty() {
                        return Err(FmtError::EmptyArgumentName);
                    }
                    let value = lookup(reference)
                        .ok_or_else(|| FmtError::UnknownArgumentName(reference.clone()))?;
                    render_with_spec(&value, spec, &mut out)?;
                }
            }
        }
        Ok(out)
    }

    /// Render with named values taken from a map.
    pub fn format_map<'v, K, V>(&self, values: &HashMap<K, V>) -> FmtResult<String>
    where K: Borrow<str> + Hash + Eq,
          V: Clone + Into<Value<'v>>
    {
        self.format_named(|name| values.get(name).cloned().map(Into::into))
    }
}

/// Format `pattern` with positional values.
///
/// ```
/// # use bracefmt::format_positional;
/// assert_eq!(format_positional("{0:0^10}", &[(-1).into()]).unwrap(), "0000-10000");
/// ```
pub fn format_positional(pattern: &str, values: &[Value]) -> FmtResult<String> {
    Template::parse(pattern)?.format(values)
}

/// Format `pattern` with values supplied by a name lookup.
///
/// ```
/// # use bracefmt::format_named;
/// # use bracefmt::value::Value;
/// let s = format_named("{name}, {age}", |name| match name {
///     "name" => Some(Value::from("jack")),
///     "age" => Some(Value::from(16)),
///     _ => None,
/// }).unwrap();
/// assert_eq!(s, "jack, 16");
/// ```
pub fn format_named<'v, F>(pattern: &str, lookup: F) -> FmtResult<String>
where F: FnMut(&str) -> Option<Value<'v>>
{
    Template::parse(pattern)?.format_named(lookup)
}

/// Format `pattern` with named values from a map.
pub fn format_map<'v, K, V>(pattern: &str, values: &HashMap<K, V>) -> FmtResult<String>
where K: Borrow<str> + Hash + Eq,
      V: Clone + Into<Value<'v>>
{
    Template::parse(pattern)?.format_map(values)
}

/// Format `pattern` with positional values, tokenizing it through the
/// [global cache](PatternCache::global).
pub fn format_cached(pattern: &str, values: &[Value]) -> FmtResult<String> {
    PatternCache::global().get_or_parse(pattern)?.format(values)
}


static GLOBAL_CACHE: Lazy<PatternCache> = Lazy::new(PatternCache::new);

/// A thread-safe map from pattern text to its parsed [`Template`].
///
/// Each distinct pattern is stored at most once; patterns that fail to tokenize
/// are not stored.
#[derive(Debug, Default)]
pub struct PatternCache {
    templates: RwLock<HashMap<String, Arc<Template>>>,
}

impl PatternCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// A process-wide cache, used by [`format_cached`].
    pub fn global() -> &'static PatternCache {
        &GLOBAL_CACHE
    }

    /// Return the cached template for `pattern`, tokenizing and storing it if absent.
    ///
    /// If two threads race on the same new pattern, both tokenize it but only the first
    /// one to take the write lock stores its template; both get that stored template back.
    pub fn get_or_parse(&self, pattern: &str) -> FmtResult<Arc<Template>> {
        // The map only ever holds complete templates, so a poisoned lock is still usable
        if let Some(template) = self.templates.read().unwrap_or_else(PoisonError::into_inner).get(pattern) {
            return Ok(Arc::clone(template));
        }

        let template = Template::parse(pattern)?;
        let mut templates = self.templates.write().unwrap_or_else(PoisonError::into_inner);
        match templates.entry(pattern.to_owned()) {
            Entry::Occupied(entry) => Ok(Arc::clone(entry.get())),
            Entry::Vacant(entry) => {
                trace!(pattern_len = pattern.len(), segments = template.segments().len(), "caching tokenized pattern");
                Ok(Arc::clone(entry.insert(Arc::new(template))))
            }
        }
    }

    /// The number of patterns stored.
    pub fn len(&self) -> usize {
        self.templates.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove all stored patterns.
    pub fn clear(&self) {
        let mut templates = self.templates.write().unwrap_or_else(PoisonError::into_inner);
        trace!(n_patterns = templates.len(), "clearing pattern cache");
        templates.clear();
    }
}
