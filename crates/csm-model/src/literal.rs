//! Literal values extracted from legacy source
//!
//! Configuration dictionaries, column options and initializer defaults are
//! captured as [`LiteralValue`] trees and rendered back as Python source by
//! the generators.

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::fmt;

/// A statically-known Python value (or a verbatim expression when it is not)
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    /// `None`
    None,
    /// `True` / `False`
    Bool(bool),
    /// Integer literal
    Int(i64),
    /// Float literal
    Float(f64),
    /// String literal, unquoted
    Str(String),
    /// Bare or dotted name (`User`, `clearskies.column_types.String`)
    Name(String),
    /// List, tuple or set display
    List(Vec<LiteralValue>),
    /// Dictionary display, in source order
    Dict(Vec<(LiteralValue, LiteralValue)>),
    /// Constructor-style call with literal arguments
    Call {
        /// Called name (dotted)
        callee: String,
        /// Positional arguments
        arguments: Vec<LiteralValue>,
        /// Keyword arguments, in source order
        keywords: Vec<(String, LiteralValue)>,
    },
    /// Any other expression, kept as source text
    Expr(String),
}

impl LiteralValue {
    /// String payload, if this is a string literal
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Text of a string literal or a (dotted) name
    #[inline]
    #[must_use]
    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Self::Str(s) | Self::Name(s) => Some(s),
            Self::Call { callee, .. } => Some(callee),
            _ => None,
        }
    }

    /// Last dotted segment of [`Self::as_symbol`]
    #[must_use]
    pub fn symbol_tail(&self) -> Option<&str> {
        self.as_symbol()
            .and_then(|s| s.rsplit('.').next())
            .filter(|s| !s.is_empty())
    }

    /// Value of `key` when this is a dictionary with string/name keys
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&LiteralValue> {
        match self {
            Self::Dict(pairs) => pairs
                .iter()
                .find(|(k, _)| k.as_symbol() == Some(key))
                .map(|(_, v)| v),
            _ => None,
        }
    }

    /// True for empty strings, lists and dictionaries, `None` and `False`
    #[must_use]
    pub fn is_falsy(&self) -> bool {
        match self {
            Self::None => true,
            Self::Bool(b) => !b,
            Self::Int(i) => *i == 0,
            Self::Str(s) => s.is_empty(),
            Self::List(items) => items.is_empty(),
            Self::Dict(pairs) => pairs.is_empty(),
            _ => false,
        }
    }

    /// Render as Python source
    #[must_use]
    pub fn to_python(&self) -> String {
        match self {
            Self::None => "None".to_string(),
            Self::Bool(true) => "True".to_string(),
            Self::Bool(false) => "False".to_string(),
            Self::Int(i) => i.to_string(),
            Self::Float(f) => render_float(*f),
            Self::Str(s) => quote(s),
            Self::Name(n) | Self::Expr(n) => n.clone(),
            Self::List(items) => {
                let inner: Vec<String> = items.iter().map(Self::to_python).collect();
                format!("[{}]", inner.join(", "))
            }
            Self::Dict(pairs) => {
                let inner: Vec<String> = pairs
                    .iter()
                    .map(|(k, v)| format!("{}: {}", k.to_python(), v.to_python()))
                    .collect();
                format!("{{{}}}", inner.join(", "))
            }
            Self::Call {
                callee,
                arguments,
                keywords,
            } => {
                let args = arguments
                    .iter()
                    .map(Self::to_python)
                    .chain(keywords.iter().map(|(k, v)| format!("{k}={}", v.to_python())));
                format!("{callee}({})", args.collect::<Vec<_>>().join(", "))
            }
        }
    }
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_python())
    }
}

impl From<&str> for LiteralValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<bool> for LiteralValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for LiteralValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl Serialize for LiteralValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::None => serializer.serialize_none(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Int(i) => serializer.serialize_i64(*i),
            Self::Float(f) => serializer.serialize_f64(*f),
            Self::Str(s) | Self::Name(s) | Self::Expr(s) => serializer.serialize_str(s),
            Self::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Dict(pairs) => {
                let mut map = serializer.serialize_map(Some(pairs.len()))?;
                for (k, v) in pairs {
                    let key = k.as_symbol().map_or_else(|| k.to_python(), str::to_string);
                    map.serialize_entry(&key, v)?;
                }
                map.end()
            }
            Self::Call { .. } => serializer.serialize_str(&self.to_python()),
        }
    }
}

/// Quote a string as a double-quoted Python literal
#[must_use]
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn render_float(f: f64) -> String {
    if f.is_nan() {
        return "float(\"nan\")".to_string();
    }
    if f.is_infinite() {
        return if f > 0.0 {
            "float(\"inf\")".to_string()
        } else {
            "-float(\"inf\")".to_string()
        };
    }
    // Debug keeps a trailing ".0" for integral values
    format!("{f:?}")
}
