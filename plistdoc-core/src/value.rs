//! Decoded plist values as a closed tree.
//!
//! The decoder hands back a `plist::Value`; converting it into a
//! [`ValueTree`] is where unknown value kinds are rejected, so the walk
//! itself is an exhaustive match with no fallthrough.

use std::fmt;
use std::time::SystemTime;

use chrono::{DateTime, FixedOffset, Offset, Utc};

use crate::error::Error;
use crate::event::ElementKind;

/// One decoded plist value and its descendants.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueTree {
    /// Key/value pairs in decode order. Keys are not checked for uniqueness.
    Dictionary(Vec<(String, ValueTree)>),

    /// Ordered list.
    Sequence(Vec<ValueTree>),

    /// Unordered collection, kept in decoder order. Duplicates are preserved.
    Set(Vec<ValueTree>),

    /// Unicode string.
    Text(String),

    /// Integer, real or boolean.
    Number(Number),

    /// Opaque bytes, possibly an embedded document.
    RawData(Vec<u8>),

    /// Instant with the offset it is rendered in.
    Timestamp(DateTime<FixedOffset>),
}

impl ValueTree {
    /// Build a dictionary from key/value pairs.
    pub fn dict<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, ValueTree)>,
    {
        ValueTree::Dictionary(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Build a text value.
    pub fn text(s: impl Into<String>) -> Self {
        ValueTree::Text(s.into())
    }

    /// Build an integer number.
    pub fn integer(i: i64) -> Self {
        ValueTree::Number(Number::Integer(i))
    }

    /// Element the value renders as.
    pub fn element_kind(&self) -> ElementKind {
        match self {
            ValueTree::Dictionary(_) => ElementKind::Dict,
            ValueTree::Sequence(_) => ElementKind::Array,
            ValueTree::Set(_) => ElementKind::Set,
            ValueTree::Text(_) => ElementKind::String,
            ValueTree::Number(_) => ElementKind::Number,
            ValueTree::RawData(_) => ElementKind::Data,
            ValueTree::Timestamp(_) => ElementKind::Date,
        }
    }

    /// Number of nodes in the tree, dictionary keys not counted.
    pub fn node_count(&self) -> usize {
        1 + match self {
            ValueTree::Dictionary(entries) => entries.iter().map(|(_, v)| v.node_count()).sum(),
            ValueTree::Sequence(items) | ValueTree::Set(items) => {
                items.iter().map(ValueTree::node_count).sum()
            }
            _ => 0,
        }
    }

    /// Nesting depth; a scalar has depth 1.
    pub fn depth(&self) -> usize {
        1 + match self {
            ValueTree::Dictionary(entries) => {
                entries.iter().map(|(_, v)| v.depth()).max().unwrap_or(0)
            }
            ValueTree::Sequence(items) | ValueTree::Set(items) => {
                items.iter().map(ValueTree::depth).max().unwrap_or(0)
            }
            _ => 0,
        }
    }

    /// Convert decoder output into a tree.
    ///
    /// Fails with [`Error::UnsupportedShape`] on value kinds with no markup
    /// rendering (keyed-archive UIDs and anything the decoder adds later).
    pub fn from_plist(value: plist::Value) -> Result<Self, Error> {
        Ok(match value {
            plist::Value::Dictionary(dict) => ValueTree::Dictionary(
                dict.into_iter()
                    .map(|(k, v)| Ok((k, ValueTree::from_plist(v)?)))
                    .collect::<Result<_, Error>>()?,
            ),
            plist::Value::Array(items) => ValueTree::Sequence(
                items
                    .into_iter()
                    .map(ValueTree::from_plist)
                    .collect::<Result<_, _>>()?,
            ),
            plist::Value::String(s) => ValueTree::Text(s),
            plist::Value::Integer(i) => ValueTree::Number(Number::try_from(i)?),
            plist::Value::Real(r) => ValueTree::Number(Number::Real(r)),
            plist::Value::Boolean(b) => ValueTree::Number(Number::Boolean(b)),
            plist::Value::Data(bytes) => ValueTree::RawData(bytes),
            plist::Value::Date(date) => ValueTree::Timestamp(timestamp_utc(date.into())),
            plist::Value::Uid(_) => return Err(Error::UnsupportedShape { kind: "uid" }),
            _ => return Err(Error::UnsupportedShape { kind: "unknown" }),
        })
    }
}

impl TryFrom<plist::Value> for ValueTree {
    type Error = Error;

    fn try_from(value: plist::Value) -> Result<Self, Self::Error> {
        ValueTree::from_plist(value)
    }
}

/// Plist dates are absolute instants; they render at offset +0000.
fn timestamp_utc(time: SystemTime) -> DateTime<FixedOffset> {
    DateTime::<Utc>::from(time).with_timezone(&Utc.fix())
}

/// Numeric plist scalar.
///
/// Booleans live here because the plist object model files them under
/// numbers; they render as `true` / `false`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Integer(i64),
    /// Integers above `i64::MAX`.
    Unsigned(u64),
    Real(f64),
    Boolean(bool),
}

impl TryFrom<plist::Integer> for Number {
    type Error = Error;

    fn try_from(i: plist::Integer) -> Result<Self, Self::Error> {
        i.as_signed()
            .map(Number::Integer)
            .or_else(|| i.as_unsigned().map(Number::Unsigned))
            .ok_or(Error::UnsupportedShape { kind: "integer" })
    }
}

/// Canonical text form.
///
/// Reals use the shortest round-trip rendering and always keep a decimal
/// point or exponent, so `1.0` never collapses to `1`. Non-finite reals use
/// the XML plist spelling: `nan`, `inf`, `-inf`.
impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(i) => write!(f, "{}", i),
            Number::Unsigned(u) => write!(f, "{}", u),
            Number::Real(r) if r.is_nan() => f.write_str("nan"),
            Number::Real(r) if r.is_infinite() => {
                f.write_str(if r.is_sign_negative() { "-inf" } else { "inf" })
            }
            Number::Real(r) => write!(f, "{:?}", r),
            Number::Boolean(b) => write!(f, "{}", b),
        }
    }
}
