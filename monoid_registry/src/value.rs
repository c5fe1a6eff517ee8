/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Dynamically typed values and the tags that select their monoid.
//!
//! A [`Value`] is one of a handful of built-in shapes (integers,
//! sequences, sets, mappings, ...) or a caller-defined shape carried as
//! [`Value::Tagged`]. Every value reports a [`TypeTag`], which a
//! [`crate::Registry`] maps to the structure used to combine it.
//!
//! Values are totally ordered and hashable so that they can serve as set
//! elements and mapping keys. Floats compare by [`f64::total_cmp`].

use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fmt;
use std::fmt::Write as _;
use std::hash::Hash;
use std::hash::Hasher;

use serde::Deserialize;
use serde::Serialize;

/// A stable identifier naming the shape of a [`Value`].
///
/// Built-in shapes use the associated constants; caller-defined shapes
/// pick their own names, e.g. `TypeTag::new("histogram")`.
#[derive(
    Clone,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize
)]
#[serde(transparent)]
pub struct TypeTag(Cow<'static, str>);

impl TypeTag {
    /// Tag of [`Value::Int`].
    pub const INT: TypeTag = TypeTag::from_static("int");
    /// Tag of [`Value::Float`].
    pub const FLOAT: TypeTag = TypeTag::from_static("float");
    /// Tag of [`Value::Bool`].
    pub const BOOL: TypeTag = TypeTag::from_static("bool");
    /// Tag of [`Value::Str`].
    pub const STR: TypeTag = TypeTag::from_static("str");
    /// Tag of [`Value::Seq`].
    pub const SEQ: TypeTag = TypeTag::from_static("seq");
    /// Tag of [`Value::Set`].
    pub const SET: TypeTag = TypeTag::from_static("set");
    /// Tag of [`Value::Map`].
    pub const MAP: TypeTag = TypeTag::from_static("map");

    /// A tag backed by a static string.
    pub const fn from_static(name: &'static str) -> Self {
        TypeTag(Cow::Borrowed(name))
    }

    /// A tag backed by an owned string.
    pub fn new(name: impl Into<String>) -> Self {
        TypeTag(Cow::Owned(name.into()))
    }

    /// The tag's name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for TypeTag {
    fn from(name: &'static str) -> Self {
        TypeTag::from_static(name)
    }
}

impl From<String> for TypeTag {
    fn from(name: String) -> Self {
        TypeTag::new(name)
    }
}

// Statics so that `Value::tag` can hand out `'static` references.
static INT_TAG: TypeTag = TypeTag::INT;
static FLOAT_TAG: TypeTag = TypeTag::FLOAT;
static BOOL_TAG: TypeTag = TypeTag::BOOL;
static STR_TAG: TypeTag = TypeTag::STR;
static SEQ_TAG: TypeTag = TypeTag::SEQ;
static SET_TAG: TypeTag = TypeTag::SET;
static MAP_TAG: TypeTag = TypeTag::MAP;

/// A dynamically typed value.
///
/// # Example
///
/// ```
/// use monoid_registry::TypeTag;
/// use monoid_registry::Value;
///
/// let v = Value::map([("a", Value::seq([1, 2])), ("b", Value::from(1))]);
/// assert_eq!(v.tag(), &TypeTag::MAP);
/// assert_eq!(v.to_string(), r#"{"a": [1, 2], "b": 1}"#);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Value {
    /// A signed integer.
    Int(i64),
    /// A floating point number. No built-in structure combines floats.
    Float(f64),
    /// A boolean. No built-in structure combines bare booleans.
    Bool(bool),
    /// A string. No built-in structure combines bare strings.
    Str(String),
    /// An ordered sequence.
    Seq(Vec<Value>),
    /// A set.
    Set(BTreeSet<Value>),
    /// An associative mapping.
    Map(BTreeMap<Value, Value>),
    /// A caller-defined shape: a payload carrying its own tag.
    Tagged(TypeTag, Box<Value>),
}

impl Value {
    /// The tag used to look up this value's structure.
    pub fn tag(&self) -> &TypeTag {
        match self {
            Value::Int(_) => &INT_TAG,
            Value::Float(_) => &FLOAT_TAG,
            Value::Bool(_) => &BOOL_TAG,
            Value::Str(_) => &STR_TAG,
            Value::Seq(_) => &SEQ_TAG,
            Value::Set(_) => &SET_TAG,
            Value::Map(_) => &MAP_TAG,
            Value::Tagged(tag, _) => tag,
        }
    }

    /// Build a sequence.
    pub fn seq<I, V>(items: I) -> Value
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Value::Seq(items.into_iter().map(Into::into).collect())
    }

    /// Build a set.
    pub fn set<I, V>(items: I) -> Value
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Value::Set(items.into_iter().map(Into::into).collect())
    }

    /// Build a mapping. Later entries replace earlier ones with an equal
    /// key.
    pub fn map<I, K, V>(entries: I) -> Value
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Value>,
        V: Into<Value>,
    {
        Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Wrap a payload in a caller-defined tag.
    pub fn tagged(tag: impl Into<TypeTag>, payload: impl Into<Value>) -> Value {
        Value::Tagged(tag.into(), Box::new(payload.into()))
    }

    /// Render at most `limit` characters of this value's display form.
    ///
    /// Rendering stops as soon as the limit is reached, so previewing a
    /// huge value costs no more than the preview itself.
    pub fn preview(&self, limit: usize) -> String {
        let mut out = String::new();
        let mut writer = Bounded {
            out: &mut out,
            remaining: limit,
        };
        // Err only means the limit was hit.
        let _ = write!(writer, "{}", self);
        out
    }

    /// The mapping payload, if this is a [`Value::Map`].
    pub fn as_map(&self) -> Option<&BTreeMap<Value, Value>> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Value::Int(_) => 0,
            Value::Float(_) => 1,
            Value::Bool(_) => 2,
            Value::Str(_) => 3,
            Value::Seq(_) => 4,
            Value::Set(_) => 5,
            Value::Map(_) => 6,
            Value::Tagged(..) => 7,
        }
    }
}

/// A `fmt::Write` sink that refuses output past a character budget.
struct Bounded<'a> {
    out: &'a mut String,
    remaining: usize,
}

impl fmt::Write for Bounded<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for ch in s.chars() {
            if self.remaining == 0 {
                return Err(fmt::Error);
            }
            self.out.push(ch);
            self.remaining -= 1;
        }
        Ok(())
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => a.total_cmp(b),
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Str(a), Value::Str(b)) => a.cmp(b),
            (Value::Seq(a), Value::Seq(b)) => a.cmp(b),
            (Value::Set(a), Value::Set(b)) => a.cmp(b),
            (Value::Map(a), Value::Map(b)) => a.cmp(b),
            (Value::Tagged(ta, a), Value::Tagged(tb, b)) => ta.cmp(tb).then_with(|| a.cmp(b)),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Value::Int(v) => v.hash(state),
            Value::Float(v) => v.to_bits().hash(state),
            Value::Bool(v) => v.hash(state),
            Value::Str(v) => v.hash(state),
            Value::Seq(v) => v.hash(state),
            Value::Set(v) => v.hash(state),
            Value::Map(v) => v.hash(state),
            Value::Tagged(tag, v) => {
                tag.hash(state);
                v.hash(state);
            }
        }
    }
}

fn write_joined<'a, I, F>(f: &mut fmt::Formatter<'_>, items: I, mut each: F) -> fmt::Result
where
    I: IntoIterator<Item = &'a Value>,
    F: FnMut(&mut fmt::Formatter<'_>, &'a Value) -> fmt::Result,
{
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        each(f, item)?;
    }
    Ok(())
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{:?}", v),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Str(v) => write!(f, "{:?}", v),
            Value::Seq(items) => {
                f.write_char('[')?;
                write_joined(f, items, |f, v| write!(f, "{}", v))?;
                f.write_char(']')
            }
            Value::Set(items) if items.is_empty() => f.write_str("set()"),
            Value::Set(items) => {
                f.write_char('{')?;
                write_joined(f, items, |f, v| write!(f, "{}", v))?;
                f.write_char('}')
            }
            Value::Map(entries) => {
                f.write_char('{')?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                f.write_char('}')
            }
            Value::Tagged(tag, payload) => write!(f, "{}({})", tag, payload),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v.into())
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Int(v.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Seq(v)
    }
}

impl From<BTreeSet<Value>> for Value {
    fn from(v: BTreeSet<Value>) -> Self {
        Value::Set(v)
    }
}

impl From<BTreeMap<Value, Value>> for Value {
    fn from(v: BTreeMap<Value, Value>) -> Self {
        Value::Map(v)
    }
}

/// A JSON document with no [`Value`] counterpart.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FromJsonError {
    /// JSON `null`.
    #[error("JSON null has no value representation")]
    Null,

    /// An integer literal too large for [`Value::Int`].
    #[error("integer {0} does not fit in a signed 64-bit value")]
    IntegerOutOfRange(u64),
}

impl TryFrom<serde_json::Value> for Value {
    type Error = FromJsonError;

    /// Objects become mappings with string keys, arrays become
    /// sequences, integers become [`Value::Int`] and numbers with a
    /// fraction or exponent [`Value::Float`].
    ///
    /// Positive integers above `i64::MAX` are rejected rather than
    /// widened to a float. Integers below `i64::MIN` are already parsed
    /// as floats by `serde_json` and arrive here as [`Value::Float`].
    fn try_from(json: serde_json::Value) -> Result<Self, Self::Error> {
        Ok(match json {
            serde_json::Value::Null => return Err(FromJsonError::Null),
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match (n.as_i64(), n.as_u64()) {
                (Some(i), _) => Value::Int(i),
                (None, Some(u)) => return Err(FromJsonError::IntegerOutOfRange(u)),
                (None, None) => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(items) => Value::Seq(
                items
                    .into_iter()
                    .map(Value::try_from)
                    .collect::<Result<_, _>>()?,
            ),
            serde_json::Value::Object(entries) => Value::Map(
                entries
                    .into_iter()
                    .map(|(k, v)| Ok((Value::Str(k), Value::try_from(v)?)))
                    .collect::<Result<_, FromJsonError>>()?,
            ),
        })
    }
}
