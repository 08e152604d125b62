//! Discriminator match values and scalar conversion.
//!
//! A mapping table fixes its comparison type from its first non-null entry.
//! The JSON scalar found in a document is converted to that type before the
//! lookup; a value that does not convert simply matches nothing.

use std::fmt;

use crate::config::HostConfig;
use crate::naming::eq_ignore_case;
use crate::type_desc::{EnumDescriptor, EnumMember};
use crate::view::{JsonView, ValueKind};

/// `f64` keyed by its bit pattern, with `-0.0` folded into `0.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FloatKey(u64);

impl FloatKey {
    pub fn new(value: f64) -> Self {
        let value = if value == 0.0 { 0.0 } else { value };
        Self(value.to_bits())
    }

    pub fn get(self) -> f64 {
        f64::from_bits(self.0)
    }
}

/// Key of a discriminator mapping entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MatchValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(FloatKey),
    Str(String),
    Enum(EnumMember),
}

impl MatchValue {
    /// Comparison type of this value; `None` for `Null`.
    pub fn kind(&self) -> Option<MatchKind> {
        match self {
            Self::Null => None,
            Self::Bool(_) => Some(MatchKind::Bool),
            Self::Int(_) => Some(MatchKind::Int),
            Self::Float(_) => Some(MatchKind::Float),
            Self::Str(_) => Some(MatchKind::Str),
            Self::Enum(member) => Some(MatchKind::Enum(member.enum_type().clone())),
        }
    }
}

impl fmt::Display for MatchValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{}", x.get()),
            Self::Str(s) => write!(f, "{s:?}"),
            Self::Enum(member) => write!(f, "{member}"),
        }
    }
}

impl From<&str> for MatchValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for MatchValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<i64> for MatchValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for MatchValue {
    fn from(value: i32) -> Self {
        Self::Int(value as i64)
    }
}

impl From<f64> for MatchValue {
    fn from(value: f64) -> Self {
        Self::Float(FloatKey::new(value))
    }
}

impl From<bool> for MatchValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<EnumMember> for MatchValue {
    fn from(value: EnumMember) -> Self {
        Self::Enum(value)
    }
}

impl<T: Into<MatchValue>> From<Option<T>> for MatchValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Runtime type a discriminator scalar is converted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchKind {
    Bool,
    Int,
    Float,
    Str,
    Enum(EnumDescriptor),
}

impl MatchKind {
    /// Converts a non-null JSON scalar into a key of this kind.
    ///
    /// Objects, arrays and unconvertible scalars yield `None`.
    pub fn convert<V: JsonView>(&self, value: &V, config: &HostConfig) -> Option<MatchValue> {
        match self {
            Self::Str => match value.kind() {
                ValueKind::String => value.as_str().map(MatchValue::from),
                ValueKind::Number => value.number_text().map(MatchValue::Str),
                ValueKind::Bool => value.as_bool().map(|b| MatchValue::Str(b.to_string())),
                _ => None,
            },
            Self::Int => convert_int(value).map(MatchValue::Int),
            Self::Float => convert_float(value).map(MatchValue::from),
            Self::Bool => convert_bool(value).map(MatchValue::Bool),
            Self::Enum(ty) => convert_enum(ty, value, config).map(MatchValue::Enum),
        }
    }
}

fn convert_int<V: JsonView>(value: &V) -> Option<i64> {
    match value.kind() {
        ValueKind::Number => value.as_i64().or_else(|| integral(value.as_f64()?)),
        ValueKind::String => value.as_str()?.trim().parse().ok(),
        _ => None,
    }
}

fn convert_float<V: JsonView>(value: &V) -> Option<f64> {
    match value.kind() {
        ValueKind::Number => value.as_f64(),
        ValueKind::String => value.as_str()?.trim().parse().ok(),
        _ => None,
    }
}

fn convert_bool<V: JsonView>(value: &V) -> Option<bool> {
    match value.kind() {
        ValueKind::Bool => value.as_bool(),
        ValueKind::String => {
            let s = value.as_str()?.trim();
            if eq_ignore_case(s, "true") {
                Some(true)
            } else if eq_ignore_case(s, "false") {
                Some(false)
            } else {
                None
            }
        }
        _ => None,
    }
}

/// `x` as an `i64` when it is a whole number in `[-2^63, 2^63)`.
fn integral(x: f64) -> Option<i64> {
    // i64::MAX rounds up to 2^63 as f64, which is already out of range.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if x.fract() == 0.0 && (-LIMIT..LIMIT).contains(&x) {
        Some(x as i64)
    } else {
        None
    }
}

/// Enum members convert from their number or from their name. Names compare
/// case-insensitively, in both declared and policy-converted spelling.
fn convert_enum<V: JsonView>(
    ty: &EnumDescriptor,
    value: &V,
    config: &HostConfig,
) -> Option<EnumMember> {
    match value.kind() {
        ValueKind::Number => ty.member_by_number(value.as_i64()?),
        ValueKind::String => {
            let text = value.as_str()?.trim();
            if let Ok(number) = text.parse::<i64>() {
                return ty.member_by_number(number);
            }
            ty.members()
                .position(|(name, _)| {
                    eq_ignore_case(name, text)
                        || config
                            .enum_naming
                            .is_some_and(|policy| eq_ignore_case(&policy.convert(name), text))
                })
                .map(|index| ty.member_at(index))
        }
        _ => None,
    }
}
