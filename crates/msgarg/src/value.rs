// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Native value model.
//!
//! [`Value`] is the host-side counterpart of a wire value: a closed tagged
//! enum over the primitive types, strings, tuples, sequences, and typed
//! dictionaries. The enum is also the "any" carrier for variants; the
//! encoder infers a wire signature from the tag when the declared signature
//! is `v`.

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;

/// A native value.
///
/// The variant order matches the wire signature inference precedence used
/// by the encoder (byte, bool, int16, uint16, int32, uint32, int64, uint64,
/// double, string, struct, sequence, dictionary).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Byte(u8),
    Bool(bool),
    Int16(i16),
    UInt16(u16),
    Int32(i32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    Double(f64),
    Str(String),
    /// Ordered heterogeneous tuple.
    Struct(Vec<Value>),
    /// Ordered sequence; elements may be of mixed shape.
    Array(Vec<Value>),
    /// Key-unique mapping with a fixed key kind.
    Dict(Dict),
}

impl Value {
    /// Short shape name for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Byte(_) => "byte",
            Self::Bool(_) => "bool",
            Self::Int16(_) => "int16",
            Self::UInt16(_) => "uint16",
            Self::Int32(_) => "int32",
            Self::UInt32(_) => "uint32",
            Self::Int64(_) => "int64",
            Self::UInt64(_) => "uint64",
            Self::Double(_) => "double",
            Self::Str(_) => "string",
            Self::Struct(_) => "struct",
            Self::Array(_) => "array",
            Self::Dict(_) => "dictionary",
        }
    }

    /// Try to get as byte.
    pub fn as_byte(&self) -> Option<u8> {
        match self {
            Self::Byte(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as bool.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as i16.
    pub fn as_i16(&self) -> Option<i16> {
        match self {
            Self::Int16(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as u16.
    pub fn as_u16(&self) -> Option<u16> {
        match self {
            Self::UInt16(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as i32.
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Self::Int32(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as u32.
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            Self::UInt32(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as i64.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int64(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as u64.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::UInt64(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as f64.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Double(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as string slice.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as struct members.
    pub fn as_struct(&self) -> Option<&[Value]> {
        match self {
            Self::Struct(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as sequence.
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as dictionary.
    pub fn as_dict(&self) -> Option<&Dict> {
        match self {
            Self::Dict(v) => Some(v),
            _ => None,
        }
    }
}

// Conversion traits
impl From<u8> for Value {
    fn from(v: u8) -> Self {
        Self::Byte(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self {
        Self::Int16(v)
    }
}

impl From<u16> for Value {
    fn from(v: u16) -> Self {
        Self::UInt16(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int32(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Self::UInt32(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int64(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Self::UInt64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<Dict> for Value {
    fn from(v: Dict) -> Self {
        Self::Dict(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Self::Array(v.into_iter().map(Into::into).collect())
    }
}

/// The key kind a dictionary is declared over. Only primitives and strings
/// are legal dictionary keys on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DictKeyKind {
    Byte,
    Bool,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Double,
    Str,
}

impl DictKeyKind {
    /// The key's one-character type signature.
    pub fn signature(self) -> &'static str {
        match self {
            Self::Byte => "y",
            Self::Bool => "b",
            Self::Int16 => "n",
            Self::UInt16 => "q",
            Self::Int32 => "i",
            Self::UInt32 => "u",
            Self::Int64 => "x",
            Self::UInt64 => "t",
            Self::Double => "d",
            Self::Str => "s",
        }
    }

    /// Map a type code back to a key kind.
    pub fn from_type_code(code: char) -> Option<Self> {
        match code {
            'y' => Some(Self::Byte),
            'b' => Some(Self::Bool),
            'n' => Some(Self::Int16),
            'q' => Some(Self::UInt16),
            'i' => Some(Self::Int32),
            'u' => Some(Self::UInt32),
            'x' => Some(Self::Int64),
            't' => Some(Self::UInt64),
            'd' => Some(Self::Double),
            's' => Some(Self::Str),
            _ => None,
        }
    }
}

/// A dictionary key. `Double` keys are stored as IEEE-754 bit patterns so
/// the type stays `Eq + Ord`; use [`DictKey::double`] and
/// [`DictKey::as_double`] to convert.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum DictKey {
    Byte(u8),
    Bool(bool),
    Int16(i16),
    UInt16(u16),
    Int32(i32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    Double(u64),
    Str(String),
}

impl DictKey {
    /// Build a double key from its numeric value.
    pub fn double(v: f64) -> Self {
        Self::Double(v.to_bits())
    }

    /// Try to get a double key's numeric value.
    pub fn as_double(&self) -> Option<f64> {
        match self {
            Self::Double(bits) => Some(f64::from_bits(*bits)),
            _ => None,
        }
    }

    /// The kind this key belongs to.
    pub fn kind(&self) -> DictKeyKind {
        match self {
            Self::Byte(_) => DictKeyKind::Byte,
            Self::Bool(_) => DictKeyKind::Bool,
            Self::Int16(_) => DictKeyKind::Int16,
            Self::UInt16(_) => DictKeyKind::UInt16,
            Self::Int32(_) => DictKeyKind::Int32,
            Self::UInt32(_) => DictKeyKind::UInt32,
            Self::Int64(_) => DictKeyKind::Int64,
            Self::UInt64(_) => DictKeyKind::UInt64,
            Self::Double(_) => DictKeyKind::Double,
            Self::Str(_) => DictKeyKind::Str,
        }
    }

    /// The key as a plain [`Value`].
    pub fn to_value(&self) -> Value {
        match self {
            Self::Byte(v) => Value::Byte(*v),
            Self::Bool(v) => Value::Bool(*v),
            Self::Int16(v) => Value::Int16(*v),
            Self::UInt16(v) => Value::UInt16(*v),
            Self::Int32(v) => Value::Int32(*v),
            Self::UInt32(v) => Value::UInt32(*v),
            Self::Int64(v) => Value::Int64(*v),
            Self::UInt64(v) => Value::UInt64(*v),
            Self::Double(bits) => Value::Double(f64::from_bits(*bits)),
            Self::Str(v) => Value::Str(v.clone()),
        }
    }

    /// Build a key from a decoded [`Value`], if its shape is key-eligible.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Byte(v) => Some(Self::Byte(*v)),
            Value::Bool(v) => Some(Self::Bool(*v)),
            Value::Int16(v) => Some(Self::Int16(*v)),
            Value::UInt16(v) => Some(Self::UInt16(*v)),
            Value::Int32(v) => Some(Self::Int32(*v)),
            Value::UInt32(v) => Some(Self::UInt32(*v)),
            Value::Int64(v) => Some(Self::Int64(*v)),
            Value::UInt64(v) => Some(Self::UInt64(*v)),
            Value::Double(v) => Some(Self::double(*v)),
            Value::Str(v) => Some(Self::Str(v.clone())),
            _ => None,
        }
    }
}

/// Errors for dictionary operations.
#[derive(Debug)]
pub enum DictError {
    KeyKindMismatch {
        expected: DictKeyKind,
        found: DictKeyKind,
    },
}

impl fmt::Display for DictError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KeyKindMismatch { expected, found } => write!(
                f,
                "Key kind mismatch: dictionary keyed by '{}', got '{}'",
                expected.signature(),
                found.signature()
            ),
        }
    }
}

impl std::error::Error for DictError {}

/// A key-unique mapping with a declared key kind.
///
/// The key kind is fixed at construction so an empty dictionary still knows
/// its wire signature. Entries iterate in key order, which is also the order
/// the encoder emits them in.
#[derive(Debug, Clone, PartialEq)]
pub struct Dict {
    key_kind: DictKeyKind,
    entries: BTreeMap<DictKey, Value>,
}

impl Dict {
    /// Create an empty dictionary keyed by `key_kind`.
    pub fn new(key_kind: DictKeyKind) -> Self {
        Self {
            key_kind,
            entries: BTreeMap::new(),
        }
    }

    /// The declared key kind.
    pub fn key_kind(&self) -> DictKeyKind {
        self.key_kind
    }

    /// Insert an entry. Later insertions with an equal key overwrite earlier
    /// ones; the replaced value is returned.
    pub fn insert(&mut self, key: DictKey, value: Value) -> Result<Option<Value>, DictError> {
        if key.kind() != self.key_kind {
            return Err(DictError::KeyKindMismatch {
                expected: self.key_kind,
                found: key.kind(),
            });
        }
        Ok(self.entries.insert(key, value))
    }

    /// Look up a value by key.
    pub fn get(&self, key: &DictKey) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the dictionary has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, DictKey, Value> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a Dict {
    type Item = (&'a DictKey, &'a Value);
    type IntoIter = btree_map::Iter<'a, DictKey, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Errors for typed value conversion.
#[derive(Debug)]
pub enum ValueError {
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
}

impl fmt::Display for ValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypeMismatch { expected, found } => {
                write!(f, "Type mismatch: expected {}, found {}", expected, found)
            }
        }
    }
}

impl std::error::Error for ValueError {}

/// Trait for extracting a concrete type out of a [`Value`].
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Result<Self, ValueError>;
}

/// Trait for turning a concrete type into a [`Value`].
pub trait IntoValue {
    fn into_value(self) -> Value;
}

impl<T: Into<Value>> IntoValue for T {
    fn into_value(self) -> Value {
        self.into()
    }
}

macro_rules! impl_from_value {
    ($ty:ty, $variant:ident, $name:expr) => {
        impl FromValue for $ty {
            fn from_value(value: &Value) -> Result<Self, ValueError> {
                match value {
                    Value::$variant(v) => Ok(*v),
                    other => Err(ValueError::TypeMismatch {
                        expected: $name,
                        found: other.type_name(),
                    }),
                }
            }
        }
    };
}

impl_from_value!(u8, Byte, "byte");
impl_from_value!(bool, Bool, "bool");
impl_from_value!(i16, Int16, "int16");
impl_from_value!(u16, UInt16, "uint16");
impl_from_value!(i32, Int32, "int32");
impl_from_value!(u32, UInt32, "uint32");
impl_from_value!(i64, Int64, "int64");
impl_from_value!(u64, UInt64, "uint64");
impl_from_value!(f64, Double, "double");

impl FromValue for String {
    fn from_value(value: &Value) -> Result<Self, ValueError> {
        match value {
            Value::Str(s) => Ok(s.clone()),
            other => Err(ValueError::TypeMismatch {
                expected: "string",
                found: other.type_name(),
            }),
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: &Value) -> Result<Self, ValueError> {
        match value {
            Value::Array(elements) => elements.iter().map(T::from_value).collect(),
            other => Err(ValueError::TypeMismatch {
                expected: "array",
                found: other.type_name(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_values() {
        let v = Value::from(42u32);
        assert_eq!(v.as_u32(), Some(42));
        assert_eq!(v.as_i32(), None);

        let v = Value::from("hello");
        assert_eq!(v.as_str(), Some("hello"));
        assert_eq!(v.type_name(), "string");
    }

    #[test]
    fn test_typed_conversion() {
        let v = vec![1i32, 2, 3].into_value();
        let back: Vec<i32> = Vec::from_value(&v).expect("array of i32");
        assert_eq!(back, vec![1, 2, 3]);

        assert!(u8::from_value(&v).is_err());
        assert_eq!("hi".into_value(), Value::Str("hi".into()));
    }

    #[test]
    fn test_dict_last_write_wins() {
        let mut dict = Dict::new(DictKeyKind::Str);
        dict.insert(DictKey::Str("k".into()), Value::Int32(1))
            .expect("insert");
        let replaced = dict
            .insert(DictKey::Str("k".into()), Value::Int32(2))
            .expect("insert");

        assert_eq!(replaced, Some(Value::Int32(1)));
        assert_eq!(dict.len(), 1);
        assert_eq!(
            dict.get(&DictKey::Str("k".into())),
            Some(&Value::Int32(2))
        );
    }

    #[test]
    fn test_dict_key_kind_enforced() {
        let mut dict = Dict::new(DictKeyKind::UInt16);
        assert!(dict.insert(DictKey::UInt16(7), Value::Bool(true)).is_ok());
        assert!(matches!(
            dict.insert(DictKey::Int16(7), Value::Bool(true)),
            Err(DictError::KeyKindMismatch { .. })
        ));
    }

    #[test]
    fn test_double_keys_round_trip() {
        let mut dict = Dict::new(DictKeyKind::Double);
        dict.insert(DictKey::double(1.5), Value::Str("a".into()))
            .expect("insert");

        let key = dict.iter().next().map(|(k, _)| k.clone()).expect("entry");
        assert_eq!(key.as_double(), Some(1.5));
    }

    #[test]
    fn test_dict_iterates_in_key_order() {
        let mut dict = Dict::new(DictKeyKind::Int32);
        dict.insert(DictKey::Int32(3), Value::Byte(3)).unwrap();
        dict.insert(DictKey::Int32(1), Value::Byte(1)).unwrap();
        dict.insert(DictKey::Int32(2), Value::Byte(2)).unwrap();

        let keys: Vec<_> = dict.iter().map(|(k, _)| k.clone()).collect();
        assert_eq!(
            keys,
            vec![DictKey::Int32(1), DictKey::Int32(2), DictKey::Int32(3)]
        );
    }
}
