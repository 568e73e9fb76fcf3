// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Wire value tree and scoped builders.
//!
//! [`MsgArg`] is the runtime-tagged value tree exchanged with the transport
//! layer. Every node can report its own signature, which is what makes
//! variants self-describing. Extraction helpers report [`ArgError`], the
//! transport-side status that the codec propagates verbatim.
//!
//! [`ArrayBuilder`] is the scratch buffer used while composing an outgoing
//! array or struct: content only becomes attachable once stabilized, and the
//! buffer is released when the builder drops, on success and failure paths
//! alike.

use std::cell::Cell;
use std::fmt;
use std::marker::PhantomData;
use std::string::FromUtf8Error;

/// Errors reported by the wire value extraction/construction helpers.
#[derive(Debug)]
pub enum ArgError {
    TypeMismatch {
        expected: &'static str,
        found: String,
    },
    IndexOutOfBounds {
        index: usize,
        len: usize,
    },
    InteriorNul,
    Utf8(FromUtf8Error),
}

impl fmt::Display for ArgError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypeMismatch { expected, found } => {
                write!(f, "Value type mismatch: expected '{}', found \"{}\"", expected, found)
            }
            Self::IndexOutOfBounds { index, len } => {
                write!(f, "Index out of bounds: {} >= {}", index, len)
            }
            Self::InteriorNul => write!(f, "String contains an interior NUL byte"),
            Self::Utf8(e) => write!(f, "Invalid UTF-8 in wire string: {}", e),
        }
    }
}

impl std::error::Error for ArgError {}

impl From<FromUtf8Error> for ArgError {
    fn from(e: FromUtf8Error) -> Self {
        Self::Utf8(e)
    }
}

/// Convert a host string to its byte-string wire form.
pub fn wire_string(s: &str) -> Result<Vec<u8>, ArgError> {
    if s.bytes().any(|b| b == 0) {
        return Err(ArgError::InteriorNul);
    }
    Ok(s.as_bytes().to_vec())
}

/// Convert a byte-string wire form back to a host string.
pub fn host_string(bytes: &[u8]) -> Result<String, ArgError> {
    if bytes.contains(&0) {
        return Err(ArgError::InteriorNul);
    }
    Ok(String::from_utf8(bytes.to_vec())?)
}

/// Runtime-tagged wire value tree.
#[derive(Debug, Clone)]
pub enum MsgArg {
    Byte(u8),
    Bool(bool),
    Int16(i16),
    UInt16(u16),
    Int32(i32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    Double(f64),
    /// Byte-string wire form, no interior NUL.
    Str(Vec<u8>),
    /// Homogeneous array. `elements: None` models a transport that delivered
    /// the array header with no payload; readers treat it as empty.
    Array {
        elem_sig: String,
        elements: Option<Vec<MsgArg>>,
    },
    /// The canonical two-slot dict-entry shape, legal only as an array
    /// element.
    DictEntry {
        key: Box<MsgArg>,
        value: Box<MsgArg>,
    },
    /// Ordered heterogeneous members.
    Struct(Vec<MsgArg>),
    /// Exactly one child plus that child's signature.
    Variant {
        sig: String,
        value: Box<MsgArg>,
    },
}

impl MsgArg {
    /// The value's runtime signature.
    pub fn signature(&self) -> String {
        match self {
            Self::Byte(_) => "y".to_string(),
            Self::Bool(_) => "b".to_string(),
            Self::Int16(_) => "n".to_string(),
            Self::UInt16(_) => "q".to_string(),
            Self::Int32(_) => "i".to_string(),
            Self::UInt32(_) => "u".to_string(),
            Self::Int64(_) => "x".to_string(),
            Self::UInt64(_) => "t".to_string(),
            Self::Double(_) => "d".to_string(),
            Self::Str(_) => "s".to_string(),
            Self::Array { elem_sig, .. } => format!("a{}", elem_sig),
            Self::DictEntry { key, value } => {
                format!("{{{}{}}}", key.signature(), value.signature())
            }
            Self::Struct(members) => {
                let mut sig = String::from("(");
                for member in members {
                    sig.push_str(&member.signature());
                }
                sig.push(')');
                sig
            }
            Self::Variant { .. } => "v".to_string(),
        }
    }

    /// Build a string wire value from a host string.
    pub fn string(s: &str) -> Result<Self, ArgError> {
        Ok(Self::Str(wire_string(s)?))
    }

    /// Build an array the transport delivered without a payload.
    pub fn absent_array(elem_sig: &str) -> Self {
        Self::Array {
            elem_sig: elem_sig.to_string(),
            elements: None,
        }
    }

    /// Wrap a value in a variant carrying the value's own signature.
    pub fn variant(inner: MsgArg) -> Self {
        Self::Variant {
            sig: inner.signature(),
            value: Box::new(inner),
        }
    }

    pub fn as_byte(&self) -> Result<u8, ArgError> {
        match self {
            Self::Byte(v) => Ok(*v),
            other => Err(other.mismatch("y")),
        }
    }

    pub fn as_bool(&self) -> Result<bool, ArgError> {
        match self {
            Self::Bool(v) => Ok(*v),
            other => Err(other.mismatch("b")),
        }
    }

    pub fn as_i16(&self) -> Result<i16, ArgError> {
        match self {
            Self::Int16(v) => Ok(*v),
            other => Err(other.mismatch("n")),
        }
    }

    pub fn as_u16(&self) -> Result<u16, ArgError> {
        match self {
            Self::UInt16(v) => Ok(*v),
            other => Err(other.mismatch("q")),
        }
    }

    pub fn as_i32(&self) -> Result<i32, ArgError> {
        match self {
            Self::Int32(v) => Ok(*v),
            other => Err(other.mismatch("i")),
        }
    }

    pub fn as_u32(&self) -> Result<u32, ArgError> {
        match self {
            Self::UInt32(v) => Ok(*v),
            other => Err(other.mismatch("u")),
        }
    }

    pub fn as_i64(&self) -> Result<i64, ArgError> {
        match self {
            Self::Int64(v) => Ok(*v),
            other => Err(other.mismatch("x")),
        }
    }

    pub fn as_u64(&self) -> Result<u64, ArgError> {
        match self {
            Self::UInt64(v) => Ok(*v),
            other => Err(other.mismatch("t")),
        }
    }

    pub fn as_f64(&self) -> Result<f64, ArgError> {
        match self {
            Self::Double(v) => Ok(*v),
            other => Err(other.mismatch("d")),
        }
    }

    /// The byte-string wire form of a string value.
    pub fn as_str_bytes(&self) -> Result<&[u8], ArgError> {
        match self {
            Self::Str(bytes) => Ok(bytes),
            other => Err(other.mismatch("s")),
        }
    }

    /// Element signature and elements of an array value. An absent payload
    /// reads as an empty slice.
    pub fn as_array(&self) -> Result<(&str, &[MsgArg]), ArgError> {
        match self {
            Self::Array { elem_sig, elements } => {
                Ok((elem_sig, elements.as_deref().unwrap_or(&[])))
            }
            other => Err(other.mismatch("a")),
        }
    }

    /// Ordered members of a struct value.
    pub fn as_struct_members(&self) -> Result<&[MsgArg], ArgError> {
        match self {
            Self::Struct(members) => Ok(members),
            other => Err(other.mismatch("(")),
        }
    }

    /// Key and value slots of a dict entry.
    pub fn as_dict_entry(&self) -> Result<(&MsgArg, &MsgArg), ArgError> {
        match self {
            Self::DictEntry { key, value } => Ok((key, value)),
            other => Err(other.mismatch("{")),
        }
    }

    /// Embedded signature and payload of a variant value.
    pub fn as_variant(&self) -> Result<(&str, &MsgArg), ArgError> {
        match self {
            Self::Variant { sig, value } => Ok((sig, value)),
            other => Err(other.mismatch("v")),
        }
    }

    fn mismatch(&self, expected: &'static str) -> ArgError {
        ArgError::TypeMismatch {
            expected,
            found: self.signature(),
        }
    }
}

/// Content equality. An absent array payload and an empty one are the same
/// content.
impl PartialEq for MsgArg {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Byte(a), Self::Byte(b)) => a == b,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int16(a), Self::Int16(b)) => a == b,
            (Self::UInt16(a), Self::UInt16(b)) => a == b,
            (Self::Int32(a), Self::Int32(b)) => a == b,
            (Self::UInt32(a), Self::UInt32(b)) => a == b,
            (Self::Int64(a), Self::Int64(b)) => a == b,
            (Self::UInt64(a), Self::UInt64(b)) => a == b,
            (Self::Double(a), Self::Double(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (
                Self::Array {
                    elem_sig: sig_a,
                    elements: elems_a,
                },
                Self::Array {
                    elem_sig: sig_b,
                    elements: elems_b,
                },
            ) => {
                sig_a == sig_b
                    && elems_a.as_deref().unwrap_or(&[]) == elems_b.as_deref().unwrap_or(&[])
            }
            (
                Self::DictEntry {
                    key: key_a,
                    value: value_a,
                },
                Self::DictEntry {
                    key: key_b,
                    value: value_b,
                },
            ) => key_a == key_b && value_a == value_b,
            (Self::Struct(a), Self::Struct(b)) => a == b,
            (
                Self::Variant {
                    sig: sig_a,
                    value: value_a,
                },
                Self::Variant {
                    sig: sig_b,
                    value: value_b,
                },
            ) => sig_a == sig_b && value_a == value_b,
            _ => false,
        }
    }
}

thread_local! {
    static LIVE_BUILDERS: Cell<usize> = const { Cell::new(0) };
}

/// Number of scratch builders currently alive on this thread. Diagnostic
/// hook for leak assertions in tests.
pub fn live_builders() -> usize {
    LIVE_BUILDERS.with(Cell::get)
}

/// Scratch buffer for composing an array or struct wire value.
///
/// Slots start as placeholder bytes and are overwritten with [`set`]. The
/// content becomes an immutable [`MsgArg`] through [`stabilize_array`] or
/// [`stabilize_struct`], both of which consume the builder. Accounting is
/// per thread, so builders must stay on the thread that created them.
///
/// [`set`]: ArrayBuilder::set
/// [`stabilize_array`]: ArrayBuilder::stabilize_array
/// [`stabilize_struct`]: ArrayBuilder::stabilize_struct
#[derive(Debug)]
pub struct ArrayBuilder {
    slots: Vec<MsgArg>,
    _not_send: PhantomData<*const ()>,
}

impl ArrayBuilder {
    /// Create a builder with `len` placeholder slots.
    pub fn with_len(len: usize) -> Self {
        LIVE_BUILDERS.with(|live| live.set(live.get() + 1));
        Self {
            slots: vec![MsgArg::Byte(0); len],
            _not_send: PhantomData,
        }
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the builder has no slots.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Overwrite the slot at `index`.
    pub fn set(&mut self, index: usize, arg: MsgArg) -> Result<(), ArgError> {
        let len = self.slots.len();
        match self.slots.get_mut(index) {
            Some(slot) => {
                *slot = arg;
                Ok(())
            }
            None => Err(ArgError::IndexOutOfBounds { index, len }),
        }
    }

    /// Commit the slots as a fixed-size array of `elem_sig` elements.
    pub fn stabilize_array(mut self, elem_sig: &str) -> MsgArg {
        MsgArg::Array {
            elem_sig: elem_sig.to_string(),
            elements: Some(std::mem::take(&mut self.slots)),
        }
    }

    /// Commit the slots as ordered struct members.
    pub fn stabilize_struct(mut self) -> MsgArg {
        MsgArg::Struct(std::mem::take(&mut self.slots))
    }
}

impl Drop for ArrayBuilder {
    fn drop(&mut self) {
        LIVE_BUILDERS.with(|live| live.set(live.get() - 1));
    }
}
