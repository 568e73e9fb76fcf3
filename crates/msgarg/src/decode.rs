// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Wire-to-native decoding.
//!
//! Dispatch is driven by the leading signature byte, except for variants,
//! where the payload's own runtime signature decides the concrete shape.
//! The decoder only borrows the wire value; it never mutates or retains it.

use crate::arg::{self, MsgArg};
use crate::error::CodecError;
use crate::signature::{self, MAX_NESTING_DEPTH};
use crate::value::{Dict, DictKey, DictKeyKind, Value};

/// Decode a wire value according to `signature`.
///
/// The first failing step aborts the whole decode; no partial value is
/// returned. Transport-reported extraction errors propagate unchanged as
/// [`CodecError::Transport`].
pub fn decode(arg: &MsgArg, signature: &str) -> Result<Value, CodecError> {
    signature::validate(signature)?;
    decode_at(arg, signature, 0)
}

fn decode_at(arg: &MsgArg, sig: &str, depth: usize) -> Result<Value, CodecError> {
    if depth > MAX_NESTING_DEPTH {
        return Err(depth_exceeded());
    }
    let Some(first) = sig.bytes().next() else {
        return Err(CodecError::BadSignature("empty signature".to_string()));
    };

    match first {
        b'y' => Ok(Value::Byte(arg.as_byte()?)),
        b'b' => Ok(Value::Bool(arg.as_bool()?)),
        b'n' => Ok(Value::Int16(arg.as_i16()?)),
        b'q' => Ok(Value::UInt16(arg.as_u16()?)),
        b'i' => Ok(Value::Int32(arg.as_i32()?)),
        b'u' => Ok(Value::UInt32(arg.as_u32()?)),
        b'x' => Ok(Value::Int64(arg.as_i64()?)),
        b't' => Ok(Value::UInt64(arg.as_u64()?)),
        b'd' => Ok(Value::Double(arg.as_f64()?)),
        b's' => Ok(Value::Str(arg::host_string(arg.as_str_bytes()?)?)),
        b'a' => decode_array(arg, sig, depth),
        b'v' => {
            let (_, inner) = arg.as_variant()?;
            decode_any(inner, depth + 1)
        }
        b'(' => Err(CodecError::BadSignature(format!(
            "struct signature \"{}\" is only decoded through a variant",
            sig
        ))),
        other => Err(CodecError::BadSignature(format!(
            "unknown type code '{}'",
            other as char
        ))),
    }
}

fn decode_array(arg: &MsgArg, sig: &str, depth: usize) -> Result<Value, CodecError> {
    if sig[1..].starts_with('{') {
        return decode_dict(arg, sig, depth);
    }

    // An absent payload normalizes to an empty slice here, so "no elements
    // sent" and "empty array sent" decode identically.
    let (_, elements) = arg.as_array()?;

    if signature::is_array_of_primitives(sig) {
        return decode_primitive_array(elements, sig.as_bytes()[1]);
    }

    let elem_sig = &sig[1..];
    if elem_sig == "s" {
        // Strings need per-element byte-string conversion, so they get their
        // own loop instead of the primitive bulk path.
        let mut out = Vec::with_capacity(elements.len());
        for element in elements {
            out.push(Value::Str(arg::host_string(element.as_str_bytes()?)?));
        }
        return Ok(Value::Array(out));
    }

    let mut out = Vec::with_capacity(elements.len());
    for element in elements {
        out.push(decode_at(element, elem_sig, depth + 1)?);
    }
    Ok(Value::Array(out))
}

/// Bulk extraction for arrays of non-string primitives; no recursion.
fn decode_primitive_array(elements: &[MsgArg], code: u8) -> Result<Value, CodecError> {
    let mut out = Vec::with_capacity(elements.len());
    for element in elements {
        let value = match code {
            b'y' => Value::Byte(element.as_byte()?),
            b'b' => Value::Bool(element.as_bool()?),
            b'n' => Value::Int16(element.as_i16()?),
            b'q' => Value::UInt16(element.as_u16()?),
            b'i' => Value::Int32(element.as_i32()?),
            b'u' => Value::UInt32(element.as_u32()?),
            b'x' => Value::Int64(element.as_i64()?),
            b't' => Value::UInt64(element.as_u64()?),
            b'd' => Value::Double(element.as_f64()?),
            other => {
                return Err(CodecError::BadSignature(format!(
                    "'{}' is not a bulk-extractable primitive",
                    other as char
                )))
            }
        };
        out.push(value);
    }
    Ok(Value::Array(out))
}

fn decode_dict(arg: &MsgArg, sig: &str, depth: usize) -> Result<Value, CodecError> {
    let (key_sig, value_sig) = signature::dict_key_value_signatures(sig)?;
    let key_kind = key_kind_for(key_sig.as_bytes()[0])?;

    let (_, entries) = arg.as_array()?;
    let mut dict = Dict::new(key_kind);
    for entry in entries {
        let (key_arg, value_arg) = entry.as_dict_entry()?;
        let key_value = decode_at(key_arg, key_sig, depth + 1)?;
        let key = dict_key(&key_value)?;
        let value = decode_at(value_arg, value_sig, depth + 1)?;
        // Equal keys: later wire entries overwrite earlier ones.
        dict.insert(key, value)
            .map_err(|e| CodecError::BadValueType(e.to_string()))?;
    }
    Ok(Value::Dict(dict))
}

/// Decode a wire value by its own runtime signature into an "any" value.
/// This is the variant payload path.
fn decode_any(arg: &MsgArg, depth: usize) -> Result<Value, CodecError> {
    if depth > MAX_NESTING_DEPTH {
        return Err(depth_exceeded());
    }
    let sig = arg.signature();
    log::trace!("[msgarg] variant payload signature: {}", sig);
    let bytes = sig.as_bytes();

    match bytes.first() {
        Some(b'(') => {
            // Struct members travel as nested variants, each self-describing.
            let members = arg.as_struct_members()?;
            let mut out = Vec::with_capacity(members.len());
            for member in members {
                out.push(decode_member_any(member, depth)?);
            }
            Ok(Value::Struct(out))
        }
        Some(b'a') if bytes.get(1) == Some(&b'{') => {
            let Some(&key_code) = bytes.get(2) else {
                return Err(CodecError::BadSignature(format!(
                    "truncated dictionary signature \"{}\"",
                    sig
                )));
            };
            decode_dict_of_any(arg, key_code, depth)
        }
        Some(b'a') => {
            if bytes.len() < 2 {
                return Err(CodecError::BadSignature(
                    "array signature missing element type".to_string(),
                ));
            }
            let (_, elements) = arg.as_array()?;
            let mut out = Vec::with_capacity(elements.len());
            for element in elements {
                out.push(decode_member_any(element, depth)?);
            }
            Ok(Value::Array(out))
        }
        Some(b'v') => {
            let (_, inner) = arg.as_variant()?;
            decode_any(inner, depth + 1)
        }
        Some(&code) if signature::is_primitive_code(code) => decode_at(arg, &sig, depth),
        _ => Err(CodecError::BadSignature(format!(
            "unsupported variant signature \"{}\"",
            sig
        ))),
    }
}

/// Unwrap one variant level if present, then decode as "any".
fn decode_member_any(member: &MsgArg, depth: usize) -> Result<Value, CodecError> {
    match member {
        MsgArg::Variant { value, .. } => decode_any(value, depth + 1),
        other => decode_any(other, depth + 1),
    }
}

/// Dictionary-of-any decode: the key's primitive code picks the concrete
/// key type, values decode as nested variants.
fn decode_dict_of_any(arg: &MsgArg, key_code: u8, depth: usize) -> Result<Value, CodecError> {
    let key_kind = key_kind_for(key_code)?;
    let (_, entries) = arg.as_array()?;
    let mut dict = Dict::new(key_kind);
    for entry in entries {
        let (key_arg, value_arg) = entry.as_dict_entry()?;
        let key_value = decode_at(key_arg, key_kind.signature(), depth + 1)?;
        let key = dict_key(&key_value)?;
        let value = decode_member_any(value_arg, depth)?;
        dict.insert(key, value)
            .map_err(|e| CodecError::BadValueType(e.to_string()))?;
    }
    Ok(Value::Dict(dict))
}

fn key_kind_for(code: u8) -> Result<DictKeyKind, CodecError> {
    DictKeyKind::from_type_code(code as char).ok_or_else(|| {
        CodecError::BadSignature(format!(
            "unsupported dictionary key code '{}'",
            code as char
        ))
    })
}

fn dict_key(value: &Value) -> Result<DictKey, CodecError> {
    DictKey::from_value(value).ok_or_else(|| {
        CodecError::BadValueType(format!(
            "{} values cannot be dictionary keys",
            value.type_name()
        ))
    })
}

fn depth_exceeded() -> CodecError {
    CodecError::BadSignature(format!("nesting exceeds {} levels", MAX_NESTING_DEPTH))
}
