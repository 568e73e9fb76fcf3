// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Native-to-wire encoding.
//!
//! Dispatch mirrors the decoder. Against a `v` signature the wire signature
//! is inferred from the value's tag; the match-arm order in
//! [`encode_variant`] is the inference precedence and must not be
//! reordered. Every composite goes through an [`ArrayBuilder`] scratch
//! buffer that is released on all exit paths.

use crate::arg::{self, ArrayBuilder, MsgArg};
use crate::error::CodecError;
use crate::signature::{self, MAX_NESTING_DEPTH};
use crate::value::{Dict, Value};

/// Encode a native value according to `signature`.
///
/// The returned wire value is stabilized and safe to attach to a parent
/// structure. The first failing step aborts the whole encode; partially
/// built scratch buffers are released during unwinding.
pub fn encode(value: &Value, signature: &str) -> Result<MsgArg, CodecError> {
    signature::validate(signature)?;
    encode_at(value, signature, 0)
}

fn encode_at(value: &Value, sig: &str, depth: usize) -> Result<MsgArg, CodecError> {
    if depth > MAX_NESTING_DEPTH {
        return Err(depth_exceeded());
    }
    let Some(first) = sig.bytes().next() else {
        return Err(CodecError::BadSignature("empty signature".to_string()));
    };

    match first {
        b'y' => match value {
            Value::Byte(v) => Ok(MsgArg::Byte(*v)),
            other => Err(mismatch(sig, other)),
        },
        b'b' => match value {
            Value::Bool(v) => Ok(MsgArg::Bool(*v)),
            other => Err(mismatch(sig, other)),
        },
        b'n' => match value {
            Value::Int16(v) => Ok(MsgArg::Int16(*v)),
            other => Err(mismatch(sig, other)),
        },
        b'q' => match value {
            Value::UInt16(v) => Ok(MsgArg::UInt16(*v)),
            other => Err(mismatch(sig, other)),
        },
        b'i' => match value {
            Value::Int32(v) => Ok(MsgArg::Int32(*v)),
            other => Err(mismatch(sig, other)),
        },
        b'u' => match value {
            Value::UInt32(v) => Ok(MsgArg::UInt32(*v)),
            other => Err(mismatch(sig, other)),
        },
        b'x' => match value {
            Value::Int64(v) => Ok(MsgArg::Int64(*v)),
            other => Err(mismatch(sig, other)),
        },
        b't' => match value {
            Value::UInt64(v) => Ok(MsgArg::UInt64(*v)),
            other => Err(mismatch(sig, other)),
        },
        b'd' => match value {
            Value::Double(v) => Ok(MsgArg::Double(*v)),
            other => Err(mismatch(sig, other)),
        },
        b's' => match value {
            Value::Str(s) => Ok(MsgArg::Str(arg::wire_string(s)?)),
            other => Err(mismatch(sig, other)),
        },
        b'a' => encode_array(value, sig, depth),
        b'v' => encode_variant(value, depth),
        b'(' => Err(CodecError::BadSignature(format!(
            "struct signature \"{}\" is only encoded through a variant",
            sig
        ))),
        other => Err(CodecError::BadSignature(format!(
            "unknown type code '{}'",
            other as char
        ))),
    }
}

fn encode_array(value: &Value, sig: &str, depth: usize) -> Result<MsgArg, CodecError> {
    if sig[1..].starts_with('{') {
        return encode_dict(value, sig, depth);
    }
    let Value::Array(elements) = value else {
        return Err(mismatch(sig, value));
    };
    let elem_sig = &sig[1..];

    if signature::is_array_of_primitives(sig) {
        return encode_primitive_array(elements, sig);
    }

    if elem_sig == "s" {
        // Per-element byte-string conversion before commit.
        let mut builder = ArrayBuilder::with_len(elements.len());
        for (index, element) in elements.iter().enumerate() {
            let Value::Str(s) = element else {
                return Err(mismatch(elem_sig, element));
            };
            builder.set(index, MsgArg::Str(arg::wire_string(s)?))?;
        }
        return Ok(builder.stabilize_array(elem_sig));
    }

    let mut builder = ArrayBuilder::with_len(elements.len());
    for (index, element) in elements.iter().enumerate() {
        builder.set(index, encode_at(element, elem_sig, depth + 1)?)?;
    }
    Ok(builder.stabilize_array(elem_sig))
}

/// Bulk composition for arrays of non-string primitives; no recursion.
fn encode_primitive_array(elements: &[Value], sig: &str) -> Result<MsgArg, CodecError> {
    let code = sig.as_bytes()[1];
    let elem_sig = &sig[1..];
    let mut builder = ArrayBuilder::with_len(elements.len());
    for (index, element) in elements.iter().enumerate() {
        let arg = match (code, element) {
            (b'y', Value::Byte(v)) => MsgArg::Byte(*v),
            (b'b', Value::Bool(v)) => MsgArg::Bool(*v),
            (b'n', Value::Int16(v)) => MsgArg::Int16(*v),
            (b'q', Value::UInt16(v)) => MsgArg::UInt16(*v),
            (b'i', Value::Int32(v)) => MsgArg::Int32(*v),
            (b'u', Value::UInt32(v)) => MsgArg::UInt32(*v),
            (b'x', Value::Int64(v)) => MsgArg::Int64(*v),
            (b't', Value::UInt64(v)) => MsgArg::UInt64(*v),
            (b'd', Value::Double(v)) => MsgArg::Double(*v),
            (_, other) => return Err(mismatch(elem_sig, other)),
        };
        builder.set(index, arg)?;
    }
    Ok(builder.stabilize_array(elem_sig))
}

fn encode_dict(value: &Value, sig: &str, depth: usize) -> Result<MsgArg, CodecError> {
    let (key_sig, value_sig) = signature::dict_key_value_signatures(sig)?;
    let Value::Dict(dict) = value else {
        return Err(mismatch(sig, value));
    };
    if dict.key_kind().signature() != key_sig {
        return Err(CodecError::BadSignature(format!(
            "dictionary keyed by '{}' does not match signature \"{}\"",
            dict.key_kind().signature(),
            sig
        )));
    }

    let elem_sig = &sig[1..];
    let mut builder = ArrayBuilder::with_len(dict.len());
    // Iteration order is the mapping's natural (key) order.
    for (index, (key, entry_value)) in dict.iter().enumerate() {
        let key_arg = encode_at(&key.to_value(), key_sig, depth + 1)?;
        let value_arg = encode_at(entry_value, value_sig, depth + 1)?;
        builder.set(
            index,
            MsgArg::DictEntry {
                key: Box::new(key_arg),
                value: Box::new(value_arg),
            },
        )?;
    }
    Ok(builder.stabilize_array(elem_sig))
}

/// Encode an "any" value as a variant, inferring the wire signature from
/// the value's tag.
///
/// Arm order preserves the inference precedence: byte, bool, int16, uint16,
/// int32, uint32, int64, uint64, double, string, struct, sequence, typed
/// maps. The int16 and uint16 map paths are independent.
fn encode_variant(value: &Value, depth: usize) -> Result<MsgArg, CodecError> {
    if depth > MAX_NESTING_DEPTH {
        return Err(depth_exceeded());
    }
    let inner = match value {
        Value::Byte(v) => MsgArg::Byte(*v),
        Value::Bool(v) => MsgArg::Bool(*v),
        Value::Int16(v) => MsgArg::Int16(*v),
        Value::UInt16(v) => MsgArg::UInt16(*v),
        Value::Int32(v) => MsgArg::Int32(*v),
        Value::UInt32(v) => MsgArg::UInt32(*v),
        Value::Int64(v) => MsgArg::Int64(*v),
        Value::UInt64(v) => MsgArg::UInt64(*v),
        Value::Double(v) => MsgArg::Double(*v),
        Value::Str(s) => MsgArg::Str(arg::wire_string(s)?),
        Value::Struct(members) => encode_variant_struct(members, depth)?,
        Value::Array(elements) => {
            let mut builder = ArrayBuilder::with_len(elements.len());
            for (index, element) in elements.iter().enumerate() {
                builder.set(index, encode_variant(element, depth + 1)?)?;
            }
            builder.stabilize_array("v")
        }
        Value::Dict(dict) => encode_variant_dict(dict, depth)?,
    };
    Ok(MsgArg::variant(inner))
}

/// All struct members travel as nested variants in this protocol.
fn encode_variant_struct(members: &[Value], depth: usize) -> Result<MsgArg, CodecError> {
    let mut builder = ArrayBuilder::with_len(members.len());
    for (index, member) in members.iter().enumerate() {
        builder.set(index, encode_variant(member, depth + 1)?)?;
    }
    Ok(builder.stabilize_struct())
}

fn encode_variant_dict(dict: &Dict, depth: usize) -> Result<MsgArg, CodecError> {
    let key_sig = dict.key_kind().signature();
    log::trace!("[msgarg] inferred dictionary signature a{{{}v}}", key_sig);

    let mut builder = ArrayBuilder::with_len(dict.len());
    for (index, (key, entry_value)) in dict.iter().enumerate() {
        let key_arg = encode_at(&key.to_value(), key_sig, depth + 1)?;
        let value_arg = encode_variant(entry_value, depth + 1)?;
        builder.set(
            index,
            MsgArg::DictEntry {
                key: Box::new(key_arg),
                value: Box::new(value_arg),
            },
        )?;
    }
    Ok(builder.stabilize_array(&format!("{{{}v}}", key_sig)))
}

fn mismatch(sig: &str, value: &Value) -> CodecError {
    CodecError::BadSignature(format!(
        "signature \"{}\" does not match a {} value",
        sig,
        value.type_name()
    ))
}

fn depth_exceeded() -> CodecError {
    CodecError::BadSignature(format!("nesting exceeds {} levels", MAX_NESTING_DEPTH))
}
