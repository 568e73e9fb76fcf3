// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Signature grammar parser.
//!
//! A signature is a compact string describing a wire value's shape:
//! primitive codes (`y` byte, `b` bool, `n` i16, `q` u16, `i` i32, `u` u32,
//! `x` i64, `t` u64, `d` f64, `s` string), `a` followed by one complete
//! element type (array), `(...)` (struct), `{KV}` (dict entry, only legal as
//! an array element type), and `v` (variant, self-describing at runtime so
//! no nested type follows it).
//!
//! The parser operates on a cursor into the string and never reads past its
//! end; malformed input fails with [`CodecError::BadSignature`].

use crate::error::CodecError;

/// Maximum accepted signature length (bus limit).
pub const MAX_SIGNATURE_LEN: usize = 255;

/// Maximum container nesting depth. Deeper signatures are rejected rather
/// than recursed into, so pathological input cannot exhaust the stack.
pub const MAX_NESTING_DEPTH: usize = 32;

/// Single-character type codes, string included. `v` is deliberately not in
/// this set: it is a complete type but not a primitive.
const PRIMITIVE_CODES: &[u8] = b"ybnqiuxtds";

pub(crate) fn is_primitive_code(code: u8) -> bool {
    PRIMITIVE_CODES.contains(&code)
}

/// Find the boundary of the next complete type starting at `cursor`.
///
/// Returns the type's span and the cursor just past it.
///
/// # Examples
///
/// ```rust
/// use msgarg::signature::next_complete_type;
///
/// assert_eq!(next_complete_type("ii", 0).unwrap(), ("i", 1));
/// assert_eq!(next_complete_type("a(is)si", 0).unwrap(), ("a(is)", 5));
/// ```
pub fn next_complete_type(signature: &str, cursor: usize) -> Result<(&str, usize), CodecError> {
    check_len(signature)?;
    let end = consume_type(signature.as_bytes(), cursor, 0)?;
    Ok((&signature[cursor..end], end))
}

/// Split a dictionary signature (`a{KV}`) into its key and value type
/// signatures. The key must be a primitive or string type.
pub fn dict_key_value_signatures(signature: &str) -> Result<(&str, &str), CodecError> {
    check_len(signature)?;
    if !signature.starts_with("a{") {
        return Err(CodecError::BadSignature(format!(
            "\"{}\" is not a dictionary signature",
            signature
        )));
    }

    let (key_sig, key_end) = next_complete_type(signature, 2)?;
    let (value_sig, value_end) = next_complete_type(signature, key_end)?;
    if signature.as_bytes().get(value_end) != Some(&b'}') {
        return Err(CodecError::BadSignature(format!(
            "unterminated dict entry in \"{}\"",
            signature
        )));
    }
    if key_sig.len() != 1 || !is_primitive_code(key_sig.as_bytes()[0]) {
        return Err(CodecError::BadSignature(format!(
            "dictionary key type \"{}\" must be a primitive or string",
            key_sig
        )));
    }

    Ok((key_sig, value_sig))
}

/// Whether `signature` describes an array of non-string primitives, the
/// shape eligible for bulk element extraction.
pub fn is_array_of_primitives(signature: &str) -> bool {
    let bytes = signature.as_bytes();
    bytes.len() == 2 && bytes[0] == b'a' && is_primitive_code(bytes[1]) && bytes[1] != b's'
}

/// Check that `signature` parses as exactly one complete type with no
/// trailing bytes.
pub fn validate(signature: &str) -> Result<(), CodecError> {
    let (_, end) = next_complete_type(signature, 0)?;
    if end != signature.len() {
        return Err(CodecError::BadSignature(format!(
            "trailing bytes after complete type in \"{}\"",
            signature
        )));
    }
    Ok(())
}

fn check_len(signature: &str) -> Result<(), CodecError> {
    if signature.len() > MAX_SIGNATURE_LEN {
        return Err(CodecError::BadSignature(format!(
            "signature length {} exceeds the {}-byte limit",
            signature.len(),
            MAX_SIGNATURE_LEN
        )));
    }
    Ok(())
}

/// Consume one complete type, returning the cursor just past it.
fn consume_type(bytes: &[u8], cursor: usize, depth: usize) -> Result<usize, CodecError> {
    if depth > MAX_NESTING_DEPTH {
        return Err(CodecError::BadSignature(format!(
            "nesting exceeds {} levels",
            MAX_NESTING_DEPTH
        )));
    }
    let Some(&code) = bytes.get(cursor) else {
        return Err(CodecError::BadSignature(
            "signature ended before a complete type".to_string(),
        ));
    };

    match code {
        b'a' => consume_type(bytes, cursor + 1, depth + 1),
        b'(' => {
            let mut pos = cursor + 1;
            while bytes.get(pos) != Some(&b')') {
                pos = consume_type(bytes, pos, depth + 1)?;
            }
            Ok(pos + 1)
        }
        b'{' => {
            let key_end = consume_type(bytes, cursor + 1, depth + 1)?;
            let value_end = consume_type(bytes, key_end, depth + 1)?;
            if bytes.get(value_end) != Some(&b'}') {
                return Err(CodecError::BadSignature(
                    "unterminated dict entry".to_string(),
                ));
            }
            Ok(value_end + 1)
        }
        b'v' => Ok(cursor + 1),
        code if is_primitive_code(code) => Ok(cursor + 1),
        other => Err(CodecError::BadSignature(format!(
            "unknown type code '{}'",
            other as char
        ))),
    }
}
