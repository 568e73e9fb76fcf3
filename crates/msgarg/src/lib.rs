// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # msgarg - Signature-driven message argument codec
//!
//! Bidirectional converter between the bus wire format's runtime-tagged
//! value trees ([`MsgArg`]) and native typed values ([`Value`]), driven by
//! compact type signatures (`"i"`, `"as"`, `"a{sv}"`, ...). The proxy/stub
//! layer above uses it for method arguments, return values, property values,
//! and signal payloads alike.
//!
//! ## Quick Start
//!
//! ```rust
//! use msgarg::{decode, encode, Value};
//!
//! let native = Value::Array(vec![Value::Int32(1), Value::Int32(2)]);
//! let wire = encode(&native, "ai")?;
//! assert_eq!(decode(&wire, "ai")?, native);
//!
//! // Variants carry their signature at runtime; encoding against "v"
//! // infers it from the value's type.
//! let wire = encode(&Value::Str("hello".into()), "v")?;
//! assert_eq!(wire.as_variant()?.0, "s");
//! # Ok::<(), msgarg::CodecError>(())
//! ```
//!
//! ## Modules Overview
//!
//! - [`signature`] - signature grammar parser (type boundaries, dict
//!   key/value splitting, validation)
//! - [`value`] - native value model and typed conversion traits
//! - [`arg`] - wire value tree, scoped builders, wire string helpers
//! - [`decode`] / [`encode`] - the codec itself
//!
//! The codec is stateless and reentrant: decode/encode calls share no
//! mutable state and may run concurrently on independent inputs. All work
//! is synchronous tree traversal; nothing blocks or suspends.

pub mod arg;
pub mod decode;
pub mod encode;
pub mod error;
pub mod signature;
pub mod value;

pub use arg::{host_string, live_builders, wire_string, ArgError, ArrayBuilder, MsgArg};
pub use decode::decode;
pub use encode::encode;
pub use error::CodecError;
pub use signature::{
    dict_key_value_signatures, is_array_of_primitives, next_complete_type, validate,
    MAX_NESTING_DEPTH, MAX_SIGNATURE_LEN,
};
pub use value::{Dict, DictError, DictKey, DictKeyKind, FromValue, IntoValue, Value, ValueError};

#[cfg(test)]
mod tests;
