// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Codec error taxonomy.

use crate::arg::ArgError;
use std::fmt;

/// Errors surfaced by [`decode`](crate::decode()) and [`encode`](crate::encode()).
#[derive(Debug)]
pub enum CodecError {
    /// Malformed signature, or a signature naming a shape this codec never
    /// converts directly (a bare struct signature outside a variant).
    BadSignature(String),
    /// A value's runtime type has no wire representation in the requested
    /// position.
    BadValueType(String),
    /// Status reported by the wire value extraction/construction helpers,
    /// propagated verbatim.
    Transport(ArgError),
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadSignature(msg) => write!(f, "Bad signature: {}", msg),
            Self::BadValueType(msg) => write!(f, "Bad value type: {}", msg),
            Self::Transport(e) => write!(f, "Transport error: {}", e),
        }
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Transport(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ArgError> for CodecError {
    fn from(e: ArgError) -> Self {
        Self::Transport(e)
    }
}
