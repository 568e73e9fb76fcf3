// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Cross-module codec tests: round trips and failure propagation that span
//! the parser, decoder, and encoder together.

use crate::arg::{live_builders, MsgArg};
use crate::decode::decode;
use crate::encode::encode;
use crate::error::CodecError;
use crate::value::{Dict, DictKey, DictKeyKind, Value};

fn sample_dict() -> Value {
    let mut dict = Dict::new(DictKeyKind::Str);
    dict.insert(DictKey::Str("alpha".into()), Value::Int32(1))
        .unwrap();
    dict.insert(DictKey::Str("beta".into()), Value::Int32(2))
        .unwrap();
    Value::Dict(dict)
}

#[test]
fn test_native_round_trip_catalogue() {
    let cases: Vec<(&str, Value)> = vec![
        ("y", Value::Byte(255)),
        ("b", Value::Bool(false)),
        ("n", Value::Int16(-5)),
        ("q", Value::UInt16(5)),
        ("i", Value::Int32(-100_000)),
        ("u", Value::UInt32(100_000)),
        ("x", Value::Int64(i64::MIN)),
        ("t", Value::UInt64(u64::MAX)),
        ("d", Value::Double(1.25)),
        ("s", Value::Str("héllo wörld".into())),
        ("ai", Value::Array(vec![Value::Int32(3), Value::Int32(4)])),
        ("ai", Value::Array(Vec::new())),
        (
            "as",
            Value::Array(vec![Value::Str("a".into()), Value::Str("".into())]),
        ),
        (
            "aai",
            Value::Array(vec![
                Value::Array(vec![Value::Int32(1)]),
                Value::Array(Vec::new()),
            ]),
        ),
        ("a{si}", sample_dict()),
        ("v", Value::Int32(9)),
        ("v", sample_dict()),
        (
            "v",
            Value::Struct(vec![
                Value::Int32(1),
                Value::Str("x".into()),
                Value::Array(vec![Value::Bool(true)]),
            ]),
        ),
        (
            "av",
            Value::Array(vec![Value::Int32(1), Value::Str("two".into())]),
        ),
    ];

    for (sig, native) in cases {
        let wire = encode(&native, sig).unwrap_or_else(|e| panic!("encode {}: {}", sig, e));
        let back = decode(&wire, sig).unwrap_or_else(|e| panic!("decode {}: {}", sig, e));
        assert_eq!(back, native, "round trip through \"{}\"", sig);
    }
}

#[test]
fn test_wire_round_trip_preserves_content() {
    // encode(decode(w, s), s) reproduces an equivalent wire tree.
    let entry = |k: &str, v: MsgArg| MsgArg::DictEntry {
        key: Box::new(MsgArg::string(k).unwrap()),
        value: Box::new(v),
    };
    let cases: Vec<(&str, MsgArg)> = vec![
        ("i", MsgArg::Int32(12)),
        (
            "ai",
            MsgArg::Array {
                elem_sig: "i".to_string(),
                elements: Some(vec![MsgArg::Int32(1), MsgArg::Int32(2)]),
            },
        ),
        (
            "a{si}",
            MsgArg::Array {
                elem_sig: "{si}".to_string(),
                elements: Some(vec![
                    entry("a", MsgArg::Int32(1)),
                    entry("b", MsgArg::Int32(2)),
                ]),
            },
        ),
        ("v", MsgArg::variant(MsgArg::Double(0.5))),
        (
            "v",
            MsgArg::variant(MsgArg::Struct(vec![
                MsgArg::variant(MsgArg::Int32(7)),
                MsgArg::variant(MsgArg::string("m").unwrap()),
            ])),
        ),
    ];

    for (sig, wire) in cases {
        let native = decode(&wire, sig).unwrap_or_else(|e| panic!("decode {}: {}", sig, e));
        let rebuilt = encode(&native, sig).unwrap_or_else(|e| panic!("encode {}: {}", sig, e));
        assert_eq!(rebuilt, wire, "wire round trip through \"{}\"", sig);
    }
}

#[test]
fn test_absent_array_round_trip_is_empty() {
    let wire = MsgArg::absent_array("i");
    let native = decode(&wire, "ai").expect("decode");
    assert_eq!(native, Value::Array(Vec::new()));

    // Content equality treats the rebuilt empty array and the absent
    // original as the same wire tree.
    let rebuilt = encode(&native, "ai").expect("encode");
    assert_eq!(rebuilt, wire);
}

#[test]
fn test_deep_variant_nesting_round_trip() {
    // Variants of structs of variants, spanning every recursive seam.
    let mut inner_dict = Dict::new(DictKeyKind::Byte);
    inner_dict
        .insert(DictKey::Byte(1), Value::Array(vec![Value::Bool(true)]))
        .unwrap();
    let native = Value::Struct(vec![
        Value::Dict(inner_dict),
        Value::Struct(vec![Value::Int64(-1), Value::Double(3.5)]),
        Value::Array(vec![Value::Struct(vec![Value::Byte(9)])]),
    ]);

    let wire = encode(&native, "v").expect("encode");
    assert_eq!(decode(&wire, "v").expect("decode"), native);
}

#[test]
fn test_failure_leaves_no_live_builders() {
    let before = live_builders();

    let bad_cases: Vec<(&str, Value)> = vec![
        ("ai", Value::Array(vec![Value::Int32(1), Value::Bool(true)])),
        ("a{si}", Value::Int32(1)),
        (
            "v",
            Value::Array(vec![Value::Array(vec![Value::Str("a\0b".into())])]),
        ),
        ("aas", Value::Array(vec![Value::Array(vec![Value::Int32(1)])])),
    ];
    for (sig, value) in bad_cases {
        assert!(encode(&value, sig).is_err(), "expected failure for {}", sig);
        assert_eq!(live_builders(), before, "leak after failed \"{}\"", sig);
    }
}

#[test]
fn test_variant_with_unsupported_payload_signature() {
    // A variant wrapping a dict entry outside an array has no native shape.
    let wire = MsgArg::variant(MsgArg::DictEntry {
        key: Box::new(MsgArg::Int32(1)),
        value: Box::new(MsgArg::Int32(2)),
    });
    assert!(matches!(
        decode(&wire, "v"),
        Err(CodecError::BadSignature(_))
    ));
}

#[test]
fn test_variant_dict_with_container_key_rejected() {
    let entry = MsgArg::DictEntry {
        key: Box::new(MsgArg::Struct(vec![MsgArg::variant(MsgArg::Int32(1))])),
        value: Box::new(MsgArg::variant(MsgArg::Int32(2))),
    };
    let wire = MsgArg::variant(MsgArg::Array {
        elem_sig: "{(v)v}".to_string(),
        elements: Some(vec![entry]),
    });
    assert!(matches!(
        decode(&wire, "v"),
        Err(CodecError::BadSignature(_))
    ));
}

#[test]
fn test_transport_error_propagates_unchanged() {
    // Element shape disagrees with the declared signature mid-array; the
    // extraction status must surface as-is, not be reinterpreted.
    let wire = MsgArg::Array {
        elem_sig: "i".to_string(),
        elements: Some(vec![MsgArg::Int32(1), MsgArg::Bool(true)]),
    };
    let err = decode(&wire, "ai").unwrap_err();
    assert!(matches!(err, CodecError::Transport(_)));
}
