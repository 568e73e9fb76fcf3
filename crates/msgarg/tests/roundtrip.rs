// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::uninlined_format_args)] // Test/bench code readability over pedantic
#![allow(clippy::cast_possible_truncation)] // Test parameters
#![allow(clippy::float_cmp)] // Test assertions with constants
#![allow(clippy::missing_panics_doc)] // Tests panic on failure

//! Public-API round-trip tests: every conversion here goes through the
//! crate root exports only.

use msgarg::{
    decode, dict_key_value_signatures, encode, live_builders, next_complete_type, CodecError,
    Dict, DictKey, DictKeyKind, MsgArg, Value,
};

#[test]
fn test_signature_parser_contract() {
    assert_eq!(next_complete_type("ii", 0).unwrap(), ("i", 1));
    assert_eq!(next_complete_type("a(is)si", 0).unwrap(), ("a(is)", 5));
    assert_eq!(dict_key_value_signatures("a{si}").unwrap(), ("s", "i"));
    assert_eq!(dict_key_value_signatures("a{ii}").unwrap(), ("i", "i"));
    assert!(matches!(
        dict_key_value_signatures("ai"),
        Err(CodecError::BadSignature(_))
    ));
    assert!(matches!(
        next_complete_type("a(", 0),
        Err(CodecError::BadSignature(_))
    ));
}

#[test]
fn test_method_argument_shapes_round_trip() {
    let _ = env_logger::builder().is_test(true).try_init();

    // The payload shapes a generated proxy would push through the codec.
    let mut config = Dict::new(DictKeyKind::Str);
    config
        .insert(DictKey::Str("volume".into()), Value::Byte(80))
        .unwrap();
    config
        .insert(
            DictKey::Str("label".into()),
            Value::Str("living room".into()),
        )
        .unwrap();

    let cases: Vec<(&str, Value)> = vec![
        ("u", Value::UInt32(7)),
        ("s", Value::Str("org.example.Control".into())),
        (
            "as",
            Value::Array(vec![
                Value::Str("one".into()),
                Value::Str("two".into()),
                Value::Str("three".into()),
            ]),
        ),
        ("a{sv}", Value::Dict(config)),
        (
            "v",
            Value::Struct(vec![Value::UInt16(1), Value::UInt16(2), Value::Bool(true)]),
        ),
    ];

    for (sig, native) in cases {
        let wire = encode(&native, sig).unwrap_or_else(|e| panic!("encode {}: {}", sig, e));
        let back = decode(&wire, sig).unwrap_or_else(|e| panic!("decode {}: {}", sig, e));
        assert_eq!(back, native, "round trip through \"{}\"", sig);
    }
    assert_eq!(live_builders(), 0);
}

#[test]
fn test_randomized_primitive_array_round_trips() {
    fastrand::seed(0x5eed);

    for _ in 0..100 {
        let len = fastrand::usize(..64);

        let ints = Value::Array((0..len).map(|_| Value::Int32(fastrand::i32(..))).collect());
        let wire = encode(&ints, "ai").expect("encode ai");
        assert_eq!(decode(&wire, "ai").expect("decode ai"), ints);

        let bytes = Value::Array((0..len).map(|_| Value::Byte(fastrand::u8(..))).collect());
        let wire = encode(&bytes, "ay").expect("encode ay");
        assert_eq!(decode(&wire, "ay").expect("decode ay"), bytes);

        let doubles = Value::Array(
            (0..len)
                .map(|_| Value::Double(f64::from(fastrand::i32(..))))
                .collect(),
        );
        let wire = encode(&doubles, "ad").expect("encode ad");
        assert_eq!(decode(&wire, "ad").expect("decode ad"), doubles);
    }
    assert_eq!(live_builders(), 0);
}

#[test]
fn test_randomized_string_dict_round_trips() {
    fastrand::seed(0xd1c7);

    for _ in 0..50 {
        let mut dict = Dict::new(DictKeyKind::Str);
        for _ in 0..fastrand::usize(..16) {
            let key: String = (0..fastrand::usize(1..8))
                .map(|_| fastrand::alphanumeric())
                .collect();
            dict.insert(DictKey::Str(key), Value::Int64(fastrand::i64(..)))
                .unwrap();
        }
        let native = Value::Dict(dict);

        let wire = encode(&native, "a{sx}").expect("encode");
        assert_eq!(decode(&wire, "a{sx}").expect("decode"), native);

        let wire = encode(&native, "v").expect("encode variant");
        assert_eq!(decode(&wire, "v").expect("decode variant"), native);
    }
    assert_eq!(live_builders(), 0);
}

#[test]
fn test_absent_wire_arrays_decode_empty_for_every_array_signature() {
    for sig in ["ay", "ab", "an", "aq", "ai", "au", "ax", "at", "ad", "as", "av", "aai"] {
        let wire = MsgArg::absent_array(&sig[1..]);
        let decoded = decode(&wire, sig).unwrap_or_else(|e| panic!("decode {}: {}", sig, e));
        assert_eq!(decoded, Value::Array(Vec::new()), "{}", sig);
    }
}

#[test]
fn test_unterminated_signatures_never_loop() {
    for sig in ["a(", "a{", "(", "(i", "a{s", "a{si", "a"] {
        assert!(
            matches!(
                decode(&MsgArg::Int32(1), sig),
                Err(CodecError::BadSignature(_))
            ),
            "expected BadSignature for \"{}\"",
            sig
        );
    }
}
