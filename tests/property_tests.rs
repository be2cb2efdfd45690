//! Property-based tests covering the roundtrip guarantees of both record modes
//! and the decoder's behavior on truncated or arbitrary input.

use proptest::prelude::*;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_pack::{from_slice, from_slice_compact, to_vec, to_vec_compact, Value};
use std::collections::BTreeMap;

fn roundtrip<T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug>(value: &T) -> bool {
    let bytes = match to_vec(value) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("Serialize failed: {}", e);
            return false;
        }
    };
    match from_slice::<T>(&bytes) {
        Ok((back, rest)) => *value == back && rest.is_empty(),
        Err(e) => {
            eprintln!("Deserialize failed: {}", e);
            eprintln!("Serialized was: {}", hex::encode(&bytes));
            false
        }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
struct Record {
    id: u64,
    name: String,
    score: i32,
    enabled: bool,
    tags: Vec<String>,
    parent: Option<u16>,
}

prop_compose! {
    fn arb_record()(
        id in any::<u64>(),
        name in ".{0,40}",
        score in any::<i32>(),
        enabled in any::<bool>(),
        tags in prop::collection::vec("[a-z]{0,12}", 0..20),
        parent in any::<Option<u16>>(),
    ) -> Record {
        Record { id, name, score, enabled, tags, parent }
    }
}

fn arb_scalar_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Nil),
        any::<bool>().prop_map(Value::Bool),
        any::<i8>().prop_map(Value::Int8),
        any::<i16>().prop_map(Value::Int16),
        any::<i32>().prop_map(Value::Int32),
        any::<i64>().prop_map(Value::Int64),
        any::<u8>().prop_map(Value::UInt8),
        any::<u16>().prop_map(Value::UInt16),
        any::<u32>().prop_map(Value::UInt32),
        any::<u64>().prop_map(Value::UInt64),
        ".{0,64}".prop_map(Value::Text),
    ]
}

proptest! {
    #[test]
    fn prop_i8(n in any::<i8>()) {
        prop_assert!(roundtrip(&n));
    }

    #[test]
    fn prop_i16(n in any::<i16>()) {
        prop_assert!(roundtrip(&n));
    }

    #[test]
    fn prop_i32(n in any::<i32>()) {
        prop_assert!(roundtrip(&n));
    }

    #[test]
    fn prop_i64(n in any::<i64>()) {
        prop_assert!(roundtrip(&n));
    }

    #[test]
    fn prop_u8(n in any::<u8>()) {
        prop_assert!(roundtrip(&n));
    }

    #[test]
    fn prop_u16(n in any::<u16>()) {
        prop_assert!(roundtrip(&n));
    }

    #[test]
    fn prop_u32(n in any::<u32>()) {
        prop_assert!(roundtrip(&n));
    }

    #[test]
    fn prop_u64(n in any::<u64>()) {
        prop_assert!(roundtrip(&n));
    }

    #[test]
    fn prop_f32_bits(bits in any::<u32>()) {
        let bytes = to_vec(&f32::from_bits(bits)).unwrap();
        let (back, _): (f32, _) = from_slice(&bytes).unwrap();
        prop_assert_eq!(back.to_bits(), bits);
    }

    #[test]
    fn prop_f64_bits(bits in any::<u64>()) {
        let bytes = to_vec(&f64::from_bits(bits)).unwrap();
        let (back, _): (f64, _) = from_slice(&bytes).unwrap();
        prop_assert_eq!(back.to_bits(), bits);
    }

    #[test]
    fn prop_bool(b in any::<bool>()) {
        prop_assert!(roundtrip(&b));
    }

    #[test]
    fn prop_string(s in any::<String>()) {
        prop_assert!(roundtrip(&s));
    }

    #[test]
    fn prop_char(c in any::<char>()) {
        prop_assert!(roundtrip(&c));
    }

    #[test]
    fn prop_vec_i16(v in prop::collection::vec(any::<i16>(), 0..100)) {
        prop_assert!(roundtrip(&v));
    }

    #[test]
    fn prop_vec_string(v in prop::collection::vec(".{0,20}", 0..40)) {
        prop_assert!(roundtrip(&v));
    }

    #[test]
    fn prop_option(o in any::<Option<u64>>()) {
        prop_assert!(roundtrip(&o));
    }

    #[test]
    fn prop_tuple(t in any::<(i8, u32, bool, String)>()) {
        prop_assert!(roundtrip(&t));
    }

    #[test]
    fn prop_map(m in prop::collection::btree_map(".{0,10}", any::<i64>(), 0..30)) {
        prop_assert!(roundtrip(&m));
    }

    #[test]
    fn prop_bytes(raw in prop::collection::vec(any::<u8>(), 0..300)) {
        let buf = serde_bytes::ByteBuf::from(raw);
        prop_assert!(roundtrip(&buf));
    }

    #[test]
    fn prop_record_verbose(record in arb_record()) {
        prop_assert!(roundtrip(&record));
    }

    #[test]
    fn prop_record_compact(record in arb_record()) {
        let bytes = to_vec_compact(&record).unwrap();
        let (back, rest): (Record, _) = from_slice_compact(&bytes).unwrap();
        prop_assert_eq!(back, record);
        prop_assert!(rest.is_empty());
    }

    #[test]
    fn prop_compact_is_smaller(record in arb_record()) {
        let verbose = to_vec(&record).unwrap();
        let compact = to_vec_compact(&record).unwrap();
        prop_assert!(compact.len() < verbose.len());
    }

    #[test]
    fn prop_records_stream(records in prop::collection::vec(arb_record(), 1..8)) {
        let mut bytes = Vec::new();
        for record in &records {
            bytes.extend(to_vec(record).unwrap());
        }

        let mut input = bytes.as_slice();
        for record in &records {
            let (back, rest): (Record, _) = from_slice(input).unwrap();
            prop_assert_eq!(&back, record);
            input = rest;
        }
        prop_assert!(input.is_empty());
    }

    #[test]
    fn prop_scalar_value(value in arb_scalar_value()) {
        prop_assert!(roundtrip(&value));
    }

    #[test]
    fn prop_truncated_record_fails(record in arb_record(), cut in any::<prop::sample::Index>()) {
        let bytes = to_vec(&record).unwrap();
        let cut = cut.index(bytes.len());
        prop_assert!(from_slice::<Record>(&bytes[..cut]).is_err());
    }

    #[test]
    fn prop_arbitrary_input_does_not_panic(input in prop::collection::vec(any::<u8>(), 0..64)) {
        let _ = from_slice::<Value>(&input);
        let _ = from_slice::<Record>(&input);
        let _ = from_slice_compact::<Record>(&input);
        let _ = from_slice::<BTreeMap<String, Vec<i32>>>(&input);
        let _ = from_slice::<serde::de::IgnoredAny>(&input);
    }
}
