//! Byte-exact checks of the wire format: tag bytes, length classes and
//! big-endian payloads.

use serde::{Deserialize, Serialize};
use serde_bytes::ByteBuf;
use serde_pack::{from_slice, from_slice_compact, tag, to_vec, to_vec_compact};
use std::collections::BTreeMap;

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Header {
    compact: bool,
    schema: u8,
}

#[test]
fn test_reference_vector_verbose() {
    let header = Header {
        compact: true,
        schema: 0,
    };
    let bytes = to_vec(&header).unwrap();
    assert_eq!(hex::encode(&bytes), "82a7636f6d70616374c3a6736368656d6100");

    let input = hex::decode("82a7636f6d70616374c3a6736368656d6100").unwrap();
    let (back, rest): (Header, _) = from_slice(&input).unwrap();
    assert_eq!(back, header);
    assert!(rest.is_empty());
}

#[test]
fn test_reference_vector_compact() {
    let header = Header {
        compact: true,
        schema: 0,
    };
    let bytes = to_vec_compact(&header).unwrap();
    assert_eq!(hex::encode(&bytes), "82c300");

    let (back, _): (Header, _) = from_slice_compact(&bytes).unwrap();
    assert_eq!(back, header);
}

#[test]
fn test_scalar_encodings() {
    let cases: Vec<(Vec<u8>, &str)> = vec![
        (to_vec(&true).unwrap(), "c3"),
        (to_vec(&false).unwrap(), "c2"),
        (to_vec(&None::<i32>).unwrap(), "c0"),
        (to_vec(&-1i8).unwrap(), "d0ff"),
        (to_vec(&0x0102i16).unwrap(), "d10102"),
        (to_vec(&-2i32).unwrap(), "d2fffffffe"),
        (to_vec(&1i64).unwrap(), "d30000000000000001"),
        (to_vec(&0u8).unwrap(), "00"),
        (to_vec(&7u8).unwrap(), "cc07"),
        (to_vec(&0u16).unwrap(), "cd0000"),
        (to_vec(&0xbeefu16).unwrap(), "cdbeef"),
        (to_vec(&0xdeadbeefu32).unwrap(), "cedeadbeef"),
        (to_vec(&u64::MAX).unwrap(), "cfffffffffffffffff"),
        (to_vec(&1.0f32).unwrap(), "ca3f800000"),
        (to_vec(&-2.5f64).unwrap(), "cbc004000000000000"),
    ];

    for (bytes, expected) in cases {
        assert_eq!(hex::encode(bytes), expected);
    }
}

#[test]
fn test_integers_keep_declared_width() {
    // Small values do not shrink to a narrower tag.
    assert_eq!(to_vec(&1i64).unwrap().len(), 9);
    assert_eq!(to_vec(&1u32).unwrap().len(), 5);
    assert_eq!(to_vec(&0i16).unwrap(), vec![tag::INT_16, 0x00, 0x00]);
}

#[test]
fn test_float_bits_preserved() {
    for bits in [0x7fc0_0001u32, 0x8000_0000, 0x0000_0001] {
        let bytes = to_vec(&f32::from_bits(bits)).unwrap();
        let (back, _): (f32, _) = from_slice(&bytes).unwrap();
        assert_eq!(back.to_bits(), bits);
    }
}

fn text_of(len: usize) -> String {
    "x".repeat(len)
}

#[test]
fn test_text_length_classes() {
    let cases: [(usize, &[u8]); 8] = [
        (0, &[0xa0]),
        (31, &[0xbf]),
        (32, &[0xd9, 0x20]),
        (255, &[0xd9, 0xff]),
        (256, &[0xda, 0x01, 0x00]),
        (65535, &[0xda, 0xff, 0xff]),
        (65536, &[0xdb, 0x00, 0x01, 0x00, 0x00]),
        (70000, &[0xdb, 0x00, 0x01, 0x11, 0x70]),
    ];

    for (len, header) in cases {
        let text = text_of(len);
        let bytes = to_vec(&text).unwrap();
        assert_eq!(&bytes[..header.len()], header, "length {}", len);
        assert_eq!(bytes.len(), header.len() + len);

        let (back, rest): (String, _) = from_slice(&bytes).unwrap();
        assert_eq!(back.len(), len);
        assert!(rest.is_empty());
    }
}

#[test]
fn test_bytes_length_classes() {
    let cases: [(usize, &[u8]); 6] = [
        (1, &[0xc4, 0x01]),
        (255, &[0xc4, 0xff]),
        (256, &[0xc5, 0x01, 0x00]),
        (65535, &[0xc5, 0xff, 0xff]),
        (65536, &[0xc6, 0x00, 0x01, 0x00, 0x00]),
        (0, &[0xa0]),
    ];

    for (len, header) in cases {
        // 0xff never appears in UTF-8, so these stay binary.
        let raw = ByteBuf::from(vec![0xff; len]);
        let bytes = to_vec(&raw).unwrap();
        assert_eq!(&bytes[..header.len()], header, "length {}", len);

        let (back, rest): (ByteBuf, _) = from_slice(&bytes).unwrap();
        assert_eq!(back, raw);
        assert!(rest.is_empty());
    }
}

#[test]
fn test_sequence_length_classes() {
    let cases: [(usize, &[u8]); 6] = [
        (0, &[0x90]),
        (15, &[0x9f]),
        (16, &[0xdc, 0x00, 0x10]),
        (65535, &[0xdc, 0xff, 0xff]),
        (65536, &[0xdd, 0x00, 0x01, 0x00, 0x00]),
        (3, &[0x93]),
    ];

    for (len, header) in cases {
        let flags = vec![true; len];
        let bytes = to_vec(&flags).unwrap();
        assert_eq!(&bytes[..header.len()], header, "length {}", len);
        assert_eq!(bytes.len(), header.len() + len);

        let (back, _): (Vec<bool>, _) = from_slice(&bytes).unwrap();
        assert_eq!(back, flags);
    }
}

#[test]
fn test_map_length_classes() {
    let cases: [(usize, &[u8]); 4] = [
        (0, &[0x80]),
        (15, &[0x8f]),
        (16, &[0xde, 0x00, 0x10]),
        (65536, &[0xdf, 0x00, 0x01, 0x00, 0x00]),
    ];

    for (len, header) in cases {
        let map: BTreeMap<u32, bool> = (0..len as u32).map(|k| (k, k % 2 == 0)).collect();
        let bytes = to_vec(&map).unwrap();
        assert_eq!(&bytes[..header.len()], header, "length {}", len);

        let (back, _): (BTreeMap<u32, bool>, _) = from_slice(&bytes).unwrap();
        assert_eq!(back, map);
    }
}

#[test]
fn test_record_header_counts_fields() {
    #[derive(Serialize)]
    struct Wide {
        f0: bool,
        f1: bool,
        f2: bool,
        f3: bool,
        f4: bool,
        f5: bool,
        f6: bool,
        f7: bool,
        f8: bool,
        f9: bool,
        f10: bool,
        f11: bool,
        f12: bool,
        f13: bool,
        f14: bool,
        f15: bool,
    }

    let wide = Wide {
        f0: true,
        f1: true,
        f2: true,
        f3: true,
        f4: true,
        f5: true,
        f6: true,
        f7: true,
        f8: true,
        f9: true,
        f10: true,
        f11: true,
        f12: true,
        f13: true,
        f14: true,
        f15: true,
    };
    let bytes = to_vec_compact(&wide).unwrap();
    assert_eq!(&bytes[..3], &[0xde, 0x00, 0x10]);
    assert_eq!(bytes.len(), 3 + 16);
}

#[test]
fn test_decode_explicit_32_bit_lengths() {
    // Encoders never pick these classes for short content, but decoders accept them.
    let (text, _): (String, _) = from_slice(&[0xdb, 0, 0, 0, 3, b'a', b'b', b'c']).unwrap();
    assert_eq!(text, "abc");

    let (raw, _): (ByteBuf, _) = from_slice(&[0xc6, 0, 0, 0, 2, 0x01, 0x02]).unwrap();
    assert_eq!(raw.into_vec(), vec![0x01, 0x02]);

    let (flags, _): (Vec<bool>, _) = from_slice(&[0xdd, 0, 0, 0, 1, 0xc3]).unwrap();
    assert_eq!(flags, vec![true]);

    let (map, _): (BTreeMap<String, bool>, _) =
        from_slice(&[0xdf, 0, 0, 0, 1, 0xa1, b'k', 0xc2]).unwrap();
    assert_eq!(map.get("k"), Some(&false));
}

#[test]
fn test_decode_16_bit_text_length() {
    let mut input = vec![0xda, 0x00, 0x02];
    input.extend_from_slice(b"ok");
    let (text, _): (String, _) = from_slice(&input).unwrap();
    assert_eq!(text, "ok");
}
