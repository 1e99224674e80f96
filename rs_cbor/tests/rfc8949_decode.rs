/***************************************************************************************************
 * Copyright (c) 2020-2023 Qualcomm Innovation Center, Inc. All rights reserved.
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy of this software
 * and associated documentation files (the “Software”), to deal in the Software without
 * restriction, including without limitation the rights to use, copy, modify, merge, publish,
 * distribute, sublicense, and/or sell copies of the Software, and to permit persons to whom the
 * Software is furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice (including the next
 * paragraph) shall be included in all copies or substantial portions of the
 * Software.
 *
 * THE SOFTWARE IS PROVIDED “AS IS”, WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING
 * BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
 * NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM,
 * DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.
 **************************************************************************************************/
/***************************************************************************************************
 * Test cases from RFC8949, for decoding
 *
 * Test cases from RFC8949, Appendix A, plus the integer narrowing rules.
 **************************************************************************************************/
extern crate rs_cbor;

use hex_literal::hex;
use num_bigint::BigInt;

use rs_cbor::error::CBORError;
use rs_cbor::types::{Value, CBOR};

fn decode(bytes: &[u8]) -> CBOR {
    CBOR::from_bytes(bytes).unwrap()
}

#[test]
fn rfc8949_decode_uint() {
    for (buf, expected) in [
        (hex!("00").as_slice(), 0i128),
        (&hex!("01"), 1),
        (&hex!("0a"), 10),
        (&hex!("17"), 23),
        (&hex!("1818"), 24),
        (&hex!("1819"), 25),
        (&hex!("1864"), 100),
        (&hex!("1903e8"), 1000),
        (&hex!("1a000f4240"), 1000000),
        (&hex!("1a00010000"), 65536),
        (&hex!("1b000000e8d4a51000"), 1000000000000),
    ] {
        assert_eq!(decode(buf), CBOR::integer(expected));
    }
}

#[test]
fn rfc8949_decode_nint() {
    for (buf, expected) in [
        (hex!("20").as_slice(), -1i128),
        (&hex!("29"), -10),
        (&hex!("3863"), -100),
        (&hex!("3903e7"), -1000),
    ] {
        assert_eq!(decode(buf), CBOR::integer(expected));
    }
}

#[test]
fn integers_narrow_to_the_smallest_variant() {
    // At or below i32::MAX the 32-bit variant is used
    assert_eq!(*decode(&hex!("1a7fffffff")).value(), Value::Int(i32::MAX));
    assert_eq!(*decode(&hex!("3a7fffffff")).value(), Value::Int(i32::MIN));
    // One below i32::MIN widens to the 64-bit variant
    assert_eq!(
        *decode(&hex!("3a80000000")).value(),
        Value::Long(i32::MIN as i64 - 1)
    );
    // Between 2^31 and 2^63 - 1 the 64-bit variant is used
    assert_eq!(
        *decode(&hex!("1b0000000080000000")).value(),
        Value::Long(1i64 << 31)
    );
    assert_eq!(
        *decode(&hex!("1b7fffffffffffffff")).value(),
        Value::Long(i64::MAX)
    );
    // Beyond the signed 64-bit range the arbitrary-precision variant is used
    assert_eq!(
        *decode(&hex!("1bffffffffffffffff")).value(),
        Value::BigNum(BigInt::from(u64::MAX))
    );
    assert_eq!(
        *decode(&hex!("3bffffffffffffffff")).value(),
        Value::BigNum(BigInt::from(-1) - BigInt::from(u64::MAX))
    );
}

#[test]
fn rfc8949_decode_float() {
    // Half-precision values expand to single precision
    assert_eq!(*decode(&hex!("f90000")).value(), Value::Float32(0.0));
    assert_eq!(*decode(&hex!("f93c00")).value(), Value::Float32(1.0));
    assert_eq!(*decode(&hex!("f93e00")).value(), Value::Float32(1.5));
    assert_eq!(*decode(&hex!("f97c00")).value(), Value::Float32(f32::INFINITY));
    assert_eq!(decode(&hex!("f97e00")), CBOR::from(f32::NAN));
    assert_eq!(
        *decode(&hex!("fa47c35000")).value(),
        Value::Float32(100000.0)
    );
    assert_eq!(*decode(&hex!("fb3ff199999999999a")).value(), Value::Float64(1.1));
    assert_eq!(
        *decode(&hex!("fbc010666666666666")).value(),
        Value::Float64(-4.1)
    );
}

#[test]
fn rfc8949_decode_simple() {
    assert_eq!(decode(&hex!("f4")), CBOR::from(false));
    assert_eq!(decode(&hex!("f5")), CBOR::from(true));
    assert_eq!(decode(&hex!("f6")), CBOR::null());
    assert_eq!(decode(&hex!("f7")), CBOR::undefined());
    assert_eq!(decode(&hex!("f0")), CBOR::simple(16).unwrap());
    assert_eq!(decode(&hex!("f8ff")), CBOR::simple(255).unwrap());
}

#[test]
fn rfc8949_decode_strings() {
    assert_eq!(decode(&hex!("40")), CBOR::bytes(vec![]));
    assert_eq!(decode(&hex!("4401020304")), CBOR::bytes(vec![1, 2, 3, 4]));
    assert_eq!(decode(&hex!("60")), CBOR::text(""));
    assert_eq!(decode(&hex!("6161")), CBOR::text("a"));
    assert_eq!(decode(&hex!("6449455446")), CBOR::text("IETF"));
    assert_eq!(decode(&hex!("62c3bc")), CBOR::text("\u{00fc}"));
}

#[test]
fn rfc8949_decode_arrays() {
    assert_eq!(decode(&hex!("80")), CBOR::array(vec![]));
    assert_eq!(decode(&hex!("8101")), CBOR::array(vec![CBOR::from(1)]));
    assert_eq!(
        decode(&hex!("8301820203820405")),
        CBOR::array(vec![
            CBOR::from(1),
            CBOR::array(vec![CBOR::from(2), CBOR::from(3)]),
            CBOR::array(vec![CBOR::from(4), CBOR::from(5)]),
        ])
    );
}

#[test]
fn rfc8949_decode_maps() {
    assert_eq!(decode(&hex!("a0")), CBOR::map(vec![]));
    assert_eq!(
        decode(&hex!("a1616101")),
        CBOR::map(vec![(CBOR::text("a"), CBOR::from(1))])
    );
    assert_eq!(
        decode(&hex!("a201020304")),
        CBOR::map(vec![
            (CBOR::from(1), CBOR::from(2)),
            (CBOR::from(3), CBOR::from(4)),
        ])
    );
}

#[test]
fn map_decode_preserves_pair_order() {
    let item = decode(&hex!("a3616201616101616301"));
    let keys: Vec<&str> = item
        .as_map()
        .unwrap()
        .iter()
        .map(|(k, _)| k.as_text().unwrap())
        .collect();
    assert_eq!(keys, vec!["b", "a", "c"]);
}

#[test]
fn malformed_utf8_is_rejected() {
    assert_eq!(
        CBOR::from_bytes(&hex!("62c328")),
        Err(CBORError::MalformedUtf8(3))
    );
}

#[test]
fn truncated_input_is_rejected_with_context() {
    assert!(matches!(
        CBOR::from_bytes(&hex!("82 01")),
        Err(CBORError::InsufficientData(2, "an array"))
    ));
    assert!(matches!(
        CBOR::from_bytes(&hex!("a1 01")),
        Err(CBORError::InsufficientData(2, "a map value"))
    ));
}
