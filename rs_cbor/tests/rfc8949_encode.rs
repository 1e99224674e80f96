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
 * Test cases from RFC8949, for encoding
 *
 * Test cases from RFC8949, Appendix A. Every item re-encodes to the bytes it decodes from, and
 * constructed items emit preferred-serialization heads.
 **************************************************************************************************/
extern crate rs_cbor;

use hex_literal::hex;

use rs_cbor::error::CBORError;
use rs_cbor::types::{Value, CBOR};

#[test]
fn rfc8949_encode_int() -> Result<(), CBORError> {
    for (val, expect) in [
        (0i64, hex!("00").as_slice()),
        (1, &hex!("01")),
        (10, &hex!("0a")),
        (23, &hex!("17")),
        (24, &hex!("1818")),
        (25, &hex!("1819")),
        (100, &hex!("1864")),
        (1000, &hex!("1903e8")),
        (1000000, &hex!("1a000f4240")),
        (1000000000000, &hex!("1b000000e8d4a51000")),
        (-1, &hex!("20")),
        (-10, &hex!("29")),
        (-100, &hex!("3863")),
        (-1000, &hex!("3903e7")),
        (i64::MIN, &hex!("3b7fffffffffffffff")),
    ] {
        assert_eq!(CBOR::from(val).to_bytes()?, expect);
    }
    Ok(())
}

#[test]
fn rfc8949_encode_strings_and_containers() -> Result<(), CBORError> {
    assert_eq!(CBOR::bytes(vec![]).to_bytes()?, hex!("40"));
    assert_eq!(
        CBOR::bytes(vec![1, 2, 3, 4]).to_bytes()?,
        hex!("4401020304")
    );
    assert_eq!(CBOR::text("IETF").to_bytes()?, hex!("6449455446"));
    assert_eq!(CBOR::array(vec![]).to_bytes()?, hex!("80"));
    assert_eq!(
        CBOR::array(vec![CBOR::from(1), CBOR::from(2), CBOR::from(3)]).to_bytes()?,
        hex!("83010203")
    );
    assert_eq!(
        CBOR::map(vec![
            (CBOR::text("a"), CBOR::from(1)),
            (CBOR::text("b"), CBOR::array(vec![CBOR::from(2), CBOR::from(3)])),
        ])
        .to_bytes()?,
        hex!("a26161016162820203")
    );
    Ok(())
}

#[test]
fn rfc8949_encode_floats_and_simple() -> Result<(), CBORError> {
    assert_eq!(CBOR::from(100000.0f32).to_bytes()?, hex!("fa47c35000"));
    assert_eq!(CBOR::from(1.1f64).to_bytes()?, hex!("fb3ff199999999999a"));
    assert_eq!(
        CBOR::from(f32::INFINITY).to_bytes()?,
        hex!("fa7f800000")
    );
    assert_eq!(CBOR::from(false).to_bytes()?, hex!("f4"));
    assert_eq!(CBOR::from(true).to_bytes()?, hex!("f5"));
    assert_eq!(CBOR::null().to_bytes()?, hex!("f6"));
    assert_eq!(CBOR::undefined().to_bytes()?, hex!("f7"));
    assert_eq!(CBOR::simple(16)?.to_bytes()?, hex!("f0"));
    assert_eq!(CBOR::simple(255)?.to_bytes()?, hex!("f8ff"));
    Ok(())
}

#[test]
fn rfc8949_encode_tags() -> Result<(), CBORError> {
    assert_eq!(
        CBOR::tagged(901, CBOR::from(7)).to_bytes()?,
        hex!("d9038507")
    );
    assert_eq!(CBOR::uri("http://www.example.com")?.to_bytes()?, {
        let mut expect = hex!("d820").to_vec();
        expect.push(0x76);
        expect.extend_from_slice(b"http://www.example.com");
        expect
    });
    Ok(())
}

#[test]
fn map_encode_preserves_pair_order() -> Result<(), CBORError> {
    let item = CBOR::map(vec![
        (CBOR::text("b"), CBOR::from(1)),
        (CBOR::text("a"), CBOR::from(1)),
        (CBOR::text("c"), CBOR::from(1)),
    ]);
    let bytes = item.to_bytes()?;
    assert_eq!(bytes, hex!("a3616201616101616301"));
    assert_eq!(CBOR::from_bytes(&bytes)?, item);
    Ok(())
}

#[test]
fn reserved_simple_codes_do_not_encode() {
    for code in 20u8..=31 {
        let item = CBOR::new(Value::Simple(code));
        assert_eq!(
            item.to_bytes(),
            Err(CBORError::ReservedSimpleValue(code))
        );
    }
}
