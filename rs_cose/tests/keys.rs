/***************************************************************************************************
 * Copyright (c) 2021-2023 Qualcomm Innovation Center, Inc. All rights reserved.
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
 * COSE key test cases
 *
 * Point decompression from the boolean y form, CBOR round trips of key maps, and the JWK
 * bridge over real key material.
 **************************************************************************************************/
extern crate rs_cose;

use hex_literal::hex;

use rs_cbor::types::CBOR;
use rs_cose::constants::{Algorithm, Curve, HP_ALG};
use rs_cose::header::{Header, Label, ProtectedHeader};
use rs_cose::jwk::{from_jwk, to_jwk};
use rs_cose::key::{CoseKey, Ec2Y};
use rs_cose::sign::{Signer, Verifier};

const KID_11_X: [u8; 32] =
    hex!("bac5b11cad8f99f9c72b05cf4b9e26d244dc189f745228255a219a86d6a09eff");
const KID_11_Y: [u8; 32] =
    hex!("20138bf82dc1b6d562be0fa54ab7804a3a64b6d72ccfed6b6fb6ed28bbfc117e");
const KID_11_D: [u8; 32] =
    hex!("57c92077664146e876760c9520d054aa93c3afb04e306705db6090308507b4d3");

#[test]
fn the_boolean_y_form_decompresses_to_the_same_point() {
    // The low bit of y selects between the two square roots
    let sign_bit = KID_11_Y[31] & 1 == 1;
    let compressed = CoseKey::ec2(
        Curve::P256,
        KID_11_X.to_vec(),
        Ec2Y::SignBit(sign_bit),
        None,
    )
    .unwrap();
    let sec1 = match compressed.typed().unwrap() {
        rs_cose::key::TypedKey::Ec2(ec2) => ec2.sec1_public_key().unwrap(),
        other => panic!("expected an EC2 key, got {:?}", other),
    };
    let decompressed = p256::ecdsa::VerifyingKey::from_sec1_bytes(&sec1)
        .unwrap()
        .to_encoded_point(false);
    assert_eq!(decompressed.x().unwrap().as_slice(), KID_11_X);
    assert_eq!(decompressed.y().unwrap().as_slice(), KID_11_Y);
}

#[test]
fn a_compressed_public_key_verifies_signatures() {
    let private = CoseKey::ec2(
        Curve::P256,
        KID_11_X.to_vec(),
        Ec2Y::Coordinate(KID_11_Y.to_vec()),
        Some(KID_11_D.to_vec()),
    )
    .unwrap();
    let sign_bit = KID_11_Y[31] & 1 == 1;
    let compressed = CoseKey::ec2(
        Curve::P256,
        KID_11_X.to_vec(),
        Ec2Y::SignBit(sign_bit),
        None,
    )
    .unwrap();

    let protected = ProtectedHeader::from_header(
        Header::protected(vec![(
            Label::Int(HP_ALG),
            CBOR::from(Algorithm::ES256.id()),
        )])
        .unwrap(),
    )
    .unwrap();
    let message = Signer::new(private)
        .sign1(protected, Header::empty(), b"compressed", b"")
        .unwrap();
    assert_eq!(
        Verifier::new(compressed).verify_sign1(&message, b""),
        Ok(true)
    );
}

#[test]
fn an_x_with_no_point_on_the_curve_fails() {
    // x = 1 is not the abscissa of any P-256 point: 1 - 3 + b is a non-residue
    let mut x = vec![0u8; 32];
    x[31] = 1;
    let key = CoseKey::ec2(Curve::P256, x, Ec2Y::SignBit(false), None).unwrap();
    let protected = ProtectedHeader::from_header(
        Header::protected(vec![(
            Label::Int(HP_ALG),
            CBOR::from(Algorithm::ES256.id()),
        )])
        .unwrap(),
    )
    .unwrap();
    // Build something to verify with the good key, then fail on the bad one
    let private = CoseKey::ec2(
        Curve::P256,
        KID_11_X.to_vec(),
        Ec2Y::Coordinate(KID_11_Y.to_vec()),
        Some(KID_11_D.to_vec()),
    )
    .unwrap();
    let message = Signer::new(private)
        .sign1(protected, Header::empty(), b"payload", b"")
        .unwrap();
    assert!(matches!(
        Verifier::new(key).verify_sign1(&message, b""),
        Err(rs_cose::error::COSEError::KeyMaterial(_))
    ));
}

#[test]
fn key_maps_round_trip_through_cbor() {
    let key = CoseKey::from_pairs(vec![
        (Label::Int(1), CBOR::from(2)),
        (Label::Int(2), CBOR::bytes(b"11".to_vec())),
        (Label::Int(-1), CBOR::from(1)),
        (Label::Int(-2), CBOR::bytes(KID_11_X.to_vec())),
        (Label::Int(-3), CBOR::bytes(KID_11_Y.to_vec())),
    ])
    .unwrap();
    let bytes = key.to_bytes().unwrap();
    let recovered = CoseKey::from_slice(&bytes).unwrap();
    assert_eq!(recovered, key);
    assert_eq!(recovered.kid().unwrap(), b"11".as_slice());
    assert!(!recovered.is_private());
}

#[test]
fn duplicate_key_labels_are_fatal() {
    let result = CoseKey::from_pairs(vec![
        (Label::Int(1), CBOR::from(2)),
        (Label::Int(1), CBOR::from(4)),
    ]);
    assert_eq!(
        result,
        Err(rs_cose::error::COSEError::DuplicateLabel(Label::Int(1)))
    );
}

#[test]
fn the_jwk_bridge_preserves_key_material() {
    let key = CoseKey::ec2(
        Curve::P256,
        KID_11_X.to_vec(),
        Ec2Y::Coordinate(KID_11_Y.to_vec()),
        Some(KID_11_D.to_vec()),
    )
    .unwrap();
    let jwk = to_jwk(&key).unwrap();
    assert_eq!(jwk["kty"], "EC");
    assert_eq!(jwk["crv"], "P-256");
    assert_eq!(jwk["d"], base64_url::encode(&KID_11_D));
    let recovered = from_jwk(&jwk).unwrap();
    assert_eq!(recovered, key);
    assert!(recovered.is_private());
}

#[test]
fn an_okp_jwk_round_trips() {
    let key = CoseKey::okp(Curve::Ed25519, Some(vec![0x42; 32]), None).unwrap();
    let jwk = to_jwk(&key).unwrap();
    assert_eq!(jwk["kty"], "OKP");
    assert_eq!(jwk["crv"], "Ed25519");
    assert_eq!(from_jwk(&jwk).unwrap(), key);
}
