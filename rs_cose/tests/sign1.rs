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
 * Sign and verify test cases
 *
 * COSE_Sign1 and COSE_Sign round trips over the supported algorithms, using the RFC 9052
 * Appendix C key for kid '11' on P-256, throwaway scalars on the larger curves, and a random
 * Ed25519 key.
 **************************************************************************************************/
extern crate rs_cose;

use std::sync::Arc;

use hex_literal::hex;

use rs_cbor::types::CBOR;
use rs_cose::constants::{Algorithm, Curve, HP_ALG, HP_KID};
use rs_cose::error::COSEError;
use rs_cose::header::{Header, Label, ProtectedHeader};
use rs_cose::key::{CoseKey, Ec2Y};
use rs_cose::message::{CoseSign, CoseSign1};
use rs_cose::sign::{KeyGetter, KeyOp, Signer, Verifier};

// Key material for kid '11' from https://github.com/cose-wg/Examples/blob/master/KeySet.txt
const KID_11_X: [u8; 32] =
    hex!("bac5b11cad8f99f9c72b05cf4b9e26d244dc189f745228255a219a86d6a09eff");
const KID_11_Y: [u8; 32] =
    hex!("20138bf82dc1b6d562be0fa54ab7804a3a64b6d72ccfed6b6fb6ed28bbfc117e");
const KID_11_D: [u8; 32] =
    hex!("57c92077664146e876760c9520d054aa93c3afb04e306705db6090308507b4d3");

fn kid11_private() -> CoseKey {
    CoseKey::ec2(
        Curve::P256,
        KID_11_X.to_vec(),
        Ec2Y::Coordinate(KID_11_Y.to_vec()),
        Some(KID_11_D.to_vec()),
    )
    .unwrap()
}

fn kid11_public() -> CoseKey {
    CoseKey::ec2(
        Curve::P256,
        KID_11_X.to_vec(),
        Ec2Y::Coordinate(KID_11_Y.to_vec()),
        None,
    )
    .unwrap()
}

fn es256_protected() -> ProtectedHeader {
    ProtectedHeader::from_header(
        Header::protected(vec![(
            Label::Int(HP_ALG),
            CBOR::from(Algorithm::ES256.id()),
        )])
        .unwrap(),
    )
    .unwrap()
}

fn kid11_unprotected() -> Header {
    Header::unprotected(vec![(Label::Int(HP_KID), CBOR::bytes(b"11".to_vec()))]).unwrap()
}

#[test]
fn rfc9052_c21_shape_signs_and_verifies() {
    let payload = b"This is the content.";
    let message = Signer::new(kid11_private())
        .sign1(es256_protected(), kid11_unprotected(), payload, b"")
        .unwrap();

    // The deterministic parts of the wire form match the appendix
    let bytes = message.tagged().to_bytes().unwrap();
    assert_eq!(&bytes[..2], &hex!("d284"));
    // protected: << {1: -7} >>
    assert_eq!(&bytes[2..6], &hex!("43a10126"));
    // unprotected: { 4: '11' }
    assert_eq!(&bytes[6..11], &hex!("a104423131"));
    // ES256 signatures are 64 bytes of raw R || S
    assert_eq!(message.signature().len(), 64);

    let received = CoseSign1::from_slice(&bytes).unwrap();
    assert_eq!(received.payload().unwrap(), payload.as_slice());
    assert_eq!(received.headers().kid().unwrap(), b"11".as_slice());
    assert!(Verifier::new(kid11_public())
        .verify_sign1(&received, b"")
        .unwrap());
}

#[test]
fn a_tampered_payload_fails_as_a_boolean() {
    let message = Signer::new(kid11_private())
        .sign1(es256_protected(), Header::empty(), b"payload", b"")
        .unwrap();
    let mut bytes = message.to_cbor().to_bytes().unwrap();
    // Flip a byte inside the payload text
    let index = bytes.len() - 70;
    bytes[index] ^= 0x01;
    let tampered = CoseSign1::from_slice(&bytes).unwrap();
    assert_eq!(
        Verifier::new(kid11_public()).verify_sign1(&tampered, b""),
        Ok(false)
    );
}

#[test]
fn external_aad_is_part_of_the_signature() {
    let message = Signer::new(kid11_private())
        .sign1(es256_protected(), Header::empty(), b"payload", b"aad")
        .unwrap();
    let verifier = Verifier::new(kid11_public());
    assert_eq!(verifier.verify_sign1(&message, b"aad"), Ok(true));
    assert_eq!(verifier.verify_sign1(&message, b""), Ok(false));
}

#[test]
fn the_wrong_key_fails_as_a_boolean() {
    let other_secret = p256::ecdsa::SigningKey::from_slice(&[9u8; 32]).unwrap();
    let other_point = p256::ecdsa::VerifyingKey::from(&other_secret).to_encoded_point(false);
    let other_public = CoseKey::ec2(
        Curve::P256,
        other_point.x().unwrap().as_slice().to_vec(),
        Ec2Y::Coordinate(other_point.y().unwrap().as_slice().to_vec()),
        None,
    )
    .unwrap();

    let message = Signer::new(kid11_private())
        .sign1(es256_protected(), Header::empty(), b"payload", b"")
        .unwrap();
    assert_eq!(
        Verifier::new(other_public).verify_sign1(&message, b""),
        Ok(false)
    );
}

#[test]
fn the_algorithm_may_come_from_the_unprotected_header_or_as_text() {
    let unprotected =
        Header::unprotected(vec![(Label::Int(HP_ALG), CBOR::text("ES256"))]).unwrap();
    let message = Signer::new(kid11_private())
        .sign1(ProtectedHeader::empty(), unprotected, b"payload", b"")
        .unwrap();
    assert_eq!(
        Verifier::new(kid11_public()).verify_sign1(&message, b""),
        Ok(true)
    );
}

#[test]
fn a_missing_algorithm_is_an_error() {
    let result = Signer::new(kid11_private()).sign1(
        ProtectedHeader::empty(),
        Header::empty(),
        b"payload",
        b"",
    );
    assert_eq!(result.unwrap_err(), COSEError::MissingAlgorithm);
}

#[test]
fn an_unknown_algorithm_is_an_error() {
    let protected = ProtectedHeader::from_header(
        Header::protected(vec![(Label::Int(HP_ALG), CBOR::from(-65535))]).unwrap(),
    )
    .unwrap();
    let result =
        Signer::new(kid11_private()).sign1(protected, Header::empty(), b"payload", b"");
    assert_eq!(
        result.unwrap_err(),
        COSEError::UnsupportedAlgorithm("-65535".into())
    );
}

fn kid11_getter(op: KeyOp, alg: Option<Algorithm>, kid: Option<&[u8]>) -> Option<CoseKey> {
    assert_eq!(alg, Some(Algorithm::ES256));
    match op {
        KeyOp::Sign if kid == Some(b"11".as_slice()) => Some(kid11_private()),
        KeyOp::Verify if kid == Some(b"11".as_slice()) => Some(kid11_public()),
        _ => None,
    }
}

#[test]
fn the_key_getter_receives_the_operation_and_kid() {
    let getter: Arc<KeyGetter> = Arc::new(kid11_getter);
    let message = Signer::with_getter(getter.clone())
        .sign1(es256_protected(), kid11_unprotected(), b"payload", b"")
        .unwrap();
    assert_eq!(
        Verifier::with_getter(getter).verify_sign1(&message, b""),
        Ok(true)
    );
}

#[test]
fn a_getter_returning_no_key_is_fatal() {
    let getter: Arc<KeyGetter> =
        Arc::new(|_op, _alg, _kid| None);
    let result = Signer::with_getter(getter).sign1(
        es256_protected(),
        Header::empty(),
        b"payload",
        b"",
    );
    assert_eq!(result.unwrap_err(), COSEError::MissingKey);
}

#[test]
fn es384_and_es512_round_trip() {
    for (alg, curve) in [(Algorithm::ES384, Curve::P384), (Algorithm::ES512, Curve::P521)] {
        let (private, public) = match curve {
            Curve::P384 => {
                let secret = p384::ecdsa::SigningKey::from_slice(&[7u8; 48]).unwrap();
                let point = p384::ecdsa::VerifyingKey::from(&secret).to_encoded_point(false);
                ec2_pair(
                    curve,
                    point.x().unwrap().as_slice(),
                    point.y().unwrap().as_slice(),
                    secret.to_bytes().as_slice(),
                )
            }
            _ => {
                let secret = p521::ecdsa::SigningKey::from_slice(&[1u8; 66]).unwrap();
                let point = p521::ecdsa::VerifyingKey::from(&secret).to_encoded_point(false);
                ec2_pair(
                    curve,
                    point.x().unwrap().as_slice(),
                    point.y().unwrap().as_slice(),
                    secret.to_bytes().as_slice(),
                )
            }
        };
        let protected = ProtectedHeader::from_header(
            Header::protected(vec![(Label::Int(HP_ALG), CBOR::from(alg.id()))]).unwrap(),
        )
        .unwrap();
        let message = Signer::new(private)
            .sign1(protected, Header::empty(), b"payload", b"")
            .unwrap();
        assert_eq!(
            Verifier::new(public).verify_sign1(&message, b""),
            Ok(true),
            "round trip failed for {}",
            alg
        );
    }
}

fn ec2_pair(curve: Curve, x: &[u8], y: &[u8], d: &[u8]) -> (CoseKey, CoseKey) {
    (
        CoseKey::ec2(
            curve,
            x.to_vec(),
            Ec2Y::Coordinate(y.to_vec()),
            Some(d.to_vec()),
        )
        .unwrap(),
        CoseKey::ec2(curve, x.to_vec(), Ec2Y::Coordinate(y.to_vec()), None).unwrap(),
    )
}

#[test]
fn ed25519_signs_and_verifies() {
    let secret = ed25519_dalek::SigningKey::generate(&mut rand::rngs::OsRng);
    let public_bytes = secret.verifying_key().to_bytes();
    let private = CoseKey::okp(
        Curve::Ed25519,
        Some(public_bytes.to_vec()),
        Some(secret.to_bytes().to_vec()),
    )
    .unwrap();
    let public = CoseKey::okp(Curve::Ed25519, Some(public_bytes.to_vec()), None).unwrap();

    let protected = ProtectedHeader::from_header(
        Header::protected(vec![(
            Label::Int(HP_ALG),
            CBOR::from(Algorithm::EdDSA.id()),
        )])
        .unwrap(),
    )
    .unwrap();
    let message = Signer::new(private)
        .sign1(protected, Header::empty(), b"payload", b"")
        .unwrap();
    assert_eq!(message.signature().len(), 64);
    assert_eq!(
        Verifier::new(public).verify_sign1(&message, b""),
        Ok(true)
    );
}

#[test]
fn cose_sign_verifies_when_any_signature_matches() {
    let payload = b"multi-signer content";
    let body_protected = ProtectedHeader::empty();
    let signer = Signer::new(kid11_private());

    let good = signer
        .sign_entry(
            &body_protected,
            es256_protected(),
            kid11_unprotected(),
            payload,
            b"",
        )
        .unwrap();
    // A structurally-valid entry whose signature bytes are garbage
    let bogus = {
        let mut entry = good.clone();
        let mut forged = entry.signature().to_vec();
        forged[0] ^= 0xff;
        entry = rs_cose::message::CoseSignature::new(entry.headers().clone(), forged);
        entry
    };

    let headers =
        rs_cose::message::CoseHeaders::new(body_protected, Header::empty()).unwrap();
    let both = CoseSign::new(
        headers.clone(),
        Some(payload.to_vec()),
        vec![bogus.clone(), good.clone()],
    )
    .unwrap();
    let only_bogus = CoseSign::new(headers, Some(payload.to_vec()), vec![bogus]).unwrap();

    let verifier = Verifier::new(kid11_public());
    assert_eq!(verifier.verify_sign(&both, b""), Ok(true));
    assert_eq!(verifier.verify_sign(&only_bogus, b""), Ok(false));
}

#[test]
fn cose_sign_round_trips_through_its_tagged_form() {
    let payload = b"multi-signer content";
    let body_protected = ProtectedHeader::empty();
    let entry = Signer::new(kid11_private())
        .sign_entry(
            &body_protected,
            es256_protected(),
            kid11_unprotected(),
            payload,
            b"",
        )
        .unwrap();
    let headers =
        rs_cose::message::CoseHeaders::new(body_protected, Header::empty()).unwrap();
    let message = CoseSign::new(headers, Some(payload.to_vec()), vec![entry]).unwrap();

    let bytes = message.tagged().to_bytes().unwrap();
    let received = CoseSign::from_slice(&bytes).unwrap();
    assert_eq!(received, message);
    assert_eq!(
        Verifier::new(kid11_public()).verify_sign(&received, b""),
        Ok(true)
    );
}
