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
 * COSE message structure test cases
 *
 * Positional validation of the envelope variants: arity, header slots, cross-header duplicate
 * labels, content slots with tag wrappers, and the recipients rules.
 **************************************************************************************************/
extern crate rs_cose;

use hex_literal::hex;

use rs_cose::error::COSEError;
use rs_cose::header::Label;
use rs_cose::message::{
    CoseEncrypt, CoseEncrypt0, CoseMac, CoseMac0, CoseMessage, CoseRecipient, CoseSign1,
};
use rs_cbor::types::CBOR;

#[test]
fn a_cose_sign1_with_the_wrong_arity_is_rejected() {
    // [h'', {}, h''] - three elements instead of four
    let bytes = hex!("8340a040");
    assert_eq!(
        CoseSign1::from_slice(&bytes),
        Err(COSEError::Structural(
            "COSE_Sign1",
            "has the wrong number of elements"
        ))
    );
}

#[test]
fn a_cose_sign1_under_a_foreign_tag_is_rejected() {
    // 17([h'', {}, h'', h'']) - a COSE_Mac0 tag around a Sign1 shape
    let bytes = hex!("d18440a04040");
    assert_eq!(
        CoseSign1::from_slice(&bytes),
        Err(COSEError::Structural(
            "COSE_Sign1",
            "carries the wrong tag number"
        ))
    );
}

#[test]
fn the_protected_slot_must_be_a_byte_string() {
    // [{}, {}, h'', h'']
    let bytes = hex!("84a0a04040");
    assert_eq!(
        CoseSign1::from_slice(&bytes),
        Err(COSEError::Structural(
            "protected header",
            "must be a byte string"
        ))
    );
}

#[test]
fn cross_header_duplicates_are_rejected() {
    // [<<{1: -7}>>, {1: -7}, h'', h'']
    let bytes = hex!("8443a10126a1012640 40");
    assert_eq!(
        CoseSign1::from_slice(&bytes),
        Err(COSEError::DuplicateLabel(Label::Int(1)))
    );
}

#[test]
fn a_null_payload_reads_as_detached() {
    // [h'', {}, null, h'']
    let bytes = hex!("8440a0f640");
    let message = CoseSign1::from_slice(&bytes).unwrap();
    assert_eq!(message.payload(), None);
}

#[test]
fn a_tag_wrapped_payload_is_stripped_for_access_and_kept_on_the_wire() {
    // [h'', {}, 24(h'a10105'), h''] - the payload is an embedded CBOR item
    let bytes = hex!("8440a0d81843a1010540");
    let message = CoseSign1::from_slice(&bytes).unwrap();
    assert_eq!(message.payload().unwrap(), hex!("a10105").as_slice());
    // Re-encoding preserves the tag 24 wrapper byte for byte
    assert_eq!(message.to_cbor().to_bytes().unwrap(), bytes);
}

#[test]
fn a_non_bstr_payload_is_rejected() {
    // [h'', {}, 17, h'']
    let bytes = hex!("8440a01140");
    assert!(matches!(
        CoseSign1::from_slice(&bytes),
        Err(COSEError::Structural("COSE_Sign1 payload", _))
    ));
}

#[test]
fn mac0_parses_its_four_slots() {
    // [<<{1: 5}>>, {}, h'abc123', h'ffff']
    let bytes = hex!("8443a10105a043abc12342ffff");
    let message = CoseMac0::from_slice(&bytes).unwrap();
    assert_eq!(message.payload().unwrap(), hex!("abc123").as_slice());
    assert_eq!(message.tag(), hex!("ffff").as_slice());
    assert_eq!(message.to_cbor().to_bytes().unwrap(), bytes);
}

#[test]
fn mac_requires_at_least_one_recipient() {
    // [h'', {}, h'', h'', []]
    let bytes = hex!("8540a0404080");
    assert_eq!(
        CoseMac::from_slice(&bytes),
        Err(COSEError::Structural(
            "COSE_Mac recipients",
            "must not be empty"
        ))
    );
}

#[test]
fn mac_with_one_recipient_round_trips() {
    // [h'', {}, h'01', h'02', [[h'', {}, h'03']]]
    let bytes = hex!("8540a0410141028183 40a04103");
    let message = CoseMac::from_slice(&bytes).unwrap();
    assert_eq!(message.recipients().len(), 1);
    assert_eq!(
        message.recipients()[0].ciphertext().unwrap(),
        hex!("03").as_slice()
    );
    assert_eq!(message.to_cbor().to_bytes().unwrap(), bytes);
}

#[test]
fn encrypt0_parses_and_round_trips() {
    // [<<{1: 1}>>, {5: h'89f52f65a1c580'}, h'deadbeef']
    let bytes = hex!("8343a10101a1054789f52f65a1c58044deadbeef");
    let message = CoseEncrypt0::from_slice(&bytes).unwrap();
    assert_eq!(message.ciphertext().unwrap(), hex!("deadbeef").as_slice());
    assert_eq!(
        message.headers().unprotected().iv().unwrap(),
        hex!("89f52f65a1c580").as_slice()
    );
    assert_eq!(message.to_cbor().to_bytes().unwrap(), bytes);
}

#[test]
fn nested_recipients_must_be_non_empty_when_present() {
    // [h'', {}, h'', []]
    let item = CBOR::from_bytes(&hex!("8440a04080")).unwrap();
    assert_eq!(
        CoseRecipient::from_cbor(&item),
        Err(COSEError::Structural(
            "COSE_recipient recipients",
            "must not be empty"
        ))
    );
}

#[test]
fn recipients_nest_recursively() {
    // [h'', {}, h'01', [[h'', {}, h'02', [[h'', {}, h'03']]]]]
    let bytes = hex!("8440a041018184 40a041028183 40a04103");
    let item = CBOR::from_bytes(&bytes).unwrap();
    let outer = CoseRecipient::from_cbor(&item).unwrap();
    let middle = &outer.recipients().unwrap()[0];
    let inner = &middle.recipients().unwrap()[0];
    assert_eq!(inner.ciphertext().unwrap(), hex!("03").as_slice());
    assert!(inner.recipients().is_none());
}

#[test]
fn encrypt_requires_recipients_and_round_trips() {
    // [h'', {}, null, [[h'', {}, h'aa']]]
    let bytes = hex!("8440a0f68183 40a041aa");
    let message = CoseEncrypt::from_slice(&bytes).unwrap();
    assert_eq!(message.ciphertext(), None);
    assert_eq!(message.recipients().len(), 1);
    assert_eq!(message.to_cbor().to_bytes().unwrap(), bytes);
}

#[test]
fn cose_message_dispatches_on_the_tag_number() {
    let bytes = hex!("d18443a10105a043abc12342ffff");
    let item = rs_cose::registry::decode(&bytes).unwrap();
    match CoseMessage::from_cbor(&item).unwrap() {
        CoseMessage::Mac0(message) => {
            assert_eq!(message.tag(), hex!("ffff").as_slice());
        }
        other => panic!("expected a COSE_Mac0, got tag {}", other.tag()),
    }
}
