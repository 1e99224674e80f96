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
 * COSE_Sign1 example
 *
 * Encode, sign, decode and verify the COSE_Sign1 structure from RFC 9052 Appendix C.2.1.
 * The signature bytes differ from the appendix on every run that is not seeded per RFC 6979
 * with the same inputs; the message verifies either way, and the intermediate values match.
 **************************************************************************************************/
use std::error::Error;

use rs_cbor::types::CBOR;
use rs_cose::constants::{Algorithm, Curve, HP_ALG, HP_KID};
use rs_cose::header::{Header, Label, ProtectedHeader};
use rs_cose::key::{CoseKey, Ec2Y};
use rs_cose::message::CoseSign1;
use rs_cose::sign::{Signer, Verifier};

// Key material for kid '11' from https://github.com/cose-wg/Examples/blob/master/KeySet.txt
const KID_11_X: [u8; 32] = [
    0xba, 0xc5, 0xb1, 0x1c, 0xad, 0x8f, 0x99, 0xf9, 0xc7, 0x2b, 0x05, 0xcf, 0x4b, 0x9e, 0x26,
    0xd2, 0x44, 0xdc, 0x18, 0x9f, 0x74, 0x52, 0x28, 0x25, 0x5a, 0x21, 0x9a, 0x86, 0xd6, 0xa0,
    0x9e, 0xff,
];
const KID_11_Y: [u8; 32] = [
    0x20, 0x13, 0x8b, 0xf8, 0x2d, 0xc1, 0xb6, 0xd5, 0x62, 0xbe, 0x0f, 0xa5, 0x4a, 0xb7, 0x80,
    0x4a, 0x3a, 0x64, 0xb6, 0xd7, 0x2c, 0xcf, 0xed, 0x6b, 0x6f, 0xb6, 0xed, 0x28, 0xbb, 0xfc,
    0x11, 0x7e,
];
const KID_11_D: [u8; 32] = [
    0x57, 0xc9, 0x20, 0x77, 0x66, 0x41, 0x46, 0xe8, 0x76, 0x76, 0x0c, 0x95, 0x20, 0xd0, 0x54,
    0xaa, 0x93, 0xc3, 0xaf, 0xb0, 0x4e, 0x30, 0x67, 0x05, 0xdb, 0x60, 0x90, 0x30, 0x85, 0x07,
    0xb4, 0xd3,
];

fn main() -> Result<(), Box<dyn Error>> {
    let private = CoseKey::ec2(
        Curve::P256,
        KID_11_X.to_vec(),
        Ec2Y::Coordinate(KID_11_Y.to_vec()),
        Some(KID_11_D.to_vec()),
    )?;
    let public = CoseKey::ec2(
        Curve::P256,
        KID_11_X.to_vec(),
        Ec2Y::Coordinate(KID_11_Y.to_vec()),
        None,
    )?;

    // Protected: { alg: ES256 }, unprotected: { kid: '11' }
    let protected = ProtectedHeader::from_header(Header::protected(vec![(
        Label::Int(HP_ALG),
        CBOR::from(Algorithm::ES256.id()),
    )])?)?;
    let unprotected = Header::unprotected(vec![(
        Label::Int(HP_KID),
        CBOR::bytes(b"11".to_vec()),
    )])?;

    let payload = b"This is the content.";
    let message = Signer::new(private).sign1(protected, unprotected, payload, b"")?;

    let bytes = message.tagged().to_bytes()?;
    println!("Output {}", hex::encode(&bytes));
    println!("{}", message.tagged());

    // Decode the wire form back and verify the signature
    let received = CoseSign1::from_slice(&bytes)?;
    let verified = Verifier::new(public).verify_sign1(&received, b"")?;
    if verified {
        println!(
            "Verification succeeded: message content {:?}",
            received.payload().unwrap()
        );
    } else {
        println!("Verification failed");
    }

    Ok(())
}
