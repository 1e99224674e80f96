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
 * rs_cose module definition
 *
 * COSE (RFC 9052/9053) over rs_cbor: signed, MAC'd and encrypted message structures, keys with
 * a JWK bridge, and an ECDSA/EdDSA signer/verifier facade.
 **************************************************************************************************/

#![warn(missing_docs)]

//! # RS_COSE
//!
//! The `rs_cose` crate models COSE objects
//! ([RFC 9052](https://datatracker.ietf.org/doc/rfc9052/)) on top of the `rs_cbor` value tree:
//! the signed envelopes `COSE_Sign1` and `COSE_Sign`, the MAC'd and encrypted envelopes (as
//! validated structures), protected/unprotected headers, `Sig_structure` assembly, and COSE
//! keys with a JWK bridge. Signing and verification dispatch ECDSA over P-256/P-384/P-521 and
//! Ed25519 ([RFC 9053](https://datatracker.ietf.org/doc/rfc9053/)) to an exchangeable
//! signature provider.
//!
//! ## Signing and verifying
//!
//! ```
//! use rs_cose::constants::{Algorithm, Curve, HP_ALG};
//! use rs_cose::error::COSEError;
//! use rs_cose::header::{Header, Label, ProtectedHeader};
//! use rs_cose::key::{CoseKey, Ec2Y};
//! use rs_cose::sign::{Signer, Verifier};
//! use rs_cbor::types::CBOR;
//!
//! fn main() -> Result<(), COSEError> {
//!     // A throwaway P-256 key pair
//!     let secret = p256::ecdsa::SigningKey::from_slice(&[7u8; 32])
//!         .map_err(|e| COSEError::KeyMaterial(e.to_string()))?;
//!     let point = p256::ecdsa::VerifyingKey::from(&secret).to_encoded_point(false);
//!
//!     let private = CoseKey::ec2(
//!         Curve::P256,
//!         point.x().unwrap().as_slice().to_vec(),
//!         Ec2Y::Coordinate(point.y().unwrap().as_slice().to_vec()),
//!         Some(secret.to_bytes().as_slice().to_vec()),
//!     )?;
//!     let public = CoseKey::ec2(
//!         Curve::P256,
//!         point.x().unwrap().as_slice().to_vec(),
//!         Ec2Y::Coordinate(point.y().unwrap().as_slice().to_vec()),
//!         None,
//!     )?;
//!
//!     let protected = ProtectedHeader::from_header(Header::protected(vec![(
//!         Label::Int(HP_ALG),
//!         CBOR::from(Algorithm::ES256.id()),
//!     )])?)?;
//!
//!     let message = Signer::new(private).sign1(
//!         protected,
//!         Header::empty(),
//!         b"This is the content.",
//!         b"",
//!     )?;
//!     assert!(Verifier::new(public).verify_sign1(&message, b"")?);
//!     Ok(())
//! }
//! ```

/// IANA identifiers: header labels, key labels, algorithms, curves and message tags.
pub mod constants;
/// Error definitions for the COSE layer.
pub mod error;
/// Protected/unprotected header validation and the label type.
pub mod header;
/// The COSE key <-> JWK bridge.
pub mod jwk;
/// COSE key records and typed EC2/OKP views.
pub mod key;
/// The COSE message model.
pub mod message;
/// COSE tag registrations for the CBOR decoder.
pub mod registry;
/// ECDSA/EdDSA signing and verification.
pub mod sign;
/// Sig_structure assembly.
pub mod sig_structure;
/// x5chain certificate decoding.
pub mod x5chain;
