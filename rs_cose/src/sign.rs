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
 * Signer / Verifier facade
 *
 * Maps algorithm identifiers onto the external signature provider and resolves keys either from
 * a fixed key or through a caller-supplied getter. An invalid signature is a boolean false;
 * missing keys, unsupported algorithms and bad key material are errors.
 **************************************************************************************************/
use std::sync::Arc;

use ed25519_dalek::Verifier as _;
use tracing::debug;

use crate::constants::Algorithm;
use crate::constants::Curve;
use crate::error::{COSEError, Result};
use crate::header::{Header, ProtectedHeader};
use crate::key::{CoseKey, TypedKey};
use crate::message::{CoseHeaders, CoseSign, CoseSign1, CoseSignature};
use crate::sig_structure::{SigContext, SigStructure};

/// The operation a key is being resolved for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyOp {
    /// Producing a signature.
    Sign,
    /// Checking a signature.
    Verify,
}

/// Key resolution callback: `(operation, algorithm, key id)` to a key; `None` means no
/// suitable key, which the facade reports as an error.
pub type KeyGetter =
    dyn Fn(KeyOp, Option<Algorithm>, Option<&[u8]>) -> Option<CoseKey> + Send + Sync;

/// The narrow interface to the signature primitives: raw sign/verify on bytes, given an
/// algorithm identifier and a key.
pub trait SignatureProvider: Send + Sync {
    /// Sign `data`, returning the signature in the algorithm's raw layout.
    fn sign(&self, alg: Algorithm, key: &CoseKey, data: &[u8]) -> Result<Vec<u8>>;

    /// Check `signature` over `data`. Invalidity is `Ok(false)`; only misconfiguration is an
    /// error.
    fn verify(&self, alg: Algorithm, key: &CoseKey, data: &[u8], signature: &[u8])
        -> Result<bool>;
}

/// The default provider: deterministic ECDSA (RFC 6979) over the NIST curves in raw `R || S`
/// layout, and Ed25519 for EdDSA.
#[derive(Clone, Copy, Debug, Default)]
pub struct RustCryptoProvider;

impl SignatureProvider for RustCryptoProvider {
    fn sign(&self, alg: Algorithm, key: &CoseKey, data: &[u8]) -> Result<Vec<u8>> {
        match alg {
            Algorithm::ES256 => {
                let scalar = ec2_private(key, Curve::P256)?;
                let signing = p256::ecdsa::SigningKey::from_slice(&scalar)
                    .map_err(|e| COSEError::KeyMaterial(e.to_string()))?;
                let signature: p256::ecdsa::Signature =
                    p256::ecdsa::signature::Signer::sign(&signing, data);
                Ok(signature.to_bytes().as_slice().to_vec())
            }
            Algorithm::ES384 => {
                let scalar = ec2_private(key, Curve::P384)?;
                let signing = p384::ecdsa::SigningKey::from_slice(&scalar)
                    .map_err(|e| COSEError::KeyMaterial(e.to_string()))?;
                let signature: p384::ecdsa::Signature =
                    p384::ecdsa::signature::Signer::sign(&signing, data);
                Ok(signature.to_bytes().as_slice().to_vec())
            }
            Algorithm::ES512 => {
                let scalar = ec2_private(key, Curve::P521)?;
                let signing = p521::ecdsa::SigningKey::from_slice(&scalar)
                    .map_err(|e| COSEError::KeyMaterial(e.to_string()))?;
                let signature: p521::ecdsa::Signature =
                    p521::ecdsa::signature::Signer::sign(&signing, data);
                Ok(signature.to_bytes().as_slice().to_vec())
            }
            Algorithm::EdDSA => {
                let secret = okp_private(key, Curve::Ed25519)?;
                let signing = ed25519_dalek::SigningKey::from_bytes(&secret);
                let signature = ed25519_dalek::Signer::sign(&signing, data);
                Ok(signature.to_bytes().to_vec())
            }
        }
    }

    fn verify(
        &self,
        alg: Algorithm,
        key: &CoseKey,
        data: &[u8],
        signature: &[u8],
    ) -> Result<bool> {
        match alg {
            Algorithm::ES256 => {
                let sec1 = ec2_public(key, Curve::P256)?;
                let verifying = p256::ecdsa::VerifyingKey::from_sec1_bytes(&sec1)
                    .map_err(|e| COSEError::KeyMaterial(e.to_string()))?;
                let signature = match p256::ecdsa::Signature::from_slice(signature) {
                    Ok(signature) => signature,
                    Err(_) => return Ok(false),
                };
                Ok(p256::ecdsa::signature::Verifier::verify(&verifying, data, &signature).is_ok())
            }
            Algorithm::ES384 => {
                let sec1 = ec2_public(key, Curve::P384)?;
                let verifying = p384::ecdsa::VerifyingKey::from_sec1_bytes(&sec1)
                    .map_err(|e| COSEError::KeyMaterial(e.to_string()))?;
                let signature = match p384::ecdsa::Signature::from_slice(signature) {
                    Ok(signature) => signature,
                    Err(_) => return Ok(false),
                };
                Ok(p384::ecdsa::signature::Verifier::verify(&verifying, data, &signature).is_ok())
            }
            Algorithm::ES512 => {
                let sec1 = ec2_public(key, Curve::P521)?;
                let verifying = p521::ecdsa::VerifyingKey::from_sec1_bytes(&sec1)
                    .map_err(|e| COSEError::KeyMaterial(e.to_string()))?;
                let signature = match p521::ecdsa::Signature::from_slice(signature) {
                    Ok(signature) => signature,
                    Err(_) => return Ok(false),
                };
                Ok(p521::ecdsa::signature::Verifier::verify(&verifying, data, &signature).is_ok())
            }
            Algorithm::EdDSA => {
                let public = okp_public(key, Curve::Ed25519)?;
                let verifying = ed25519_dalek::VerifyingKey::from_bytes(&public)
                    .map_err(|e| COSEError::KeyMaterial(e.to_string()))?;
                let signature = match ed25519_dalek::Signature::from_slice(signature) {
                    Ok(signature) => signature,
                    Err(_) => return Ok(false),
                };
                Ok(verifying.verify(data, &signature).is_ok())
            }
        }
    }
}

/// The EC2 private scalar for `expected` curve, fixed-width.
fn ec2_private(key: &CoseKey, expected: Curve) -> Result<Vec<u8>> {
    match key.typed()? {
        TypedKey::Ec2(ec2) if ec2.curve() == expected => ec2.private_scalar(),
        TypedKey::Ec2(ec2) => Err(COSEError::KeyMaterial(format!(
            "algorithm requires curve {}, key is on {}",
            expected,
            ec2.curve()
        ))),
        _ => Err(COSEError::KeyMaterial(
            "algorithm requires an EC2 key".into(),
        )),
    }
}

/// The SEC1 public encoding for `expected` curve; compressed points decompress in the curve
/// implementation.
fn ec2_public(key: &CoseKey, expected: Curve) -> Result<Vec<u8>> {
    match key.typed()? {
        TypedKey::Ec2(ec2) if ec2.curve() == expected => ec2.sec1_public_key(),
        TypedKey::Ec2(ec2) => Err(COSEError::KeyMaterial(format!(
            "algorithm requires curve {}, key is on {}",
            expected,
            ec2.curve()
        ))),
        _ => Err(COSEError::KeyMaterial(
            "algorithm requires an EC2 key".into(),
        )),
    }
}

fn okp_private(key: &CoseKey, expected: Curve) -> Result<[u8; 32]> {
    match key.typed()? {
        TypedKey::Okp(okp) if okp.curve() == expected => {
            okp.private_key()?.try_into().map_err(|_| {
                COSEError::KeyMaterial("Ed25519 private keys are 32 bytes".into())
            })
        }
        TypedKey::Okp(okp) => Err(COSEError::KeyMaterial(format!(
            "algorithm requires curve {}, key is on {}",
            expected,
            okp.curve()
        ))),
        _ => Err(COSEError::KeyMaterial(
            "algorithm requires an OKP key".into(),
        )),
    }
}

fn okp_public(key: &CoseKey, expected: Curve) -> Result<[u8; 32]> {
    match key.typed()? {
        TypedKey::Okp(okp) if okp.curve() == expected => {
            okp.public_key()?.try_into().map_err(|_| {
                COSEError::KeyMaterial("Ed25519 public keys are 32 bytes".into())
            })
        }
        TypedKey::Okp(okp) => Err(COSEError::KeyMaterial(format!(
            "algorithm requires curve {}, key is on {}",
            expected,
            okp.curve()
        ))),
        _ => Err(COSEError::KeyMaterial(
            "algorithm requires an OKP key".into(),
        )),
    }
}

/***************************************************************************************************
 * Key resolution
 **************************************************************************************************/

#[derive(Clone)]
enum KeySource {
    Fixed(CoseKey),
    Getter(Arc<KeyGetter>),
}

impl KeySource {
    fn resolve(
        &self,
        op: KeyOp,
        alg: Option<Algorithm>,
        kid: Option<&[u8]>,
    ) -> Result<CoseKey> {
        match self {
            KeySource::Fixed(key) => Ok(key.clone()),
            KeySource::Getter(getter) => getter(op, alg, kid).ok_or(COSEError::MissingKey),
        }
    }
}

/***************************************************************************************************
 * Signer
 **************************************************************************************************/

/// Produces `COSE_Sign1` messages and `COSE_Signature` entries.
#[derive(Clone)]
pub struct Signer {
    source: KeySource,
    provider: Arc<dyn SignatureProvider>,
}

impl Signer {
    /// A signer over a fixed key, using the default provider.
    pub fn new(key: CoseKey) -> Signer {
        Signer {
            source: KeySource::Fixed(key),
            provider: Arc::new(RustCryptoProvider),
        }
    }

    /// A signer resolving keys through a getter, using the default provider.
    pub fn with_getter(getter: Arc<KeyGetter>) -> Signer {
        Signer {
            source: KeySource::Getter(getter),
            provider: Arc::new(RustCryptoProvider),
        }
    }

    /// Replace the signature provider.
    pub fn with_provider(mut self, provider: Arc<dyn SignatureProvider>) -> Signer {
        self.provider = provider;
        self
    }

    /// Sign `payload` into a `COSE_Sign1` message. The algorithm is discovered from the
    /// headers (protected first), the key through the configured source.
    pub fn sign1(
        &self,
        protected: ProtectedHeader,
        unprotected: Header,
        payload: &[u8],
        external_aad: &[u8],
    ) -> Result<CoseSign1> {
        let headers = CoseHeaders::new(protected, unprotected)?;
        let alg = headers.algorithm()?;
        let key = self
            .source
            .resolve(KeyOp::Sign, Some(alg), headers.kid())?;
        let to_be_signed = SigStructure::builder(SigContext::Signature1)
            .body_protected(headers.protected().as_bytes().to_vec())
            .external_aad(external_aad.to_vec())
            .payload(payload.to_vec())
            .build()?
            .to_bytes()?;
        debug!(alg = %alg, bytes = to_be_signed.len(), "signing Signature1 structure");
        let signature = self.provider.sign(alg, &key, &to_be_signed)?;
        Ok(CoseSign1::new(headers, Some(payload.to_vec()), signature))
    }

    /// Sign one `COSE_Signature` entry for a `COSE_Sign` message whose body protected header
    /// is `body_protected`.
    pub fn sign_entry(
        &self,
        body_protected: &ProtectedHeader,
        sign_protected: ProtectedHeader,
        sign_unprotected: Header,
        payload: &[u8],
        external_aad: &[u8],
    ) -> Result<CoseSignature> {
        let headers = CoseHeaders::new(sign_protected, sign_unprotected)?;
        let alg = headers.algorithm()?;
        let key = self
            .source
            .resolve(KeyOp::Sign, Some(alg), headers.kid())?;
        let to_be_signed = SigStructure::builder(SigContext::Signature)
            .body_protected(body_protected.as_bytes().to_vec())
            .sign_protected(headers.protected().as_bytes().to_vec())
            .external_aad(external_aad.to_vec())
            .payload(payload.to_vec())
            .build()?
            .to_bytes()?;
        debug!(alg = %alg, bytes = to_be_signed.len(), "signing Signature structure");
        let signature = self.provider.sign(alg, &key, &to_be_signed)?;
        Ok(CoseSignature::new(headers, signature))
    }
}

/***************************************************************************************************
 * Verifier
 **************************************************************************************************/

/// Checks `COSE_Sign1` and `COSE_Sign` messages.
#[derive(Clone)]
pub struct Verifier {
    source: KeySource,
    provider: Arc<dyn SignatureProvider>,
}

impl Verifier {
    /// A verifier over a fixed key, using the default provider.
    pub fn new(key: CoseKey) -> Verifier {
        Verifier {
            source: KeySource::Fixed(key),
            provider: Arc::new(RustCryptoProvider),
        }
    }

    /// A verifier resolving keys through a getter, using the default provider.
    pub fn with_getter(getter: Arc<KeyGetter>) -> Verifier {
        Verifier {
            source: KeySource::Getter(getter),
            provider: Arc::new(RustCryptoProvider),
        }
    }

    /// Replace the signature provider.
    pub fn with_provider(mut self, provider: Arc<dyn SignatureProvider>) -> Verifier {
        self.provider = provider;
        self
    }

    /// Check the single signature of a `COSE_Sign1` message.
    pub fn verify_sign1(&self, message: &CoseSign1, external_aad: &[u8]) -> Result<bool> {
        let payload = message.payload().ok_or(COSEError::Structural(
            "COSE_Sign1",
            "a detached payload cannot be verified without its content",
        ))?;
        let headers = message.headers();
        let alg = headers.algorithm()?;
        let key = self
            .source
            .resolve(KeyOp::Verify, Some(alg), headers.kid())?;
        let to_be_verified = SigStructure::builder(SigContext::Signature1)
            .body_protected(headers.protected().as_bytes().to_vec())
            .external_aad(external_aad.to_vec())
            .payload(payload.to_vec())
            .build()?
            .to_bytes()?;
        let valid = self
            .provider
            .verify(alg, &key, &to_be_verified, message.signature())?;
        debug!(alg = %alg, valid, "verified Signature1 structure");
        Ok(valid)
    }

    /// Check a `COSE_Sign` message: true iff any embedded `COSE_Signature` verifies under its
    /// own headers.
    pub fn verify_sign(&self, message: &CoseSign, external_aad: &[u8]) -> Result<bool> {
        let payload = message.payload().ok_or(COSEError::Structural(
            "COSE_Sign",
            "a detached payload cannot be verified without its content",
        ))?;
        for entry in message.signatures() {
            let headers = entry.headers();
            let alg = headers.algorithm()?;
            let key = self
                .source
                .resolve(KeyOp::Verify, Some(alg), headers.kid())?;
            let to_be_verified = SigStructure::builder(SigContext::Signature)
                .body_protected(message.headers().protected().as_bytes().to_vec())
                .sign_protected(headers.protected().as_bytes().to_vec())
                .external_aad(external_aad.to_vec())
                .payload(payload.to_vec())
                .build()?
                .to_bytes()?;
            if self
                .provider
                .verify(alg, &key, &to_be_verified, entry.signature())?
            {
                debug!(alg = %alg, "a COSE_Sign signature verified");
                return Ok(true);
            }
        }
        debug!("no COSE_Sign signature verified");
        Ok(false)
    }
}
