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
 * rs_cose Error API
 *
 * Error definitions for the COSE layer. Structural errors cover the shape of messages, headers
 * and keys; crypto errors cover misconfiguration of the signing machinery. An *invalid*
 * signature is never an error: verification reports it as a boolean result.
 **************************************************************************************************/
use std::result;

use thiserror::Error;

use crate::header::Label;

/// An alias for Result<T, COSEError> used throughout this crate.
pub type Result<T> = result::Result<T, COSEError>;

/// `COSEError` provides information about errors building, validating or signing COSE objects.
#[derive(Clone, Error, Debug, PartialEq, Eq)]
pub enum COSEError {
    /// The underlying CBOR failed to decode or encode.
    #[error(transparent)]
    Cbor(#[from] rs_cbor::error::CBORError),
    /// A message, header or key does not have the required shape. Names the offending
    /// construct and the rule it breaks.
    #[error("{0}: {1}")]
    Structural(&'static str, &'static str),
    /// A header label appears twice, within one header or across the protected/unprotected
    /// pair.
    #[error("duplicate header label {0}")]
    DuplicateLabel(Label),
    /// The algorithm identifier is not one this crate dispatches on.
    #[error("unsupported algorithm {0}")]
    UnsupportedAlgorithm(String),
    /// Neither the protected nor the unprotected header carries an algorithm identifier.
    #[error("no algorithm identifier in the headers")]
    MissingAlgorithm,
    /// The key getter returned no key, or no key was configured.
    #[error("no key available for the requested operation")]
    MissingKey,
    /// The key material does not fit the requested operation: wrong key type, wrong curve,
    /// missing parameter or malformed coordinates.
    #[error("unsuitable key material: {0}")]
    KeyMaterial(String),
    /// The external crypto provider failed.
    #[error("crypto provider failure: {0}")]
    Provider(String),
    /// An x5chain element is not a DER-encoded certificate.
    #[error("x5chain certificate error: {0}")]
    Certificate(String),
    /// A JWK document cannot be mapped to or from a COSE key.
    #[error("JWK mapping error: {0}")]
    Jwk(String),
}
