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
 * Sig_structure assembly (RFC 9052 s4.4)
 *
 * The canonical ToBeSigned layout. Its bytes depend deterministically on (context,
 * body_protected bytes, sign_protected bytes, external_aad, payload) in exactly that order;
 * the protected-header inputs are the serialised byte strings stored on the message, never a
 * re-encoding of their maps.
 **************************************************************************************************/
use rs_cbor::types::CBOR;

use crate::constants::{CONTEXT_SIGNATURE, CONTEXT_SIGNATURE1};
use crate::error::{COSEError, Result};

/// The context string selecting the four- or five-element layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SigContext {
    /// `"Signature"`: a `COSE_Sign` per-signer structure with a sign_protected slot.
    Signature,
    /// `"Signature1"`: the `COSE_Sign1` structure.
    Signature1,
}

impl SigContext {
    /// The context text placed first in the array.
    pub fn as_str(self) -> &'static str {
        match self {
            SigContext::Signature => CONTEXT_SIGNATURE,
            SigContext::Signature1 => CONTEXT_SIGNATURE1,
        }
    }
}

/// A fully-assembled `Sig_structure`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SigStructure {
    context: SigContext,
    body_protected: Vec<u8>,
    sign_protected: Option<Vec<u8>>,
    external_aad: Vec<u8>,
    payload: Vec<u8>,
}

impl SigStructure {
    /// Start building; `context` and `payload` are the required inputs.
    pub fn builder(context: SigContext) -> SigStructureBuilder {
        SigStructureBuilder {
            context,
            body_protected: Vec::new(),
            sign_protected: None,
            external_aad: Vec::new(),
            payload: None,
        }
    }

    /// The array form: `[context, body_protected, sign_protected?, external_aad, payload]`.
    pub fn to_cbor(&self) -> CBOR {
        let mut items = vec![
            CBOR::text(self.context.as_str()),
            CBOR::bytes(self.body_protected.clone()).with_comment("body_protected"),
        ];
        if let Some(sign_protected) = &self.sign_protected {
            items.push(CBOR::bytes(sign_protected.clone()).with_comment("sign_protected"));
        }
        items.push(CBOR::bytes(self.external_aad.clone()).with_comment("external_aad"));
        items.push(CBOR::bytes(self.payload.clone()).with_comment("payload"));
        CBOR::array(items)
    }

    /// The deterministic encoding handed to the signature algorithm.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(self.to_cbor().to_bytes()?)
    }
}

/// Builder validating the slot rules: a payload must be supplied, and sign_protected exists
/// only in the `"Signature"` layout.
#[derive(Debug)]
pub struct SigStructureBuilder {
    context: SigContext,
    body_protected: Vec<u8>,
    sign_protected: Option<Vec<u8>>,
    external_aad: Vec<u8>,
    payload: Option<Vec<u8>>,
}

impl SigStructureBuilder {
    /// The serialised body protected header (zero-length bytes if the header is empty).
    pub fn body_protected(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.body_protected = bytes.into();
        self
    }

    /// The serialised protected header of the `COSE_Signature` being signed or verified.
    pub fn sign_protected(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.sign_protected = Some(bytes.into());
        self
    }

    /// Caller-supplied externally-authenticated data; an empty byte string if omitted.
    pub fn external_aad(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.external_aad = bytes.into();
        self
    }

    /// The payload being signed, with any carrying tag already unwrapped.
    pub fn payload(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.payload = Some(bytes.into());
        self
    }

    /// Validate and assemble.
    pub fn build(self) -> Result<SigStructure> {
        let payload = self.payload.ok_or(COSEError::Structural(
            "Sig_structure",
            "a payload must be supplied",
        ))?;
        let sign_protected = match (self.context, self.sign_protected) {
            (SigContext::Signature1, Some(_)) => {
                return Err(COSEError::Structural(
                    "Sig_structure",
                    "sign_protected is not permitted with the Signature1 context",
                ))
            }
            (SigContext::Signature1, None) => None,
            // The five-element layout always carries the slot; absent means empty
            (SigContext::Signature, maybe) => Some(maybe.unwrap_or_default()),
        };
        Ok(SigStructure {
            context: self.context,
            body_protected: self.body_protected,
            sign_protected,
            external_aad: self.external_aad,
            payload,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature1_layout_has_four_elements() {
        let tbs = SigStructure::builder(SigContext::Signature1)
            .payload(b"Hello".to_vec())
            .build()
            .unwrap();
        // 84 text("Signature1") bstr(0) bstr(0) bstr(5)
        let mut expected = vec![0x84, 0x6a];
        expected.extend_from_slice(b"Signature1");
        expected.extend_from_slice(&[0x40, 0x40, 0x45]);
        expected.extend_from_slice(b"Hello");
        assert_eq!(tbs.to_bytes().unwrap(), expected);
    }

    #[test]
    fn signature_layout_has_five_elements() {
        let tbs = SigStructure::builder(SigContext::Signature)
            .body_protected(vec![0xa1, 0x01, 0x26])
            .payload(Vec::new())
            .build()
            .unwrap();
        let bytes = tbs.to_bytes().unwrap();
        assert_eq!(bytes[0], 0x85);
    }

    #[test]
    fn sign_protected_is_rejected_under_signature1() {
        let result = SigStructure::builder(SigContext::Signature1)
            .sign_protected(vec![0xa0])
            .payload(Vec::new())
            .build();
        assert!(matches!(result, Err(COSEError::Structural("Sig_structure", _))));
    }

    #[test]
    fn a_payload_is_required() {
        let result = SigStructure::builder(SigContext::Signature1).build();
        assert!(matches!(result, Err(COSEError::Structural("Sig_structure", _))));
    }

    #[test]
    fn identical_inputs_yield_identical_bytes() {
        let build = || {
            SigStructure::builder(SigContext::Signature)
                .body_protected(vec![0xa1, 0x01, 0x26])
                .sign_protected(vec![0xa1, 0x01, 0x26])
                .external_aad(vec![0xde, 0xad])
                .payload(b"payload".to_vec())
                .build()
                .unwrap()
                .to_bytes()
                .unwrap()
        };
        assert_eq!(build(), build());
    }
}
