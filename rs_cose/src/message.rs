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
 * COSE message model
 *
 * Typed records for the COSE envelope variants (RFC 9052): positional arrays whose first two
 * elements are always the protected-header byte string and the unprotected-header map. Content
 * slots accept a byte string, null, or a tag-wrapped byte string; the wrapper is stripped for
 * payload access but preserved on re-encode, which admits ISO mdoc payloads carried under
 * tag 24.
 **************************************************************************************************/
use rs_cbor::types::{Value, CBOR};

use crate::constants::*;
use crate::error::{COSEError, Result};
use crate::header::{check_cross_duplicates, Header, ProtectedHeader};

/// The protected/unprotected header pair every message and every signature carries.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CoseHeaders {
    protected: ProtectedHeader,
    unprotected: Header,
}

impl CoseHeaders {
    /// Pair a protected and an unprotected header, enforcing the cross-header duplicate rule.
    pub fn new(protected: ProtectedHeader, unprotected: Header) -> Result<CoseHeaders> {
        check_cross_duplicates(protected.header(), &unprotected)?;
        Ok(CoseHeaders {
            protected,
            unprotected,
        })
    }

    /// Build the pair from the first two elements of a message array.
    pub(crate) fn from_items(protected: &CBOR, unprotected: &CBOR) -> Result<CoseHeaders> {
        let protected = match protected.value() {
            Value::Bstr(bytes) => ProtectedHeader::from_bytes(bytes.as_slice().to_vec())?,
            _ => {
                return Err(COSEError::Structural(
                    "protected header",
                    "must be a byte string",
                ))
            }
        };
        let unprotected = Header::from_map_item(unprotected, false)?;
        CoseHeaders::new(protected, unprotected)
    }

    /// The protected header.
    pub fn protected(&self) -> &ProtectedHeader {
        &self.protected
    }

    /// The unprotected header.
    pub fn unprotected(&self) -> &Header {
        &self.unprotected
    }

    /// The algorithm parameter, read from the protected header first, then the unprotected.
    pub fn alg(&self) -> Option<&CBOR> {
        self.protected
            .header()
            .alg()
            .or_else(|| self.unprotected.alg())
    }

    /// The key identifier, read from the protected header first, then the unprotected.
    pub fn kid(&self) -> Option<&[u8]> {
        self.protected
            .header()
            .kid()
            .or_else(|| self.unprotected.kid())
    }

    /// Resolve the algorithm parameter to one of the supported identifiers, translating text
    /// names through the registered name table.
    pub fn algorithm(&self) -> Result<Algorithm> {
        let alg = self.alg().ok_or(COSEError::MissingAlgorithm)?;
        match alg.value() {
            Value::Int(id) => {
                Algorithm::from_id(*id as i64).ok_or(COSEError::UnsupportedAlgorithm(id.to_string()))
            }
            Value::Long(id) => {
                Algorithm::from_id(*id).ok_or(COSEError::UnsupportedAlgorithm(id.to_string()))
            }
            Value::Tstr(name) => {
                Algorithm::from_name(name).ok_or(COSEError::UnsupportedAlgorithm(name.clone()))
            }
            _ => Err(COSEError::Structural(
                "alg",
                "must be an integer or a text string",
            )),
        }
    }

    fn to_items(&self) -> (CBOR, CBOR) {
        (
            self.protected.to_cbor().with_comment("protected"),
            self.unprotected.to_cbor().with_comment("unprotected"),
        )
    }
}

/***************************************************************************************************
 * Slot validators shared by the message constructors
 **************************************************************************************************/

/// Strip the tag from `item` if it carries one and check that the outer is an array of the
/// expected arity; with `min` set, `len` is a lower bound instead of an exact count.
fn message_array<'a>(
    item: &'a CBOR,
    tag: Option<u64>,
    len: usize,
    min: bool,
    what: &'static str,
) -> Result<&'a [CBOR]> {
    let inner = match (item.as_tagged(), tag) {
        (Some((found, inner)), Some(expected)) => {
            if found != expected {
                return Err(COSEError::Structural(what, "carries the wrong tag number"));
            }
            inner
        }
        (Some(_), None) => return Err(COSEError::Structural(what, "must not be tagged")),
        (None, _) => item,
    };
    let items = inner
        .as_array()
        .ok_or(COSEError::Structural(what, "must be an array"))?;
    let arity_ok = if min { items.len() >= len } else { items.len() == len };
    if !arity_ok {
        return Err(COSEError::Structural(what, "has the wrong number of elements"));
    }
    Ok(items)
}

/// The content slot holds a byte string or, when `nullable`, null. Tag wrappers are stripped
/// until a terminal item is reached and preserved in the stored form.
fn content_slot(item: &CBOR, nullable: bool, what: &'static str) -> Result<CBOR> {
    match item.untagged().value() {
        Value::Bstr(_) => Ok(item.clone()),
        Value::Null if nullable => Ok(item.clone()),
        _ if nullable => Err(COSEError::Structural(what, "must be a byte string or null")),
        _ => Err(COSEError::Structural(what, "must be a byte string")),
    }
}

fn bstr_slot(item: &CBOR, what: &'static str) -> Result<Vec<u8>> {
    item.as_bytes()
        .map(<[u8]>::to_vec)
        .ok_or(COSEError::Structural(what, "must be a byte string"))
}

fn recipients_slot(item: &CBOR, what: &'static str) -> Result<Vec<CoseRecipient>> {
    let items = item
        .as_array()
        .ok_or(COSEError::Structural(what, "must be an array"))?;
    if items.is_empty() {
        return Err(COSEError::Structural(what, "must not be empty"));
    }
    items.iter().map(CoseRecipient::from_cbor).collect()
}

/// The bytes of a content slot, with any tag wrapper stripped; `None` when the slot is null.
fn content_bytes(item: &CBOR) -> Option<&[u8]> {
    item.untagged().as_bytes()
}

fn content_item(payload: Option<Vec<u8>>) -> CBOR {
    match payload {
        Some(bytes) => CBOR::bytes(bytes),
        None => CBOR::null(),
    }
}

/***************************************************************************************************
 * COSE_Sign1
 **************************************************************************************************/

/// A single-signer signed envelope: `[protected, unprotected, payload, signature]`, tag 18.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoseSign1 {
    headers: CoseHeaders,
    payload: CBOR,
    signature: Vec<u8>,
}

impl CoseSign1 {
    /// The CBOR tag assigned to this message type.
    pub const TAG: u64 = TAG_COSE_SIGN1;

    /// Assemble a message from its parts.
    pub fn new(headers: CoseHeaders, payload: Option<Vec<u8>>, signature: Vec<u8>) -> CoseSign1 {
        CoseSign1 {
            headers,
            payload: content_item(payload),
            signature,
        }
    }

    /// Build from a decoded item: the bare array or its tag 18 form.
    pub fn from_cbor(item: &CBOR) -> Result<CoseSign1> {
        let items = message_array(item, Some(Self::TAG), 4, false, "COSE_Sign1")?;
        let headers = CoseHeaders::from_items(&items[0], &items[1])?;
        let payload = content_slot(&items[2], true, "COSE_Sign1 payload")?;
        let signature = bstr_slot(&items[3], "COSE_Sign1 signature")?;
        Ok(CoseSign1 {
            headers,
            payload,
            signature,
        })
    }

    /// Decode from bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<CoseSign1> {
        CoseSign1::from_cbor(&CBOR::from_bytes(bytes)?)
    }

    /// The header pair.
    pub fn headers(&self) -> &CoseHeaders {
        &self.headers
    }

    /// The payload bytes, tag wrappers stripped; `None` for a detached (null) payload.
    pub fn payload(&self) -> Option<&[u8]> {
        content_bytes(&self.payload)
    }

    /// The signature bytes.
    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    /// The untagged array form.
    pub fn to_cbor(&self) -> CBOR {
        let (protected, unprotected) = self.headers.to_items();
        CBOR::array(vec![
            protected,
            unprotected,
            self.payload.clone().with_comment("payload"),
            CBOR::bytes(self.signature.clone()).with_comment("signature"),
        ])
    }

    /// The tag 18 form.
    pub fn tagged(&self) -> CBOR {
        CBOR::tagged(Self::TAG, self.to_cbor())
    }
}

/***************************************************************************************************
 * COSE_Sign
 **************************************************************************************************/

/// One signer's entry in a `COSE_Sign` message: `[protected, unprotected, signature]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoseSignature {
    headers: CoseHeaders,
    signature: Vec<u8>,
}

impl CoseSignature {
    /// Assemble a signature entry from its parts.
    pub fn new(headers: CoseHeaders, signature: Vec<u8>) -> CoseSignature {
        CoseSignature { headers, signature }
    }

    /// Build from a decoded item; a `COSE_Signature` is never tagged.
    pub fn from_cbor(item: &CBOR) -> Result<CoseSignature> {
        let items = message_array(item, None, 3, false, "COSE_Signature")?;
        let headers = CoseHeaders::from_items(&items[0], &items[1])?;
        let signature = bstr_slot(&items[2], "COSE_Signature signature")?;
        Ok(CoseSignature { headers, signature })
    }

    /// The header pair.
    pub fn headers(&self) -> &CoseHeaders {
        &self.headers
    }

    /// The signature bytes.
    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    /// The array form.
    pub fn to_cbor(&self) -> CBOR {
        let (protected, unprotected) = self.headers.to_items();
        CBOR::array(vec![
            protected,
            unprotected,
            CBOR::bytes(self.signature.clone()).with_comment("signature"),
        ])
    }
}

/// A multi-signer signed envelope: `[protected, unprotected, payload, signatures]`, tag 98.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoseSign {
    headers: CoseHeaders,
    payload: CBOR,
    signatures: Vec<CoseSignature>,
}

impl CoseSign {
    /// The CBOR tag assigned to this message type.
    pub const TAG: u64 = TAG_COSE_SIGN;

    /// Assemble a message from its parts; at least one signature is required.
    pub fn new(
        headers: CoseHeaders,
        payload: Option<Vec<u8>>,
        signatures: Vec<CoseSignature>,
    ) -> Result<CoseSign> {
        if signatures.is_empty() {
            return Err(COSEError::Structural(
                "COSE_Sign signatures",
                "must not be empty",
            ));
        }
        Ok(CoseSign {
            headers,
            payload: content_item(payload),
            signatures,
        })
    }

    /// Build from a decoded item: the bare array or its tag 98 form.
    pub fn from_cbor(item: &CBOR) -> Result<CoseSign> {
        let items = message_array(item, Some(Self::TAG), 4, false, "COSE_Sign")?;
        let headers = CoseHeaders::from_items(&items[0], &items[1])?;
        let payload = content_slot(&items[2], true, "COSE_Sign payload")?;
        let entries = items[3]
            .as_array()
            .ok_or(COSEError::Structural("COSE_Sign signatures", "must be an array"))?;
        if entries.is_empty() {
            return Err(COSEError::Structural(
                "COSE_Sign signatures",
                "must not be empty",
            ));
        }
        let signatures = entries
            .iter()
            .map(CoseSignature::from_cbor)
            .collect::<Result<Vec<_>>>()?;
        Ok(CoseSign {
            headers,
            payload,
            signatures,
        })
    }

    /// Decode from bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<CoseSign> {
        CoseSign::from_cbor(&CBOR::from_bytes(bytes)?)
    }

    /// The body header pair.
    pub fn headers(&self) -> &CoseHeaders {
        &self.headers
    }

    /// The payload bytes, tag wrappers stripped; `None` for a detached payload.
    pub fn payload(&self) -> Option<&[u8]> {
        content_bytes(&self.payload)
    }

    /// The per-signer entries.
    pub fn signatures(&self) -> &[CoseSignature] {
        &self.signatures
    }

    /// The untagged array form.
    pub fn to_cbor(&self) -> CBOR {
        let (protected, unprotected) = self.headers.to_items();
        CBOR::array(vec![
            protected,
            unprotected,
            self.payload.clone().with_comment("payload"),
            CBOR::array(self.signatures.iter().map(CoseSignature::to_cbor).collect()),
        ])
    }

    /// The tag 98 form.
    pub fn tagged(&self) -> CBOR {
        CBOR::tagged(Self::TAG, self.to_cbor())
    }
}

/***************************************************************************************************
 * COSE_Mac and COSE_Mac0
 **************************************************************************************************/

/// A MAC'd envelope with recipients: `[protected, unprotected, payload, tag, recipients]`,
/// tag 97. The structure is modelled and validated; MAC computation is out of scope.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoseMac {
    headers: CoseHeaders,
    payload: CBOR,
    tag: Vec<u8>,
    recipients: Vec<CoseRecipient>,
}

impl CoseMac {
    /// The CBOR tag assigned to this message type.
    pub const TAG: u64 = TAG_COSE_MAC;

    /// Build from a decoded item: the bare array or its tag 97 form.
    pub fn from_cbor(item: &CBOR) -> Result<CoseMac> {
        let items = message_array(item, Some(Self::TAG), 5, false, "COSE_Mac")?;
        let headers = CoseHeaders::from_items(&items[0], &items[1])?;
        let payload = content_slot(&items[2], true, "COSE_Mac payload")?;
        let tag = bstr_slot(&items[3], "COSE_Mac tag")?;
        let recipients = recipients_slot(&items[4], "COSE_Mac recipients")?;
        Ok(CoseMac {
            headers,
            payload,
            tag,
            recipients,
        })
    }

    /// Decode from bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<CoseMac> {
        CoseMac::from_cbor(&CBOR::from_bytes(bytes)?)
    }

    /// The header pair.
    pub fn headers(&self) -> &CoseHeaders {
        &self.headers
    }

    /// The payload bytes, tag wrappers stripped.
    pub fn payload(&self) -> Option<&[u8]> {
        content_bytes(&self.payload)
    }

    /// The authentication tag bytes.
    pub fn tag(&self) -> &[u8] {
        &self.tag
    }

    /// The recipients; always at least one.
    pub fn recipients(&self) -> &[CoseRecipient] {
        &self.recipients
    }

    /// The untagged array form.
    pub fn to_cbor(&self) -> CBOR {
        let (protected, unprotected) = self.headers.to_items();
        CBOR::array(vec![
            protected,
            unprotected,
            self.payload.clone().with_comment("payload"),
            CBOR::bytes(self.tag.clone()).with_comment("tag"),
            CBOR::array(self.recipients.iter().map(CoseRecipient::to_cbor).collect()),
        ])
    }

    /// The tag 97 form.
    pub fn tagged(&self) -> CBOR {
        CBOR::tagged(Self::TAG, self.to_cbor())
    }
}

/// A MAC'd envelope without recipients: `[protected, unprotected, payload, tag]`, tag 17.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoseMac0 {
    headers: CoseHeaders,
    payload: CBOR,
    tag: Vec<u8>,
}

impl CoseMac0 {
    /// The CBOR tag assigned to this message type.
    pub const TAG: u64 = TAG_COSE_MAC0;

    /// Build from a decoded item: the bare array or its tag 17 form.
    pub fn from_cbor(item: &CBOR) -> Result<CoseMac0> {
        let items = message_array(item, Some(Self::TAG), 4, false, "COSE_Mac0")?;
        let headers = CoseHeaders::from_items(&items[0], &items[1])?;
        let payload = content_slot(&items[2], true, "COSE_Mac0 payload")?;
        let tag = bstr_slot(&items[3], "COSE_Mac0 tag")?;
        Ok(CoseMac0 {
            headers,
            payload,
            tag,
        })
    }

    /// Decode from bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<CoseMac0> {
        CoseMac0::from_cbor(&CBOR::from_bytes(bytes)?)
    }

    /// The header pair.
    pub fn headers(&self) -> &CoseHeaders {
        &self.headers
    }

    /// The payload bytes, tag wrappers stripped.
    pub fn payload(&self) -> Option<&[u8]> {
        content_bytes(&self.payload)
    }

    /// The authentication tag bytes.
    pub fn tag(&self) -> &[u8] {
        &self.tag
    }

    /// The untagged array form.
    pub fn to_cbor(&self) -> CBOR {
        let (protected, unprotected) = self.headers.to_items();
        CBOR::array(vec![
            protected,
            unprotected,
            self.payload.clone().with_comment("payload"),
            CBOR::bytes(self.tag.clone()).with_comment("tag"),
        ])
    }

    /// The tag 17 form.
    pub fn tagged(&self) -> CBOR {
        CBOR::tagged(Self::TAG, self.to_cbor())
    }
}

/***************************************************************************************************
 * COSE_Encrypt, COSE_Encrypt0 and COSE_recipient
 **************************************************************************************************/

/// An encrypted envelope with recipients: `[protected, unprotected, ciphertext, recipients]`,
/// tag 96. The structure is modelled and validated; content decryption is out of scope.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoseEncrypt {
    headers: CoseHeaders,
    ciphertext: CBOR,
    recipients: Vec<CoseRecipient>,
}

impl CoseEncrypt {
    /// The CBOR tag assigned to this message type.
    pub const TAG: u64 = TAG_COSE_ENCRYPT;

    /// Build from a decoded item: the bare array or its tag 96 form.
    pub fn from_cbor(item: &CBOR) -> Result<CoseEncrypt> {
        let items = message_array(item, Some(Self::TAG), 4, false, "COSE_Encrypt")?;
        let headers = CoseHeaders::from_items(&items[0], &items[1])?;
        let ciphertext = content_slot(&items[2], true, "COSE_Encrypt ciphertext")?;
        let recipients = recipients_slot(&items[3], "COSE_Encrypt recipients")?;
        Ok(CoseEncrypt {
            headers,
            ciphertext,
            recipients,
        })
    }

    /// Decode from bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<CoseEncrypt> {
        CoseEncrypt::from_cbor(&CBOR::from_bytes(bytes)?)
    }

    /// The header pair.
    pub fn headers(&self) -> &CoseHeaders {
        &self.headers
    }

    /// The ciphertext bytes, tag wrappers stripped; `None` when carried detached.
    pub fn ciphertext(&self) -> Option<&[u8]> {
        content_bytes(&self.ciphertext)
    }

    /// The recipients; always at least one.
    pub fn recipients(&self) -> &[CoseRecipient] {
        &self.recipients
    }

    /// The untagged array form.
    pub fn to_cbor(&self) -> CBOR {
        let (protected, unprotected) = self.headers.to_items();
        CBOR::array(vec![
            protected,
            unprotected,
            self.ciphertext.clone().with_comment("ciphertext"),
            CBOR::array(self.recipients.iter().map(CoseRecipient::to_cbor).collect()),
        ])
    }

    /// The tag 96 form.
    pub fn tagged(&self) -> CBOR {
        CBOR::tagged(Self::TAG, self.to_cbor())
    }
}

/// An encrypted envelope without recipients: `[protected, unprotected, ciphertext]`, tag 16.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoseEncrypt0 {
    headers: CoseHeaders,
    ciphertext: CBOR,
}

impl CoseEncrypt0 {
    /// The CBOR tag assigned to this message type.
    pub const TAG: u64 = TAG_COSE_ENCRYPT0;

    /// Build from a decoded item: the bare array or its tag 16 form.
    pub fn from_cbor(item: &CBOR) -> Result<CoseEncrypt0> {
        let items = message_array(item, Some(Self::TAG), 3, false, "COSE_Encrypt0")?;
        let headers = CoseHeaders::from_items(&items[0], &items[1])?;
        let ciphertext = content_slot(&items[2], true, "COSE_Encrypt0 ciphertext")?;
        Ok(CoseEncrypt0 {
            headers,
            ciphertext,
        })
    }

    /// Decode from bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<CoseEncrypt0> {
        CoseEncrypt0::from_cbor(&CBOR::from_bytes(bytes)?)
    }

    /// The header pair.
    pub fn headers(&self) -> &CoseHeaders {
        &self.headers
    }

    /// The ciphertext bytes, tag wrappers stripped.
    pub fn ciphertext(&self) -> Option<&[u8]> {
        content_bytes(&self.ciphertext)
    }

    /// The untagged array form.
    pub fn to_cbor(&self) -> CBOR {
        let (protected, unprotected) = self.headers.to_items();
        CBOR::array(vec![
            protected,
            unprotected,
            self.ciphertext.clone().with_comment("ciphertext"),
        ])
    }

    /// The tag 16 form.
    pub fn tagged(&self) -> CBOR {
        CBOR::tagged(Self::TAG, self.to_cbor())
    }
}

/// A key-distribution entry: `[protected, unprotected, ciphertext, recipients?]`. The nested
/// recipients array is optional, and when present must be non-empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoseRecipient {
    headers: CoseHeaders,
    ciphertext: CBOR,
    recipients: Option<Vec<CoseRecipient>>,
}

impl CoseRecipient {
    /// Build from a decoded item; a `COSE_recipient` is never tagged.
    pub fn from_cbor(item: &CBOR) -> Result<CoseRecipient> {
        let items = message_array(item, None, 3, true, "COSE_recipient")?;
        if items.len() > 4 {
            return Err(COSEError::Structural(
                "COSE_recipient",
                "has the wrong number of elements",
            ));
        }
        let headers = CoseHeaders::from_items(&items[0], &items[1])?;
        let ciphertext = content_slot(&items[2], true, "COSE_recipient ciphertext")?;
        let recipients = items
            .get(3)
            .map(|nested| recipients_slot(nested, "COSE_recipient recipients"))
            .transpose()?;
        Ok(CoseRecipient {
            headers,
            ciphertext,
            recipients,
        })
    }

    /// The header pair.
    pub fn headers(&self) -> &CoseHeaders {
        &self.headers
    }

    /// The encrypted key bytes, tag wrappers stripped.
    pub fn ciphertext(&self) -> Option<&[u8]> {
        content_bytes(&self.ciphertext)
    }

    /// The nested recipients, if the optional fourth element is present.
    pub fn recipients(&self) -> Option<&[CoseRecipient]> {
        self.recipients.as_deref()
    }

    /// The array form.
    pub fn to_cbor(&self) -> CBOR {
        let (protected, unprotected) = self.headers.to_items();
        let mut items = vec![
            protected,
            unprotected,
            self.ciphertext.clone().with_comment("ciphertext"),
        ];
        if let Some(nested) = &self.recipients {
            items.push(CBOR::array(nested.iter().map(CoseRecipient::to_cbor).collect()));
        }
        CBOR::array(items)
    }
}

/***************************************************************************************************
 * Tag dispatch
 **************************************************************************************************/

/// Any of the six COSE envelope types, as selected by tag number.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CoseMessage {
    /// Tag 98.
    Sign(CoseSign),
    /// Tag 18.
    Sign1(CoseSign1),
    /// Tag 97.
    Mac(CoseMac),
    /// Tag 17.
    Mac0(CoseMac0),
    /// Tag 96.
    Encrypt(CoseEncrypt),
    /// Tag 16.
    Encrypt0(CoseEncrypt0),
}

impl CoseMessage {
    /// Build the message selected by `tag` from the (untagged) array `content`.
    pub fn from_tag(tag: u64, content: &CBOR) -> Result<CoseMessage> {
        match tag {
            TAG_COSE_SIGN => CoseSign::from_cbor(content).map(CoseMessage::Sign),
            TAG_COSE_SIGN1 => CoseSign1::from_cbor(content).map(CoseMessage::Sign1),
            TAG_COSE_MAC => CoseMac::from_cbor(content).map(CoseMessage::Mac),
            TAG_COSE_MAC0 => CoseMac0::from_cbor(content).map(CoseMessage::Mac0),
            TAG_COSE_ENCRYPT => CoseEncrypt::from_cbor(content).map(CoseMessage::Encrypt),
            TAG_COSE_ENCRYPT0 => CoseEncrypt0::from_cbor(content).map(CoseMessage::Encrypt0),
            _ => Err(COSEError::Structural(
                "COSE message",
                "tag number does not name a COSE message type",
            )),
        }
    }

    /// Build from a tagged item.
    pub fn from_cbor(item: &CBOR) -> Result<CoseMessage> {
        match item.as_tagged() {
            Some((tag, content)) => CoseMessage::from_tag(tag, content),
            None => Err(COSEError::Structural(
                "COSE message",
                "must be tagged to select its type",
            )),
        }
    }

    /// The tag number of this message type.
    pub fn tag(&self) -> u64 {
        match self {
            CoseMessage::Sign(_) => TAG_COSE_SIGN,
            CoseMessage::Sign1(_) => TAG_COSE_SIGN1,
            CoseMessage::Mac(_) => TAG_COSE_MAC,
            CoseMessage::Mac0(_) => TAG_COSE_MAC0,
            CoseMessage::Encrypt(_) => TAG_COSE_ENCRYPT,
            CoseMessage::Encrypt0(_) => TAG_COSE_ENCRYPT0,
        }
    }

    /// The tagged form of this message.
    pub fn tagged(&self) -> CBOR {
        match self {
            CoseMessage::Sign(m) => m.tagged(),
            CoseMessage::Sign1(m) => m.tagged(),
            CoseMessage::Mac(m) => m.tagged(),
            CoseMessage::Mac0(m) => m.tagged(),
            CoseMessage::Encrypt(m) => m.tagged(),
            CoseMessage::Encrypt0(m) => m.tagged(),
        }
    }
}
