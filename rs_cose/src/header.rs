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
 * COSE header model
 *
 * Protected and unprotected headers share one validator over ordered label/value pairs. The
 * protected header is persisted as its exact serialised byte string: signing and verification
 * operate on that blob, never on a re-encoding of the map, so construction keeps both forms.
 **************************************************************************************************/
use std::fmt;

use rs_cbor::types::{Value, CBOR};
use tracing::trace;
use x509_cert::Certificate;

use crate::constants::*;
use crate::error::{COSEError, Result};
use crate::x5chain;

/// A header or key parameter label: an integer or a text string.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Label {
    /// Integer label.
    Int(i64),
    /// Text label.
    Text(String),
}

impl Label {
    /// Build a label from a decoded item. Anything other than an integer or text string is a
    /// structural error; arbitrary-precision integers are outside the label space.
    pub fn from_cbor(item: &CBOR) -> Result<Label> {
        match item.value() {
            Value::Int(v) => Ok(Label::Int(*v as i64)),
            Value::Long(v) => Ok(Label::Int(*v)),
            Value::Tstr(s) => Ok(Label::Text(s.clone())),
            _ => Err(COSEError::Structural(
                "header label",
                "must be an integer or a text string",
            )),
        }
    }

    /// The CBOR item form of this label.
    pub fn to_cbor(&self) -> CBOR {
        match self {
            Label::Int(v) => CBOR::from(*v),
            Label::Text(s) => CBOR::text(s.clone()),
        }
    }
}

impl From<i64> for Label {
    fn from(v: i64) -> Label {
        Label::Int(v)
    }
}

impl From<&str> for Label {
    fn from(s: &str) -> Label {
        Label::Text(s.to_owned())
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Int(v) => write!(f, "{}", v),
            Label::Text(s) => write!(f, "\"{}\"", s),
        }
    }
}

/// A validated header: an ordered map from label to value.
///
/// The same structure backs protected and unprotected headers; the `crit` parameter is only
/// admitted on the protected side.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Header {
    pairs: Vec<(Label, CBOR)>,
}

impl Header {
    /// A header with no parameters.
    pub fn empty() -> Header {
        Header { pairs: Vec::new() }
    }

    /// Validate `pairs` as a protected header.
    pub fn protected(pairs: Vec<(Label, CBOR)>) -> Result<Header> {
        Header::validated(pairs, true)
    }

    /// Validate `pairs` as an unprotected header; `crit` is rejected here.
    pub fn unprotected(pairs: Vec<(Label, CBOR)>) -> Result<Header> {
        Header::validated(pairs, false)
    }

    fn validated(pairs: Vec<(Label, CBOR)>, allow_crit: bool) -> Result<Header> {
        for (index, (label, value)) in pairs.iter().enumerate() {
            if pairs[..index].iter().any(|(seen, _)| seen == label) {
                return Err(COSEError::DuplicateLabel(label.clone()));
            }
            validate_value(label, value, allow_crit)?;
        }
        trace!(parameters = pairs.len(), "validated header");
        Ok(Header { pairs })
    }

    /// Build a header from a decoded CBOR map.
    pub(crate) fn from_map_item(item: &CBOR, allow_crit: bool) -> Result<Header> {
        let source = item
            .as_map()
            .ok_or(COSEError::Structural("header", "must be a CBOR map"))?;
        let pairs = source
            .iter()
            .map(|(key, value)| Ok((Label::from_cbor(key)?, value.clone())))
            .collect::<Result<Vec<_>>>()?;
        Header::validated(pairs, allow_crit)
    }

    /// The value stored under `label`, if any.
    pub fn get(&self, label: &Label) -> Option<&CBOR> {
        self.pairs
            .iter()
            .find(|(candidate, _)| candidate == label)
            .map(|(_, value)| value)
    }

    /// The value stored under an integer label, if any.
    pub fn get_int(&self, id: i64) -> Option<&CBOR> {
        self.get(&Label::Int(id))
    }

    /// The algorithm parameter as stored: an integer or a text string.
    pub fn alg(&self) -> Option<&CBOR> {
        self.get_int(HP_ALG)
    }

    /// The critical-headers parameter.
    pub fn crit(&self) -> Option<&[CBOR]> {
        self.get_int(HP_CRIT).and_then(CBOR::as_array)
    }

    /// The content-type parameter: a text string or a non-negative integer.
    pub fn content_type(&self) -> Option<&CBOR> {
        self.get_int(HP_CONTENT_TYPE)
    }

    /// The key identifier bytes.
    pub fn kid(&self) -> Option<&[u8]> {
        self.get_int(HP_KID).and_then(CBOR::as_bytes)
    }

    /// The initialization vector bytes.
    pub fn iv(&self) -> Option<&[u8]> {
        self.get_int(HP_IV).and_then(CBOR::as_bytes)
    }

    /// The partial initialization vector bytes.
    pub fn partial_iv(&self) -> Option<&[u8]> {
        self.get_int(HP_PARTIAL_IV).and_then(CBOR::as_bytes)
    }

    /// The certificates carried in the x5chain parameter, decoded from DER.
    pub fn x5chain(&self) -> Result<Option<Vec<Certificate>>> {
        self.get_int(HP_X5CHAIN)
            .map(x5chain::decode_x5chain)
            .transpose()
    }

    /// The labels present, in insertion order.
    pub fn labels(&self) -> impl Iterator<Item = &Label> {
        self.pairs.iter().map(|(label, _)| label)
    }

    /// The ordered label/value pairs.
    pub fn pairs(&self) -> &[(Label, CBOR)] {
        &self.pairs
    }

    /// True if no parameters are present.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// The CBOR map form of this header.
    pub fn to_cbor(&self) -> CBOR {
        CBOR::map(
            self.pairs
                .iter()
                .map(|(label, value)| (label.to_cbor(), value.clone()))
                .collect(),
        )
    }
}

/// Type rules for the recognised integer labels. Unrecognised labels and all text labels pass
/// unchecked.
fn validate_value(label: &Label, value: &CBOR, allow_crit: bool) -> Result<()> {
    let id = match label {
        Label::Int(id) => *id,
        Label::Text(_) => return Ok(()),
    };
    match id {
        HP_ALG => {
            if is_int(value) || value.as_text().is_some() {
                Ok(())
            } else {
                Err(COSEError::Structural(
                    "alg",
                    "must be an integer or a text string",
                ))
            }
        }
        HP_CRIT => {
            if !allow_crit {
                return Err(COSEError::Structural(
                    "crit",
                    "is not permitted in an unprotected header",
                ));
            }
            match value.as_array() {
                Some(items) if !items.is_empty() => {
                    if items.iter().all(|i| is_int(i) || i.as_text().is_some()) {
                        Ok(())
                    } else {
                        Err(COSEError::Structural(
                            "crit",
                            "entries must be integers or text strings",
                        ))
                    }
                }
                _ => Err(COSEError::Structural("crit", "must be a non-empty array")),
            }
        }
        HP_CONTENT_TYPE => match value.value() {
            Value::Tstr(_) => Ok(()),
            _ if value.as_int().map_or(false, |v| v >= 0) => Ok(()),
            _ => Err(COSEError::Structural(
                "content type",
                "must be a text string or a non-negative integer",
            )),
        },
        HP_KID => require_bstr(value, "kid"),
        HP_IV => require_bstr(value, "iv"),
        HP_PARTIAL_IV => require_bstr(value, "partial iv"),
        HP_X5CHAIN => x5chain::decode_x5chain(value).map(|_| ()),
        _ => Ok(()),
    }
}

fn is_int(value: &CBOR) -> bool {
    matches!(value.value(), Value::Int(_) | Value::Long(_))
}

fn require_bstr(value: &CBOR, what: &'static str) -> Result<()> {
    if value.as_bytes().is_some() {
        Ok(())
    } else {
        Err(COSEError::Structural(what, "must be a byte string"))
    }
}

/// A protected header: the exact serialised byte string plus its decoded, validated map.
///
/// An empty header serialises as the zero-length byte string, not as an encoded empty map. The
/// stored bytes are authoritative: `Sig_structure` assembly uses them unchanged, so a message
/// re-encoded by this crate signs and verifies against the blob it arrived with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProtectedHeader {
    bytes: Vec<u8>,
    header: Header,
}

impl Default for ProtectedHeader {
    fn default() -> Self {
        ProtectedHeader::empty()
    }
}

impl ProtectedHeader {
    /// The empty protected header.
    pub fn empty() -> ProtectedHeader {
        ProtectedHeader {
            bytes: Vec::new(),
            header: Header::empty(),
        }
    }

    /// Re-parse serialised protected-header bytes. Zero-length bytes are the empty header;
    /// anything else must decode to a single CBOR map of valid pairs.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<ProtectedHeader> {
        if bytes.is_empty() {
            return Ok(ProtectedHeader::empty());
        }
        let item = CBOR::from_bytes(&bytes)?;
        let header = Header::from_map_item(&item, true)?;
        Ok(ProtectedHeader { bytes, header })
    }

    /// Encode a validated map, fixing the serialised form at construction time.
    pub fn from_header(header: Header) -> Result<ProtectedHeader> {
        let bytes = if header.is_empty() {
            Vec::new()
        } else {
            header.to_cbor().to_bytes()?
        };
        Ok(ProtectedHeader { bytes, header })
    }

    /// The exact serialised bytes (zero-length when the header is empty).
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The decoded map.
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// The byte-string item carrying this header in a message.
    pub fn to_cbor(&self) -> CBOR {
        CBOR::bytes(self.bytes.clone())
    }
}

/// A label must not appear in both headers of a message.
pub(crate) fn check_cross_duplicates(protected: &Header, unprotected: &Header) -> Result<()> {
    for label in protected.labels() {
        if unprotected.get(label).is_some() {
            return Err(COSEError::DuplicateLabel(label.clone()));
        }
    }
    Ok(())
}
