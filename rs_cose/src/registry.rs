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
 * COSE tag registrations
 *
 * Extends the CBOR tag registry with the COSE message tags and the CWT tag. The message
 * processors validate the envelope structure eagerly, so a malformed message fails at decode
 * time; the item placed in the tree stays the plain tagged array, and the typed records are
 * built on demand through the message constructors.
 **************************************************************************************************/
use std::sync::Arc;

use once_cell::sync::Lazy;

use rs_cbor::error::CBORError;
use rs_cbor::tags::{TagProcessor, TagRegistry};
use rs_cbor::types::{Value, CBOR};

use crate::constants::*;
use crate::message::CoseMessage;

/// Validates a COSE message envelope during decoding and keeps the tagged item unchanged.
struct CoseMessageTag;

impl TagProcessor for CoseMessageTag {
    fn process(&self, tag: u64, content: CBOR) -> rs_cbor::error::Result<CBOR> {
        CoseMessage::from_tag(tag, &content)
            .map_err(|e| CBORError::TagProcessorFailure(tag, e.to_string()))?;
        Ok(CBOR::tagged(tag, content))
    }
}

/// Tag 61: a CBOR Web Token is structurally its content, which must itself be a COSE message
/// (tagged, in which case its own processor has already validated it, or a bare array).
struct CwtTag;

impl TagProcessor for CwtTag {
    fn process(&self, tag: u64, content: CBOR) -> rs_cbor::error::Result<CBOR> {
        match content.value() {
            Value::Tagged(inner, _) if is_cose_tag(*inner) => Ok(CBOR::tagged(tag, content)),
            Value::Array(_) => Ok(CBOR::tagged(tag, content)),
            _ => Err(CBORError::TagContentMismatch(tag, "a COSE message")),
        }
    }
}

fn is_cose_tag(tag: u64) -> bool {
    matches!(
        tag,
        TAG_COSE_ENCRYPT0
            | TAG_COSE_MAC0
            | TAG_COSE_SIGN1
            | TAG_COSE_ENCRYPT
            | TAG_COSE_MAC
            | TAG_COSE_SIGN
    )
}

/// The default registry of this crate: the CBOR defaults plus the COSE message tags and CWT.
pub fn registry() -> &'static TagRegistry {
    static REGISTRY: Lazy<TagRegistry> = Lazy::new(|| {
        let mut registry = TagRegistry::new();
        for tag in [
            TAG_COSE_ENCRYPT0,
            TAG_COSE_MAC0,
            TAG_COSE_SIGN1,
            TAG_COSE_ENCRYPT,
            TAG_COSE_MAC,
            TAG_COSE_SIGN,
        ] {
            registry.register(tag, Arc::new(CoseMessageTag));
        }
        registry.register(TAG_CWT, Arc::new(CwtTag));
        registry
    });
    &REGISTRY
}

/// Decode a single item with the COSE registrations active.
pub fn decode(bytes: &[u8]) -> rs_cbor::error::Result<CBOR> {
    let mut decoder = rs_cbor::decoder::CBORDecoder::with_registry(bytes, registry());
    let item = decoder
        .next_item()?
        .ok_or(CBORError::InsufficientData(0, "a data item"))?;
    let end = decoder.offset();
    if decoder.next_item()?.is_some() {
        return Err(CBORError::TrailingData(end));
    }
    Ok(item)
}
