/***************************************************************************************************
 * Copyright (c) 2020-2023 Qualcomm Innovation Center, Inc. All rights reserved.
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
 * CBOR Tag processing
 *
 * Tag-driven extension mechanism: the decoder hands each tag head and its decoded content to a
 * processor looked up by tag number, and the processor returns the item that stands in the tree.
 * A lookup miss wraps the content in a plain tagged item.
 *
 * The registry is keyed on the numeric tag value. A tag number is a head argument and therefore
 * never exceeds 64 bits, so two encodings of the same number always reach the same processor.
 **************************************************************************************************/
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use num_bigint::{BigInt, Sign};
use once_cell::sync::Lazy;

use crate::ast::{narrow_big, Uri, Value, CBOR};
use crate::constants::*;
use crate::error::{CBORError, Result};

/// A tag processor receives the tag number and the already-decoded content item and returns the
/// item to place in the tree, which may be of an entirely different kind (bignum tags produce
/// integers, the URI tag produces a URI item).
///
/// Errors propagate as decode errors.
pub trait TagProcessor: Send + Sync {
    /// Rewrite `content` according to the semantics of `tag`.
    fn process(&self, tag: u64, content: CBOR) -> Result<CBOR>;
}

/// A mapping from tag number to processor.
///
/// The registry is an immutable configuration object once decoders are running: build it up
/// front, then share it. [`TagRegistry::global`] provides the default set.
#[derive(Clone)]
pub struct TagRegistry {
    processors: BTreeMap<u64, Arc<dyn TagProcessor>>,
}

impl Default for TagRegistry {
    fn default() -> Self {
        TagRegistry::new()
    }
}

impl TagRegistry {
    /// A registry with no processors: every tag decodes as a plain tagged item.
    pub fn empty() -> TagRegistry {
        TagRegistry {
            processors: BTreeMap::new(),
        }
    }

    /// A registry holding the default processors: unsigned and negative bignums (tags 2 and 3),
    /// encoded CBOR data items (tag 24) and URIs (tag 32).
    pub fn new() -> TagRegistry {
        let mut registry = TagRegistry::empty();
        registry.register(TAG_UNSIGNED_BIGNUM, Arc::new(UnsignedBignum));
        registry.register(TAG_NEGATIVE_BIGNUM, Arc::new(NegativeBignum));
        registry.register(TAG_ENCODED_CBOR, Arc::new(EncodedCbor));
        registry.register(TAG_URI, Arc::new(UriTag));
        registry
    }

    /// The shared default registry.
    pub fn global() -> &'static TagRegistry {
        static GLOBAL: Lazy<TagRegistry> = Lazy::new(TagRegistry::new);
        &GLOBAL
    }

    /// Add or replace the processor for `tag`, returning the previous processor if any.
    pub fn register(
        &mut self,
        tag: u64,
        processor: Arc<dyn TagProcessor>,
    ) -> Option<Arc<dyn TagProcessor>> {
        self.processors.insert(tag, processor)
    }

    /// Remove the processor for `tag`, returning it if present.
    pub fn deregister(&mut self, tag: u64) -> Option<Arc<dyn TagProcessor>> {
        self.processors.remove(&tag)
    }

    /// The processor registered for `tag`, if any.
    pub fn get(&self, tag: u64) -> Option<&Arc<dyn TagProcessor>> {
        self.processors.get(&tag)
    }

    /// Dispatch `content` to the processor for `tag`; a miss wraps it in a tagged item.
    pub fn process(&self, tag: u64, content: CBOR) -> Result<CBOR> {
        match self.processors.get(&tag) {
            Some(processor) => processor.process(tag, content),
            None => Ok(CBOR::tagged(tag, content)),
        }
    }
}

impl fmt::Debug for TagRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagRegistry")
            .field("tags", &self.processors.keys().collect::<Vec<_>>())
            .finish()
    }
}

/***************************************************************************************************
 * Default processors
 **************************************************************************************************/

/// Tag 2: a byte-string magnitude read as a non-negative integer, narrowed.
struct UnsignedBignum;

impl TagProcessor for UnsignedBignum {
    fn process(&self, tag: u64, content: CBOR) -> Result<CBOR> {
        let magnitude = bignum_magnitude(tag, content)?;
        Ok(CBOR::new(narrow_big(magnitude)))
    }
}

/// Tag 3: `-1 - magnitude`, narrowed.
struct NegativeBignum;

impl TagProcessor for NegativeBignum {
    fn process(&self, tag: u64, content: CBOR) -> Result<CBOR> {
        let magnitude = bignum_magnitude(tag, content)?;
        Ok(CBOR::new(narrow_big(BigInt::from(-1) - magnitude)))
    }
}

fn bignum_magnitude(tag: u64, content: CBOR) -> Result<BigInt> {
    match content.into_value() {
        Value::Bstr(b) => Ok(BigInt::from_bytes_be(Sign::Plus, b.as_slice())),
        _ => Err(CBORError::TagContentMismatch(tag, "a byte string")),
    }
}

/// Tag 24: an encoded CBOR data item. The byte string is kept as-is and its content is not
/// eagerly validated, but the tag wrapper is preserved so the diagnostic formatter can render
/// the embedded items and COSE payload handling can reach them lazily.
struct EncodedCbor;

impl TagProcessor for EncodedCbor {
    fn process(&self, tag: u64, content: CBOR) -> Result<CBOR> {
        match content.value() {
            Value::Bstr(_) => Ok(CBOR::tagged(tag, content)),
            _ => Err(CBORError::TagContentMismatch(tag, "a byte string")),
        }
    }
}

/// Tag 32: a text string holding a URI. Malformed URIs fail the decode.
struct UriTag;

impl TagProcessor for UriTag {
    fn process(&self, tag: u64, content: CBOR) -> Result<CBOR> {
        match content.into_value() {
            Value::Tstr(text) => Ok(CBOR::new(Value::Uri(Uri::parse(text)?))),
            _ => Err(CBORError::TagContentMismatch(tag, "a text string")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_miss_wraps_in_a_tagged_item() {
        let registry = TagRegistry::new();
        let item = registry.process(901, CBOR::from(5)).unwrap();
        assert_eq!(item, CBOR::tagged(901, CBOR::from(5)));
    }

    #[test]
    fn bignum_tags_narrow_to_the_smallest_variant() {
        let registry = TagRegistry::new();
        let one = registry
            .process(TAG_UNSIGNED_BIGNUM, CBOR::bytes(vec![0x01]))
            .unwrap();
        assert_eq!(*one.value(), Value::Int(1));
        let minus_one = registry
            .process(TAG_NEGATIVE_BIGNUM, CBOR::bytes(vec![0x00, 0x00]))
            .unwrap();
        assert_eq!(*minus_one.value(), Value::Int(-1));
    }

    #[test]
    fn bignum_content_must_be_a_byte_string() {
        let registry = TagRegistry::new();
        assert_eq!(
            registry.process(TAG_UNSIGNED_BIGNUM, CBOR::from(1)),
            Err(CBORError::TagContentMismatch(2, "a byte string"))
        );
    }

    #[test]
    fn replacing_a_processor_returns_the_old_one() {
        struct Stub;
        impl TagProcessor for Stub {
            fn process(&self, _tag: u64, content: CBOR) -> Result<CBOR> {
                Ok(content)
            }
        }
        let mut registry = TagRegistry::new();
        assert!(registry.register(TAG_URI, Arc::new(Stub)).is_some());
        assert!(registry.deregister(TAG_URI).is_some());
        assert!(registry.get(TAG_URI).is_none());
    }
}
