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
 * CBOR Decoder
 *
 * Assembles tokens into the value tree. Composite tokens recurse: definite containers read
 * exactly their declared number of children, indefinite containers read until the break stop
 * code, chunked strings are concatenated, and tag heads dispatch their content through the tag
 * registry. The decoder fails fast: either a complete item is returned or an error, never a
 * partial tree.
 **************************************************************************************************/
use std::io::Read;

use crate::ast::{narrow_i128, narrow_u64, Bytes, Value, CBOR};
use crate::error::{CBORError, Result};
use crate::tag::TagRegistry;
use crate::token::{Token, Tokenizer};

/// A decoder over any byte source, producing one owned item per top-level CBOR data item. The
/// input may hold any number of consecutive items (an RFC 8742 CBOR sequence);
/// [`CBORDecoder::next_item`] returns `Ok(None)` at a clean end of input.
///
/// A decoder owns a stateful tokenizer and is not safe for concurrent use; the items it
/// produces are independent of it.
#[derive(Debug)]
pub struct CBORDecoder<'r, R> {
    tok: Tokenizer<R>,
    registry: &'r TagRegistry,
}

impl<R: Read> CBORDecoder<'static, R> {
    /// Construct a decoder using the default tag registry.
    pub fn new(src: R) -> CBORDecoder<'static, R> {
        CBORDecoder {
            tok: Tokenizer::new(src),
            registry: TagRegistry::global(),
        }
    }
}

impl<'b> CBORDecoder<'static, &'b [u8]> {
    /// Construct a decoder over a byte slice using the default tag registry.
    pub fn from_slice(bytes: &'b [u8]) -> CBORDecoder<'static, &'b [u8]> {
        CBORDecoder::new(bytes)
    }
}

impl<'r, R: Read> CBORDecoder<'r, R> {
    /// Construct a decoder with a caller-supplied tag registry. The registry must not be
    /// mutated while the decoder is in flight, which the shared reference enforces.
    pub fn with_registry(src: R, registry: &'r TagRegistry) -> CBORDecoder<'r, R> {
        CBORDecoder {
            tok: Tokenizer::new(src),
            registry,
        }
    }

    /// The number of input bytes consumed so far.
    pub fn offset(&self) -> usize {
        self.tok.offset()
    }

    /// Decode the next top-level item, or `Ok(None)` at a clean end of input.
    pub fn next_item(&mut self) -> Result<Option<CBOR>> {
        match self.tok.next_token("a data item")? {
            None => Ok(None),
            Some(token) => self.item_for_token(token).map(Some),
        }
    }

    /// Decode all remaining top-level items.
    pub fn decode_all(mut self) -> Result<Vec<CBOR>> {
        let mut items = Vec::new();
        while let Some(item) = self.next_item()? {
            items.push(item);
        }
        Ok(items)
    }

    /// Read the next item inside a composite; end of input and `break` are both errors here.
    fn require_item(&mut self, context: &'static str) -> Result<CBOR> {
        match self.tok.next_token(context)? {
            None => Err(CBORError::InsufficientData(self.tok.offset(), context)),
            Some(Token::Break) => Err(CBORError::UnexpectedBreak(self.tok.offset() - 1)),
            Some(token) => self.item_for_token(token),
        }
    }

    /// Read the next item inside an indefinite-length composite, where `break` terminates the
    /// container. `Ok(None)` reports the break.
    fn item_or_break(&mut self, context: &'static str) -> Result<Option<CBOR>> {
        match self.tok.next_token(context)? {
            None => Err(CBORError::InsufficientData(self.tok.offset(), context)),
            Some(Token::Break) => Ok(None),
            Some(token) => self.item_for_token(token).map(Some),
        }
    }

    fn item_for_token(&mut self, token: Token) -> Result<CBOR> {
        match token {
            Token::UInt(n) => Ok(CBOR::new(narrow_u64(n))),
            Token::NInt(n) => Ok(CBOR::new(narrow_i128(-1 - n as i128))),
            Token::Bytes(payload) => Ok(CBOR::new(Value::Bstr(Bytes::new(payload)))),
            Token::Text(text) => Ok(CBOR::new(Value::Tstr(text))),
            Token::BytesIndef => self.chunked_bytes(),
            Token::TextIndef => self.chunked_text(),
            Token::Array(len) => {
                let mut items = Vec::new();
                for _ in 0..len {
                    items.push(self.require_item("an array")?);
                }
                Ok(CBOR::new(Value::Array(items)))
            }
            Token::ArrayIndef => {
                let mut items = Vec::new();
                while let Some(item) = self.item_or_break("an array")? {
                    items.push(item);
                }
                Ok(CBOR::new(Value::Array(items)))
            }
            Token::Map(len) => {
                let mut pairs = Vec::new();
                for _ in 0..len {
                    let key = self.require_item("a map key")?;
                    let value = self.require_item("a map value")?;
                    pairs.push((key, value));
                }
                Ok(CBOR::new(Value::Map(pairs)))
            }
            Token::MapIndef => {
                let mut pairs = Vec::new();
                // break is legal in key position only, never between a key and its value
                while let Some(key) = self.item_or_break("a map key")? {
                    let value = self.require_item("a map value")?;
                    pairs.push((key, value));
                }
                Ok(CBOR::new(Value::Map(pairs)))
            }
            Token::Tag(tag) => {
                let content = self.require_item("tag content")?;
                self.registry.process(tag, content)
            }
            Token::Simple(code) => Ok(CBOR::new(Value::Simple(code))),
            Token::False => Ok(CBOR::new(Value::False)),
            Token::True => Ok(CBOR::new(Value::True)),
            Token::Null => Ok(CBOR::new(Value::Null)),
            Token::Undefined => Ok(CBOR::new(Value::Undefined)),
            Token::Float32(v) => Ok(CBOR::new(Value::Float32(v))),
            Token::Float64(v) => Ok(CBOR::new(Value::Float64(v))),
            Token::Break => Err(CBORError::UnexpectedBreak(self.tok.offset() - 1)),
        }
    }

    /// Concatenate the chunks of an indefinite-length byte string. Chunks must be definite
    /// byte strings.
    fn chunked_bytes(&mut self) -> Result<CBOR> {
        let mut buf = Vec::new();
        loop {
            match self.tok.next_token("a byte string chunk")? {
                None => {
                    return Err(CBORError::InsufficientData(
                        self.tok.offset(),
                        "a byte string chunk",
                    ))
                }
                Some(Token::Bytes(chunk)) => buf.extend_from_slice(&chunk),
                Some(Token::Break) => break,
                Some(_) => {
                    return Err(CBORError::UnexpectedToken(
                        self.tok.offset(),
                        "a byte string chunk",
                    ))
                }
            }
        }
        Ok(CBOR::new(Value::Bstr(Bytes::new(buf))))
    }

    /// Concatenate the chunks of an indefinite-length text string. Chunks must be definite
    /// text strings.
    fn chunked_text(&mut self) -> Result<CBOR> {
        let mut buf = String::new();
        loop {
            match self.tok.next_token("a text string chunk")? {
                None => {
                    return Err(CBORError::InsufficientData(
                        self.tok.offset(),
                        "a text string chunk",
                    ))
                }
                Some(Token::Text(chunk)) => buf.push_str(&chunk),
                Some(Token::Break) => break,
                Some(_) => {
                    return Err(CBORError::UnexpectedToken(
                        self.tok.offset(),
                        "a text string chunk",
                    ))
                }
            }
        }
        Ok(CBOR::new(Value::Tstr(buf)))
    }
}

impl<'r, R: Read> Iterator for CBORDecoder<'r, R> {
    type Item = Result<CBOR>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_item().transpose()
    }
}

impl CBOR {
    /// Decode exactly one item from `bytes` using the default tag registry. Trailing input is
    /// an error; use [`CBORDecoder`] for CBOR sequences.
    pub fn from_bytes(bytes: &[u8]) -> Result<CBOR> {
        let mut decoder = CBORDecoder::from_slice(bytes);
        let item = decoder
            .next_item()?
            .ok_or(CBORError::InsufficientData(0, "a data item"))?;
        let end = decoder.offset();
        if decoder.next_item()?.is_some() {
            return Err(CBORError::TrailingData(end));
        }
        Ok(item)
    }
}

/// Decode a byte buffer as a sequence of embedded items. Used by the lazy byte-string content
/// cache; always runs over the default registry.
pub(crate) fn decode_embedded(bytes: &[u8]) -> Result<Vec<CBOR>> {
    CBORDecoder::from_slice(bytes).decode_all()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn definite_containers_read_their_declared_length() {
        let item = CBOR::from_bytes(&[0x82, 0x01, 0x02]).unwrap();
        assert_eq!(item, CBOR::array(vec![CBOR::from(1), CBOR::from(2)]));
    }

    #[test]
    fn break_inside_a_definite_array_is_an_error() {
        assert_eq!(
            CBOR::from_bytes(&[0x82, 0x01, 0xff]),
            Err(CBORError::UnexpectedBreak(2))
        );
    }

    #[test]
    fn top_level_break_is_an_error() {
        assert_eq!(
            CBOR::from_bytes(&[0xff]),
            Err(CBORError::UnexpectedBreak(0))
        );
    }

    #[test]
    fn a_sequence_yields_items_in_order() {
        let mut decoder = CBORDecoder::from_slice(&[0x01, 0x02, 0x03]);
        let mut out = Vec::new();
        while let Some(item) = decoder.next_item().unwrap() {
            out.push(item);
        }
        assert_eq!(out, vec![CBOR::from(1), CBOR::from(2), CBOR::from(3)]);
    }

    #[test]
    fn trailing_data_is_reported() {
        assert_eq!(
            CBOR::from_bytes(&[0x01, 0x02]),
            Err(CBORError::TrailingData(1))
        );
    }
}
