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
 * CBOR Tokenizer
 *
 * Streams bytes into head tokens: the 3-bit Major Type and 5-bit Additional Information of each
 * head byte are resolved into a token carrying its decoded payload. The tokenizer maintains a
 * monotonic read counter which is reported in every error.
 **************************************************************************************************/
use std::io::{ErrorKind, Read};

use half::f16;

use crate::constants::*;
use crate::error::{CBORError, Result};

/// A single CBOR head together with its decoded payload.
///
/// Integer arguments are resolved here (inline, one, two, four or eight byte forms); definite
/// string payloads are read in full; half-precision floats are expanded to single precision.
/// Negative integers are carried as their positive complement (`n` encodes `-1 - n`) and
/// rewritten by the decoder.
#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    /// Major type 0, unsigned integer.
    UInt(u64),
    /// Major type 1, negative integer stored as its positive complement.
    NInt(u64),
    /// Major type 2, definite-length byte string with payload.
    Bytes(Vec<u8>),
    /// Major type 2, indefinite-length opener.
    BytesIndef,
    /// Major type 3, definite-length text string, UTF-8 validated.
    Text(String),
    /// Major type 3, indefinite-length opener.
    TextIndef,
    /// Major type 4, definite-length array opener.
    Array(usize),
    /// Major type 4, indefinite-length array opener.
    ArrayIndef,
    /// Major type 5, definite-length map opener (number of pairs).
    Map(usize),
    /// Major type 5, indefinite-length map opener.
    MapIndef,
    /// Major type 6, tag head.
    Tag(u64),
    /// Major type 7, simple value with a valid code (0-19 or 32-255).
    Simple(u8),
    /// Major type 7, additional information 20.
    False,
    /// Major type 7, additional information 21.
    True,
    /// Major type 7, additional information 22.
    Null,
    /// Major type 7, additional information 23.
    Undefined,
    /// Major type 7, single-precision float (half-precision is expanded here).
    Float32(f32),
    /// Major type 7, double-precision float.
    Float64(f64),
    /// Major type 7, additional information 31: the `break` stop code.
    Break,
}

/// A tokenizer over any byte source. The read counter starts at zero and advances by exactly the
/// number of bytes consumed, so error offsets identify the failing position in the input.
#[derive(Debug)]
pub struct Tokenizer<R> {
    src: R,
    offset: usize,
}

impl<R: Read> Tokenizer<R> {
    /// Construct a tokenizer reading from `src`.
    pub fn new(src: R) -> Tokenizer<R> {
        Tokenizer { src, offset: 0 }
    }

    /// The number of bytes consumed so far.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Read the next token. `Ok(None)` is returned only on a clean end of input, i.e. at a
    /// position where a new head byte could start. `context` names the enclosing construct and
    /// is reported if the input ends mid-token.
    pub fn next_token(&mut self, context: &'static str) -> Result<Option<Token>> {
        let head = match self.read_head_byte()? {
            Some(b) => b,
            None => return Ok(None),
        };
        let mt = head & !AI_MASK;
        let ai = head & AI_MASK;
        if (28..=30).contains(&ai) {
            return Err(CBORError::ReservedAdditionalInfo(self.offset - 1, ai));
        }
        let token = match mt {
            MT_UINT => Token::UInt(self.read_argument(ai, context)?),
            MT_NINT => Token::NInt(self.read_argument(ai, context)?),
            MT_BSTR => {
                if ai == PAYLOAD_INDEFINITE {
                    Token::BytesIndef
                } else {
                    Token::Bytes(self.read_string_payload(ai, context)?)
                }
            }
            MT_TSTR => {
                if ai == PAYLOAD_INDEFINITE {
                    Token::TextIndef
                } else {
                    let raw = self.read_string_payload(ai, context)?;
                    match String::from_utf8(raw) {
                        Ok(s) => Token::Text(s),
                        Err(_) => return Err(CBORError::MalformedUtf8(self.offset)),
                    }
                }
            }
            MT_ARRAY => {
                if ai == PAYLOAD_INDEFINITE {
                    Token::ArrayIndef
                } else {
                    Token::Array(self.read_length(ai, context)?)
                }
            }
            MT_MAP => {
                if ai == PAYLOAD_INDEFINITE {
                    Token::MapIndef
                } else {
                    Token::Map(self.read_length(ai, context)?)
                }
            }
            MT_TAG => Token::Tag(self.read_argument(ai, context)?),
            _ => self.read_major_seven(ai, context)?,
        };
        Ok(Some(token))
    }

    /// Resolve a Major Type 7 head: booleans, null, undefined, simple values, floats and break.
    fn read_major_seven(&mut self, ai: u8, context: &'static str) -> Result<Token> {
        Ok(match ai {
            SV_FALSE => Token::False,
            SV_TRUE => Token::True,
            SV_NULL => Token::Null,
            SV_UNDEFINED => Token::Undefined,
            PAYLOAD_ONE_BYTE => {
                let code = self.read_array::<1>(context)?[0];
                // Two-byte simple values below 32 are reserved (RFC 8949 s3.3)
                if code < 32 {
                    return Err(CBORError::InvalidSimpleValue(self.offset - 1, code));
                }
                Token::Simple(code)
            }
            PAYLOAD_TWO_BYTES => {
                let bits = u16::from_be_bytes(self.read_array::<2>(context)?);
                Token::Float32(f16::from_bits(bits).to_f32())
            }
            PAYLOAD_FOUR_BYTES => {
                Token::Float32(f32::from_be_bytes(self.read_array::<4>(context)?))
            }
            PAYLOAD_EIGHT_BYTES => {
                Token::Float64(f64::from_be_bytes(self.read_array::<8>(context)?))
            }
            PAYLOAD_INDEFINITE => Token::Break,
            code => Token::Simple(code),
        })
    }

    /// Read the unsigned argument selected by the AI bits: inline for values below 24, otherwise
    /// from the 1/2/4/8 byte big-endian follow-on encoding. AI 28-30 are rejected by the caller
    /// and AI 31 never reaches this function.
    fn read_argument(&mut self, ai: u8, context: &'static str) -> Result<u64> {
        match ai {
            0..=PAYLOAD_AI_BITS => Ok(ai as u64),
            PAYLOAD_ONE_BYTE => Ok(u8::from_be_bytes(self.read_array::<1>(context)?) as u64),
            PAYLOAD_TWO_BYTES => Ok(u16::from_be_bytes(self.read_array::<2>(context)?) as u64),
            PAYLOAD_FOUR_BYTES => Ok(u32::from_be_bytes(self.read_array::<4>(context)?) as u64),
            PAYLOAD_EIGHT_BYTES => Ok(u64::from_be_bytes(self.read_array::<8>(context)?)),
            _ => Err(CBORError::ReservedAdditionalInfo(self.offset - 1, ai)),
        }
    }

    /// Read a length argument and narrow it to `usize`, rejecting values this implementation
    /// cannot address.
    fn read_length(&mut self, ai: u8, context: &'static str) -> Result<usize> {
        let head_offset = self.offset - 1;
        let value = self.read_argument(ai, context)?;
        if value > isize::MAX as u64 {
            return Err(CBORError::TooLong(head_offset, value));
        }
        usize::try_from(value).map_err(|_| CBORError::TooLong(head_offset, value))
    }

    /// Read a definite string payload.
    fn read_string_payload(&mut self, ai: u8, context: &'static str) -> Result<Vec<u8>> {
        let len = self.read_length(ai, context)?;
        let mut payload = vec![0u8; len];
        self.read_exact(&mut payload, context)?;
        Ok(payload)
    }

    /// Read one head byte, distinguishing clean end of input from an I/O failure.
    fn read_head_byte(&mut self) -> Result<Option<u8>> {
        let mut buf = [0u8; 1];
        loop {
            match self.src.read(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(_) => {
                    self.offset += 1;
                    return Ok(Some(buf[0]));
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(CBORError::Io(self.offset, e.to_string())),
            }
        }
    }

    fn read_array<const N: usize>(&mut self, context: &'static str) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        self.read_exact(&mut buf, context)?;
        Ok(buf)
    }

    fn read_exact(&mut self, buf: &mut [u8], context: &'static str) -> Result<()> {
        match self.src.read_exact(buf) {
            Ok(()) => {
                self.offset += buf.len();
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
                Err(CBORError::InsufficientData(self.offset, context))
            }
            Err(e) => Err(CBORError::Io(self.offset, e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(bytes: &[u8]) -> Vec<Token> {
        let mut tok = Tokenizer::new(bytes);
        let mut out = Vec::new();
        while let Some(t) = tok.next_token("a test item").unwrap() {
            out.push(t);
        }
        out
    }

    #[test]
    fn heads_resolve_inline_and_follow_on_arguments() {
        assert_eq!(tokens(&[0x00]), vec![Token::UInt(0)]);
        assert_eq!(tokens(&[0x17]), vec![Token::UInt(23)]);
        assert_eq!(tokens(&[0x18, 0x18]), vec![Token::UInt(24)]);
        assert_eq!(tokens(&[0x19, 0x03, 0xe8]), vec![Token::UInt(1000)]);
        assert_eq!(
            tokens(&[0x1a, 0x00, 0x01, 0x00, 0x00]),
            vec![Token::UInt(65536)]
        );
        assert_eq!(tokens(&[0x20]), vec![Token::NInt(0)]);
        assert_eq!(tokens(&[0x38, 0x63]), vec![Token::NInt(99)]);
    }

    #[test]
    fn half_precision_expands_to_single() {
        // 0xf9 3c00 is 1.0 as binary16
        assert_eq!(tokens(&[0xf9, 0x3c, 0x00]), vec![Token::Float32(1.0)]);
    }

    #[test]
    fn reserved_ai_is_rejected() {
        let input = [0x1cu8];
        let mut tok = Tokenizer::new(input.as_slice());
        assert_eq!(
            tok.next_token("a test item"),
            Err(CBORError::ReservedAdditionalInfo(0, 28))
        );
    }

    #[test]
    fn truncated_payload_reports_offset_and_context() {
        let input = [0x43u8, 0x01];
        let mut tok = Tokenizer::new(input.as_slice());
        assert_eq!(
            tok.next_token("a byte string"),
            Err(CBORError::InsufficientData(1, "a byte string"))
        );
    }

    #[test]
    fn reserved_two_byte_simple_values_are_rejected() {
        let input = [0xf8u8, 0x18];
        let mut tok = Tokenizer::new(input.as_slice());
        assert_eq!(
            tok.next_token("a test item"),
            Err(CBORError::InvalidSimpleValue(1, 24))
        );
    }
}
