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
 * CBOR Encoder
 *
 * Canonical byte emission for the value tree. Head arguments always use the preferred (shortest)
 * serialization; beyond that the encoder is canonical for its own choices but does not rewrite
 * values into RFC 8949 s4.2 preferred form on the caller's behalf.
 **************************************************************************************************/
use num_bigint::BigInt;
use num_traits::ToPrimitive;

use crate::ast::{magnitude_bytes, Value, CBOR};
use crate::constants::*;
use crate::error::{CBORError, Result};

/// Emit a head byte `(major << 5) | info` with its argument in the preferred serialization:
/// inline below 24, otherwise the smallest of the 1/2/4/8 byte big-endian follow-on forms.
///
/// This is the single head-encoding path for integer arguments, string/array/map lengths and
/// tag numbers.
pub fn encode_head(out: &mut Vec<u8>, mt: u8, arg: u64) {
    if arg < PAYLOAD_AI_BITS as u64 + 1 {
        out.push(mt | arg as u8);
    } else if arg <= u8::MAX as u64 {
        out.push(mt | PAYLOAD_ONE_BYTE);
        out.push(arg as u8);
    } else if arg <= u16::MAX as u64 {
        out.push(mt | PAYLOAD_TWO_BYTES);
        out.extend_from_slice(&(arg as u16).to_be_bytes());
    } else if arg <= u32::MAX as u64 {
        out.push(mt | PAYLOAD_FOUR_BYTES);
        out.extend_from_slice(&(arg as u32).to_be_bytes());
    } else {
        out.push(mt | PAYLOAD_EIGHT_BYTES);
        out.extend_from_slice(&arg.to_be_bytes());
    }
}

impl CBOR {
    /// Append the encoding of this item to `out`.
    pub fn encode(&self, out: &mut Vec<u8>) -> Result<()> {
        match self.value() {
            Value::Int(v) => {
                encode_signed(out, *v as i64);
                Ok(())
            }
            Value::Long(v) => {
                encode_signed(out, *v);
                Ok(())
            }
            Value::BigNum(v) => {
                encode_bignum(out, v);
                Ok(())
            }
            Value::Float32(v) => {
                out.push(MT_FLOAT | PAYLOAD_FOUR_BYTES);
                out.extend_from_slice(&v.to_be_bytes());
                Ok(())
            }
            Value::Float64(v) => {
                out.push(MT_FLOAT | PAYLOAD_EIGHT_BYTES);
                out.extend_from_slice(&v.to_be_bytes());
                Ok(())
            }
            Value::Bstr(b) => {
                encode_head(out, MT_BSTR, b.len() as u64);
                out.extend_from_slice(b.as_slice());
                Ok(())
            }
            Value::Tstr(s) => {
                encode_head(out, MT_TSTR, s.len() as u64);
                out.extend_from_slice(s.as_bytes());
                Ok(())
            }
            Value::Uri(u) => {
                // A URI item re-encodes as its originating tag 32 form
                encode_head(out, MT_TAG, TAG_URI);
                encode_head(out, MT_TSTR, u.as_str().len() as u64);
                out.extend_from_slice(u.as_str().as_bytes());
                Ok(())
            }
            Value::Array(items) => {
                encode_head(out, MT_ARRAY, items.len() as u64);
                for item in items {
                    item.encode(out)?;
                }
                Ok(())
            }
            Value::Map(pairs) => {
                encode_head(out, MT_MAP, pairs.len() as u64);
                for (key, value) in pairs {
                    key.encode(out)?;
                    value.encode(out)?;
                }
                Ok(())
            }
            Value::Tagged(tag, content) => {
                encode_head(out, MT_TAG, *tag);
                content.encode(out)
            }
            Value::Simple(code) => match *code {
                20..=31 => Err(CBORError::ReservedSimpleValue(*code)),
                v if v < 24 => {
                    out.push(MT_SIMPLE | v);
                    Ok(())
                }
                v => {
                    out.push(MT_SIMPLE | PAYLOAD_ONE_BYTE);
                    out.push(v);
                    Ok(())
                }
            },
            Value::False => {
                out.push(MT_SIMPLE | SV_FALSE);
                Ok(())
            }
            Value::True => {
                out.push(MT_SIMPLE | SV_TRUE);
                Ok(())
            }
            Value::Null => {
                out.push(MT_SIMPLE | SV_NULL);
                Ok(())
            }
            Value::Undefined => {
                out.push(MT_SIMPLE | SV_UNDEFINED);
                Ok(())
            }
            Value::Break => {
                out.push(MT_SIMPLE | PAYLOAD_INDEFINITE);
                Ok(())
            }
        }
    }

    /// Encode this item into a fresh buffer.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.encode(&mut out)?;
        Ok(out)
    }
}

/// Encode a signed value as Major Type 0 or, for negative values, Major Type 1 over `-1 - n`.
fn encode_signed(out: &mut Vec<u8>, v: i64) {
    if v < 0 {
        encode_head(out, MT_NINT, (-1 - v) as u64);
    } else {
        encode_head(out, MT_UINT, v as u64);
    }
}

/// Encode an arbitrary-precision integer: Major Type 0/1 when the argument fits 64 unsigned
/// bits, otherwise tag 2/3 over the big-endian magnitude bytes.
fn encode_bignum(out: &mut Vec<u8>, v: &BigInt) {
    if v.sign() == num_bigint::Sign::Minus {
        let magnitude = BigInt::from(-1) - v;
        match magnitude.to_u64() {
            Some(arg) => encode_head(out, MT_NINT, arg),
            None => {
                encode_head(out, MT_TAG, TAG_NEGATIVE_BIGNUM);
                let bytes = magnitude_bytes(&magnitude);
                encode_head(out, MT_BSTR, bytes.len() as u64);
                out.extend_from_slice(&bytes);
            }
        }
    } else {
        match v.to_u64() {
            Some(arg) => encode_head(out, MT_UINT, arg),
            None => {
                encode_head(out, MT_TAG, TAG_UNSIGNED_BIGNUM);
                let bytes = magnitude_bytes(v);
                encode_head(out, MT_BSTR, bytes.len() as u64);
                out.extend_from_slice(&bytes);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heads_use_the_preferred_serialization() {
        let mut out = Vec::new();
        encode_head(&mut out, MT_UINT, 23);
        encode_head(&mut out, MT_UINT, 24);
        encode_head(&mut out, MT_UINT, 256);
        encode_head(&mut out, MT_UINT, 65536);
        assert_eq!(
            out,
            vec![0x17, 0x18, 0x18, 0x19, 0x01, 0x00, 0x1a, 0x00, 0x01, 0x00, 0x00]
        );
    }

    #[test]
    fn bignum_beyond_u64_uses_tag_2() {
        let v = CBOR::bignum(BigInt::from(u64::MAX) + 1);
        assert_eq!(
            v.to_bytes().unwrap(),
            vec![0xc2, 0x49, 0x01, 0, 0, 0, 0, 0, 0, 0, 0]
        );
    }

    #[test]
    fn negative_bignum_within_u64_uses_major_type_1() {
        // -2^64 encodes as 3b ffff... because -1 - n = 2^64 - 1 fits the 8-byte argument
        let v = CBOR::bignum(-(BigInt::from(u64::MAX) + 1u64));
        assert_eq!(
            v.to_bytes().unwrap(),
            vec![0x3b, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]
        );
    }

    #[test]
    fn break_is_the_stop_code() {
        let v = CBOR::new(Value::Break);
        assert_eq!(v.to_bytes().unwrap(), vec![0xff]);
    }
}
