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
 * rs_cbor CBOR Error API
 *
 * Error definitions for decoding, encoding and conversion of CBOR items. Decode errors carry the
 * byte offset at which the tokenizer detected the problem.
 **************************************************************************************************/
use std::result;

use thiserror::Error;

/// An alias for Result<T, CBORError> used throughout this crate.
pub type Result<T> = result::Result<T, CBORError>;

/// `CBORError` provides information about errors decoding, encoding or converting CBOR items.
#[derive(Clone, Error, Debug, PartialEq, Eq)]
pub enum CBORError {
    /// The input ended in the middle of an item. The context names the construct being read.
    #[error("input ended at offset {0} while reading {1}")]
    InsufficientData(usize, &'static str),
    /// The input source reported an I/O failure.
    #[error("i/o error at offset {0}: {1}")]
    Io(usize, String),
    /// A tstr contains an invalid UTF8 sequence.
    #[error("text string ending at offset {0} contains an invalid UTF8 sequence")]
    MalformedUtf8(usize),
    /// A simple value was encoded with a reserved code (20-31 in two-byte form).
    #[error("simple value {1} at offset {0} uses a reserved code")]
    InvalidSimpleValue(usize, u8),
    /// A simple value outside the valid 0-19/32-255 code space was constructed or encoded.
    #[error("simple value {0} uses a reserved code")]
    ReservedSimpleValue(u8),
    /// A declared length cannot be addressed by this implementation.
    #[error("declared length {1} at offset {0} exceeds the addressable range")]
    TooLong(usize, u64),
    /// The Additional Information bits 28-30 are reserved.
    #[error("reserved additional information value {1} at offset {0}")]
    ReservedAdditionalInfo(usize, u8),
    /// A `break` stop code appeared outside an indefinite-length item.
    #[error("break stop code at offset {0} is not allowed here")]
    UnexpectedBreak(usize),
    /// An item of the wrong kind appeared. The context names the construct being read.
    #[error("unexpected item at offset {0} while reading {1}")]
    UnexpectedToken(usize, &'static str),
    /// Input remained after the single expected item.
    #[error("trailing data at offset {0} after the decoded item")]
    TrailingData(usize),
    /// A tag processor received content of the wrong kind.
    #[error("tag {0} expects {1}")]
    TagContentMismatch(u64, &'static str),
    /// A registered tag processor rejected its content for reasons of its own. Carries the
    /// processor's rendering of the failure.
    #[error("tag {0} content is not valid: {1}")]
    TagProcessorFailure(u64, String),
    /// Tag 32 content did not parse as a URI.
    #[error("tag 32 does not contain a valid URI: {0}")]
    MalformedUri(String),
    /// A diagnostic notation parser plug-in rejected its input.
    #[error("diagnostic notation rejected: {0}")]
    DiagnosticNotation(String),
    /// Attempt to convert an item to an incompatible type.
    #[error("attempt to convert an item of incompatible type")]
    IncompatibleType,
    /// A number conversion has overflowed or underflowed.
    #[error("overflow or underflow in number conversion")]
    OutOfRange,
}
