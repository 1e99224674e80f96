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
 * rs_cbor module definition
 *
 * A deserializer and serializer for CBOR (RFC 8949) over an owned value tree, with a tag
 * processor registry and diagnostic notation output.
 **************************************************************************************************/

#![warn(missing_docs)]

//! # RS_CBOR
//!
//! The `rs_cbor` crate reads, writes and manipulates values encoded in the Concise Binary
//! Object Representation ([RFC 8949](https://datatracker.ietf.org/doc/rfc8949/)). It is the
//! foundation for CBOR-based containers and protocols such as COSE
//! [RFC 9052](https://datatracker.ietf.org/doc/rfc9052/) and CBOR Web Tokens.
//!
//! Decoding streams bytes through a tokenizer into an owned tree of [`types::CBOR`] items.
//! Registered tag processors rewrite tagged content during decoding: bignum tags become
//! integers, tag 32 becomes a URI item, and higher layers register their own processors (the
//! `rs_cose` crate adds the COSE message tags). Encoding mirrors the tree back to bytes with
//! preferred-serialization heads.
//!
//! ## Decoding
//!
//! ```
//! use rs_cbor::error::CBORError;
//! use rs_cbor::types::CBOR;
//!
//! fn main() -> Result<(), CBORError> {
//!     let item = CBOR::from_bytes(&[0xa1, 0x61, 0x61, 0x01])?;
//!     assert_eq!(item, CBOR::map(vec![(CBOR::text("a"), CBOR::from(1))]));
//!     assert_eq!(item.to_bytes()?, vec![0xa1, 0x61, 0x61, 0x01]);
//!     Ok(())
//! }
//! ```
//!
//! ## CBOR sequences
//!
//! A [`decoder::CBORDecoder`] yields any number of consecutive top-level items
//! (RFC 8742 CBOR sequences):
//!
//! ```
//! use rs_cbor::decoder::CBORDecoder;
//! use rs_cbor::types::CBOR;
//!
//! let mut decoder = CBORDecoder::from_slice(&[0x01, 0x62, 0x68, 0x69]);
//! assert_eq!(decoder.next_item().unwrap(), Some(CBOR::from(1)));
//! assert_eq!(decoder.next_item().unwrap(), Some(CBOR::text("hi")));
//! assert_eq!(decoder.next_item().unwrap(), None);
//! ```
//!
//! ## Diagnostic notation
//!
//! Every item renders in RFC 8949 diagnostic notation through
//! [`types::CBOR::prettify`] or plain `Display`; comments attached to items appear as
//! `/ comment /` prefixes.

pub(crate) mod ast;
mod cbor_diag;
/// Head-byte layout constants and the default tag numbers.
pub mod constants;
pub(crate) mod decode;
pub(crate) mod encode;
mod notation;
pub(crate) mod tag;
pub(crate) mod token;

/// The `error` module contains error definitions used throughout `rs_cbor`.
pub mod error;

/// The `types` module exports the main [`types::CBOR`] item structure, its [`types::Value`]
/// variants and the owned payload types.
pub mod types {
    pub use super::ast::{Bytes, Uri, Value, CBOR};
}

/// The `decoder` module exports types for decoding CBOR items from a byte source.
pub mod decoder {
    pub use super::decode::CBORDecoder;
    pub use super::token::{Token, Tokenizer};
}

/// The `encoder` module exports the head-encoding primitive; item encoding lives on
/// [`crate::types::CBOR`] itself.
pub mod encoder {
    pub use super::encode::encode_head;
}

/// The `tags` module exports the tag processor registry by which decoding is extended.
pub mod tags {
    pub use super::tag::{TagProcessor, TagRegistry};
}

/// The `diag` module exports the optional diagnostic-notation input plug-in and the hex helper
/// used by the formatter.
pub mod diag {
    pub use super::cbor_diag::to_hex;
    pub use super::notation::{
        DiagnosticNotation, DiagnosticNotationParser, DEFAULT_NOTATION_PREFIX,
    };
}
