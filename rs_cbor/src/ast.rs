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
 * CBOR Abstract Syntax Tree
 *
 * The owned value tree produced by the decoder and consumed by the encoder. An item owns its
 * children by value; byte and text strings own their buffers. Items are immutable after
 * construction except for the comment, which is presentation metadata used by the diagnostic
 * formatter and is excluded from equality.
 **************************************************************************************************/
use std::convert::TryFrom;
use std::fmt;

use num_bigint::{BigInt, Sign};
use num_traits::ToPrimitive;
use once_cell::sync::OnceCell;

use crate::decode::decode_embedded;
use crate::error::{CBORError, Result};

/// A byte string which owns its buffer and optionally caches a parse of that buffer as embedded
/// CBOR items. The cache is populated on the first call to [`Bytes::decoded_content`] and is used
/// for tag 24 ("encoded CBOR data item") rendering and for COSE payloads carrying embedded CBOR.
///
/// Equality considers the raw bytes only.
#[derive(Clone)]
pub struct Bytes {
    raw: Vec<u8>,
    decoded: OnceCell<Option<Vec<CBOR>>>,
}

impl Bytes {
    /// Wrap a buffer.
    pub fn new(raw: Vec<u8>) -> Bytes {
        Bytes {
            raw,
            decoded: OnceCell::new(),
        }
    }

    /// The raw bytes.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.raw
    }

    /// Length of the raw bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// True if the byte string is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Consume the wrapper, returning the buffer.
    pub fn into_vec(self) -> Vec<u8> {
        self.raw
    }

    /// The content of the byte string decoded as a sequence of CBOR items, or `None` if the
    /// bytes are not well-formed CBOR. The result is computed once and cached; decoding uses
    /// the default tag registry.
    pub fn decoded_content(&self) -> Option<&[CBOR]> {
        self.decoded
            .get_or_init(|| decode_embedded(&self.raw).ok())
            .as_deref()
    }
}

impl fmt::Debug for Bytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bytes(h'")?;
        for b in &self.raw {
            write!(f, "{:02x}", b)?;
        }
        write!(f, "')")
    }
}

impl PartialEq for Bytes {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for Bytes {}

/// A text string carrying a decoded URI, produced by the tag 32 processor.
///
/// Equality considers the original text only.
#[derive(Clone, Debug)]
pub struct Uri {
    text: String,
    parsed: url::Url,
}

impl Uri {
    /// Parse `text` as a URI. Malformed input is a decode error.
    pub fn parse(text: impl Into<String>) -> Result<Uri> {
        let text = text.into();
        match url::Url::parse(&text) {
            Ok(parsed) => Ok(Uri { text, parsed }),
            Err(e) => Err(CBORError::MalformedUri(e.to_string())),
        }
    }

    /// The original text form.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The parsed URI.
    #[inline]
    pub fn url(&self) -> &url::Url {
        &self.parsed
    }
}

impl PartialEq for Uri {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for Uri {}

/// The data type for CBOR items.
///
/// Integers use the narrowest of three representations: `Int` when the value fits a signed
/// 32-bit integer, `Long` when it fits a signed 64-bit integer, and `BigNum` otherwise. The
/// decoder, the bignum tag processors and all `From` constructors apply the same narrowing, so
/// structural equality is independent of how a value was produced.
///
/// `Break` is not a data item: it terminates indefinite-length containers during decoding and is
/// an error anywhere else. It is representable so that the stop code can be emitted explicitly.
#[derive(Clone, Debug)]
pub enum Value {
    /// Integer within the signed 32-bit range.
    Int(i32),
    /// Integer within the signed 64-bit range, outside the 32-bit range.
    Long(i64),
    /// Arbitrary-precision integer outside the signed 64-bit range.
    BigNum(BigInt),
    /// Single-precision float. Half-precision input is expanded to this variant.
    Float32(f32),
    /// Double-precision float.
    Float64(f64),
    /// Byte string with optional cached decoded content.
    Bstr(Bytes),
    /// Text string (valid UTF-8).
    Tstr(String),
    /// Text string carrying a decoded URI (tag 32).
    Uri(Uri),
    /// Ordered sequence of items.
    Array(Vec<CBOR>),
    /// Ordered sequence of key/value pairs. Insertion order is preserved end to end; duplicate
    /// keys are permitted at this layer.
    Map(Vec<(CBOR, CBOR)>),
    /// Tag number wrapping exactly one child item.
    Tagged(u64, Box<CBOR>),
    /// Simple value with code 0-19 or 32-255.
    Simple(u8),
    /// Simple value 20.
    False,
    /// Simple value 21.
    True,
    /// Simple value 22.
    Null,
    /// Simple value 23.
    Undefined,
    /// The `break` stop code.
    Break,
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        use Value::*;
        match (self, other) {
            (Int(a), Int(b)) => a == b,
            (Long(a), Long(b)) => a == b,
            (BigNum(a), BigNum(b)) => a == b,
            // Bitwise comparison keeps equality total and makes NaN equal itself
            (Float32(a), Float32(b)) => a.to_bits() == b.to_bits(),
            (Float64(a), Float64(b)) => a.to_bits() == b.to_bits(),
            (Bstr(a), Bstr(b)) => a == b,
            (Tstr(a), Tstr(b)) => a == b,
            (Uri(a), Uri(b)) => a == b,
            (Array(a), Array(b)) => a == b,
            (Map(a), Map(b)) => a == b,
            (Tagged(t, a), Tagged(u, b)) => t == u && a == b,
            (Simple(a), Simple(b)) => a == b,
            (False, False) | (True, True) | (Null, Null) | (Undefined, Undefined) => true,
            (Break, Break) => true,
            _ => false,
        }
    }
}

impl Eq for Value {}

/// A single CBOR item: a [`Value`] plus an optional human-readable comment.
///
/// The comment is rendered by the diagnostic formatter as a `/ comment /` prefix and takes no
/// part in equality or encoding.
#[derive(Clone, Debug, Eq)]
pub struct CBOR {
    value: Value,
    comment: Option<String>,
}

impl PartialEq for CBOR {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl CBOR {
    /// Construct an item from a value, with no comment.
    pub fn new(value: Value) -> CBOR {
        CBOR {
            value,
            comment: None,
        }
    }

    /// The value of this item.
    #[inline]
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Consume the item, returning its value.
    pub fn into_value(self) -> Value {
        self.value
    }

    /// The comment attached to this item, if any.
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Attach or replace the comment on this item.
    pub fn set_comment(&mut self, comment: impl Into<String>) {
        self.comment = Some(comment.into());
    }

    /// Remove the comment from this item.
    pub fn clear_comment(&mut self) {
        self.comment = None;
    }

    /// Builder form of [`CBOR::set_comment`].
    pub fn with_comment(mut self, comment: impl Into<String>) -> CBOR {
        self.comment = Some(comment.into());
        self
    }

    /// An integer item using the narrowest representation for `v`.
    pub fn integer(v: i128) -> CBOR {
        CBOR::new(narrow_i128(v))
    }

    /// An integer item from an arbitrary-precision value, narrowed where possible.
    pub fn bignum(v: BigInt) -> CBOR {
        CBOR::new(narrow_big(v))
    }

    /// A byte-string item.
    pub fn bytes(v: impl Into<Vec<u8>>) -> CBOR {
        CBOR::new(Value::Bstr(Bytes::new(v.into())))
    }

    /// A text-string item.
    pub fn text(v: impl Into<String>) -> CBOR {
        CBOR::new(Value::Tstr(v.into()))
    }

    /// An array item.
    pub fn array(items: Vec<CBOR>) -> CBOR {
        CBOR::new(Value::Array(items))
    }

    /// A map item over ordered key/value pairs.
    pub fn map(pairs: Vec<(CBOR, CBOR)>) -> CBOR {
        CBOR::new(Value::Map(pairs))
    }

    /// A tagged item.
    pub fn tagged(tag: u64, content: CBOR) -> CBOR {
        CBOR::new(Value::Tagged(tag, Box::new(content)))
    }

    /// A simple value. Codes 20-31 are reserved and rejected: 20-23 are the boolean, null and
    /// undefined items, 24-31 belong to the head-byte encoding.
    pub fn simple(code: u8) -> Result<CBOR> {
        match code {
            20..=31 => Err(CBORError::ReservedSimpleValue(code)),
            _ => Ok(CBOR::new(Value::Simple(code))),
        }
    }

    /// A URI item; fails on malformed input.
    pub fn uri(text: impl Into<String>) -> Result<CBOR> {
        Ok(CBOR::new(Value::Uri(Uri::parse(text)?)))
    }

    /// The `null` item.
    pub fn null() -> CBOR {
        CBOR::new(Value::Null)
    }

    /// The `undefined` item.
    pub fn undefined() -> CBOR {
        CBOR::new(Value::Undefined)
    }

    /// True if this item is `null`.
    pub fn is_null(&self) -> bool {
        matches!(self.value, Value::Null)
    }

    /// The integer value if this is an `Int` or `Long` item.
    pub fn as_int(&self) -> Option<i64> {
        match self.value {
            Value::Int(v) => Some(v as i64),
            Value::Long(v) => Some(v),
            _ => None,
        }
    }

    /// The raw bytes if this is a byte-string item.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match &self.value {
            Value::Bstr(b) => Some(b.as_slice()),
            _ => None,
        }
    }

    /// The text if this is a text-string or URI item.
    pub fn as_text(&self) -> Option<&str> {
        match &self.value {
            Value::Tstr(s) => Some(s),
            Value::Uri(u) => Some(u.as_str()),
            _ => None,
        }
    }

    /// The items if this is an array.
    pub fn as_array(&self) -> Option<&[CBOR]> {
        match &self.value {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// The pairs if this is a map.
    pub fn as_map(&self) -> Option<&[(CBOR, CBOR)]> {
        match &self.value {
            Value::Map(pairs) => Some(pairs),
            _ => None,
        }
    }

    /// The tag number and content if this is a tagged item.
    pub fn as_tagged(&self) -> Option<(u64, &CBOR)> {
        match &self.value {
            Value::Tagged(tag, content) => Some((*tag, content)),
            _ => None,
        }
    }

    /// The boolean value if this is `true` or `false`.
    pub fn as_bool(&self) -> Option<bool> {
        match self.value {
            Value::True => Some(true),
            Value::False => Some(false),
            _ => None,
        }
    }

    /// Strip any number of tag wrappers, returning the terminal item.
    pub fn untagged(&self) -> &CBOR {
        let mut item = self;
        while let Value::Tagged(_, content) = &item.value {
            item = content;
        }
        item
    }

    /// A language-neutral rendering of this item as a JSON value. Integers become numbers
    /// (bignums become decimal strings), byte strings become base64url text, map keys are
    /// stringified, tags are transparent, and non-finite floats become their diagnostic names.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value as Json;
        match &self.value {
            Value::Int(v) => Json::from(*v),
            Value::Long(v) => Json::from(*v),
            Value::BigNum(v) => Json::String(v.to_str_radix(10)),
            Value::Float32(v) => json_float(*v as f64),
            Value::Float64(v) => json_float(*v),
            Value::Bstr(b) => Json::String(base64_url::encode(b.as_slice())),
            Value::Tstr(s) => Json::String(s.clone()),
            Value::Uri(u) => Json::String(u.as_str().to_owned()),
            Value::Array(items) => Json::Array(items.iter().map(CBOR::to_json).collect()),
            Value::Map(pairs) => {
                let mut object = serde_json::Map::new();
                for (k, v) in pairs {
                    object.insert(k.json_key(), v.to_json());
                }
                Json::Object(object)
            }
            Value::Tagged(_, content) => content.to_json(),
            Value::Simple(v) => Json::from(*v),
            Value::False => Json::Bool(false),
            Value::True => Json::Bool(true),
            Value::Null | Value::Undefined | Value::Break => Json::Null,
        }
    }

    /// Map keys rendered as JSON object keys: text as-is, integers in decimal, anything else in
    /// diagnostic notation.
    fn json_key(&self) -> String {
        match &self.value {
            Value::Tstr(s) => s.clone(),
            Value::Int(v) => v.to_string(),
            Value::Long(v) => v.to_string(),
            Value::BigNum(v) => v.to_str_radix(10),
            _ => self.to_diagnostic(),
        }
    }
}

fn json_float(v: f64) -> serde_json::Value {
    match serde_json::Number::from_f64(v) {
        Some(n) => serde_json::Value::Number(n),
        None if v.is_nan() => serde_json::Value::String("NaN".into()),
        None if v > 0.0 => serde_json::Value::String("Infinity".into()),
        None => serde_json::Value::String("-Infinity".into()),
    }
}

/***************************************************************************************************
 * Integer narrowing
 **************************************************************************************************/

/// Narrow a signed value to the smallest integer variant that holds it.
pub(crate) fn narrow_i128(v: i128) -> Value {
    if let Ok(v) = i32::try_from(v) {
        Value::Int(v)
    } else if let Ok(v) = i64::try_from(v) {
        Value::Long(v)
    } else {
        Value::BigNum(BigInt::from(v))
    }
}

/// Narrow an unsigned head argument. Values above `i64::MAX` use the arbitrary-precision form.
pub(crate) fn narrow_u64(v: u64) -> Value {
    narrow_i128(v as i128)
}

/// Narrow an arbitrary-precision value, returning the narrowest variant. This is applied after
/// bignum tag processing so that equality between decoded and re-encoded trees holds.
pub(crate) fn narrow_big(v: BigInt) -> Value {
    match v.to_i128() {
        Some(n) => narrow_i128(n),
        None => Value::BigNum(v),
    }
}

/// The arbitrary-precision value of any integer variant.
pub(crate) fn integer_value(value: &Value) -> Option<BigInt> {
    match value {
        Value::Int(v) => Some(BigInt::from(*v)),
        Value::Long(v) => Some(BigInt::from(*v)),
        Value::BigNum(v) => Some(v.clone()),
        _ => None,
    }
}

/// The magnitude bytes of a non-negative arbitrary-precision value, big-endian.
pub(crate) fn magnitude_bytes(v: &BigInt) -> Vec<u8> {
    let (sign, bytes) = v.to_bytes_be();
    debug_assert!(sign != Sign::Minus);
    bytes
}

/***************************************************************************************************
 * Standard Trait Implementations: From value to CBOR. Always succeeds
 **************************************************************************************************/

/// Convert a bool into CBOR
impl From<bool> for CBOR {
    #[inline]
    fn from(v: bool) -> Self {
        CBOR::new(if v { Value::True } else { Value::False })
    }
}

/// Convert a u8 into CBOR
impl From<u8> for CBOR {
    #[inline]
    fn from(v: u8) -> Self {
        CBOR::new(Value::Int(v as i32))
    }
}

/// Convert a u16 into CBOR
impl From<u16> for CBOR {
    #[inline]
    fn from(v: u16) -> Self {
        CBOR::new(Value::Int(v as i32))
    }
}

/// Convert a u32 into CBOR
impl From<u32> for CBOR {
    #[inline]
    fn from(v: u32) -> Self {
        CBOR::new(narrow_i128(v as i128))
    }
}

/// Convert a u64 into CBOR
impl From<u64> for CBOR {
    #[inline]
    fn from(v: u64) -> Self {
        CBOR::new(narrow_u64(v))
    }
}

/// Convert an i8 into CBOR
impl From<i8> for CBOR {
    #[inline]
    fn from(v: i8) -> Self {
        CBOR::new(Value::Int(v as i32))
    }
}

/// Convert an i16 into CBOR
impl From<i16> for CBOR {
    #[inline]
    fn from(v: i16) -> Self {
        CBOR::new(Value::Int(v as i32))
    }
}

/// Convert an i32 into CBOR
impl From<i32> for CBOR {
    #[inline]
    fn from(v: i32) -> Self {
        CBOR::new(Value::Int(v))
    }
}

/// Convert an i64 into CBOR
impl From<i64> for CBOR {
    #[inline]
    fn from(v: i64) -> Self {
        CBOR::new(narrow_i128(v as i128))
    }
}

/// Convert an i128 into CBOR
impl From<i128> for CBOR {
    #[inline]
    fn from(v: i128) -> Self {
        CBOR::new(narrow_i128(v))
    }
}

/// Convert a BigInt into CBOR, narrowing where possible
impl From<BigInt> for CBOR {
    #[inline]
    fn from(v: BigInt) -> Self {
        CBOR::new(narrow_big(v))
    }
}

/// Convert an f32 into CBOR
impl From<f32> for CBOR {
    #[inline]
    fn from(v: f32) -> Self {
        CBOR::new(Value::Float32(v))
    }
}

/// Convert an f64 into CBOR
impl From<f64> for CBOR {
    #[inline]
    fn from(v: f64) -> Self {
        CBOR::new(Value::Float64(v))
    }
}

/// Convert an &str into CBOR. The text is copied into the item.
impl From<&str> for CBOR {
    #[inline]
    fn from(v: &str) -> Self {
        CBOR::new(Value::Tstr(v.to_owned()))
    }
}

/// Convert a String into CBOR
impl From<String> for CBOR {
    #[inline]
    fn from(v: String) -> Self {
        CBOR::new(Value::Tstr(v))
    }
}

/// Convert an &[u8] into CBOR. The bytes are copied into the item.
impl From<&[u8]> for CBOR {
    #[inline]
    fn from(v: &[u8]) -> Self {
        CBOR::new(Value::Bstr(Bytes::new(v.to_vec())))
    }
}

/// Convert a Vec<u8> into CBOR
impl From<Vec<u8>> for CBOR {
    #[inline]
    fn from(v: Vec<u8>) -> Self {
        CBOR::new(Value::Bstr(Bytes::new(v)))
    }
}

/***************************************************************************************************
 * Standard Trait Implementations: Try to convert CBOR into a value. Always fallible
 **************************************************************************************************/

fn item_as_i128(item: &CBOR) -> Result<i128> {
    match item.value() {
        Value::Int(v) => Ok(*v as i128),
        Value::Long(v) => Ok(*v as i128),
        Value::BigNum(v) => v.to_i128().ok_or(CBORError::OutOfRange),
        _ => Err(CBORError::IncompatibleType),
    }
}

macro_rules! try_from_integer {
    ($($t:ty),*) => {
        $(
            impl TryFrom<&CBOR> for $t {
                type Error = CBORError;

                /// Fails with `OutOfRange` when the value does not fit, and with
                /// `IncompatibleType` when the item is not an integer.
                fn try_from(item: &CBOR) -> Result<Self> {
                    let v = item_as_i128(item)?;
                    <$t>::try_from(v).map_err(|_| CBORError::OutOfRange)
                }
            }
        )*
    };
}

try_from_integer!(u8, u16, u32, u64, i8, i16, i32, i64);

impl TryFrom<&CBOR> for i128 {
    type Error = CBORError;

    fn try_from(item: &CBOR) -> Result<Self> {
        item_as_i128(item)
    }
}

impl TryFrom<&CBOR> for BigInt {
    type Error = CBORError;

    fn try_from(item: &CBOR) -> Result<Self> {
        integer_value(item.value()).ok_or(CBORError::IncompatibleType)
    }
}

/// Attempt to convert CBOR into bool
impl TryFrom<&CBOR> for bool {
    type Error = CBORError;

    fn try_from(item: &CBOR) -> Result<Self> {
        item.as_bool().ok_or(CBORError::IncompatibleType)
    }
}

/// Attempt to convert CBOR into f32. Only the single-precision variant converts.
impl TryFrom<&CBOR> for f32 {
    type Error = CBORError;

    fn try_from(item: &CBOR) -> Result<Self> {
        match item.value() {
            Value::Float32(v) => Ok(*v),
            _ => Err(CBORError::IncompatibleType),
        }
    }
}

/// Attempt to convert CBOR into f64. Single-precision values widen losslessly.
impl TryFrom<&CBOR> for f64 {
    type Error = CBORError;

    fn try_from(item: &CBOR) -> Result<Self> {
        match item.value() {
            Value::Float32(v) => Ok(*v as f64),
            Value::Float64(v) => Ok(*v),
            _ => Err(CBORError::IncompatibleType),
        }
    }
}

/// Attempt to convert a CBOR item into a borrowed str
impl<'a> TryFrom<&'a CBOR> for &'a str {
    type Error = CBORError;

    fn try_from(item: &'a CBOR) -> Result<Self> {
        item.as_text().ok_or(CBORError::IncompatibleType)
    }
}

/// Attempt to convert a CBOR item into an owned String
impl TryFrom<&CBOR> for String {
    type Error = CBORError;

    fn try_from(item: &CBOR) -> Result<Self> {
        item.as_text()
            .map(str::to_owned)
            .ok_or(CBORError::IncompatibleType)
    }
}

/// Attempt to convert a CBOR item into a borrowed byte slice
impl<'a> TryFrom<&'a CBOR> for &'a [u8] {
    type Error = CBORError;

    fn try_from(item: &'a CBOR) -> Result<Self> {
        item.as_bytes().ok_or(CBORError::IncompatibleType)
    }
}

/// Attempt to convert a CBOR item into an owned byte vector
impl TryFrom<&CBOR> for Vec<u8> {
    type Error = CBORError;

    fn try_from(item: &CBOR) -> Result<Self> {
        item.as_bytes()
            .map(<[u8]>::to_vec)
            .ok_or(CBORError::IncompatibleType)
    }
}
