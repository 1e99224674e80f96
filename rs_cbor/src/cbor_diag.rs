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
/// # diag - CBOR diagnostic style output for structured binary data
///
/// CBOR diagnostic notation is defined in RFC 8949 and extended slightly in RFC 8610.
///
/// ## Format recap
///
/// - `<tag> ( <data> )` is used to denote tags.
/// - uint, int and float types are formatted in their natural programming language formats.
/// - `-Infinity`, `Infinity` and `NaN` are written as you might expect.
/// - `true`, `false`, `null` and `undefined` mean what you would expect.
/// - Text strings are written "as a string" in double quotes.
/// - Byte strings are written as `h'0123456789abcdef'`.
/// - A byte string under tag 24 carries an embedded encoded item and renders as `<< ... >>`
///   over its decoded children.
/// - Comments attached to items render as `/ comment /` prefixes.
///
/// The formatter never fails: if the embedded content of a tag 24 byte string does not parse,
/// it falls back to the plain `h'...'` form.
use std::fmt;
use std::fmt::Write;

use crate::ast::{Value, CBOR};
use crate::constants::TAG_ENCODED_CBOR;

impl CBOR {
    /// Render this item in diagnostic notation. `indent` is the prefix already in force for the
    /// current line, `unit` is appended per nesting level, and `enclosing_tag` is the number of
    /// the directly-enclosing tag, which selects the `<< ... >>` rendering for byte strings
    /// under tag 24.
    pub fn prettify(&self, indent: &str, unit: &str, enclosing_tag: Option<u64>) -> String {
        let mut out = String::new();
        self.write_diag(&mut out, indent, unit, enclosing_tag);
        out
    }

    /// Render with default indentation and no enclosing tag.
    pub fn to_diagnostic(&self) -> String {
        self.prettify("", "  ", None)
    }

    fn write_diag(&self, out: &mut String, indent: &str, unit: &str, enclosing_tag: Option<u64>) {
        if let Some(comment) = self.comment() {
            let _ = write!(out, "/ {} / ", comment);
        }
        match self.value() {
            Value::Int(v) => {
                let _ = write!(out, "{}", v);
            }
            Value::Long(v) => {
                let _ = write!(out, "{}", v);
            }
            Value::BigNum(v) => {
                let _ = write!(out, "{}", v);
            }
            Value::Float32(v) => write_f64(out, *v as f64),
            Value::Float64(v) => write_f64(out, *v),
            Value::Bstr(b) => {
                if enclosing_tag == Some(TAG_ENCODED_CBOR) {
                    if let Some(items) = b.decoded_content() {
                        out.push_str("<<");
                        for (i, item) in items.iter().enumerate() {
                            if i > 0 {
                                out.push_str(", ");
                            }
                            item.write_diag(out, indent, unit, None);
                        }
                        out.push_str(">>");
                        return;
                    }
                }
                out.push_str("h'");
                out.push_str(&to_hex(b.as_slice()));
                out.push('\'');
            }
            Value::Tstr(s) => write_quoted(out, s),
            Value::Uri(u) => {
                out.push_str("32(");
                write_quoted(out, u.as_str());
                out.push(')');
            }
            Value::Array(items) => {
                if items.is_empty() {
                    out.push_str("[]");
                    return;
                }
                let inner = format!("{}{}", indent, unit);
                out.push_str("[\n");
                for (i, item) in items.iter().enumerate() {
                    out.push_str(&inner);
                    item.write_diag(out, &inner, unit, None);
                    if i + 1 < items.len() {
                        out.push(',');
                    }
                    out.push('\n');
                }
                out.push_str(indent);
                out.push(']');
            }
            Value::Map(pairs) => {
                if pairs.is_empty() {
                    out.push_str("{}");
                    return;
                }
                let inner = format!("{}{}", indent, unit);
                out.push_str("{\n");
                for (i, (key, value)) in pairs.iter().enumerate() {
                    out.push_str(&inner);
                    key.write_diag(out, &inner, unit, None);
                    out.push_str(": ");
                    value.write_diag(out, &inner, unit, None);
                    if i + 1 < pairs.len() {
                        out.push(',');
                    }
                    out.push('\n');
                }
                out.push_str(indent);
                out.push('}');
            }
            Value::Tagged(tag, content) => {
                let _ = write!(out, "{}(", tag);
                content.write_diag(out, indent, unit, Some(*tag));
                out.push(')');
            }
            Value::Simple(v) => {
                let _ = write!(out, "simple({})", v);
            }
            Value::False => out.push_str("false"),
            Value::True => out.push_str("true"),
            Value::Null => out.push_str("null"),
            Value::Undefined => out.push_str("undefined"),
            Value::Break => out.push_str("break"),
        }
    }
}

/// Diagnostic notation is the natural Display form of an item.
impl fmt::Display for CBOR {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_diagnostic())
    }
}

fn write_f64(out: &mut String, v: f64) {
    if v.is_nan() {
        out.push_str("NaN");
    } else if v.is_infinite() {
        out.push_str(if v > 0.0 { "Infinity" } else { "-Infinity" });
    } else if v == v.trunc() {
        let _ = write!(out, "{:.1}", v);
    } else {
        let _ = write!(out, "{}", v);
    }
}

fn write_quoted(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            c => out.push(c),
        }
    }
    out.push('"');
}

/// Print a byte slice as lower-case hex characters without any prefix.
pub fn to_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(out, "{:02x}", b);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalars_render_in_their_natural_form() {
        assert_eq!(CBOR::from(42).to_diagnostic(), "42");
        assert_eq!(CBOR::from(-1).to_diagnostic(), "-1");
        assert_eq!(CBOR::from(true).to_diagnostic(), "true");
        assert_eq!(CBOR::null().to_diagnostic(), "null");
        assert_eq!(CBOR::from(1.5f64).to_diagnostic(), "1.5");
        assert_eq!(CBOR::from(1.0f64).to_diagnostic(), "1.0");
        assert_eq!(CBOR::from(f64::NAN).to_diagnostic(), "NaN");
        assert_eq!(CBOR::from(f64::NEG_INFINITY).to_diagnostic(), "-Infinity");
        assert_eq!(CBOR::bytes(vec![0x01, 0xab]).to_diagnostic(), "h'01ab'");
        assert_eq!(CBOR::text("hi").to_diagnostic(), "\"hi\"");
        assert_eq!(CBOR::simple(16).unwrap().to_diagnostic(), "simple(16)");
    }

    #[test]
    fn tag_24_renders_embedded_items() {
        let item = CBOR::from_bytes(&[0xd8, 0x18, 0x42, 0x01, 0x02]).unwrap();
        assert_eq!(item.to_diagnostic(), "24(<<1, 2>>)");
    }

    #[test]
    fn tag_24_falls_back_to_hex_when_content_is_malformed() {
        let item = CBOR::from_bytes(&[0xd8, 0x18, 0x41, 0xff]).unwrap();
        assert_eq!(item.to_diagnostic(), "24(h'ff')");
    }

    #[test]
    fn comments_render_as_prefixes() {
        let item = CBOR::from(-7).with_comment("alg: ES256");
        assert_eq!(item.to_diagnostic(), "/ alg: ES256 / -7");
    }

    #[test]
    fn containers_nest_with_indentation() {
        let item = CBOR::map(vec![(CBOR::text("a"), CBOR::array(vec![CBOR::from(1)]))]);
        assert_eq!(item.to_diagnostic(), "{\n  \"a\": [\n    1\n  ]\n}");
    }
}
