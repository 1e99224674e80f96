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
 * x5chain header parameter decoding
 *
 * The x5chain header value is a single DER certificate as a byte string, or a non-empty array
 * of them. Each blob is handed to the external DER decoder; chain path validation is the
 * caller's concern.
 **************************************************************************************************/
use rs_cbor::types::{Value, CBOR};
use x509_cert::der::Decode;
use x509_cert::Certificate;

use crate::error::{COSEError, Result};

/// Decode an x5chain header value into its certificates.
pub fn decode_x5chain(value: &CBOR) -> Result<Vec<Certificate>> {
    match value.value() {
        Value::Bstr(der) => Ok(vec![decode_der(der.as_slice())?]),
        Value::Array(items) => {
            if items.is_empty() {
                return Err(COSEError::Structural(
                    "x5chain",
                    "certificate array must not be empty",
                ));
            }
            items
                .iter()
                .map(|item| match item.value() {
                    Value::Bstr(der) => decode_der(der.as_slice()),
                    _ => Err(COSEError::Structural(
                        "x5chain",
                        "certificate array elements must be byte strings",
                    )),
                })
                .collect()
        }
        _ => Err(COSEError::Structural(
            "x5chain",
            "must be a byte string or an array of byte strings",
        )),
    }
}

fn decode_der(der: &[u8]) -> Result<Certificate> {
    Certificate::from_der(der).map_err(|e| COSEError::Certificate(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn an_empty_array_is_rejected() {
        assert_eq!(
            decode_x5chain(&CBOR::array(vec![])),
            Err(COSEError::Structural(
                "x5chain",
                "certificate array must not be empty"
            ))
        );
    }

    #[test]
    fn garbage_der_is_rejected() {
        assert!(matches!(
            decode_x5chain(&CBOR::bytes(vec![0x00, 0x01, 0x02])),
            Err(COSEError::Certificate(_))
        ));
    }

    #[test]
    fn non_bytes_values_are_rejected() {
        assert!(matches!(
            decode_x5chain(&CBOR::from(5)),
            Err(COSEError::Structural("x5chain", _))
        ));
    }
}
