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
 * JWK bridge
 *
 * A bidirectional, label-by-label mapping between COSE keys and the JSON Web Key
 * representation. Identifiers translate through fixed tables (EC2 <-> "EC", -7 <-> "ES256",
 * 1 <-> "P-256"); binary parameters travel as base64url text. A kid maps to a UTF-8 string
 * when its bytes are valid UTF-8, and to base64url otherwise.
 **************************************************************************************************/
use serde_json::{json, Map, Value as Json};

use rs_cbor::types::{Value, CBOR};

use crate::constants::*;
use crate::error::{COSEError, Result};
use crate::header::Label;
use crate::key::CoseKey;

/// The JWK `kty` names for the COSE key types that have one.
fn kty_name(id: i64) -> Option<&'static str> {
    match id {
        KTY_OKP => Some("OKP"),
        KTY_EC2 => Some("EC"),
        KTY_RSA => Some("RSA"),
        KTY_SYMMETRIC => Some("oct"),
        _ => None,
    }
}

fn kty_from_name(name: &str) -> Option<i64> {
    match name {
        "OKP" => Some(KTY_OKP),
        "EC" => Some(KTY_EC2),
        "RSA" => Some(KTY_RSA),
        "oct" => Some(KTY_SYMMETRIC),
        _ => None,
    }
}

/// The JWK `key_ops` names, indexed by the COSE key operation values 1-8.
fn key_op_name(id: i64) -> Option<&'static str> {
    match id {
        1 => Some("sign"),
        2 => Some("verify"),
        3 => Some("encrypt"),
        4 => Some("decrypt"),
        5 => Some("wrapKey"),
        6 => Some("unwrapKey"),
        7 => Some("deriveKey"),
        8 => Some("deriveBits"),
        _ => None,
    }
}

fn key_op_from_name(name: &str) -> Option<i64> {
    match name {
        "sign" => Some(1),
        "verify" => Some(2),
        "encrypt" => Some(3),
        "decrypt" => Some(4),
        "wrapKey" => Some(5),
        "unwrapKey" => Some(6),
        "deriveKey" => Some(7),
        "deriveBits" => Some(8),
        _ => None,
    }
}

/// The binary key-type parameters per JWK `kty`, with their JWK property names.
fn binary_parameters(kty: i64) -> &'static [(i64, &'static str)] {
    match kty {
        KTY_EC2 => &[(EC2_X, "x"), (EC2_Y, "y"), (EC2_D, "d")],
        KTY_OKP => &[(OKP_X, "x"), (OKP_D, "d")],
        KTY_RSA => &[
            (RSA_N, "n"),
            (RSA_E, "e"),
            (RSA_D, "d"),
            (-4, "p"),
            (-5, "q"),
            (-6, "dp"),
            (-7, "dq"),
            (-8, "qi"),
        ],
        KTY_SYMMETRIC => &[(SYMMETRIC_K, "k")],
        _ => &[],
    }
}

/// Render a COSE key as a JWK document.
pub fn to_jwk(key: &CoseKey) -> Result<Json> {
    let kty = key
        .kty()
        .ok_or_else(|| COSEError::Jwk("kty is not in integer form".into()))?;
    let kty_text =
        kty_name(kty).ok_or_else(|| COSEError::Jwk(format!("key type {} has no JWK name", kty)))?;

    let mut jwk = Map::new();
    jwk.insert("kty".into(), json!(kty_text));

    if let Some(kid) = key.kid() {
        let rendered = match std::str::from_utf8(kid) {
            Ok(text) => text.to_owned(),
            Err(_) => base64_url::encode(kid),
        };
        jwk.insert("kid".into(), json!(rendered));
    }

    if let Some(alg) = key.alg() {
        let name = match alg.value() {
            Value::Tstr(name) => name.clone(),
            _ => {
                let id = alg
                    .as_int()
                    .ok_or_else(|| COSEError::Jwk("alg must be an integer or text".into()))?;
                Algorithm::from_id(id)
                    .ok_or_else(|| COSEError::Jwk(format!("algorithm {} has no JWK name", id)))?
                    .name()
                    .to_owned()
            }
        };
        jwk.insert("alg".into(), json!(name));
    }

    if let Some(ops) = key.key_ops() {
        let mut names = Vec::new();
        for op in ops {
            match op.value() {
                Value::Tstr(name) => names.push(json!(name)),
                _ => {
                    let id = op
                        .as_int()
                        .ok_or_else(|| COSEError::Jwk("key_ops entries must be integers or text".into()))?;
                    let name = key_op_name(id)
                        .ok_or_else(|| COSEError::Jwk(format!("key operation {} has no JWK name", id)))?;
                    names.push(json!(name));
                }
            }
        }
        jwk.insert("key_ops".into(), Json::Array(names));
    }

    if matches!(kty, KTY_EC2 | KTY_OKP) {
        let crv = key
            .get_int(EC2_CRV)
            .ok_or_else(|| COSEError::Jwk("key has no curve parameter".into()))?;
        let name = match crv.value() {
            Value::Tstr(name) => name.clone(),
            _ => {
                let id = crv
                    .as_int()
                    .ok_or_else(|| COSEError::Jwk("crv must be an integer or text".into()))?;
                Curve::from_id(id)
                    .ok_or_else(|| COSEError::Jwk(format!("curve {} has no JWK name", id)))?
                    .name()
                    .to_owned()
            }
        };
        jwk.insert("crv".into(), json!(name));
    }

    for (label, name) in binary_parameters(kty) {
        if let Some(value) = key.get_int(*label) {
            let bytes = value.as_bytes().ok_or_else(|| {
                COSEError::Jwk(format!("parameter {} must be a byte string", name))
            })?;
            jwk.insert((*name).into(), json!(base64_url::encode(bytes)));
        }
    }

    Ok(Json::Object(jwk))
}

/// Build a COSE key from a JWK document.
pub fn from_jwk(jwk: &Json) -> Result<CoseKey> {
    let object = jwk
        .as_object()
        .ok_or_else(|| COSEError::Jwk("a JWK must be a JSON object".into()))?;
    let kty_text = object
        .get("kty")
        .and_then(Json::as_str)
        .ok_or_else(|| COSEError::Jwk("kty is mandatory".into()))?;
    let kty = kty_from_name(kty_text)
        .ok_or_else(|| COSEError::Jwk(format!("unknown JWK key type {}", kty_text)))?;

    let mut pairs: Vec<(Label, CBOR)> = vec![(Label::Int(KP_KTY), CBOR::from(kty))];

    if let Some(kid) = object.get("kid").and_then(Json::as_str) {
        pairs.push((Label::Int(KP_KID), CBOR::bytes(kid.as_bytes().to_vec())));
    }

    if let Some(alg) = object.get("alg").and_then(Json::as_str) {
        let value = match Algorithm::from_name(alg) {
            Some(known) => CBOR::from(known.id()),
            None => CBOR::text(alg),
        };
        pairs.push((Label::Int(KP_ALG), value));
    }

    if let Some(ops) = object.get("key_ops").and_then(Json::as_array) {
        let mut entries = Vec::new();
        for op in ops {
            let name = op
                .as_str()
                .ok_or_else(|| COSEError::Jwk("key_ops entries must be strings".into()))?;
            entries.push(match key_op_from_name(name) {
                Some(id) => CBOR::from(id),
                None => CBOR::text(name),
            });
        }
        pairs.push((Label::Int(KP_KEY_OPS), CBOR::array(entries)));
    }

    if matches!(kty, KTY_EC2 | KTY_OKP) {
        let crv_text = object
            .get("crv")
            .and_then(Json::as_str)
            .ok_or_else(|| COSEError::Jwk("crv is mandatory for EC and OKP keys".into()))?;
        let value = match Curve::from_name(crv_text) {
            Some(curve) => CBOR::from(curve.id()),
            None => CBOR::text(crv_text),
        };
        pairs.push((Label::Int(EC2_CRV), value));
    }

    for (label, name) in binary_parameters(kty) {
        if let Some(text) = object.get(*name).and_then(Json::as_str) {
            let bytes = base64_url::decode(text)
                .map_err(|e| COSEError::Jwk(format!("{} is not base64url: {}", name, e)))?;
            pairs.push((Label::Int(*label), CBOR::bytes(bytes)));
        }
    }

    CoseKey::from_pairs(pairs)
}
