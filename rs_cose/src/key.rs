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
 * COSE key model
 *
 * A key is a CBOR map over integer labels. The common parameters are validated for every key;
 * the EC2 and OKP key types get typed views used by the signature machinery, and the remaining
 * registered types are kept as raw pairs. A key is private iff it carries the private-material
 * label for its kind.
 **************************************************************************************************/
use rs_cbor::types::{Value, CBOR};

use crate::constants::*;
use crate::error::{COSEError, Result};
use crate::header::Label;

/// A validated COSE key map.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoseKey {
    pairs: Vec<(Label, CBOR)>,
}

impl CoseKey {
    /// Validate ordered label/value pairs as a key. `kty` is mandatory, labels must be unique,
    /// and the common parameters are type checked.
    pub fn from_pairs(pairs: Vec<(Label, CBOR)>) -> Result<CoseKey> {
        for (index, (label, value)) in pairs.iter().enumerate() {
            if pairs[..index].iter().any(|(seen, _)| seen == label) {
                return Err(COSEError::DuplicateLabel(label.clone()));
            }
            validate_common(label, value)?;
        }
        let key = CoseKey { pairs };
        if key.get_int(KP_KTY).is_none() {
            return Err(COSEError::Structural("COSE key", "kty is mandatory"));
        }
        Ok(key)
    }

    /// Build a key from a decoded CBOR map.
    pub fn from_cbor(item: &CBOR) -> Result<CoseKey> {
        let source = item
            .as_map()
            .ok_or(COSEError::Structural("COSE key", "must be a CBOR map"))?;
        let pairs = source
            .iter()
            .map(|(label, value)| Ok((Label::from_cbor(label)?, value.clone())))
            .collect::<Result<Vec<_>>>()?;
        CoseKey::from_pairs(pairs)
    }

    /// Decode a key from bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<CoseKey> {
        CoseKey::from_cbor(&CBOR::from_bytes(bytes)?)
    }

    /// An EC2 key from raw coordinates.
    pub fn ec2(curve: Curve, x: Vec<u8>, y: Ec2Y, d: Option<Vec<u8>>) -> Result<CoseKey> {
        let mut pairs = vec![
            (Label::Int(KP_KTY), CBOR::from(KTY_EC2)),
            (Label::Int(EC2_CRV), CBOR::from(curve.id())),
            (Label::Int(EC2_X), CBOR::from(x)),
            (
                Label::Int(EC2_Y),
                match y {
                    Ec2Y::Coordinate(bytes) => CBOR::from(bytes),
                    Ec2Y::SignBit(bit) => CBOR::from(bit),
                },
            ),
        ];
        if let Some(d) = d {
            pairs.push((Label::Int(EC2_D), CBOR::from(d)));
        }
        CoseKey::from_pairs(pairs)
    }

    /// An OKP key from its public and/or private bytes.
    pub fn okp(curve: Curve, x: Option<Vec<u8>>, d: Option<Vec<u8>>) -> Result<CoseKey> {
        let mut pairs = vec![
            (Label::Int(KP_KTY), CBOR::from(KTY_OKP)),
            (Label::Int(OKP_CRV), CBOR::from(curve.id())),
        ];
        if let Some(x) = x {
            pairs.push((Label::Int(OKP_X), CBOR::from(x)));
        }
        if let Some(d) = d {
            pairs.push((Label::Int(OKP_D), CBOR::from(d)));
        }
        CoseKey::from_pairs(pairs)
    }

    /// The value stored under `label`, if any.
    pub fn get(&self, label: &Label) -> Option<&CBOR> {
        self.pairs
            .iter()
            .find(|(candidate, _)| candidate == label)
            .map(|(_, value)| value)
    }

    /// The value stored under an integer label, if any.
    pub fn get_int(&self, id: i64) -> Option<&CBOR> {
        self.get(&Label::Int(id))
    }

    /// The ordered label/value pairs.
    pub fn pairs(&self) -> &[(Label, CBOR)] {
        &self.pairs
    }

    /// The numeric key type, when `kty` is in integer form.
    pub fn kty(&self) -> Option<i64> {
        self.get_int(KP_KTY).and_then(CBOR::as_int)
    }

    /// The key identifier bytes.
    pub fn kid(&self) -> Option<&[u8]> {
        self.get_int(KP_KID).and_then(CBOR::as_bytes)
    }

    /// The algorithm parameter as stored.
    pub fn alg(&self) -> Option<&CBOR> {
        self.get_int(KP_ALG)
    }

    /// The permitted key operations.
    pub fn key_ops(&self) -> Option<&[CBOR]> {
        self.get_int(KP_KEY_OPS).and_then(CBOR::as_array)
    }

    /// The base initialization vector bytes.
    pub fn base_iv(&self) -> Option<&[u8]> {
        self.get_int(KP_BASE_IV).and_then(CBOR::as_bytes)
    }

    /// True iff the key carries the private-material parameter for its kind.
    pub fn is_private(&self) -> bool {
        match self.kty() {
            Some(KTY_EC2) => self.get_int(EC2_D).is_some(),
            Some(KTY_OKP) => self.get_int(OKP_D).is_some(),
            Some(KTY_RSA) => self.get_int(RSA_D).is_some(),
            Some(KTY_SYMMETRIC) => self.get_int(SYMMETRIC_K).is_some(),
            _ => false,
        }
    }

    /// The typed view selected by `kty`. EC2 and OKP keys are parsed into coordinate records;
    /// the remaining registered types stay as raw pairs on this key.
    pub fn typed(&self) -> Result<TypedKey> {
        match self.kty() {
            Some(KTY_OKP) => Ok(TypedKey::Okp(OkpKey::from_key(self)?)),
            Some(KTY_EC2) => Ok(TypedKey::Ec2(Ec2Key::from_key(self)?)),
            Some(KTY_RSA) => Ok(TypedKey::Rsa),
            Some(KTY_SYMMETRIC) => Ok(TypedKey::Symmetric),
            Some(KTY_HSS_LMS) => Ok(TypedKey::HssLms),
            Some(KTY_WALNUT_DSA) => Ok(TypedKey::WalnutDsa),
            Some(other) => Err(COSEError::KeyMaterial(format!(
                "unknown key type {}",
                other
            ))),
            None => Err(COSEError::KeyMaterial(
                "key type is not in integer form".into(),
            )),
        }
    }

    /// The CBOR map form of this key.
    pub fn to_cbor(&self) -> CBOR {
        CBOR::map(
            self.pairs
                .iter()
                .map(|(label, value)| (label.to_cbor(), value.clone()))
                .collect(),
        )
    }

    /// Encode this key.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(self.to_cbor().to_bytes()?)
    }
}

/// Type rules for the common key parameters; key-type parameters are validated by the typed
/// views.
fn validate_common(label: &Label, value: &CBOR) -> Result<()> {
    let id = match label {
        Label::Int(id) => *id,
        Label::Text(_) => return Ok(()),
    };
    match id {
        KP_KTY | KP_ALG => {
            if value.as_int().is_some() || value.as_text().is_some() {
                Ok(())
            } else {
                Err(COSEError::Structural(
                    "COSE key",
                    "kty and alg must be integers or text strings",
                ))
            }
        }
        KP_KID => value.as_bytes().map(|_| ()).ok_or(COSEError::Structural(
            "COSE key",
            "kid must be a byte string",
        )),
        KP_KEY_OPS => match value.as_array() {
            Some(ops)
                if !ops.is_empty()
                    && ops.iter().all(|op| op.as_int().is_some() || op.as_text().is_some()) =>
            {
                Ok(())
            }
            _ => Err(COSEError::Structural(
                "COSE key",
                "key_ops must be a non-empty array of integers or text strings",
            )),
        },
        KP_BASE_IV => value.as_bytes().map(|_| ()).ok_or(COSEError::Structural(
            "COSE key",
            "base_iv must be a byte string",
        )),
        _ => Ok(()),
    }
}

/// A key dispatched by its `kty` parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypedKey {
    /// Double-coordinate elliptic curve key.
    Ec2(Ec2Key),
    /// Octet key pair (Ed25519 and the Montgomery curves).
    Okp(OkpKey),
    /// RSA key; parameters stay as raw pairs.
    Rsa,
    /// Symmetric key; parameters stay as raw pairs.
    Symmetric,
    /// HSS-LMS key; parameters stay as raw pairs.
    HssLms,
    /// WalnutDSA key; parameters stay as raw pairs.
    WalnutDsa,
}

/// The y-coordinate of an EC2 public key: the full coordinate bytes, or the point-compression
/// sign bit. The boolean is the low bit of y, so `true` selects the SEC1 `0x03` prefix and
/// `false` the `0x02` prefix.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Ec2Y {
    /// Big-endian y coordinate.
    Coordinate(Vec<u8>),
    /// Point-compression flag carrying the low bit of y.
    SignBit(bool),
}

/// The typed view of an EC2 key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ec2Key {
    curve: Curve,
    x: Option<Vec<u8>>,
    y: Option<Ec2Y>,
    d: Option<Vec<u8>>,
}

impl Ec2Key {
    fn from_key(key: &CoseKey) -> Result<Ec2Key> {
        let curve = required_curve(key.get_int(EC2_CRV))?;
        if curve.field_len().is_none() {
            return Err(COSEError::KeyMaterial(format!(
                "curve {} is not a double-coordinate curve",
                curve
            )));
        }
        let x = optional_bytes(key.get_int(EC2_X), "x")?;
        let y = match key.get_int(EC2_Y).map(CBOR::value) {
            None => None,
            Some(Value::Bstr(bytes)) => Some(Ec2Y::Coordinate(bytes.as_slice().to_vec())),
            Some(Value::True) => Some(Ec2Y::SignBit(true)),
            Some(Value::False) => Some(Ec2Y::SignBit(false)),
            Some(_) => {
                return Err(COSEError::KeyMaterial(
                    "y must be a byte string or a boolean".into(),
                ))
            }
        };
        let d = optional_bytes(key.get_int(EC2_D), "d")?;
        Ok(Ec2Key { curve, x, y, d })
    }

    /// The curve.
    pub fn curve(&self) -> Curve {
        self.curve
    }

    /// The private scalar `d` as a fixed-width big-endian integer.
    pub fn private_scalar(&self) -> Result<Vec<u8>> {
        let d = self
            .d
            .as_ref()
            .ok_or(COSEError::MissingKey)?;
        pad_left(d, self.field_len()?)
    }

    /// The SEC1 encoding of the public point: uncompressed `04 || x || y` when the full y
    /// coordinate is present, compressed `02/03 || x` when only the sign bit is carried. The
    /// curve implementation recovers y from the compressed form by taking the modular square
    /// root; an x with no point on the curve fails there.
    pub fn sec1_public_key(&self) -> Result<Vec<u8>> {
        let len = self.field_len()?;
        let x = self
            .x
            .as_ref()
            .ok_or_else(|| COSEError::KeyMaterial("EC2 key has no x coordinate".into()))?;
        let x = pad_left(x, len)?;
        match &self.y {
            Some(Ec2Y::Coordinate(y)) => {
                let mut sec1 = Vec::with_capacity(1 + 2 * len);
                sec1.push(0x04);
                sec1.extend_from_slice(&x);
                sec1.extend_from_slice(&pad_left(y, len)?);
                Ok(sec1)
            }
            Some(Ec2Y::SignBit(bit)) => {
                let mut sec1 = Vec::with_capacity(1 + len);
                sec1.push(if *bit { 0x03 } else { 0x02 });
                sec1.extend_from_slice(&x);
                Ok(sec1)
            }
            None => Err(COSEError::KeyMaterial("EC2 key has no y coordinate".into())),
        }
    }

    fn field_len(&self) -> Result<usize> {
        self.curve.field_len().ok_or_else(|| {
            COSEError::KeyMaterial(format!("curve {} is not a double-coordinate curve", self.curve))
        })
    }
}

/// The typed view of an OKP key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OkpKey {
    curve: Curve,
    x: Option<Vec<u8>>,
    d: Option<Vec<u8>>,
}

impl OkpKey {
    fn from_key(key: &CoseKey) -> Result<OkpKey> {
        let curve = required_curve(key.get_int(OKP_CRV))?;
        let x = optional_bytes(key.get_int(OKP_X), "x")?;
        let d = optional_bytes(key.get_int(OKP_D), "d")?;
        Ok(OkpKey { curve, x, d })
    }

    /// The curve.
    pub fn curve(&self) -> Curve {
        self.curve
    }

    /// The public key bytes.
    pub fn public_key(&self) -> Result<&[u8]> {
        self.x
            .as_deref()
            .ok_or_else(|| COSEError::KeyMaterial("OKP key has no public key".into()))
    }

    /// The private key bytes.
    pub fn private_key(&self) -> Result<&[u8]> {
        self.d.as_deref().ok_or(COSEError::MissingKey)
    }
}

fn required_curve(item: Option<&CBOR>) -> Result<Curve> {
    let item = item.ok_or_else(|| COSEError::KeyMaterial("key has no curve parameter".into()))?;
    if let Some(id) = item.as_int() {
        return Curve::from_id(id)
            .ok_or_else(|| COSEError::KeyMaterial(format!("unknown curve identifier {}", id)));
    }
    if let Some(name) = item.as_text() {
        return Curve::from_name(name)
            .ok_or_else(|| COSEError::KeyMaterial(format!("unknown curve name {}", name)));
    }
    Err(COSEError::KeyMaterial(
        "curve must be an integer or a text string".into(),
    ))
}

fn optional_bytes(item: Option<&CBOR>, what: &str) -> Result<Option<Vec<u8>>> {
    match item {
        None => Ok(None),
        Some(value) => value
            .as_bytes()
            .map(|bytes| Some(bytes.to_vec()))
            .ok_or_else(|| COSEError::KeyMaterial(format!("{} must be a byte string", what))),
    }
}

/// Left-pad a big-endian integer to the curve's field width.
fn pad_left(bytes: &[u8], len: usize) -> Result<Vec<u8>> {
    let significant: &[u8] = {
        let start = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
        &bytes[start..]
    };
    if significant.len() > len {
        return Err(COSEError::KeyMaterial(
            "coordinate is wider than the curve field".into(),
        ));
    }
    let mut out = vec![0u8; len - significant.len()];
    out.extend_from_slice(significant);
    Ok(out)
}
