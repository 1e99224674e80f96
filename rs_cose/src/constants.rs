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
 * rs_cose constants
 *
 * IANA-registered identifiers used by COSE: header parameter labels, key parameter labels, key
 * types, elliptic curves, signature algorithms and the CBOR tag numbers of the message types.
 **************************************************************************************************/
use std::fmt;

/// Header parameter label: algorithm identifier
pub const HP_ALG: i64 = 1;
/// Header parameter label: critical headers
pub const HP_CRIT: i64 = 2;
/// Header parameter label: content type
pub const HP_CONTENT_TYPE: i64 = 3;
/// Header parameter label: key identifier
pub const HP_KID: i64 = 4;
/// Header parameter label: full initialization vector
pub const HP_IV: i64 = 5;
/// Header parameter label: partial initialization vector
pub const HP_PARTIAL_IV: i64 = 6;
/// Header parameter label: X.509 certificate chain
pub const HP_X5CHAIN: i64 = 33;

/// Key common parameter label: key type
pub const KP_KTY: i64 = 1;
/// Key common parameter label: key identifier
pub const KP_KID: i64 = 2;
/// Key common parameter label: algorithm
pub const KP_ALG: i64 = 3;
/// Key common parameter label: permitted operations
pub const KP_KEY_OPS: i64 = 4;
/// Key common parameter label: base initialization vector
pub const KP_BASE_IV: i64 = 5;

/// Key type: Octet Key Pair
pub const KTY_OKP: i64 = 1;
/// Key type: double-coordinate elliptic curve
pub const KTY_EC2: i64 = 2;
/// Key type: RSA
pub const KTY_RSA: i64 = 3;
/// Key type: symmetric
pub const KTY_SYMMETRIC: i64 = 4;
/// Key type: HSS-LMS hash-based signature
pub const KTY_HSS_LMS: i64 = 5;
/// Key type: WalnutDSA
pub const KTY_WALNUT_DSA: i64 = 6;

/// EC2 key parameter label: curve
pub const EC2_CRV: i64 = -1;
/// EC2 key parameter label: x coordinate
pub const EC2_X: i64 = -2;
/// EC2 key parameter label: y coordinate (bytes) or point-compression sign bit (boolean)
pub const EC2_Y: i64 = -3;
/// EC2 key parameter label: private key
pub const EC2_D: i64 = -4;

/// OKP key parameter label: curve
pub const OKP_CRV: i64 = -1;
/// OKP key parameter label: public key
pub const OKP_X: i64 = -2;
/// OKP key parameter label: private key
pub const OKP_D: i64 = -4;

/// RSA key parameter label: modulus
pub const RSA_N: i64 = -1;
/// RSA key parameter label: public exponent
pub const RSA_E: i64 = -2;
/// RSA key parameter label: private exponent
pub const RSA_D: i64 = -3;

/// Symmetric key parameter label: key bytes
pub const SYMMETRIC_K: i64 = -1;

/// CBOR tag for COSE_Encrypt0
pub const TAG_COSE_ENCRYPT0: u64 = 16;
/// CBOR tag for COSE_Mac0
pub const TAG_COSE_MAC0: u64 = 17;
/// CBOR tag for COSE_Sign1
pub const TAG_COSE_SIGN1: u64 = 18;
/// CBOR tag for CBOR Web Token
pub const TAG_CWT: u64 = 61;
/// CBOR tag for COSE_Encrypt
pub const TAG_COSE_ENCRYPT: u64 = 96;
/// CBOR tag for COSE_Mac
pub const TAG_COSE_MAC: u64 = 97;
/// CBOR tag for COSE_Sign
pub const TAG_COSE_SIGN: u64 = 98;

/// Sig_structure context string for COSE_Sign
pub const CONTEXT_SIGNATURE: &str = "Signature";
/// Sig_structure context string for COSE_Sign1
pub const CONTEXT_SIGNATURE1: &str = "Signature1";

/// The signature algorithms this crate dispatches on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Algorithm {
    /// ECDSA with SHA-256 on P-256 (identifier -7)
    ES256,
    /// ECDSA with SHA-384 on P-384 (identifier -35)
    ES384,
    /// ECDSA with SHA-512 on P-521 (identifier -36)
    ES512,
    /// EdDSA (identifier -8); Ed25519 in this implementation
    EdDSA,
}

impl Algorithm {
    /// The IANA numeric identifier.
    pub fn id(self) -> i64 {
        match self {
            Algorithm::ES256 => -7,
            Algorithm::ES384 => -35,
            Algorithm::ES512 => -36,
            Algorithm::EdDSA => -8,
        }
    }

    /// Look up by numeric identifier.
    pub fn from_id(id: i64) -> Option<Algorithm> {
        match id {
            -7 => Some(Algorithm::ES256),
            -35 => Some(Algorithm::ES384),
            -36 => Some(Algorithm::ES512),
            -8 => Some(Algorithm::EdDSA),
            _ => None,
        }
    }

    /// The registered text name, which is also the JWK `alg` value.
    pub fn name(self) -> &'static str {
        match self {
            Algorithm::ES256 => "ES256",
            Algorithm::ES384 => "ES384",
            Algorithm::ES512 => "ES512",
            Algorithm::EdDSA => "EdDSA",
        }
    }

    /// Look up by text name.
    pub fn from_name(name: &str) -> Option<Algorithm> {
        match name {
            "ES256" => Some(Algorithm::ES256),
            "ES384" => Some(Algorithm::ES384),
            "ES512" => Some(Algorithm::ES512),
            "EdDSA" => Some(Algorithm::EdDSA),
            _ => None,
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The elliptic curves registered for COSE keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Curve {
    /// NIST P-256 (identifier 1)
    P256,
    /// NIST P-384 (identifier 2)
    P384,
    /// NIST P-521 (identifier 3)
    P521,
    /// X25519 (identifier 4)
    X25519,
    /// X448 (identifier 5)
    X448,
    /// Ed25519 (identifier 6)
    Ed25519,
    /// Ed448 (identifier 7)
    Ed448,
    /// secp256k1 (identifier 8)
    Secp256k1,
}

impl Curve {
    /// The IANA numeric identifier.
    pub fn id(self) -> i64 {
        match self {
            Curve::P256 => 1,
            Curve::P384 => 2,
            Curve::P521 => 3,
            Curve::X25519 => 4,
            Curve::X448 => 5,
            Curve::Ed25519 => 6,
            Curve::Ed448 => 7,
            Curve::Secp256k1 => 8,
        }
    }

    /// Look up by numeric identifier.
    pub fn from_id(id: i64) -> Option<Curve> {
        match id {
            1 => Some(Curve::P256),
            2 => Some(Curve::P384),
            3 => Some(Curve::P521),
            4 => Some(Curve::X25519),
            5 => Some(Curve::X448),
            6 => Some(Curve::Ed25519),
            7 => Some(Curve::Ed448),
            8 => Some(Curve::Secp256k1),
            _ => None,
        }
    }

    /// The registered text name, which is also the JWK `crv` value.
    pub fn name(self) -> &'static str {
        match self {
            Curve::P256 => "P-256",
            Curve::P384 => "P-384",
            Curve::P521 => "P-521",
            Curve::X25519 => "X25519",
            Curve::X448 => "X448",
            Curve::Ed25519 => "Ed25519",
            Curve::Ed448 => "Ed448",
            Curve::Secp256k1 => "secp256k1",
        }
    }

    /// Look up by text name.
    pub fn from_name(name: &str) -> Option<Curve> {
        match name {
            "P-256" => Some(Curve::P256),
            "P-384" => Some(Curve::P384),
            "P-521" => Some(Curve::P521),
            "X25519" => Some(Curve::X25519),
            "X448" => Some(Curve::X448),
            "Ed25519" => Some(Curve::Ed25519),
            "Ed448" => Some(Curve::Ed448),
            "secp256k1" => Some(Curve::Secp256k1),
            _ => None,
        }
    }

    /// The byte length of a field element, for the double-coordinate curves this crate signs
    /// with.
    pub fn field_len(self) -> Option<usize> {
        match self {
            Curve::P256 => Some(32),
            Curve::P384 => Some(48),
            Curve::P521 => Some(66),
            Curve::Secp256k1 => Some(32),
            _ => None,
        }
    }
}

impl fmt::Display for Curve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
