//! RSA keys in JSON Web Key form (RFC 7517 / RFC 7518 section 6.3).
//!
//! Every numeric member is the unsigned big-endian value encoded as
//! base64url without padding.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rsa::{
    traits::{PrivateKeyParts, PublicKeyParts},
    BigUint, RsaPrivateKey, RsaPublicKey,
};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{config::KEY_TYPE, error::KeygenError};

/// An RSA JSON Web Key. The private members are `None` for a public key and
/// are left out of the serialized object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Jwk {
    pub kty: String,
    pub n: String,
    pub e: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub d: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dq: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qi: Option<String>,
}

impl Jwk {
    /// Export every parameter of `key`, including the CRT values.
    pub fn from_private_key(key: &RsaPrivateKey) -> Result<Self, KeygenError> {
        let [p, q] = key.primes() else {
            return Err(KeygenError::InvalidKey(format!(
                "expected 2 prime factors, got {}",
                key.primes().len()
            )));
        };

        let missing_crt = || KeygenError::InvalidKey("CRT values not precomputed".into());
        let dp = key.dp().ok_or_else(missing_crt)?;
        let dq = key.dq().ok_or_else(missing_crt)?;
        let qi = key.crt_coefficient().ok_or_else(missing_crt)?;

        Ok(Self {
            d: Some(encode_uint(key.d())),
            p: Some(encode_uint(p)),
            q: Some(encode_uint(q)),
            dp: Some(encode_uint(dp)),
            dq: Some(encode_uint(dq)),
            qi: Some(encode_uint(&qi)),
            ..Self::from_public_key(&key.to_public_key())
        })
    }

    pub fn from_public_key(key: &RsaPublicKey) -> Self {
        Self {
            kty: KEY_TYPE.to_string(),
            n: encode_uint(key.n()),
            e: encode_uint(key.e()),
            d: None,
            p: None,
            q: None,
            dp: None,
            dq: None,
            qi: None,
        }
    }

    /// Parse a JWK object. Members other than the RSA ones are ignored.
    pub fn from_json(json: &str) -> Result<Self, KeygenError> {
        let jwk: Self = serde_json::from_str(json)
            .map_err(|e| KeygenError::Serialization(format!("Failed to parse JWK: {e}")))?;

        if jwk.kty != KEY_TYPE {
            return Err(KeygenError::InvalidKey(format!(
                "unsupported key type {:?}",
                jwk.kty
            )));
        }

        Ok(jwk)
    }

    pub fn to_json(&self) -> Result<String, KeygenError> {
        serde_json::to_string(self)
            .map_err(|e| KeygenError::Serialization(format!("Failed to encode JWK: {e}")))
    }

    /// The public projection: `kty`, `n` and `e` only.
    pub fn public(&self) -> Self {
        Self {
            kty: self.kty.clone(),
            n: self.n.clone(),
            e: self.e.clone(),
            d: None,
            p: None,
            q: None,
            dp: None,
            dq: None,
            qi: None,
        }
    }

    pub fn is_private(&self) -> bool {
        self.d.is_some()
            || self.p.is_some()
            || self.q.is_some()
            || self.dp.is_some()
            || self.dq.is_some()
            || self.qi.is_some()
    }

    /// Build an RSA public key from `n` and `e`, ignoring any private members.
    pub fn to_public_key(&self) -> Result<RsaPublicKey, KeygenError> {
        let n = decode_uint("n", &self.n)?;
        let e = decode_uint("e", &self.e)?;

        RsaPublicKey::new(n, e)
            .map_err(|e| KeygenError::InvalidKey(format!("Invalid RSA public key: {e}")))
    }

    /// Build and validate the full RSA private key.
    pub fn to_private_key(&self) -> Result<RsaPrivateKey, KeygenError> {
        let n = decode_uint("n", &self.n)?;
        let e = decode_uint("e", &self.e)?;
        let d = decode_uint("d", required("d", &self.d)?)?;
        let p = decode_uint("p", required("p", &self.p)?)?;
        let q = decode_uint("q", required("q", &self.q)?)?;

        let key = RsaPrivateKey::from_components(n, e, d, vec![p, q])
            .map_err(|e| KeygenError::InvalidKey(format!("Invalid RSA private key: {e}")))?;
        key.validate()
            .map_err(|e| KeygenError::InvalidKey(format!("Invalid RSA private key: {e}")))?;

        Ok(key)
    }

    /// RFC 7638 thumbprint: SHA-256 over the required members in
    /// lexicographic order, base64url encoded.
    pub fn thumbprint(&self) -> String {
        let canonical = format!(
            r#"{{"e":"{}","kty":"{}","n":"{}"}}"#,
            self.e, self.kty, self.n
        );
        URL_SAFE_NO_PAD.encode(Sha256::digest(canonical.as_bytes()))
    }
}

fn encode_uint(value: &BigUint) -> String {
    URL_SAFE_NO_PAD.encode(value.to_bytes_be())
}

fn decode_uint(member: &str, value: &str) -> Result<BigUint, KeygenError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(value)
        .map_err(|e| KeygenError::InvalidKey(format!("Invalid base64url in {member:?}: {e}")))?;

    if bytes.is_empty() {
        return Err(KeygenError::InvalidKey(format!("Empty value for {member:?}")));
    }

    Ok(BigUint::from_bytes_be(&bytes))
}

fn required<'a>(member: &str, value: &'a Option<String>) -> Result<&'a str, KeygenError> {
    value
        .as_deref()
        .ok_or_else(|| KeygenError::InvalidKey(format!("Missing private member {member:?}")))
}
