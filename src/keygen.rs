use std::fs;
use std::path::Path;

use rand_core::OsRng;
use rsa::RsaPrivateKey;

use crate::{
    config::{KEY_SIZE, KEY_TYPE, PRIVATE_KEY_FILE, PUBLIC_KEY_FILE},
    error::KeygenError,
    jwk::Jwk,
};

const MIN_RSA_KEY_SIZE: usize = 1024;

/// A freshly generated key holding both private and public material.
pub struct KeyPair {
    private_key: RsaPrivateKey,
}

impl KeyPair {
    /// Generate a new key from the OS CSPRNG. Only `"RSA"` is supported.
    pub fn generate(kty: &str, size: usize) -> Result<Self, KeygenError> {
        if kty != KEY_TYPE {
            return Err(KeygenError::KeyGeneration(format!(
                "unsupported key type {kty:?}"
            )));
        }
        if size < MIN_RSA_KEY_SIZE {
            return Err(KeygenError::KeyGeneration(format!(
                "RSA key size must be at least {MIN_RSA_KEY_SIZE} bits, got {size}"
            )));
        }

        let private_key = RsaPrivateKey::new(&mut OsRng, size)
            .map_err(|e| KeygenError::KeyGeneration(format!("Failed to generate RSA key: {e}")))?;

        Ok(Self { private_key })
    }

    pub fn private_jwk(&self) -> Result<Jwk, KeygenError> {
        Jwk::from_private_key(&self.private_key)
    }

    /// Full JWK JSON, private members included.
    pub fn export_private(&self) -> Result<String, KeygenError> {
        self.private_jwk()?.to_json()
    }

    /// Public-only JWK JSON.
    ///
    /// The public serialization is parsed back and rebuilt from `kty`, `n`
    /// and `e` alone, the same way a consumer loads the file, so only a
    /// standalone public key is ever written out.
    pub fn export_public(&self) -> Result<String, KeygenError> {
        let public_json = self.private_jwk()?.public().to_json()?;

        let public_key = Jwk::from_json(&public_json)?.to_public_key()?;
        Jwk::from_public_key(&public_key).to_json()
    }
}

/// Create `dir` and any missing parents. Succeeds if it already exists.
pub fn prepare_output_dir(dir: &Path) -> Result<(), KeygenError> {
    fs::create_dir_all(dir).map_err(|e| {
        KeygenError::Io(format!(
            "Failed to create output directory {}: {e}",
            dir.display()
        ))
    })
}

fn write_key_file(path: &Path, contents: &str) -> Result<(), KeygenError> {
    fs::write(path, contents)
        .map_err(|e| KeygenError::Io(format!("Failed to write {}: {e}", path.display())))
}

fn read_key_file(path: &Path) -> Result<String, KeygenError> {
    fs::read_to_string(path)
        .map_err(|e| KeygenError::Io(format!("Failed to read {}: {e}", path.display())))
}

/// Generate a key pair and write `private-key.jwk` and `public-key.jwk`
/// into `output_dir`, overwriting any previous pair.
pub fn generate_and_persist_key_pair(output_dir: &Path) -> Result<(), KeygenError> {
    prepare_output_dir(output_dir)?;

    tracing::info!(kty = KEY_TYPE, size = KEY_SIZE, "Generating key pair");
    let key_pair = KeyPair::generate(KEY_TYPE, KEY_SIZE)?;

    let private_path = output_dir.join(PRIVATE_KEY_FILE);
    write_key_file(&private_path, &key_pair.export_private()?)?;
    tracing::info!(path = %private_path.display(), "Wrote private key");

    let public_path = output_dir.join(PUBLIC_KEY_FILE);
    let public_json = key_pair.export_public()?;
    write_key_file(&public_path, &public_json)?;
    let thumbprint = Jwk::from_json(&public_json)?.thumbprint();
    tracing::info!(path = %public_path.display(), %thumbprint, "Wrote public key");

    Ok(())
}

/// Check that the pair in `dir` belongs together: the private file holds a
/// valid RSA key and the public file is exactly its public projection.
pub fn verify_key_pair(dir: &Path) -> Result<(), KeygenError> {
    let private_jwk = Jwk::from_json(&read_key_file(&dir.join(PRIVATE_KEY_FILE))?)?;
    let public_jwk = Jwk::from_json(&read_key_file(&dir.join(PUBLIC_KEY_FILE))?)?;

    if public_jwk.is_private() {
        return Err(KeygenError::InvalidKey(
            "public key file contains private members".into(),
        ));
    }

    let private_key = private_jwk.to_private_key()?;
    let public_key = public_jwk.to_public_key()?;
    if private_key.to_public_key() != public_key {
        return Err(KeygenError::InvalidKey(
            "public key does not match private key".into(),
        ));
    }

    tracing::debug!(thumbprint = %public_jwk.thumbprint(), "Key pair verified");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_key_pair() -> KeyPair {
        KeyPair::generate(KEY_TYPE, MIN_RSA_KEY_SIZE).unwrap()
    }

    #[test]
    fn test_generate_rejects_unknown_key_type() {
        let result = KeyPair::generate("EC", KEY_SIZE);
        assert!(matches!(result, Err(KeygenError::KeyGeneration(_))));
    }

    #[test]
    fn test_generate_rejects_small_key_size() {
        let result = KeyPair::generate(KEY_TYPE, 512);
        assert!(matches!(result, Err(KeygenError::KeyGeneration(_))));
    }

    #[test]
    fn test_generate_uses_requested_size() {
        use rsa::traits::PublicKeyParts;

        let key_pair = KeyPair::generate(KEY_TYPE, KEY_SIZE).unwrap();
        assert_eq!(key_pair.private_key.size() * 8, KEY_SIZE);
    }

    #[test]
    fn test_export_public_is_projection_of_private() {
        let key_pair = test_key_pair();

        let private = Jwk::from_json(&key_pair.export_private().unwrap()).unwrap();
        let public = Jwk::from_json(&key_pair.export_public().unwrap()).unwrap();

        assert!(private.is_private());
        assert!(!public.is_private());
        assert_eq!(public, private.public());
    }

    #[test]
    fn test_export_public_has_no_private_members() {
        let json = test_key_pair().export_public().unwrap();

        for member in ["\"d\"", "\"p\"", "\"q\"", "\"dp\"", "\"dq\"", "\"qi\""] {
            assert!(!json.contains(member), "found {member} in {json}");
        }
    }

    #[test]
    fn test_generated_keys_differ() {
        let first = test_key_pair().private_jwk().unwrap();
        let second = test_key_pair().private_jwk().unwrap();

        assert_ne!(first.n, second.n);
        assert_ne!(first.d, second.d);
    }
}
