use std::path::{Path, PathBuf};

/// Key type requested from the generator.
///
/// The visa keys are labelled ES256 downstream but are RSA keys.
// TODO: switch to a P-256 key once the visa consumers confirm they accept EC JWKs.
pub const KEY_TYPE: &str = "RSA";

/// Modulus length in bits.
pub const KEY_SIZE: usize = 2048;

pub const PRIVATE_KEY_FILE: &str = "private-key.jwk";
pub const PUBLIC_KEY_FILE: &str = "public-key.jwk";

const SECRETS_DIR: &str = ".secrets";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeygenConfig {
    pub output_dir: PathBuf,
}

impl KeygenConfig {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn private_key_path(&self) -> PathBuf {
        self.output_dir.join(PRIVATE_KEY_FILE)
    }

    pub fn public_key_path(&self) -> PathBuf {
        self.output_dir.join(PUBLIC_KEY_FILE)
    }
}

impl Default for KeygenConfig {
    /// `.secrets` at the crate root.
    fn default() -> Self {
        Self::new(Path::new(env!("CARGO_MANIFEST_DIR")).join(SECRETS_DIR))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_dir_is_secrets_under_crate_root() {
        let config = KeygenConfig::default();
        assert!(config.output_dir.ends_with(".secrets"));
        assert_eq!(
            config.output_dir.parent().unwrap(),
            Path::new(env!("CARGO_MANIFEST_DIR"))
        );
    }

    #[test]
    fn test_key_paths() {
        let config = KeygenConfig::new("/tmp/keys");
        assert_eq!(
            config.private_key_path(),
            PathBuf::from("/tmp/keys/private-key.jwk")
        );
        assert_eq!(
            config.public_key_path(),
            PathBuf::from("/tmp/keys/public-key.jwk")
        );
    }
}
