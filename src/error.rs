use std::fmt;

/// Unified error type for key generation and persistence.
///
/// Every failure is fatal to a run; the variant only records which stage
/// produced it.
#[derive(Debug)]
pub enum KeygenError {
    Io(String),
    KeyGeneration(String),
    InvalidKey(String),
    Serialization(String),
}

impl fmt::Display for KeygenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeygenError::Io(msg) => write!(f, "I/O error: {msg}"),
            KeygenError::KeyGeneration(msg) => write!(f, "Key generation failed: {msg}"),
            KeygenError::InvalidKey(msg) => write!(f, "Invalid key: {msg}"),
            KeygenError::Serialization(msg) => write!(f, "Serialization error: {msg}"),
        }
    }
}

impl std::error::Error for KeygenError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_stage_and_message() {
        let err = KeygenError::Io("permission denied".into());
        assert_eq!(err.to_string(), "I/O error: permission denied");

        let err = KeygenError::InvalidKey("missing modulus".into());
        assert_eq!(err.to_string(), "Invalid key: missing modulus");
    }
}
