use identity_core::{ContentId, IdentityError};
use serde::Serialize;
use sha2::{Digest, Sha256};

/// SHA-256 of raw bytes, as used for blob content IDs.
pub fn content_id_of_bytes(bytes: &[u8]) -> ContentId {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let digest = hasher.finalize();
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    ContentId::from_bytes(out)
}

/// SHA-256 of a value's canonical encoding, as used for event and rule-set
/// content IDs.
pub fn content_id_of<T: Serialize>(value: &T) -> Result<ContentId, IdentityError> {
    let bytes = crate::canonical::canonical_bytes(value)?;
    Ok(content_id_of_bytes(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_bytes_yield_same_id() {
        let a = content_id_of_bytes(b"Hello, World!");
        let b = content_id_of_bytes(b"Hello, World!");
        assert_eq!(a, b);
    }

    #[test]
    fn different_bytes_yield_different_id() {
        let a = content_id_of_bytes(b"foo");
        let b = content_id_of_bytes(b"bar");
        assert_ne!(a, b);
    }
}
