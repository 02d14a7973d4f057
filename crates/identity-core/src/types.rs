use serde::{Deserialize, Serialize};
use std::fmt;

/// Monotonic epoch counter (day-granularity by default: `unix_time / 86400`).
pub type Epoch = i64;

/// Unix timestamp (seconds, UTC).
pub type Timestamp = i64;

/// Named scope in which scores, budgets, and vouches are tracked independently
/// (e.g. `commerce`, `hiring`, `general`).
pub type Context = String;

// ── ContentId ────────────────────────────────────────────────────────────────

/// 32-byte SHA-256 content identifier: the sole primary key for a blob or
/// event. Self-describing — two writes of identical bytes always yield the
/// same `ContentId`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContentId(pub [u8; 32]);

impl ContentId {
    pub fn from_bytes(b: [u8; 32]) -> Self {
        Self(b)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let bytes = hex::decode(s)?;
        let mut arr = [0u8; 32];
        if bytes.len() != 32 {
            return Err(hex::FromHexError::InvalidStringLength);
        }
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentId({}…)", &self.to_hex()[..16])
    }
}

// ── Identifier ───────────────────────────────────────────────────────────────

/// Opaque method-qualified string of the form `method:local-id`, e.g.
/// `key:z6Mk...`. Treated as an ordered key for indexes; this crate does not
/// parse or resolve it — resolution is an external collaborator.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Identifier(String);

impl Identifier {
    pub fn new(s: impl Into<String>) -> Result<Self, crate::error::IdentityError> {
        let s = s.into();
        if s.is_empty() {
            return Err(crate::error::IdentityError::InvalidInput(
                "identifier must not be empty".into(),
            ));
        }
        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The `method` portion before the first `:`, if present.
    pub fn method(&self) -> Option<&str> {
        self.0.split_once(':').map(|(m, _)| m)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identifier({})", self.0)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_id_hex_round_trip() {
        let cid = ContentId::from_bytes([7u8; 32]);
        let hex = cid.to_hex();
        assert_eq!(ContentId::from_hex(&hex).unwrap(), cid);
    }

    #[test]
    fn identifier_rejects_empty() {
        assert!(Identifier::new("").is_err());
    }

    #[test]
    fn identifier_method() {
        let id = Identifier::new("key:z6Mkabc").unwrap();
        assert_eq!(id.method(), Some("key"));
    }
}
