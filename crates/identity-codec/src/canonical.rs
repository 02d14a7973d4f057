use identity_core::IdentityError;
use serde::Serialize;

/// Canonical byte encoding used for hashing and signing: JSON
/// Canonicalization Scheme (RFC 8785) via `serde_jcs`, so two equal values
/// always produce identical bytes regardless of field insertion order.
pub fn canonical_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, IdentityError> {
    serde_jcs::to_string(value)
        .map(|s| s.into_bytes())
        .map_err(|e| IdentityError::Serialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    struct Pair {
        b: u32,
        a: u32,
    }

    #[derive(Serialize)]
    struct PairReordered {
        a: u32,
        b: u32,
    }

    #[test]
    fn field_order_does_not_affect_canonical_bytes() {
        let x = canonical_bytes(&Pair { b: 2, a: 1 }).unwrap();
        let y = canonical_bytes(&PairReordered { a: 1, b: 2 }).unwrap();
        assert_eq!(x, y);
    }
}
