use ed25519_dalek::{Signature, Signer as _, SigningKey, Verifier as _, VerifyingKey};
use identity_core::IdentityError;
use zeroize::Zeroizing;

/// An Ed25519 keypair used to sign scoring proofs, rule-set content, and
/// checkpoint shares. The signing key is held in a `Zeroizing` buffer so it
/// is wiped from memory on drop.
pub struct Signer {
    signing_key: Zeroizing<[u8; 32]>,
    verifying_key: VerifyingKey,
}

impl Signer {
    /// Generate a fresh keypair.
    pub fn generate() -> Self {
        let mut csprng = rand::rngs::OsRng;
        let signing_key = SigningKey::generate(&mut csprng);
        let verifying_key = signing_key.verifying_key();
        Self {
            signing_key: Zeroizing::new(signing_key.to_bytes()),
            verifying_key,
        }
    }

    /// Restore a `Signer` from a raw 32-byte seed (e.g. loaded from a
    /// configuration secret).
    pub fn from_bytes(seed: [u8; 32]) -> Self {
        let signing_key = SigningKey::from_bytes(&seed);
        let verifying_key = signing_key.verifying_key();
        Self {
            signing_key: Zeroizing::new(seed),
            verifying_key,
        }
    }

    pub fn sign(&self, message: &[u8]) -> Vec<u8> {
        let signing_key = SigningKey::from_bytes(&self.signing_key);
        signing_key.sign(message).to_bytes().to_vec()
    }

    pub fn public_key_bytes(&self) -> [u8; 32] {
        self.verifying_key.to_bytes()
    }
}

impl std::fmt::Debug for Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Signer {{ public_key: {} }}",
            hex::encode(self.public_key_bytes())
        )
    }
}

/// Verifies a detached signature against a raw Ed25519 public key.
pub fn verify(public_key: &[u8], message: &[u8], signature: &[u8]) -> Result<(), IdentityError> {
    let pk_bytes: [u8; 32] = public_key
        .try_into()
        .map_err(|_| IdentityError::SignatureFailure("public key must be 32 bytes".into()))?;
    let sig_bytes: [u8; 64] = signature
        .try_into()
        .map_err(|_| IdentityError::SignatureFailure("signature must be 64 bytes".into()))?;
    let verifying_key = VerifyingKey::from_bytes(&pk_bytes)
        .map_err(|e| IdentityError::SignatureFailure(e.to_string()))?;
    let signature = Signature::from_bytes(&sig_bytes);
    verifying_key
        .verify(message, &signature)
        .map_err(|e| IdentityError::SignatureFailure(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_and_verify_round_trip() {
        let signer = Signer::generate();
        let sig = signer.sign(b"hello");
        assert!(verify(&signer.public_key_bytes(), b"hello", &sig).is_ok());
    }

    #[test]
    fn tampered_message_fails_verification() {
        let signer = Signer::generate();
        let sig = signer.sign(b"hello");
        assert!(verify(&signer.public_key_bytes(), b"goodbye", &sig).is_err());
    }
}
