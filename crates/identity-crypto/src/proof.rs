use identity_core::IdentityError;
use serde::{Deserialize, Serialize};

use crate::keypair::{verify, Signer};

/// Signed attestation that a score was computed: `sign(<id>|<context>|
/// <value:6-decimal>|<epoch>|<input-hash>)`. Verification recomputes the
/// canonical string and checks the signature — it never re-evaluates the
/// scoring formula.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreProof {
    pub identity: String,
    pub context: String,
    pub value: f64,
    pub epoch: i64,
    pub input_hash: String,
    pub algorithm: String,
    pub public_key: Vec<u8>,
    pub signature: Vec<u8>,
}

fn canonical_message(identity: &str, context: &str, value: f64, epoch: i64, input_hash: &str) -> Vec<u8> {
    format!("{identity}|{context}|{value:.6}|{epoch}|{input_hash}").into_bytes()
}

pub fn sign_score_proof(
    signer: &Signer,
    identity: &str,
    context: &str,
    value: f64,
    epoch: i64,
    input_hash: &str,
) -> ScoreProof {
    let message = canonical_message(identity, context, value, epoch, input_hash);
    ScoreProof {
        identity: identity.to_string(),
        context: context.to_string(),
        value,
        epoch,
        input_hash: input_hash.to_string(),
        algorithm: "ed25519".to_string(),
        public_key: signer.public_key_bytes().to_vec(),
        signature: signer.sign(&message),
    }
}

pub fn verify_score_proof(proof: &ScoreProof) -> Result<(), IdentityError> {
    if proof.algorithm != "ed25519" {
        return Err(IdentityError::SignatureFailure(format!(
            "unsupported algorithm: {}",
            proof.algorithm
        )));
    }
    let message = canonical_message(
        &proof.identity,
        &proof.context,
        proof.value,
        proof.epoch,
        &proof.input_hash,
    );
    verify(&proof.public_key, &message, &proof.signature)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proof_round_trip() {
        let signer = Signer::generate();
        let proof = sign_score_proof(&signer, "key:alice", "commerce", 42.123456, 100, "deadbeef");
        assert!(verify_score_proof(&proof).is_ok());
    }

    #[test]
    fn mutated_value_invalidates_signature() {
        let signer = Signer::generate();
        let mut proof = sign_score_proof(&signer, "key:alice", "commerce", 42.123456, 100, "deadbeef");
        proof.value = 99.0;
        assert!(verify_score_proof(&proof).is_err());
    }
}
