//! Deterministic, verifiable-random committee selection. A candidate
//! proves eligibility by signing the epoch seed; the selector verifies each
//! signature and ranks candidates by the SHA-256 of it. Same seed, same
//! candidate pool, same committee — anywhere.

use identity_codec::content_id_of_bytes;
use identity_core::{CommitteeParams, Epoch, Identifier, IdentityError, Timestamp};
use identity_crypto::verify;

/// One candidate's proof of eligibility: a signature over the epoch seed
/// under its own public key.
#[derive(Debug, Clone)]
pub struct CommitteeCandidate {
    pub identity: Identifier,
    pub public_key: Vec<u8>,
    pub seed_signature: Vec<u8>,
}

/// Result of a selection round.
#[derive(Debug, Clone)]
pub struct CommitteeSelection {
    pub members: Vec<Identifier>,
    pub threshold: usize,
    pub epoch: Epoch,
    pub seed: Vec<u8>,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
}

/// The seed a candidate must sign to be eligible for `epoch`'s committee.
pub fn epoch_seed(epoch: Epoch) -> Vec<u8> {
    format!("committee-seed:{epoch}").into_bytes()
}

/// Selects the top `params.size` candidates by verifiable random draw.
/// A candidate whose signature fails to verify against its claimed public
/// key is dropped rather than failing the whole selection — one bad actor
/// should not block committee formation.
pub fn select_committee(
    epoch: Epoch,
    candidates: &[CommitteeCandidate],
    params: CommitteeParams,
    start_time: Timestamp,
    end_time: Timestamp,
) -> Result<CommitteeSelection, IdentityError> {
    if params.threshold > params.size {
        return Err(IdentityError::InvalidInput(
            "committee threshold cannot exceed committee size".into(),
        ));
    }

    let seed = epoch_seed(epoch);
    let mut ranked: Vec<(Identifier, u64)> = Vec::new();
    for candidate in candidates {
        if verify(&candidate.public_key, &seed, &candidate.seed_signature).is_err() {
            continue;
        }
        let draw = content_id_of_bytes(&candidate.seed_signature);
        let value = u64::from_be_bytes(draw.as_bytes()[..8].try_into().expect("draw is 32 bytes"));
        ranked.push((candidate.identity.clone(), value));
    }

    // Descending by draw value; ties broken by identity for reproducibility.
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    let members: Vec<Identifier> = ranked.into_iter().take(params.size).map(|(id, _)| id).collect();

    if members.len() < params.threshold {
        return Err(IdentityError::InvalidInput(format!(
            "only {} eligible candidates, threshold requires {}",
            members.len(),
            params.threshold
        )));
    }

    Ok(CommitteeSelection {
        members,
        threshold: params.threshold,
        epoch,
        seed,
        start_time,
        end_time,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use identity_crypto::Signer;

    fn candidate(seed: &[u8], key: [u8; 32], name: &str) -> CommitteeCandidate {
        let signer = Signer::from_bytes(key);
        CommitteeCandidate {
            identity: Identifier::new(name).unwrap(),
            public_key: signer.public_key_bytes().to_vec(),
            seed_signature: signer.sign(seed),
        }
    }

    #[test]
    fn same_pool_same_committee() {
        let epoch = 7;
        let seed = epoch_seed(epoch);
        let candidates = vec![
            candidate(&seed, [1u8; 32], "key:a"),
            candidate(&seed, [2u8; 32], "key:b"),
            candidate(&seed, [3u8; 32], "key:c"),
        ];
        let params = CommitteeParams { size: 2, threshold: 1 };
        let first = select_committee(epoch, &candidates, params, 0, 1000).unwrap();
        let second = select_committee(epoch, &candidates, params, 0, 1000).unwrap();
        assert_eq!(first.members, second.members);
        assert_eq!(first.members.len(), 2);
    }

    #[test]
    fn invalid_signature_is_dropped() {
        let epoch = 1;
        let seed = epoch_seed(epoch);
        let mut bad = candidate(&seed, [1u8; 32], "key:a");
        bad.seed_signature = candidate(b"wrong seed", [1u8; 32], "key:a").seed_signature;
        let candidates = vec![bad, candidate(&seed, [2u8; 32], "key:b")];
        let params = CommitteeParams { size: 2, threshold: 1 };
        let selection = select_committee(epoch, &candidates, params, 0, 1000).unwrap();
        assert_eq!(selection.members.len(), 1);
        assert_eq!(selection.members[0].as_str(), "key:b");
    }

    #[test]
    fn threshold_above_size_rejected() {
        let params = CommitteeParams { size: 2, threshold: 3 };
        let err = select_committee(1, &[], params, 0, 1000);
        assert!(err.is_err());
    }
}
