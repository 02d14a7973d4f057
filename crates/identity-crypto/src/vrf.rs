use identity_codec::content_id_of_bytes;

use crate::keypair::Signer;

/// A verifiable random draw: the candidate signs the epoch seed with
/// Ed25519, and the SHA-256 of that signature is interpreted as the random
/// output. Same seed and key always produce the same draw — the committee
/// selector relies on this for reproducibility.
pub fn vrf_draw(signer: &Signer, seed: &[u8]) -> [u8; 32] {
    let signature = signer.sign(seed);
    *content_id_of_bytes(&signature).as_bytes()
}

/// Interprets a VRF output as an unsigned 64-bit ordering key (big-endian
/// prefix), used to rank candidates for committee selection.
pub fn draw_to_u64(draw: &[u8; 32]) -> u64 {
    u64::from_be_bytes(draw[..8].try_into().expect("draw is 32 bytes"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_draw() {
        let signer = Signer::from_bytes([9u8; 32]);
        let a = vrf_draw(&signer, b"epoch-7");
        let b = vrf_draw(&signer, b"epoch-7");
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_differ() {
        let signer = Signer::from_bytes([9u8; 32]);
        let a = vrf_draw(&signer, b"epoch-7");
        let b = vrf_draw(&signer, b"epoch-8");
        assert_ne!(a, b);
    }
}
