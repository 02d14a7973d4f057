pub mod keypair;
pub mod proof;
pub mod vrf;

pub use keypair::{verify, Signer};
pub use proof::{sign_score_proof, verify_score_proof, ScoreProof};
pub use vrf::{draw_to_u64, vrf_draw};
