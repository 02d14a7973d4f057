use serde::{Deserialize, Serialize};

use crate::types::{ContentId, Epoch, Identifier, Timestamp};

/// Epoch-keyed, committee-signed transparency-log checkpoint. Invariant:
/// the checkpoint at epoch `ε` covers exactly all events with
/// `epoch <= ε`; `tree_size` is monotonic in `ε`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checkpoint {
    pub tree_id: String,
    pub root: ContentId,
    pub tree_size: u64,
    pub epoch: Epoch,
    pub timestamp: Timestamp,
    pub signers: Vec<Identifier>,
    pub threshold_signature: Vec<u8>,
}
