use std::path::Path;

use identity_core::{Checkpoint, Epoch, IdentityError};

/// Checkpoints keyed by epoch (signed 64-bit integer), ordered numerically.
pub struct CheckpointStore {
    tree: sled::Tree,
}

impl CheckpointStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, IdentityError> {
        let db = sled::open(path).map_err(|e| IdentityError::Storage(e.to_string()))?;
        Self::from_db(&db)
    }

    pub fn from_db(db: &sled::Db) -> Result<Self, IdentityError> {
        let tree = db
            .open_tree("checkpoints")
            .map_err(|e| IdentityError::Storage(e.to_string()))?;
        Ok(Self { tree })
    }

    fn key(epoch: Epoch) -> [u8; 8] {
        // XOR the sign bit so two's-complement ordering matches sled's
        // lexicographic byte ordering across negative and positive epochs.
        ((epoch as u64) ^ (1 << 63)).to_be_bytes()
    }

    pub fn put(&self, checkpoint: &Checkpoint) -> Result<(), IdentityError> {
        let bytes =
            bincode::serialize(checkpoint).map_err(|e| IdentityError::Serialization(e.to_string()))?;
        self.tree
            .insert(Self::key(checkpoint.epoch), bytes)
            .map_err(|e| IdentityError::Storage(e.to_string()))?;
        Ok(())
    }

    pub fn get_by_epoch(&self, epoch: Epoch) -> Result<Checkpoint, IdentityError> {
        let bytes = self
            .tree
            .get(Self::key(epoch))
            .map_err(|e| IdentityError::Storage(e.to_string()))?
            .ok_or_else(|| IdentityError::NotFound(format!("checkpoint at epoch {epoch}")))?;
        bincode::deserialize(&bytes).map_err(|e| IdentityError::Serialization(e.to_string()))
    }

    pub fn get_latest(&self) -> Result<Checkpoint, IdentityError> {
        let (_, bytes) = self
            .tree
            .last()
            .map_err(|e| IdentityError::Storage(e.to_string()))?
            .ok_or_else(|| IdentityError::NotFound("no checkpoints stored".into()))?;
        bincode::deserialize(&bytes).map_err(|e| IdentityError::Serialization(e.to_string()))
    }

    pub fn list_range(&self, from: Epoch, to: Epoch) -> Result<Vec<Checkpoint>, IdentityError> {
        let mut out = Vec::new();
        for item in self.tree.range(Self::key(from)..=Self::key(to)) {
            let (_, bytes) = item.map_err(|e| IdentityError::Storage(e.to_string()))?;
            out.push(bincode::deserialize(&bytes).map_err(|e| IdentityError::Serialization(e.to_string()))?);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use identity_core::ContentId;

    fn cp(epoch: Epoch, tree_size: u64) -> Checkpoint {
        Checkpoint {
            tree_id: "main".into(),
            root: ContentId::from_bytes([1u8; 32]),
            tree_size,
            epoch,
            timestamp: epoch * 86_400,
            signers: vec![],
            threshold_signature: vec![],
        }
    }

    #[test]
    fn latest_and_ordering() {
        let dir = tempfile::tempdir().unwrap();
        let store = CheckpointStore::open(dir.path()).unwrap();
        store.put(&cp(1, 10)).unwrap();
        store.put(&cp(5, 50)).unwrap();
        store.put(&cp(3, 30)).unwrap();
        assert_eq!(store.get_latest().unwrap().epoch, 5);
        let range = store.list_range(1, 4).unwrap();
        assert_eq!(range.len(), 2);
        assert!(range[0].tree_size <= range[1].tree_size);
    }

    #[test]
    fn missing_epoch_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = CheckpointStore::open(dir.path()).unwrap();
        assert!(matches!(store.get_by_epoch(7), Err(IdentityError::NotFound(_))));
    }
}
