use std::path::Path;

use identity_core::{ContentId, IdentityError, Proposal, ProposalStatus, RuleSet};

const ACTIVE_KEY: &[u8] = b"active";

/// Thin sled-backed persistence for rule sets, proposals, and the pointer
/// to the currently active rule set. Mirrors the event store's
/// `sled::Tree`-per-entity shape.
pub struct RegistryStore {
    rule_sets: sled::Tree,
    proposals: sled::Tree,
    meta: sled::Tree,
}

impl RegistryStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, IdentityError> {
        let db = sled::open(path).map_err(|e| IdentityError::Storage(e.to_string()))?;
        Self::from_db(&db)
    }

    pub fn from_db(db: &sled::Db) -> Result<Self, IdentityError> {
        Ok(Self {
            rule_sets: db.open_tree("rule_sets").map_err(|e| IdentityError::Storage(e.to_string()))?,
            proposals: db.open_tree("proposals").map_err(|e| IdentityError::Storage(e.to_string()))?,
            meta: db.open_tree("registry_meta").map_err(|e| IdentityError::Storage(e.to_string()))?,
        })
    }

    pub fn put_rule_set(&self, rule_set: &RuleSet) -> Result<(), IdentityError> {
        let bytes = bincode::serialize(rule_set).map_err(|e| IdentityError::Serialization(e.to_string()))?;
        self.rule_sets
            .insert(rule_set.id.as_bytes(), bytes)
            .map_err(|e| IdentityError::Storage(e.to_string()))?;
        Ok(())
    }

    pub fn get_rule_set(&self, id: ContentId) -> Result<RuleSet, IdentityError> {
        let bytes = self
            .rule_sets
            .get(id.as_bytes())
            .map_err(|e| IdentityError::Storage(e.to_string()))?
            .ok_or_else(|| IdentityError::NotFound(format!("rule set {id}")))?;
        bincode::deserialize(&bytes).map_err(|e| IdentityError::Serialization(e.to_string()))
    }

    pub fn list_rule_sets(&self) -> Result<Vec<RuleSet>, IdentityError> {
        self.rule_sets
            .iter()
            .values()
            .map(|r| {
                let bytes = r.map_err(|e| IdentityError::Storage(e.to_string()))?;
                bincode::deserialize(&bytes).map_err(|e| IdentityError::Serialization(e.to_string()))
            })
            .collect()
    }

    pub fn set_active(&self, id: ContentId) -> Result<(), IdentityError> {
        self.meta
            .insert(ACTIVE_KEY, id.as_bytes())
            .map_err(|e| IdentityError::Storage(e.to_string()))?;
        Ok(())
    }

    pub fn get_active_id(&self) -> Result<ContentId, IdentityError> {
        let bytes = self
            .meta
            .get(ACTIVE_KEY)
            .map_err(|e| IdentityError::Storage(e.to_string()))?
            .ok_or_else(|| IdentityError::NotFound("no active rule set".into()))?;
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(ContentId::from_bytes(arr))
    }

    pub fn put_proposal(&self, proposal: &Proposal) -> Result<(), IdentityError> {
        let bytes = bincode::serialize(proposal).map_err(|e| IdentityError::Serialization(e.to_string()))?;
        self.proposals
            .insert(proposal.id.as_bytes(), bytes)
            .map_err(|e| IdentityError::Storage(e.to_string()))?;
        Ok(())
    }

    pub fn get_proposal(&self, id: ContentId) -> Result<Proposal, IdentityError> {
        let bytes = self
            .proposals
            .get(id.as_bytes())
            .map_err(|e| IdentityError::Storage(e.to_string()))?
            .ok_or_else(|| IdentityError::NotFound(format!("proposal {id}")))?;
        bincode::deserialize(&bytes).map_err(|e| IdentityError::Serialization(e.to_string()))
    }

    pub fn list_proposals(&self) -> Result<Vec<Proposal>, IdentityError> {
        self.proposals
            .iter()
            .values()
            .map(|r| {
                let bytes = r.map_err(|e| IdentityError::Storage(e.to_string()))?;
                bincode::deserialize(&bytes).map_err(|e| IdentityError::Serialization(e.to_string()))
            })
            .collect()
    }

    pub fn list_proposals_by_status(&self, status: ProposalStatus) -> Result<Vec<Proposal>, IdentityError> {
        Ok(self
            .list_proposals()?
            .into_iter()
            .filter(|p| p.status == status)
            .collect())
    }
}
