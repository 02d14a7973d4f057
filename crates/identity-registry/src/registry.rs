use std::path::Path;

use identity_codec::content_id_of;
use identity_committee::CommitteeSelection;
use identity_core::{
    Approval, ContentId, Identifier, IdentityError, Proposal, ProposalStatus, RuleSet, Timestamp,
};
use identity_crypto::Signer;

use crate::draft::RuleSetDraft;
use crate::store::RegistryStore;

const DEFAULT_GRACE_SECS: i64 = 7 * 86_400;

fn draft_to_rule_set(draft: RuleSetDraft, created_at: Timestamp) -> RuleSet {
    RuleSet {
        id: ContentId::from_bytes([0u8; 32]),
        factors: draft.factors,
        vouch_cap: draft.vouch_cap,
        vouch_half_life: draft.vouch_half_life,
        report_half_life: draft.report_half_life,
        time_max_growth: draft.time_max_growth,
        time_inactivity_decay: draft.time_inactivity_decay,
        decay: draft.decay,
        diversity_penalty: draft.diversity_penalty,
        community_threshold: draft.community_threshold,
        collusion_threshold: draft.collusion_threshold,
        collusion_penalty: draft.collusion_penalty,
        per_context_budget: draft.per_context_budget,
        committee: draft.committee,
        checkpoint_cadence_epochs: draft.checkpoint_cadence_epochs,
        dispute_window_epochs: draft.dispute_window_epochs,
        created_at,
        valid_from: 0,
        timelock_days: draft.timelock_days,
        hash: ContentId::from_bytes([0u8; 32]),
        signature: Vec::new(),
        signer_public_key: Vec::new(),
    }
}

/// Canonical hash over `rule_set` with `id`, `hash`, and `signature` zeroed,
/// per the "signature and hash fields zeroed" rule shared by rule sets and
/// proposals.
fn hash_rule_set(rule_set: &RuleSet) -> Result<ContentId, IdentityError> {
    let mut unsigned = rule_set.clone();
    unsigned.id = ContentId::from_bytes([0u8; 32]);
    unsigned.hash = ContentId::from_bytes([0u8; 32]);
    unsigned.signature = Vec::new();
    content_id_of(&unsigned)
}

fn hash_proposal(proposal: &Proposal) -> Result<ContentId, IdentityError> {
    let mut unsigned = proposal.clone();
    unsigned.id = ContentId::from_bytes([0u8; 32]);
    unsigned.hash = ContentId::from_bytes([0u8; 32]);
    unsigned.rule_set.id = ContentId::from_bytes([0u8; 32]);
    unsigned.rule_set.hash = ContentId::from_bytes([0u8; 32]);
    unsigned.rule_set.signature = Vec::new();
    content_id_of(&unsigned)
}

/// Rule sets and the propose -> approve -> timelock -> execute governance
/// pipeline. Exclusively owns active-rule-set selection.
pub struct RulesRegistry {
    store: RegistryStore,
}

impl RulesRegistry {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, IdentityError> {
        Ok(Self { store: RegistryStore::open(path)? })
    }

    pub fn from_db(db: &sled::Db) -> Result<Self, IdentityError> {
        Ok(Self { store: RegistryStore::from_db(db)? })
    }

    /// Directly activates a rule set with no proposal pipeline. Used once,
    /// at genesis, before any committee exists to approve a proposal.
    pub fn bootstrap(&self, draft: RuleSetDraft, signer: &Signer, now: Timestamp) -> Result<RuleSet, IdentityError> {
        let mut rule_set = draft_to_rule_set(draft, now);
        rule_set.valid_from = now;
        let hash = hash_rule_set(&rule_set)?;
        rule_set.hash = hash;
        rule_set.id = hash;
        rule_set.signature = signer.sign(hash.as_bytes());
        rule_set.signer_public_key = signer.public_key_bytes().to_vec();

        self.store.put_rule_set(&rule_set)?;
        self.store.set_active(rule_set.id)?;
        Ok(rule_set)
    }

    pub fn get_active(&self) -> Result<RuleSet, IdentityError> {
        let id = self.store.get_active_id()?;
        self.store.get_rule_set(id)
    }

    pub fn get_by_id(&self, id: ContentId) -> Result<RuleSet, IdentityError> {
        self.store.get_rule_set(id)
    }

    pub fn list(&self) -> Result<Vec<RuleSet>, IdentityError> {
        self.store.list_rule_sets()
    }

    /// Requires `proposer` to be a current committee member. Assigns
    /// `proposed_at = now`, `status = pending`,
    /// `activation_date = now + timelock_days`.
    pub fn propose(
        &self,
        draft: RuleSetDraft,
        proposer: &Identifier,
        signer: &Signer,
        committee: &CommitteeSelection,
        now: Timestamp,
    ) -> Result<Proposal, IdentityError> {
        if !committee.members.contains(proposer) {
            return Err(IdentityError::PermissionDenied(format!(
                "{proposer} is not a current committee member"
            )));
        }

        let timelock_days = draft.timelock_days;
        let mut rule_set = draft_to_rule_set(draft, now);
        let rule_set_hash = hash_rule_set(&rule_set)?;
        rule_set.hash = rule_set_hash;
        rule_set.id = rule_set_hash;
        rule_set.signature = signer.sign(rule_set_hash.as_bytes());
        rule_set.signer_public_key = signer.public_key_bytes().to_vec();

        let mut proposal = Proposal {
            id: ContentId::from_bytes([0u8; 32]),
            rule_set,
            proposer: proposer.clone(),
            proposed_at: now,
            activation_date: now + timelock_days * 86_400,
            approvals: Vec::new(),
            status: ProposalStatus::Pending,
            hash: ContentId::from_bytes([0u8; 32]),
        };
        let hash = hash_proposal(&proposal)?;
        proposal.hash = hash;
        proposal.id = hash;

        self.store.put_proposal(&proposal)?;
        Ok(proposal)
    }

    /// Requires `approver` to be a current committee member; rejects
    /// duplicate approvals; transitions to `Approved` once the committee
    /// threshold is reached.
    pub fn approve(
        &self,
        proposal_id: ContentId,
        approver: &Identifier,
        committee: &CommitteeSelection,
        now: Timestamp,
    ) -> Result<Proposal, IdentityError> {
        if !committee.members.contains(approver) {
            return Err(IdentityError::PermissionDenied(format!(
                "{approver} is not a current committee member"
            )));
        }

        let mut proposal = self.store.get_proposal(proposal_id)?;
        if proposal.status != ProposalStatus::Pending {
            return Err(IdentityError::InvalidInput(format!(
                "proposal {proposal_id} is not pending (status: {:?})",
                proposal.status
            )));
        }
        if proposal.has_approved(approver) {
            return Err(IdentityError::AlreadyExists(format!(
                "{approver} already approved proposal {proposal_id}"
            )));
        }

        proposal.approvals.push(Approval { member: approver.clone(), approved_at: now });
        if proposal.approvals.len() >= committee.threshold {
            proposal.status = ProposalStatus::Approved;
        }

        self.store.put_proposal(&proposal)?;
        Ok(proposal)
    }

    /// Requires `status = approved` and `now >= activation_date`. Writes the
    /// new rule set with `valid_from = now` and its final hash, activates
    /// it, and marks the proposal `executed`.
    pub fn execute(&self, proposal_id: ContentId, now: Timestamp) -> Result<RuleSet, IdentityError> {
        let mut proposal = self.store.get_proposal(proposal_id)?;
        if proposal.effective_status(now, DEFAULT_GRACE_SECS) != ProposalStatus::Approved {
            return Err(IdentityError::InvalidInput(format!(
                "proposal {proposal_id} is not approved (status: {:?})",
                proposal.status
            )));
        }
        if now < proposal.activation_date {
            return Err(IdentityError::TimelockNotExpired { activation_date: proposal.activation_date });
        }

        let mut rule_set = proposal.rule_set.clone();
        rule_set.valid_from = now;
        let hash = hash_rule_set(&rule_set)?;
        rule_set.hash = hash;
        rule_set.id = hash;

        self.store.put_rule_set(&rule_set)?;
        self.store.set_active(rule_set.id)?;

        proposal.status = ProposalStatus::Executed;
        self.store.put_proposal(&proposal)?;

        Ok(rule_set)
    }

    pub fn get_proposal(&self, id: ContentId) -> Result<Proposal, IdentityError> {
        self.store.get_proposal(id)
    }

    pub fn list_proposals_by_status(&self, status: ProposalStatus) -> Result<Vec<Proposal>, IdentityError> {
        self.store.list_proposals_by_status(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use identity_core::{BudgetParams, CommitteeParams, DecayKind, Factors};
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn draft() -> RuleSetDraft {
        RuleSetDraft {
            factors: Factors::default(),
            vouch_cap: 100.0,
            vouch_half_life: 10.0,
            report_half_life: 20.0,
            time_max_growth: 50.0,
            time_inactivity_decay: 0.02,
            decay: DecayKind::Exponential,
            diversity_penalty: 0.2,
            community_threshold: 0.7,
            collusion_threshold: 0.8,
            collusion_penalty: 0.5,
            per_context_budget: HashMap::new(),
            committee: CommitteeParams { size: 3, threshold: 2 },
            checkpoint_cadence_epochs: 1,
            dispute_window_epochs: 1,
            timelock_days: 1,
        }
    }

    fn members(names: &[&str]) -> Vec<Identifier> {
        names.iter().map(|n| Identifier::new(*n).unwrap()).collect()
    }

    #[test]
    fn proposal_lifecycle_scenario_5() {
        let dir = tempdir().unwrap();
        let registry = RulesRegistry::open(dir.path()).unwrap();
        let signer = Signer::generate();
        let committee = CommitteeSelection {
            members: members(&["key:m1", "key:m2", "key:m3"]),
            threshold: 2,
            epoch: 1,
            seed: vec![0u8; 8],
            start_time: 0,
            end_time: 1_000_000,
        };

        let t0 = 1_000_000i64;
        let proposer = Identifier::new("key:m1").unwrap();
        let proposal = registry.propose(draft(), &proposer, &signer, &committee, t0).unwrap();
        assert_eq!(proposal.status, ProposalStatus::Pending);

        let m2 = Identifier::new("key:m2").unwrap();
        let m3 = Identifier::new("key:m3").unwrap();
        let after_one = registry.approve(proposal.id, &m2, &committee, t0 + 10).unwrap();
        assert_eq!(after_one.status, ProposalStatus::Pending);
        let after_two = registry.approve(proposal.id, &m3, &committee, t0 + 20).unwrap();
        assert_eq!(after_two.status, ProposalStatus::Approved);

        let too_early = registry.execute(proposal.id, t0 + 12 * 3600);
        assert!(matches!(too_early, Err(IdentityError::TimelockNotExpired { .. })));

        let executed = registry.execute(proposal.id, t0 + 25 * 3600).unwrap();
        assert_eq!(executed.valid_from, t0 + 25 * 3600);
        assert_eq!(registry.get_active().unwrap().id, executed.id);

        let final_proposal = registry.get_proposal(proposal.id).unwrap();
        assert_eq!(final_proposal.status, ProposalStatus::Executed);
    }

    #[test]
    fn duplicate_approval_rejected() {
        let dir = tempdir().unwrap();
        let registry = RulesRegistry::open(dir.path()).unwrap();
        let signer = Signer::generate();
        let committee = CommitteeSelection {
            members: members(&["key:m1", "key:m2"]),
            threshold: 2,
            epoch: 1,
            seed: vec![0u8; 8],
            start_time: 0,
            end_time: 1000,
        };
        let proposer = Identifier::new("key:m1").unwrap();
        let proposal = registry.propose(draft(), &proposer, &signer, &committee, 0).unwrap();
        let m2 = Identifier::new("key:m2").unwrap();
        registry.approve(proposal.id, &m2, &committee, 1).unwrap();
        assert!(registry.approve(proposal.id, &m2, &committee, 2).is_err());
    }

    #[test]
    fn non_committee_member_cannot_propose() {
        let dir = tempdir().unwrap();
        let registry = RulesRegistry::open(dir.path()).unwrap();
        let signer = Signer::generate();
        let committee = CommitteeSelection {
            members: members(&["key:m1"]),
            threshold: 1,
            epoch: 1,
            seed: vec![0u8; 8],
            start_time: 0,
            end_time: 1000,
        };
        let outsider = Identifier::new("key:outsider").unwrap();
        assert!(registry.propose(draft(), &outsider, &signer, &committee, 0).is_err());
    }
}
