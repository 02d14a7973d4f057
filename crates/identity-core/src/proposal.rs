use serde::{Deserialize, Serialize};

use crate::ruleset::RuleSet;
use crate::types::{ContentId, Identifier, Timestamp};

/// One-way lifecycle: `Pending -> (Approved | Rejected | Expired) -> Executed`.
/// `Expired` is derived at read time, never persisted as a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalStatus {
    Pending,
    Approved,
    Rejected,
    Executed,
    Expired,
}

/// Envelope around a candidate `RuleSet` carrying proposer identity,
/// timestamps, and the ordered committee approvals gathered so far.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Proposal {
    pub id: ContentId,
    pub rule_set: RuleSet,
    pub proposer: Identifier,
    pub proposed_at: Timestamp,
    pub activation_date: Timestamp,
    pub approvals: Vec<Approval>,
    pub status: ProposalStatus,
    /// Hash of the canonical encoding with `signature`/`hash` fields zeroed.
    pub hash: ContentId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Approval {
    pub member: Identifier,
    pub approved_at: Timestamp,
}

impl Proposal {
    /// The status as observed "now", applying the derived-`Expired` rule:
    /// `now > activation_date + grace` while still `Pending`.
    pub fn effective_status(&self, now: Timestamp, grace_secs: i64) -> ProposalStatus {
        if self.status == ProposalStatus::Pending && now > self.activation_date + grace_secs {
            ProposalStatus::Expired
        } else {
            self.status
        }
    }

    pub fn has_approved(&self, member: &Identifier) -> bool {
        self.approvals.iter().any(|a| &a.member == member)
    }
}
