pub mod budget;
pub mod checkpoint;
pub mod constants;
pub mod error;
pub mod event;
pub mod evidence;
pub mod proposal;
pub mod ruleset;
pub mod score;
pub mod statuslist;
pub mod types;

pub use budget::VouchBudget;
pub use checkpoint::Checkpoint;
pub use constants::*;
pub use error::IdentityError;
pub use event::{canonical_sort_key, Direction, Event, EventType};
pub use evidence::{AttestationPayload, KycPayload, ReportPayload, VouchPayload};
pub use proposal::{Approval, Proposal, ProposalStatus};
pub use ruleset::{BudgetParams, CommitteeParams, DecayKind, Factors, RuleSet};
pub use score::{ScoreComponents, ScoreRecord};
pub use statuslist::{StatusCheckResult, StatusListCredential, StatusListEntry, StatusPurpose};
pub use types::{ContentId, Context, Epoch, Identifier, Timestamp};
