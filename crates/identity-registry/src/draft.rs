use std::collections::HashMap;

use identity_core::{BudgetParams, CommitteeParams, Context, DecayKind, Factors};

/// The caller-supplied portion of a candidate rule set: everything except
/// the fields the registry itself fills in (`id`, `created_at`,
/// `valid_from`, `hash`, `signature`, `signer_public_key`).
#[derive(Debug, Clone)]
pub struct RuleSetDraft {
    pub factors: Factors,
    pub vouch_cap: f64,
    pub vouch_half_life: f64,
    pub report_half_life: f64,
    pub time_max_growth: f64,
    pub time_inactivity_decay: f64,
    pub decay: DecayKind,
    pub diversity_penalty: f64,
    pub community_threshold: f64,
    pub collusion_threshold: f64,
    pub collusion_penalty: f64,
    pub per_context_budget: HashMap<Context, BudgetParams>,
    pub committee: CommitteeParams,
    pub checkpoint_cadence_epochs: u64,
    pub dispute_window_epochs: u64,
    pub timelock_days: i64,
}
