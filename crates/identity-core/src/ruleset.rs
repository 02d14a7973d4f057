use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::constants::*;
use crate::error::IdentityError;
use crate::types::{ContentId, Context, Timestamp};

/// Scoring weights `{alpha, beta, gamma, delta, tau}` applied to the five
/// score factors `(K, A, V, R, T)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Factors {
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
    pub delta: f64,
    pub tau: f64,
}

impl Default for Factors {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            beta: DEFAULT_BETA,
            gamma: DEFAULT_GAMMA,
            delta: DEFAULT_DELTA,
            tau: DEFAULT_TAU,
        }
    }
}

impl Factors {
    /// `/config PUT` rejects any negative weight.
    pub fn validate(&self) -> Result<(), IdentityError> {
        let all = [self.alpha, self.beta, self.gamma, self.delta, self.tau];
        if all.iter().any(|w| *w < 0.0) {
            return Err(IdentityError::InvalidInput(
                "all factor weights must be non-negative".into(),
            ));
        }
        Ok(())
    }
}

/// Selects which pure decay family a rule set uses.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecayKind {
    Exponential,
    Linear,
    Power { p: f64 },
}

impl Default for DecayKind {
    fn default() -> Self {
        DecayKind::Exponential
    }
}

/// Per-context vouch budget parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BudgetParams {
    pub base_budget: f64,
    pub budget_multiplier: f64,
}

impl Default for BudgetParams {
    fn default() -> Self {
        Self {
            base_budget: DEFAULT_BASE_BUDGET,
            budget_multiplier: DEFAULT_BUDGET_MULTIPLIER,
        }
    }
}

/// Committee sizing/threshold parameters carried in every rule set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CommitteeParams {
    pub size: usize,
    pub threshold: usize,
}

/// Signed collection of parameters governing scoring, budgeting, and
/// governance. Invariant: at any epoch exactly one rule set is active;
/// `valid_from >= created_at + timelock`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleSet {
    pub id: ContentId,
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
    pub created_at: Timestamp,
    pub valid_from: Timestamp,
    pub timelock_days: i64,
    /// SHA-256 over the canonical encoding with `signature`/`id` zeroed.
    pub hash: ContentId,
    pub signature: Vec<u8>,
    pub signer_public_key: Vec<u8>,
}

impl RuleSet {
    pub fn budget_for(&self, context: &str) -> BudgetParams {
        self.per_context_budget
            .get(context)
            .copied()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_factors_are_valid() {
        assert!(Factors::default().validate().is_ok());
    }

    #[test]
    fn negative_weight_rejected() {
        let mut f = Factors::default();
        f.delta = -0.1;
        assert!(f.validate().is_err());
    }
}
