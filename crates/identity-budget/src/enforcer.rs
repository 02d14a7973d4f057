use dashmap::DashMap;

use identity_core::{BudgetParams, Context, Epoch, Identifier, IdentityError, PENALTY_RATE};

use crate::manager::{BudgetManager, ScoreLookup};

#[derive(Debug, Clone, Copy, Default)]
struct PenaltyState {
    penalty: f64,
    last_update: i64,
}

#[derive(Debug, Clone, Copy)]
pub struct UtilizationRecord {
    pub utilization_rate: f64,
    pub penalty: f64,
    pub timestamp: i64,
}

/// Wraps a `BudgetManager`: on a `spend` failure, records a per-identity
/// penalty of `0.1 * attempted_amount`. Penalties are cleared at epoch
/// boundaries by the caller invoking `clear_penalties`.
pub struct BudgetEnforcer<S: ScoreLookup> {
    manager: BudgetManager<S>,
    penalties: DashMap<Identifier, PenaltyState>,
}

impl<S: ScoreLookup> BudgetEnforcer<S> {
    pub fn new(manager: BudgetManager<S>) -> Self {
        Self {
            manager,
            penalties: DashMap::new(),
        }
    }

    pub fn manager(&self) -> &BudgetManager<S> {
        &self.manager
    }

    pub fn spend(
        &self,
        identity: &Identifier,
        context: &Context,
        epoch: Epoch,
        params: BudgetParams,
        amount: f64,
        now: i64,
    ) -> Result<identity_core::VouchBudget, IdentityError> {
        match self.manager.spend(identity, context, epoch, params, amount) {
            Ok(budget) => Ok(budget),
            Err(e) => {
                let mut state = self.penalties.entry(identity.clone()).or_default();
                state.penalty += PENALTY_RATE * amount;
                state.last_update = now;
                Err(e)
            }
        }
    }

    pub fn utilization(
        &self,
        identity: &Identifier,
        context: &Context,
        epoch: Epoch,
        params: BudgetParams,
        now: i64,
    ) -> Result<UtilizationRecord, IdentityError> {
        let budget = self.manager.get(identity, context, epoch, params)?;
        let penalty = self
            .penalties
            .get(identity)
            .map(|s| s.penalty)
            .unwrap_or(0.0);
        Ok(UtilizationRecord {
            utilization_rate: budget.utilization_rate(),
            penalty,
            timestamp: now,
        })
    }

    /// Clears all recorded penalties, called at epoch boundaries.
    pub fn clear_penalties(&self) {
        self.penalties.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use identity_core::Context as Ctx;

    struct FixedScore(f64);
    impl ScoreLookup for FixedScore {
        fn score_at(&self, _identity: &Identifier, _context: &Ctx, _epoch: Epoch) -> Result<f64, IdentityError> {
            Ok(self.0)
        }
    }

    #[test]
    fn failed_spend_records_penalty() {
        let enforcer = BudgetEnforcer::new(BudgetManager::new(FixedScore(50.0)));
        let id = Identifier::new("key:alice").unwrap();
        let ctx = "commerce".to_string();
        let params = BudgetParams {
            base_budget: 10.0,
            budget_multiplier: 0.1,
        };
        enforcer.spend(&id, &ctx, 1, params, 5.0, 100).unwrap();
        let err = enforcer.spend(&id, &ctx, 1, params, 11.0, 100);
        assert!(err.is_err());
        let util = enforcer.utilization(&id, &ctx, 1, params, 100).unwrap();
        assert!((util.penalty - 1.1).abs() < 1e-9);
        enforcer.clear_penalties();
        let util = enforcer.utilization(&id, &ctx, 1, params, 100).unwrap();
        assert_eq!(util.penalty, 0.0);
    }
}
