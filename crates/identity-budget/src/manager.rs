use dashmap::DashMap;

use identity_core::{BudgetParams, Context, Epoch, Identifier, IdentityError, BOND_SCORE_FRACTION};
use identity_core::VouchBudget;

/// Capability the budget manager depends on rather than importing
/// `identity-scoring` directly, which would create a cycle — the scoring
/// engine does not consult the budget manager, but deriving a budget's total
/// does need a score. `identity-node` wires the real scoring engine in.
pub trait ScoreLookup: Send + Sync {
    fn score_at(&self, identity: &Identifier, context: &Context, epoch: Epoch) -> Result<f64, IdentityError>;
}

type Key = (Identifier, Context, Epoch);

/// Per-`(identity, context, epoch)` vouch budget, safe under parallel
/// writers via per-record locking (`DashMap` shards internally; an outer
/// read lock would only be needed for a custom map, which this avoids).
pub struct BudgetManager<S: ScoreLookup> {
    budgets: DashMap<Key, VouchBudget>,
    score_lookup: S,
}

impl<S: ScoreLookup> BudgetManager<S> {
    pub fn new(score_lookup: S) -> Self {
        Self {
            budgets: DashMap::new(),
            score_lookup,
        }
    }

    fn derive(&self, identity: &Identifier, context: &Context, epoch: Epoch, params: BudgetParams) -> Result<VouchBudget, IdentityError> {
        let score = self.score_lookup.score_at(identity, context, epoch)?;
        let total = (params.base_budget + score * params.budget_multiplier).max(params.base_budget);
        let bond = (score * BOND_SCORE_FRACTION).min(total / 2.0).max(0.0);
        Ok(VouchBudget::new(identity.clone(), context.clone(), epoch, total, bond))
    }

    /// Returns a clone of the budget, creating it on first access.
    pub fn get(&self, identity: &Identifier, context: &Context, epoch: Epoch, params: BudgetParams) -> Result<VouchBudget, IdentityError> {
        let key = (identity.clone(), context.clone(), epoch);
        if let Some(entry) = self.budgets.get(&key) {
            return Ok(entry.clone());
        }
        let budget = self.derive(identity, context, epoch, params)?;
        self.budgets.insert(key, budget.clone());
        Ok(budget)
    }

    /// Spends `amount`; on success `spent += amount`, `remaining -= amount`.
    /// Rolls back (no-op here, since the map write is the only persistence
    /// step) if validation fails after the in-memory update.
    pub fn spend(&self, identity: &Identifier, context: &Context, epoch: Epoch, params: BudgetParams, amount: f64) -> Result<VouchBudget, IdentityError> {
        if amount <= 0.0 {
            return Err(IdentityError::InvalidInput("spend amount must be positive".into()));
        }
        let key = (identity.clone(), context.clone(), epoch);
        if !self.budgets.contains_key(&key) {
            let budget = self.derive(identity, context, epoch, params)?;
            self.budgets.insert(key.clone(), budget);
        }
        let mut entry = self.budgets.get_mut(&key).expect("just inserted");
        if amount > entry.remaining {
            return Err(IdentityError::InsufficientBudget {
                need: amount,
                have: entry.remaining,
            });
        }
        entry.spent += amount;
        entry.remaining -= amount;
        let snapshot = entry.clone();
        drop(entry);
        if let Err(e) = snapshot.validate() {
            // Roll back: persistence-equivalent failure reverses the spend.
            let mut entry = self.budgets.get_mut(&key).expect("present");
            entry.spent -= amount;
            entry.remaining += amount;
            return Err(e);
        }
        Ok(snapshot)
    }

    /// Recomputes `total` from a fresh score; if larger than the current
    /// total, the difference is added to `remaining`, and the bond updated.
    pub fn refill(&self, identity: &Identifier, context: &Context, epoch: Epoch, params: BudgetParams, new_score: f64) -> Result<VouchBudget, IdentityError> {
        let key = (identity.clone(), context.clone(), epoch);
        let new_total = (params.base_budget + new_score * params.budget_multiplier).max(params.base_budget);
        let new_bond = (new_score * BOND_SCORE_FRACTION).min(new_total / 2.0).max(0.0);

        let mut entry = self
            .budgets
            .entry(key)
            .or_insert_with(|| VouchBudget::new(identity.clone(), context.clone(), epoch, new_total, new_bond));

        if new_total > entry.total {
            entry.remaining += new_total - entry.total;
            entry.total = new_total;
        }
        entry.reputation_bond = new_bond;
        Ok(entry.clone())
    }

    pub fn validate(&self, identity: &Identifier, context: &Context, epoch: Epoch) -> Result<(), IdentityError> {
        let key = (identity.clone(), context.clone(), epoch);
        match self.budgets.get(&key) {
            Some(entry) => entry.validate(),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedScore(f64);
    impl ScoreLookup for FixedScore {
        fn score_at(&self, _identity: &Identifier, _context: &Context, _epoch: Epoch) -> Result<f64, IdentityError> {
            Ok(self.0)
        }
    }

    fn params() -> BudgetParams {
        BudgetParams {
            base_budget: 10.0,
            budget_multiplier: 0.1,
        }
    }

    #[test]
    fn total_derived_from_score() {
        let mgr = BudgetManager::new(FixedScore(50.0));
        let id = Identifier::new("key:alice").unwrap();
        let budget = mgr.get(&id, &"commerce".to_string(), 1, params()).unwrap();
        assert!((budget.total - 15.0).abs() < 1e-9);
    }

    #[test]
    fn spend_and_rollback() {
        let mgr = BudgetManager::new(FixedScore(50.0));
        let id = Identifier::new("key:alice").unwrap();
        let ctx = "commerce".to_string();
        mgr.spend(&id, &ctx, 1, params(), 5.0).unwrap();
        let err = mgr.spend(&id, &ctx, 1, params(), 11.0);
        assert!(matches!(err, Err(IdentityError::InsufficientBudget { .. })));
        let budget = mgr.get(&id, &ctx, 1, params()).unwrap();
        assert!((budget.spent - 5.0).abs() < 1e-9);
    }

    #[test]
    fn refill_grows_remaining() {
        let mgr = BudgetManager::new(FixedScore(50.0));
        let id = Identifier::new("key:alice").unwrap();
        let ctx = "commerce".to_string();
        mgr.spend(&id, &ctx, 1, params(), 5.0).unwrap();
        let refilled = mgr.refill(&id, &ctx, 1, params(), 200.0).unwrap();
        assert!(refilled.total > 15.0);
        assert!(refilled.remaining > 5.0);
    }
}
