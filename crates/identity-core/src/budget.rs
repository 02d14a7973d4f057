use serde::{Deserialize, Serialize};

use crate::constants::BUDGET_TOLERANCE;
use crate::error::IdentityError;
use crate::types::{Context, Epoch, Identifier};

/// Per-`(identity, context, epoch)` vouch-spend ledger.
///
/// Invariants: `spent + remaining == total` (tolerance `1e-3`);
/// `0 <= reputation_bond <= total / 2`; no field ever goes negative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VouchBudget {
    pub identity: Identifier,
    pub context: Context,
    pub epoch: Epoch,
    pub total: f64,
    pub spent: f64,
    pub remaining: f64,
    pub reputation_bond: f64,
}

impl VouchBudget {
    pub fn new(identity: Identifier, context: Context, epoch: Epoch, total: f64, bond: f64) -> Self {
        Self {
            identity,
            context,
            epoch,
            total,
            spent: 0.0,
            remaining: total,
            reputation_bond: bond,
        }
    }

    /// Checks the struct against the vouch budget invariants: no field is
    /// negative, and `spent + remaining` equals `total` within tolerance.
    pub fn validate(&self) -> Result<(), IdentityError> {
        if self.total < 0.0 || self.spent < 0.0 || self.remaining < 0.0 {
            return Err(IdentityError::Integrity(
                "budget components must be non-negative".into(),
            ));
        }
        if (self.spent + self.remaining - self.total).abs() > BUDGET_TOLERANCE {
            return Err(IdentityError::Integrity(format!(
                "spent ({}) + remaining ({}) != total ({})",
                self.spent, self.remaining, self.total
            )));
        }
        if self.reputation_bond < 0.0 || self.reputation_bond > self.total / 2.0 {
            return Err(IdentityError::Integrity(format!(
                "reputation_bond {} out of range [0, {}]",
                self.reputation_bond,
                self.total / 2.0
            )));
        }
        Ok(())
    }

    pub fn utilization_rate(&self) -> f64 {
        if self.total <= 0.0 {
            0.0
        } else {
            self.spent / self.total
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id() -> Identifier {
        Identifier::new("key:abc").unwrap()
    }

    #[test]
    fn fresh_budget_is_valid() {
        let b = VouchBudget::new(id(), "commerce".into(), 1, 15.0, 1.5);
        assert!(b.validate().is_ok());
    }

    #[test]
    fn detects_mismatched_total() {
        let mut b = VouchBudget::new(id(), "commerce".into(), 1, 15.0, 1.5);
        b.spent = 100.0;
        assert!(b.validate().is_err());
    }

    #[test]
    fn detects_bond_over_half_total() {
        let mut b = VouchBudget::new(id(), "commerce".into(), 1, 15.0, 1.5);
        b.reputation_bond = 10.0;
        assert!(b.validate().is_err());
    }
}
