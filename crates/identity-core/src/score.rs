use serde::{Deserialize, Serialize};

use crate::types::{Context, Epoch, Identifier};

/// The five factor sub-totals that compose `value` in a `ScoreRecord`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponents {
    /// PoP/KYC factor.
    pub k: f64,
    /// Attestation factor.
    pub a: f64,
    /// Vouch factor.
    pub v: f64,
    /// Report (penalty) factor.
    pub r: f64,
    /// Tenure factor.
    pub t: f64,
}

/// `(identity, context, epoch, value, components, computed-by, version)`.
/// Invariant: `value >= 0`; pure function of input events with
/// `epoch <= self.epoch` and the rule set active at `self.epoch`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub identity: Identifier,
    pub context: Context,
    pub epoch: Epoch,
    pub value: f64,
    pub components: ScoreComponents,
    pub computed_by: String,
    pub version: u32,
}

impl ScoreRecord {
    pub fn validate(&self) -> Result<(), crate::error::IdentityError> {
        if self.value < 0.0 {
            return Err(crate::error::IdentityError::Integrity(format!(
                "score value {} is negative",
                self.value
            )));
        }
        Ok(())
    }

    /// Score formatted to the fixed six-decimal precision proofs commit to.
    pub fn value_fixed(&self) -> String {
        format!("{:.6}", self.value)
    }
}
