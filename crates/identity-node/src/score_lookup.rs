use std::sync::Arc;

use identity_budget::ScoreLookup;
use identity_core::{Context, Epoch, Identifier, IdentityError};
use identity_registry::RulesRegistry;
use identity_scoring::ScoringEngine;

/// Wires the real scoring engine into the budget manager's `ScoreLookup`
/// capability (see `identity-budget::manager` for why this indirection
/// exists rather than a direct dependency).
pub struct EngineScoreLookup {
    engine: Arc<ScoringEngine>,
    registry: Arc<RulesRegistry>,
}

impl EngineScoreLookup {
    pub fn new(engine: Arc<ScoringEngine>, registry: Arc<RulesRegistry>) -> Self {
        Self { engine, registry }
    }
}

impl ScoreLookup for EngineScoreLookup {
    fn score_at(&self, identity: &Identifier, context: &Context, epoch: Epoch) -> Result<f64, IdentityError> {
        let rules = self.registry.get_active()?;
        Ok(self.engine.compute_score(identity, context, epoch, &rules)?.value)
    }
}
