use std::sync::{Arc, RwLock};

use identity_budget::BudgetEnforcer;
use identity_committee::CommitteeSelection;
use identity_core::{Context, Epoch, EPOCH_SECONDS};
use identity_crypto::Signer;
use identity_provider::DataProvider;
use identity_registry::RulesRegistry;
use identity_scoring::ScoringEngine;
use identity_store::{CheckpointStore, EventStore};

use crate::config::Config;
use crate::score_lookup::EngineScoreLookup;

/// Everything a handler needs, constructed once at startup with explicit
/// dependencies — no process-wide singleton.
pub struct AppState {
    pub store: Arc<EventStore>,
    pub checkpoints: Arc<CheckpointStore>,
    pub provider: Arc<DataProvider>,
    pub engine: Arc<ScoringEngine>,
    pub budget: Arc<BudgetEnforcer<EngineScoreLookup>>,
    pub registry: Arc<RulesRegistry>,
    pub signer: Arc<Signer>,
    pub config: RwLock<Config>,
    /// The committee currently recognized for governance actions. `None`
    /// until a committee has been selected for the active epoch.
    pub committee: RwLock<Option<CommitteeSelection>>,
}

impl AppState {
    /// `missing context` defaults to `default`.
    pub fn resolve_context(context: Option<String>) -> Context {
        context.unwrap_or_else(|| "default".to_string())
    }

    /// `missing epoch` defaults to `floor(unix_time / 86400)`.
    pub fn resolve_epoch(epoch: Option<Epoch>) -> Epoch {
        epoch.unwrap_or_else(|| chrono::Utc::now().timestamp() / EPOCH_SECONDS)
    }
}
