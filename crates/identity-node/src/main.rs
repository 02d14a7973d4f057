//! identity-node — the reputation engine's HTTP node binary.
//!
//! Startup sequence: parse args -> init tracing -> open store -> construct
//! the scoring/budget/registry engines -> bootstrap a rule set if the
//! registry is empty -> serve.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use anyhow::Context as _;
use clap::Parser;
use tracing::info;

use identity_budget::{BudgetEnforcer, BudgetManager};
use identity_core::{BudgetParams, CommitteeParams, DecayKind, Factors};
use identity_crypto::Signer;
use identity_provider::DataProvider;
use identity_registry::{RuleSetDraft, RulesRegistry};
use identity_scoring::ScoringEngine;
use identity_store::{CheckpointStore, EventStore};

use identity_node::score_lookup::EngineScoreLookup;
use identity_node::state::AppState;

#[derive(Parser, Debug)]
#[command(
    name = "identity-node",
    version,
    about = "Decentralized identity and reputation engine — HTTP API node"
)]
struct Args {
    /// Directory for the persistent event store and registry database.
    #[arg(long, default_value = "~/.identity-node/data")]
    data_dir: PathBuf,

    /// HTTP listen address.
    #[arg(long, default_value = "127.0.0.1:8080")]
    listen_addr: SocketAddr,

    /// Path to a JSON config file overriding the default rule-set params.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed file for this node's Ed25519 signing key (32 raw bytes). A
    /// fresh ephemeral key is generated if omitted.
    #[arg(long)]
    signer_seed: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,identity_node=debug".parse().unwrap()),
        )
        .init();

    let args = Args::parse();
    info!("identity-node starting");

    let data_dir = expand_tilde(&args.data_dir);
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("creating data dir {}", data_dir.display()))?;

    let config = identity_node::config::Config::load(args.config.as_deref())
        .context("loading configuration")?;

    let event_store = Arc::new(
        EventStore::open(data_dir.join("events"))
            .context("opening event store")?,
    );
    let checkpoints = Arc::new(
        CheckpointStore::open(data_dir.join("checkpoints"))
            .context("opening checkpoint store")?,
    );
    let registry = Arc::new(
        RulesRegistry::open(data_dir.join("registry"))
            .context("opening rule-set registry")?,
    );

    let signer = Arc::new(load_or_generate_signer(args.signer_seed.as_deref())?);

    if registry.get_active().is_err() {
        info!("no active rule set found — bootstrapping from configuration");
        let now = chrono::Utc::now().timestamp();
        let draft = draft_from_config(&config);
        registry.bootstrap(draft, &signer, now).context("bootstrapping rule set")?;
    }

    let provider = Arc::new(DataProvider::new(Arc::clone(&event_store)));
    let engine = Arc::new(ScoringEngine::new(Arc::clone(&provider)));
    let score_lookup = EngineScoreLookup::new(Arc::clone(&engine), Arc::clone(&registry));
    let budget = Arc::new(BudgetEnforcer::new(BudgetManager::new(score_lookup)));

    let state = Arc::new(AppState {
        store: event_store,
        checkpoints,
        provider,
        engine,
        budget,
        registry,
        signer,
        config: RwLock::new(config),
        committee: RwLock::new(None),
    });

    let app = identity_node::build_router(state);

    info!(addr = %args.listen_addr, "identity-node ready");
    let listener = tokio::net::TcpListener::bind(args.listen_addr)
        .await
        .with_context(|| format!("binding {}", args.listen_addr))?;
    axum::serve(listener, app).await.context("serving HTTP")?;

    Ok(())
}

fn draft_from_config(config: &identity_node::config::Config) -> RuleSetDraft {
    RuleSetDraft {
        factors: config.factors,
        vouch_cap: config.vouch_cap,
        vouch_half_life: config.vouch_half_life,
        report_half_life: config.report_half_life,
        time_max_growth: config.time_max_growth,
        time_inactivity_decay: config.time_inactivity_decay,
        decay: DecayKind::Exponential,
        diversity_penalty: config.diversity_penalty,
        community_threshold: config.community_threshold,
        collusion_threshold: config.collusion_threshold,
        collusion_penalty: config.collusion_penalty,
        per_context_budget: HashMap::from([(
            "default".to_string(),
            BudgetParams { base_budget: config.base_budget, budget_multiplier: config.budget_multiplier },
        )]),
        committee: CommitteeParams { size: 7, threshold: 5 },
        checkpoint_cadence_epochs: 1,
        dispute_window_epochs: 7,
        timelock_days: 3,
    }
}

fn load_or_generate_signer(path: Option<&Path>) -> anyhow::Result<Signer> {
    if let Some(p) = path {
        let bytes = std::fs::read(p).with_context(|| format!("reading signer seed from {}", p.display()))?;
        let seed: [u8; 32] = bytes
            .try_into()
            .map_err(|_| anyhow::anyhow!("signer seed file must contain exactly 32 bytes"))?;
        return Ok(Signer::from_bytes(seed));
    }
    tracing::warn!("no --signer-seed provided — generating an ephemeral key, DO NOT USE IN PRODUCTION");
    Ok(Signer::generate())
}

fn expand_tilde(path: &Path) -> PathBuf {
    if let Ok(stripped) = path.strip_prefix("~") {
        if let Ok(home) = std::env::var("HOME").or_else(|_| std::env::var("USERPROFILE")) {
            return PathBuf::from(home).join(stripped);
        }
    }
    path.to_path_buf()
}
