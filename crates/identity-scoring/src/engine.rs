use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use identity_core::{
    BOOTSTRAP_BASE, BOOTSTRAP_PER_VOUCH, Context, Epoch, Identifier, IdentityError, RuleSet,
    ScoreComponents, ScoreRecord,
};
use identity_crypto::{sign_score_proof, ScoreProof, Signer};
use identity_decay::DecayFn;
use identity_provider::DataProvider;
use identity_store::EpochRange;

use crate::factors::{self, decay_fn};
use crate::input_hash::compute_input_hash;

/// Stateless five-factor scorer. Holds nothing but a shared handle to the
/// data provider; every call is a pure function of `(identity, context,
/// epoch, rule set)` and whatever events the provider can see.
pub struct ScoringEngine {
    provider: Arc<DataProvider>,
}

impl ScoringEngine {
    pub fn new(provider: Arc<DataProvider>) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &DataProvider {
        &self.provider
    }

    /// Computes `(K, A, V, R, T)` and the clamped aggregate score.
    pub fn compute_score(
        &self,
        identity: &Identifier,
        context: &Context,
        epoch: Epoch,
        rules: &RuleSet,
    ) -> Result<ScoreRecord, IdentityError> {
        let mut memo = HashMap::new();
        let mut in_progress = HashSet::new();
        let components = self.compute_components(identity, context, epoch, rules, &mut memo, &mut in_progress)?;
        let value = aggregate(&components, rules);
        Ok(ScoreRecord {
            identity: identity.clone(),
            context: context.clone(),
            epoch,
            value,
            components,
            computed_by: "identity-scoring".to_string(),
            version: 1,
        })
    }

    /// Component breakdown alone, for `GET /score/{id}/factors`.
    pub fn compute_factors(
        &self,
        identity: &Identifier,
        context: &Context,
        epoch: Epoch,
        rules: &RuleSet,
    ) -> Result<ScoreComponents, IdentityError> {
        let mut memo = HashMap::new();
        let mut in_progress = HashSet::new();
        self.compute_components(identity, context, epoch, rules, &mut memo, &mut in_progress)
    }

    /// The hex-SHA-256 input hash over `identity`'s own evidence records,
    /// as committed to by a signed proof.
    pub fn compute_input_hash(
        &self,
        identity: &Identifier,
        context: &Context,
        epoch: Epoch,
    ) -> Result<String, IdentityError> {
        let vouches = self.provider.vouches_received(identity, context, epoch)?;
        let attestations = self.provider.attestations(identity, context, epoch)?;
        let kyc = self.provider.kyc_records(identity, context, epoch)?;
        let reports = self.provider.reports(identity, context, epoch)?;
        Ok(compute_input_hash(identity.as_str(), &vouches, &attestations, &kyc, &reports))
    }

    /// Recomputes the score and signs a proof over it in one pass.
    pub fn sign_proof(
        &self,
        signer: &Signer,
        identity: &Identifier,
        context: &Context,
        epoch: Epoch,
        rules: &RuleSet,
    ) -> Result<(ScoreRecord, ScoreProof), IdentityError> {
        let record = self.compute_score(identity, context, epoch, rules)?;
        let input_hash = self.compute_input_hash(identity, context, epoch)?;
        let proof = sign_score_proof(signer, identity.as_str(), context, record.value, epoch, &input_hash);
        Ok((record, proof))
    }

    fn compute_components(
        &self,
        identity: &Identifier,
        context: &Context,
        epoch: Epoch,
        rules: &RuleSet,
        memo: &mut HashMap<Identifier, f64>,
        in_progress: &mut HashSet<Identifier>,
    ) -> Result<ScoreComponents, IdentityError> {
        let decay = decay_fn(rules);

        let kyc = self.provider.kyc_records(identity, context, epoch)?;
        let k = factors::k_factor(kyc, epoch, decay, rules.vouch_half_life);

        let attestations = self.provider.attestations(identity, context, epoch)?;
        let a = factors::a_factor(attestations, epoch, decay, rules.vouch_half_life);

        let reports = self.provider.reports(identity, context, epoch)?;
        let r = factors::r_factor(reports, epoch, decay, rules.report_half_life);

        let span = self.provider.activity_span(identity, epoch)?;
        let t = factors::t_factor(span, epoch, decay, rules.time_max_growth, rules.time_inactivity_decay);

        let v = self.compute_v_factor(identity, context, epoch, rules, decay, memo, in_progress)?;

        Ok(ScoreComponents { k, a, v, r, t })
    }

    fn compute_v_factor(
        &self,
        identity: &Identifier,
        context: &Context,
        epoch: Epoch,
        rules: &RuleSet,
        decay: DecayFn,
        memo: &mut HashMap<Identifier, f64>,
        in_progress: &mut HashSet<Identifier>,
    ) -> Result<f64, IdentityError> {
        let mut vouches = self.provider.vouches_received(identity, context, epoch)?;
        vouches.sort_by(|a, b| a.from.cmp(&b.from).then(a.epoch.cmp(&b.epoch)));

        let mut weighted = Vec::with_capacity(vouches.len());
        for vouch in &vouches {
            let voucher_score = self.voucher_score(&vouch.from, context, epoch, rules, memo, in_progress)?;
            let capped = voucher_score.min(rules.vouch_cap);
            let age = (epoch - vouch.epoch) as f64;
            let decayed_strength = decay.apply_decay(vouch.strength, age, rules.vouch_half_life);
            weighted.push(capped * decayed_strength);
        }

        let diversity_score = self.diversity_score(identity, context, epoch)?;
        Ok(factors::v_factor(&weighted, rules.diversity_penalty, diversity_score))
    }

    /// Recursive voucher-score lookup with memoization and cycle breaking:
    /// a completed value is served from `memo`; a value already on the
    /// call stack is substituted with the bootstrap heuristic instead of
    /// recursing again.
    fn voucher_score(
        &self,
        voucher: &Identifier,
        context: &Context,
        epoch: Epoch,
        rules: &RuleSet,
        memo: &mut HashMap<Identifier, f64>,
        in_progress: &mut HashSet<Identifier>,
    ) -> Result<f64, IdentityError> {
        if let Some(&v) = memo.get(voucher) {
            return Ok(v);
        }
        if in_progress.contains(voucher) {
            let vouch_count = self.provider.vouches_received(voucher, context, epoch)?.len();
            let bootstrap = (BOOTSTRAP_BASE + BOOTSTRAP_PER_VOUCH * vouch_count as f64).min(rules.vouch_cap);
            return Ok(bootstrap);
        }

        in_progress.insert(voucher.clone());
        let components = self.compute_components(voucher, context, epoch, rules, memo, in_progress)?;
        in_progress.remove(voucher);

        let value = aggregate(&components, rules);
        memo.insert(voucher.clone(), value);
        Ok(value)
    }

    fn diversity_score(&self, identity: &Identifier, context: &Context, epoch: Epoch) -> Result<f64, IdentityError> {
        let range = EpochRange { from: Epoch::MIN, to: Some(epoch + 1) };
        let graph = self.provider.vouch_graph(context, range)?;
        let communities = identity_graph::detect_communities(&graph);
        Ok(identity_graph::shannon_diversity(identity, &graph, &communities))
    }
}

fn aggregate(components: &ScoreComponents, rules: &RuleSet) -> f64 {
    let f = rules.factors;
    (f.alpha * components.k + f.beta * components.a + f.gamma * components.v - f.delta * components.r
        + f.tau * components.t)
        .max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use identity_store::EventStore;
    use tempfile::tempdir;

    fn default_rules() -> RuleSet {
        use identity_core::{CommitteeParams, ContentId, Factors};
        use std::collections::HashMap as Map;
        RuleSet {
            id: ContentId::from_bytes([0u8; 32]),
            factors: Factors::default(),
            vouch_cap: identity_core::DEFAULT_VOUCH_CAP,
            vouch_half_life: identity_core::DEFAULT_VOUCH_HALF_LIFE,
            report_half_life: identity_core::DEFAULT_REPORT_HALF_LIFE,
            time_max_growth: identity_core::DEFAULT_TIME_MAX_GROWTH,
            time_inactivity_decay: identity_core::DEFAULT_TIME_INACTIVITY_DECAY,
            decay: identity_core::DecayKind::Exponential,
            diversity_penalty: identity_core::DEFAULT_DIVERSITY_PENALTY,
            community_threshold: identity_core::DEFAULT_COMMUNITY_THRESHOLD,
            collusion_threshold: identity_core::DEFAULT_COLLUSION_THRESHOLD,
            collusion_penalty: identity_core::DEFAULT_COLLUSION_PENALTY,
            per_context_budget: Map::new(),
            committee: CommitteeParams { size: 3, threshold: 2 },
            checkpoint_cadence_epochs: 1,
            dispute_window_epochs: 1,
            created_at: 0,
            valid_from: 0,
            timelock_days: 1,
            hash: ContentId::from_bytes([0u8; 32]),
            signature: Vec::new(),
            signer_public_key: Vec::new(),
        }
    }

    #[test]
    fn identity_with_no_evidence_scores_zero() {
        let dir = tempdir().unwrap();
        let store = Arc::new(EventStore::open(dir.path()).unwrap());
        let provider = Arc::new(DataProvider::new(store));
        let engine = ScoringEngine::new(provider);
        let rules = default_rules();
        let identity = Identifier::new("key:nobody").unwrap();
        let record = engine
            .compute_score(&identity, &"commerce".to_string(), 100, &rules)
            .unwrap();
        assert_eq!(record.value, 0.0);
    }

    #[test]
    fn scoring_is_deterministic() {
        let dir = tempdir().unwrap();
        let store = Arc::new(EventStore::open(dir.path()).unwrap());
        let provider = Arc::new(DataProvider::new(store));
        let engine = ScoringEngine::new(provider);
        let rules = default_rules();
        let identity = Identifier::new("key:nobody").unwrap();
        let context = "commerce".to_string();
        let first = engine.compute_score(&identity, &context, 100, &rules).unwrap();
        let second = engine.compute_score(&identity, &context, 100, &rules).unwrap();
        assert_eq!(first.value, second.value);
        assert_eq!(first.components.k, second.components.k);
    }
}
