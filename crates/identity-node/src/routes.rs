use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use identity_core::{Epoch, Identifier, IdentityError};
use identity_crypto::verify_score_proof;
use identity_store::EpochRange;

use crate::config::Config;
use crate::dto::*;
use crate::error::AppError;
use crate::health;
use crate::state::AppState;

type AppResult<T> = Result<Json<T>, AppError>;

fn parse_identity(raw: &str) -> Result<Identifier, AppError> {
    Identifier::new(raw).map_err(AppError::from)
}

async fn get_score(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<ScoreQuery>,
) -> AppResult<ScoreResponse> {
    let identity = parse_identity(&id)?;
    let context = AppState::resolve_context(query.context);
    let epoch = AppState::resolve_epoch(query.epoch);
    let rules = state.registry.get_active()?;

    let record = state.engine.compute_score(&identity, &context, epoch, &rules)?;

    let components = if query.include_factors { Some(record.components) } else { None };
    let proof = if query.include_proof {
        let (_, proof) = state.engine.sign_proof(&state.signer, &identity, &context, epoch, &rules)?;
        Some(proof)
    } else {
        None
    };

    Ok(Json(ScoreResponse {
        identity: record.identity.to_string(),
        context: record.context,
        epoch: record.epoch,
        value: record.value,
        components,
        proof,
    }))
}

async fn recompute_score(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<ScoreQuery>,
) -> AppResult<ScoreResponse> {
    // Recompute is identical to `GET /score/{id}` — scores are pure
    // functions of stored events, there is no cache to invalidate.
    get_score(State(state), Path(id), Query(query)).await
}

async fn batch_score(
    State(state): State<Arc<AppState>>,
    Json(request): Json<BatchScoreRequest>,
) -> AppResult<BatchScoreResponse> {
    let rules = state.registry.get_active()?;
    let mut results = Vec::with_capacity(request.requests.len());

    for item in request.requests {
        let outcome = (|| -> Result<ScoreResponse, IdentityError> {
            let identity = Identifier::new(&item.identity)?;
            let context = AppState::resolve_context(item.context);
            let epoch = AppState::resolve_epoch(item.epoch);
            let record = state.engine.compute_score(&identity, &context, epoch, &rules)?;
            Ok(ScoreResponse {
                identity: record.identity.to_string(),
                context: record.context,
                epoch: record.epoch,
                value: record.value,
                components: None,
                proof: None,
            })
        })();

        results.push(match outcome {
            Ok(score) => BatchScoreResult { identity: item.identity, score: Some(score), error: None },
            Err(e) => BatchScoreResult { identity: item.identity, score: None, error: Some(e.to_string()) },
        });
    }

    Ok(Json(BatchScoreResponse { results }))
}

async fn score_factors(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<ScoreQuery>,
) -> AppResult<ScoreResponse> {
    let identity = parse_identity(&id)?;
    let context = AppState::resolve_context(query.context);
    let epoch = AppState::resolve_epoch(query.epoch);
    let rules = state.registry.get_active()?;
    let record = state.engine.compute_score(&identity, &context, epoch, &rules)?;
    Ok(Json(ScoreResponse {
        identity: record.identity.to_string(),
        context: record.context,
        epoch: record.epoch,
        value: record.value,
        components: Some(record.components),
        proof: None,
    }))
}

async fn score_proof(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<ScoreQuery>,
) -> AppResult<ScoreResponse> {
    let identity = parse_identity(&id)?;
    let context = AppState::resolve_context(query.context);
    let epoch = AppState::resolve_epoch(query.epoch);
    let rules = state.registry.get_active()?;
    let (record, proof) = state.engine.sign_proof(&state.signer, &identity, &context, epoch, &rules)?;
    Ok(Json(ScoreResponse {
        identity: record.identity.to_string(),
        context: record.context,
        epoch: record.epoch,
        value: record.value,
        components: None,
        proof: Some(proof),
    }))
}

async fn verify_proof(Json(request): Json<VerifyProofRequest>) -> Json<VerifyProofResponse> {
    match verify_score_proof(&request.proof) {
        Ok(()) => Json(VerifyProofResponse { valid: true, error: None }),
        Err(e) => Json(VerifyProofResponse { valid: false, error: Some(e.to_string()) }),
    }
}

async fn get_budget(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<ScoreQuery>,
) -> AppResult<BudgetResponse> {
    let identity = parse_identity(&id)?;
    let context = AppState::resolve_context(query.context);
    let epoch = AppState::resolve_epoch(query.epoch);
    let rules = state.registry.get_active()?;
    let params = rules.budget_for(&context);
    let budget = state.budget.manager().get(&identity, &context, epoch, params)?;
    Ok(Json(BudgetResponse {
        identity: budget.identity.to_string(),
        context: budget.context,
        epoch: budget.epoch,
        total: budget.total,
        spent: budget.spent,
        remaining: budget.remaining,
        reputation_bond: budget.reputation_bond,
    }))
}

async fn spend_budget(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(request): Json<SpendRequest>,
) -> AppResult<SpendResponse> {
    let identity = parse_identity(&id)?;
    let rules = state.registry.get_active()?;
    let params = rules.budget_for(&request.context);
    let now = chrono::Utc::now().timestamp();
    match state.budget.spend(&identity, &request.context, request.epoch, params, request.amount, now) {
        Ok(_) => Ok(Json(SpendResponse { success: true, message: "spent".into() })),
        Err(e) => Err(AppError::from(e)),
    }
}

async fn refill_budget(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(request): Json<RefillRequest>,
) -> AppResult<SpendResponse> {
    let identity = parse_identity(&id)?;
    let rules = state.registry.get_active()?;
    let params = rules.budget_for(&request.context);
    state.budget.manager().refill(&identity, &request.context, request.epoch, params, request.score)?;
    Ok(Json(SpendResponse { success: true, message: "refilled".into() }))
}

async fn budget_utilization(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<ScoreQuery>,
) -> AppResult<UtilizationResponse> {
    let identity = parse_identity(&id)?;
    let context = AppState::resolve_context(query.context);
    let epoch = AppState::resolve_epoch(query.epoch);
    let rules = state.registry.get_active()?;
    let params = rules.budget_for(&context);
    let now = chrono::Utc::now().timestamp();
    let record = state.budget.utilization(&identity, &context, epoch, params, now)?;
    Ok(Json(UtilizationResponse {
        utilization_rate: record.utilization_rate,
        penalty: record.penalty,
        timestamp: record.timestamp,
    }))
}

async fn analysis_collusion(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AnalysisQuery>,
) -> AppResult<Vec<CollusionClusterResponse>> {
    let context = AppState::resolve_context(query.context);
    let epoch = AppState::resolve_epoch(query.epoch);
    let rules = state.registry.get_active()?;
    let threshold = query.threshold.unwrap_or(rules.collusion_threshold);
    let range = core_range_for(epoch);
    let graph = state.provider.vouch_graph(&context, range)?;
    let clusters = identity_graph::find_collusion_clusters(&graph, threshold);
    Ok(Json(
        clusters
            .into_iter()
            .map(|c| CollusionClusterResponse {
                members: c.members.iter().map(|m| m.to_string()).collect(),
                density: c.density,
                suspicion: c.suspicion,
                confidence: c.confidence,
            })
            .collect(),
    ))
}

async fn analysis_dense_subgraphs(
    state: State<Arc<AppState>>,
    query: Query<AnalysisQuery>,
) -> AppResult<Vec<CollusionClusterResponse>> {
    // Same underlying dense-subgraph search as `/analysis/collusion`; kept
    // as a distinct route since callers may want a lower, exploratory
    // threshold without touching the rule set's collusion threshold.
    analysis_collusion(state, query).await
}

async fn analysis_diversity(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<AnalysisQuery>,
) -> AppResult<DiversityResponse> {
    let identity = parse_identity(&id)?;
    let context = AppState::resolve_context(query.context);
    let epoch = AppState::resolve_epoch(query.epoch);
    let range = core_range_for(epoch);
    let graph = state.provider.vouch_graph(&context, range)?;
    let communities = identity_graph::detect_communities(&graph);
    let diversity = identity_graph::shannon_diversity(&identity, &graph, &communities);
    Ok(Json(DiversityResponse { id, context, epoch, diversity }))
}

fn core_range_for(epoch: Epoch) -> EpochRange {
    EpochRange { from: Epoch::MIN, to: Some(epoch + 1) }
}

async fn get_config(State(state): State<Arc<AppState>>) -> Json<Config> {
    Json(state.config.read().expect("config lock poisoned").clone())
}

async fn put_config(
    State(state): State<Arc<AppState>>,
    Json(new_config): Json<Config>,
) -> AppResult<Config> {
    new_config.validate()?;
    let mut guard = state.config.write().expect("config lock poisoned");
    *guard = new_config.clone();
    Ok(Json(new_config))
}

async fn get_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(health::check(&state))
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/score/:id", get(get_score))
        .route("/score/:id/recompute", post(recompute_score))
        .route("/scores/batch", post(batch_score))
        .route("/score/:id/factors", get(score_factors))
        .route("/score/:id/proof", get(score_proof))
        .route("/proof/verify", post(verify_proof))
        .route("/budget/:id", get(get_budget))
        .route("/budget/:id/spend", post(spend_budget))
        .route("/budget/:id/refill", post(refill_budget))
        .route("/budget/:id/utilization", get(budget_utilization))
        .route("/analysis/collusion", get(analysis_collusion))
        .route("/analysis/dense-subgraphs", get(analysis_dense_subgraphs))
        .route("/analysis/diversity/:id", get(analysis_diversity))
        .route("/config", get(get_config).put(put_config))
        .route("/health", get(get_health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
