use serde::{Deserialize, Serialize};

use identity_core::{Epoch, ScoreComponents};
use identity_crypto::ScoreProof;

#[derive(Debug, Deserialize)]
pub struct ScoreQuery {
    pub context: Option<String>,
    pub epoch: Option<Epoch>,
    #[serde(default)]
    pub include_proof: bool,
    #[serde(default)]
    pub include_factors: bool,
}

#[derive(Debug, Serialize)]
pub struct ScoreResponse {
    pub identity: String,
    pub context: String,
    pub epoch: Epoch,
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub components: Option<ScoreComponents>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proof: Option<ScoreProof>,
}

#[derive(Debug, Deserialize)]
pub struct BatchScoreItem {
    pub identity: String,
    pub context: Option<String>,
    pub epoch: Option<Epoch>,
}

#[derive(Debug, Deserialize)]
pub struct BatchScoreRequest {
    pub requests: Vec<BatchScoreItem>,
}

#[derive(Debug, Serialize)]
pub struct BatchScoreResult {
    pub identity: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<ScoreResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BatchScoreResponse {
    pub results: Vec<BatchScoreResult>,
}

#[derive(Debug, Deserialize)]
pub struct VerifyProofRequest {
    pub proof: ScoreProof,
}

#[derive(Debug, Serialize)]
pub struct VerifyProofResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BudgetResponse {
    pub identity: String,
    pub context: String,
    pub epoch: Epoch,
    pub total: f64,
    pub spent: f64,
    pub remaining: f64,
    pub reputation_bond: f64,
}

#[derive(Debug, Deserialize)]
pub struct SpendRequest {
    pub context: String,
    pub epoch: Epoch,
    pub amount: f64,
}

#[derive(Debug, Deserialize)]
pub struct RefillRequest {
    pub context: String,
    pub epoch: Epoch,
    pub score: f64,
}

#[derive(Debug, Serialize)]
pub struct SpendResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct UtilizationResponse {
    pub utilization_rate: f64,
    pub penalty: f64,
    pub timestamp: i64,
}

#[derive(Debug, Deserialize)]
pub struct AnalysisQuery {
    pub context: Option<String>,
    pub epoch: Option<Epoch>,
    pub threshold: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct CollusionClusterResponse {
    pub members: Vec<String>,
    pub density: f64,
    pub suspicion: f64,
    pub confidence: f64,
}

#[derive(Debug, Serialize)]
pub struct DiversityResponse {
    pub id: String,
    pub context: String,
    pub epoch: Epoch,
    pub diversity: f64,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub components: Vec<ComponentHealth>,
}

#[derive(Debug, Serialize)]
pub struct ComponentHealth {
    pub name: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}
