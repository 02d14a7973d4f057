//! Typed payloads for the five evidence classes. An `Event`'s
//! `payload_ref` points at the blob holding one of these, canonically
//! encoded; the event itself carries only the routing fields
//! (`from`/`to`/`context`/`epoch`).

use serde::{Deserialize, Serialize};

use crate::types::{Epoch, Identifier};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KycPayload {
    pub issuer: Identifier,
    pub weight: f64,
    /// Epoch after which this credential no longer counts toward `K`.
    pub expires_at_epoch: Option<Epoch>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttestationPayload {
    pub issuer: Identifier,
    pub attestation_type: String,
    pub weight: f64,
    pub issuer_reputation: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VouchPayload {
    pub strength: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportPayload {
    pub issuer: Identifier,
    pub severity: f64,
    pub adjudicated: bool,
    pub upheld: bool,
}
