use std::sync::Arc;

use identity_core::{
    AttestationPayload, Context, Direction, Epoch, EventType, Identifier, IdentityError,
    KycPayload, ReportPayload, VouchPayload,
};
use identity_store::{EpochRange, EventStore};

use crate::records::{AttestationRecord, KycRecord, ReportRecord, VouchEdge, VouchGraph, VouchRecord};

/// Read-only, typed view over `identity-store`, shared by the scoring
/// engine, the graph analyzer, and the budget manager. Never mutates the
/// store; asking it to write is a programming error, not a runtime state.
pub struct DataProvider {
    store: Arc<EventStore>,
}

fn decode_payload<T: serde::de::DeserializeOwned>(
    store: &EventStore,
    payload_ref: Option<identity_core::ContentId>,
) -> Result<Option<T>, IdentityError> {
    let Some(cid) = payload_ref else {
        return Ok(None);
    };
    let bytes = store.get_blob(&cid)?;
    let payload = bincode::deserialize(&bytes).map_err(|e| IdentityError::Serialization(e.to_string()))?;
    Ok(Some(payload))
}

impl DataProvider {
    pub fn new(store: Arc<EventStore>) -> Self {
        Self { store }
    }

    pub fn kyc_records(
        &self,
        identity: &Identifier,
        context: &Context,
        epoch: Epoch,
    ) -> Result<Vec<KycRecord>, IdentityError> {
        let events = self.store.get_events_by_identity(
            identity.as_str(),
            Direction::To,
            EpochRange { from: Epoch::MIN, to: Some(epoch + 1) },
        )?;
        let mut out = Vec::new();
        for (_, event) in events {
            if event.kind != EventType::Kyc || &event.context != context {
                continue;
            }
            if let Some(payload) = decode_payload::<KycPayload>(&self.store, event.payload_ref)? {
                if payload.expires_at_epoch.map_or(true, |exp| exp > epoch) {
                    out.push(KycRecord {
                        issuer: payload.issuer,
                        weight: payload.weight,
                        epoch: event.epoch,
                    });
                }
            }
        }
        Ok(out)
    }

    pub fn attestations(
        &self,
        identity: &Identifier,
        context: &Context,
        epoch: Epoch,
    ) -> Result<Vec<AttestationRecord>, IdentityError> {
        let events = self.store.get_events_by_identity(
            identity.as_str(),
            Direction::To,
            EpochRange { from: Epoch::MIN, to: Some(epoch + 1) },
        )?;
        let mut out = Vec::new();
        for (_, event) in events {
            if event.kind != EventType::Attestation || &event.context != context {
                continue;
            }
            if let Some(payload) = decode_payload::<AttestationPayload>(&self.store, event.payload_ref)? {
                out.push(AttestationRecord {
                    issuer: payload.issuer,
                    weight: payload.weight,
                    issuer_reputation: payload.issuer_reputation,
                    epoch: event.epoch,
                });
            }
        }
        Ok(out)
    }

    pub fn vouches_received(
        &self,
        identity: &Identifier,
        context: &Context,
        epoch: Epoch,
    ) -> Result<Vec<VouchRecord>, IdentityError> {
        let events = self.store.get_events_by_identity(
            identity.as_str(),
            Direction::To,
            EpochRange { from: Epoch::MIN, to: Some(epoch + 1) },
        )?;
        let mut out = Vec::new();
        for (_, event) in events {
            if event.kind != EventType::Vouch || &event.context != context {
                continue;
            }
            let strength = decode_payload::<VouchPayload>(&self.store, event.payload_ref)?
                .map(|p| p.strength)
                .unwrap_or(0.0);
            out.push(VouchRecord {
                from: event.from,
                strength,
                epoch: event.epoch,
            });
        }
        Ok(out)
    }

    pub fn reports(
        &self,
        identity: &Identifier,
        context: &Context,
        epoch: Epoch,
    ) -> Result<Vec<ReportRecord>, IdentityError> {
        let events = self.store.get_events_by_identity(
            identity.as_str(),
            Direction::To,
            EpochRange { from: Epoch::MIN, to: Some(epoch + 1) },
        )?;
        let mut out = Vec::new();
        for (_, event) in events {
            if event.kind != EventType::Report || &event.context != context {
                continue;
            }
            if let Some(payload) = decode_payload::<ReportPayload>(&self.store, event.payload_ref)? {
                out.push(ReportRecord {
                    issuer: payload.issuer,
                    severity: payload.severity,
                    adjudicated: payload.adjudicated,
                    upheld: payload.upheld,
                    epoch: event.epoch,
                });
            }
        }
        Ok(out)
    }

    /// `(first_activity, last_activity)` epochs across any event touching
    /// `identity` up to and including `epoch`. `None` if the identity has no
    /// recorded activity.
    pub fn activity_span(
        &self,
        identity: &Identifier,
        epoch: Epoch,
    ) -> Result<Option<(Epoch, Epoch)>, IdentityError> {
        let events = self.store.get_events_by_identity(
            identity.as_str(),
            Direction::Both,
            EpochRange { from: Epoch::MIN, to: Some(epoch + 1) },
        )?;
        if events.is_empty() {
            return Ok(None);
        }
        let first = events.iter().map(|(_, e)| e.epoch).min().unwrap();
        let last = events.iter().map(|(_, e)| e.epoch).max().unwrap();
        Ok(Some((first, last)))
    }

    /// Builds the vouch graph for a `(context, epoch-range)` window from the
    /// event store's `Vouch` events.
    pub fn vouch_graph(&self, context: &Context, range: EpochRange) -> Result<VouchGraph, IdentityError> {
        let events = self.store.get_events_by_type(EventType::Vouch, range)?;
        let mut graph = VouchGraph::default();
        let mut seen = std::collections::HashSet::new();
        for (_, event) in events {
            if &event.context != context {
                continue;
            }
            let Some(to) = event.to.clone() else { continue };
            let strength = decode_payload::<VouchPayload>(&self.store, event.payload_ref)?
                .map(|p| p.strength)
                .unwrap_or(0.0);
            for node in [&event.from, &to] {
                if seen.insert(node.clone()) {
                    graph.nodes.push(node.clone());
                }
            }
            graph.edges.push(VouchEdge {
                from: event.from,
                to,
                strength,
                epoch: event.epoch,
            });
        }
        Ok(graph)
    }
}
