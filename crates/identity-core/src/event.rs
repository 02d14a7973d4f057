use serde::{Deserialize, Serialize};

use crate::types::{ContentId, Context, Epoch, Identifier, Timestamp};

/// The five kinds of events the event store accepts. Extra variants are
/// appended, never inserted, so existing serialized tags stay stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventType {
    Vouch,
    Attestation,
    Report,
    Kyc,
    Revocation,
    RuleUpdate,
    Checkpoint,
}

/// Immutable record appended to the event log. Once stored, its bytes never
/// change — corrections are new events with new content IDs superseding the
/// prior ones.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "type")]
    pub kind: EventType,
    pub from: Identifier,
    pub to: Option<Identifier>,
    pub context: Context,
    /// Content ID of an associated payload blob, if the event carries one.
    pub payload_ref: Option<ContentId>,
    pub epoch: Epoch,
    pub issued_at: Timestamp,
}

impl Event {
    pub fn new(
        kind: EventType,
        from: Identifier,
        to: Option<Identifier>,
        context: Context,
        payload_ref: Option<ContentId>,
        epoch: Epoch,
        issued_at: Timestamp,
    ) -> Self {
        Self {
            kind,
            from,
            to,
            context,
            payload_ref,
            epoch,
            issued_at,
        }
    }
}

/// Canonical sort key for determinism: `(epoch, content-id)` — see the
/// scoring engine's determinism contract.
pub fn canonical_sort_key(event_cid: &ContentId, epoch: Epoch) -> (Epoch, ContentId) {
    (epoch, *event_cid)
}

/// Which side of an event's `(from, to)` pair to index/query by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    From,
    To,
    Both,
}
