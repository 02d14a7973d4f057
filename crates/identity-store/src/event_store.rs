use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use identity_codec::content_id_of_bytes;
use identity_core::{ContentId, Direction, Epoch, Event, EventType, IdentityError};
use sled::transaction::{ConflictableTransactionError, TransactionError, Transactional};
use tracing::{debug, warn};

/// `[from, to)` epoch window; `to = None` means unbounded.
#[derive(Debug, Clone, Copy)]
pub struct EpochRange {
    pub from: Epoch,
    pub to: Option<Epoch>,
}

impl EpochRange {
    pub fn all() -> Self {
        Self {
            from: Epoch::MIN,
            to: None,
        }
    }

    fn contains(&self, epoch: Epoch) -> bool {
        epoch >= self.from && self.to.map_or(true, |to| epoch < to)
    }
}

fn event_type_tag(kind: EventType) -> u8 {
    match kind {
        EventType::Vouch => 0,
        EventType::Attestation => 1,
        EventType::Report => 2,
        EventType::Kyc => 3,
        EventType::Revocation => 4,
        EventType::RuleUpdate => 5,
        EventType::Checkpoint => 6,
    }
}

fn index_key(prefix: &[u8], epoch: Epoch, cid: &ContentId) -> Vec<u8> {
    let mut key = Vec::with_capacity(prefix.len() + 8 + 32);
    key.extend_from_slice(prefix);
    key.extend_from_slice(&epoch.to_be_bytes());
    key.extend_from_slice(cid.as_bytes());
    key
}

/// Two-tier content-addressed store: a structured key-value tier for events
/// and their multi-indexes (`idx-from`, `idx-to`, `idx-type`), and a
/// content-addressed blob tier, both backed by sled.
pub struct EventStore {
    events: sled::Tree,
    blobs: sled::Tree,
    idx_from: sled::Tree,
    idx_to: sled::Tree,
    idx_type: sled::Tree,
    max_blob_size: usize,
    closed: AtomicBool,
}

/// Not named as a specific constant in the specification; chosen as a
/// conservative ceiling for a single credential/evidence payload blob.
pub const DEFAULT_MAX_BLOB_SIZE: usize = 16 * 1024 * 1024;

impl EventStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, IdentityError> {
        Self::open_with_max_blob_size(path, DEFAULT_MAX_BLOB_SIZE)
    }

    pub fn open_with_max_blob_size<P: AsRef<Path>>(
        path: P,
        max_blob_size: usize,
    ) -> Result<Self, IdentityError> {
        let db = sled::open(path).map_err(|e| IdentityError::Storage(e.to_string()))?;
        let open = |name: &str| -> Result<sled::Tree, IdentityError> {
            db.open_tree(name).map_err(|e| IdentityError::Storage(e.to_string()))
        };
        let store = Self {
            events: open("events")?,
            blobs: open("blobs")?,
            idx_from: open("idx_from")?,
            idx_to: open("idx_to")?,
            idx_type: open("idx_type")?,
            max_blob_size,
            closed: AtomicBool::new(false),
        };
        store.repair_indexes()?;
        Ok(store)
    }

    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    fn ensure_open(&self) -> Result<(), IdentityError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(IdentityError::Closed);
        }
        Ok(())
    }

    // ── Blobs ────────────────────────────────────────────────────────────────

    /// Idempotent: writing the same bytes twice returns the same content ID
    /// without re-persisting.
    pub fn put_blob(&self, bytes: &[u8]) -> Result<ContentId, IdentityError> {
        self.ensure_open()?;
        if bytes.len() > self.max_blob_size {
            return Err(IdentityError::TooLarge(format!(
                "blob of {} bytes exceeds max {}",
                bytes.len(),
                self.max_blob_size
            )));
        }
        let cid = content_id_of_bytes(bytes);
        if !self.blobs.contains_key(cid.as_bytes()).unwrap_or(false) {
            self.blobs
                .insert(cid.as_bytes(), bytes)
                .map_err(|e| IdentityError::Storage(e.to_string()))?;
        }
        Ok(cid)
    }

    pub fn get_blob(&self, cid: &ContentId) -> Result<Vec<u8>, IdentityError> {
        self.ensure_open()?;
        self.blobs
            .get(cid.as_bytes())
            .map_err(|e| IdentityError::Storage(e.to_string()))?
            .map(|iv| iv.to_vec())
            .ok_or_else(|| IdentityError::NotFound(format!("blob {cid}")))
    }

    pub fn has_blob(&self, cid: &ContentId) -> bool {
        self.blobs.contains_key(cid.as_bytes()).unwrap_or(false)
    }

    // ── Events ───────────────────────────────────────────────────────────────

    /// Persists the event and atomically updates all three indexes via a
    /// single sled transaction — the whole write is all-or-nothing.
    pub fn put_event(&self, event: &Event) -> Result<ContentId, IdentityError> {
        self.ensure_open()?;
        let event_bytes =
            bincode::serialize(event).map_err(|e| IdentityError::Serialization(e.to_string()))?;
        let cid = content_id_of_bytes(&event_bytes);

        let from_key = index_key(event.from.as_str().as_bytes(), event.epoch, &cid);
        let to_key = event
            .to
            .as_ref()
            .map(|to| index_key(to.as_str().as_bytes(), event.epoch, &cid));
        let type_key = index_key(&[event_type_tag(event.kind)], event.epoch, &cid);

        (&self.events, &self.idx_from, &self.idx_to, &self.idx_type)
            .transaction(|(events, idx_from, idx_to, idx_type)| {
                events.insert(cid.as_bytes().as_slice(), event_bytes.clone())?;
                idx_from.insert(from_key.as_slice(), cid.as_bytes().as_slice())?;
                if let Some(to_key) = &to_key {
                    idx_to.insert(to_key.as_slice(), cid.as_bytes().as_slice())?;
                }
                idx_type.insert(type_key.as_slice(), cid.as_bytes().as_slice())?;
                Ok::<_, ConflictableTransactionError<()>>(())
            })
            .map_err(|e: TransactionError<()>| IdentityError::Storage(e.to_string()))?;

        debug!(cid = %cid, kind = ?event.kind, epoch = event.epoch, "event committed");
        Ok(cid)
    }

    /// Atomic with respect to failure of the event write: the blob persists
    /// first (harmless if the event write later fails — it is simply
    /// orphaned and collected later), but the event never appears without
    /// its referenced blob already present.
    pub fn put_event_and_blob(
        &self,
        mut event: Event,
        blob_bytes: &[u8],
    ) -> Result<(ContentId, ContentId), IdentityError> {
        let blob_cid = self.put_blob(blob_bytes)?;
        event.payload_ref = Some(blob_cid);
        let event_cid = self.put_event(&event)?;
        Ok((event_cid, blob_cid))
    }

    pub fn get_event(&self, cid: &ContentId) -> Result<Event, IdentityError> {
        self.ensure_open()?;
        let bytes = self
            .events
            .get(cid.as_bytes())
            .map_err(|e| IdentityError::Storage(e.to_string()))?
            .ok_or_else(|| IdentityError::NotFound(format!("event {cid}")))?;
        bincode::deserialize(&bytes).map_err(|e| IdentityError::Serialization(e.to_string()))
    }

    /// Events touching `id` as `from`, `to`, or both, ordered by epoch then
    /// content ID, restricted to `range`.
    pub fn get_events_by_identity(
        &self,
        id: &str,
        direction: Direction,
        range: EpochRange,
    ) -> Result<Vec<(ContentId, Event)>, IdentityError> {
        self.ensure_open()?;
        let mut cids = Vec::new();
        if matches!(direction, Direction::From | Direction::Both) {
            cids.extend(self.scan_index(&self.idx_from, id.as_bytes(), range)?);
        }
        if matches!(direction, Direction::To | Direction::Both) {
            cids.extend(self.scan_index(&self.idx_to, id.as_bytes(), range)?);
        }
        cids.sort();
        cids.dedup();
        self.load_events(cids)
    }

    pub fn get_events_by_type(
        &self,
        kind: EventType,
        range: EpochRange,
    ) -> Result<Vec<(ContentId, Event)>, IdentityError> {
        self.ensure_open()?;
        let cids = self.scan_index(&self.idx_type, &[event_type_tag(kind)], range)?;
        self.load_events(cids)
    }

    fn scan_index(
        &self,
        tree: &sled::Tree,
        prefix: &[u8],
        range: EpochRange,
    ) -> Result<Vec<(Epoch, ContentId)>, IdentityError> {
        let mut out = Vec::new();
        for item in tree.scan_prefix(prefix) {
            let (key, value) = item.map_err(|e| IdentityError::Storage(e.to_string()))?;
            let epoch_bytes = &key[prefix.len()..prefix.len() + 8];
            let mut epoch_arr = [0u8; 8];
            epoch_arr.copy_from_slice(epoch_bytes);
            let epoch = Epoch::from_be_bytes(epoch_arr);
            if !range.contains(epoch) {
                continue;
            }
            let mut cid_arr = [0u8; 32];
            cid_arr.copy_from_slice(&value);
            out.push((epoch, ContentId::from_bytes(cid_arr)));
        }
        out.sort();
        Ok(out)
    }

    fn load_events(
        &self,
        ordered: Vec<(Epoch, ContentId)>,
    ) -> Result<Vec<(ContentId, Event)>, IdentityError> {
        ordered
            .into_iter()
            .map(|(_, cid)| self.get_event(&cid).map(|ev| (cid, ev)))
            .collect()
    }

    /// Re-derives indexes from the event log. Called on open so partial
    /// index corruption self-heals; cheap no-op when indexes already match.
    fn repair_indexes(&self) -> Result<(), IdentityError> {
        let event_count = self.events.len();
        let index_count = self.idx_from.len();
        if index_count >= event_count {
            return Ok(());
        }
        warn!(
            event_count,
            index_count, "index appears incomplete, rebuilding from event log"
        );
        for item in self.events.iter() {
            let (_, bytes) = item.map_err(|e| IdentityError::Storage(e.to_string()))?;
            let event: Event =
                bincode::deserialize(&bytes).map_err(|e| IdentityError::Serialization(e.to_string()))?;
            let cid = content_id_of_bytes(&bytes);
            let from_key = index_key(event.from.as_str().as_bytes(), event.epoch, &cid);
            self.idx_from
                .insert(from_key, cid.as_bytes().as_slice())
                .map_err(|e| IdentityError::Storage(e.to_string()))?;
            if let Some(to) = &event.to {
                let to_key = index_key(to.as_str().as_bytes(), event.epoch, &cid);
                self.idx_to
                    .insert(to_key, cid.as_bytes().as_slice())
                    .map_err(|e| IdentityError::Storage(e.to_string()))?;
            }
            let type_key = index_key(&[event_type_tag(event.kind)], event.epoch, &cid);
            self.idx_type
                .insert(type_key, cid.as_bytes().as_slice())
                .map_err(|e| IdentityError::Storage(e.to_string()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use identity_core::Identifier;

    fn temp_store() -> EventStore {
        let dir = tempfile::tempdir().unwrap();
        EventStore::open(dir.path()).unwrap()
    }

    fn make_event(from: &str, to: Option<&str>, epoch: Epoch) -> Event {
        Event::new(
            EventType::Vouch,
            Identifier::new(from).unwrap(),
            to.map(|s| Identifier::new(s).unwrap()),
            "commerce".into(),
            None,
            epoch,
            epoch * 86_400,
        )
    }

    #[test]
    fn blob_round_trip_is_idempotent() {
        let store = temp_store();
        let cid1 = store.put_blob(b"Hello, World!").unwrap();
        let cid2 = store.put_blob(b"Hello, World!").unwrap();
        assert_eq!(cid1, cid2);
        assert_eq!(store.get_blob(&cid1).unwrap(), b"Hello, World!");
    }

    #[test]
    fn missing_blob_errors() {
        let store = temp_store();
        let cid = content_id_of_bytes(b"never written");
        assert!(matches!(store.get_blob(&cid), Err(IdentityError::NotFound(_))));
    }

    #[test]
    fn closed_store_rejects_operations() {
        let store = temp_store();
        store.close();
        assert!(matches!(store.put_blob(b"x"), Err(IdentityError::Closed)));
    }

    #[test]
    fn events_ordered_by_epoch_then_cid() {
        let store = temp_store();
        store.put_event(&make_event("key:alice", Some("key:bob"), 5)).unwrap();
        store.put_event(&make_event("key:alice", Some("key:carol"), 1)).unwrap();
        let events = store
            .get_events_by_identity("key:alice", Direction::From, EpochRange::all())
            .unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].1.epoch, 1);
        assert_eq!(events[1].1.epoch, 5);
    }

    #[test]
    fn epoch_range_filters() {
        let store = temp_store();
        store.put_event(&make_event("key:alice", None, 1)).unwrap();
        store.put_event(&make_event("key:alice", None, 50)).unwrap();
        let events = store
            .get_events_by_identity(
                "key:alice",
                Direction::From,
                EpochRange { from: 10, to: None },
            )
            .unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].1.epoch, 50);
    }
}
