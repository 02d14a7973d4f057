use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use identity_codec::Bitstring;
use identity_core::{
    Identifier, IdentityError, StatusCheckResult, StatusListCredential, StatusListEntry,
    StatusPurpose, Timestamp,
};
use lru::LruCache;

struct CacheEntry {
    bitstring: Bitstring,
    expires_at: Instant,
}

/// Status lists identified by `issuer + purpose + creation-time`. The
/// decoded bitstring is cached with a per-entry TTL; every read returns a
/// clone so no caller can observe a later mutation through a held reference.
pub struct StatusListStore {
    tree: sled::Tree,
    cache: Mutex<LruCache<String, CacheEntry>>,
    cache_ttl: Duration,
    max_size: u64,
    expand_increment: u64,
    compression_level: u32,
}

pub struct StatusListConfig {
    pub cache_capacity: usize,
    pub cache_ttl: Duration,
    pub max_size: u64,
    pub expand_increment: u64,
    pub compression_level: u32,
}

impl Default for StatusListConfig {
    fn default() -> Self {
        Self {
            cache_capacity: 256,
            cache_ttl: Duration::from_secs(identity_core::DEFAULT_CACHE_TTL_SECS),
            max_size: identity_core::DEFAULT_STATUS_LIST_MAX_SIZE,
            expand_increment: identity_core::DEFAULT_EXPAND_INCREMENT,
            compression_level: identity_core::DEFAULT_COMPRESSION_LEVEL,
        }
    }
}

fn list_id(issuer: &Identifier, purpose: StatusPurpose, created_at: Timestamp) -> String {
    format!("{issuer}:{}:{created_at}", purpose.as_str())
}

impl StatusListStore {
    pub fn open<P: AsRef<Path>>(path: P, config: StatusListConfig) -> Result<Self, IdentityError> {
        let db = sled::open(path).map_err(|e| IdentityError::Storage(e.to_string()))?;
        Self::from_db(&db, config)
    }

    pub fn from_db(db: &sled::Db, config: StatusListConfig) -> Result<Self, IdentityError> {
        let tree = db
            .open_tree("status_lists")
            .map_err(|e| IdentityError::Storage(e.to_string()))?;
        let capacity = NonZeroUsize::new(config.cache_capacity.max(1)).unwrap();
        Ok(Self {
            tree,
            cache: Mutex::new(LruCache::new(capacity)),
            cache_ttl: config.cache_ttl,
            max_size: config.max_size,
            expand_increment: config.expand_increment,
            compression_level: config.compression_level,
        })
    }

    pub fn create(
        &self,
        issuer: Identifier,
        purpose: StatusPurpose,
        size_bits: u64,
        created_at: Timestamp,
    ) -> Result<String, IdentityError> {
        if size_bits == 0 {
            return Err(IdentityError::InvalidInput(
                "status list size must be greater than zero".into(),
            ));
        }
        let id = list_id(&issuer, purpose, created_at);
        if self.tree.contains_key(id.as_bytes()).unwrap_or(false) {
            return Err(IdentityError::AlreadyExists(format!("status list {id}")));
        }
        let bitstring = Bitstring::zeroed(size_bits);
        let encoded = bitstring.encode(self.compression_level)?;
        let credential = StatusListCredential {
            issuer,
            purpose,
            created_at,
            updated_at: created_at,
            size_bits: bitstring.bit_len(),
            next_free_index: 0,
            encoded_list: encoded,
        };
        self.persist(&id, &credential)?;
        self.cache_put(&id, bitstring);
        Ok(id)
    }

    /// Scans forward from `next_free_index` for the first unset bit,
    /// auto-expanding the list (if it's full and under `max_size`) rather
    /// than failing.
    pub fn allocate_index(&self, list_id: &str) -> Result<u64, IdentityError> {
        let mut credential = self.load(list_id)?;
        let mut bitstring = self.decode_cached(list_id, &credential)?;

        let index = match bitstring.first_zero_from(credential.next_free_index) {
            Some(i) => i,
            None => {
                let new_size = bitstring.bit_len() + self.expand_increment;
                if new_size > self.max_size {
                    return Err(IdentityError::ListFull);
                }
                bitstring.expand(self.expand_increment);
                let first_new = credential.next_free_index.max(bitstring.bit_len() - self.expand_increment);
                credential.size_bits = bitstring.bit_len();
                first_new
            }
        };

        credential.next_free_index = index + 1;
        credential.encoded_list = bitstring.encode(self.compression_level)?;
        self.persist(list_id, &credential)?;
        self.cache_put(list_id, bitstring);
        Ok(index)
    }

    pub fn update_status(
        &self,
        list_id: &str,
        index: u64,
        bit: bool,
        now: Timestamp,
    ) -> Result<(), IdentityError> {
        let mut credential = self.load(list_id)?;
        let mut bitstring = self.decode_cached(list_id, &credential)?;
        bitstring.set(index, bit)?;
        credential.encoded_list = bitstring.encode(self.compression_level)?;
        credential.updated_at = now;
        self.persist(list_id, &credential)?;
        self.invalidate(list_id);
        self.cache_put(list_id, bitstring);
        Ok(())
    }

    pub fn check_status(&self, entry: &StatusListEntry) -> Result<StatusCheckResult, IdentityError> {
        let credential = self.load(&entry.list_id)?;
        if credential.purpose != entry.purpose {
            return Err(IdentityError::InvalidInput(format!(
                "status list {} has purpose {:?}, expected {:?}",
                entry.list_id, credential.purpose, entry.purpose
            )));
        }
        let bitstring = self.decode_cached(&entry.list_id, &credential)?;
        let bit = bitstring.get(entry.index);
        Ok(StatusCheckResult {
            valid: !bit,
            bit,
            purpose: credential.purpose,
            index: entry.index,
            list_id: entry.list_id.clone(),
            last_updated: credential.updated_at,
        })
    }

    /// Renders a stored list as a StatusList2021 JSON-LD verifiable
    /// credential, for callers that need the W3C-shaped representation
    /// rather than the internal record.
    pub fn credential_json(&self, list_id: &str) -> Result<serde_json::Value, IdentityError> {
        Ok(self.load(list_id)?.to_json_ld(list_id))
    }

    fn load(&self, list_id: &str) -> Result<StatusListCredential, IdentityError> {
        let bytes = self
            .tree
            .get(list_id.as_bytes())
            .map_err(|e| IdentityError::Storage(e.to_string()))?
            .ok_or_else(|| IdentityError::NotFound(format!("status list {list_id}")))?;
        bincode::deserialize(&bytes).map_err(|e| IdentityError::Serialization(e.to_string()))
    }

    fn persist(&self, list_id: &str, credential: &StatusListCredential) -> Result<(), IdentityError> {
        let bytes =
            bincode::serialize(credential).map_err(|e| IdentityError::Serialization(e.to_string()))?;
        self.tree
            .insert(list_id.as_bytes(), bytes)
            .map_err(|e| IdentityError::Storage(e.to_string()))?;
        Ok(())
    }

    fn decode_cached(
        &self,
        list_id: &str,
        credential: &StatusListCredential,
    ) -> Result<Bitstring, IdentityError> {
        {
            let mut cache = self.cache.lock().unwrap();
            if let Some(entry) = cache.get(list_id) {
                if entry.expires_at > Instant::now() {
                    return Ok(entry.bitstring.clone());
                }
            }
            cache.pop(list_id);
        }
        Bitstring::decode(&credential.encoded_list)
    }

    fn cache_put(&self, list_id: &str, bitstring: Bitstring) {
        let mut cache = self.cache.lock().unwrap();
        cache.put(
            list_id.to_string(),
            CacheEntry {
                bitstring,
                expires_at: Instant::now() + self.cache_ttl,
            },
        );
    }

    fn invalidate(&self, list_id: &str) {
        self.cache.lock().unwrap().pop(list_id);
    }

    /// Removes expired cache entries. Intended to be called periodically by
    /// a background sweep task.
    pub fn sweep_expired_cache(&self) {
        let mut cache = self.cache.lock().unwrap();
        let now = Instant::now();
        let expired: Vec<String> = cache
            .iter()
            .filter(|(_, e)| e.expires_at <= now)
            .map(|(k, _)| k.clone())
            .collect();
        for key in expired {
            cache.pop(&key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> StatusListStore {
        let dir = tempfile::tempdir().unwrap();
        StatusListStore::open(dir.path(), StatusListConfig::default()).unwrap()
    }

    #[test]
    fn revoke_and_restore() {
        let store = store();
        let issuer = Identifier::new("key:issuer").unwrap();
        let id = store.create(issuer, StatusPurpose::Revocation, 8, 1).unwrap();
        let idx = store.allocate_index(&id).unwrap();
        assert_eq!(idx, 0);

        store.update_status(&id, idx, true, 10).unwrap();
        let entry = StatusListEntry {
            list_id: id.clone(),
            purpose: StatusPurpose::Revocation,
            index: idx,
        };
        let result = store.check_status(&entry).unwrap();
        assert!(!result.valid);
        assert!(result.bit);
        assert_eq!(result.last_updated, 10);

        store.update_status(&id, idx, false, 20).unwrap();
        let result = store.check_status(&entry).unwrap();
        assert!(result.valid);
        assert_eq!(result.last_updated, 20);
    }

    #[test]
    fn credential_json_ld_shape() {
        let store = store();
        let issuer = Identifier::new("key:issuer").unwrap();
        let id = store.create(issuer, StatusPurpose::Revocation, 8, 1).unwrap();
        let json = store.credential_json(&id).unwrap();
        assert_eq!(json["type"][1], "StatusList2021Credential");
        assert_eq!(json["credentialSubject"]["type"], "StatusList2021");
        assert_eq!(json["credentialSubject"]["statusPurpose"], "revocation");
        assert!(json["credentialSubject"]["encodedList"].is_string());
    }

    #[test]
    fn zero_size_refuses_creation() {
        let store = store();
        let issuer = Identifier::new("key:issuer").unwrap();
        assert!(store.create(issuer, StatusPurpose::Revocation, 0, 1).is_err());
    }

    #[test]
    fn duplicate_creation_rejected() {
        let store = store();
        let issuer = Identifier::new("key:issuer").unwrap();
        store.create(issuer.clone(), StatusPurpose::Revocation, 8, 1).unwrap();
        assert!(matches!(
            store.create(issuer, StatusPurpose::Revocation, 8, 1),
            Err(IdentityError::AlreadyExists(_))
        ));
    }
}
