//! Process-scoped request records.

use super::record::{RequestRecord, Resolution};
use crate::cache::RequestKey;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

#[derive(Default)]
struct Inner {
    records: HashMap<String, RequestRecord>,
    ids: HashMap<RequestKey, String>,
}

/// Records keyed by id, plus the key→id index. Records are never evicted.
///
/// Locks are held only for map access, never across a generation call.
#[derive(Default)]
pub struct RequestStore {
    inner: RwLock<Inner>,
}

impl RequestStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the record for `key`, creating a pending one on first sight.
    pub fn get_or_insert(&self, key: &RequestKey, city: &str, sector: &str) -> RequestRecord {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(id) = inner.ids.get(key) {
            if let Some(existing) = inner.records.get(id) {
                return existing.clone();
            }
        }
        let id = key.request_id();
        let record = RequestRecord::pending(id.clone(), city, sector);
        inner.ids.insert(key.clone(), id.clone());
        inner.records.insert(id, record.clone());
        record
    }

    pub fn get(&self, id: &str) -> Option<RequestRecord> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .records
            .get(id)
            .cloned()
    }

    /// Apply `resolution` only if the record is still pending.
    ///
    /// Returns the stored record afterwards, so a caller that lost the race
    /// gets the winner's terminal state.
    pub fn complete(&self, id: &str, resolution: Resolution) -> Option<RequestRecord> {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let record = inner.records.get_mut(id)?;
        if !record.status.is_terminal() {
            record.resolve(resolution);
        }
        Some(record.clone())
    }

    pub fn len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .records
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::RequestStatus;

    #[test]
    fn test_same_key_shares_one_record() {
        let store = RequestStore::new();
        let a = store.get_or_insert(&RequestKey::new("Pune", "Baner"), "Pune", "Baner");
        let b = store.get_or_insert(&RequestKey::new(" pune", "BANER "), "pune", "BANER");
        assert_eq!(a.id, b.id);
        assert_eq!(b.city, "Pune");
        assert_eq!(store.len(), 1);
        assert_eq!(a.id, RequestKey::new("PUNE", "baner").request_id());
    }

    #[test]
    fn test_completion_is_compare_and_set() {
        let store = RequestStore::new();
        let id = store
            .get_or_insert(&RequestKey::new("x", "y"), "x", "y")
            .id;

        let first = store
            .complete(&id, Resolution::Invalid { reason: "first".into() })
            .unwrap();
        assert_eq!(first.status, RequestStatus::InvalidInput);

        let second = store
            .complete(
                &id,
                Resolution::Ambiguous {
                    suggested_cities: vec!["a".into(), "b".into()],
                },
            )
            .unwrap();
        assert_eq!(second, first);
        assert!(store.complete("missing", Resolution::Invalid { reason: String::new() }).is_none());
    }
}
