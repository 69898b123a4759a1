//! Per-entity-type deduplication.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::Error;
use crate::split::TypeMarker;

/// The canonical handle to a mapped entity.
///
/// An entity referenced from many rows or many parents (a supervisor shared by
/// a whole team) is one instance behind a shared handle; `Arc::ptr_eq` is the
/// identity test. The interior lock is what lets later rows keep appending to
/// the instance's relation collections after it was first returned.
pub type Shared<E> = Arc<Mutex<E>>;

/// Wraps a freshly mapped entity in its canonical handle.
pub fn shared<E>(entity: E) -> Shared<E> {
    Arc::new(Mutex::new(entity))
}

type KeyOf<K, E> = Box<dyn Fn(&E) -> Option<K> + Send + Sync>;

/// Collapses every fragment carrying a given primary key onto one canonical
/// instance.
///
/// One cache per deduplicating entity type, alive for the whole query
/// execution (not reset between rows), owned by whoever drives the query and
/// passed explicitly to the mappers that need it. The lock around the entries
/// is a safety net for callers that feed rows from more than one thread, not a
/// concurrency feature: the engine itself processes rows sequentially.
pub struct DedupCache<K, E> {
    kind: TypeMarker,
    key_of: KeyOf<K, E>,
    entries: Mutex<HashMap<K, Shared<E>>>,
}

impl<K, E> DedupCache<K, E>
where
    K: Eq + Hash,
{
    /// `key_of` is the caller-supplied primary-key extractor; it returning
    /// `None` for an entity is a fatal configuration or data error.
    pub fn new(
        kind: impl Into<TypeMarker>,
        key_of: impl Fn(&E) -> Option<K> + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind: kind.into(),
            key_of: Box::new(key_of),
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Resolves a freshly decoded instance to its canonical handle.
    ///
    /// Absence propagates unchanged. A key seen before discards `raw` and
    /// returns the instance already cached under that key; an unseen key
    /// caches `raw` and returns it.
    pub fn resolve(&self, raw: Option<E>) -> Result<Option<Shared<E>>, Error> {
        let Some(raw) = raw else {
            return Ok(None);
        };
        let key = (self.key_of)(&raw).ok_or_else(|| Error::NullPrimaryKey {
            kind: self.kind.clone(),
        })?;

        let mut entries = self.entries.lock();
        let canonical = match entries.entry(key) {
            Entry::Occupied(slot) => {
                tracing::trace!(kind = %self.kind, "repeated primary key, reusing canonical instance");
                slot.get().clone()
            }
            Entry::Vacant(slot) => slot.insert(shared(raw)).clone(),
        };
        Ok(Some(canonical))
    }

    /// Number of distinct primary keys seen so far.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
