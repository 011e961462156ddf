//! Record-type caches.
//!
//! Both caches are plain owned values; `&mut self` on every mutating call
//! means sharing one across threads needs a lock held by the caller. Entries
//! live as long as the cache. The only removal is the name-keyed cache's
//! evict-on-failure.

use smol_str::SmolStr;
use tracing::{debug, trace};

use crate::error::RecordError;
use crate::fingerprint::{Fingerprint, fingerprint};
use crate::record_type::{RecordType, build_type};
use crate::types::FastMap;

// ─── Schema-keyed ───────────────────────────────────────────────────────────

/// Caches record types by `(name, field-name set)`. Field sets that differ
/// under the same name get separate entries.
#[derive(Debug, Default)]
pub struct SchemaCache {
    types: FastMap<Fingerprint, RecordType>,
}

impl SchemaCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            types: FastMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Return the cached type for this shape, building it on first request.
    /// Field order is taken from the request that builds the entry.
    pub fn get_or_build(
        &mut self,
        name: &str,
        field_names: &[SmolStr],
    ) -> Result<RecordType, RecordError> {
        let key = fingerprint(name, field_names);
        if let Some(cached) = self.types.get(&key) {
            trace!(name, digest = key.digest(), "schema cache hit");
            return Ok(cached.clone());
        }
        let record_type = build_type(name, field_names)?;
        debug!(name, digest = key.digest(), "schema cache miss");
        self.types.insert(key, record_type.clone());
        Ok(record_type)
    }

    pub fn get(&self, key: &Fingerprint) -> Option<&RecordType> {
        self.types.get(key)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

// ─── Name-keyed ─────────────────────────────────────────────────────────────

/// Caches record types by name alone.
///
/// Reusing a name with a different field set silently replaces the old
/// entry on the first failed construction. Callers that need one entry per
/// shape use [`SchemaCache`].
#[derive(Debug, Default)]
pub struct NameCache {
    types: FastMap<SmolStr, RecordType>,
}

impl NameCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            types: FastMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    pub fn get_or_build(
        &mut self,
        name: &str,
        field_names: &[SmolStr],
    ) -> Result<RecordType, RecordError> {
        if let Some(cached) = self.types.get(name) {
            trace!(name, "name cache hit");
            return Ok(cached.clone());
        }
        let record_type = build_type(name, field_names)?;
        debug!(name, fields = field_names.len(), "name cache miss");
        self.types.insert(SmolStr::new(name), record_type.clone());
        Ok(record_type)
    }

    /// Look up (or build) the type for `name` and run `construct` on it.
    ///
    /// If `construct` fails, the entry is evicted, rebuilt from `field_names`
    /// and `construct` runs once more. A second failure is returned as
    /// [`RecordError::CacheRebuildFailure`]; there is no further retry.
    pub fn with_retry<T, F>(
        &mut self,
        name: &str,
        field_names: &[SmolStr],
        mut construct: F,
    ) -> Result<T, RecordError>
    where
        F: FnMut(&RecordType) -> Result<T, RecordError>,
    {
        let record_type = self.get_or_build(name, field_names)?;
        match construct(&record_type) {
            Ok(out) => Ok(out),
            Err(first) => {
                debug!(name, error = %first, "evicting record type and rebuilding");
                self.evict(name);
                let rebuilt = self.get_or_build(name, field_names).map_err(|e| {
                    RecordError::CacheRebuildFailure {
                        name: SmolStr::new(name),
                        source: Box::new(e),
                    }
                })?;
                construct(&rebuilt).map_err(|e| RecordError::CacheRebuildFailure {
                    name: SmolStr::new(name),
                    source: Box::new(e),
                })
            }
        }
    }

    pub fn evict(&mut self, name: &str) -> Option<RecordType> {
        self.types.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&RecordType> {
        self.types.get(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
