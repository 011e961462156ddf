//! Ad-hoc record construction straight from a mapping.
//!
//! [`RecordFactory`] is the process registry of generated record types: it
//! owns the schema-keyed and name-keyed caches for the life of the factory.
//! It is not internally synchronized.

use smol_str::SmolStr;

use crate::cache::{NameCache, SchemaCache};
use crate::config::FactoryConfig;
use crate::error::RecordError;
use crate::populate::{Strictness, populate};
use crate::record::Record;
use crate::record_type::{RecordType, build_type};
use crate::types::FieldMap;

/// Build a plain record type with the given field names.
pub fn type_factory<I, S>(name: &str, field_names: I) -> Result<RecordType, RecordError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    build_type(name, field_names)
}

/// Allocate an instance of `record_type` and strictly populate it.
pub fn slots_from_type(record_type: &RecordType, mapping: FieldMap) -> Result<Record, RecordError> {
    let mut raw = record_type.allocate();
    populate(&mut raw, mapping, Strictness::Strict)?;
    raw.finish()
}

#[derive(Debug)]
pub struct RecordFactory {
    config: FactoryConfig,
    schema: SchemaCache,
    by_name: NameCache,
}

impl RecordFactory {
    pub fn new() -> Self {
        Self::with_config(FactoryConfig::default())
    }

    pub fn with_config(config: FactoryConfig) -> Self {
        Self {
            schema: SchemaCache::with_capacity(config.cache_capacity),
            by_name: NameCache::with_capacity(config.cache_capacity),
            config,
        }
    }

    #[inline]
    pub fn config(&self) -> &FactoryConfig {
        &self.config
    }

    #[inline]
    pub fn schema_cache(&self) -> &SchemaCache {
        &self.schema
    }

    #[inline]
    pub fn name_cache(&self) -> &NameCache {
        &self.by_name
    }

    /// Build a record whose fields are the keys of `mapping`, reusing a cached
    /// type when the same name and field set were seen before.
    ///
    /// `name` falls back to [`FactoryConfig::default_name`].
    pub fn slots_factory(
        &mut self,
        name: Option<&str>,
        mapping: FieldMap,
    ) -> Result<Record, RecordError> {
        let name = self.resolve_name(name);
        let fields: Vec<SmolStr> = mapping.keys().cloned().collect();
        let record_type = self.schema.get_or_build(&name, &fields)?;
        slots_from_type(&record_type, mapping)
    }

    /// Like [`slots_factory`](Self::slots_factory) but the type is looked up
    /// by name only. A name reused with a different field set rebuilds its
    /// type once; if that also fails the error is
    /// [`RecordError::CacheRebuildFailure`].
    pub fn fast_slots(&mut self, name: Option<&str>, mapping: FieldMap) -> Result<Record, RecordError> {
        let name = self.resolve_name(name);
        let fields: Vec<SmolStr> = mapping.keys().cloned().collect();
        self.by_name
            .with_retry(&name, &fields, |record_type| {
                slots_from_type(record_type, mapping.clone())
            })
    }

    fn resolve_name(&self, name: Option<&str>) -> SmolStr {
        name.map(SmolStr::new)
            .unwrap_or_else(|| self.config.default_name.clone())
    }
}

impl Default for RecordFactory {
    fn default() -> Self {
        Self::new()
    }
}
