//! Field population: writing a mapping onto a field-uninitialized instance.
//!
//! All writes here go through [`RawRecord`], i.e. the construction path. The
//! frozen flag of a type only guards [`Record`] writes, so frozen types are
//! populated through exactly the same code as mutable ones.

use crate::error::RecordError;
use crate::record::{RawRecord, Record};
use crate::record_type::FieldDefault;
use crate::types::FieldMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strictness {
    /// The mapping must name every field exactly once.
    Strict,
    /// Overwrite by name; no count check. For instances that already hold
    /// default values.
    Lenient,
}

/// Write `mapping` onto `raw`, matching entries to fields by name.
///
/// Names not declared on the type fail with [`RecordError::UnknownField`].
/// In strict mode a size mismatch fails with [`RecordError::ArityMismatch`]
/// before anything is written; with sizes equal and every name known, each
/// field ends up written exactly once.
pub fn populate(
    raw: &mut RawRecord,
    mapping: FieldMap,
    strictness: Strictness,
) -> Result<(), RecordError> {
    let expected = raw.record_type().len();
    if strictness == Strictness::Strict && mapping.len() != expected {
        return Err(RecordError::ArityMismatch {
            expected,
            actual: mapping.len(),
        });
    }
    for (name, value) in mapping {
        raw.write(&name, value)?;
    }
    Ok(())
}

/// Populate from the type's declared defaults plus caller overrides, then
/// evaluate derived fields and bind the member table.
///
/// Order of writes: static defaults and producer results (declaration order,
/// skipping overridden fields), then the overrides, then derived fields in
/// declaration order. Producers run once per call, so every instance owns
/// its own default values.
pub fn populate_from_spec(mut raw: RawRecord, overrides: FieldMap) -> Result<Record, RecordError> {
    let ty = raw.record_type().clone();

    let mut derived = 0usize;
    for d in ty.descriptors() {
        if d.is_derived() {
            if overrides.contains_key(&d.name) {
                return Err(RecordError::DerivedOverride(d.name.clone()));
            }
            derived += 1;
        }
    }
    if let Some(unknown) = overrides.keys().find(|k| !ty.has_field(k)) {
        return Err(RecordError::UnknownField(unknown.clone()));
    }

    let mut merged = FieldMap::with_capacity_and_hasher(ty.len(), Default::default());
    for d in ty.descriptors() {
        if overrides.contains_key(&d.name) {
            continue;
        }
        match &d.default {
            Some(FieldDefault::Static(v)) => {
                merged.insert(d.name.clone(), v.clone());
            }
            Some(FieldDefault::Producer(produce)) => {
                merged.insert(d.name.clone(), produce());
            }
            Some(FieldDefault::Derived(_)) | None => {}
        }
    }
    merged.extend(overrides);

    let expected = ty.len();
    if merged.len() + derived != expected {
        return Err(RecordError::ArityMismatch {
            expected,
            actual: merged.len() + derived,
        });
    }
    populate(&mut raw, merged, Strictness::Lenient)?;

    for (slot, d) in ty.descriptors().iter().enumerate() {
        if let Some(FieldDefault::Derived(compute)) = &d.default {
            let value = compute(&raw)?;
            raw.write_slot(slot, value);
        }
    }

    let mut record = raw.finish()?;
    if !ty.members().is_empty() {
        record.bind_members(ty.members().clone());
    }
    Ok(record)
}
