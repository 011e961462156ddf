pub(crate) mod builder;
pub mod members;

pub use builder::build_type;
pub use members::{FieldDefault, FieldDescriptor, Member, Members};

use smol_str::SmolStr;
use std::fmt;
use std::sync::Arc;

use crate::error::RecordError;
use crate::fingerprint::{Fingerprint, fingerprint, shape_hash};
use crate::populate::{Strictness, populate, populate_from_spec};
use crate::record::{RawRecord, Record};
use crate::types::{FastMap, FieldMap, LINEAR_LOOKUP_MAX};

// ─── Initializer ────────────────────────────────────────────────────────────

/// Construction routine of a record type, picked once from the shape of the
/// declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Initializer {
    /// No defaults, no members: strict populate straight from the overrides.
    Slim,
    /// Defaults only: merge overrides into the defaults, then populate.
    Defaults,
    /// Members only: populate, then bind the member table.
    Members,
    /// Defaults and members.
    Full,
    /// Frozen type. Population goes through the construction-only write path.
    Frozen,
}

impl Initializer {
    pub fn select(has_defaults: bool, has_members: bool, frozen: bool) -> Self {
        match (frozen, has_defaults, has_members) {
            (true, _, _) => Initializer::Frozen,
            (false, false, false) => Initializer::Slim,
            (false, true, false) => Initializer::Defaults,
            (false, false, true) => Initializer::Members,
            (false, true, true) => Initializer::Full,
        }
    }
}

// ─── RecordType ─────────────────────────────────────────────────────────────

/// Everything needed to assemble a [`RecordType`]. Validation happens in the
/// builders; this is the already-checked shape.
pub(crate) struct TypeParts {
    pub name: SmolStr,
    pub descriptors: Vec<FieldDescriptor>,
    pub members: Members,
    pub frozen: bool,
    /// Slot indices in iteration order, when an ordering override is set.
    pub order: Option<Vec<usize>>,
}

struct RecordTypeInner {
    name: SmolStr,
    names: Box<[SmolStr]>,
    descriptors: Box<[FieldDescriptor]>,
    index: FastMap<SmolStr, usize>,
    members: Arc<Members>,
    frozen: bool,
    ordered: bool,
    iteration: Box<[usize]>,
    initializer: Initializer,
    fingerprint: Fingerprint,
    shape_hash: u64,
}

/// A fixed-field record type. Cheap to clone; clones share identity.
#[derive(Clone)]
pub struct RecordType {
    inner: Arc<RecordTypeInner>,
}

impl RecordType {
    pub(crate) fn from_parts(parts: TypeParts) -> Self {
        let TypeParts {
            name,
            descriptors,
            members,
            frozen,
            order,
        } = parts;

        let names: Box<[SmolStr]> = descriptors.iter().map(|d| d.name.clone()).collect();
        let index = names
            .iter()
            .enumerate()
            .map(|(i, n)| (n.clone(), i))
            .collect();
        let has_defaults = descriptors.iter().any(|d| d.default.is_some());
        let initializer = Initializer::select(has_defaults, !members.is_empty(), frozen);
        let ordered = order.is_some();
        let iteration = order
            .unwrap_or_else(|| (0..names.len()).collect())
            .into_boxed_slice();

        Self {
            inner: Arc::new(RecordTypeInner {
                fingerprint: fingerprint(&name, names.iter()),
                shape_hash: shape_hash(names.iter()),
                name,
                names,
                descriptors: descriptors.into_boxed_slice(),
                index,
                members: Arc::new(members),
                frozen,
                ordered,
                iteration,
                initializer,
            }),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Field names in declaration order.
    #[inline]
    pub fn field_names(&self) -> &[SmolStr] {
        &self.inner.names
    }

    #[inline]
    pub fn descriptors(&self) -> &[FieldDescriptor] {
        &self.inner.descriptors
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.inner.names.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.names.is_empty()
    }

    /// Slot index of `name`.
    #[inline]
    pub fn field_index(&self, name: &str) -> Option<usize> {
        let names = &self.inner.names;
        if names.len() <= LINEAR_LOOKUP_MAX {
            return names.iter().position(|n| n == name);
        }
        self.inner.index.get(name).copied()
    }

    #[inline]
    pub fn has_field(&self, name: &str) -> bool {
        self.field_index(name).is_some()
    }

    #[inline]
    pub(crate) fn field_name(&self, slot: usize) -> &str {
        &self.inner.names[slot]
    }

    #[inline]
    pub fn is_frozen(&self) -> bool {
        self.inner.frozen
    }

    /// True when the type carries ordering members.
    #[inline]
    pub fn is_ordered(&self) -> bool {
        self.inner.ordered
    }

    /// Slot indices in canonical iteration order.
    #[inline]
    pub fn iteration_order(&self) -> &[usize] {
        &self.inner.iteration
    }

    #[inline]
    pub fn initializer(&self) -> Initializer {
        self.inner.initializer
    }

    #[inline]
    pub fn fingerprint(&self) -> &Fingerprint {
        &self.inner.fingerprint
    }

    #[inline]
    pub fn shape_hash(&self) -> u64 {
        self.inner.shape_hash
    }

    #[inline]
    pub fn members(&self) -> &Arc<Members> {
        &self.inner.members
    }

    pub fn member(&self, name: &str) -> Option<&Member> {
        self.inner.members.get(name)
    }

    /// Same type object, not merely the same shape.
    #[inline]
    pub fn ptr_eq(&self, other: &RecordType) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// A field-uninitialized instance of this type.
    pub fn allocate(&self) -> RawRecord {
        RawRecord::new(self.clone())
    }

    /// Run this type's construction routine with caller-supplied field values.
    pub fn construct(&self, overrides: FieldMap) -> Result<Record, RecordError> {
        match self.inner.initializer {
            Initializer::Slim => {
                let mut raw = self.allocate();
                populate(&mut raw, overrides, Strictness::Strict)?;
                raw.finish()
            }
            Initializer::Members => {
                let mut raw = self.allocate();
                populate(&mut raw, overrides, Strictness::Strict)?;
                let mut record = raw.finish()?;
                record.bind_members(self.inner.members.clone());
                Ok(record)
            }
            Initializer::Defaults | Initializer::Full | Initializer::Frozen => {
                populate_from_spec(self.allocate(), overrides)
            }
        }
    }
}

impl fmt::Debug for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordType")
            .field("name", &self.inner.name)
            .field("fields", &self.inner.names)
            .field("frozen", &self.inner.frozen)
            .field("ordered", &self.inner.ordered)
            .field("initializer", &self.inner.initializer)
            .finish()
    }
}
