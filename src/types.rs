use indexmap::IndexMap;
use rustc_hash::FxHasher;
use smol_str::SmolStr;
use std::hash::BuildHasherDefault;

use crate::record::Record;
use crate::value::Value;

pub type FastMap<K, V> = std::collections::HashMap<K, V, BuildHasherDefault<FxHasher>>;
pub type FastHashSet<T> = std::collections::HashSet<T, BuildHasherDefault<FxHasher>>;

/// Insertion-ordered field name → value mapping. This is the "mapping" every
/// population and conversion path takes and returns.
pub type FieldMap = IndexMap<SmolStr, Value, BuildHasherDefault<FxHasher>>;

/// Type name used when a factory caller does not supply one.
pub const DEFAULT_TYPE_NAME: &str = "SlotsObject";

/// Up to this many fields, name lookup scans the field list instead of
/// hashing into the index map.
pub const LINEAR_LOOKUP_MAX: usize = 4;

// ─── Iterator ───────────────────────────────────────────────────────────────

/// Lazy `(name, value)` walk over a record in canonical order.
///
/// Restartable: every call to [`Record::iter`] starts a fresh walk.
pub struct FieldIter<'a> {
    pub(crate) record: &'a Record,
    pub(crate) order: &'a [usize],
    pub(crate) pos: usize,
}

impl<'a> Iterator for FieldIter<'a> {
    type Item = (&'a str, &'a Value);

    fn next(&mut self) -> Option<Self::Item> {
        let slot = *self.order.get(self.pos)?;
        self.pos += 1;
        Some((
            self.record.record_type().field_name(slot),
            self.record.slot(slot),
        ))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.order.len() - self.pos;
        (remaining, Some(remaining))
    }
}

impl<'a> ExactSizeIterator for FieldIter<'a> {}
