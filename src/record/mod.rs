mod object_model;

use smol_str::SmolStr;
use std::sync::Arc;

use crate::error::RecordError;
use crate::record_type::{Member, Members, RecordType};
use crate::types::FieldIter;
use crate::value::Value;

// ─── RawRecord ──────────────────────────────────────────────────────────────

/// A freshly allocated instance whose slots have not all been written yet.
///
/// Writes here are construction writes: they never consult the frozen flag of
/// the type. Reading a slot before it was written is an error.
#[derive(Debug)]
pub struct RawRecord {
    ty: RecordType,
    slots: Box<[Option<Value>]>,
}

impl RawRecord {
    pub(crate) fn new(ty: RecordType) -> Self {
        let slots = (0..ty.len()).map(|_| None).collect();
        Self { ty, slots }
    }

    #[inline]
    pub fn record_type(&self) -> &RecordType {
        &self.ty
    }

    pub fn get(&self, name: &str) -> Result<&Value, RecordError> {
        let slot = self.slot_of(name)?;
        self.slots[slot]
            .as_ref()
            .ok_or_else(|| RecordError::UnsetField(SmolStr::new(name)))
    }

    pub fn is_set(&self, name: &str) -> bool {
        self.ty
            .field_index(name)
            .is_some_and(|slot| self.slots[slot].is_some())
    }

    /// Write a field by name, overwriting any earlier construction write.
    pub fn write(&mut self, name: &str, value: Value) -> Result<(), RecordError> {
        let slot = self.slot_of(name)?;
        self.slots[slot] = Some(value);
        Ok(())
    }

    #[inline]
    pub(crate) fn write_slot(&mut self, slot: usize, value: Value) {
        self.slots[slot] = Some(value);
    }

    /// Seal the instance. Fails on the first slot (declaration order) that was
    /// never written.
    pub fn finish(self) -> Result<Record, RecordError> {
        let RawRecord { ty, slots } = self;
        let mut values = Vec::with_capacity(slots.len());
        for (slot, value) in slots.into_vec().into_iter().enumerate() {
            match value {
                Some(v) => values.push(v),
                None => {
                    return Err(RecordError::UnsetField(SmolStr::new(ty.field_name(slot))));
                }
            }
        }
        Ok(Record {
            ty,
            slots: values.into_boxed_slice(),
            members: None,
        })
    }

    #[inline]
    fn slot_of(&self, name: &str) -> Result<usize, RecordError> {
        self.ty
            .field_index(name)
            .ok_or_else(|| RecordError::UnknownField(SmolStr::new(name)))
    }
}

// ─── Record ─────────────────────────────────────────────────────────────────

/// A populated record instance: exactly one value per declared field.
#[derive(Clone)]
pub struct Record {
    ty: RecordType,
    slots: Box<[Value]>,
    members: Option<Arc<Members>>,
}

impl Record {
    #[inline]
    pub fn record_type(&self) -> &RecordType {
        &self.ty
    }

    /// Name of the record type.
    #[inline]
    pub fn name(&self) -> &str {
        self.ty.name()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[inline]
    pub fn has_field(&self, name: &str) -> bool {
        self.ty.has_field(name)
    }

    pub fn get(&self, name: &str) -> Result<&Value, RecordError> {
        let slot = self.slot_of(name)?;
        Ok(&self.slots[slot])
    }

    /// Mutable access to a field, refused on frozen types.
    pub fn get_mut(&mut self, name: &str) -> Result<&mut Value, RecordError> {
        self.check_writable(name)?;
        let slot = self.slot_of(name)?;
        Ok(&mut self.slots[slot])
    }

    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), RecordError> {
        self.check_writable(name)?;
        let slot = self.slot_of(name)?;
        self.slots[slot] = value.into();
        Ok(())
    }

    #[inline]
    pub(crate) fn slot(&self, slot: usize) -> &Value {
        &self.slots[slot]
    }

    /// Iterate `(name, value)` pairs in canonical order.
    #[inline]
    pub fn iter(&self) -> FieldIter<'_> {
        FieldIter {
            record: self,
            order: self.ty.iteration_order(),
            pos: 0,
        }
    }

    // ════════════════════════════════════════════════════════════════════════
    // Computed members
    // ════════════════════════════════════════════════════════════════════════

    pub(crate) fn bind_members(&mut self, members: Arc<Members>) {
        self.members = Some(members);
    }

    /// True once the type's member table has been bound to this instance.
    pub fn has_member(&self, name: &str) -> bool {
        self.members.as_ref().is_some_and(|m| m.contains_key(name))
    }

    /// Invoke a bound method with this instance as its receiver.
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value, RecordError> {
        match self.member(name)? {
            Member::Method(f) => f(self, args),
            Member::Property { .. } => Err(RecordError::UnknownMember(SmolStr::new(name))),
        }
    }

    /// Read a bound property.
    pub fn property(&self, name: &str) -> Result<Value, RecordError> {
        match self.member(name)? {
            Member::Property { get, .. } => get(self),
            Member::Method(_) => Err(RecordError::UnknownMember(SmolStr::new(name))),
        }
    }

    /// Write through a bound property's setter.
    pub fn set_property(&mut self, name: &str, value: impl Into<Value>) -> Result<(), RecordError> {
        self.check_writable(name)?;
        let setter = match self.member(name)? {
            Member::Property { set: Some(set), .. } => set.clone(),
            Member::Property { set: None, .. } => {
                return Err(RecordError::ReadOnlyProperty(SmolStr::new(name)));
            }
            Member::Method(_) => return Err(RecordError::UnknownMember(SmolStr::new(name))),
        };
        setter(self, value.into())
    }

    fn member(&self, name: &str) -> Result<&Member, RecordError> {
        self.members
            .as_ref()
            .and_then(|m| m.get(name))
            .ok_or_else(|| RecordError::UnknownMember(SmolStr::new(name)))
    }

    #[inline]
    fn check_writable(&self, name: &str) -> Result<(), RecordError> {
        if self.ty.is_frozen() {
            return Err(RecordError::ImmutableWrite {
                field: SmolStr::new(name),
            });
        }
        Ok(())
    }

    #[inline]
    fn slot_of(&self, name: &str) -> Result<usize, RecordError> {
        self.ty
            .field_index(name)
            .ok_or_else(|| RecordError::UnknownField(SmolStr::new(name)))
    }
}

impl<'a> IntoIterator for &'a Record {
    type Item = (&'a str, &'a Value);
    type IntoIter = FieldIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests;
