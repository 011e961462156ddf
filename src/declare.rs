//! Declarative record-type synthesis.
//!
//! Takes an ordered list of declarations (fields with optional defaults,
//! derived fields, methods and properties) plus the `frozen` and `order`
//! flags, and produces a ready [`RecordType`] whose construction routine is
//! specialised to the shape of the declaration.

use smol_str::SmolStr;
use std::sync::Arc;
use tracing::debug;

use crate::error::RecordError;
use crate::record::{RawRecord, Record};
use crate::record_type::builder::check_unique;
use crate::record_type::{FieldDefault, FieldDescriptor, Member, Members, RecordType, TypeParts};
use crate::types::{FastHashSet, FieldMap};
use crate::value::Value;

/// Ordering policy of a declared record type.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Order {
    /// No ordering members; iteration follows declaration order.
    #[default]
    Unordered,
    /// Ordering members keyed on declaration order.
    Declared,
    /// Ordering members keyed on the field names sorted lexicographically.
    Sorted,
    /// Ordering members keyed on this permutation of the declared fields.
    Explicit(Vec<SmolStr>),
}

impl From<bool> for Order {
    fn from(ordered: bool) -> Self {
        if ordered { Order::Declared } else { Order::Unordered }
    }
}

impl<S: Into<SmolStr>> From<Vec<S>> for Order {
    fn from(names: Vec<S>) -> Self {
        Order::Explicit(names.into_iter().map(Into::into).collect())
    }
}

/// One entry of an already-extracted user declaration.
#[derive(Debug, Clone)]
pub enum Declaration {
    Field(FieldDescriptor),
    Member { name: SmolStr, member: Member },
}

/// Builder for declarative record types.
///
/// ```
/// use slots_factory::{RecordBuilder, record_map};
///
/// let point = RecordBuilder::new("Point").field("x").field("y").build().unwrap();
/// let p = point.construct(record_map! { "x" => 1i64, "y" => 2i64 }).unwrap();
/// assert_eq!(p.to_string(), "Point(x=1, y=2)");
/// ```
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    name: SmolStr,
    declarations: Vec<Declaration>,
    frozen: bool,
    order: Order,
}

impl RecordBuilder {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            declarations: Vec::new(),
            frozen: false,
            order: Order::Unordered,
        }
    }

    pub fn from_declarations(name: impl Into<SmolStr>, declarations: Vec<Declaration>) -> Self {
        Self {
            declarations,
            ..Self::new(name)
        }
    }

    pub fn declare(mut self, declaration: Declaration) -> Self {
        self.declarations.push(declaration);
        self
    }

    /// A required field.
    pub fn field(self, name: impl Into<SmolStr>) -> Self {
        self.declare(Declaration::Field(FieldDescriptor::required(name)))
    }

    /// A field with a static default, cloned into each instance.
    pub fn field_default(self, name: impl Into<SmolStr>, value: impl Into<Value>) -> Self {
        self.declare(Declaration::Field(FieldDescriptor::with_default(
            name,
            FieldDefault::Static(value.into()),
        )))
    }

    /// A field whose default is produced afresh for every instance.
    pub fn field_with<F>(self, name: impl Into<SmolStr>, produce: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.declare(Declaration::Field(FieldDescriptor::with_default(
            name,
            FieldDefault::Producer(Arc::new(produce)),
        )))
    }

    /// A stored field computed from the other fields at construction time.
    pub fn derived<F>(self, name: impl Into<SmolStr>, compute: F) -> Self
    where
        F: Fn(&RawRecord) -> Result<Value, RecordError> + Send + Sync + 'static,
    {
        self.declare(Declaration::Field(FieldDescriptor::with_default(
            name,
            FieldDefault::Derived(Arc::new(compute)),
        )))
    }

    pub fn method<F>(self, name: impl Into<SmolStr>, f: F) -> Self
    where
        F: Fn(&Record, &[Value]) -> Result<Value, RecordError> + Send + Sync + 'static,
    {
        self.member(name, Member::method(f))
    }

    pub fn property<G>(self, name: impl Into<SmolStr>, get: G) -> Self
    where
        G: Fn(&Record) -> Result<Value, RecordError> + Send + Sync + 'static,
    {
        self.member(name, Member::property(get))
    }

    pub fn property_with_setter<G, S>(self, name: impl Into<SmolStr>, get: G, set: S) -> Self
    where
        G: Fn(&Record) -> Result<Value, RecordError> + Send + Sync + 'static,
        S: Fn(&mut Record, Value) -> Result<(), RecordError> + Send + Sync + 'static,
    {
        self.member(name, Member::property_with_setter(get, set))
    }

    pub fn member(self, name: impl Into<SmolStr>, member: Member) -> Self {
        self.declare(Declaration::Member {
            name: name.into(),
            member,
        })
    }

    pub fn frozen(mut self, frozen: bool) -> Self {
        self.frozen = frozen;
        self
    }

    pub fn order(mut self, order: impl Into<Order>) -> Self {
        self.order = order.into();
        self
    }

    /// Partition the declarations, fix the field list, resolve the order and
    /// hand back a ready type.
    pub fn build(self) -> Result<RecordType, RecordError> {
        let RecordBuilder {
            name,
            declarations,
            frozen,
            order,
        } = self;

        let mut descriptors = Vec::new();
        let mut members = Members::default();
        for declaration in declarations {
            match declaration {
                Declaration::Field(descriptor) => descriptors.push(descriptor),
                Declaration::Member { name, member } => {
                    if members.insert(name.clone(), member).is_some() {
                        return Err(RecordError::DuplicateField(name));
                    }
                }
            }
        }
        check_unique(&descriptors)?;
        if let Some(clash) = descriptors.iter().find(|d| members.contains_key(&d.name)) {
            return Err(RecordError::DuplicateField(clash.name.clone()));
        }

        let order = resolve_order(&descriptors, &order)?;
        let record_type = RecordType::from_parts(TypeParts {
            name,
            descriptors,
            members,
            frozen,
            order,
        });
        debug!(
            name = record_type.name(),
            fields = record_type.len(),
            members = record_type.members().len(),
            frozen,
            initializer = ?record_type.initializer(),
            "declared record type"
        );
        Ok(record_type)
    }
}

/// Slot indices in iteration order, or `None` for an unordered type.
fn resolve_order(
    descriptors: &[FieldDescriptor],
    order: &Order,
) -> Result<Option<Vec<usize>>, RecordError> {
    let slot_of = |name: &str| descriptors.iter().position(|d| d.name == name);
    match order {
        Order::Unordered => Ok(None),
        Order::Declared => Ok(Some((0..descriptors.len()).collect())),
        Order::Sorted => {
            let mut slots: Vec<usize> = (0..descriptors.len()).collect();
            slots.sort_by(|&a, &b| descriptors[a].name.cmp(&descriptors[b].name));
            Ok(Some(slots))
        }
        Order::Explicit(names) => {
            let mut seen = FastHashSet::default();
            let mut slots = Vec::with_capacity(names.len());
            for name in names {
                let slot = slot_of(name.as_str()).ok_or_else(|| {
                    RecordError::OrderSpecInvalid(format!("'{}' is not a declared field", name))
                })?;
                if !seen.insert(slot) {
                    return Err(RecordError::OrderSpecInvalid(format!(
                        "'{}' appears more than once",
                        name
                    )));
                }
                slots.push(slot);
            }
            if let Some(missing) = descriptors.iter().enumerate().find(|(i, _)| !seen.contains(i)) {
                return Err(RecordError::OrderSpecInvalid(format!(
                    "declared field '{}' is missing",
                    missing.1.name
                )));
            }
            Ok(Some(slots))
        }
    }
}

/// Build a one-off record type from a mapping and return its only instance.
///
/// Each key becomes a field whose default is the mapped value; the instance
/// is constructed through the defaults-only routine.
pub fn from_mapping(name: &str, mapping: FieldMap) -> Result<Record, RecordError> {
    let record_type = mapping
        .into_iter()
        .fold(RecordBuilder::new(name), |builder, (field, value)| {
            builder.field_default(field, value)
        })
        .build()?;
    record_type.construct(FieldMap::default())
}

/// [`from_mapping`] over a JSON object.
pub fn from_json(name: &str, value: serde_json::Value) -> Result<Record, RecordError> {
    match value {
        serde_json::Value::Object(obj) => from_mapping(
            name,
            obj.into_iter()
                .map(|(k, v)| (SmolStr::from(k), Value::from(v)))
                .collect(),
        ),
        _ => Err(RecordError::NotAnObject),
    }
}
