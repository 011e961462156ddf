use smol_str::SmolStr;
use std::fmt;
use std::sync::Arc;

use crate::error::RecordError;
use crate::record::{RawRecord, Record};
use crate::types::FastMap;
use crate::value::Value;

pub type ProducerFn = Arc<dyn Fn() -> Value + Send + Sync>;
pub type DerivedFn = Arc<dyn Fn(&RawRecord) -> Result<Value, RecordError> + Send + Sync>;
pub type MethodFn = Arc<dyn Fn(&Record, &[Value]) -> Result<Value, RecordError> + Send + Sync>;
pub type GetterFn = Arc<dyn Fn(&Record) -> Result<Value, RecordError> + Send + Sync>;
pub type SetterFn = Arc<dyn Fn(&mut Record, Value) -> Result<(), RecordError> + Send + Sync>;

/// Per-type table of computed members, shared by every instance.
pub type Members = FastMap<SmolStr, Member>;

// ─── Field defaults ─────────────────────────────────────────────────────────

/// Where a field gets its value when the caller does not supply one.
#[derive(Clone)]
pub enum FieldDefault {
    /// Cloned into every instance.
    Static(Value),
    /// Called once per construction; each instance owns what it returns.
    Producer(ProducerFn),
    /// Computed from the instance after defaults and overrides are written.
    /// Never supplied by the caller.
    Derived(DerivedFn),
}

impl fmt::Debug for FieldDefault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldDefault::Static(v) => write!(f, "Static({:?})", v),
            FieldDefault::Producer(_) => f.write_str("Producer(..)"),
            FieldDefault::Derived(_) => f.write_str("Derived(..)"),
        }
    }
}

/// One storage slot of a record type.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    pub name: SmolStr,
    pub default: Option<FieldDefault>,
}

impl FieldDescriptor {
    pub fn required(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            default: None,
        }
    }

    pub fn with_default(name: impl Into<SmolStr>, default: FieldDefault) -> Self {
        Self {
            name: name.into(),
            default: Some(default),
        }
    }

    #[inline]
    pub fn has_default(&self) -> bool {
        matches!(
            self.default,
            Some(FieldDefault::Static(_) | FieldDefault::Producer(_))
        )
    }

    #[inline]
    pub fn is_derived(&self) -> bool {
        matches!(self.default, Some(FieldDefault::Derived(_)))
    }
}

// ─── Computed members ───────────────────────────────────────────────────────

/// A named operation resolved against an instance. Has no storage slot.
#[derive(Clone)]
pub enum Member {
    Method(MethodFn),
    Property {
        get: GetterFn,
        set: Option<SetterFn>,
    },
}

impl fmt::Debug for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Member::Method(_) => f.write_str("Method(..)"),
            Member::Property { set, .. } => f
                .debug_struct("Property")
                .field("settable", &set.is_some())
                .finish(),
        }
    }
}

impl Member {
    pub fn method<F>(f: F) -> Self
    where
        F: Fn(&Record, &[Value]) -> Result<Value, RecordError> + Send + Sync + 'static,
    {
        Member::Method(Arc::new(f))
    }

    pub fn property<G>(get: G) -> Self
    where
        G: Fn(&Record) -> Result<Value, RecordError> + Send + Sync + 'static,
    {
        Member::Property {
            get: Arc::new(get),
            set: None,
        }
    }

    pub fn property_with_setter<G, S>(get: G, set: S) -> Self
    where
        G: Fn(&Record) -> Result<Value, RecordError> + Send + Sync + 'static,
        S: Fn(&mut Record, Value) -> Result<(), RecordError> + Send + Sync + 'static,
    {
        Member::Property {
            get: Arc::new(get),
            set: Some(Arc::new(set)),
        }
    }
}
