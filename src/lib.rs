//! Dynamic record-type factory.
//!
//! Builds fixed-field record types at runtime from a name and a list of
//! field names, caches them by shape, and populates instances while enforcing
//! arity and (optionally) immutability.
//!
//! ```
//! use slots_factory::{RecordFactory, record_map};
//!
//! let mut factory = RecordFactory::new();
//! let point = factory
//!     .slots_factory(Some("Point"), record_map! { "x" => 1i64, "y" => 2i64 })
//!     .unwrap();
//! assert_eq!(point.to_string(), "Point(x=1, y=2)");
//! ```

pub mod cache;
pub mod config;
pub mod declare;
pub mod error;
pub mod factory;
pub mod fingerprint;
pub mod populate;
pub mod record;
pub mod record_type;
pub mod types;
pub mod value;

pub use cache::{NameCache, SchemaCache};
pub use config::FactoryConfig;
pub use declare::{Declaration, Order, RecordBuilder, from_json, from_mapping};
pub use error::RecordError;
pub use factory::{RecordFactory, slots_from_type, type_factory};
pub use fingerprint::{Fingerprint, fingerprint};
pub use populate::{Strictness, populate, populate_from_spec};
pub use record::{RawRecord, Record};
pub use record_type::{FieldDefault, FieldDescriptor, Initializer, Member, RecordType, build_type};
pub use smol_str::SmolStr;
pub use types::{FieldIter, FieldMap};
pub use value::{Number, Value};
