// ─── Error ──────────────────────────────────────────────────────────────────
use smol_str::SmolStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    /// Strict population received a mapping whose size differs from the
    /// number of declared fields.
    #[error("Mismatch in number of attributes")]
    ArityMismatch { expected: usize, actual: usize },
    /// Post-construction write on a frozen record type.
    #[error("Instance is immutable")]
    ImmutableWrite { field: SmolStr },
    #[error("invalid field order: {0}")]
    OrderSpecInvalid(String),
    #[error("rebuilding record type '{name}' failed: {source}")]
    CacheRebuildFailure {
        name: SmolStr,
        #[source]
        source: Box<RecordError>,
    },
    #[error("Cannot set attribute '{0}'")]
    UnknownField(SmolStr),
    #[error("field '{0}' read before it was written")]
    UnsetField(SmolStr),
    #[error("field '{0}' declared more than once")]
    DuplicateField(SmolStr),
    #[error("no member named '{0}'")]
    UnknownMember(SmolStr),
    #[error("property '{0}' has no setter")]
    ReadOnlyProperty(SmolStr),
    #[error("derived field '{0}' cannot be supplied by the caller")]
    DerivedOverride(SmolStr),
    #[error("expected a JSON object")]
    NotAnObject,
    #[error("member '{name}' failed: {reason}")]
    Member { name: SmolStr, reason: String },
}
