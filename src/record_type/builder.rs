use smol_str::SmolStr;
use tracing::debug;

use super::{FieldDescriptor, Members, RecordType, TypeParts};
use crate::error::RecordError;
use crate::types::FastHashSet;

/// Build a new plain record type from field names, in the given order.
///
/// Every call yields a distinct type, even for identical arguments; sharing
/// across calls is the job of the type caches.
pub fn build_type<I, S>(name: &str, field_names: I) -> Result<RecordType, RecordError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let descriptors = field_names
        .into_iter()
        .map(|f| FieldDescriptor::required(f.as_ref()))
        .collect::<Vec<_>>();
    check_unique(&descriptors)?;

    let record_type = RecordType::from_parts(TypeParts {
        name: SmolStr::new(name),
        descriptors,
        members: Members::default(),
        frozen: false,
        order: None,
    });
    debug!(
        name = record_type.name(),
        fields = record_type.len(),
        "built record type"
    );
    Ok(record_type)
}

pub(crate) fn check_unique(descriptors: &[FieldDescriptor]) -> Result<(), RecordError> {
    let mut seen: FastHashSet<&str> = FastHashSet::default();
    for d in descriptors {
        if !seen.insert(d.name.as_str()) {
            return Err(RecordError::DuplicateField(d.name.clone()));
        }
    }
    Ok(())
}
