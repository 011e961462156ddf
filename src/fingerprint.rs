//! Shape identity for record types.
//!
//! A [`Fingerprint`] identifies a record type by its name and its field-name
//! multiset. Values bound to the fields never take part, so two requests with
//! the same name and the same field names always land on the same cache entry.

use smol_str::SmolStr;
use std::hash::{Hash, Hasher};
use xxhash_rust::xxh64::Xxh64;

// Never appears inside UTF-8 text, so it cannot be confused with name bytes.
const SEPARATOR: [u8; 1] = [0xff];

/// Cache key for the schema-keyed type cache.
///
/// Equality compares the canonical (sorted) field names as well as the
/// digest, so two distinct field sets never share a key even if their
/// digests collide. `Hash` only feeds the digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fingerprint {
    digest: u64,
    name: SmolStr,
    fields: Box<[SmolStr]>,
}

impl Fingerprint {
    #[inline]
    pub fn digest(&self) -> u64 {
        self.digest
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Field names in canonical (sorted) order.
    #[inline]
    pub fn fields(&self) -> &[SmolStr] {
        &self.fields
    }
}

impl Hash for Fingerprint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.digest);
    }
}

/// Fingerprint `(name, field_names)`. Order of `field_names` is irrelevant.
pub fn fingerprint<I, S>(name: &str, field_names: I) -> Fingerprint
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let fields = canonical_fields(field_names);
    let mut hasher = Xxh64::new(0);
    hasher.update(name.as_bytes());
    hasher.update(&SEPARATOR);
    feed_fields(&mut hasher, &fields);
    Fingerprint {
        digest: hasher.digest(),
        name: SmolStr::new(name),
        fields,
    }
}

/// Hash of the field-name set alone. This is the record hash of the object
/// model: it ignores both the type name and the stored values.
pub fn shape_hash<I, S>(field_names: I) -> u64
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let fields = canonical_fields(field_names);
    let mut hasher = Xxh64::new(0);
    feed_fields(&mut hasher, &fields);
    hasher.digest()
}

fn canonical_fields<I, S>(field_names: I) -> Box<[SmolStr]>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut fields: Vec<SmolStr> = field_names
        .into_iter()
        .map(|f| SmolStr::new(f.as_ref()))
        .collect();
    fields.sort_unstable();
    fields.into_boxed_slice()
}

#[inline]
fn feed_fields(hasher: &mut Xxh64, fields: &[SmolStr]) {
    for field in fields {
        hasher.update(field.as_bytes());
        hasher.update(&SEPARATOR);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::collection::btree_set;
    use proptest::prelude::*;

    #[test]
    fn test_fingerprint_differs_on_field_set() {
        let one = fingerprint("SlotsObject", ["x", "y"]);
        let two = fingerprint("SlotsObject", ["x", "y", "z"]);
        assert_ne!(one, two);
        assert_ne!(one.digest(), two.digest());
    }

    #[test]
    fn test_fingerprint_same_size_different_names() {
        let one = fingerprint("SlotsObject", ["a", "b"]);
        let two = fingerprint("SlotsObject", ["a", "c"]);
        assert_ne!(one, two);
    }

    #[test]
    fn test_fingerprint_ignores_order() {
        let one = fingerprint("Point", ["y", "x"]);
        let two = fingerprint("Point", ["x", "y"]);
        assert_eq!(one, two);
        assert_eq!(one.fields(), &[SmolStr::new("x"), SmolStr::new("y")]);
    }

    #[test]
    fn test_fingerprint_depends_on_name() {
        assert_ne!(fingerprint("fizz", ["x"]), fingerprint("buzz", ["x"]));
    }

    #[test]
    fn test_separator_prevents_concatenation_collision() {
        assert_ne!(fingerprint("T", ["ab", "c"]), fingerprint("T", ["a", "bc"]));
        assert_ne!(shape_hash(["ab", "c"]), shape_hash(["a", "bc"]));
    }

    #[test]
    fn test_shape_hash_ignores_type_name_and_order() {
        assert_eq!(shape_hash(["x", "y"]), shape_hash(["y", "x"]));
        assert_ne!(shape_hash(["x", "y"]), shape_hash(["x", "y", "z"]));
    }

    proptest! {
        #[test]
        fn prop_distinct_sets_distinct_fingerprints(
            a in btree_set("[a-z]{1,6}", 0..8),
            b in btree_set("[a-z]{1,6}", 0..8),
        ) {
            prop_assume!(a != b);
            prop_assert_ne!(fingerprint("T", &a), fingerprint("T", &b));
        }

        #[test]
        fn prop_fingerprint_is_stable(a in btree_set("[a-z]{1,6}", 0..8)) {
            let first = fingerprint("T", &a);
            let second = fingerprint("T", a.iter().rev());
            prop_assert_eq!(first.digest(), second.digest());
            prop_assert_eq!(first, second);
        }
    }
}
