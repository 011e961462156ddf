use std::cmp::Ordering;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::declare::{Order, RecordBuilder, from_mapping};
use crate::error::RecordError;
use crate::factory::slots_from_type;
use crate::record::Record;
use crate::record_map;
use crate::record_type::build_type;
use crate::value::Value;
use proptest::collection::btree_map;
use proptest::prelude::*;
use smol_str::SmolStr;

// ═══════════════════════════════════════════════════════════════════════
// Helpers
// ═══════════════════════════════════════════════════════════════════════

fn make_xyz(x: i64, y: i64, z: i64) -> Record {
    let ty = build_type("This", ["x", "y", "z"]).unwrap();
    slots_from_type(&ty, record_map! { "x" => x, "y" => y, "z" => z }).unwrap()
}

fn hash_of(record: &Record) -> u64 {
    let mut hasher = DefaultHasher::new();
    record.hash(&mut hasher);
    hasher.finish()
}

fn pairs(record: &Record) -> Vec<(String, Value)> {
    record
        .iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect()
}

// ═══════════════════════════════════════════════════════════════════════
// Representation and access
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_repr_and_len() {
    let this = make_xyz(1, 2, 3);
    assert_eq!(this.to_string(), "This(x=1, y=2, z=3)");
    assert_eq!(this.len(), 3);
    assert!(!this.is_empty());
    assert_eq!(this.name(), "This");
}

#[test]
fn test_debug_lists_fields() {
    let this = make_xyz(1, 2, 3);
    let debug = format!("{:?}", this);
    assert!(debug.starts_with("This {"));
    assert!(debug.contains("x: Number(I64(1))"));
}

#[test]
fn test_get_unknown_field() {
    let this = make_xyz(1, 2, 3);
    assert_eq!(
        this.get("w").unwrap_err(),
        RecordError::UnknownField(SmolStr::new("w"))
    );
    assert!(!this.has_field("w"));
}

#[test]
fn test_set_and_get_mut_on_mutable_type() {
    let mut this = make_xyz(1, 2, 3);
    this.set("z", 30i64).unwrap();
    assert_eq!(this.get("z").unwrap(), &Value::from(30i64));

    *this.get_mut("x").unwrap() = Value::from("ten");
    assert_eq!(this.to_string(), "This(x=ten, y=2, z=30)");

    assert_eq!(
        this.set("w", 1i64).unwrap_err(),
        RecordError::UnknownField(SmolStr::new("w"))
    );
}

// ═══════════════════════════════════════════════════════════════════════
// Equality and hashing
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_eq_across_types_with_same_fields() {
    let this = make_xyz(1, 2, 3);
    let that_type = RecordBuilder::new("That")
        .field_default("x", 1i64)
        .field_default("y", 2i64)
        .field_default("z", 3i64)
        .build()
        .unwrap();
    let that = that_type.construct(record_map! {}).unwrap();
    assert_eq!(this, that);
    assert_eq!(hash_of(&this), hash_of(&that));
}

#[test]
fn test_eq_bad_len() {
    let this = make_xyz(1, 2, 3);
    let that = from_mapping("That", record_map! { "x" => 1i64, "y" => 2i64, "z" => 3i64, "a" => 4i64 })
        .unwrap();
    assert_ne!(this, that);
    assert_ne!(that, this);
}

#[test]
fn test_eq_bad_name() {
    let this = make_xyz(1, 2, 3);
    let that = from_mapping("That", record_map! { "x" => 1i64, "y" => 2i64, "a" => 3i64 }).unwrap();
    assert_ne!(this, that);
}

#[test]
fn test_eq_different_values() {
    let this = make_xyz(1, 2, 3);
    let that = make_xyz(1, 2, 4);
    assert_ne!(this, that);
}

#[test]
fn test_hash_ignores_values() {
    let one = make_xyz(1, 2, 3);
    let two = make_xyz(7, 8, 9);
    assert_ne!(one, two);
    assert_eq!(hash_of(&one), hash_of(&two));
}

#[test]
fn test_hash_follows_field_set() {
    let xyz = make_xyz(1, 2, 3);
    let xy = from_mapping("This", record_map! { "x" => 1i64, "y" => 2i64 }).unwrap();
    assert_ne!(hash_of(&xyz), hash_of(&xy));
}

// ═══════════════════════════════════════════════════════════════════════
// Iteration and conversion
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_iter_declaration_order() {
    let this = make_xyz(1, 2, 3);
    let names: Vec<&str> = this.iter().map(|(name, _)| name).collect();
    assert_eq!(names, ["x", "y", "z"]);
}

#[test]
fn test_iter_is_restartable() {
    let this = make_xyz(1, 2, 3);
    let first = pairs(&this);
    let second = pairs(&this);
    assert_eq!(first, second);

    let mut iter = this.iter();
    assert_eq!(iter.size_hint(), (3, Some(3)));
    iter.next();
    assert_eq!(iter.len(), 2);
}

#[test]
fn test_into_iterator_for_ref() {
    let this = make_xyz(1, 2, 3);
    let mut total = 0;
    for (_, value) in &this {
        total += value.as_i64().unwrap();
    }
    assert_eq!(total, 6);
}

#[test]
fn test_to_mapping_round_trip() {
    let this = make_xyz(1, 2, 3);
    let copy = from_mapping("This", this.to_mapping()).unwrap();
    assert_eq!(copy, this);
    assert_eq!(pairs(&copy), pairs(&this));
}

#[test]
fn test_round_trip_keeps_explicit_order() {
    let ordered = RecordBuilder::new("This")
        .field("x")
        .field("y")
        .field("z")
        .order(vec!["x", "z", "y"])
        .build()
        .unwrap()
        .construct(record_map! { "x" => 1i64, "y" => 2i64, "z" => 3i64 })
        .unwrap();
    let copy = from_mapping("This", ordered.to_mapping()).unwrap();
    assert_eq!(copy, ordered);
    assert_eq!(pairs(&copy), pairs(&ordered));
}

#[test]
fn test_to_json_and_serialize() {
    let ordered = RecordBuilder::new("This")
        .field("x")
        .field("y")
        .field("z")
        .order(vec!["x", "z", "y"])
        .build()
        .unwrap()
        .construct(record_map! { "x" => 1i64, "y" => "two", "z" => 3.5f64 })
        .unwrap();
    assert_eq!(
        ordered.to_json(),
        serde_json::json!({ "x": 1, "y": "two", "z": 3.5 })
    );
    assert_eq!(
        serde_json::to_string(&ordered).unwrap(),
        r#"{"x":1,"z":3.5,"y":"two"}"#
    );
}

// ═══════════════════════════════════════════════════════════════════════
// Ordering
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_unordered_type_only_compares_equal() {
    let one = make_xyz(1, 2, 3);
    let two = make_xyz(1, 2, 4);
    assert_eq!(one.partial_cmp(&one.clone()), Some(Ordering::Equal));
    assert_eq!(one.partial_cmp(&two), None);
    assert!(!(one < two));
}

#[test]
fn test_ordered_lexicographic_comparison() {
    let ty = RecordBuilder::new("This")
        .field("x")
        .field("y")
        .field("z")
        .order(true)
        .build()
        .unwrap();
    let make = |x: i64, y: i64, z: i64| {
        ty.construct(record_map! { "x" => x, "y" => y, "z" => z }).unwrap()
    };

    let one = make(1, 2, 3);
    let two = make(1, 0, 4);
    let three = make(2, 1, 0);

    assert!(two < one);
    assert!(one < three);
    assert!(!(one < one.clone()));
    assert!(one <= one.clone());
    assert!(two <= one);

    let mut list = vec![one, two, three];
    list.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let actual: Vec<Vec<i64>> = list
        .iter()
        .map(|r| r.iter().map(|(_, v)| v.as_i64().unwrap()).collect())
        .collect();
    assert_eq!(actual, vec![vec![1, 0, 4], vec![1, 2, 3], vec![2, 1, 0]]);
}

#[test]
fn test_ordered_compare_different_shapes_is_none() {
    let ty = RecordBuilder::new("This").field("x").order(true).build().unwrap();
    let one = ty.construct(record_map! { "x" => 1i64 }).unwrap();
    let other = make_xyz(1, 2, 3);
    assert_eq!(one.partial_cmp(&other), None);
}

#[test]
fn test_ordered_compare_across_types_is_antisymmetric() {
    let by_xy = RecordBuilder::new("A")
        .field("x")
        .field("y")
        .order(vec!["x", "y"])
        .build()
        .unwrap();
    let by_yx = RecordBuilder::new("B")
        .field("x")
        .field("y")
        .order(vec!["y", "x"])
        .build()
        .unwrap();
    let a = by_xy.construct(record_map! { "x" => 1i64, "y" => 2i64 }).unwrap();
    let b = by_yx.construct(record_map! { "x" => 2i64, "y" => 1i64 }).unwrap();
    assert_eq!(a.partial_cmp(&b), None);
    assert_eq!(b.partial_cmp(&a), None);
    assert!(!(a < b) && !(b < a));

    // Same canonical names on both sides compare, in both directions.
    let a2 = RecordBuilder::new("A2")
        .field("y")
        .field("x")
        .order(vec!["x", "y"])
        .build()
        .unwrap()
        .construct(record_map! { "x" => 2i64, "y" => 0i64 })
        .unwrap();
    assert_eq!(a.partial_cmp(&a2), Some(Ordering::Less));
    assert_eq!(a2.partial_cmp(&a), Some(Ordering::Greater));

    let plain = build_type("Plain", ["x", "y"]).unwrap();
    let unordered = slots_from_type(&plain, record_map! { "x" => 2i64, "y" => 3i64 }).unwrap();
    assert_eq!(a.partial_cmp(&unordered), None);
    assert_eq!(unordered.partial_cmp(&a), None);

    let same = slots_from_type(&plain, record_map! { "x" => 1i64, "y" => 2i64 }).unwrap();
    assert_eq!(a.partial_cmp(&same), Some(Ordering::Equal));
    assert_eq!(same.partial_cmp(&a), Some(Ordering::Equal));
}

#[test]
fn test_ordered_incomparable_values_is_none() {
    let ty = RecordBuilder::new("This").field("x").order(true).build().unwrap();
    let one = ty.construct(record_map! { "x" => 1i64 }).unwrap();
    let two = ty.construct(record_map! { "x" => "1" }).unwrap();
    assert_eq!(one.partial_cmp(&two), None);
}

// ═══════════════════════════════════════════════════════════════════════
// Computed members
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_members_resolve_against_instance() {
    let ty = RecordBuilder::new("Point")
        .field("x")
        .field("y")
        .method("scaled_x", |r, args| {
            let factor = args.first().and_then(Value::as_i64).unwrap_or(1);
            Ok(Value::from(r.get("x")?.as_i64().unwrap_or(0) * factor))
        })
        .property("sum", |r| {
            Ok(Value::from(
                r.get("x")?.as_i64().unwrap_or(0) + r.get("y")?.as_i64().unwrap_or(0),
            ))
        })
        .build()
        .unwrap();
    let point = ty.construct(record_map! { "x" => 2i64, "y" => 5i64 }).unwrap();

    assert!(point.has_member("sum"));
    assert_eq!(point.len(), 2);
    assert_eq!(point.call("scaled_x", &[Value::from(10i64)]).unwrap(), Value::from(20i64));
    assert_eq!(point.property("sum").unwrap(), Value::from(7i64));
    assert_eq!(
        point.call("sum", &[]).unwrap_err(),
        RecordError::UnknownMember(SmolStr::new("sum"))
    );
}

#[test]
fn test_property_setter() {
    let ty = RecordBuilder::new("Celsius")
        .field("degrees")
        .property_with_setter(
            "fahrenheit",
            |r| Ok(Value::from(r.get("degrees")?.as_f64().unwrap_or(0.0) * 9.0 / 5.0 + 32.0)),
            |r, v| r.set("degrees", (v.as_f64().unwrap_or(0.0) - 32.0) * 5.0 / 9.0),
        )
        .property("kelvin", |r| {
            Ok(Value::from(r.get("degrees")?.as_f64().unwrap_or(0.0) + 273.15))
        })
        .build()
        .unwrap();
    let mut temp = ty.construct(record_map! { "degrees" => 100.0f64 }).unwrap();
    assert_eq!(temp.property("fahrenheit").unwrap(), Value::from(212.0f64));

    temp.set_property("fahrenheit", 32.0f64).unwrap();
    assert_eq!(temp.get("degrees").unwrap(), &Value::from(0.0f64));

    assert_eq!(
        temp.set_property("kelvin", 0.0f64).unwrap_err(),
        RecordError::ReadOnlyProperty(SmolStr::new("kelvin"))
    );
}

#[test]
fn test_members_unbound_without_construction_routine() {
    let ty = RecordBuilder::new("Point")
        .field("x")
        .property("double", |r| Ok(Value::from(r.get("x")?.as_i64().unwrap_or(0) * 2)))
        .build()
        .unwrap();
    let raw_built = slots_from_type(&ty, record_map! { "x" => 1i64 }).unwrap();
    assert!(!raw_built.has_member("double"));
    assert_eq!(
        raw_built.property("double").unwrap_err(),
        RecordError::UnknownMember(SmolStr::new("double"))
    );
}

#[test]
fn test_explicit_order_iteration() {
    let ty = RecordBuilder::new("This")
        .field("x")
        .field("y")
        .field("z")
        .order(Order::Explicit(vec!["x".into(), "z".into(), "y".into()]))
        .build()
        .unwrap();
    let this = ty.construct(record_map! { "x" => 1i64, "y" => 2i64, "z" => 3i64 }).unwrap();
    let values: Vec<i64> = this.iter().map(|(_, v)| v.as_i64().unwrap()).collect();
    assert_eq!(values, [1, 3, 2]);
    // Representation stays in declaration order.
    assert_eq!(this.to_string(), "This(x=1, y=2, z=3)");
}

// ═══════════════════════════════════════════════════════════════════════
// Properties
// ═══════════════════════════════════════════════════════════════════════

fn any_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i64>().prop_map(Value::from),
        any::<bool>().prop_map(Value::from),
        "[a-z ]{0,6}".prop_map(Value::from),
    ]
}

proptest! {
    #[test]
    fn prop_mapping_round_trip(
        fields in btree_map("[a-z]{1,6}", any_value(), 0..8),
        sorted in any::<bool>(),
    ) {
        // Declare in reverse so the sorted order differs from declaration.
        let builder = fields
            .keys()
            .rev()
            .fold(RecordBuilder::new("Row"), |b, name| b.field(name.as_str()));
        let order = if sorted { Order::Sorted } else { Order::Unordered };
        let ty = builder.order(order).build().unwrap();
        let mapping = fields
            .iter()
            .map(|(k, v)| (SmolStr::new(k), v.clone()))
            .collect();
        let record = ty.construct(mapping).unwrap();

        let copy = from_mapping("Row", record.to_mapping()).unwrap();
        prop_assert_eq!(&copy, &record);
        prop_assert_eq!(pairs(&copy), pairs(&record));
    }
}
