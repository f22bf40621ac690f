use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::{DuplicatePolicy, IndexContent};
use crate::registry::Registry;
use crate::test_util::{self, Shape};
use crate::{Config, Entity, EntityIndex, IdSource, Rect, RegistryError};

fn registry() -> Registry<Shape> { Registry::new("shapes", Arc::new(IdSource::new())) }

fn populated(count: usize) -> Registry<Shape> {
    let registry = registry();
    for shape in Shape::diagonal(count) {
        registry.register(&shape);
    }
    registry
}

fn ids(entities: &[Arc<Shape>]) -> Vec<u32> { entities.iter().map(|entity| entity.id()).collect() }

#[test]
fn test_marshal_is_ascending() {
    let registry = registry();
    for id in [8, 3, 5] {
        registry.insert(Shape::with_id(id, "x", Rect::new(0, 0, 1, 1))).expect("id is known");
    }

    assert_eq!(ids(&registry.marshal()), [3, 5, 8]);
}

#[test]
fn test_marshal_unmarshal_restores_entities() {
    test_util::init();

    let source = populated(20);
    let target = registry();

    target.unmarshal(source.marshal()).expect("valid content");

    assert_eq!(target.len(), source.len());
    for (restored, original) in target.entities().iter().zip(source.entities()) {
        assert!(Arc::ptr_eq(restored, &original));
    }
}

#[test]
fn test_unmarshal_ignores_input_order() {
    let source = populated(50);
    let mut shuffled = source.marshal();
    shuffled.shuffle(&mut rand::rngs::StdRng::seed_from_u64(0x5eed));

    let target = registry();
    target.unmarshal(shuffled).expect("valid content");

    assert_eq!(ids(&target.entities()), (1..=50).collect::<Vec<_>>());
    assert_eq!(target.id_after(10), 11);
}

#[test]
fn test_unmarshal_replaces_previous_content() {
    let registry = populated(3);

    registry.unmarshal(vec![Shape::with_id(10, "only", Rect::new(0, 0, 1, 1))]).expect("valid content");

    assert_eq!(ids(&registry.entities()), [10]);
    assert_eq!(registry.last_id(), 10);
}

#[test]
fn test_unmarshal_raises_counter() {
    let registry = registry();

    registry
        .unmarshal(vec![
            Shape::with_id(4, "a", Rect::new(0, 0, 1, 1)),
            Shape::with_id(12, "b", Rect::new(0, 0, 1, 1)),
        ])
        .expect("valid content");

    assert_eq!(registry.register(&Shape::new("fresh", Rect::new(0, 0, 1, 1))), 13);
}

#[test]
fn test_unmarshal_rejects_unassigned_ids() {
    let registry = populated(2);

    let err = registry
        .unmarshal(vec![
            Shape::with_id(5, "a", Rect::new(0, 0, 1, 1)),
            Shape::new("unregistered", Rect::new(0, 0, 1, 1)),
        ])
        .unwrap_err();

    assert!(matches!(err, RegistryError::UnassignedId(_)), "unexpected error {err:?}");
    assert_eq!(ids(&registry.entities()), [1, 2], "registry is untouched on error");
}

#[test]
fn test_duplicate_ids_overwrite_by_default() {
    test_util::init();

    let registry = registry();
    assert_eq!(registry.duplicate_policy(), DuplicatePolicy::Overwrite);

    registry
        .unmarshal(vec![
            Shape::with_id(2, "first", Rect::new(0, 0, 1, 1)),
            Shape::with_id(1, "other", Rect::new(0, 0, 1, 1)),
            Shape::with_id(2, "second", Rect::new(0, 0, 1, 1)),
        ])
        .expect("duplicates are accepted");

    assert_eq!(registry.len(), 2);
    assert_eq!(registry.entity(2).expect("loaded").label, "second", "the last occurrence wins");
}

#[test]
fn test_duplicate_ids_rejected_by_policy() {
    let config = Config { duplicate_policy: DuplicatePolicy::Reject, ..Config::default() };
    let registry: Registry<Shape> = Registry::with_config("shapes", Arc::new(IdSource::new()), &config);
    registry.insert(Shape::with_id(9, "kept", Rect::new(0, 0, 1, 1))).expect("id is known");

    let err = registry
        .unmarshal(vec![
            Shape::with_id(2, "first", Rect::new(0, 0, 1, 1)),
            Shape::with_id(2, "second", Rect::new(0, 0, 1, 1)),
        ])
        .unwrap_err();

    assert!(matches!(err, RegistryError::DuplicateId(2)), "unexpected error {err:?}");
    assert_eq!(ids(&registry.entities()), [9], "registry is untouched on error");
}

#[test]
fn test_json_round_trip() {
    test_util::init();

    let source = populated(4);
    source.remove(&source.entity(2).expect("registered"));
    let json = source.to_json().expect("shapes serialize");

    let target = registry();
    target.load_json(&json).expect("valid json");

    assert_eq!(ids(&target.entities()), [1, 3, 4]);
    for (restored, original) in target.entities().iter().zip(source.entities()) {
        assert_eq!(**restored, *original);
    }
    assert_eq!(target.last_id(), 4);
}

#[test]
fn test_json_layout_is_a_flat_list() {
    let registry = registry();
    registry.insert(Shape::with_id(3, "a", Rect::new(1, 2, 3, 4))).expect("id is known");

    let json: serde_json::Value =
        serde_json::from_str(&registry.to_json().expect("shapes serialize")).expect("valid json");

    assert_eq!(json["name"], "shapes");
    assert_eq!(json["last_id"], 3);
    assert_eq!(json["entities"][0]["id"], 3, "the id is stored as a bare number");
    assert_eq!(json["entities"][0]["label"], "a");
}

#[test]
fn test_load_content_restores_last_id() {
    let registry = registry();

    registry
        .load_content(IndexContent {
            name:     String::from("shapes"),
            last_id:  40,
            entities: vec![Shape::with_id(7, "a", Rect::new(0, 0, 1, 1))],
        })
        .expect("valid content");

    assert_eq!(registry.last_id(), 40, "ids allocated in other registries are not reused");
    assert_eq!(registry.register(&Shape::new("fresh", Rect::new(0, 0, 1, 1))), 41);
}

#[test]
fn test_vip_flags_recomputed_on_load() {
    test_util::init();

    let source = populated(3);
    source.set_vip_ids("1");
    assert!(source.entity(1).expect("registered").is_vip());
    let json = source.to_json().expect("shapes serialize");
    assert!(!json.contains("vip"), "vip flags are not persisted");

    let config = Config { vip_ids: String::from("3"), ..Config::default() };
    let target: Registry<Shape> = Registry::with_config("shapes", Arc::new(IdSource::new()), &config);
    target.load_json(&json).expect("valid json");

    let flags: Vec<bool> = target.entities().iter().map(|shape| shape.is_vip()).collect();
    assert_eq!(flags, [false, false, true]);
}

#[test]
fn test_read_write_json() {
    let source = populated(2);
    let mut buffer = Vec::new();
    source.write_json(&mut buffer).expect("shapes serialize");

    let target = registry();
    target.read_json(buffer.as_slice()).expect("valid json");

    assert_eq!(ids(&target.entities()), [1, 2]);
}

#[test]
fn test_malformed_json_is_an_error() {
    let registry = populated(1);

    let err = registry.load_json("{\"name\": \"shapes\"").unwrap_err();

    assert!(matches!(err, RegistryError::Serialization(_)), "unexpected error {err:?}");
    assert_eq!(registry.len(), 1);
}
