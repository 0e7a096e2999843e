/// Integration tests for schema fingerprints and cross-build tolerance:
/// additive schema changes degrade to skipped components, while save files
/// from a different build are refused outright.

use std::sync::Arc;

use snapwire_shared::{
    schema_fingerprint, ComponentKind, EntityHandle, SchemaError, SnapshotArchive, SnapshotCodec,
    SnapshotError,
};
use snapwire_test::{
    init_logger, older_schema, schema, CanHoldItem, HasName, HasSubtype, TestEntity, TestWorld,
    Transform, SCHEMA_NAMES,
};

const PINNED: u64 = schema_fingerprint(&SCHEMA_NAMES);

#[test]
fn fingerprint_is_stable_across_builds_of_the_registry() {
    assert_eq!(schema().fingerprint(), PINNED);
    assert_eq!(schema().fingerprint(), schema().fingerprint());
    assert_eq!(schema().verify(PINNED), Ok(()));
}

#[test]
fn fingerprint_changes_with_order_and_names() {
    let mut swapped = SCHEMA_NAMES;
    swapped.swap(0, 1);
    assert_ne!(schema_fingerprint(&swapped), PINNED);

    let mut renamed = SCHEMA_NAMES;
    renamed[2] = "HasSubType";
    assert_ne!(schema_fingerprint(&renamed), PINNED);

    assert_ne!(older_schema().fingerprint(), PINNED);
}

#[test]
fn newer_components_are_skipped_by_older_builds() {
    init_logger();
    let newer = SnapshotCodec::new(Arc::new(schema()));
    let mut older = SnapshotCodec::new(Arc::new(older_schema()));

    let handle = EntityHandle::new(3, 1);
    let source = TestEntity::new(handle)
        .with(HasName::new("Soda Machine"))
        .with(CanHoldItem {
            held: Some(12),
            filter_locked: true,
        });
    let record = newer.encode(&source).unwrap();

    let mut target = TestEntity::new(handle);
    let report = older.decode(&record, &mut target).unwrap();
    assert_eq!(report.skipped, vec![ComponentKind::from_u16(5)]);
    assert_eq!(target.get::<HasName>(), Some(&HasName::new("Soda Machine")));
    assert!(!target.has::<CanHoldItem>());

    // logged once per kind, counted once
    older.decode(&record, &mut target).unwrap();
    assert_eq!(older.unknown_kinds_seen(), 1);
}

#[test]
fn payload_order_follows_schema_not_insertion() {
    let codec = SnapshotCodec::new(Arc::new(schema()));
    let handle = EntityHandle::new(0, 0);
    let first = TestEntity::new(handle)
        .with(HasSubtype { index: 2 })
        .with(Transform::new(1.0, 2.0, 3.0, 90.0));
    let second = TestEntity::new(handle)
        .with(Transform::new(1.0, 2.0, 3.0, 90.0))
        .with(HasSubtype { index: 2 });

    assert_eq!(
        codec.encode_bytes(&first).unwrap(),
        codec.encode_bytes(&second).unwrap()
    );
    let kinds: Vec<u16> = codec
        .encode(&first)
        .unwrap()
        .kinds()
        .map(|kind| kind.as_u16())
        .collect();
    assert_eq!(kinds, vec![1, 3]);
}

#[test]
fn entity_without_components_encodes_to_identity_only() {
    let mut codec = SnapshotCodec::new(Arc::new(schema()));
    let empty = TestEntity::new(EntityHandle::new(8, 2));
    let record = codec.encode(&empty).unwrap();
    assert!(record.is_empty());
    assert_eq!(record.entity, EntityHandle::new(8, 2));
    // slot, generation, count
    assert_eq!(record.to_bytes().len(), 4 + 4 + 2);

    let mut target = TestEntity::new(EntityHandle::new(8, 2));
    let report = codec.decode(&record, &mut target).unwrap();
    assert!(report.applied.is_empty());
}

#[test]
fn malformed_payload_leaves_entity_untouched() {
    let mut codec = SnapshotCodec::new(Arc::new(schema()));
    let handle = EntityHandle::new(1, 0);
    let source = TestEntity::new(handle)
        .with(Transform::new(4.0, 0.0, 4.0, 0.0))
        .with(HasName::new("Cupboard"));
    let mut record = codec.encode(&source).unwrap();
    // the name payload claims more bytes than it carries
    record.components[1].bytes = vec![200, 0, 0, 0, b'C'];

    let mut target = TestEntity::new(handle).with(Transform::new(0.0, 0.0, 0.0, 0.0));
    let result = codec.decode(&record, &mut target);
    assert!(matches!(result, Err(SnapshotError::PayloadInvalid { .. })));
    assert_eq!(
        target.get::<Transform>(),
        Some(&Transform::new(0.0, 0.0, 0.0, 0.0))
    );
    assert!(!target.has::<HasName>());
}

#[test]
fn archive_round_trips_a_world() {
    let codec = SnapshotCodec::new(Arc::new(schema()));
    let mut world = TestWorld::new();
    world.spawn().insert(HasName::new("Register"));
    world.spawn().insert(Transform::new(1.0, 0.0, 1.0, 45.0));
    world.spawn();

    let archive = SnapshotArchive::capture(&codec, world.entities()).unwrap();
    let bytes = archive.to_bytes();
    let loaded = SnapshotArchive::from_bytes(&bytes, codec.kinds()).unwrap();
    assert_eq!(loaded, archive);
    assert_eq!(loaded.len(), 3);

    let mut decoder = SnapshotCodec::new(Arc::new(schema()));
    let mut restored = TestWorld::new();
    for record in loaded.records() {
        let entity = restored.entity_or_spawn(record.entity);
        decoder.decode(record, entity).unwrap();
    }
    assert_eq!(
        restored
            .entity(EntityHandle::new(0, 0))
            .and_then(|entity| entity.get::<HasName>()),
        Some(&HasName::new("Register"))
    );
    assert_eq!(restored.len(), 3);
}

#[test]
fn archive_from_another_build_is_refused() {
    let codec = SnapshotCodec::new(Arc::new(schema()));
    let mut world = TestWorld::new();
    world.spawn().insert(HasName::new("Table"));
    let bytes = SnapshotArchive::capture(&codec, world.entities())
        .unwrap()
        .to_bytes();

    let older = older_schema();
    let result = SnapshotArchive::from_bytes(&bytes, &older);
    assert_eq!(
        result,
        Err(SnapshotError::Schema(SchemaError::FormatIncompatible {
            expected: older.fingerprint(),
            found: PINNED,
        }))
    );
}
