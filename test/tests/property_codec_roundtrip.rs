/// PROPERTY-BASED TESTS: snapshot codec round-trip
///
/// For every component kind and every valid payload value, decoding an
/// encoded entity reconstructs the same component set.

use std::sync::Arc;

use proptest::prelude::*;
use snapwire_shared::{EntityHandle, IngredientSet, SnapshotCodec, SnapshotRecord};
use snapwire_test::{schema, CanHoldItem, HasName, HasSubtype, IsDrink, TestEntity, Transform};

fn transform_strategy() -> impl Strategy<Value = Transform> {
    (
        -1.0e6f32..1.0e6f32,
        -1.0e6f32..1.0e6f32,
        -1.0e6f32..1.0e6f32,
        -360.0f32..360.0f32,
    )
        .prop_map(|(x, y, z, facing)| Transform::new(x, y, z, facing))
}

fn drink_strategy() -> impl Strategy<Value = IsDrink> {
    (any::<u64>(), proptest::option::of("[a-zA-Z ]{0,24}")).prop_map(|(bits, underlying)| {
        IsDrink {
            ingredients: IngredientSet::from_bits(bits),
            underlying,
        }
    })
}

fn holder_strategy() -> impl Strategy<Value = CanHoldItem> {
    (proptest::option::of(any::<u32>()), any::<bool>())
        .prop_map(|(held, filter_locked)| CanHoldItem { held, filter_locked })
}

proptest! {
    #[test]
    fn prop_full_entity_round_trips(
        slot in any::<u32>(),
        generation in any::<u32>(),
        transform in proptest::option::of(transform_strategy()),
        name in proptest::option::of("\\PC{0,32}"),
        subtype in proptest::option::of(any::<i32>()),
        drink in proptest::option::of(drink_strategy()),
        holder in proptest::option::of(holder_strategy()),
    ) {
        let handle = EntityHandle::new(slot, generation);
        let mut source = TestEntity::new(handle);
        if let Some(transform) = transform.clone() {
            source.insert(transform);
        }
        if let Some(name) = name.clone() {
            source.insert(HasName::new(name));
        }
        if let Some(index) = subtype {
            source.insert(HasSubtype { index });
        }
        if let Some(drink) = drink.clone() {
            source.insert(drink);
        }
        if let Some(holder) = holder.clone() {
            source.insert(holder);
        }

        let mut codec = SnapshotCodec::new(Arc::new(schema()));
        let bytes = codec.encode_bytes(&source).unwrap();
        let record = SnapshotRecord::from_bytes(&bytes).unwrap();
        prop_assert_eq!(record.entity, handle);

        let mut target = TestEntity::new(handle);
        let report = codec.decode(&record, &mut target).unwrap();
        prop_assert!(report.skipped.is_empty());
        prop_assert_eq!(target.component_count(), source.component_count());
        prop_assert_eq!(target.get::<Transform>(), transform.as_ref());
        prop_assert_eq!(target.get::<HasName>().map(|n| n.name.clone()), name);
        prop_assert_eq!(target.get::<HasSubtype>().map(|s| s.index), subtype);
        prop_assert_eq!(target.get::<IsDrink>(), drink.as_ref());
        prop_assert_eq!(target.get::<CanHoldItem>(), holder.as_ref());
    }

    /// Floats survive bit-exactly, including values with no short decimal form
    #[test]
    fn prop_transform_bits_are_preserved(bits in any::<[u32; 4]>()) {
        let values = bits.map(f32::from_bits);
        prop_assume!(values.iter().all(|value| !value.is_nan()));
        let source = TestEntity::new(EntityHandle::new(1, 0))
            .with(Transform::new(values[0], values[1], values[2], values[3]));

        let mut codec = SnapshotCodec::new(Arc::new(schema()));
        let record = codec.encode(&source).unwrap();
        let mut target = TestEntity::new(EntityHandle::new(1, 0));
        codec.decode(&record, &mut target).unwrap();

        let decoded = target.get::<Transform>().unwrap();
        let decoded_bits = [
            decoded.position[0].to_bits(),
            decoded.position[1].to_bits(),
            decoded.position[2].to_bits(),
            decoded.facing.to_bits(),
        ];
        prop_assert_eq!(decoded_bits, bits);
    }
}
