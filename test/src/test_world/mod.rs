//! In-memory entity storage implementing the codec and filter seams.

use std::{
    any::{Any, TypeId},
    collections::{BTreeMap, HashMap},
};

use snapwire_shared::{
    EntityHandle, EntityMut, EntityView, FilterTarget, IngredientSet, Replicate,
};

use crate::test_schema::{HasName, HasSubtype, IsDrink};

pub struct TestEntity {
    handle: EntityHandle,
    components: HashMap<TypeId, Box<dyn Any + Send>>,
}

impl TestEntity {
    pub fn new(handle: EntityHandle) -> Self {
        Self {
            handle,
            components: HashMap::new(),
        }
    }

    pub fn with<C: Replicate>(mut self, component: C) -> Self {
        self.insert(component);
        self
    }

    pub fn insert<C: Replicate>(&mut self, component: C) {
        self.components
            .insert(TypeId::of::<C>(), Box::new(component));
    }

    pub fn remove<C: Replicate>(&mut self) -> Option<C> {
        self.components
            .remove(&TypeId::of::<C>())
            .and_then(|component| component.downcast::<C>().ok())
            .map(|component| *component)
    }

    pub fn get<C: Replicate>(&self) -> Option<&C> {
        self.components
            .get(&TypeId::of::<C>())
            .and_then(|component| component.downcast_ref::<C>())
    }

    pub fn has<C: Replicate>(&self) -> bool {
        self.components.contains_key(&TypeId::of::<C>())
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }
}

impl EntityView for TestEntity {
    fn handle(&self) -> EntityHandle {
        self.handle
    }

    fn component_by_type(&self, type_id: TypeId) -> Option<&dyn Any> {
        self.components
            .get(&type_id)
            .map(|component| &**component as &dyn Any)
    }
}

impl EntityMut for TestEntity {
    fn insert_component_boxed(&mut self, type_id: TypeId, component: Box<dyn Any + Send>) {
        self.components.insert(type_id, component);
    }
}

impl FilterTarget for TestEntity {
    fn describe(&self) -> String {
        match self.display_name() {
            Some(name) => format!("entity {} ({})", self.handle, name),
            None => format!("entity {}", self.handle),
        }
    }

    fn display_name(&self) -> Option<&str> {
        self.get::<HasName>().map(|name| name.name.as_str())
    }

    fn subtype_index(&self) -> Option<i32> {
        self.get::<HasSubtype>().map(|subtype| subtype.index)
    }

    fn ingredients(&self) -> Option<IngredientSet> {
        self.get::<IsDrink>().map(|drink| drink.ingredients)
    }
}

/// Entities keyed by handle, iterated in handle order
#[derive(Default)]
pub struct TestWorld {
    entities: BTreeMap<EntityHandle, TestEntity>,
    next_slot: u32,
}

impl TestWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self) -> &mut TestEntity {
        let handle = EntityHandle::new(self.next_slot, 0);
        self.next_slot += 1;
        self.entities
            .entry(handle)
            .or_insert_with(|| TestEntity::new(handle))
    }

    /// The entity under `handle`, created empty if missing
    pub fn entity_or_spawn(&mut self, handle: EntityHandle) -> &mut TestEntity {
        self.next_slot = self.next_slot.max(handle.slot + 1);
        self.entities
            .entry(handle)
            .or_insert_with(|| TestEntity::new(handle))
    }

    pub fn entity(&self, handle: EntityHandle) -> Option<&TestEntity> {
        self.entities.get(&handle)
    }

    pub fn entity_mut(&mut self, handle: EntityHandle) -> Option<&mut TestEntity> {
        self.entities.get_mut(&handle)
    }

    pub fn despawn(&mut self, handle: EntityHandle) -> Option<TestEntity> {
        self.entities.remove(&handle)
    }

    pub fn entities(&self) -> impl Iterator<Item = &TestEntity> {
        self.entities.values()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
