//! Component storage
//!
//! Instances live in one generational slot map owned by the world. Each entity
//! keeps a [`ComponentTable`] (attachment order plus type index), and the
//! store keeps a global per-type cache for cross-entity queries.

use super::component::Component;
use super::lifecycle::Lifecycle;
use super::Entity;
use slotmap::{new_key_type, SlotMap};
use std::any::TypeId;
use std::collections::HashMap;

new_key_type! {
    /// Generational key of a component instance
    pub struct ComponentKey;
}

/// One stored component with its bookkeeping
pub(crate) struct ComponentSlot {
    pub entity: Entity,
    pub type_id: TypeId,
    pub type_name: &'static str,
    /// `None` while the instance is checked out for a hook call
    pub instance: Option<Box<dyn Component>>,
    pub lifecycle: Lifecycle,
    /// Last enable/disable notification delivered to the instance
    pub notified_enabled: Option<bool>,
}

impl ComponentSlot {
    pub fn new<T: Component>(entity: Entity, component: T) -> Self {
        Self {
            entity,
            type_id: TypeId::of::<T>(),
            type_name: short_type_name::<T>(),
            instance: Some(Box::new(component)),
            lifecycle: Lifecycle::new(),
            notified_enabled: None,
        }
    }
}

/// Type name without its module path
pub(crate) fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// Per-entity component table
#[derive(Debug, Default)]
pub(crate) struct ComponentTable {
    order: Vec<ComponentKey>,
    by_type: HashMap<TypeId, ComponentKey>,
}

impl ComponentTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attached keys in attachment order, including ones pending removal
    pub fn keys(&self) -> &[ComponentKey] {
        &self.order
    }

    pub fn key_of(&self, type_id: TypeId) -> Option<ComponentKey> {
        self.by_type.get(&type_id).copied()
    }

    pub fn contains_type(&self, type_id: TypeId) -> bool {
        self.by_type.contains_key(&type_id)
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn insert(&mut self, type_id: TypeId, key: ComponentKey) {
        self.by_type.insert(type_id, key);
        self.order.push(key);
    }

    pub fn remove(&mut self, type_id: TypeId, key: ComponentKey) {
        if self.by_type.get(&type_id) == Some(&key) {
            self.by_type.remove(&type_id);
        }
        self.order.retain(|attached| *attached != key);
    }
}

/// World-wide component store with a per-type cache
pub(crate) struct ComponentStore {
    slots: SlotMap<ComponentKey, ComponentSlot>,
    by_type: HashMap<TypeId, Vec<ComponentKey>>,
}

impl ComponentStore {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: SlotMap::with_capacity_and_key(capacity),
            by_type: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn insert(&mut self, slot: ComponentSlot) -> ComponentKey {
        let type_id = slot.type_id;
        let key = self.slots.insert(slot);
        self.by_type.entry(type_id).or_default().push(key);
        key
    }

    pub fn get(&self, key: ComponentKey) -> Option<&ComponentSlot> {
        self.slots.get(key)
    }

    pub fn get_mut(&mut self, key: ComponentKey) -> Option<&mut ComponentSlot> {
        self.slots.get_mut(key)
    }

    /// Instance behind `key`, unless it is pending removal or checked out
    pub fn live<T: Component>(&self, key: ComponentKey) -> Option<&T> {
        let slot = self.slots.get(key)?;
        if slot.lifecycle.is_marked_for_removal() {
            return None;
        }
        slot.instance.as_deref()?.downcast_ref::<T>()
    }

    pub fn live_mut<T: Component>(&mut self, key: ComponentKey) -> Option<&mut T> {
        let slot = self.slots.get_mut(key)?;
        if slot.lifecycle.is_marked_for_removal() {
            return None;
        }
        slot.instance.as_deref_mut()?.downcast_mut::<T>()
    }

    /// Every live instance of `T`, in insertion order
    pub fn find_all<T: Component>(&self) -> impl Iterator<Item = &T> {
        self.by_type
            .get(&TypeId::of::<T>())
            .into_iter()
            .flatten()
            .filter_map(|key| self.live::<T>(*key))
    }

    /// Keys of every `type_id` instance not pending removal, checked-out ones included
    pub fn live_keys(&self, type_id: TypeId) -> impl Iterator<Item = ComponentKey> + '_ {
        self.by_type
            .get(&type_id)
            .into_iter()
            .flatten()
            .copied()
            .filter(|key| self.slots.get(*key).is_some_and(|slot| !slot.lifecycle.is_marked_for_removal()))
    }

    /// Drop the slot and its cache entry
    pub fn evict(&mut self, key: ComponentKey) -> Option<ComponentSlot> {
        let slot = self.slots.remove(key)?;
        if let Some(keys) = self.by_type.get_mut(&slot.type_id) {
            keys.retain(|cached| *cached != key);
        }
        Some(slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Health(i32);
    impl Component for Health {}

    struct Armor;
    impl Component for Armor {}

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name::<Health>(), "Health");
        assert_eq!(short_type_name::<Vec<u8>>(), "Vec");
    }

    #[test]
    fn test_find_all_in_insertion_order() {
        let mut store = ComponentStore::with_capacity(4);
        let a = store.insert(ComponentSlot::new(Entity::new(1), Health(10)));
        store.insert(ComponentSlot::new(Entity::new(1), Armor));
        let c = store.insert(ComponentSlot::new(Entity::new(2), Health(20)));

        let values: Vec<i32> = store.find_all::<Health>().map(|health| health.0).collect();
        assert_eq!(values, vec![10, 20]);

        store.get_mut(a).unwrap().lifecycle.try_mark_for_removal();
        let values: Vec<i32> = store.find_all::<Health>().map(|health| health.0).collect();
        assert_eq!(values, vec![20]);
        assert!(store.live::<Health>(a).is_none());

        store.evict(c);
        assert!(store.get(c).is_none());
        assert_eq!(store.find_all::<Health>().count(), 0);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_stale_key_after_eviction() {
        let mut store = ComponentStore::with_capacity(1);
        let old = store.insert(ComponentSlot::new(Entity::new(1), Health(1)));
        store.evict(old);
        let new = store.insert(ComponentSlot::new(Entity::new(1), Health(2)));

        assert_ne!(old, new);
        assert!(store.live::<Health>(old).is_none());
        assert_eq!(store.live::<Health>(new).map(|health| health.0), Some(2));
    }

    #[test]
    fn test_table_keeps_attachment_order() {
        let mut store = ComponentStore::with_capacity(2);
        let mut table = ComponentTable::new();
        let a = store.insert(ComponentSlot::new(Entity::new(1), Health(1)));
        let b = store.insert(ComponentSlot::new(Entity::new(1), Armor));
        table.insert(TypeId::of::<Health>(), a);
        table.insert(TypeId::of::<Armor>(), b);

        assert_eq!(table.keys(), &[a, b]);
        assert!(table.contains_type(TypeId::of::<Armor>()));

        table.remove(TypeId::of::<Health>(), a);
        assert_eq!(table.keys(), &[b]);
        assert_eq!(table.key_of(TypeId::of::<Health>()), None);
    }
}
