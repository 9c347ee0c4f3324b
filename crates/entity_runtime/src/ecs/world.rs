//! ECS World implementation
//!
//! The world owns every entity record, the component store, the scene tree,
//! the id allocator and the mutation queues. Structural requests made from
//! component hooks are queued and resolved by the scheduler at drain
//! boundaries (see [`super::scheduler`]).

use super::component::{Component, ComponentHandle};
use super::entity::EntityRecord;
use super::error::EcsError;
use super::lifecycle::LifecycleState;
use super::scheduler::{FramePhase, FrameStats, MutationQueue, StructuralChange};
use super::storage::{short_type_name, ComponentKey, ComponentSlot, ComponentStore};
use super::template::{EntityTemplate, TemplateArgs, TemplateRegistry};
use super::transform::Transform;
use super::Entity;
use crate::config::RuntimeConfig;
use crate::foundation::collections::IdAllocator;
use crate::foundation::math::{utils, Mat3, Mat3Ext, Vec2};
use crate::scene::{NodeId, SceneTree};
use log::{debug, error, warn};
use std::any::{Any, TypeId};
use std::collections::BTreeMap;
use std::rc::Rc;

/// ECS World containing all entities and components
pub struct World {
    pub(super) entities: BTreeMap<Entity, EntityRecord>,
    pub(super) components: ComponentStore,
    pub(super) tree: SceneTree,
    pub(super) ids: IdAllocator,
    pub(super) templates: TemplateRegistry,
    pub(super) queue: MutationQueue,
    pub(super) phase: FramePhase,
    pub(super) config: RuntimeConfig,
    pub(super) stats: FrameStats,
}

impl Default for World {
    fn default() -> Self {
        Self::new(TemplateRegistry::new())
    }
}

impl World {
    /// Create a world using the given templates
    pub fn new(templates: TemplateRegistry) -> Self {
        Self::with_config(templates, RuntimeConfig::default())
    }

    /// Create a world with explicit runtime settings
    pub fn with_config(templates: TemplateRegistry, config: RuntimeConfig) -> Self {
        Self {
            entities: BTreeMap::new(),
            components: ComponentStore::with_capacity(config.component_capacity),
            tree: SceneTree::with_capacity(config.entity_capacity),
            ids: IdAllocator::new(),
            templates,
            queue: MutationQueue::default(),
            phase: FramePhase::Idle,
            config,
            stats: FrameStats::default(),
        }
    }

    /// Runtime settings
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Registered templates
    pub fn templates(&self) -> &TemplateRegistry {
        &self.templates
    }

    /// Scene tree of live entities
    pub fn tree(&self) -> &SceneTree {
        &self.tree
    }

    /// Current frame phase
    pub fn phase(&self) -> FramePhase {
        self.phase
    }

    /// Counters of the last update/draw
    pub fn last_frame_stats(&self) -> FrameStats {
        self.stats
    }

    /// Number of entity records, including ones waiting for insertion or removal
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Number of stored components, including ones waiting for start or removal
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Every entity record, in id order
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.entities.keys().copied()
    }

    pub(super) fn ensure_not_drawing(&self, operation: &'static str) -> Result<(), EcsError> {
        if self.phase == FramePhase::Drawing {
            return Err(EcsError::DrawPhaseViolation { operation });
        }
        Ok(())
    }

    fn record(&self, entity: Entity) -> Result<&EntityRecord, EcsError> {
        self.entities.get(&entity).ok_or(EcsError::EntityNotFound(entity))
    }

    fn record_mut(&mut self, entity: Entity) -> Result<&mut EntityRecord, EcsError> {
        self.entities.get_mut(&entity).ok_or(EcsError::EntityNotFound(entity))
    }

    fn ensure_not_marked(&self, entity: Entity) -> Result<(), EcsError> {
        if self.record(entity)?.lifecycle.is_marked_for_removal() {
            return Err(EcsError::AlreadyMarkedForRemoval { entity, component: None });
        }
        Ok(())
    }

    // Entities

    /// Create a new root-level entity; it joins the scene tree at the next update
    pub fn create_entity(&mut self) -> Result<Entity, EcsError> {
        self.ensure_not_drawing("create an entity")?;

        let entity = Entity::new(self.ids.allocate());
        let mut record = EntityRecord::new();
        record.lifecycle.enqueue();
        self.entities.insert(entity, record);
        self.queue.entities_to_add.push_back(entity);

        debug!("Created entity {entity}");
        Ok(entity)
    }

    /// Create an entity populated by the template registered for type `T`
    pub fn create_entity_from_template<T: EntityTemplate>(&mut self, args: &TemplateArgs) -> Result<Entity, EcsError> {
        self.ensure_not_drawing("create an entity")?;
        let template = self.templates.get::<T>().ok_or_else(|| {
            let name = std::any::type_name::<T>();
            error!("No entity template registered for type {name}");
            EcsError::UnknownTemplate(name.to_string())
        })?;
        self.build_from_template(&template, args)
    }

    /// Create an entity populated by the template registered under `name`
    pub fn create_entity_from_template_named(&mut self, name: &str, args: &TemplateArgs) -> Result<Entity, EcsError> {
        self.ensure_not_drawing("create an entity")?;
        let template = self.templates.get_named(name).ok_or_else(|| {
            error!("No entity template registered under '{name}'");
            EcsError::UnknownTemplate(name.to_string())
        })?;
        self.build_from_template(&template, args)
    }

    fn build_from_template(&mut self, template: &Rc<dyn EntityTemplate>, args: &TemplateArgs) -> Result<Entity, EcsError> {
        let entity = self.create_entity()?;
        self.set_name(entity, template.name())?;

        if let Err(err) = template.build_entity(self, entity, args) {
            warn!("Template '{}' failed for entity {entity}: {err}", template.name());
            if self.entities.contains_key(&entity) && !self.is_marked_for_removal(entity) {
                self.cascade_destroy(entity);
            }
            return Err(err);
        }
        Ok(entity)
    }

    /// Destroy an entity, its subtree and all of their components
    ///
    /// Removal is deferred to the removal drain of the next update.
    pub fn destroy_entity(&mut self, entity: Entity) -> Result<(), EcsError> {
        self.ensure_not_drawing("destroy an entity")?;
        self.ensure_not_marked(entity)?;
        self.cascade_destroy(entity);
        Ok(())
    }

    /// Mark children first, then the entity and its components
    pub(super) fn cascade_destroy(&mut self, entity: Entity) {
        let Some(record) = self.entities.get(&entity) else { return };
        let children = record.transform.children().to_vec();
        for child in children {
            if !self.is_marked_for_removal(child) {
                self.cascade_destroy(child);
            }
        }

        let Some(record) = self.entities.get_mut(&entity) else { return };
        if !record.lifecycle.try_mark_for_removal() {
            return;
        }
        for key in record.components.keys() {
            if let Some(slot) = self.components.get_mut(*key) {
                if slot.lifecycle.try_mark_for_removal() {
                    self.queue.components_to_remove.push_back(*key);
                }
            }
        }
        self.queue.entities_to_remove.push_back(entity);
        debug!("Entity {entity} marked for removal");
    }

    /// Whether a record exists for the entity
    pub fn contains(&self, entity: Entity) -> bool {
        self.entities.contains_key(&entity)
    }

    /// Lifecycle state; `Destroyed` once the record is gone
    pub fn entity_state(&self, entity: Entity) -> LifecycleState {
        self.entities
            .get(&entity)
            .map_or(LifecycleState::Destroyed, |record| record.lifecycle.state())
    }

    /// Whether the entity has been inserted into the scene tree
    pub fn is_started(&self, entity: Entity) -> bool {
        self.entities.get(&entity).is_some_and(|record| record.lifecycle.is_started())
    }

    /// Whether removal of the entity has been requested (or completed)
    pub fn is_marked_for_removal(&self, entity: Entity) -> bool {
        self.entities.get(&entity).map_or(true, |record| record.lifecycle.is_marked_for_removal())
    }

    /// User enable flag
    pub fn is_enabled(&self, entity: Entity) -> bool {
        self.entities.get(&entity).is_some_and(|record| record.lifecycle.is_enabled())
    }

    /// Set the user enable flag
    pub fn set_enabled(&mut self, entity: Entity, enabled: bool) -> Result<(), EcsError> {
        if self.record_mut(entity)?.lifecycle.set_enabled(enabled) {
            debug!("Entity {entity} {}", if enabled { "enabled" } else { "disabled" });
        }
        Ok(())
    }

    /// Whether the entity and all of its ancestors are enabled
    pub fn is_enabled_in_hierarchy(&self, entity: Entity) -> bool {
        let mut current = Some(entity);
        while let Some(candidate) = current {
            let Some(record) = self.entities.get(&candidate) else { return false };
            if !record.lifecycle.is_enabled() {
                return false;
            }
            current = record.transform.parent();
        }
        true
    }

    /// Whether the entity's components may receive update and draw calls
    pub fn is_processable(&self, entity: Entity) -> bool {
        self.entities.get(&entity).is_some_and(|record| {
            record.lifecycle.is_processable(true) && self.is_enabled_in_hierarchy(entity)
        })
    }

    /// Display name
    pub fn name(&self, entity: Entity) -> Option<&str> {
        self.entities.get(&entity).map(|record| record.name.as_str())
    }

    /// Change the display name
    pub fn set_name(&mut self, entity: Entity, name: impl Into<String>) -> Result<(), EcsError> {
        self.record_mut(entity)?.name = name.into();
        Ok(())
    }

    /// `"name" (id)` label used in diagnostics
    pub fn entity_label(&self, entity: Entity) -> String {
        match self.name(entity) {
            Some(name) => format!("\"{name}\" ({})", entity.id()),
            None => format!("<removed> ({})", entity.id()),
        }
    }

    /// Opaque user tag, if one of type `T` is set
    pub fn tag<T: Any>(&self, entity: Entity) -> Option<&T> {
        self.entities.get(&entity)?.tag.as_deref()?.downcast_ref::<T>()
    }

    /// Attach an opaque user tag, replacing the previous one
    pub fn set_tag<T: Any>(&mut self, entity: Entity, tag: T) -> Result<(), EcsError> {
        self.record_mut(entity)?.tag = Some(Box::new(tag));
        Ok(())
    }

    /// Remove the user tag
    pub fn clear_tag(&mut self, entity: Entity) -> Result<(), EcsError> {
        self.record_mut(entity)?.tag = None;
        Ok(())
    }

    // Components

    /// Attach a component; it is started at the next update
    pub fn add_component<T: Component>(&mut self, entity: Entity, component: T) -> Result<ComponentHandle<T>, EcsError> {
        self.ensure_not_drawing("add a component")?;
        let type_name = short_type_name::<T>();
        let type_id = TypeId::of::<T>();

        let record = self.entities.get_mut(&entity).ok_or(EcsError::EntityNotFound(entity))?;
        if type_id == TypeId::of::<Transform>() || record.components.contains_type(type_id) {
            return Err(EcsError::DuplicateComponentType { entity, type_name });
        }
        if record.lifecycle.is_marked_for_removal() {
            return Err(EcsError::AlreadyMarkedForRemoval { entity, component: None });
        }

        let mut slot = ComponentSlot::new(entity, component);
        slot.lifecycle.enqueue();
        let key = self.components.insert(slot);
        record.components.insert(type_id, key);
        self.queue.components_to_start.push_back(key);

        debug!("Added component {type_name} to entity {entity}");
        Ok(ComponentHandle::new(key))
    }

    /// Request removal of the entity's component of type `T`
    pub fn remove_component<T: Component>(&mut self, entity: Entity) -> Result<(), EcsError> {
        self.ensure_not_drawing("remove a component")?;
        let type_name = short_type_name::<T>();
        if TypeId::of::<T>() == TypeId::of::<Transform>() {
            return Err(EcsError::ObligatoryComponent { type_name });
        }

        let key = self
            .record(entity)?
            .components
            .key_of(TypeId::of::<T>())
            .ok_or(EcsError::NotAttached { entity, type_name })?;
        self.remove_component_by_key(key)
    }

    /// Request removal of the component behind `key`
    pub fn remove_component_by_key(&mut self, key: ComponentKey) -> Result<(), EcsError> {
        self.ensure_not_drawing("remove a component")?;
        let slot = self.components.get_mut(key).ok_or(EcsError::ComponentNotFound(key))?;
        if !slot.lifecycle.try_mark_for_removal() {
            return Err(EcsError::AlreadyMarkedForRemoval {
                entity: slot.entity,
                component: Some(slot.type_name),
            });
        }
        debug!("Component {} of entity {} marked for removal", slot.type_name, slot.entity);
        self.queue.components_to_remove.push_back(key);
        Ok(())
    }

    /// The entity's live component of type `T`; `Transform` is always present
    pub fn get_component<T: Component>(&self, entity: Entity) -> Option<&T> {
        let record = self.entities.get(&entity)?;
        if TypeId::of::<T>() == TypeId::of::<Transform>() {
            return (&record.transform as &dyn Any).downcast_ref::<T>();
        }
        let key = record.components.key_of(TypeId::of::<T>())?;
        self.components.live::<T>(key)
    }

    /// Mutable access to the entity's live component of type `T`
    ///
    /// `Transform` is only readable here; use the transform setters to change it.
    pub fn get_component_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        let key = self.entities.get(&entity)?.components.key_of(TypeId::of::<T>())?;
        self.components.live_mut::<T>(key)
    }

    /// Whether the entity has a live component of type `T`
    ///
    /// Unlike `get_component`, this also sees a component whose hook is running.
    pub fn has_component<T: Component>(&self, entity: Entity) -> bool {
        let Some(record) = self.entities.get(&entity) else { return false };
        if TypeId::of::<T>() == TypeId::of::<Transform>() {
            return true;
        }
        record
            .components
            .key_of(TypeId::of::<T>())
            .and_then(|key| self.components.get(key))
            .is_some_and(|slot| !slot.lifecycle.is_marked_for_removal())
    }

    /// Resolve a handle
    pub fn component<T: Component>(&self, handle: ComponentHandle<T>) -> Option<&T> {
        self.components.live::<T>(handle.key())
    }

    /// Resolve a handle mutably
    pub fn component_mut<T: Component>(&mut self, handle: ComponentHandle<T>) -> Option<&mut T> {
        self.components.live_mut::<T>(handle.key())
    }

    /// Lifecycle state of a component; `Destroyed` once evicted
    pub fn component_state(&self, key: ComponentKey) -> LifecycleState {
        self.components
            .get(key)
            .map_or(LifecycleState::Destroyed, |slot| slot.lifecycle.state())
    }

    /// Entity owning the component behind `key`
    pub fn component_owner(&self, key: ComponentKey) -> Option<Entity> {
        self.components.get(key).map(|slot| slot.entity)
    }

    /// First live component of type `T` anywhere in the world
    pub fn find_component<T: Component>(&self) -> Option<&T> {
        if TypeId::of::<T>() == TypeId::of::<Transform>() {
            return self.live_transforms::<T>().next();
        }
        self.components.find_all::<T>().next()
    }

    /// Every live component of type `T`, in insertion order
    ///
    /// Transforms are listed in entity id order. A component whose hook is
    /// running is checked out and missing here; see [`Self::find_component_keys`].
    pub fn find_components<T: Component>(&self) -> Vec<&T> {
        if TypeId::of::<T>() == TypeId::of::<Transform>() {
            return self.live_transforms::<T>().collect();
        }
        self.components.find_all::<T>().collect()
    }

    /// Keys of every live component of type `T`, in insertion order
    ///
    /// Includes a component whose hook is currently running. Transforms have
    /// no key and are never listed.
    pub fn find_component_keys<T: Component>(&self) -> Vec<ComponentKey> {
        self.components.live_keys(TypeId::of::<T>()).collect()
    }

    fn live_transforms<T: Component>(&self) -> impl Iterator<Item = &T> + '_ {
        self.entities
            .values()
            .filter(|record| !record.lifecycle.is_marked_for_removal())
            .filter_map(|record| (&record.transform as &dyn Any).downcast_ref::<T>())
    }

    /// Nearest `T` on the entity or its ancestors in the scene tree
    pub fn get_component_in_parent<T: Component>(&self, entity: Entity) -> Option<&T> {
        self.tree_ancestors(entity).find_map(|candidate| self.get_component::<T>(candidate))
    }

    /// Every `T` on the entity and its ancestors, nearest first
    pub fn get_components_in_parent<T: Component>(&self, entity: Entity) -> Vec<&T> {
        self.tree_ancestors(entity)
            .filter_map(|candidate| self.get_component::<T>(candidate))
            .collect()
    }

    /// First `T` in a pre-order walk of the entity's subtree, itself included
    pub fn get_component_in_child<T: Component>(&self, entity: Entity) -> Option<&T> {
        self.tree.descendants(entity).find_map(|candidate| self.get_component::<T>(candidate))
    }

    /// Every `T` in a pre-order walk of the entity's subtree, itself included
    pub fn get_components_in_child<T: Component>(&self, entity: Entity) -> Vec<&T> {
        self.tree
            .descendants(entity)
            .filter_map(|candidate| self.get_component::<T>(candidate))
            .collect()
    }

    fn tree_ancestors(&self, entity: Entity) -> impl Iterator<Item = Entity> + '_ {
        let start = self.tree.contains(entity).then_some(entity);
        std::iter::successors(start, |current| self.tree.find_parent(*current).and_then(NodeId::entity))
    }

    /// Enable or disable the entity's component of type `T`
    ///
    /// The matching `on_enable`/`on_disable` hook runs at the next drain
    /// boundary; toggling back before then delivers nothing.
    pub fn set_component_enabled<T: Component>(&mut self, entity: Entity, enabled: bool) -> Result<(), EcsError> {
        let type_name = short_type_name::<T>();
        let key = self
            .record(entity)?
            .components
            .key_of(TypeId::of::<T>())
            .ok_or(EcsError::NotAttached { entity, type_name })?;
        self.set_component_enabled_by_key(key, enabled)
    }

    /// Enable or disable the component behind `key`
    pub fn set_component_enabled_by_key(&mut self, key: ComponentKey, enabled: bool) -> Result<(), EcsError> {
        let slot = self.components.get_mut(key).ok_or(EcsError::ComponentNotFound(key))?;
        if slot.lifecycle.set_enabled(enabled) && slot.lifecycle.is_started() {
            self.queue.toggles.push(key);
        }
        Ok(())
    }

    /// Enable flag of the entity's component of type `T`
    pub fn is_component_enabled<T: Component>(&self, entity: Entity) -> Option<bool> {
        let key = self.entities.get(&entity)?.components.key_of(TypeId::of::<T>())?;
        self.components.get(key).map(|slot| slot.lifecycle.is_enabled())
    }

    /// Whether the component behind `key` would receive update and draw calls
    pub fn is_component_processable(&self, key: ComponentKey) -> bool {
        self.components.get(key).is_some_and(|slot| {
            slot.lifecycle.is_processable(true) && self.is_processable(slot.entity)
        })
    }

    // Transform

    /// The entity's transform
    pub fn transform(&self, entity: Entity) -> Option<&Transform> {
        self.entities.get(&entity).map(|record| &record.transform)
    }

    fn mutate_transform(&mut self, entity: Entity, mutate: impl FnOnce(&mut Transform)) -> Result<(), EcsError> {
        mutate(&mut self.record_mut(entity)?.transform);
        self.invalidate_descendants(entity);
        Ok(())
    }

    fn invalidate_descendants(&mut self, entity: Entity) {
        let mut stack: Vec<Entity> = self.transform(entity).map(|t| t.children().to_vec()).unwrap_or_default();
        while let Some(current) = stack.pop() {
            if let Some(record) = self.entities.get_mut(&current) {
                record.transform.invalidate();
                stack.extend_from_slice(record.transform.children());
            }
        }
    }

    /// Set the local position
    pub fn set_position(&mut self, entity: Entity, position: Vec2) -> Result<(), EcsError> {
        self.mutate_transform(entity, |transform| transform.set_position(position))
    }

    /// Set the pivot offset
    pub fn set_origin(&mut self, entity: Entity, origin: Vec2) -> Result<(), EcsError> {
        self.mutate_transform(entity, |transform| transform.set_origin(origin))
    }

    /// Set the rotation in radians
    pub fn set_rotation(&mut self, entity: Entity, rotation: f32) -> Result<(), EcsError> {
        self.mutate_transform(entity, |transform| transform.set_rotation(rotation))
    }

    /// Set the rotation in degrees
    pub fn set_rotation_degrees(&mut self, entity: Entity, degrees: f32) -> Result<(), EcsError> {
        self.set_rotation(entity, utils::deg_to_rad(degrees))
    }

    /// Set the non-uniform scale
    pub fn set_scale(&mut self, entity: Entity, scale: Vec2) -> Result<(), EcsError> {
        self.mutate_transform(entity, |transform| transform.set_scale(scale))
    }

    /// Change the sibling draw order key
    pub fn set_z_index(&mut self, entity: Entity, z_index: i32) -> Result<(), EcsError> {
        self.ensure_not_drawing("change a z-index")?;
        let transform = &mut self.record_mut(entity)?.transform;
        if transform.z_index() == z_index {
            return Ok(());
        }
        transform.set_z_index(z_index);
        self.request_structural(StructuralChange::ZIndex(entity));
        Ok(())
    }

    /// Reset position, origin, rotation, scale and z-index
    pub fn reset_transform(&mut self, entity: Entity) -> Result<(), EcsError> {
        self.set_z_index(entity, 0)?;
        self.mutate_transform(entity, |transform| {
            transform.set_position(Vec2::zeros());
            transform.set_origin(Vec2::zeros());
            transform.set_rotation(0.0);
            transform.set_scale(Vec2::new(1.0, 1.0));
        })
    }

    /// Logical parent
    pub fn parent(&self, entity: Entity) -> Option<Entity> {
        self.transform(entity)?.parent()
    }

    /// Children in scene tree (draw) order
    pub fn children(&self, entity: Entity) -> &[Entity] {
        self.tree.children(NodeId::Entity(entity))
    }

    /// Move the entity under `parent` (or to the root with `None`)
    ///
    /// The logical hierarchy changes at once; the scene tree follows
    /// immediately, or at the end of the update traversal when called from
    /// `on_update`.
    pub fn set_parent(&mut self, entity: Entity, parent: Option<Entity>) -> Result<(), EcsError> {
        self.ensure_not_drawing("change a parent")?;
        self.ensure_not_marked(entity)?;
        if let Some(parent) = parent {
            self.ensure_not_marked(parent)?;
            if self.is_logical_ancestor_or_self(entity, parent) {
                return Err(EcsError::HierarchyCycle { entity, parent });
            }
        }

        let old_parent = self.parent(entity);
        if old_parent == parent {
            return Ok(());
        }
        if let Some(old) = old_parent.and_then(|old| self.entities.get_mut(&old)) {
            old.transform.remove_child(entity);
        }
        if let Some(new) = parent.and_then(|new| self.entities.get_mut(&new)) {
            new.transform.add_child(entity);
        }
        self.record_mut(entity)?.transform.set_parent(parent);
        self.invalidate_descendants(entity);

        self.request_structural(StructuralChange::Reparent(entity));
        Ok(())
    }

    fn is_logical_ancestor_or_self(&self, ancestor: Entity, entity: Entity) -> bool {
        let mut current = Some(entity);
        while let Some(candidate) = current {
            if candidate == ancestor {
                return true;
            }
            current = self.parent(candidate);
        }
        false
    }

    /// Apply a tree change now, unless the update traversal is running
    fn request_structural(&mut self, change: StructuralChange) {
        if !self.tree.contains(change.entity()) {
            // Not inserted yet; insertion reads the current parent and z-index
            return;
        }
        if self.phase == FramePhase::Updating {
            self.queue.structural.push_back(change);
        } else if let Some(deferred) = self.apply_structural(change) {
            self.queue.structural.push_back(deferred);
        }
    }

    /// Local matrix, refreshing the cache if needed
    pub fn local_matrix(&mut self, entity: Entity) -> Option<Mat3> {
        Some(self.entities.get_mut(&entity)?.transform.refresh_local())
    }

    /// World matrix, refreshing stale caches along the parent chain
    pub fn world_matrix(&mut self, entity: Entity) -> Option<Mat3> {
        let transform = &mut self.entities.get_mut(&entity)?.transform;
        let local = transform.refresh_local();
        if let Some(world) = transform.cached_world() {
            return Some(world);
        }

        let world = match transform.parent() {
            Some(parent) => self.world_matrix(parent).map_or(local, |parent_world| parent_world * local),
            None => local,
        };
        self.entities.get_mut(&entity)?.transform.store_world(world);
        Some(world)
    }

    /// Translation part of the world matrix
    pub fn world_position(&mut self, entity: Entity) -> Option<Vec2> {
        self.world_matrix(entity).map(|world| world.translation_2d())
    }

    /// World-space scale
    pub fn world_scale(&mut self, entity: Entity) -> Option<Vec2> {
        self.world_matrix(entity).map(|world| world.scale_2d())
    }

    /// World-space rotation in radians
    pub fn world_rotation(&mut self, entity: Entity) -> Option<f32> {
        self.world_matrix(entity).map(|world| world.rotation_2d())
    }
}
