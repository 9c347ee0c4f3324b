//! Frame scheduling
//!
//! Every `update` runs the same deterministic protocol:
//!
//! 1. insert queued entities into the scene tree (parents before children,
//!    orphans of destroyed parents are destroyed instead)
//! 2. start queued components and deliver pending enable/disable notifications
//! 3. pre-order update traversal of processable entities and components
//! 4. apply re-parent and z-index changes requested during the traversal
//! 5. drain removals until both removal queues are empty, then recycle ids
//!
//! `draw` is a post-order traversal during which structural mutation is
//! refused with [`EcsError::DrawPhaseViolation`].

use super::component::{Context, Hook};
use super::error::EcsError;
use super::storage::ComponentKey;
use super::world::World;
use super::Entity;
use crate::scene::{NodeId, SceneError};
use log::{debug, trace, warn};
use std::collections::VecDeque;

/// Which part of a frame is running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramePhase {
    /// Between frames
    Idle,
    /// Creation, start, structural or removal drain
    Draining,
    /// Update traversal; structural tree edits are queued
    Updating,
    /// Draw traversal; structural mutation is refused
    Drawing,
}

/// Tree edit that could not be applied in place
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StructuralChange {
    Reparent(Entity),
    ZIndex(Entity),
}

impl StructuralChange {
    pub fn entity(self) -> Entity {
        match self {
            Self::Reparent(entity) | Self::ZIndex(entity) => entity,
        }
    }
}

/// Pending work, drained at fixed points of `update`
#[derive(Debug, Default)]
pub(crate) struct MutationQueue {
    pub entities_to_add: VecDeque<Entity>,
    pub components_to_start: VecDeque<ComponentKey>,
    pub structural: VecDeque<StructuralChange>,
    pub toggles: Vec<ComponentKey>,
    pub components_to_remove: VecDeque<ComponentKey>,
    pub entities_to_remove: VecDeque<Entity>,
    pub pending_releases: Vec<u32>,
}

/// Counters for the last frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Entities inserted into the scene tree
    pub entities_inserted: usize,
    /// Queued entities destroyed because their parent was gone
    pub entities_orphaned: usize,
    /// Components whose start hook ran
    pub components_started: usize,
    /// Update hook invocations
    pub update_calls: usize,
    /// Tree edits applied after the update traversal
    pub structural_changes: usize,
    /// Components evicted
    pub components_destroyed: usize,
    /// Entities removed
    pub entities_removed: usize,
    /// Before-draw, draw and after-draw hook invocations
    pub draw_calls: usize,
}

fn broken(err: &SceneError) -> ! {
    panic!("Scene tree invariant broken: {err}")
}

fn consistent<T>(result: Result<T, SceneError>) -> T {
    result.unwrap_or_else(|err| broken(&err))
}

impl World {
    /// Run one update: drains, update traversal, removals
    pub fn update(&mut self, delta_time: f32) -> Result<(), EcsError> {
        self.enter_frame()?;
        self.stats = FrameStats::default();
        let result = self.run_update(delta_time);
        self.phase = FramePhase::Idle;
        result
    }

    /// Run one draw: post-order traversal of processable entities
    pub fn draw(&mut self, delta_time: f32) -> Result<(), EcsError> {
        self.enter_frame()?;
        self.phase = FramePhase::Drawing;
        self.stats.draw_calls = 0;

        let roots = self.tree.children(NodeId::Root).to_vec();
        let result = roots.into_iter().try_for_each(|root| self.draw_node(root, delta_time));
        self.phase = FramePhase::Idle;
        result
    }

    /// Destroy every entity and drain removals so every component sees `on_destroy`
    pub fn shutdown(&mut self) -> Result<(), EcsError> {
        self.enter_frame()?;
        let roots: Vec<Entity> = self
            .entities
            .iter()
            .filter(|(_, record)| record.transform.parent().is_none() && !record.lifecycle.is_marked_for_removal())
            .map(|(entity, _)| *entity)
            .collect();
        for root in roots {
            self.cascade_destroy(root);
        }

        let result = self.drain_removals();
        self.phase = FramePhase::Idle;
        debug!("World shut down, {} entities left", self.entities.len());
        result
    }

    fn enter_frame(&mut self) -> Result<(), EcsError> {
        if self.phase != FramePhase::Idle {
            return Err(EcsError::FrameReentered { phase: self.phase });
        }
        self.phase = FramePhase::Draining;
        Ok(())
    }

    fn run_update(&mut self, delta_time: f32) -> Result<(), EcsError> {
        self.drain_entity_additions();
        self.drain_component_starts()?;
        self.deliver_toggles()?;

        self.phase = FramePhase::Updating;
        let roots = self.tree.children(NodeId::Root).to_vec();
        for root in roots {
            self.update_node(root, delta_time)?;
        }
        self.phase = FramePhase::Draining;

        self.drain_structural();
        self.deliver_toggles()?;
        self.drain_removals()
    }

    /// Run one hook on a checked-out component instance
    pub(super) fn invoke(&mut self, key: ComponentKey, hook: Hook, delta_time: f32) -> Result<(), EcsError> {
        let Some(slot) = self.components.get_mut(key) else { return Ok(()) };
        let entity = slot.entity;
        let Some(mut instance) = slot.instance.take() else { return Ok(()) };
        if self.config.trace_lifecycle {
            trace!("{hook:?} {} on entity {entity}", slot.type_name);
        }

        let result = hook.dispatch(&mut *instance, &mut Context::new(self, entity, key), delta_time);

        if let Some(slot) = self.components.get_mut(key) {
            slot.instance = Some(instance);
        }
        result
    }

    fn drain_entity_additions(&mut self) {
        let mut batch = std::mem::take(&mut self.queue.entities_to_add);
        let mut stalled = 0;

        while let Some(entity) = batch.pop_front() {
            let Some(record) = self.entities.get(&entity) else { continue };
            if record.lifecycle.is_marked_for_removal() || record.lifecycle.is_started() {
                continue;
            }
            let parent = record.transform.parent();
            let z_index = record.transform.z_index();

            if let Some(parent) = parent.filter(|parent| !self.tree.contains(*parent)) {
                if batch.contains(&parent) && stalled <= batch.len() {
                    // Parent is inserted later in this batch
                    stalled += 1;
                    batch.push_back(entity);
                    continue;
                }
                // Destroying a parent marks its pending children too, so a
                // queued entity only gets here if its parent record vanished
                warn!("Parent {parent} of entity {entity} is gone, destroying the orphan");
                self.stats.entities_orphaned += 1;
                self.cascade_destroy(entity);
                continue;
            }

            stalled = 0;
            consistent(self.tree.add(entity, parent, z_index));
            if let Some(record) = self.entities.get_mut(&entity) {
                record.lifecycle.start();
            }
            self.stats.entities_inserted += 1;
            debug!("Inserted entity {entity} into the scene tree");
        }
    }

    fn drain_component_starts(&mut self) -> Result<(), EcsError> {
        let mut batch = std::mem::take(&mut self.queue.components_to_start);
        let mut waiting = VecDeque::new();
        let mut result = Ok(());

        while let Some(key) = batch.pop_front() {
            let Some(slot) = self.components.get(key) else { continue };
            if slot.lifecycle.is_marked_for_removal() {
                continue;
            }
            if !self.is_started(slot.entity) {
                waiting.push_back(key);
                continue;
            }
            if let Err(err) = self.start_component(key) {
                result = Err(err);
                break;
            }
        }

        // Components added while this drain ran start next update
        waiting.extend(batch);
        waiting.append(&mut self.queue.components_to_start);
        self.queue.components_to_start = waiting;
        result
    }

    fn start_component(&mut self, key: ComponentKey) -> Result<(), EcsError> {
        if let Some(slot) = self.components.get_mut(key) {
            slot.lifecycle.start();
        }
        self.stats.components_started += 1;
        if let Err(err) = self.invoke(key, Hook::Start, 0.0) {
            // Started regardless; the enable/disable notification goes out at the next drain
            self.queue.toggles.push(key);
            return Err(err);
        }
        self.notify_enabled_state(key)
    }

    /// Deliver `on_enable`/`on_disable` if the flag differs from the last notification
    fn notify_enabled_state(&mut self, key: ComponentKey) -> Result<(), EcsError> {
        let Some(slot) = self.components.get_mut(key) else { return Ok(()) };
        if !slot.lifecycle.is_started() || slot.lifecycle.is_marked_for_removal() {
            return Ok(());
        }
        let enabled = slot.lifecycle.is_enabled();
        if slot.notified_enabled == Some(enabled) {
            return Ok(());
        }
        slot.notified_enabled = Some(enabled);
        self.invoke(key, if enabled { Hook::Enable } else { Hook::Disable }, 0.0)
    }

    fn deliver_toggles(&mut self) -> Result<(), EcsError> {
        while !self.queue.toggles.is_empty() {
            let toggles = std::mem::take(&mut self.queue.toggles);
            for (index, key) in toggles.iter().enumerate() {
                if let Err(err) = self.notify_enabled_state(*key) {
                    self.queue.toggles.extend_from_slice(&toggles[index + 1..]);
                    return Err(err);
                }
            }
        }
        Ok(())
    }

    fn update_node(&mut self, entity: Entity, delta_time: f32) -> Result<(), EcsError> {
        if !self.is_processable(entity) {
            return Ok(());
        }

        // Indexed so components attached during the pass are seen without
        // invalidating the iteration; they are not started, so they are skipped
        let mut index = 0;
        while let Some(key) = self
            .entities
            .get(&entity)
            .and_then(|record| record.components.keys().get(index).copied())
        {
            index += 1;
            if self.is_component_processable(key) {
                self.stats.update_calls += 1;
                self.invoke(key, Hook::Update, delta_time)?;
            }
        }

        let children = self.tree.children(NodeId::Entity(entity)).to_vec();
        for child in children {
            self.update_node(child, delta_time)?;
        }
        Ok(())
    }

    fn draw_node(&mut self, entity: Entity, delta_time: f32) -> Result<(), EcsError> {
        if !self.is_processable(entity) {
            return Ok(());
        }
        let children = self.tree.children(NodeId::Entity(entity)).to_vec();
        for child in children {
            self.draw_node(child, delta_time)?;
        }

        // A child may have disabled this entity or one of its ancestors
        if !self.is_processable(entity) {
            return Ok(());
        }
        let keys = self
            .entities
            .get(&entity)
            .map(|record| record.components.keys().to_vec())
            .unwrap_or_default();
        for hook in [Hook::BeforeDraw, Hook::Draw, Hook::AfterDraw] {
            for key in &keys {
                if self.is_component_processable(*key) {
                    self.stats.draw_calls += 1;
                    self.invoke(*key, hook, delta_time)?;
                }
            }
        }
        Ok(())
    }

    fn drain_structural(&mut self) {
        let mut pending = std::mem::take(&mut self.queue.structural);
        let mut blocked = Vec::new();
        while let Some(change) = pending.pop_front() {
            match self.apply_structural(change) {
                Some(change) => blocked.push(change),
                None => self.stats.structural_changes += 1,
            }
        }

        // Earlier changes may have unblocked later ones
        for change in blocked {
            match self.apply_structural(change) {
                Some(change) => {
                    warn!("Deferring re-parent of entity {} to the next frame", change.entity());
                    self.queue.structural.push_back(change);
                }
                None => self.stats.structural_changes += 1,
            }
        }
    }

    /// Mirror the logical parent or z-index of an entity into the scene tree
    ///
    /// Returns the change back when it cannot be applied yet.
    pub(super) fn apply_structural(&mut self, change: StructuralChange) -> Option<StructuralChange> {
        let entity = change.entity();
        if !self.tree.contains(entity) {
            return None;
        }

        match change {
            StructuralChange::ZIndex(_) => {
                let z_index = self.transform(entity)?.z_index();
                consistent(self.tree.update_siblings_z_index(entity, z_index));
                None
            }
            StructuralChange::Reparent(_) => {
                let parent = self.parent(entity);
                if parent.is_some_and(|parent| !self.tree.contains(parent)) {
                    return Some(change);
                }
                match self.tree.change_parent(entity, parent) {
                    Ok(()) => None,
                    Err(SceneError::WouldCreateCycle { .. }) => Some(change),
                    Err(err) => broken(&err),
                }
            }
        }
    }

    fn drain_removals(&mut self) -> Result<(), EcsError> {
        loop {
            if let Some(key) = self.queue.components_to_remove.pop_front() {
                self.finalize_component(key)?;
            } else if let Some(entity) = self.queue.entities_to_remove.pop_front() {
                self.finalize_entity(entity);
            } else {
                break;
            }
        }

        for id in self.queue.pending_releases.drain(..) {
            self.ids.release(id);
        }
        Ok(())
    }

    fn finalize_component(&mut self, key: ComponentKey) -> Result<(), EcsError> {
        let Some(slot) = self.components.get(key) else { return Ok(()) };
        let disable = if slot.notified_enabled == Some(true) {
            self.invoke(key, Hook::Disable, 0.0)
        } else {
            Ok(())
        };
        let destroy = self.invoke(key, Hook::Destroy, 0.0);

        if let Some(mut slot) = self.components.evict(key) {
            slot.lifecycle.destroy();
            if let Some(record) = self.entities.get_mut(&slot.entity) {
                record.components.remove(slot.type_id, key);
            }
            self.stats.components_destroyed += 1;
            debug!("Destroyed component {} of entity {}", slot.type_name, slot.entity);
        }
        disable.and(destroy)
    }

    fn finalize_entity(&mut self, entity: Entity) {
        let Some(record) = self.entities.get(&entity) else { return };
        debug_assert!(record.components.is_empty(), "entity {entity} removed with live components");
        let parent = record.transform.parent();

        if self.tree.contains(entity) {
            // Only children whose re-parent is still deferred can be left here
            let stragglers = self.tree.children(NodeId::Entity(entity)).to_vec();
            for child in stragglers {
                warn!("Moving entity {child} to the root until its new parent is inserted");
                consistent(self.tree.change_parent(child, None));
            }
            consistent(self.tree.remove(entity));
        }
        if let Some(parent) = parent.and_then(|parent| self.entities.get_mut(&parent)) {
            parent.transform.remove_child(entity);
        }

        self.entities.remove(&entity);
        self.queue.entities_to_add.retain(|queued| *queued != entity);
        self.queue.structural.retain(|change| change.entity() != entity);
        self.queue.pending_releases.push(entity.id());
        self.stats.entities_removed += 1;
        debug!("Removed entity {entity}");
    }
}
