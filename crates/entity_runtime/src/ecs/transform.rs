//! Hierarchical 2D transform
//!
//! Every entity owns exactly one [`Transform`]. Local and world matrices are
//! cached behind two dirty bits: setters and hierarchy changes invalidate
//! eagerly, reads through the [`World`](super::World) recompute lazily.

use super::component::Component;
use super::Entity;
use crate::foundation::math::{utils, Mat3, Mat3Ext, Vec2};
use bitflags::bitflags;

bitflags! {
    /// Stale cache markers
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DirtyFlags: u8 {
        /// Local matrix must be recomputed from the components
        const LOCAL = 1 << 0;
        /// World matrix must be recomputed from local and parent world
        const WORLD = 1 << 1;
    }
}

/// Position, origin, rotation, scale and z-index of an entity
#[derive(Debug, Clone)]
pub struct Transform {
    position: Vec2,
    origin: Vec2,
    rotation: f32,
    scale: Vec2,
    z_index: i32,
    local: Mat3,
    world: Mat3,
    dirty: DirtyFlags,
    parent: Option<Entity>,
    children: Vec<Entity>,
}

impl Component for Transform {}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

impl Transform {
    /// Identity transform with no parent
    pub fn new() -> Self {
        Self {
            position: Vec2::zeros(),
            origin: Vec2::zeros(),
            rotation: 0.0,
            scale: Vec2::new(1.0, 1.0),
            z_index: 0,
            local: Mat3::identity(),
            world: Mat3::identity(),
            dirty: DirtyFlags::all(),
            parent: None,
            children: Vec::new(),
        }
    }

    /// Local position
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Pivot offset, in unscaled local units
    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Rotation in radians
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Rotation in degrees
    pub fn rotation_degrees(&self) -> f32 {
        utils::rad_to_deg(self.rotation)
    }

    /// Non-uniform scale
    pub fn scale(&self) -> Vec2 {
        self.scale
    }

    /// Sibling draw order key
    pub fn z_index(&self) -> i32 {
        self.z_index
    }

    /// Logical parent
    pub fn parent(&self) -> Option<Entity> {
        self.parent
    }

    /// Logical children, in parenting order
    pub fn children(&self) -> &[Entity] {
        &self.children
    }

    /// Current dirty bits
    pub fn dirty_flags(&self) -> DirtyFlags {
        self.dirty
    }

    /// Local matrix computed from scratch, ignoring the cache
    pub fn compute_local_matrix(&self) -> Mat3 {
        Mat3::affine_2d(self.position, self.origin, self.rotation, self.scale)
    }

    pub(crate) fn set_position(&mut self, position: Vec2) {
        self.position = position;
        self.dirty = DirtyFlags::all();
    }

    pub(crate) fn set_origin(&mut self, origin: Vec2) {
        self.origin = origin;
        self.dirty = DirtyFlags::all();
    }

    pub(crate) fn set_rotation(&mut self, rotation: f32) {
        self.rotation = rotation;
        self.dirty = DirtyFlags::all();
    }

    pub(crate) fn set_scale(&mut self, scale: Vec2) {
        self.scale = scale;
        self.dirty = DirtyFlags::all();
    }

    pub(crate) fn set_z_index(&mut self, z_index: i32) {
        self.z_index = z_index;
    }

    pub(crate) fn set_parent(&mut self, parent: Option<Entity>) {
        self.parent = parent;
        self.dirty = DirtyFlags::all();
    }

    pub(crate) fn add_child(&mut self, child: Entity) {
        if !self.children.contains(&child) {
            self.children.push(child);
        }
    }

    pub(crate) fn remove_child(&mut self, child: Entity) {
        self.children.retain(|existing| *existing != child);
    }

    pub(crate) fn invalidate(&mut self) {
        self.dirty = DirtyFlags::all();
    }

    /// Refresh the local cache if stale; a refresh makes the world cache stale
    pub(crate) fn refresh_local(&mut self) -> Mat3 {
        if self.dirty.contains(DirtyFlags::LOCAL) {
            self.local = self.compute_local_matrix();
            self.dirty.remove(DirtyFlags::LOCAL);
            self.dirty.insert(DirtyFlags::WORLD);
        }
        self.local
    }

    /// Cached world matrix, `None` while stale
    pub(crate) fn cached_world(&self) -> Option<Mat3> {
        self.dirty.is_empty().then_some(self.world)
    }

    pub(crate) fn store_world(&mut self, world: Mat3) {
        self.world = world;
        self.dirty.remove(DirtyFlags::WORLD);
    }
}
