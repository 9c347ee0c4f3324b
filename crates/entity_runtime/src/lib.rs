//! # Entity Runtime
//!
//! Bookkeeping substrate for 2D scenes: entity identity, a z-ordered scene
//! tree, per-entity components with lifecycle hooks, deferred structural
//! mutation and cached hierarchical transforms.
//!
//! ## Quick Start
//!
//! ```rust
//! use entity_runtime::prelude::*;
//!
//! struct Spin {
//!     speed: f32,
//! }
//!
//! impl Component for Spin {
//!     fn on_update(&mut self, ctx: &mut Context<'_>, delta_time: f32) -> Result<(), EcsError> {
//!         let entity = ctx.entity();
//!         let rotation = ctx.transform(entity).map_or(0.0, Transform::rotation);
//!         ctx.set_rotation(entity, rotation + self.speed * delta_time)
//!     }
//! }
//!
//! fn main() -> Result<(), EcsError> {
//!     let mut world = World::new(TemplateRegistry::new());
//!     let wheel = world.create_entity()?;
//!     world.add_component(wheel, Spin { speed: 2.0 })?;
//!
//!     world.update(0.5)?;
//!     world.draw(0.5)?;
//!     assert!((world.transform(wheel).unwrap().rotation() - 1.0).abs() < 1e-6);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod ecs;
pub mod foundation;
pub mod scene;

/// Common imports for runtime users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, RuntimeConfig},
        ecs::{
            Component, ComponentHandle, Context, EcsError, Entity, EntityTemplate, ErrorKind, FramePhase,
            FrameStats, LifecycleState, TemplateArgs, TemplateRegistry, Transform, World,
        },
        foundation::{
            math::{Mat3, Vec2},
            time::Timer,
        },
        scene::{NodeId, SceneTree},
    };
}
