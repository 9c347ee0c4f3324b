//! Entity-Component runtime
//!
//! Entities own a component table and exactly one [`Transform`]. The
//! [`World`] keeps them in a z-ordered scene tree and drives their lifecycle
//! through a deferred, phase-checked update/draw protocol.

pub mod component;
pub mod entity;
pub mod error;
pub mod lifecycle;
pub mod scheduler;
pub mod storage;
pub mod template;
pub mod transform;
pub mod world;

#[cfg(test)]
mod tests;

pub use component::{Component, ComponentHandle, Context};
pub use entity::Entity;
pub use error::{EcsError, ErrorKind};
pub use lifecycle::{LifecycleFlags, LifecycleState};
pub use scheduler::{FramePhase, FrameStats};
pub use storage::ComponentKey;
pub use template::{EntityTemplate, TemplateArgs, TemplateRegistry};
pub use transform::{DirtyFlags, Transform};
pub use world::World;
