//! Scene management
//!
//! The scene tree holds the parent/child hierarchy of live entities with
//! z-ordered sibling lists.

pub mod scene_graph;

pub use scene_graph::{NodeId, SceneError, SceneNode, SceneTree};
