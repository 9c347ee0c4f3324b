//! Runtime error types

use super::Entity;
use super::scheduler::FramePhase;
use super::storage::ComponentKey;
use crate::scene::SceneError;
use thiserror::Error;

/// Coarse classification of runtime errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller attempted an operation the current phase or state forbids
    WorkflowViolation,
    /// A name or type could not be resolved
    LookupFailure,
    /// An internal invariant was broken; the world can no longer be trusted
    ConsistencyViolation,
}

/// Errors reported by the entity runtime
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EcsError {
    /// Structural mutation attempted while a draw pass is running
    #[error("Cannot {operation} while drawing")]
    DrawPhaseViolation {
        /// Name of the refused operation
        operation: &'static str,
    },

    /// `update`, `draw` or `shutdown` was called from inside a frame
    #[error("Frame already in progress ({phase:?})")]
    FrameReentered {
        /// Phase that was running
        phase: FramePhase,
    },

    /// The entity already holds a component of this type
    #[error("Entity {entity} already has a component of type {type_name}")]
    DuplicateComponentType {
        /// Owning entity
        entity: Entity,
        /// Component type
        type_name: &'static str,
    },

    /// The entity holds no component of this type
    #[error("Entity {entity} has no component of type {type_name}")]
    NotAttached {
        /// Owning entity
        entity: Entity,
        /// Component type
        type_name: &'static str,
    },

    /// Removal was already requested for this entity or component
    #[error("{} is already marked for removal", removal_target(.entity, .component))]
    AlreadyMarkedForRemoval {
        /// Affected entity
        entity: Entity,
        /// Component type when a component removal was repeated
        component: Option<&'static str>,
    },

    /// The component is mandatory and cannot be removed
    #[error("Component {type_name} is obligatory and cannot be removed")]
    ObligatoryComponent {
        /// Component type
        type_name: &'static str,
    },

    /// Requested parent lies inside the entity's own subtree
    #[error("Cannot parent entity {entity} to {parent}: it would become its own ancestor")]
    HierarchyCycle {
        /// Entity being re-parented
        entity: Entity,
        /// Requested parent
        parent: Entity,
    },

    /// The entity does not exist (never created or already removed)
    #[error("Entity {0} does not exist")]
    EntityNotFound(Entity),

    /// The component key no longer resolves (already evicted)
    #[error("Component {0:?} does not exist")]
    ComponentNotFound(ComponentKey),

    /// No template is registered under this name or type
    #[error("Unknown entity template: {0}")]
    UnknownTemplate(String),

    /// Scene tree invariant breach
    #[error("Scene tree error: {0}")]
    Scene(#[from] SceneError),
}

fn removal_target(entity: &Entity, component: &Option<&'static str>) -> String {
    match component {
        Some(type_name) => format!("Component {type_name} of entity {entity}"),
        None => format!("Entity {entity}"),
    }
}

impl EcsError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::DrawPhaseViolation { .. }
            | Self::FrameReentered { .. }
            | Self::DuplicateComponentType { .. }
            | Self::NotAttached { .. }
            | Self::AlreadyMarkedForRemoval { .. }
            | Self::ObligatoryComponent { .. }
            | Self::HierarchyCycle { .. } => ErrorKind::WorkflowViolation,
            Self::EntityNotFound(_) | Self::ComponentNotFound(_) | Self::UnknownTemplate(_) => ErrorKind::LookupFailure,
            Self::Scene(_) => ErrorKind::ConsistencyViolation,
        }
    }

    /// Whether the caller may recover from this error
    pub fn is_recoverable(&self) -> bool {
        self.kind() != ErrorKind::ConsistencyViolation
    }
}
