//! Entity implementation

use super::lifecycle::Lifecycle;
use super::storage::ComponentTable;
use super::transform::Transform;
use std::any::Any;
use std::fmt;

/// Entity identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Entity {
    id: u32,
}

impl Entity {
    /// Create a new entity with the given ID
    pub(crate) fn new(id: u32) -> Self {
        Self { id }
    }

    /// Get the entity ID
    pub fn id(&self) -> u32 {
        self.id
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.id)
    }
}

/// Default display name given to new entities
pub const DEFAULT_ENTITY_NAME: &str = "Entity";

/// Everything the world owns for one entity
pub(crate) struct EntityRecord {
    pub name: String,
    pub tag: Option<Box<dyn Any>>,
    pub lifecycle: Lifecycle,
    pub components: ComponentTable,
    pub transform: Transform,
}

impl EntityRecord {
    pub fn new() -> Self {
        Self {
            name: DEFAULT_ENTITY_NAME.to_string(),
            tag: None,
            lifecycle: Lifecycle::new(),
            components: ComponentTable::new(),
            transform: Transform::new(),
        }
    }
}
