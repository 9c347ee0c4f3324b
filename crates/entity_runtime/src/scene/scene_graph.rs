//! Scene tree
//!
//! Hierarchical, z-ordered structure of live entities. Nodes live in an arena
//! keyed by entity; parent links are plain back-references used for upward
//! traversal only. Each sibling list is kept sorted ascending by z-index, with
//! insertion order breaking ties.

use crate::ecs::Entity;
use std::collections::HashMap;
use thiserror::Error;

/// Identifies a position in the tree: the root, or an entity's node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeId {
    /// The tree root, which wraps no entity
    Root,
    /// The node of a live entity
    Entity(Entity),
}

impl From<Option<Entity>> for NodeId {
    fn from(entity: Option<Entity>) -> Self {
        entity.map_or(Self::Root, Self::Entity)
    }
}

impl NodeId {
    /// The wrapped entity, `None` for the root
    pub fn entity(self) -> Option<Entity> {
        match self {
            Self::Root => None,
            Self::Entity(entity) => Some(entity),
        }
    }
}

/// Structural breaches of the tree invariants
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// The entity already has a node
    #[error("Entity {0} is already in the scene tree")]
    AlreadyInTree(Entity),

    /// The requested parent has no node
    #[error("Cannot attach entity {entity}: parent {parent} is not in the scene tree")]
    ParentNotFound {
        /// Entity being attached
        entity: Entity,
        /// Missing parent
        parent: Entity,
    },

    /// The entity has no node
    #[error("Entity {0} is not in the scene tree")]
    NotInTree(Entity),

    /// Nodes must be emptied before they are removed
    #[error("Cannot remove entity {0}: its node still has children")]
    HasChildren(Entity),

    /// The node was not found in its parent's child list
    #[error("Cannot detach entity {0}: node is not listed as a child of its parent")]
    NotAChild(Entity),

    /// Attaching would make a node its own ancestor
    #[error("Cannot attach entity {entity} under {parent}: it would become its own ancestor")]
    WouldCreateCycle {
        /// Entity being attached
        entity: Entity,
        /// Requested parent inside the entity's subtree
        parent: Entity,
    },
}

/// A node of the scene tree
#[derive(Debug, Clone)]
pub struct SceneNode {
    parent: NodeId,
    children: Vec<Entity>,
    z_index: i32,
    order: u64,
}

impl SceneNode {
    /// Parent position of this node
    pub fn parent(&self) -> NodeId {
        self.parent
    }

    /// Children sorted by ascending z-index
    pub fn children(&self) -> &[Entity] {
        &self.children
    }

    /// Z-index used to order this node among its siblings
    pub fn z_index(&self) -> i32 {
        self.z_index
    }
}

/// The scene tree
#[derive(Debug, Default)]
pub struct SceneTree {
    root_children: Vec<Entity>,
    nodes: HashMap<Entity, SceneNode>,
    next_order: u64,
}

impl SceneTree {
    /// Create an empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty tree with room for `capacity` nodes
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            root_children: Vec::new(),
            nodes: HashMap::with_capacity(capacity),
            next_order: 0,
        }
    }

    /// Number of live nodes, not counting the root
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree holds no entity
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether the entity has a node
    pub fn contains(&self, entity: Entity) -> bool {
        self.nodes.contains_key(&entity)
    }

    /// The entity's node
    pub fn find(&self, entity: Entity) -> Option<&SceneNode> {
        self.nodes.get(&entity)
    }

    /// Parent position of the entity; `NodeId::Root` for root-level entities
    pub fn find_parent(&self, entity: Entity) -> Option<NodeId> {
        self.nodes.get(&entity).map(SceneNode::parent)
    }

    /// Children of a position, in draw order
    pub fn children(&self, id: NodeId) -> &[Entity] {
        match id {
            NodeId::Root => &self.root_children,
            NodeId::Entity(entity) => self.nodes.get(&entity).map_or(&[], |node| node.children.as_slice()),
        }
    }

    /// Insert an entity under `parent`, keeping the sibling list sorted
    pub fn add(&mut self, entity: Entity, parent: Option<Entity>, z_index: i32) -> Result<(), SceneError> {
        if self.nodes.contains_key(&entity) {
            return Err(SceneError::AlreadyInTree(entity));
        }
        if let Some(parent) = parent {
            if !self.nodes.contains_key(&parent) {
                return Err(SceneError::ParentNotFound { entity, parent });
            }
        }

        let order = self.take_order();
        self.nodes.insert(entity, SceneNode {
            parent: parent.into(),
            children: Vec::new(),
            z_index,
            order,
        });
        self.insert_sorted(parent.into(), entity);
        Ok(())
    }

    /// Remove a childless entity from the tree
    pub fn remove(&mut self, entity: Entity) -> Result<(), SceneError> {
        let node = self.nodes.get(&entity).ok_or(SceneError::NotInTree(entity))?;
        if !node.children.is_empty() {
            return Err(SceneError::HasChildren(entity));
        }

        let parent = node.parent;
        self.detach(parent, entity)?;
        self.nodes.remove(&entity);
        Ok(())
    }

    /// Move an entity (with its subtree) under a new parent
    pub fn change_parent(&mut self, entity: Entity, new_parent: Option<Entity>) -> Result<(), SceneError> {
        let old_parent = self.find_parent(entity).ok_or(SceneError::NotInTree(entity))?;
        let new_parent_id = NodeId::from(new_parent);
        if old_parent == new_parent_id {
            return Ok(());
        }

        if let Some(parent) = new_parent {
            if !self.nodes.contains_key(&parent) {
                return Err(SceneError::ParentNotFound { entity, parent });
            }
            if self.is_ancestor_or_self(entity, parent) {
                return Err(SceneError::WouldCreateCycle { entity, parent });
            }
        }

        self.detach(old_parent, entity)?;
        let order = self.take_order();
        if let Some(node) = self.nodes.get_mut(&entity) {
            node.parent = new_parent_id;
            node.order = order;
        }
        self.insert_sorted(new_parent_id, entity);
        Ok(())
    }

    /// Store a new z-index for the entity and re-sort only its sibling list
    pub fn update_siblings_z_index(&mut self, entity: Entity, z_index: i32) -> Result<(), SceneError> {
        let node = self.nodes.get_mut(&entity).ok_or(SceneError::NotInTree(entity))?;
        if node.z_index == z_index {
            return Ok(());
        }
        node.z_index = z_index;
        let parent = node.parent;

        let mut siblings = std::mem::take(self.children_mut(parent));
        siblings.sort_by_key(|sibling| self.sort_key(*sibling));
        *self.children_mut(parent) = siblings;
        Ok(())
    }

    /// Pre-order traversal of every entity in the tree
    pub fn iter(&self) -> PreOrder<'_> {
        PreOrder {
            tree: self,
            stack: self.root_children.iter().rev().copied().collect(),
        }
    }

    /// Pre-order traversal of an entity's subtree, starting with the entity itself
    pub fn descendants(&self, entity: Entity) -> PreOrder<'_> {
        let stack = if self.contains(entity) { vec![entity] } else { Vec::new() };
        PreOrder { tree: self, stack }
    }

    /// Whether `ancestor` is `entity` or lies on the path from `entity` to the root
    pub fn is_ancestor_or_self(&self, ancestor: Entity, entity: Entity) -> bool {
        let mut current = Some(entity);
        while let Some(candidate) = current {
            if candidate == ancestor {
                return true;
            }
            current = self.find_parent(candidate).and_then(NodeId::entity);
        }
        false
    }

    fn take_order(&mut self) -> u64 {
        let order = self.next_order;
        self.next_order += 1;
        order
    }

    fn sort_key(&self, entity: Entity) -> (i32, u64) {
        self.nodes.get(&entity).map_or((i32::MAX, u64::MAX), |node| (node.z_index, node.order))
    }

    fn children_mut(&mut self, id: NodeId) -> &mut Vec<Entity> {
        match id {
            NodeId::Entity(entity) => match self.nodes.get_mut(&entity) {
                Some(node) => &mut node.children,
                None => &mut self.root_children,
            },
            NodeId::Root => &mut self.root_children,
        }
    }

    fn insert_sorted(&mut self, parent: NodeId, entity: Entity) {
        let key = self.sort_key(entity);
        let index = self.children(parent).partition_point(|sibling| self.sort_key(*sibling) <= key);
        self.children_mut(parent).insert(index, entity);
    }

    fn detach(&mut self, parent: NodeId, entity: Entity) -> Result<(), SceneError> {
        let siblings = self.children_mut(parent);
        let index = siblings
            .iter()
            .position(|sibling| *sibling == entity)
            .ok_or(SceneError::NotAChild(entity))?;
        siblings.remove(index);
        Ok(())
    }
}

/// Pre-order iterator over scene tree entities
pub struct PreOrder<'a> {
    tree: &'a SceneTree,
    stack: Vec<Entity>,
}

impl Iterator for PreOrder<'_> {
    type Item = Entity;

    fn next(&mut self) -> Option<Entity> {
        let entity = self.stack.pop()?;
        self.stack.extend(self.tree.children(NodeId::Entity(entity)).iter().rev());
        Some(entity)
    }
}
