//! Entity templates
//!
//! Hosts register templates explicitly at startup; the world only looks them
//! up, by template type or by name.

use super::error::EcsError;
use super::world::World;
use super::Entity;
use log::warn;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::rc::Rc;

/// Recipe that populates a freshly created entity
pub trait EntityTemplate: 'static {
    /// Lookup name
    fn name(&self) -> &str;

    /// Attach components and configure the transform of `entity`
    fn build_entity(&self, world: &mut World, entity: Entity, args: &TemplateArgs) -> Result<(), EcsError>;
}

/// Positional, dynamically typed template arguments
#[derive(Default)]
pub struct TemplateArgs {
    values: Vec<Box<dyn Any>>,
}

impl TemplateArgs {
    /// No arguments
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an argument
    #[must_use]
    pub fn with<T: Any>(mut self, value: T) -> Self {
        self.values.push(Box::new(value));
        self
    }

    /// Argument at `index` if it has type `T`
    pub fn get<T: Any>(&self, index: usize) -> Option<&T> {
        self.values.get(index)?.downcast_ref::<T>()
    }

    /// Number of arguments
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether there are no arguments
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Registered templates, indexed by type and by name
#[derive(Default, Clone)]
pub struct TemplateRegistry {
    by_type: HashMap<TypeId, Rc<dyn EntityTemplate>>,
    by_name: HashMap<String, Rc<dyn EntityTemplate>>,
}

impl TemplateRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template, replacing any previous one with the same type or name
    pub fn register<T: EntityTemplate>(&mut self, template: T) -> &mut Self {
        let name = template.name().to_string();
        let template: Rc<dyn EntityTemplate> = Rc::new(template);
        if self.by_name.insert(name.clone(), Rc::clone(&template)).is_some() {
            warn!("Template '{name}' registered twice, keeping the latest");
        }
        self.by_type.insert(TypeId::of::<T>(), template);
        self
    }

    /// Builder-style [`register`](Self::register)
    #[must_use]
    pub fn with<T: EntityTemplate>(mut self, template: T) -> Self {
        self.register(template);
        self
    }

    /// Template registered for type `T`
    pub fn get<T: EntityTemplate>(&self) -> Option<Rc<dyn EntityTemplate>> {
        self.by_type.get(&TypeId::of::<T>()).cloned()
    }

    /// Template registered under `name`
    pub fn get_named(&self, name: &str) -> Option<Rc<dyn EntityTemplate>> {
        self.by_name.get(name).cloned()
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.by_name.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered names
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Rock;

    impl EntityTemplate for Rock {
        fn name(&self) -> &str {
            "rock"
        }

        fn build_entity(&self, _world: &mut World, _entity: Entity, _args: &TemplateArgs) -> Result<(), EcsError> {
            Ok(())
        }
    }

    #[test]
    fn test_args_are_typed() {
        let args = TemplateArgs::new().with(3_u32).with("big");
        assert_eq!(args.len(), 2);
        assert_eq!(args.get::<u32>(0), Some(&3));
        assert_eq!(args.get::<&str>(1), Some(&"big"));
        assert_eq!(args.get::<i64>(0), None);
        assert_eq!(args.get::<u32>(5), None);
    }

    #[test]
    fn test_lookup_by_type_and_name() {
        let registry = TemplateRegistry::new().with(Rock);
        assert!(registry.get::<Rock>().is_some());
        assert_eq!(registry.get_named("rock").map(|t| t.name().to_string()), Some("rock".to_string()));
        assert!(registry.get_named("boulder").is_none());
        assert_eq!(registry.names(), vec!["rock"]);
    }
}
