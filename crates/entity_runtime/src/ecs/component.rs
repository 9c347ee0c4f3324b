//! Component trait and callback context

use super::error::EcsError;
use super::storage::ComponentKey;
use super::world::World;
use super::Entity;
use std::any::Any;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};

/// Upcast helper so trait objects can be downcast to their concrete type
pub trait AsAny: Any {
    /// Borrow as `Any`
    fn as_any(&self) -> &dyn Any;

    /// Mutably borrow as `Any`
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Behavior attached to an entity
///
/// Every hook has an empty default. Hooks receive a [`Context`] that
/// dereferences to the [`World`], so a component can create or destroy
/// entities and components while it runs; those requests take effect at the
/// next drain boundary. An error returned by a hook aborts the running
/// `update`/`draw` pass and is handed back to the host.
///
/// While a hook runs, the component itself is checked out of the world:
/// looking it up through the context yields `None`. Use `self` instead;
/// `has_component` and `find_component_keys` still count it.
#[allow(unused_variables)]
pub trait Component: AsAny {
    /// Called once, in the first update after the component was added
    fn on_start(&mut self, ctx: &mut Context<'_>) -> Result<(), EcsError> {
        Ok(())
    }

    /// Called after start when enabled, and when re-enabled
    fn on_enable(&mut self, ctx: &mut Context<'_>) -> Result<(), EcsError> {
        Ok(())
    }

    /// Called after start when disabled, when disabled, and before destroy
    fn on_disable(&mut self, ctx: &mut Context<'_>) -> Result<(), EcsError> {
        Ok(())
    }

    /// Called every update while processable
    fn on_update(&mut self, ctx: &mut Context<'_>, delta_time: f32) -> Result<(), EcsError> {
        Ok(())
    }

    /// Called before any `on_draw` of the same entity
    fn on_before_draw(&mut self, ctx: &mut Context<'_>, delta_time: f32) -> Result<(), EcsError> {
        Ok(())
    }

    /// Called every draw while processable
    fn on_draw(&mut self, ctx: &mut Context<'_>, delta_time: f32) -> Result<(), EcsError> {
        Ok(())
    }

    /// Called after every `on_draw` of the same entity
    fn on_after_draw(&mut self, ctx: &mut Context<'_>, delta_time: f32) -> Result<(), EcsError> {
        Ok(())
    }

    /// Called exactly once when the component is evicted
    fn on_destroy(&mut self, ctx: &mut Context<'_>) -> Result<(), EcsError> {
        Ok(())
    }
}

impl dyn Component {
    /// Downcast to the concrete component type
    pub fn downcast_ref<T: Component>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Mutably downcast to the concrete component type
    pub fn downcast_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}

/// Typed, generational reference to a component instance
///
/// Resolves to `None` once the component has been evicted.
pub struct ComponentHandle<T> {
    key: ComponentKey,
    _marker: PhantomData<fn() -> T>,
}

impl<T> ComponentHandle<T> {
    pub(crate) fn new(key: ComponentKey) -> Self {
        Self { key, _marker: PhantomData }
    }

    /// Untyped key
    pub fn key(&self) -> ComponentKey {
        self.key
    }
}

impl<T> Clone for ComponentHandle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ComponentHandle<T> {}

impl<T> PartialEq for ComponentHandle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<T> Eq for ComponentHandle<T> {}

impl<T> std::fmt::Debug for ComponentHandle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ComponentHandle").field(&self.key).finish()
    }
}

/// Lifecycle hook selector used by the scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Hook {
    Start,
    Enable,
    Disable,
    Update,
    BeforeDraw,
    Draw,
    AfterDraw,
    Destroy,
}

impl Hook {
    pub fn dispatch(self, component: &mut dyn Component, ctx: &mut Context<'_>, delta_time: f32) -> Result<(), EcsError> {
        match self {
            Self::Start => component.on_start(ctx),
            Self::Enable => component.on_enable(ctx),
            Self::Disable => component.on_disable(ctx),
            Self::Update => component.on_update(ctx, delta_time),
            Self::BeforeDraw => component.on_before_draw(ctx, delta_time),
            Self::Draw => component.on_draw(ctx, delta_time),
            Self::AfterDraw => component.on_after_draw(ctx, delta_time),
            Self::Destroy => component.on_destroy(ctx),
        }
    }
}

/// World access handed to component hooks
pub struct Context<'w> {
    world: &'w mut World,
    entity: Entity,
    component: ComponentKey,
}

impl<'w> Context<'w> {
    pub(crate) fn new(world: &'w mut World, entity: Entity, component: ComponentKey) -> Self {
        Self { world, entity, component }
    }

    /// Entity owning the running component
    pub fn entity(&self) -> Entity {
        self.entity
    }

    /// Key of the running component
    pub fn component_key(&self) -> ComponentKey {
        self.component
    }

    /// Destroy the owning entity and its subtree
    pub fn destroy_self(&mut self) -> Result<(), EcsError> {
        self.world.destroy_entity(self.entity)
    }

    /// Request removal of the running component
    pub fn remove_self(&mut self) -> Result<(), EcsError> {
        self.world.remove_component_by_key(self.component)
    }

    /// Enable or disable the running component
    pub fn set_self_enabled(&mut self, enabled: bool) -> Result<(), EcsError> {
        self.world.set_component_enabled_by_key(self.component, enabled)
    }
}

impl Deref for Context<'_> {
    type Target = World;

    fn deref(&self) -> &World {
        self.world
    }
}

impl DerefMut for Context<'_> {
    fn deref_mut(&mut self) -> &mut World {
        self.world
    }
}
