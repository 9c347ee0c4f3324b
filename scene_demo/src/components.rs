//! Demo components and templates

use entity_runtime::ecs::{Component, Context, EcsError, Entity, EntityTemplate, TemplateArgs, World};
use entity_runtime::foundation::math::Vec2;
use log::{debug, info, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;

/// Constant angular velocity
pub struct Spin {
    /// Radians per second
    pub speed: f32,
}

impl Component for Spin {
    fn on_update(&mut self, ctx: &mut Context<'_>, delta_time: f32) -> Result<(), EcsError> {
        let entity = ctx.entity();
        let rotation = ctx.transform(entity).map_or(0.0, |transform| transform.rotation());
        ctx.set_rotation(entity, (rotation + self.speed * delta_time) % TAU)
    }
}

/// Constant linear velocity in parent space
pub struct Velocity(pub Vec2);

impl Component for Velocity {
    fn on_update(&mut self, ctx: &mut Context<'_>, delta_time: f32) -> Result<(), EcsError> {
        let entity = ctx.entity();
        let position = ctx.transform(entity).map_or_else(Vec2::zeros, |transform| transform.position());
        ctx.set_position(entity, position + self.0 * delta_time)
    }
}

/// Destroys its entity once the time runs out
pub struct Lifetime {
    /// Seconds left
    pub remaining: f32,
}

impl Component for Lifetime {
    fn on_update(&mut self, ctx: &mut Context<'_>, delta_time: f32) -> Result<(), EcsError> {
        self.remaining -= delta_time;
        if self.remaining <= 0.0 && !ctx.is_marked_for_removal(ctx.entity()) {
            ctx.destroy_self()?;
        }
        Ok(())
    }

    fn on_destroy(&mut self, ctx: &mut Context<'_>) -> Result<(), EcsError> {
        trace!("{} expired", ctx.entity_label(ctx.entity()));
        Ok(())
    }
}

/// Emits bursts of sparks from the `spark` template
pub struct Spawner {
    interval: f32,
    elapsed: f32,
    max_alive: usize,
    lifetime: f32,
    rng: StdRng,
    alive: Vec<Entity>,
    total: usize,
}

impl Spawner {
    /// Spawner firing every `interval` seconds
    pub fn new(interval: f32, max_alive: usize, lifetime: f32, seed: u64) -> Self {
        Self {
            interval,
            elapsed: 0.0,
            max_alive,
            lifetime,
            rng: StdRng::seed_from_u64(seed),
            alive: Vec::new(),
            total: 0,
        }
    }
}

impl Component for Spawner {
    fn on_start(&mut self, ctx: &mut Context<'_>) -> Result<(), EcsError> {
        debug!("Spawner started on {}", ctx.entity_label(ctx.entity()));
        Ok(())
    }

    fn on_update(&mut self, ctx: &mut Context<'_>, delta_time: f32) -> Result<(), EcsError> {
        self.alive.retain(|spark| ctx.contains(*spark) && !ctx.is_marked_for_removal(*spark));

        self.elapsed += delta_time;
        if self.elapsed < self.interval {
            return Ok(());
        }
        self.elapsed -= self.interval;

        if self.alive.len() >= self.max_alive {
            // Recycle the oldest spark to stay under the cap
            let oldest = self.alive.remove(0);
            ctx.destroy_entity(oldest)?;
        }

        let angle = self.rng.gen_range(0.0..TAU);
        let speed: f32 = self.rng.gen_range(1.0..4.0);
        let args = TemplateArgs::new()
            .with(Vec2::new(angle.cos(), angle.sin()) * speed)
            .with(self.lifetime)
            .with(ctx.entity());
        let spark = ctx.create_entity_from_template_named(SparkTemplate::NAME, &args)?;
        self.alive.push(spark);
        self.total += 1;
        Ok(())
    }

    fn on_destroy(&mut self, _ctx: &mut Context<'_>) -> Result<(), EcsError> {
        info!("Spawner emitted {} sparks", self.total);
        Ok(())
    }
}

/// Logs world positions during draw
pub struct Tracer;

impl Component for Tracer {
    fn on_draw(&mut self, ctx: &mut Context<'_>, _delta_time: f32) -> Result<(), EcsError> {
        let entity = ctx.entity();
        if let Some(position) = ctx.world_position(entity) {
            trace!("{} at ({:.2}, {:.2})", ctx.entity_label(entity), position.x, position.y);
        }
        Ok(())
    }
}

/// Spinning body carrying one counter-rotating satellite
///
/// Arguments: `0` spin speed (`f32`), `1` satellite distance (`f32`),
/// `2` parent entity (`Entity`, optional).
pub struct OrbiterTemplate;

impl EntityTemplate for OrbiterTemplate {
    fn name(&self) -> &str {
        "orbiter"
    }

    fn build_entity(&self, world: &mut World, entity: Entity, args: &TemplateArgs) -> Result<(), EcsError> {
        let speed = args.get::<f32>(0).copied().unwrap_or(1.0);
        let distance = args.get::<f32>(1).copied().unwrap_or(2.0);
        if let Some(parent) = args.get::<Entity>(2) {
            world.set_parent(entity, Some(*parent))?;
        }
        world.add_component(entity, Spin { speed })?;

        let satellite = world.create_entity()?;
        world.set_name(satellite, "satellite")?;
        world.set_parent(satellite, Some(entity))?;
        world.set_position(satellite, Vec2::new(distance, 0.0))?;
        world.set_z_index(satellite, 1)?;
        world.add_component(satellite, Spin { speed: -2.0 * speed })?;
        world.add_component(satellite, Tracer)?;
        Ok(())
    }
}

/// Short-lived moving particle
///
/// Arguments: `0` velocity (`Vec2`), `1` lifetime (`f32`), `2` parent entity.
pub struct SparkTemplate;

impl SparkTemplate {
    /// Registered name
    pub const NAME: &'static str = "spark";
}

impl EntityTemplate for SparkTemplate {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn build_entity(&self, world: &mut World, entity: Entity, args: &TemplateArgs) -> Result<(), EcsError> {
        let velocity = args.get::<Vec2>(0).copied().unwrap_or_else(Vec2::zeros);
        let lifetime = args.get::<f32>(1).copied().unwrap_or(1.0);
        if let Some(parent) = args.get::<Entity>(2) {
            world.set_parent(entity, Some(*parent))?;
        }
        world.set_z_index(entity, -1)?;
        world.add_component(entity, Velocity(velocity))?;
        world.add_component(entity, Lifetime { remaining: lifetime })?;
        Ok(())
    }
}
