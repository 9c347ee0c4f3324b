//! Headless scene demo
//!
//! Drives a small solar system through the entity runtime: a sun emitting
//! sparks, orbiters carrying satellites, fixed-step update and draw.
//!
//! Usage: `scene_demo [config.toml|config.ron]`

mod components;
mod config;

use components::{OrbiterTemplate, SparkTemplate, Spawner, Spin, Tracer};
use config::DemoConfig;
use entity_runtime::config::{Config, ConfigError};
use entity_runtime::ecs::{EcsError, TemplateArgs, TemplateRegistry, World};
use entity_runtime::foundation::logging;
use entity_runtime::foundation::math::Vec2;
use entity_runtime::foundation::time::Timer;
use log::{info, warn};
use thiserror::Error;

/// Errors that end the demo
#[derive(Error, Debug)]
enum DemoError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Runtime error: {0}")]
    Runtime(#[from] EcsError),
}

fn load_config() -> Result<DemoConfig, ConfigError> {
    match std::env::args().nth(1) {
        Some(path) => DemoConfig::load_from_file(&path),
        None => Ok(DemoConfig::default()),
    }
}

fn build_scene(world: &mut World, config: &DemoConfig) -> Result<(), EcsError> {
    let sun = world.create_entity()?;
    world.set_name(sun, "sun")?;
    world.add_component(sun, Spin { speed: 0.2 })?;
    world.add_component(
        sun,
        Spawner::new(config.spawn_interval, config.max_sparks, config.spark_lifetime, config.seed),
    )?;
    world.add_component(sun, Tracer)?;

    for index in 0..config.orbiters {
        let args = TemplateArgs::new()
            .with(1.0_f32 + index as f32 * 0.5)
            .with(config.satellite_distance)
            .with(sun);
        let orbiter = world.create_entity_from_template::<OrbiterTemplate>(&args)?;
        world.set_position(orbiter, Vec2::new(4.0 * (index + 1) as f32, 0.0))?;
        world.set_z_index(orbiter, index as i32)?;
    }
    Ok(())
}

fn run(config: &DemoConfig) -> Result<(), DemoError> {
    let templates = TemplateRegistry::new().with(OrbiterTemplate).with(SparkTemplate);
    let mut world = World::with_config(templates, config.runtime.clone());
    build_scene(&mut world, config)?;

    let mut timer = Timer::fixed(config.fixed_delta);
    for _ in 0..config.frames {
        let delta_time = timer.tick();
        world.update(delta_time)?;
        world.draw(delta_time)?;

        if config.report_every > 0 && timer.frame_count() % u64::from(config.report_every) == 0 {
            let stats = world.last_frame_stats();
            info!(
                "t={:.2}s entities={} components={} inserted={} removed={} updates={} draws={}",
                timer.total_time(),
                world.entity_count(),
                world.component_count(),
                stats.entities_inserted,
                stats.entities_removed,
                stats.update_calls,
                stats.draw_calls,
            );
        }
    }

    world.shutdown()?;
    info!("Simulated {} frames ({:.2}s)", timer.frame_count(), timer.total_time());
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match load_config() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Falling back to default configuration: {err}");
            DemoConfig::default()
        }
    };
    logging::init_with_filter(&config.log_filter);
    info!("Starting scene demo ({} frames)", config.frames);

    if let Err(err) = run(&config) {
        warn!("Scene demo stopped: {err}");
        return Err(err.into());
    }
    Ok(())
}
