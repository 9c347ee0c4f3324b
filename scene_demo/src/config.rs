//! Demo configuration

use entity_runtime::config::{Config, RuntimeConfig};
use serde::{Deserialize, Serialize};

/// Settings for one headless demo run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Frames to simulate before shutting down
    pub frames: u32,
    /// Seconds per frame
    pub fixed_delta: f32,
    /// `env_logger` filter used when `RUST_LOG` is unset
    pub log_filter: String,
    /// Seed for spark directions
    pub seed: u64,
    /// Number of orbiting bodies around the sun
    pub orbiters: u32,
    /// Distance of satellites from their orbiter
    pub satellite_distance: f32,
    /// Seconds between spark bursts
    pub spawn_interval: f32,
    /// Sparks alive at once
    pub max_sparks: usize,
    /// Seconds a spark lives
    pub spark_lifetime: f32,
    /// Log frame statistics every this many frames
    pub report_every: u32,
    /// Runtime settings passed to the world
    pub runtime: RuntimeConfig,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            frames: 240,
            fixed_delta: 1.0 / 60.0,
            log_filter: "info".to_string(),
            seed: 7,
            orbiters: 3,
            satellite_distance: 2.5,
            spawn_interval: 0.25,
            max_sparks: 12,
            spark_lifetime: 1.5,
            report_every: 60,
            runtime: RuntimeConfig::default(),
        }
    }
}

impl Config for DemoConfig {}
