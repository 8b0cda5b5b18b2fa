//! Serializable swarm configuration.
//!
//! Every field has a default, so a configuration file only needs to list
//! what it changes.

use crate::camera::Camera;
use crate::error::SwarmError;
use crate::gesture::GestureConfig;
use crate::motion::MotionConfig;
use crate::time::DEFAULT_MAX_DELTA;
use serde::{Deserialize, Serialize};

/// Complete swarm configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwarmConfig {
    pub particle_count: usize,
    /// Radius of the sphere the cloud is spawned in.
    pub spawn_radius: f32,
    /// Largest step a single tick may take, in seconds.
    pub max_delta: f32,
    /// Seed for spawning and jitter. `None` seeds from entropy.
    pub seed: Option<u64>,
    pub motion: MotionConfig,
    pub gesture: GestureConfig,
    pub camera: Camera,
}

impl Default for SwarmConfig {
    fn default() -> Self {
        Self {
            particle_count: 9000,
            spawn_radius: 260.0,
            max_delta: DEFAULT_MAX_DELTA,
            seed: None,
            motion: MotionConfig::default(),
            gesture: GestureConfig::default(),
            camera: Camera::default(),
        }
    }
}

fn positive(name: &str, value: f32) -> Result<(), SwarmError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SwarmError::InvalidConfig(format!(
            "{} must be a positive finite number, got {}",
            name, value
        )))
    }
}

impl SwarmConfig {
    /// Check that the configuration can drive a swarm.
    pub fn validate(&self) -> Result<(), SwarmError> {
        if self.particle_count == 0 {
            return Err(SwarmError::InvalidConfig(
                "particle_count must be at least 1".into(),
            ));
        }
        positive("spawn_radius", self.spawn_radius)?;
        positive("max_delta", self.max_delta)?;
        positive("motion.pointer_radius", self.motion.pointer_radius)?;
        if !(self.gesture.openness_max > self.gesture.openness_min) {
            return Err(SwarmError::InvalidConfig(format!(
                "gesture.openness_max ({}) must exceed gesture.openness_min ({})",
                self.gesture.openness_max, self.gesture.openness_min
            )));
        }
        positive("camera.aspect", self.camera.aspect)?;
        Ok(())
    }
}
