//! Swarm builder and per-frame driver.

use crate::config::SwarmConfig;
use crate::control::{ControlSignals, ShapeSelector};
use crate::error::SwarmError;
use crate::glyph::{GlyphLibrary, GlyphPointProvider, GlyphTarget};
use crate::motion::{MotionConfig, MotionEngine};
use crate::particle::ParticleStore;
use crate::spawn::spawn_cloud;
use crate::time::clamp_delta;
use glam::Vec3;
use rand::rngs::SmallRng;
use rand::SeedableRng;

/// A swarm builder.
///
/// Use method chaining to configure, then call `.build()`.
///
/// ```ignore
/// let mut swarm = Swarm::builder()
///     .with_particle_count(9000)
///     .with_spawn_radius(260.0)
///     .with_text(1, "Hello World!", &BitmapFont::default())
///     .build()?;
///
/// swarm.tick(&signals, dt);
/// renderer.upload(swarm.position_bytes());
/// ```
pub struct SwarmBuilder {
    config: SwarmConfig,
    glyphs: Vec<(ShapeSelector, Result<GlyphTarget, SwarmError>)>,
}

impl SwarmBuilder {
    /// Create a builder with default settings.
    pub fn new() -> Self {
        Self::from_config(SwarmConfig::default())
    }

    /// Start from a full configuration.
    pub fn from_config(config: SwarmConfig) -> Self {
        Self {
            config,
            glyphs: Vec::new(),
        }
    }

    /// Set the number of particles.
    pub fn with_particle_count(mut self, count: usize) -> Self {
        self.config.particle_count = count;
        self
    }

    /// Set the radius of the spawn sphere.
    pub fn with_spawn_radius(mut self, radius: f32) -> Self {
        self.config.spawn_radius = radius;
        self
    }

    /// Seed spawning and jitter for reproducible runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    pub fn with_motion(mut self, motion: MotionConfig) -> Self {
        self.config.motion = motion;
        self
    }

    /// Largest step a single tick may take, in seconds.
    pub fn with_max_delta(mut self, max_delta: f32) -> Self {
        self.config.max_delta = max_delta;
        self
    }

    /// Register a glyph target under a selector.
    pub fn with_glyph(mut self, selector: u8, target: GlyphTarget) -> Self {
        self.glyphs.push((ShapeSelector(selector), Ok(target)));
        self
    }

    /// Generate a glyph target from text and register it under a selector.
    pub fn with_text(
        mut self,
        selector: u8,
        text: &str,
        provider: &dyn GlyphPointProvider,
    ) -> Self {
        let target = GlyphTarget::from_text(text, provider).map_err(SwarmError::from);
        self.glyphs.push((ShapeSelector(selector), target));
        self
    }

    /// Validate the configuration, spawn the cloud and register targets.
    pub fn build(self) -> Result<Swarm, SwarmError> {
        self.config.validate()?;

        let mut library = GlyphLibrary::new();
        for (selector, target) in self.glyphs {
            library.insert(selector, target?)?;
        }

        let mut rng = match self.config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        let base = spawn_cloud(&mut rng, self.config.particle_count, self.config.spawn_radius);

        log::debug!(
            "built swarm: {} particles, radius {}, {} glyph targets",
            base.len(),
            self.config.spawn_radius,
            library.len()
        );

        Ok(Swarm {
            particles: ParticleStore::from_base(base),
            glyphs: library,
            engine: MotionEngine::new(self.config.motion),
            max_delta: self.config.max_delta,
            rng,
            frame: 0,
        })
    }
}

impl Default for SwarmBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Summary of the swarm's state after a tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TickStats {
    /// Shape that was active, `NONE` when the cloud was the target.
    pub shape: ShapeSelector,
    /// Mean distance from each particle to its target.
    pub mean_target_distance: f32,
    /// Largest distance any particle moved this tick.
    pub max_displacement: f32,
}

/// A running swarm: particle state, glyph targets and the motion engine.
pub struct Swarm {
    particles: ParticleStore,
    glyphs: GlyphLibrary,
    engine: MotionEngine,
    max_delta: f32,
    rng: SmallRng,
    frame: u64,
}

impl Swarm {
    pub fn builder() -> SwarmBuilder {
        SwarmBuilder::new()
    }

    /// Advance one frame.
    ///
    /// `elapsed` is clamped to `[0, max_delta]`. An unknown shape selector
    /// behaves like "no shape".
    pub fn tick(&mut self, signals: &ControlSignals, elapsed: f32) {
        if !elapsed.is_finite() {
            log::warn!("non-finite elapsed time {} treated as 0", elapsed);
        }
        let dt = clamp_delta(elapsed, self.max_delta);
        let glyph = self.glyphs.get(signals.shape());

        self.engine.step(
            &mut self.particles,
            glyph,
            signals.openness(),
            signals.pointer(),
            dt,
            &mut self.rng,
        );
        self.frame += 1;

        log::trace!(
            "tick {}: shape {:?}, openness {:.2}, pointer {}",
            self.frame,
            signals.shape(),
            signals.openness(),
            signals.pointer().is_some()
        );
    }

    /// Advance one frame and report how the swarm moved.
    pub fn tick_with_stats(&mut self, signals: &ControlSignals, elapsed: f32) -> TickStats {
        let before = self.particles.current().to_vec();
        self.tick(signals, elapsed);

        let max_displacement = before
            .iter()
            .zip(self.particles.current())
            .map(|(a, b)| a.distance(*b))
            .fold(0.0, f32::max);

        TickStats {
            shape: if self.glyphs.get(signals.shape()).is_some() {
                signals.shape()
            } else {
                ShapeSelector::NONE
            },
            mean_target_distance: self.mean_target_distance(signals.shape()),
            max_displacement,
        }
    }

    /// Where a particle is headed when `shape` is active.
    pub fn target_of(&self, index: usize, shape: ShapeSelector) -> Vec3 {
        match self.glyphs.get(shape) {
            Some(glyph) => glyph.point_for(index),
            None => self.particles.base()[index],
        }
    }

    /// Mean distance from each particle to its target under `shape`.
    pub fn mean_target_distance(&self, shape: ShapeSelector) -> f32 {
        let n = self.particles.len();
        if n == 0 {
            return 0.0;
        }
        let total: f32 = self
            .particles
            .current()
            .iter()
            .enumerate()
            .map(|(i, p)| p.distance(self.target_of(i, shape)))
            .sum();
        total / n as f32
    }

    /// Live positions, one per particle, for the renderer.
    pub fn positions(&self) -> &[Vec3] {
        self.particles.current()
    }

    /// Live positions as tightly packed `f32` triples.
    pub fn position_bytes(&self) -> &[u8] {
        self.particles.current_bytes()
    }

    pub fn base_positions(&self) -> &[Vec3] {
        self.particles.base()
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    pub fn glyphs(&self) -> &GlyphLibrary {
        &self.glyphs
    }

    pub fn particles(&self) -> &ParticleStore {
        &self.particles
    }

    /// Frames ticked so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Send every particle back to its home position.
    pub fn reset(&mut self) {
        self.particles.reset();
    }
}
