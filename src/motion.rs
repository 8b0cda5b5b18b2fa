//! The motion engine.
//!
//! Every tick, each particle runs four stages in order, each reading the
//! position produced by the stage before it:
//!
//! 1. **Target**: its glyph point (`index mod point_count`) when a glyph is
//!    active, otherwise its own base position.
//! 2. **Blend**: move a fraction `pull * lerp` of the remaining distance to
//!    the target, where
//!    - glyph: `pull = max(0.5, 1.2 * openness)`, `lerp = 0.65`
//!    - cloud: `pull = 0.9 * openness`, `lerp = 0.35`
//!
//!    The glyph floor keeps shapes resolving even with a closed hand.
//! 3. **Jitter**: a uniform offset per axis in `[-n/2, n/2]` with
//!    `n = 0.6 * 1.2 * (1 - openness)`, skipped once `n` is negligible.
//! 4. **Repulsion**: inside the pointer radius, push straight away from the
//!    pointer by `falloff(d) * force * elapsed`.
//!
//! Blending is per frame rather than per second, so convergence speed
//! follows the frame rate. Particles are independent of each other.

use crate::glyph::GlyphTarget;
use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::particle::ParticleStore;

/// How repulsion strength changes between the pointer and the radius edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Falloff {
    /// Full strength at the pointer, zero at the radius: `1 - d / r`.
    #[default]
    Linear,
    /// Smoothstep from full strength at the pointer to zero at the radius.
    Smooth,
    /// Same strength everywhere inside the radius.
    Constant,
}

impl Falloff {
    /// Strength factor in `[0, 1]` at distance `dist` from the source.
    pub fn factor(&self, dist: f32, radius: f32) -> f32 {
        let t = (dist / radius).clamp(0.0, 1.0);
        match self {
            Falloff::Linear => 1.0 - t,
            Falloff::Smooth => 1.0 - t * t * (3.0 - 2.0 * t),
            Falloff::Constant => 1.0,
        }
    }
}

/// Tunable constants of the motion engine.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Minimum pull toward a glyph, whatever the openness.
    pub glyph_pull_floor: f32,
    /// Pull toward a glyph per unit of openness.
    pub glyph_pull_gain: f32,
    /// Pull back to the cloud per unit of openness.
    pub cloud_pull_gain: f32,
    /// Per-frame interpolation rate toward a glyph point.
    pub glyph_lerp: f32,
    /// Per-frame interpolation rate toward the base position.
    pub cloud_lerp: f32,
    /// Scatter strength at openness 0.
    pub scatter_gain: f32,
    /// Jitter amplitude per unit of scatter.
    pub noise_gain: f32,
    /// Jitter amplitudes at or below this are skipped.
    pub noise_epsilon: f32,
    pub pointer_radius: f32,
    pub pointer_force: f32,
    /// Particles closer than this to the pointer have no usable direction
    /// and are left alone.
    pub pointer_min_distance: f32,
    pub pointer_falloff: Falloff,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            glyph_pull_floor: 0.5,
            glyph_pull_gain: 1.2,
            cloud_pull_gain: 0.9,
            glyph_lerp: 0.65,
            cloud_lerp: 0.35,
            scatter_gain: 1.2,
            noise_gain: 0.6,
            noise_epsilon: 1e-4,
            pointer_radius: 26.0,
            pointer_force: 60.0,
            pointer_min_distance: 0.001,
            pointer_falloff: Falloff::Linear,
        }
    }
}

/// Applies one frame of motion to a [`ParticleStore`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MotionEngine {
    pub config: MotionConfig,
}

impl MotionEngine {
    pub fn new(config: MotionConfig) -> Self {
        Self { config }
    }

    /// How strongly particles are pulled toward their target this frame.
    pub fn pull_strength(&self, use_glyph: bool, openness: f32) -> f32 {
        let c = &self.config;
        if use_glyph {
            c.glyph_pull_floor.max(c.glyph_pull_gain * openness)
        } else {
            c.cloud_pull_gain * openness
        }
    }

    /// Fraction of the remaining distance covered this frame.
    pub fn blend_factor(&self, use_glyph: bool, openness: f32) -> f32 {
        let lerp = if use_glyph {
            self.config.glyph_lerp
        } else {
            self.config.cloud_lerp
        };
        self.pull_strength(use_glyph, openness) * lerp
    }

    /// Full width of the per-axis jitter interval.
    pub fn noise_scale(&self, openness: f32) -> f32 {
        let scatter = self.config.scatter_gain * (1.0 - openness);
        self.config.noise_gain * scatter
    }

    /// Displacement pushing a particle at `offset` from the pointer outward.
    pub fn repulsion(&self, offset: Vec3, elapsed: f32) -> Vec3 {
        let c = &self.config;
        let dist = offset.length();
        if dist >= c.pointer_radius || dist <= c.pointer_min_distance {
            return Vec3::ZERO;
        }
        let force = c.pointer_falloff.factor(dist, c.pointer_radius) * c.pointer_force * elapsed;
        offset / dist * force
    }

    /// Advance every particle by one frame.
    ///
    /// `openness` is clamped to `[0, 1]`. Updates that would produce a
    /// non-finite position leave the particle where it was.
    pub fn step<R: Rng + ?Sized>(
        &self,
        particles: &mut ParticleStore,
        glyph: Option<&GlyphTarget>,
        openness: f32,
        pointer: Option<Vec3>,
        elapsed: f32,
        rng: &mut R,
    ) {
        let openness = if openness.is_nan() { 0.0 } else { openness.clamp(0.0, 1.0) };
        let use_glyph = glyph.is_some();
        let blend = self.blend_factor(use_glyph, openness);
        let noise = self.noise_scale(openness);
        let jitter = noise > self.config.noise_epsilon;

        for (i, base, current) in particles.iter_mut() {
            let target = match glyph {
                Some(g) => g.point_for(i),
                None => base,
            };

            let mut p = *current;
            p += (target - p) * blend;

            if jitter {
                p += Vec3::new(
                    rng.gen::<f32>() - 0.5,
                    rng.gen::<f32>() - 0.5,
                    rng.gen::<f32>() - 0.5,
                ) * noise;
            }

            if let Some(pointer) = pointer {
                p += self.repulsion(p - pointer, elapsed);
            }

            if p.is_finite() {
                *current = p;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(42)
    }

    #[test]
    fn test_pull_strength() {
        let engine = MotionEngine::default();
        assert_eq!(engine.pull_strength(true, 0.0), 0.5);
        assert!((engine.pull_strength(true, 1.0) - 1.2).abs() < 1e-6);
        assert_eq!(engine.pull_strength(false, 0.0), 0.0);
        assert!((engine.pull_strength(false, 1.0) - 0.9).abs() < 1e-6);
        for i in 0..=10 {
            assert!(engine.pull_strength(true, i as f32 / 10.0) >= 0.5);
        }
    }

    #[test]
    fn test_noise_vanishes_when_open() {
        let engine = MotionEngine::default();
        assert!((engine.noise_scale(0.0) - 0.72).abs() < 1e-6);
        assert!(engine.noise_scale(1.0).abs() < 1e-6);
    }

    #[test]
    fn test_repulsion_zero_at_radius() {
        let engine = MotionEngine::default();
        assert_eq!(engine.repulsion(Vec3::new(26.0, 0.0, 0.0), 0.016), Vec3::ZERO);
        assert_eq!(engine.repulsion(Vec3::new(40.0, 0.0, 0.0), 0.016), Vec3::ZERO);
    }

    #[test]
    fn test_repulsion_half_strength_at_half_radius() {
        let engine = MotionEngine::default();
        let dt = 0.02;
        let push = engine.repulsion(Vec3::new(0.0, 13.0, 0.0), dt);
        let expected = 0.5 * 60.0 * dt;
        assert!((push.length() - expected).abs() < 1e-5);
        assert!(push.y > 0.0 && push.x == 0.0);
    }

    #[test]
    fn test_repulsion_ignores_coincident_particle() {
        let engine = MotionEngine::default();
        assert_eq!(engine.repulsion(Vec3::splat(0.0001), 0.05), Vec3::ZERO);
    }

    #[test]
    fn test_falloff_shapes() {
        assert_eq!(Falloff::Linear.factor(0.0, 10.0), 1.0);
        assert_eq!(Falloff::Linear.factor(10.0, 10.0), 0.0);
        assert!((Falloff::Smooth.factor(5.0, 10.0) - 0.5).abs() < 1e-6);
        assert_eq!(Falloff::Constant.factor(9.0, 10.0), 1.0);
    }

    #[test]
    fn test_open_hand_returns_to_base() {
        let engine = MotionEngine::default();
        let mut store = ParticleStore::from_base(vec![Vec3::new(10.0, 0.0, 0.0)]);
        store.set_current(0, Vec3::new(-50.0, 20.0, 5.0));
        let mut rng = rng();

        let mut last = f32::INFINITY;
        for _ in 0..60 {
            engine.step(&mut store, None, 1.0, None, 0.016, &mut rng);
            let d = store.current()[0].distance(store.base()[0]);
            assert!(d <= last);
            last = d;
        }
        assert!(last < 1e-3);
    }

    #[test]
    fn test_closed_hand_without_glyph_only_jitters() {
        let engine = MotionEngine::default();
        let start = Vec3::new(3.0, 4.0, 5.0);
        let mut store = ParticleStore::from_base(vec![Vec3::ZERO]);
        store.set_current(0, start);
        let mut rng = rng();

        engine.step(&mut store, None, 0.0, None, 0.016, &mut rng);
        let moved = store.current()[0] - start;
        let half = engine.noise_scale(0.0) / 2.0;
        assert!(moved.abs().max_element() <= half + 1e-6);
    }

    #[test]
    fn test_glyph_pull_progresses_with_closed_hand() {
        let engine = MotionEngine::default();
        let glyph = GlyphTarget::new(vec![Vec3::new(100.0, 0.0, 0.0)]).unwrap();
        let mut store = ParticleStore::from_base(vec![Vec3::ZERO]);
        let mut rng = rng();

        engine.step(&mut store, Some(&glyph), 0.0, None, 0.016, &mut rng);
        // Blend covers 0.5 * 0.65 of the gap; jitter is at most 0.36 per axis.
        let x = store.current()[0].x;
        assert!((x - 32.5).abs() <= 0.37, "x = {}", x);
    }

    #[test]
    fn test_particles_share_glyph_points() {
        let engine = MotionEngine::default();
        let glyph = GlyphTarget::new(vec![Vec3::X * 10.0, Vec3::Y * 10.0]).unwrap();
        let mut store = ParticleStore::from_base(vec![Vec3::ZERO; 4]);
        let mut rng = rng();
        for _ in 0..40 {
            engine.step(&mut store, Some(&glyph), 1.0, None, 0.016, &mut rng);
        }
        let cur = store.current();
        assert!(cur[0].distance(Vec3::X * 10.0) < 1e-3);
        assert!(cur[1].distance(Vec3::Y * 10.0) < 1e-3);
        assert!(cur[2].distance(Vec3::X * 10.0) < 1e-3);
        assert!(cur[3].distance(Vec3::Y * 10.0) < 1e-3);
    }

    #[test]
    fn test_pointer_pushes_particle_away() {
        let engine = MotionEngine::default();
        let mut store = ParticleStore::from_base(vec![Vec3::new(5.0, 0.0, 0.0)]);
        let mut rng = rng();
        engine.step(&mut store, None, 1.0, Some(Vec3::ZERO), 0.05, &mut rng);
        assert!(store.current()[0].x > 5.0);
    }

    #[test]
    fn test_non_finite_inputs_keep_positions_finite() {
        let engine = MotionEngine::default();
        let mut store = ParticleStore::from_base(vec![Vec3::ONE; 8]);
        let mut rng = rng();
        engine.step(&mut store, None, f32::NAN, Some(Vec3::ONE * 1.5), f32::INFINITY, &mut rng);
        assert!(store.current().iter().all(|p| p.is_finite()));
    }
}
