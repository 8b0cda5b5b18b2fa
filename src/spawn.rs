//! Cloud spawning: where particles live when no glyph is active.

use glam::Vec3;
use rand::Rng;
use std::f32::consts::TAU;

/// Random point inside a sphere of the given radius, centered at the origin.
///
/// The radius is drawn uniformly and the direction uniformly over the
/// sphere (polar angle from `acos(2u - 1)`), which gives a filled ball
/// that is denser toward the center rather than a hollow shell.
pub fn random_in_sphere<R: Rng + ?Sized>(rng: &mut R, radius: f32) -> Vec3 {
    let r = radius * rng.gen::<f32>();
    let theta = rng.gen_range(0.0..TAU);
    let phi = (2.0 * rng.gen::<f32>() - 1.0).acos();

    Vec3::new(
        r * phi.sin() * theta.cos(),
        r * phi.sin() * theta.sin(),
        r * phi.cos(),
    )
}

/// Spawn `count` cloud positions inside a sphere.
pub fn spawn_cloud<R: Rng + ?Sized>(rng: &mut R, count: usize, radius: f32) -> Vec<Vec3> {
    (0..count).map(|_| random_in_sphere(rng, radius)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_random_in_sphere_bounds() {
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..1000 {
            let pos = random_in_sphere(&mut rng, 260.0);
            assert!(pos.is_finite());
            assert!(pos.length() <= 260.0 + 0.01);
        }
    }

    #[test]
    fn test_cloud_fills_every_octant() {
        let mut rng = SmallRng::seed_from_u64(11);
        let cloud = spawn_cloud(&mut rng, 2000, 1.0);
        assert_eq!(cloud.len(), 2000);

        let mut octants = [0usize; 8];
        for p in &cloud {
            let i = (p.x > 0.0) as usize | ((p.y > 0.0) as usize) << 1 | ((p.z > 0.0) as usize) << 2;
            octants[i] += 1;
        }
        assert!(octants.iter().all(|&n| n > 150), "octants = {:?}", octants);
    }

    #[test]
    fn test_same_seed_same_cloud() {
        let a = spawn_cloud(&mut SmallRng::seed_from_u64(3), 50, 10.0);
        let b = spawn_cloud(&mut SmallRng::seed_from_u64(3), 50, 10.0);
        assert_eq!(a, b);
    }
}
