//! Glyph targets: point sets approximating rendered text.
//!
//! Text is turned into points once, at setup, by a [`GlyphPointProvider`].
//! The usual provider rasterizes the text into an alpha mask and samples it
//! on a grid with [`MaskSampler`]. The resulting [`GlyphTarget`]s are stored
//! in a [`GlyphLibrary`] keyed by shape selector.
//!
//! Particles are assigned to glyph points by index with [`target_for`].
//! When there are more particles than points (the usual case) several
//! particles share a point; when there are fewer, some points go unused.

use crate::control::ShapeSelector;
use crate::error::{GlyphError, SwarmError};
use glam::{Vec2, Vec3};
use image::GrayAlphaImage;
use std::collections::BTreeMap;
use std::path::Path;

/// Produces the points that approximate a piece of text.
pub trait GlyphPointProvider {
    /// Points covering the filled area of `text`. May be empty when nothing
    /// in the text can be rendered.
    fn generate(&self, text: &str) -> Vec<Vec3>;
}

/// Index of the glyph point assigned to a particle.
///
/// `point_count` must be non-zero; [`GlyphTarget`] guarantees this.
#[inline]
pub fn target_for(particle_index: usize, point_count: usize) -> usize {
    particle_index % point_count
}

/// A non-empty, immutable set of glyph points.
#[derive(Clone, Debug, PartialEq)]
pub struct GlyphTarget {
    points: Vec<Vec3>,
}

impl GlyphTarget {
    /// Wrap a point set. An empty set is not a target and yields `None`.
    pub fn new(points: Vec<Vec3>) -> Option<Self> {
        (!points.is_empty()).then_some(Self { points })
    }

    /// Generate a target from text with the given provider.
    pub fn from_text(text: &str, provider: &dyn GlyphPointProvider) -> Result<Self, GlyphError> {
        Self::new(provider.generate(text)).ok_or_else(|| GlyphError::EmptyTarget {
            text: text.to_string(),
        })
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The point assigned to a particle.
    #[inline]
    pub fn point_for(&self, particle_index: usize) -> Vec3 {
        self.points[target_for(particle_index, self.points.len())]
    }
}

/// Glyph targets keyed by shape selector. Selector 0 is reserved for
/// "no shape" and never holds a target.
#[derive(Clone, Debug, Default)]
pub struct GlyphLibrary {
    targets: BTreeMap<u8, GlyphTarget>,
}

impl GlyphLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a target, replacing any previous target for the selector.
    pub fn insert(&mut self, selector: ShapeSelector, target: GlyphTarget) -> Result<(), SwarmError> {
        let key = selector.key().ok_or(SwarmError::ReservedSelector)?;
        log::debug!("registered glyph target {} with {} points", key, target.len());
        self.targets.insert(key, target);
        Ok(())
    }

    /// The target for a selector, or `None` for selector 0 or an unknown key.
    pub fn get(&self, selector: ShapeSelector) -> Option<&GlyphTarget> {
        selector.key().and_then(|key| self.targets.get(&key))
    }

    pub fn selectors(&self) -> impl Iterator<Item = ShapeSelector> + '_ {
        self.targets.keys().map(|&k| ShapeSelector(k))
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// Samples an alpha mask on a regular grid and maps covered pixels into a
/// centered world-space rectangle on the `z = depth` plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MaskSampler {
    /// Pixel step between samples on both axes.
    pub gap: u32,
    /// Pixels with alpha strictly above this count as covered.
    pub alpha_threshold: u8,
    /// World-space width and height the full mask maps onto.
    pub extent: Vec2,
    pub depth: f32,
}

impl Default for MaskSampler {
    fn default() -> Self {
        Self {
            gap: 4,
            alpha_threshold: 128,
            extent: Vec2::new(260.0, 80.0),
            depth: 0.0,
        }
    }
}

impl MaskSampler {
    /// Sample a mask. Points come out in row-major order, top row first.
    pub fn sample(&self, mask: &GrayAlphaImage) -> Vec<Vec3> {
        let (w, h) = mask.dimensions();
        if w == 0 || h == 0 {
            return Vec::new();
        }
        let step = self.gap.max(1) as usize;
        let (wf, hf) = (w as f32, h as f32);

        let mut points = Vec::new();
        for y in (0..h).step_by(step) {
            for x in (0..w).step_by(step) {
                let alpha = mask.get_pixel(x, y).0[1];
                if alpha > self.alpha_threshold {
                    let nx = (x as f32 - wf / 2.0) / wf * self.extent.x;
                    let ny = (hf / 2.0 - y as f32) / hf * self.extent.y;
                    points.push(Vec3::new(nx, ny, self.depth));
                }
            }
        }
        points
    }

    /// Load a mask image from disk and sample it. Color images are reduced
    /// to luminance plus alpha first.
    pub fn sample_file(&self, path: impl AsRef<Path>) -> Result<Vec<Vec3>, GlyphError> {
        let bytes = std::fs::read(path)?;
        let mask = image::load_from_memory(&bytes)?.to_luma_alpha8();
        Ok(self.sample(&mask))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::LumaA;

    struct Fixed(Vec<Vec3>);

    impl GlyphPointProvider for Fixed {
        fn generate(&self, _text: &str) -> Vec<Vec3> {
            self.0.clone()
        }
    }

    #[test]
    fn test_target_for_wraps() {
        assert_eq!(target_for(0, 3), 0);
        assert_eq!(target_for(4, 3), 1);
        assert_eq!(target_for(2, 10), 2);
    }

    #[test]
    fn test_empty_point_set_is_not_a_target() {
        assert!(GlyphTarget::new(Vec::new()).is_none());
        let err = GlyphTarget::from_text("?", &Fixed(Vec::new())).unwrap_err();
        assert!(matches!(err, GlyphError::EmptyTarget { .. }));
    }

    #[test]
    fn test_point_for_shares_points() {
        let target = GlyphTarget::new(vec![Vec3::X, Vec3::Y]).unwrap();
        assert_eq!(target.point_for(0), Vec3::X);
        assert_eq!(target.point_for(1), Vec3::Y);
        assert_eq!(target.point_for(2), Vec3::X);
    }

    #[test]
    fn test_library_rejects_selector_zero() {
        let mut library = GlyphLibrary::new();
        let target = GlyphTarget::new(vec![Vec3::ZERO]).unwrap();
        assert!(matches!(
            library.insert(ShapeSelector::NONE, target.clone()),
            Err(SwarmError::ReservedSelector)
        ));
        library.insert(ShapeSelector(2), target).unwrap();
        assert!(library.get(ShapeSelector(2)).is_some());
        assert!(library.get(ShapeSelector(1)).is_none());
        assert!(library.get(ShapeSelector::NONE).is_none());
        assert_eq!(library.selectors().collect::<Vec<_>>(), vec![ShapeSelector(2)]);
    }

    #[test]
    fn test_sampler_maps_center_to_origin() {
        let mut mask = GrayAlphaImage::new(600, 200);
        mask.put_pixel(300, 100, LumaA([255, 255]));
        let points = MaskSampler::default().sample(&mask);
        assert_eq!(points, vec![Vec3::ZERO]);
    }

    #[test]
    fn test_sampler_respects_gap_and_threshold() {
        let mut mask = GrayAlphaImage::new(600, 200);
        // Off-grid pixel is skipped, faint pixel is below threshold.
        mask.put_pixel(1, 0, LumaA([255, 255]));
        mask.put_pixel(4, 0, LumaA([255, 128]));
        mask.put_pixel(0, 0, LumaA([255, 129]));
        let points = MaskSampler::default().sample(&mask);
        assert_eq!(points.len(), 1);
        assert!((points[0].x - -130.0).abs() < 1e-4);
        assert!((points[0].y - 40.0).abs() < 1e-4);
        assert_eq!(points[0].z, 0.0);
    }

    #[test]
    fn test_sampler_empty_mask() {
        let mask = GrayAlphaImage::new(0, 0);
        assert!(MaskSampler::default().sample(&mask).is_empty());
    }
}
