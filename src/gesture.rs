//! Gesture classification: hand landmarks in, control signals out.
//!
//! Three signals are read from the controlling hand each frame:
//!
//! | Signal | Source | Rule |
//! |---|---|---|
//! | Shape selector | index, middle, ring, pinky | count extended fingers; 1/2/3 select a shape, 0 or 4 select none |
//! | Openness | thumb tip ↔ middle tip | distance normalized between two calibration bounds, clamped to `[0, 1]` |
//! | Pointer | index tip | mirrored, mapped to NDC, projected onto the `z = plane_z` world plane |
//!
//! A finger is extended when its tip is higher on screen than its knuckle
//! by more than a margin. There is no smoothing or hysteresis, so the
//! selector can flicker when a finger hovers at the threshold.
//!
//! Classification never fails. A frame without hands, or a hand with
//! missing keypoints, yields neutral values for the affected signals.

use crate::camera::Camera;
use crate::control::{ControlSignals, ShapeSelector};
use crate::hand::{Finger, Hand, HandFrame, HandLandmark, Landmark};
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Tunable thresholds for the classifier.
///
/// The defaults are calibrated to the coordinate scale of a MediaPipe-style
/// hand tracker.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// How far above its knuckle a fingertip must be to count as extended.
    pub extension_margin: f32,
    /// Thumb-to-middle distance that reads as fully closed.
    pub openness_min: f32,
    /// Thumb-to-middle distance that reads as fully open.
    pub openness_max: f32,
    /// World-space depth of the plane the pointer is projected onto.
    pub plane_z: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            extension_margin: 0.05,
            openness_min: 0.03,
            openness_max: 0.20,
            plane_z: 0.0,
        }
    }
}

/// Turns one hand into [`ControlSignals`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GestureClassifier {
    pub config: GestureConfig,
    pub camera: Camera,
}

impl GestureClassifier {
    pub fn new(config: GestureConfig, camera: Camera) -> Self {
        Self { config, camera }
    }

    /// Classify a detection cycle. Only the first hand is used; with no
    /// hand every signal is neutral.
    pub fn classify_frame(&self, frame: &HandFrame) -> ControlSignals {
        match frame.primary() {
            Some(hand) => self.classify(hand),
            None => ControlSignals::neutral(),
        }
    }

    pub fn classify(&self, hand: &Hand) -> ControlSignals {
        ControlSignals::new(self.shape(hand), self.openness(hand), self.pointer(hand))
    }

    /// Whether a finger is extended, or `None` if its keypoints are missing.
    pub fn is_extended(&self, hand: &Hand, finger: Finger) -> Option<bool> {
        let base = hand.get(finger.base())?;
        let tip = hand.get(finger.tip())?;
        // Image y grows downward, so "higher" means a smaller y.
        Some(tip.y < base.y - self.config.extension_margin)
    }

    /// Count the extended fingers and map the count to a selector.
    pub fn shape(&self, hand: &Hand) -> ShapeSelector {
        let mut count = 0u8;
        for finger in Finger::ALL {
            match self.is_extended(hand, finger) {
                Some(true) => count += 1,
                Some(false) => {}
                None => return ShapeSelector::NONE,
            }
        }
        selector_for_count(count)
    }

    /// Pinch openness in `[0, 1]`: 0 is pinched shut, 1 is fully open.
    pub fn openness(&self, hand: &Hand) -> f32 {
        let (Some(thumb), Some(middle)) = (
            hand.get(HandLandmark::ThumbTip),
            hand.get(HandLandmark::MiddleTip),
        ) else {
            return 0.0;
        };
        normalize_openness(
            thumb.to_vec3().distance(middle.to_vec3()),
            self.config.openness_min,
            self.config.openness_max,
        )
    }

    /// World-space pointer under the index fingertip.
    pub fn pointer(&self, hand: &Hand) -> Option<Vec3> {
        let tip = hand.get(HandLandmark::IndexTip)?;
        let ndc = mirrored_ndc(tip);
        self.camera.ray_to_plane_z(ndc.x, ndc.y, self.config.plane_z)
    }
}

/// Map an extended-finger count to a shape selector.
pub fn selector_for_count(count: u8) -> ShapeSelector {
    match count {
        1..=3 => ShapeSelector(count),
        _ => ShapeSelector::NONE,
    }
}

/// Normalize a thumb-to-middle distance against calibration bounds.
pub fn normalize_openness(distance: f32, min: f32, max: f32) -> f32 {
    let span = max - min;
    if !(span > 0.0) || !distance.is_finite() {
        return 0.0;
    }
    ((distance - min) / span).clamp(0.0, 1.0)
}

/// Convert a landmark to normalized device coordinates.
///
/// The camera feed is shown mirrored to the user, so `x` is flipped first.
/// Image `y` points down while NDC `y` points up.
pub fn mirrored_ndc(landmark: Landmark) -> Vec2 {
    let x = 1.0 - landmark.x;
    let y = landmark.y;
    Vec2::new(x * 2.0 - 1.0, 1.0 - y * 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raise(hand: Hand, finger: Finger, by: f32) -> Hand {
        let base = hand.get(finger.base()).unwrap();
        hand.with_point(finger.tip(), Landmark::flat(base.x, base.y - by))
    }

    fn with_fingers(count: usize) -> Hand {
        Finger::ALL
            .iter()
            .take(count)
            .fold(Hand::resting(), |hand, &f| raise(hand, f, 0.10))
    }

    #[test]
    fn test_single_index_finger_selects_shape_one() {
        let classifier = GestureClassifier::default();
        let hand = raise(Hand::resting(), Finger::Index, 0.10);
        assert_eq!(classifier.shape(&hand), ShapeSelector(1));
    }

    #[test]
    fn test_finger_count_maps_to_selector() {
        let classifier = GestureClassifier::default();
        assert_eq!(classifier.shape(&with_fingers(0)), ShapeSelector::NONE);
        assert_eq!(classifier.shape(&with_fingers(1)), ShapeSelector(1));
        assert_eq!(classifier.shape(&with_fingers(2)), ShapeSelector(2));
        assert_eq!(classifier.shape(&with_fingers(3)), ShapeSelector(3));
        assert_eq!(classifier.shape(&with_fingers(4)), ShapeSelector::NONE);
    }

    #[test]
    fn test_tip_within_margin_is_not_extended() {
        let classifier = GestureClassifier::default();
        let hand = raise(Hand::resting(), Finger::Middle, 0.04);
        assert_eq!(classifier.is_extended(&hand, Finger::Middle), Some(false));
        assert_eq!(classifier.shape(&hand), ShapeSelector::NONE);
    }

    #[test]
    fn test_thumb_does_not_count() {
        let classifier = GestureClassifier::default();
        let hand = raise(Hand::resting(), Finger::Ring, 0.2)
            .with_point(HandLandmark::ThumbTip, Landmark::flat(0.3, 0.1));
        assert_eq!(classifier.shape(&hand), ShapeSelector(1));
    }

    #[test]
    fn test_openness_calibration_points() {
        assert!((normalize_openness(0.03, 0.03, 0.20) - 0.0).abs() < 1e-6);
        assert!((normalize_openness(0.20, 0.03, 0.20) - 1.0).abs() < 1e-6);
        assert!((normalize_openness(0.115, 0.03, 0.20) - 0.5).abs() < 1e-5);
        assert_eq!(normalize_openness(0.01, 0.03, 0.20), 0.0);
        assert_eq!(normalize_openness(0.50, 0.03, 0.20), 1.0);
    }

    #[test]
    fn test_openness_uses_depth() {
        let classifier = GestureClassifier::default();
        let middle = Hand::resting().get(HandLandmark::MiddleTip).unwrap();
        let hand = Hand::resting().with_point(
            HandLandmark::ThumbTip,
            Landmark::new(middle.x, middle.y, middle.z + 0.115),
        );
        assert!((classifier.openness(&hand) - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_inverted_bounds_read_as_closed() {
        assert_eq!(normalize_openness(0.1, 0.2, 0.03), 0.0);
    }

    #[test]
    fn test_mirrored_ndc() {
        let ndc = mirrored_ndc(Landmark::flat(0.0, 0.0));
        assert_eq!(ndc, Vec2::new(1.0, 1.0));
        let ndc = mirrored_ndc(Landmark::flat(0.5, 0.5));
        assert_eq!(ndc, Vec2::ZERO);
        let ndc = mirrored_ndc(Landmark::flat(1.0, 1.0));
        assert_eq!(ndc, Vec2::new(-1.0, -1.0));
    }

    #[test]
    fn test_pointer_at_frame_center_lands_on_origin() {
        let classifier = GestureClassifier::default();
        let hand = Hand::resting().with_point(HandLandmark::IndexTip, Landmark::flat(0.5, 0.5));
        let p = classifier.pointer(&hand).unwrap();
        assert!(p.length() < 1e-2, "p = {:?}", p);
    }

    #[test]
    fn test_pointer_is_mirrored() {
        let classifier = GestureClassifier::default();
        // Tip on the left of the camera image appears on the right of the scene.
        let hand = Hand::resting().with_point(HandLandmark::IndexTip, Landmark::flat(0.2, 0.5));
        let p = classifier.pointer(&hand).unwrap();
        assert!(p.x > 0.0);
        assert!(p.z.abs() < 1e-2);
    }

    #[test]
    fn test_no_hand_is_neutral() {
        let classifier = GestureClassifier::default();
        let signals = classifier.classify_frame(&HandFrame::empty());
        assert_eq!(signals, ControlSignals::neutral());
    }

    #[test]
    fn test_only_first_hand_is_used() {
        let classifier = GestureClassifier::default();
        let frame = HandFrame {
            hands: vec![with_fingers(2), with_fingers(3)],
        };
        assert_eq!(classifier.classify_frame(&frame).shape(), ShapeSelector(2));
    }

    #[test]
    fn test_malformed_hand_is_neutral() {
        let classifier = GestureClassifier::default();
        let hand = Hand::new(vec![Landmark::flat(0.5, 0.5); 3]);
        let signals = classifier.classify(&hand);
        assert_eq!(signals.shape(), ShapeSelector::NONE);
        assert_eq!(signals.openness(), 0.0);
        assert!(signals.pointer().is_none());
    }

    #[test]
    fn test_missing_finger_keypoint_drops_selection() {
        let classifier = GestureClassifier::default();
        let hand = with_fingers(1).with_point(HandLandmark::PinkyTip, Landmark::flat(f32::NAN, 0.0));
        assert_eq!(classifier.shape(&hand), ShapeSelector::NONE);
    }
}
