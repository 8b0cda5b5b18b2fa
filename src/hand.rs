//! Hand landmark types.
//!
//! A hand tracker reports 21 keypoints per detected hand in normalized
//! image space: `x` and `y` in `[0, 1]` with the origin at the top-left
//! corner (so smaller `y` is higher on screen), and a relative depth `z`.
//!
//! The classifier never trusts the tracker to be well-formed. Landmarks are
//! looked up through [`Hand::get`], which returns `None` for missing or
//! non-finite keypoints.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Number of keypoints in a complete hand.
pub const LANDMARK_COUNT: usize = 21;

/// One tracked keypoint in normalized image coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    /// Relative depth. Trackers that report no depth leave this at 0.
    #[serde(default)]
    pub z: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Landmark with no depth information.
    pub const fn flat(x: f32, y: f32) -> Self {
        Self { x, y, z: 0.0 }
    }

    #[inline]
    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// Keypoint indices in tracker order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandLandmark {
    Wrist = 0,
    ThumbCmc = 1,
    ThumbMcp = 2,
    ThumbIp = 3,
    ThumbTip = 4,
    IndexMcp = 5,
    IndexPip = 6,
    IndexDip = 7,
    IndexTip = 8,
    MiddleMcp = 9,
    MiddlePip = 10,
    MiddleDip = 11,
    MiddleTip = 12,
    RingMcp = 13,
    RingPip = 14,
    RingDip = 15,
    RingTip = 16,
    PinkyMcp = 17,
    PinkyPip = 18,
    PinkyDip = 19,
    PinkyTip = 20,
}

impl HandLandmark {
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// The four fingers that take part in shape selection. The thumb is left
/// out on purpose: it is always partly extended in a counting pose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Finger {
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const ALL: [Finger; 4] = [Finger::Index, Finger::Middle, Finger::Ring, Finger::Pinky];

    /// The knuckle where the finger meets the palm.
    pub fn base(self) -> HandLandmark {
        match self {
            Finger::Index => HandLandmark::IndexMcp,
            Finger::Middle => HandLandmark::MiddleMcp,
            Finger::Ring => HandLandmark::RingMcp,
            Finger::Pinky => HandLandmark::PinkyMcp,
        }
    }

    pub fn tip(self) -> HandLandmark {
        match self {
            Finger::Index => HandLandmark::IndexTip,
            Finger::Middle => HandLandmark::MiddleTip,
            Finger::Ring => HandLandmark::RingTip,
            Finger::Pinky => HandLandmark::PinkyTip,
        }
    }
}

/// A single detected hand: landmarks in tracker order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hand {
    landmarks: Vec<Landmark>,
}

impl Hand {
    pub fn new(landmarks: Vec<Landmark>) -> Self {
        Self { landmarks }
    }

    /// A relaxed fist near the center of the frame.
    ///
    /// Every fingertip sits level with its knuckle and the thumb rests on
    /// the middle fingertip, so the hand classifies as no shape with
    /// openness 0. Useful as a starting point for synthetic poses.
    pub fn resting() -> Self {
        let mut landmarks = vec![Landmark::flat(0.5, 0.6); LANDMARK_COUNT];
        landmarks[HandLandmark::Wrist.index()] = Landmark::flat(0.5, 0.8);
        for (i, finger) in Finger::ALL.iter().enumerate() {
            let x = 0.44 + i as f32 * 0.04;
            landmarks[finger.base().index()] = Landmark::flat(x, 0.6);
            landmarks[finger.tip().index()] = Landmark::flat(x, 0.6);
        }
        landmarks[HandLandmark::ThumbTip.index()] = landmarks[HandLandmark::MiddleTip.index()];
        Self { landmarks }
    }

    /// Replace one keypoint, growing the landmark list if needed.
    pub fn with_point(mut self, which: HandLandmark, landmark: Landmark) -> Self {
        let i = which.index();
        if self.landmarks.len() <= i {
            self.landmarks.resize(i + 1, Landmark::default());
        }
        self.landmarks[i] = landmark;
        self
    }

    /// Look up a keypoint. Missing or non-finite keypoints read as `None`.
    pub fn get(&self, which: HandLandmark) -> Option<Landmark> {
        self.landmarks
            .get(which.index())
            .copied()
            .filter(Landmark::is_finite)
    }

    pub fn landmarks(&self) -> &[Landmark] {
        &self.landmarks
    }

    pub fn is_complete(&self) -> bool {
        self.landmarks.len() >= LANDMARK_COUNT
    }
}

/// One detection cycle: every hand found, in detection order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HandFrame {
    pub hands: Vec<Hand>,
}

impl HandFrame {
    /// A frame in which no hand was detected.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn single(hand: Hand) -> Self {
        Self { hands: vec![hand] }
    }

    /// The controlling hand. Only the first detected hand steers the swarm.
    pub fn primary(&self) -> Option<&Hand> {
        self.hands.first()
    }
}
