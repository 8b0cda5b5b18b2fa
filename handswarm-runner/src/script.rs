//! Scripted hand source: synthesizes landmark frames from pose steps, at a
//! fixed detector cadence, as a camera-backed tracker would.

use crate::config::PoseStep;
use handswarm::control::LandmarkSource;
use handswarm::{Finger, GestureConfig, Hand, HandFrame, HandLandmark, Landmark};
use std::sync::mpsc::Sender;
use std::thread;
use std::time::Duration;

/// Plays a list of [`PoseStep`]s as hand frames.
pub struct ScriptedHand {
    pub steps: Vec<PoseStep>,
    pub interval: Duration,
    /// Calibration used to turn a desired openness into a pinch distance.
    pub gesture: GestureConfig,
}

impl ScriptedHand {
    /// Build the hand for one pose.
    pub fn pose(&self, step: &PoseStep) -> Hand {
        let mut hand = Hand::resting();
        let raise = 2.0 * self.gesture.extension_margin;
        for finger in Finger::ALL.iter().take(step.fingers.min(4) as usize) {
            if let Some(base) = hand.get(finger.base()) {
                hand = hand.with_point(finger.tip(), Landmark::flat(base.x, base.y - raise));
            }
        }

        // Place the thumb to the left of the middle tip at the distance
        // that maps to the requested openness.
        let g = &self.gesture;
        let openness = step.openness.clamp(0.0, 1.0);
        let spread = g.openness_min + openness * (g.openness_max - g.openness_min);
        if let Some(middle) = hand.get(HandLandmark::MiddleTip) {
            hand = hand.with_point(
                HandLandmark::ThumbTip,
                Landmark::flat(middle.x - spread, middle.y),
            );
        }

        if let Some([x, y]) = step.pointer {
            hand = hand.with_point(HandLandmark::IndexTip, Landmark::flat(x, y));
        }
        hand
    }

    fn frame(&self, step: &PoseStep) -> HandFrame {
        if step.present {
            HandFrame::single(self.pose(step))
        } else {
            HandFrame::empty()
        }
    }
}

impl LandmarkSource for ScriptedHand {
    fn run(self: Box<Self>, tx: Sender<HandFrame>) {
        for step in &self.steps {
            let frame = self.frame(step);
            for _ in 0..step.frames {
                if tx.send(frame.clone()).is_err() {
                    return;
                }
                thread::sleep(self.interval);
            }
        }
        log::info!("hand script finished");
    }
}
