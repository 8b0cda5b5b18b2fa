//! Per-frame control signals and the channel that carries them.
//!
//! A hand detector runs at its own cadence, usually slower than the render
//! loop. The swarm never waits for it: each tick reads the most recently
//! published [`ControlSignals`] from a [`SignalLatch`] and reuses the
//! previous value when nothing new has arrived.

use crate::gesture::GestureClassifier;
use crate::hand::HandFrame;
use glam::Vec3;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

/// Which glyph target the particles should form. `0` means none.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeSelector(pub u8);

impl ShapeSelector {
    pub const NONE: ShapeSelector = ShapeSelector(0);

    pub fn is_none(self) -> bool {
        self.0 == 0
    }

    /// The selector as a library key, or `None` for "no shape".
    pub fn key(self) -> Option<u8> {
        (!self.is_none()).then_some(self.0)
    }
}

impl From<u8> for ShapeSelector {
    fn from(value: u8) -> Self {
        ShapeSelector(value)
    }
}

/// Everything the motion engine needs from the hand for one frame.
///
/// Values are sanitized on construction: openness is clamped to `[0, 1]`
/// (NaN reads as 0) and a non-finite pointer is dropped.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ControlSignals {
    shape: ShapeSelector,
    openness: f32,
    pointer: Option<Vec3>,
}

impl ControlSignals {
    pub fn new(shape: ShapeSelector, openness: f32, pointer: Option<Vec3>) -> Self {
        let openness = if openness.is_nan() {
            0.0
        } else {
            openness.clamp(0.0, 1.0)
        };
        Self {
            shape,
            openness,
            pointer: pointer.filter(|p| p.is_finite()),
        }
    }

    /// Signals for a frame with no hand: no shape, closed, no pointer.
    pub fn neutral() -> Self {
        Self::default()
    }

    pub fn shape(&self) -> ShapeSelector {
        self.shape
    }

    pub fn openness(&self) -> f32 {
        self.openness
    }

    pub fn pointer(&self) -> Option<Vec3> {
        self.pointer
    }
}

/// Create a connected publisher/latch pair.
pub fn signal_channel() -> (Sender<ControlSignals>, SignalLatch) {
    let (tx, rx) = mpsc::channel();
    (
        tx,
        SignalLatch {
            rx,
            latest: ControlSignals::neutral(),
        },
    )
}

/// Receiving end of a signal channel that only remembers the newest value.
pub struct SignalLatch {
    rx: Receiver<ControlSignals>,
    latest: ControlSignals,
}

impl SignalLatch {
    /// Drain everything published since the last call and return the newest
    /// value. Returns the previous value when nothing was published.
    pub fn latest(&mut self) -> ControlSignals {
        if let Some(newest) = self.rx.try_iter().last() {
            self.latest = newest;
        }
        self.latest
    }

    /// The value returned by the last call to [`latest`](Self::latest).
    pub fn peek(&self) -> ControlSignals {
        self.latest
    }
}

/// Anything that can deliver hand frames, such as a camera-backed tracker
/// or a scripted replay.
pub trait LandmarkSource: Send + 'static {
    /// Deliver frames until the source is exhausted or the receiver hangs up.
    fn run(self: Box<Self>, tx: Sender<HandFrame>);
}

/// Run a landmark source on its own thread, classify every frame it
/// produces, and return the latch the render loop reads from.
pub fn spawn_classifier<S: LandmarkSource>(source: S, classifier: GestureClassifier) -> SignalLatch {
    let (frame_tx, frame_rx) = mpsc::channel::<HandFrame>();
    let (signal_tx, latch) = signal_channel();

    thread::spawn(move || Box::new(source).run(frame_tx));
    thread::spawn(move || {
        for frame in frame_rx {
            let signals = classifier.classify_frame(&frame);
            if signal_tx.send(signals).is_err() {
                return;
            }
        }
        log::debug!("landmark source finished");
    });

    latch
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand::Hand;

    #[test]
    fn test_signals_are_sanitized() {
        let s = ControlSignals::new(ShapeSelector(2), 1.7, Some(Vec3::new(f32::INFINITY, 0.0, 0.0)));
        assert_eq!(s.openness(), 1.0);
        assert!(s.pointer().is_none());

        let s = ControlSignals::new(ShapeSelector::NONE, f32::NAN, None);
        assert_eq!(s.openness(), 0.0);
    }

    #[test]
    fn test_selector_key() {
        assert_eq!(ShapeSelector::NONE.key(), None);
        assert_eq!(ShapeSelector(3).key(), Some(3));
    }

    #[test]
    fn test_latch_keeps_last_write() {
        let (tx, mut latch) = signal_channel();
        assert_eq!(latch.latest(), ControlSignals::neutral());

        tx.send(ControlSignals::new(ShapeSelector(1), 0.2, None)).unwrap();
        tx.send(ControlSignals::new(ShapeSelector(3), 0.9, None)).unwrap();
        let s = latch.latest();
        assert_eq!(s.shape(), ShapeSelector(3));

        // Nothing new: the stale value is reused.
        assert_eq!(latch.latest(), s);

        drop(tx);
        assert_eq!(latch.latest(), s);
    }

    struct Replay(Vec<HandFrame>);

    impl LandmarkSource for Replay {
        fn run(self: Box<Self>, tx: Sender<HandFrame>) {
            for frame in self.0 {
                if tx.send(frame).is_err() {
                    return;
                }
            }
        }
    }

    #[test]
    fn test_spawn_classifier_publishes_signals() {
        let pinched_open = Hand::resting()
            .with_point(crate::hand::HandLandmark::ThumbTip, crate::hand::Landmark::flat(0.2, 0.6));
        let mut latch = spawn_classifier(
            Replay(vec![HandFrame::empty(), HandFrame::single(pinched_open)]),
            GestureClassifier::default(),
        );

        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(5);
        while latch.latest().openness() < 1.0 && std::time::Instant::now() < deadline {
            thread::sleep(std::time::Duration::from_millis(1));
        }
        assert_eq!(latch.peek().openness(), 1.0);
        assert!(latch.peek().pointer().is_some());
    }
}
