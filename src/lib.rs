//! # handswarm
//!
//! A particle swarm that morphs between a diffuse cloud and text glyphs,
//! steered by a tracked hand.
//!
//! handswarm owns the two parts with real logic in them: turning hand
//! landmarks into control signals, and moving particles in response. The
//! camera feed, the hand tracker, the renderer and the frame scheduler are
//! left to the host.
//!
//! ## Quick Start
//!
//! ```ignore
//! use handswarm::prelude::*;
//!
//! let font = BitmapFont::default();
//! let mut swarm = Swarm::builder()
//!     .with_particle_count(9000)
//!     .with_spawn_radius(260.0)
//!     .with_text(1, "Hello World!", &font)
//!     .with_text(2, "I am Sara", &font)
//!     .with_text(3, "Ready?", &font)
//!     .build()?;
//!
//! let classifier = GestureClassifier::default();
//! let mut clock = FrameClock::default();
//!
//! loop {
//!     let signals = classifier.classify_frame(&tracker.latest_frame());
//!     swarm.tick(&signals, clock.tick());
//!     renderer.upload(swarm.position_bytes());
//! }
//! ```
//!
//! ## Gesture → Signal mapping
//!
//! | Gesture | Signal |
//! |---|---|
//! | 1, 2 or 3 fingers raised (thumb ignored) | shape selector 1, 2 or 3 |
//! | fist or 4 fingers | no shape: particles return to the cloud |
//! | thumb ↔ middle fingertip spread | openness 0 (pinched) … 1 (open) |
//! | index fingertip | pointer that pushes nearby particles away |
//!
//! ## Data flow
//!
//! ```text
//! HandFrame ─► GestureClassifier ─► ControlSignals ─► Swarm::tick ─► positions
//!                                                        ▲
//!                          text ─► GlyphPointProvider ───┘ (once, at setup)
//! ```
//!
//! When the tracker runs on its own thread, [`control::spawn_classifier`]
//! classifies its frames there and the render loop reads the newest signals
//! from a [`control::SignalLatch`].

pub mod camera;
pub mod config;
pub mod control;
pub mod error;
pub mod font;
pub mod gesture;
pub mod glyph;
pub mod hand;
pub mod motion;
pub mod particle;
pub mod spawn;
pub mod swarm;
pub mod time;

pub use bytemuck;
pub use camera::Camera;
pub use config::SwarmConfig;
pub use control::{ControlSignals, ShapeSelector, SignalLatch};
pub use error::{GlyphError, SwarmError};
pub use font::BitmapFont;
pub use gesture::{GestureClassifier, GestureConfig};
pub use glam::{Vec2, Vec3};
pub use glyph::{target_for, GlyphLibrary, GlyphPointProvider, GlyphTarget, MaskSampler};
pub use hand::{Finger, Hand, HandFrame, HandLandmark, Landmark};
pub use motion::{Falloff, MotionConfig, MotionEngine};
pub use particle::ParticleStore;
pub use swarm::{Swarm, SwarmBuilder, TickStats};
pub use time::FrameClock;

/// Everything needed to build and drive a swarm.
pub mod prelude {
    pub use crate::camera::Camera;
    pub use crate::config::SwarmConfig;
    pub use crate::control::{signal_channel, spawn_classifier, ControlSignals, LandmarkSource, ShapeSelector, SignalLatch};
    pub use crate::error::{GlyphError, SwarmError};
    pub use crate::font::BitmapFont;
    pub use crate::gesture::{GestureClassifier, GestureConfig};
    pub use crate::glyph::{GlyphPointProvider, GlyphTarget, MaskSampler};
    pub use crate::hand::{Finger, Hand, HandFrame, HandLandmark, Landmark};
    pub use crate::motion::{Falloff, MotionConfig};
    pub use crate::swarm::{Swarm, SwarmBuilder, TickStats};
    pub use crate::time::FrameClock;
    pub use glam::{Vec2, Vec3};
}
