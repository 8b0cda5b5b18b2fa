//! Runner configuration: the swarm itself plus what to show and a script
//! of hand poses to play through it.

use handswarm::SwarmConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

fn default_frame_delta() -> f32 {
    1.0 / 60.0
}

/// One scripted pose, held for a number of detector frames.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PoseStep {
    /// Detector frames to hold the pose for.
    pub frames: u32,
    /// Whether a hand is in view at all.
    #[serde(default = "default_present")]
    pub present: bool,
    /// Raised fingers, index first (0 to 4).
    #[serde(default)]
    pub fingers: u8,
    /// Desired openness in `[0, 1]`.
    #[serde(default)]
    pub openness: f32,
    /// Index fingertip in normalized image coordinates. Defaults to the
    /// finger's natural position.
    #[serde(default)]
    pub pointer: Option<[f32; 2]>,
}

fn default_present() -> bool {
    true
}

/// Complete runner configuration.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RunnerConfig {
    pub swarm: SwarmConfig,
    /// Text shown for each shape selector, drawn with the built-in font.
    pub texts: BTreeMap<u8, String>,
    /// Alpha-mask images for selectors, used instead of text when present.
    pub masks: BTreeMap<u8, PathBuf>,
    /// Render frames to simulate.
    pub frames: u64,
    /// Target render step in seconds.
    #[serde(default = "default_frame_delta")]
    pub frame_delta: f32,
    /// Milliseconds between detector frames.
    pub detector_interval_ms: u64,
    /// Log statistics every this many frames.
    pub log_every: u64,
    pub script: Vec<PoseStep>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        let texts = [(1, "Hello World!"), (2, "I am Sara"), (3, "Ready?")]
            .into_iter()
            .map(|(k, v)| (k, v.to_string()))
            .collect();

        let step = |frames, fingers, openness| PoseStep {
            frames,
            present: true,
            fingers,
            openness,
            pointer: None,
        };

        Self {
            swarm: SwarmConfig {
                seed: Some(7),
                ..SwarmConfig::default()
            },
            texts,
            masks: BTreeMap::new(),
            frames: 600,
            frame_delta: default_frame_delta(),
            detector_interval_ms: 33,
            log_every: 60,
            script: vec![
                step(20, 0, 1.0),
                step(40, 1, 1.0),
                step(30, 2, 0.3),
                PoseStep {
                    pointer: Some([0.5, 0.5]),
                    ..step(30, 2, 1.0)
                },
                step(30, 3, 0.6),
                PoseStep {
                    frames: 30,
                    present: false,
                    fingers: 0,
                    openness: 0.0,
                    pointer: None,
                },
            ],
        }
    }
}

impl RunnerConfig {
    /// Save the configuration to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Box<dyn std::error::Error>> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Box<dyn std::error::Error>> {
        let json = fs::read_to_string(path)?;
        let config = serde_json::from_str(&json)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_round_trips() {
        let config = RunnerConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: RunnerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_minimal_file() {
        let config: RunnerConfig = serde_json::from_str(
            r#"{ "frames": 10, "texts": { "1": "HI" }, "script": [ { "frames": 3, "fingers": 1 } ] }"#,
        )
        .unwrap();
        assert_eq!(config.frames, 10);
        assert_eq!(config.texts.get(&1).map(String::as_str), Some("HI"));
        assert!(config.script[0].present);
        assert_eq!(config.swarm.particle_count, 9000);
    }
}
