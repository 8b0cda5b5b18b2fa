//! Error types for handswarm.
//!
//! Only setup can fail: loading glyph masks, registering targets and
//! validating configuration. Per-frame work (classification, stepping)
//! is total and never returns an error.

use std::fmt;

/// Errors that can occur while producing glyph targets.
#[derive(Debug)]
pub enum GlyphError {
    /// Failed to decode a glyph mask image.
    ImageLoad(image::ImageError),
    /// Failed to read a glyph mask from disk.
    Io(std::io::Error),
    /// The text produced no points, so it cannot act as a target.
    EmptyTarget { text: String },
}

impl fmt::Display for GlyphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GlyphError::ImageLoad(e) => write!(f, "Failed to load glyph mask: {}", e),
            GlyphError::Io(e) => write!(f, "Failed to read glyph mask file: {}", e),
            GlyphError::EmptyTarget { text } => {
                write!(f, "Text {:?} produced no glyph points", text)
            }
        }
    }
}

impl std::error::Error for GlyphError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GlyphError::ImageLoad(e) => Some(e),
            GlyphError::Io(e) => Some(e),
            GlyphError::EmptyTarget { .. } => None,
        }
    }
}

impl From<image::ImageError> for GlyphError {
    fn from(e: image::ImageError) -> Self {
        GlyphError::ImageLoad(e)
    }
}

impl From<std::io::Error> for GlyphError {
    fn from(e: std::io::Error) -> Self {
        GlyphError::Io(e)
    }
}

/// Errors that can occur when building a swarm.
#[derive(Debug)]
pub enum SwarmError {
    /// A configuration value is outside its valid range.
    InvalidConfig(String),
    /// Selector 0 means "no shape" and cannot hold a glyph target.
    ReservedSelector,
    /// Producing a glyph target failed.
    Glyph(GlyphError),
}

impl fmt::Display for SwarmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwarmError::InvalidConfig(msg) => write!(f, "Invalid swarm configuration: {}", msg),
            SwarmError::ReservedSelector => {
                write!(f, "Selector 0 is reserved for \"no shape\" and cannot hold a glyph")
            }
            SwarmError::Glyph(e) => write!(f, "Glyph error: {}", e),
        }
    }
}

impl std::error::Error for SwarmError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SwarmError::Glyph(e) => Some(e),
            _ => None,
        }
    }
}

impl From<GlyphError> for SwarmError {
    fn from(e: GlyphError) -> Self {
        SwarmError::Glyph(e)
    }
}
