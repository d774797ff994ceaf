//! Configuration types for loading shows from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! show. A show consists of:
//!
//! - [`EngineConfig`]     – shape, timing mode, seed
//! - [`Parameters`]       – animation and physics constants, read as-is
//! - [`LabelConfig`]      – one entry per fragment (optional, built-in catalogue otherwise)
//! - [`ShowConfig`]       – top-level wrapper used to load a show from YAML
//!
//! Every field is optional; anything left out takes the built-in default.
//!
//! # YAML format
//!
//! ```yaml
//! engine:
//!   shape: "hexagon"        # or "sphere"
//!   timing: "per_frame"     # or "scaled" (uses reference_hz)
//!   reference_hz: 60.0
//!   seed: 42
//!
//! parameters:
//!   boundary: 12.0
//!   restitution: 0.7
//!   damping: 0.997
//!   attraction: 0.05
//!   gravity_damping: 0.95
//!
//! labels:
//!   - name: "Technology"
//!     description: "Digital solutions."
//!     color: "#4a4aff"
//!     link: "/technology"
//! ```

use serde::Deserialize;

use crate::animation::engine::Shape;
use crate::animation::params::{Parameters, Timing};
use crate::animation::states::LabelRecord;
use crate::error::SetupError;

#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq)]
pub enum ShapeConfig {
    #[default]
    #[serde(rename = "hexagon")] // six-sided prism
    Hexagon,

    #[serde(rename = "sphere")]
    Sphere,
}

impl From<ShapeConfig> for Shape {
    fn from(s: ShapeConfig) -> Self {
        match s {
            ShapeConfig::Hexagon => Shape::Hexagon,
            ShapeConfig::Sphere => Shape::Sphere,
        }
    }
}

/// Whether motion is tied to the display refresh or to elapsed time
#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq)]
pub enum TimingConfig {
    #[default]
    #[serde(rename = "per_frame")] // one velocity step per rendered frame
    PerFrame,

    #[serde(rename = "scaled")] // velocity step scaled by dt * reference_hz
    Scaled,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct EngineConfig {
    pub shape: ShapeConfig,
    pub timing: TimingConfig,
    pub reference_hz: f64, // only read when timing is "scaled"
    pub seed: Option<u64>, // deterministic runs when set
    pub title: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            shape: ShapeConfig::default(),
            timing: TimingConfig::default(),
            reference_hz: 60.0,
            seed: None,
            title: "hexburst".to_string(),
        }
    }
}

/// Configuration for a single fragment label
#[derive(Deserialize, Debug, Clone)]
pub struct LabelConfig {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub color: String, // "#rrggbb"
    #[serde(default)]
    pub link: String,
}

impl LabelConfig {
    pub fn to_record(&self) -> Result<LabelRecord, SetupError> {
        Ok(LabelRecord {
            name: self.name.clone(),
            description: self.description.clone(),
            color: parse_hex_color(&self.color).ok_or_else(|| SetupError::InvalidColor {
                label: self.name.clone(),
                color: self.color.clone(),
            })?,
            link: self.link.clone(),
        })
    }
}

/// "#rrggbb" or "rrggbb" -> 0xRRGGBB
pub fn parse_hex_color(s: &str) -> Option<u32> {
    let hex = s.trim().trim_start_matches('#');
    // from_str_radix alone would let a leading sign through
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(hex, 16).ok()
}

/// Top-level show configuration loaded from YAML.
#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct ShowConfig {
    pub engine: EngineConfig, // shape, timing, seed
    pub parameters: Parameters, // animation constants
    pub labels: Option<Vec<LabelConfig>>, // built-in catalogue when absent
}

impl ShowConfig {
    /// Runtime parameters: constants plus timing and seed from the engine section
    pub fn to_parameters(&self) -> Parameters {
        let timing = match self.engine.timing {
            TimingConfig::PerFrame => Timing::PerFrame,
            TimingConfig::Scaled => Timing::Scaled {
                reference_hz: self.engine.reference_hz,
            },
        };
        Parameters {
            timing,
            seed: self.engine.seed,
            ..self.parameters.clone()
        }
    }
}
