//! Numerical and physical parameters for the showcase
//!
//! `Parameters` holds runtime settings:
//! - body shrink / reform constants,
//! - launch band and jitter,
//! - free-motion law (boundary, restitution, damping),
//! - gravity collapse constants and stagger,
//! - particle burst settings, timing mode and seed
//!
//! The same struct is read from the `parameters:` section of a show file.
//! Timing and seed live in the `engine:` section and are filled in by
//! [`crate::configuration::config::ShowConfig::to_parameters`].

use serde::Deserialize;

use crate::animation::motion::MotionConstants;
use crate::error::SetupError;

/// How free motion couples to the frame clock
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Timing {
    /// position += velocity once per tick, whatever the frame rate
    PerFrame,
    /// position += velocity * dt * reference_hz
    Scaled { reference_hz: f64 },
}

impl Timing {
    /// Multiplier applied to velocity and spin for a tick of length `dt`
    pub fn frame_scale(&self, dt: f64) -> f64 {
        match self {
            Timing::PerFrame => 1.0,
            Timing::Scaled { reference_hz } => dt * reference_hz,
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Parameters {
    // central body
    pub rotation_speed: f64, // rad per tick around y while visible
    pub nominal_opacity: f64, // body opacity when intact
    pub shrink_scale_decay: f64, // scale *= this per tick while exploding
    pub shrink_opacity_decay: f64, // opacity *= this per tick while exploding
    pub shrink_epsilon: f64, // body hidden once scale drops below
    pub reform_start_scale: f64, // body scale when reform begins
    pub reform_growth: f64, // scale *= this per tick while reforming
    pub reform_opacity_step: f64, // opacity += this per tick while reforming

    // fragments
    pub fragment_spawn_scale: f64, // near-zero scale at spawn
    pub fragment_grow: f64, // scale *= this per tick until 1
    pub launch_delay: f64, // seconds between spawn and launch
    pub launch_speed_min: f64, // radial speed band (per tick)
    pub launch_speed_max: f64,
    pub launch_z_jitter: f64, // z velocity in ±
    pub spin_jitter: f64, // rotation velocity in ± per axis
    pub speed_multiplier: f64, // live tuning knob

    // free motion
    pub boundary: f64, // |x_i| limit per axis
    pub restitution: f64, // velocity kept (and flipped) on bounce
    pub damping: f64, // velocity *= this every tick

    // gravity collapse
    pub attraction: f64, // v += dir * attraction
    pub gravity_damping: f64, // v *= this
    pub spin_decay: f64, // spin *= this
    pub collapse_shrink: f64, // scale *= this
    pub capture_radius: f64, // hidden once within this distance of origin
    pub gravity_stagger: f64, // seconds of delay per fragment index

    // particle burst
    pub particle_count: usize,
    pub particle_speed_min: f64,
    pub particle_speed_max: f64,
    pub particle_lifetime: f64, // seconds
    pub particle_scale: f64,

    #[serde(skip)]
    pub timing: Timing,
    #[serde(skip)]
    pub seed: Option<u64>, // deterministic seed, entropy when None
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            rotation_speed: 0.005,
            nominal_opacity: 0.8,
            shrink_scale_decay: 0.88,
            shrink_opacity_decay: 0.85,
            shrink_epsilon: 0.01,
            reform_start_scale: 0.01,
            reform_growth: 1.08,
            reform_opacity_step: 0.05,

            fragment_spawn_scale: 0.01,
            fragment_grow: 1.15,
            launch_delay: 0.1,
            launch_speed_min: 0.15,
            launch_speed_max: 0.3,
            launch_z_jitter: 0.05,
            spin_jitter: 0.02,
            speed_multiplier: 1.0,

            boundary: 12.0,
            restitution: 0.7,
            damping: 0.997,

            attraction: 0.05,
            gravity_damping: 0.95,
            spin_decay: 0.98,
            collapse_shrink: 0.99,
            capture_radius: 0.1,
            gravity_stagger: 0.05,

            particle_count: 60,
            particle_speed_min: 0.1,
            particle_speed_max: 0.4,
            particle_lifetime: 1.5,
            particle_scale: 0.08,

            timing: Timing::PerFrame,
            seed: None,
        }
    }
}

impl Parameters {
    /// Free-motion constants shared by fragments and particles
    pub fn motion(&self) -> MotionConstants {
        MotionConstants {
            boundary: self.boundary,
            restitution: self.restitution,
            damping: self.damping,
        }
    }

    /// Reject constants that would stall or blow up an animation loop
    pub fn validate(&self) -> Result<(), SetupError> {
        finite("rotation_speed", self.rotation_speed)?;
        unit_closed("nominal_opacity", self.nominal_opacity)?;
        // decays must be in (0, 1) so the loops terminate
        unit_open("shrink_scale_decay", self.shrink_scale_decay)?;
        unit_open("shrink_opacity_decay", self.shrink_opacity_decay)?;
        unit_open("gravity_damping", self.gravity_damping)?;
        unit_half_open("damping", self.damping)?;
        unit_half_open("restitution", self.restitution)?;
        unit_half_open("spin_decay", self.spin_decay)?;
        unit_half_open("collapse_shrink", self.collapse_shrink)?;
        positive("shrink_epsilon", self.shrink_epsilon)?;
        positive("capture_radius", self.capture_radius)?;
        positive("boundary", self.boundary)?;
        positive("attraction", self.attraction)?;
        positive("reform_start_scale", self.reform_start_scale)?;
        positive("reform_opacity_step", self.reform_opacity_step)?;
        positive("fragment_spawn_scale", self.fragment_spawn_scale)?;
        if !(self.reform_growth > 1.0 && self.reform_growth.is_finite()) {
            return Err(SetupError::InvalidParameter { name: "reform_growth", value: self.reform_growth });
        }
        if !(self.fragment_grow >= 1.0 && self.fragment_grow.is_finite()) {
            return Err(SetupError::InvalidParameter { name: "fragment_grow", value: self.fragment_grow });
        }
        positive("launch_speed_min", self.launch_speed_min)?;
        at_least("launch_speed_max", self.launch_speed_max, self.launch_speed_min)?;
        non_negative("particle_speed_min", self.particle_speed_min)?;
        at_least("particle_speed_max", self.particle_speed_max, self.particle_speed_min)?;
        non_negative("particle_scale", self.particle_scale)?;
        positive("speed_multiplier", self.speed_multiplier)?;
        non_negative("launch_delay", self.launch_delay)?;
        non_negative("gravity_stagger", self.gravity_stagger)?;
        non_negative("launch_z_jitter", self.launch_z_jitter)?;
        non_negative("spin_jitter", self.spin_jitter)?;
        non_negative("particle_lifetime", self.particle_lifetime)?;
        if let Timing::Scaled { reference_hz } = self.timing {
            positive("reference_hz", reference_hz)?;
        }
        Ok(())
    }
}

fn finite(name: &'static str, value: f64) -> Result<(), SetupError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SetupError::InvalidParameter { name, value })
    }
}

/// Upper end of a band; NaN on either side fails
fn at_least(name: &'static str, value: f64, floor: f64) -> Result<(), SetupError> {
    if value >= floor && value.is_finite() {
        Ok(())
    } else {
        Err(SetupError::InvalidParameter { name, value })
    }
}

fn unit_closed(name: &'static str, value: f64) -> Result<(), SetupError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(SetupError::InvalidParameter { name, value })
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), SetupError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(SetupError::InvalidParameter { name, value })
    }
}

fn non_negative(name: &'static str, value: f64) -> Result<(), SetupError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(SetupError::InvalidParameter { name, value })
    }
}

fn unit_open(name: &'static str, value: f64) -> Result<(), SetupError> {
    if value > 0.0 && value < 1.0 {
        Ok(())
    } else {
        Err(SetupError::InvalidParameter { name, value })
    }
}

fn unit_half_open(name: &'static str, value: f64) -> Result<(), SetupError> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(SetupError::InvalidParameter { name, value })
    }
}
