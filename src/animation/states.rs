//! Core state types for the explosion showcase.
//!
//! - `Kinematics` holds the movable part shared by fragments and particles
//! - `Fragment` / `Particle` wrap it with scale, visibility and payload
//! - `CentralBody` is the intact shape at the origin
//! - `AnimationState` is the controller's single active state

use nalgebra::Vector3;
pub type NVec3 = Vector3<f64>;

/// Immutable label carried by a fragment (content category)
#[derive(Debug, Clone, PartialEq)]
pub struct LabelRecord {
    pub name: String,
    pub description: String,
    pub color: u32, // 0xRRGGBB
    pub link: String,
}

/// Position / velocity / rotation / rotation-velocity of a movable body
#[derive(Debug, Clone, Default)]
pub struct Kinematics {
    pub x: NVec3, // position
    pub v: NVec3, // velocity
    pub rot: NVec3, // euler rotation (xyz)
    pub spin: NVec3, // rotation velocity
}

impl Kinematics {
    /// At rest at `x`
    pub fn at(x: NVec3) -> Self {
        Self {
            x,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct Fragment {
    pub body: Kinematics,
    pub scale: f64,
    pub visible: bool,
    pub launch_angle: f64, // radians in the xy-plane, 2πi/N
    pub label: LabelRecord,
}

impl Fragment {
    pub fn is_launched(&self) -> bool {
        self.body.v.norm_squared() > 0.0
    }

    pub fn distance_to_origin(&self) -> f64 {
        self.body.x.norm()
    }
}

/// One spark of the secondary burst
#[derive(Debug, Clone)]
pub struct Particle {
    pub body: Kinematics,
    pub scale: f64,
    pub life: f64, // seconds left
    pub lifetime: f64, // seconds at spawn
    pub visible: bool,
}

/// The intact shape, fixed at the world origin
#[derive(Debug, Clone)]
pub struct CentralBody {
    pub scale: f64,
    pub opacity: f64,
    pub visible: bool,
    pub rot: NVec3,
}

impl CentralBody {
    pub fn nominal(opacity: f64) -> Self {
        Self {
            scale: 1.0,
            opacity,
            visible: true,
            rot: NVec3::zeros(),
        }
    }

    /// Always the origin
    pub fn position(&self) -> NVec3 {
        NVec3::zeros()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationState {
    Intact,
    Exploding,
    Exploded,
    GravityCollapsing,
}

/// Things that happened during the last operations, drained by the host
/// to create or destroy scene objects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerEvent {
    FragmentsSpawned(usize),
    ParticlesSpawned(usize),
    Launched,
    Exploded,
    CollapseStarted,
    ReformStarted,
    Reformed,
    Reset,
}
