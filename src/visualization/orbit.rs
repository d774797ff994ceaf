//! Damped orbit around the camera's look-at point
//!
//! The camera sits on a sphere around `target`: `theta` is the azimuth around
//! +Y (0 = on +Z), `phi` the polar angle from +Y. Drags queue rotation that is
//! applied a little every frame; the wheel changes the radius directly.

use std::f32::consts::{PI, TAU};

use bevy::prelude::*;

pub const MIN_DISTANCE: f32 = 3.0;
pub const MAX_DISTANCE: f32 = 25.0;

/// Share of the pending rotation applied per frame
pub const DAMPING: f32 = 0.05;

/// Radius factor per wheel step
pub const ZOOM_BASE: f32 = 0.95;

/// Pointer travel (px) below which a press-release is a click
pub const CLICK_SLOP: f32 = 4.0;

const POLE_MARGIN: f32 = 1e-3;

#[derive(Resource, Debug, Clone)]
pub struct OrbitControls {
    pub theta: f32,
    pub phi: f32,
    pub radius: f32,
    pub target: Vec3,
    pending_theta: f32,
    pending_phi: f32,
    drag_travel: f32,
}

impl OrbitControls {
    pub fn from_pose(position: Vec3, target: Vec3) -> Self {
        let mut orbit = Self {
            theta: 0.0,
            phi: PI / 2.0,
            radius: MIN_DISTANCE,
            target,
            pending_theta: 0.0,
            pending_phi: 0.0,
            drag_travel: 0.0,
        };
        orbit.resync(position, target);
        orbit
    }

    /// Take over a pose set from outside (a finished fly) and drop queued rotation
    pub fn resync(&mut self, position: Vec3, target: Vec3) {
        let offset = position - target;
        let r = offset.length();
        self.target = target;
        self.radius = r.clamp(MIN_DISTANCE, MAX_DISTANCE);
        if r > 0.0 {
            self.theta = offset.x.atan2(offset.z);
            self.phi = (offset.y / r).clamp(-1.0, 1.0).acos().clamp(POLE_MARGIN, PI - POLE_MARGIN);
        }
        self.pending_theta = 0.0;
        self.pending_phi = 0.0;
    }

    pub fn begin_drag(&mut self) {
        self.drag_travel = 0.0;
    }

    /// Queue rotation for a pointer move of `delta` px
    pub fn rotate(&mut self, delta: Vec2, viewport_height: f32) {
        let k = TAU / viewport_height.max(1.0);
        self.pending_theta -= delta.x * k;
        self.pending_phi -= delta.y * k;
        self.drag_travel += delta.length();
    }

    /// Positive steps move in
    pub fn zoom(&mut self, steps: f32) {
        self.radius = (self.radius * ZOOM_BASE.powf(steps)).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    /// True if the last press has not moved far enough to be a drag
    pub fn is_click(&self) -> bool {
        self.drag_travel < CLICK_SLOP
    }

    /// Apply one frame of the queued rotation and return the camera position
    pub fn update(&mut self) -> Vec3 {
        self.theta += self.pending_theta * DAMPING;
        self.phi = (self.phi + self.pending_phi * DAMPING).clamp(POLE_MARGIN, PI - POLE_MARGIN);
        self.pending_theta *= 1.0 - DAMPING;
        self.pending_phi *= 1.0 - DAMPING;
        self.position()
    }

    pub fn position(&self) -> Vec3 {
        let (sin_phi, cos_phi) = self.phi.sin_cos();
        let (sin_theta, cos_theta) = self.theta.sin_cos();
        self.target + self.radius * Vec3::new(sin_phi * sin_theta, cos_phi, sin_phi * cos_theta)
    }
}
