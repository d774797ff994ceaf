//! Camera fly-to for fragment focus
//!
//! A focus moves the camera to `fragment + FOCUS_OFFSET` looking at the
//! fragment; leaving focus flies back to the overview pose. Both use an
//! ease-out-cubic blend over `FLY_SECONDS`.

use bevy::prelude::*;

/// Overview pose: on +Z looking at the origin
pub const OVERVIEW_POSITION: Vec3 = Vec3::new(0.0, 0.0, 12.0);

/// Camera offset from a focused fragment
pub const FOCUS_OFFSET: Vec3 = Vec3::new(3.0, 2.0, 3.0);

pub const FLY_SECONDS: f32 = 1.0;

/// 1 - (1 - t)^3, clamped to [0, 1]
pub fn ease_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

#[derive(Debug, Clone)]
pub struct CameraTween {
    pub from_pos: Vec3,
    pub to_pos: Vec3,
    pub from_target: Vec3,
    pub to_target: Vec3,
    pub elapsed: f32,
    pub duration: f32,
}

impl CameraTween {
    pub fn new(from_pos: Vec3, from_target: Vec3, to_pos: Vec3, to_target: Vec3) -> Self {
        Self {
            from_pos,
            to_pos,
            from_target,
            to_target,
            elapsed: 0.0,
            duration: FLY_SECONDS,
        }
    }

    /// Position and look-at point at the current progress
    pub fn sample(&self) -> (Vec3, Vec3) {
        let k = if self.duration > 0.0 {
            ease_out_cubic(self.elapsed / self.duration)
        } else {
            1.0
        };
        (self.from_pos.lerp(self.to_pos, k), self.from_target.lerp(self.to_target, k))
    }

    pub fn advance(&mut self, dt: f32) -> (Vec3, Vec3) {
        self.elapsed = (self.elapsed + dt).min(self.duration);
        self.sample()
    }

    pub fn finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// Current look-at point plus the running fly, if any
#[derive(Resource, Debug, Clone)]
pub struct CameraRig {
    pub target: Vec3,
    pub tween: Option<CameraTween>,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            tween: None,
        }
    }
}

impl CameraRig {
    /// Fly from `current` to look at `target` from `target + FOCUS_OFFSET`
    pub fn fly_to_focus(&mut self, current: Vec3, target: Vec3) {
        self.tween = Some(CameraTween::new(current, self.target, target + FOCUS_OFFSET, target));
    }

    pub fn fly_to_overview(&mut self, current: Vec3) {
        self.tween = Some(CameraTween::new(current, self.target, OVERVIEW_POSITION, Vec3::ZERO));
    }

    /// Step the fly; returns the new pose while one is running
    pub fn advance(&mut self, dt: f32) -> Option<(Vec3, Vec3)> {
        let tween = self.tween.as_mut()?;
        let (pos, target) = tween.advance(dt);
        self.target = target;
        if tween.finished() {
            self.tween = None;
        }
        Some((pos, target))
    }
}
