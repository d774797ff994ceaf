//! Viewer-side knobs: wireframe overlays, body color, light intensity and
//! the rotation-speed step

use bevy::prelude::*;

/// Body colors cycled with `C`, the first is the default
pub const BODY_PALETTE: [u32; 5] = [0x4a4aff, 0xd4e157, 0xff6b6b, 0x26a69a, 0xffffff];

/// Key light illuminance at intensity 1
pub const KEY_LIGHT_LUX: f32 = 8000.0;

pub const LIGHT_STEP: f32 = 0.1;
pub const LIGHT_MAX: f32 = 2.0;

pub const ROTATION_STEP: f64 = 0.0025;
pub const ROTATION_MAX: f64 = 0.05;

#[derive(Resource, Debug, Clone)]
pub struct ViewTuning {
    pub wireframe: bool,
    pub palette_index: usize,
    pub light_intensity: f32,
}

impl Default for ViewTuning {
    fn default() -> Self {
        Self {
            wireframe: true,
            palette_index: 0,
            light_intensity: 1.0,
        }
    }
}

impl ViewTuning {
    pub fn body_color(&self) -> u32 {
        BODY_PALETTE[self.palette_index % BODY_PALETTE.len()]
    }

    pub fn next_body_color(&mut self) -> u32 {
        self.palette_index = (self.palette_index + 1) % BODY_PALETTE.len();
        self.body_color()
    }

    pub fn toggle_wireframe(&mut self) -> bool {
        self.wireframe = !self.wireframe;
        self.wireframe
    }

    /// Nudge the intensity by `steps` increments, staying in [0, LIGHT_MAX]
    pub fn adjust_light(&mut self, steps: f32) -> f32 {
        // round to the step grid so repeated presses land on 0 and the max exactly
        let raw = self.light_intensity + steps * LIGHT_STEP;
        self.light_intensity = ((raw / LIGHT_STEP).round() * LIGHT_STEP).clamp(0.0, LIGHT_MAX);
        self.light_intensity
    }

    pub fn key_light_lux(&self) -> f32 {
        KEY_LIGHT_LUX * self.light_intensity
    }
}

/// Rotation speed after `steps` key presses from `current`
pub fn stepped_rotation_speed(current: f64, steps: f64) -> f64 {
    (current + steps * ROTATION_STEP).clamp(0.0, ROTATION_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_wraps_back_to_default() {
        let mut t = ViewTuning::default();
        assert_eq!(t.body_color(), 0x4a4aff);
        for _ in 0..BODY_PALETTE.len() - 1 {
            assert_ne!(t.next_body_color(), 0x4a4aff);
        }
        assert_eq!(t.next_body_color(), 0x4a4aff);
    }

    #[test]
    fn light_stays_in_range() {
        let mut t = ViewTuning::default();
        assert_eq!(t.key_light_lux(), KEY_LIGHT_LUX);
        for _ in 0..30 {
            t.adjust_light(-1.0);
        }
        assert_eq!(t.light_intensity, 0.0);
        assert_eq!(t.key_light_lux(), 0.0);
        for _ in 0..30 {
            t.adjust_light(1.0);
        }
        assert_eq!(t.light_intensity, LIGHT_MAX);
    }

    #[test]
    fn wireframe_starts_on_and_toggles() {
        let mut t = ViewTuning::default();
        assert!(t.wireframe);
        assert!(!t.toggle_wireframe());
        assert!(t.toggle_wireframe());
    }

    #[test]
    fn rotation_steps_are_clamped() {
        assert!((stepped_rotation_speed(0.005, 1.0) - 0.0075).abs() < 1e-12);
        assert_eq!(stepped_rotation_speed(0.001, -1.0), 0.0);
        assert_eq!(stepped_rotation_speed(0.049, 1.0), ROTATION_MAX);
    }
}
