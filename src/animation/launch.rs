//! Launch law for exploding fragments
//!
//! Fragment i of N leaves radially at angle 2πi/N in the xy-plane with a
//! random speed from the configured band, a small random z component and a
//! small random spin.

use std::f64::consts::TAU;

use rand::Rng;

use crate::animation::params::Parameters;
use crate::animation::states::{Fragment, NVec3};

/// Evenly partitioned launch angles, one per fragment
pub fn launch_angles(n: usize) -> Vec<f64> {
    (0..n).map(|i| TAU * i as f64 / n as f64).collect()
}

/// Radial velocity in the xy-plane plus a z component
pub fn radial_velocity(angle: f64, speed: f64, vz: f64) -> NVec3 {
    NVec3::new(angle.cos() * speed, angle.sin() * speed, vz)
}

/// Give every fragment its launch velocity and spin
pub fn launch<R: Rng>(fragments: &mut [Fragment], p: &Parameters, rng: &mut R) {
    let lo = p.launch_speed_min * p.speed_multiplier;
    let hi = p.launch_speed_max * p.speed_multiplier;

    for f in fragments.iter_mut() {
        let speed = sample(rng, lo, hi);
        let vz = sample(rng, -p.launch_z_jitter, p.launch_z_jitter);
        f.body.v = radial_velocity(f.launch_angle, speed, vz);
        f.body.spin = NVec3::new(
            sample(rng, -p.spin_jitter, p.spin_jitter),
            sample(rng, -p.spin_jitter, p.spin_jitter),
            sample(rng, -p.spin_jitter, p.spin_jitter),
        );
    }
}

/// Uniform in [lo, hi), or `lo` for an empty band
pub(crate) fn sample<R: Rng>(rng: &mut R, lo: f64, hi: f64) -> f64 {
    if hi > lo {
        rng.gen_range(lo..hi)
    } else {
        lo
    }
}
