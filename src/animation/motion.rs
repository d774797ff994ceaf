//! Motion laws for movable bodies
//!
//! Fragments and burst particles share one free-motion step (drift, spin,
//! inelastic per-axis bounce, damping). Fragments additionally use the
//! gravity step while collapsing back to the origin.

use crate::animation::params::Parameters;
use crate::animation::states::{Kinematics, NVec3};

/// Physical constants of the free-motion law
#[derive(Debug, Clone, Copy)]
pub struct MotionConstants {
    pub boundary: f64, // |x_i| limit per axis
    pub restitution: f64, // fraction of velocity kept on bounce
    pub damping: f64, // velocity multiplier per tick
}

/// Advance one free-motion tick. `s` is the frame scale from `Timing`.
pub fn free_step(k: &mut Kinematics, c: &MotionConstants, s: f64) {
    // Drift: x += v, rot += spin
    k.x += s * k.v;
    k.rot += s * k.spin;

    // Bounce each axis independently
    for axis in 0..3 {
        bounce_axis(k, axis, c);
    }

    // Damping applies whether or not we bounced
    k.v *= c.damping;
}

/// Reflect one axis off the boundary: flip and scale the velocity component
/// by restitution, clamp position to ±boundary keeping its sign
pub fn bounce_axis(k: &mut Kinematics, axis: usize, c: &MotionConstants) -> bool {
    if k.x[axis].abs() > c.boundary {
        k.v[axis] *= -c.restitution;
        k.x[axis] = k.x[axis].signum() * c.boundary;
        true
    } else {
        false
    }
}

/// One tick of the gravity pull toward the origin.
/// Returns `true` once the body has been captured (within `capture_radius`),
/// counting a step whose path crossed the capture sphere as captured too.
pub fn gravity_step(k: &mut Kinematics, scale: &mut f64, p: &Parameters) -> bool {
    let start = k.x;

    // Unit direction to origin (zero when already there)
    let dist = k.x.norm();
    let dir = if dist > 0.0 { -k.x / dist } else { NVec3::zeros() };

    // Pull, then strong damping so the collapse converges
    k.v += dir * p.attraction;
    k.v *= p.gravity_damping;
    k.x += k.v;

    // Spin-down and shrink
    k.rot += k.spin;
    k.spin *= p.spin_decay;
    *scale *= p.collapse_shrink;

    if k.x.norm() < p.capture_radius {
        return true;
    }

    // Fast fragments can step over the capture sphere; catch them on the way
    let closest = closest_to_origin(&start, &k.x);
    if closest.norm() < p.capture_radius {
        k.x = closest;
        return true;
    }
    false
}

/// Closest point to the origin on segment a-b
pub fn closest_to_origin(a: &NVec3, b: &NVec3) -> NVec3 {
    let d = b - a;
    let len2 = d.norm_squared();
    if len2 == 0.0 {
        return *a;
    }
    let t = (-a.dot(&d) / len2).clamp(0.0, 1.0);
    a + t * d
}
