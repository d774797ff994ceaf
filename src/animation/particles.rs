//! Secondary spark burst released with the explosion
//!
//! Sparks fly out in random directions, shrink with remaining life and use the
//! same free-motion law as fragments.

use std::f64::consts::{PI, TAU};

use rand::Rng;

use crate::animation::launch::sample;
use crate::animation::motion::{free_step, MotionConstants};
use crate::animation::params::Parameters;
use crate::animation::states::{Kinematics, NVec3, Particle};

/// Spawn `p.particle_count` sparks at `origin`
pub fn spawn_burst<R: Rng>(origin: NVec3, p: &Parameters, rng: &mut R) -> Vec<Particle> {
    (0..p.particle_count)
        .map(|_| {
            // Uniform direction on the sphere
            let theta = sample(rng, 0.0, TAU);
            let cos_phi = sample(rng, -1.0, 1.0);
            let sin_phi = (1.0 - cos_phi * cos_phi).sqrt();
            let dir = NVec3::new(sin_phi * theta.cos(), sin_phi * theta.sin(), cos_phi);

            let speed = sample(rng, p.particle_speed_min, p.particle_speed_max) * p.speed_multiplier;
            let mut body = Kinematics::at(origin);
            body.v = dir * speed;
            body.spin = NVec3::new(sample(rng, -PI, PI), sample(rng, -PI, PI), 0.0) * 0.05;

            Particle {
                body,
                scale: p.particle_scale,
                life: p.particle_lifetime,
                lifetime: p.particle_lifetime,
                visible: true,
            }
        })
        .collect()
}

/// Advance all live sparks by one tick; returns how many are still alive
pub fn step_burst(particles: &mut [Particle], c: &MotionConstants, s: f64, dt: f64, base_scale: f64) -> usize {
    let mut alive = 0;
    for q in particles.iter_mut().filter(|q| q.visible) {
        free_step(&mut q.body, c, s);
        q.life -= dt;
        if q.life <= 0.0 {
            q.life = 0.0;
            q.visible = false;
            continue;
        }
        // Shrink linearly with remaining life
        q.scale = base_scale * q.life / q.lifetime;
        alive += 1;
    }
    alive
}
