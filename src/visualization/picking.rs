//! Ray picking against bounding spheres
//!
//! Clicks are resolved to the nearest visible object whose bounding sphere the
//! cursor ray crosses.

use bevy::prelude::*;

/// Distance along the (normalized) ray to the first hit on the sphere
pub fn ray_sphere(origin: Vec3, dir: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let oc = origin - center;
    let b = oc.dot(dir);
    let c = oc.length_squared() - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let sq = disc.sqrt();
    let t0 = -b - sq;
    let t1 = -b + sq;
    if t0 >= 0.0 {
        Some(t0)
    } else if t1 >= 0.0 {
        Some(t1) // origin inside the sphere
    } else {
        None
    }
}

/// Index of the nearest hit among `(center, radius)` candidates
pub fn nearest_hit<I>(origin: Vec3, dir: Vec3, candidates: I) -> Option<usize>
where
    I: IntoIterator<Item = (usize, Vec3, f32)>,
{
    candidates
        .into_iter()
        .filter_map(|(i, c, r)| ray_sphere(origin, dir, c, r).map(|t| (i, t)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}
