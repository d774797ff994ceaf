pub mod camera;
pub mod orbit;
pub mod picking;
pub mod tuning;
pub mod viewer3d;
