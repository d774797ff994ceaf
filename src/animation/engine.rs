//! High-level show settings
//!
//! Selects the central shape drawn by the viewer; the controller itself is
//! shape-agnostic.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Shape {
    #[default]
    Hexagon, // six-sided prism
    Sphere,
}

#[derive(Debug, Clone)]
pub struct Engine {
    pub shape: Shape,
    pub title: String, // window title
}
