pub mod states;
pub mod params;
pub mod engine;
pub mod motion;
pub mod launch;
pub mod particles;
pub mod catalog;
pub mod controller;
pub mod scenario;
