pub mod animation;
pub mod configuration;
pub mod visualization;
pub mod benchmark;
pub mod error;

pub use animation::states::{AnimationState, CentralBody, ControllerEvent, Fragment, Kinematics, LabelRecord, NVec3, Particle};
pub use animation::params::{Parameters, Timing};
pub use animation::engine::{Engine, Shape};
pub use animation::controller::ExplosionController;
pub use animation::scenario::Show;
pub use animation::catalog::{default_labels, MAX_FRAGMENTS};

pub use configuration::config::{EngineConfig, LabelConfig, ShowConfig};

pub use visualization::viewer3d::run_show;

pub use benchmark::benchmark::{bench_cycle, bench_cycles, bench_fragment_counts, CycleReport};

pub use error::SetupError;
