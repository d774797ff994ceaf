//! Build a ready-to-run show from configuration
//!
//! Takes a `ShowConfig` (YAML-facing) and produces the runtime bundle:
//! - engine settings (`Engine`: shape, title)
//! - an intact `ExplosionController` with parameters and labels
//!
//! The viewer splits the bundle into bevy resources; the headless benchmark
//! drives the controller directly.

use crate::animation::catalog::default_labels;
use crate::animation::controller::ExplosionController;
use crate::animation::engine::Engine;
use crate::animation::states::LabelRecord;
use crate::configuration::config::ShowConfig;
use crate::error::SetupError;

pub struct Show {
    pub engine: Engine,
    pub controller: ExplosionController,
}

impl Show {
    pub fn build_show(cfg: ShowConfig) -> Result<Self, SetupError> {
        // Labels: configured list, built-in catalogue otherwise
        let labels: Vec<LabelRecord> = match &cfg.labels {
            Some(list) => list.iter().map(|l| l.to_record()).collect::<Result<_, _>>()?,
            None => default_labels(),
        };

        let parameters = cfg.to_parameters();

        let engine = Engine {
            shape: cfg.engine.shape.into(),
            title: cfg.engine.title.clone(),
        };

        let controller = ExplosionController::new(parameters, labels)?;

        Ok(Self { engine, controller })
    }
}
