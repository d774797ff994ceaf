//! Explosion / reform controller
//!
//! Owns the central body, the fragment set and the spark burst, and moves them
//! through `Intact -> Exploding -> Exploded -> GravityCollapsing -> Intact`.
//! All progress happens in [`ExplosionController::tick`]; the trigger methods
//! only switch phase and are silent no-ops when their precondition does not
//! hold, so repeated clicks are harmless.
//!
//! Inserted into bevy as a `Resource` and driven by the viewer's frame loop,
//! but nothing here needs a render context: tests drive it with a fixed `dt`.

use bevy::log::{debug, info, warn};
use bevy::prelude::Resource;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::animation::catalog::MAX_FRAGMENTS;
use crate::animation::launch::{launch, launch_angles};
use crate::animation::motion::{free_step, gravity_step};
use crate::animation::params::Parameters;
use crate::animation::particles::{spawn_burst, step_burst};
use crate::animation::states::{
    AnimationState, CentralBody, ControllerEvent, Fragment, Kinematics, LabelRecord, Particle,
};
use crate::error::SetupError;

/// Internal bookkeeping behind the public `AnimationState`
#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Idle,
    Exploding { elapsed: f64, launched: bool },
    Drifting,
    Collapsing { elapsed: f64 },
    Reforming,
}

#[derive(Resource)]
pub struct ExplosionController {
    params: Parameters,
    labels: Vec<LabelRecord>,
    phase: Phase,
    body: CentralBody,
    fragments: Vec<Fragment>,
    particles: Vec<Particle>,
    focused: Option<usize>,
    events: Vec<ControllerEvent>,
    rng: StdRng,
}

impl ExplosionController {
    /// Build an intact controller. Fails when the label catalogue or the
    /// parameters cannot drive a full cycle.
    pub fn new(params: Parameters, labels: Vec<LabelRecord>) -> Result<Self, SetupError> {
        if labels.is_empty() {
            return Err(SetupError::NoLabels);
        }
        if labels.len() > MAX_FRAGMENTS {
            return Err(SetupError::TooManyLabels {
                count: labels.len(),
                max: MAX_FRAGMENTS,
            });
        }
        params.validate()?;

        let rng = match params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            body: CentralBody::nominal(params.nominal_opacity),
            params,
            labels,
            phase: Phase::Idle,
            fragments: Vec::new(),
            particles: Vec::new(),
            focused: None,
            events: Vec::new(),
            rng,
        })
    }

    // =========================================================================================
    // Triggers
    // =========================================================================================

    /// Start the explosion. Only valid while intact.
    pub fn trigger_explode(&mut self) {
        if self.phase != Phase::Idle {
            debug!("explode ignored in state {:?}", self.state());
            return;
        }

        // Fragments appear at the body, tiny and at rest, one angle each
        let origin = self.body.position();
        let angles = launch_angles(self.labels.len());
        self.fragments = self
            .labels
            .iter()
            .zip(angles)
            .map(|(label, launch_angle)| Fragment {
                body: Kinematics::at(origin),
                scale: self.params.fragment_spawn_scale,
                visible: true,
                launch_angle,
                label: label.clone(),
            })
            .collect();
        self.particles = spawn_burst(origin, &self.params, &mut self.rng);

        self.phase = Phase::Exploding {
            elapsed: 0.0,
            launched: false,
        };
        self.events.push(ControllerEvent::FragmentsSpawned(self.fragments.len()));
        self.events.push(ControllerEvent::ParticlesSpawned(self.particles.len()));
        info!("exploding into {} fragments", self.fragments.len());
    }

    /// Pull every fragment back to the origin. Only valid once exploded and
    /// while no collapse is running.
    pub fn trigger_gravity_pull(&mut self) {
        if self.phase != Phase::Drifting {
            debug!("gravity pull ignored in state {:?}", self.state());
            return;
        }
        self.focused = None;
        self.phase = Phase::Collapsing { elapsed: 0.0 };
        self.events.push(ControllerEvent::CollapseStarted);
        info!("gravity collapse started");
    }

    /// Regrow the central body. Runs once per collapse, when every fragment
    /// has been captured; calling it in any other phase does nothing.
    pub fn reform(&mut self) {
        if !matches!(self.phase, Phase::Collapsing { .. }) {
            return;
        }
        self.body.visible = true;
        self.body.scale = self.params.reform_start_scale;
        self.body.opacity = 0.0;
        self.phase = Phase::Reforming;
        self.events.push(ControllerEvent::ReformStarted);
        info!("reforming central body");
    }

    /// Hard reset from any state
    pub fn reset(&mut self) {
        self.phase = Phase::Idle;
        self.fragments.clear();
        self.particles.clear();
        self.focused = None;
        self.body = CentralBody::nominal(self.params.nominal_opacity);
        self.events.push(ControllerEvent::Reset);
        info!("scene reset");
    }

    // =========================================================================================
    // Per-frame step
    // =========================================================================================

    /// Advance every active animation by one frame of length `dt` seconds
    pub fn tick(&mut self, dt: f64) {
        let s = self.params.timing.frame_scale(dt);

        if self.body.visible {
            self.body.rot.y += self.params.rotation_speed * s;
        }

        match self.phase {
            Phase::Idle => {}
            Phase::Exploding { elapsed, launched } => self.step_exploding(elapsed + dt, launched, s),
            Phase::Drifting => {
                self.grow_fragments();
                self.drift_fragments(s);
            }
            Phase::Collapsing { elapsed } => self.step_collapsing(elapsed + dt, s),
            Phase::Reforming => self.step_reforming(),
        }

        if !self.particles.is_empty() {
            let c = self.params.motion();
            step_burst(&mut self.particles, &c, s, dt, self.params.particle_scale);
        }
    }

    fn step_exploding(&mut self, elapsed: f64, mut launched: bool, s: f64) {
        // Shrink the body until it vanishes
        if self.body.visible {
            self.body.scale *= self.params.shrink_scale_decay;
            self.body.opacity *= self.params.shrink_opacity_decay;
            if self.body.scale < self.params.shrink_epsilon {
                self.body.visible = false;
            }
        }

        // Launch once the fragments have been on screen a moment
        if !launched && elapsed >= self.params.launch_delay {
            launch(&mut self.fragments, &self.params, &mut self.rng);
            launched = true;
            self.events.push(ControllerEvent::Launched);
        }

        self.grow_fragments();
        self.drift_fragments(s);

        if launched && !self.body.visible {
            self.phase = Phase::Drifting;
            self.events.push(ControllerEvent::Exploded);
            debug!("explosion complete after {:.3}s", elapsed);
        } else {
            self.phase = Phase::Exploding { elapsed, launched };
        }
    }

    fn step_collapsing(&mut self, elapsed: f64, s: f64) {
        let c = self.params.motion();
        let stagger = self.params.gravity_stagger;

        for (i, f) in self.fragments.iter_mut().enumerate() {
            if !f.visible {
                continue;
            }
            if i as f64 * stagger <= elapsed {
                if gravity_step(&mut f.body, &mut f.scale, &self.params) {
                    f.visible = false;
                }
            } else {
                // Not pulled yet, keep drifting
                free_step(&mut f.body, &c, s);
            }
        }

        self.phase = Phase::Collapsing { elapsed };

        let radius = self.params.capture_radius;
        if self.fragments.iter().all(|f| !f.visible || f.distance_to_origin() < radius) {
            self.reform();
        }
    }

    fn step_reforming(&mut self) {
        let nominal = self.params.nominal_opacity;
        self.body.scale *= self.params.reform_growth;
        self.body.opacity = (self.body.opacity + self.params.reform_opacity_step).min(nominal);

        if self.body.scale >= 1.0 {
            self.body.scale = 1.0;
            self.body.opacity = nominal;
            self.fragments.clear();
            self.particles.clear();
            self.focused = None;
            self.phase = Phase::Idle;
            self.events.push(ControllerEvent::Reformed);
            info!("reformed");
        }
    }

    fn grow_fragments(&mut self) {
        let grow = self.params.fragment_grow;
        for f in self.fragments.iter_mut() {
            f.scale = (f.scale * grow).min(1.0);
        }
    }

    fn drift_fragments(&mut self, s: f64) {
        let c = self.params.motion();
        let focused = self.focused;
        for (i, f) in self.fragments.iter_mut().enumerate() {
            if !f.visible || focused == Some(i) {
                continue;
            }
            free_step(&mut f.body, &c, s);
        }
    }

    // =========================================================================================
    // Focus and tuning
    // =========================================================================================

    /// Freeze fragment `index` for a close-up and return its label
    pub fn focus(&mut self, index: usize) -> Option<&LabelRecord> {
        if !matches!(self.phase, Phase::Exploding { .. } | Phase::Drifting) {
            return None;
        }
        let f = self.fragments.get(index)?;
        if !f.visible {
            return None;
        }
        if self.focused != Some(index) {
            self.focused = Some(index);
            debug!("focused on {}", f.label.name);
        }
        Some(&f.label)
    }

    pub fn clear_focus(&mut self) {
        self.focused = None;
    }

    /// Change the fragment speed multiplier; live velocities are rescaled
    pub fn set_speed_multiplier(&mut self, multiplier: f64) {
        if !(multiplier > 0.0 && multiplier.is_finite()) {
            warn!("ignoring speed multiplier {}", multiplier);
            return;
        }
        let ratio = multiplier / self.params.speed_multiplier;
        self.params.speed_multiplier = multiplier;
        for f in self.fragments.iter_mut() {
            f.body.v *= ratio;
        }
        for q in self.particles.iter_mut() {
            q.body.v *= ratio;
        }
    }

    /// Body spin in rad per tick; negative spins the other way
    pub fn set_rotation_speed(&mut self, speed: f64) {
        if !speed.is_finite() {
            warn!("ignoring rotation speed {}", speed);
            return;
        }
        self.params.rotation_speed = speed;
    }

    // =========================================================================================
    // Read access for the host
    // =========================================================================================

    pub fn state(&self) -> AnimationState {
        match self.phase {
            Phase::Idle => AnimationState::Intact,
            Phase::Exploding { .. } => AnimationState::Exploding,
            Phase::Drifting => AnimationState::Exploded,
            Phase::Collapsing { .. } | Phase::Reforming => AnimationState::GravityCollapsing,
        }
    }

    pub fn is_reforming(&self) -> bool {
        self.phase == Phase::Reforming
    }

    pub fn body(&self) -> &CentralBody {
        &self.body
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// Host-side edits (e.g. hiding a fragment picked away by the scene)
    pub fn fragments_mut(&mut self) -> &mut [Fragment] {
        &mut self.fragments
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn focused(&self) -> Option<usize> {
        self.focused
    }

    pub fn focused_label(&self) -> Option<&LabelRecord> {
        self.focused.and_then(|i| self.fragments.get(i)).map(|f| &f.label)
    }

    pub fn labels(&self) -> &[LabelRecord] {
        &self.labels
    }

    pub fn params(&self) -> &Parameters {
        &self.params
    }

    /// Take everything recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<ControllerEvent> {
        std::mem::take(&mut self.events)
    }
}
