use std::f64::consts::TAU;
use std::fs::File;
use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::SeedableRng;

use hexburst::animation::launch::launch;
use hexburst::animation::motion::{bounce_axis, free_step, gravity_step};
use hexburst::{
    bench_cycle, default_labels, AnimationState, ControllerEvent, ExplosionController, Kinematics, NVec3,
    Parameters, Show, ShowConfig, Timing, MAX_FRAGMENTS,
};

const DT: f64 = 1.0 / 60.0;
const MAX_TICKS: usize = 10_000;

/// Seeded controller with the first `n` built-in labels
pub fn controller(n: usize) -> ExplosionController {
    let params = Parameters {
        seed: Some(11),
        ..Default::default()
    };
    ExplosionController::new(params, default_labels()[..n].to_vec()).unwrap()
}

/// Tick until `state` is reached, panicking if it never is
pub fn tick_until(ctl: &mut ExplosionController, state: AnimationState) -> usize {
    for ticks in 0..MAX_TICKS {
        if ctl.state() == state {
            return ticks;
        }
        ctl.tick(DT);
    }
    panic!("never reached {:?}, stuck in {:?}", state, ctl.state());
}

/// Explode and wait for the fragments to be out and moving
pub fn exploded(n: usize) -> ExplosionController {
    let mut ctl = controller(n);
    ctl.trigger_explode();
    tick_until(&mut ctl, AnimationState::Exploded);
    ctl
}

fn count(events: &[ControllerEvent], wanted: ControllerEvent) -> usize {
    events.iter().filter(|e| **e == wanted).count()
}

fn assert_intact(ctl: &ExplosionController) {
    assert_eq!(ctl.state(), AnimationState::Intact);
    assert!(ctl.fragments().is_empty(), "fragments left: {}", ctl.fragments().len());
    assert!(ctl.particles().is_empty());
    assert!(ctl.focused().is_none());
    let body = ctl.body();
    assert!(body.visible);
    assert_eq!(body.scale, 1.0);
    assert_eq!(body.opacity, ctl.params().nominal_opacity);
}

// ==================================================================================
// Explosion tests
// ==================================================================================

#[test]
fn launch_angles_partition_the_circle() {
    for n in 1..=MAX_FRAGMENTS {
        let mut ctl = controller(n);
        ctl.trigger_explode();

        let angles: Vec<f64> = ctl.fragments().iter().map(|f| f.launch_angle).collect();
        assert_eq!(angles.len(), n);
        for (i, a) in angles.iter().enumerate() {
            assert_eq!(*a, TAU * i as f64 / n as f64);
        }
        // No duplicates
        for i in 0..n {
            for j in (i + 1)..n {
                assert!((angles[i] - angles[j]).abs() > 1e-9);
            }
        }
    }
}

#[test]
fn launch_velocity_follows_angle_within_band() {
    let p = Parameters::default();
    let mut ctl = controller(MAX_FRAGMENTS);
    ctl.trigger_explode();
    let mut fragments = ctl.fragments().to_vec();

    let mut rng = StdRng::seed_from_u64(5);
    launch(&mut fragments, &p, &mut rng);

    for f in &fragments {
        let xy = (f.body.v.x * f.body.v.x + f.body.v.y * f.body.v.y).sqrt();
        assert!(xy >= p.launch_speed_min - 1e-12 && xy < p.launch_speed_max + 1e-12, "speed {} out of band", xy);
        let heading = f.body.v.y.atan2(f.body.v.x).rem_euclid(TAU);
        let diff = (heading - f.launch_angle).abs();
        assert!(diff < 1e-9 || (diff - TAU).abs() < 1e-9, "heading {} vs angle {}", heading, f.launch_angle);
        assert!(f.body.v.z.abs() <= p.launch_z_jitter);
        assert!(f.body.spin.iter().all(|s| s.abs() <= p.spin_jitter));
    }
}

#[test]
fn body_shrink_is_strictly_decreasing_and_terminates() {
    let mut ctl = controller(MAX_FRAGMENTS);
    let p = ctl.params().clone();
    ctl.trigger_explode();

    // scale * decay^k < eps  =>  k > ln(eps) / ln(decay)
    let bound = (p.shrink_epsilon.ln() / p.shrink_scale_decay.ln()).ceil() as usize + 1;

    let mut last = ctl.body().scale;
    let mut steps = 0;
    while ctl.body().visible {
        ctl.tick(DT);
        steps += 1;
        assert!(ctl.body().scale < last);
        last = ctl.body().scale;
        assert!(steps <= bound, "shrink did not terminate within {} steps", bound);
    }
    assert!(last < p.shrink_epsilon);
}

#[test]
fn exploded_state_has_hidden_body_and_moving_fragments() {
    let ctl = exploded(MAX_FRAGMENTS);
    assert!(!ctl.body().visible);
    assert_eq!(ctl.fragments().len(), MAX_FRAGMENTS);
    assert!(ctl.fragments().iter().all(|f| f.visible && f.is_launched()));
}

#[test]
fn explode_twice_spawns_one_set() {
    let mut ctl = controller(MAX_FRAGMENTS);
    ctl.trigger_explode();
    ctl.tick(DT);
    ctl.trigger_explode();
    assert_eq!(ctl.fragments().len(), MAX_FRAGMENTS);

    let events = ctl.drain_events();
    assert_eq!(count(&events, ControllerEvent::FragmentsSpawned(MAX_FRAGMENTS)), 1);
}

// ==================================================================================
// Free motion tests
// ==================================================================================

#[test]
fn bounce_loses_energy_and_clamps() {
    let p = Parameters::default();
    let c = p.motion();
    for (x, v) in [(12.3, 0.8), (-12.3, -0.8)] {
        let mut k = Kinematics::at(NVec3::new(0.0, 0.0, x));
        k.v = NVec3::new(0.0, 0.0, v);
        assert!(bounce_axis(&mut k, 2, &c));
        assert!((k.v.z.abs() - 0.7 * v.abs()).abs() < 1e-12);
        assert_eq!(k.v.z.signum(), -v.signum());
        assert_eq!(k.x.z, x.signum() * p.boundary);
    }
}

#[test]
fn damping_applies_after_bounce_in_free_step() {
    let p = Parameters::default();
    let mut k = Kinematics::at(NVec3::new(11.9, 0.0, 0.0));
    k.v = NVec3::new(0.5, 0.0, 0.0);
    free_step(&mut k, &p.motion(), 1.0);
    assert_eq!(k.x.x, 12.0);
    assert!((k.v.x + 0.5 * 0.7 * 0.997).abs() < 1e-12);
}

#[test]
fn fragments_stay_inside_boundary() {
    let mut ctl = exploded(MAX_FRAGMENTS);
    let b = ctl.params().boundary;
    for _ in 0..2000 {
        ctl.tick(DT);
        for f in ctl.fragments() {
            assert!(f.body.x.iter().all(|c| c.abs() <= b));
        }
    }
}

#[test]
fn scaled_timing_scales_drift_but_not_damping_or_gravity() {
    let params = Parameters {
        seed: Some(11),
        timing: Timing::Scaled { reference_hz: 60.0 },
        ..Default::default()
    };
    let mut ctl = ExplosionController::new(params, default_labels()[..4].to_vec()).unwrap();
    ctl.trigger_explode();
    tick_until(&mut ctl, AnimationState::Exploded);

    // Park fragment 0 well inside the box so no bounce interferes
    let x0 = NVec3::new(1.0, -0.5, 0.25);
    let v0 = NVec3::new(0.2, 0.1, -0.05);
    let spin0 = NVec3::new(0.01, 0.0, -0.02);
    let rot0 = ctl.fragments()[0].body.rot;
    {
        let f = &mut ctl.fragments_mut()[0];
        f.body.x = x0;
        f.body.v = v0;
        f.body.spin = spin0;
    }

    // 30 Hz frame against a 60 Hz reference: twice the per-tick drift
    let dt = 1.0 / 30.0;
    let damping = ctl.params().damping;
    ctl.tick(dt);
    let k = &ctl.fragments()[0].body;
    assert!((k.x - (x0 + v0 * dt * 60.0)).norm() < 1e-12);
    assert!((k.rot - (rot0 + spin0 * 2.0)).norm() < 1e-12);
    assert!((k.v - v0 * damping).norm() < 1e-12, "damping must stay once per tick");

    // Gravity steps ignore the frame scale
    ctl.trigger_gravity_pull();
    let mut expected = ctl.fragments()[0].body.clone();
    let mut expected_scale = ctl.fragments()[0].scale;
    gravity_step(&mut expected, &mut expected_scale, ctl.params());
    ctl.tick(dt);
    let f = &ctl.fragments()[0];
    assert!((f.body.x - expected.x).norm() < 1e-12);
    assert!((f.body.v - expected.v).norm() < 1e-12);
    assert_eq!(f.scale, expected_scale);
}

// ==================================================================================
// Gravity collapse tests
// ==================================================================================

#[test]
fn gravity_collapse_is_monotonic_from_rest() {
    let p = Parameters::default();
    let starts = [
        NVec3::new(10.0, 0.0, 0.0),
        NVec3::new(-3.0, 4.0, 0.0),
        NVec3::new(7.0, -7.0, 5.0),
        NVec3::new(0.3, 0.0, 0.0),
    ];
    for x0 in starts {
        let mut k = Kinematics::at(x0);
        let mut scale = 1.0;
        let mut last = k.x.norm();
        let mut ticks = 0;
        loop {
            let captured = gravity_step(&mut k, &mut scale, &p);
            ticks += 1;
            assert!(k.x.norm() < last, "distance grew from {} to {} starting at {:?}", last, k.x.norm(), x0);
            last = k.x.norm();
            if captured {
                break;
            }
            assert!(ticks < MAX_TICKS);
        }
        assert!(last < p.capture_radius);
    }
}

#[test]
fn reform_runs_once_with_one_fragment() {
    let mut ctl = exploded(1);
    ctl.drain_events();

    ctl.trigger_gravity_pull();
    tick_until(&mut ctl, AnimationState::Intact);

    let events = ctl.drain_events();
    assert_eq!(count(&events, ControllerEvent::CollapseStarted), 1);
    assert_eq!(count(&events, ControllerEvent::ReformStarted), 1);
    assert_eq!(count(&events, ControllerEvent::Reformed), 1);
    assert_intact(&ctl);
}

#[test]
fn reform_starts_exactly_when_last_fragment_is_captured() {
    let mut ctl = exploded(MAX_FRAGMENTS);
    for _ in 0..120 {
        ctl.tick(DT);
    }
    let r = ctl.params().capture_radius;

    ctl.trigger_gravity_pull();
    for _ in 0..MAX_TICKS {
        if ctl.is_reforming() {
            break;
        }
        let pending_before = ctl.fragments().iter().any(|f| f.visible && f.distance_to_origin() >= r);
        assert!(pending_before);
        ctl.tick(DT);
        let pending_after = ctl.fragments().iter().any(|f| f.visible && f.distance_to_origin() >= r);
        assert_eq!(ctl.is_reforming(), !pending_after);
    }
    assert!(ctl.is_reforming());

    tick_until(&mut ctl, AnimationState::Intact);
    let events = ctl.drain_events();
    assert_eq!(count(&events, ControllerEvent::ReformStarted), 1);
    assert_intact(&ctl);
}

#[test]
fn hidden_fragment_counts_as_collapsed() {
    let mut ctl = exploded(MAX_FRAGMENTS);
    for _ in 0..60 {
        ctl.tick(DT);
    }
    ctl.fragments_mut()[5].visible = false;
    let parked = ctl.fragments()[5].body.x;
    assert!(parked.norm() > ctl.params().capture_radius);

    ctl.drain_events();
    ctl.trigger_gravity_pull();
    while !ctl.is_reforming() {
        ctl.tick(DT);
        assert_eq!(ctl.fragments()[5].body.x, parked, "hidden fragment moved");
    }
    tick_until(&mut ctl, AnimationState::Intact);

    let events = ctl.drain_events();
    assert_eq!(count(&events, ControllerEvent::ReformStarted), 1);
    assert_intact(&ctl);
}

#[test]
fn gravity_twice_starts_one_collapse() {
    let mut ctl = exploded(MAX_FRAGMENTS);
    ctl.drain_events();
    ctl.trigger_gravity_pull();
    ctl.tick(DT);
    ctl.trigger_gravity_pull();
    assert_eq!(ctl.state(), AnimationState::GravityCollapsing);
    let events = ctl.drain_events();
    assert_eq!(count(&events, ControllerEvent::CollapseStarted), 1);
}

#[test]
fn gravity_before_explosion_finishes_is_ignored() {
    let mut ctl = controller(MAX_FRAGMENTS);
    ctl.trigger_gravity_pull();
    assert_eq!(ctl.state(), AnimationState::Intact);
    ctl.trigger_explode();
    ctl.trigger_gravity_pull();
    assert_eq!(ctl.state(), AnimationState::Exploding);
}

#[test]
fn reform_snaps_body_to_nominal() {
    let mut ctl = exploded(3);
    ctl.trigger_gravity_pull();
    while !ctl.is_reforming() {
        ctl.tick(DT);
    }
    assert!(ctl.body().visible);
    assert!(ctl.body().scale < 0.1);

    let mut last = ctl.body().scale;
    while ctl.is_reforming() {
        ctl.tick(DT);
        assert!(ctl.body().scale >= last);
        assert!(ctl.body().opacity <= ctl.params().nominal_opacity);
        last = ctl.body().scale;
    }
    assert_intact(&ctl);
}

// ==================================================================================
// Reset tests
// ==================================================================================

#[test]
fn reset_from_every_state() {
    // Intact
    let mut ctl = controller(MAX_FRAGMENTS);
    ctl.reset();
    assert_intact(&ctl);

    // Exploding, mid-shrink
    let mut ctl = controller(MAX_FRAGMENTS);
    ctl.trigger_explode();
    for _ in 0..5 {
        ctl.tick(DT);
    }
    assert_eq!(ctl.state(), AnimationState::Exploding);
    assert!(ctl.body().scale < 1.0);
    ctl.reset();
    assert_intact(&ctl);

    // Exploded, with a focused fragment
    let mut ctl = exploded(MAX_FRAGMENTS);
    assert!(ctl.focus(0).is_some());
    ctl.reset();
    assert_intact(&ctl);

    // GravityCollapsing, mid-collapse
    let mut ctl = exploded(MAX_FRAGMENTS);
    ctl.trigger_gravity_pull();
    for _ in 0..3 {
        ctl.tick(DT);
    }
    assert_eq!(ctl.state(), AnimationState::GravityCollapsing);
    ctl.reset();
    assert_intact(&ctl);

    // GravityCollapsing, mid-reform
    let mut ctl = exploded(2);
    ctl.trigger_gravity_pull();
    while !ctl.is_reforming() {
        ctl.tick(DT);
    }
    ctl.tick(DT);
    ctl.reset();
    assert_intact(&ctl);
}

#[test]
fn reset_cancels_pending_steps() {
    let mut ctl = exploded(MAX_FRAGMENTS);
    ctl.trigger_gravity_pull();
    ctl.tick(DT);
    ctl.reset();
    ctl.drain_events();

    for _ in 0..100 {
        ctl.tick(DT);
    }
    assert_intact(&ctl);
    assert!(ctl.drain_events().is_empty());

    // A fresh cycle works after the reset
    ctl.trigger_explode();
    tick_until(&mut ctl, AnimationState::Exploded);
}

// ==================================================================================
// Headless cycle and shipped configuration
// ==================================================================================

#[test]
fn headless_cycle_completes() {
    let mut ctl = controller(MAX_FRAGMENTS);
    let report = bench_cycle(&mut ctl, DT, 90);
    assert!(report.completed);
    assert!(report.explode_ticks > 0);
    assert!(report.collapse_ticks > 0);
    assert!(report.reform_ticks > 0);
    assert_intact(&ctl);
}

#[test]
fn shipped_scenarios_build() {
    for name in ["hexagon.yaml", "sphere.yaml"] {
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(name);
        let file = File::open(&path).unwrap();
        let cfg: ShowConfig = serde_yaml::from_reader(file).unwrap();
        let mut show = Show::build_show(cfg).unwrap();
        let report = bench_cycle(&mut show.controller, DT, 60);
        assert!(report.completed, "{} did not complete a cycle", name);
    }
}
