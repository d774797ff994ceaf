use std::time::Instant;

use crate::animation::catalog::default_labels;
use crate::animation::controller::ExplosionController;
use crate::animation::params::Parameters;
use crate::animation::states::AnimationState;

/// Guard against a parameter set that never converges
const MAX_PHASE_TICKS: usize = 100_000;

/// Tick counts of one explode -> drift -> collapse -> reform cycle
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub explode_ticks: usize, // Exploding until Exploded
    pub drift_ticks: usize, // Exploded, before the gravity pull
    pub collapse_ticks: usize, // GravityCollapsing until reform starts
    pub reform_ticks: usize, // reform until Intact
    pub completed: bool, // false if a phase hit MAX_PHASE_TICKS
    pub seconds: f64, // wall time of the whole cycle
}

/// Run one full cycle on `ctl` with fixed step `dt`, letting the fragments
/// drift for `drift_ticks` before pulling them back
pub fn bench_cycle(ctl: &mut ExplosionController, dt: f64, drift_ticks: usize) -> CycleReport {
    let t0 = Instant::now();

    ctl.trigger_explode();
    let (explode_ticks, exploded) = run_while(ctl, dt, |c| c.state() == AnimationState::Exploding);

    for _ in 0..drift_ticks {
        ctl.tick(dt);
    }

    ctl.trigger_gravity_pull();
    let (collapse_ticks, collapsed) = run_while(ctl, dt, |c| {
        c.state() == AnimationState::GravityCollapsing && !c.is_reforming()
    });
    let (reform_ticks, reformed) = run_while(ctl, dt, |c| c.state() != AnimationState::Intact);

    CycleReport {
        explode_ticks,
        drift_ticks,
        collapse_ticks,
        reform_ticks,
        completed: exploded && collapsed && reformed && ctl.state() == AnimationState::Intact,
        seconds: t0.elapsed().as_secs_f64(),
    }
}

/// Tick while `cond` holds; returns ticks taken and whether it finished in time
fn run_while<F>(ctl: &mut ExplosionController, dt: f64, cond: F) -> (usize, bool)
where
    F: Fn(&ExplosionController) -> bool,
{
    let mut ticks = 0;
    while cond(ctl) {
        if ticks >= MAX_PHASE_TICKS {
            return (ticks, false);
        }
        ctl.tick(dt);
        ticks += 1;
    }
    (ticks, true)
}

/// Repeat `cycles` full cycles on one controller and print a line per cycle
pub fn bench_cycles(ctl: &mut ExplosionController, cycles: usize, dt: f64, drift_ticks: usize) -> Vec<CycleReport> {
    let mut reports = Vec::with_capacity(cycles);
    for i in 0..cycles {
        let r = bench_cycle(ctl, dt, drift_ticks);
        println!(
            "cycle {:3}: explode = {:4}, drift = {:4}, collapse = {:5}, reform = {:3} ticks, {:8.6} s{}",
            i,
            r.explode_ticks,
            r.drift_ticks,
            r.collapse_ticks,
            r.reform_ticks,
            r.seconds,
            if r.completed { "" } else { "  (did not complete)" },
        );
        reports.push(r);
    }
    reports
}

/// Collapse length as a function of fragment count, fixed seed
pub fn bench_fragment_counts() {
    let labels = default_labels();
    for n in 1..=labels.len() {
        let params = Parameters {
            seed: Some(42),
            ..Default::default()
        };
        let mut ctl = match ExplosionController::new(params, labels[..n].to_vec()) {
            Ok(ctl) => ctl,
            Err(e) => {
                println!("N = {n:2}: setup failed: {e}");
                continue;
            }
        };
        let r = bench_cycle(&mut ctl, 1.0 / 60.0, 120);
        println!("N = {n:2}, collapse = {:5} ticks, cycle = {:8.6} s", r.collapse_ticks, r.seconds);
    }
}
