#![allow(dead_code)]

use std::time::Duration;

use action_tree::ManualClock;
use robot_core::{Alliance, BehaviorConfig};
use robot_sim::{Session, SimRobot, SimTuning};

pub const TICK: Duration = Duration::from_millis(20);

pub fn session() -> Session {
    session_with(Alliance::Blue, SimTuning::default(), BehaviorConfig::default())
}

pub fn session_with(alliance: Alliance, tuning: SimTuning, config: BehaviorConfig) -> Session {
    let sim = SimRobot::with_tuning(ManualClock::new(), alliance, tuning);
    Session::new(sim, config, TICK).expect("default configuration should validate")
}

/// Steps the session for `seconds` of simulated time.
pub fn run_for(session: &mut Session, seconds: f64) {
    let ticks = (seconds / TICK.as_secs_f64()).round() as u64;
    for _ in 0..ticks {
        session.step();
    }
}

/// Steps until `done` holds, for at most `max_seconds`.
pub fn run_until<F>(session: &mut Session, max_seconds: f64, mut done: F) -> bool
where
    F: FnMut(&Session) -> bool,
{
    let ticks = (max_seconds / TICK.as_secs_f64()).round() as u64;
    for _ in 0..ticks {
        if done(session) {
            return true;
        }
        session.step();
    }
    done(session)
}

pub fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}
