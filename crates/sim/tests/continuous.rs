//! Continuous ramp-up tracking a moving target.

mod common;

use std::sync::{Arc, Mutex};

use common::{approx, run_for, session};
use robot_core::ids;
use robot_sim::{Command, Session};

fn climber_targets(session: &Session) -> Vec<f64> {
    session
        .sim()
        .log
        .commands()
        .into_iter()
        .filter_map(|c| match c {
            Command::ClimberTarget(height) => Some(height),
            _ => None,
        })
        .collect()
}

#[test]
fn climber_follows_the_supplied_height_until_cancelled() {
    let mut session = session();
    let height = Arc::new(Mutex::new(0.5));
    let supplier = Arc::clone(&height);

    let node = session
        .library()
        .ramp_up_continuous(4000.0, move || *supplier.lock().unwrap())
        .unwrap();
    let id = session.scheduler_mut().submit(node).unwrap();

    run_for(&mut session, 0.5);
    let targets = climber_targets(&session);
    // refreshed every 0.1 s
    assert!(targets.len() >= 4, "{targets:?}");
    assert!(targets.iter().all(|t| approx(*t, 0.5)));

    *height.lock().unwrap() = 0.9;
    run_for(&mut session, 0.2);
    assert_eq!(climber_targets(&session).last(), Some(&0.9));

    run_for(&mut session, 1.0);
    assert!(approx(session.sim().climber.height(), 0.9));
    assert_eq!(session.sim().shooter.targets(), (4000.0, 4000.0));
    assert!(session.scheduler().is_active(id), "never finishes on its own");

    assert!(session.scheduler_mut().cancel(id));
    assert_eq!(session.scheduler().holder(ids::CLIMBER), None);
    assert_eq!(session.scheduler().holder(ids::SHOOTER), None);

    let count = climber_targets(&session).len();
    run_for(&mut session, 0.5);
    assert_eq!(climber_targets(&session).len(), count);
}

#[test]
fn supplied_heights_are_kept_within_climber_range() {
    let mut session = session();
    let height = Arc::new(Mutex::new(1.7));
    let supplier = Arc::clone(&height);

    let node = session
        .library()
        .ramp_up_continuous(4000.0, move || *supplier.lock().unwrap())
        .unwrap();
    session.scheduler_mut().submit(node).unwrap();

    run_for(&mut session, 0.2);
    assert_eq!(climber_targets(&session).last(), Some(&1.0));

    *height.lock().unwrap() = -3.0;
    run_for(&mut session, 0.2);
    assert_eq!(climber_targets(&session).last(), Some(&0.0));

    *height.lock().unwrap() = f64::NAN;
    run_for(&mut session, 0.2);
    assert_eq!(climber_targets(&session).last(), Some(&0.0));
}

#[test]
fn default_continuous_ramp_aims_at_the_predicted_distance() {
    let mut session = session();
    session.sim().drivetrain.set_distance(2.0);
    session.submit(&robot_sim::Request::RampUpContinuous).unwrap();

    run_for(&mut session, 0.2);
    assert!(approx(*climber_targets(&session).last().unwrap(), 0.3));

    session.sim().drivetrain.set_distance(5.0);
    run_for(&mut session, 0.2);
    assert!(approx(*climber_targets(&session).last().unwrap(), 0.75));
    assert_eq!(session.sim().shooter.targets(), (5500.0, 5500.0));
}

#[test]
fn continuous_ramp_rejects_bad_speed() {
    let session = session();
    assert!(session.library().ramp_up_continuous(-1.0, || 0.5).is_err());
    assert!(session.library().ramp_up_continuous(9000.0, || 0.5).is_err());
}
