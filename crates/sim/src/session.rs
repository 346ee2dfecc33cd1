//! Fixed-rate simulated session.
//!
//! A [`Session`] owns the simulated robot, the behavior library and the
//! scheduler. Each period it advances the manual clock, steps mechanism
//! physics, submits any scripted requests that have come due, and ticks the
//! scheduler once.

use std::time::Duration;

use action_tree::{ActionId, Clock, ConflictPolicy, ManualClock, Scheduler};
use anyhow::Context;
use behaviors::BehaviorLibrary;
use robot_core::BehaviorConfig;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info};

use crate::proxies::SimRobot;

/// An operator request, as a driver binding would issue it.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Shoot { rpm: f64, height: f64 },
    Feed { rpm: f64, height: f64 },
    AutoShoot,
    RamShot,
    RampRam,
    AmpShoot,
    RampUpAmp,
    RampUpContinuous,
    AutoAmpAlign,
    Neutral,
    Vibrate,
    CancelAll,
}

/// A request scheduled at a session time.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptStep {
    pub at: Duration,
    pub request: Request,
}

/// Requests ordered by time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Script {
    steps: Vec<ScriptStep>,
}

impl Script {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(mut self, seconds: f64, request: Request) -> Self {
        let at = Duration::try_from_secs_f64(seconds).unwrap_or_default();
        self.steps.push(ScriptStep { at, request });
        self.steps.sort_by_key(|step| step.at);
        self
    }

    pub fn steps(&self) -> &[ScriptStep] {
        &self.steps
    }

    /// A short teleop-style sequence exercising every recipe family.
    pub fn demo() -> Self {
        Self::new()
            .at(0.0, Request::Vibrate)
            .at(0.1, Request::RampUpContinuous)
            .at(1.5, Request::AutoShoot)
            .at(4.0, Request::RampUpAmp)
            .at(6.0, Request::AmpShoot)
            .at(10.0, Request::Shoot {
                rpm: 3000.0,
                height: 0.5,
            })
            .at(13.0, Request::RamShot)
    }
}

/// Totals reported when a session ends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionReport {
    pub ticks: u64,
    pub submitted: usize,
    pub still_active: usize,
}

pub struct Session {
    sim: SimRobot,
    library: BehaviorLibrary,
    scheduler: Scheduler<ManualClock>,
    period: Duration,
    submitted: usize,
}

impl Session {
    /// Binds `config` to the simulated robot.
    ///
    /// # Errors
    ///
    /// Fails if `config` does not validate.
    pub fn new(sim: SimRobot, config: BehaviorConfig, period: Duration) -> anyhow::Result<Self> {
        let library =
            BehaviorLibrary::new(sim.robot(), config).context("Invalid behavior configuration")?;
        let scheduler = Scheduler::new(sim.clock.clone());
        Ok(Self {
            sim,
            library,
            scheduler,
            period,
            submitted: 0,
        })
    }

    /// Replaces the scheduler with one using `policy`.
    ///
    /// Call before submitting anything; active behaviors are dropped.
    pub fn with_policy(mut self, policy: ConflictPolicy) -> Self {
        self.scheduler = Scheduler::new(self.sim.clock.clone()).with_policy(policy);
        self
    }

    pub fn sim(&self) -> &SimRobot {
        &self.sim
    }

    pub fn library(&self) -> &BehaviorLibrary {
        &self.library
    }

    pub fn scheduler(&self) -> &Scheduler<ManualClock> {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut Scheduler<ManualClock> {
        &mut self.scheduler
    }

    pub fn now(&self) -> Duration {
        self.sim.clock.now()
    }

    /// Builds and submits the behavior for `request`.
    ///
    /// Returns `None` for [`Request::CancelAll`].
    pub fn submit(&mut self, request: &Request) -> anyhow::Result<Option<ActionId>> {
        let library = &self.library;
        let node = match request {
            Request::Shoot { rpm, height } => library.shoot(*rpm, *height)?,
            Request::Feed { rpm, height } => library.feed(*rpm, *height)?,
            Request::AutoShoot => library.auto_shoot(),
            Request::RamShot => library.ram_shot(),
            Request::RampRam => library.ramp_ram(),
            Request::AmpShoot => library.amp_shoot(),
            Request::RampUpAmp => library.ramp_up_amp(),
            Request::RampUpContinuous => library.ramp_up_continuous_default(),
            Request::AutoAmpAlign => library.auto_amp_align(),
            Request::Neutral => library.neutral(false),
            Request::Vibrate => library.vibrate_controller(),
            Request::CancelAll => {
                self.scheduler.cancel_all();
                return Ok(None);
            }
        };
        let id = self.scheduler.submit(node)?;
        self.submitted += 1;
        debug!(?request, action = %id, "request submitted");
        Ok(Some(id))
    }

    /// Advances the session by one control period.
    pub fn step(&mut self) {
        self.sim.clock.advance(self.period);
        self.sim.step(self.period);
        self.scheduler.tick();
    }

    /// Runs `ticks` periods paced by a tokio interval, issuing `script`.
    ///
    /// Simulated time advances by exactly one period per iteration, so a
    /// run is deterministic however late the interval fires.
    pub async fn run(&mut self, script: &Script, ticks: u64) -> anyhow::Result<SessionReport> {
        let mut timer = interval(self.period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut pending = script.steps().iter().peekable();
        info!(ticks, period_ms = self.period.as_millis() as u64, "session started");

        for _ in 0..ticks {
            timer.tick().await;
            let now = self.now();
            while let Some(step) = pending.next_if(|step| step.at <= now) {
                self.submit(&step.request)?;
            }
            self.step();
        }

        let report = SessionReport {
            ticks,
            submitted: self.submitted,
            still_active: self.scheduler.active_count(),
        };
        info!(?report, "session finished");
        Ok(report)
    }
}
