//! Subsystem proxy traits.
//!
//! A proxy is the capability surface of one actuator subsystem. The control
//! loop behind it (PID, motor I/O) is not part of this workspace; behaviors
//! only request setpoints and poll whether they have been reached.
//!
//! All methods take `&self`: implementations use interior mutability, and a
//! proxy is shared by every node that reads it. The scheduler's registry
//! makes sure at most one non-exempt node writes to it at a time.

use action_tree::SubsystemId;

/// Capabilities common to every actuator subsystem.
pub trait SubsystemProxy: Send + Sync {
    /// Registry identifier for this subsystem.
    fn id(&self) -> SubsystemId;

    /// Requests a new target.
    ///
    /// Asynchronous with respect to the tick: the motion is not complete
    /// when this returns.
    fn actuate(&self, target: f64);

    /// Whether the subsystem is within tolerance of its current target.
    ///
    /// Pure and cheap; polled every tick by wait nodes.
    fn is_at_setpoint(&self) -> bool;

    /// Returns the subsystem to a safe, neutral internal state.
    fn reset(&self);
}

/// Elevating shooter mount. `actuate` targets a height.
pub trait Climber: SubsystemProxy {
    /// Drives the climber open-loop at `power` in `[-1, 1]`.
    fn set_output(&self, power: f64);

    /// Height that aims the shooter at a target `distance` away.
    fn interpolate(&self, distance: f64) -> f64;
}

/// Flywheel shooter. `actuate` targets one speed for both wheels, in RPM.
pub trait Shooter: SubsystemProxy {
    /// Targets independent wheel speeds.
    fn spin(&self, left_rpm: f64, right_rpm: f64);

    /// Drives the flywheels open-loop at `power` in `[-1, 1]`.
    fn set_output(&self, power: f64);
}

/// Intake rollers. `actuate` targets a roller speed.
pub trait Intake: SubsystemProxy {
    /// Drives the rollers open-loop at `power` in `[-1, 1]`.
    fn set_output(&self, power: f64);
}
