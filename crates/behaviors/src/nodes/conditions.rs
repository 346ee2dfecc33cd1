//! Setpoint predicates.
//!
//! Predicates only read proxies. They are boxed into `wait_until` nodes and
//! polled once per tick.

use std::sync::Arc;

use robot_core::SubsystemProxy;

/// Holds while `proxy` is within tolerance of its target.
pub fn at_setpoint<P>(proxy: &Arc<P>) -> impl FnMut() -> bool + Send + use<P>
where
    P: SubsystemProxy + ?Sized + 'static,
{
    let proxy = Arc::clone(proxy);
    move || proxy.is_at_setpoint()
}

/// Holds while both proxies are within tolerance.
pub fn both_at_setpoint<A, B>(a: &Arc<A>, b: &Arc<B>) -> impl FnMut() -> bool + Send + use<A, B>
where
    A: SubsystemProxy + ?Sized + 'static,
    B: SubsystemProxy + ?Sized + 'static,
{
    let mut a = at_setpoint(a);
    let mut b = at_setpoint(b);
    move || a() && b()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::stub_robot;

    #[test]
    fn both_requires_each_proxy() {
        let (robot, log) = stub_robot();
        let mut ready = both_at_setpoint(&robot.climber, &robot.shooter);

        assert!(!ready());
        log.set_climber_ready(true);
        assert!(!ready());
        log.set_shooter_ready(true);
        assert!(ready());
    }
}
