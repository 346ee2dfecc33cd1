//! Simulator runtime configuration.
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use action_tree::ConflictPolicy;
use robot_core::Alliance;

/// Knobs for one simulated session.
#[derive(Clone, Debug, PartialEq)]
pub struct SimConfig {
    /// Control period.
    pub tick: Duration,
    /// Simulated session length.
    pub duration: Duration,
    /// Behavior tuning file; the bundled tuning is used when unset.
    pub behavior_config: Option<PathBuf>,
    pub alliance: Alliance,
    pub policy: ConflictPolicy,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick: Duration::from_millis(20),
            duration: Duration::from_secs(15),
            behavior_config: None,
            alliance: Alliance::Blue,
            policy: ConflictPolicy::Preempt,
        }
    }
}

impl SimConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `SIM_TICK_MS` - Control period in milliseconds (default: 20)
    /// - `SIM_DURATION_S` - Session length in seconds (default: 15)
    /// - `SIM_CONFIG` - Path to a behavior TOML file (default: bundled)
    /// - `SIM_ALLIANCE` - `red`, `blue` or `unknown` (default: blue)
    /// - `SIM_POLICY` - `preempt` or `reject` (default: preempt)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(ms) = read_env::<u64>("SIM_TICK_MS") {
            config.tick = Duration::from_millis(ms.max(1));
        }

        if let Some(duration) = read_env::<f64>("SIM_DURATION_S")
            .and_then(|seconds| Duration::try_from_secs_f64(seconds).ok())
        {
            config.duration = duration;
        }

        config.behavior_config = env::var("SIM_CONFIG").ok().map(PathBuf::from);

        if let Ok(alliance) = env::var("SIM_ALLIANCE") {
            config.alliance = parse_alliance(&alliance);
        }

        if let Ok(policy) = env::var("SIM_POLICY") {
            config.policy = parse_policy(&policy);
        }

        config
    }

    /// Number of control periods in the session.
    pub fn ticks(&self) -> u64 {
        let tick = self.tick.as_nanos().max(1);
        (self.duration.as_nanos() / tick) as u64
    }
}

fn parse_alliance(value: &str) -> Alliance {
    match value.trim().to_ascii_lowercase().as_str() {
        "red" => Alliance::Red,
        "blue" => Alliance::Blue,
        _ => Alliance::Unknown,
    }
}

fn parse_policy(value: &str) -> ConflictPolicy {
    if value.trim().eq_ignore_ascii_case("reject") {
        ConflictPolicy::Reject
    } else {
        ConflictPolicy::Preempt
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alliance_names_are_case_insensitive() {
        assert_eq!(parse_alliance("Red"), Alliance::Red);
        assert_eq!(parse_alliance(" BLUE "), Alliance::Blue);
        assert_eq!(parse_alliance("green"), Alliance::Unknown);
    }

    #[test]
    fn unknown_policy_falls_back_to_preempt() {
        assert_eq!(parse_policy("Reject"), ConflictPolicy::Reject);
        assert_eq!(parse_policy("preempt"), ConflictPolicy::Preempt);
        assert_eq!(parse_policy("queue"), ConflictPolicy::Preempt);
    }

    #[test]
    fn tick_count_covers_the_session() {
        let config = SimConfig {
            tick: Duration::from_millis(20),
            duration: Duration::from_secs(2),
            ..SimConfig::default()
        };
        assert_eq!(config.ticks(), 100);
    }
}
