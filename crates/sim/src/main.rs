//! Simulated robot session.
//!
//! Runs the demo operator script against the simulated robot at a fixed
//! control rate and logs every behavior as it starts, preempts and ends.
//!
//! ```bash
//! RUST_LOG=action_tree=debug SIM_ALLIANCE=red cargo run -p robot-sim
//! ```

use action_tree::ManualClock;
use anyhow::Result;
use robot_content::ConfigLoader;
use robot_sim::{Script, Session, SimConfig, SimRobot};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = SimConfig::from_env();
    tracing::info!(?config, "Starting robot simulation");

    let behavior = match &config.behavior_config {
        Some(path) => ConfigLoader::load(path)?,
        None => ConfigLoader::bundled()?,
    };

    let sim = SimRobot::new(ManualClock::new(), config.alliance);
    let mut session = Session::new(sim, behavior, config.tick)?.with_policy(config.policy);
    let report = session.run(&Script::demo(), config.ticks()).await?;

    tracing::info!(
        "Simulation finished: {} ticks, {} behaviors submitted, {} still active",
        report.ticks,
        report.submitted,
        report.still_active
    );
    Ok(())
}
