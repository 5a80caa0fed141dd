use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use engine_core::Engine;
use kinematics::validation::ValidationContext;
use kinematics::{codec, IntegrationPolicy, KinematicState};
use tracing_subscriber::EnvFilter;

mod config;
use config::{AppConfig, LoggingConfig};

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.level.as_filter()));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> Result<()> {
    let path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(AppConfig::default_path);
    let (config, created) = AppConfig::load_or_create(&path)?;

    init_tracing(&config.logging);
    if created {
        tracing::info!("no config file found, wrote defaults to {}", path.display());
    } else {
        tracing::info!("loaded configuration from {}", path.display());
    }

    let sim = &config.simulation;
    let dt = 1.0 / sim.tick_hz as f64;
    let mut engine = Engine::new_fixed_hz(sim.tick_hz)
        .with_max_steps_per_frame(sim.max_steps_per_frame)
        .with_policy(IntegrationPolicy::default().with_position_guard(sim.position_guard))
        .with_validation(
            ValidationContext::new(dt).with_physics_limits(sim.max_speed, sim.max_acceleration),
        );

    let mut names = HashMap::with_capacity(config.bodies.len());
    for body in &config.bodies {
        let id = engine.spawn(KinematicState::from_initial(body.initial));
        if body.force.is_some() {
            if body.initial.mass == 0.0 {
                tracing::warn!(body = %body.name, "constant force on a body with zero mass");
            }
            engine.set_force(id, body.force);
        }
        names.insert(id, body.name.as_str());
    }
    tracing::info!(
        bodies = names.len(),
        tick_hz = sim.tick_hz,
        frame_hz = sim.frame_hz,
        "starting simulation"
    );

    let frame_interval = Duration::from_secs_f64(1.0 / sim.frame_hz as f64);
    engine.run_blocking(
        Duration::from_secs_f64(sim.duration_secs),
        frame_interval,
        |engine, alpha| {
            for pose in engine.render_poses(alpha) {
                tracing::debug!(
                    tick = engine.tick(),
                    alpha,
                    body = names.get(&pose.id).copied().unwrap_or("?"),
                    position = ?pose.position,
                    rotation = ?pose.rotation,
                    "render"
                );
            }
        },
    );

    for (id, body) in engine.bodies() {
        let name = names.get(&id).copied().unwrap_or("?");
        match codec::to_json(body) {
            Ok(json) => tracing::info!(tick = engine.tick(), body = name, "{}", json),
            Err(e) => tracing::warn!(body = name, "final state not encodable: {}", e),
        }
    }
    Ok(())
}
