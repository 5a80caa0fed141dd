//! Configuration for the simulation demo
//!
//! Loads settings from `config/settings.json` (or the path given on the command
//! line) and writes the defaults there when the file is missing

use anyhow::{Context, Result};
use kinematics::{InitialState, PositionGuard, Rotation, Vector3};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Logging verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    Error,
    Warn,
    /// Startup, 1 Hz telemetry and final poses (default)
    Info,
    /// Every sampled render frame
    Debug,
    /// Every tick
    Trace,
}

impl Default for LogLevel {
    fn default() -> Self {
        Self::Info
    }
}

impl LogLevel {
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub simulation: SimulationConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Bodies spawned at startup
    #[serde(default)]
    pub bodies: Vec<BodyConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Fixed simulation rate
    pub tick_hz: u32,

    /// Render rate, deliberately unrelated to `tick_hz`
    pub frame_hz: u32,

    /// Wall-clock length of the demo run in seconds
    pub duration_secs: f64,

    /// Ticks run at most per render frame before falling behind is accepted
    #[serde(default = "default_max_steps_per_frame")]
    pub max_steps_per_frame: u32,

    /// Whether an invalid velocity may still move a body
    #[serde(default)]
    pub position_guard: PositionGuard,

    /// Speed above which validation complains (units/s)
    pub max_speed: f64,

    /// Acceleration above which validation complains (units/s²)
    pub max_acceleration: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Used when `RUST_LOG` is not set
    #[serde(default)]
    pub level: LogLevel,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodyConfig {
    pub name: String,

    #[serde(flatten)]
    pub initial: InitialState,

    /// Constant force applied every tick
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force: Option<Vector3>,
}

fn default_max_steps_per_frame() -> u32 {
    8
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            simulation: SimulationConfig {
                tick_hz: 20,
                frame_hz: 60,
                duration_secs: 3.0,
                max_steps_per_frame: default_max_steps_per_frame(),
                position_guard: PositionGuard::Unguarded,
                max_speed: 100.0,
                max_acceleration: 50.0,
            },
            logging: LoggingConfig::default(),
            bodies: vec![
                BodyConfig {
                    name: "projectile".to_string(),
                    initial: InitialState {
                        position: Vector3::new(0.0, 10.0, 0.0),
                        velocity: Vector3::new(4.0, 6.0, 0.0),
                        acceleration: Vector3::new(0.0, -9.81, 0.0),
                        mass: 1.0,
                        ..Default::default()
                    },
                    force: None,
                },
                BodyConfig {
                    name: "thruster".to_string(),
                    initial: InitialState {
                        rotation: Rotation::new(0.0, 0.5, 0.0),
                        mass: 2.0,
                        ..Default::default()
                    },
                    force: Some(Vector3::new(0.0, 0.0, 1.0)),
                },
            ],
        }
    }
}

impl AppConfig {
    /// Load configuration from `path`, or write and return the defaults if it does not exist.
    /// The flag is true when the defaults were created.
    pub fn load_or_create(path: &Path) -> Result<(Self, bool)> {
        if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            let config: AppConfig = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file {}", path.display()))?;
            config.validate()?;
            Ok((config, false))
        } else {
            let config = Self::default();
            config.save(path)?;
            Ok((config, true))
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory {}", parent.display())
            })?;
        }

        let content =
            serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        Ok(())
    }

    pub fn default_path() -> PathBuf {
        Path::new("config").join("settings.json")
    }

    fn validate(&self) -> Result<()> {
        anyhow::ensure!(self.simulation.tick_hz > 0, "simulation.tick_hz must be positive");
        anyhow::ensure!(self.simulation.frame_hz > 0, "simulation.frame_hz must be positive");
        anyhow::ensure!(
            self.simulation.duration_secs.is_finite() && self.simulation.duration_secs >= 0.0,
            "simulation.duration_secs must be a non-negative number"
        );
        Ok(())
    }
}
