use anyhow::Context;
use omelette_common::Vector3;
use omelette_physics::GRAVITY;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Simulation parameters, loadable from a JSON file.
///
/// Missing fields fall back to the defaults, which reproduce the classic
/// sandbox: a unit-mass cube pushed once along +x at 10 ticks per second.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Ticks per second. Each tick advances the simulation by `1 / frame_rate`.
    pub frame_rate: f32,
    pub ticks: u64,
    pub mass: f32,
    /// Force applied once before the first tick.
    pub initial_force: [f32; 3],
    pub gravity: [f32; 3],
    /// Pace ticks against the wall clock instead of running flat out.
    pub realtime: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            frame_rate: 10.0,
            ticks: 30,
            mass: 1.0,
            initial_force: [2.0, 0.0, 0.0],
            gravity: GRAVITY.to_array(),
            realtime: false,
        }
    }
}

impl SimulationConfig {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("invalid config {}", path.display()))?;
        Ok(config)
    }

    /// Reject values the simulation cannot run with. Time steps must be
    /// finite and non-negative.
    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.frame_rate.is_finite() || self.frame_rate <= 0.0 {
            anyhow::bail!("frame_rate must be finite and positive, got {}", self.frame_rate);
        }
        Ok(())
    }

    /// Wall-clock interval between ticks.
    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.frame_rate))
    }

    /// Simulated time per tick.
    pub fn delta_time(&self) -> f32 {
        1.0 / self.frame_rate
    }

    pub fn initial_force(&self) -> Vector3 {
        self.initial_force.into()
    }

    pub fn gravity(&self) -> Vector3 {
        self.gravity.into()
    }
}
