use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const MIN_SAFE_RADIUS_NM: f64 = 0.1;
pub const MAX_SAFE_RADIUS_NM: f64 = 10.0;

/// Playback settings: which instant to show and how to classify proximity.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Percent of the scenario duration, 0-100.
    pub percent: f64,
    /// Safe radius in nm.
    pub safe_radius: f64,
    /// Seconds between preview ticks.
    pub tick_interval: f64,
    pub tick_count: usize,
    pub show_geodetic: bool,
    pub output: Option<PathBuf>,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            percent: 0.0,
            safe_radius: 1.0,
            tick_interval: 1800.0,
            tick_count: 20,
            show_geodetic: true,
            output: None,
        }
    }
}

impl PlaybackConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading playback config {}", path_ref.display()))?;
        let config: PlaybackConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing playback config {}", path_ref.display()))?;
        Ok(config.clamped())
    }

    pub fn from_args(percent: f64, safe_radius: f64) -> Self {
        Self {
            percent,
            safe_radius,
            ..Default::default()
        }
        .clamped()
    }

    /// Pulls user-supplied values into the ranges the engine expects.
    pub fn clamped(mut self) -> Self {
        self.percent = if self.percent.is_finite() {
            self.percent.clamp(0.0, 100.0)
        } else {
            0.0
        };
        self.safe_radius = if self.safe_radius.is_finite() {
            self.safe_radius.clamp(MIN_SAFE_RADIUS_NM, MAX_SAFE_RADIUS_NM)
        } else {
            Self::default().safe_radius
        };
        if !(self.tick_interval.is_finite() && self.tick_interval > 0.0) {
            self.tick_interval = Self::default().tick_interval;
        }
        self
    }
}
