//! Configuration management for the push-up tracker

use crate::constants::{
    DEFAULT_ANGLE_THRESHOLD_DOWN, DEFAULT_ANGLE_THRESHOLD_UP, DEFAULT_HORIZONTAL_THRESHOLD, DEFAULT_MIN_VISIBILITY,
    DEFAULT_PARTIAL_REP_THRESHOLD, DEFAULT_SMOOTHING_FACTOR, MAX_JOINT_ANGLE,
};
use crate::filters::{AngleFilter, FilterKind};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Rep detection thresholds
    pub tracker: TrackerConfig,

    /// Angle smoothing configuration
    pub filter: FilterConfig,
}

/// Rep detection thresholds, fixed for the lifetime of a session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Elbow angle below which the arms are bent (degrees)
    pub angle_threshold_down: f64,

    /// Elbow angle above which the arms are extended (degrees)
    pub angle_threshold_up: f64,

    /// Deepest angle below which a rep is still partial (degrees)
    pub partial_rep_threshold: f64,

    /// Exponential smoothing factor for the elbow angle, in (0, 1]
    pub smoothing_factor: f64,

    /// Landmarks at or below this visibility are ignored
    pub min_visibility: f64,

    /// Maximum shoulder/hip vertical offset for a horizontal body
    pub horizontal_threshold: f64,
}

/// Filter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Filter type (`exponential`, `exponential:<alpha>` or `none`)
    pub kind: String,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            angle_threshold_down: DEFAULT_ANGLE_THRESHOLD_DOWN,
            angle_threshold_up: DEFAULT_ANGLE_THRESHOLD_UP,
            partial_rep_threshold: DEFAULT_PARTIAL_REP_THRESHOLD,
            smoothing_factor: DEFAULT_SMOOTHING_FACTOR,
            min_visibility: DEFAULT_MIN_VISIBILITY,
            horizontal_threshold: DEFAULT_HORIZONTAL_THRESHOLD,
        }
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            kind: "exponential".to_string(),
        }
    }
}

impl TrackerConfig {
    /// Validate thresholds
    pub fn validate(&self) -> Result<()> {
        let angle_range = 0.0..=MAX_JOINT_ANGLE;

        if !angle_range.contains(&self.angle_threshold_down) || !angle_range.contains(&self.angle_threshold_up) {
            return Err(Error::ConfigError(
                "Angle thresholds must be between 0 and 180 degrees".to_string(),
            ));
        }
        if self.angle_threshold_down >= self.angle_threshold_up {
            return Err(Error::ConfigError(format!(
                "Down threshold ({}) must be below up threshold ({})",
                self.angle_threshold_down, self.angle_threshold_up
            )));
        }
        if !(self.angle_threshold_down..=MAX_JOINT_ANGLE).contains(&self.partial_rep_threshold) {
            return Err(Error::ConfigError(format!(
                "Partial rep threshold ({}) must be between the down threshold and 180 degrees",
                self.partial_rep_threshold
            )));
        }
        if !(self.smoothing_factor > 0.0 && self.smoothing_factor <= 1.0) {
            return Err(Error::ConfigError(
                "Smoothing factor must be in (0, 1]".to_string(),
            ));
        }
        if !(0.0..1.0).contains(&self.min_visibility) {
            return Err(Error::ConfigError(
                "Minimum visibility must be in [0, 1)".to_string(),
            ));
        }
        if !(self.horizontal_threshold > 0.0 && self.horizontal_threshold <= 1.0) {
            return Err(Error::ConfigError(
                "Horizontal threshold must be in (0, 1]".to_string(),
            ));
        }

        Ok(())
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        let mut config: Self =
            serde_yaml::from_str(content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))?;
        config.resolve_smoothing();

        Ok(config)
    }

    /// Save configuration to a YAML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)?;

        Ok(())
    }

    /// Move an explicit `exponential:<alpha>` into `tracker.smoothing_factor`
    ///
    /// Leaves the filter kind as a bare `exponential`, so the tracker's
    /// smoothing factor is the only alpha left. Kinds that do not parse are
    /// left for [`Config::validate`] to report.
    pub fn resolve_smoothing(&mut self) {
        if let Ok(FilterKind::Exponential(Some(alpha))) = FilterKind::parse(&self.filter.kind) {
            self.tracker.smoothing_factor = alpha;
            self.filter.kind = "exponential".to_string();
        }
    }

    /// Create the angle filter described by this configuration
    ///
    /// A bare `exponential` uses the tracker's smoothing factor.
    pub fn create_filter(&self) -> Result<Box<dyn AngleFilter>> {
        self.validate()?;
        Ok(FilterKind::parse(&self.filter.kind)?.build(self.tracker.smoothing_factor))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.tracker.validate()?;
        if let FilterKind::Exponential(Some(alpha)) = FilterKind::parse(&self.filter.kind)? {
            if alpha != self.tracker.smoothing_factor {
                return Err(Error::ConfigError(format!(
                    "Filter alpha ({alpha}) conflicts with smoothing factor ({})",
                    self.tracker.smoothing_factor
                )));
            }
        }
        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Push-up Tracker Configuration

# Rep detection thresholds (degrees unless noted)
tracker:
  angle_threshold_down: 90.0
  angle_threshold_up: 160.0
  partial_rep_threshold: 110.0
  smoothing_factor: 0.3
  min_visibility: 0.5
  horizontal_threshold: 0.3

# Angle smoothing ("exponential", "exponential:<alpha>" or "none")
filter:
  kind: "exponential"
"#;
