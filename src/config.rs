// Loop timing, topics, robot configuration
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::drive::{Geometry, SimConfig};
use crate::fuzzy::FuzzyConfig;

// Zenoh topics
pub const TOPIC_CMD_RUN: &str = "linebot/cmd/run"; // pause/resume
pub const TOPIC_TELEMETRY: &str = "linebot/state/telemetry"; // per-cycle pose and steering
pub const TOPIC_HEALTH: &str = "linebot/state/health"; // health status

// Serial port for the motor/sensor bridge
pub const BRIDGE_PORT: &str = "/dev/ttyACM0";

// Constant forward speed (m/s)
pub const DEFAULT_LINEAR_SPEED: f64 = 0.1;

// Control period (s)
pub const DEFAULT_PERIOD_S: f64 = 0.1;

/// Which time step feeds the odometry integration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrationStep {
    /// Configured control period, regardless of jitter
    #[default]
    Nominal,
    /// Wall time elapsed since the previous cycle
    Measured,
}

/// Error types for loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Everything fixed at startup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RobotConfig {
    pub geometry: Geometry,
    /// Forward speed u (m/s)
    pub linear_speed: f64,
    /// Control period dt (s)
    pub period_s: f64,
    pub integration_step: IntegrationStep,
    pub fuzzy: FuzzyConfig,
    /// Stop after this many seconds of elapsed time
    pub run_duration_s: Option<f64>,
    pub sim: SimConfig,
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            geometry: Geometry::default(),
            linear_speed: DEFAULT_LINEAR_SPEED,
            period_s: DEFAULT_PERIOD_S,
            integration_step: IntegrationStep::default(),
            fuzzy: FuzzyConfig::default(),
            run_duration_s: None,
            sim: SimConfig::default(),
        }
    }
}

impl RobotConfig {
    /// Load from a JSON file; missing fields take their defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("geometry.wheel_diameter", self.geometry.wheel_diameter)?;
        positive("geometry.axle_length", self.geometry.axle_length)?;
        positive("period_s", self.period_s)?;
        match Duration::try_from_secs_f64(self.period_s) {
            Ok(period) if !period.is_zero() => {}
            _ => {
                return Err(ConfigError::Invalid {
                    field: "period_s",
                    reason: format!("{} s is not a usable timer period", self.period_s),
                });
            }
        }

        if !self.linear_speed.is_finite() {
            return Err(invalid("linear_speed", "must be finite"));
        }
        if let Some(duration) = self.run_duration_s {
            positive("run_duration_s", duration)?;
        }
        if let Err(set) = self.fuzzy.sets.check_ordering() {
            return Err(ConfigError::Invalid {
                field: "fuzzy.sets",
                reason: format!("{} breakpoints out of order", set),
            });
        }
        Ok(())
    }

    pub fn period(&self) -> Duration {
        Duration::from_secs_f64(self.period_s)
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.to_string(),
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("must be a positive number, got {}", value),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_robot() {
        let config = RobotConfig::default();
        assert_eq!(config.geometry.wheel_diameter, 0.0555);
        assert_eq!(config.geometry.axle_length, 0.152);
        assert_eq!(config.linear_speed, 0.1);
        assert_eq!(config.period(), Duration::from_millis(100));
        assert_eq!(config.integration_step, IntegrationStep::Nominal);
        assert_eq!(config.fuzzy.sets.black.full, 20.0);
        assert_eq!(config.fuzzy.sets.gray.peak, 50.0);
        assert_eq!(config.fuzzy.consequents.white_black, -1.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = RobotConfig::from_json(
            r#"{
                "linear_speed": 0.15,
                "integration_step": "measured",
                "fuzzy": { "consequents": { "black_white": 1.5 } },
                "sim": { "track": { "kind": "circle", "radius": 0.5, "half_width": 0.01 } }
            }"#,
        )
        .unwrap();

        assert_eq!(config.linear_speed, 0.15);
        assert_eq!(config.integration_step, IntegrationStep::Measured);
        assert_eq!(config.fuzzy.consequents.black_white, 1.5);
        assert_eq!(config.fuzzy.consequents.white_black, -1.0);
        assert_eq!(config.fuzzy.sets.white.full, 80.0);
        assert_eq!(config.geometry, Geometry::default());
        assert_eq!(config.sim.sensor_spacing, 0.03);
    }

    #[test]
    fn test_rejects_bad_geometry() {
        let err = RobotConfig::from_json(r#"{ "geometry": { "axle_length": 0.0 } }"#).unwrap_err();
        match err {
            ConfigError::Invalid { field, .. } => assert_eq!(field, "geometry.axle_length"),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_rejects_bad_period_and_duration() {
        let mut config = RobotConfig::default();
        config.period_s = -0.1;
        assert!(config.validate().is_err());

        let mut config = RobotConfig::default();
        config.run_duration_s = Some(0.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_period_outside_timer_range() {
        for json in [r#"{ "period_s": 1e-10 }"#, r#"{ "period_s": 1e20 }"#] {
            match RobotConfig::from_json(json) {
                Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, "period_s"),
                other => panic!("expected period_s to be rejected for {}, got {:?}", json, other),
            }
        }

        // Smallest accepted periods still give a non-zero ticker
        let config = RobotConfig::from_json(r#"{ "period_s": 1e-9 }"#).unwrap();
        assert!(!config.period().is_zero());
    }

    #[test]
    fn test_partial_set_override_keeps_other_breakpoint() {
        let config =
            RobotConfig::from_json(r#"{ "fuzzy": { "sets": { "black": { "full": 15 } } } }"#)
                .unwrap();
        assert_eq!(config.fuzzy.sets.black.full, 15.0);
        assert_eq!(config.fuzzy.sets.black.zero, 40.0);
        assert_eq!(config.fuzzy.sets.gray.peak, 50.0);
    }

    #[test]
    fn test_rejects_misordered_breakpoints() {
        let err = RobotConfig::from_json(
            r#"{ "fuzzy": { "sets": { "white": { "zero": 90.0, "full": 80.0 } } } }"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("white"), "{}", err);
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            RobotConfig::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
