// Sensing/actuation boundary for the line follower base
//
// The control cycle only talks to hardware through these two traits. Wheel
// speeds cross this boundary in rad/s; a backend that drives motors in deg/s
// converts with the named helpers below.

use serde::{Deserialize, Serialize};

use super::kinematics::WheelVelocityPair;

/// Reflectance of the left and right sensors (0 = black, 100 = white)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ReflectancePair {
    pub left: f64,
    pub right: f64,
}

impl ReflectancePair {
    pub fn new(left: f64, right: f64) -> Self {
        Self { left, right }
    }
}

/// Error types for the drive backends
#[derive(Debug, thiserror::Error)]
pub enum DriveError {
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed line from bridge {line:?}: {reason}")]
    Malformed { line: String, reason: String },

    #[error("Timeout waiting for {what} from bridge")]
    Timeout { what: &'static str },
}

pub type Result<T> = std::result::Result<T, DriveError>;

/// Source of the two reflectance readings
pub trait ReflectanceSensors {
    fn read_reflectance(&mut self) -> Result<ReflectancePair>;
}

/// Two independently driven wheels
pub trait WheelActuators {
    /// Run the wheels at the given angular velocities (rad/s)
    fn command_wheels(&mut self, wheels: WheelVelocityPair) -> Result<()>;

    /// Angular velocities (rad/s) the wheels are actually turning at
    fn read_wheel_speeds(&mut self) -> Result<WheelVelocityPair>;

    /// Stop both wheels
    fn brake(&mut self) -> Result<()>;
}

/// A backend that both senses the line and drives the wheels
pub trait DriveBase: ReflectanceSensors + WheelActuators + Send {}

impl<T: ReflectanceSensors + WheelActuators + Send> DriveBase for T {}

/// Convert radians per second to degrees per second
pub fn radps_to_degps(radps: f64) -> f64 {
    radps * 180.0 / std::f64::consts::PI
}

/// Convert degrees per second to radians per second
pub fn degps_to_radps(degps: f64) -> f64 {
    degps * std::f64::consts::PI / 180.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_conversions() {
        assert!((radps_to_degps(std::f64::consts::PI) - 180.0).abs() < 1e-12);
        assert!((degps_to_radps(90.0) - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
        assert_eq!(radps_to_degps(0.0), 0.0);

        for v in [-12.5, -1.0, 0.3, 6.342] {
            assert!((degps_to_radps(radps_to_degps(v)) - v).abs() < 1e-12);
        }
    }

    #[test]
    fn test_pair_map() {
        let wheels = WheelVelocityPair::new(std::f64::consts::PI, -std::f64::consts::PI)
            .map(radps_to_degps);
        assert!((wheels.left - 180.0).abs() < 1e-12);
        assert!((wheels.right + 180.0).abs() < 1e-12);
    }
}
