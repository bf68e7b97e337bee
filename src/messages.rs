// Message types published and consumed by the runtime

use serde::{Deserialize, Serialize};

use crate::cycle::CycleReport;
use crate::drive::{ReflectancePair, RobotPose, WheelVelocityPair};
use crate::fuzzy::FiringStrengths;

// Command from teleop/scripts -> runtime: pause or resume the loop
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RunCommand {
    pub run: bool,
}

/// Per-cycle state published by the runtime
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Telemetry {
    pub cycle: u64,
    /// Measured time since start (s)
    pub t: f64,
    /// Step used for the odometry integration (s)
    pub dt: f64,
    pub readings: ReflectancePair,
    pub strengths: FiringStrengths,
    pub w: f64,
    pub commanded: WheelVelocityPair,
    pub realized: WheelVelocityPair,
    pub pose: RobotPose,
}

impl Telemetry {
    pub fn from_report(cycle: u64, t: f64, dt: f64, report: &CycleReport) -> Self {
        Self {
            cycle,
            t,
            dt,
            readings: report.readings,
            strengths: report.inference.strengths,
            w: report.inference.w,
            commanded: report.commanded,
            realized: report.realized,
            pose: report.pose,
        }
    }
}

/// Health status published by runtime
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum RuntimeHealth {
    Ok,
    Paused,
    DriveFault,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_wire_names() {
        assert_eq!(serde_json::to_string(&RuntimeHealth::Ok).unwrap(), "\"ok\"");
        assert_eq!(
            serde_json::to_string(&RuntimeHealth::DriveFault).unwrap(),
            "\"drive_fault\""
        );
    }

    #[test]
    fn test_run_command_from_json() {
        let cmd: RunCommand = serde_json::from_str(r#"{"run": false}"#).unwrap();
        assert_eq!(cmd, RunCommand { run: false });
        assert!(serde_json::from_str::<RunCommand>(r#"{"go": true}"#).is_err());
    }
}
