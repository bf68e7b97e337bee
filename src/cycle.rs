// One control cycle of the line follower
//
// read sensors -> fuzzy steering -> inverse kinematics -> actuate
//   -> read realized wheel speeds -> forward kinematics -> new pose
//
// The pose is not stored here. The caller owns it, passes it in, and keeps
// the returned one for the next cycle.

use serde::{Deserialize, Serialize};

use crate::config::RobotConfig;
use crate::drive::driver::Result;
use crate::drive::{
    BodyRates, DiffDriveKinematics, ReflectancePair, ReflectanceSensors, RobotPose,
    WheelActuators, WheelVelocityPair,
};
use crate::fuzzy::{FuzzyInferenceEngine, Inference};

/// What happened during one cycle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CycleReport {
    pub readings: ReflectancePair,
    pub inference: Inference,
    pub commanded: WheelVelocityPair,
    pub realized: WheelVelocityPair,
    pub rates: BodyRates,
    pub pose: RobotPose,
}

impl CycleReport {
    /// Steering command (rad/s)
    pub fn w(&self) -> f64 {
        self.inference.w
    }
}

/// Steering engine plus kinematic model at a fixed forward speed
#[derive(Debug, Clone, Copy)]
pub struct ControlCycle {
    engine: FuzzyInferenceEngine,
    kinematics: DiffDriveKinematics,
    linear_speed: f64,
}

impl ControlCycle {
    pub fn new(
        engine: FuzzyInferenceEngine,
        kinematics: DiffDriveKinematics,
        linear_speed: f64,
    ) -> Self {
        Self {
            engine,
            kinematics,
            linear_speed,
        }
    }

    pub fn from_config(config: &RobotConfig) -> Self {
        Self::new(
            FuzzyInferenceEngine::new(config.fuzzy),
            DiffDriveKinematics::new(config.geometry),
            config.linear_speed,
        )
    }

    pub fn kinematics(&self) -> &DiffDriveKinematics {
        &self.kinematics
    }

    /// Wheel command for a pair of readings, without touching hardware
    pub fn plan(&self, readings: ReflectancePair) -> (Inference, WheelVelocityPair) {
        let inference = self.engine.infer(readings.left, readings.right);
        let commanded = self.kinematics.inverse(self.linear_speed, inference.w);
        (inference, commanded)
    }

    /// Run one full cycle against a backend, integrating odometry over `dt`
    pub fn step<B>(&self, io: &mut B, pose: RobotPose, dt: f64) -> Result<CycleReport>
    where
        B: ReflectanceSensors + WheelActuators + ?Sized,
    {
        let readings = io.read_reflectance()?;
        let (inference, commanded) = self.plan(readings);

        io.command_wheels(commanded)?;

        let realized = io.read_wheel_speeds()?;
        let (rates, pose) = self.kinematics.odometry(pose, realized, dt);

        Ok(CycleReport {
            readings,
            inference,
            commanded,
            realized,
            rates,
            pose,
        })
    }
}
