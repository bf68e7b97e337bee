// Drive module for the line follower base
//
// Provides:
// - Differential-drive inverse/forward kinematics and odometry
// - Sensing/actuation traits with rad/s <-> deg/s conversions
// - Serial bridge and simulated backends

pub mod driver;
pub mod kinematics;
pub mod serial;
pub mod sim;

pub use driver::{
    DriveBase, DriveError, ReflectancePair, ReflectanceSensors, WheelActuators, degps_to_radps,
    radps_to_degps,
};
pub use kinematics::{BodyRates, DiffDriveKinematics, Geometry, RobotPose, WheelVelocityPair};
pub use serial::SerialBridge;
pub use sim::{SimConfig, SimulatedBase, Track};
