// Fuzzy line follower runtime for a differential-drive base
//
// - `fuzzy`: reflectance membership functions and the steering engine
// - `drive`: kinematics, odometry and the sensing/actuation backends
// - `cycle`: one read -> steer -> actuate -> odometry pass
// - `runtime`: fixed-period loop publishing telemetry over Zenoh

pub mod config;
pub mod cycle;
pub mod drive;
pub mod fuzzy;
pub mod messages;
pub mod runtime;
