// Simulated line follower base
//
// Stands in for the sensors and motors when no hardware is attached: a black
// line on a white floor, two downward reflectance sensors ahead of the axle,
// and wheels that turn at (gain x) the commanded speed for one control period.

use serde::{Deserialize, Serialize};

use super::driver::{ReflectancePair, ReflectanceSensors, Result, WheelActuators};
use super::kinematics::{DiffDriveKinematics, RobotPose, WheelVelocityPair};

/// Line layout on the floor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Track {
    /// Line along the world x-axis
    Straight { half_width: f64 },
    /// Circular line centred on the origin
    Circle { radius: f64, half_width: f64 },
}

impl Default for Track {
    fn default() -> Self {
        Track::Straight { half_width: 0.0125 }
    }
}

impl Track {
    /// Distance from a floor point to the line centre
    pub fn distance(&self, x: f64, y: f64) -> f64 {
        match *self {
            Track::Straight { .. } => y.abs(),
            Track::Circle { radius, .. } => (x.hypot(y) - radius).abs(),
        }
    }

    pub fn half_width(&self) -> f64 {
        match *self {
            Track::Straight { half_width } | Track::Circle { half_width, .. } => half_width,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub track: Track,
    /// Reflectance over the line
    pub line_reflectance: f64,
    /// Reflectance over bare floor
    pub floor_reflectance: f64,
    /// Width of the blurred band at each line edge (m)
    pub edge_width: f64,
    /// Sensor distance ahead of the axle (m)
    pub sensor_forward: f64,
    /// Lateral distance between the two sensors (m)
    pub sensor_spacing: f64,
    /// Ratio of realized to commanded wheel speed
    pub wheel_gain: f64,
    pub start: RobotPose,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            track: Track::default(),
            line_reflectance: 5.0,
            floor_reflectance: 95.0,
            edge_width: 0.01,
            sensor_forward: 0.06,
            sensor_spacing: 0.03,
            wheel_gain: 1.0,
            start: RobotPose::new(0.0, -0.012, 0.0),
        }
    }
}

impl SimConfig {
    /// Reflectance seen at a floor point
    pub fn reflectance_at(&self, x: f64, y: f64) -> f64 {
        let d = self.track.distance(x, y);
        let inner = self.track.half_width();
        let outer = inner + self.edge_width;

        if d <= inner {
            self.line_reflectance
        } else if d >= outer {
            self.floor_reflectance
        } else {
            let blend = (d - inner) / self.edge_width;
            self.line_reflectance + (self.floor_reflectance - self.line_reflectance) * blend
        }
    }
}

/// Simulated base with ground-truth pose
pub struct SimulatedBase {
    config: SimConfig,
    kinematics: DiffDriveKinematics,
    period: f64,
    pose: RobotPose,
    realized: WheelVelocityPair,
}

impl SimulatedBase {
    pub fn new(config: SimConfig, kinematics: DiffDriveKinematics, period: f64) -> Self {
        Self {
            pose: config.start,
            config,
            kinematics,
            period,
            realized: WheelVelocityPair::zero(),
        }
    }

    /// Ground-truth pose
    pub fn true_pose(&self) -> RobotPose {
        self.pose
    }

    /// Distance from the axle centre to the line centre
    pub fn line_offset(&self) -> f64 {
        self.config.track.distance(self.pose.x, self.pose.y)
    }

    /// World position of a sensor mounted `lateral` meters left of centre
    fn sensor_position(&self, lateral: f64) -> (f64, f64) {
        let (sin, cos) = self.pose.phi.sin_cos();
        let forward = self.config.sensor_forward;
        (
            self.pose.x + forward * cos - lateral * sin,
            self.pose.y + forward * sin + lateral * cos,
        )
    }
}

impl ReflectanceSensors for SimulatedBase {
    fn read_reflectance(&mut self) -> Result<ReflectancePair> {
        let half = self.config.sensor_spacing / 2.0;
        let (lx, ly) = self.sensor_position(half);
        let (rx, ry) = self.sensor_position(-half);
        Ok(ReflectancePair::new(
            self.config.reflectance_at(lx, ly),
            self.config.reflectance_at(rx, ry),
        ))
    }
}

impl WheelActuators for SimulatedBase {
    fn command_wheels(&mut self, wheels: WheelVelocityPair) -> Result<()> {
        let gain = self.config.wheel_gain;
        self.realized = wheels.map(|w| w * gain);
        let (_, pose) = self.kinematics.odometry(self.pose, self.realized, self.period);
        self.pose = pose;
        Ok(())
    }

    fn read_wheel_speeds(&mut self) -> Result<WheelVelocityPair> {
        Ok(self.realized)
    }

    fn brake(&mut self) -> Result<()> {
        self.realized = WheelVelocityPair::zero();
        Ok(())
    }
}
