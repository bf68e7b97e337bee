// Differential-drive (unicycle) kinematics for the line follower base
//
// Inverse: body velocities (u, w) -> wheel angular velocities
// Forward: wheel angular velocities -> body rates -> forward-Euler pose update
//
// Everything here is in SI units and radians. Conversion to whatever the
// motors expect lives in the driver layer.

use serde::{Deserialize, Serialize};

/// Wheel configuration of the base
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Geometry {
    /// Wheel diameter in meters
    pub wheel_diameter: f64,
    /// Distance between the two wheel contact points in meters
    pub axle_length: f64,
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            wheel_diameter: 0.0555,
            axle_length: 0.152,
        }
    }
}

impl Geometry {
    pub fn wheel_radius(&self) -> f64 {
        self.wheel_diameter / 2.0
    }
}

/// Left/right wheel angular velocities in rad/s
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WheelVelocityPair {
    pub left: f64,
    pub right: f64,
}

impl WheelVelocityPair {
    pub fn new(left: f64, right: f64) -> Self {
        Self { left, right }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    /// Apply the same transform to both wheels
    pub fn map(self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            left: f(self.left),
            right: f(self.right),
        }
    }
}

/// World-frame pose (x, y in meters, phi in radians, counter-clockwise positive)
///
/// `phi` is never wrapped; it accumulates across full turns.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RobotPose {
    pub x: f64,
    pub y: f64,
    pub phi: f64,
}

impl RobotPose {
    pub fn new(x: f64, y: f64, phi: f64) -> Self {
        Self { x, y, phi }
    }

    pub fn origin() -> Self {
        Self::default()
    }

    /// Explicit forward-Euler step with constant rates over `dt`
    pub fn integrate(&self, rates: &BodyRates, dt: f64) -> Self {
        Self {
            x: self.x + rates.xp * dt,
            y: self.y + rates.yp * dt,
            phi: self.phi + rates.phip * dt,
        }
    }

    pub fn heading_deg(&self) -> f64 {
        self.phi.to_degrees()
    }
}

/// World-frame velocity of the base: (xp, yp) in m/s, phip in rad/s
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BodyRates {
    pub xp: f64,
    pub yp: f64,
    pub phip: f64,
}

/// Unicycle model of a differential-drive base
#[derive(Debug, Clone, Copy)]
pub struct DiffDriveKinematics {
    wheel_radius: f64,
    axle_length: f64,
}

impl DiffDriveKinematics {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            wheel_radius: geometry.wheel_radius(),
            axle_length: geometry.axle_length,
        }
    }

    pub fn wheel_radius(&self) -> f64 {
        self.wheel_radius
    }

    pub fn axle_length(&self) -> f64 {
        self.axle_length
    }

    /// Convert body velocities to wheel angular velocities
    ///
    /// # Arguments
    /// * `u` - Forward velocity in m/s
    /// * `w` - Angular velocity in rad/s (positive = counter-clockwise)
    pub fn inverse(&self, u: f64, w: f64) -> WheelVelocityPair {
        let (r, l) = (self.wheel_radius, self.axle_length);
        WheelVelocityPair {
            left: (2.0 * u - w * l) / (2.0 * r),
            right: (2.0 * u + w * l) / (2.0 * r),
        }
    }

    /// World-frame rates for measured wheel speeds at heading `phi`
    pub fn forward(&self, wheels: WheelVelocityPair, phi: f64) -> BodyRates {
        let (r, l) = (self.wheel_radius, self.axle_length);
        let linear = r / 2.0 * (wheels.left + wheels.right);
        BodyRates {
            xp: linear * phi.cos(),
            yp: linear * phi.sin(),
            phip: r / l * (wheels.right - wheels.left),
        }
    }

    /// Odometry step: rates at the previous heading, integrated over `dt`
    pub fn odometry(
        &self,
        pose: RobotPose,
        wheels: WheelVelocityPair,
        dt: f64,
    ) -> (BodyRates, RobotPose) {
        let rates = self.forward(wheels, pose.phi);
        (rates, pose.integrate(&rates, dt))
    }
}
