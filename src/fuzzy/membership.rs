// Membership functions over the reflectance domain (0 = darkest, 100 = brightest)
//
// Each set is a pure function of one scalar. Degrees are not normalised across
// sets: they may overlap (Black/Gray around 35) or leave gaps (around 25).

use serde::{Deserialize, Serialize};

/// Shoulder that is fully true below `full` and ramps down to 0 at `zero`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallingShoulder {
    pub full: f64,
    pub zero: f64,
}

impl Default for FallingShoulder {
    fn default() -> Self {
        Self {
            full: 20.0,
            zero: 40.0,
        }
    }
}

impl FallingShoulder {
    pub fn degree(&self, value: f64) -> f64 {
        if value < self.full {
            1.0
        } else if value < self.zero {
            (self.zero - value) / (self.zero - self.full)
        } else {
            0.0
        }
    }
}

/// Shoulder that is fully true above `full` and ramps down to 0 at `zero`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RisingShoulder {
    pub zero: f64,
    pub full: f64,
}

impl Default for RisingShoulder {
    fn default() -> Self {
        Self {
            zero: 60.0,
            full: 80.0,
        }
    }
}

impl RisingShoulder {
    pub fn degree(&self, value: f64) -> f64 {
        if value > self.full {
            1.0
        } else if value > self.zero {
            (value - self.zero) / (self.full - self.zero)
        } else {
            0.0
        }
    }
}

/// Triangle over the open interval (lower, upper) peaking at `peak`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Triangle {
    pub lower: f64,
    pub peak: f64,
    pub upper: f64,
}

impl Default for Triangle {
    fn default() -> Self {
        Self {
            lower: 30.0,
            peak: 50.0,
            upper: 70.0,
        }
    }
}

impl Triangle {
    pub fn degree(&self, value: f64) -> f64 {
        if self.lower < value && value < self.upper {
            if value < self.peak {
                (value - self.lower) / (self.peak - self.lower)
            } else {
                (self.upper - value) / (self.upper - self.peak)
            }
        } else {
            0.0
        }
    }
}

/// The three reflectance sets used by the line follower
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReflectanceSets {
    pub black: FallingShoulder,
    pub white: RisingShoulder,
    pub gray: Triangle,
}

impl Default for ReflectanceSets {
    fn default() -> Self {
        Self {
            black: FallingShoulder::default(),
            white: RisingShoulder::default(),
            gray: Triangle::default(),
        }
    }
}

/// Degrees of one reading in every set
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Memberships {
    pub black: f64,
    pub white: f64,
    pub gray: f64,
}

impl ReflectanceSets {
    pub fn black(&self, value: f64) -> f64 {
        self.black.degree(value)
    }

    pub fn white(&self, value: f64) -> f64 {
        self.white.degree(value)
    }

    pub fn gray(&self, value: f64) -> f64 {
        self.gray.degree(value)
    }

    /// Fuzzify a single reading
    pub fn fuzzify(&self, value: f64) -> Memberships {
        Memberships {
            black: self.black(value),
            white: self.white(value),
            gray: self.gray(value),
        }
    }

    /// Check breakpoint ordering, returning the offending set name
    pub fn check_ordering(&self) -> Result<(), &'static str> {
        if !(self.black.full < self.black.zero) {
            return Err("black");
        }
        if !(self.white.zero < self.white.full) {
            return Err("white");
        }
        if !(self.gray.lower < self.gray.peak && self.gray.peak < self.gray.upper) {
            return Err("gray");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < EPS
    }

    #[test]
    fn test_black_shoulder() {
        let sets = ReflectanceSets::default();
        for v in [-50.0, 0.0, 10.0, 19.999] {
            assert_eq!(sets.black(v), 1.0, "black({v})");
        }
        for v in [20.0, 25.0, 30.0, 35.0, 39.9] {
            assert!(close(sets.black(v), (40.0 - v) / 20.0), "black({v})");
        }
        for v in [40.0, 41.0, 100.0, 250.0] {
            assert_eq!(sets.black(v), 0.0, "black({v})");
        }
    }

    #[test]
    fn test_white_shoulder() {
        let sets = ReflectanceSets::default();
        for v in [80.001, 90.0, 100.0, 150.0] {
            assert_eq!(sets.white(v), 1.0, "white({v})");
        }
        for v in [60.5, 65.0, 70.0, 80.0] {
            assert!(close(sets.white(v), (v - 60.0) / 20.0), "white({v})");
        }
        for v in [-10.0, 0.0, 59.0, 60.0] {
            assert_eq!(sets.white(v), 0.0, "white({v})");
        }
    }

    #[test]
    fn test_gray_triangle() {
        let sets = ReflectanceSets::default();
        // Open interval: the feet themselves are outside the set
        assert_eq!(sets.gray(30.0), 0.0);
        assert_eq!(sets.gray(70.0), 0.0);
        assert_eq!(sets.gray(50.0), 1.0);
        assert!(close(sets.gray(45.0), 0.75));
        assert!(close(sets.gray(35.0), 0.25));
        assert!(close(sets.gray(60.0), 0.5));
        assert_eq!(sets.gray(25.0), 0.0);
        assert_eq!(sets.gray(95.0), 0.0);
    }

    #[test]
    fn test_degrees_stay_in_unit_interval() {
        let sets = ReflectanceSets::default();
        let mut v = -20.0;
        while v <= 120.0 {
            let m = sets.fuzzify(v);
            for d in [m.black, m.white, m.gray] {
                assert!((0.0..=1.0).contains(&d), "degree {d} at {v}");
            }
            v += 0.25;
        }
    }

    #[test]
    fn test_sets_do_not_partition() {
        let sets = ReflectanceSets::default();
        // Gap: 25 is partly black but not gray or white
        let gap = sets.fuzzify(25.0);
        assert!(close(gap.black + gap.white + gap.gray, 0.75));
        // Overlap: 35 is both black and gray
        let overlap = sets.fuzzify(35.0);
        assert!(overlap.black > 0.0 && overlap.gray > 0.0);
    }

    #[test]
    fn test_nan_has_no_membership() {
        let m = ReflectanceSets::default().fuzzify(f64::NAN);
        assert_eq!(m, Memberships::default());
    }

    #[test]
    fn test_check_ordering() {
        assert!(ReflectanceSets::default().check_ordering().is_ok());

        let mut sets = ReflectanceSets::default();
        sets.gray.peak = 80.0;
        assert_eq!(sets.check_ordering(), Err("gray"));

        let mut sets = ReflectanceSets::default();
        sets.black.zero = 10.0;
        assert_eq!(sets.check_ordering(), Err("black"));
    }
}
