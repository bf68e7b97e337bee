// Zero-order Sugeno inference: product AND, weighted-average defuzzification
//
// Rule base (left sensor, right sensor -> angular velocity):
//   Black, White -> turn_left   (+1.0 rad/s by default)
//   White, Black -> turn_right  (-1.0 rad/s by default)
//   Gray,  Gray  -> straight    ( 0.0 rad/s by default)

use serde::{Deserialize, Serialize};

use super::membership::{Memberships, ReflectanceSets};

/// Crisp outputs of the three rules, in rad/s
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConsequents {
    pub black_white: f64,
    pub white_black: f64,
    pub gray_gray: f64,
}

impl Default for RuleConsequents {
    fn default() -> Self {
        Self {
            black_white: 1.0,
            white_black: -1.0,
            gray_gray: 0.0,
        }
    }
}

/// Sets and consequents, as read from configuration
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FuzzyConfig {
    pub sets: ReflectanceSets,
    pub consequents: RuleConsequents,
}

/// Firing strength of each rule for one pair of readings
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FiringStrengths {
    pub black_white: f64,
    pub white_black: f64,
    pub gray_gray: f64,
}

impl FiringStrengths {
    pub fn total(&self) -> f64 {
        self.black_white + self.white_black + self.gray_gray
    }
}

/// Full trace of one inference, kept for telemetry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Inference {
    pub left: Memberships,
    pub right: Memberships,
    pub strengths: FiringStrengths,
    /// Steering command in rad/s
    pub w: f64,
}

/// Stateless steering engine
#[derive(Debug, Clone, Copy, Default)]
pub struct FuzzyInferenceEngine {
    sets: ReflectanceSets,
    consequents: RuleConsequents,
}

impl FuzzyInferenceEngine {
    pub fn new(config: FuzzyConfig) -> Self {
        Self {
            sets: config.sets,
            consequents: config.consequents,
        }
    }

    pub fn sets(&self) -> &ReflectanceSets {
        &self.sets
    }

    /// Angular velocity command (rad/s) for a left/right reading pair
    pub fn steer(&self, left: f64, right: f64) -> f64 {
        self.infer(left, right).w
    }

    /// Run fuzzification, rule evaluation and defuzzification
    pub fn infer(&self, left: f64, right: f64) -> Inference {
        let left = self.sets.fuzzify(left);
        let right = self.sets.fuzzify(right);

        // Algebraic AND (product), not min
        let strengths = FiringStrengths {
            black_white: left.black * right.white,
            white_black: left.white * right.black,
            gray_gray: left.gray * right.gray,
        };

        Inference {
            left,
            right,
            strengths,
            w: self.defuzzify(&strengths),
        }
    }

    /// Weighted average of the consequents; 0 when no rule fires
    fn defuzzify(&self, s: &FiringStrengths) -> f64 {
        let c = &self.consequents;
        let numerator =
            s.black_white * c.black_white + s.white_black * c.white_black + s.gray_gray * c.gray_gray;
        let denominator = s.total();

        if denominator == 0.0 {
            return 0.0;
        }
        numerator / denominator
    }
}

/// Steering with the default rule base
pub fn fuzzy_w(left: f64, right: f64) -> f64 {
    FuzzyInferenceEngine::default().steer(left, right)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposite_extremes_saturate() {
        assert_eq!(fuzzy_w(10.0, 90.0), 1.0);
        assert_eq!(fuzzy_w(90.0, 10.0), -1.0);
    }

    #[test]
    fn test_centered_gray_goes_straight() {
        assert_eq!(fuzzy_w(50.0, 50.0), 0.0);
    }

    #[test]
    fn test_symmetric_gray_readings_go_straight() {
        // Rules 1 and 2 need opposite extremes, so only the straight rule
        // can carry weight on a symmetric reading
        let engine = FuzzyInferenceEngine::default();
        let mut x = 30.5;
        while x < 70.0 {
            assert!(engine.sets().gray(x) > 0.0);
            assert_eq!(engine.steer(x, x), 0.0, "steer({x}, {x})");
            x += 0.5;
        }
    }

    #[test]
    fn test_no_rule_fires_returns_zero() {
        let engine = FuzzyInferenceEngine::default();
        let inference = engine.infer(25.0, 25.0);
        assert_eq!(inference.strengths.total(), 0.0);
        assert_eq!(inference.w, 0.0);

        // Both on the floor, both on the line, and Gray's feet
        assert_eq!(fuzzy_w(90.0, 90.0), 0.0);
        assert_eq!(fuzzy_w(5.0, 5.0), 0.0);
        assert_eq!(fuzzy_w(30.0, 70.0), 0.0);
    }

    #[test]
    fn test_product_and_changes_weights() {
        // left=35: black 0.25, gray 0.25; right=62: white 0.1, gray 0.4
        let inference = FuzzyInferenceEngine::default().infer(35.0, 62.0);
        let s = inference.strengths;
        assert!((s.black_white - 0.025).abs() < 1e-12);
        assert_eq!(s.white_black, 0.0);
        assert!((s.gray_gray - 0.1).abs() < 1e-12);
        // 0.025 / 0.125 = 0.2; min-AND would give 0.1 / 0.35
        assert!((inference.w - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_antisymmetric() {
        let engine = FuzzyInferenceEngine::default();
        for (l, r) in [(35.0, 75.0), (15.0, 65.0), (38.0, 62.0), (22.0, 85.0)] {
            let a = engine.steer(l, r);
            let b = engine.steer(r, l);
            assert!((a + b).abs() < 1e-12, "steer({l},{r})={a}, steer({r},{l})={b}");
        }
    }

    #[test]
    fn test_output_bounded_by_consequents() {
        let engine = FuzzyInferenceEngine::default();
        for l in (0..=100).step_by(5) {
            for r in (0..=100).step_by(5) {
                let w = engine.steer(l as f64, r as f64);
                assert!((-1.0..=1.0).contains(&w), "steer({l},{r})={w}");
            }
        }
    }

    #[test]
    fn test_custom_consequents() {
        let engine = FuzzyInferenceEngine::new(FuzzyConfig {
            consequents: RuleConsequents {
                black_white: 2.5,
                white_black: -0.5,
                gray_gray: 0.1,
            },
            ..FuzzyConfig::default()
        });
        assert_eq!(engine.steer(10.0, 90.0), 2.5);
        assert_eq!(engine.steer(90.0, 10.0), -0.5);
        assert!((engine.steer(50.0, 50.0) - 0.1).abs() < 1e-12);
    }
}
