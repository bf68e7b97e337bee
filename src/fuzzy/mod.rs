// Fuzzy steering for the line follower
//
// Provides:
// - Reflectance membership functions (Black, White, Gray)
// - Sugeno inference engine producing an angular velocity command

pub mod engine;
pub mod membership;

pub use engine::{FiringStrengths, FuzzyConfig, FuzzyInferenceEngine, Inference, RuleConsequents, fuzzy_w};
pub use membership::{Memberships, ReflectanceSets};
