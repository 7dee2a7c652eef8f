//! Run configuration.

use crate::{CoreError, CoreResult, Round};

/// Top-level simulation configuration.
///
/// Every field is a plain scalar.  The agents treat them as opaque constants
/// handed over at construction time.  Typically loaded from a JSON file by
/// the application crate (with the `serde` feature) and passed to the
/// population generator and the simulation builder.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MatchConfig {
    /// Number of students (N).
    pub student_count: usize,

    /// Number of cafeterias (M).  Also the denominator of the satisfaction
    /// score `1 - rank / M`.
    pub cafeteria_count: usize,

    /// Number of meal time slots (T).  Must be in `1..=256`.
    pub slot_count: usize,

    /// Seats per cafeteria (C).
    pub capacity: u32,

    /// Student budget (B).  Carried through to the students but unused by
    /// the negotiation.
    pub budget: u32,

    /// Probability that a student ranks its nearby cafeteria first (P).
    pub proximity_probability: f64,

    /// A student is reported as satisfied when its score reaches this (S).
    pub satisfaction_threshold: f64,

    /// Weight of mean satisfaction against occupancy in the manager's
    /// performance figure (W).
    pub objective_weight: f64,

    /// Hard cap on rounds.  Reaching it ends the run with a partial result.
    pub max_rounds: u64,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            student_count:          100,
            cafeteria_count:        10,
            slot_count:             5,
            capacity:               20,
            budget:                 100,
            proximity_probability:  0.8,
            satisfaction_threshold: 0.5,
            objective_weight:       0.6,
            max_rounds:             32,
            seed:                   42,
        }
    }
}

impl MatchConfig {
    /// The round at which the run is cut off (inclusive upper bound).
    #[inline]
    pub fn last_round(&self) -> Round {
        Round(self.max_rounds)
    }

    /// Reject values the generator or the manager cannot work with.
    pub fn validate(&self) -> CoreResult<()> {
        let unit = |name: &str, v: f64| {
            if (0.0..=1.0).contains(&v) {
                Ok(())
            } else {
                Err(CoreError::Config(format!("{name} must be in [0, 1], got {v}")))
            }
        };
        unit("proximity_probability", self.proximity_probability)?;
        unit("satisfaction_threshold", self.satisfaction_threshold)?;
        unit("objective_weight", self.objective_weight)?;

        if self.slot_count == 0 || self.slot_count > 256 {
            return Err(CoreError::Config(format!(
                "slot_count must be in 1..=256, got {}",
                self.slot_count
            )));
        }
        if self.max_rounds == 0 {
            return Err(CoreError::Config("max_rounds must be at least 1".into()));
        }
        if u32::try_from(self.student_count).is_err() || u32::try_from(self.cafeteria_count).is_err() {
            return Err(CoreError::Config("population does not fit 32-bit ids".into()));
        }
        Ok(())
    }
}
