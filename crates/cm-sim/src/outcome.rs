//! The run report handed to the results sink.

use std::collections::BTreeMap;

use cm_core::{CafeteriaId, StudentId, TimeSlot};

/// Final state of one student.
#[derive(Clone, Debug, PartialEq)]
pub struct Assignment {
    pub student:      StudentId,
    pub slot:         TimeSlot,
    /// `None` for unmatched students.
    pub cafeteria:    Option<CafeteriaId>,
    /// Confirmed score, 0 when unmatched.
    pub satisfaction: f64,
    /// Matched with a score at or above the satisfaction threshold.
    pub satisfied:    bool,
}

/// Final state of one cafeteria.
#[derive(Clone, Debug, PartialEq)]
pub struct Occupancy {
    pub cafeteria:   CafeteriaId,
    pub load:        u32,
    pub capacity:    u32,
    pub utilisation: f64,
    /// Seated students per time slot, indexed by `TimeSlot`.
    pub slot_load:   Vec<u32>,
}

/// Everything a run reports.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchOutcome {
    /// Rounds executed.
    pub rounds:              u64,
    /// `false` when the round cap cut the run short.
    pub converged:           bool,
    /// One entry per student, ascending by id.
    pub assignments:         Vec<Assignment>,
    /// One entry per cafeteria, ascending by id.
    pub occupancy:           Vec<Occupancy>,
    /// Mean satisfaction over all students (unmatched count as 0).
    pub mean_satisfaction:   f64,
    pub satisfied_count:     usize,
    pub unmatched_count:     usize,
    /// The manager's weighted objective.
    pub manager_performance: f64,
    pub dropped_messages:    u64,
}

impl MatchOutcome {
    pub fn new(
        rounds:              u64,
        converged:           bool,
        assignments:         Vec<Assignment>,
        occupancy:           Vec<Occupancy>,
        manager_performance: f64,
        dropped_messages:    u64,
    ) -> Self {
        let mean_satisfaction = if assignments.is_empty() {
            0.0
        } else {
            assignments.iter().map(|a| a.satisfaction).sum::<f64>() / assignments.len() as f64
        };
        let satisfied_count = assignments.iter().filter(|a| a.satisfied).count();
        let unmatched_count = assignments.iter().filter(|a| a.cafeteria.is_none()).count();
        Self {
            rounds,
            converged,
            assignments,
            occupancy,
            mean_satisfaction,
            satisfied_count,
            unmatched_count,
            manager_performance,
            dropped_messages,
        }
    }

    /// `student → cafeteria` (or `None` when unmatched).
    pub fn assignment_map(&self) -> BTreeMap<StudentId, Option<CafeteriaId>> {
        self.assignments.iter().map(|a| (a.student, a.cafeteria)).collect()
    }

    pub fn matched_count(&self) -> usize {
        self.assignments.len() - self.unmatched_count
    }
}
