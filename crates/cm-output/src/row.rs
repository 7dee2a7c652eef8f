//! Plain data row types written by output backends.

/// Final state of one student.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssignmentRow {
    pub student_id:   u32,
    pub slot:         u8,
    /// `None` for unmatched students (written as an empty field).
    pub cafeteria_id: Option<u32>,
    pub satisfaction: f64,
    pub satisfied:    bool,
}

/// Final load of one cafeteria.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OccupancyRow {
    pub cafeteria_id: u32,
    pub load:         u32,
    pub capacity:     u32,
    pub utilisation:  f64,
}

/// Final load of one cafeteria in one time slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotLoadRow {
    pub cafeteria_id: u32,
    pub slot:         u8,
    pub load:         u32,
}

/// Message traffic of one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundSummaryRow {
    pub round:     u64,
    pub sent:      u64,
    pub delivered: u64,
    pub handled:   u64,
    pub ignored:   u64,
    pub dropped:   u64,
}

/// Aggregate figures of one run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummaryRow {
    pub rounds:              u64,
    pub converged:           bool,
    pub matched:             u64,
    pub unmatched:           u64,
    pub satisfied:           u64,
    pub mean_satisfaction:   f64,
    pub manager_performance: f64,
    pub dropped_messages:    u64,
}
