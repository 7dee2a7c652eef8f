//! The `OutputWriter` trait implemented by backend writers.

use crate::{AssignmentRow, OccupancyRow, OutputResult, RoundSummaryRow, RunSummaryRow, SlotLoadRow};

/// A results sink.
///
/// From the observer's perspective writes are infallible: errors are stored
/// and retrieved with [`SimOutputObserver::take_error`][crate::SimOutputObserver::take_error].
pub trait OutputWriter {
    /// Write one round summary row.
    fn write_round_summary(&mut self, row: &RoundSummaryRow) -> OutputResult<()>;

    /// Write the final student assignments.
    fn write_assignments(&mut self, rows: &[AssignmentRow]) -> OutputResult<()>;

    /// Write the final per-cafeteria occupancy.
    fn write_occupancy(&mut self, rows: &[OccupancyRow]) -> OutputResult<()>;

    /// Write the final per-cafeteria, per-slot occupancy.
    fn write_slot_loads(&mut self, rows: &[SlotLoadRow]) -> OutputResult<()>;

    /// Write the aggregate figures of the run.
    fn write_run_summary(&mut self, row: &RunSummaryRow) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent; safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
