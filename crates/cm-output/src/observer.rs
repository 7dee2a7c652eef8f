//! `SimOutputObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use cm_sim::{MatchOutcome, RoundStats, SimObserver};

use crate::OutputError;
use crate::row::{AssignmentRow, OccupancyRow, RoundSummaryRow, RunSummaryRow, SlotLoadRow};
use crate::writer::OutputWriter;

/// A [`SimObserver`] that writes round summaries as the run progresses and
/// the final report when it ends, to any [`OutputWriter`] backend.
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After `sim.run()` returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer:     W,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, last_error: None }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: crate::OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }

    fn write_outcome(&mut self, outcome: &MatchOutcome) -> crate::OutputResult<()> {
        let assignments: Vec<AssignmentRow> = outcome
            .assignments
            .iter()
            .map(|a| AssignmentRow {
                student_id:   a.student.0,
                slot:         a.slot.0,
                cafeteria_id: a.cafeteria.map(|c| c.0),
                satisfaction: a.satisfaction,
                satisfied:    a.satisfied,
            })
            .collect();
        self.writer.write_assignments(&assignments)?;

        let occupancy: Vec<OccupancyRow> = outcome
            .occupancy
            .iter()
            .map(|o| OccupancyRow {
                cafeteria_id: o.cafeteria.0,
                load:         o.load,
                capacity:     o.capacity,
                utilisation:  o.utilisation,
            })
            .collect();
        self.writer.write_occupancy(&occupancy)?;

        let slot_loads: Vec<SlotLoadRow> = outcome
            .occupancy
            .iter()
            .flat_map(|o| {
                o.slot_load.iter().enumerate().map(|(slot, &load)| SlotLoadRow {
                    cafeteria_id: o.cafeteria.0,
                    slot:         slot as u8,
                    load,
                })
            })
            .collect();
        self.writer.write_slot_loads(&slot_loads)?;

        self.writer.write_run_summary(&RunSummaryRow {
            rounds:              outcome.rounds,
            converged:           outcome.converged,
            matched:             outcome.matched_count() as u64,
            unmatched:           outcome.unmatched_count as u64,
            satisfied:           outcome.satisfied_count as u64,
            mean_satisfaction:   outcome.mean_satisfaction,
            manager_performance: outcome.manager_performance,
            dropped_messages:    outcome.dropped_messages,
        })
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_round_end(&mut self, stats: &RoundStats) {
        let row = RoundSummaryRow {
            round:     stats.round.0,
            sent:      stats.sent as u64,
            delivered: stats.delivered as u64,
            handled:   stats.dispatch.handled as u64,
            ignored:   stats.dispatch.ignored as u64,
            dropped:   (stats.dispatch.dropped + stats.undeliverable) as u64,
        };
        let result = self.writer.write_round_summary(&row);
        self.store_err(result);
    }

    fn on_run_end(&mut self, outcome: &MatchOutcome) {
        let result = self.write_outcome(outcome);
        self.store_err(result);
        let result = self.writer.finish();
        self.store_err(result);
    }
}
