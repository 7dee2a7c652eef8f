//! CSV output backend.
//!
//! Creates five files in the configured output directory:
//! - `assignments.csv`
//! - `occupancy.csv`
//! - `slot_occupancy.csv`
//! - `round_summaries.csv`
//! - `run_summary.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{AssignmentRow, OccupancyRow, OutputResult, RoundSummaryRow, RunSummaryRow, SlotLoadRow};

/// Writes simulation output to CSV files.
pub struct CsvWriter {
    assignments: Writer<File>,
    occupancy:   Writer<File>,
    slot_loads:  Writer<File>,
    rounds:      Writer<File>,
    run:         Writer<File>,
    finished:    bool,
}

impl CsvWriter {
    /// Open (or create) the CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut assignments = Writer::from_path(dir.join("assignments.csv"))?;
        assignments.write_record(["student_id", "slot", "cafeteria_id", "satisfaction", "satisfied"])?;

        let mut occupancy = Writer::from_path(dir.join("occupancy.csv"))?;
        occupancy.write_record(["cafeteria_id", "load", "capacity", "utilisation"])?;

        let mut slot_loads = Writer::from_path(dir.join("slot_occupancy.csv"))?;
        slot_loads.write_record(["cafeteria_id", "slot", "load"])?;

        let mut rounds = Writer::from_path(dir.join("round_summaries.csv"))?;
        rounds.write_record(["round", "sent", "delivered", "handled", "ignored", "dropped"])?;

        let mut run = Writer::from_path(dir.join("run_summary.csv"))?;
        run.write_record([
            "rounds",
            "converged",
            "matched",
            "unmatched",
            "satisfied",
            "mean_satisfaction",
            "manager_performance",
            "dropped_messages",
        ])?;

        Ok(Self {
            assignments,
            occupancy,
            slot_loads,
            rounds,
            run,
            finished: false,
        })
    }
}

impl OutputWriter for CsvWriter {
    fn write_round_summary(&mut self, row: &RoundSummaryRow) -> OutputResult<()> {
        self.rounds.write_record(&[
            row.round.to_string(),
            row.sent.to_string(),
            row.delivered.to_string(),
            row.handled.to_string(),
            row.ignored.to_string(),
            row.dropped.to_string(),
        ])?;
        Ok(())
    }

    fn write_assignments(&mut self, rows: &[AssignmentRow]) -> OutputResult<()> {
        for row in rows {
            self.assignments.write_record(&[
                row.student_id.to_string(),
                row.slot.to_string(),
                row.cafeteria_id.map(|c| c.to_string()).unwrap_or_default(),
                row.satisfaction.to_string(),
                (row.satisfied as u8).to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_occupancy(&mut self, rows: &[OccupancyRow]) -> OutputResult<()> {
        for row in rows {
            self.occupancy.write_record(&[
                row.cafeteria_id.to_string(),
                row.load.to_string(),
                row.capacity.to_string(),
                row.utilisation.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_slot_loads(&mut self, rows: &[SlotLoadRow]) -> OutputResult<()> {
        for row in rows {
            self.slot_loads.write_record(&[
                row.cafeteria_id.to_string(),
                row.slot.to_string(),
                row.load.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_run_summary(&mut self, row: &RunSummaryRow) -> OutputResult<()> {
        self.run.write_record(&[
            row.rounds.to_string(),
            (row.converged as u8).to_string(),
            row.matched.to_string(),
            row.unmatched.to_string(),
            row.satisfied.to_string(),
            row.mean_satisfaction.to_string(),
            row.manager_performance.to_string(),
            row.dropped_messages.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.assignments.flush()?;
        self.occupancy.flush()?;
        self.slot_loads.flush()?;
        self.rounds.flush()?;
        self.run.flush()?;
        Ok(())
    }
}
