//! `cm-output` — results sink for the cafeteria matching simulation.
//!
//! | Backend | Files created                                                                 |
//! |---------|-------------------------------------------------------------------------------|
//! | CSV     | `assignments.csv`, `occupancy.csv`, `slot_occupancy.csv`, `round_summaries.csv`, `run_summary.csv` |
//!
//! Backends implement [`OutputWriter`] and are driven by
//! [`SimOutputObserver`], which implements `cm_sim::SimObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use cm_output::{CsvWriter, SimOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = SimOutputObserver::new(writer);
//! let outcome = sim.run(&mut obs)?;
//! if let Some(e) = obs.take_error() { eprintln!("output error: {e}"); }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(test)]
mod tests;

pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::SimOutputObserver;
pub use row::{AssignmentRow, OccupancyRow, RoundSummaryRow, RunSummaryRow, SlotLoadRow};
pub use writer::OutputWriter;
