//! Integration tests for cm-output.

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use crate::csv::CsvWriter;
    use crate::row::{AssignmentRow, OccupancyRow, RoundSummaryRow, RunSummaryRow, SlotLoadRow};
    use crate::writer::OutputWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn read(dir: &TempDir, file: &str) -> (Vec<String>, Vec<csv::StringRecord>) {
        let mut rdr = csv::Reader::from_path(dir.path().join(file)).unwrap();
        let headers = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        let rows = rdr.records().map(|r| r.unwrap()).collect();
        (headers, rows)
    }

    #[test]
    fn csv_files_created() {
        let dir = tmp();
        let _w = CsvWriter::new(dir.path()).unwrap();
        for file in [
            "assignments.csv",
            "occupancy.csv",
            "slot_occupancy.csv",
            "round_summaries.csv",
            "run_summary.csv",
        ] {
            assert!(dir.path().join(file).exists(), "{file} missing");
        }
    }

    #[test]
    fn csv_headers_correct() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        let (headers, _) = read(&dir, "assignments.csv");
        assert_eq!(headers, ["student_id", "slot", "cafeteria_id", "satisfaction", "satisfied"]);

        let (headers, _) = read(&dir, "occupancy.csv");
        assert_eq!(headers, ["cafeteria_id", "load", "capacity", "utilisation"]);

        let (headers, _) = read(&dir, "round_summaries.csv");
        assert_eq!(headers, ["round", "sent", "delivered", "handled", "ignored", "dropped"]);
    }

    #[test]
    fn unmatched_student_has_empty_cafeteria() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_assignments(&[
            AssignmentRow { student_id: 0, slot: 1, cafeteria_id: Some(3), satisfaction: 0.9, satisfied: true },
            AssignmentRow { student_id: 1, slot: 0, cafeteria_id: None,    satisfaction: 0.0, satisfied: false },
        ])
        .unwrap();
        w.finish().unwrap();

        let (_, rows) = read(&dir, "assignments.csv");
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][2], "3");
        assert_eq!(&rows[0][4], "1"); // satisfied as integer
        assert_eq!(&rows[1][2], "");
        assert_eq!(&rows[1][4], "0");
    }

    #[test]
    fn occupancy_and_slot_rows() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_occupancy(&[OccupancyRow { cafeteria_id: 2, load: 5, capacity: 20, utilisation: 0.25 }])
            .unwrap();
        w.write_slot_loads(&[
            SlotLoadRow { cafeteria_id: 2, slot: 0, load: 3 },
            SlotLoadRow { cafeteria_id: 2, slot: 1, load: 2 },
        ])
        .unwrap();
        w.finish().unwrap();

        let (_, rows) = read(&dir, "occupancy.csv");
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][1], "5");
        assert_eq!(&rows[0][3], "0.25");

        let (_, rows) = read(&dir, "slot_occupancy.csv");
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[1][1], "1");
        assert_eq!(&rows[1][2], "2");
    }

    #[test]
    fn round_and_run_summary() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_round_summary(&RoundSummaryRow {
            round: 3, sent: 12, delivered: 11, handled: 9, ignored: 2, dropped: 1,
        })
        .unwrap();
        w.write_run_summary(&RunSummaryRow {
            rounds:              7,
            converged:           true,
            matched:             4,
            unmatched:           1,
            satisfied:           3,
            mean_satisfaction:   0.5,
            manager_performance: 0.7,
            dropped_messages:    0,
        })
        .unwrap();
        w.finish().unwrap();

        let (_, rows) = read(&dir, "round_summaries.csv");
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "3");
        assert_eq!(&rows[0][5], "1");

        let (headers, rows) = read(&dir, "run_summary.csv");
        assert_eq!(headers.len(), 8);
        assert_eq!(&rows[0][0], "7");
        assert_eq!(&rows[0][1], "1");
        assert_eq!(&rows[0][5], "0.5");
    }

    #[test]
    fn csv_finish_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }

    #[test]
    fn csv_empty_assignments_ok() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_assignments(&[]).unwrap();
    }

    #[test]
    fn missing_directory_is_io_error() {
        let dir = tmp();
        let missing = dir.path().join("does-not-exist");
        assert!(CsvWriter::new(&missing).is_err());
    }
}

// ── Observer tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod observer_tests {
    use tempfile::TempDir;

    use cm_agent::{Cafeteria, Student};
    use cm_core::{CafeteriaId, MatchConfig, StudentId, TimeSlot};
    use cm_sim::{Population, SimBuilder};

    use crate::csv::CsvWriter;
    use crate::observer::SimOutputObserver;
    use crate::row::{AssignmentRow, OccupancyRow, RoundSummaryRow, RunSummaryRow, SlotLoadRow};
    use crate::writer::OutputWriter;
    use crate::{OutputError, OutputResult};

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    /// Two students competing for the single seat of cafeteria 0.
    fn contested_seat() -> cm_sim::Sim {
        let config = MatchConfig {
            student_count:   2,
            cafeteria_count: 1,
            slot_count:      2,
            ..MatchConfig::default()
        };
        let students = (0..2)
            .map(|i| Student::new(StudentId(i), TimeSlot(i as u8), vec![CafeteriaId(0)], 1))
            .collect();
        let population = Population::new(students, vec![Cafeteria::new(CafeteriaId(0), 1)]);
        SimBuilder::new(config, population).build().unwrap()
    }

    #[test]
    fn integration_csv() {
        let mut sim = contested_seat();
        let dir = tmp();
        let writer = CsvWriter::new(dir.path()).unwrap();
        let mut obs = SimOutputObserver::new(writer);
        let outcome = sim.run(&mut obs).unwrap();
        assert!(obs.take_error().is_none(), "no write errors expected");

        let mut rdr = csv::Reader::from_path(dir.path().join("round_summaries.csv")).unwrap();
        let rounds: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rounds.len() as u64, outcome.rounds);
        // The last round is the quiet one.
        assert_eq!(&rounds[rounds.len() - 1][2], "0");

        let mut rdr = csv::Reader::from_path(dir.path().join("assignments.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        // Equal scores: the lower student id wins the seat.
        assert_eq!(&rows[0][2], "0");
        assert_eq!(&rows[1][2], "");

        // 1 cafeteria × 2 slots; student 0 sits in slot 0.
        let mut rdr = csv::Reader::from_path(dir.path().join("slot_occupancy.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][2], "1");
        assert_eq!(&rows[1][2], "0");

        let mut rdr = csv::Reader::from_path(dir.path().join("run_summary.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][1], "1"); // converged
        assert_eq!(&rows[0][2], "1"); // matched
        assert_eq!(&rows[0][3], "1"); // unmatched
    }

    /// Fails every write after the first `ok` calls.
    struct FailingWriter {
        ok:       usize,
        calls:    usize,
        finished: usize,
    }

    impl FailingWriter {
        fn tick(&mut self) -> OutputResult<()> {
            self.calls += 1;
            if self.calls > self.ok {
                Err(OutputError::Io(std::io::Error::other(format!("write {}", self.calls))))
            } else {
                Ok(())
            }
        }
    }

    impl OutputWriter for FailingWriter {
        fn write_round_summary(&mut self, _: &RoundSummaryRow) -> OutputResult<()> { self.tick() }
        fn write_assignments(&mut self, _: &[AssignmentRow]) -> OutputResult<()> { self.tick() }
        fn write_occupancy(&mut self, _: &[OccupancyRow]) -> OutputResult<()> { self.tick() }
        fn write_slot_loads(&mut self, _: &[SlotLoadRow]) -> OutputResult<()> { self.tick() }
        fn write_run_summary(&mut self, _: &RunSummaryRow) -> OutputResult<()> { self.tick() }
        fn finish(&mut self) -> OutputResult<()> {
            self.finished += 1;
            Ok(())
        }
    }

    #[test]
    fn first_error_is_kept_and_run_completes() {
        let mut sim = contested_seat();
        let mut obs = SimOutputObserver::new(FailingWriter { ok: 1, calls: 0, finished: 0 });
        let outcome = sim.run(&mut obs).unwrap();
        assert!(outcome.converged);

        let err = obs.take_error().expect("a write error");
        assert!(err.to_string().contains("write 2"), "got {err}");
        assert!(obs.take_error().is_none());

        // finish runs even after a failed write.
        assert_eq!(obs.into_writer().finished, 1);
    }
}
