//! Simulation observer trait for progress reporting and data collection.

use cm_core::Round;

use crate::{MatchOutcome, RoundStats};

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at key points in the
/// round loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example — progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter;
///
/// impl SimObserver for ProgressPrinter {
///     fn on_round_end(&mut self, stats: &RoundStats) {
///         println!("{}: {} messages in flight", stats.round, stats.delivered);
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each round, before any dispatch.
    fn on_round_start(&mut self, _round: Round) {}

    /// Called after the barrier closing a round.
    fn on_round_end(&mut self, _stats: &RoundStats) {}

    /// Called once with the final report.
    fn on_run_end(&mut self, _outcome: &MatchOutcome) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run` but
/// don't want progress callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
