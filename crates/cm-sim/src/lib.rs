//! `cm-sim` — round loop orchestrator for the cafeteria matching simulation.
//!
//! # Round loop
//!
//! ```text
//! for round in 1..=config.max_rounds:
//!   ① Dispatch — in fixed order (manager, students ↑, cafeterias ↑) each
//!                agent drains its inbox into a fresh Outbox, then replans
//!                (only the manager does anything there).
//!   ② Barrier  — every outbox is moved into the recipients' inboxes, in
//!                dispatch order.
//!   ③ Stop     — if the round sent nothing, the run has converged.
//! ```
//!
//! Hitting `max_rounds` with messages still in flight is not an error: the
//! run ends with `MatchOutcome::converged == false`.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                   |
//! |------------|----------------------------------------------------------|
//! | `parallel` | Dispatches students and cafeterias on Rayon's pool.      |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use cm_core::MatchConfig;
//! use cm_sim::{NoopObserver, SimBuilder, generate_population};
//!
//! let config = MatchConfig::default();
//! let population = generate_population(&config)?;
//! let mut sim = SimBuilder::new(config, population).build()?;
//! let outcome = sim.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod outcome;
pub mod population;
pub mod sim;


pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use outcome::{Assignment, MatchOutcome, Occupancy};
pub use population::{Population, generate_population};
pub use sim::{RoundStats, Sim};

use cm_core::MatchConfig;

/// Generate a population from `config`, run it to the end, and return the
/// outcome.  The single entry point used by applications.
pub fn run<O: SimObserver>(config: MatchConfig, observer: &mut O) -> SimResult<MatchOutcome> {
    let population = generate_population(&config)?;
    let mut sim = SimBuilder::new(config, population).build()?;
    sim.run(observer)
}
