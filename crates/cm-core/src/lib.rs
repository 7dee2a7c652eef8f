//! `cm-core` — foundational types for the cafeteria matching simulation.
//!
//! This crate is a dependency of every other `cm-*` crate.  It has no `cm-*`
//! dependencies and minimal external ones (only `rand` and `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `StudentId`, `CafeteriaId`, `AgentId`                 |
//! | [`round`]       | `Round`, `TimeSlot`                                   |
//! | [`config`]      | `MatchConfig`                                         |
//! | [`rng`]         | `AgentRng` (per-student preference draws)            |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod ids;
pub mod rng;
pub mod round;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::MatchConfig;
pub use error::{CoreError, CoreResult};
pub use ids::{AgentId, CafeteriaId, StudentId};
pub use rng::AgentRng;
pub use round::{Round, TimeSlot};
