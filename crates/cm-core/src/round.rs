//! Simulation time model.
//!
//! The negotiation advances in discrete rounds.  A message sent during round
//! `k` is delivered at the barrier closing round `k` and handled by its
//! recipient during round `k + 1`.
//!
//! Students additionally carry a `TimeSlot` (the meal period they eat in).
//! Slots do not influence the protocol; they are reported per cafeteria.

use std::fmt;

// ── Round ─────────────────────────────────────────────────────────────────────

/// An absolute round counter.  Round 0 is "before the first dispatch".
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Round(pub u64);

impl Round {
    pub const ZERO: Round = Round(0);

    /// The round after `self`.
    #[inline]
    pub fn next(self) -> Round {
        Round(self.0 + 1)
    }
}

impl fmt::Display for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R{}", self.0)
    }
}

// ── TimeSlot ──────────────────────────────────────────────────────────────────

/// The meal period a student is scheduled to eat in, `0..slot_count`.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeSlot(pub u8);

impl TimeSlot {
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "slot {}", self.0)
    }
}
