//! The `Sim` struct and its round loop.

use cm_agent::{Agent, Cafeteria, DispatchStats, Manager, Message, Outbox, Student};
use cm_core::{AgentId, MatchConfig, Round};
use tracing::{debug, info, warn};

use crate::{Assignment, MatchOutcome, Occupancy, SimObserver, SimResult};

/// What happened in one round.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct RoundStats {
    pub round:         Round,
    /// Inbox consumption summed over all agents.
    pub dispatch:      DispatchStats,
    /// Messages written to outboxes this round.
    pub sent:          usize,
    /// Messages placed in an inbox at the barrier.
    pub delivered:     usize,
    /// Messages addressed to an agent that does not exist.
    pub undeliverable: usize,
}

/// The main simulation runner.
///
/// Holds every agent and drives the round loop (see the crate docs).  Agents
/// only ever touch their own state during dispatch; cross-agent effects go
/// through outboxes, which reach inboxes at the barrier.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim {
    /// Global configuration (population sizes, round cap, …).
    pub config: MatchConfig,

    /// The last completed round.  `Round::ZERO` before the first step.
    pub round: Round,

    pub manager: Manager,

    /// Students indexed by `StudentId`.
    pub students: Vec<Student>,

    /// Cafeterias indexed by `CafeteriaId`.
    pub cafeterias: Vec<Cafeteria>,

    /// Messages discarded so far: malformed, refused by a handler, or
    /// undeliverable.
    pub(crate) dropped: u64,
}

impl Sim {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run rounds until a round sends nothing or `config.max_rounds` is
    /// reached, then report.
    ///
    /// Calls observer hooks at every round boundary.  Use
    /// [`NoopObserver`][crate::NoopObserver] if you don't need callbacks.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<MatchOutcome> {
        let converged = loop {
            if self.round >= self.config.last_round() {
                break false;
            }
            observer.on_round_start(self.round.next());
            let stats = self.step();
            observer.on_round_end(&stats);
            if stats.delivered == 0 {
                break true;
            }
        };

        let outcome = self.outcome(converged);
        info!(
            rounds = outcome.rounds,
            converged,
            matched = outcome.matched_count(),
            unmatched = outcome.unmatched_count,
            mean_satisfaction = outcome.mean_satisfaction,
            "run finished"
        );
        observer.on_run_end(&outcome);
        Ok(outcome)
    }

    /// Run exactly one round: dispatch every agent in order, then deliver.
    pub fn step(&mut self) -> RoundStats {
        let round = self.round.next();
        self.round = round;

        let mut dispatch = DispatchStats::default();
        let mut outboxes = Vec::with_capacity(1 + self.students.len() + self.cafeterias.len());

        let (stats, out) = dispatch_one(&mut self.manager, round);
        dispatch += stats;
        outboxes.push(out);

        for (stats, out) in dispatch_all(&mut self.students, round) {
            dispatch += stats;
            outboxes.push(out);
        }
        for (stats, out) in dispatch_all(&mut self.cafeterias, round) {
            dispatch += stats;
            outboxes.push(out);
        }

        let sent: usize = outboxes.iter().map(Outbox::len).sum();
        let undeliverable = self.barrier(outboxes);
        self.dropped += (dispatch.dropped + undeliverable) as u64;

        let stats = RoundStats {
            round,
            dispatch,
            sent,
            delivered: sent - undeliverable,
            undeliverable,
        };
        debug!(%round, sent, handled = dispatch.handled, dropped = dispatch.dropped, "round complete");
        stats
    }

    /// Messages waiting in any inbox.
    pub fn in_flight(&self) -> usize {
        self.manager.inbox().len()
            + self.students.iter().map(|s| s.inbox().len()).sum::<usize>()
            + self.cafeterias.iter().map(|c| c.inbox().len()).sum::<usize>()
    }

    /// Build the report for the current state.
    pub fn outcome(&self, converged: bool) -> MatchOutcome {
        let threshold = self.config.satisfaction_threshold;

        let assignments = self
            .students
            .iter()
            .map(|s| {
                let confirmed = self.manager.confirmed_match(s.student_id());
                let satisfaction = confirmed.map_or(0.0, |(_, score)| score);
                Assignment {
                    student:   s.student_id(),
                    slot:      s.slot(),
                    cafeteria: confirmed.map(|(c, _)| c),
                    satisfaction,
                    satisfied: confirmed.is_some() && satisfaction >= threshold,
                }
            })
            .collect();

        // Seats come from the manager's confirmed pairs, the same source as
        // the assignments.  A roster entry whose confirmation is still in
        // flight when the round cap hits is not counted.
        let mut occupancy: Vec<Occupancy> = self
            .cafeterias
            .iter()
            .map(|c| Occupancy {
                cafeteria:   c.cafeteria_id(),
                load:        0,
                capacity:    c.capacity(),
                utilisation: 0.0,
                slot_load:   vec![0; self.config.slot_count],
            })
            .collect();
        for &(student, cafeteria) in self.manager.confirmed().keys() {
            let Some(occ) = occupancy.get_mut(cafeteria.index()) else {
                continue;
            };
            occ.load += 1;
            let slot = self.students.get(student.index()).map(|st| st.slot().index());
            if let Some(n) = slot.and_then(|i| occ.slot_load.get_mut(i)) {
                *n += 1;
            }
        }
        for occ in &mut occupancy {
            if occ.capacity > 0 {
                occ.utilisation = occ.load as f64 / occ.capacity as f64;
            }
        }

        MatchOutcome::new(
            self.round.0,
            converged,
            assignments,
            occupancy,
            self.manager.performance(),
            self.dropped,
        )
    }

    // ── Barrier ───────────────────────────────────────────────────────────

    /// Move every outbox into the recipients' inboxes, in dispatch order.
    /// Returns the number of messages with no recipient.
    pub(crate) fn barrier(&mut self, outboxes: Vec<Outbox>) -> usize {
        let mut undeliverable = 0;
        for msg in outboxes.into_iter().flat_map(Outbox::into_messages) {
            if let Err(msg) = self.deliver(msg) {
                warn!(receiver = %msg.receiver(), sender = %msg.sender(), kind = ?msg.kind(),
                    "no such agent; message dropped");
                undeliverable += 1;
            }
        }
        undeliverable
    }

    fn deliver(&mut self, msg: Message) -> Result<(), Message> {
        match msg.receiver() {
            AgentId::Manager => self.manager.deliver(msg),
            AgentId::Student(s) => match self.students.get_mut(s.index()) {
                Some(student) => student.deliver(msg),
                None => return Err(msg),
            },
            AgentId::Cafeteria(c) => match self.cafeterias.get_mut(c.index()) {
                Some(cafeteria) => cafeteria.deliver(msg),
                None => return Err(msg),
            },
        }
        Ok(())
    }
}

// ── Dispatch helpers ──────────────────────────────────────────────────────────

fn dispatch_one<A: Agent>(agent: &mut A, round: Round) -> (DispatchStats, Outbox) {
    let mut out = Outbox::new(agent.id());
    let stats = agent.dispatch_inbox(&mut out);
    agent.replan(round, &mut out);
    (stats, out)
}

/// Dispatch a slice of agents, returning their outboxes in slice order.
///
/// With the `parallel` feature the dispatches run on Rayon's pool.  Each
/// agent only mutates itself and its own outbox, and `collect` keeps slice
/// order, so the merged result is the same as the sequential one.
fn dispatch_all<A: Agent + Send>(agents: &mut [A], round: Round) -> Vec<(DispatchStats, Outbox)> {
    #[cfg(not(feature = "parallel"))]
    {
        agents.iter_mut().map(|a| dispatch_one(a, round)).collect()
    }

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;

        agents.par_iter_mut().map(|a| dispatch_one(a, round)).collect()
    }
}
