//! The `Manager` role — the matching engine.
//!
//! # Pair lifecycle
//!
//! Every `(student, cafeteria)` pair moves forward only:
//!
//! ```text
//!  (unrequested) ─Request─▶ Pending ─Offer─▶ Offered ─select─▶ Accepted ─2×Confirm─▶ Confirmed
//!                              │                 │                 │
//!                              └──Reject─────────┴──not selected───┴──refused──▶ closed
//! ```
//!
//! A pair sits in at most one of the four stage maps at a time.  Closed pairs
//! are remembered so they are never requested again.
//!
//! # Selection
//!
//! All outstanding offers are resolved in the round they arrive.  They are
//! visited by descending score, then ascending student id, then ascending
//! cafeteria id.  An offer is accepted when its student holds no other
//! acceptance and its cafeteria still has an uncommitted seat; every other
//! offer is rejected.  This is the only place seats are committed, so no
//! `Accept` can ever push a cafeteria past its capacity.

use std::collections::{BTreeMap, BTreeSet};

use cm_core::{AgentId, CafeteriaId, Round, StudentId};
use tracing::debug;

use crate::{Agent, HandlerTable, Message, MessageKind, Outbox, Payload, ProtocolError, ProtocolResult};

static HANDLERS: HandlerTable<Manager> = HandlerTable::new()
    .on(MessageKind::Offer, Manager::on_offer)
    .on(MessageKind::Reject, Manager::on_reject)
    .on(MessageKind::Confirm, Manager::on_confirm);

/// A `(student, cafeteria)` negotiation key.  Tuple order gives the
/// tie-break order: lower student id first.
pub type Pair = (StudentId, CafeteriaId);

/// Where a live pair currently is in the negotiation.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum PairStage {
    Pending,
    Offered,
    Accepted,
    Confirmed,
    Closed,
}

#[derive(Copy, Clone, Debug)]
struct Acceptance {
    score:               f64,
    student_confirmed:   bool,
    cafeteria_confirmed: bool,
}

/// The matchmaking coordinator.
#[derive(Debug)]
pub struct Manager {
    objective_weight: f64,
    student_count:    usize,
    /// Seats per cafeteria, indexed by `CafeteriaId`.
    capacities:       Vec<u32>,
    /// Seats promised by an `Accept` that has not been refused.
    committed:        Vec<u32>,

    pending_requests: BTreeMap<Pair, Round>,
    pending_offers:   BTreeMap<Pair, f64>,
    accepted:         BTreeMap<Pair, Acceptance>,
    confirmed:        BTreeMap<Pair, f64>,
    closed:           BTreeSet<Pair>,

    /// The cafeteria each student was accepted into.  Never cleared: a
    /// student's assignment is final, so it is never accepted twice.
    holder:           BTreeMap<StudentId, CafeteriaId>,

    inbox:            Vec<Message>,
}

impl Manager {
    /// `capacities[c]` is the seat count of `CafeteriaId(c)`.
    pub fn new(student_count: usize, capacities: Vec<u32>, objective_weight: f64) -> Self {
        let committed = vec![0; capacities.len()];
        Self {
            objective_weight,
            student_count,
            capacities,
            committed,
            pending_requests: BTreeMap::new(),
            pending_offers:   BTreeMap::new(),
            accepted:         BTreeMap::new(),
            confirmed:        BTreeMap::new(),
            closed:           BTreeSet::new(),
            holder:           BTreeMap::new(),
            inbox:            Vec::new(),
        }
    }

    pub fn objective_weight(&self) -> f64 {
        self.objective_weight
    }

    pub fn cafeteria_count(&self) -> usize {
        self.capacities.len()
    }

    pub fn student_count(&self) -> usize {
        self.student_count
    }

    // ── Inspection ────────────────────────────────────────────────────────

    /// Stage of `pair`, or `None` if it was never requested.
    pub fn stage(&self, pair: Pair) -> Option<PairStage> {
        if self.pending_requests.contains_key(&pair) {
            Some(PairStage::Pending)
        } else if self.pending_offers.contains_key(&pair) {
            Some(PairStage::Offered)
        } else if self.accepted.contains_key(&pair) {
            Some(PairStage::Accepted)
        } else if self.confirmed.contains_key(&pair) {
            Some(PairStage::Confirmed)
        } else if self.closed.contains(&pair) {
            Some(PairStage::Closed)
        } else {
            None
        }
    }

    /// Number of stage maps `pair` appears in.  Always 0 or 1.
    pub fn stage_count(&self, pair: Pair) -> usize {
        [
            self.pending_requests.contains_key(&pair),
            self.pending_offers.contains_key(&pair),
            self.accepted.contains_key(&pair),
            self.confirmed.contains_key(&pair),
            self.closed.contains(&pair),
        ]
        .into_iter()
        .filter(|&b| b)
        .count()
    }

    /// Terminal matches and their scores, ascending by pair.
    pub fn confirmed(&self) -> &BTreeMap<Pair, f64> {
        &self.confirmed
    }

    /// The confirmed cafeteria and score of `student`.
    pub fn confirmed_match(&self, student: StudentId) -> Option<(CafeteriaId, f64)> {
        let &cafeteria = self.holder.get(&student)?;
        self.confirmed.get(&(student, cafeteria)).map(|&score| (cafeteria, score))
    }

    pub fn pending_request_count(&self) -> usize {
        self.pending_requests.len()
    }

    pub fn outstanding_offer_count(&self) -> usize {
        self.pending_offers.len()
    }

    pub fn awaiting_confirmation_count(&self) -> usize {
        self.accepted.len()
    }

    /// Seats not yet promised to anyone.
    pub fn remaining(&self, cafeteria: CafeteriaId) -> u32 {
        let i = cafeteria.index();
        match (self.capacities.get(i), self.committed.get(i)) {
            (Some(cap), Some(used)) => cap.saturating_sub(*used),
            _ => 0,
        }
    }

    /// `true` when `student` was turned down for every cafeteria.
    pub fn is_exhausted(&self, student: StudentId) -> bool {
        (0..self.capacities.len() as u32).all(|c| self.closed.contains(&(student, CafeteriaId(c))))
    }

    /// `true` once every student is confirmed or exhausted.  The manager
    /// issues no further requests from then on.
    pub fn is_settled(&self) -> bool {
        (0..self.student_count as u32)
            .map(StudentId)
            .all(|s| self.confirmed_match(s).is_some() || self.is_exhausted(s))
    }

    /// Mean confirmed score over all students (unmatched count as 0).
    pub fn mean_satisfaction(&self) -> f64 {
        if self.student_count == 0 {
            return 0.0;
        }
        self.confirmed.values().sum::<f64>() / self.student_count as f64
    }

    /// Confirmed seats over total seats (0 when there are no seats).
    pub fn occupancy_rate(&self) -> f64 {
        let seats: u64 = self.capacities.iter().map(|&c| c as u64).sum();
        if seats == 0 {
            0.0
        } else {
            self.confirmed.len() as f64 / seats as f64
        }
    }

    /// `W · mean_satisfaction + (1 − W) · occupancy_rate`.
    pub fn performance(&self) -> f64 {
        let w = self.objective_weight;
        w * self.mean_satisfaction() + (1.0 - w) * self.occupancy_rate()
    }

    // ── Handlers ──────────────────────────────────────────────────────────

    fn on_offer(&mut self, msg: &Message, _out: &mut Outbox) -> ProtocolResult<()> {
        let student = msg.sender().as_student().ok_or_else(|| msg.unexpected_sender())?;
        let (cafeteria, score) = match *msg.payload() {
            Payload::Offer { cafeteria, score } => (cafeteria, score),
            _ => return Err(msg.malformed()),
        };
        let pair = (student, cafeteria);
        if self.pending_requests.remove(&pair).is_none() {
            return Err(ProtocolError::UnknownPair { student, cafeteria, expected: "pending" });
        }
        self.pending_offers.insert(pair, score);
        Ok(())
    }

    /// A student declining a request, or a cafeteria refusing a seat.
    fn on_reject(&mut self, msg: &Message, _out: &mut Outbox) -> ProtocolResult<()> {
        match msg.sender() {
            AgentId::Student(student) => {
                let cafeteria = msg.expect_cafeteria()?;
                let pair = (student, cafeteria);
                if self.pending_requests.remove(&pair).is_none() {
                    return Err(ProtocolError::UnknownPair { student, cafeteria, expected: "pending" });
                }
                self.closed.insert(pair);
            }
            AgentId::Cafeteria(cafeteria) => {
                let student = msg.expect_student()?;
                let pair = (student, cafeteria);
                if self.accepted.remove(&pair).is_none() {
                    return Err(ProtocolError::UnknownPair { student, cafeteria, expected: "accepted" });
                }
                // `holder` keeps the student: it was sent an Accept and never
                // takes another, so it stays unmatched.
                if let Some(used) = self.committed.get_mut(cafeteria.index()) {
                    *used = used.saturating_sub(1);
                }
                self.closed.insert(pair);
            }
            AgentId::Manager => return Err(msg.unexpected_sender()),
        }
        Ok(())
    }

    /// One side of an accepted pair confirming.  The pair is confirmed when
    /// both the student and the cafeteria have answered.
    fn on_confirm(&mut self, msg: &Message, _out: &mut Outbox) -> ProtocolResult<()> {
        let pair = match msg.sender() {
            AgentId::Student(student)     => (student, msg.expect_cafeteria()?),
            AgentId::Cafeteria(cafeteria) => (msg.expect_student()?, cafeteria),
            AgentId::Manager              => return Err(msg.unexpected_sender()),
        };
        let Some(acceptance) = self.accepted.get_mut(&pair) else {
            return Err(ProtocolError::UnknownPair {
                student:   pair.0,
                cafeteria: pair.1,
                expected:  "accepted",
            });
        };
        match msg.sender() {
            AgentId::Student(_) => acceptance.student_confirmed = true,
            _                   => acceptance.cafeteria_confirmed = true,
        }
        if acceptance.student_confirmed && acceptance.cafeteria_confirmed {
            let score = acceptance.score;
            self.accepted.remove(&pair);
            self.confirmed.insert(pair, score);
        }
        Ok(())
    }

    // ── Round actions ─────────────────────────────────────────────────────

    /// Resolve every outstanding offer (see the module docs).
    fn select(&mut self, out: &mut Outbox) -> (usize, usize) {
        let mut offers: Vec<(Pair, f64)> = std::mem::take(&mut self.pending_offers).into_iter().collect();
        offers.sort_by(|(pa, sa), (pb, sb)| sb.total_cmp(sa).then(pa.cmp(pb)));

        let (mut accepted, mut rejected) = (0, 0);
        for (pair @ (student, cafeteria), score) in offers {
            if self.holder.contains_key(&student) || self.remaining(cafeteria) == 0 {
                self.closed.insert(pair);
                out.send(student, MessageKind::Reject, Payload::Cafeteria(cafeteria));
                rejected += 1;
                continue;
            }
            self.committed[cafeteria.index()] += 1;
            self.holder.insert(student, cafeteria);
            self.accepted.insert(pair, Acceptance {
                score,
                student_confirmed:   false,
                cafeteria_confirmed: false,
            });
            out.send(student, MessageKind::Accept, Payload::Cafeteria(cafeteria));
            out.send(cafeteria, MessageKind::Accept, Payload::Student(student));
            accepted += 1;
        }
        (accepted, rejected)
    }

    /// Request every not-yet-requested pair of every student without an
    /// acceptance.  Returns the number of requests sent.
    fn propose(&mut self, round: Round, out: &mut Outbox) -> usize {
        let mut issued = 0;
        for s in 0..self.student_count as u32 {
            let student = StudentId(s);
            if self.holder.contains_key(&student) {
                continue;
            }
            for c in 0..self.capacities.len() as u32 {
                let pair = (student, CafeteriaId(c));
                if self.stage(pair).is_some() {
                    continue;
                }
                self.pending_requests.insert(pair, round);
                out.send(student, MessageKind::Request, Payload::Cafeteria(pair.1));
                issued += 1;
            }
        }
        issued
    }
}

impl Agent for Manager {
    fn id(&self) -> AgentId {
        AgentId::Manager
    }

    fn inbox(&self) -> &[Message] {
        &self.inbox
    }

    fn inbox_mut(&mut self) -> &mut Vec<Message> {
        &mut self.inbox
    }

    fn handlers(&self) -> &'static HandlerTable<Self> {
        &HANDLERS
    }

    /// Selection over the offers handled this round, then proposals.
    fn replan(&mut self, round: Round, out: &mut Outbox) {
        let (accepted, rejected) = self.select(out);
        let issued = if self.is_settled() { 0 } else { self.propose(round, out) };
        if accepted + rejected + issued > 0 {
            debug!(%round, accepted, rejected, issued, "manager round");
        }
    }
}
