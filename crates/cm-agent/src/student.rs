//! The `Student` role.

use cm_core::{AgentId, CafeteriaId, StudentId, TimeSlot};

use crate::{Agent, HandlerTable, Message, MessageKind, Outbox, Payload, ProtocolError, ProtocolResult};

static HANDLERS: HandlerTable<Student> = HandlerTable::new()
    .on(MessageKind::Request, Student::on_request)
    .on(MessageKind::Accept, Student::on_accept)
    .on(MessageKind::Reject, Student::acknowledge)
    .on(MessageKind::Confirm, Student::acknowledge);

/// A student looking for a seat.
///
/// Answers the manager's requests from its ranked preference list and
/// takes the first acceptance it receives.  Once assigned, the assignment
/// never changes.
#[derive(Debug)]
pub struct Student {
    id:              StudentId,
    slot:            TimeSlot,
    budget:          u32,
    /// Cafeterias ranked most-preferred first.
    preference:      Vec<CafeteriaId>,
    /// Total cafeteria count (M), the denominator of the score.
    cafeteria_count: usize,
    satisfaction:    f64,
    assigned:        Option<CafeteriaId>,
    inbox:           Vec<Message>,
}

impl Student {
    pub fn new(
        id:              StudentId,
        slot:            TimeSlot,
        preference:      Vec<CafeteriaId>,
        cafeteria_count: usize,
    ) -> Self {
        Self {
            id,
            slot,
            budget: 0,
            preference,
            cafeteria_count,
            satisfaction: 0.0,
            assigned: None,
            inbox: Vec::new(),
        }
    }

    pub fn with_budget(mut self, budget: u32) -> Self {
        self.budget = budget;
        self
    }

    pub fn student_id(&self) -> StudentId {
        self.id
    }

    pub fn slot(&self) -> TimeSlot {
        self.slot
    }

    pub fn budget(&self) -> u32 {
        self.budget
    }

    pub fn preference(&self) -> &[CafeteriaId] {
        &self.preference
    }

    /// Score of the cafeteria this student was assigned to, 0 until then.
    pub fn satisfaction(&self) -> f64 {
        self.satisfaction
    }

    pub fn assigned_cafeteria(&self) -> Option<CafeteriaId> {
        self.assigned
    }

    /// 0-based position of `cafeteria` in the preference list.
    pub fn rank(&self, cafeteria: CafeteriaId) -> Option<usize> {
        self.preference.iter().position(|&c| c == cafeteria)
    }

    /// `1 - rank / M`, or `None` if `cafeteria` is not preferred.
    pub fn score_for(&self, cafeteria: CafeteriaId) -> Option<f64> {
        let rank = self.rank(cafeteria)?;
        let m = self.cafeteria_count.max(1) as f64;
        Some((1.0 - rank as f64 / m).clamp(0.0, 1.0))
    }

    // ── Handlers ──────────────────────────────────────────────────────────

    fn on_request(&mut self, msg: &Message, out: &mut Outbox) -> ProtocolResult<()> {
        if msg.sender() != AgentId::Manager {
            return Err(msg.unexpected_sender());
        }
        let cafeteria = msg.expect_cafeteria()?;
        match self.score_for(cafeteria) {
            Some(score) => out.send(msg.sender(), MessageKind::Offer, Payload::Offer { cafeteria, score }),
            None        => out.send(msg.sender(), MessageKind::Reject, Payload::Cafeteria(cafeteria)),
        }
        Ok(())
    }

    fn on_accept(&mut self, msg: &Message, out: &mut Outbox) -> ProtocolResult<()> {
        if msg.sender() != AgentId::Manager {
            return Err(msg.unexpected_sender());
        }
        let cafeteria = msg.expect_cafeteria()?;
        if let Some(assigned) = self.assigned {
            return Err(ProtocolError::AlreadyAssigned { student: self.id, assigned });
        }
        let score = self
            .score_for(cafeteria)
            .ok_or(ProtocolError::NotPreferred { student: self.id, cafeteria })?;

        self.assigned = Some(cafeteria);
        self.satisfaction = score;
        out.send(msg.sender(), MessageKind::Confirm, Payload::Cafeteria(cafeteria));
        Ok(())
    }

    /// Terminal acknowledgements (`Reject`, `Confirm`) need no reply.
    fn acknowledge(&mut self, _msg: &Message, _out: &mut Outbox) -> ProtocolResult<()> {
        Ok(())
    }
}

impl Agent for Student {
    fn id(&self) -> AgentId {
        AgentId::Student(self.id)
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
}
