//! The `Cafeteria` role.

use std::collections::BTreeSet;

use cm_core::{AgentId, CafeteriaId, StudentId};

use crate::{Agent, HandlerTable, Message, MessageKind, Outbox, Payload, ProtocolError, ProtocolResult};

// Cafeterias never initiate or answer offers; only the manager's
// acceptances concern them.  Every other kind is ignored.
static HANDLERS: HandlerTable<Cafeteria> = HandlerTable::new()
    .on(MessageKind::Accept, Cafeteria::on_accept);

/// A cafeteria with a fixed number of seats.
#[derive(Debug)]
pub struct Cafeteria {
    id:       CafeteriaId,
    capacity: u32,
    roster:   BTreeSet<StudentId>,
    inbox:    Vec<Message>,
}

impl Cafeteria {
    pub fn new(id: CafeteriaId, capacity: u32) -> Self {
        Self { id, capacity, roster: BTreeSet::new(), inbox: Vec::new() }
    }

    pub fn cafeteria_id(&self) -> CafeteriaId {
        self.id
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Students holding a seat, ascending by id.
    pub fn roster(&self) -> &BTreeSet<StudentId> {
        &self.roster
    }

    pub fn current_load(&self) -> u32 {
        self.roster.len() as u32
    }

    pub fn remaining(&self) -> u32 {
        self.capacity.saturating_sub(self.current_load())
    }

    pub fn is_full(&self) -> bool {
        self.remaining() == 0
    }

    /// Fraction of seats taken; 0 for a cafeteria without seats.
    pub fn utilisation(&self) -> f64 {
        if self.capacity == 0 {
            0.0
        } else {
            self.current_load() as f64 / self.capacity as f64
        }
    }

    /// Seat the accepted student and confirm.  A full cafeteria refuses with
    /// `Reject(student)`; the manager's selection step should make that
    /// unreachable.
    fn on_accept(&mut self, msg: &Message, out: &mut Outbox) -> ProtocolResult<()> {
        if msg.sender() != AgentId::Manager {
            return Err(msg.unexpected_sender());
        }
        let student = msg.expect_student()?;
        if self.roster.contains(&student) {
            return Err(ProtocolError::AlreadyAssigned { student, assigned: self.id });
        }
        if self.is_full() {
            // The student already received its Accept and keeps that
            // assignment; the manager closes the pair, so the run reports
            // the student as unmatched.
            out.send(msg.sender(), MessageKind::Reject, Payload::Student(student));
            return Err(ProtocolError::CapacityExceeded {
                cafeteria: self.id,
                student,
                capacity: self.capacity,
            });
        }

        self.roster.insert(student);
        out.send(msg.sender(), MessageKind::Confirm, Payload::Student(student));
        Ok(())
    }
}

impl Agent for Cafeteria {
    fn id(&self) -> AgentId {
        AgentId::Cafeteria(self.id)
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
