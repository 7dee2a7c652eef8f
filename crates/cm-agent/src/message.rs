//! The closed message vocabulary of the negotiation.

use cm_core::{AgentId, CafeteriaId, StudentId};

use crate::{ProtocolError, ProtocolResult};

/// The five message types of the protocol.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub enum MessageKind {
    Request,
    Offer,
    Accept,
    Reject,
    Confirm,
}

impl MessageKind {
    /// Number of message kinds.
    pub const COUNT: usize = 5;

    pub const ALL: [MessageKind; Self::COUNT] = [
        MessageKind::Request,
        MessageKind::Offer,
        MessageKind::Accept,
        MessageKind::Reject,
        MessageKind::Confirm,
    ];

    /// Dense index, used as the slot in a [`HandlerTable`][crate::HandlerTable].
    #[inline(always)]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Message content.  Which variants a kind accepts is fixed by
/// [`Message::is_well_formed`].
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum Payload {
    Empty,
    /// The student a reply or acceptance concerns.
    Student(StudentId),
    /// The cafeteria a request, reply, or acceptance concerns.
    Cafeteria(CafeteriaId),
    /// A student's satisfaction score for `cafeteria`, in `[0, 1]`.
    Offer { cafeteria: CafeteriaId, score: f64 },
}

impl Payload {
    pub fn student(&self) -> Option<StudentId> {
        match *self {
            Payload::Student(s) => Some(s),
            _ => None,
        }
    }

    /// The referenced cafeteria (plain reference or offer).
    pub fn cafeteria(&self) -> Option<CafeteriaId> {
        match *self {
            Payload::Cafeteria(c) | Payload::Offer { cafeteria: c, .. } => Some(c),
            _ => None,
        }
    }

    pub fn score(&self) -> Option<f64> {
        match *self {
            Payload::Offer { score, .. } => Some(score),
            _ => None,
        }
    }
}

/// A single communication event.  Immutable once built.
#[derive(Clone, PartialEq, Debug)]
pub struct Message {
    sender:   AgentId,
    receiver: AgentId,
    kind:     MessageKind,
    payload:  Payload,
}

impl Message {
    pub fn new(sender: AgentId, receiver: AgentId, kind: MessageKind, payload: Payload) -> Self {
        Self { sender, receiver, kind, payload }
    }

    #[inline]
    pub fn sender(&self) -> AgentId {
        self.sender
    }

    #[inline]
    pub fn receiver(&self) -> AgentId {
        self.receiver
    }

    #[inline]
    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    #[inline]
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// `true` if the payload variant is one the kind can carry.
    ///
    /// | Kind                        | Payload                                  |
    /// |-----------------------------|------------------------------------------|
    /// | `Request`                   | `Cafeteria`                              |
    /// | `Offer`                     | `Offer` with a finite score in `[0, 1]`  |
    /// | `Accept`, `Reject`, `Confirm` | `Student`, `Cafeteria`, or `Empty`     |
    pub fn is_well_formed(&self) -> bool {
        match (self.kind, self.payload) {
            (MessageKind::Request, Payload::Cafeteria(_)) => true,
            (MessageKind::Offer, Payload::Offer { score, .. }) => (0.0..=1.0).contains(&score),
            (MessageKind::Accept | MessageKind::Reject | MessageKind::Confirm, p) => {
                !matches!(p, Payload::Offer { .. })
            }
            _ => false,
        }
    }

    /// The [`ProtocolError::Malformed`] describing this message.
    pub(crate) fn malformed(&self) -> ProtocolError {
        ProtocolError::Malformed {
            sender:  self.sender,
            kind:    self.kind,
            payload: self.payload,
        }
    }

    pub(crate) fn expect_student(&self) -> ProtocolResult<StudentId> {
        self.payload.student().ok_or_else(|| self.malformed())
    }

    pub(crate) fn expect_cafeteria(&self) -> ProtocolResult<CafeteriaId> {
        self.payload.cafeteria().ok_or_else(|| self.malformed())
    }

    pub(crate) fn unexpected_sender(&self) -> ProtocolError {
        ProtocolError::UnexpectedSender { sender: self.sender, kind: self.kind }
    }
}
