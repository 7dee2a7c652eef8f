use cm_core::{AgentId, CafeteriaId, StudentId};
use thiserror::Error;

use crate::{MessageKind, Payload};

/// A transition the protocol refuses.  Always local to one message: the
/// dispatch loop logs it, drops the message, and carries on.
#[derive(Debug, Error, PartialEq)]
pub enum ProtocolError {
    #[error("{kind:?} from {sender} carries incompatible payload {payload:?}")]
    Malformed {
        sender:  AgentId,
        kind:    MessageKind,
        payload: Payload,
    },

    #[error("{kind:?} from {sender} is not valid for this role")]
    UnexpectedSender {
        sender: AgentId,
        kind:   MessageKind,
    },

    #[error("{student} is already assigned to {assigned}")]
    AlreadyAssigned {
        student:  StudentId,
        assigned: CafeteriaId,
    },

    #[error("{cafeteria} is not in the preference list of {student}")]
    NotPreferred {
        student:   StudentId,
        cafeteria: CafeteriaId,
    },

    #[error("no {expected} pair ({student}, {cafeteria})")]
    UnknownPair {
        student:   StudentId,
        cafeteria: CafeteriaId,
        expected:  &'static str,
    },

    #[error("{cafeteria} is full ({capacity} seats); refusing {student}")]
    CapacityExceeded {
        cafeteria: CafeteriaId,
        student:   StudentId,
        capacity:  u32,
    },
}

pub type ProtocolResult<T> = Result<T, ProtocolError>;
