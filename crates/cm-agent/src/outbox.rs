//! `Outbox` — the send side of one agent's dispatch.

use cm_core::AgentId;

use crate::{Message, MessageKind, Payload};

/// Messages produced by one agent during one dispatch.
///
/// The round loop hands every agent a fresh outbox and merges all of them
/// into the recipients' inboxes only after the last agent of the round has
/// been dispatched.  Nothing sent here is visible to anyone before then.
#[derive(Debug)]
pub struct Outbox {
    sender:   AgentId,
    messages: Vec<Message>,
}

impl Outbox {
    pub fn new(sender: AgentId) -> Self {
        Self { sender, messages: Vec::new() }
    }

    /// Queue a message from the owning agent to `target`.  Never fails; an
    /// unknown `target` is discarded at the barrier.
    pub fn send(&mut self, target: impl Into<AgentId>, kind: MessageKind, payload: Payload) {
        self.messages.push(Message::new(self.sender, target.into(), kind, payload));
    }

    pub fn sender(&self) -> AgentId {
        self.sender
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn into_messages(self) -> Vec<Message> {
        self.messages
    }
}
