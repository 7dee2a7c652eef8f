//! Per-role handler tables.

use crate::{Message, MessageKind, Outbox, ProtocolResult};

/// A role-specific message handler.
pub type Handler<A> = fn(&mut A, &Message, &mut Outbox) -> ProtocolResult<()>;

/// Explicit `MessageKind → Handler` map for one role.
///
/// Built once per role as a `static` with [`on`][Self::on].  A kind with no
/// entry is ignored by [`Agent::dispatch_inbox`][crate::Agent::dispatch_inbox].
///
/// ```rust,ignore
/// static HANDLERS: HandlerTable<Student> = HandlerTable::new()
///     .on(MessageKind::Request, Student::on_request)
///     .on(MessageKind::Accept,  Student::on_accept);
/// ```
pub struct HandlerTable<A> {
    entries: [Option<Handler<A>>; MessageKind::COUNT],
}

impl<A> HandlerTable<A> {
    pub const fn new() -> Self {
        Self { entries: [None; MessageKind::COUNT] }
    }

    /// Register `handler` for `kind`, replacing any earlier entry.
    pub const fn on(mut self, kind: MessageKind, handler: Handler<A>) -> Self {
        self.entries[kind.index()] = Some(handler);
        self
    }

    #[inline]
    pub fn get(&self, kind: MessageKind) -> Option<Handler<A>> {
        self.entries[kind.index()]
    }

    /// Kinds this role reacts to.
    pub fn kinds(&self) -> impl Iterator<Item = MessageKind> + '_ {
        MessageKind::ALL.into_iter().filter(|k| self.entries[k.index()].is_some())
    }
}

impl<A> Default for HandlerTable<A> {
    fn default() -> Self {
        Self::new()
    }
}
