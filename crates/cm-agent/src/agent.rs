//! The `Agent` trait — the capability shared by all three roles.

use cm_core::{AgentId, Round};
use tracing::warn;

use crate::{HandlerTable, Message, Outbox};

/// Per-dispatch counters, summed by the round loop for reporting.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct DispatchStats {
    /// Messages a handler accepted.
    pub handled: usize,
    /// Messages of a kind this role has no handler for.
    pub ignored: usize,
    /// Malformed messages and messages a handler refused.
    pub dropped: usize,
}

impl DispatchStats {
    /// Total messages consumed from the inbox.
    pub fn total(&self) -> usize {
        self.handled + self.ignored + self.dropped
    }
}

impl std::ops::AddAssign for DispatchStats {
    fn add_assign(&mut self, rhs: Self) {
        self.handled += rhs.handled;
        self.ignored += rhs.ignored;
        self.dropped += rhs.dropped;
    }
}

/// An inbox owner that reacts to messages through a role handler table.
///
/// Implementors supply storage ([`inbox_mut`][Self::inbox_mut]) and the
/// static [`handlers`][Self::handlers] table; the provided
/// [`dispatch_inbox`][Self::dispatch_inbox] does the rest.
pub trait Agent: Sized + 'static {
    fn id(&self) -> AgentId;

    /// Messages delivered but not yet dispatched, in arrival order.
    fn inbox(&self) -> &[Message];

    fn inbox_mut(&mut self) -> &mut Vec<Message>;

    fn handlers(&self) -> &'static HandlerTable<Self>;

    /// Append `msg` to the inbox.  Called by the round loop at the barrier.
    fn deliver(&mut self, msg: Message) {
        self.inbox_mut().push(msg);
    }

    /// Handle every message in the inbox exactly once, in FIFO order, then
    /// leave the inbox empty.
    ///
    /// The inbox is taken as a snapshot up front.  Kinds without a handler
    /// are skipped silently.  Malformed messages and handler errors are
    /// logged and dropped; they never abort the dispatch.
    fn dispatch_inbox(&mut self, out: &mut Outbox) -> DispatchStats {
        let batch = std::mem::take(self.inbox_mut());
        let table = self.handlers();
        let mut stats = DispatchStats::default();

        for msg in &batch {
            if !msg.is_well_formed() {
                warn!(agent = %self.id(), error = %msg.malformed(), "dropping malformed message");
                stats.dropped += 1;
                continue;
            }
            let Some(handler) = table.get(msg.kind()) else {
                stats.ignored += 1;
                continue;
            };
            match handler(self, msg, out) {
                Ok(()) => stats.handled += 1,
                Err(e) => {
                    warn!(agent = %self.id(), kind = ?msg.kind(), sender = %msg.sender(), error = %e,
                        "protocol violation; message dropped");
                    stats.dropped += 1;
                }
            }
        }
        stats
    }

    /// Act after the inbox has been dispatched in `round`.
    ///
    /// Default: nothing.  Only the manager initiates messages.
    fn replan(&mut self, _round: Round, _out: &mut Outbox) {}
}
