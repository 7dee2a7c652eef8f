//! `cm-agent` — the negotiation protocol between students, cafeterias, and
//! the matchmaking manager.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                      |
//! |---------------|---------------------------------------------------------------|
//! | [`message`]   | `Message`, `MessageKind`, `Payload`                           |
//! | [`outbox`]    | `Outbox` — per-dispatch send buffer                           |
//! | [`handler`]   | `HandlerTable<A>` — explicit `MessageKind → handler` map      |
//! | [`agent`]     | `Agent` trait, `DispatchStats`                                |
//! | [`student`]   | `Student` role                                                |
//! | [`cafeteria`] | `Cafeteria` role                                              |
//! | [`manager`]   | `Manager` role — the matching engine                          |
//! | [`error`]     | `ProtocolError`, `ProtocolResult<T>`                          |
//!
//! # Message flow
//!
//! ```text
//! Manager ──Request(c)──▶ Student ──Offer(c, score) / Reject(c)──▶ Manager
//! Manager ──Accept(c)───▶ Student ──Confirm(c)──▶ Manager
//! Manager ──Accept(s)───▶ Cafeteria ──Confirm(s) / Reject(s)──▶ Manager
//! Manager ──Reject(c)───▶ Student   (offer not selected)
//! ```
//!
//! Agents never write to each other's inboxes.  A dispatch writes into the
//! caller-supplied [`Outbox`]; the round loop in `cm-sim` moves outboxes into
//! inboxes at the round barrier, so a message sent in round `k` is handled
//! in round `k + 1`.

pub mod agent;
pub mod cafeteria;
pub mod error;
pub mod handler;
pub mod manager;
pub mod message;
pub mod outbox;
pub mod student;


pub use agent::{Agent, DispatchStats};
pub use cafeteria::Cafeteria;
pub use error::{ProtocolError, ProtocolResult};
pub use handler::{Handler, HandlerTable};
pub use manager::{Manager, Pair, PairStage};
pub use message::{Message, MessageKind, Payload};
pub use outbox::Outbox;
pub use student::Student;
