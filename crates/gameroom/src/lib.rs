//! Async runtime for live quiz sessions.
//!
//! Each session is a [`Room`] task bound to one chat channel. It owns its
//! working deck and scorekeeping, reads answers relayed by a [`Transport`],
//! and reports an [`Outcome`] when it ends.
//!
//! ## Rounds
//!
//! - [`Round`] — One card in play, judged into a [`Verdict`]
//! - [`Ranking`] / [`Tally`] — Single-answer and multi-answer scorekeeping
//! - [`Standings`] — Session totals, rendered into a [`Scoreboard`]
//! - [`Timer`] — Re-armable round and gauntlet deadlines
//!
//! ## Messaging
//!
//! - [`Transport`] — Pluggable chat backend
//! - [`Protocol`] — Every announcement a room or lobby makes
//! - [`Embed`] — Structured chat message
//!
//! ## Submodules
//!
//! - [`transports`] — Concrete transports (in-process [`Recorder`](transports::Recorder))
mod channel;
mod context;
mod event;
mod message;
mod mode;
mod protocol;
mod room;
mod round;
mod score;
mod scoreboard;
mod timer;
mod transport;

pub mod transports;

pub use channel::*;
pub use context::*;
pub use event::*;
pub use message::*;
pub use mode::*;
pub use protocol::*;
pub use room::*;
pub use round::*;
pub use score::*;
pub use scoreboard::*;
pub use timer::*;
pub use transport::*;

#[cfg(test)]
mod tests;
