//! Hosting for live quiz rooms.
//!
//! - [`Registry`] — Which channels have a session running
//! - [`Reviews`] — Per-channel decks of questions nobody answered
//! - [`Lobby`] — Starts, stops and describes sessions; owns running [`RoomHandle`]s
//! - [`Command`] — Chat command parsing
mod command;
mod error;
mod handle;
mod lobby;
mod registry;
mod reviews;

pub use command::*;
pub use error::*;
pub use handle::*;
pub use lobby::*;
pub use registry::*;
pub use reviews::*;
