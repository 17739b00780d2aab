//! Timed multi-participant quiz sessions for chat channels.
//!
//! This facade crate re-exports the quizroom crates.
//!
//! - [`core`] — Identifiers, presets, constants, runtime helpers
//! - [`cards`] — Decks, answer normalization, scramble pool, validation
//! - [`gameroom`] — The per-channel session engine and transport seam
//! - [`hosting`] — Registry, review store, lobby, command parsing
//! - [`console`] — Terminal transport for playing locally

pub use qr_core     as core;
pub use qr_cards    as cards;
pub use qr_gameroom as gameroom;
pub use qr_hosting  as hosting;

#[cfg(feature = "server")]
pub mod console;

pub use qr_core::*;
