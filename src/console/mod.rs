//! Play quizzes in a terminal.
//!
//! The terminal is one channel with one participant. Every line typed is
//! both a possible command and an answer for the running room.
mod args;
mod terminal;

pub use args::*;
pub use terminal::*;
