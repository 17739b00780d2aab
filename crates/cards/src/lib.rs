//! Quiz decks, answer normalization, and scramble puzzle primitives.
//!
//! Everything in this crate is synchronous and free of transport concerns;
//! the gameroom crate drives these types from inside a live session.
//!
//! ## Core Types
//!
//! - [`Card`] — One question with its accepted answers and optional comment
//! - [`Deck`] — An ordered quiz definition: description, presentation, timeout, cards
//! - [`Presentation`] — How a question is delivered (text, link, rendered image)
//!
//! ## Loading
//!
//! - [`Decks`] — Trait for anything that can resolve a deck by name
//! - [`Library`] — Folder of JSON decks indexed by a quiz list
//!
//! ## Answers
//!
//! - [`AnswerKey`] — Canonicalized accepted answers for one card
//! - [`canonical`] — Case and script folding applied to both sides of a comparison
//!
//! ## Scramble
//!
//! - [`ScramblePool`] — Dictionary words grouped by sorted-letter signature
//! - [`Puzzle`] — A scrambled word and the anagram group that solves it
//!
//! ## Validation
//!
//! The [`validate`] submodule finds and merges duplicate cards.
mod answer;
mod card;
mod deck;
mod library;
mod scramble;
mod shuffle;

pub mod validate;

pub use answer::*;
pub use card::*;
pub use deck::*;
pub use library::*;
pub use scramble::*;
pub use shuffle::*;
