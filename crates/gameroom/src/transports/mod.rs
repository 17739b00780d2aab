//! Concrete [`Transport`](crate::Transport) implementations.
mod recorder;

pub use recorder::*;
