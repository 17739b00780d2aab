use qr_core::*;

/// Why a lobby request was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LobbyError {
    AlreadyActive(ID<Channel>),
    DeckNotFound(String),
    NotPrivate(ID<Channel>),
}

impl std::fmt::Display for LobbyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyActive(c) => write!(f, "channel {} already has a quiz running", c),
            Self::DeckNotFound(name) => write!(f, "Failed to find valid quiz: {}", name),
            Self::NotPrivate(c) => write!(f, "channel {} is not a private conversation", c),
        }
    }
}

impl std::error::Error for LobbyError {}
