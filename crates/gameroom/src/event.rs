use qr_core::*;

/// A chat message relayed from the transport while a room is subscribed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Inbound {
    pub author: ID<Member>,
    pub text: String,
    pub message: ID<Message>,
}

impl Inbound {
    /// Message with an empty message id, for transports that have none.
    pub fn new<A, T>(author: A, text: T) -> Self
    where
        A: Into<ID<Member>>,
        T: Into<String>,
    {
        Self {
            author: author.into(),
            text: text.into(),
            message: ID::from(""),
        }
    }
    pub fn with_message<M>(mut self, message: M) -> Self
    where
        M: Into<ID<Message>>,
    {
        self.message = message.into();
        self
    }
    /// Whether the message asks to end the session in this channel.
    pub fn is_stop(&self) -> bool {
        let text = self.text.trim().to_lowercase();
        text.strip_prefix(COMMAND_PREFIX) == Some("stop")
    }
}

impl std::fmt::Display for Inbound {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}: {}", self.author, self.text)
    }
}

/// Why a session came to an end.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ending {
    /// Every card was played.
    Exhausted,
    /// A participant reached the win threshold.
    Won,
    /// Stopped by command.
    Stopped,
    /// Too many unanswered rounds in a row.
    Abandoned,
    /// The gauntlet clock ran out.
    Expired,
}

impl std::fmt::Display for Ending {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Exhausted => write!(f, "deck exhausted"),
            Self::Won => write!(f, "win threshold reached"),
            Self::Stopped => write!(f, "stopped"),
            Self::Abandoned => write!(f, "too many timeouts"),
            Self::Expired => write!(f, "time limit reached"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn stop_command_is_case_insensitive() {
        assert!(Inbound::new("u", "kq!stop").is_stop());
        assert!(Inbound::new("u", "  KQ!Stop ").is_stop());
        assert!(!Inbound::new("u", "kq!stopp").is_stop());
        assert!(!Inbound::new("u", "stop").is_stop());
    }
}
