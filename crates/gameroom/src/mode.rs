use super::*;
use qr_core::*;
use std::time::Duration;

/// Game variant. All variants share the round state machine; these are
/// the deltas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Shuffled deck, one point per correct participant per card.
    #[default]
    Standard,
    /// Deck in authored order from `offset`, no early win.
    Sequential { offset: Index },
    /// Every distinct accepted answer scores, capped per card.
    Multi,
    /// One participant, one clock for the whole session, first reply is final.
    Gauntlet { minutes: Option<u64> },
    /// Synthesized anagram puzzles.
    Scramble { difficulty: Difficulty },
}

impl Mode {
    /// Whether failed cards are kept for the channel's next review.
    pub fn keeps_failures(&self) -> bool {
        matches!(self, Self::Standard | Self::Sequential { .. })
    }
    /// Whether reaching the win threshold ends the session.
    pub fn ends_on_win(&self) -> bool {
        !matches!(self, Self::Sequential { .. } | Self::Gauntlet { .. })
    }
    /// Whether the deck should be loaded shuffled.
    pub fn shuffles(&self) -> bool {
        !matches!(self, Self::Sequential { .. })
    }
    pub fn is_multi(&self) -> bool {
        matches!(self, Self::Multi)
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Standard => write!(f, "standard"),
            Self::Sequential { offset } => write!(f, "sequential from {}", offset),
            Self::Multi => write!(f, "multi"),
            Self::Gauntlet { .. } => write!(f, "gauntlet"),
            Self::Scramble { .. } => write!(f, "scramble"),
        }
    }
}

/// A caller's description of the session to start.
#[derive(Debug, Clone)]
pub struct Plan {
    pub channel: ID<Channel>,
    pub deck: String,
    pub mode: Mode,
    pub speed: Speed,
    pub win_limit: Option<Points>,
    pub podium: Option<Podium>,
    pub host: Option<ID<Member>>,
}

impl Plan {
    pub fn new<C, D>(channel: C, deck: D) -> Self
    where
        C: Into<ID<Channel>>,
        D: Into<String>,
    {
        Self {
            channel: channel.into(),
            deck: deck.into(),
            mode: Mode::default(),
            speed: Speed::default(),
            win_limit: None,
            podium: None,
            host: None,
        }
    }
    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }
    pub fn speed(mut self, speed: Speed) -> Self {
        self.speed = speed;
        self
    }
    pub fn win_limit(mut self, limit: Points) -> Self {
        self.win_limit = Some(limit);
        self
    }
    pub fn podium(mut self, podium: Podium) -> Self {
        self.podium = Some(podium);
        self
    }
    pub fn host<M>(mut self, host: M) -> Self
    where
        M: Into<ID<Member>>,
    {
        self.host = Some(host.into());
        self
    }
    /// Replays the channel's failed cards instead of a stored deck.
    pub fn is_review(&self) -> bool {
        self.deck == REVIEW
    }
    /// Name shown in announcements.
    pub fn title(&self) -> &str {
        match self.mode {
            Mode::Scramble { .. } => SCRAMBLE_TITLE,
            _ => &self.deck,
        }
    }
    /// Points needed to win, given how many cards the deck holds.
    ///
    /// A requested limit is first capped by the deck size, then clamped to
    /// `1..=WIN_LIMIT_MAX`. Review sessions default to clearing the whole
    /// deck; sequential sessions report the deck size they will play.
    pub fn threshold(&self, cards: usize) -> Points {
        let cards = cards as Points;
        match (self.mode, self.win_limit) {
            (Mode::Sequential { .. }, _) => cards,
            (Mode::Scramble { .. }, None) => SCRAMBLE_WIN_LIMIT,
            (Mode::Scramble { .. }, Some(n)) => n.clamp(1, WIN_LIMIT_MAX),
            (_, Some(n)) => n.min(cards).clamp(1, WIN_LIMIT_MAX),
            (_, None) if self.is_review() => cards,
            (_, None) => WIN_LIMIT,
        }
    }
    /// Who counts as a winner on the final board.
    pub fn podium_or_default(&self) -> Podium {
        self.podium.unwrap_or(match self.mode {
            _ if self.is_review() => Podium::Nobody,
            Mode::Sequential { .. } => Podium::Nobody,
            Mode::Multi => Podium::Leaders,
            _ => Podium::Threshold,
        })
    }
    /// Base round length before any multi-answer bonus.
    pub fn round_timeout(&self, deck_timeout: u64) -> Duration {
        let default = match self.mode {
            Mode::Multi => MULTI_TIMEOUT,
            Mode::Scramble { .. } => return Duration::from_secs(SCRAMBLE_TIMEOUT),
            _ => ROUND_TIMEOUT,
        };
        Duration::from_secs(if deck_timeout > 0 { deck_timeout } else { default })
    }
    /// Whole-session clock for gauntlets.
    pub fn gauntlet_clock(&self) -> Duration {
        match self.mode {
            Mode::Gauntlet { minutes: Some(m) } if m > 0 => {
                Duration::from_secs(m.min(GAUNTLET_MINUTES_MAX) * 60)
            }
            _ => Duration::from_secs(GAUNTLET_TIMEOUT),
        }
    }
}

/// Extra seconds a multi-answer card gets for having many answers.
pub fn multi_bonus(answers: usize) -> Duration {
    Duration::from_secs((answers as u64 * MULTI_BONUS_PER_ANSWER).min(MULTI_BONUS_CAP))
}
