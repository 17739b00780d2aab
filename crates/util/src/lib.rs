//! Core identifiers, presets, and constants for quizroom.
//!
//! This crate provides the foundational types and tuning parameters
//! shared by the deck, gameroom, and hosting crates.
#![allow(dead_code)]

use std::time::Duration;

// ============================================================================
// TYPE ALIASES
// ============================================================================
/// Points accumulated by a participant.
pub type Points = u32;
/// Zero-based position of a card within a deck.
pub type Index = usize;

// ============================================================================
// IDENTITY TYPES
// ============================================================================
use std::cmp::Ordering;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::hash::Hash;
use std::hash::Hasher;
use std::marker::PhantomData;

/// Marker for chat channels (guild channels and private conversations alike).
pub struct Channel;
/// Marker for chat participants.
pub struct Member;
/// Marker for individual chat messages.
pub struct Message;

/// Generic ID wrapper providing compile-time type safety over the
/// opaque string identifiers handed out by the chat transport.
pub struct ID<T> {
    inner: String,
    marker: PhantomData<T>,
}

impl<T> ID<T> {
    pub fn as_str(&self) -> &str {
        &self.inner
    }
    /// Cast ID<T> to ID<U> while preserving the underlying identifier.
    /// Private channels are keyed by the same id as their conversation.
    pub fn cast<U>(self) -> ID<U> {
        ID {
            inner: self.inner,
            marker: PhantomData,
        }
    }
    /// Chat-style mention of this identity.
    pub fn mention(&self) -> String {
        format!("<@{}>", self.inner)
    }
}

impl<T> From<String> for ID<T> {
    fn from(inner: String) -> Self {
        Self {
            inner,
            marker: PhantomData,
        }
    }
}
impl<T> From<&str> for ID<T> {
    fn from(inner: &str) -> Self {
        Self::from(inner.to_string())
    }
}
impl<T> From<ID<T>> for String {
    fn from(id: ID<T>) -> Self {
        id.inner
    }
}

impl<T> Clone for ID<T> {
    fn clone(&self) -> Self {
        Self::from(self.inner.clone())
    }
}

impl<T> Eq for ID<T> {}
impl<T> PartialEq for ID<T> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<T> Ord for ID<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.cmp(&other.inner)
    }
}
impl<T> PartialOrd for ID<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Hash for ID<T> {
    fn hash<H>(&self, state: &mut H)
    where
        H: Hasher,
    {
        self.inner.hash(state);
    }
}

impl<T> Debug for ID<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ID").field(&self.inner).finish()
    }
}
impl<T> Display for ID<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.inner, f)
    }
}

// ============================================================================
// COMMANDS
// ============================================================================
/// Prefix every bot command starts with.
pub const COMMAND_PREFIX: &str = "kq!";
/// Deck name that refers to the channel's review deck.
pub const REVIEW: &str = "review";
/// Messages that give up on the current question.
pub const SKIP_TOKENS: [&str; 2] = ["..", "。。"];

// ============================================================================
// ROUND TIMING
// ============================================================================
/// Seconds to wait for a first correct answer when the deck sets none.
pub const ROUND_TIMEOUT: u64 = 20;
/// Consecutive unanswered rounds before a session is abandoned.
pub const TIMEOUT_LIMIT: usize = 5;
/// Pause between the last round and the final scoreboard.
pub const SETTLE_DELAY: Duration = Duration::from_secs(1);
/// Capacity of the inbound relay between transport and room.
pub const RELAY_CAPACITY: usize = 100;

// ============================================================================
// SCORING
// ============================================================================
/// Default points needed to win a standard session.
pub const WIN_LIMIT: u32 = 15;
/// Upper bound for caller-supplied win limits.
pub const WIN_LIMIT_MAX: u32 = 100;

// ============================================================================
// MULTI-ANSWER MODE
// ============================================================================
/// Base seconds per multi-answer round.
pub const MULTI_TIMEOUT: u64 = 13;
/// Bonus seconds granted per accepted answer on the card.
pub const MULTI_BONUS_PER_ANSWER: u64 = 2;
/// Upper bound on the bonus seconds.
pub const MULTI_BONUS_CAP: u64 = 12;
/// Points a participant may earn from a single multi-answer card.
pub const MULTI_POINT_CAP: u32 = 3;

// ============================================================================
// SCRAMBLE MODE
// ============================================================================
/// Points needed to win a scramble session.
pub const SCRAMBLE_WIN_LIMIT: u32 = 10;
/// Seconds to wait per scramble round.
pub const SCRAMBLE_TIMEOUT: u64 = 30;
/// Permutations tried before a word is skipped.
pub const SCRAMBLE_ATTEMPTS: usize = 3;
/// Session name shown for scramble sessions.
pub const SCRAMBLE_TITLE: &str = "Scramble";
/// Description shown when a scramble session starts.
pub const SCRAMBLE_DESCRIPTION: &str = "Unscramble the English word";

// ============================================================================
// GAUNTLET MODE
// ============================================================================
/// Seconds for a complete gauntlet when no limit is given.
pub const GAUNTLET_TIMEOUT: u64 = 120;
/// Upper bound for caller-supplied gauntlet minutes.
pub const GAUNTLET_MINUTES_MAX: u64 = 20;
/// Time to read the rules before the first gauntlet question.
pub const GAUNTLET_WARMUP: Duration = Duration::from_secs(5);

// ============================================================================
// PRESENTATION LIMITS
// ============================================================================
/// Longest question text used in a result title.
pub const TITLE_LIMIT: usize = 100;
/// Longest embed description or footer.
pub const DESCRIPTION_LIMIT: usize = 2000;
/// Longest embed field value.
pub const FIELD_LIMIT: usize = 1024;
/// Separator between entries in the quiz history footer.
pub const HISTORY_SEPARATOR: &str = "\u{3000}";

/// Embed accent colors.
pub const COLOR_TIMEOUT: u32 = 0xAA2222;
pub const COLOR_CORRECT: u32 = 0x22AA22;
pub const COLOR_SCOREBOARD: u32 = 0x33FF33;
pub const COLOR_BROADCAST: u32 = 0xFFAAAA;
pub const COLOR_INFO: u32 = 0xFADE40;

// ============================================================================
// PRESETS
// ============================================================================
/// Pacing presets selected by the command word that starts a quiz.
/// Each preset pairs a grace window with an inter-round pause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Speed {
    Flash,
    Mad,
    Fast,
    #[default]
    Quiz,
    Mild,
    Slow,
    Multi,
    Qq,
}

impl Speed {
    /// Extra time other participants get after the first correct answer.
    pub fn window(&self) -> Duration {
        Duration::from_millis(self.millis().0)
    }
    /// Breathing room before each question.
    pub fn pause(&self) -> Duration {
        Duration::from_millis(self.millis().1)
    }
    fn millis(&self) -> (u64, u64) {
        match self {
            Self::Flash => (250, 500),
            Self::Mad => (0, 5000),
            Self::Fast => (1000, 5000),
            Self::Quiz => (2000, 5000),
            Self::Mild => (3000, 5000),
            Self::Slow => (5000, 5000),
            Self::Multi => (1500, 5000),
            Self::Qq => (1250, 500),
        }
    }
}

impl TryFrom<&str> for Speed {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "flash" => Ok(Self::Flash),
            "mad" => Ok(Self::Mad),
            "fast" => Ok(Self::Fast),
            "quiz" => Ok(Self::Quiz),
            "mild" => Ok(Self::Mild),
            "slow" => Ok(Self::Slow),
            "multi" => Ok(Self::Multi),
            "qq" => Ok(Self::Qq),
            _ => Err(format!("unknown speed: {}", s)),
        }
    }
}

/// Word length bounds for scramble sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
    Insane,
}

impl Difficulty {
    /// Shortest and longest word length (inclusive, in characters).
    pub fn bounds(&self) -> (usize, usize) {
        match self {
            Self::Easy => (3, 5),
            Self::Normal => (3, 7),
            Self::Hard => (4, 9),
            Self::Insane => (5, 9999),
        }
    }
}

impl TryFrom<&str> for Difficulty {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "easy" => Ok(Self::Easy),
            "normal" => Ok(Self::Normal),
            "hard" => Ok(Self::Hard),
            "insane" => Ok(Self::Insane),
            _ => Err(format!("unknown difficulty: {}", s)),
        }
    }
}

// ============================================================================
// RUNTIME UTILITIES
// ============================================================================
/// Terminal logging at INFO plus a DEBUG log file per run under `logs/`.
#[cfg(feature = "server")]
pub fn log() -> anyhow::Result<()> {
    let folder = std::path::Path::new("logs");
    std::fs::create_dir_all(folder)?;
    let stamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)?
        .as_secs();
    let path = folder.join(format!("quizroom-{}.log", stamp));
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config.clone(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config,
        std::fs::File::create(&path)?,
    );
    simplelog::CombinedLogger::init(vec![term, file])?;
    log::debug!("[log] writing to {}", path.display());
    Ok(())
}

/// Register Ctrl+C handler for immediate (non-graceful) termination.
/// Running sessions are dropped without a final scoreboard.
#[cfg(feature = "server")]
pub fn kys() {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            println!();
            log::warn!("violent interrupt received, exiting immediately");
            std::process::exit(0);
        }
    });
}
