use super::*;
use qr_core::Index;
use rand::Rng;
use serde::Deserialize;
use serde::Serialize;
use std::time::Duration;

/// How a deck's questions are delivered to the channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Presentation {
    /// Question sent as a fenced text block.
    Text,
    /// Question sent verbatim so the chat client unfurls the link.
    Url,
    /// Question rendered to an image by the transport.
    #[default]
    Image,
}

impl Presentation {
    /// Text and link decks use the answer as the history label;
    /// image decks use the question itself.
    pub fn labels_by_answer(&self) -> bool {
        matches!(self, Self::Text | Self::Url)
    }
    fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

impl From<String> for Presentation {
    fn from(s: String) -> Self {
        match s.as_str() {
            "text" => Self::Text,
            "url" => Self::Url,
            _ => Self::Image,
        }
    }
}
impl From<Presentation> for String {
    fn from(p: Presentation) -> Self {
        p.to_string()
    }
}

impl std::fmt::Display for Presentation {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Url => write!(f, "url"),
            Self::Image => write!(f, "image"),
        }
    }
}

/// An ordered quiz definition.
///
/// Loaded decks are never shared between sessions; each session works on
/// its own clone and drains cards from it as rounds are played.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type", default, skip_serializing_if = "Presentation::is_default")]
    pub presentation: Presentation,
    /// Seconds per round; zero defers to the session default.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub timeout: u64,
    #[serde(rename = "deck", default)]
    pub cards: Vec<Card>,
}

fn is_zero(n: &u64) -> bool {
    *n == 0
}

impl Deck {
    pub fn new<D>(description: D, cards: Vec<Card>) -> Self
    where
        D: Into<String>,
    {
        Self {
            description: description.into(),
            cards,
            ..Self::default()
        }
    }
    pub fn len(&self) -> usize {
        self.cards.len()
    }
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
    /// Round timeout, falling back to `default` seconds when the deck sets none.
    pub fn timeout_or(&self, default: u64) -> Duration {
        Duration::from_secs(if self.timeout > 0 { self.timeout } else { default })
    }
    /// Removes the most recently loaded card.
    pub fn pop(&mut self) -> Option<Card> {
        self.cards.pop()
    }
    /// Removes the card at the front of the deck.
    pub fn take_front(&mut self) -> Option<Card> {
        (!self.cards.is_empty()).then(|| self.cards.remove(0))
    }
    /// Drops every card before `offset`, clamping out-of-range offsets
    /// to the deck length. Returns the offset actually applied.
    pub fn skip(&mut self, offset: Index) -> Index {
        let offset = offset.min(self.cards.len());
        self.cards.drain(..offset);
        offset
    }
    /// Removes and returns all remaining cards.
    pub fn drain(&mut self) -> Vec<Card> {
        std::mem::take(&mut self.cards)
    }
    /// Same metadata, different cards.
    pub fn with_cards(&self, cards: Vec<Card>) -> Self {
        Self {
            description: self.description.clone(),
            presentation: self.presentation,
            timeout: self.timeout,
            cards,
        }
    }
    pub fn shuffle<R>(&mut self, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        shuffle(&mut self.cards, rng);
    }
}
