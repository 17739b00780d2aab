use qr_cards::Deck;
use qr_core::*;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Per-channel decks of questions a finished session left unresolved.
///
/// Each deck-backed session overwrites its channel's entry; the next review
/// session consumes it.
#[derive(Default)]
pub struct Reviews {
    decks: RwLock<HashMap<ID<Channel>, Deck>>,
}

impl Reviews {
    pub fn new() -> Self {
        Self::default()
    }
    pub async fn put(&self, channel: &ID<Channel>, deck: Deck) {
        log::debug!("[reviews] {} keeps {} cards", channel, deck.len());
        self.decks.write().await.insert(channel.clone(), deck);
    }
    /// Removes the channel's deck and returns it shuffled. Empty when
    /// nothing is stored.
    pub async fn take_and_shuffle(&self, channel: &ID<Channel>) -> Deck {
        let mut deck = self
            .decks
            .write()
            .await
            .remove(channel)
            .unwrap_or_default();
        deck.shuffle(&mut rand::rng());
        deck
    }
    /// Copy of the channel's deck, left in place.
    pub async fn peek(&self, channel: &ID<Channel>) -> Deck {
        self.decks
            .read()
            .await
            .get(channel)
            .cloned()
            .unwrap_or_default()
    }
}
