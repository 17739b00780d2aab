use super::*;
use qr_cards::Card;
use qr_core::*;

/// Running record of a session: what was asked, and what went unanswered.
///
/// The history becomes the scoreboard footer. Failed cards become the
/// channel's next review deck.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    history: Vec<String>,
    failed: Vec<Card>,
}

impl Ledger {
    /// Appends a history entry for the question just asked.
    pub fn record<S>(&mut self, label: S)
    where
        S: Into<String>,
    {
        self.history.push(label.into());
    }
    /// Marks the latest history entry as missed and keeps the card for review.
    pub fn fail(&mut self, card: Card) {
        self.miss();
        self.failed.push(card);
    }
    /// Marks the latest history entry as missed without keeping the card.
    pub fn miss(&mut self) {
        if let Some(last) = self.history.last_mut() {
            last.insert(0, '*');
        }
    }
    /// Adds cards that were never asked to the review pile.
    pub fn fold<I>(&mut self, cards: I)
    where
        I: IntoIterator<Item = Card>,
    {
        self.failed.extend(cards);
    }
    pub fn history(&self) -> &[String] {
        &self.history
    }
    pub fn failed(&self) -> &[Card] {
        &self.failed
    }
    pub fn take_failed(&mut self) -> Vec<Card> {
        std::mem::take(&mut self.failed)
    }
    /// History joined for display, shortened to fit a footer.
    pub fn footer(&self) -> String {
        truncate(&self.history.join(HISTORY_SEPARATOR), DESCRIPTION_LIMIT)
    }
}
