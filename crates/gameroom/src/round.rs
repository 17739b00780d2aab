use super::*;
use qr_cards::*;
use qr_core::*;
use std::time::Duration;

/// How a question is put to the channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    Text(String),
    Image(String),
}

/// What decides whether a message answers the current question.
#[derive(Debug, Clone)]
enum Judge {
    Key(AnswerKey),
    Anagram(Puzzle),
}

impl Judge {
    fn accepts(&self, text: &str) -> Option<usize> {
        match self {
            Self::Key(key) => key.accepts(text),
            Self::Anagram(puzzle) => puzzle
                .accepts(text)
                .then(|| {
                    let text = text.trim().to_lowercase();
                    puzzle.group.iter().position(|w| *w == text)
                })
                .flatten(),
        }
    }
    fn answers(&self) -> usize {
        match self {
            Self::Key(key) => key.len(),
            Self::Anagram(puzzle) => puzzle.group.len(),
        }
    }
}

/// Per-round scorekeeper.
#[derive(Debug, Clone)]
enum Keeper {
    Ranking(Ranking),
    Tally(Tally),
}

/// Result of offering one message to the round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Not an accepted answer.
    Wrong,
    /// First correct answer from this participant; carries their rank.
    Ranked(usize),
    /// Correct, but this participant already placed.
    Repeat,
    /// Multi-answer claim, with the answers still unclaimed afterwards.
    Claimed(Claim, usize),
}

impl Verdict {
    /// Whether the message shows the channel is still playing.
    pub fn is_activity(&self) -> bool {
        match self {
            Self::Wrong => false,
            Self::Ranked(_) | Self::Repeat => true,
            Self::Claimed(claim, _) => claim.counts(),
        }
    }
}

/// One card in play, from presentation to scoring.
#[derive(Debug, Clone)]
pub struct Round {
    pub card: Card,
    /// Title suffix for result announcements; empty for text and link decks.
    pub title: String,
    /// History entry for the scoreboard footer.
    pub label: String,
    pub prompt: Prompt,
    judge: Judge,
    keeper: Keeper,
}

impl Round {
    /// Round for a deck card.
    pub fn deal(card: Card, presentation: Presentation, multi: bool) -> Self {
        let (title, label) = match (presentation.labels_by_answer(), card.headline()) {
            (true, Some(answer)) => (String::new(), answer.to_string()),
            _ => (truncate(&card.question, TITLE_LIMIT), card.question.clone()),
        };
        let prompt = match presentation {
            Presentation::Text => Prompt::Text(format!("```\n{}```", card.question)),
            Presentation::Url => Prompt::Text(card.question.clone()),
            Presentation::Image => Prompt::Image(card.question.clone()),
        };
        let key = AnswerKey::from(&card);
        let keeper = match multi {
            true => Keeper::Tally(Tally::new(key.len())),
            false => Keeper::Ranking(Ranking::default()),
        };
        Self {
            card,
            title,
            label,
            prompt,
            judge: Judge::Key(key),
            keeper,
        }
    }
    /// Round for a scramble puzzle.
    pub fn puzzle(puzzle: Puzzle) -> Self {
        Self {
            card: puzzle.card(),
            title: truncate(&puzzle.scrambled, TITLE_LIMIT),
            label: puzzle.word.clone(),
            prompt: Prompt::Image(puzzle.scrambled.clone()),
            judge: Judge::Anagram(puzzle),
            keeper: Keeper::Ranking(Ranking::default()),
        }
    }
    /// Judges one message. `window` bounds how far behind the first
    /// claim a shared multi-answer claim may arrive.
    pub fn offer(&mut self, inbound: &Inbound, window: Duration) -> Verdict {
        let Some(answer) = self.judge.accepts(&inbound.text) else {
            return Verdict::Wrong;
        };
        match &mut self.keeper {
            Keeper::Ranking(ranking) => ranking
                .record(&inbound.author)
                .map(Verdict::Ranked)
                .unwrap_or(Verdict::Repeat),
            Keeper::Tally(tally) => {
                let claim = tally.claim(&inbound.author, answer, &inbound.text, window);
                Verdict::Claimed(claim, tally.remaining())
            }
        }
    }
    /// Whether anybody has scored this round.
    pub fn is_scored(&self) -> bool {
        match &self.keeper {
            Keeper::Ranking(ranking) => !ranking.is_empty(),
            Keeper::Tally(tally) => !tally.is_empty(),
        }
    }
    /// Points earned this round, in announcement order.
    pub fn awards(&self) -> Vec<(ID<Member>, Points)> {
        match &self.keeper {
            Keeper::Ranking(ranking) => ranking.iter().map(|m| (m.clone(), 1)).collect(),
            Keeper::Tally(tally) => tally
                .ranked()
                .into_iter()
                .map(|m| (m.clone(), tally.points(m)))
                .collect(),
        }
    }
    /// Answers a participant was credited with, multi-answer rounds only.
    pub fn given(&self, member: &ID<Member>) -> Vec<&str> {
        match &self.keeper {
            Keeper::Ranking(_) => Vec::new(),
            Keeper::Tally(tally) => tally.given(member),
        }
    }
    pub fn is_tally(&self) -> bool {
        matches!(self.keeper, Keeper::Tally(_))
    }
    /// Distinct answers that can be claimed.
    pub fn answers(&self) -> usize {
        self.judge.answers()
    }
}
