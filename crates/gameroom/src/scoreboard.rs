use super::*;
use qr_core::*;

/// Rule for splitting the final board into winners and participants.
///
/// Multi-answer sessions can end with several participants over the
/// threshold on the same round, so whether they all win or only the
/// leaders do is a per-session choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Podium {
    /// Everyone at or above the threshold wins.
    Threshold,
    /// Participants at or above the threshold who also hold the top score win.
    Leaders,
    /// Nobody is listed as a winner.
    Nobody,
}

impl Podium {
    pub fn crowns(&self, score: Points, limit: Points, top: Points) -> bool {
        match self {
            Self::Threshold => score >= limit,
            Self::Leaders => score >= limit && score == top,
            Self::Nobody => false,
        }
    }
}

/// Final standings of a session, split for display.
#[derive(Debug, Clone, Default)]
pub struct Scoreboard {
    pub title: String,
    pub winners: Vec<(ID<Member>, Points)>,
    pub participants: Vec<(ID<Member>, Points)>,
    pub failed: usize,
    pub resume: Option<Index>,
    pub history: String,
}

impl Scoreboard {
    pub fn new(title: &str, standings: &Standings, podium: Podium, limit: Points) -> Self {
        let top = standings.top();
        let (winners, participants): (Vec<_>, Vec<_>) = standings
            .ranking()
            .into_iter()
            .partition(|(_, score)| podium.crowns(*score, limit, top));
        Self {
            title: title.to_string(),
            winners,
            participants,
            ..Self::default()
        }
    }
    /// Cards kept for review; announced with a replay hint.
    pub fn failed(mut self, failed: usize) -> Self {
        self.failed = failed;
        self
    }
    /// Index a sequential session can be resumed from.
    pub fn resume(mut self, index: Option<Index>) -> Self {
        self.resume = index;
        self
    }
    pub fn history(mut self, history: String) -> Self {
        self.history = history;
        self
    }
    pub fn embed(&self) -> Embed {
        let winners = self
            .winners
            .iter()
            .map(|(m, p)| format!("{}: {} points\n", m.mention(), p))
            .collect::<String>();
        let participants = self
            .participants
            .iter()
            .map(|(m, p)| format!("{}: {} point(s)\n", m.mention(), p))
            .collect::<String>();
        let mut embed = Embed::new(format!("Final Quiz Scoreboard: {}", self.title), COLOR_SCOREBOARD)
            .description("-------------------------------")
            .footer(self.history.clone());
        if !winners.is_empty() {
            embed = embed.field("Winner", truncate(&winners, FIELD_LIMIT));
        }
        if !participants.is_empty() {
            embed = embed.field("Participants", truncate(&participants, FIELD_LIMIT));
        }
        if let Some(index) = self.resume {
            embed = embed.field(
                "Resuming",
                format!(
                    "Try `{}quiz {} {}-` to continue from #{}\n",
                    COMMAND_PREFIX, self.title, index, index
                ),
            );
        }
        if self.failed > 0 {
            embed = embed.field(
                "Note",
                format!(
                    "Try `{}quiz {}` to replay the {} failed question(s)\n",
                    COMMAND_PREFIX, REVIEW, self.failed
                ),
            );
        }
        embed
    }
}
