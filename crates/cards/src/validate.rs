//! Duplicate detection for authored decks.
//!
//! Decks are written by hand and grow by copy-paste, so the same question
//! tends to appear more than once, and the same answer tends to appear
//! twice on one card. [`check_duplicates`] reports both and produces a
//! merged deck with questions in sorted order.
use super::Card;
use super::Deck;
use std::collections::BTreeMap;
use std::collections::HashSet;

/// Insertion-ordered set of strings.
#[derive(Debug, Clone, Default)]
pub struct OrderedSet {
    seen: HashSet<String>,
    values: Vec<String>,
}

impl OrderedSet {
    /// Returns false if the value was already present.
    pub fn insert(&mut self, value: &str) -> bool {
        if self.seen.contains(value) {
            false
        } else {
            self.seen.insert(value.to_string());
            self.values.push(value.to_string());
            true
        }
    }
    /// Inserts every value, returning the ones that were already present.
    pub fn extend<'a, I>(&mut self, values: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a String>,
    {
        values
            .into_iter()
            .filter(|v| !self.insert(v))
            .cloned()
            .collect()
    }
    pub fn values(&self) -> &[String] {
        &self.values
    }
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Finding {
    DuplicateQuestion(String),
    DuplicateAnswers { question: String, answers: Vec<String> },
    EmptyAnswers(String),
}

impl std::fmt::Display for Finding {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::DuplicateQuestion(q) => write!(f, "duplicate question: {}", q),
            Self::DuplicateAnswers { question, answers } => {
                write!(f, "duplicate answers for {}: {}", question, answers.join(", "))
            }
            Self::EmptyAnswers(q) => write!(f, "no answers: {}", q),
        }
    }
}

/// Outcome of checking one deck.
#[derive(Debug, Clone)]
pub struct Report {
    pub fixed: Deck,
    pub findings: Vec<Finding>,
}

impl Report {
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }
}

struct Merged {
    answers: OrderedSet,
    comments: OrderedSet,
}

/// Merges cards sharing a question. Answers keep first-seen order;
/// distinct non-empty comments are joined by newlines. Deck metadata is
/// carried over unchanged.
pub fn check_duplicates(deck: &Deck) -> Report {
    let mut findings = Vec::new();
    let mut merged = BTreeMap::<String, Merged>::new();
    for card in deck.cards.iter() {
        let repeated = merged.contains_key(&card.question);
        if repeated {
            findings.push(Finding::DuplicateQuestion(card.question.clone()));
        }
        let entry = merged.entry(card.question.clone()).or_insert_with(|| Merged {
            answers: OrderedSet::default(),
            comments: OrderedSet::default(),
        });
        let dups = entry.answers.extend(card.answers.iter());
        if !repeated && !dups.is_empty() {
            findings.push(Finding::DuplicateAnswers {
                question: card.question.clone(),
                answers: dups,
            });
        }
        if card.has_comment() {
            entry.comments.insert(&card.comment);
        }
    }
    let cards = merged
        .into_iter()
        .map(|(question, merged)| {
            if merged.answers.is_empty() {
                findings.push(Finding::EmptyAnswers(question.clone()));
            }
            Card::new(question, merged.answers.values().iter().cloned())
                .with_comment(merged.comments.values().join("\n"))
        })
        .collect::<Vec<_>>();
    Report {
        fixed: deck.with_cards(cards),
        findings,
    }
}
