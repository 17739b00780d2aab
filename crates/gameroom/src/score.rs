use qr_core::*;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;

/// Arrival order of correct answers in a single-answer round.
///
/// A participant's rank is fixed by their first correct answer; later
/// answers from the same participant change nothing.
#[derive(Debug, Clone, Default)]
pub struct Ranking {
    order: Vec<ID<Member>>,
}

impl Ranking {
    /// Returns the participant's rank (1-based) if this is their first
    /// correct answer of the round.
    pub fn record(&mut self, member: &ID<Member>) -> Option<usize> {
        if self.order.contains(member) {
            None
        } else {
            self.order.push(member.clone());
            Some(self.order.len())
        }
    }
    pub fn rank(&self, member: &ID<Member>) -> Option<usize> {
        self.order.iter().position(|m| m == member).map(|i| i + 1)
    }
    pub fn fastest(&self) -> Option<&ID<Member>> {
        self.order.first()
    }
    pub fn len(&self) -> usize {
        self.order.len()
    }
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
    pub fn iter(&self) -> impl Iterator<Item = &ID<Member>> {
        self.order.iter()
    }
}

/// Outcome of offering an answer to a [`Tally`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Claim {
    /// Nobody had given this answer yet.
    First,
    /// Already claimed by someone else, but close enough behind to count.
    Shared,
    /// Already claimed too long ago.
    Late,
    /// This participant already gave this answer.
    Repeat,
}

impl Claim {
    pub fn counts(&self) -> bool {
        matches!(self, Self::First | Self::Shared)
    }
}

/// Distinct accepted answers per participant in a multi-answer round.
#[derive(Debug, Clone)]
pub struct Tally {
    answers: usize,
    claimed: HashMap<usize, Instant>,
    order: Vec<ID<Member>>,
    credits: HashMap<ID<Member>, Vec<(usize, String)>>,
}

impl Tally {
    /// Tally for a card with `answers` distinct accepted answers.
    pub fn new(answers: usize) -> Self {
        Self {
            answers,
            claimed: HashMap::new(),
            order: Vec::new(),
            credits: HashMap::new(),
        }
    }
    /// Offers answer number `answer` from `member`. Answers first claimed
    /// by another participant still count within `window` of that claim.
    pub fn claim(
        &mut self,
        member: &ID<Member>,
        answer: usize,
        text: &str,
        window: Duration,
    ) -> Claim {
        let now = Instant::now();
        if self
            .credits
            .get(member)
            .is_some_and(|c| c.iter().any(|(a, _)| *a == answer))
        {
            return Claim::Repeat;
        }
        let claim = match self.claimed.get(&answer) {
            None => {
                self.claimed.insert(answer, now);
                Claim::First
            }
            Some(first) if now.duration_since(*first) <= window => Claim::Shared,
            Some(_) => Claim::Late,
        };
        if claim.counts() {
            if !self.order.contains(member) {
                self.order.push(member.clone());
            }
            self.credits
                .entry(member.clone())
                .or_default()
                .push((answer, text.trim().to_string()));
        }
        claim
    }
    /// Answers nobody has claimed yet.
    pub fn remaining(&self) -> usize {
        self.answers.saturating_sub(self.claimed.len())
    }
    /// Distinct answers credited to `member`, uncapped.
    pub fn count(&self, member: &ID<Member>) -> usize {
        self.credits.get(member).map(Vec::len).unwrap_or(0)
    }
    /// Points earned this round, capped.
    pub fn points(&self, member: &ID<Member>) -> Points {
        (self.count(member) as Points).min(MULTI_POINT_CAP)
    }
    /// Answers as typed by `member`, in the order they were credited.
    pub fn given(&self, member: &ID<Member>) -> Vec<&str> {
        self.credits
            .get(member)
            .map(|c| c.iter().map(|(_, t)| t.as_str()).collect())
            .unwrap_or_default()
    }
    /// Participants by round points, ties broken by who scored first.
    pub fn ranked(&self) -> Vec<&ID<Member>> {
        let mut ranked = self.order.iter().collect::<Vec<_>>();
        ranked.sort_by_key(|m| std::cmp::Reverse(self.points(m)));
        ranked
    }
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Cumulative points per participant across a session.
#[derive(Debug, Clone, Default)]
pub struct Standings {
    points: HashMap<ID<Member>, Points>,
}

impl Standings {
    /// Adds points and returns the participant's new total.
    pub fn add(&mut self, member: &ID<Member>, points: Points) -> Points {
        let total = self.points.entry(member.clone()).or_insert(0);
        *total += points;
        *total
    }
    pub fn get(&self, member: &ID<Member>) -> Points {
        self.points.get(member).copied().unwrap_or(0)
    }
    /// Highest total, zero when nobody has scored.
    pub fn top(&self) -> Points {
        self.points.values().copied().max().unwrap_or(0)
    }
    pub fn reached(&self, limit: Points) -> bool {
        self.top() >= limit
    }
    /// Highest totals first; equal totals ordered by id for stable output.
    pub fn ranking(&self) -> Vec<(ID<Member>, Points)> {
        let mut ranking = self
            .points
            .iter()
            .map(|(m, p)| (m.clone(), *p))
            .collect::<Vec<_>>();
        ranking.sort_by(|(a, x), (b, y)| y.cmp(x).then_with(|| a.cmp(b)));
        ranking
    }
    pub fn len(&self) -> usize {
        self.points.len()
    }
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Running totals of a gauntlet.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Gauntlet {
    pub correct: u32,
    pub attempted: u32,
    pub seconds: u64,
}

impl Gauntlet {
    /// Accuracy-weighted throughput: `correct² / attempted`.
    pub fn points(&self) -> f64 {
        match self.attempted {
            0 => 0.0,
            n => (self.correct * self.correct) as f64 / n as f64,
        }
    }
}
