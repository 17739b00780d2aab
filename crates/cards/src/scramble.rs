use super::*;
use qr_core::Difficulty;
use qr_core::SCRAMBLE_ATTEMPTS;
use rand::Rng;
use std::collections::BTreeMap;
use std::path::Path;

/// Letters of `word` in sorted order; anagrams share a signature.
pub fn signature(word: &str) -> String {
    let mut chars = word.chars().collect::<Vec<_>>();
    chars.sort_unstable();
    chars.into_iter().collect()
}

/// Dictionary words grouped by sorted-letter signature.
///
/// Built once and read-only afterwards. Every group is a valid puzzle
/// source, singletons included; any member of a group solves its puzzle.
#[derive(Debug, Clone, Default)]
pub struct ScramblePool {
    groups: Vec<Vec<String>>,
}

impl ScramblePool {
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut groups = BTreeMap::<String, Vec<String>>::new();
        words
            .into_iter()
            .map(Into::into)
            .map(|w| w.trim().to_string())
            .filter(|w| !w.is_empty())
            .for_each(|w| {
                let members = groups.entry(signature(&w)).or_default();
                if !members.contains(&w) {
                    members.push(w);
                }
            });
        Self {
            groups: groups.into_values().collect(),
        }
    }
    /// Reads one word per line.
    pub fn load<P>(path: P) -> anyhow::Result<Self>
    where
        P: AsRef<Path>,
    {
        let text = std::fs::read_to_string(path.as_ref())
            .inspect_err(|e| log::error!("[scramble] reading dictionary: {}", e))?;
        let pool = Self::from_words(text.lines());
        log::info!("[scramble] loaded {} anagram groups", pool.len());
        Ok(pool)
    }
    pub fn len(&self) -> usize {
        self.groups.len()
    }
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
    pub fn group(&self, index: usize) -> Option<&[String]> {
        self.groups.get(index).map(Vec::as_slice)
    }
    /// Group indices in random order, so one session spreads repeats out.
    pub fn order<R>(&self, rng: &mut R) -> Vec<usize>
    where
        R: Rng + ?Sized,
    {
        let mut order = (0..self.groups.len()).collect::<Vec<_>>();
        shuffle(&mut order, rng);
        order
    }
    /// Scrambles the representative word of group `index`.
    ///
    /// Returns `None` when the word falls outside the difficulty's length
    /// bounds, or when every attempted permutation is itself a member of
    /// the group (the puzzle would already be solved).
    pub fn puzzle<R>(&self, index: usize, difficulty: Difficulty, rng: &mut R) -> Option<Puzzle>
    where
        R: Rng + ?Sized,
    {
        let group = self.groups.get(index)?;
        let word = group.first()?;
        let (min, max) = difficulty.bounds();
        let length = word.chars().count();
        if length < min || length > max {
            return None;
        }
        (0..SCRAMBLE_ATTEMPTS)
            .map(|_| {
                let mut letters = word.chars().collect::<Vec<_>>();
                shuffle(&mut letters, rng);
                letters.into_iter().collect::<String>()
            })
            .find(|scrambled| !group.contains(scrambled))
            .map(|scrambled| Puzzle {
                scrambled,
                word: word.clone(),
                group: group.clone(),
            })
    }
}

/// A scrambled word and the anagram group that solves it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Puzzle {
    pub scrambled: String,
    pub word: String,
    pub group: Vec<String>,
}

impl Puzzle {
    /// Same length first, then case-insensitive membership in the group.
    pub fn accepts(&self, candidate: &str) -> bool {
        let candidate = candidate.trim();
        candidate.chars().count() == self.word.chars().count()
            && self.group.contains(&candidate.to_lowercase())
    }
    /// The question as a card, so scramble rounds share the deck round shape.
    pub fn card(&self) -> Card {
        Card::new(self.scrambled.clone(), self.group.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    fn pool() -> ScramblePool {
        ScramblePool::from_words(["stop", "pots", "tops", "opts", "post", "spot", "cat", "act", "a", "zebra"])
    }
    #[test]
    fn groups_by_signature() {
        let pool = pool();
        assert_eq!(pool.len(), 4);
        let stop = (0..pool.len())
            .filter_map(|i| pool.group(i))
            .find(|g| g.contains(&"stop".to_string()))
            .unwrap();
        assert_eq!(stop.len(), 6);
        assert_eq!(signature("tops"), "opst");
    }
    #[test]
    fn puzzle_is_never_a_group_member() {
        let pool = pool();
        let ref mut rng = SmallRng::seed_from_u64(3);
        for _ in 0..100 {
            for i in pool.order(rng) {
                if let Some(puzzle) = pool.puzzle(i, Difficulty::Easy, rng) {
                    assert!(!puzzle.group.contains(&puzzle.scrambled));
                    assert_eq!(signature(&puzzle.scrambled), signature(&puzzle.word));
                }
            }
        }
    }
    #[test]
    fn single_letter_words_are_skipped() {
        let pool = ScramblePool::from_words(["a"]);
        let ref mut rng = SmallRng::seed_from_u64(3);
        let insane = Difficulty::Insane;
        assert!(pool.puzzle(0, insane, rng).is_none());
        assert!(pool.puzzle(0, Difficulty::Easy, rng).is_none());
    }
    #[test]
    fn length_bounds_apply() {
        let pool = ScramblePool::from_words(["zebras"]);
        let ref mut rng = SmallRng::seed_from_u64(5);
        assert!(pool.puzzle(0, Difficulty::Easy, rng).is_none());
        let found = (0..20).find_map(|_| pool.puzzle(0, Difficulty::Normal, rng));
        assert!(found.is_some());
    }
    #[test]
    fn puzzle_accepts_any_anagram() {
        let puzzle = Puzzle {
            scrambled: "ostp".into(),
            word: "opts".into(),
            group: vec!["opts".into(), "pots".into(), "stop".into()],
        };
        assert!(puzzle.accepts("STOP"));
        assert!(puzzle.accepts("pots"));
        assert!(!puzzle.accepts("spots"));
        assert!(!puzzle.accepts("ostp"));
        assert_eq!(puzzle.card().answers.len(), 3);
    }
    #[test]
    fn order_covers_every_group() {
        let pool = pool();
        let ref mut rng = SmallRng::seed_from_u64(9);
        let mut order = pool.order(rng);
        order.sort();
        assert_eq!(order, (0..pool.len()).collect::<Vec<_>>());
    }
}
