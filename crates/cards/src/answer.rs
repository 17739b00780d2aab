use qr_core::SKIP_TOKENS;

/// Folds katakana to hiragana, full-width digits to ASCII, and the
/// ideographic space to a plain space. Everything else passes through.
pub fn fold(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            'ァ'..='ヶ' => char::from_u32(c as u32 - 0x60).unwrap_or(c),
            '０'..='９' => char::from_u32(c as u32 - '０' as u32 + '0' as u32).unwrap_or(c),
            '\u{3000}' => ' ',
            _ => c,
        })
        .collect()
}

/// Canonical comparison form: trimmed, lower-cased, script-folded.
pub fn canonical(s: &str) -> String {
    fold(&s.trim().to_lowercase())
}

/// Whether a message asks to give up on the current question.
pub fn is_skip(s: &str) -> bool {
    SKIP_TOKENS.contains(&s.trim())
}

/// Canonicalized accepted answers for one card.
///
/// Duplicates that collapse to the same canonical form are stored once,
/// so [`AnswerKey::len`] counts answers that can be claimed separately.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerKey {
    answers: Vec<String>,
}

impl AnswerKey {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut key = Self::default();
        answers
            .into_iter()
            .map(|a| canonical(a.as_ref()))
            .filter(|a| !a.is_empty())
            .for_each(|a| {
                if !key.answers.contains(&a) {
                    key.answers.push(a);
                }
            });
        key
    }
    /// Index of the canonical answer matching `candidate`, if any.
    pub fn accepts(&self, candidate: &str) -> Option<usize> {
        let candidate = canonical(candidate);
        self.answers
            .iter()
            .position(|a| a.len() == candidate.len() && *a == candidate)
    }
    pub fn len(&self) -> usize {
        self.answers.len()
    }
    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }
}

impl From<&super::Card> for AnswerKey {
    fn from(card: &super::Card) -> Self {
        Self::new(&card.answers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn fold_katakana_and_fullwidth() {
        assert_eq!(fold("カタカナ"), "かたかな");
        assert_eq!(fold("ヴァ"), "ゔぁ");
        assert_eq!(fold("１２３"), "123");
        assert_eq!(fold("あ\u{3000}い"), "あ い");
        assert_eq!(fold("漢字 abc"), "漢字 abc");
    }
    #[test]
    fn canonical_case_folds() {
        assert_eq!(canonical("  Tokyo "), "tokyo");
        assert_eq!(canonical("トウキョウ"), "とうきょう");
    }
    #[test]
    fn skip_tokens() {
        assert!(is_skip(".."));
        assert!(is_skip("。。"));
        assert!(!is_skip("..."));
        assert!(!is_skip("answer"));
    }
    #[test]
    fn key_accepts_folded_forms() {
        let key = AnswerKey::new(["にほん", "Japan"]);
        assert_eq!(key.accepts("ニホン"), Some(0));
        assert_eq!(key.accepts("japan"), Some(1));
        assert_eq!(key.accepts("JAPAN "), Some(1));
        assert_eq!(key.accepts("nippon"), None);
    }
    #[test]
    fn key_collapses_duplicates() {
        let key = AnswerKey::new(["かな", "カナ", "", "kana"]);
        assert_eq!(key.len(), 2);
        assert_eq!(key.accepts("kana"), Some(1));
    }
}
