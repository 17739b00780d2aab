use serde::Deserialize;
use serde::Serialize;

/// One question with its accepted answers.
///
/// Answers keep their authored order: the first answer is the one shown
/// in quiz histories, and result announcements list them as written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub question: String,
    #[serde(default)]
    pub answers: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub comment: String,
}

impl Card {
    pub fn new<Q, A, S>(question: Q, answers: A) -> Self
    where
        Q: Into<String>,
        A: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            question: question.into(),
            answers: answers.into_iter().map(Into::into).collect(),
            comment: String::new(),
        }
    }
    pub fn with_comment<C>(mut self, comment: C) -> Self
    where
        C: Into<String>,
    {
        self.comment = comment.into();
        self
    }
    /// All accepted answers joined for display.
    pub fn reveal(&self) -> String {
        self.answers.join(", ")
    }
    /// First authored answer, if any.
    pub fn headline(&self) -> Option<&str> {
        self.answers.first().map(String::as_str)
    }
    pub fn has_comment(&self) -> bool {
        !self.comment.is_empty()
    }
}
