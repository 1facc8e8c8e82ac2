use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("a question needs at least two options, got {got}")]
    TooFewOptions { got: usize },

    #[error("correct option index {index} out of range for {len} options")]
    CorrectIndexOutOfRange { index: usize, len: usize },
}

/// A single multiple-choice question. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    theme: String,
    text: String,
    options: Vec<String>,
    correct_index: usize,
    explanation: String,
}

impl Question {
    /// Build a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::TooFewOptions` for fewer than two options and
    /// `QuestionError::CorrectIndexOutOfRange` when `correct_index` does not
    /// point into `options`.
    pub fn new(
        theme: impl Into<String>,
        text: impl Into<String>,
        options: Vec<String>,
        correct_index: usize,
        explanation: impl Into<String>,
    ) -> Result<Self, QuestionError> {
        if options.len() < 2 {
            return Err(QuestionError::TooFewOptions { got: options.len() });
        }
        if correct_index >= options.len() {
            return Err(QuestionError::CorrectIndexOutOfRange {
                index: correct_index,
                len: options.len(),
            });
        }

        Ok(Self {
            theme: theme.into(),
            text: text.into(),
            options,
            correct_index,
            explanation: explanation.into(),
        })
    }

    #[must_use]
    pub fn theme(&self) -> &str {
        &self.theme
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn correct_index(&self) -> usize {
        self.correct_index
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    /// Whether the given option index is the correct answer.
    #[must_use]
    pub fn is_correct(&self, option: usize) -> bool {
        option == self.correct_index
    }
}

/// Immutable in-memory question bank, loaded once at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    #[must_use]
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Distinct themes present in the bank, sorted.
    #[must_use]
    pub fn themes(&self) -> Vec<String> {
        let set: BTreeSet<&str> = self.questions.iter().map(Question::theme).collect();
        set.into_iter().map(str::to_owned).collect()
    }

    /// Question count per theme, for the mode-selection screen.
    #[must_use]
    pub fn theme_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for question in &self.questions {
            *counts.entry(question.theme().to_owned()).or_insert(0) += 1;
        }
        counts
    }

    /// Questions whose theme is in `themes`, preserving bank order.
    ///
    /// An empty result means the caller selected no matching theme; starting
    /// a session from it fails with an empty-pool error downstream.
    #[must_use]
    pub fn filter_by_themes(&self, themes: &[String]) -> Vec<Question> {
        self.questions
            .iter()
            .filter(|q| themes.iter().any(|t| t == q.theme()))
            .cloned()
            .collect()
    }
}
