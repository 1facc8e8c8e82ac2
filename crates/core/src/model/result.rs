use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::Question;

/// Minimum percentage counted as a pass (20/40 on the full mock).
pub const PASS_MARK_PERCENT: u8 = 50;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ResultError {
    #[error("cannot score an empty question list")]
    NoQuestions,

    #[error("answer list length {selected} does not match question count {questions}")]
    SelectionMismatch { questions: usize, selected: usize },

    #[error("completed_at is before started_at")]
    InvalidTimeRange,

    #[error("correct count {correct} exceeds total {total}")]
    CountMismatch { correct: u32, total: u32 },
}

/// How a test was launched; drives question count, timing, and feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestMode {
    Practice,
    Mock,
    Theme,
}

/// Correct/total tally for one theme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeScore {
    pub correct: u32,
    pub total: u32,
}

impl ThemeScore {
    /// Count one more question, correct or not.
    pub fn count(&mut self, correct: bool) {
        self.total = self.total.saturating_add(1);
        if correct {
            self.correct = self.correct.saturating_add(1);
        }
    }

    /// Fold another tally into this one.
    pub fn merge(&mut self, other: ThemeScore) {
        self.correct = self.correct.saturating_add(other.correct);
        self.total = self.total.saturating_add(other.total);
    }
}

/// Outcome of a submitted test. Derived once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestResult {
    correct_count: u32,
    total: u32,
    percentage: u8,
    passed: bool,
    time_spent_seconds: u32,
    theme_breakdown: BTreeMap<String, ThemeScore>,
    mode: TestMode,
    date: DateTime<Utc>,
}

impl TestResult {
    /// Score a finished test.
    ///
    /// `selected[i]` is the option picked at position `i`; `None` means the
    /// question was never answered and always counts as incorrect.
    ///
    /// # Errors
    ///
    /// Returns `ResultError::NoQuestions` for an empty question list,
    /// `ResultError::SelectionMismatch` when the answer list has the wrong
    /// length, and `ResultError::InvalidTimeRange` when `completed_at` is
    /// before `started_at`.
    pub fn score(
        questions: &[Question],
        selected: &[Option<usize>],
        mode: TestMode,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
    ) -> Result<Self, ResultError> {
        if questions.is_empty() {
            return Err(ResultError::NoQuestions);
        }
        if questions.len() != selected.len() {
            return Err(ResultError::SelectionMismatch {
                questions: questions.len(),
                selected: selected.len(),
            });
        }
        if completed_at < started_at {
            return Err(ResultError::InvalidTimeRange);
        }

        let mut correct_count = 0_u32;
        let mut theme_breakdown: BTreeMap<String, ThemeScore> = BTreeMap::new();
        for (question, picked) in questions.iter().zip(selected) {
            let correct = picked.is_some_and(|option| question.is_correct(option));
            if correct {
                correct_count += 1;
            }
            theme_breakdown
                .entry(question.theme().to_owned())
                .or_default()
                .count(correct);
        }

        let total = u32::try_from(questions.len()).unwrap_or(u32::MAX);
        let time_spent_seconds =
            u32::try_from((completed_at - started_at).num_seconds()).unwrap_or(u32::MAX);

        Ok(Self {
            correct_count,
            total,
            percentage: percentage_of(correct_count, total),
            passed: percentage_of(correct_count, total) >= PASS_MARK_PERCENT,
            time_spent_seconds,
            theme_breakdown,
            mode,
            date: completed_at,
        })
    }

    /// Rehydrate a result from persisted storage.
    ///
    /// Percentage and pass flag are recomputed rather than trusted.
    ///
    /// # Errors
    ///
    /// Returns `ResultError::NoQuestions` for a zero total and
    /// `ResultError::CountMismatch` when `correct_count` exceeds `total`.
    pub fn from_persisted(
        correct_count: u32,
        total: u32,
        time_spent_seconds: u32,
        theme_breakdown: BTreeMap<String, ThemeScore>,
        mode: TestMode,
        date: DateTime<Utc>,
    ) -> Result<Self, ResultError> {
        if total == 0 {
            return Err(ResultError::NoQuestions);
        }
        if correct_count > total {
            return Err(ResultError::CountMismatch {
                correct: correct_count,
                total,
            });
        }

        Ok(Self {
            correct_count,
            total,
            percentage: percentage_of(correct_count, total),
            passed: percentage_of(correct_count, total) >= PASS_MARK_PERCENT,
            time_spent_seconds,
            theme_breakdown,
            mode,
            date,
        })
    }

    #[must_use]
    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn percentage(&self) -> u8 {
        self.percentage
    }

    #[must_use]
    pub fn passed(&self) -> bool {
        self.passed
    }

    #[must_use]
    pub fn time_spent_seconds(&self) -> u32 {
        self.time_spent_seconds
    }

    #[must_use]
    pub fn theme_breakdown(&self) -> &BTreeMap<String, ThemeScore> {
        &self.theme_breakdown
    }

    #[must_use]
    pub fn mode(&self) -> TestMode {
        self.mode
    }

    #[must_use]
    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }
}

fn percentage_of(correct: u32, total: u32) -> u8 {
    if total == 0 {
        return 0;
    }
    let pct = (f64::from(correct) / f64::from(total) * 100.0).round();
    pct as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;
    use chrono::Duration;

    fn build_question(theme: &str, correct: usize) -> Question {
        Question::new(
            theme,
            "Q",
            vec!["a".into(), "b".into(), "c".into()],
            correct,
            "because",
        )
        .unwrap()
    }

    #[test]
    fn scores_answers_counting_unanswered_as_wrong() {
        let questions = vec![
            build_question("A", 0),
            build_question("A", 1),
            build_question("B", 2),
        ];
        let selected = vec![Some(0), Some(2), None];

        let now = fixed_now();
        let result = TestResult::score(
            &questions,
            &selected,
            TestMode::Practice,
            now,
            now + Duration::seconds(90),
        )
        .unwrap();

        assert_eq!(result.correct_count(), 1);
        assert_eq!(result.total(), 3);
        assert_eq!(result.percentage(), 33);
        assert!(!result.passed());
        assert_eq!(result.time_spent_seconds(), 90);

        let a = result.theme_breakdown().get("A").unwrap();
        assert_eq!((a.correct, a.total), (1, 2));
        let b = result.theme_breakdown().get("B").unwrap();
        assert_eq!((b.correct, b.total), (0, 1));
    }

    #[test]
    fn mock_example_from_the_exam_rules() {
        // 40 questions, 25 correct, rest blank: 63%, passed.
        let questions: Vec<Question> = (0..40).map(|_| build_question("A", 0)).collect();
        let mut selected = vec![None; 40];
        for slot in selected.iter_mut().take(25) {
            *slot = Some(0);
        }

        let now = fixed_now();
        let result =
            TestResult::score(&questions, &selected, TestMode::Mock, now, now).unwrap();

        assert_eq!(result.correct_count(), 25);
        assert_eq!(result.percentage(), 63);
        assert!(result.passed());
    }

    #[test]
    fn pass_is_exactly_at_half() {
        let questions: Vec<Question> = (0..2).map(|_| build_question("A", 0)).collect();
        let now = fixed_now();

        let pass =
            TestResult::score(&questions, &[Some(0), None], TestMode::Mock, now, now).unwrap();
        assert_eq!(pass.percentage(), 50);
        assert!(pass.passed());

        let fail = TestResult::score(&questions, &[None, None], TestMode::Mock, now, now).unwrap();
        assert!(!fail.passed());
    }

    #[test]
    fn wrong_option_index_is_just_incorrect() {
        let questions = vec![build_question("A", 0)];
        let now = fixed_now();
        let result =
            TestResult::score(&questions, &[Some(9)], TestMode::Practice, now, now).unwrap();
        assert_eq!(result.correct_count(), 0);
    }

    #[test]
    fn rejects_bad_inputs() {
        let questions = vec![build_question("A", 0)];
        let now = fixed_now();

        assert_eq!(
            TestResult::score(&[], &[], TestMode::Mock, now, now).unwrap_err(),
            ResultError::NoQuestions
        );
        assert_eq!(
            TestResult::score(&questions, &[], TestMode::Mock, now, now).unwrap_err(),
            ResultError::SelectionMismatch {
                questions: 1,
                selected: 0
            }
        );
        assert_eq!(
            TestResult::score(
                &questions,
                &[None],
                TestMode::Mock,
                now,
                now - Duration::seconds(1)
            )
            .unwrap_err(),
            ResultError::InvalidTimeRange
        );
    }

    #[test]
    fn from_persisted_recomputes_derived_fields() {
        let result = TestResult::from_persisted(
            3,
            4,
            120,
            BTreeMap::new(),
            TestMode::Theme,
            fixed_now(),
        )
        .unwrap();
        assert_eq!(result.percentage(), 75);
        assert!(result.passed());

        assert_eq!(
            TestResult::from_persisted(5, 4, 0, BTreeMap::new(), TestMode::Mock, fixed_now())
                .unwrap_err(),
            ResultError::CountMismatch {
                correct: 5,
                total: 4
            }
        );
    }
}
