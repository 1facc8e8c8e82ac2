//! End-to-end flow: start a mock exam, answer, submit, review mistakes,
//! and accrue practice time, with everything persisted through the
//! file-backed store.

use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tempfile::TempDir;

use quiz_core::model::{DAILY_GOAL_SECONDS, Question, QuestionBank, TestMode};
use quiz_core::time::fixed_clock;
use services::{PracticeTracker, QuizService, SessionError, StatsService, TimerEvent};
use storage::JsonFileStore;

fn build_bank() -> QuestionBank {
    let themes = ["Safety", "Communication", "Problem solving", "Digital content"];
    let questions = (0..60)
        .map(|i| {
            Question::new(
                themes[i % themes.len()],
                format!("Question {i}"),
                vec!["a".into(), "b".into(), "c".into(), "d".into()],
                i % 4,
                format!("Explanation {i}"),
            )
            .unwrap()
        })
        .collect();
    QuestionBank::new(questions)
}

#[test]
fn mock_exam_scores_and_persists() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(JsonFileStore::create(dir.path()).unwrap());

    let mut service = QuizService::new(build_bank(), StatsService::load(store.clone()))
        .with_clock(fixed_clock());
    let mut rng = StdRng::seed_from_u64(11);
    service.start_with_rng(TestMode::Mock, &mut rng).unwrap();

    // Answer 25 correctly, leave 15 blank.
    {
        let session = service.session_mut().unwrap();
        assert_eq!(session.questions().len(), 40);
        assert!(session.is_timed());
        for position in 0..25 {
            let correct = session.question(position).unwrap().correct_index();
            session.select_answer(position, correct).unwrap();
        }
    }

    let result = service.submit().unwrap();
    assert_eq!(result.correct_count(), 25);
    assert_eq!(result.total(), 40);
    assert_eq!(result.percentage(), 63);
    assert!(result.passed());

    // The result landed in the persisted history.
    let reloaded = StatsService::load(store);
    assert_eq!(reloaded.stats().total_tests(), 1);
    let summary = reloaded.summary();
    assert_eq!(summary.average_percentage, 63);
    assert_eq!(summary.best.unwrap().correct_count(), 25);
    assert_eq!(summary.pass_rate, 1.0);
}

#[test]
fn review_flow_covers_exactly_the_mistakes() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(JsonFileStore::create(dir.path()).unwrap());

    let mut service = QuizService::new(build_bank(), StatsService::load(store))
        .with_clock(fixed_clock());
    let mut rng = StdRng::seed_from_u64(5);
    service.start_with_rng(TestMode::Practice, &mut rng).unwrap();

    {
        let session = service.session_mut().unwrap();
        for position in 0..session.questions().len() {
            let correct = session.question(position).unwrap().correct_index();
            // Miss every third question.
            let pick = if position % 3 == 0 { (correct + 1) % 4 } else { correct };
            session.select_answer(position, pick).unwrap();
        }
    }
    service.submit().unwrap();

    let review = service.review_incorrect().unwrap();
    assert_eq!(review.questions().len(), 4); // positions 0, 3, 6, 9
    assert!(review.feedback_immediate());
    assert!(!review.is_timed());

    // Acing the review leaves nothing further to redo.
    {
        let session = service.session_mut().unwrap();
        for position in 0..session.questions().len() {
            let correct = session.question(position).unwrap().correct_index();
            session.select_answer(position, correct).unwrap();
        }
    }
    service.submit().unwrap();
    assert_eq!(
        service.review_incorrect().unwrap_err(),
        SessionError::PerfectScore
    );
}

#[test]
fn expired_timer_drives_submission() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(JsonFileStore::create(dir.path()).unwrap());
    let mut service =
        QuizService::new(build_bank(), StatsService::load(store)).with_clock(fixed_clock());
    let mut rng = StdRng::seed_from_u64(2);
    service.start_with_rng(TestMode::Mock, &mut rng).unwrap();

    let session = service.session_mut().unwrap();
    let mut expired = false;
    for _ in 0..1800 {
        match session.tick_timer() {
            TimerEvent::Expired => {
                expired = true;
                break;
            }
            TimerEvent::Warning(remaining) => assert_eq!(remaining, 300),
            TimerEvent::Tick(_) => {}
            TimerEvent::Idle => panic!("timer went idle before expiring"),
        }
    }
    assert!(expired);

    let result = service.submit().unwrap();
    assert_eq!(result.correct_count(), 0);
    // Dangling ticks after submission are inert.
    assert_eq!(service.session_mut().unwrap().tick_timer(), TimerEvent::Idle);
}

#[test]
fn practice_time_accrues_across_midnight_and_streaks() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(JsonFileStore::create(dir.path()).unwrap());

    let day1 = NaiveDate::from_ymd_opt(2026, 7, 1).unwrap();
    let day2 = NaiveDate::from_ymd_opt(2026, 7, 2).unwrap();

    // Evening session on day 1 that runs past midnight.
    let start = day1.and_hms_opt(22, 45, 0).unwrap();
    let mut tracker = PracticeTracker::load(store.clone(), start);
    let outcome = tracker.tick_and_flush(start + Duration::hours(2));

    assert_eq!(outcome.today, day2);
    assert_eq!(tracker.log().seconds_on(day1), 4500);
    assert_eq!(outcome.seconds_today, 2700);
    assert!(!outcome.goal_reached);

    // Day 1 misses the goal, so no streak yet.
    assert_eq!(outcome.streak, 0);

    // Keep going on day 2 until the goal fires, exactly once.
    let goal_tick = tracker.tick_and_flush(
        day2.and_hms_opt(0, 45, 0).unwrap()
            + Duration::seconds(i64::from(DAILY_GOAL_SECONDS - 2700)),
    );
    assert!(goal_tick.goal_reached);
    assert_eq!(goal_tick.streak, 1);

    let after = tracker.tick_and_flush(day2.and_hms_opt(9, 0, 0).unwrap());
    assert!(!after.goal_reached);

    // A fresh tracker sees the persisted buckets and streaks.
    let reloaded = PracticeTracker::load(store, day2.and_hms_opt(10, 0, 0).unwrap());
    assert_eq!(reloaded.log().seconds_on(day1), 4500);
    assert!(reloaded.log().seconds_on(day2) >= DAILY_GOAL_SECONDS);
    assert_eq!(reloaded.log().streak(), 1);
    assert_eq!(reloaded.log().longest_streak(), 1);
}
