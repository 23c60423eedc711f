//! Journey: a learner reviews words day by day
//!
//! Each review happens on the day the word falls due, so the elapsed and
//! scheduled interval bases agree and canonical SM-2 intervals come out.

use chrono::{Days, NaiveDate};
use lexicon_core::{Config, IntervalBasis, LearningPhase, ReviewError, ReviewPolicy};
use lexicon_e2e_tests::harness::TestDatabaseManager;
use lexicon_e2e_tests::mocks::TestDataFactory;

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 4, 1).unwrap()
}

#[test]
fn test_good_reviews_grow_intervals() {
    let db = TestDatabaseManager::new_temp(start());
    let entry = TestDataFactory::create_entry(db.storage(), "falar", "sprechen", start());

    let first = db.service.record_review(&entry.id, 4, None).unwrap();
    assert_eq!(first.state.next_review_date, start() + Days::new(1));
    assert_eq!(first.state.phase(), LearningPhase::Retained);

    let d1 = db.jump_to_due(&entry.id);
    let second = db.service.record_review(&entry.id, 4, None).unwrap();
    assert_eq!(second.state.next_review_date, d1 + Days::new(6));

    let d2 = db.jump_to_due(&entry.id);
    let third = db.service.record_review(&entry.id, 4, None).unwrap();
    assert_eq!(third.state.ease_factor, Some(2.5));
    assert_eq!(third.state.next_review_date, d2 + Days::new(15));

    let d3 = db.jump_to_due(&entry.id);
    let fourth = db.service.record_review(&entry.id, 5, None).unwrap();
    // 15 * 2.6 = 39
    assert_eq!(fourth.state.next_review_date, d3 + Days::new(39));

    let history = db.storage().get_review_history(&entry.id).unwrap();
    assert_eq!(history.len(), 4);
    assert_eq!(
        history.iter().map(|r| r.repetitions).collect::<Vec<_>>(),
        vec![1, 2, 3, 4]
    );
}

#[test]
fn test_lapse_resets_to_learning() {
    let db = TestDatabaseManager::new_temp(start());
    let entry = TestDataFactory::create_entry(db.storage(), "casa", "Haus", start());

    for _ in 0..3 {
        db.jump_to_due(&entry.id);
        db.service.record_review(&entry.id, 5, None).unwrap();
    }
    let ease_before = db.entry(&entry.id).scheduling.ease_factor;

    let today = db.jump_to_due(&entry.id);
    let lapse = db.service.record_review(&entry.id, 1, Some("forgot")).unwrap();
    assert_eq!(lapse.state.repetitions, Some(0));
    assert_eq!(lapse.state.ease_factor, ease_before);
    assert_eq!(lapse.state.next_review_date, today + Days::new(1));
    assert_eq!(lapse.state.phase(), LearningPhase::Learning);

    // Relearning starts over at 1 then 6 days
    let d = db.jump_to_due(&entry.id);
    let relearn = db.service.record_review(&entry.id, 3, None).unwrap();
    assert_eq!(relearn.state.next_review_date, d + Days::new(1));
}

#[test]
fn test_hard_reviews_bottom_out_at_floor() {
    let db = TestDatabaseManager::new_temp(start());
    let entry = TestDataFactory::create_entry(db.storage(), "difícil", "schwer", start());

    for _ in 0..12 {
        db.jump_to_due(&entry.id);
        let outcome = db.service.record_review(&entry.id, 3, None).unwrap();
        let ef = outcome.state.ease_factor.unwrap();
        assert!(ef >= 1.3);
        assert!(outcome.state.next_review_date > db.service.today());
    }
    assert_eq!(db.entry(&entry.id).scheduling.ease_factor, Some(1.3));
}

#[test]
fn test_due_list_tracks_reviews() {
    let db = TestDatabaseManager::new_temp(start());
    let [overdue, today, tomorrow] = TestDataFactory::create_due_scenario(db.storage(), start());

    let due: Vec<String> = db
        .storage()
        .get_due_entries(start(), None)
        .unwrap()
        .into_iter()
        .map(|e| e.id)
        .collect();
    assert_eq!(due, vec![overdue.id.clone(), today.id.clone()]);

    db.service.record_review(&overdue.id, 4, None).unwrap();
    let due = db.storage().get_due_entries(start(), None).unwrap();
    assert_eq!(due.len(), 1);

    db.clock.advance(1);
    let due: Vec<String> = db
        .storage()
        .get_due_entries(db.service.today(), None)
        .unwrap()
        .into_iter()
        .map(|e| e.id)
        .collect();
    assert!(due.contains(&overdue.id));
    assert!(due.contains(&tomorrow.id));
}

#[test]
fn test_late_review_uses_elapsed_days_by_default() {
    let db = TestDatabaseManager::new_temp(start());
    let entry = TestDataFactory::create_entry(db.storage(), "livro", "Buch", start());

    db.service.record_review(&entry.id, 4, None).unwrap();
    db.jump_to_due(&entry.id);
    db.service.record_review(&entry.id, 4, None).unwrap();

    // Scheduled 6 days out, reviewed after 10
    let today = db.clock.advance(10);
    let outcome = db.service.record_review(&entry.id, 4, None).unwrap();
    assert_eq!(outcome.state.next_review_date, today + Days::new(25));
}

#[test]
fn test_late_review_with_scheduled_basis() {
    let mut config = Config::default();
    config.scheduler.interval_basis = IntervalBasis::Scheduled;
    let db = TestDatabaseManager::new_temp_with_config(start(), &config);
    let entry = TestDataFactory::create_entry(db.storage(), "livro", "Buch", start());

    db.service.record_review(&entry.id, 4, None).unwrap();
    db.jump_to_due(&entry.id);
    db.service.record_review(&entry.id, 4, None).unwrap();

    let today = db.clock.advance(10);
    let outcome = db.service.record_review(&entry.id, 4, None).unwrap();
    assert_eq!(outcome.state.next_review_date, today + Days::new(15));
}

#[test]
fn test_strict_policy_from_config() {
    let config = Config {
        review: ReviewPolicy {
            strict_quality: true,
        },
        ..Config::default()
    };
    let db = TestDatabaseManager::new_temp_with_config(start(), &config);
    let entry = TestDataFactory::create_entry(db.storage(), "falar", "sprechen", start());

    let err = db.service.record_review(&entry.id, 7, None).unwrap_err();
    assert!(matches!(err, ReviewError::InvalidQuality(_)));
    assert!(db.storage().get_review_history(&entry.id).unwrap().is_empty());
}
