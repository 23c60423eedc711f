//! Journey: working through a review session

use chrono::{Days, NaiveDate};
use lexicon_core::{Category, ReviewError, SessionStatus};
use lexicon_e2e_tests::harness::TestDatabaseManager;
use lexicon_e2e_tests::mocks::{BatchConfig, TestDataFactory};

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 7, 8).unwrap()
}

#[test]
fn test_full_session() {
    let db = TestDatabaseManager::new_temp(start());
    TestDataFactory::seed_basics(db.storage(), start());

    let session = db.service.start_session(None, None).unwrap();
    assert_eq!(session.total_entries, 6);
    assert_eq!(session.status, SessionStatus::InProgress);

    let ids: Vec<String> = session.entries.iter().map(|e| e.entry_id.clone()).collect();
    for (i, id) in ids.iter().enumerate() {
        let updated = db
            .service
            .rate_in_session(&session.id, id, if i % 2 == 0 { 5 } else { 2 })
            .unwrap();
        assert_eq!(updated.completed_entries as usize, i + 1);
    }

    let done = db.service.complete_session(&session.id).unwrap();
    assert_eq!(done.status, SessionStatus::Completed);
    assert_eq!(done.completed_entries, 6);
    assert_eq!(done.remaining().count(), 0);

    // Every rated entry moved out of today
    assert!(db.storage().get_due_entries(start(), None).unwrap().is_empty());
    let history = db.service.history_between(start(), start()).unwrap();
    assert_eq!(history.len(), 6);
}

#[test]
fn test_session_by_category_with_limit() {
    let db = TestDatabaseManager::new_temp(start());
    TestDataFactory::create_batch(
        db.storage(),
        &BatchConfig {
            count: 9,
            overdue_spread: 2,
            ..BatchConfig::default()
        },
        start(),
    );

    let nouns = db
        .service
        .start_session(Some(2), Some(Category::Nouns))
        .unwrap();
    assert_eq!(nouns.total_entries, 2);
    for slot in &nouns.entries {
        assert_eq!(db.entry(&slot.entry_id).category, Category::Nouns);
    }
}

#[test]
fn test_session_snapshot_is_fixed() {
    let db = TestDatabaseManager::new_temp(start());
    let first = TestDataFactory::create_entry(db.storage(), "falar", "sprechen", start());
    let session = db.service.start_session(None, None).unwrap();

    // Added after the session started
    let late = TestDataFactory::create_entry(db.storage(), "casa", "Haus", start());
    let err = db.service.rate_in_session(&session.id, &late.id, 4).unwrap_err();
    assert!(matches!(err, ReviewError::NotInSession { .. }));

    db.service.rate_in_session(&session.id, &first.id, 4).unwrap();
}

#[test]
fn test_abandon_and_list() {
    let db = TestDatabaseManager::new_temp(start());
    TestDataFactory::seed_basics(db.storage(), start());

    let a = db.service.start_session(Some(2), None).unwrap();
    let b = db.service.start_session(Some(2), None).unwrap();
    db.service.abandon_session(&a.id).unwrap();

    let open = db.service.sessions_by_status(SessionStatus::InProgress).unwrap();
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].id, b.id);

    let abandoned = db.service.sessions_by_status(SessionStatus::Abandoned).unwrap();
    assert_eq!(abandoned[0].id, a.id);
    assert!(abandoned[0].end_time.is_some());

    let err = db.service.abandon_session(&a.id).unwrap_err();
    assert!(matches!(err, ReviewError::SessionClosed { .. }));
}

#[test]
fn test_history_range_validation() {
    let db = TestDatabaseManager::new_temp(start());
    let err = db
        .service
        .history_between(start(), start() - Days::new(1))
        .unwrap_err();
    assert!(matches!(err, ReviewError::InvalidRange { .. }));
}
