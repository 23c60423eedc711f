//! Journey: state survives closing and reopening the database

use chrono::NaiveDate;
use lexicon_core::{Category, EntryUpdate, NewEntry, SchedulingState, SearchField, VocabularyStore};
use lexicon_e2e_tests::harness::TestDatabaseManager;
use lexicon_e2e_tests::mocks::TestDataFactory;

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 20).unwrap()
}

#[test]
fn test_reviews_visible_after_reopen() {
    let db = TestDatabaseManager::new_temp(start());
    let entry = TestDataFactory::create_entry(db.storage(), "falar", "sprechen", start());
    let outcome = db.service.record_review(&entry.id, 5, Some("easy")).unwrap();

    let reopened = db.reopen();
    assert_eq!(reopened.load(&entry.id).unwrap(), outcome.state);
    let history = reopened.get_review_history(&entry.id).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].notes.as_deref(), Some("easy"));
}

#[test]
fn test_new_entries_load_as_never_reviewed() {
    let db = TestDatabaseManager::new_temp(start());
    assert!(db.is_empty());

    let entry = db
        .storage()
        .add_entry(
            NewEntry::new("bonito", "schön", "O dia está bonito.")
                .with_category(Category::Adjectives)
                .with_tags(vec!["a1".into()])
                .due_on(start()),
        )
        .unwrap();
    assert_eq!(db.entry_count(), 1);

    let reopened = db.reopen();
    assert_eq!(reopened.load(&entry.id).unwrap(), SchedulingState::new(start()));
    let stored = reopened.get_entry(&entry.id).unwrap().unwrap();
    assert_eq!(stored.category, Category::Adjectives);
    assert_eq!(stored.tags, vec!["a1"]);
}

#[test]
fn test_session_survives_reopen() {
    let db = TestDatabaseManager::new_temp(start());
    TestDataFactory::seed_basics(db.storage(), start());
    let session = db.service.start_session(Some(3), None).unwrap();
    db.service
        .rate_in_session(&session.id, &session.entries[0].entry_id, 4)
        .unwrap();

    let reopened = db.reopen();
    let stored = reopened.get_session(&session.id).unwrap().unwrap();
    assert_eq!(stored.total_entries, 3);
    assert_eq!(stored.completed_entries, 1);
    assert!(stored.entries[0].reviewed);
    assert_eq!(stored.entries[0].quality_rating, Some(4));
}

#[test]
fn test_entry_serializes_camel_case() {
    let db = TestDatabaseManager::new_temp(start());
    let entry = TestDataFactory::create_entry(db.storage(), "falar", "sprechen", start());
    let json = serde_json::to_value(&entry).unwrap();
    assert_eq!(json["wordPt"], "falar");
    assert_eq!(json["scheduling"]["nextReviewDate"], "2025-01-20");
    assert!(json["scheduling"]["easeFactor"].is_null());
}

#[test]
fn test_edit_and_search_survive_reopen() {
    let db = TestDatabaseManager::new_temp(start());
    TestDataFactory::seed_basics(db.storage(), start());
    let livro = db
        .storage()
        .search("LIVRO", SearchField::WordPt, 10)
        .unwrap()
        .remove(0);

    let reviewed = db.service.record_review(&livro.id, 5, None).unwrap();

    let mut update = EntryUpdate::new();
    update.word_de = Some("das Buch".to_string());
    update.pronunciation = Some("LEE-vroo".to_string());
    db.storage().update_entry(&livro.id, update).unwrap();

    let reopened = db.reopen();
    let found = reopened.search("buch", SearchField::WordDe, 10).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, livro.id);
    assert_eq!(found[0].word_de, "das Buch");
    assert_eq!(found[0].pronunciation.as_deref(), Some("LEE-vroo"));
    assert_eq!(found[0].scheduling, reviewed.state);

    let by_example = reopened.search("café", SearchField::Example, 10).unwrap();
    assert_eq!(by_example.len(), 1);
    assert_eq!(by_example[0].word_pt, "beber");
}
