//! Test Data Factory
//!
//! Provides utilities for generating realistic test data:
//! - Vocabulary entries across categories
//! - Batch generation for stress testing
//! - Pre-built scenarios for common test cases

use chrono::{Days, NaiveDate};
use lexicon_core::{Category, NewEntry, Storage, VocabularyEntry};

/// Factory for creating test data
///
/// # Example
///
/// ```rust,ignore
/// let storage = Storage::new(Some(path))?;
///
/// let entry = TestDataFactory::create_entry(&storage, "falar", "sprechen", today);
/// let batch = TestDataFactory::create_batch(&storage, &BatchConfig::default(), today);
/// ```
pub struct TestDataFactory;

/// Configuration for batch entry generation
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Number of entries to create
    pub count: usize,
    /// Category to use (None = rotate through all)
    pub category: Option<Category>,
    /// Base word prefix
    pub word_prefix: String,
    /// Tags to apply
    pub tags: Vec<String>,
    /// Spread due dates this many days into the past, one per entry
    pub overdue_spread: u64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            count: 10,
            category: None,
            word_prefix: "palavra".to_string(),
            tags: vec![],
            overdue_spread: 0,
        }
    }
}

const CATEGORIES: [Category; 3] = [Category::Verbs, Category::Nouns, Category::Adjectives];

/// Small Portuguese-German starter deck
pub const BASICS: &[(&str, &str, &str, Category)] = &[
    ("falar", "sprechen", "Eu falo português.", Category::Verbs),
    ("comer", "essen", "Nós comemos pão.", Category::Verbs),
    ("beber", "trinken", "Ela bebe café.", Category::Verbs),
    ("casa", "Haus", "A casa é grande.", Category::Nouns),
    ("livro", "Buch", "O livro é novo.", Category::Nouns),
    ("bonito", "schön", "O dia está bonito.", Category::Adjectives),
];

impl TestDataFactory {
    /// Create one entry due on `due`
    pub fn create_entry(storage: &Storage, pt: &str, de: &str, due: NaiveDate) -> VocabularyEntry {
        storage
            .add_entry(NewEntry::new(pt, de, "").due_on(due))
            .expect("Failed to create entry")
    }

    /// Create a batch of entries
    pub fn create_batch(storage: &Storage, config: &BatchConfig, today: NaiveDate) -> Vec<VocabularyEntry> {
        (0..config.count)
            .map(|i| {
                let category = config.category.unwrap_or(CATEGORIES[i % CATEGORIES.len()]);
                let back = if config.overdue_spread == 0 {
                    0
                } else {
                    i as u64 % (config.overdue_spread + 1)
                };
                let input = NewEntry::new(
                    format!("{}-{}", config.word_prefix, i),
                    format!("wort-{}", i),
                    format!("Exemplo {}", i),
                )
                .with_category(category)
                .with_tags(config.tags.clone())
                .due_on(today - Days::new(back));
                storage.add_entry(input).expect("Failed to create entry")
            })
            .collect()
    }

    /// Seed the starter deck, all due `today`
    pub fn seed_basics(storage: &Storage, today: NaiveDate) -> Vec<VocabularyEntry> {
        BASICS
            .iter()
            .map(|(pt, de, example, category)| {
                storage
                    .add_entry(
                        NewEntry::new(*pt, *de, *example)
                            .with_category(*category)
                            .due_on(today),
                    )
                    .expect("Failed to seed entry")
            })
            .collect()
    }

    /// Three entries: overdue, due today, due tomorrow (in that order)
    pub fn create_due_scenario(storage: &Storage, today: NaiveDate) -> [VocabularyEntry; 3] {
        [
            Self::create_entry(storage, "ontem", "gestern", today - Days::new(3)),
            Self::create_entry(storage, "hoje", "heute", today),
            Self::create_entry(storage, "amanhã", "morgen", today + Days::new(1)),
        ]
    }
}
