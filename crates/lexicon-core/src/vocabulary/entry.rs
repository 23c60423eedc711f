//! Vocabulary Entry - the unit being scheduled
//!
//! Each entry carries:
//! - A Portuguese word and its German translation
//! - An example sentence and optional notes/pronunciation/tags
//! - Its SM-2 scheduling state

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::sm2::SchedulingState;

// ============================================================================
// CATEGORY
// ============================================================================

/// Part of speech used to group entries
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Verbs,
    Nouns,
    Adjectives,
}

impl Category {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Verbs => "verbs",
            Category::Nouns => "nouns",
            Category::Adjectives => "adjectives",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "verbs" | "verb" => Ok(Category::Verbs),
            "nouns" | "noun" => Ok(Category::Nouns),
            "adjectives" | "adjective" => Ok(Category::Adjectives),
            _ => Err(format!("Unknown category: {}", s)),
        }
    }
}

// ============================================================================
// ENTRY
// ============================================================================

/// A stored vocabulary entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyEntry {
    /// Unique identifier (UUID v4)
    pub id: String,
    pub word_pt: String,
    pub word_de: String,
    /// Example sentence using the word
    pub example: String,
    /// Difficulty level assigned by the author
    pub level: i32,
    pub category: Category,
    pub notes: Option<String>,
    pub pronunciation: Option<String>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    /// SM-2 state; mutated only through the scheduler
    pub scheduling: SchedulingState,
}

/// Input for creating a new entry
#[non_exhaustive]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEntry {
    pub word_pt: String,
    pub word_de: String,
    pub example: String,
    pub level: i32,
    pub category: Category,
    pub notes: Option<String>,
    pub pronunciation: Option<String>,
    pub tags: Vec<String>,
    /// First due day; defaults to the creation day
    pub due: Option<NaiveDate>,
}

impl NewEntry {
    pub fn new(
        word_pt: impl Into<String>,
        word_de: impl Into<String>,
        example: impl Into<String>,
    ) -> Self {
        Self {
            word_pt: word_pt.into(),
            word_de: word_de.into(),
            example: example.into(),
            level: 1,
            ..Default::default()
        }
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn due_on(mut self, due: NaiveDate) -> Self {
        self.due = Some(due);
        self
    }
}

/// Content changes to an existing entry; `None` keeps the current value.
///
/// Scheduling state is not editable here.
#[non_exhaustive]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EntryUpdate {
    pub word_pt: Option<String>,
    pub word_de: Option<String>,
    pub example: Option<String>,
    pub level: Option<i32>,
    pub category: Option<Category>,
    /// An empty string clears the notes
    pub notes: Option<String>,
    /// An empty string clears the pronunciation
    pub pronunciation: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl EntryUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merge into `entry`, leaving id, creation time and scheduling untouched
    pub fn apply_to(self, mut entry: VocabularyEntry) -> VocabularyEntry {
        fn clearable(value: String) -> Option<String> {
            (!value.is_empty()).then_some(value)
        }

        if let Some(word_pt) = self.word_pt {
            entry.word_pt = word_pt;
        }
        if let Some(word_de) = self.word_de {
            entry.word_de = word_de;
        }
        if let Some(example) = self.example {
            entry.example = example;
        }
        if let Some(level) = self.level {
            entry.level = level;
        }
        if let Some(category) = self.category {
            entry.category = category;
        }
        if let Some(notes) = self.notes {
            entry.notes = clearable(notes);
        }
        if let Some(pronunciation) = self.pronunciation {
            entry.pronunciation = clearable(pronunciation);
        }
        if let Some(tags) = self.tags {
            entry.tags = tags;
        }
        entry
    }
}

// ============================================================================
// SEARCH
// ============================================================================

/// Text column(s) a search matches against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchField {
    /// Portuguese or German word
    #[default]
    Word,
    WordPt,
    WordDe,
    Example,
}

impl SearchField {
    pub(crate) fn columns(&self) -> &'static [&'static str] {
        match self {
            SearchField::Word => &["word_pt", "word_de"],
            SearchField::WordPt => &["word_pt"],
            SearchField::WordDe => &["word_de"],
            SearchField::Example => &["example"],
        }
    }
}

impl std::str::FromStr for SearchField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "word" | "any" => Ok(SearchField::Word),
            "pt" | "word_pt" => Ok(SearchField::WordPt),
            "de" | "word_de" => Ok(SearchField::WordDe),
            "example" => Ok(SearchField::Example),
            _ => Err(format!(
                "Unknown search field: {}. Valid values are word, pt, de, example",
                s
            )),
        }
    }
}
