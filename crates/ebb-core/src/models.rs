//! Data models for ebb
//!
//! Defines the core data structures: User, Category, VocabItem, and the
//! Proficiency and Translation value types. Dates that drive review
//! scheduling are calendar dates with no time-of-day component.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::merge::{merge_definitions_with_threshold, DEFAULT_SIMILARITY_THRESHOLD};

/// Review offsets installed for every new user, in days.
///
/// These are the classic Ebbinghaus forgetting-curve intervals.
pub const DEFAULT_REVIEW_OFFSETS: [u32; 9] = [1, 2, 4, 7, 15, 30, 90, 180, 365];

/// Name of the category every user starts with.
///
/// The default category cannot be renamed or deleted.
pub const DEFAULT_CATEGORY_NAME: &str = "words";

/// An account that owns categories, items, and a review schedule
///
/// Users exist purely for data scoping; ebb performs no authentication.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    /// Unique identifier
    pub id: Uuid,
    /// Login-free display name, unique across the store
    pub name: String,
    /// When this user was registered
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            created_at: Utc::now(),
        }
    }
}

/// A named grouping for vocabulary items, scoped to a user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    /// Unique identifier
    pub id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    /// Category name, unique per user
    pub name: String,
    /// Display order; lower numbers appear first
    pub sort_order: i64,
    /// Whether this is the user's default category
    pub is_default: bool,
}

impl Category {
    /// Create a new category for a user
    pub fn new(user_id: Uuid, name: impl Into<String>, sort_order: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            name: name.into(),
            sort_order,
            is_default: false,
        }
    }

    /// Create the default category installed at registration
    pub fn new_default(user_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            name: DEFAULT_CATEGORY_NAME.to_string(),
            sort_order: 1,
            is_default: true,
        }
    }
}

/// How well the user knows an item
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Proficiency {
    /// Not yet mastered (the starting state)
    #[default]
    Unfamiliar,
    /// Marked as mastered during review
    Mastered,
}

impl Proficiency {
    /// Integer form used in the database
    pub fn as_i64(self) -> i64 {
        match self {
            Proficiency::Unfamiliar => 0,
            Proficiency::Mastered => 1,
        }
    }

    /// Parse the integer form; unknown values fall back to Unfamiliar
    pub fn from_i64(value: i64) -> Self {
        match value {
            1 => Proficiency::Mastered,
            _ => Proficiency::Unfamiliar,
        }
    }
}

impl std::fmt::Display for Proficiency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Proficiency::Unfamiliar => write!(f, "unfamiliar"),
            Proficiency::Mastered => write!(f, "mastered"),
        }
    }
}

/// A word or phrase being learned
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VocabItem {
    /// Unique identifier
    pub id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    /// The word or phrase itself
    pub term: String,
    /// Definition blob; newline-separated lines, merged by the definition merger
    pub content: String,
    /// Category this item belongs to
    pub category_id: Uuid,
    /// When the item was entered
    pub input_date: NaiveDate,
    /// Initial learning date; drives review scheduling
    pub init_date: NaiveDate,
    /// Mastery state
    pub proficiency: Proficiency,
    /// Pronunciation audio URL, if a dictionary lookup supplied one
    pub tts_url: Option<String>,
    /// American phonetic transcription
    pub us_phonetic: Option<String>,
    /// British phonetic transcription
    pub uk_phonetic: Option<String>,
    /// When this item was created
    pub created_at: DateTime<Utc>,
    /// When this item was last updated
    pub updated_at: DateTime<Utc>,
}

impl VocabItem {
    /// Create a new item entered on the given date
    ///
    /// The initial learning date starts equal to the input date.
    pub fn new(
        user_id: Uuid,
        term: impl Into<String>,
        category_id: Uuid,
        input_date: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            term: term.into(),
            content: String::new(),
            category_id,
            input_date,
            init_date: input_date,
            proficiency: Proficiency::Unfamiliar,
            tts_url: None,
            us_phonetic: None,
            uk_phonetic: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the definition content
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.updated_at = Utc::now();
    }

    /// Update the mastery state
    pub fn set_proficiency(&mut self, proficiency: Proficiency) {
        self.proficiency = proficiency;
        self.updated_at = Utc::now();
    }

    /// Restart the review schedule from the given date
    ///
    /// Resets the initial learning date and drops the item back to
    /// Unfamiliar.
    pub fn reset(&mut self, today: NaiveDate) {
        self.init_date = today;
        self.proficiency = Proficiency::Unfamiliar;
        self.updated_at = Utc::now();
    }

    /// Fold a fetched dictionary translation into this item
    ///
    /// Definition lines are merged through the definition merger so that
    /// repeated lookups never accumulate near-duplicate lines. Phonetic
    /// and TTS fields are only overwritten when the translation carries
    /// a value.
    pub fn apply_translation(&mut self, translation: &Translation) {
        let fetched = translation.lines.join("\n");
        let merged =
            merge_definitions_with_threshold(&self.content, &fetched, DEFAULT_SIMILARITY_THRESHOLD);
        self.content = merged;

        if translation.uk_phonetic.is_some() {
            self.uk_phonetic = translation.uk_phonetic.clone();
        }
        if translation.us_phonetic.is_some() {
            self.us_phonetic = translation.us_phonetic.clone();
        }
        if translation.tts_url.is_some() {
            self.tts_url = translation.tts_url.clone();
        }
        self.updated_at = Utc::now();
    }
}

/// A dictionary lookup result ready to be applied to an item
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Translation {
    /// British phonetic transcription
    pub uk_phonetic: Option<String>,
    /// American phonetic transcription
    pub us_phonetic: Option<String>,
    /// Pronunciation audio URL
    pub tts_url: Option<String>,
    /// Definition lines, one per sense
    pub lines: Vec<String>,
}

impl Translation {
    /// True when the lookup produced no usable definition lines
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_item_new() {
        let user = Uuid::new_v4();
        let category = Uuid::new_v4();
        let item = VocabItem::new(user, "run", category, date(2024, 3, 10));

        assert_eq!(item.term, "run");
        assert_eq!(item.input_date, item.init_date);
        assert_eq!(item.proficiency, Proficiency::Unfamiliar);
        assert!(item.content.is_empty());
        assert!(item.tts_url.is_none());
    }

    #[test]
    fn test_item_reset() {
        let user = Uuid::new_v4();
        let category = Uuid::new_v4();
        let mut item = VocabItem::new(user, "run", category, date(2024, 3, 1));
        item.set_proficiency(Proficiency::Mastered);

        item.reset(date(2024, 4, 2));
        assert_eq!(item.init_date, date(2024, 4, 2));
        assert_eq!(item.proficiency, Proficiency::Unfamiliar);
        // Input date records the original entry and is untouched by a reset
        assert_eq!(item.input_date, date(2024, 3, 1));
    }

    #[test]
    fn test_apply_translation_merges_content() {
        let user = Uuid::new_v4();
        let category = Uuid::new_v4();
        let mut item = VocabItem::new(user, "cat", category, date(2024, 3, 10));
        item.set_content("cat: a small domesticated feline");

        let translation = Translation {
            uk_phonetic: Some("kæt".to_string()),
            us_phonetic: Some("kæt".to_string()),
            tts_url: None,
            lines: vec![
                "cat: a small domesticated feline.".to_string(),
                "n. a wild animal of the cat family".to_string(),
            ],
        };
        item.apply_translation(&translation);

        // Near-duplicate line dropped, genuinely new line appended
        assert_eq!(
            item.content,
            "cat: a small domesticated feline\nn. a wild animal of the cat family"
        );
        assert_eq!(item.uk_phonetic.as_deref(), Some("kæt"));
    }

    #[test]
    fn test_apply_translation_keeps_existing_phonetics() {
        let user = Uuid::new_v4();
        let category = Uuid::new_v4();
        let mut item = VocabItem::new(user, "cat", category, date(2024, 3, 10));
        item.us_phonetic = Some("old".to_string());

        item.apply_translation(&Translation::default());
        assert_eq!(item.us_phonetic.as_deref(), Some("old"));
    }

    #[test]
    fn test_proficiency_roundtrip() {
        assert_eq!(Proficiency::from_i64(Proficiency::Mastered.as_i64()), Proficiency::Mastered);
        assert_eq!(
            Proficiency::from_i64(Proficiency::Unfamiliar.as_i64()),
            Proficiency::Unfamiliar
        );
        // Unknown values degrade to the starting state
        assert_eq!(Proficiency::from_i64(42), Proficiency::Unfamiliar);
    }

    #[test]
    fn test_category_default() {
        let user = Uuid::new_v4();
        let category = Category::new_default(user);
        assert!(category.is_default);
        assert_eq!(category.name, DEFAULT_CATEGORY_NAME);
        assert_eq!(category.sort_order, 1);
    }

    #[test]
    fn test_item_serialization() {
        let user = Uuid::new_v4();
        let category = Uuid::new_v4();
        let mut item = VocabItem::new(user, "serendipity", category, date(2024, 3, 10));
        item.set_content("n. a fortunate accident");

        let json = serde_json::to_string(&item).unwrap();
        let deserialized: VocabItem = serde_json::from_str(&json).unwrap();
        assert_eq!(item, deserialized);
    }
}
