//! Forgetting-curve review matching
//!
//! Decides which items are due for review on a given date. For each
//! configured offset `d`, an item is due when its initial learning date
//! is exactly `review_date - d` days. There is no tolerance window: an
//! item missed on its literal review day is not flagged again under that
//! offset.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::{Category, VocabItem};

/// One due item together with the offset that matched it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DueEntry {
    /// The offset (in days) under which the item matched
    pub offset: u32,
    /// The matched item
    pub item: VocabItem,
}

/// The due items for a single category
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryReview {
    /// The category; present even when nothing is due in it
    pub category: Category,
    /// Due entries, ordered by offset as supplied, then item order
    pub due: Vec<DueEntry>,
}

impl CategoryReview {
    /// Number of due entries in this category
    pub fn len(&self) -> usize {
        self.due.len()
    }

    /// True when nothing is due in this category
    pub fn is_empty(&self) -> bool {
        self.due.is_empty()
    }
}

/// Match items due for review on `review_date`.
///
/// Every supplied category appears in the output, in `(sort_order, name)`
/// order, with an empty due list when nothing matched. Within a category,
/// entries follow the order the offsets were supplied, then the order the
/// items were supplied. The result is deterministic for a fixed input.
///
/// Items whose category is not among `categories` are ignored.
pub fn match_due_items(
    review_date: NaiveDate,
    offsets: &[u32],
    items: &[VocabItem],
    categories: &[Category],
) -> Vec<CategoryReview> {
    let mut board: Vec<CategoryReview> = {
        let mut sorted: Vec<&Category> = categories.iter().collect();
        sorted.sort_by(|a, b| {
            a.sort_order
                .cmp(&b.sort_order)
                .then_with(|| a.name.cmp(&b.name))
        });
        sorted
            .into_iter()
            .map(|category| CategoryReview {
                category: category.clone(),
                due: Vec::new(),
            })
            .collect()
    };

    for &offset in offsets {
        // Dates before the representable range cannot match anything.
        let Some(check_date) = review_date.checked_sub_days(Days::new(u64::from(offset))) else {
            continue;
        };
        for item in items.iter().filter(|item| item.init_date == check_date) {
            if let Some(group) = board
                .iter_mut()
                .find(|group| group.category.id == item.category_id)
            {
                group.due.push(DueEntry {
                    offset,
                    item: item.clone(),
                });
            }
        }
    }

    board
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Proficiency;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn category(user: Uuid, name: &str, sort_order: i64) -> Category {
        Category::new(user, name, sort_order)
    }

    fn item(user: Uuid, term: &str, category: &Category, init: NaiveDate) -> VocabItem {
        VocabItem::new(user, term, category.id, init)
    }

    #[test]
    fn test_exact_day_match() {
        let user = Uuid::new_v4();
        let words = category(user, "words", 1);
        let items = vec![item(user, "cat", &words, date(2024, 3, 9))];
        let categories = vec![words];

        let board = match_due_items(date(2024, 3, 10), &[1, 7], &items, &categories);
        assert_eq!(board.len(), 1);
        assert_eq!(board[0].due.len(), 1);
        assert_eq!(board[0].due[0].offset, 1);
        assert_eq!(board[0].due[0].item.term, "cat");
    }

    #[test]
    fn test_matches_later_offset_only() {
        let user = Uuid::new_v4();
        let words = category(user, "words", 1);
        let items = vec![item(user, "cat", &words, date(2024, 3, 3))];
        let categories = vec![words];

        let board = match_due_items(date(2024, 3, 10), &[1, 7], &items, &categories);
        assert_eq!(board[0].due.len(), 1);
        assert_eq!(board[0].due[0].offset, 7);
    }

    #[test]
    fn test_off_by_one_never_matches() {
        let user = Uuid::new_v4();
        let words = category(user, "words", 1);
        let items = vec![
            item(user, "early", &words, date(2024, 3, 8)),
            item(user, "late", &words, date(2024, 3, 10)),
        ];
        let categories = vec![words];

        let board = match_due_items(date(2024, 3, 10), &[1], &items, &categories);
        assert!(board[0].is_empty());
    }

    #[test]
    fn test_empty_categories_present() {
        let user = Uuid::new_v4();
        let words = category(user, "words", 1);
        let phrases = category(user, "phrases", 2);
        let items = vec![item(user, "cat", &words, date(2024, 3, 9))];
        let categories = vec![words, phrases];

        let board = match_due_items(date(2024, 3, 10), &[1], &items, &categories);
        assert_eq!(board.len(), 2);
        assert_eq!(board[1].category.name, "phrases");
        assert!(board[1].is_empty());
    }

    #[test]
    fn test_categories_ordered_by_sort_order_then_name() {
        let user = Uuid::new_v4();
        let categories = vec![
            category(user, "zeta", 2),
            category(user, "alpha", 2),
            category(user, "first", 1),
        ];

        let board = match_due_items(date(2024, 3, 10), &[1], &[], &categories);
        let names: Vec<&str> = board.iter().map(|g| g.category.name.as_str()).collect();
        assert_eq!(names, vec!["first", "alpha", "zeta"]);
    }

    #[test]
    fn test_offset_order_then_item_order() {
        let user = Uuid::new_v4();
        let words = category(user, "words", 1);
        let items = vec![
            item(user, "week-old-a", &words, date(2024, 3, 3)),
            item(user, "yesterday", &words, date(2024, 3, 9)),
            item(user, "week-old-b", &words, date(2024, 3, 3)),
        ];
        let categories = vec![words];

        let board = match_due_items(date(2024, 3, 10), &[1, 7], &items, &categories);
        let terms: Vec<&str> = board[0].due.iter().map(|e| e.item.term.as_str()).collect();
        assert_eq!(terms, vec!["yesterday", "week-old-a", "week-old-b"]);
    }

    #[test]
    fn test_deterministic() {
        let user = Uuid::new_v4();
        let words = category(user, "words", 1);
        let phrases = category(user, "phrases", 2);
        let items = vec![
            item(user, "a", &words, date(2024, 3, 9)),
            item(user, "b", &phrases, date(2024, 3, 3)),
        ];
        let categories = vec![words, phrases];

        let first = match_due_items(date(2024, 3, 10), &[1, 7], &items, &categories);
        let second = match_due_items(date(2024, 3, 10), &[1, 7], &items, &categories);
        assert_eq!(first, second);
    }

    #[test]
    fn test_review_date_before_all_items() {
        let user = Uuid::new_v4();
        let words = category(user, "words", 1);
        let items = vec![item(user, "cat", &words, date(2024, 3, 9))];
        let categories = vec![words];

        let board = match_due_items(date(2020, 1, 1), &[1, 7, 365], &items, &categories);
        assert!(board[0].is_empty());
    }

    #[test]
    fn test_proficiency_does_not_affect_matching() {
        // Mastered items still show up; the caller decides how to render them
        let user = Uuid::new_v4();
        let words = category(user, "words", 1);
        let mut mastered = item(user, "cat", &words, date(2024, 3, 9));
        mastered.set_proficiency(Proficiency::Mastered);
        let categories = vec![words];

        let board = match_due_items(date(2024, 3, 10), &[1], &[mastered], &categories);
        assert_eq!(board[0].due.len(), 1);
    }
}
