//! Unified storage interface
//!
//! The `Store` owns the SQLite connection and exposes every operation the
//! CLI needs: user registration, category management, item CRUD, review
//! offsets, and the review board built from the pure matcher.
//!
//! ## Usage
//!
//! ```ignore
//! let mut store = Store::open()?;
//! let user = store.register_user("aran")?;
//!
//! let item = VocabItem::new(user.id, "serendipity", category.id, today);
//! store.add_item(&item)?;
//!
//! let board = store.due_items(user.id, today)?;
//! ```

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::Config;
use crate::models::{Category, Proficiency, User, VocabItem, DEFAULT_REVIEW_OFFSETS};
use crate::review::{match_due_items, CategoryReview};
use crate::storage::{init_schema, needs_init, StoreError, StoreResult};

/// Storage format for calendar dates
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Unified storage interface for ebb
pub struct Store {
    conn: Connection,
    config: Config,
}

impl Store {
    /// Open the store at the configured location, creating the database
    /// on first run
    pub fn open() -> Result<Self> {
        let config = Config::load().context("Failed to load configuration")?;
        Self::open_with_config(config)
    }

    /// Open the store with a specific configuration
    pub fn open_with_config(config: Config) -> Result<Self> {
        let path = config.sqlite_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {:?}", parent))?;
        }

        let conn = Connection::open(&path)
            .with_context(|| format!("Failed to open SQLite database at {:?}", path))?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        if needs_init(&conn) {
            info!("Initializing database schema at {:?}", path);
            init_schema(&conn).context("Failed to initialize SQLite schema")?;
        }

        Ok(Self { conn, config })
    }

    /// Open an in-memory store (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        init_schema(&conn)?;
        Ok(Self {
            conn,
            config: Config::default(),
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    // ==================== User Operations ====================

    /// Register a new user
    ///
    /// Creates the user, their default category, and the default
    /// forgetting-curve offsets in one transaction.
    pub fn register_user(&mut self, name: &str) -> StoreResult<User> {
        let name = name.trim();
        if self.get_user(name)?.is_some() {
            return Err(StoreError::UserExists(name.to_string()));
        }

        let user = User::new(name);
        let category = Category::new_default(user.id);

        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO users (id, name, created_at) VALUES (?1, ?2, ?3)",
            params![user.id.to_string(), user.name, user.created_at.timestamp()],
        )?;
        tx.execute(
            "INSERT INTO categories (id, user_id, name, sort_order, is_default)
             VALUES (?1, ?2, ?3, ?4, 1)",
            params![
                category.id.to_string(),
                user.id.to_string(),
                category.name,
                category.sort_order
            ],
        )?;
        for days in DEFAULT_REVIEW_OFFSETS {
            tx.execute(
                "INSERT INTO review_offsets (user_id, days) VALUES (?1, ?2)",
                params![user.id.to_string(), days],
            )?;
        }
        tx.commit()?;

        info!("Registered user '{}'", user.name);
        Ok(user)
    }

    /// Get a user by name
    pub fn get_user(&self, name: &str) -> StoreResult<Option<User>> {
        let user = self
            .conn
            .prepare("SELECT id, name, created_at FROM users WHERE name = ?1")?
            .query_row(params![name], user_from_row)
            .optional()?;
        Ok(user)
    }

    /// Get a user by name, failing when absent
    pub fn require_user(&self, name: &str) -> StoreResult<User> {
        self.get_user(name)?
            .ok_or_else(|| StoreError::UnknownUser(name.to_string()))
    }

    /// List all users, ordered by name
    pub fn list_users(&self) -> StoreResult<Vec<User>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, created_at FROM users ORDER BY name")?;
        let users = stmt
            .query_map([], user_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(users)
    }

    // ==================== Category Operations ====================

    /// Add a category for a user
    pub fn add_category(
        &self,
        user_id: Uuid,
        name: &str,
        sort_order: i64,
    ) -> StoreResult<Category> {
        let name = name.trim();
        if self.get_category(user_id, name)?.is_some() {
            return Err(StoreError::DuplicateCategory(name.to_string()));
        }

        let category = Category::new(user_id, name, sort_order);
        self.conn.execute(
            "INSERT INTO categories (id, user_id, name, sort_order, is_default)
             VALUES (?1, ?2, ?3, ?4, 0)",
            params![
                category.id.to_string(),
                user_id.to_string(),
                category.name,
                category.sort_order
            ],
        )?;
        Ok(category)
    }

    /// Get a category by name
    pub fn get_category(&self, user_id: Uuid, name: &str) -> StoreResult<Option<Category>> {
        let category = self
            .conn
            .prepare(
                "SELECT id, user_id, name, sort_order, is_default FROM categories
                 WHERE user_id = ?1 AND name = ?2",
            )?
            .query_row(params![user_id.to_string(), name], category_from_row)
            .optional()?;
        Ok(category)
    }

    /// Get a category by name, failing when absent
    pub fn require_category(&self, user_id: Uuid, name: &str) -> StoreResult<Category> {
        self.get_category(user_id, name)?
            .ok_or_else(|| StoreError::UnknownCategory(name.to_string()))
    }

    /// Get the user's default category
    pub fn default_category(&self, user_id: Uuid) -> StoreResult<Option<Category>> {
        let category = self
            .conn
            .prepare(
                "SELECT id, user_id, name, sort_order, is_default FROM categories
                 WHERE user_id = ?1 AND is_default = 1",
            )?
            .query_row(params![user_id.to_string()], category_from_row)
            .optional()?;
        Ok(category)
    }

    /// List a user's categories in display order
    pub fn list_categories(&self, user_id: Uuid) -> StoreResult<Vec<Category>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, name, sort_order, is_default FROM categories
             WHERE user_id = ?1 ORDER BY sort_order, name",
        )?;
        let categories = stmt
            .query_map(params![user_id.to_string()], category_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(categories)
    }

    /// List a user's categories with their item counts, in display order
    pub fn category_counts(&self, user_id: Uuid) -> StoreResult<Vec<(Category, i64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT c.id, c.user_id, c.name, c.sort_order, c.is_default, COUNT(i.id)
             FROM categories c
             LEFT JOIN items i ON i.category_id = c.id
             WHERE c.user_id = ?1
             GROUP BY c.id
             ORDER BY c.sort_order, c.name",
        )?;
        let rows = stmt
            .query_map(params![user_id.to_string()], |row| {
                Ok((category_from_row(row)?, row.get::<_, i64>(5)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Rename a category
    ///
    /// The default category's name is immutable.
    pub fn rename_category(&self, user_id: Uuid, name: &str, new_name: &str) -> StoreResult<()> {
        let category = self.require_category(user_id, name)?;
        if category.is_default {
            return Err(StoreError::DefaultCategoryProtected);
        }
        let new_name = new_name.trim();
        if new_name != name && self.get_category(user_id, new_name)?.is_some() {
            return Err(StoreError::DuplicateCategory(new_name.to_string()));
        }

        self.conn.execute(
            "UPDATE categories SET name = ?1 WHERE id = ?2",
            params![new_name, category.id.to_string()],
        )?;
        Ok(())
    }

    /// Delete a category and all items in it
    ///
    /// The default category cannot be deleted.
    pub fn delete_category(&self, user_id: Uuid, name: &str) -> StoreResult<()> {
        let category = self.require_category(user_id, name)?;
        if category.is_default {
            return Err(StoreError::DefaultCategoryProtected);
        }

        self.conn.execute(
            "DELETE FROM categories WHERE id = ?1",
            params![category.id.to_string()],
        )?;
        Ok(())
    }

    // ==================== Review Offsets ====================

    /// Get a user's review offsets in ascending order
    pub fn review_offsets(&self, user_id: Uuid) -> StoreResult<Vec<u32>> {
        let mut stmt = self
            .conn
            .prepare("SELECT days FROM review_offsets WHERE user_id = ?1 ORDER BY days")?;
        let offsets = stmt
            .query_map(params![user_id.to_string()], |row| row.get::<_, u32>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(offsets)
    }

    /// Replace a user's review offsets
    ///
    /// Offsets must be positive day counts; duplicates are collapsed and
    /// the stored set is kept in ascending order.
    pub fn set_review_offsets(&mut self, user_id: Uuid, offsets: &[u32]) -> StoreResult<Vec<u32>> {
        if offsets.is_empty() {
            return Err(StoreError::InvalidOffsets(
                "at least one offset is required".to_string(),
            ));
        }
        if offsets.contains(&0) {
            return Err(StoreError::InvalidOffsets(
                "offsets must be positive day counts".to_string(),
            ));
        }

        let mut days: Vec<u32> = offsets.to_vec();
        days.sort_unstable();
        days.dedup();

        let tx = self.conn.transaction()?;
        tx.execute(
            "DELETE FROM review_offsets WHERE user_id = ?1",
            params![user_id.to_string()],
        )?;
        for &day in &days {
            tx.execute(
                "INSERT INTO review_offsets (user_id, days) VALUES (?1, ?2)",
                params![user_id.to_string(), day],
            )?;
        }
        tx.commit()?;
        Ok(days)
    }

    // ==================== Item Operations ====================

    /// Add a new item
    pub fn add_item(&self, item: &VocabItem) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO items (id, user_id, term, content, category_id, input_date,
                                init_date, proficiency, tts_url, us_phonetic, uk_phonetic,
                                created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            params![
                item.id.to_string(),
                item.user_id.to_string(),
                item.term,
                item.content,
                item.category_id.to_string(),
                item.input_date.format(DATE_FORMAT).to_string(),
                item.init_date.format(DATE_FORMAT).to_string(),
                item.proficiency.as_i64(),
                item.tts_url,
                item.us_phonetic,
                item.uk_phonetic,
                item.created_at.timestamp(),
                item.updated_at.timestamp(),
            ],
        )?;
        debug!("Added item '{}'", item.term);
        Ok(())
    }

    /// Update an existing item
    pub fn update_item(&self, item: &VocabItem) -> StoreResult<()> {
        let changed = self.conn.execute(
            "UPDATE items SET term = ?1, content = ?2, category_id = ?3, input_date = ?4,
                              init_date = ?5, proficiency = ?6, tts_url = ?7,
                              us_phonetic = ?8, uk_phonetic = ?9, updated_at = ?10
             WHERE id = ?11 AND user_id = ?12",
            params![
                item.term,
                item.content,
                item.category_id.to_string(),
                item.input_date.format(DATE_FORMAT).to_string(),
                item.init_date.format(DATE_FORMAT).to_string(),
                item.proficiency.as_i64(),
                item.tts_url,
                item.us_phonetic,
                item.uk_phonetic,
                item.updated_at.timestamp(),
                item.id.to_string(),
                item.user_id.to_string(),
            ],
        )?;
        if changed == 0 {
            return Err(StoreError::ItemNotFound(item.id));
        }
        Ok(())
    }

    /// Delete an item
    pub fn delete_item(&self, user_id: Uuid, id: Uuid) -> StoreResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM items WHERE id = ?1 AND user_id = ?2",
            params![id.to_string(), user_id.to_string()],
        )?;
        if changed == 0 {
            return Err(StoreError::ItemNotFound(id));
        }
        Ok(())
    }

    /// Get an item by ID
    pub fn get_item(&self, user_id: Uuid, id: Uuid) -> StoreResult<Option<VocabItem>> {
        let item = self
            .conn
            .prepare(&format!("{} WHERE id = ?1 AND user_id = ?2", SELECT_ITEM))?
            .query_row(params![id.to_string(), user_id.to_string()], item_from_row)
            .optional()?;
        Ok(item)
    }

    /// Get an item by ID, failing when absent
    pub fn require_item(&self, user_id: Uuid, id: Uuid) -> StoreResult<VocabItem> {
        self.get_item(user_id, id)?
            .ok_or(StoreError::ItemNotFound(id))
    }

    /// List a user's items, most recently entered first
    pub fn list_items(&self, user_id: Uuid) -> StoreResult<Vec<VocabItem>> {
        let mut stmt = self.conn.prepare(&format!(
            "{} WHERE user_id = ?1 ORDER BY input_date DESC, created_at DESC, id",
            SELECT_ITEM
        ))?;
        let items = stmt
            .query_map(params![user_id.to_string()], item_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }

    /// List a user's items in one category, most recently entered first
    pub fn list_items_in_category(
        &self,
        user_id: Uuid,
        category_id: Uuid,
    ) -> StoreResult<Vec<VocabItem>> {
        let mut stmt = self.conn.prepare(&format!(
            "{} WHERE user_id = ?1 AND category_id = ?2
             ORDER BY input_date DESC, created_at DESC, id",
            SELECT_ITEM
        ))?;
        let items = stmt
            .query_map(
                params![user_id.to_string(), category_id.to_string()],
                item_from_row,
            )?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }

    /// Search a user's items by substring of the term
    pub fn search_items(&self, user_id: Uuid, query: &str) -> StoreResult<Vec<VocabItem>> {
        let pattern = format!("%{}%", query.trim());
        let mut stmt = self.conn.prepare(&format!(
            "{} WHERE user_id = ?1 AND term LIKE ?2
             ORDER BY input_date DESC, created_at DESC, id",
            SELECT_ITEM
        ))?;
        let items = stmt
            .query_map(params![user_id.to_string(), pattern], item_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }

    /// Number of items a user has
    pub fn item_count(&self, user_id: Uuid) -> StoreResult<i64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM items WHERE user_id = ?1",
            params![user_id.to_string()],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    // ==================== Review ====================

    /// Build the review board for a user on a given date
    ///
    /// Loads the user's categories, offsets, and items, then delegates to
    /// the pure matcher. Every category appears on the board even when
    /// nothing is due in it.
    pub fn due_items(&self, user_id: Uuid, review_date: NaiveDate) -> StoreResult<Vec<CategoryReview>> {
        let categories = self.list_categories(user_id)?;
        let offsets = self.review_offsets(user_id)?;
        let items = self.list_items(user_id)?;
        Ok(match_due_items(review_date, &offsets, &items, &categories))
    }

    /// Record review feedback: update an item's mastery state
    pub fn set_proficiency(
        &self,
        user_id: Uuid,
        id: Uuid,
        proficiency: Proficiency,
    ) -> StoreResult<VocabItem> {
        let mut item = self.require_item(user_id, id)?;
        item.set_proficiency(proficiency);
        self.update_item(&item)?;
        Ok(item)
    }

    /// Record review feedback: restart an item's schedule from `today`
    pub fn reset_item(&self, user_id: Uuid, id: Uuid, today: NaiveDate) -> StoreResult<VocabItem> {
        let mut item = self.require_item(user_id, id)?;
        item.reset(today);
        self.update_item(&item)?;
        Ok(item)
    }
}

/// Shared SELECT column list for item queries
const SELECT_ITEM: &str = "SELECT id, user_id, term, content, category_id, input_date, init_date,
            proficiency, tts_url, us_phonetic, uk_phonetic, created_at, updated_at
     FROM items";

// ==================== Row Mapping ====================

fn user_from_row(row: &Row) -> rusqlite::Result<User> {
    Ok(User {
        id: uuid_column(row, 0)?,
        name: row.get(1)?,
        created_at: timestamp_column(row, 2)?,
    })
}

fn category_from_row(row: &Row) -> rusqlite::Result<Category> {
    Ok(Category {
        id: uuid_column(row, 0)?,
        user_id: uuid_column(row, 1)?,
        name: row.get(2)?,
        sort_order: row.get(3)?,
        is_default: row.get::<_, i64>(4)? != 0,
    })
}

fn item_from_row(row: &Row) -> rusqlite::Result<VocabItem> {
    Ok(VocabItem {
        id: uuid_column(row, 0)?,
        user_id: uuid_column(row, 1)?,
        term: row.get(2)?,
        content: row.get(3)?,
        category_id: uuid_column(row, 4)?,
        input_date: date_column(row, 5)?,
        init_date: date_column(row, 6)?,
        proficiency: Proficiency::from_i64(row.get(7)?),
        tts_url: row.get(8)?,
        us_phonetic: row.get(9)?,
        uk_phonetic: row.get(10)?,
        created_at: timestamp_column(row, 11)?,
        updated_at: timestamp_column(row, 12)?,
    })
}

fn uuid_column(row: &Row, idx: usize) -> rusqlite::Result<Uuid> {
    let text: String = row.get(idx)?;
    Uuid::parse_str(&text).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn date_column(row: &Row, idx: usize) -> rusqlite::Result<NaiveDate> {
    let text: String = row.get(idx)?;
    NaiveDate::parse_from_str(&text, DATE_FORMAT).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn timestamp_column(row: &Row, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let secs: i64 = row.get(idx)?;
    DateTime::from_timestamp(secs, 0)
        .ok_or(rusqlite::Error::IntegralValueOutOfRange(idx, secs))
}
