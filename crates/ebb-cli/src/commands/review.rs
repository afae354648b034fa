//! Review command handlers

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};

use ebb_core::{Proficiency, Store, User};

use crate::commands::item::parse_item_id;
use crate::output::Output;

/// Show the review board for a date (today by default)
pub fn due(store: &Store, user: &User, date: Option<NaiveDate>, output: &Output) -> Result<()> {
    let review_date = date.unwrap_or_else(|| Local::now().date_naive());
    let board = store
        .due_items(user.id, review_date)
        .context("Failed to build review board")?;

    output.print_review_board(review_date, &board);
    Ok(())
}

/// Mark an item as mastered
pub fn pass(store: &Store, user: &User, id: String, output: &Output) -> Result<()> {
    let uuid = parse_item_id(store, user, &id)?;
    let item = store
        .set_proficiency(user.id, uuid, Proficiency::Mastered)
        .context("Failed to record review result")?;

    output.success(&format!("Marked '{}' as mastered", item.term));
    Ok(())
}

/// Mark an item as unfamiliar without touching its schedule
pub fn fail(store: &Store, user: &User, id: String, output: &Output) -> Result<()> {
    let uuid = parse_item_id(store, user, &id)?;
    let item = store
        .set_proficiency(user.id, uuid, Proficiency::Unfamiliar)
        .context("Failed to record review result")?;

    output.success(&format!("Marked '{}' as unfamiliar", item.term));
    Ok(())
}

/// Restart an item's review schedule from today
pub fn reset(store: &Store, user: &User, id: String, output: &Output) -> Result<()> {
    let uuid = parse_item_id(store, user, &id)?;
    let today = Local::now().date_naive();
    let item = store
        .reset_item(user.id, uuid, today)
        .context("Failed to reset item")?;

    output.success(&format!(
        "Reset '{}'; schedule restarts from {}",
        item.term, item.init_date
    ));
    Ok(())
}
