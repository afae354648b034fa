//! Category command handlers

use anyhow::{Context, Result};

use ebb_core::{Store, User};

use crate::editor::confirm;
use crate::output::Output;

/// Add a category
pub fn add(store: &Store, user: &User, name: String, order: i64, output: &Output) -> Result<()> {
    let category = store
        .add_category(user.id, &name, order)
        .context("Failed to create category")?;

    output.success(&format!("Created category '{}'", category.name));
    Ok(())
}

/// List categories with their item counts
pub fn list(store: &Store, user: &User, output: &Output) -> Result<()> {
    let categories = store.category_counts(user.id)?;
    output.print_categories(&categories);
    Ok(())
}

/// Rename a category (the default category is immutable)
pub fn rename(
    store: &Store,
    user: &User,
    name: String,
    new_name: String,
    output: &Output,
) -> Result<()> {
    store
        .rename_category(user.id, &name, &new_name)
        .context("Failed to rename category")?;

    output.success(&format!("Renamed category '{}' to '{}'", name, new_name));
    Ok(())
}

/// Delete a category and all items in it
pub fn remove(store: &Store, user: &User, name: String, output: &Output) -> Result<()> {
    let category = store.require_category(user.id, &name)?;
    let count = store
        .list_items_in_category(user.id, category.id)?
        .len();

    if output.should_prompt() {
        println!("Delete category '{}' and the {} item(s) in it", name, count);
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    store
        .delete_category(user.id, &name)
        .context("Failed to delete category")?;

    output.success(&format!("Deleted category '{}'", name));
    Ok(())
}
