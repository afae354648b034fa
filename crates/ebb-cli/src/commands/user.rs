//! User command handlers

use anyhow::{Context, Result};

use ebb_core::Store;

use crate::output::Output;

/// Register a new user
///
/// Registration installs the default category and the default
/// forgetting-curve offsets.
pub fn add(store: &mut Store, name: String, output: &Output) -> Result<()> {
    let user = store
        .register_user(&name)
        .context("Failed to register user")?;

    output.success(&format!("Registered user '{}'", user.name));
    output.message("Default category and review offsets installed.");
    Ok(())
}

/// List all registered users
pub fn list(store: &Store, output: &Output) -> Result<()> {
    let users = store.list_users()?;
    output.print_users(&users);
    Ok(())
}
