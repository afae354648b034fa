//! Review offset command handlers

use anyhow::{Context, Result};

use ebb_core::{Store, User};

use crate::output::Output;

/// Show the user's forgetting-curve offsets
pub fn show(store: &Store, user: &User, output: &Output) -> Result<()> {
    let offsets = store.review_offsets(user.id)?;
    output.print_offsets(&offsets);
    Ok(())
}

/// Replace the user's forgetting-curve offsets
pub fn set(store: &mut Store, user: &User, days: Vec<u32>, output: &Output) -> Result<()> {
    let stored = store
        .set_review_offsets(user.id, &days)
        .context("Failed to update review offsets")?;

    output.success("Review offsets updated");
    output.print_offsets(&stored);
    Ok(())
}
