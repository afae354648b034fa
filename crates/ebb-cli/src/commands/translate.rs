//! Translate command handler

use anyhow::{Context, Result};

use ebb_core::{Store, User};

use crate::commands::item::parse_item_id;
use crate::dict::DictClient;
use crate::output::Output;

/// Re-run the dictionary lookup for an item and merge the result
pub async fn run(store: &Store, user: &User, id: String, output: &Output) -> Result<()> {
    let uuid = parse_item_id(store, user, &id)?;
    let mut item = store.require_item(user.id, uuid)?;

    if !store.config().dictionary.is_configured() {
        anyhow::bail!(
            "Dictionary API is not configured. Set credentials with 'ebb config set dict_api_key ...'"
        );
    }

    let client = DictClient::new(&store.config().dictionary)?;
    match client.lookup(&item.term).await {
        Some(translation) => {
            item.apply_translation(&translation);
            store.update_item(&item).context("Failed to update item")?;
            output.success(&format!("Merged dictionary result into '{}'", item.term));
        }
        None => {
            output.message(&format!("No dictionary result for '{}'", item.term));
        }
    }

    Ok(())
}
