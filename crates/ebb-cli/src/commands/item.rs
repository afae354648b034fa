//! Item command handlers

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use uuid::Uuid;

use ebb_core::{Store, User, VocabItem};

use crate::dict::DictClient;
use crate::editor::{confirm, edit_text};
use crate::output::Output;

/// Create items from one or more entries
///
/// Each entry is a term, optionally followed by seed content after the
/// first colon (`term: definition`). With `--translate`, items going into
/// the default category also get a dictionary lookup; fetched definition
/// lines are merged into the seed content.
pub async fn add(
    store: &Store,
    user: &User,
    entries: Vec<String>,
    category_name: Option<String>,
    date: Option<NaiveDate>,
    translate: bool,
    output: &Output,
) -> Result<()> {
    let category = match category_name {
        Some(ref name) => store.require_category(user.id, name)?,
        None => store
            .default_category(user.id)?
            .context("User has no default category")?,
    };
    let input_date = date.unwrap_or_else(|| Local::now().date_naive());

    // Dictionary lookups apply only to the default word category
    let client = if translate && category.is_default {
        if !store.config().dictionary.is_configured() {
            output.message("Dictionary API is not configured; skipping lookups.");
            None
        } else {
            Some(DictClient::new(&store.config().dictionary)?)
        }
    } else {
        None
    };

    let mut created = 0;
    for entry in &entries {
        let (term, seed) = split_entry(entry);
        let term = term.trim();
        if term.is_empty() {
            continue;
        }

        let mut item = VocabItem::new(user.id, term, category.id, input_date);
        if let Some(seed) = seed {
            item.set_content(seed.trim());
        }

        if let Some(ref client) = client {
            if let Some(translation) = client.lookup(term).await {
                item.apply_translation(&translation);
            }
        }

        store.add_item(&item).context("Failed to create item")?;
        created += 1;

        if output.is_quiet() {
            println!("{}", item.id);
        }
    }

    output.success(&format!(
        "Created {} item(s) in '{}'",
        created, category.name
    ));
    Ok(())
}

/// List items, optionally filtered by category
pub fn list(
    store: &Store,
    user: &User,
    category_name: Option<String>,
    output: &Output,
) -> Result<()> {
    let items = match category_name {
        Some(ref name) => {
            let category = store.require_category(user.id, name)?;
            store.list_items_in_category(user.id, category.id)?
        }
        None => store.list_items(user.id)?,
    };

    output.print_items(&items);
    Ok(())
}

/// Show a single item
pub fn show(store: &Store, user: &User, id: String, output: &Output) -> Result<()> {
    let uuid = parse_item_id(store, user, &id)?;
    let item = store.require_item(user.id, uuid)?;

    let category = store
        .list_categories(user.id)?
        .into_iter()
        .find(|c| c.id == item.category_id);

    output.print_item(&item, category.as_ref());
    Ok(())
}

/// Edit an item's definition content in $EDITOR
pub fn edit(store: &Store, user: &User, id: String, output: &Output) -> Result<()> {
    let uuid = parse_item_id(store, user, &id)?;
    let mut item = store.require_item(user.id, uuid)?;

    let edited = edit_text(&item.content)?;
    item.set_content(edited.trim_end());
    store.update_item(&item).context("Failed to update item")?;

    output.success(&format!("Updated '{}'", item.term));
    Ok(())
}

/// Delete an item
pub fn remove(store: &Store, user: &User, id: String, output: &Output) -> Result<()> {
    let uuid = parse_item_id(store, user, &id)?;
    let item = store.require_item(user.id, uuid)?;

    if output.should_prompt() {
        println!("Delete item: {} - {}", &item.id.to_string()[..8], item.term);
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    store
        .delete_item(user.id, uuid)
        .context("Failed to delete item")?;

    output.success(&format!("Deleted '{}'", item.term));
    Ok(())
}

/// Search items by term substring
pub fn search(store: &Store, user: &User, query: String, output: &Output) -> Result<()> {
    let items = store.search_items(user.id, &query)?;
    output.print_items(&items);
    Ok(())
}

/// Split an input entry into term and optional seed content
///
/// The first ASCII or full-width colon separates the two.
pub fn split_entry(entry: &str) -> (&str, Option<&str>) {
    let pos = entry
        .char_indices()
        .find(|&(_, c)| c == ':' || c == '：')
        .map(|(i, c)| (i, c.len_utf8()));

    match pos {
        Some((i, width)) => (&entry[..i], Some(&entry[i + width..])),
        None => (entry, None),
    }
}

/// Parse an item ID (supports full UUID or prefix)
pub fn parse_item_id(store: &Store, user: &User, id: &str) -> Result<Uuid> {
    // Try full UUID first
    if let Ok(uuid) = Uuid::parse_str(id) {
        return Ok(uuid);
    }

    // Try prefix match
    let items = store.list_items(user.id)?;
    let matches: Vec<_> = items
        .iter()
        .filter(|item| item.id.to_string().starts_with(id))
        .collect();

    match matches.len() {
        0 => bail!("No item found matching: {}", id),
        1 => Ok(matches[0].id),
        _ => {
            eprintln!("Multiple items match '{}':", id);
            for item in &matches {
                eprintln!("  {} - {}", item.id, item.term);
            }
            bail!("Ambiguous ID. Please provide more characters.");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_entry_plain_term() {
        assert_eq!(split_entry("serendipity"), ("serendipity", None));
    }

    #[test]
    fn test_split_entry_ascii_colon() {
        assert_eq!(
            split_entry("cat: a small domesticated feline"),
            ("cat", Some(" a small domesticated feline"))
        );
    }

    #[test]
    fn test_split_entry_fullwidth_colon() {
        assert_eq!(split_entry("猫：猫科动物"), ("猫", Some("猫科动物")));
    }

    #[test]
    fn test_split_entry_first_colon_wins() {
        assert_eq!(
            split_entry("time: 4:30 in the afternoon"),
            ("time", Some(" 4:30 in the afternoon"))
        );
    }

    #[test]
    fn test_split_entry_empty_content() {
        assert_eq!(split_entry("cat:"), ("cat", Some("")));
    }
}
