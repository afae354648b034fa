//! Status command handler

use anyhow::Result;

use ebb_core::{Store, User};

use crate::output::{Output, OutputFormat};

/// Show status information for the resolved user
pub fn show(store: &Store, user: &User, output: &Output) -> Result<()> {
    let config = store.config();
    let categories = store.category_counts(user.id)?;
    let items = store.item_count(user.id)?;
    let offsets = store.review_offsets(user.id)?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "user": user.name,
                    "data_dir": config.data_dir,
                    "database": config.sqlite_path(),
                    "dictionary_configured": config.dictionary.is_configured(),
                    "review_offsets": offsets,
                    "counts": {
                        "categories": categories.len(),
                        "items": items
                    }
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", items);
        }
        OutputFormat::Human => {
            println!("Status for '{}'", user.name);
            println!();
            println!("Storage:");
            println!("  Location: {}", config.data_dir.display());
            println!("  Database: {}", config.sqlite_path().display());
            println!();
            println!("Dictionary:");
            println!(
                "  Credentials: {}",
                if config.dictionary.is_configured() {
                    "configured"
                } else {
                    "not configured"
                }
            );
            println!();
            let days: Vec<String> = offsets.iter().map(|d| d.to_string()).collect();
            println!("Review offsets: {}", days.join(", "));
            println!();
            println!("Contents:");
            println!("  Categories: {}", categories.len());
            println!("  Items:      {}", items);
        }
    }

    Ok(())
}
