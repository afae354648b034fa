//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use chrono::NaiveDate;

use ebb_core::{Category, CategoryReview, User, VocabItem};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Check if output is in quiet mode
    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    /// Check if output is in JSON mode
    pub fn is_json(&self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }

    /// Print a single item in full
    pub fn print_item(&self, item: &VocabItem, category: Option<&Category>) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:          {}", item.id);
                println!("Term:        {}", item.term);
                if let Some(category) = category {
                    println!("Category:    {}", category.name);
                }
                println!("Entered:     {}", item.input_date);
                println!("Learning:    since {}", item.init_date);
                println!("Mastery:     {}", item.proficiency);
                if let Some(ref uk) = item.uk_phonetic {
                    println!("UK:          /{}/", uk);
                }
                if let Some(ref us) = item.us_phonetic {
                    println!("US:          /{}/", us);
                }
                if let Some(ref tts) = item.tts_url {
                    println!("Audio:       {}", tts);
                }
                if !item.content.is_empty() {
                    println!();
                    println!("{}", item.content);
                }
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(item).unwrap());
            }
            OutputFormat::Quiet => {
                println!("{}", item.id);
            }
        }
    }

    /// Print a list of items
    pub fn print_items(&self, items: &[VocabItem]) {
        match self.format {
            OutputFormat::Human => {
                if items.is_empty() {
                    println!("No items found.");
                    return;
                }
                for item in items {
                    println!(
                        "{} | {} | {} | {}",
                        &item.id.to_string()[..8],
                        item.input_date,
                        truncate(&item.term, 30),
                        truncate_line(&item.content, 45)
                    );
                }
                println!("\n{} item(s)", items.len());
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(items).unwrap());
            }
            OutputFormat::Quiet => {
                for item in items {
                    println!("{}", item.id);
                }
            }
        }
    }

    /// Print the per-category review board for a date
    pub fn print_review_board(&self, review_date: NaiveDate, board: &[CategoryReview]) {
        match self.format {
            OutputFormat::Human => {
                println!("Review for {}", review_date);
                for group in board {
                    println!();
                    println!("── {} ({}) ──", group.category.name, group.len());
                    if group.is_empty() {
                        println!("Nothing due.");
                        continue;
                    }
                    for entry in &group.due {
                        println!(
                            "{} | day {:>3} | {} | {}",
                            &entry.item.id.to_string()[..8],
                            entry.offset,
                            truncate(&entry.item.term, 30),
                            entry.item.proficiency
                        );
                    }
                }
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(board).unwrap());
            }
            OutputFormat::Quiet => {
                for group in board {
                    for entry in &group.due {
                        println!("{}", entry.item.id);
                    }
                }
            }
        }
    }

    /// Print a list of categories with item counts
    pub fn print_categories(&self, categories: &[(Category, i64)]) {
        match self.format {
            OutputFormat::Human => {
                if categories.is_empty() {
                    println!("No categories found.");
                    return;
                }
                for (category, count) in categories {
                    let marker = if category.is_default { " [default]" } else { "" };
                    println!("{} ({}){}", category.name, count, marker);
                }
                println!("\n{} categorie(s)", categories.len());
            }
            OutputFormat::Json => {
                let json_categories: Vec<_> = categories
                    .iter()
                    .map(|(category, count)| {
                        serde_json::json!({
                            "name": category.name,
                            "sort_order": category.sort_order,
                            "is_default": category.is_default,
                            "items": count
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&json_categories).unwrap());
            }
            OutputFormat::Quiet => {
                for (category, _) in categories {
                    println!("{}", category.name);
                }
            }
        }
    }

    /// Print a list of users
    pub fn print_users(&self, users: &[User]) {
        match self.format {
            OutputFormat::Human => {
                if users.is_empty() {
                    println!("No users registered.");
                    return;
                }
                for user in users {
                    println!(
                        "{} (registered {})",
                        user.name,
                        user.created_at.format("%Y-%m-%d")
                    );
                }
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(users).unwrap());
            }
            OutputFormat::Quiet => {
                for user in users {
                    println!("{}", user.name);
                }
            }
        }
    }

    /// Print a user's review offsets
    pub fn print_offsets(&self, offsets: &[u32]) {
        match self.format {
            OutputFormat::Human => {
                let days: Vec<String> = offsets.iter().map(|d| d.to_string()).collect();
                println!("Review offsets (days): {}", days.join(", "));
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(offsets).unwrap());
            }
            OutputFormat::Quiet => {
                for offset in offsets {
                    println!("{}", offset);
                }
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

/// Truncate a string to max length, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

/// Truncate to first line and max length
fn truncate_line(s: &str, max_len: usize) -> String {
    let first_line = s.lines().next().unwrap_or("");
    truncate(first_line, max_len)
}
