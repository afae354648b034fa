//! ebb CLI
//!
//! Command-line interface for ebb - a forgetting-curve vocabulary trainer.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ebb_core::{Store, User};

mod commands;
mod dict;
mod editor;
mod output;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "ebb")]
#[command(about = "ebb - Spaced-repetition vocabulary trainer")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Act as this user (defaults to the configured default_user)
    #[arg(short, long, global = true)]
    user: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage users
    User {
        #[command(subcommand)]
        command: UserCommands,
    },
    /// Manage categories
    Category {
        #[command(subcommand)]
        command: CategoryCommands,
    },
    /// Manage vocabulary items
    Item {
        #[command(subcommand)]
        command: ItemCommands,
    },
    /// Review items due on the forgetting curve
    Review {
        #[command(subcommand)]
        command: ReviewCommands,
    },
    /// Show or replace review offsets
    Offsets {
        #[command(subcommand)]
        command: Option<OffsetCommands>,
    },
    /// Re-run the dictionary lookup for an item
    Translate {
        /// Item ID (full UUID or prefix)
        id: String,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
    /// Show status for the current user
    Status,
}

#[derive(Subcommand)]
enum UserCommands {
    /// Register a new user
    #[command(alias = "create")]
    Add {
        /// User name
        name: String,
    },
    /// List all users
    #[command(alias = "ls")]
    List,
}

#[derive(Subcommand)]
enum CategoryCommands {
    /// Create a new category
    #[command(alias = "create")]
    Add {
        /// Category name
        name: String,
        /// Position in the review board
        #[arg(short, long, default_value_t = 0)]
        order: i64,
    },
    /// List categories with item counts
    #[command(alias = "ls")]
    List,
    /// Rename a category
    Rename {
        /// Current name
        name: String,
        /// New name
        new_name: String,
    },
    /// Delete a category and all items in it
    #[command(alias = "rm")]
    Remove {
        /// Category name
        name: String,
    },
}

#[derive(Subcommand)]
enum ItemCommands {
    /// Create items ("term" or "term: definition")
    #[command(alias = "create")]
    Add {
        /// One or more entries
        #[arg(required = true)]
        entries: Vec<String>,
        /// Category to file the items under (default category if omitted)
        #[arg(short, long)]
        category: Option<String>,
        /// Entry date (YYYY-MM-DD, today if omitted)
        #[arg(short, long)]
        date: Option<NaiveDate>,
        /// Fetch dictionary definitions for items in the default category
        #[arg(short, long)]
        translate: bool,
    },
    /// List items
    #[command(alias = "ls")]
    List {
        /// Filter by category
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Show item details
    Show {
        /// Item ID (full UUID or prefix)
        id: String,
    },
    /// Edit an item's definition in $EDITOR
    Edit {
        /// Item ID (full UUID or prefix)
        id: String,
    },
    /// Delete an item
    #[command(alias = "rm")]
    Remove {
        /// Item ID (full UUID or prefix)
        id: String,
    },
    /// Search items by term
    Search {
        /// Search query
        query: String,
    },
}

#[derive(Subcommand)]
enum ReviewCommands {
    /// Show the review board (today if no date given)
    Due {
        /// Review date (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },
    /// Mark an item as mastered
    Pass {
        /// Item ID (full UUID or prefix)
        id: String,
    },
    /// Mark an item as unfamiliar
    Fail {
        /// Item ID (full UUID or prefix)
        id: String,
    },
    /// Restart an item's schedule from today
    Reset {
        /// Item ID (full UUID or prefix)
        id: String,
    },
}

#[derive(Subcommand, Clone)]
enum OffsetCommands {
    /// Show the current offsets
    Show,
    /// Replace the offsets with a new list of days
    Set {
        /// Days after the initial learning date
        #[arg(required = true)]
        days: Vec<u32>,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, default_user, dict_api_key, ...)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    // Config commands don't need the store
    if let Commands::Config { command } = &cli.command {
        return handle_config_command(command.clone(), &output);
    }

    let mut store = Store::open()?;

    match cli.command {
        Commands::Config { .. } => unreachable!(), // Handled above
        Commands::User { command } => match command {
            UserCommands::Add { name } => commands::user::add(&mut store, name, &output),
            UserCommands::List => commands::user::list(&store, &output),
        },
        Commands::Category { command } => {
            let user = resolve_user(&store, cli.user.as_deref())?;
            match command {
                CategoryCommands::Add { name, order } => {
                    commands::category::add(&store, &user, name, order, &output)
                }
                CategoryCommands::List => commands::category::list(&store, &user, &output),
                CategoryCommands::Rename { name, new_name } => {
                    commands::category::rename(&store, &user, name, new_name, &output)
                }
                CategoryCommands::Remove { name } => {
                    commands::category::remove(&store, &user, name, &output)
                }
            }
        }
        Commands::Item { command } => {
            let user = resolve_user(&store, cli.user.as_deref())?;
            handle_item_command(command, &store, &user, &output).await
        }
        Commands::Review { command } => {
            let user = resolve_user(&store, cli.user.as_deref())?;
            match command {
                ReviewCommands::Due { date } => commands::review::due(&store, &user, date, &output),
                ReviewCommands::Pass { id } => commands::review::pass(&store, &user, id, &output),
                ReviewCommands::Fail { id } => commands::review::fail(&store, &user, id, &output),
                ReviewCommands::Reset { id } => commands::review::reset(&store, &user, id, &output),
            }
        }
        Commands::Offsets { command } => {
            let user = resolve_user(&store, cli.user.as_deref())?;
            match command {
                Some(OffsetCommands::Set { days }) => {
                    commands::offsets::set(&mut store, &user, days, &output)
                }
                Some(OffsetCommands::Show) | None => {
                    commands::offsets::show(&store, &user, &output)
                }
            }
        }
        Commands::Translate { id } => {
            let user = resolve_user(&store, cli.user.as_deref())?;
            commands::translate::run(&store, &user, id, &output).await
        }
        Commands::Status => {
            let user = resolve_user(&store, cli.user.as_deref())?;
            commands::status::show(&store, &user, &output)
        }
    }
}

async fn handle_item_command(
    command: ItemCommands,
    store: &Store,
    user: &User,
    output: &Output,
) -> Result<()> {
    match command {
        ItemCommands::Add {
            entries,
            category,
            date,
            translate,
        } => commands::item::add(store, user, entries, category, date, translate, output).await,
        ItemCommands::List { category } => commands::item::list(store, user, category, output),
        ItemCommands::Show { id } => commands::item::show(store, user, id, output),
        ItemCommands::Edit { id } => commands::item::edit(store, user, id, output),
        ItemCommands::Remove { id } => commands::item::remove(store, user, id, output),
        ItemCommands::Search { query } => commands::item::search(store, user, query, output),
    }
}

fn handle_config_command(command: Option<ConfigCommands>, output: &Output) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(output),
        Some(ConfigCommands::Set { key, value }) => commands::config::set(key, value, output),
    }
}

/// Resolve the acting user from the --user flag or configured default
fn resolve_user(store: &Store, flag: Option<&str>) -> Result<User> {
    let name = match flag {
        Some(name) => name.to_string(),
        None => match store.config().default_user.clone() {
            Some(name) => name,
            None => bail!(
                "No user specified. Pass --user <name> or set one with \
                 'ebb config set default_user <name>'."
            ),
        },
    };

    store
        .require_user(&name)
        .with_context(|| format!("Unknown user '{}'. Register with 'ebb user add {}'.", name, name))
}
