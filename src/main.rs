mod app;
mod domain;
mod logging;
mod persistence;

use anyhow::{bail, Result};
use app::AppState;
use clap::{Parser, Subcommand};
use domain::{Item, ItemColor, PageKind, PushScope};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "maniana")]
#[command(about = "A two-page (today/tomorrow) to-do list with locking, colors and day rollover", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new item to the top of a page
    Add {
        /// Item text
        text: String,
        /// Page to add to: today or tomorrow
        #[arg(short, long, default_value = "tomorrow")]
        page: String,
        /// Color tag: none, red, blue or green
        #[arg(short, long, default_value = "none")]
        color: String,
    },
    /// List the items on one or both pages
    List {
        /// Limit to one page
        #[arg(short, long)]
        page: Option<String>,
    },
    /// Toggle an item's completed state
    Done { page: String, index: usize },
    /// Toggle an item's lock (tomorrow page only)
    Lock { page: String, index: usize },
    /// Set an item's color, or cycle it when no color is given
    Color {
        page: String,
        index: usize,
        color: Option<String>,
    },
    /// Replace an item's text
    Edit {
        page: String,
        index: usize,
        text: String,
    },
    /// Move an item to the other page
    Move { page: String, index: usize },
    /// Delete an item (restorable with undo)
    Delete { page: String, index: usize },
    /// Sort pages into group order, optionally deleting completed items
    Organize {
        /// Limit to one page
        #[arg(short, long)]
        page: Option<String>,
        /// Also delete completed items (they stay restorable with undo)
        #[arg(long)]
        delete_completed: bool,
        /// Keep completed items even if the settings default says delete
        #[arg(long, conflicts_with = "delete_completed")]
        keep_completed: bool,
    },
    /// Restore the most recently deleted or organized-away items
    Undo {
        /// Limit to one page
        #[arg(short, long)]
        page: Option<String>,
    },
    /// Apply a pending day rollover now
    Push,
    /// Remove every item from a page
    Clear { page: String },
    /// Merge items from another maniana data file
    Restore { path: PathBuf },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logging is best-effort; the app works without it
    let _logger = match persistence::log_dir().and_then(|dir| logging::init_logging(&dir)) {
        Ok(handle) => Some(handle),
        Err(err) => {
            eprintln!("Warning: logging disabled: {err}");
            None
        }
    };

    let mut state = AppState::open()?;
    if let Some(warning) = state.load_warning.take() {
        eprintln!("Warning: could not read saved tasks ({warning}); starting with an empty list.");
    }

    // Day rollover runs before any command touches the model
    let (scope, moved) = state.apply_rollover();

    match cli.command {
        Commands::Add { text, page, color } => {
            let page = parse_page(&page)?;
            let color = parse_color(&color)?;
            state.add_item(page, text, color)?;
            println!("Added to {}.", page.name());
        }
        Commands::List { page } => {
            let pages = selected_pages(page.as_deref())?;
            for kind in pages {
                print_page(&state, kind);
            }
        }
        Commands::Done { page, index } => {
            let page = parse_page(&page)?;
            let index = zero_index(index)?;
            state.toggle_completed(page, index)?;
            let item = &state.model.page(page).items()[index];
            if item.is_completed {
                println!("Completed: {}", item.text);
            } else {
                println!("Reopened: {}", item.text);
            }
        }
        Commands::Lock { page, index } => {
            let page = parse_page(&page)?;
            let index = zero_index(index)?;
            state.toggle_locked(page, index)?;
            let item = &state.model.page(page).items()[index];
            if item.is_locked {
                println!("Locked: {}", item.text);
            } else {
                println!("Unlocked: {}", item.text);
            }
        }
        Commands::Color { page, index, color } => {
            let page = parse_page(&page)?;
            let index = zero_index(index)?;
            let color = match color {
                Some(name) => Some(parse_color(&name)?),
                None => None,
            };
            state.set_color(page, index, color)?;
            let item = &state.model.page(page).items()[index];
            println!("Color of \"{}\" is now {}.", item.text, item.color.to_name());
        }
        Commands::Edit { page, index, text } => {
            let page = parse_page(&page)?;
            let index = zero_index(index)?;
            state.edit_text(page, index, text)?;
            println!("Updated item {} on {}.", index + 1, page.name());
        }
        Commands::Move { page, index } => {
            let page = parse_page(&page)?;
            let index = zero_index(index)?;
            state.move_item(page, index)?;
            println!("Moved to {}.", page.other().name());
        }
        Commands::Delete { page, index } => {
            let page = parse_page(&page)?;
            let index = zero_index(index)?;
            let item = state.delete_item(page, index)?;
            println!("Deleted: {} (undo to restore)", item.text);
        }
        Commands::Organize {
            page,
            delete_completed,
            keep_completed,
        } => {
            let delete = if keep_completed {
                false
            } else {
                delete_completed || state.settings.delete_completed_on_organize
            };
            for kind in selected_pages(page.as_deref())? {
                let outcome = state.model.organize_page(kind, delete);
                if outcome.deleted > 0 {
                    println!(
                        "Organized {}: {} completed item(s) deleted (undo to restore).",
                        kind.name(),
                        outcome.deleted
                    );
                } else if outcome.changed {
                    println!("Organized {}.", kind.name());
                } else {
                    println!("{} was already organized.", kind.name());
                }
            }
        }
        Commands::Undo { page } => {
            let mut restored = 0;
            for kind in selected_pages(page.as_deref())? {
                restored += state.model.undo_page(kind);
            }
            if restored > 0 {
                println!("Restored {restored} item(s).");
            } else {
                println!("Nothing to undo.");
            }
        }
        Commands::Push => {
            // The rollover already ran above; report what it did
            match scope {
                PushScope::None => println!("Already pushed today; nothing to do."),
                PushScope::UnlockedOnly => {
                    println!("Moved {moved} unlocked item(s) to today.")
                }
                PushScope::All => {
                    println!("Moved {moved} item(s) to today; expired locks were released.")
                }
            }
        }
        Commands::Clear { page } => {
            let page = parse_page(&page)?;
            let removed = state.model.clear_page(page);
            println!("Removed {removed} item(s) from {}.", page.name());
        }
        Commands::Restore { path } => {
            let added = state.restore(&path)?;
            println!("Merged {added} item(s) from {}.", path.display());
        }
    }

    state.save()?;
    Ok(())
}

fn parse_page(name: &str) -> Result<PageKind> {
    match name.to_lowercase().as_str() {
        "today" => Ok(PageKind::Today),
        "tomorrow" => Ok(PageKind::Tomorrow),
        other => bail!("unknown page '{other}' (expected today or tomorrow)"),
    }
}

fn parse_color(name: &str) -> Result<ItemColor> {
    match ItemColor::from_name(name) {
        Some(color) => Ok(color),
        None => bail!("unknown color '{name}' (expected none, red, blue or green)"),
    }
}

/// Convert a 1-based CLI index to a 0-based model index
fn zero_index(index: usize) -> Result<usize> {
    match index.checked_sub(1) {
        Some(index) => Ok(index),
        None => bail!("item numbers start at 1"),
    }
}

fn selected_pages(page: Option<&str>) -> Result<Vec<PageKind>> {
    match page {
        Some(name) => Ok(vec![parse_page(name)?]),
        None => Ok(vec![PageKind::Today, PageKind::Tomorrow]),
    }
}

fn print_page(state: &AppState, kind: PageKind) {
    let page = state.model.page(kind);
    println!("{}", title_case(kind.name()));

    if page.is_empty() {
        println!("  (no items)");
        return;
    }
    for (index, item) in page.items().iter().enumerate() {
        println!("  {}. {}", index + 1, item_line(item));
    }
}

fn item_line(item: &Item) -> String {
    let check = if item.is_completed { "[x]" } else { "[ ]" };
    let mut line = format!("{check} {}", item.text);
    if item.color != ItemColor::None {
        line.push_str(&format!("  #{}", item.color.to_name()));
    }
    if item.is_locked {
        line.push_str("  (locked)");
    }
    line
}

fn title_case(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
