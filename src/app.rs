use crate::domain::{AppModel, Item, ItemColor, PageKind, PushScope};
use crate::persistence::{
    self, load_model, load_settings, save_model, PersistenceError, Settings,
};
use anyhow::{bail, Context, Result};
use chrono::Local;
use std::path::PathBuf;

/// Application state: the model, the user settings, and where they live
pub struct AppState {
    pub model: AppModel,
    pub settings: Settings,
    pub data_path: PathBuf,
    /// Set when the data file existed but could not be parsed; the model
    /// was cleared and the user should be told.
    pub load_warning: Option<String>,
}

impl AppState {
    /// Load settings and model from the maniana directory. A corrupt data
    /// file does not fail the open: the model starts empty and the
    /// warning is carried for the caller to surface.
    pub fn open() -> Result<Self> {
        let data_path = persistence::data_file()?;
        let settings_path = persistence::settings_file()?;
        let settings = load_settings(&settings_path);

        let (model, load_warning) = match load_model(&data_path) {
            Ok(model) => {
                log::info!(
                    "loaded {} items from {}",
                    model.item_count(),
                    data_path.display()
                );
                (model, None)
            }
            Err(err) => {
                log::error!("discarding unreadable data file: {err}");
                (AppModel::new(), Some(err.to_string()))
            }
        };

        Ok(Self {
            model,
            settings,
            data_path,
            load_warning,
        })
    }

    /// Build a state around explicit paths (tests)
    #[cfg(test)]
    pub fn with_paths(data_path: PathBuf, settings: Settings) -> Self {
        Self {
            model: AppModel::new(),
            settings,
            data_path,
            load_warning: None,
        }
    }

    /// Apply the pending day rollover, if any. Runs before every command
    /// that touches the model. When the settings ask for it, both pages
    /// are re-organized after a push (without deleting anything).
    pub fn apply_rollover(&mut self) -> (PushScope, usize) {
        let today = Local::now().date_naive();
        let (scope, moved) = self
            .model
            .maybe_push(today, self.settings.lock_expiration);

        if scope != PushScope::None {
            log::info!(
                "day rollover: moved {moved} item(s) to today (scope {scope:?})"
            );
            if self.settings.auto_organize {
                self.model.organize_page(PageKind::Today, false);
                self.model.organize_page(PageKind::Tomorrow, false);
            }
        }

        (scope, moved)
    }

    pub fn add_item(&mut self, kind: PageKind, text: String, color: ItemColor) -> Result<()> {
        let text = text.trim().to_string();
        if text.is_empty() {
            bail!("item text cannot be empty");
        }
        let mut item = Item::new(text);
        item.set_color(color);
        self.model.add_item(kind, item);
        Ok(())
    }

    pub fn toggle_completed(&mut self, kind: PageKind, index: usize) -> Result<()> {
        if !self.model.toggle_item_completed(kind, index) {
            bail!("no item {} on the {} page", index + 1, kind.name());
        }
        Ok(())
    }

    /// Toggle an item's lock. Locks only exist on the tomorrow page; the
    /// today page never holds locked items, in memory or on disk.
    pub fn toggle_locked(&mut self, kind: PageKind, index: usize) -> Result<()> {
        if kind == PageKind::Today {
            bail!("items on the today page cannot be locked");
        }
        if !self.model.toggle_item_locked(kind, index) {
            bail!("no item {} on the {} page", index + 1, kind.name());
        }
        Ok(())
    }

    pub fn set_color(&mut self, kind: PageKind, index: usize, color: Option<ItemColor>) -> Result<()> {
        let applied = match color {
            Some(color) => self.model.set_item_color(kind, index, color),
            None => self.model.cycle_item_color(kind, index),
        };
        if !applied {
            bail!("no item {} on the {} page", index + 1, kind.name());
        }
        Ok(())
    }

    pub fn edit_text(&mut self, kind: PageKind, index: usize, text: String) -> Result<()> {
        let text = text.trim().to_string();
        if text.is_empty() {
            bail!("item text cannot be empty");
        }
        if !self.model.set_item_text(kind, index, text) {
            bail!("no item {} on the {} page", index + 1, kind.name());
        }
        Ok(())
    }

    pub fn move_item(&mut self, kind: PageKind, index: usize) -> Result<()> {
        if !self.model.move_item_to_other_page(kind, index) {
            bail!("no item {} on the {} page", index + 1, kind.name());
        }
        Ok(())
    }

    pub fn delete_item(&mut self, kind: PageKind, index: usize) -> Result<Item> {
        self.model
            .remove_item(kind, index)
            .with_context(|| format!("no item {} on the {} page", index + 1, kind.name()))
    }

    /// Merge a restored data file into the current model
    pub fn restore(&mut self, path: &std::path::Path) -> Result<usize, PersistenceError> {
        let incoming = persistence::load_restore_source(path)?;
        let added = self.model.merge_from(incoming);
        log::info!("restored {added} item(s) from {}", path.display());
        Ok(added)
    }

    /// Write the model out if anything changed. The dirty flag is cleared
    /// only after the write succeeded.
    pub fn save(&mut self) -> Result<()> {
        if !self.model.is_dirty() {
            return Ok(());
        }
        save_model(&self.data_path, &self.model)
            .with_context(|| format!("Failed to save {}", self.data_path.display()))?;
        self.model.mark_saved();
        log::info!("saved {} items", self.model.item_count());
        Ok(())
    }
}
