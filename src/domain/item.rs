use super::enums::ItemColor;
use chrono::{DateTime, Local};
use uuid::Uuid;

/// A single to-do item
#[derive(Debug, Clone)]
pub struct Item {
    /// Unique ID for internal references and merge dedup
    pub id: Uuid,
    /// Item text as entered by the user
    pub text: String,
    /// Whether the item has been completed
    pub is_completed: bool,
    /// Whether the item is locked to the tomorrow page across rollovers
    pub is_locked: bool,
    /// Color tag
    pub color: ItemColor,
    /// When the item was created
    pub created: DateTime<Local>,
    /// When the item was last modified
    pub updated: DateTime<Local>,
}

impl Item {
    pub fn new(text: String) -> Self {
        let now = Local::now();
        Self {
            id: Uuid::new_v4(),
            text,
            is_completed: false,
            is_locked: false,
            color: ItemColor::None,
            created: now,
            updated: now,
        }
    }

    /// Replace the item text
    pub fn set_text(&mut self, text: String) {
        self.text = text;
        self.touch();
    }

    pub fn toggle_completed(&mut self) {
        self.is_completed = !self.is_completed;
        self.touch();
    }

    pub fn toggle_locked(&mut self) {
        self.is_locked = !self.is_locked;
        self.touch();
    }

    pub fn set_color(&mut self, color: ItemColor) {
        self.color = color;
        self.touch();
    }

    /// Advance the color tag to the next one in the cycle
    pub fn cycle_color(&mut self) {
        self.color = self.color.next();
        self.touch();
    }

    /// Clear the lock without counting as a user edit (used when a lock
    /// expires during a rollover push)
    pub fn expire_lock(&mut self) {
        self.is_locked = false;
    }

    fn touch(&mut self) {
        self.updated = Local::now();
    }
}
