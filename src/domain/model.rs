use super::enums::{ItemColor, LockExpirationPolicy, PageKind, PushScope};
use super::item::Item;
use super::page::{OrganizeOutcome, PageModel};
use chrono::{Datelike, NaiveDate};

/// Date stamp format used for `last_push_date` ("20260807")
const STAMP_FORMAT: &str = "%Y%m%d";

/// Format a date as a push stamp
pub fn date_stamp(date: NaiveDate) -> String {
    date.format(STAMP_FORMAT).to_string()
}

/// Parse a push stamp back into a date
pub fn parse_date_stamp(stamp: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(stamp, STAMP_FORMAT).ok()
}

/// Decide how much of the tomorrow page a rollover moves.
///
/// The condition ladder: no rollover at all when the stamp is today's;
/// otherwise locks survive unless the rollover crossed the boundary the
/// policy names. A missing or corrupt stamp counts as a rollover with no
/// lock expiry; the push rewrites the stamp, so the state self-heals.
pub fn compute_push_scope(
    last_push_date: &str,
    today: NaiveDate,
    policy: LockExpirationPolicy,
) -> PushScope {
    if last_push_date == date_stamp(today) {
        return PushScope::None;
    }

    let last = match parse_date_stamp(last_push_date) {
        Some(date) => date,
        None => return PushScope::UnlockedOnly,
    };

    let expired = match policy {
        LockExpirationPolicy::Never => false,
        LockExpirationPolicy::Weekly => {
            let a = today.iso_week();
            let b = last.iso_week();
            (a.year(), a.week()) != (b.year(), b.week())
        }
        LockExpirationPolicy::Monthly => (today.year(), today.month()) != (last.year(), last.month()),
    };

    if expired {
        PushScope::All
    } else {
        PushScope::UnlockedOnly
    }
}

/// The whole in-memory model: both pages, the dirty flag, and the stamp
/// recording when items last moved tomorrow -> today.
#[derive(Debug, Clone, Default)]
pub struct AppModel {
    today: PageModel,
    tomorrow: PageModel,
    is_dirty: bool,
    last_push_date: String,
}

impl AppModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assemble a model from loaded parts. The result starts clean.
    pub fn from_parts(today: Vec<Item>, tomorrow: Vec<Item>, last_push_date: String) -> Self {
        Self {
            today: PageModel::from_items(today),
            tomorrow: PageModel::from_items(tomorrow),
            is_dirty: false,
            last_push_date,
        }
    }

    pub fn page(&self, kind: PageKind) -> &PageModel {
        match kind {
            PageKind::Today => &self.today,
            PageKind::Tomorrow => &self.tomorrow,
        }
    }

    fn page_mut(&mut self, kind: PageKind) -> &mut PageModel {
        match kind {
            PageKind::Today => &mut self.today,
            PageKind::Tomorrow => &mut self.tomorrow,
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.is_dirty
    }

    /// Called after the model was successfully written to disk
    pub fn mark_saved(&mut self) {
        self.is_dirty = false;
    }

    pub fn last_push_date(&self) -> &str {
        &self.last_push_date
    }

    pub fn item_count(&self) -> usize {
        self.today.len() + self.tomorrow.len()
    }

    pub fn add_item(&mut self, kind: PageKind, item: Item) {
        self.page_mut(kind).add_item(item);
        self.is_dirty = true;
    }

    /// Apply an edit closure to one item. Returns false when the index is
    /// out of range; the model is marked dirty only when the item exists.
    pub fn edit_item<F>(&mut self, kind: PageKind, index: usize, edit: F) -> bool
    where
        F: FnOnce(&mut Item),
    {
        let page = self.page_mut(kind);
        match page.edit_item(index) {
            Some(item) => {
                edit(item);
                self.is_dirty = true;
                true
            }
            None => false,
        }
    }

    pub fn set_item_text(&mut self, kind: PageKind, index: usize, text: String) -> bool {
        self.edit_item(kind, index, |item| item.set_text(text))
    }

    pub fn toggle_item_completed(&mut self, kind: PageKind, index: usize) -> bool {
        self.edit_item(kind, index, |item| item.toggle_completed())
    }

    pub fn toggle_item_locked(&mut self, kind: PageKind, index: usize) -> bool {
        self.edit_item(kind, index, |item| item.toggle_locked())
    }

    pub fn set_item_color(&mut self, kind: PageKind, index: usize, color: ItemColor) -> bool {
        self.edit_item(kind, index, |item| item.set_color(color))
    }

    pub fn cycle_item_color(&mut self, kind: PageKind, index: usize) -> bool {
        self.edit_item(kind, index, |item| item.cycle_color())
    }

    /// Item-level delete; the page records it for undo
    pub fn remove_item(&mut self, kind: PageKind, index: usize) -> Option<Item> {
        let removed = self.page_mut(kind).remove_item(index);
        if removed.is_some() {
            self.is_dirty = true;
        }
        removed
    }

    /// Move an item to the top of the other page. Items landing on today
    /// shed their lock; locks only hold items back on the tomorrow page.
    pub fn move_item_to_other_page(&mut self, kind: PageKind, index: usize) -> bool {
        let Some(mut item) = self.page_mut(kind).extract_item(index) else {
            return false;
        };
        if kind.other() == PageKind::Today {
            item.expire_lock();
        }
        self.page_mut(kind.other()).add_item(item);
        self.is_dirty = true;
        true
    }

    pub fn organize_page(&mut self, kind: PageKind, delete_completed: bool) -> OrganizeOutcome {
        let outcome = self.page_mut(kind).organize(delete_completed);
        if outcome.changed {
            self.is_dirty = true;
        }
        outcome
    }

    pub fn undo_page(&mut self, kind: PageKind) -> usize {
        let restored = self.page_mut(kind).apply_undo();
        if restored > 0 {
            self.is_dirty = true;
        }
        restored
    }

    pub fn clear_page(&mut self, kind: PageKind) -> usize {
        let removed = self.page_mut(kind).clear();
        if removed > 0 {
            self.is_dirty = true;
        }
        removed
    }

    /// Apply a rollover push for `today`, using the already-computed scope.
    /// Even a push that moves nothing stamps the date, so the ladder is not
    /// re-evaluated (and undo buffers not re-cleared) on every later call.
    pub fn push_to_today(&mut self, scope: PushScope, today: NaiveDate) -> usize {
        let moved = match scope {
            PushScope::None => return 0,
            PushScope::UnlockedOnly => self.tomorrow.take_unlocked(),
            PushScope::All => {
                let mut items = self.tomorrow.take_all();
                for item in &mut items {
                    item.expire_lock();
                }
                items
            }
        };

        let count = moved.len();
        self.today.append_items(moved);
        self.tomorrow.clear_undo();
        self.last_push_date = date_stamp(today);
        self.is_dirty = true;
        count
    }

    /// Compute and apply the pending rollover in one step. Returns the
    /// scope that was applied and how many items moved.
    pub fn maybe_push(
        &mut self,
        today: NaiveDate,
        policy: LockExpirationPolicy,
    ) -> (PushScope, usize) {
        let scope = compute_push_scope(&self.last_push_date, today, policy);
        let moved = self.push_to_today(scope, today);
        (scope, moved)
    }

    /// Merge a restored model into this one. Items already present on the
    /// same page (same id, or identical text) are skipped; the current
    /// `last_push_date` wins. Returns the number of items added.
    pub fn merge_from(&mut self, other: AppModel) -> usize {
        let mut added = 0;
        for kind in [PageKind::Today, PageKind::Tomorrow] {
            let incoming = other.page(kind).items().to_vec();
            let page = self.page_mut(kind);
            let fresh: Vec<Item> = incoming
                .into_iter()
                .filter(|item| !page.contains_similar(item))
                .collect();
            added += fresh.len();
            page.append_items(fresh);
        }

        self.today.clear_undo();
        self.tomorrow.clear_undo();
        if added > 0 {
            self.is_dirty = true;
        }
        added
    }
}
