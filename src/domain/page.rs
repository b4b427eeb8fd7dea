use super::item::Item;
use uuid::Uuid;

/// Result of organizing a page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrganizeOutcome {
    /// Whether the item order changed or anything was deleted
    pub changed: bool,
    /// Number of completed items deleted into the undo buffer
    pub deleted: usize,
}

/// One page of the model: an ordered item list plus a small undo buffer
/// holding recently removed items with their original positions.
///
/// Every mutating operation clears the undo buffer, except item-level
/// delete and organize, which replace its contents with what they removed.
#[derive(Debug, Clone, Default)]
pub struct PageModel {
    items: Vec<Item>,
    undo: Vec<(usize, Item)>,
}

impl PageModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items(items: Vec<Item>) -> Self {
        Self {
            items,
            undo: Vec::new(),
        }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn undo_size(&self) -> usize {
        self.undo.len()
    }

    /// Add a new item at the top of the page
    pub fn add_item(&mut self, item: Item) {
        self.undo.clear();
        self.items.insert(0, item);
    }

    /// Mutable access to an item for editing. Counts as a plain mutation,
    /// so the undo buffer is dropped.
    pub fn edit_item(&mut self, index: usize) -> Option<&mut Item> {
        if index >= self.items.len() {
            return None;
        }
        self.undo.clear();
        self.items.get_mut(index)
    }

    /// Delete one item, replacing the undo buffer with it
    pub fn remove_item(&mut self, index: usize) -> Option<Item> {
        if index >= self.items.len() {
            return None;
        }
        let item = self.items.remove(index);
        self.undo = vec![(index, item.clone())];
        Some(item)
    }

    /// Remove one item without recording undo state (cross-page moves)
    pub fn extract_item(&mut self, index: usize) -> Option<Item> {
        if index >= self.items.len() {
            return None;
        }
        self.undo.clear();
        Some(self.items.remove(index))
    }

    /// Drop the undo buffer
    pub fn clear_undo(&mut self) {
        self.undo.clear();
    }

    /// Remove every item from the page. Not undoable.
    pub fn clear(&mut self) -> usize {
        self.undo.clear();
        let removed = self.items.len();
        self.items.clear();
        removed
    }

    /// Sort the page into group order: active, locked-active, completed,
    /// locked-completed. The sort is stable within each group.
    ///
    /// With `delete_completed`, the two completed groups are removed from
    /// the page instead, recorded in the undo buffer with their
    /// pre-organize indices.
    pub fn organize(&mut self, delete_completed: bool) -> OrganizeOutcome {
        self.undo.clear();

        let before: Vec<Uuid> = self.items.iter().map(|i| i.id).collect();
        let old = std::mem::take(&mut self.items);

        let mut groups: [Vec<(usize, Item)>; 4] = Default::default();
        for (index, item) in old.into_iter().enumerate() {
            let group = match (item.is_completed, item.is_locked) {
                (false, false) => 0,
                (false, true) => 1,
                (true, false) => 2,
                (true, true) => 3,
            };
            groups[group].push((index, item));
        }

        let mut deleted = 0;
        if delete_completed {
            let mut removed: Vec<(usize, Item)> = groups[2].drain(..).collect();
            removed.extend(groups[3].drain(..));
            removed.sort_by_key(|(index, _)| *index);
            deleted = removed.len();
            self.undo = removed;
        }

        for group in &mut groups {
            for (_, item) in group.drain(..) {
                self.items.push(item);
            }
        }

        let after: Vec<Uuid> = self.items.iter().map(|i| i.id).collect();
        OrganizeOutcome {
            changed: deleted > 0 || before != after,
            deleted,
        }
    }

    /// Restore the undo buffer contents to their original positions.
    /// Returns the number of items put back.
    pub fn apply_undo(&mut self) -> usize {
        let mut buffered = std::mem::take(&mut self.undo);
        buffered.sort_by_key(|(index, _)| *index);

        let restored = buffered.len();
        for (index, item) in buffered {
            let at = index.min(self.items.len());
            self.items.insert(at, item);
        }
        restored
    }

    /// Remove and return the unlocked items, preserving order. Used by the
    /// rollover push; locked items keep their relative order on the page.
    pub fn take_unlocked(&mut self) -> Vec<Item> {
        self.undo.clear();
        let (unlocked, locked): (Vec<Item>, Vec<Item>) = std::mem::take(&mut self.items)
            .into_iter()
            .partition(|item| !item.is_locked);
        self.items = locked;
        unlocked
    }

    /// Remove and return every item, preserving order
    pub fn take_all(&mut self) -> Vec<Item> {
        self.undo.clear();
        std::mem::take(&mut self.items)
    }

    /// Append items at the end of the page (push target side)
    pub fn append_items(&mut self, items: Vec<Item>) {
        self.undo.clear();
        self.items.extend(items);
    }

    /// Whether the page already carries an equivalent item: same id, or
    /// byte-identical text. Used by merge-on-restore dedup.
    pub fn contains_similar(&self, item: &Item) -> bool {
        self.items
            .iter()
            .any(|existing| existing.id == item.id || existing.text == item.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn item(text: &str, completed: bool, locked: bool) -> Item {
        let mut it = Item::new(text.to_string());
        it.is_completed = completed;
        it.is_locked = locked;
        it
    }

    fn page(specs: &[(&str, bool, bool)]) -> PageModel {
        PageModel::from_items(
            specs
                .iter()
                .map(|(text, completed, locked)| item(text, *completed, *locked))
                .collect(),
        )
    }

    fn texts(page: &PageModel) -> Vec<&str> {
        page.items().iter().map(|i| i.text.as_str()).collect()
    }

    #[test]
    fn test_add_item_goes_on_top() {
        let mut page = page(&[("old", false, false)]);
        page.add_item(Item::new("new".to_string()));
        assert_eq!(texts(&page), vec!["new", "old"]);
    }

    #[test]
    fn test_organize_group_order_is_stable() {
        // Interleaved groups; within a group, page order must survive
        let mut page = page(&[
            ("done-a", true, false),
            ("active-a", false, false),
            ("locked-done-a", true, true),
            ("locked-a", false, true),
            ("active-b", false, false),
            ("done-b", true, false),
            ("locked-b", false, true),
        ]);

        let outcome = page.organize(false);
        assert!(outcome.changed);
        assert_eq!(outcome.deleted, 0);
        assert_eq!(
            texts(&page),
            vec![
                "active-a",
                "active-b",
                "locked-a",
                "locked-b",
                "done-a",
                "done-b",
                "locked-done-a",
            ]
        );
    }

    #[test]
    fn test_organize_already_sorted_reports_unchanged() {
        let mut page = page(&[
            ("active", false, false),
            ("locked", false, true),
            ("done", true, false),
        ]);

        let outcome = page.organize(false);
        assert!(!outcome.changed);
        assert_eq!(outcome.deleted, 0);
    }

    #[test]
    fn test_organize_delete_completed() {
        let mut page = page(&[
            ("done-a", true, false),
            ("active", false, false),
            ("locked-done", true, true),
        ]);

        let outcome = page.organize(true);
        assert!(outcome.changed);
        assert_eq!(outcome.deleted, 2);
        assert_eq!(texts(&page), vec!["active"]);
        assert_eq!(page.undo_size(), 2);
    }

    #[test]
    fn test_organize_delete_then_undo_restores_positions() {
        let mut page = page(&[
            ("done-a", true, false),
            ("active", false, false),
            ("done-b", true, false),
        ]);

        page.organize(true);
        assert_eq!(texts(&page), vec!["active"]);

        let restored = page.apply_undo();
        assert_eq!(restored, 2);
        assert_eq!(texts(&page), vec!["done-a", "active", "done-b"]);
        assert_eq!(page.undo_size(), 0);
    }

    #[test]
    fn test_remove_item_records_undo() {
        let mut page = page(&[
            ("first", false, false),
            ("second", false, false),
            ("third", false, false),
        ]);

        let removed = page.remove_item(1).unwrap();
        assert_eq!(removed.text, "second");
        assert_eq!(texts(&page), vec!["first", "third"]);
        assert_eq!(page.undo_size(), 1);

        let restored = page.apply_undo();
        assert_eq!(restored, 1);
        assert_eq!(texts(&page), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_remove_item_replaces_previous_undo() {
        let mut page = page(&[
            ("first", false, false),
            ("second", false, false),
        ]);

        page.remove_item(0);
        page.remove_item(0);
        assert_eq!(page.undo_size(), 1);

        page.apply_undo();
        // Only the second delete comes back
        assert_eq!(texts(&page), vec!["second"]);
    }

    #[test]
    fn test_remove_item_out_of_range() {
        let mut page = page(&[("only", false, false)]);
        assert!(page.remove_item(5).is_none());
        assert_eq!(page.len(), 1);
        assert_eq!(page.undo_size(), 0);
    }

    #[test]
    fn test_undo_index_clamped_after_shrink() {
        // A buffered index past the end of the list lands at the end
        let mut page = page(&[("a", false, false)]);
        page.undo = vec![(5, item("tail", false, false))];

        assert_eq!(page.apply_undo(), 1);
        assert_eq!(texts(&page), vec!["a", "tail"]);
    }

    #[test]
    fn test_plain_mutations_clear_undo() {
        let mut page = page(&[("a", false, false), ("b", false, false)]);

        page.remove_item(0);
        assert_eq!(page.undo_size(), 1);
        page.add_item(Item::new("c".to_string()));
        assert_eq!(page.undo_size(), 0);

        page.remove_item(0);
        assert_eq!(page.undo_size(), 1);
        page.edit_item(0).unwrap().toggle_completed();
        assert_eq!(page.undo_size(), 0);
    }

    #[test]
    fn test_take_unlocked_preserves_order() {
        let mut page = page(&[
            ("a", false, false),
            ("locked", false, true),
            ("b", true, false),
        ]);

        let taken = page.take_unlocked();
        let taken_texts: Vec<&str> = taken.iter().map(|i| i.text.as_str()).collect();
        assert_eq!(taken_texts, vec!["a", "b"]);
        assert_eq!(texts(&page), vec!["locked"]);
    }

    #[test]
    fn test_contains_similar() {
        let mut page = PageModel::new();
        let original = Item::new("Buy milk".to_string());
        page.add_item(original.clone());

        assert!(page.contains_similar(&original));

        let same_text = Item::new("Buy milk".to_string());
        assert!(page.contains_similar(&same_text));

        let different = Item::new("Walk dog".to_string());
        assert!(!page.contains_similar(&different));
    }
}
