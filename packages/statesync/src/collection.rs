//! Merge primitives shared by slice reducers.
//!
//! Every list-backed slice follows the same rules:
//!
//! | operation | rule |
//! |-----------|------|
//! | fresh load | replace the sequence wholesale |
//! | next page | append incoming items after existing ones |
//! | update | replace the item with the same id in place, no insert on miss |
//! | delete | drop the item with the same id, no-op on miss |
//! | create | prepend (newest first) |
//!
//! Appending a page is plain concatenation. Callers must request
//! non-overlapping pages; overlap is reported through `tracing` but never
//! repaired, since consumers may depend on raw server ordering.

use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// A record with a stable identity.
pub trait Identified {
    /// The identity type.
    type Id: Clone + Eq + Hash + fmt::Debug;

    /// The identity of this record.
    fn id(&self) -> &Self::Id;
}

/// An ordered sequence of identified records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Collection<T>(Vec<T>);

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<T: Identified> Collection<T> {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Merge a loaded page: replace when `fresh`, append otherwise.
    pub fn merge_page(self, incoming: Vec<T>, fresh: bool) -> Self {
        if fresh {
            self.replace_all(incoming)
        } else {
            self.append(incoming)
        }
    }

    /// Replace the whole sequence.
    pub fn replace_all(self, incoming: Vec<T>) -> Self {
        Self(incoming)
    }

    /// Append items after the existing ones.
    pub fn append(mut self, incoming: Vec<T>) -> Self {
        let overlap = self.overlap_with(&incoming);
        if overlap > 0 {
            warn!(
                overlap,
                incoming = incoming.len(),
                "appended page overlaps existing items"
            );
        }
        self.0.extend(incoming);
        self
    }

    /// Replace the item with the same id as `updated`, keeping its position.
    ///
    /// Leaves the collection untouched when no item matches.
    pub fn update(mut self, updated: T) -> Self {
        if let Some(slot) = self.0.iter_mut().find(|item| item.id() == updated.id()) {
            *slot = updated;
        }
        self
    }

    /// Remove the item with the given id, if present.
    pub fn remove(mut self, id: &T::Id) -> Self {
        self.0.retain(|item| item.id() != id);
        self
    }

    /// Insert an item at the front.
    pub fn prepend(mut self, item: T) -> Self {
        self.0.insert(0, item);
        self
    }

    /// Find an item by id.
    pub fn get(&self, id: &T::Id) -> Option<&T> {
        self.0.iter().find(|item| item.id() == id)
    }

    /// Returns true if an item with the given id is present.
    pub fn contains(&self, id: &T::Id) -> bool {
        self.get(id).is_some()
    }

    /// Ids in sequence order.
    pub fn ids(&self) -> Vec<T::Id> {
        self.0.iter().map(|item| item.id().clone()).collect()
    }

    /// Returns true if no id appears twice.
    pub fn has_unique_ids(&self) -> bool {
        let mut seen = HashSet::with_capacity(self.0.len());
        self.0.iter().all(|item| seen.insert(item.id()))
    }

    fn overlap_with(&self, incoming: &[T]) -> usize {
        if self.0.is_empty() || incoming.is_empty() {
            return 0;
        }
        let existing: HashSet<&T::Id> = self.0.iter().map(Identified::id).collect();
        incoming
            .iter()
            .filter(|item| existing.contains(item.id()))
            .count()
    }
}

impl<T> Collection<T> {
    /// Items as a slice.
    pub fn as_slice(&self) -> &[T] {
        &self.0
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the items in order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.0.iter()
    }

    /// Consume into the underlying vector.
    pub fn into_vec(self) -> Vec<T> {
        self.0
    }
}

impl<T> From<Vec<T>> for Collection<T> {
    fn from(items: Vec<T>) -> Self {
        Self(items)
    }
}

impl<T> FromIterator<T> for Collection<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a, T> IntoIterator for &'a Collection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// =============================================================================
// Loading Flags
// =============================================================================

/// Named in-progress flag of a slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Flag {
    /// A create/update request is running.
    IsSaving,
    /// A delete request is running.
    IsDeleting,
    /// A list fetch is running.
    IsLoading,
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Flag::IsSaving => write!(f, "isSaving"),
            Flag::IsDeleting => write!(f, "isDeleting"),
            Flag::IsLoading => write!(f, "isLoading"),
        }
    }
}

/// Spinner flags of a slice, one per operation kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadingFlags {
    pub is_saving: bool,
    pub is_deleting: bool,
    pub is_loading: bool,
}

impl LoadingFlags {
    /// Set exactly one flag, leaving the others untouched.
    pub fn set(self, flag: Flag, value: bool) -> Self {
        match flag {
            Flag::IsSaving => Self {
                is_saving: value,
                ..self
            },
            Flag::IsDeleting => Self {
                is_deleting: value,
                ..self
            },
            Flag::IsLoading => Self {
                is_loading: value,
                ..self
            },
        }
    }

    /// Read one flag.
    pub fn get(&self, flag: Flag) -> bool {
        match flag {
            Flag::IsSaving => self.is_saving,
            Flag::IsDeleting => self.is_deleting,
            Flag::IsLoading => self.is_loading,
        }
    }

    /// Returns true if any flag is set.
    pub fn any(&self) -> bool {
        self.is_saving || self.is_deleting || self.is_loading
    }

    /// All flags cleared.
    pub fn cleared() -> Self {
        Self::default()
    }
}

// =============================================================================
// Pagination
// =============================================================================

/// Page metadata reported by the remote collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub current_page: u32,
    pub last_page: u32,
}

impl PageInfo {
    /// Metadata for a single page holding everything.
    pub fn single() -> Self {
        Self {
            current_page: 1,
            last_page: 1,
        }
    }
}

/// Pagination cursor of a list slice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageCursor {
    /// Last page merged into the slice (0 when nothing was loaded).
    pub page: u32,
    /// Whether the collaborator reported more pages.
    pub has_more: bool,
}

impl PageCursor {
    /// Record a merged page.
    pub fn record(self, info: PageInfo) -> Self {
        Self {
            page: info.current_page,
            has_more: info.current_page < info.last_page,
        }
    }

    /// The page to request next.
    pub fn next_page(&self) -> u32 {
        self.page + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: u32,
        label: &'static str,
    }

    impl Identified for Item {
        type Id = u32;

        fn id(&self) -> &u32 {
            &self.id
        }
    }

    fn item(id: u32, label: &'static str) -> Item {
        Item { id, label }
    }

    fn collection(ids: &[u32]) -> Collection<Item> {
        ids.iter().map(|id| item(*id, "x")).collect()
    }

    #[test]
    fn test_fresh_then_next_page_preserves_order() {
        let merged = Collection::new()
            .merge_page(vec![item(1, "a"), item(2, "b")], true)
            .merge_page(vec![item(3, "c"), item(4, "d")], false);

        assert_eq!(merged.ids(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_fresh_replaces_existing_items() {
        let merged = collection(&[1, 2, 3]).merge_page(vec![item(9, "z")], true);
        assert_eq!(merged.ids(), vec![9]);
    }

    #[test]
    fn test_append_is_plain_concatenation() {
        // Overlapping pages are kept as-is; callers own page boundaries.
        let merged = collection(&[1, 2]).append(vec![item(2, "b"), item(3, "c")]);
        assert_eq!(merged.ids(), vec![1, 2, 2, 3]);
        assert!(!merged.has_unique_ids());
    }

    #[test]
    fn test_update_replaces_in_place() {
        let updated = collection(&[1, 2, 3]).update(item(2, "new"));
        assert_eq!(updated.ids(), vec![1, 2, 3]);
        assert_eq!(updated.get(&2).unwrap().label, "new");
    }

    #[test]
    fn test_update_is_idempotent() {
        let once = collection(&[1, 2, 3]).update(item(2, "new"));
        let twice = once.clone().update(item(2, "new"));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_update_miss_does_not_insert() {
        let before = collection(&[1, 2]);
        let after = before.clone().update(item(7, "ghost"));
        assert_eq!(before, after);
    }

    #[test]
    fn test_remove_missing_id_is_noop() {
        let before = collection(&[1, 2]);
        let after = before.clone().remove(&42);
        assert_eq!(before, after);
    }

    #[test]
    fn test_remove_drops_matching_item() {
        let after = collection(&[1, 2, 3]).remove(&2);
        assert_eq!(after.ids(), vec![1, 3]);
    }

    #[test]
    fn test_prepend_puts_newest_first() {
        let after = collection(&[1, 2]).prepend(item(7, "new"));
        assert_eq!(after.ids(), vec![7, 1, 2]);
    }

    #[test]
    fn test_flag_isolation() {
        let flags = LoadingFlags {
            is_saving: false,
            is_deleting: true,
            is_loading: false,
        };
        let flags = flags.set(Flag::IsSaving, true);
        assert!(flags.is_saving);
        assert!(flags.is_deleting);
        assert!(!flags.is_loading);
    }

    #[test]
    fn test_flag_names_match_wire_names() {
        assert_eq!(Flag::IsSaving.to_string(), "isSaving");
        let json = serde_json::to_value(LoadingFlags::cleared()).unwrap();
        assert_eq!(json["isDeleting"], false);
    }

    #[test]
    fn test_page_cursor_tracks_remaining_pages() {
        let cursor = PageCursor::default().record(PageInfo {
            current_page: 1,
            last_page: 3,
        });
        assert!(cursor.has_more);
        assert_eq!(cursor.next_page(), 2);

        let cursor = cursor.record(PageInfo {
            current_page: 3,
            last_page: 3,
        });
        assert!(!cursor.has_more);
    }
}
