//! Slot Visibility

use serde::{Deserialize, Serialize};

use super::allocator::{SlotIndex, MAX_REMOTE_VIDEOS};

/// What a visible slot is showing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibleTile {
    /// Attendee whose video is bound to the slot
    pub bound_attendee_id: String,
}

/// Which slots the rendering layer should show, and for whom
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibilityMap<const N: usize = MAX_REMOTE_VIDEOS> {
    entries: [Option<VisibleTile>; N],
}

impl<const N: usize> VisibilityMap<N> {
    pub fn new() -> Self {
        Self {
            entries: std::array::from_fn(|_| None),
        }
    }

    /// Mark a slot as showing an attendee. Out-of-range slots are ignored.
    pub fn show(&mut self, slot: SlotIndex, bound_attendee_id: impl Into<String>) {
        if let Some(entry) = self.entries.get_mut(slot) {
            *entry = Some(VisibleTile {
                bound_attendee_id: bound_attendee_id.into(),
            });
        }
    }

    /// Mark a slot as empty, returning what it showed
    pub fn clear(&mut self, slot: SlotIndex) -> Option<VisibleTile> {
        self.entries.get_mut(slot).and_then(Option::take)
    }

    pub fn get(&self, slot: SlotIndex) -> Option<&VisibleTile> {
        self.entries.get(slot).and_then(Option::as_ref)
    }

    pub fn is_visible(&self, slot: SlotIndex) -> bool {
        self.get(slot).is_some()
    }

    /// Number of visible slots (the size handed to the grid layout)
    pub fn visible_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_some()).count()
    }

    /// Visible slots in ascending order
    pub fn iter(&self) -> impl Iterator<Item = (SlotIndex, &VisibleTile)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(slot, entry)| entry.as_ref().map(|e| (slot, e)))
    }
}

impl<const N: usize> Default for VisibilityMap<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_and_clear() {
        let mut map: VisibilityMap = VisibilityMap::new();
        map.show(0, "alice");
        map.show(3, "bob");

        assert_eq!(map.visible_count(), 2);
        assert_eq!(map.get(3).unwrap().bound_attendee_id, "bob");
        assert!(!map.is_visible(1));

        let cleared = map.clear(0).unwrap();
        assert_eq!(cleared.bound_attendee_id, "alice");
        assert_eq!(map.clear(0), None);
        assert_eq!(map.visible_count(), 1);
    }

    #[test]
    fn test_show_overwrites() {
        let mut map = VisibilityMap::<4>::new();
        map.show(2, "alice");
        map.show(2, "carol");

        assert_eq!(map.visible_count(), 1);
        assert_eq!(map.get(2).unwrap().bound_attendee_id, "carol");
    }

    #[test]
    fn test_out_of_range_ignored() {
        let mut map = VisibilityMap::<4>::new();
        map.show(4, "alice");
        map.show(100, "bob");

        assert_eq!(map.visible_count(), 0);
        assert_eq!(map.clear(4), None);
        assert_eq!(map.get(4), None);
    }

    #[test]
    fn test_iter_order() {
        let mut map = VisibilityMap::<8>::new();
        map.show(5, "e");
        map.show(1, "a");

        let slots: Vec<SlotIndex> = map.iter().map(|(slot, _)| slot).collect();
        assert_eq!(slots, vec![1, 5]);
    }
}
