//! Tile Slot Allocation

use tracing::{debug, warn};

use crate::error::{GridError, Result};
use crate::sdk::TileId;

/// Number of remote video sinks the grid renders
pub const MAX_REMOTE_VIDEOS: usize = 16;

/// Position of a video sink in the grid, in `0..N`
pub type SlotIndex = usize;

/// Fixed-size table of which tile occupies which slot.
///
/// Slots are handed out lowest-index-first, so tiles arriving after a removal
/// fill the gap instead of growing the grid. A tile keeps its slot for as long
/// as it stays bound. Both operations are linear scans; `N` is a small
/// UI-bounded constant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileSlots<const N: usize = MAX_REMOTE_VIDEOS> {
    slots: [Option<TileId>; N],
}

impl<const N: usize> TileSlots<N> {
    /// Create an empty table
    pub fn new() -> Self {
        Self { slots: [None; N] }
    }

    /// Number of slots
    pub fn capacity(&self) -> usize {
        N
    }

    /// Get the slot for a tile, assigning the lowest free one if it has none.
    ///
    /// Re-acquiring a bound tile returns its current slot without touching
    /// the table. Fails with [`GridError::SlotExhausted`] when every slot is
    /// held by another tile; the table is left unchanged in that case.
    pub fn acquire(&mut self, tile_id: TileId) -> Result<SlotIndex> {
        if let Some(slot) = self.slot_of(tile_id) {
            return Ok(slot);
        }

        match self.slots.iter().position(Option::is_none) {
            Some(slot) => {
                self.slots[slot] = Some(tile_id);
                debug!("Tile {} acquired slot {}", tile_id, slot);
                Ok(slot)
            }
            None => {
                warn!("No free slot for tile {} ({} in use)", tile_id, N);
                Err(GridError::SlotExhausted {
                    tile_id,
                    capacity: N,
                })
            }
        }
    }

    /// Free the slot held by a tile.
    ///
    /// Returns `None` if the tile never held a slot (e.g. it was filtered out
    /// before acquire), which callers treat as nothing to do.
    pub fn release(&mut self, tile_id: TileId) -> Option<SlotIndex> {
        let slot = self.slot_of(tile_id)?;
        self.slots[slot] = None;
        debug!("Tile {} released slot {}", tile_id, slot);
        Some(slot)
    }

    /// Slot currently held by a tile
    pub fn slot_of(&self, tile_id: TileId) -> Option<SlotIndex> {
        self.slots.iter().position(|t| *t == Some(tile_id))
    }

    /// Tile currently held in a slot
    pub fn tile_at(&self, slot: SlotIndex) -> Option<TileId> {
        self.slots.get(slot).copied().flatten()
    }

    /// Number of occupied slots
    pub fn occupied(&self) -> usize {
        self.slots.iter().filter(|t| t.is_some()).count()
    }

    pub fn is_full(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// Occupied slots in ascending order
    pub fn iter(&self) -> impl Iterator<Item = (SlotIndex, TileId)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(slot, tile)| tile.map(|t| (slot, t)))
    }
}

impl<const N: usize> Default for TileSlots<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile(id: u64) -> TileId {
        TileId::new(id)
    }

    #[test]
    fn test_distinct_slots_in_range() {
        let mut slots: TileSlots = TileSlots::new();
        let mut seen = Vec::new();

        for id in 1..=MAX_REMOTE_VIDEOS as u64 {
            let slot = slots.acquire(tile(id * 7)).unwrap();
            assert!(slot < MAX_REMOTE_VIDEOS);
            assert!(!seen.contains(&slot));
            seen.push(slot);
        }
        assert!(slots.is_full());
    }

    #[test]
    fn test_reacquire_keeps_slot() {
        let mut slots: TileSlots = TileSlots::new();
        let a = slots.acquire(tile(5)).unwrap();
        slots.acquire(tile(6)).unwrap();

        assert_eq!(slots.acquire(tile(5)).unwrap(), a);
        assert_eq!(slots.acquire(tile(5)).unwrap(), a);
        assert_eq!(slots.occupied(), 2);
    }

    #[test]
    fn test_reacquire_when_full() {
        let mut slots = TileSlots::<2>::new();
        slots.acquire(tile(1)).unwrap();
        slots.acquire(tile(2)).unwrap();

        // A bound tile updating again must not hit the capacity cap
        assert_eq!(slots.acquire(tile(2)).unwrap(), 1);
    }

    #[test]
    fn test_exhausted() {
        let mut slots = TileSlots::<3>::new();
        for id in 1..=3 {
            slots.acquire(tile(id)).unwrap();
        }
        let before = slots.clone();

        let err = slots.acquire(tile(4)).unwrap_err();
        assert_eq!(
            err,
            GridError::SlotExhausted {
                tile_id: tile(4),
                capacity: 3
            }
        );
        assert_eq!(slots, before);
    }

    #[test]
    fn test_lowest_free_slot_reused() {
        let mut slots: TileSlots = TileSlots::new();
        for id in 1..=5 {
            slots.acquire(tile(id)).unwrap();
        }
        assert_eq!(slots.release(tile(4)), Some(3));
        assert_eq!(slots.release(tile(2)), Some(1));

        assert_eq!(slots.acquire(tile(10)).unwrap(), 1);
        assert_eq!(slots.acquire(tile(11)).unwrap(), 3);
        assert_eq!(slots.acquire(tile(12)).unwrap(), 5);
    }

    #[test]
    fn test_release_unknown_tile() {
        let mut slots: TileSlots = TileSlots::new();
        slots.acquire(tile(1)).unwrap();
        let before = slots.clone();

        assert_eq!(slots.release(tile(99)), None);
        assert_eq!(slots, before);
    }

    #[test]
    fn test_release_twice() {
        let mut slots: TileSlots = TileSlots::new();
        slots.acquire(tile(1)).unwrap();

        assert_eq!(slots.release(tile(1)), Some(0));
        assert_eq!(slots.release(tile(1)), None);
        assert_eq!(slots.occupied(), 0);
    }

    #[test]
    fn test_scenario_gap_fill() {
        let mut slots: TileSlots = TileSlots::new();
        assert_eq!(slots.acquire(tile(101)).unwrap(), 0);
        assert_eq!(slots.acquire(tile(102)).unwrap(), 1);
        assert_eq!(slots.release(tile(101)), Some(0));
        assert_eq!(slots.acquire(tile(103)).unwrap(), 0);
        assert_eq!(slots.acquire(tile(104)).unwrap(), 2);
    }

    #[test]
    fn test_scenario_full_grid() {
        let mut slots: TileSlots = TileSlots::new();
        for id in 1..=16u64 {
            assert_eq!(slots.acquire(tile(id)).unwrap(), (id - 1) as usize);
        }

        assert!(matches!(
            slots.acquire(tile(17)),
            Err(GridError::SlotExhausted { capacity: 16, .. })
        ));
        assert_eq!(slots.release(tile(8)), Some(7));
        assert_eq!(slots.acquire(tile(18)).unwrap(), 7);
    }

    #[test]
    fn test_lookups() {
        let mut slots = TileSlots::<4>::new();
        slots.acquire(tile(40)).unwrap();
        slots.acquire(tile(41)).unwrap();
        slots.release(tile(40));

        assert_eq!(slots.capacity(), 4);
        assert_eq!(slots.slot_of(tile(41)), Some(1));
        assert_eq!(slots.tile_at(0), None);
        assert_eq!(slots.tile_at(1), Some(tile(41)));
        assert_eq!(slots.tile_at(9), None);
        assert_eq!(slots.iter().collect::<Vec<_>>(), vec![(1, tile(41))]);
    }
}
