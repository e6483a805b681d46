//! Tile event handlers

use tracing::debug;

use crate::error::Result;
use crate::roster::Roster;
use crate::sdk::{TileId, TileState};
use crate::slots::{SlotIndex, TileSlots, VisibilityMap};

use super::types::{GridSnapshot, SlotView};

/// Everything a grid instance owns
#[derive(Debug, Default)]
pub(super) struct GridState {
    pub slots: TileSlots,
    pub visibility: VisibilityMap,
    pub roster: Roster,
}

/// Outcome of an accepted tile update
#[derive(Debug, PartialEq, Eq)]
pub(super) struct TileBound {
    pub tile_id: TileId,
    pub slot: SlotIndex,
    /// Whether the visible set changed
    pub visibility_changed: bool,
}

impl GridState {
    pub fn snapshot(&self) -> GridSnapshot {
        let slots = (0..self.slots.capacity())
            .map(|slot| {
                let attendee_id = self
                    .visibility
                    .get(slot)
                    .map(|v| v.bound_attendee_id.clone());
                let attendee_name = attendee_id
                    .as_deref()
                    .and_then(|id| self.roster.name(id))
                    .map(str::to_string);
                SlotView {
                    slot,
                    tile_id: self.slots.tile_at(slot),
                    attendee_id,
                    attendee_name,
                }
            })
            .collect();

        GridSnapshot {
            capacity: self.slots.capacity(),
            visible_count: self.visibility.visible_count(),
            slots,
        }
    }
}

/// Handle a tile update.
///
/// Returns `Ok(None)` for tiles that do not belong in the remote grid; those
/// leave the state untouched.
pub(super) fn handle_tile_updated(state: &mut GridState, tile: &TileState) -> Result<Option<TileBound>> {
    let Some((tile_id, attendee_id)) = tile.remote_video() else {
        debug!("Skipping tile {} (local, content or unbound)", tile.tile_id);
        return Ok(None);
    };

    let slot = state.slots.acquire(tile_id)?;

    let visibility_changed = state
        .visibility
        .get(slot)
        .map_or(true, |v| v.bound_attendee_id != attendee_id);
    if visibility_changed {
        state.visibility.show(slot, attendee_id);
    }

    Ok(Some(TileBound {
        tile_id,
        slot,
        visibility_changed,
    }))
}

/// Handle a tile removal. Returns the freed slot, if the tile held one.
pub(super) fn handle_tile_removed(state: &mut GridState, tile_id: TileId) -> Option<SlotIndex> {
    let slot = state.slots.release(tile_id)?;
    state.visibility.clear(slot);
    Some(slot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GridError;

    #[test]
    fn test_update_binds_and_shows() {
        let mut state = GridState::default();
        let bound = handle_tile_updated(&mut state, &TileState::remote(11, "alice"))
            .unwrap()
            .unwrap();

        assert_eq!(
            bound,
            TileBound {
                tile_id: TileId::new(11),
                slot: 0,
                visibility_changed: true
            }
        );
        assert_eq!(state.visibility.get(0).unwrap().bound_attendee_id, "alice");
    }

    #[test]
    fn test_repeat_update_is_stable() {
        let mut state = GridState::default();
        handle_tile_updated(&mut state, &TileState::remote(11, "alice")).unwrap();
        let again = handle_tile_updated(&mut state, &TileState::remote(11, "alice"))
            .unwrap()
            .unwrap();

        assert_eq!(again.slot, 0);
        assert!(!again.visibility_changed);
        assert_eq!(state.visibility.visible_count(), 1);
    }

    #[test]
    fn test_repeat_update_new_attendee_relabels() {
        let mut state = GridState::default();
        handle_tile_updated(&mut state, &TileState::remote(11, "alice")).unwrap();
        handle_tile_updated(&mut state, &TileState::remote(12, "bob")).unwrap();

        let again = handle_tile_updated(&mut state, &TileState::remote(11, "carol"))
            .unwrap()
            .unwrap();

        assert_eq!(again.slot, 0);
        assert!(again.visibility_changed);
        assert_eq!(state.visibility.get(0).unwrap().bound_attendee_id, "carol");
        assert_eq!(state.visibility.visible_count(), 2);
        assert_eq!(state.slots.occupied(), 2);
    }

    #[test]
    fn test_filtered_update_touches_nothing() {
        let mut state = GridState::default();
        let mut local = TileState::remote(1, "me");
        local.local_tile = true;

        assert_eq!(handle_tile_updated(&mut state, &local).unwrap(), None);
        assert_eq!(state.slots.occupied(), 0);
        assert_eq!(state.visibility.visible_count(), 0);
    }

    #[test]
    fn test_exhausted_update_shows_nothing() {
        let mut state = GridState::default();
        for id in 1..=16 {
            handle_tile_updated(&mut state, &TileState::remote(id, format!("a{}", id))).unwrap();
        }

        let err = handle_tile_updated(&mut state, &TileState::remote(17, "late")).unwrap_err();
        assert!(matches!(err, GridError::SlotExhausted { .. }));
        assert_eq!(state.visibility.visible_count(), 16);
        assert!(state.visibility.iter().all(|(_, v)| v.bound_attendee_id != "late"));
    }

    #[test]
    fn test_removal_clears_slot() {
        let mut state = GridState::default();
        handle_tile_updated(&mut state, &TileState::remote(1, "alice")).unwrap();
        handle_tile_updated(&mut state, &TileState::remote(2, "bob")).unwrap();

        assert_eq!(handle_tile_removed(&mut state, TileId::new(1)), Some(0));
        assert!(!state.visibility.is_visible(0));
        assert!(state.visibility.is_visible(1));
        assert_eq!(handle_tile_removed(&mut state, TileId::new(1)), None);
    }

    #[test]
    fn test_snapshot_uses_roster() {
        let mut state = GridState::default();
        state.roster.set_name("alice", "Alice");
        handle_tile_updated(&mut state, &TileState::remote(1, "alice")).unwrap();
        handle_tile_updated(&mut state, &TileState::remote(2, "bob")).unwrap();

        let snapshot = state.snapshot();
        assert_eq!(snapshot.capacity, 16);
        assert_eq!(snapshot.slots.len(), 16);
        assert_eq!(snapshot.visible_count, 2);
        assert_eq!(snapshot.slots[0].attendee_name.as_deref(), Some("Alice"));
        assert_eq!(snapshot.slots[1].attendee_id.as_deref(), Some("bob"));
        assert_eq!(snapshot.slots[1].attendee_name, None);
        assert_eq!(snapshot.slots[2].tile_id, None);
    }
}
