//! Grid instance and its SDK subscription

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::sdk::{ObserverRegistry, Subscription, TileId, TileState, VideoTileObserver};
use crate::slots::SlotIndex;

use super::handlers::{handle_tile_removed, handle_tile_updated, GridState};
use super::types::{GridCallback, GridSnapshot};

/// Remote video grid.
///
/// Owns the slot table, visibility map and roster for one mounted grid. The
/// lock is never held while calling back into the rendering layer.
#[derive(Default)]
pub struct RemoteVideoGrid {
    state: Mutex<GridState>,
    callback: RwLock<Option<Arc<dyn GridCallback>>>,
}

impl RemoteVideoGrid {
    /// Create an empty grid
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a grid and subscribe it to the SDK's tile events
    pub fn mount(registry: &ObserverRegistry) -> MountedGrid {
        let grid = Arc::new(Self::new());
        let subscription = registry.add_observer(grid.clone());
        info!("Remote video grid mounted");
        MountedGrid { grid, subscription }
    }

    /// Set the rendering callback
    pub fn set_callback(&self, callback: Arc<dyn GridCallback>) {
        *self.callback.write() = Some(callback);
    }

    /// Handle a tile update from the SDK.
    ///
    /// Returns the tile's slot, or `None` when the tile does not belong in the
    /// remote grid. [`crate::GridError::SlotExhausted`] is reported to the
    /// callback and returned; the tile is not bound.
    pub fn handle_tile_updated(&self, tile: &TileState) -> Result<Option<SlotIndex>> {
        let outcome = {
            let mut state = self.state.lock();
            match handle_tile_updated(&mut state, tile) {
                Ok(Some(bound)) => {
                    let snapshot = bound.visibility_changed.then(|| state.snapshot());
                    Ok(Some((bound, snapshot)))
                }
                Ok(None) => Ok(None),
                Err(e) => Err(e),
            }
        };

        let callback = self.callback.read().clone();
        match outcome {
            Ok(Some((bound, snapshot))) => {
                if let Some(cb) = callback.as_ref() {
                    cb.bind_video_sink(bound.tile_id, bound.slot);
                    if let Some(snapshot) = snapshot {
                        cb.on_visibility_changed(snapshot);
                    }
                }
                Ok(Some(bound.slot))
            }
            Ok(None) => Ok(None),
            Err(e) => {
                warn!("Tile update rejected: {}", e);
                if let Some(cb) = callback.as_ref() {
                    cb.on_error(e.to_string());
                }
                Err(e)
            }
        }
    }

    /// Handle a tile removal from the SDK.
    ///
    /// Returns the freed slot; tiles that never held one are ignored.
    pub fn handle_tile_removed(&self, tile_id: TileId) -> Option<SlotIndex> {
        let (slot, snapshot) = {
            let mut state = self.state.lock();
            let slot = handle_tile_removed(&mut state, tile_id);
            let snapshot = slot.map(|_| state.snapshot());
            (slot, snapshot)
        };

        match (slot, snapshot) {
            (Some(slot), Some(snapshot)) => {
                let callback = self.callback.read().clone();
                if let Some(cb) = callback {
                    cb.on_visibility_changed(snapshot);
                }
                Some(slot)
            }
            _ => {
                debug!("Removed tile {} had no slot", tile_id);
                None
            }
        }
    }

    /// Current grid state
    pub fn snapshot(&self) -> GridSnapshot {
        self.state.lock().snapshot()
    }

    /// Slot held by a tile
    pub fn slot_of(&self, tile_id: TileId) -> Option<SlotIndex> {
        self.state.lock().slots.slot_of(tile_id)
    }

    /// Number of visible slots
    pub fn visible_count(&self) -> usize {
        self.state.lock().visibility.visible_count()
    }

    /// Add or rename a roster entry
    pub fn set_attendee_name(&self, attendee_id: impl Into<String>, name: impl Into<String>) {
        self.state.lock().roster.set_name(attendee_id, name);
    }

    /// Drop a roster entry. The attendee's tile keeps its slot until removed.
    pub fn remove_attendee(&self, attendee_id: &str) {
        self.state.lock().roster.remove(attendee_id);
    }
}

impl VideoTileObserver for RemoteVideoGrid {
    fn video_tile_did_update(&self, tile: &TileState) -> Result<()> {
        self.handle_tile_updated(tile).map(|_| ())
    }

    fn video_tile_was_removed(&self, tile_id: TileId) -> Result<()> {
        self.handle_tile_removed(tile_id);
        Ok(())
    }
}

/// A grid subscribed to an [`ObserverRegistry`].
///
/// Dropping it withdraws the subscription and abandons the grid's state;
/// mounting again starts from an empty grid.
pub struct MountedGrid {
    grid: Arc<RemoteVideoGrid>,
    subscription: Subscription,
}

impl MountedGrid {
    pub fn grid(&self) -> &Arc<RemoteVideoGrid> {
        &self.grid
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_active()
    }

    /// Unsubscribe now instead of at end of scope
    pub fn unmount(self) {
        info!("Remote video grid unmounted");
    }
}

impl std::ops::Deref for MountedGrid {
    type Target = RemoteVideoGrid;

    fn deref(&self) -> &Self::Target {
        &self.grid
    }
}
