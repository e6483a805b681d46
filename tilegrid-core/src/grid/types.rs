//! Grid types shared with the rendering layer

use serde::{Deserialize, Serialize};

use crate::sdk::TileId;
use crate::slots::SlotIndex;

/// One slot as the rendering layer sees it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotView {
    pub slot: SlotIndex,
    pub tile_id: Option<TileId>,
    pub attendee_id: Option<String>,
    /// Roster name, when the attendee is known
    pub attendee_name: Option<String>,
}

impl SlotView {
    pub fn is_visible(&self) -> bool {
        self.attendee_id.is_some()
    }
}

/// Full grid state at one point in time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSnapshot {
    pub capacity: usize,
    /// Number of visible slots, the size handed to the grid layout
    pub visible_count: usize,
    /// Every slot in index order, visible or not
    pub slots: Vec<SlotView>,
}

impl GridSnapshot {
    pub fn visible(&self) -> impl Iterator<Item = &SlotView> {
        self.slots.iter().filter(|s| s.is_visible())
    }

    pub fn slot(&self, slot: SlotIndex) -> Option<&SlotView> {
        self.slots.get(slot)
    }
}

/// Callback interface for the rendering layer
pub trait GridCallback: Send + Sync {
    /// Attach the tile's video to the sink at `slot`
    fn bind_video_sink(&self, tile_id: TileId, slot: SlotIndex);
    fn on_visibility_changed(&self, snapshot: GridSnapshot);
    fn on_error(&self, message: String);
}
