//! Video Tile Events

use std::fmt;

use serde::{Deserialize, Serialize};

/// SDK handle for one participant video stream.
///
/// Unique while the stream is bound. Zero is the SDK's "no tile" value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileId(u64);

impl TileId {
    pub const fn new(id: u64) -> Self {
        TileId(id)
    }

    pub fn get(&self) -> u64 {
        self.0
    }

    pub fn is_valid(&self) -> bool {
        self.0 != 0
    }
}

impl From<u64> for TileId {
    fn from(id: u64) -> Self {
        TileId(id)
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// State of a tile as reported by the SDK on every update
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileState {
    pub tile_id: TileId,
    /// Attendee whose video is attached, once there is one
    pub bound_attendee_id: Option<String>,
    /// Our own camera
    pub local_tile: bool,
    /// Screen share rather than a camera
    pub is_content: bool,
}

impl TileState {
    /// Camera tile of a remote attendee
    pub fn remote(tile_id: u64, attendee_id: impl Into<String>) -> Self {
        Self {
            tile_id: TileId(tile_id),
            bound_attendee_id: Some(attendee_id.into()),
            local_tile: false,
            is_content: false,
        }
    }

    /// The tile id and attendee if this tile belongs in the remote grid.
    ///
    /// Unbound, local and content tiles are skipped, as are tiles without a
    /// valid id.
    pub fn remote_video(&self) -> Option<(TileId, &str)> {
        if self.local_tile || self.is_content || !self.tile_id.is_valid() {
            return None;
        }
        match self.bound_attendee_id.as_deref() {
            Some(attendee) if !attendee.is_empty() => Some((self.tile_id, attendee)),
            _ => None,
        }
    }
}

/// Events delivered by the SDK observer channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileEvent {
    /// A tile was created or changed
    Updated(TileState),
    /// A tile went away
    Removed(TileId),
}

impl TileEvent {
    pub fn tile_id(&self) -> TileId {
        match self {
            TileEvent::Updated(state) => state.tile_id,
            TileEvent::Removed(tile_id) => *tile_id,
        }
    }
}
