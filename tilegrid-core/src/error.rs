//! Error types for the video grid

use crate::sdk::TileId;

/// Errors raised by the grid core
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    /// Every slot is held by another tile. The tile must not be bound.
    #[error("No tiles are available: all {capacity} slots are taken (tile {tile_id})")]
    SlotExhausted { tile_id: TileId, capacity: usize },
}

/// Result alias used across the grid core
pub type Result<T> = std::result::Result<T, GridError>;
