//! Remote Video Grid - Core Library
//!
//! This library keeps a stable display slot for every remote video tile
//! reported by the media SDK, so the rendering layer can bind each tile to a
//! fixed video sink without reshuffling them on every update.

pub mod error;
pub mod grid;
pub mod logging;
pub mod roster;
pub mod sdk;
pub mod slots;

// Re-exports for convenience
pub use error::{GridError, Result};
pub use grid::{GridCallback, GridSnapshot, MountedGrid, RemoteVideoGrid, SlotView};
pub use sdk::{ObserverRegistry, Subscription, TileEvent, TileId, TileState, VideoTileObserver};
pub use slots::{SlotIndex, TileSlots, VisibilityMap, MAX_REMOTE_VIDEOS};
