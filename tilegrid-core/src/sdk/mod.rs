//! Media SDK Boundary
//!
//! Tile events as the media SDK reports them, and the observer channel that
//! delivers them.

mod observer;
mod tile;

pub use observer::*;
pub use tile::*;
